//! Narration templates.
//!
//! Templates are parsed once when the catalog loads. Action messages reference
//! sampled tributes positionally (`{0}`, `{1.his_her}`), and binding takes the
//! ordered slice of sampled tributes so every reference is checked against the
//! slot count instead of relying on implicit formatting.
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use thiserror::Error;

use crate::tribute::Tribute;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unbalanced brace at byte {position} in \"{source_text}\"")]
    UnbalancedBrace {
        position: usize,
        source_text: String,
    },
    #[error("placeholder \"{{{placeholder}}}\" is not a tribute slot")]
    BadSlot { placeholder: String },
    #[error("unknown tribute field \"{field}\"")]
    UnknownField { field: String },
    #[error("unknown title placeholder \"{{{placeholder}}}\"")]
    UnknownTitlePlaceholder { placeholder: String },
    #[error("slot {index} referenced but only {len} tributes were bound")]
    MissingSlot { index: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Text(String),
    Placeholder(String),
}

fn tokenize(source: &str) -> Result<Vec<Token>, TemplateError> {
    let unbalanced = |position| TemplateError::UnbalancedBrace {
        position,
        source_text: source.to_string(),
    };
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut chars = source.char_indices().peekable();
    while let Some((pos, ch)) = chars.next() {
        match ch {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                text.push('{');
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
                text.push('}');
            }
            '{' => {
                let mut inner = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    match c {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return Err(unbalanced(pos)),
                        other => inner.push(other),
                    }
                }
                if !closed {
                    return Err(unbalanced(pos));
                }
                if !text.is_empty() {
                    tokens.push(Token::Text(std::mem::take(&mut text)));
                }
                tokens.push(Token::Placeholder(inner.trim().to_string()));
            }
            '}' => return Err(unbalanced(pos)),
            other => text.push(other),
        }
    }
    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
    Ok(tokens)
}

/// Attribute of a sampled tribute that a placeholder renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotField {
    Name,
    District,
    HeShe,
    HeSheCap,
    HimHer,
    HimHerCap,
    HisHer,
    HisHerCap,
    HimselfHerself,
    HimselfHerselfCap,
}

impl SlotField {
    fn parse(field: &str) -> Result<Self, TemplateError> {
        Ok(match field {
            "name" => Self::Name,
            "district" => Self::District,
            "he_she" => Self::HeShe,
            "he_she_cap" => Self::HeSheCap,
            "him_her" => Self::HimHer,
            "him_her_cap" => Self::HimHerCap,
            "his_her" => Self::HisHer,
            "his_her_cap" => Self::HisHerCap,
            "himself_herself" => Self::HimselfHerself,
            "himself_herself_cap" => Self::HimselfHerselfCap,
            other => {
                return Err(TemplateError::UnknownField {
                    field: other.to_string(),
                });
            }
        })
    }

    fn render(self, tribute: &Tribute, out: &mut String) {
        let gender = tribute.gender;
        match self {
            Self::Name => out.push_str(&tribute.name),
            Self::District => {
                let _ = write!(out, "{}", tribute.district);
            }
            Self::HeShe => out.push_str(gender.he_she()),
            Self::HimHer => out.push_str(gender.him_her()),
            Self::HisHer => out.push_str(gender.his_her()),
            Self::HimselfHerself => out.push_str(gender.himself_herself()),
            Self::HeSheCap => push_capitalized(out, gender.he_she()),
            Self::HimHerCap => push_capitalized(out, gender.him_her()),
            Self::HisHerCap => push_capitalized(out, gender.his_her()),
            Self::HimselfHerselfCap => push_capitalized(out, gender.himself_herself()),
        }
    }
}

fn push_capitalized(out: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(chars.as_str());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot { index: usize, field: SlotField },
}

/// Action message with positional tribute references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl MessageTemplate {
    /// Parse a message template.
    ///
    /// # Errors
    ///
    /// Returns an error on unbalanced braces, non-numeric slots or unknown fields.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        for token in tokenize(source)? {
            match token {
                Token::Text(text) => segments.push(Segment::Literal(text)),
                Token::Placeholder(placeholder) => {
                    let (slot, field) = match placeholder.split_once('.') {
                        Some((slot, field)) => (slot, SlotField::parse(field)?),
                        None => (placeholder.as_str(), SlotField::Name),
                    };
                    let index = slot
                        .parse::<usize>()
                        .map_err(|_| TemplateError::BadSlot {
                            placeholder: placeholder.clone(),
                        })?;
                    segments.push(Segment::Slot { index, field });
                }
            }
        }
        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// Highest slot index referenced, if any.
    #[must_use]
    pub fn max_slot(&self) -> Option<usize> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Slot { index, .. } => Some(*index),
                Segment::Literal(_) => None,
            })
            .max()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Render the message with `slots[i]` bound to placeholder `{i}`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::MissingSlot`] if a placeholder has no bound tribute.
    pub fn bind(&self, slots: &[&Tribute]) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len() + 16);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot { index, field } => {
                    let tribute = slots.get(*index).ok_or(TemplateError::MissingSlot {
                        index: *index,
                        len: slots.len(),
                    })?;
                    field.render(tribute, &mut out);
                }
            }
        }
        Ok(out)
    }
}

impl TryFrom<String> for MessageTemplate {
    type Error = TemplateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MessageTemplate> for String {
    fn from(value: MessageTemplate) -> Self {
        value.source
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TitleSegment {
    Literal(String),
    Day,
}

/// Round title accepting a single `{day}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TitleTemplate {
    source: String,
    segments: Vec<TitleSegment>,
}

impl TitleTemplate {
    /// Parse a title template.
    ///
    /// # Errors
    ///
    /// Returns an error on unbalanced braces or any placeholder other than `{day}`.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let segments = tokenize(source)?
            .into_iter()
            .map(|token| match token {
                Token::Text(text) => Ok(TitleSegment::Literal(text)),
                Token::Placeholder(p) if p == "day" => Ok(TitleSegment::Day),
                Token::Placeholder(placeholder) => {
                    Err(TemplateError::UnknownTitlePlaceholder { placeholder })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    #[must_use]
    pub fn render(&self, day: u32) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                TitleSegment::Literal(text) => out.push_str(text),
                TitleSegment::Day => {
                    let _ = write!(out, "{day}");
                }
            }
        }
        out
    }
}

impl TryFrom<String> for TitleTemplate {
    type Error = TemplateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TitleTemplate> for String {
    fn from(value: TitleTemplate) -> Self {
        value.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tribute::Gender;

    fn pair() -> (Tribute, Tribute) {
        (
            Tribute::new("Katniss", 12, Gender::Female),
            Tribute::new("Cato", 2, Gender::Male),
        )
    }

    #[test]
    fn binds_names_and_pronouns_in_slot_order() {
        let (a, b) = pair();
        let err =
            MessageTemplate::parse("{0} shoots {1.him_her} while {1.he_she} sleeps. {0.His_her_cap}")
                .unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnknownField {
                field: "His_her_cap".to_string()
            }
        );

        let template =
            MessageTemplate::parse("{0} shoots {1} in {1.his_her} sleep. {0.he_she_cap} hides.")
                .unwrap();
        assert_eq!(template.max_slot(), Some(1));
        assert_eq!(
            template.bind(&[&a, &b]).unwrap(),
            "Katniss shoots Cato in his sleep. She hides."
        );
        assert_eq!(
            template.bind(&[&b, &a]).unwrap(),
            "Cato shoots Katniss in her sleep. He hides."
        );
    }

    #[test]
    fn bind_rejects_missing_slots() {
        let (a, _) = pair();
        let template = MessageTemplate::parse("{0} and {1}").unwrap();
        assert_eq!(
            template.bind(&[&a]),
            Err(TemplateError::MissingSlot { index: 1, len: 1 })
        );
    }

    #[test]
    fn escaped_braces_and_district_render() {
        let (a, _) = pair();
        let template = MessageTemplate::parse("{{{0}}} of {0.district}").unwrap();
        assert_eq!(template.bind(&[&a]).unwrap(), "{Katniss} of 12");
    }

    #[test]
    fn malformed_templates_are_rejected() {
        assert!(matches!(
            MessageTemplate::parse("{0"),
            Err(TemplateError::UnbalancedBrace { .. })
        ));
        assert!(matches!(
            MessageTemplate::parse("oops}"),
            Err(TemplateError::UnbalancedBrace { .. })
        ));
        assert!(matches!(
            MessageTemplate::parse("{first}"),
            Err(TemplateError::BadSlot { .. })
        ));
    }

    #[test]
    fn title_renders_day() {
        let title = TitleTemplate::parse("Day {day}").unwrap();
        assert_eq!(title.render(3), "Day 3");
        assert!(TitleTemplate::parse("Day {0}").is_err());
    }

    #[test]
    fn templates_deserialize_from_strings() {
        let template: MessageTemplate = serde_json::from_str("\"{0} runs.\"").unwrap();
        assert_eq!(template.as_str(), "{0} runs.");
        let bad: Result<MessageTemplate, _> = serde_json::from_str("\"{0.shoe_size}\"");
        assert!(bad.is_err());
    }
}
