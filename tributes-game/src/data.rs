use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::scheduler::RoundType;
use crate::template::{MessageTemplate, TitleTemplate};

const DEFAULT_EVENT_DATA: &str = include_str!("../static/data/events.json");
const DEFAULT_ROSTER_DATA: &str = include_str!("../static/data/rosters.json");

/// Slot indices into the tributes sampled for one action.
pub type SlotList = SmallVec<[usize; 2]>;

/// Data errors found while loading the event catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Malformed JSON, including message or title templates that fail to parse.
    #[error("event catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{location}: actions must involve at least one tribute")]
    ZeroTributes { location: String },
    #[error("{location}: victim slot {slot} is out of range for {tributes} tributes")]
    VictimOutOfRange {
        location: String,
        slot: usize,
        tributes: usize,
    },
    #[error("{location}: killer slot {slot} is out of range for {tributes} tributes")]
    KillerOutOfRange {
        location: String,
        slot: usize,
        tributes: usize,
    },
    #[error("{location}: slot {slot} is listed as a victim twice")]
    DuplicateVictim { location: String, slot: usize },
    #[error("{location}: slot {slot} cannot be both killer and victim")]
    KillerIsVictim { location: String, slot: usize },
    #[error("{location}: lethal actions must name at least one victim")]
    LethalWithoutVictims { location: String },
    #[error("{location}: non-lethal actions cannot name victims or killers")]
    NonLethalWithVictims { location: String },
    #[error("{location}: message references slot {slot} but the action samples {tributes}")]
    MessageSlotOutOfRange {
        location: String,
        slot: usize,
        tributes: usize,
    },
    #[error("{location}: the non-lethal pool is empty")]
    EmptyNonLethalPool { location: String },
    #[error("the arena pool is empty")]
    EmptyArenaPool,
    #[error("roster data is not valid JSON: {0}")]
    Roster(serde_json::Error),
}

/// One narrative outcome consuming a fixed number of tributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub tributes: usize,
    pub msg: MessageTemplate,
    /// Sampled slots that die.
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub killed: SlotList,
    /// Sampled slots credited with every victim of this action.
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub killer: SlotList,
}

impl Action {
    #[must_use]
    pub fn is_lethal(&self) -> bool {
        !self.killed.is_empty()
    }

    #[must_use]
    pub fn victim_count(&self) -> usize {
        self.killed.len()
    }

    fn validate(&self, location: &str, lethal: bool) -> Result<(), CatalogError> {
        let location = || location.to_string();
        if self.tributes == 0 {
            return Err(CatalogError::ZeroTributes {
                location: location(),
            });
        }
        if let Some(slot) = self.msg.max_slot()
            && slot >= self.tributes
        {
            return Err(CatalogError::MessageSlotOutOfRange {
                location: location(),
                slot,
                tributes: self.tributes,
            });
        }
        if !lethal {
            if self.is_lethal() || !self.killer.is_empty() {
                return Err(CatalogError::NonLethalWithVictims {
                    location: location(),
                });
            }
            return Ok(());
        }
        if !self.is_lethal() {
            return Err(CatalogError::LethalWithoutVictims {
                location: location(),
            });
        }
        for (pos, &slot) in self.killed.iter().enumerate() {
            if slot >= self.tributes {
                return Err(CatalogError::VictimOutOfRange {
                    location: location(),
                    slot,
                    tributes: self.tributes,
                });
            }
            if self.killed[..pos].contains(&slot) {
                return Err(CatalogError::DuplicateVictim {
                    location: location(),
                    slot,
                });
            }
        }
        for &slot in &self.killer {
            if slot >= self.tributes {
                return Err(CatalogError::KillerOutOfRange {
                    location: location(),
                    slot,
                    tributes: self.tributes,
                });
            }
            if self.killed.contains(&slot) {
                return Err(CatalogError::KillerIsVictim {
                    location: location(),
                    slot,
                });
            }
        }
        Ok(())
    }
}

/// Presentation and action pools for one round type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTemplate {
    pub title: TitleTemplate,
    pub description: String,
    pub color: u32,
    #[serde(default)]
    pub nonfatal: Vec<Action>,
    #[serde(default)]
    pub fatal: Vec<Action>,
}

impl EventTemplate {
    fn validate(&self, name: &str) -> Result<(), CatalogError> {
        if self.nonfatal.is_empty() {
            return Err(CatalogError::EmptyNonLethalPool {
                location: name.to_string(),
            });
        }
        for (idx, action) in self.nonfatal.iter().enumerate() {
            action.validate(&format!("{name}.nonfatal[{idx}]"), false)?;
        }
        for (idx, action) in self.fatal.iter().enumerate() {
            action.validate(&format!("{name}.fatal[{idx}]"), true)?;
        }
        Ok(())
    }
}

/// Static table of round templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCatalog {
    pub bloodbath: EventTemplate,
    pub day: EventTemplate,
    pub night: EventTemplate,
    pub feast: EventTemplate,
    /// Arena flavors; one is chosen uniformly per arena round.
    pub arena: Vec<EventTemplate>,
}

impl EventCatalog {
    /// Load and validate a catalog from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or any action is inconsistent.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load the bundled catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled asset fails validation.
    pub fn load_from_static() -> Result<Self, CatalogError> {
        Self::from_json(DEFAULT_EVENT_DATA)
    }

    /// Check every action against its declared tribute count.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), CatalogError> {
        self.bloodbath.validate("bloodbath")?;
        self.day.validate("day")?;
        self.night.validate("night")?;
        self.feast.validate("feast")?;
        if self.arena.is_empty() {
            return Err(CatalogError::EmptyArenaPool);
        }
        for (idx, template) in self.arena.iter().enumerate() {
            template.validate(&format!("arena[{idx}]"))?;
        }
        Ok(())
    }

    /// Template narrating `round`. Arena flavors are drawn uniformly; fallen
    /// rounds have no template.
    pub fn template_for<R: Rng + ?Sized>(
        &self,
        round: RoundType,
        rng: &mut R,
    ) -> Option<&EventTemplate> {
        match round {
            RoundType::Bloodbath => Some(&self.bloodbath),
            RoundType::Feast => Some(&self.feast),
            RoundType::Day => Some(&self.day),
            RoundType::Night => Some(&self.night),
            RoundType::Arena => self.arena.choose(rng),
            RoundType::Fallen => None,
        }
    }
}

/// Named groups of default tribute names used to pad a roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct RosterData(pub BTreeMap<String, Vec<String>>);

impl RosterData {
    /// Load roster groups from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(json).map_err(CatalogError::Roster)
    }

    /// Load the bundled roster groups.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled asset cannot be parsed.
    pub fn load_from_static() -> Result<Self, CatalogError> {
        Self::from_json(DEFAULT_ROSTER_DATA)
    }

    #[must_use]
    pub fn group(&self, name: &str) -> Option<&[String]> {
        self.0.get(name).map(Vec::as_slice)
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
