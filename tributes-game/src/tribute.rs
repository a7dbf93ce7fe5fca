//! Participant model.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable roster index of a tribute within one simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TributeId(pub usize);

impl TributeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Gender attribute. Only used to pick pronouns in narration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    /// Pick a gender uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Self::Male
        } else {
            Self::Female
        }
    }

    /// Parse the `-m` / `-f` command flags.
    #[must_use]
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag.trim() {
            "-m" | "-M" => Some(Self::Male),
            "-f" | "-F" => Some(Self::Female),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    #[must_use]
    pub const fn he_she(self) -> &'static str {
        match self {
            Self::Male => "he",
            Self::Female => "she",
        }
    }

    #[must_use]
    pub const fn him_her(self) -> &'static str {
        match self {
            Self::Male => "him",
            Self::Female => "her",
        }
    }

    #[must_use]
    pub const fn his_her(self) -> &'static str {
        match self {
            Self::Male => "his",
            Self::Female => "her",
        }
    }

    #[must_use]
    pub const fn himself_herself(self) -> &'static str {
        match self {
            Self::Male => "himself",
            Self::Female => "herself",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "m" | "male" => Ok(Self::Male),
            "f" | "female" => Ok(Self::Female),
            _ => Err(()),
        }
    }
}

/// An entrant in the simulation, alive or dead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tribute {
    pub name: String,
    pub district: u32,
    pub gender: Gender,
    pub alive: bool,
    pub kills: u32,
    /// Narration line of the action that killed this tribute. Written once.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause_of_death: Option<String>,
}

impl Tribute {
    #[must_use]
    pub fn new(name: impl Into<String>, district: u32, gender: Gender) -> Self {
        Self {
            name: name.into(),
            district,
            gender,
            alive: true,
            kills: 0,
            cause_of_death: None,
        }
    }

    /// Mark the tribute dead. Returns `false` if it was already dead, in which
    /// case the recorded cause is left untouched.
    pub fn kill(&mut self, cause: &str) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        self.cause_of_death = Some(cause.to_string());
        true
    }

    /// `"<name> | District <n>"`
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} | District {}", self.name, self.district)
    }
}

impl fmt::Display for Tribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pronouns_follow_gender() {
        assert_eq!(Gender::Male.he_she(), "he");
        assert_eq!(Gender::Female.him_her(), "her");
        assert_eq!(Gender::Female.his_her(), "her");
        assert_eq!(Gender::Male.himself_herself(), "himself");
    }

    #[test]
    fn gender_flags_parse() {
        assert_eq!(Gender::from_flag("-m"), Some(Gender::Male));
        assert_eq!(Gender::from_flag(" -f "), Some(Gender::Female));
        assert_eq!(Gender::from_flag("-x"), None);
        assert_eq!("Female".parse::<Gender>(), Ok(Gender::Female));
    }

    #[test]
    fn cause_of_death_is_immutable() {
        let mut tribute = Tribute::new("Rue", 11, Gender::Female);
        assert!(tribute.kill("first"));
        assert!(!tribute.kill("second"));
        assert!(!tribute.alive);
        assert_eq!(tribute.cause_of_death.as_deref(), Some("first"));
        assert_eq!(tribute.display(), "Rue | District 11");
    }
}
