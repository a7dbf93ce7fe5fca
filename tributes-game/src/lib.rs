//! Tributes Game Engine
//!
//! Platform-agnostic core of an elimination tournament simulator: a roster of
//! tributes is whittled down round by round through narrated events until one
//! remains. This crate owns the scheduler, the fatality engine, the summary
//! composer and the channel lobby; rendering is left to the caller.

pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod fatality;
pub mod game;
pub mod lobby;
pub mod sanitize;
pub mod scheduler;
pub mod state;
pub mod summary;
pub mod template;
pub mod tribute;

// Re-export commonly used types
pub use config::{ConfigError, GameConfig};
pub use data::{Action, CatalogError, EventCatalog, EventTemplate, RosterData};
pub use error::{GameError, InvalidState};
pub use fatality::{RoundResolution, resolve_round};
pub use game::{Game, UserId};
pub use lobby::{ChannelId, Lobby, LobbyError, StatusSummary};
pub use sanitize::{sanitize_name, unescaped_len};
pub use scheduler::{
    RoundType, Schedule, ScheduledRound, fatality_pressure, feast_chance, schedule_round,
};
pub use state::{DayFlags, Phase, SimulationState};
pub use summary::{RoundSummary, StepOutcome, WinnerSummary, cannon_shots};
pub use template::{MessageTemplate, TemplateError, TitleTemplate};
pub use tribute::{Gender, Tribute, TributeId};

const DEFAULT_GAME_CONFIG: &str = include_str!("../static/data/game_config.json");

/// Trait for abstracting data loading operations
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the event catalog from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or fails validation.
    fn load_event_catalog(&self) -> Result<EventCatalog, Self::Error>;

    /// Load the named default roster groups
    ///
    /// # Errors
    ///
    /// Returns an error if the roster data cannot be loaded.
    fn load_rosters(&self) -> Result<RosterData, Self::Error>;

    /// Load configuration data for a specific system
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or parsed.
    fn load_config<T>(&self, config_name: &str) -> Result<T, Self::Error>
    where
        T: serde::de::DeserializeOwned;
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no bundled config named {0:?}")]
    UnknownConfig(String),
}

/// Loader backed by the JSON assets compiled into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticLoader;

impl DataLoader for StaticLoader {
    type Error = LoadError;

    fn load_event_catalog(&self) -> Result<EventCatalog, Self::Error> {
        Ok(EventCatalog::load_from_static()?)
    }

    fn load_rosters(&self) -> Result<RosterData, Self::Error> {
        Ok(RosterData::load_from_static()?)
    }

    fn load_config<T>(&self, config_name: &str) -> Result<T, Self::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        let json = match config_name {
            "game_config" => DEFAULT_GAME_CONFIG,
            other => return Err(LoadError::UnknownConfig(other.to_string())),
        };
        serde_json::from_str(json).map_err(|err| ConfigError::Parse(err).into())
    }
}
