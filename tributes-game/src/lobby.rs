//! Channel-keyed registry of games and the roster commands run against it.
use log::{debug, info};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;
use thiserror::Error;

use crate::DataLoader;
use crate::config::{ConfigError, GameConfig};
use crate::constants::LOBBY_COLOR;
use crate::data::{EventCatalog, RosterData};
use crate::error::{GameError, InvalidState};
use crate::game::{Game, UserId};
use crate::sanitize::sanitize_name;
use crate::state::Phase;
use crate::summary::{StepOutcome, footer};
use crate::tribute::Gender;

/// External identifier of the channel a game runs in.
pub type ChannelId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LobbyError {
    #[error("there is no game currently running in this channel")]
    NoGame,
    #[error("a game has already been started in this channel")]
    GameExists,
    #[error("this game is already running")]
    GameStarted,
    #[error("this game hasn't been started yet")]
    GameNotStarted,
    #[error("this game is already at maximum capacity")]
    GameFull,
    #[error("that person is already in this game")]
    PlayerExists,
    #[error("that name is too long (max {max} chars)")]
    CharLimit { max: usize },
    #[error("you are not the owner of this game")]
    NotOwner,
    #[error("that is not a valid group. Valid groups are: {}", .valid.join(", "))]
    InvalidGroup { valid: Vec<String> },
    #[error("there are not enough players to start a game. There must be at least {min}")]
    NotEnoughPlayers { min: usize },
    #[error(transparent)]
    Game(GameError),
}

impl From<GameError> for LobbyError {
    fn from(err: GameError) -> Self {
        match err {
            GameError::DuplicateName(_) => Self::PlayerExists,
            GameError::RosterFull { .. } => Self::GameFull,
            GameError::NameTooLong { max } => Self::CharLimit { max },
            GameError::InvalidState(InvalidState::AlreadyStarted) => Self::GameStarted,
            GameError::InvalidState(InvalidState::NotStarted) => Self::GameNotStarted,
            GameError::InvalidState(InvalidState::NotEnoughTributes { need, .. }) => {
                Self::NotEnoughPlayers { min: need }
            }
            other => Self::Game(other),
        }
    }
}

/// Embed-style block: title, body, footer and color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub title: String,
    pub description: String,
    pub footer: String,
    pub color: u32,
}

#[derive(Debug)]
pub struct Lobby {
    games: HashMap<ChannelId, Game>,
    catalog: Arc<EventCatalog>,
    rosters: RosterData,
    config: GameConfig,
    rng: ChaCha20Rng,
}

impl Lobby {
    #[must_use]
    pub fn new(catalog: EventCatalog, rosters: RosterData, config: GameConfig) -> Self {
        Self {
            games: HashMap::new(),
            catalog: Arc::new(catalog),
            rosters,
            config,
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Build a lobby from whatever a platform loader supplies.
    ///
    /// # Errors
    ///
    /// Propagates loader failures and rejects a loaded config that fails
    /// [`GameConfig::validate`].
    pub fn from_loader<L>(loader: &L) -> Result<Self, L::Error>
    where
        L: DataLoader,
        L::Error: From<ConfigError>,
    {
        let config: GameConfig = loader.load_config("game_config")?;
        config.validate()?;
        Ok(Self::new(
            loader.load_event_catalog()?,
            loader.load_rosters()?,
            config,
        ))
    }

    /// Seed the generator that seeds every game created afterwards.
    #[must_use]
    pub fn seeded(mut self, seed: u64) -> Self {
        self.rng = ChaCha20Rng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn game(&self, channel: ChannelId) -> Option<&Game> {
        self.games.get(&channel)
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub const fn rosters(&self) -> &RosterData {
        &self.rosters
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.rosters.group_names()
    }

    fn game_mut(&mut self, channel: ChannelId) -> Result<&mut Game, LobbyError> {
        self.games.get_mut(&channel).ok_or(LobbyError::NoGame)
    }

    fn owned_game_mut(
        &mut self,
        channel: ChannelId,
        requester: UserId,
    ) -> Result<&mut Game, LobbyError> {
        let game = self.game_mut(channel)?;
        if game.owner_id() != requester {
            return Err(LobbyError::NotOwner);
        }
        Ok(game)
    }

    /// Open a game in `channel` and return the announcement line.
    ///
    /// # Errors
    ///
    /// [`LobbyError::GameExists`] if the channel already has a game.
    pub fn new_game(
        &mut self,
        channel: ChannelId,
        owner_id: UserId,
        owner_name: &str,
        title: Option<&str>,
    ) -> Result<String, LobbyError> {
        if self.games.contains_key(&channel) {
            return Err(LobbyError::GameExists);
        }
        let game = Game::new(
            owner_id,
            owner_name,
            title,
            Arc::clone(&self.catalog),
            self.config.clone(),
        )
        .seeded(self.rng.next_u64());
        let prefix = &self.config.command_prefix;
        let line = format!(
            "{owner_name} has started {}! Use `{prefix}add [-m|-f] <name>` to add a player or \
             `{prefix}join [-m|-f]` to enter the game yourself!",
            game.title()
        );
        info!("channel {channel}: {owner_name} opened {}", game.title());
        self.games.insert(channel, game);
        Ok(line)
    }

    /// Add a tribute and return the confirmation line.
    ///
    /// Without an explicit gender a leading `-m ` / `-f ` flag on the name is
    /// honored; otherwise the gender is random.
    ///
    /// # Errors
    ///
    /// `NoGame`, `GameStarted`, `GameFull`, `CharLimit` or `PlayerExists`.
    pub fn add_tribute(
        &mut self,
        channel: ChannelId,
        raw_name: &str,
        gender: Option<Gender>,
        volunteer: bool,
    ) -> Result<String, LobbyError> {
        let game = self.game_mut(channel)?;
        let (gender, raw_name) = split_gender_flag(raw_name, gender);
        let name = sanitize_name(raw_name);
        let tribute = game.add_tribute(&name, gender)?;
        Ok(if volunteer {
            format!(
                "{} volunteers as tribute for District {}!",
                tribute.name, tribute.district
            )
        } else {
            format!(
                "{} from District {} is in the game!",
                tribute.name, tribute.district
            )
        })
    }

    /// # Errors
    ///
    /// `NoGame`, `GameStarted`, or an unknown tribute name.
    pub fn remove_tribute(&mut self, channel: ChannelId, name: &str) -> Result<String, LobbyError> {
        let game = self.game_mut(channel)?;
        let removed = game.remove_tribute(&sanitize_name(name))?;
        Ok(format!("{} has been removed from the game.", removed.name))
    }

    /// Fill the remaining slots from a bundled roster group.
    ///
    /// # Errors
    ///
    /// `NoGame`, `GameStarted`, `GameFull`, or `InvalidGroup` when `group` is
    /// missing or unknown.
    pub fn pad_tributes(
        &mut self,
        channel: ChannelId,
        group: Option<&str>,
    ) -> Result<String, LobbyError> {
        let game = self.games.get(&channel).ok_or(LobbyError::NoGame)?;
        ensure_open(game)?;
        let names = group
            .and_then(|name| self.rosters.group(name))
            .map(<[String]>::to_vec)
            .ok_or_else(|| LobbyError::InvalidGroup {
                valid: self.rosters.group_names().map(str::to_string).collect(),
            })?;
        self.pad_tributes_from(channel, &names)
    }

    /// Fill the remaining slots from `names` in a random order, skipping names
    /// that are already taken or do not fit.
    ///
    /// # Errors
    ///
    /// `NoGame`, `GameStarted` or `GameFull`.
    pub fn pad_tributes_from(
        &mut self,
        channel: ChannelId,
        names: &[String],
    ) -> Result<String, LobbyError> {
        use rand::seq::SliceRandom;

        let mut shuffled = names.to_vec();
        shuffled.shuffle(&mut self.rng);
        let game = self.game_mut(channel)?;
        ensure_open(game)?;

        let mut added = 0_usize;
        for name in &shuffled {
            if game.is_full() {
                break;
            }
            match game.add_tribute(&sanitize_name(name), None) {
                Ok(_) => added += 1,
                Err(
                    GameError::DuplicateName(_) | GameError::NameTooLong { .. } | GameError::EmptyName,
                ) => debug!("skipping padding name {name:?}"),
                Err(err) => return Err(err.into()),
            }
        }
        Ok(format!(
            "{added} tributes have been added. The roster now has {}/{} tributes.",
            game.state().total(),
            game.config().max_tributes
        ))
    }

    /// # Errors
    ///
    /// [`LobbyError::NoGame`] if the channel has no game.
    pub fn status(&self, channel: ChannelId) -> Result<StatusSummary, LobbyError> {
        let game = self.games.get(&channel).ok_or(LobbyError::NoGame)?;
        let state = game.state();
        let mut description = String::new();
        for tribute in state.roster() {
            if state.phase() == Phase::Pending {
                let _ = writeln!(description, "{}", tribute.display());
            } else {
                let marker = if tribute.alive { "" } else { "☠️ " };
                let _ = writeln!(
                    description,
                    "{marker}{} | Kills: {}",
                    tribute.display(),
                    tribute.kills
                );
            }
        }
        let footer = if state.phase() != Phase::Pending {
            footer(state, game.owner_name())
        } else {
            format!(
                "Tributes: {}/{} | Host: {}",
                state.total(),
                game.config().max_tributes,
                game.owner_name()
            )
        };
        Ok(StatusSummary {
            title: game.title().to_string(),
            description: description.trim_end().to_string(),
            footer,
            color: LOBBY_COLOR,
        })
    }

    /// Start the pending game. Only its owner may do so.
    ///
    /// # Errors
    ///
    /// `NoGame`, `NotOwner`, `GameStarted` or `NotEnoughPlayers`.
    pub fn start_game(
        &mut self,
        channel: ChannelId,
        requester: UserId,
        prefix: &str,
    ) -> Result<StatusSummary, LobbyError> {
        let game = self.owned_game_mut(channel, requester)?;
        game.start()?;

        let mut by_district: Vec<(u32, Vec<&str>)> = Vec::new();
        for tribute in game.state().roster() {
            match by_district.iter_mut().find(|(d, _)| *d == tribute.district) {
                Some((_, names)) => names.push(tribute.name.as_str()),
                None => by_district.push((tribute.district, vec![tribute.name.as_str()])),
            }
        }
        by_district.sort_by_key(|(district, _)| *district);
        let description = by_district
            .iter()
            .map(|(district, names)| format!("District {district}: {}", names.join(", ")))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(StatusSummary {
            title: format!("{} | The Reaping", game.title()),
            description,
            footer: format!("Use {prefix}step to advance the game."),
            color: LOBBY_COLOR,
        })
    }

    /// Cancel a game and hand it back.
    ///
    /// # Errors
    ///
    /// `NoGame` or `NotOwner`.
    pub fn end_game(&mut self, channel: ChannelId, requester: UserId) -> Result<Game, LobbyError> {
        self.owned_game_mut(channel, requester)?;
        let game = self.games.remove(&channel).ok_or(LobbyError::NoGame)?;
        info!("channel {channel}: {} cancelled", game.title());
        Ok(game)
    }

    /// Advance the channel's game by one round. A finished game is removed.
    ///
    /// # Errors
    ///
    /// `NoGame`, `NotOwner`, `GameNotStarted`, or any simulation error.
    pub fn step(&mut self, channel: ChannelId, requester: UserId) -> Result<StepOutcome, LobbyError> {
        let game = self.owned_game_mut(channel, requester)?;
        let outcome = game.advance()?;
        if outcome.is_winner() {
            self.games.remove(&channel);
        }
        Ok(outcome)
    }
}

fn ensure_open(game: &Game) -> Result<(), LobbyError> {
    if game.state().phase() != Phase::Pending {
        return Err(LobbyError::GameStarted);
    }
    if game.is_full() {
        return Err(LobbyError::GameFull);
    }
    Ok(())
}

fn split_gender_flag(raw: &str, gender: Option<Gender>) -> (Option<Gender>, &str) {
    let raw = raw.trim();
    if gender.is_some() {
        return (gender, raw);
    }
    match raw.split_once(char::is_whitespace) {
        Some((flag, rest)) => match Gender::from_flag(flag) {
            Some(flagged) => (Some(flagged), rest),
            None => (None, raw),
        },
        None => (None, raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lobby() -> Lobby {
        Lobby::new(
            EventCatalog::load_from_static().unwrap(),
            RosterData::load_from_static().unwrap(),
            GameConfig::default(),
        )
        .seeded(9)
    }

    #[test]
    fn gender_flag_is_parsed_from_name() {
        assert_eq!(split_gender_flag("-f Rue", None), (Some(Gender::Female), "Rue"));
        assert_eq!(
            split_gender_flag(" -m  Thresh ", None),
            (Some(Gender::Male), " Thresh")
        );
        assert_eq!(split_gender_flag("Rue -f", None), (None, "Rue -f"));
        assert_eq!(
            split_gender_flag("-f Rue", Some(Gender::Male)),
            (Some(Gender::Male), "-f Rue")
        );
    }

    #[test]
    fn add_tribute_lines() {
        let mut lobby = lobby();
        lobby.new_game(5, 1, "host", Some("Games")).unwrap();
        assert_eq!(
            lobby.add_tribute(5, "-f Rue", None, false).unwrap(),
            "Rue from District 1 is in the game!"
        );
        assert_eq!(
            lobby.add_tribute(5, "Katniss", None, true).unwrap(),
            "Katniss volunteers as tribute for District 1!"
        );
        let game = lobby.game(5).unwrap();
        assert_eq!(game.tribute_by_name("Rue").unwrap().gender, Gender::Female);
    }

    #[test]
    fn status_lists_roster() {
        let mut lobby = lobby();
        lobby.new_game(5, 1, "host", None).unwrap();
        lobby.add_tribute(5, "a", None, false).unwrap();
        lobby.add_tribute(5, "b", None, false).unwrap();
        let status = lobby.status(5).unwrap();
        assert_eq!(status.title, "The Hunger Games");
        assert_eq!(status.description, "a | District 1\nb | District 1");
        assert_eq!(status.footer, "Tributes: 2/24 | Host: host");

        let start = lobby.start_game(5, 1, "h$").unwrap();
        assert_eq!(start.description, "District 1: a, b");
        let status = lobby.status(5).unwrap();
        assert!(status.footer.starts_with("Tributes Remaining: 2/2"));
    }

    #[test]
    fn error_mapping_covers_roster_errors() {
        assert_eq!(
            LobbyError::from(GameError::DuplicateName("x".into())),
            LobbyError::PlayerExists
        );
        assert_eq!(
            LobbyError::from(GameError::RosterFull { max: 24 }),
            LobbyError::GameFull
        );
        assert_eq!(
            LobbyError::from(GameError::InvalidState(InvalidState::NotStarted)),
            LobbyError::GameNotStarted
        );
        assert!(matches!(
            LobbyError::from(GameError::EmptyName),
            LobbyError::Game(GameError::EmptyName)
        ));
    }
}
