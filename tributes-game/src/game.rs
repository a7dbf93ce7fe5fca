//! One simulation instance: roster, configuration, catalog and RNG.
use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::sync::Arc;

use crate::config::GameConfig;
use crate::data::EventCatalog;
use crate::error::{GameError, InvalidState};
use crate::fatality::resolve_round;
use crate::sanitize::unescaped_len;
use crate::scheduler::{RoundType, Schedule, schedule_round};
use crate::state::{Phase, SimulationState};
use crate::summary::{StepOutcome, compose_fallen, compose_round, compose_winner};
use crate::tribute::{Gender, Tribute, TributeId};

/// External identifier of the user hosting a game.
pub type UserId = u64;

#[derive(Debug, Clone)]
pub struct Game {
    owner_id: UserId,
    owner_name: String,
    title: String,
    config: GameConfig,
    catalog: Arc<EventCatalog>,
    state: SimulationState,
    rng: ChaCha20Rng,
}

impl Game {
    /// Create a pending game seeded from OS entropy. A blank title falls back
    /// to the configured default.
    #[must_use]
    pub fn new(
        owner_id: UserId,
        owner_name: impl Into<String>,
        title: Option<&str>,
        catalog: Arc<EventCatalog>,
        config: GameConfig,
    ) -> Self {
        let title = title
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .map_or_else(|| config.default_title.clone(), str::to_string);
        Self {
            owner_id,
            owner_name: owner_name.into(),
            title,
            config,
            catalog,
            state: SimulationState::new(),
            rng: ChaCha20Rng::from_entropy(),
        }
    }

    /// Replace the RNG with one seeded from `seed`.
    #[must_use]
    pub fn seeded(mut self, seed: u64) -> Self {
        self.rng = ChaCha20Rng::seed_from_u64(seed);
        self
    }

    // Accessors ----------------------------------------------------------

    #[must_use]
    pub const fn owner_id(&self) -> UserId {
        self.owner_id
    }

    #[must_use]
    pub fn owner_name(&self) -> &str {
        &self.owner_name
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub const fn state(&self) -> &SimulationState {
        &self.state
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.state.phase() == Phase::Started
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.state.total() >= self.config.max_tributes
    }

    #[must_use]
    pub fn tribute_by_name(&self, name: &str) -> Option<&Tribute> {
        self.state.roster().iter().find(|t| t.name == name)
    }

    // Roster -------------------------------------------------------------

    /// Register a tribute before the game starts. A missing gender is drawn
    /// at random; the district is the lowest one that still has room.
    ///
    /// # Errors
    ///
    /// Fails once started, when the roster is full, or when the name is
    /// blank, too long, or already taken. Length ignores the backslashes
    /// added by [`crate::sanitize_name`].
    pub fn add_tribute(&mut self, name: &str, gender: Option<Gender>) -> Result<&Tribute, GameError> {
        self.state.require_pending()?;
        if self.is_full() {
            return Err(GameError::RosterFull {
                max: self.config.max_tributes,
            });
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(GameError::EmptyName);
        }
        if unescaped_len(name) > self.config.max_name_len {
            return Err(GameError::NameTooLong {
                max: self.config.max_name_len,
            });
        }

        let gender = gender.unwrap_or_else(|| Gender::random(&mut self.rng));
        let district = self.next_district();
        let id = self
            .state
            .add_tribute(Tribute::new(name, district, gender))?;
        debug!("{name} joins {} for District {district}", self.title);
        Ok(self.state.tribute(id))
    }

    /// # Errors
    ///
    /// Fails once started or when no tribute has that name.
    pub fn remove_tribute(&mut self, name: &str) -> Result<Tribute, GameError> {
        self.state.remove_tribute(name)
    }

    fn next_district(&self) -> u32 {
        let per_district = self.config.tributes_per_district.max(1);
        let mut district = 1;
        loop {
            let occupants = self
                .state
                .roster()
                .iter()
                .filter(|t| t.district == district)
                .count();
            if occupants < per_district {
                return district;
            }
            district += 1;
        }
    }

    // Lifecycle ----------------------------------------------------------

    /// # Errors
    ///
    /// Fails if already started or the roster is below the configured minimum.
    pub fn start(&mut self) -> Result<(), GameError> {
        self.state.start(self.config.min_tributes)?;
        info!(
            "{} started with {} tributes",
            self.title,
            self.state.total()
        );
        Ok(())
    }

    /// Advance the simulation by one round.
    ///
    /// The round runs on a copy of the state and RNG; on error neither is
    /// touched.
    ///
    /// # Errors
    ///
    /// Fails before start or after a winner, and when the catalog cannot
    /// fill the round.
    pub fn advance(&mut self) -> Result<StepOutcome, GameError> {
        match self.state.phase() {
            Phase::Pending => return Err(InvalidState::NotStarted.into()),
            Phase::Finished => return Err(InvalidState::Finished.into()),
            Phase::Started => {}
        }

        let mut state = self.state.clone();
        let mut rng = self.rng.clone();
        let outcome = self.play_round(&mut state, &mut rng)?;
        self.state = state;
        self.rng = rng;
        Ok(outcome)
    }

    fn play_round(
        &self,
        state: &mut SimulationState,
        rng: &mut ChaCha20Rng,
    ) -> Result<StepOutcome, GameError> {
        let scheduled = match schedule_round(state, rng) {
            Schedule::Winner(id) => return Ok(self.finish(state, id)),
            Schedule::Round(scheduled) => scheduled,
        };

        let round = scheduled.round;
        if round == RoundType::Fallen {
            let summary = compose_fallen(state, &self.title, &self.owner_name);
            return Ok(StepOutcome::Round(summary));
        }

        let template =
            self.catalog
                .template_for(round, rng)
                .ok_or(GameError::NoAdmissibleAction {
                    round,
                    available: state.alive().len(),
                })?;
        let pressure = scheduled.pressure.unwrap_or_default();
        let resolution = resolve_round(state, round, template, pressure, rng)?;
        debug!(
            "{round} round resolved: {} actions, {} deaths",
            resolution.messages.len(),
            resolution.deaths
        );
        Ok(StepOutcome::Round(compose_round(
            state,
            &self.title,
            &self.owner_name,
            round,
            template,
            resolution.messages,
        )))
    }

    fn finish(&self, state: &mut SimulationState, winner: TributeId) -> StepOutcome {
        state.finish();
        let summary = compose_winner(state, winner, &self.title, &self.owner_name);
        info!(
            "{} won {} on day {}",
            summary.winner, self.title, summary.day
        );
        StepOutcome::Winner(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Arc<EventCatalog> {
        Arc::new(EventCatalog::load_from_static().unwrap())
    }

    fn game() -> Game {
        Game::new(1, "host", Some("Test Games"), catalog(), GameConfig::default()).seeded(42)
    }

    #[test]
    fn blank_title_uses_default() {
        let game = Game::new(1, "host", Some("   "), catalog(), GameConfig::default());
        assert_eq!(game.title(), "The Hunger Games");
        let game = Game::new(1, "host", None, catalog(), GameConfig::default());
        assert_eq!(game.title(), "The Hunger Games");
    }

    #[test]
    fn districts_fill_in_pairs() {
        let mut game = game();
        for name in ["a", "b", "c", "d", "e"] {
            game.add_tribute(name, None).unwrap();
        }
        let districts: Vec<u32> = game.state().roster().iter().map(|t| t.district).collect();
        assert_eq!(districts, vec![1, 1, 2, 2, 3]);

        game.remove_tribute("b").unwrap();
        let added = game.add_tribute("f", Some(Gender::Female)).unwrap();
        assert_eq!(added.district, 1);
        assert_eq!(added.gender, Gender::Female);
    }

    #[test]
    fn roster_limits_are_enforced() {
        let config = GameConfig {
            max_tributes: 2,
            max_name_len: 5,
            ..GameConfig::default()
        };
        let mut game = Game::new(1, "host", None, catalog(), config);
        assert_eq!(
            game.add_tribute("toolong", None).unwrap_err(),
            GameError::NameTooLong { max: 5 }
        );
        assert_eq!(game.add_tribute("  ", None).unwrap_err(), GameError::EmptyName);
        game.add_tribute("a", None).unwrap();
        assert_eq!(
            game.add_tribute("a", None).unwrap_err(),
            GameError::DuplicateName("a".to_string())
        );
        game.add_tribute("b", None).unwrap();
        assert_eq!(
            game.add_tribute("c", None).unwrap_err(),
            GameError::RosterFull { max: 2 }
        );
    }

    #[test]
    fn advance_requires_started_game() {
        let mut game = game();
        assert_eq!(
            game.advance().unwrap_err(),
            GameError::InvalidState(InvalidState::NotStarted)
        );
        game.add_tribute("only", None).unwrap();
        assert!(matches!(
            game.start(),
            Err(GameError::InvalidState(InvalidState::NotEnoughTributes { have: 1, need: 2 }))
        ));
    }

    #[test]
    fn two_tribute_game_runs_to_a_winner() {
        let mut game = game();
        game.add_tribute("Cato", Some(Gender::Male)).unwrap();
        game.add_tribute("Rue", Some(Gender::Female)).unwrap();
        game.start().unwrap();

        let first = game.advance().unwrap();
        let StepOutcome::Round(first) = first else {
            panic!("first step cannot be a winner");
        };
        assert_eq!(first.round, RoundType::Bloodbath);
        assert_eq!(first.title, "Test Games | The Bloodbath");

        let mut winner = None;
        for _ in 0..500 {
            if let StepOutcome::Winner(summary) = game.advance().unwrap() {
                winner = Some(summary);
                break;
            }
        }
        let winner = winner.expect("game should finish");
        assert!(["Cato", "Rue"].contains(&winner.winner.as_str()));
        assert_eq!(game.state().phase(), Phase::Finished);
        assert_eq!(game.state().dead().len(), 1);
        assert_eq!(
            game.advance().unwrap_err(),
            GameError::InvalidState(InvalidState::Finished)
        );
    }
}
