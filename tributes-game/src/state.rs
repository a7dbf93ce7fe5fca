use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GameError, InvalidState};
use crate::tribute::{Tribute, TributeId};

/// Lifecycle of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Pending,
    Started,
    Finished,
}

impl Phase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Started => "started",
            Self::Finished => "finished",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round types that already fired on the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DayFlags {
    pub bloodbath: bool,
    pub day: bool,
    pub fallen: bool,
    pub night: bool,
}

/// Authoritative record of one simulation.
///
/// The roster owns every [`Tribute`]; the alive, dead, dead-today and
/// available sets hold roster indices only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationState {
    roster: Vec<Tribute>,
    alive: Vec<TributeId>,
    dead: Vec<TributeId>,
    dead_today: Vec<TributeId>,
    #[serde(skip)]
    available: Vec<TributeId>,
    day: u32,
    days_since_last_event: u32,
    rounds_without_deaths: u32,
    flags: DayFlags,
    phase: Phase,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            roster: Vec::new(),
            alive: Vec::new(),
            dead: Vec::new(),
            dead_today: Vec::new(),
            available: Vec::new(),
            day: 1,
            days_since_last_event: 0,
            rounds_without_deaths: 0,
            flags: DayFlags::default(),
            phase: Phase::Pending,
        }
    }
}

impl SimulationState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Roster -------------------------------------------------------------

    /// Append a tribute to the roster. Only allowed before start.
    ///
    /// # Errors
    ///
    /// Fails once started, or when the name is blank or already taken.
    pub fn add_tribute(&mut self, tribute: Tribute) -> Result<TributeId, GameError> {
        self.require_pending()?;
        if tribute.name.trim().is_empty() {
            return Err(GameError::EmptyName);
        }
        if self.name_exists(&tribute.name) {
            return Err(GameError::DuplicateName(tribute.name));
        }
        let id = TributeId(self.roster.len());
        self.roster.push(tribute);
        Ok(id)
    }

    /// Remove a tribute by name. Only allowed before start.
    ///
    /// # Errors
    ///
    /// Fails once started, or when no tribute has that name.
    pub fn remove_tribute(&mut self, name: &str) -> Result<Tribute, GameError> {
        self.require_pending()?;
        let idx = self
            .roster
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| GameError::UnknownTribute(name.to_string()))?;
        Ok(self.roster.remove(idx))
    }

    #[must_use]
    pub fn name_exists(&self, name: &str) -> bool {
        self.roster.iter().any(|t| t.name == name)
    }

    /// Snapshot the roster into the alive set.
    ///
    /// # Errors
    ///
    /// Fails if already started or fewer than `min_tributes` are registered.
    pub fn start(&mut self, min_tributes: usize) -> Result<(), GameError> {
        self.require_pending()?;
        let need = min_tributes.max(2);
        if self.roster.len() < need {
            return Err(InvalidState::NotEnoughTributes {
                have: self.roster.len(),
                need,
            }
            .into());
        }
        self.alive = (0..self.roster.len()).map(TributeId).collect();
        self.phase = Phase::Started;
        Ok(())
    }

    pub(crate) fn finish(&mut self) {
        self.phase = Phase::Finished;
        self.available.clear();
    }

    pub(crate) fn require_pending(&self) -> Result<(), InvalidState> {
        match self.phase {
            Phase::Pending => Ok(()),
            Phase::Started => Err(InvalidState::AlreadyStarted),
            Phase::Finished => Err(InvalidState::Finished),
        }
    }

    // Accessors ----------------------------------------------------------

    #[must_use]
    pub fn roster(&self) -> &[Tribute] {
        &self.roster
    }

    /// # Panics
    ///
    /// Panics if `id` did not come from this roster.
    #[must_use]
    pub fn tribute(&self, id: TributeId) -> &Tribute {
        &self.roster[id.index()]
    }

    #[must_use]
    pub fn alive(&self) -> &[TributeId] {
        &self.alive
    }

    #[must_use]
    pub fn dead(&self) -> &[TributeId] {
        &self.dead
    }

    #[must_use]
    pub fn dead_today(&self) -> &[TributeId] {
        &self.dead_today
    }

    #[must_use]
    pub fn available(&self) -> &[TributeId] {
        &self.available
    }

    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }

    #[must_use]
    pub const fn days_since_last_event(&self) -> u32 {
        self.days_since_last_event
    }

    #[must_use]
    pub const fn rounds_without_deaths(&self) -> u32 {
        self.rounds_without_deaths
    }

    #[must_use]
    pub const fn flags(&self) -> DayFlags {
        self.flags
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.roster.len()
    }

    /// Alive and dead partition the roster once started.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        if self.phase == Phase::Pending {
            return self.alive.is_empty() && self.dead.is_empty();
        }
        if self.alive.len() + self.dead.len() != self.roster.len() {
            return false;
        }
        let partitioned = self.alive.iter().all(|id| self.roster[id.index()].alive)
            && self.dead.iter().all(|id| {
                let tribute = &self.roster[id.index()];
                !tribute.alive && tribute.cause_of_death.is_some()
            });
        partitioned && self.dead_today.iter().all(|id| self.dead.contains(id))
    }

    // Round bookkeeping --------------------------------------------------

    /// Close the previous day: bump the counters and clear every day flag.
    pub(crate) fn begin_next_day(&mut self) {
        self.day = self.day.saturating_add(1);
        self.days_since_last_event = self.days_since_last_event.saturating_add(1);
        self.flags = DayFlags::default();
    }

    pub(crate) fn flags_mut(&mut self) -> &mut DayFlags {
        &mut self.flags
    }

    pub(crate) fn reset_days_since_last_event(&mut self) {
        self.days_since_last_event = 0;
    }

    pub(crate) fn record_round_deaths(&mut self, deaths: usize) {
        if deaths == 0 {
            self.rounds_without_deaths = self.rounds_without_deaths.saturating_add(1);
        } else {
            self.rounds_without_deaths = 0;
        }
    }

    pub(crate) fn refill_available(&mut self) {
        self.available.clear();
        self.available.extend_from_slice(&self.alive);
    }

    /// Remove and return the available tribute at `idx`.
    pub(crate) fn take_available(&mut self, idx: usize) -> TributeId {
        self.available.swap_remove(idx)
    }

    pub(crate) fn credit_kills(&mut self, killer: TributeId, victims: usize) {
        let victims = u32::try_from(victims).unwrap_or(u32::MAX);
        let tribute = &mut self.roster[killer.index()];
        tribute.kills = tribute.kills.saturating_add(victims);
    }

    /// Move a tribute from alive to dead. Returns `false` if it was already dead.
    pub(crate) fn kill(&mut self, victim: TributeId, cause: &str) -> bool {
        if !self.roster[victim.index()].kill(cause) {
            return false;
        }
        self.alive.retain(|id| *id != victim);
        self.available.retain(|id| *id != victim);
        self.dead.push(victim);
        self.dead_today.push(victim);
        true
    }

    /// Drain the tributes killed since the last fallen round.
    pub(crate) fn take_dead_today(&mut self) -> Vec<TributeId> {
        std::mem::take(&mut self.dead_today)
    }
}
