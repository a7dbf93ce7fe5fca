//! Round-type selection.
//!
//! Precedence is evaluated in one place, [`schedule_round`]:
//! bloodbath, feast, arena, day, fallen, night. The first rule that matches
//! wins.
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    ARENA_ODDS, FEAST_BASE_NUMERATOR, FEAST_CURVE_DIVISOR, FEAST_ROLL_MAX, PRESSURE_BASE_MAX,
    PRESSURE_BASE_MIN, PRESSURE_BONUS_ARENA, PRESSURE_BONUS_BLOODBATH, PRESSURE_BONUS_FEAST,
};
use crate::state::SimulationState;
use crate::tribute::TributeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundType {
    Bloodbath,
    Feast,
    Arena,
    Day,
    Fallen,
    Night,
}

impl RoundType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bloodbath => "bloodbath",
            Self::Feast => "feast",
            Self::Arena => "arena",
            Self::Day => "day",
            Self::Fallen => "fallen",
            Self::Night => "night",
        }
    }

    /// Extra fatality pressure for this round type. Fallen rounds resolve
    /// nothing and carry no pressure at all.
    #[must_use]
    pub const fn pressure_bonus(self) -> Option<u32> {
        match self {
            Self::Bloodbath => Some(PRESSURE_BONUS_BLOODBATH),
            Self::Feast => Some(PRESSURE_BONUS_FEAST),
            Self::Arena => Some(PRESSURE_BONUS_ARENA),
            Self::Day | Self::Night => Some(0),
            Self::Fallen => None,
        }
    }
}

impl fmt::Display for RoundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feast probability in percent: `100 * (d² / 55) + 9 / 55`.
#[must_use]
pub fn feast_chance(days_since_last_event: u32) -> f64 {
    let days = f64::from(days_since_last_event);
    100.0 * (days * days / FEAST_CURVE_DIVISOR) + FEAST_BASE_NUMERATOR / FEAST_CURVE_DIVISOR
}

/// Combine a base draw with the non-lethal streak and the round bonus.
#[must_use]
pub fn fatality_pressure(base: u32, rounds_without_deaths: u32, round: RoundType) -> Option<u32> {
    round
        .pressure_bonus()
        .map(|bonus| base.saturating_add(rounds_without_deaths).saturating_add(bonus))
}

/// A round chosen by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledRound {
    pub round: RoundType,
    /// `None` for fallen rounds.
    pub pressure: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Exactly one tribute is left standing.
    Winner(TributeId),
    Round(ScheduledRound),
}

/// Pick the next round type and update the day counter and day flags.
///
/// Callers must only invoke this on a started simulation.
pub fn schedule_round<R: Rng + ?Sized>(state: &mut SimulationState, rng: &mut R) -> Schedule {
    if let [winner] = state.alive() {
        return Schedule::Winner(*winner);
    }

    if state.flags().night {
        state.begin_next_day();
    }

    let base = rng.gen_range(PRESSURE_BASE_MIN..=PRESSURE_BASE_MAX);
    let flags = state.flags();
    let days_since = state.days_since_last_event();

    let round = if state.day() == 1 && !flags.bloodbath {
        state.flags_mut().bloodbath = true;
        RoundType::Bloodbath
    } else if !flags.day && f64::from(rng.gen_range(0..FEAST_ROLL_MAX)) < feast_chance(days_since)
    {
        state.reset_days_since_last_event();
        RoundType::Feast
    } else if days_since > 0 && rng.gen_range(1..=ARENA_ODDS) == 1 {
        state.reset_days_since_last_event();
        RoundType::Arena
    } else if !flags.day {
        state.flags_mut().day = true;
        RoundType::Day
    } else if !flags.fallen {
        state.flags_mut().fallen = true;
        RoundType::Fallen
    } else {
        state.flags_mut().night = true;
        RoundType::Night
    };

    let pressure = fatality_pressure(base, state.rounds_without_deaths(), round);
    debug!(
        "day {} scheduled {round} round (pressure {pressure:?})",
        state.day()
    );
    Schedule::Round(ScheduledRound { round, pressure })
}
