//! Centralized balance and tuning constants for the round simulation.
//!
//! These values define the probability model of the scheduler and the
//! fatality engine. The JSON catalog cannot override them.

// Scheduler ----------------------------------------------------------------
/// Divisor of the quadratic feast-chance curve.
pub(crate) const FEAST_CURVE_DIVISOR: f64 = 55.0;
/// Baseline added to the feast chance on every evaluation.
pub(crate) const FEAST_BASE_NUMERATOR: f64 = 9.0;
/// Exclusive upper bound of the feast percentage draw.
pub(crate) const FEAST_ROLL_MAX: u32 = 100;
/// Arena fires when a draw in `1..=ARENA_ODDS` lands on 1.
pub(crate) const ARENA_ODDS: u32 = 20;

// Fatality pressure --------------------------------------------------------
pub(crate) const PRESSURE_BASE_MIN: u32 = 2;
pub(crate) const PRESSURE_BASE_MAX: u32 = 4;
pub(crate) const PRESSURE_BONUS_BLOODBATH: u32 = 2;
pub(crate) const PRESSURE_BONUS_FEAST: u32 = 2;
pub(crate) const PRESSURE_BONUS_ARENA: u32 = 1;
/// Inclusive upper bound of the per-action lethal draw (`0..=LETHAL_ROLL_MAX`).
pub(crate) const LETHAL_ROLL_MAX: u32 = 10;

// Presentation -------------------------------------------------------------
pub(crate) const FALLEN_COLOR: u32 = 0x00aa_aaaa;
pub(crate) const WINNER_COLOR: u32 = 0x00f1_c40f;
pub(crate) const LOBBY_COLOR: u32 = 0x0034_98db;

// Roster defaults ----------------------------------------------------------
pub(crate) const DEFAULT_MAX_TRIBUTES: usize = 24;
pub(crate) const DEFAULT_MIN_TRIBUTES: usize = 2;
pub(crate) const DEFAULT_MAX_NAME_LEN: usize = 32;
pub(crate) const DEFAULT_TRIBUTES_PER_DISTRICT: usize = 2;
pub(crate) const DEFAULT_TITLE: &str = "The Hunger Games";
pub(crate) const DEFAULT_COMMAND_PREFIX: &str = "h$";
