//! Action selection and death resolution for a single round.
use log::{debug, warn};
use rand::Rng;
use rand::seq::IteratorRandom;
use smallvec::SmallVec;

use crate::constants::LETHAL_ROLL_MAX;
use crate::data::{Action, EventTemplate};
use crate::error::GameError;
use crate::scheduler::RoundType;
use crate::state::SimulationState;
use crate::tribute::{Tribute, TributeId};

type Sampled = SmallVec<[TributeId; 4]>;

/// Narration produced by one resolved round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundResolution {
    pub messages: Vec<String>,
    pub deaths: usize,
}

/// Consume every alive tribute through actions drawn from `template`.
///
/// Each action's effects are applied in full before the next draw. The state
/// may be partially updated when an error is returned; callers that need
/// all-or-nothing semantics run this on a copy.
///
/// # Errors
///
/// Returns [`GameError::NoAdmissibleAction`] when neither pool has an action
/// that fits the tributes still available, and template errors from binding.
pub fn resolve_round<R: Rng + ?Sized>(
    state: &mut SimulationState,
    round: RoundType,
    template: &EventTemplate,
    pressure: u32,
    rng: &mut R,
) -> Result<RoundResolution, GameError> {
    state.refill_available();
    let mut resolution = RoundResolution::default();

    while !state.available().is_empty() {
        let available = state.available().len();
        let alive = state.alive().len();
        let lethal_draw = rng.gen_range(0..=LETHAL_ROLL_MAX) < pressure && alive > 1;

        let action = select_action(template, lethal_draw, available, alive, round, rng)
            .ok_or(GameError::NoAdmissibleAction { round, available })?;
        let line = apply_action(state, action, rng)?;
        resolution.deaths += action.victim_count();
        resolution.messages.push(line);
    }

    state.record_round_deaths(resolution.deaths);
    Ok(resolution)
}

/// Uniform choice among the actions that fit the current round.
///
/// A lethal action is admissible only if it leaves at least one tribute alive.
fn select_action<'a, R: Rng + ?Sized>(
    template: &'a EventTemplate,
    lethal_draw: bool,
    available: usize,
    alive: usize,
    round: RoundType,
    rng: &mut R,
) -> Option<&'a Action> {
    let fits = |action: &&Action| (1..=available).contains(&action.tributes);

    if lethal_draw {
        let lethal = template
            .fatal
            .iter()
            .filter(fits)
            .filter(|action| action.victim_count() < alive)
            .choose(rng);
        if lethal.is_some() {
            return lethal;
        }
        warn!(
            "no admissible lethal {round} action for {available} available / {alive} alive; \
             drawing a non-lethal action instead"
        );
    }

    template.nonfatal.iter().filter(fits).choose(rng)
}

/// Sample the action's tributes, bind the narration and apply deaths.
fn apply_action<R: Rng + ?Sized>(
    state: &mut SimulationState,
    action: &Action,
    rng: &mut R,
) -> Result<String, GameError> {
    let mut sampled = Sampled::new();
    for _ in 0..action.tributes {
        let idx = rng.gen_range(0..state.available().len());
        sampled.push(state.take_available(idx));
    }

    let line = {
        let slots: SmallVec<[&Tribute; 4]> = sampled.iter().map(|id| state.tribute(*id)).collect();
        action.msg.bind(&slots)?
    };
    debug!("{line}");

    let victims = action.victim_count();
    for killer in action.killer.iter().filter_map(|slot| sampled.get(*slot)) {
        state.credit_kills(*killer, victims);
    }
    for victim in action.killed.iter().filter_map(|slot| sampled.get(*slot)) {
        if state.kill(*victim, &line) {
            debug!("{} has fallen", state.tribute(*victim).name);
        }
    }
    Ok(line)
}
