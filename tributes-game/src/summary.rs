//! Round results handed to whatever renders the simulation.
use serde::{Deserialize, Serialize};

use crate::constants::{FALLEN_COLOR, WINNER_COLOR};
use crate::data::EventTemplate;
use crate::scheduler::RoundType;
use crate::state::SimulationState;
use crate::tribute::TributeId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub day: u32,
    pub round: RoundType,
    pub messages: Vec<String>,
    pub title: String,
    pub description: String,
    pub footer: String,
    pub color: u32,
}

/// Terminal result reported once a single tribute remains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerSummary {
    pub day: u32,
    pub winner: String,
    pub district: u32,
    pub kills: u32,
    pub title: String,
    pub description: String,
    pub footer: String,
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepOutcome {
    Round(RoundSummary),
    Winner(WinnerSummary),
}

impl StepOutcome {
    #[must_use]
    pub const fn is_winner(&self) -> bool {
        matches!(self, Self::Winner(_))
    }
}

/// `"Tributes Remaining: <alive>/<total> | Host: <owner>"`
#[must_use]
pub fn footer(state: &SimulationState, owner_name: &str) -> String {
    format!(
        "Tributes Remaining: {}/{} | Host: {owner_name}",
        state.alive().len(),
        state.total()
    )
}

#[must_use]
pub fn cannon_shots(count: usize) -> String {
    match count {
        0 => "No cannon shots are heard.".to_string(),
        1 => "1 cannon shot can be heard in the distance.".to_string(),
        n => format!("{n} cannon shots can be heard in the distance."),
    }
}

/// Package a resolved combat round.
#[must_use]
pub fn compose_round(
    state: &SimulationState,
    game_title: &str,
    owner_name: &str,
    round: RoundType,
    template: &EventTemplate,
    messages: Vec<String>,
) -> RoundSummary {
    RoundSummary {
        day: state.day(),
        round,
        messages,
        title: format!("{game_title} | {}", template.title.render(state.day())),
        description: template.description.clone(),
        footer: footer(state, owner_name),
        color: template.color,
    }
}

/// Tally the tributes killed since the last fallen round and clear that set.
pub fn compose_fallen(
    state: &mut SimulationState,
    game_title: &str,
    owner_name: &str,
) -> RoundSummary {
    let fallen = state.take_dead_today();
    let messages = fallen
        .iter()
        .map(|id| format!("☠️ {}", state.tribute(*id).display()))
        .collect();
    RoundSummary {
        day: state.day(),
        round: RoundType::Fallen,
        messages,
        title: format!("{game_title} | Fallen Tributes {}", state.day()),
        description: cannon_shots(fallen.len()),
        footer: footer(state, owner_name),
        color: FALLEN_COLOR,
    }
}

#[must_use]
pub fn compose_winner(
    state: &SimulationState,
    winner: TributeId,
    game_title: &str,
    owner_name: &str,
) -> WinnerSummary {
    let tribute = state.tribute(winner);
    WinnerSummary {
        day: state.day(),
        winner: tribute.name.clone(),
        district: tribute.district,
        kills: tribute.kills,
        title: format!("{game_title} | Winner"),
        description: format!(
            "The winner is {} from District {}!",
            tribute.name, tribute.district
        ),
        footer: footer(state, owner_name),
        color: WINNER_COLOR,
    }
}
