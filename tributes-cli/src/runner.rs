use anyhow::{Context, Result, bail};
use log::debug;
use serde::Serialize;
use tributes_game::{
    ChannelId, EventCatalog, GameConfig, Lobby, RosterData, RoundSummary, StatusSummary,
    StepOutcome, Tribute, UserId, WinnerSummary,
};

const HOST_ID: UserId = 1;
const HOST_NAME: &str = "tributes-cli";
const MAX_ROUNDS: usize = 100_000;

/// Everything needed to stage one batch of games.
#[derive(Debug, Clone, Default)]
pub struct RunPlan {
    pub games: usize,
    pub title: Option<String>,
    pub names: Vec<String>,
    pub group: Option<String>,
}

/// Full narration of one finished game.
#[derive(Debug, Clone, Serialize)]
pub struct GameRecord {
    pub index: usize,
    pub title: String,
    pub reaping: StatusSummary,
    pub rounds: Vec<RoundSummary>,
    pub winner: WinnerSummary,
    pub roster: Vec<Tribute>,
}

impl GameRecord {
    /// Tributes with at least one kill, most kills first.
    #[must_use]
    pub fn leaderboard(&self) -> Vec<&Tribute> {
        let mut killers: Vec<&Tribute> = self.roster.iter().filter(|t| t.kills > 0).collect();
        killers.sort_by(|a, b| b.kills.cmp(&a.kills).then_with(|| a.name.cmp(&b.name)));
        killers
    }
}

pub struct Runner {
    lobby: Lobby,
}

impl Runner {
    pub fn new(
        catalog: EventCatalog,
        rosters: RosterData,
        config: GameConfig,
        seed: Option<u64>,
    ) -> Self {
        let lobby = Lobby::new(catalog, rosters, config);
        let lobby = match seed {
            Some(seed) => lobby.seeded(seed),
            None => lobby,
        };
        Self { lobby }
    }

    pub fn run(&mut self, plan: &RunPlan) -> Result<Vec<GameRecord>> {
        (0..plan.games.max(1))
            .map(|index| {
                self.run_one(index, plan)
                    .with_context(|| format!("game {} failed", index + 1))
            })
            .collect()
    }

    fn run_one(&mut self, index: usize, plan: &RunPlan) -> Result<GameRecord> {
        let channel = ChannelId::try_from(index).unwrap_or(ChannelId::MAX);
        let lobby = &mut self.lobby;
        lobby.new_game(channel, HOST_ID, HOST_NAME, plan.title.as_deref())?;

        for name in &plan.names {
            let line = lobby
                .add_tribute(channel, name, None, false)
                .with_context(|| format!("could not add tribute {name:?}"))?;
            debug!("{line}");
        }
        let full = lobby.game(channel).is_some_and(tributes_game::Game::is_full);
        if let Some(group) = plan.group.as_deref()
            && !full
        {
            let line = lobby.pad_tributes(channel, Some(group))?;
            debug!("{line}");
        }

        let prefix = lobby.config().command_prefix.clone();
        let reaping = lobby.start_game(channel, HOST_ID, &prefix)?;
        let title = lobby
            .game(channel)
            .map(|game| game.title().to_string())
            .unwrap_or_default();

        let mut rounds = Vec::new();
        let mut roster = Vec::new();
        for _ in 0..MAX_ROUNDS {
            if let Some(game) = lobby.game(channel) {
                roster = game.state().roster().to_vec();
            }
            match lobby.step(channel, HOST_ID)? {
                StepOutcome::Round(summary) => rounds.push(summary),
                StepOutcome::Winner(winner) => {
                    return Ok(GameRecord {
                        index,
                        title,
                        reaping,
                        rounds,
                        winner,
                        roster,
                    });
                }
            }
        }
        bail!("no winner after {MAX_ROUNDS} rounds")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner(seed: u64) -> Runner {
        Runner::new(
            EventCatalog::load_from_static().unwrap(),
            RosterData::load_from_static().unwrap(),
            GameConfig::default(),
            Some(seed),
        )
    }

    #[test]
    fn runs_requested_number_of_games() {
        let plan = RunPlan {
            games: 3,
            group: Some("districts".to_string()),
            ..RunPlan::default()
        };
        let records = runner(1).run(&plan).unwrap();
        assert_eq!(records.len(), 3);
        for record in &records {
            assert_eq!(record.roster.len(), 24);
            assert_eq!(record.title, "The Hunger Games");
            assert!(record.rounds.len() > 1);
            assert!(record.roster.iter().any(|t| t.name == record.winner.winner));
        }
    }

    #[test]
    fn explicit_names_run_without_padding() {
        let plan = RunPlan {
            games: 1,
            title: Some("Duel".to_string()),
            names: vec!["Katniss".to_string(), "Cato".to_string()],
            ..RunPlan::default()
        };
        let records = runner(2).run(&plan).unwrap();
        let record = &records[0];
        assert_eq!(record.roster.len(), 2);
        assert_eq!(record.reaping.title, "Duel | The Reaping");
        assert!(record.leaderboard().len() <= 1);
    }

    #[test]
    fn too_few_tributes_is_an_error() {
        let plan = RunPlan {
            games: 1,
            names: vec!["Alone".to_string()],
            ..RunPlan::default()
        };
        let err = runner(3).run(&plan).unwrap_err();
        assert!(format!("{err:#}").contains("not enough players"));
    }
}
