use std::sync::Arc;

use tributes_game::{
    EventCatalog, Game, GameConfig, GameError, Gender, RoundType, StepOutcome, WinnerSummary,
    cannon_shots,
};

fn bundled_catalog() -> Arc<EventCatalog> {
    Arc::new(EventCatalog::load_from_static().unwrap())
}

fn started_game(catalog: Arc<EventCatalog>, seed: u64, tributes: usize) -> Game {
    let mut game = Game::new(7, "host", Some("Sim"), catalog, GameConfig::default()).seeded(seed);
    for i in 0..tributes {
        game.add_tribute(&format!("tribute-{i}"), None).unwrap();
    }
    game.start().unwrap();
    game
}

struct Trace {
    rounds: Vec<(u32, RoundType)>,
    winner: WinnerSummary,
}

fn run_to_completion(game: &mut Game) -> Trace {
    let total = game.state().total();
    let mut rounds = Vec::new();
    let mut deaths_since_fallen = 0;

    for _ in 0..10_000 {
        let dead_before = game.state().dead().len();
        let outcome = game.advance().unwrap();
        let state = game.state();

        assert!(state.is_consistent());
        assert_eq!(state.alive().len() + state.dead().len(), total);
        assert!(!state.alive().is_empty());

        match outcome {
            StepOutcome::Winner(winner) => return Trace { rounds, winner },
            StepOutcome::Round(summary) => {
                let died = state.dead().len() - dead_before;
                if summary.round == RoundType::Fallen {
                    assert_eq!(died, 0);
                    assert_eq!(summary.messages.len(), deaths_since_fallen);
                    assert_eq!(summary.description, cannon_shots(deaths_since_fallen));
                    assert!(state.dead_today().is_empty());
                    deaths_since_fallen = 0;
                } else {
                    assert!(!summary.messages.is_empty());
                    deaths_since_fallen += died;
                }
                assert!(summary.footer.starts_with(&format!(
                    "Tributes Remaining: {}/{total}",
                    state.alive().len()
                )));
                rounds.push((summary.day, summary.round));
            }
        }
    }
    panic!("simulation did not finish");
}

#[test]
fn simulations_end_with_a_single_winner() {
    let catalog = bundled_catalog();
    for seed in 0..40 {
        for tributes in [2, 3, 8, 24] {
            let mut game = started_game(Arc::clone(&catalog), seed, tributes);
            let trace = run_to_completion(&mut game);

            let state = game.state();
            assert_eq!(state.alive().len(), 1);
            assert_eq!(state.dead().len(), tributes - 1);
            let survivor = state.tribute(state.alive()[0]);
            assert_eq!(trace.winner.winner, survivor.name);
            assert_eq!(trace.winner.district, survivor.district);
            for id in state.dead() {
                assert!(state.tribute(*id).cause_of_death.is_some());
            }
        }
    }
}

#[test]
fn bloodbath_opens_and_day_phases_stay_ordered() {
    let catalog = bundled_catalog();
    for seed in 100..140 {
        let mut game = started_game(Arc::clone(&catalog), seed, 12);
        let trace = run_to_completion(&mut game);

        assert_eq!(trace.rounds[0], (1, RoundType::Bloodbath));
        let bloodbaths = trace
            .rounds
            .iter()
            .filter(|(_, round)| *round == RoundType::Bloodbath)
            .count();
        assert_eq!(bloodbaths, 1);

        let last_day = trace.rounds.last().map_or(1, |(day, _)| *day);
        for day in 1..=last_day {
            let phases: Vec<RoundType> = trace
                .rounds
                .iter()
                .filter(|(d, round)| {
                    *d == day
                        && matches!(round, RoundType::Day | RoundType::Fallen | RoundType::Night)
                })
                .map(|(_, round)| *round)
                .collect();
            let expected = [RoundType::Day, RoundType::Fallen, RoundType::Night];
            assert!(phases.len() <= 3, "day {day}: {phases:?}");
            assert_eq!(phases.as_slice(), &expected[..phases.len()], "day {day}");
            if day < last_day {
                assert_eq!(phases.len(), 3, "day {day} did not complete");
            }
        }
    }
}

#[test]
fn seeded_games_replay_identically() {
    let catalog = bundled_catalog();
    let mut first = started_game(Arc::clone(&catalog), 2024, 10);
    let mut second = started_game(Arc::clone(&catalog), 2024, 10);
    for _ in 0..200 {
        let a = first.advance();
        let b = second.advance();
        assert_eq!(a, b);
        if matches!(a, Ok(StepOutcome::Winner(_)) | Err(_)) {
            break;
        }
    }
    assert_eq!(first.state(), second.state());
}

#[test]
fn failed_round_leaves_state_untouched() {
    let pool = r#"{
        "title": "Round {day}",
        "description": "pairs only",
        "color": 1,
        "nonfatal": [{ "tributes": 2, "msg": "{0} and {1} talk." }],
        "fatal": []
    }"#;
    let json = format!(
        r#"{{ "bloodbath": {pool}, "day": {pool}, "night": {pool}, "feast": {pool}, "arena": [{pool}] }}"#
    );
    let catalog = Arc::new(EventCatalog::from_json(&json).unwrap());
    let mut game = started_game(catalog, 3, 3);
    let before = game.state().clone();

    let err = game.advance().unwrap_err();
    assert_eq!(
        err,
        GameError::NoAdmissibleAction {
            round: RoundType::Bloodbath,
            available: 1
        }
    );
    assert_eq!(game.state(), &before);
    assert_eq!(game.advance().unwrap_err(), err);
}

#[test]
fn explicit_genders_survive_to_the_summary() {
    let mut game = Game::new(1, "host", None, bundled_catalog(), GameConfig::default()).seeded(5);
    game.add_tribute("Katniss", Some(Gender::Female)).unwrap();
    game.add_tribute("Peeta", Some(Gender::Male)).unwrap();
    game.start().unwrap();
    let trace = run_to_completion(&mut game);
    assert!(["Katniss", "Peeta"].contains(&trace.winner.winner.as_str()));
    assert_eq!(trace.winner.title, "The Hunger Games | Winner");
}
