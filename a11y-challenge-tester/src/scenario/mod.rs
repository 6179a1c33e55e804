pub mod catalog;

use anyhow::{Result, ensure};

use crate::logic::{GameplayStrategy, SimulationPlan, SimulationSummary};
use a11y_challenge_game::constants::COMPLETION_DISPLAY_DELAY;
use a11y_challenge_game::{SimulationKind, summary_due};
use catalog::find_catalog_scenario;

/// Named plan run by the logic tester.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

/// Bookkeeping every session must satisfy whatever the policy.
fn session_invariants(summary: &SimulationSummary) -> Result<()> {
    let state = &summary.final_state;
    let rounds = u32::try_from(summary.rounds.len())?;
    ensure!(
        state.round_count == rounds,
        "round count {} after {rounds} rounds",
        state.round_count
    );
    ensure!(
        state.score as usize == state.completed_tasks.len(),
        "score {} but {} completed tasks",
        state.score,
        state.completed_tasks.len()
    );
    ensure!(
        summary.completed_rounds() == state.completed_tasks.len(),
        "{} rounds completed but {} tasks logged",
        summary.completed_rounds(),
        state.completed_tasks.len()
    );
    ensure!(
        summary
            .summary_checkpoints
            .iter()
            .all(|round| summary_due(*round)),
        "summary offered off-schedule: {:?}",
        summary.summary_checkpoints
    );
    ensure!(
        summary.session_summary.accessibility_score <= 100,
        "accessibility score out of range"
    );
    if !summary.strategy.completes_tasks() {
        ensure!(state.score == 0, "{} should never score", summary.strategy);
    }
    for record in summary.rounds.iter().filter(|r| r.completed) {
        ensure!(
            record.display_delay == Some(COMPLETION_DISPLAY_DELAY),
            "round {} scheduled its draw after {:?}",
            record.round,
            record.display_delay
        );
    }
    Ok(())
}

fn diligent_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.rounds.iter().all(|r| r.completed),
        "diligent player left a task unfinished"
    );
    ensure!(
        summary.correct_fixes() == summary.rounds.len(),
        "expected one correct fix per round, got {}",
        summary.correct_fixes()
    );
    for record in &summary.rounds {
        ensure!(
            record.played_under == record.recommended,
            "round {} played under {} instead of {}",
            record.round,
            record.played_under,
            record.recommended
        );
    }
    Ok(())
}

fn scattershot_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.rounds.iter().all(|r| r.completed && r.rejected_inputs >= 1),
        "scattershot rounds should fumble once and then complete"
    );
    Ok(())
}

fn skipper_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.final_state.score == 0, "skipping must never score");
    ensure!(
        summary.rounds.iter().all(|r| r.skipped && !r.completed),
        "every round should be a skip"
    );
    Ok(())
}

fn hasty_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.completed_rounds() == summary.rounds.len(),
        "mark complete should finish every task"
    );
    ensure!(
        summary
            .rounds
            .iter()
            .all(|r| r.fix_outcomes.is_empty() && r.played_under == SimulationKind::None),
        "hasty player should never start a simulation or play a fix"
    );
    ensure!(
        summary.final_state.active_simulation.is_none(),
        "completion should clear the active simulation"
    );
    Ok(())
}

fn checkpoint_expectation(summary: &SimulationSummary) -> Result<()> {
    let expected: Vec<u32> = (1..=u32::try_from(summary.rounds.len())?)
        .filter(|round| round % 5 == 0)
        .collect();
    ensure!(
        summary.summary_checkpoints == expected,
        "summary checkpoints {:?}, expected {expected:?}",
        summary.summary_checkpoints
    );
    Ok(())
}

fn policy_scenario(
    name: &'static str,
    strategy: GameplayStrategy,
    expectation: fn(&SimulationSummary) -> Result<()>,
) -> TestScenario {
    TestScenario::simulation(
        name,
        SimulationPlan::new(strategy)
            .with_expectation(session_invariants)
            .with_expectation(expectation),
    )
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    match name.to_lowercase().as_str() {
        "diligent" => Some(policy_scenario(
            "Diligent Player",
            GameplayStrategy::Diligent,
            diligent_expectation,
        )),
        "scattershot" => Some(policy_scenario(
            "Scattershot Player",
            GameplayStrategy::Scattershot,
            scattershot_expectation,
        )),
        "skipper" => Some(policy_scenario(
            "Skipper Player",
            GameplayStrategy::Skipper,
            skipper_expectation,
        )),
        "hasty" => Some(policy_scenario(
            "Hasty Player",
            GameplayStrategy::Hasty,
            hasty_expectation,
        )),
        "summary-checkpoints" | "summary" => Some(TestScenario::simulation(
            "Summary Checkpoints",
            SimulationPlan::new(GameplayStrategy::Diligent)
                .with_rounds(12)
                .with_expectation(session_invariants)
                .with_expectation(checkpoint_expectation),
        )),
        "catalogue-integrity" | "catalogue" => find_catalog_scenario("Catalogue Integrity"),
        "seed-codes" | "seed" => find_catalog_scenario("Seed Code Replay"),
        "reset-totality" | "reset" => find_catalog_scenario("Reset Totality"),
        "deterministic" => find_catalog_scenario("Deterministic Sessions"),
        _ => None,
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("diligent", "Diligent Player"),
        ("scattershot", "Scattershot Player"),
        ("skipper", "Skipper Player"),
        ("hasty", "Hasty Player"),
        ("summary-checkpoints", "Summary Checkpoints"),
        ("catalogue-integrity", "Catalogue Integrity"),
        ("seed-codes", "Seed Code Replay"),
        ("reset-totality", "Reset Totality"),
        ("deterministic", "Deterministic Sessions"),
    ]
}
