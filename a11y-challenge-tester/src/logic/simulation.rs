use std::sync::Arc;
use std::time::Duration;

use a11y_challenge_game::{
    Catalogue, FixOutcome, GameSession, SessionSummary, SimulationKind, SubmitOutcome,
    TaskPhase, TaskSessionController,
};
use anyhow::Result;
use colored::Colorize;

use crate::logic::policy::{GameplayStrategy, PlayerMove, PlayerPolicy, RoundView};

/// Rounds played when a plan does not set its own count.
pub const DEFAULT_ROUNDS: u32 = 10;

/// What happened during one scripted round.
#[derive(Debug, Clone)]
pub struct RoundRecord {
    pub round: u32,
    pub task_id: String,
    pub recommended: SimulationKind,
    pub played_under: SimulationKind,
    pub fix_outcomes: Vec<FixOutcome>,
    pub rejected_inputs: usize,
    pub fix_notice: Option<String>,
    pub completed: bool,
    pub skipped: bool,
    pub display_delay: Option<Duration>,
}

type SimulationExpectationFn = Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync>;

/// Check run against the summary of every iteration.
#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Strategy, length and expectations for a scripted session.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub strategy: GameplayStrategy,
    pub rounds: Option<u32>,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub fn new(strategy: GameplayStrategy) -> Self {
        Self {
            strategy,
            rounds: None,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = Some(rounds);
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Outcome of a scripted session.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub rounds: Vec<RoundRecord>,
    pub summary_checkpoints: Vec<u32>,
    pub final_state: GameSession,
    pub session_summary: SessionSummary,
    pub catalogue: Arc<Catalogue>,
}

impl SimulationSummary {
    #[must_use]
    pub fn completed_rounds(&self) -> usize {
        self.rounds.iter().filter(|r| r.completed).count()
    }

    #[must_use]
    pub fn correct_fixes(&self) -> usize {
        self.rounds
            .iter()
            .flat_map(|r| r.fix_outcomes.iter())
            .filter(|outcome| **outcome == FixOutcome::Correct)
            .count()
    }
}

/// Headless host: drives the controller the way the UI would, firing
/// pending draws immediately instead of waiting out their delay.
#[derive(Debug, Clone)]
pub struct SessionRunner {
    catalogue: Arc<Catalogue>,
    verbose: bool,
}

impl SessionRunner {
    #[must_use]
    pub fn new(catalogue: Arc<Catalogue>, verbose: bool) -> Self {
        Self { catalogue, verbose }
    }

    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64, default_rounds: u32) -> SimulationSummary {
        let rounds = plan.rounds.unwrap_or(default_rounds);
        let mut ctl = TaskSessionController::new(Arc::clone(&self.catalogue), seed);
        let mut policy = plan.strategy.create_policy(seed);
        if self.verbose {
            println!(
                "🎮 Starting session | seed:{seed} policy:{} rounds:{rounds}",
                plan.strategy.label()
            );
        }

        let mut records = Vec::with_capacity(rounds as usize);
        let mut summary_checkpoints = Vec::new();
        for round in 1..=rounds {
            let record = self.play_round(&mut ctl, policy.as_mut(), round);
            if ctl.summary_due() {
                summary_checkpoints.push(ctl.state().round_count);
            }
            records.push(record);
        }

        SimulationSummary {
            seed,
            strategy: plan.strategy,
            rounds: records,
            summary_checkpoints,
            final_state: ctl.state().clone(),
            session_summary: ctl.summary(),
            catalogue: Arc::clone(&self.catalogue),
        }
    }

    fn play_round(
        &self,
        ctl: &mut TaskSessionController,
        policy: &mut dyn PlayerPolicy,
        round: u32,
    ) -> RoundRecord {
        let view = RoundView {
            state: ctl.state(),
            catalogue: &self.catalogue,
            recommended: ctl.recommended(),
        };
        let moves = policy.plan_round(&view);
        let mut record = RoundRecord {
            round,
            task_id: ctl.state().current_task.id.clone(),
            recommended: ctl.recommended(),
            played_under: SimulationKind::None,
            fix_outcomes: Vec::new(),
            rejected_inputs: 0,
            fix_notice: None,
            completed: false,
            skipped: false,
            display_delay: None,
        };

        let mut pending = None;
        for player_move in moves {
            if ctl.phase() == TaskPhase::Active {
                record.played_under = ctl.state().active_simulation;
            }
            match player_move {
                PlayerMove::Start => {
                    ctl.start_task();
                }
                PlayerMove::SelectSimulation(sim) => ctl.select_simulation(sim),
                PlayerMove::PlayFix(id) => {
                    record.fix_outcomes.push(ctl.play_fix(&id));
                    if let Some(notice) = ctl.fix_notice() {
                        record.fix_notice = Some(notice.to_string());
                    }
                }
                PlayerMove::Submit(input) => match ctl.submit(&input) {
                    SubmitOutcome::Completed { draw, .. } => pending = Some(draw),
                    SubmitOutcome::Pending { .. } => record.rejected_inputs += 1,
                    SubmitOutcome::Ignored => {}
                },
                PlayerMove::MarkComplete => pending = ctl.mark_complete(),
                PlayerMove::Skip => record.skipped = ctl.skip_task(),
            }
            if pending.is_some() {
                break;
            }
        }

        if let Some(draw) = pending {
            record.completed = true;
            record.display_delay = Some(draw.delay());
            ctl.fire_pending_draw(draw);
        } else if !record.skipped {
            log::warn!(
                "{} left task '{}' unfinished in round {round}; skipping",
                policy.name(),
                record.task_id
            );
            record.skipped = ctl.skip_task();
        }

        if self.verbose {
            let status = if record.completed {
                "completed".green()
            } else {
                "skipped".yellow()
            };
            println!(
                "  round {round}: {} under {} {} -> {status} ({} fixes)",
                record.task_id,
                record.played_under.icon(),
                record.played_under,
                record.fix_outcomes.len()
            );
            if let Some(notice) = &record.fix_notice {
                println!("    ✨ {notice}");
            }
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> SessionRunner {
        SessionRunner::new(Arc::new(Catalogue::builtin().unwrap()), false)
    }

    #[test]
    fn diligent_completes_every_round_with_correct_fixes() {
        let summary = runner().run_plan(&SimulationPlan::new(GameplayStrategy::Diligent), 1337, 6);
        assert_eq!(summary.completed_rounds(), 6);
        assert_eq!(summary.final_state.score, 6);
        assert_eq!(summary.correct_fixes(), 6);
        assert!(summary.rounds.iter().all(|r| r.played_under == r.recommended));
        assert_eq!(summary.summary_checkpoints, vec![5]);
    }

    #[test]
    fn skipper_never_scores() {
        let plan = SimulationPlan::new(GameplayStrategy::Skipper).with_rounds(10);
        let summary = runner().run_plan(&plan, 3, DEFAULT_ROUNDS);
        assert_eq!(summary.final_state.score, 0);
        assert_eq!(summary.final_state.round_count, 10);
        assert_eq!(summary.summary_checkpoints, vec![5, 10]);
    }

    #[test]
    fn same_seed_same_session() {
        let plan = SimulationPlan::new(GameplayStrategy::Scattershot);
        let a = runner().run_plan(&plan, 99, 8);
        let b = runner().run_plan(&plan, 99, 8);
        assert_eq!(a.final_state, b.final_state);
    }
}
