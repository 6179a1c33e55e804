use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::logic::simulation::{SessionRunner, SimulationPlan, SimulationSummary};
use crate::scenario::TestScenario;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
}

pub struct LogicTester {
    runner: SessionRunner,
    rounds: u32,
    verbose: bool,
}

impl LogicTester {
    pub const fn new(runner: SessionRunner, rounds: u32, verbose: bool) -> Self {
        Self {
            runner,
            rounds,
            verbose,
        }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.verbose {
                    println!(
                        "🧪 Testing scenario: {} (policy: {} seed: {})",
                        scenario.name.bright_white(),
                        scenario.plan.strategy,
                        seed
                    );
                }
                self.run_single_scenario(scenario, seed, iterations)
            })
            .collect()
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));
            let summary = self
                .runner
                .run_plan(&scenario.plan, iteration_seed, self.rounds);

            if let Some(err) = evaluate_expectations(&scenario.plan, &summary) {
                failures.push(format!(
                    "Iteration {} (policy {}, seed {}, rounds {}, score {}): {} | {}",
                    i + 1,
                    summary.strategy.label(),
                    summary.seed,
                    summary.final_state.round_count,
                    summary.final_state.score,
                    err,
                    summarize_rounds(&summary)
                ));
                if self.verbose {
                    println!(
                        "  ❌ Iteration {}/{} failed: {}",
                        i + 1,
                        iterations,
                        err.red()
                    );
                }
            } else {
                successes += 1;
                let duration = start_time.elapsed();
                performance_data.push(duration);
                if self.verbose {
                    println!(
                        "  ✅ Iteration {}/{} passed ({duration:?}) score:{} accessibility:{}%",
                        i + 1,
                        iterations,
                        summary.final_state.score,
                        summary.session_summary.accessibility_score
                    );
                }
            }
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
        }
    }
}

fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> Option<String> {
    plan.expectations
        .iter()
        .find_map(|expectation| expectation.evaluate(summary).err())
        .map(|err| format!("{err:#}"))
}

fn summarize_rounds(summary: &SimulationSummary) -> String {
    if summary.rounds.is_empty() {
        return "no rounds played".to_string();
    }
    summary
        .rounds
        .iter()
        .rev()
        .take(3)
        .map(|r| {
            let status = if r.completed { "done" } else { "skipped" };
            format!(
                "round {} ({}): {} under {}, {} fixes",
                r.round,
                r.task_id,
                status,
                r.played_under,
                r.fix_outcomes.len()
            )
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::get_scenario;
    use a11y_challenge_game::Catalogue;
    use std::sync::Arc;

    fn tester() -> LogicTester {
        let runner = SessionRunner::new(Arc::new(Catalogue::builtin().unwrap()), false);
        LogicTester::new(runner, 10, false)
    }

    #[test]
    fn runs_one_result_per_seed() {
        let scenario = get_scenario("diligent").unwrap();
        let results = tester().run_scenario(&scenario, &[1, 2, 3], 2);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.passed), "{results:?}");
        assert!(results.iter().all(|r| r.successful_iterations == 2));
    }

    #[test]
    fn failing_expectation_is_reported() {
        let mut scenario = get_scenario("skipper").unwrap();
        scenario.plan = scenario
            .plan
            .with_expectation(|_: &SimulationSummary| -> anyhow::Result<()> {
                anyhow::bail!("forced failure")
            });
        let results = tester().run_scenario(&scenario, &[7], 1);
        assert!(!results[0].passed);
        assert!(results[0].failures[0].contains("forced failure"));
    }

    #[test]
    fn result_serializes_duration_as_millis() {
        let result = ScenarioResult {
            scenario_name: "Diligent Player".to_string(),
            seed: 1,
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            average_duration: Duration::from_millis(12),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["average_duration"], 12);
    }
}
