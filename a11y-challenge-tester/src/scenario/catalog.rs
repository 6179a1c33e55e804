use anyhow::{Context, Result, ensure};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::logic::{
    GameplayStrategy, SeedInfo, SessionRunner, SimulationPlan, SimulationSummary,
    resolve_seed_inputs,
};
use crate::scenario::TestScenario;
use a11y_challenge_game::{
    GameEngine, SimulationKind, TaskPhase, TaskSessionController, WidgetContext,
    decode_seed_code, generate_seed_code, replay_code,
};

pub fn catalog_scenarios() -> Vec<TestScenario> {
    vec![
        TestScenario::simulation(
            "Catalogue Integrity",
            base_plan().with_expectation(catalogue_integrity_expectation),
        ),
        TestScenario::simulation(
            "Seed Code Replay",
            base_plan().with_expectation(seed_code_expectation),
        ),
        TestScenario::simulation(
            "Reset Totality",
            base_plan().with_expectation(reset_totality_expectation),
        ),
        TestScenario::simulation(
            "Deterministic Sessions",
            SimulationPlan::new(GameplayStrategy::Scattershot)
                .with_rounds(8)
                .with_expectation(deterministic_expectation),
        ),
    ]
}

pub fn find_catalog_scenario(name: &str) -> Option<TestScenario> {
    catalog_scenarios()
        .into_iter()
        .find(|scenario| scenario.name == name)
}

fn base_plan() -> SimulationPlan {
    SimulationPlan::new(GameplayStrategy::Skipper).with_rounds(1)
}

fn catalogue_integrity_expectation(summary: &SimulationSummary) -> Result<()> {
    let catalogue = &summary.catalogue;
    for &sim in SimulationKind::BARRIERS {
        let action = catalogue
            .correct_fix_action(sim)
            .with_context(|| format!("{sim} has no correct fix"))?;
        ensure!(
            action.target == sim,
            "correct fix '{}' for {sim} targets {}",
            action.id,
            action.target
        );
    }
    ensure!(
        catalogue.correct_fix_for(SimulationKind::None).is_none(),
        "no simulation must not have a fix"
    );

    for task in catalogue.list_tasks() {
        let mut widget = task.widget.build();
        let ctx = WidgetContext {
            task_id: task.id.clone(),
            active_simulation: SimulationKind::None,
            applied_fixes: BTreeSet::new(),
        };
        ensure!(
            widget
                .respond(&task.widget.reference_answer(), &ctx)
                .is_completed(),
            "task '{}' cannot be completed through its widget",
            task.id
        );
    }
    Ok(())
}

fn seed_code_expectation(summary: &SimulationSummary) -> Result<()> {
    let shown = SeedInfo::from_numeric(summary.seed).display_code();
    if let Some(code) = &shown {
        ensure!(
            decode_seed_code(code) == Some(summary.seed),
            "seed {} is shown as {code}, which decodes to another seed",
            summary.seed
        );
    }

    // Codes are typed by hand, so go through the same parsing as the CLI.
    let code = shown.unwrap_or_else(|| generate_seed_code(summary.seed));
    let typed = resolve_seed_inputs(&[code.to_lowercase()])?;
    let typed_seed = typed
        .first()
        .map(|info| info.seed)
        .with_context(|| format!("code {code} resolved to no seed"))?;
    ensure!(
        decode_seed_code(&code) == Some(typed_seed),
        "typing {code} selects seed {typed_seed}, not the decoded one"
    );
    ensure!(
        replay_code(typed_seed).as_deref() == Some(code.as_str()),
        "seed {typed_seed} does not display as {code}"
    );

    if typed_seed == summary.seed {
        let runner = SessionRunner::new(Arc::clone(&summary.catalogue), false);
        let rounds = u32::try_from(summary.rounds.len())?;
        let replayed = runner.run_plan(&SimulationPlan::new(summary.strategy), typed_seed, rounds);
        ensure!(
            replayed.final_state == summary.final_state,
            "code {code} does not replay the recorded session"
        );
    }
    Ok(())
}

fn reset_totality_expectation(summary: &SimulationSummary) -> Result<()> {
    let fresh = GameEngine::new(Arc::clone(&summary.catalogue)).state().clone();
    let mut ctl = TaskSessionController::new(Arc::clone(&summary.catalogue), summary.seed);
    ctl.start_task();
    ctl.play_fix("labels");
    let draw = ctl.mark_complete().context("completion did not schedule a draw")?;
    ctl.reset();

    ensure!(ctl.state() == &fresh, "reset left session state behind");
    ensure!(ctl.phase() == TaskPhase::Briefing, "reset did not re-brief");
    ensure!(
        !ctl.fire_pending_draw(draw),
        "a draw scheduled before reset still fired"
    );
    ensure!(ctl.state() == &fresh, "stale draw changed the session");
    Ok(())
}

fn deterministic_expectation(summary: &SimulationSummary) -> Result<()> {
    let runner = SessionRunner::new(Arc::clone(&summary.catalogue), false);
    let plan = SimulationPlan::new(summary.strategy);
    let rounds = u32::try_from(summary.rounds.len())?;
    let again = runner.run_plan(&plan, summary.seed, rounds);
    ensure!(
        again.final_state == summary.final_state,
        "seed {} produced a different session on replay",
        summary.seed
    );
    Ok(())
}
