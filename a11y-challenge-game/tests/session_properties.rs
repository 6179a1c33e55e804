use a11y_challenge_game::{
    Catalogue, FixOutcome, GameAction, GameEngine, SimulationKind, TaskPhase,
    TaskSessionController, is_correct_fix,
};
use rand::SeedableRng;
use rand::rngs::mock::StepRng;
use rand_chacha::ChaCha20Rng;
use std::collections::HashMap;
use std::sync::Arc;

fn catalogue() -> Arc<Catalogue> {
    Arc::new(Catalogue::builtin().expect("built-in catalogue is valid"))
}

fn fix_ids(catalogue: &Catalogue) -> Vec<String> {
    catalogue
        .list_fix_actions()
        .iter()
        .map(|action| action.id.clone())
        .collect()
}

#[test]
fn fix_application_is_idempotent() {
    let catalogue = catalogue();
    for id in fix_ids(&catalogue) {
        for &sim in SimulationKind::ALL {
            let mut engine = GameEngine::new(Arc::clone(&catalogue));
            engine.select_simulation(sim);
            engine.play_fix(&id);
            let once = engine.state().clone();
            assert_eq!(engine.play_fix(&id), FixOutcome::AlreadyApplied);
            let twice = engine.state();
            assert_eq!(twice.applied_fixes, once.applied_fixes);
            assert_eq!(twice.fix_correct, once.fix_correct);
            assert_eq!(twice.score, once.score);
        }
    }
}

#[test]
fn fix_lands_on_its_target_under_any_simulation() {
    let catalogue = catalogue();
    for action in catalogue.list_fix_actions() {
        for &sim in SimulationKind::ALL {
            let mut engine = GameEngine::new(Arc::clone(&catalogue));
            engine.select_simulation(sim);
            engine.play_fix(&action.id);
            let state = engine.state();
            assert!(state.applied_fixes.contains(&action.target));
            assert_eq!(
                state.fix_correct,
                is_correct_fix(catalogue.correct_fixes(), sim, action)
            );
        }
    }
}

#[test]
fn switching_simulation_clears_fixes() {
    let catalogue = catalogue();
    let mut engine = GameEngine::new(Arc::clone(&catalogue));
    for id in fix_ids(&catalogue) {
        engine.play_fix(&id);
    }
    assert_eq!(engine.state().applied_fixes.len(), catalogue.list_fix_actions().len());
    for &sim in SimulationKind::ALL {
        engine.play_fix("labels");
        engine.select_simulation(sim);
        assert!(engine.state().applied_fixes.is_empty());
        assert!(!engine.state().fix_correct);
    }
}

#[test]
fn score_only_moves_on_completion() {
    let catalogue = catalogue();
    let mut engine = GameEngine::new(catalogue);
    let mut rng = ChaCha20Rng::seed_from_u64(77);
    let actions = [
        GameAction::SelectSimulation(SimulationKind::ZoomedUI),
        GameAction::PlayFix("keyboard-nav".to_string()),
        GameAction::PlayFix("nonexistent".to_string()),
        GameAction::DrawNewTask,
        GameAction::IncrementRound,
        GameAction::CompleteTask,
        GameAction::SelectSimulation(SimulationKind::None),
        GameAction::CompleteTask,
    ];
    for action in actions {
        let before = engine.state().score;
        let completes = action == GameAction::CompleteTask;
        let after = engine.dispatch(action, &mut rng).score;
        assert_eq!(after, before + u32::from(completes));
    }
}

#[test]
fn reset_restores_initial_session() {
    let catalogue = catalogue();
    let fresh = GameEngine::new(Arc::clone(&catalogue)).state().clone();
    let mut ctl = TaskSessionController::new(catalogue, 123);
    ctl.start_task();
    ctl.play_fix("contrast");
    ctl.mark_complete();
    ctl.reset();
    ctl.skip_task();
    ctl.reset();
    assert_eq!(ctl.state(), &fresh);
    assert_eq!(ctl.engine().session_epoch(), 2);
    assert_eq!(ctl.phase(), TaskPhase::Briefing);
}

#[test]
fn scenario_correct_fix_for_color_blindness() {
    let mut engine = GameEngine::new(catalogue());
    engine.select_simulation(SimulationKind::ColorBlind);
    assert!(
        engine
            .state()
            .last_feedback
            .as_deref()
            .is_some_and(|text| text.contains("ColorBlind"))
    );
    assert_eq!(engine.play_fix("labels"), FixOutcome::Correct);
    let state = engine.state();
    assert_eq!(
        state.applied_fixes.iter().copied().collect::<Vec<_>>(),
        vec![SimulationKind::ColorBlind]
    );
    assert!(state.fix_correct);
    assert!(engine.correct_fix_applied());
}

#[test]
fn scenario_wrong_fix_is_still_applied() {
    let mut engine = GameEngine::new(catalogue());
    engine.select_simulation(SimulationKind::ColorBlind);
    assert_eq!(engine.play_fix("font-size"), FixOutcome::Mismatch);
    let state = engine.state();
    assert!(state.applied_fixes.contains(&SimulationKind::BlurredVision));
    assert!(!state.fix_correct);
    assert!(!engine.correct_fix_applied());
    let feedback = state.last_feedback.as_deref().unwrap_or_default();
    assert!(feedback.contains("BlurredVision"));
    assert!(feedback.contains("ColorBlind"));
}

#[test]
fn scenario_summary_checkpoint_at_round_five() {
    let mut ctl = TaskSessionController::new(catalogue(), 5);
    for _ in 0..4 {
        assert!(ctl.skip_task());
    }
    assert_eq!(ctl.state().round_count, 4);
    let draw = ctl.mark_complete().expect("completion schedules a draw");
    assert_eq!(ctl.state().round_count, 5);
    assert!(ctl.summary_due());
    assert!(ctl.fire_pending_draw(draw));
    assert!(ctl.skip_task());
    assert_eq!(ctl.state().round_count, 6);
    assert!(!ctl.summary_due());
}

#[test]
fn scenario_draws_are_uniform() {
    let catalogue = catalogue();
    let n = catalogue.list_tasks().len();
    let mut engine = GameEngine::new(Arc::clone(&catalogue));
    let mut rng = ChaCha20Rng::seed_from_u64(0x5EED);
    let draws: u32 = 1000;
    let mut counts: HashMap<String, usize> = HashMap::new();
    for _ in 0..draws {
        engine.draw_new_task(&mut rng);
        *counts.entry(engine.state().current_task.id.clone()).or_default() += 1;
    }
    assert_eq!(counts.len(), n);
    #[allow(clippy::cast_precision_loss)]
    let expected = 1.0 / n as f64;
    for (id, count) in counts {
        #[allow(clippy::cast_precision_loss)]
        let freq = count as f64 / f64::from(draws);
        assert!(
            (freq - expected).abs() <= 0.05,
            "{id} drawn with frequency {freq:.3}"
        );
    }
}

#[test]
fn draw_accepts_any_rng() {
    let catalogue = catalogue();
    let mut engine = GameEngine::new(catalogue);
    let mut rng = StepRng::new(0, 0);
    engine.draw_new_task(&mut rng);
    assert_eq!(engine.state().current_task.id, "color-buttons");
}

#[test]
fn stale_draw_after_reset_is_ignored() {
    let mut ctl = TaskSessionController::new(catalogue(), 42);
    ctl.start_task();
    let draw = ctl.mark_complete().expect("completion schedules a draw");
    ctl.reset();
    let after_reset = ctl.state().clone();
    assert!(!ctl.fire_pending_draw(draw));
    assert_eq!(ctl.state(), &after_reset);
    assert_eq!(ctl.state().current_task.id, "color-buttons");
}

#[test]
fn second_completion_supersedes_first_ticket() {
    let mut ctl = TaskSessionController::new(catalogue(), 64);
    let first = ctl.mark_complete().expect("first completion");
    assert!(ctl.fire_pending_draw(first));
    let second = ctl.mark_complete().expect("second completion");
    assert_ne!(first, second);
    assert!(!ctl.fire_pending_draw(first));
    assert!(ctl.fire_pending_draw(second));
}
