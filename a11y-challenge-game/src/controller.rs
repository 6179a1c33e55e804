//! Task life cycle on top of [`GameEngine`]: recommend, start, complete,
//! delayed redraw, skip.
//!
//! The controller never touches the session directly; every change goes
//! through an engine transition.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::catalogue::Catalogue;
use crate::constants::{COMPLETION_DISPLAY_DELAY, msg_task_challenge};
use crate::engine::{FixOutcome, GameEngine};
use crate::rules;
use crate::simulation::SimulationKind;
use crate::state::GameSession;
use crate::summary::{SessionSummary, summary_due};
use crate::widgets::{TaskWidget, WidgetContext, WidgetInput, WidgetKind, WidgetStatus};

/// Where the current task is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPhase {
    /// Drawn and described; the recommendation is not active yet.
    Briefing,
    /// Started; the widget accepts input.
    Active,
    /// Completed; waiting for the delayed draw.
    Celebrating,
}

/// Ticket for the draw scheduled after a completion.
///
/// The host waits `delay` and hands the ticket back. Tickets from an older
/// session epoch or an earlier completion are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDraw {
    epoch: u64,
    sequence: u64,
    delay: Duration,
}

impl PendingDraw {
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

/// Result of handing an input to the active widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No task is active; the input was dropped.
    Ignored,
    /// The widget wants more input.
    Pending { message: Option<String> },
    /// The task was completed and a draw is scheduled.
    Completed { message: String, draw: PendingDraw },
}

/// Drives one task at a time through the engine.
#[derive(Debug)]
pub struct TaskSessionController<R = ChaCha20Rng> {
    engine: GameEngine,
    rng: R,
    recommended: SimulationKind,
    phase: TaskPhase,
    widget: Option<Box<dyn TaskWidget>>,
    pending_draw: Option<PendingDraw>,
    sequence: u64,
}

impl TaskSessionController<ChaCha20Rng> {
    /// Controller with a deterministic generator seeded from `seed`.
    #[must_use]
    pub fn new(catalogue: Arc<Catalogue>, seed: u64) -> Self {
        Self::with_rng(catalogue, ChaCha20Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> TaskSessionController<R> {
    #[must_use]
    pub fn with_rng(catalogue: Arc<Catalogue>, rng: R) -> Self {
        let mut controller = Self {
            engine: GameEngine::new(catalogue),
            rng,
            recommended: SimulationKind::None,
            phase: TaskPhase::Briefing,
            widget: None,
            pending_draw: None,
            sequence: 0,
        };
        controller.brief_current_task();
        controller
    }

    #[must_use]
    pub const fn state(&self) -> &GameSession {
        self.engine.state()
    }

    #[must_use]
    pub const fn engine(&self) -> &GameEngine {
        &self.engine
    }

    #[must_use]
    pub const fn phase(&self) -> TaskPhase {
        self.phase
    }

    /// Simulation suggested for the current task.
    #[must_use]
    pub const fn recommended(&self) -> SimulationKind {
        self.recommended
    }

    #[must_use]
    pub const fn pending_draw(&self) -> Option<PendingDraw> {
        self.pending_draw
    }

    #[must_use]
    pub fn widget_kind(&self) -> Option<WidgetKind> {
        self.widget.as_ref().map(|widget| widget.kind())
    }

    /// Challenge text announcing the recommended barrier, if there is one.
    #[must_use]
    pub fn recommendation_notice(&self) -> Option<String> {
        (!self.recommended.is_none()).then(|| msg_task_challenge(self.recommended.label()))
    }

    /// "Fix applied" notice from the running widget.
    #[must_use]
    pub fn fix_notice(&self) -> Option<&'static str> {
        let widget = self.widget.as_ref()?;
        widget.fix_notice(&WidgetContext::from_session(self.state()))
    }

    /// Whether the active simulation currently hampers the running widget.
    #[must_use]
    pub fn barrier_blocking(&self) -> bool {
        self.widget
            .as_ref()
            .is_some_and(|widget| widget.barrier_blocking(&WidgetContext::from_session(self.state())))
    }

    /// Start the briefed task: activate the recommendation and open its widget.
    ///
    /// Returns false outside the briefing phase.
    pub fn start_task(&mut self) -> bool {
        if self.phase != TaskPhase::Briefing {
            log::debug!("start ignored in {:?} phase", self.phase);
            return false;
        }
        self.engine.select_simulation(self.recommended);
        let kind = self.state().current_task.widget;
        self.widget = Some(kind.build());
        self.phase = TaskPhase::Active;
        log::debug!(
            "task '{}' started with {kind:?} under {}",
            self.state().current_task.id,
            self.state().active_simulation
        );
        true
    }

    pub fn select_simulation(&mut self, sim: SimulationKind) {
        self.engine.select_simulation(sim);
    }

    pub fn play_fix(&mut self, action_id: &str) -> FixOutcome {
        self.engine.play_fix(action_id)
    }

    /// Hand one input to the running widget.
    pub fn submit(&mut self, input: &WidgetInput) -> SubmitOutcome {
        let ctx = WidgetContext::from_session(self.state());
        let Some(widget) = self.widget.as_mut() else {
            log::debug!("input ignored: no active widget");
            return SubmitOutcome::Ignored;
        };
        match widget.respond(input, &ctx) {
            WidgetStatus::Pending { message } => SubmitOutcome::Pending { message },
            WidgetStatus::Completed { message } => {
                let draw = self.finish_task();
                SubmitOutcome::Completed { message, draw }
            }
        }
    }

    /// Complete the current task without going through its widget.
    ///
    /// Returns `None` when a completion is already waiting for its draw.
    pub fn mark_complete(&mut self) -> Option<PendingDraw> {
        if self.phase == TaskPhase::Celebrating {
            log::debug!("mark complete ignored while celebrating");
            return None;
        }
        Some(self.finish_task())
    }

    /// Perform the draw scheduled by `ticket`.
    ///
    /// Returns false, changing nothing, when the ticket is stale.
    pub fn fire_pending_draw(&mut self, ticket: PendingDraw) -> bool {
        if self.pending_draw != Some(ticket) {
            log::warn!(
                "ignoring stale pending draw (epoch {}, sequence {})",
                ticket.epoch,
                ticket.sequence
            );
            return false;
        }
        self.pending_draw = None;
        self.engine.draw_new_task(&mut self.rng);
        self.brief_current_task();
        true
    }

    /// Abandon the current task: new draw and a new round, no score.
    ///
    /// Ignored while a completion is waiting for its draw.
    pub fn skip_task(&mut self) -> bool {
        if self.pending_draw.is_some() {
            log::debug!("skip ignored while a draw is pending");
            return false;
        }
        log::debug!("task '{}' skipped", self.state().current_task.id);
        self.engine.draw_new_task(&mut self.rng);
        self.engine.increment_round();
        self.brief_current_task();
        true
    }

    /// Reset the session. Any pending draw becomes stale.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.pending_draw = None;
        self.brief_current_task();
    }

    #[must_use]
    pub fn summary_due(&self) -> bool {
        summary_due(self.state().round_count)
    }

    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_session(self.state(), self.engine.catalogue())
    }

    fn finish_task(&mut self) -> PendingDraw {
        self.engine.complete_task();
        self.engine.increment_round();
        self.engine.select_simulation(SimulationKind::None);
        self.widget = None;
        self.phase = TaskPhase::Celebrating;
        self.sequence = self.sequence.wrapping_add(1);
        let draw = PendingDraw {
            epoch: self.engine.session_epoch(),
            sequence: self.sequence,
            delay: COMPLETION_DISPLAY_DELAY,
        };
        self.pending_draw = Some(draw);
        draw
    }

    fn brief_current_task(&mut self) {
        self.recommended =
            rules::recommend_simulation(&self.engine.state().current_task, &mut self.rng);
        self.widget = None;
        self.phase = TaskPhase::Briefing;
        log::debug!(
            "briefing '{}', recommended {}",
            self.engine.state().current_task.id,
            self.recommended
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{BUILTIN_CATALOGUE, CatalogueData};

    fn controller(seed: u64) -> TaskSessionController {
        TaskSessionController::new(Arc::new(Catalogue::builtin().unwrap()), seed)
    }

    #[test]
    fn recommendation_is_deferred_until_start() {
        let mut ctl = controller(3);
        let recommended = ctl.recommended();
        assert!(ctl.state().current_task.is_affected_by(recommended));
        assert_eq!(ctl.state().active_simulation, SimulationKind::None);
        assert!(ctl.recommendation_notice().is_some());

        assert!(ctl.start_task());
        assert_eq!(ctl.phase(), TaskPhase::Active);
        assert_eq!(ctl.state().active_simulation, recommended);
        assert_eq!(ctl.widget_kind(), Some(ctl.state().current_task.widget));
        assert!(!ctl.start_task());
    }

    #[test]
    fn barrier_free_task_starts_without_simulation_after_skip() {
        let mut data: CatalogueData = serde_json::from_str(BUILTIN_CATALOGUE).unwrap();
        data.tasks.truncate(2);
        data.tasks[1].affected_by.clear();
        data.tasks[1].widget = WidgetKind::Confirm;
        let barrier_free = data.tasks[1].id.clone();
        let catalogue = Arc::new(Catalogue::from_data(data).unwrap());
        let mut ctl = TaskSessionController::new(catalogue, 5);

        let mut started_barrier_free = false;
        for _ in 0..64 {
            if ctl.state().current_task.id == barrier_free {
                assert!(ctl.start_task());
                assert_eq!(ctl.state().active_simulation, SimulationKind::None);
                started_barrier_free = true;
                break;
            }
            assert!(ctl.start_task());
            assert_ne!(ctl.state().active_simulation, SimulationKind::None);
            assert!(ctl.skip_task());
        }
        assert!(started_barrier_free);
    }

    #[test]
    fn completion_scores_and_schedules_draw() {
        let mut ctl = controller(8);
        ctl.start_task();
        let answer = ctl.state().current_task.widget.reference_answer();
        let SubmitOutcome::Completed { draw, .. } = ctl.submit(&answer) else {
            panic!("reference answer should complete the task");
        };
        let state = ctl.state();
        assert_eq!((state.score, state.round_count), (1, 1));
        assert_eq!(state.active_simulation, SimulationKind::None);
        assert_eq!(ctl.phase(), TaskPhase::Celebrating);
        assert_eq!(draw.delay(), COMPLETION_DISPLAY_DELAY);
        assert_eq!(ctl.pending_draw(), Some(draw));

        assert!(ctl.fire_pending_draw(draw));
        assert_eq!(ctl.phase(), TaskPhase::Briefing);
        assert!(ctl.pending_draw().is_none());
        assert!(!ctl.fire_pending_draw(draw));
    }

    #[test]
    fn wrong_input_keeps_task_open() {
        let mut ctl = controller(1);
        ctl.start_task();
        let outcome = ctl.submit(&WidgetInput::choose("definitely-wrong"));
        assert!(matches!(outcome, SubmitOutcome::Pending { .. }));
        assert_eq!(ctl.state().score, 0);
        assert_eq!(ctl.phase(), TaskPhase::Active);
    }

    #[test]
    fn input_before_start_is_ignored() {
        let mut ctl = controller(1);
        let answer = ctl.state().current_task.widget.reference_answer();
        assert_eq!(ctl.submit(&answer), SubmitOutcome::Ignored);
    }

    #[test]
    fn skip_is_ignored_while_draw_pending() {
        let mut ctl = controller(21);
        let draw = ctl.mark_complete().unwrap();
        assert!(ctl.mark_complete().is_none());
        assert!(!ctl.skip_task());
        assert_eq!(ctl.state().round_count, 1);

        ctl.fire_pending_draw(draw);
        assert!(ctl.skip_task());
        let state = ctl.state();
        assert_eq!((state.score, state.round_count), (1, 2));
    }

    #[test]
    fn reset_makes_pending_draw_stale() {
        let mut ctl = controller(4);
        let draw = ctl.mark_complete().unwrap();
        ctl.reset();
        assert_eq!(ctl.engine().session_epoch(), 1);
        assert!(!ctl.fire_pending_draw(draw));
        assert_eq!(ctl.state().score, 0);
        assert_eq!(ctl.phase(), TaskPhase::Briefing);
    }

    #[test]
    fn fix_notice_follows_widget_rules() {
        let catalogue = Arc::new(Catalogue::builtin().unwrap());
        let mut ctl = TaskSessionController::new(catalogue, 2);
        assert_eq!(ctl.state().current_task.id, "color-buttons");
        ctl.start_task();
        ctl.select_simulation(SimulationKind::ColorBlind);
        assert!(ctl.barrier_blocking());
        assert!(ctl.fix_notice().is_none());
        assert_eq!(ctl.play_fix("labels"), FixOutcome::Correct);
        assert!(!ctl.barrier_blocking());
        assert!(ctl.fix_notice().is_some());
    }

    #[test]
    fn summary_due_at_fifth_round() {
        let mut ctl = controller(9);
        for _ in 0..4 {
            assert!(ctl.skip_task());
        }
        assert!(!ctl.summary_due());
        let draw = ctl.mark_complete().unwrap();
        assert!(ctl.summary_due());
        assert_eq!(ctl.summary().score, 1);
        ctl.fire_pending_draw(draw);
        ctl.skip_task();
        assert!(!ctl.summary_due());
    }
}
