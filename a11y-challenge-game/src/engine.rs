//! Game state machine over [`GameSession`].
//!
//! Every transition builds the next snapshot from the current one and
//! installs it with a single assignment, so readers never see a half-applied
//! update.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::catalogue::Catalogue;
use crate::constants::{
    MSG_FIX_ALREADY_APPLIED, MSG_NEW_TASK, MSG_NO_SIMULATION, msg_fix_correct, msg_fix_mismatch,
    msg_simulation_changed,
};
use crate::rules;
use crate::simulation::SimulationKind;
use crate::state::GameSession;

/// One of the six session transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum GameAction {
    SelectSimulation(SimulationKind),
    PlayFix(String),
    DrawNewTask,
    CompleteTask,
    IncrementRound,
    Reset,
}

/// Result of playing a fix action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixOutcome {
    /// The id is not in the catalogue; nothing changed.
    Unknown,
    /// The target barrier already had a fix; only the feedback changed.
    AlreadyApplied,
    /// Applied, and it remedies the active simulation.
    Correct,
    /// Applied, but it targets a different barrier than the active one.
    Mismatch,
}

/// Owner of the session and its transitions.
#[derive(Debug, Clone)]
pub struct GameEngine {
    catalogue: Arc<Catalogue>,
    session: GameSession,
    epoch: u64,
}

impl GameEngine {
    #[must_use]
    pub fn new(catalogue: Arc<Catalogue>) -> Self {
        let session = GameSession::new(&catalogue);
        Self {
            catalogue,
            session,
            epoch: 0,
        }
    }

    /// Read-only snapshot of the current session.
    #[must_use]
    pub const fn state(&self) -> &GameSession {
        &self.session
    }

    #[must_use]
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Incremented by every reset; lets deferred work detect a stale session.
    #[must_use]
    pub const fn session_epoch(&self) -> u64 {
        self.epoch
    }

    #[must_use]
    pub fn has_fix(&self, sim: SimulationKind) -> bool {
        self.session.has_fix(sim)
    }

    #[must_use]
    pub fn correct_fix_applied(&self) -> bool {
        self.session.correct_fix_applied(&self.catalogue)
    }

    /// Apply `action` and return the resulting snapshot.
    pub fn dispatch<R: Rng + ?Sized>(&mut self, action: GameAction, rng: &mut R) -> &GameSession {
        match action {
            GameAction::SelectSimulation(sim) => self.select_simulation(sim),
            GameAction::PlayFix(id) => {
                self.play_fix(&id);
            }
            GameAction::DrawNewTask => self.draw_new_task(rng),
            GameAction::CompleteTask => self.complete_task(),
            GameAction::IncrementRound => self.increment_round(),
            GameAction::Reset => self.reset(),
        }
        &self.session
    }

    /// Activate `sim`. Fixes are scoped to one simulation, so switching clears them.
    pub fn select_simulation(&mut self, sim: SimulationKind) {
        let feedback = if sim.is_none() {
            MSG_NO_SIMULATION.to_string()
        } else {
            msg_simulation_changed(sim.name(), sim.label())
        };
        let next = GameSession {
            active_simulation: sim,
            applied_fixes: Default::default(),
            fix_correct: false,
            last_feedback: Some(feedback),
            ..self.session.clone()
        };
        log::debug!("select simulation: {} -> {sim}", self.session.active_simulation);
        self.session = next;
    }

    /// Play the fix action `action_id`.
    ///
    /// A fix is applied to its own target barrier whether or not it matches
    /// the active simulation. Replaying a fix for an already-fixed barrier
    /// only refreshes the feedback.
    pub fn play_fix(&mut self, action_id: &str) -> FixOutcome {
        let Some(action) = self.catalogue.fix_action(action_id) else {
            log::warn!("ignoring unknown fix action '{action_id}'");
            return FixOutcome::Unknown;
        };

        if self.session.has_fix(action.target) {
            let next = GameSession {
                last_feedback: Some(MSG_FIX_ALREADY_APPLIED.to_string()),
                ..self.session.clone()
            };
            log::debug!("fix '{action_id}' already applied for {}", action.target);
            self.session = next;
            return FixOutcome::AlreadyApplied;
        }

        let active = self.session.active_simulation;
        let correct = rules::is_correct_fix(self.catalogue.correct_fixes(), active, action);
        let feedback = if correct {
            msg_fix_correct(&action.title, active.name())
        } else {
            msg_fix_mismatch(action.target.name(), (!active.is_none()).then(|| active.name()))
        };
        let mut next = self.session.clone();
        next.applied_fixes.insert(action.target);
        next.fix_correct = correct;
        next.last_feedback = Some(feedback);
        log::debug!(
            "fix '{action_id}' applied for {} under {active} (correct: {correct})",
            action.target
        );
        self.session = next;

        if correct {
            FixOutcome::Correct
        } else {
            FixOutcome::Mismatch
        }
    }

    /// Replace the current task with a uniform draw over the whole catalogue.
    ///
    /// Draws are independent, so the current task may come up again. The
    /// active simulation is left alone.
    pub fn draw_new_task<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let tasks = self.catalogue.list_tasks();
        let task = tasks[rng.gen_range(0..tasks.len())].clone();
        log::debug!("draw task: {} -> {}", self.session.current_task.id, task.id);
        let next = GameSession {
            current_task: task,
            applied_fixes: Default::default(),
            fix_correct: false,
            last_feedback: Some(MSG_NEW_TASK.to_string()),
            ..self.session.clone()
        };
        self.session = next;
    }

    /// Score the current task and log it as completed. Does not draw.
    pub fn complete_task(&mut self) {
        let mut next = self.session.clone();
        next.score = next.score.saturating_add(1);
        next.completed_tasks.push(next.current_task.clone());
        log::debug!(
            "task '{}' completed, score {}",
            next.current_task.id,
            next.score
        );
        self.session = next;
    }

    pub fn increment_round(&mut self) {
        let next = GameSession {
            round_count: self.session.round_count.saturating_add(1),
            ..self.session.clone()
        };
        log::debug!("round {}", next.round_count);
        self.session = next;
    }

    /// Return every field to its initial value and start a new epoch.
    pub fn reset(&mut self) {
        self.session = GameSession::new(&self.catalogue);
        self.epoch = self.epoch.wrapping_add(1);
        log::info!("session reset (epoch {})", self.epoch);
    }
}
