use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::catalogue::{Catalogue, Task};
use crate::rules;
use crate::simulation::SimulationKind;

/// The single mutable game state for the current run.
///
/// Fields are readable by anyone holding a reference; only
/// [`GameEngine`](crate::engine::GameEngine) replaces them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub active_simulation: SimulationKind,
    /// Barriers for which some fix has been played this task, keyed by the
    /// barrier the fix targets.
    pub applied_fixes: BTreeSet<SimulationKind>,
    /// Whether the most recently played fix matched the active simulation.
    pub fix_correct: bool,
    pub current_task: Task,
    pub score: u32,
    pub round_count: u32,
    pub completed_tasks: Vec<Task>,
    pub last_feedback: Option<String>,
}

impl GameSession {
    /// Initial session: first catalogue task, nothing active, counters zero.
    #[must_use]
    pub fn new(catalogue: &Catalogue) -> Self {
        Self {
            active_simulation: SimulationKind::None,
            applied_fixes: BTreeSet::new(),
            fix_correct: false,
            current_task: catalogue.first_task().clone(),
            score: 0,
            round_count: 0,
            completed_tasks: Vec::new(),
            last_feedback: None,
        }
    }

    #[must_use]
    pub fn has_fix(&self, sim: SimulationKind) -> bool {
        rules::has_fix(&self.applied_fixes, sim)
    }

    /// True when a simulation is active and its correct fix has been applied.
    #[must_use]
    pub fn correct_fix_applied(&self, catalogue: &Catalogue) -> bool {
        if self.active_simulation.is_none() {
            return false;
        }
        catalogue
            .correct_fix_action(self.active_simulation)
            .is_some_and(|action| self.has_fix(action.target))
    }

    /// Barriers of the current task that no applied fix covers yet.
    #[must_use]
    pub fn unresolved_barriers(&self) -> Vec<SimulationKind> {
        self.current_task
            .affected_by
            .iter()
            .copied()
            .filter(|sim| !self.has_fix(*sim))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_has_initial_values() {
        let catalogue = Catalogue::builtin().unwrap();
        let session = GameSession::new(&catalogue);
        assert_eq!(session.active_simulation, SimulationKind::None);
        assert!(session.applied_fixes.is_empty());
        assert!(!session.fix_correct);
        assert_eq!(session.current_task.id, catalogue.first_task().id);
        assert_eq!(session.score, 0);
        assert_eq!(session.round_count, 0);
        assert!(session.completed_tasks.is_empty());
        assert!(session.last_feedback.is_none());
    }

    #[test]
    fn correct_fix_applied_requires_active_simulation() {
        let catalogue = Catalogue::builtin().unwrap();
        let mut session = GameSession::new(&catalogue);
        session.applied_fixes.insert(SimulationKind::ColorBlind);
        assert!(!session.correct_fix_applied(&catalogue));

        session.active_simulation = SimulationKind::ColorBlind;
        assert!(session.correct_fix_applied(&catalogue));

        session.active_simulation = SimulationKind::ScreenReader;
        assert!(!session.correct_fix_applied(&catalogue));
    }

    #[test]
    fn unresolved_barriers_track_applied_fixes() {
        let catalogue = Catalogue::builtin().unwrap();
        let mut session = GameSession::new(&catalogue);
        session.current_task = catalogue.task("small-text").unwrap().clone();
        assert_eq!(
            session.unresolved_barriers(),
            vec![SimulationKind::BlurredVision, SimulationKind::ZoomedUI]
        );
        session.applied_fixes.insert(SimulationKind::ZoomedUI);
        assert_eq!(
            session.unresolved_barriers(),
            vec![SimulationKind::BlurredVision]
        );
    }

    #[test]
    fn session_snapshot_serializes() {
        let catalogue = Catalogue::builtin().unwrap();
        let mut session = GameSession::new(&catalogue);
        session.applied_fixes.insert(SimulationKind::ZoomedUI);
        session.last_feedback = Some("hello".to_string());
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["active_simulation"], "none");
        assert_eq!(json["applied_fixes"][0], "zoomed-ui");
        assert_eq!(json["current_task"]["widget"], "color-buttons");
    }
}
