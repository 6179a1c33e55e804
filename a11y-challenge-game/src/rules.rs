//! Barrier/fix matching rules. Pure functions over catalogue data.
use rand::Rng;
use std::collections::BTreeSet;

use crate::catalogue::{CorrectFixTable, FixAction, Task};
use crate::numbers::percent_of;
use crate::simulation::SimulationKind;

/// True when `action` is the registered remedy for `sim`.
///
/// Never true while no simulation is active.
#[must_use]
pub fn is_correct_fix(table: &CorrectFixTable, sim: SimulationKind, action: &FixAction) -> bool {
    !sim.is_none() && table.correct_fix_for(sim) == Some(action.id.as_str())
}

/// Barriers that make `task` hard, in catalogue order.
#[must_use]
pub fn relevant_simulations(task: &Task) -> &[SimulationKind] {
    &task.affected_by
}

/// Pick the simulation a freshly drawn task should be played under.
///
/// Uniform over the task's barriers; `None` when the task has none.
pub fn recommend_simulation<R: Rng + ?Sized>(task: &Task, rng: &mut R) -> SimulationKind {
    let barriers = relevant_simulations(task);
    if barriers.is_empty() {
        return SimulationKind::None;
    }
    barriers[rng.gen_range(0..barriers.len())]
}

/// Rounded percentage of encountered barriers that were addressed.
///
/// Zero encountered barriers score 0; addressing more than were encountered
/// saturates at 100.
#[must_use]
pub fn accessibility_score(total_barriers: usize, barriers_addressed: usize) -> u8 {
    if total_barriers == 0 {
        return 0;
    }
    percent_of(barriers_addressed, total_barriers)
}

/// Whether some fix for `sim` has been applied.
#[must_use]
pub fn has_fix(applied: &BTreeSet<SimulationKind>, sim: SimulationKind) -> bool {
    applied.contains(&sim)
}
