//! Centralized tuning constants and player-facing message text.

use std::time::Duration;

// Session pacing -------------------------------------------------------------
/// Pause between a completed task and the next draw, so the completion can be shown.
pub const COMPLETION_DISPLAY_DELAY: Duration = Duration::from_millis(1_500);
/// A session summary is offered every this many rounds.
pub const SUMMARY_INTERVAL: u32 = 5;

// Summary takeaway thresholds --------------------------------------------------
pub(crate) const TAKEAWAY_GREAT_MIN: u8 = 75;
pub(crate) const TAKEAWAY_ON_TRACK_MIN: u8 = 50;

// Feedback text --------------------------------------------------------------
pub(crate) const MSG_NO_SIMULATION: &str = "No accessibility simulation active.";
pub(crate) const MSG_NEW_TASK: &str = "New task selected. Apply accessibility fixes if needed.";
pub(crate) const MSG_FIX_ALREADY_APPLIED: &str =
    "This fix has already been applied to your interface.";

pub(crate) fn msg_simulation_changed(name: &str, label: &str) -> String {
    format!(
        "Simulation changed to {name} ({label}). Select the appropriate fix card to solve this accessibility barrier."
    )
}

pub(crate) fn msg_fix_correct(title: &str, sim_name: &str) -> String {
    format!(
        "Great! The {title} fix correctly addresses the {sim_name} simulation. The interface is now more accessible!"
    )
}

pub(crate) fn msg_fix_mismatch(target_name: &str, active_name: Option<&str>) -> String {
    match active_name {
        Some(active) => format!(
            "This fix helps with {target_name} barriers, but doesn't address the current {active} simulation."
        ),
        None => format!(
            "This fix helps with {target_name} barriers, but no simulation is active for the current task."
        ),
    }
}

pub(crate) fn msg_task_challenge(label: &str) -> String {
    format!(
        "This task is challenging for users with {label}. Find the right fix to make it accessible!"
    )
}
