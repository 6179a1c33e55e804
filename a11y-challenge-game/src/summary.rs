//! Periodic session summary shown every few rounds.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalogue::{Catalogue, Difficulty};
use crate::constants::{SUMMARY_INTERVAL, TAKEAWAY_GREAT_MIN, TAKEAWAY_ON_TRACK_MIN};
use crate::rules;
use crate::state::GameSession;

/// Whether a summary should be offered at `round_count`.
#[must_use]
pub const fn summary_due(round_count: u32) -> bool {
    round_count > 0 && round_count.is_multiple_of(SUMMARY_INTERVAL)
}

/// Closing message tier for the summary screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Takeaway {
    Great,
    OnTrack,
    NeedsWork,
}

impl Takeaway {
    #[must_use]
    pub const fn from_score(accessibility_score: u8) -> Self {
        if accessibility_score >= TAKEAWAY_GREAT_MIN {
            Self::Great
        } else if accessibility_score >= TAKEAWAY_ON_TRACK_MIN {
            Self::OnTrack
        } else {
            Self::NeedsWork
        }
    }

    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Great => {
                "Great job! You're becoming an accessibility champion. Keep applying these principles in real projects."
            }
            Self::OnTrack => {
                "You're on the right track. Practice matching each barrier with the fix that removes it."
            }
            Self::NeedsWork => {
                "Accessibility takes practice. Try activating a simulation and finding the fix that addresses it."
            }
        }
    }
}

/// Snapshot of progress so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub score: u32,
    pub round_count: u32,
    pub completed_by_difficulty: BTreeMap<Difficulty, usize>,
    pub total_barriers: usize,
    pub barriers_addressed: usize,
    pub accessibility_score: u8,
    pub applied_fix_titles: Vec<String>,
    pub takeaway: Takeaway,
}

impl SessionSummary {
    /// Build a summary of `session`.
    ///
    /// Barriers are counted over every completed task; addressed barriers are
    /// the fixes currently applied.
    #[must_use]
    pub fn from_session(session: &GameSession, catalogue: &Catalogue) -> Self {
        let mut completed_by_difficulty: BTreeMap<Difficulty, usize> =
            Difficulty::ALL.iter().map(|d| (*d, 0)).collect();
        for task in &session.completed_tasks {
            *completed_by_difficulty.entry(task.difficulty).or_default() += 1;
        }

        let total_barriers = session
            .completed_tasks
            .iter()
            .map(|task| task.affected_by.len())
            .sum();
        let barriers_addressed = session.applied_fixes.len();
        let accessibility_score = rules::accessibility_score(total_barriers, barriers_addressed);

        let applied_fix_titles = catalogue
            .list_fix_actions()
            .iter()
            .filter(|action| session.has_fix(action.target))
            .map(|action| action.title.clone())
            .collect();

        Self {
            score: session.score,
            round_count: session.round_count,
            completed_by_difficulty,
            total_barriers,
            barriers_addressed,
            accessibility_score,
            applied_fix_titles,
            takeaway: Takeaway::from_score(accessibility_score),
        }
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed_by_difficulty.values().sum()
    }
}
