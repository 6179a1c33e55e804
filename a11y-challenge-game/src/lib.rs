//! A11y Challenge Game Engine
//!
//! Platform-agnostic core of the accessibility barrier simulator: the
//! task/fix catalogue, matching rules, the session state machine and the task
//! life cycle. Rendering, visual simulation effects and input devices live in
//! the host.

pub mod catalogue;
pub mod constants;
pub mod controller;
pub mod engine;
pub mod numbers;
pub mod rules;
pub mod seed;
pub mod simulation;
pub mod state;
pub mod summary;
pub mod widgets;

pub use catalogue::{
    BUILTIN_CATALOGUE, Catalogue, CatalogueData, CatalogueError, CorrectFixTable, Difficulty,
    FixAction, Task,
};
pub use controller::{PendingDraw, SubmitOutcome, TaskPhase, TaskSessionController};
pub use engine::{FixOutcome, GameAction, GameEngine};
pub use rules::{accessibility_score, has_fix, is_correct_fix, recommend_simulation};
pub use seed::{decode_seed_code, encode_seed_code, generate_seed_code, replay_code};
pub use simulation::SimulationKind;
pub use state::GameSession;
pub use summary::{SessionSummary, Takeaway, summary_due};
pub use widgets::{TaskWidget, WidgetContext, WidgetInput, WidgetKind, WidgetStatus};

/// Source of catalogue data.
/// Hosts that ship their own task set implement this.
pub trait CatalogueSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load and validate a catalogue.
    ///
    /// # Errors
    ///
    /// Returns an error if the data cannot be read or fails validation.
    fn load_catalogue(&self) -> Result<Catalogue, Self::Error>;
}

/// The catalogue compiled into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedCatalogue;

impl CatalogueSource for EmbeddedCatalogue {
    type Error = CatalogueError;

    fn load_catalogue(&self) -> Result<Catalogue, Self::Error> {
        Catalogue::builtin()
    }
}
