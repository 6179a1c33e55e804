use std::fmt;

use a11y_challenge_game::{Catalogue, GameSession, SimulationKind, WidgetInput};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// One thing a scripted player does during a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerMove {
    Start,
    SelectSimulation(SimulationKind),
    PlayFix(String),
    Submit(WidgetInput),
    MarkComplete,
    Skip,
}

/// What a policy sees when planning a round.
#[derive(Debug, Clone, Copy)]
pub struct RoundView<'a> {
    pub state: &'a GameSession,
    pub catalogue: &'a Catalogue,
    pub recommended: SimulationKind,
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Moves for the briefed task, in order.
    fn plan_round(&mut self, view: &RoundView<'_>) -> Vec<PlayerMove>;
}

/// Built-in player strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameplayStrategy {
    /// Starts every task, plays the right fix, solves the widget.
    Diligent,
    /// Plays random fixes and fumbles the widget before solving it.
    Scattershot,
    /// Skips every task.
    Skipper,
    /// Marks every task complete without fixing anything.
    Hasty,
}

impl GameplayStrategy {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            GameplayStrategy::Diligent => "Diligent",
            GameplayStrategy::Scattershot => "Scattershot",
            GameplayStrategy::Skipper => "Skipper",
            GameplayStrategy::Hasty => "Hasty",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            GameplayStrategy::Diligent => Box::new(DiligentPolicy),
            GameplayStrategy::Scattershot => Box::new(ScattershotPolicy::new(seed)),
            GameplayStrategy::Skipper => Box::new(SkipperPolicy),
            GameplayStrategy::Hasty => Box::new(HastyPolicy),
        }
    }

    /// Whether rounds played with this strategy end in a completion.
    #[must_use]
    pub const fn completes_tasks(self) -> bool {
        !matches!(self, Self::Skipper)
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct DiligentPolicy;
struct SkipperPolicy;
struct HastyPolicy;

struct ScattershotPolicy {
    rng: ChaCha20Rng,
    max_fixes: usize,
}

impl ScattershotPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed ^ 0x5CA7_7E25),
            max_fixes: 3,
        }
    }
}

impl PlayerPolicy for DiligentPolicy {
    fn name(&self) -> &'static str {
        "Diligent"
    }

    fn plan_round(&mut self, view: &RoundView<'_>) -> Vec<PlayerMove> {
        let mut moves = vec![PlayerMove::Start];
        if let Some(action) = view.catalogue.correct_fix_action(view.recommended) {
            moves.push(PlayerMove::PlayFix(action.id.clone()));
        }
        moves.push(PlayerMove::Submit(
            view.state.current_task.widget.reference_answer(),
        ));
        moves
    }
}

impl PlayerPolicy for ScattershotPolicy {
    fn name(&self) -> &'static str {
        "Scattershot"
    }

    fn plan_round(&mut self, view: &RoundView<'_>) -> Vec<PlayerMove> {
        let mut moves = vec![PlayerMove::Start];
        let actions = view.catalogue.list_fix_actions();
        let fixes = self.rng.gen_range(0..=self.max_fixes);
        for _ in 0..fixes {
            let action = &actions[self.rng.gen_range(0..actions.len())];
            moves.push(PlayerMove::PlayFix(action.id.clone()));
        }
        if self.rng.gen_bool(0.5) {
            let barrier = SimulationKind::BARRIERS
                [self.rng.gen_range(0..SimulationKind::BARRIERS.len())];
            moves.push(PlayerMove::SelectSimulation(barrier));
        }
        moves.push(PlayerMove::Submit(WidgetInput::choose("not-the-answer")));
        moves.push(PlayerMove::Submit(
            view.state.current_task.widget.reference_answer(),
        ));
        moves
    }
}

impl PlayerPolicy for SkipperPolicy {
    fn name(&self) -> &'static str {
        "Skipper"
    }

    fn plan_round(&mut self, _view: &RoundView<'_>) -> Vec<PlayerMove> {
        vec![PlayerMove::Skip]
    }
}

impl PlayerPolicy for HastyPolicy {
    fn name(&self) -> &'static str {
        "Hasty"
    }

    fn plan_round(&mut self, _view: &RoundView<'_>) -> Vec<PlayerMove> {
        vec![PlayerMove::MarkComplete]
    }
}
