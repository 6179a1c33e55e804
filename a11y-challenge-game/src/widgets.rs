//! Interactive task widgets, reduced to their pass/fail contract.
//!
//! A widget consumes player inputs and answers whether its task is done. It
//! reads the active simulation and applied fixes but never mutates the
//! session; completion is reported upward to the controller.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::simulation::SimulationKind;
use crate::state::GameSession;

/// Which widget a task runs, resolved once when the catalogue is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetKind {
    ColorButtons,
    FinePrint,
    ContrastMenu,
    RequiredForm,
    ImageGallery,
    PlanDropdown,
    ErrorCorrection,
    #[default]
    Confirm,
}

impl WidgetKind {
    pub const ALL: &'static [Self] = &[
        Self::ColorButtons,
        Self::FinePrint,
        Self::ContrastMenu,
        Self::RequiredForm,
        Self::ImageGallery,
        Self::PlanDropdown,
        Self::ErrorCorrection,
        Self::Confirm,
    ];

    /// Construct a fresh widget of this kind.
    #[must_use]
    pub fn build(self) -> Box<dyn TaskWidget> {
        match self {
            Self::ColorButtons => Box::new(ColorButtons),
            Self::FinePrint => Box::new(FinePrint),
            Self::ContrastMenu => Box::new(ContrastMenu),
            Self::RequiredForm => Box::new(RequiredForm),
            Self::ImageGallery => Box::new(ImageGallery),
            Self::PlanDropdown => Box::new(PlanDropdown),
            Self::ErrorCorrection => Box::new(ErrorCorrection),
            Self::Confirm => Box::new(Confirm),
        }
    }

    /// An input that completes this widget, used by scripted players.
    #[must_use]
    pub fn reference_answer(self) -> WidgetInput {
        match self {
            Self::ColorButtons => WidgetInput::choose("green"),
            Self::FinePrint => WidgetInput::Text("accessibility matters".to_string()),
            Self::ContrastMenu => WidgetInput::choose("settings"),
            Self::RequiredForm => WidgetInput::Form(BTreeMap::from([
                ("name".to_string(), "Ada Lovelace".to_string()),
                ("email".to_string(), "ada@example.com".to_string()),
                ("agree".to_string(), "on".to_string()),
            ])),
            Self::ImageGallery => WidgetInput::choose("dog"),
            Self::PlanDropdown => WidgetInput::choose("premium"),
            Self::ErrorCorrection => WidgetInput::choose("fix-email"),
            Self::Confirm => WidgetInput::choose("confirm"),
        }
    }
}

/// What a widget sees of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetContext {
    pub task_id: String,
    pub active_simulation: SimulationKind,
    pub applied_fixes: BTreeSet<SimulationKind>,
}

impl WidgetContext {
    #[must_use]
    pub fn from_session(session: &GameSession) -> Self {
        Self {
            task_id: session.current_task.id.clone(),
            active_simulation: session.active_simulation,
            applied_fixes: session.applied_fixes.clone(),
        }
    }

    #[must_use]
    pub fn has_fix(&self, sim: SimulationKind) -> bool {
        self.applied_fixes.contains(&sim)
    }
}

/// A single player interaction with a widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum WidgetInput {
    /// Click a button, option or image identified by value.
    Choose(String),
    /// Submit free text.
    Text(String),
    /// Submit named form fields.
    Form(BTreeMap<String, String>),
}

impl WidgetInput {
    #[must_use]
    pub fn choose(value: &str) -> Self {
        Self::Choose(value.to_string())
    }
}

/// Widget answer to an input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WidgetStatus {
    Pending { message: Option<String> },
    Completed { message: String },
}

impl WidgetStatus {
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    fn rejected(message: &str) -> Self {
        Self::Pending {
            message: Some(message.to_string()),
        }
    }

    fn done(message: &str) -> Self {
        Self::Completed {
            message: message.to_string(),
        }
    }
}

/// Pass/fail contract every task widget implements.
pub trait TaskWidget: fmt::Debug + Send {
    fn kind(&self) -> WidgetKind;

    /// Barriers this widget is built to demonstrate.
    fn relevant_barriers(&self) -> &'static [SimulationKind];

    /// Text shown once a relevant fix is in place under a relevant simulation.
    fn notice_text(&self) -> &'static str;

    /// Handle one input.
    fn respond(&mut self, input: &WidgetInput, ctx: &WidgetContext) -> WidgetStatus;

    /// The "fix applied" notice, when it should be displayed.
    fn fix_notice(&self, ctx: &WidgetContext) -> Option<&'static str> {
        let relevant = self.relevant_barriers();
        let simulated = relevant.contains(&ctx.active_simulation);
        let fixed = relevant.iter().any(|sim| ctx.has_fix(*sim));
        (simulated && fixed).then(|| self.notice_text())
    }

    /// True while the active simulation hampers this widget and nothing fixes it.
    fn barrier_blocking(&self, ctx: &WidgetContext) -> bool {
        self.relevant_barriers().contains(&ctx.active_simulation)
            && !ctx.has_fix(ctx.active_simulation)
    }
}

fn chosen(input: &WidgetInput) -> Option<&str> {
    match input {
        WidgetInput::Choose(value) => Some(value.trim()),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy)]
struct ColorButtons;

impl TaskWidget for ColorButtons {
    fn kind(&self) -> WidgetKind {
        WidgetKind::ColorButtons
    }

    fn relevant_barriers(&self) -> &'static [SimulationKind] {
        &[SimulationKind::ColorBlind]
    }

    fn notice_text(&self) -> &'static str {
        "Text labels have been added to the buttons to help with color identification."
    }

    fn respond(&mut self, input: &WidgetInput, _ctx: &WidgetContext) -> WidgetStatus {
        match chosen(input) {
            Some(value) if value.eq_ignore_ascii_case("green") => {
                WidgetStatus::done("You clicked the green button.")
            }
            _ => WidgetStatus::rejected("That was not the green button. Try again."),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct FinePrint;

impl TaskWidget for FinePrint {
    fn kind(&self) -> WidgetKind {
        WidgetKind::FinePrint
    }

    fn relevant_barriers(&self) -> &'static [SimulationKind] {
        &[SimulationKind::BlurredVision]
    }

    fn notice_text(&self) -> &'static str {
        "Font size has been increased for better readability."
    }

    fn respond(&mut self, input: &WidgetInput, _ctx: &WidgetContext) -> WidgetStatus {
        match input {
            WidgetInput::Text(text) if text.to_lowercase().contains("accessibility") => {
                WidgetStatus::done("Well done! You've read the tiny text.")
            }
            _ => WidgetStatus::rejected("That doesn't match the fine print. Try again."),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ContrastMenu;

impl TaskWidget for ContrastMenu {
    fn kind(&self) -> WidgetKind {
        WidgetKind::ContrastMenu
    }

    fn relevant_barriers(&self) -> &'static [SimulationKind] {
        &[SimulationKind::LowContrast, SimulationKind::HighContrast]
    }

    fn notice_text(&self) -> &'static str {
        "Contrast has been improved for better visibility."
    }

    fn respond(&mut self, input: &WidgetInput, _ctx: &WidgetContext) -> WidgetStatus {
        match chosen(input) {
            Some(value) if value.eq_ignore_ascii_case("settings") => {
                WidgetStatus::done("Found it! Good job spotting the low contrast text.")
            }
            _ => WidgetStatus::Pending { message: None },
        }
    }
}

const REQUIRED_FORM_FIELDS: [&str; 3] = ["name", "email", "agree"];

#[derive(Debug, Clone, Copy)]
struct RequiredForm;

impl TaskWidget for RequiredForm {
    fn kind(&self) -> WidgetKind {
        WidgetKind::RequiredForm
    }

    fn relevant_barriers(&self) -> &'static [SimulationKind] {
        &[
            SimulationKind::CognitiveOverload,
            SimulationKind::ScreenReader,
        ]
    }

    fn notice_text(&self) -> &'static str {
        "Form labels and instructions have been improved."
    }

    fn respond(&mut self, input: &WidgetInput, _ctx: &WidgetContext) -> WidgetStatus {
        let WidgetInput::Form(fields) = input else {
            return WidgetStatus::rejected("Submit the form to continue.");
        };
        let missing: Vec<&str> = REQUIRED_FORM_FIELDS
            .iter()
            .copied()
            .filter(|field| fields.get(*field).is_none_or(|value| value.trim().is_empty()))
            .collect();
        if missing.is_empty() {
            WidgetStatus::done("Form submitted successfully!")
        } else {
            WidgetStatus::Pending {
                message: Some(format!(
                    "This field is required: {}",
                    missing.join(", ")
                )),
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ImageGallery;

impl TaskWidget for ImageGallery {
    fn kind(&self) -> WidgetKind {
        WidgetKind::ImageGallery
    }

    fn relevant_barriers(&self) -> &'static [SimulationKind] {
        &[SimulationKind::ScreenReader, SimulationKind::BlurredVision]
    }

    fn notice_text(&self) -> &'static str {
        "Images now have descriptive labels."
    }

    fn respond(&mut self, input: &WidgetInput, _ctx: &WidgetContext) -> WidgetStatus {
        let Some(animal) = chosen(input) else {
            return WidgetStatus::Pending { message: None };
        };
        if animal.eq_ignore_ascii_case("dog") {
            WidgetStatus::done("Correct! You found the dog.")
        } else {
            WidgetStatus::rejected("That's not a dog. Try again.")
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PlanDropdown;

impl TaskWidget for PlanDropdown {
    fn kind(&self) -> WidgetKind {
        WidgetKind::PlanDropdown
    }

    fn relevant_barriers(&self) -> &'static [SimulationKind] {
        &[
            SimulationKind::LowContrast,
            SimulationKind::ZoomedUI,
            SimulationKind::CognitiveOverload,
        ]
    }

    fn notice_text(&self) -> &'static str {
        "Dropdown design has been improved for better usability."
    }

    fn respond(&mut self, input: &WidgetInput, _ctx: &WidgetContext) -> WidgetStatus {
        let Some(plan) = chosen(input) else {
            return WidgetStatus::Pending { message: None };
        };
        if plan.eq_ignore_ascii_case("premium") {
            WidgetStatus::done("Great choice! Premium Plan selected.")
        } else {
            WidgetStatus::Pending { message: None }
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ErrorCorrection;

impl TaskWidget for ErrorCorrection {
    fn kind(&self) -> WidgetKind {
        WidgetKind::ErrorCorrection
    }

    fn relevant_barriers(&self) -> &'static [SimulationKind] {
        &[SimulationKind::ColorBlind, SimulationKind::ScreenReader]
    }

    fn notice_text(&self) -> &'static str {
        "Error messages are now more clearly indicated."
    }

    fn respond(&mut self, input: &WidgetInput, _ctx: &WidgetContext) -> WidgetStatus {
        match chosen(input) {
            Some("fix-email") => WidgetStatus::done("Error fixed successfully!"),
            _ => WidgetStatus::rejected("Email address is invalid."),
        }
    }
}

/// Fallback for tasks without a dedicated widget.
#[derive(Debug, Clone, Copy)]
struct Confirm;

impl TaskWidget for Confirm {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Confirm
    }

    fn relevant_barriers(&self) -> &'static [SimulationKind] {
        &[]
    }

    fn notice_text(&self) -> &'static str {
        ""
    }

    fn respond(&mut self, input: &WidgetInput, _ctx: &WidgetContext) -> WidgetStatus {
        match chosen(input) {
            Some("confirm") => WidgetStatus::done("Simulation complete."),
            _ => WidgetStatus::Pending { message: None },
        }
    }
}
