//! Accessibility barrier kinds and their presentation metadata.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A simulated accessibility impairment applied to the interface.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum SimulationKind {
    #[default]
    None,
    ColorBlind,
    BlurredVision,
    HighContrast,
    LowContrast,
    #[serde(rename = "zoomed-ui")]
    ZoomedUI,
    ScreenReader,
    CognitiveOverload,
}

impl SimulationKind {
    pub const ALL: &'static [Self] = &[
        Self::None,
        Self::ColorBlind,
        Self::BlurredVision,
        Self::HighContrast,
        Self::LowContrast,
        Self::ZoomedUI,
        Self::ScreenReader,
        Self::CognitiveOverload,
    ];

    /// Every kind except `None`.
    pub const BARRIERS: &'static [Self] = &[
        Self::ColorBlind,
        Self::BlurredVision,
        Self::HighContrast,
        Self::LowContrast,
        Self::ZoomedUI,
        Self::ScreenReader,
        Self::CognitiveOverload,
    ];

    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// Stable kebab-case key, identical to the serialized form.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::ColorBlind => "color-blind",
            Self::BlurredVision => "blurred-vision",
            Self::HighContrast => "high-contrast",
            Self::LowContrast => "low-contrast",
            Self::ZoomedUI => "zoomed-ui",
            Self::ScreenReader => "screen-reader",
            Self::CognitiveOverload => "cognitive-overload",
        }
    }

    /// Short name used in feedback messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::ColorBlind => "ColorBlind",
            Self::BlurredVision => "BlurredVision",
            Self::HighContrast => "HighContrast",
            Self::LowContrast => "LowContrast",
            Self::ZoomedUI => "ZoomedUI",
            Self::ScreenReader => "ScreenReader",
            Self::CognitiveOverload => "CognitiveOverload",
        }
    }

    /// What the player is experiencing while the simulation is active.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "no simulation",
            Self::ColorBlind => "color blindness",
            Self::BlurredVision => "blurred vision",
            Self::HighContrast => "high contrast needs",
            Self::LowContrast => "low contrast vision",
            Self::ZoomedUI => "zoomed interface",
            Self::ScreenReader => "screen reader mode",
            Self::CognitiveOverload => "cognitive overload",
        }
    }

    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::None => "✓",
            Self::ColorBlind => "🎨",
            Self::BlurredVision => "👓",
            Self::HighContrast => "◐",
            Self::LowContrast => "🔆",
            Self::ZoomedUI => "🔍",
            Self::ScreenReader => "🔊",
            Self::CognitiveOverload => "🧠",
        }
    }
}

impl fmt::Display for SimulationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SimulationKind {
    type Err = ();

    /// Accepts either the kebab-case key or the short name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.key() == s || kind.name().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}
