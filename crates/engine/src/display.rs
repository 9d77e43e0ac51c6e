//! Read-only projection of the engine for presentation surfaces.

use serde::{Deserialize, Serialize};

/// Digit counts above which the display steps down a font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeThresholds {
    pub small: usize,
    pub extra_small: usize,
}

impl Default for SizeThresholds {
    fn default() -> Self {
        Self {
            small: 6,
            extra_small: 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplaySize {
    Normal,
    Small,
    #[serde(rename = "x-small")]
    ExtraSmall,
}

impl DisplaySize {
    /// Pick a size for `value`. The sign and the decimal point don't count
    /// towards its width.
    pub fn classify(value: &str, thresholds: SizeThresholds) -> Self {
        let width = value.replacen('-', "", 1).replacen('.', "", 1).chars().count();
        if width > thresholds.extra_small {
            DisplaySize::ExtraSmall
        } else if width > thresholds.small {
            DisplaySize::Small
        } else {
            DisplaySize::Normal
        }
    }

    /// CSS modifier class used by the keypad window; empty for normal size.
    pub fn css_class(self) -> &'static str {
        match self {
            DisplaySize::Normal => "",
            DisplaySize::Small => "small",
            DisplaySize::ExtraSmall => "x-small",
        }
    }
}

/// What a presentation surface renders after each action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub display_value: String,
    pub expression_text: String,
    pub display_size: DisplaySize,
}
