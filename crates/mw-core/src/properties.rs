use std::fmt;

use serde::{Deserialize, Serialize};

/// Length classification of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskLength {
    /// Quick, single-step task.
    #[serde(alias = "short")]
    Short,
    /// Task shared by every player.
    #[serde(alias = "common")]
    Common,
    /// Multi-step or timed task.
    #[serde(alias = "long")]
    Long,
}

impl fmt::Display for TaskLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Short => write!(f, "short"),
            Self::Common => write!(f, "common"),
            Self::Long => write!(f, "long"),
        }
    }
}

/// Optional per-element overrides.
///
/// Every field is optional on the wire. The accessor methods apply the
/// documented default when a field is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementProperties {
    /// Overrides the task template's length classification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_length: Option<TaskLength>,
    /// Display name for the task type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Console interaction range. Default 1.0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<f32>,
    /// Console usable only when approached from below. Default false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub only_from_below: Option<bool>,
    /// Console checks for walls between the player and itself. Default false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_collision: Option<bool>,
    /// Distance from ladder center to each endpoint. Default depends on the tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ladder_height: Option<f32>,
    /// Floating amplitude. Default 0.2.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floating_height: Option<f32>,
    /// Floating frequency. Default 2.0.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floating_speed: Option<f32>,
    /// Only visible on the restricted (impostor) minimap layer. Default false.
    #[serde(alias = "imposterOnly", skip_serializing_if = "Option::is_none")]
    pub impostor_only: Option<bool>,
    /// Custom visual for the element, resolved asynchronously.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprite_data: Option<String>,
}

impl ElementProperties {
    /// Default console interaction range.
    pub const DEFAULT_RANGE: f32 = 1.0;

    /// Interaction range, or 1.0.
    pub fn range_or_default(&self) -> f32 {
        self.range.unwrap_or(Self::DEFAULT_RANGE)
    }

    /// Whether the console is only usable from below.
    pub fn only_from_below(&self) -> bool {
        self.only_from_below == Some(true)
    }

    /// Whether the console checks for walls.
    pub fn check_collision(&self) -> bool {
        self.check_collision.unwrap_or(false)
    }

    /// Whether a minimap icon belongs on the restricted layer.
    pub fn impostor_only(&self) -> bool {
        self.impostor_only == Some(true)
    }

    /// The description, if present and non-empty.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}
