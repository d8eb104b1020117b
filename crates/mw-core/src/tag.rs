//! Closed classification of element type tags.
//!
//! Tags are plain strings in the document. They are classified once per
//! element so that every builder matches on an enum instead of re-parsing
//! string prefixes.

use std::fmt;

/// Tag of a room marker.
pub const ROOM: &str = "util-room";
/// Tag of a tall ladder.
pub const LADDER_TALL: &str = "util-ladder1";
/// Tag of a short ladder.
pub const LADDER_SHORT: &str = "util-ladder2";
/// Tag of a minimap icon.
pub const MINIMAP_ICON: &str = "util-minimapsprite";
/// Prefix shared by every task tag.
pub const TASK_PREFIX: &str = "task-";

/// Ladder variants, each with its own default height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LadderKind {
    /// `util-ladder1`.
    Tall,
    /// `util-ladder2`.
    Short,
}

impl LadderKind {
    /// The exact tag for this variant.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Tall => LADDER_TALL,
            Self::Short => LADDER_SHORT,
        }
    }
}

/// Which builder an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A room marker.
    Room,
    /// A ladder of the given variant.
    Ladder(LadderKind),
    /// A minimap icon.
    MinimapIcon,
    /// Any `task-*` tag.
    Task,
    /// Unrecognized; passed through untouched.
    Other,
}

impl ElementKind {
    /// Every recognized kind, for exhaustive tests.
    pub const RECOGNIZED: [ElementKind; 5] = [
        Self::Room,
        Self::Ladder(LadderKind::Tall),
        Self::Ladder(LadderKind::Short),
        Self::MinimapIcon,
        Self::Task,
    ];

    /// Classify a type tag.
    pub fn classify(tag: &str) -> Self {
        match tag {
            ROOM => Self::Room,
            LADDER_TALL => Self::Ladder(LadderKind::Tall),
            LADDER_SHORT => Self::Ladder(LadderKind::Short),
            MINIMAP_ICON => Self::MinimapIcon,
            t if t.starts_with(TASK_PREFIX) => Self::Task,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Room => write!(f, "room"),
            Self::Ladder(LadderKind::Tall) => write!(f, "ladder (tall)"),
            Self::Ladder(LadderKind::Short) => write!(f, "ladder (short)"),
            Self::MinimapIcon => write!(f, "minimap icon"),
            Self::Task => write!(f, "task"),
            Self::Other => write!(f, "other"),
        }
    }
}
