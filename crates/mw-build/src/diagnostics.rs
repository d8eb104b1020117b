use std::fmt;

use log::warn;
use mw_core::{ElementId, TaskLength};

/// What kind of non-fatal problem occurred during a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEventKind {
    /// The content resolver has no template for a tag; the element is skipped.
    MissingTemplate {
        /// The unresolved tag.
        tag: String,
    },
    /// An element that needs a sprite has none.
    MissingSprite,
    /// The async asset loader is not available; the icon never receives its image.
    AssetLoaderUnavailable,
    /// A second scanner element was found; the first stays authoritative.
    DuplicateScanner,
    /// The document reuses an element id.
    DuplicateElementId,
    /// Fewer tasks of a length than freeplay requires.
    BelowMinimumTasks {
        /// The task length that is short.
        length: TaskLength,
        /// The configured minimum.
        required: usize,
        /// How many were built.
        actual: usize,
    },
}

/// A record of a non-fatal problem found during a build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildEvent {
    /// The element the problem concerns, if any.
    pub element: Option<ElementId>,
    /// The specific kind of problem.
    pub kind: BuildEventKind,
    /// A human-readable description.
    pub message: String,
}

impl fmt::Display for BuildEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.element {
            Some(id) => write!(f, "warning: {} [{id}]", self.message),
            None => write!(f, "warning: {}", self.message),
        }
    }
}

/// Accumulates warnings during a build.
///
/// Every warning is also forwarded to the `log` facade so hosts that only
/// install a logger still see it.
#[derive(Debug, Clone, Default)]
pub struct BuildLog {
    events: Vec<BuildEvent>,
}

impl BuildLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning.
    pub fn warn(
        &mut self,
        element: Option<ElementId>,
        kind: BuildEventKind,
        message: impl Into<String>,
    ) {
        let event = BuildEvent {
            element,
            kind,
            message: message.into(),
        };
        warn!("{event}");
        self.events.push(event);
    }

    /// All recorded events in order.
    pub fn events(&self) -> &[BuildEvent] {
        &self.events
    }

    /// Events concerning the given element.
    pub fn events_for_element(&self, id: ElementId) -> Vec<&BuildEvent> {
        self.events
            .iter()
            .filter(|e| e.element == Some(id))
            .collect()
    }

    /// Returns true if any event matches the predicate.
    pub fn any(&self, predicate: impl Fn(&BuildEventKind) -> bool) -> bool {
        self.events.iter().any(|e| predicate(&e.kind))
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_warn_and_query() {
        let mut log = BuildLog::new();
        let id = ElementId::new();
        log.warn(Some(id), BuildEventKind::MissingSprite, "no sprite");
        log.warn(None, BuildEventKind::DuplicateScanner, "second scanner");
        assert_eq!(log.len(), 2);
        assert_eq!(log.events_for_element(id).len(), 1);
        assert!(log.any(|k| *k == BuildEventKind::DuplicateScanner));
        assert!(!log.any(|k| matches!(
            k,
            BuildEventKind::MissingTemplate { .. }
        )));
    }

    #[test]
    fn event_display_includes_element() {
        let event = BuildEvent {
            element: None,
            kind: BuildEventKind::MissingSprite,
            message: "no sprite".into(),
        };
        assert_eq!(event.to_string(), "warning: no sprite");
    }
}
