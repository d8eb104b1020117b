use mw_core::ElementId;
use mw_core::component::{ConsoleId, LadderId, RoomId};
use serde::{Deserialize, Serialize};

/// One id handed out during a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssignedId {
    /// A room marker's sequential id.
    Room {
        /// The assigned room id.
        room: RoomId,
    },
    /// A console's network id.
    Console {
        /// The assigned console id.
        console: ConsoleId,
    },
    /// Both endpoints of a ladder.
    LadderPair {
        /// Id of the top endpoint.
        top: LadderId,
        /// Id of the bottom endpoint.
        bottom: LadderId,
    },
}

/// A single ledger line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// The element that received the id.
    pub element: ElementId,
    /// What was assigned.
    pub id: AssignedId,
}

/// Every id assigned during one build, in assignment order.
///
/// Two peers that built the same document must hold equal ledgers. The
/// ledger is what `mw ids` prints for comparing peers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdLedger {
    entries: Vec<LedgerEntry>,
}

impl IdLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an assignment.
    pub fn record(&mut self, element: ElementId, id: AssignedId) {
        self.entries.push(LedgerEntry { element, id });
    }

    /// All entries in assignment order.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Ids assigned to one element.
    pub fn for_element(&self, element: ElementId) -> Vec<AssignedId> {
        self.entries
            .iter()
            .filter(|e| e.element == element)
            .map(|e| e.id)
            .collect()
    }

    /// The console id assigned to an element, if any.
    pub fn console_id(&self, element: ElementId) -> Option<ConsoleId> {
        self.entries.iter().find_map(|e| match e.id {
            AssignedId::Console { console } if e.element == element => Some(console),
            _ => None,
        })
    }

    /// The room id assigned to an element, if any.
    pub fn room_id(&self, element: ElementId) -> Option<RoomId> {
        self.entries.iter().find_map(|e| match e.id {
            AssignedId::Room { room } if e.element == element => Some(room),
            _ => None,
        })
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was assigned.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_by_element() {
        let mut ledger = IdLedger::new();
        let room = ElementId::new();
        let console = ElementId::new();
        ledger.record(room, AssignedId::Room { room: RoomId(0) });
        ledger.record(
            console,
            AssignedId::Console {
                console: ConsoleId(4),
            },
        );
        assert_eq!(ledger.room_id(room), Some(RoomId(0)));
        assert_eq!(ledger.console_id(console), Some(ConsoleId(4)));
        assert_eq!(ledger.console_id(room), None);
        assert_eq!(ledger.for_element(console).len(), 1);
    }

    #[test]
    fn serializes_as_flat_list() {
        let mut ledger = IdLedger::new();
        let id = ElementId::new();
        ledger.record(
            id,
            AssignedId::LadderPair {
                top: LadderId(0),
                bottom: LadderId(1),
            },
        );
        let json = serde_json::to_value(&ledger).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["id"]["kind"], "ladder_pair");
        assert_eq!(json[0]["id"]["bottom"], 1);
    }
}
