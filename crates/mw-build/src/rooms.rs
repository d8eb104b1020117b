use std::collections::HashMap;

use log::debug;
use mw_core::component::{RoomComponent, RoomId};
use mw_core::{Document, Element, ElementId, ElementKind};

use crate::builder::{BuildItem, Builder};
use crate::context::BuildContext;
use crate::error::BuildResult;
use crate::ledger::AssignedId;

/// Room ids derived from the document alone.
///
/// A room's id is its ordinal among room elements in document order, which is
/// exactly what [`RoomBuilder`] assigns. Other builders use this index to
/// resolve an element's parent room without depending on how far the
/// assemble phase has progressed.
#[derive(Debug, Clone, Default)]
pub struct RoomIndex {
    by_element: HashMap<ElementId, RoomId>,
}

impl RoomIndex {
    /// Scan `document` for room elements.
    pub fn from_document(document: &Document) -> Self {
        let by_element = document
            .elements
            .iter()
            .filter(|e| e.kind() == ElementKind::Room)
            .enumerate()
            .map(|(i, e)| (e.id, RoomId(i as u32)))
            .collect();
        Self { by_element }
    }

    /// The id of a room element.
    pub fn room_of(&self, element: ElementId) -> Option<RoomId> {
        self.by_element.get(&element).copied()
    }

    /// The room an element is nested under, or [`RoomId::DEFAULT`].
    pub fn parent_room_or_default(&self, element: &Element) -> RoomId {
        element
            .parent_id
            .and_then(|p| self.room_of(p))
            .unwrap_or(RoomId::DEFAULT)
    }

    /// Number of rooms in the document.
    pub fn len(&self) -> usize {
        self.by_element.len()
    }

    /// Returns `true` if the document has no rooms.
    pub fn is_empty(&self) -> bool {
        self.by_element.is_empty()
    }
}

/// Assigns sequential room ids and registers rooms with the ship.
#[derive(Debug, Default)]
pub struct RoomBuilder {
    next_id: u32,
}

impl RoomBuilder {
    /// A builder whose first room gets id 0.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Builder for RoomBuilder {
    fn name(&self) -> &'static str {
        "room"
    }

    fn owns(&self, kind: ElementKind) -> bool {
        kind == ElementKind::Room
    }

    fn build(&mut self, item: &BuildItem<'_>, ctx: &mut BuildContext<'_>) -> BuildResult<()> {
        if !self.owns(item.kind) {
            return Ok(());
        }
        ctx.ship(self.name())?;

        let room_id = RoomId(self.next_id);
        self.next_id += 1;

        let node = ctx.scene.node_mut(item.placeholder)?;
        node.components.room = Some(RoomComponent { room_id });
        for collider in &mut node.components.colliders {
            collider.is_trigger = true;
        }

        let ship = ctx.ship(self.name())?;
        ship.all_rooms.push(item.placeholder);
        ship.fast_rooms.insert(room_id, item.placeholder);

        ctx.record(item.element.id, AssignedId::Room { room: room_id });
        debug!("assigned {room_id} to {}", item.element);
        Ok(())
    }

    /// Resets the counter. This is the reset point for repeated builds; the
    /// pipeline still constructs a fresh builder per document.
    fn post_build(&mut self, _ctx: &mut BuildContext<'_>) -> BuildResult<()> {
        self.next_id = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_assigns_ordinals_among_rooms() {
        let mut doc = Document::new("d", "Doc");
        let a = doc.push(Element::new("util-room", "A"));
        doc.push(Element::new("task-wires", "Wires"));
        let b = doc.push(Element::new("util-room", "B"));
        let index = RoomIndex::from_document(&doc);
        assert_eq!(index.room_of(a), Some(RoomId(0)));
        assert_eq!(index.room_of(b), Some(RoomId(1)));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn parent_room_defaults_when_missing_or_not_a_room() {
        let mut doc = Document::new("d", "Doc");
        doc.push(Element::new("util-room", "A"));
        let b = doc.push(Element::new("util-room", "B"));
        let vent = doc.push(Element::new("util-vent1", "Vent"));
        let index = RoomIndex::from_document(&doc);

        let inside = Element::new("task-wires", "W").with_parent(b);
        let orphan = Element::new("task-wires", "W");
        let under_vent = Element::new("task-wires", "W").with_parent(vent);
        assert_eq!(index.parent_room_or_default(&inside), RoomId(1));
        assert_eq!(index.parent_room_or_default(&orphan), RoomId::DEFAULT);
        assert_eq!(index.parent_room_or_default(&under_vent), RoomId::DEFAULT);
    }
}
