use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::properties::ElementProperties;
use crate::tag::ElementKind;

/// Unique identifier of an element within its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub Uuid);

impl ElementId {
    /// Generate a new random element ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// One placed object in a level document.
///
/// The `type_tag` drives builder dispatch; everything else is data the
/// builders copy onto the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Identifier, unique within the owning document.
    pub id: ElementId,
    /// Display name.
    pub name: String,
    /// Type tag, e.g. `util-room` or `task-wires`.
    #[serde(rename = "type")]
    pub type_tag: String,
    /// World-space X position.
    #[serde(default)]
    pub x: f32,
    /// World-space Y position.
    #[serde(default)]
    pub y: f32,
    /// Depth.
    #[serde(default)]
    pub z: f32,
    /// Horizontal scale.
    #[serde(default = "unit_scale")]
    pub x_scale: f32,
    /// Vertical scale.
    #[serde(default = "unit_scale")]
    pub y_scale: f32,
    /// Rotation about Z in degrees.
    #[serde(default)]
    pub rotation: f32,
    /// Element this one is nested under, typically a room.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ElementId>,
    /// Optional per-element overrides.
    #[serde(default)]
    pub properties: ElementProperties,
}

fn unit_scale() -> f32 {
    1.0
}

impl Element {
    /// Create an element with a random ID at the origin.
    pub fn new(type_tag: impl Into<String>, name: impl Into<String>) -> Self {
        Self::with_id(ElementId::new(), type_tag, name)
    }

    /// Create an element with a pre-assigned ID.
    pub fn with_id(id: ElementId, type_tag: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            type_tag: type_tag.into(),
            x: 0.0,
            y: 0.0,
            z: 0.0,
            x_scale: 1.0,
            y_scale: 1.0,
            rotation: 0.0,
            parent_id: None,
            properties: ElementProperties::default(),
        }
    }

    /// Set the world-space position.
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Nest this element under another (usually a room).
    pub fn with_parent(mut self, parent: ElementId) -> Self {
        self.parent_id = Some(parent);
        self
    }

    /// Replace the property bag.
    pub fn with_properties(mut self, properties: ElementProperties) -> Self {
        self.properties = properties;
        self
    }

    /// Classify the type tag.
    pub fn kind(&self) -> ElementKind {
        ElementKind::classify(&self.type_tag)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.type_tag, self.id)
    }
}

/// A declarative level description: an ordered list of elements.
///
/// Element order is part of the contract. Every peer builds the same ids
/// only because every peer walks the elements in this order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier. A change of id triggers asset cache eviction.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Elements in load-bearing order.
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Document {
    /// Create an empty document.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            elements: Vec::new(),
        }
    }

    /// Parse a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Append an element and return its ID.
    pub fn push(&mut self, element: Element) -> ElementId {
        let id = element.id;
        self.elements.push(element);
        id
    }

    /// Find an element by ID.
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// All elements carrying exactly `tag`, in document order.
    pub fn elements_tagged<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements.iter().filter(move |e| e.type_tag == tag)
    }

    /// IDs that appear more than once, in order of their second occurrence.
    pub fn duplicate_ids(&self) -> Vec<ElementId> {
        let mut seen = HashSet::new();
        self.elements
            .iter()
            .filter(|e| !seen.insert(e.id))
            .map(|e| e.id)
            .collect()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the document has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
