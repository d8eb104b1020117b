use std::fmt;

use serde::{Deserialize, Serialize};

use crate::component::ComponentSet;

/// Handle to a node in a [`Scene`](crate::scene::Scene).
///
/// Handles are generational: once a node is destroyed its slot may be reused,
/// but old handles to it stay dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId {
    /// Slot index in the scene arena.
    pub index: u32,
    /// Generation of the slot when the handle was issued.
    pub generation: u32,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

/// A 3-component vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Vec3 {
    /// All zeros.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// All ones.
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    /// Construct from components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Position, scale, and Z rotation relative to the parent node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalTransform {
    /// Offset from the parent.
    pub position: Vec3,
    /// Scale relative to the parent.
    pub scale: Vec3,
    /// Rotation about Z in degrees.
    pub rotation: f32,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation: 0.0,
        }
    }
}

/// Render/collision layer of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    /// Ordinary world object.
    #[default]
    Default,
    /// Ship geometry.
    Ship,
    /// Overlay UI such as the minimap.
    Ui,
}

/// A single object in the scene graph.
#[derive(Debug, Clone)]
pub struct Node {
    /// Display name.
    pub name: String,
    /// Transform relative to `parent`.
    pub transform: LocalTransform,
    /// Layer the node renders/collides on.
    pub layer: Layer,
    /// Inactive nodes stay in the graph but are not simulated.
    pub active: bool,
    /// Typed components attached to this node.
    pub components: ComponentSet,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: LocalTransform::default(),
            layer: Layer::Default,
            active: true,
            components: ComponentSet::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// The parent node, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct children in creation order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}
