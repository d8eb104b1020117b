//! Core types for Mapwright: level documents, the scene graph, and ship state.
//!
//! This crate defines the data model that the build pipeline reads from and
//! writes into. It contains no build logic: a [`Document`] can be constructed
//! programmatically or deserialized from JSON, and a [`Scene`] can be populated
//! by hand in tests.

/// Typed components attached to scene nodes (consoles, ladders, tasks, etc.).
pub mod component;
/// Level documents and their elements.
pub mod document;
/// Error types used throughout the crate.
pub mod error;
/// Scene nodes, handles, and local transforms.
pub mod node;
/// Typed per-element property bag.
pub mod properties;
/// The runtime scene graph that owns all nodes.
pub mod scene;
/// Simulation state written to by the build pipeline.
pub mod ship;
/// Element type tags and their closed classification.
pub mod tag;

/// Re-export document types.
pub use document::{Document, Element, ElementId};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export node types.
pub use node::{Layer, Node, NodeId, Vec3};
/// Re-export property types.
pub use properties::{ElementProperties, TaskLength};
/// Re-export the scene graph.
pub use scene::Scene;
/// Re-export ship state.
pub use ship::{MinimapLayers, ShipState};
/// Re-export tag classification.
pub use tag::{ElementKind, LadderKind};
