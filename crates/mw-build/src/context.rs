use mw_core::component::{Collider, SpriteRenderer};
use mw_core::{Document, ElementId, NodeId, Scene, ShipState};

use crate::config::BuildConfig;
use crate::diagnostics::{BuildEventKind, BuildLog};
use crate::error::{BuildError, BuildResult};
use crate::ledger::{AssignedId, IdLedger};
use crate::resolver::{ContentResolver, Template};
use crate::rooms::RoomIndex;

/// Mutable context passed to each builder.
///
/// Everything a builder touches lives here and lives exactly as long as one
/// document build.
pub struct BuildContext<'a> {
    /// The document being built.
    pub document: &'a Document,
    /// Scene receiving the built nodes.
    pub scene: &'a mut Scene,
    /// Host simulation state. Use [`BuildContext::ship`] to require it.
    pub ship: Option<&'a mut ShipState>,
    /// Template lookup.
    pub resolver: &'a dyn ContentResolver,
    /// Build tunables.
    pub config: &'a BuildConfig,
    /// Room ids for every room element, computed before assembly.
    pub rooms: &'a RoomIndex,
    /// Non-fatal warnings.
    pub log: &'a mut BuildLog,
    /// Every id assigned so far.
    pub ledger: &'a mut IdLedger,
}

impl BuildContext<'_> {
    /// The ship state, or a fatal error naming the builder that needed it.
    pub fn ship(&mut self, builder: &'static str) -> BuildResult<&mut ShipState> {
        self.ship
            .as_deref_mut()
            .ok_or(BuildError::MissingShipState { builder })
    }

    /// Record a non-fatal warning about an element.
    pub fn warn(&mut self, element: ElementId, kind: BuildEventKind, message: impl Into<String>) {
        self.log.warn(Some(element), kind, message);
    }

    /// Record an assigned id.
    pub fn record(&mut self, element: ElementId, id: AssignedId) {
        self.ledger.record(element, id);
    }

    /// Give `node` the template's sprite unless it already has one.
    pub fn default_sprite(&mut self, node: NodeId, template: &Template) -> BuildResult<()> {
        let node = self.scene.node_mut(node)?;
        if node.components.sprite.is_none() {
            node.components.sprite = Some(SpriteRenderer {
                sprite: template.sprite.clone(),
                ..Default::default()
            });
        }
        Ok(())
    }

    /// Give `node` the template's colliders unless it already has some.
    pub fn default_colliders(&mut self, node: NodeId, template: &Template) -> BuildResult<()> {
        let node = self.scene.node_mut(node)?;
        if node.components.colliders.is_empty() {
            node.components.colliders = template
                .colliders
                .iter()
                .map(|shape| Collider {
                    shape: shape.clone(),
                    is_trigger: false,
                })
                .collect();
        }
        Ok(())
    }
}
