use std::collections::BTreeMap;

use log::debug;
use mw_core::component::{MinimapIcon, SpriteRenderer};
use mw_core::node::{Layer, LocalTransform, Vec3};
use mw_core::{ElementId, ElementKind, NodeId, Scene};

use crate::builder::{BuildItem, Builder};
use crate::context::BuildContext;
use crate::diagnostics::BuildEventKind;
use crate::error::{BuildError, BuildResult};
use crate::pipeline::BuildArtifacts;

/// What happened when a loaded sprite was delivered to its icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    /// The icon received the sprite and the stand-in was destroyed.
    Attached,
    /// The icon was destroyed before the sprite arrived.
    IconGone,
    /// The stand-in carrying the sprite was destroyed before delivery.
    SourceGone,
    /// No icon was waiting on this element, or it was already delivered.
    NotPending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingIcon {
    icon: NodeId,
    source: NodeId,
}

/// Icons waiting for their element's sprite to finish loading.
///
/// Each element is delivered at most once.
#[derive(Debug, Clone, Default)]
pub struct IconAttachments {
    pending: BTreeMap<ElementId, PendingIcon>,
}

impl IconAttachments {
    /// Deliver the loaded sprite of `element` to its icon.
    ///
    /// Safe to call after the icon, the stand-in or the whole map has been
    /// torn down.
    pub fn on_sprite_loaded(&mut self, scene: &mut Scene, element: ElementId) -> AttachOutcome {
        let Some(pending) = self.pending.remove(&element) else {
            return AttachOutcome::NotPending;
        };
        if !scene.is_alive(pending.icon) {
            debug!("icon for {element} gone before its sprite loaded");
            return AttachOutcome::IconGone;
        }
        let Some(loaded) = scene
            .get(pending.source)
            .and_then(|n| n.components.sprite.clone())
        else {
            return AttachOutcome::SourceGone;
        };
        if let Some(icon) = scene.get_mut(pending.icon) {
            icon.components.sprite = Some(loaded);
        }
        // The stand-in is no longer needed once the icon carries its sprite.
        let _ = scene.destroy(pending.source);
        AttachOutcome::Attached
    }

    /// Returns true if `element` still waits for its sprite.
    pub fn is_pending(&self, element: ElementId) -> bool {
        self.pending.contains_key(&element)
    }

    /// Number of icons still waiting.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` once every icon has been delivered or dropped.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Puts minimap icons on the task or restricted overlay.
#[derive(Debug, Default)]
pub struct MinimapBuilder {
    restricted: usize,
    attachments: IconAttachments,
}

impl MinimapBuilder {
    /// A builder with no icons placed.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Builder for MinimapBuilder {
    fn name(&self) -> &'static str {
        "minimap"
    }

    fn owns(&self, kind: ElementKind) -> bool {
        kind == ElementKind::MinimapIcon
    }

    fn build(&mut self, item: &BuildItem<'_>, ctx: &mut BuildContext<'_>) -> BuildResult<()> {
        if !self.owns(item.kind) {
            return Ok(());
        }
        let element = item.element;

        let ship = ctx.ship(self.name())?;
        let layers = ship.minimap.ok_or(BuildError::MissingMinimap)?;
        let map_scale = ship.map_scale;

        let restricted = element.properties.impostor_only();
        let overlay = if restricted {
            self.restricted += 1;
            layers.infected_overlay
        } else {
            layers.task_overlay
        };

        let icon = ctx.scene.spawn_child(overlay, element.name.clone())?;
        let node = ctx.scene.node_mut(icon)?;
        node.layer = Layer::Ui;
        node.transform = LocalTransform {
            position: Vec3::new(element.x / map_scale, element.y / map_scale, element.z),
            scale: Vec3::new(element.x_scale, element.y_scale, 1.0),
            rotation: element.rotation,
        };
        node.components.minimap_icon = Some(MinimapIcon {
            element: element.id,
            restricted,
        });

        let placeholder = ctx.scene.node(item.placeholder)?;
        if placeholder.components.sprite.is_none() {
            ctx.warn(
                element.id,
                BuildEventKind::MissingSprite,
                format!("{element} does not have a sprite attached"),
            );
            return Ok(());
        }
        if !ctx.resolver.loads_async() {
            ctx.warn(
                element.id,
                BuildEventKind::AssetLoaderUnavailable,
                "sprite loader is not available",
            );
            return Ok(());
        }

        ctx.scene.node_mut(icon)?.components.sprite = Some(SpriteRenderer::default());
        self.attachments.pending.insert(
            element.id,
            PendingIcon {
                icon,
                source: item.placeholder,
            },
        );
        debug!("minimap icon {icon} waits on {element}");
        Ok(())
    }

    fn publish(self: Box<Self>, artifacts: &mut BuildArtifacts) {
        artifacts.icons = self.attachments;
        artifacts.restricted_icons = self.restricted;
    }
}
