use log::debug;
use mw_core::component::{Collider, ColliderShape, LadderEndpoint, LadderId};
use mw_core::node::Vec3;
use mw_core::{ElementKind, LadderKind, NodeId, Scene};

use crate::builder::{BuildItem, Builder};
use crate::context::BuildContext;
use crate::diagnostics::BuildEventKind;
use crate::error::{BuildError, BuildResult};
use crate::ledger::AssignedId;
use crate::pipeline::BuildArtifacts;

/// A ladder endpoint as seen from outside the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisteredLadder {
    /// Id carried by climb messages.
    pub id: LadderId,
    /// Upper end of the pair.
    pub is_top: bool,
    /// Endpoint node.
    pub node: NodeId,
    /// The paired endpoint node.
    pub destination: NodeId,
}

/// Every ladder endpoint built for the current document, addressable by id.
#[derive(Debug, Clone, Default)]
pub struct LadderRegistry {
    ladders: Vec<RegisteredLadder>,
}

impl LadderRegistry {
    /// Look up an endpoint by id. Unknown ids return `None`.
    pub fn get(&self, id: LadderId) -> Option<&RegisteredLadder> {
        self.ladders.iter().find(|l| l.id == id)
    }

    /// Drop endpoints whose node has been destroyed.
    pub fn compact(&mut self, scene: &Scene) -> usize {
        let before = self.ladders.len();
        self.ladders.retain(|l| scene.is_alive(l.node));
        before - self.ladders.len()
    }

    /// Endpoints in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = &RegisteredLadder> {
        self.ladders.iter()
    }

    /// Number of registered endpoints.
    pub fn len(&self) -> usize {
        self.ladders.len()
    }

    /// Returns `true` if no endpoint is registered.
    pub fn is_empty(&self) -> bool {
        self.ladders.is_empty()
    }

    fn push(&mut self, ladder: RegisteredLadder) {
        self.ladders.push(ladder);
    }
}

/// Links each ladder element to a pair of climbable endpoints.
///
/// The n-th ladder in the document gets ids `2n` (top) and `2n + 1`
/// (bottom). Ids are bytes and wrap.
#[derive(Debug, Default)]
pub struct LadderBuilder {
    next_id: u8,
    registry: LadderRegistry,
}

impl LadderBuilder {
    /// A builder whose first ladder gets ids 0 and 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Endpoints built so far.
    pub fn registry(&self) -> &LadderRegistry {
        &self.registry
    }

    fn take_id(&mut self) -> LadderId {
        let id = LadderId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }
}

impl Builder for LadderBuilder {
    fn name(&self) -> &'static str {
        "ladder"
    }

    fn owns(&self, kind: ElementKind) -> bool {
        matches!(kind, ElementKind::Ladder(_))
    }

    fn build(&mut self, item: &BuildItem<'_>, ctx: &mut BuildContext<'_>) -> BuildResult<()> {
        let ElementKind::Ladder(kind) = item.kind else {
            return Ok(());
        };
        let element = item.element;

        let resolver = ctx.resolver;
        let Some(template) = resolver.template(&element.type_tag) else {
            ctx.warn(
                element.id,
                BuildEventKind::MissingTemplate {
                    tag: element.type_tag.clone(),
                },
                format!("no template for {}, ladder skipped", element.type_tag),
            );
            return Ok(());
        };
        let Some(sounds) = template.ladder.as_ref() else {
            return Err(BuildError::Builder {
                builder: self.name(),
                message: format!("template for {} has no ladder endpoints", element.type_tag),
            });
        };

        ctx.default_sprite(item.placeholder, template)?;

        let height = element.properties.ladder_height.unwrap_or(match kind {
            LadderKind::Tall => ctx.config.tall_ladder_height,
            LadderKind::Short => ctx.config.short_ladder_height,
        });
        let offset = ctx.config.ladder_y_offset;

        let top = spawn_endpoint(ctx.scene, item.placeholder, "LadderTop", height + offset)?;
        let bottom = spawn_endpoint(ctx.scene, item.placeholder, "LadderBottom", -height + offset)?;
        let top_id = self.take_id();
        let bottom_id = self.take_id();

        let ends = [
            (top, top_id, true, bottom, &sounds.top_use_sound),
            (bottom, bottom_id, false, top, &sounds.bottom_use_sound),
        ];
        for (node, id, is_top, destination, use_sound) in ends {
            ctx.scene.node_mut(node)?.components.ladder = Some(LadderEndpoint {
                id,
                is_top,
                destination,
                use_sound: use_sound.clone(),
                image: Some(item.placeholder),
            });
            self.registry.push(RegisteredLadder {
                id,
                is_top,
                node,
                destination,
            });
        }

        ctx.record(
            element.id,
            AssignedId::LadderPair {
                top: top_id,
                bottom: bottom_id,
            },
        );
        debug!("linked {top_id}/{bottom_id} for {element}");
        Ok(())
    }

    fn post_build(&mut self, ctx: &mut BuildContext<'_>) -> BuildResult<()> {
        let removed = self.registry.compact(ctx.scene);
        if removed > 0 {
            debug!("dropped {removed} destroyed ladder endpoints");
        }
        Ok(())
    }

    fn publish(self: Box<Self>, artifacts: &mut BuildArtifacts) {
        artifacts.ladders = self.registry;
    }
}

fn spawn_endpoint(scene: &mut Scene, parent: NodeId, name: &str, y: f32) -> BuildResult<NodeId> {
    let id = scene.spawn_child(parent, name)?;
    let node = scene.node_mut(id)?;
    node.transform.position = Vec3::new(0.0, y, 0.0);
    node.components.colliders.push(Collider {
        shape: ColliderShape::Box {
            width: 1.0,
            height: 1.0,
        },
        is_trigger: true,
    });
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_lookup_and_compaction() {
        let mut scene = Scene::new();
        let a = scene.spawn("A");
        let b = scene.spawn("B");
        let mut registry = LadderRegistry::default();
        registry.push(RegisteredLadder {
            id: LadderId(0),
            is_top: true,
            node: a,
            destination: b,
        });
        registry.push(RegisteredLadder {
            id: LadderId(1),
            is_top: false,
            node: b,
            destination: a,
        });

        assert_eq!(registry.get(LadderId(1)).unwrap().node, b);
        assert!(registry.get(LadderId(9)).is_none());

        scene.destroy(a).unwrap();
        assert_eq!(registry.compact(&scene), 1);
        assert!(registry.get(LadderId(0)).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn ids_wrap_at_byte_boundary() {
        let mut builder = LadderBuilder::new();
        builder.next_id = 254;
        assert_eq!(builder.take_id(), LadderId(254));
        assert_eq!(builder.take_id(), LadderId(255));
        assert_eq!(builder.take_id(), LadderId(0));
    }
}
