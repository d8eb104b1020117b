use log::{debug, info};
use mw_core::component::RoomId;
use mw_core::{Document, ElementId, NodeId, Scene, ShipState};

use crate::builder::{BuildItem, Builder};
use crate::config::BuildConfig;
use crate::context::BuildContext;
use crate::diagnostics::{BuildEventKind, BuildLog};
use crate::error::BuildResult;
use crate::ladder::{LadderBuilder, LadderRegistry};
use crate::ledger::IdLedger;
use crate::minimap::{IconAttachments, MinimapBuilder};
use crate::resolver::ContentResolver;
use crate::rooms::{RoomBuilder, RoomIndex};
use crate::task::{TaskBuilder, TaskCounts};

/// Everything one build reads from or writes into.
pub struct BuildInput<'a> {
    /// The document to build.
    pub document: &'a Document,
    /// Scene receiving the built nodes.
    pub scene: &'a mut Scene,
    /// Simulation state. Builders that need it fail the build when absent.
    pub ship: Option<&'a mut ShipState>,
    /// Template lookup and placeholder spawning.
    pub resolver: &'a dyn ContentResolver,
}

/// Data builders expose to the rest of the game once a build finishes.
#[derive(Debug, Default)]
pub struct BuildArtifacts {
    /// Ladder endpoints addressable by id.
    pub ladders: LadderRegistry,
    /// Per-tag counts published by the task builder.
    pub task_counts: TaskCounts,
    /// Target rooms of the divert tasks in document order.
    pub divert_targets: Vec<RoomId>,
    /// Node holding every task entity, if any task was built.
    pub task_container: Option<NodeId>,
    /// Minimap icons waiting for their sprite.
    pub icons: IconAttachments,
    /// Number of icons on the restricted overlay.
    pub restricted_icons: usize,
}

/// Result of a successful build.
#[derive(Debug)]
pub struct BuildOutput {
    /// Node every placeholder was spawned under.
    pub map_root: NodeId,
    /// Placeholder node per element, in document order.
    pub placeholders: Vec<(ElementId, NodeId)>,
    /// Data published by the builders.
    pub artifacts: BuildArtifacts,
    /// Non-fatal warnings.
    pub log: BuildLog,
    /// Every assigned id in assignment order.
    pub ledger: IdLedger,
}

impl BuildOutput {
    /// The placeholder spawned for an element.
    pub fn placeholder(&self, element: ElementId) -> Option<NodeId> {
        self.placeholders
            .iter()
            .find(|(id, _)| *id == element)
            .map(|(_, node)| *node)
    }
}

/// Drives the assemble and finalize phases over an ordered set of builders.
///
/// A pipeline is consumed by [`BuildPipeline::run`], so every document gets a
/// fresh set of builders and no counter survives into the next build.
#[derive(Debug)]
pub struct BuildPipeline {
    config: BuildConfig,
    builders: Vec<Box<dyn Builder>>,
}

impl BuildPipeline {
    /// A pipeline with the stock builders: rooms, ladders, tasks, minimap icons.
    pub fn new(config: BuildConfig) -> Self {
        let mut pipeline = Self::empty(config);
        pipeline.add_builder(RoomBuilder::new());
        pipeline.add_builder(LadderBuilder::new());
        pipeline.add_builder(TaskBuilder::new());
        pipeline.add_builder(MinimapBuilder::new());
        pipeline
    }

    /// A pipeline with no builders registered.
    pub fn empty(config: BuildConfig) -> Self {
        Self {
            config,
            builders: Vec::new(),
        }
    }

    /// Register a builder. Builders run in registration order.
    pub fn add_builder<B: Builder + 'static>(&mut self, builder: B) {
        self.builders.push(Box::new(builder));
    }

    /// Names of the registered builders in order.
    pub fn builder_names(&self) -> Vec<&'static str> {
        self.builders.iter().map(|b| b.name()).collect()
    }

    /// Build `input.document` into `input.scene`.
    ///
    /// On error the scene holds a partial graph that must be discarded.
    pub fn run(self, input: BuildInput<'_>) -> BuildResult<BuildOutput> {
        debug!("builders: {}", self.builder_names().join(", "));
        let BuildInput {
            document,
            scene,
            ship,
            resolver,
        } = input;
        let Self {
            config,
            mut builders,
        } = self;

        info!(
            "building document '{}' ({} elements, {} builders)",
            document.id,
            document.len(),
            builders.len()
        );

        let mut log = BuildLog::new();
        for id in document.duplicate_ids() {
            log.warn(
                Some(id),
                BuildEventKind::DuplicateElementId,
                format!("element id {id} appears more than once"),
            );
        }

        let rooms = RoomIndex::from_document(document);
        let map_root = match ship.as_deref() {
            Some(ship) => scene.spawn_child(ship.root, "Map")?,
            None => scene.spawn("Map"),
        };

        let mut items = Vec::with_capacity(document.len());
        for element in &document.elements {
            let placeholder = resolver.spawn_placeholder(scene, map_root, element)?;
            items.push(BuildItem {
                element,
                kind: element.kind(),
                placeholder,
            });
        }

        let mut ledger = IdLedger::new();
        let mut ctx = BuildContext {
            document,
            scene,
            ship,
            resolver,
            config: &config,
            rooms: &rooms,
            log: &mut log,
            ledger: &mut ledger,
        };

        debug!("assemble phase");
        for item in &items {
            for builder in builders.iter_mut() {
                builder.build(item, &mut ctx)?;
            }
        }

        debug!("finalize phase");
        for builder in builders.iter_mut() {
            builder.post_build(&mut ctx)?;
        }

        let mut artifacts = BuildArtifacts::default();
        for builder in builders {
            builder.publish(&mut artifacts);
        }

        info!(
            "built document '{}': {} ids assigned, {} warnings",
            document.id,
            ledger.len(),
            log.len()
        );

        Ok(BuildOutput {
            map_root,
            placeholders: items
                .iter()
                .map(|item| (item.element.id, item.placeholder))
                .collect(),
            artifacts,
            log,
            ledger,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuildError;
    use crate::resolver::TemplateCatalog;
    use mw_core::Element;

    #[test]
    fn stock_builders_in_order() {
        let pipeline = BuildPipeline::new(BuildConfig::default());
        assert_eq!(
            pipeline.builder_names(),
            vec!["room", "ladder", "task", "minimap"]
        );
    }

    #[test]
    fn unrecognized_tags_pass_through() {
        let mut doc = Document::new("d", "Doc");
        let vent = doc.push(Element::new("util-vent1", "Vent"));
        let mut scene = Scene::new();
        let mut ship = ShipState::with_minimap(&mut scene);
        let catalog = TemplateCatalog::builtin();

        let output = BuildPipeline::new(BuildConfig::default())
            .run(BuildInput {
                document: &doc,
                scene: &mut scene,
                ship: Some(&mut ship),
                resolver: &catalog,
            })
            .unwrap();

        let node = scene.get(output.placeholder(vent).unwrap()).unwrap();
        assert!(node.components.console.is_none());
        assert!(node.components.room.is_none());
        assert!(output.ledger.is_empty());
    }

    #[test]
    fn placeholders_hang_under_ship_root() {
        let mut doc = Document::new("d", "Doc");
        doc.push(Element::new("util-room", "Cafeteria"));
        let mut scene = Scene::new();
        let mut ship = ShipState::new(scene.spawn("Ship"));
        let catalog = TemplateCatalog::builtin();
        let output = BuildPipeline::new(BuildConfig::default())
            .run(BuildInput {
                document: &doc,
                scene: &mut scene,
                ship: Some(&mut ship),
                resolver: &catalog,
            })
            .unwrap();
        assert_eq!(scene.get(output.map_root).unwrap().parent(), Some(ship.root));
        assert_eq!(scene.children(output.map_root).len(), 1);
    }

    #[test]
    fn missing_ship_is_fatal_for_rooms() {
        let mut doc = Document::new("d", "Doc");
        doc.push(Element::new("util-room", "Cafeteria"));
        let mut scene = Scene::new();
        let catalog = TemplateCatalog::builtin();
        let err = BuildPipeline::new(BuildConfig::default())
            .run(BuildInput {
                document: &doc,
                scene: &mut scene,
                ship: None,
                resolver: &catalog,
            })
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::MissingShipState { builder: "room" }
        ));
    }

    #[test]
    fn duplicate_element_ids_warn() {
        let mut doc = Document::new("d", "Doc");
        let id = doc.push(Element::new("util-vent1", "A"));
        doc.push(Element::with_id(id, "util-vent1", "B"));
        let mut scene = Scene::new();
        let catalog = TemplateCatalog::builtin();
        let output = BuildPipeline::empty(BuildConfig::default())
            .run(BuildInput {
                document: &doc,
                scene: &mut scene,
                ship: None,
                resolver: &catalog,
            })
            .unwrap();
        assert!(output.log.any(|k| *k == BuildEventKind::DuplicateElementId));
    }
}
