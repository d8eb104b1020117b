//! Integration tests for the mw-build pipeline.

use mw_build::rpc::dispatch;
use mw_build::{
    AssignedId, AttachOutcome, BuildConfig, BuildEventKind, BuildInput, BuildOutput,
    BuildPipeline, CLIMB_LADDER, LadderClimber, RegisteredLadder, RpcOutcome, TaskInitializer,
    TemplateCatalog,
};
use mw_core::component::{LadderId, RoomId, SpriteRef, TaskKind, TaskType};
use mw_core::{Document, Element, ElementId, ElementProperties, Scene, ShipState, TaskLength};
use proptest::prelude::*;

struct Built {
    scene: Scene,
    ship: ShipState,
    output: BuildOutput,
}

fn build_with(doc: &Document, catalog: &TemplateCatalog, config: BuildConfig) -> Built {
    let mut scene = Scene::new();
    let mut ship = ShipState::with_minimap(&mut scene);
    let output = BuildPipeline::new(config)
        .run(BuildInput {
            document: doc,
            scene: &mut scene,
            ship: Some(&mut ship),
            resolver: catalog,
        })
        .unwrap();
    Built {
        scene,
        ship,
        output,
    }
}

fn build(doc: &Document) -> Built {
    build_with(doc, &TemplateCatalog::builtin(), BuildConfig::default())
}

fn element(tag: &str, name: &str) -> Element {
    Element::new(tag, name)
}

// ---------------------------------------------------------------------------
// determinism
// ---------------------------------------------------------------------------

#[test]
fn identical_documents_yield_identical_ledgers() {
    let mut doc = Document::new("skeld", "Skeld");
    let room = doc.push(element("util-room", "Electrical"));
    doc.push(element("task-wires", "Wires").with_parent(room));
    doc.push(element("util-ladder1", "Ladder"));
    doc.push(element("task-toilet", "Toilet"));
    doc.push(element("task-swipe", "Swipe"));
    doc.push(element("task-fuel2", "Fuel out"));
    doc.push(element("task-garbage3", "Chute"));

    let a = build(&doc);
    let b = build(&doc);
    assert_eq!(a.output.ledger, b.output.ledger);
    assert_eq!(
        serde_json::to_string(&a.output.ledger).unwrap(),
        serde_json::to_string(&b.output.ledger).unwrap()
    );
}

const TAGS: [&str; 14] = [
    "util-room",
    "util-ladder1",
    "util-ladder2",
    "task-wires",
    "task-toilet",
    "task-towels1",
    "task-towels3",
    "task-fuel1",
    "task-fuel2",
    "task-records2",
    "task-garbage2",
    "task-swipe",
    "task-divert2",
    "util-vent1",
];

proptest! {
    #[test]
    fn ledgers_agree_for_any_document(picks in prop::collection::vec(0..TAGS.len(), 0..40)) {
        let mut doc = Document::new("generated", "Generated");
        for (i, pick) in picks.iter().enumerate() {
            doc.push(element(TAGS[*pick], &format!("e{i}")));
        }
        let a = build(&doc);
        let b = build(&doc);
        prop_assert_eq!(a.output.ledger, b.output.ledger);
        prop_assert_eq!(a.output.artifacts.task_counts, b.output.artifacts.task_counts);
    }
}

// ---------------------------------------------------------------------------
// counting
// ---------------------------------------------------------------------------

#[test]
fn counter_tag_count_is_published() {
    let mut doc = Document::new("d", "Doc");
    for i in 0..5 {
        doc.push(element("task-breakers", &format!("Breaker {i}")));
        doc.push(element("util-vent1", &format!("Vent {i}")));
    }
    let built = build(&doc);
    assert_eq!(built.output.artifacts.task_counts.breakers(), 5);
}

#[test]
fn fuel_outputs_embed_their_id_in_the_step() {
    let mut doc = Document::new("d", "Doc");
    doc.push(element("task-fuel1", "Tank"));
    let out0 = doc.push(element("task-fuel2", "Engine A"));
    let out1 = doc.push(element("task-fuel2", "Engine B"));
    let built = build(&doc);

    assert_eq!(built.output.artifacts.task_counts.fuel(), 2);
    let step_of = |id: ElementId| {
        let node = built.output.placeholder(id).unwrap();
        let components = &built.scene.get(node).unwrap().components;
        components.console.as_ref().unwrap().valid_tasks[0].step.min
    };
    assert_eq!(step_of(out0), 1);
    assert_eq!(step_of(out1), 3);
}

// ---------------------------------------------------------------------------
// rooms
// ---------------------------------------------------------------------------

#[test]
fn rooms_numbered_in_document_order() {
    let mut doc = Document::new("d", "Doc");
    let a = doc.push(element("util-room", "A"));
    doc.push(element("task-swipe", "Swipe"));
    let b = doc.push(element("util-room", "B"));
    doc.push(element("util-ladder2", "Ladder"));
    let c = doc.push(element("util-room", "C"));
    let built = build(&doc);

    let ledger = &built.output.ledger;
    assert_eq!(ledger.room_id(a), Some(RoomId(0)));
    assert_eq!(ledger.room_id(b), Some(RoomId(1)));
    assert_eq!(ledger.room_id(c), Some(RoomId(2)));
    assert_eq!(built.ship.all_rooms.len(), 3);
    assert_eq!(
        built.ship.fast_rooms.get(&RoomId(1)),
        built.output.placeholder(b).as_ref()
    );
}

#[test]
fn consoles_record_their_parent_room() {
    let mut doc = Document::new("d", "Doc");
    doc.push(element("util-room", "Cafeteria"));
    let admin = doc.push(element("util-room", "Admin"));
    let swipe = doc.push(element("task-swipe", "Swipe").with_parent(admin));
    let loose = doc.push(element("task-garbage1", "Chute"));
    let built = build(&doc);

    let room_of = |id: ElementId| {
        let node = built.output.placeholder(id).unwrap();
        let components = &built.scene.get(node).unwrap().components;
        components.console.as_ref().unwrap().room
    };
    assert_eq!(room_of(swipe), RoomId(1));
    assert_eq!(room_of(loose), RoomId::DEFAULT);
}

// ---------------------------------------------------------------------------
// divert
// ---------------------------------------------------------------------------

#[test]
fn divert_creates_one_task_per_target() {
    let mut doc = Document::new("d", "Doc");
    let cafeteria = doc.push(element("util-room", "Cafeteria"));
    let weapons = doc.push(element("util-room", "Weapons"));
    let shields = doc.push(element("util-room", "Shields"));
    doc.push(element("task-divert2", "Target A").with_parent(shields));
    doc.push(element("task-divert1", "Electrical").with_parent(cafeteria));
    doc.push(element("task-divert2", "Target B").with_parent(weapons));
    doc.push(element("task-divert2", "Target C"));
    let built = build(&doc);

    assert_eq!(
        built.output.artifacts.divert_targets,
        vec![RoomId(2), RoomId(1), RoomId::DEFAULT]
    );
    let divert_tasks: Vec<_> = built
        .ship
        .short_tasks
        .iter()
        .filter_map(|n| built.scene.get(*n)?.components.task.clone())
        .filter(|t| matches!(t.kind, TaskKind::Divert { .. }))
        .collect();
    assert_eq!(divert_tasks.len(), 3);
    assert!(divert_tasks.iter().all(|t| t.start_at == RoomId(0)));
}

// ---------------------------------------------------------------------------
// ladders
// ---------------------------------------------------------------------------

#[test]
fn single_ladder_links_two_endpoints() {
    let mut doc = Document::new("d", "Doc");
    let ladder = doc.push(element("util-ladder1", "Ladder"));
    let built = build(&doc);

    let registry = &built.output.artifacts.ladders;
    assert_eq!(registry.len(), 2);
    let top = *registry.get(LadderId(0)).unwrap();
    let bottom = *registry.get(LadderId(1)).unwrap();
    assert!(top.is_top);
    assert!(!bottom.is_top);
    assert_eq!(top.destination, bottom.node);
    assert_eq!(bottom.destination, top.node);
    assert_eq!(
        built.output.ledger.for_element(ladder),
        vec![AssignedId::LadderPair {
            top: LadderId(0),
            bottom: LadderId(1)
        }]
    );

    let top_node = built.scene.get(top.node).unwrap();
    assert!((top_node.transform.position.y - 2.6).abs() < 1e-5);
    assert!(top_node.components.colliders[0].is_trigger);
    let bottom_node = built.scene.get(bottom.node).unwrap();
    assert!((bottom_node.transform.position.y + 3.4).abs() < 1e-5);
}

#[test]
fn ladder_height_override() {
    let mut doc = Document::new("d", "Doc");
    let mut short = element("util-ladder2", "Short");
    short.properties.ladder_height = Some(2.0);
    doc.push(element("util-ladder2", "Default"));
    doc.push(short);
    let built = build(&doc);

    let registry = &built.output.artifacts.ladders;
    let default_top = built.scene.get(registry.get(LadderId(0)).unwrap().node).unwrap();
    let override_top = built.scene.get(registry.get(LadderId(2)).unwrap().node).unwrap();
    assert!((default_top.transform.position.y - 1.1).abs() < 1e-5);
    assert!((override_top.transform.position.y - 1.6).abs() < 1e-5);
}

#[test]
fn unknown_ladder_id_is_not_found() {
    let mut doc = Document::new("d", "Doc");
    doc.push(element("util-ladder1", "Ladder"));
    let built = build(&doc);
    assert!(built.output.artifacts.ladders.get(LadderId(200)).is_none());
}

#[derive(Default)]
struct Climbs(Vec<(LadderId, u8)>);

impl LadderClimber for Climbs {
    fn climb(&mut self, ladder: &RegisteredLadder, sequence: u8) {
        self.0.push((ladder.id, sequence));
    }
}

#[test]
fn climb_message_routes_to_built_ladder() {
    let mut doc = Document::new("d", "Doc");
    doc.push(element("util-ladder1", "A"));
    doc.push(element("util-ladder2", "B"));
    let built = build(&doc);
    let ladders = &built.output.artifacts.ladders;

    let mut climbs = Climbs::default();
    assert_eq!(
        dispatch(CLIMB_LADDER, &[3, 9], Some(ladders), &mut climbs),
        RpcOutcome::Handled
    );
    assert_eq!(
        dispatch(CLIMB_LADDER, &[4, 0], Some(ladders), &mut climbs),
        RpcOutcome::Unhandled
    );
    assert_eq!(climbs.0, vec![(LadderId(3), 9)]);
}

// ---------------------------------------------------------------------------
// task minimums
// ---------------------------------------------------------------------------

#[test]
fn no_long_tasks_warns_with_minimum() {
    let mut doc = Document::new("d", "Doc");
    for tag in ["task-swipe", "task-wires", "task-toilet", "task-breakers", "task-align1"] {
        doc.push(element(tag, tag));
    }
    let built = build(&doc);

    assert!(built.ship.long_tasks.is_empty());
    assert!(built.output.log.any(|k| matches!(
        k,
        BuildEventKind::BelowMinimumTasks {
            length: TaskLength::Long,
            required: 1,
            actual: 0
        }
    )));
    assert!(!built.output.log.any(|k| matches!(
        k,
        BuildEventKind::BelowMinimumTasks {
            length: TaskLength::Short,
            ..
        }
    )));
}

#[test]
fn minimums_follow_config() {
    let doc = Document::new("d", "Doc");
    let built = build_with(
        &doc,
        &TemplateCatalog::builtin(),
        BuildConfig::default().with_task_minimums(0, 0, 0),
    );
    assert!(built.output.log.is_empty());
}

// ---------------------------------------------------------------------------
// minimap
// ---------------------------------------------------------------------------

fn icon_element(name: &str, restricted: bool) -> Element {
    element("util-minimapsprite", name)
        .at(4.0, -2.0)
        .with_properties(ElementProperties {
            sprite_data: Some("data:image/png;base64,AAAA".into()),
            impostor_only: Some(restricted),
            ..Default::default()
        })
}

#[test]
fn icons_split_by_overlay_and_attach_later() {
    let mut doc = Document::new("d", "Doc");
    let open = doc.push(icon_element("Open", false));
    doc.push(icon_element("Secret", true));
    let mut built = build(&doc);
    let layers = built.ship.minimap.unwrap();

    assert_eq!(built.output.artifacts.restricted_icons, 1);
    assert_eq!(built.scene.children(layers.task_overlay).len(), 1);
    assert_eq!(built.scene.children(layers.infected_overlay).len(), 1);

    let source = built.output.placeholder(open).unwrap();
    built
        .scene
        .node_mut(source)
        .unwrap()
        .components
        .sprite
        .as_mut()
        .unwrap()
        .sprite = Some(SpriteRef::Custom(open));

    let icons = &mut built.output.artifacts.icons;
    assert_eq!(
        icons.on_sprite_loaded(&mut built.scene, open),
        AttachOutcome::Attached
    );
    assert!(!built.scene.is_alive(source));
    let icon = built.scene.children(layers.task_overlay)[0];
    let icon = built.scene.get(icon).unwrap();
    assert_eq!(
        icon.components.sprite.as_ref().unwrap().sprite,
        Some(SpriteRef::Custom(open))
    );
    assert_eq!(icon.transform.position.x, 4.0);
}

#[test]
fn icon_without_sprite_warns() {
    let mut doc = Document::new("d", "Doc");
    let bare = doc.push(element("util-minimapsprite", "Bare"));
    let built = build(&doc);
    assert!(
        built
            .output
            .log
            .any(|k| *k == BuildEventKind::MissingSprite)
    );
    assert!(!built.output.artifacts.icons.is_pending(bare));
}

#[test]
fn icon_without_loader_warns() {
    let mut doc = Document::new("d", "Doc");
    let id = doc.push(icon_element("Icon", false));
    let catalog = TemplateCatalog::builtin().with_async_loads(false);
    let built = build_with(&doc, &catalog, BuildConfig::default());
    assert!(
        built
            .output
            .log
            .any(|k| *k == BuildEventKind::AssetLoaderUnavailable)
    );
    assert!(!built.output.artifacts.icons.is_pending(id));
}

#[test]
fn icon_attach_after_teardown_is_ignored() {
    let mut doc = Document::new("d", "Doc");
    let id = doc.push(icon_element("Icon", false));
    let mut built = build(&doc);
    let layers = built.ship.minimap.unwrap();
    built.scene.destroy(layers.task_overlay).unwrap();
    assert_eq!(
        built
            .output
            .artifacts
            .icons
            .on_sprite_loaded(&mut built.scene, id),
        AttachOutcome::IconGone
    );
}

#[test]
fn minimap_without_overlays_is_fatal() {
    let mut doc = Document::new("d", "Doc");
    doc.push(icon_element("Icon", false));
    let mut scene = Scene::new();
    let mut ship = ShipState::new(scene.spawn("Ship"));
    let catalog = TemplateCatalog::builtin();
    let result = BuildPipeline::new(BuildConfig::default()).run(BuildInput {
        document: &doc,
        scene: &mut scene,
        ship: Some(&mut ship),
        resolver: &catalog,
    });
    assert!(matches!(result, Err(mw_build::BuildError::MissingMinimap)));
}

// ---------------------------------------------------------------------------
// task initialisation
// ---------------------------------------------------------------------------

#[test]
fn initializer_sizes_breakers_from_build() {
    let mut doc = Document::new("d", "Doc");
    for i in 0..4 {
        doc.push(element("task-breakers", &format!("Breaker {i}")));
    }
    let mut built = build(&doc);
    let mut init = TaskInitializer::new(&built.output.artifacts, 42);
    assert_eq!(init.initialize_all(&mut built.scene, &built.ship), 1);

    let node = built.ship.short_tasks[0];
    let components = &built.scene.get(node).unwrap().components;
    let task = components.task.clone().unwrap();
    assert_eq!(task.task_type, TaskType::ResetBreakers);
    assert_eq!(task.max_step, 4);
    assert_eq!(task.data.len(), 4);
}

#[test]
fn initializer_reads_divert_and_records_from_build() {
    let mut doc = Document::new("d", "Doc");
    let cafeteria = doc.push(element("util-room", "Cafeteria"));
    let storage = doc.push(element("util-room", "Storage"));
    doc.push(element("task-divert2", "Target A").with_parent(storage));
    doc.push(element("task-divert2", "Target B").with_parent(cafeteria));
    doc.push(element("task-records1", "Desk"));
    for i in 0..3 {
        doc.push(element("task-records2", &format!("Shelf {i}")));
    }
    let built = build(&doc);

    let mut init = TaskInitializer::new(&built.output.artifacts, 5);
    assert_eq!(init.divert_slider_order(), &[RoomId(1), RoomId(0)]);
    assert_eq!(built.output.artifacts.task_counts.records(), 4);
    for _ in 0..20 {
        assert!((1..4).contains(&init.records_folder()));
    }
}
