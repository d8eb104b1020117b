//! The content resolver collaborator and its template data.
//!
//! A template is the static content behind a type tag: the default sprite,
//! colliders, console wiring and task definition. The pipeline never
//! invents this data; it copies it from whatever resolver the host supplies.

use std::collections::BTreeMap;

use mw_core::component::{
    ColliderShape, ConsoleVariant, SpriteRef, SpriteRenderer, StepRange, TaskSet, TaskType,
};
use mw_core::node::{LocalTransform, Vec3};
use mw_core::{CoreResult, Element, NodeId, Scene, TaskLength};
use serde::{Deserialize, Serialize};

/// Console wiring copied onto every console built from a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsoleTemplate {
    /// Task types the console serves.
    #[serde(default)]
    pub task_types: Vec<TaskType>,
    /// (task type, step) pairs the console accepts.
    #[serde(default)]
    pub valid_tasks: Vec<TaskSet>,
    /// Specialized behaviour, copied field by field.
    #[serde(default)]
    pub variant: ConsoleVariant,
}

/// Task definition copied onto the task entity built for a tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskTemplate {
    /// What the task is.
    pub task_type: TaskType,
    /// Classification used when the element has no override.
    pub length: TaskLength,
    /// Starting step.
    pub task_step: i32,
    /// Steps to complete. The wiring task is clamped after the build.
    pub max_step: i32,
    /// Start with the arrow hidden.
    pub arrow_suspended: bool,
    /// Show a countdown in the task list.
    pub show_task_timer: bool,
    /// Show `step/max` in the task list.
    pub show_task_step: bool,
    /// Countdown length in seconds.
    pub task_timer: f32,
    /// Start with the countdown running.
    pub timer_started: bool,
    /// Minigame the consoles open.
    pub minigame: Option<String>,
    /// Whether the task points players at its console with an arrow.
    pub has_arrow: bool,
    /// Second-stage minigame for weather node tasks.
    pub stage2_minigame: Option<String>,
}

impl Default for TaskTemplate {
    fn default() -> Self {
        Self {
            task_type: TaskType::Other(String::new()),
            length: TaskLength::Short,
            task_step: 0,
            max_step: 1,
            arrow_suspended: false,
            show_task_timer: false,
            show_task_step: false,
            task_timer: 0.0,
            timer_started: false,
            minigame: None,
            has_arrow: true,
            stage2_minigame: None,
        }
    }
}

/// Use sounds for each ladder end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LadderTemplate {
    /// Played when climbing down from the top.
    pub top_use_sound: Option<String>,
    /// Played when climbing up from the bottom.
    pub bottom_use_sound: Option<String>,
}

/// Static content for one type tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Template {
    /// Sprite used when the element has no custom visual.
    pub sprite: Option<SpriteRef>,
    /// Colliders used when the placeholder has none.
    pub colliders: Vec<ColliderShape>,
    /// Console wiring for `task-*` tags.
    pub console: Option<ConsoleTemplate>,
    /// Whether consoles of this tag are clickable.
    pub button: bool,
    /// Present only on tags that own a task entity.
    pub task: Option<TaskTemplate>,
    /// Required on ladder tags.
    pub ladder: Option<LadderTemplate>,
}

/// Supplies templates and placeholders for document elements.
pub trait ContentResolver: std::fmt::Debug {
    /// The template for a tag, or `None` for unrecognized tags.
    fn template(&self, tag: &str) -> Option<&Template>;

    /// Whether asynchronously loaded visuals will be delivered later.
    fn loads_async(&self) -> bool {
        true
    }

    /// Create the placeholder node for an element under `parent`.
    ///
    /// The default places the element's transform on a bare node and, when
    /// the element carries custom sprite data, an empty sprite renderer that
    /// the async loader fills in later.
    fn spawn_placeholder(
        &self,
        scene: &mut Scene,
        parent: NodeId,
        element: &Element,
    ) -> CoreResult<NodeId> {
        let id = scene.spawn_child(parent, element.name.clone())?;
        let node = scene.node_mut(id)?;
        node.transform = LocalTransform {
            position: Vec3::new(element.x, element.y, element.z),
            scale: Vec3::new(element.x_scale, element.y_scale, 1.0),
            rotation: element.rotation,
        };
        if element.properties.sprite_data.is_some() {
            node.components.sprite = Some(SpriteRenderer::default());
        }
        Ok(id)
    }
}

/// A resolver backed by an in-memory tag → template map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateCatalog {
    #[serde(default = "default_true")]
    loads_async: bool,
    templates: BTreeMap<String, Template>,
}

fn default_true() -> bool {
    true
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self {
            loads_async: true,
            templates: BTreeMap::new(),
        }
    }

    /// Load a catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Add or replace the template for a tag.
    pub fn insert(&mut self, tag: impl Into<String>, template: Template) {
        self.templates.insert(tag.into(), template);
    }

    /// Builder-style [`TemplateCatalog::insert`].
    pub fn with(mut self, tag: impl Into<String>, template: Template) -> Self {
        self.insert(tag, template);
        self
    }

    /// Set whether async visuals will be delivered.
    pub fn with_async_loads(mut self, enabled: bool) -> Self {
        self.loads_async = enabled;
        self
    }

    /// Remove the template for a tag.
    pub fn remove(&mut self, tag: &str) -> Option<Template> {
        self.templates.remove(tag)
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns `true` if there are no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Templates for the stock task, ladder and console tags.
    pub fn builtin() -> Self {
        use TaskLength::{Common, Long, Short};
        use TaskType::*;

        let mut catalog = Self::new();

        // Ladders
        for tag in ["util-ladder1", "util-ladder2"] {
            catalog.insert(
                tag,
                Template {
                    sprite: Some(SpriteRef::Template(tag.to_string())),
                    ladder: Some(LadderTemplate {
                        top_use_sound: Some("ladder-climb".into()),
                        bottom_use_sound: Some("ladder-climb".into()),
                    }),
                    ..Default::default()
                },
            );
        }

        // Tags that own a task entity
        let primary = [
            ("task-wires", FixWiring, Common, 3),
            ("task-swipe", Other("swipe_card".into()), Common, 1),
            ("task-breakers", ResetBreakers, Short, 1),
            ("task-toilet", CleanToilet, Short, 1),
            ("task-towels1", PickUpTowels, Short, 1),
            ("task-align1", AlignEngineOutput, Short, 1),
            ("task-divert1", DivertPower, Short, 2),
            ("task-records1", SortRecords, Short, 1),
            ("task-fans1", Other("start_fans".into()), Short, 2),
            ("task-pistols1", StoreArmsTask, Short, 2),
            ("task-rifles1", StoreArmsTask, Short, 2),
            ("task-garbage1", EmptyGarbage, Long, 2),
            ("task-node", FixWeatherNode, Long, 2),
            ("task-waterwheel1", OpenWaterways, Long, 3),
            ("task-waterjug1", ReplaceWaterJug, Long, 2),
            ("task-fuel1", FuelEngines, Long, 2),
            ("task-medscan", SubmitScan, Long, 1),
        ];
        for (tag, task_type, length, max_step) in primary {
            let mut template = console_template(tag, task_type.clone());
            template.task = Some(TaskTemplate {
                task_type,
                length,
                max_step,
                minigame: Some(format!("{tag}-minigame")),
                stage2_minigame: (tag == "task-node").then(|| "task-node-stage2".to_string()),
                ..Default::default()
            });
            catalog.insert(tag, template);
        }

        // Console-only tags that serve another tag's task
        let secondary = [
            ("task-garbage2", EmptyGarbage),
            ("task-garbage3", EmptyGarbage),
            ("task-garbage4", EmptyGarbage),
            ("task-fans2", Other("start_fans".into())),
            ("task-records2", SortRecords),
            ("task-pistols2", StoreArmsTask),
            ("task-divert2", DivertPower),
            ("task-fuel2", FuelEngines),
            ("task-waterjug2", ReplaceWaterJug),
            ("task-waterwheel2", OpenWaterways),
            ("task-towels2", PickUpTowels),
            ("task-towels3", PickUpTowels),
            ("task-towels4", PickUpTowels),
            ("task-towels5", PickUpTowels),
        ];
        for (tag, task_type) in secondary {
            catalog.insert(tag, console_template(tag, task_type));
        }

        // Specialized console variants
        for tag in ["task-pistols1", "task-rifles1"] {
            if let Some(console) = catalog
                .templates
                .get_mut(tag)
                .and_then(|t| t.console.as_mut())
            {
                console.variant = ConsoleVariant::Arms {
                    times_used: 0,
                    images: vec![SpriteRef::Template(format!("{tag}-open"))],
                    use_sound: Some("weapon-store".into()),
                    uses_per_step: 3,
                };
            }
        }
        for n in 2..=5 {
            let tag = format!("task-towels{n}");
            if let Some(console) = catalog
                .templates
                .get_mut(&tag)
                .and_then(|t| t.console.as_mut())
            {
                console.variant = ConsoleVariant::Towel {
                    use_sound: Some("towel-pickup".into()),
                };
            }
        }

        catalog
    }
}

fn console_template(tag: &str, task_type: TaskType) -> Template {
    Template {
        sprite: Some(SpriteRef::Template(tag.to_string())),
        colliders: vec![ColliderShape::Box {
            width: 1.0,
            height: 1.0,
        }],
        console: Some(ConsoleTemplate {
            task_types: vec![task_type.clone()],
            valid_tasks: vec![TaskSet {
                task_type,
                step: StepRange::single(0),
            }],
            variant: ConsoleVariant::Generic,
        }),
        button: true,
        task: None,
        ladder: None,
    }
}

impl ContentResolver for TemplateCatalog {
    fn template(&self, tag: &str) -> Option<&Template> {
        self.templates.get(tag)
    }

    fn loads_async(&self) -> bool {
        self.loads_async
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_task_and_console_tags() {
        let catalog = TemplateCatalog::builtin();
        assert!(catalog.template("task-wires").unwrap().task.is_some());
        assert!(catalog.template("task-divert2").unwrap().task.is_none());
        assert!(catalog.template("task-divert2").unwrap().console.is_some());
        assert!(catalog.template("util-ladder1").unwrap().ladder.is_some());
        assert!(catalog.template("task-unknown").is_none());
    }

    #[test]
    fn builtin_console_variants() {
        let catalog = TemplateCatalog::builtin();
        let arms = &catalog.template("task-rifles1").unwrap().console;
        assert!(matches!(
            arms.as_ref().unwrap().variant,
            ConsoleVariant::Arms { .. }
        ));
        let towel = &catalog.template("task-towels3").unwrap().console;
        assert!(matches!(
            towel.as_ref().unwrap().variant,
            ConsoleVariant::Towel { .. }
        ));
        let plain = &catalog.template("task-towels1").unwrap().console;
        assert_eq!(plain.as_ref().unwrap().variant, ConsoleVariant::Generic);
    }

    #[test]
    fn catalog_from_json() {
        let json = r#"{
            "templates": {
                "task-custom": {
                    "console": { "task_types": ["fix_wiring"] },
                    "task": { "task_type": "fix_wiring", "length": "Long" }
                }
            }
        }"#;
        let catalog = TemplateCatalog::from_json(json).unwrap();
        assert!(catalog.loads_async());
        let task = catalog.template("task-custom").unwrap().task.as_ref().unwrap();
        assert_eq!(task.length, TaskLength::Long);
        assert_eq!(task.max_step, 1);
    }

    #[test]
    fn default_placeholder_copies_transform() {
        let mut scene = Scene::new();
        let root = scene.spawn("Map");
        let mut element = Element::new("util-vent1", "Vent").at(2.0, -1.0);
        element.x_scale = 2.0;
        let catalog = TemplateCatalog::new();
        let id = catalog
            .spawn_placeholder(&mut scene, root, &element)
            .unwrap();
        let node = scene.get(id).unwrap();
        assert_eq!(node.name, "Vent");
        assert_eq!(node.transform.position, Vec3::new(2.0, -1.0, 0.0));
        assert_eq!(node.transform.scale.x, 2.0);
        assert!(node.components.sprite.is_none());
    }
}
