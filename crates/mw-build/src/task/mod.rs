//! Consoles, console ids and task entities.

mod counters;
mod rules;

use std::collections::BTreeSet;

use log::{debug, info};
use mw_core::component::{
    Button, Console, ConsoleId, ConsoleVariant, MedScanner, PlayerTask, RoomId, TaskKind,
};
use mw_core::{Element, ElementKind, NodeId, TaskLength};

use crate::builder::{BuildItem, Builder};
use crate::context::BuildContext;
use crate::diagnostics::BuildEventKind;
use crate::error::BuildResult;
use crate::ledger::AssignedId;
use crate::pipeline::BuildArtifacts;
use crate::resolver::TaskTemplate;

pub use counters::{CounterKey, TagCounters, TaskCounts};
pub use rules::{ConsoleRule, FIXED_CONSOLE_IDS, IdSource, TOWEL_SINK_TAG, ValidTasks, rule_for};

/// Tag whose single task fans out into one divert task per target.
pub const DIVERT_SOURCE_TAG: &str = "task-divert1";
/// Tag of the divert targets scanned for across the whole document.
pub const DIVERT_TARGET_TAG: &str = "task-divert2";
/// Tag of the medical scanner.
pub const SCANNER_TAG: &str = "task-medscan";
const NODE_TAG: &str = "task-node";
const WIRES_TAG: &str = "task-wires";
const ARMS_TAGS: [&str; 2] = ["task-pistols1", "task-rifles1"];

/// Builds consoles for every `task-*` element and one task entity per tag.
#[derive(Debug, Default)]
pub struct TaskBuilder {
    container: Option<NodeId>,
    global_id: u8,
    counters: TagCounters,
    built_tags: BTreeSet<String>,
    wires_task: Option<NodeId>,
    divert_targets: Vec<RoomId>,
    published: TaskCounts,
}

impl TaskBuilder {
    /// A builder with every counter at its initial value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a per-tag counter.
    pub fn counter(&self, key: CounterKey) -> u8 {
        self.counters.peek(key)
    }

    /// Counts published by the last finalize.
    pub fn published(&self) -> &TaskCounts {
        &self.published
    }

    /// Target rooms recorded for the divert tasks.
    pub fn divert_targets(&self) -> &[RoomId] {
        &self.divert_targets
    }

    fn console_id(&mut self, source: IdSource, sink: u8) -> u8 {
        match source {
            IdSource::Fixed(id) => id,
            IdSource::Sink => sink,
            IdSource::Counter(key) => self.counters.take(key),
            IdSource::PeekGlobal => self.global_id,
            IdSource::Global => {
                let id = self.global_id;
                self.global_id = self.global_id.wrapping_add(1);
                id
            }
        }
    }

    fn container(&mut self, ctx: &mut BuildContext<'_>) -> BuildResult<NodeId> {
        if let Some(container) = self.container {
            return Ok(container);
        }
        let root = ctx.ship(self.name())?.root;
        let container = ctx.scene.spawn_child(root, "Tasks")?;
        self.container = Some(container);
        Ok(container)
    }

    fn build_divert_tasks(
        &mut self,
        element: &Element,
        template: &TaskTemplate,
        start_at: RoomId,
        ctx: &mut BuildContext<'_>,
    ) -> BuildResult<()> {
        let container = self.container(ctx)?;
        let targets: Vec<RoomId> = ctx
            .document
            .elements_tagged(DIVERT_TARGET_TAG)
            .map(|target| ctx.rooms.parent_room_or_default(target))
            .collect();

        for target in &targets {
            spawn_task(
                ctx,
                container,
                element,
                template,
                TaskKind::Divert { target: *target },
                start_at,
            )?;
        }
        debug!("{} divert targets for {element}", targets.len());
        self.divert_targets = targets;
        Ok(())
    }
}

/// Spawn a task entity under `container` and hand it to the ship.
fn spawn_task(
    ctx: &mut BuildContext<'_>,
    container: NodeId,
    element: &Element,
    template: &TaskTemplate,
    kind: TaskKind,
    start_at: RoomId,
) -> BuildResult<NodeId> {
    let holder = ctx.scene.spawn_child(container, element.name.clone())?;
    let arrow = if template.has_arrow {
        let arrow = ctx.scene.spawn_child(holder, "Arrow")?;
        ctx.scene.node_mut(arrow)?.active = false;
        Some(arrow)
    } else {
        None
    };

    let length = element.properties.task_length.unwrap_or(template.length);
    ctx.scene.node_mut(holder)?.components.task = Some(PlayerTask {
        task_type: template.task_type.clone(),
        kind,
        length,
        start_at,
        task_step: template.task_step,
        max_step: template.max_step,
        arrow_suspended: template.arrow_suspended,
        show_task_timer: template.show_task_timer,
        show_task_step: template.show_task_step,
        task_timer: template.task_timer,
        timer_started: template.timer_started,
        minigame: template.minigame.clone(),
        arrow,
        data: Vec::new(),
    });
    ctx.ship("task")?.add_task(length, holder);
    Ok(holder)
}

/// The console variant for a tag, copying specialized fields from the template.
fn console_variant(tag: &str, template: &ConsoleVariant) -> ConsoleVariant {
    let is_arms = ARMS_TAGS.contains(&tag);
    let is_towel = tag.starts_with("task-towels") && tag != TOWEL_SINK_TAG;
    match template {
        ConsoleVariant::Arms { .. } if is_arms => template.clone(),
        ConsoleVariant::Towel { .. } if is_towel => template.clone(),
        _ if is_arms => ConsoleVariant::Arms {
            times_used: 0,
            images: Vec::new(),
            use_sound: None,
            uses_per_step: 0,
        },
        _ if is_towel => ConsoleVariant::Towel { use_sound: None },
        _ => ConsoleVariant::Generic,
    }
}

impl Builder for TaskBuilder {
    fn name(&self) -> &'static str {
        "task"
    }

    fn owns(&self, kind: ElementKind) -> bool {
        kind == ElementKind::Task
    }

    fn build(&mut self, item: &BuildItem<'_>, ctx: &mut BuildContext<'_>) -> BuildResult<()> {
        if !self.owns(item.kind) {
            return Ok(());
        }
        let element = item.element;
        let tag = element.type_tag.as_str();
        let placeholder = item.placeholder;

        ctx.ship(self.name())?;
        self.container(ctx)?;

        let resolver = ctx.resolver;
        let Some(template) = resolver.template(tag) else {
            ctx.warn(
                element.id,
                BuildEventKind::MissingTemplate {
                    tag: tag.to_string(),
                },
                format!("no template for {tag}, task skipped"),
            );
            return Ok(());
        };
        ctx.default_sprite(placeholder, template)?;

        let room = ctx.rooms.parent_room_or_default(element);
        let console_template = template.console.clone().unwrap_or_default();

        // Console id
        let rule = rule_for(tag);
        let console_id = self.console_id(rule.id, ctx.config.sink_console_id);
        let valid_tasks = rule.valid_tasks.apply(
            &console_template.valid_tasks,
            console_id,
            ctx.config.fuel_step_variants,
        );
        let props = &element.properties;
        let console = Console {
            console_id: ConsoleId(console_id),
            variant: console_variant(tag, &console_template.variant),
            image: Some(placeholder),
            only_from_below: props.only_from_below(),
            usable_distance: props.range_or_default(),
            room,
            task_types: console_template.task_types,
            valid_tasks,
            allow_impostor: false,
            check_walls: props.check_collision(),
        };
        ctx.scene.node_mut(placeholder)?.components.console = Some(console);
        ctx.record(
            element.id,
            AssignedId::Console {
                console: ConsoleId(console_id),
            },
        );

        // Colliders and button
        ctx.default_colliders(placeholder, template)?;
        if template.button {
            let node = ctx.scene.node_mut(placeholder)?;
            node.components.button = Some(Button {
                has_click_mask: !node.components.colliders.is_empty(),
            });
        }

        // Task entity, once per tag
        let first_of_tag = self.built_tags.insert(tag.to_string());
        let task = template.task.as_ref().filter(|_| first_of_tag);
        if let Some(task) = task {
            info!("adding task for {element}");
            if tag == DIVERT_SOURCE_TAG {
                self.build_divert_tasks(element, task, room, ctx)?;
            } else {
                if let Some(description) = props.description() {
                    ctx.ship(self.name())?
                        .task_names
                        .insert(task.task_type.clone(), description.to_string());
                }
                let kind = if tag == NODE_TAG {
                    TaskKind::WeatherNode {
                        node_id: ConsoleId(console_id),
                        stage2_minigame: task.stage2_minigame.clone(),
                    }
                } else {
                    TaskKind::Normal
                };
                let container = self.container(ctx)?;
                let holder = spawn_task(ctx, container, element, task, kind, room)?;
                if tag == WIRES_TAG {
                    self.wires_task = Some(holder);
                }
            }
        }

        // Scanner
        if tag == SCANNER_TAG {
            ctx.scene.node_mut(placeholder)?.components.scanner = Some(MedScanner);
            let ship = ctx.ship(self.name())?;
            if ship.scanner.is_some() {
                ctx.warn(
                    element.id,
                    BuildEventKind::DuplicateScanner,
                    "only one med scanner can be used per map",
                );
            } else {
                ship.scanner = Some(placeholder);
            }
        }

        debug!("console {console_id} for {element}");
        Ok(())
    }

    fn post_build(&mut self, ctx: &mut BuildContext<'_>) -> BuildResult<()> {
        self.published = self.counters.publish_and_reset();

        if let Some(wires) = self.wires_task.take() {
            let ceiling = self.published.wires().min(ctx.config.wires_step_ceiling);
            if let Some(task) = ctx
                .scene
                .get_mut(wires)
                .and_then(|n| n.components.task.as_mut())
            {
                task.max_step = i32::from(ceiling);
            }
        }

        let Some(ship) = ctx.ship.as_deref() else {
            return Ok(());
        };
        let shortfalls: Vec<(TaskLength, usize, usize)> = [
            (TaskLength::Short, ctx.config.min_short_tasks),
            (TaskLength::Common, ctx.config.min_common_tasks),
            (TaskLength::Long, ctx.config.min_long_tasks),
        ]
        .into_iter()
        .map(|(length, required)| (length, required, ship.tasks(length).len()))
        .filter(|(_, required, actual)| actual < required)
        .collect();

        for (length, required, actual) in shortfalls {
            ctx.log.warn(
                None,
                BuildEventKind::BelowMinimumTasks {
                    length,
                    required,
                    actual,
                },
                format!("freeplay requires {required} {length} tasks (currently has {actual})"),
            );
        }
        Ok(())
    }

    fn publish(self: Box<Self>, artifacts: &mut BuildArtifacts) {
        artifacts.task_counts = self.published;
        artifacts.divert_targets = self.divert_targets;
        artifacts.task_container = self.container;
    }
}
