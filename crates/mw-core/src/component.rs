use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::ElementId;
use crate::node::NodeId;
use crate::properties::TaskLength;

/// The set of typed components attached to a node.
/// A node may hold any combination; builders only add what they own.
#[derive(Debug, Clone, Default)]
pub struct ComponentSet {
    /// Visual.
    pub sprite: Option<SpriteRenderer>,
    /// Collision shapes, in template order.
    pub colliders: Vec<Collider>,
    /// Room area marker.
    pub room: Option<RoomComponent>,
    /// Task console.
    pub console: Option<Console>,
    /// Click target for the console on the same node.
    pub button: Option<Button>,
    /// One end of a ladder.
    pub ladder: Option<LadderEndpoint>,
    /// Task entity data.
    pub task: Option<PlayerTask>,
    /// Minimap icon marker.
    pub minimap_icon: Option<MinimapIcon>,
    /// Medical scanner marker.
    pub scanner: Option<MedScanner>,
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Identifier of a room. Assigned sequentially from 0 in document order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u32);

impl RoomId {
    /// Room used when an element has no parent room.
    pub const DEFAULT: Self = Self(0);
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room:{}", self.0)
    }
}

/// Network-addressable console identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsoleId(pub u8);

impl fmt::Display for ConsoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "console:{}", self.0)
    }
}

/// Network-addressable ladder endpoint identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LadderId(pub u8);

impl fmt::Display for LadderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ladder:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Visuals and collision
// ---------------------------------------------------------------------------

/// Where a sprite's image comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpriteRef {
    /// Built-in image named by the content resolver.
    Template(String),
    /// Custom image decoded from an element's sprite data.
    Custom(ElementId),
}

/// RGBA color, each channel 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Alpha.
    pub a: f32,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Draws a sprite at the node's transform.
///
/// `sprite` is `None` while an asynchronously resolved image is still loading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpriteRenderer {
    /// Image to draw, once known.
    pub sprite: Option<SpriteRef>,
    /// Tint.
    pub color: Color,
}

/// Collider geometry in node-local units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ColliderShape {
    /// Axis-aligned box.
    Box {
        /// Full width.
        width: f32,
        /// Full height.
        height: f32,
    },
    /// Circle centered on the node.
    Circle {
        /// Radius.
        radius: f32,
    },
    /// Closed polygon.
    Polygon {
        /// Vertices in order.
        points: Vec<(f32, f32)>,
    },
}

/// A collider attached to a node.
#[derive(Debug, Clone, PartialEq)]
pub struct Collider {
    /// Geometry.
    pub shape: ColliderShape,
    /// Triggers report overlap but do not block movement.
    pub is_trigger: bool,
}

// ---------------------------------------------------------------------------
// Rooms
// ---------------------------------------------------------------------------

/// Marks a node's collider as the area of a room.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomComponent {
    /// Id assigned to the room.
    pub room_id: RoomId,
}

// ---------------------------------------------------------------------------
// Tasks and consoles
// ---------------------------------------------------------------------------

/// Kind of task a console or task entity belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// Connect the wires panels.
    FixWiring,
    /// Flip every breaker in order.
    ResetBreakers,
    /// Unclog the toilet.
    CleanToilet,
    /// Collect towels around the map.
    PickUpTowels,
    /// Carry fuel to the engines.
    FuelEngines,
    /// Steer every engine output back to center.
    AlignEngineOutput,
    /// Turn the waterwheels.
    OpenWaterways,
    /// Refill and swap the water jug.
    ReplaceWaterJug,
    /// Divert power to another room.
    DivertPower,
    /// File records into folders.
    SortRecords,
    /// Repair a weather node.
    FixWeatherNode,
    /// Store pistols and rifles.
    StoreArmsTask,
    /// Empty the garbage chute.
    EmptyGarbage,
    /// Clean the O2 filter.
    CleanO2Filter,
    /// Stand on the medical scanner.
    SubmitScan,
    /// A task type not covered by the built-in set.
    Other(String),
}

/// Inclusive range of task steps a console is valid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRange {
    /// First valid step.
    pub min: i32,
    /// Last valid step.
    pub max: i32,
}

impl StepRange {
    /// A range covering exactly one step.
    pub const fn single(step: i32) -> Self {
        Self {
            min: step,
            max: step,
        }
    }

    /// Returns true if `step` lies within the range.
    pub fn contains(&self, step: i32) -> bool {
        step >= self.min && step <= self.max
    }
}

/// A (task type, step range) pair a console accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSet {
    /// Task the console serves.
    pub task_type: TaskType,
    /// Steps of that task the console is valid for.
    pub step: StepRange,
}

/// Specialized console behaviour copied from a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum ConsoleVariant {
    /// Plain console.
    #[default]
    Generic,
    /// Armory console used across several steps.
    Arms {
        /// Uses consumed so far.
        times_used: u32,
        /// Per-step images.
        images: Vec<SpriteRef>,
        /// Sound played on use.
        use_sound: Option<String>,
        /// Uses required per task step.
        uses_per_step: u32,
    },
    /// Towel pickup console.
    Towel {
        /// Sound played on use.
        use_sound: Option<String>,
    },
}

/// Interactive trigger bound to a task.
#[derive(Debug, Clone, PartialEq)]
pub struct Console {
    /// Id peers use to address this console.
    pub console_id: ConsoleId,
    /// Specialized behaviour.
    pub variant: ConsoleVariant,
    /// Node whose sprite highlights when the console is usable.
    pub image: Option<NodeId>,
    /// Usable only when approached from below.
    pub only_from_below: bool,
    /// Interaction range.
    pub usable_distance: f32,
    /// Room the console sits in.
    pub room: RoomId,
    /// Task types the console belongs to.
    pub task_types: Vec<TaskType>,
    /// Task steps the console accepts.
    pub valid_tasks: Vec<TaskSet>,
    /// Whether impostors may use it. Always false for built consoles.
    pub allow_impostor: bool,
    /// Walls between player and console block use.
    pub check_walls: bool,
}

/// Makes a node clickable; clicking uses the console on the same node.
#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    /// The node has a collider to use as its click mask.
    pub has_click_mask: bool,
}

/// What a task entity does beyond the shared task fields.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskKind {
    /// Ordinary task.
    Normal,
    /// Transfer task that diverts power from its start room to `target`.
    Divert {
        /// Room the power is diverted to.
        target: RoomId,
    },
    /// Weather node task bound to a specific console.
    WeatherNode {
        /// Console the node task must be started from.
        node_id: ConsoleId,
        /// Minigame used for the second stage.
        stage2_minigame: Option<String>,
    },
}

/// A timed objective entity.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerTask {
    /// What the task is.
    pub task_type: TaskType,
    /// Kind-specific data.
    pub kind: TaskKind,
    /// Short, common or long.
    pub length: TaskLength,
    /// Room the task begins in.
    pub start_at: RoomId,
    /// Current step.
    pub task_step: i32,
    /// Steps needed to complete the task.
    pub max_step: i32,
    /// The locator arrow is hidden until resumed.
    pub arrow_suspended: bool,
    /// Show the countdown in the task list.
    pub show_task_timer: bool,
    /// Show `step/max` in the task list.
    pub show_task_step: bool,
    /// Countdown length in seconds.
    pub task_timer: f32,
    /// The countdown is already running.
    pub timer_started: bool,
    /// Minigame opened by the task's consoles.
    pub minigame: Option<String>,
    /// Inactive arrow child, if the template has one.
    pub arrow: Option<NodeId>,
    /// Per-round task data, filled at task initialisation.
    pub data: Vec<u8>,
}

/// Interactive medical scanner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MedScanner;

// ---------------------------------------------------------------------------
// Ladders
// ---------------------------------------------------------------------------

/// One end of a two-way vertical traversal link.
#[derive(Debug, Clone, PartialEq)]
pub struct LadderEndpoint {
    /// Id peers use in climb messages.
    pub id: LadderId,
    /// Upper end of the pair.
    pub is_top: bool,
    /// The paired endpoint at the other end.
    pub destination: NodeId,
    /// Sound played when climbing from this end.
    pub use_sound: Option<String>,
    /// Node whose sprite highlights when the ladder is usable.
    pub image: Option<NodeId>,
}

// ---------------------------------------------------------------------------
// Minimap
// ---------------------------------------------------------------------------

/// Icon shown on the minimap for an element.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimapIcon {
    /// Element the icon was built from.
    pub element: ElementId,
    /// Shown only on the restricted (impostor) overlay.
    pub restricted: bool,
}
