//! Console id rules.
//!
//! Every task tag resolves to exactly one [`ConsoleRule`]. Resolution order is
//! fixed: the fixed-id table, then the tag-specific rules, then per-tag
//! counters, then the global counter.

use mw_core::component::{StepRange, TaskSet, TaskType};

use crate::config::MAX_FUEL_STEP_VARIANTS;
use crate::task::CounterKey;

/// Tags whose console id never depends on the document.
pub const FIXED_CONSOLE_IDS: [(&str, u8); 8] = [
    ("task-garbage2", 1),
    ("task-garbage3", 0),
    ("task-garbage4", 2),
    ("task-fans1", 0),
    ("task-fans2", 1),
    ("task-records1", 0),
    ("task-pistols1", 1),
    ("task-pistols2", 1),
];

/// The towel sink. Other towel consoles share [`CounterKey::Towels`].
pub const TOWEL_SINK_TAG: &str = "task-towels1";
const TOWEL_FAMILY: &str = "task-towels";

/// Where a console id comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSource {
    /// A constant id from [`FIXED_CONSOLE_IDS`].
    Fixed(u8),
    /// The configured sink id.
    Sink,
    /// Next value of a per-tag counter.
    Counter(CounterKey),
    /// Current global counter value, which is not advanced.
    PeekGlobal,
    /// Next value of the global counter.
    Global,
}

/// How the template's valid task sets are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidTasks {
    /// Copied unchanged.
    FromTemplate,
    /// One water jug refill set at step 1.
    WaterJugRefill,
    /// Even fuel steps `0, 2, ..` up to the configured variant count,
    /// never more than [`MAX_FUEL_STEP_VARIANTS`].
    FuelSteps,
    /// The odd fuel step derived from this console's id.
    FuelOutput,
}

impl ValidTasks {
    /// Apply the rewrite. `console_id` is the id assigned to the console.
    pub fn apply(self, template: &[TaskSet], console_id: u8, fuel_variants: u8) -> Vec<TaskSet> {
        match self {
            Self::FromTemplate => template.to_vec(),
            Self::WaterJugRefill => vec![TaskSet {
                task_type: TaskType::ReplaceWaterJug,
                step: StepRange { min: 1, max: 1 },
            }],
            Self::FuelSteps => (0..i32::from(fuel_variants.min(MAX_FUEL_STEP_VARIANTS)))
                .map(|i| TaskSet {
                    task_type: TaskType::FuelEngines,
                    step: StepRange::single(i * 2),
                })
                .collect(),
            Self::FuelOutput => vec![TaskSet {
                task_type: TaskType::FuelEngines,
                step: StepRange::single(i32::from(console_id) * 2 + 1),
            }],
        }
    }
}

/// The complete id rule for one tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleRule {
    /// Where the console id comes from.
    pub id: IdSource,
    /// Rewrite applied to the template's valid task sets.
    pub valid_tasks: ValidTasks,
}

impl ConsoleRule {
    const fn id(id: IdSource) -> Self {
        Self {
            id,
            valid_tasks: ValidTasks::FromTemplate,
        }
    }
}

/// Resolve the rule for a task tag.
pub fn rule_for(tag: &str) -> ConsoleRule {
    if let Some(&(_, id)) = FIXED_CONSOLE_IDS.iter().find(|(t, _)| *t == tag) {
        return ConsoleRule::id(IdSource::Fixed(id));
    }
    match tag {
        "task-waterjug2" => ConsoleRule {
            id: IdSource::PeekGlobal,
            valid_tasks: ValidTasks::WaterJugRefill,
        },
        TOWEL_SINK_TAG => ConsoleRule::id(IdSource::Sink),
        t if t.starts_with(TOWEL_FAMILY) => ConsoleRule::id(IdSource::Counter(CounterKey::Towels)),
        "task-fuel1" => ConsoleRule {
            id: IdSource::PeekGlobal,
            valid_tasks: ValidTasks::FuelSteps,
        },
        "task-fuel2" => ConsoleRule {
            id: IdSource::Counter(CounterKey::FuelOutput),
            valid_tasks: ValidTasks::FuelOutput,
        },
        _ => match CounterKey::for_tag(tag) {
            Some(key) => ConsoleRule::id(IdSource::Counter(key)),
            None => ConsoleRule::id(IdSource::Global),
        },
    }
}
