use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Tags whose console ids come from their own counter instead of the global one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterKey {
    /// `task-toilet`.
    Toilet,
    /// `task-breakers`.
    Breakers,
    /// Shared by every towel console except the sink.
    Towels,
    /// `task-node`.
    Node,
    /// `task-waterwheel1`.
    Waterwheel,
    /// `task-fuel2`.
    FuelOutput,
    /// `task-align1`.
    Align,
    /// `task-records2`.
    Records,
    /// `task-wires`.
    Wires,
}

impl CounterKey {
    /// Every counter, in declaration order.
    pub const ALL: [CounterKey; 9] = [
        CounterKey::Toilet,
        CounterKey::Breakers,
        CounterKey::Towels,
        CounterKey::Node,
        CounterKey::Waterwheel,
        CounterKey::FuelOutput,
        CounterKey::Align,
        CounterKey::Records,
        CounterKey::Wires,
    ];

    /// The tag (or tag family, for towels) the counter belongs to.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Toilet => "task-toilet",
            Self::Breakers => "task-breakers",
            Self::Towels => "task-towels",
            Self::Node => "task-node",
            Self::Waterwheel => "task-waterwheel1",
            Self::FuelOutput => "task-fuel2",
            Self::Align => "task-align1",
            Self::Records => "task-records2",
            Self::Wires => "task-wires",
        }
    }

    /// Value the counter holds at the start of a build.
    ///
    /// Record folders are numbered from 1; slot 0 is the records desk.
    pub fn initial(self) -> u8 {
        match self {
            Self::Records => 1,
            _ => 0,
        }
    }

    /// The counter owning an exact tag. Towel consoles are matched by the
    /// rule table, not here.
    pub fn for_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .filter(|k| *k != Self::Towels)
            .find(|k| k.tag() == tag)
    }
}

impl fmt::Display for CounterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Build-scoped per-tag counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCounters {
    values: BTreeMap<CounterKey, u8>,
}

impl Default for TagCounters {
    fn default() -> Self {
        Self {
            values: CounterKey::ALL.into_iter().map(|k| (k, k.initial())).collect(),
        }
    }
}

impl TagCounters {
    /// Counters at their initial values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value without advancing.
    pub fn peek(&self, key: CounterKey) -> u8 {
        self.values.get(&key).copied().unwrap_or_default()
    }

    /// Return the current value and advance the counter, wrapping at 256.
    pub fn take(&mut self, key: CounterKey) -> u8 {
        let slot = self.values.entry(key).or_insert(key.initial());
        let value = *slot;
        *slot = slot.wrapping_add(1);
        value
    }

    /// Snapshot every counter into [`TaskCounts`] and reset all of them to 0.
    pub fn publish_and_reset(&mut self) -> TaskCounts {
        let counts = TaskCounts {
            counts: self.values.clone(),
        };
        for value in self.values.values_mut() {
            *value = 0;
        }
        counts
    }
}

/// Read-only per-tag counts published after a build.
///
/// Other game logic sizes task data from these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskCounts {
    counts: BTreeMap<CounterKey, u8>,
}

impl TaskCounts {
    /// Count for `key`, or 0 if it was never published.
    pub fn get(&self, key: CounterKey) -> u8 {
        self.counts.get(&key).copied().unwrap_or_default()
    }

    /// Number of breaker consoles.
    pub fn breakers(&self) -> u8 {
        self.get(CounterKey::Breakers)
    }

    /// Number of toilet consoles.
    pub fn toilet(&self) -> u8 {
        self.get(CounterKey::Toilet)
    }

    /// Number of towel consoles, excluding the sink.
    pub fn towels(&self) -> u8 {
        self.get(CounterKey::Towels)
    }

    /// Number of fuel output consoles.
    pub fn fuel(&self) -> u8 {
        self.get(CounterKey::FuelOutput)
    }

    /// Number of waterwheels.
    pub fn waterwheel(&self) -> u8 {
        self.get(CounterKey::Waterwheel)
    }

    /// Number of engine alignment consoles.
    pub fn align(&self) -> u8 {
        self.get(CounterKey::Align)
    }

    /// Number of record folders plus one.
    pub fn records(&self) -> u8 {
        self.get(CounterKey::Records)
    }

    /// Number of wiring panels.
    pub fn wires(&self) -> u8 {
        self.get(CounterKey::Wires)
    }

    /// All published counts.
    pub fn iter(&self) -> impl Iterator<Item = (CounterKey, u8)> + '_ {
        self.counts.iter().map(|(k, v)| (*k, *v))
    }
}
