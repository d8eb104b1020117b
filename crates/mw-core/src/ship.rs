use std::collections::{BTreeMap, HashMap};

use crate::component::{RoomId, TaskType};
use crate::node::NodeId;
use crate::properties::TaskLength;
use crate::scene::Scene;

/// The two minimap overlay layers icons are parented under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimapLayers {
    /// Visible to every player.
    pub task_overlay: NodeId,
    /// Visible only to restricted (impostor) players.
    pub infected_overlay: NodeId,
}

/// Simulation state the build pipeline writes into.
///
/// Owned by the host; the pipeline only appends rooms, tasks and the scanner.
#[derive(Debug, Clone)]
pub struct ShipState {
    /// Node all built content is parented under.
    pub root: NodeId,
    /// Divisor converting world units to minimap units.
    pub map_scale: f32,
    /// Minimap overlays, if the host has created a minimap.
    pub minimap: Option<MinimapLayers>,
    /// Room nodes in assignment order.
    pub all_rooms: Vec<NodeId>,
    /// Room lookup by id.
    pub fast_rooms: HashMap<RoomId, NodeId>,
    /// Short task entities.
    pub short_tasks: Vec<NodeId>,
    /// Common task entities.
    pub common_tasks: Vec<NodeId>,
    /// Long task entities.
    pub long_tasks: Vec<NodeId>,
    /// The authoritative medical scanner, if any.
    pub scanner: Option<NodeId>,
    /// Display names overriding the built-in task type names.
    pub task_names: BTreeMap<TaskType, String>,
}

impl ShipState {
    /// Create ship state rooted at `root` with a map scale of 1.
    pub fn new(root: NodeId) -> Self {
        Self {
            root,
            map_scale: 1.0,
            minimap: None,
            all_rooms: Vec::new(),
            fast_rooms: HashMap::new(),
            short_tasks: Vec::new(),
            common_tasks: Vec::new(),
            long_tasks: Vec::new(),
            scanner: None,
            task_names: BTreeMap::new(),
        }
    }

    /// Spawn a ship root plus both minimap overlays in `scene`.
    pub fn with_minimap(scene: &mut Scene) -> Self {
        let root = scene.spawn("Ship");
        let minimap = scene.spawn("Minimap");
        let task_overlay = scene.spawn("TaskOverlay");
        let infected_overlay = scene.spawn("InfectedOverlay");
        for overlay in [task_overlay, infected_overlay] {
            // Freshly spawned roots: parenting cannot fail.
            let _ = scene.set_parent(overlay, Some(minimap));
        }

        let mut ship = Self::new(root);
        ship.minimap = Some(MinimapLayers {
            task_overlay,
            infected_overlay,
        });
        ship
    }

    /// Append a task entity to the collection for `length`.
    pub fn add_task(&mut self, length: TaskLength, task: NodeId) {
        self.tasks_mut(length).push(task);
    }

    /// Task entities of the given length.
    pub fn tasks(&self, length: TaskLength) -> &[NodeId] {
        match length {
            TaskLength::Short => &self.short_tasks,
            TaskLength::Common => &self.common_tasks,
            TaskLength::Long => &self.long_tasks,
        }
    }

    fn tasks_mut(&mut self, length: TaskLength) -> &mut Vec<NodeId> {
        match length {
            TaskLength::Short => &mut self.short_tasks,
            TaskLength::Common => &mut self.common_tasks,
            TaskLength::Long => &mut self.long_tasks,
        }
    }

    /// Total task entities across all lengths.
    pub fn task_count(&self) -> usize {
        self.short_tasks.len() + self.common_tasks.len() + self.long_tasks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_task_routes_by_length() {
        let mut scene = Scene::new();
        let mut ship = ShipState::new(scene.spawn("Ship"));
        let a = scene.spawn("A");
        let b = scene.spawn("B");
        ship.add_task(TaskLength::Long, a);
        ship.add_task(TaskLength::Short, b);
        assert_eq!(ship.tasks(TaskLength::Long), &[a]);
        assert_eq!(ship.tasks(TaskLength::Short), &[b]);
        assert!(ship.tasks(TaskLength::Common).is_empty());
        assert_eq!(ship.task_count(), 2);
    }

    #[test]
    fn with_minimap_creates_overlays() {
        let mut scene = Scene::new();
        let ship = ShipState::with_minimap(&mut scene);
        let layers = ship.minimap.unwrap();
        assert!(scene.is_alive(layers.task_overlay));
        assert!(scene.is_alive(layers.infected_overlay));
        assert_ne!(layers.task_overlay, layers.infected_overlay);
    }
}
