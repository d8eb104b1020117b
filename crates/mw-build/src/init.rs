//! Per-round task data sized from the counts a build published.

use log::debug;
use mw_core::component::{PlayerTask, RoomId, TaskType};
use mw_core::{Scene, ShipState};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::pipeline::BuildArtifacts;
use crate::task::TaskCounts;

/// Fills task data and step counts for tasks whose size depends on the map.
#[derive(Debug)]
pub struct TaskInitializer {
    rng: StdRng,
    counts: TaskCounts,
    divert_targets: Vec<RoomId>,
}

impl TaskInitializer {
    /// Create an initializer for a finished build. Same seed, same data.
    pub fn new(artifacts: &BuildArtifacts, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            counts: artifacts.task_counts.clone(),
            divert_targets: artifacts.divert_targets.clone(),
        }
    }

    /// Initialize one task in place.
    pub fn initialize(&mut self, task: &mut PlayerTask) {
        match task.task_type {
            TaskType::ResetBreakers => {
                let n = self.counts.breakers();
                let mut data: Vec<u8> = (0..n).collect();
                data.shuffle(&mut self.rng);
                task.data = data;
                task.max_step = i32::from(n);
            }
            TaskType::CleanToilet => {
                let n = self.counts.toilet();
                let pick = if n == 0 {
                    0
                } else {
                    self.rng.random_range(0..n)
                };
                task.data = vec![pick];
            }
            TaskType::PickUpTowels => {
                let n = self.counts.towels();
                let mut all: Vec<u8> = (0..n).collect();
                all.shuffle(&mut self.rng);
                all.truncate(usize::from(n / 2));
                task.data = all;
            }
            TaskType::FuelEngines => {
                task.max_step = i32::from(self.counts.fuel());
            }
            TaskType::AlignEngineOutput => {
                let n = self.counts.align();
                let mut data = vec![0u8; usize::from(n) + 2];
                for value in data.iter_mut().take(usize::from(n)) {
                    let sign = if self.rng.random_bool(0.5) { 1 } else { -1 };
                    let deflection: i32 = self.rng.random_range(25..127);
                    *value = (sign * deflection + 127) as u8;
                }
                task.data = data;
                task.max_step = i32::from(n);
            }
            TaskType::OpenWaterways => {
                let n = self.counts.waterwheel();
                task.data = vec![0; usize::from(n)];
                task.max_step = i32::from(n);
            }
            _ => {}
        }
    }

    /// Initialize every task registered with the ship. Returns how many tasks
    /// were visited.
    pub fn initialize_all(&mut self, scene: &mut Scene, ship: &ShipState) -> usize {
        let mut visited = 0;
        for &node in ship
            .short_tasks
            .iter()
            .chain(&ship.common_tasks)
            .chain(&ship.long_tasks)
        {
            if let Some(task) = scene
                .get_mut(node)
                .and_then(|n| n.components.task.as_mut())
            {
                self.initialize(task);
                visited += 1;
            }
        }
        debug!("initialized {visited} tasks");
        visited
    }

    /// Room order of the divert sliders.
    pub fn divert_slider_order(&self) -> &[RoomId] {
        &self.divert_targets
    }

    /// Folder a records console hands out, in `1..records`.
    pub fn records_folder(&mut self) -> u8 {
        let n = self.counts.records();
        if n <= 1 {
            1
        } else {
            self.rng.random_range(1..n)
        }
    }

    /// Which of the two fuel minigame stages a task starts in.
    pub fn fuel_stage(task: &PlayerTask) -> Option<u8> {
        task.data.get(1).map(|d| d % 2)
    }
}
