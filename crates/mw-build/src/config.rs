use serde::{Deserialize, Serialize};

/// Upper bound on stepped fuel variants. Each variant covers an even step
/// `2i`, and the odd step `2i + 1` must still fit the output console ids.
pub const MAX_FUEL_STEP_VARIANTS: u8 = u8::MAX / 2;

/// Tunables for a document build.
///
/// Every peer in a session must build with the same configuration, otherwise
/// the derived ids diverge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Short tasks required for freeplay. Fewer produces a warning.
    pub min_short_tasks: usize,
    /// Common tasks required for freeplay.
    pub min_common_tasks: usize,
    /// Long tasks required for freeplay.
    pub min_long_tasks: usize,
    /// Upper bound on the wiring task's step count.
    pub wires_step_ceiling: u8,
    /// Vertical offset applied to both ladder endpoints.
    pub ladder_y_offset: f32,
    /// Endpoint distance for `util-ladder1` without an override.
    pub tall_ladder_height: f32,
    /// Endpoint distance for `util-ladder2` without an override.
    pub short_ladder_height: f32,
    /// Number of stepped valid-task variants generated for `task-fuel1`.
    /// Clamped to [`MAX_FUEL_STEP_VARIANTS`].
    pub fuel_step_variants: u8,
    /// Console id reserved for `task-towels1`.
    pub sink_console_id: u8,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            min_short_tasks: 3,
            min_common_tasks: 2,
            min_long_tasks: 1,
            wires_step_ceiling: 3,
            ladder_y_offset: -0.4,
            tall_ladder_height: 3.0,
            short_ladder_height: 1.5,
            fuel_step_variants: MAX_FUEL_STEP_VARIANTS,
            sink_console_id: u8::MAX,
        }
    }
}

impl BuildConfig {
    /// Set the minimum short/common/long task counts.
    pub fn with_task_minimums(mut self, short: usize, common: usize, long: usize) -> Self {
        self.min_short_tasks = short;
        self.min_common_tasks = common;
        self.min_long_tasks = long;
        self
    }

    /// Set the wiring step ceiling.
    pub fn with_wires_step_ceiling(mut self, ceiling: u8) -> Self {
        self.wires_step_ceiling = ceiling;
        self
    }

    /// Set the default ladder heights.
    pub fn with_ladder_heights(mut self, tall: f32, short: f32) -> Self {
        self.tall_ladder_height = tall;
        self.short_ladder_height = short;
        self
    }

    /// Set the number of stepped fuel variants, clamped to
    /// [`MAX_FUEL_STEP_VARIANTS`].
    pub fn with_fuel_step_variants(mut self, variants: u8) -> Self {
        self.fuel_step_variants = variants.min(MAX_FUEL_STEP_VARIANTS);
        self
    }

    /// Load a configuration from JSON. Missing fields take their defaults and
    /// out-of-range fields are clamped.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        let variants = config.fuel_step_variants;
        Ok(config.with_fuel_step_variants(variants))
    }
}
