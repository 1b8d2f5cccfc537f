//! Allocation engine configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Settings for room search and next-window suggestions.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AllocationConfig {
    /// How many days past the requested start date the next-window search
    /// may scan before giving up with `NoAvailability`.
    #[serde(default = "default_horizon_days")]
    #[validate(range(min = 1, max = 3650))]
    pub horizon_days: u32,
    /// Whether to seed the default room inventory when the store is empty.
    #[serde(default = "default_true")]
    pub seed_default_rooms: bool,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            horizon_days: default_horizon_days(),
            seed_default_rooms: true,
        }
    }
}

fn default_horizon_days() -> u32 {
    365
}

fn default_true() -> bool {
    true
}
