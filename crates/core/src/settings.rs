use std::collections::HashMap;

/// Default history window, also the sample count at which filtering starts.
pub const DEFAULT_WINDOW: usize = 10;
/// Default outlier threshold, in standard deviations.
pub const DEFAULT_OUTLIER_SIGMAS: f64 = 2.0;
/// Default physical capacity of an entity (millilitres unless configured otherwise).
pub const DEFAULT_CAPACITY: f64 = 750.0;

/// Parameters the engine copies into each entity when it is first seen.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    /// History capacity `H`.
    pub window: usize,
    /// Multiplier `k` in the `k·σ` outlier threshold.
    pub outlier_sigmas: f64,
    /// Capacity used when no per-entity override exists.
    pub default_capacity: f64,
    /// Per-entity capacity overrides, keyed by entity key.
    pub capacities: HashMap<String, f64>,
}

impl EngineSettings {
    /// Capacity for `key`: its override, or the global default.
    pub fn capacity_for(&self, key: &str) -> f64 {
        self.capacities
            .get(key)
            .copied()
            .unwrap_or(self.default_capacity)
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            window:           DEFAULT_WINDOW,
            outlier_sigmas:   DEFAULT_OUTLIER_SIGMAS,
            default_capacity: DEFAULT_CAPACITY,
            capacities:       HashMap::new(),
        }
    }
}
