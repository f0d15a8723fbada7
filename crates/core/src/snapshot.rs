use serde::Serialize;

/// Point-in-time metrics for one entity — what the presentation layer reads.
///
/// `None` means "unknown", never zero: an entity with no data must not look
/// like a confirmed full container.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Snapshot {
    /// Filtered average of the current history (percent).
    pub current_average: Option<f64>,
    /// Drawdown from the high-water mark, clamped to `>= 0` (percent).
    pub consumed_percent: Option<f64>,
    /// `consumed_percent` scaled by the entity's capacity.
    pub consumed_quantity: Option<f64>,

    // ── Diagnostics ───────────────────────────────────────────────────────────
    /// Best filtered average seen with a full window.
    pub high_water: Option<f64>,
    /// Highest raw reading seen; jumps signal a probable refill.
    pub initial_level: Option<f64>,
    /// Number of readings currently in history.
    pub samples: usize,
    /// Outliers dropped while computing `current_average`.
    pub removed: usize,
    /// Physical capacity of the entity.
    pub capacity: f64,
}

impl Snapshot {
    /// Derive the consumption metrics from the raw aggregation state.
    pub fn derive(
        current_average: Option<f64>,
        high_water: Option<f64>,
        capacity: f64,
        initial_level: Option<f64>,
        samples: usize,
        removed: usize,
    ) -> Self {
        let consumed_percent = match (high_water, current_average) {
            (Some(hw), Some(avg)) => Some((hw - avg).max(0.0)),
            _ => None,
        };
        let consumed_quantity = consumed_percent.map(|pct| pct / 100.0 * capacity);

        Self {
            current_average,
            consumed_percent,
            consumed_quantity,
            high_water,
            initial_level,
            samples,
            removed,
            capacity,
        }
    }

    /// `true` when nothing at all is known about the entity.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.current_average.is_none()
    }
}
