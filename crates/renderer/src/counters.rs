use chrono::{DateTime, Local};

/// Presentation-side bookkeeping about the feed.
///
/// Owned by whoever renders output and updated through explicit calls; the
/// engine never touches it.
#[derive(Debug, Clone, Default)]
pub struct Counters {
    pub batches:     u64,
    pub readings:    u64,
    pub malformed:   u64,
    pub last_update: Option<DateTime<Local>>,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one applied batch of `readings` readings.
    pub fn record_batch(&mut self, readings: usize) {
        self.batches += 1;
        self.readings += readings as u64;
        self.last_update = Some(Local::now());
    }

    pub fn record_malformed(&mut self) {
        self.malformed += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// One-line summary, e.g. `batches 3 · readings 12 · malformed 0 · updated 14:02:11`.
    pub fn status_line(&self) -> String {
        let updated = self
            .last_update
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string());
        format!(
            "batches {} · readings {} · malformed {} · updated {updated}",
            self.batches, self.readings, self.malformed
        )
    }
}
