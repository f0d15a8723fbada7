//! Per-entity rolling state: history window, high-water mark, peak level.

use crate::{
    filter::filtered_average,
    reading::Reading,
    snapshot::Snapshot,
};
use std::collections::VecDeque;
use tracing::debug;

/// Aggregation state for one entity.
///
/// Only finite numbers ever enter `history`; invalid readings erode it from
/// the oldest end instead of inserting a placeholder.
#[derive(Debug, Clone)]
pub struct EntityState {
    history:        VecDeque<f64>,
    window:         usize,
    outlier_sigmas: f64,
    initial_level:  Option<f64>,
    high_water:     Option<f64>,
    capacity:       f64,
}

impl EntityState {
    pub fn new(window: usize, outlier_sigmas: f64, capacity: f64) -> Self {
        let window = window.max(1);
        Self {
            history: VecDeque::with_capacity(window),
            window,
            outlier_sigmas,
            initial_level: None,
            high_water: None,
            capacity,
        }
    }

    /// Fold one reading into the state.
    pub fn ingest(&mut self, reading: Reading) {
        match reading {
            Reading::Number(value) => self.ingest_valid(value),
            Reading::Invalid => self.erode(),
        }
    }

    fn ingest_valid(&mut self, value: f64) {
        if self.history.len() == self.window {
            self.history.pop_front();
        }
        self.history.push_back(value);

        let (window, sigmas) = (self.window, self.outlier_sigmas);
        if self.history.len() >= window {
            let outcome = filtered_average(self.samples(), window, sigmas);
            if let Some(avg) = outcome.average {
                self.ratchet(avg);
            }
        }

        // Rising peak: a probable refill.
        let peak = self.history.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if self.initial_level.map_or(true, |level| peak > level) {
            debug!(peak, previous = ?self.initial_level, "initial level raised");
            self.initial_level = Some(peak);
        }
    }

    fn erode(&mut self) {
        self.history.pop_front();

        // Erosion always leaves fewer than `window` samples, which is too
        // little support for a high-water mark.
        if self.high_water.take().is_some() {
            debug!(remaining = self.history.len(), "high-water mark withdrawn");
        }
    }

    /// Raise the high-water mark; never lowers it.
    fn ratchet(&mut self, avg: f64) {
        if self.high_water.map_or(true, |hw| avg > hw) {
            debug!(avg, previous = ?self.high_water, "high-water mark raised");
            self.high_water = Some(avg);
        }
    }

    fn samples(&mut self) -> &[f64] {
        self.history.make_contiguous()
    }

    /// Externally visible metrics. Does not mutate the state.
    pub fn snapshot(&self) -> Snapshot {
        let samples: Vec<f64> = self.history.iter().copied().collect();
        let outcome = filtered_average(&samples, self.window, self.outlier_sigmas);
        Snapshot::derive(
            outcome.average,
            self.high_water,
            self.capacity,
            self.initial_level,
            samples.len(),
            outcome.removed,
        )
    }

    /// Raw history, oldest first.
    pub fn history(&self) -> impl Iterator<Item = f64> + '_ {
        self.history.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn high_water(&self) -> Option<f64> {
        self.high_water
    }

    pub fn initial_level(&self) -> Option<f64> {
        self.initial_level
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity() -> EntityState {
        EntityState::new(10, 2.0, 750.0)
    }

    fn feed(state: &mut EntityState, values: &[f64]) {
        for &v in values {
            state.ingest(Reading::Number(v));
        }
    }

    #[test]
    fn history_is_a_fifo_window() {
        let mut state = entity();
        feed(&mut state, &(1..=13).map(f64::from).collect::<Vec<_>>());
        assert_eq!(state.len(), 10);
        assert_eq!(state.history().next(), Some(4.0));
        assert_eq!(state.history().last(), Some(13.0));
    }

    #[test]
    fn ramp_sets_high_water_at_tenth_reading() {
        let mut state = entity();
        feed(&mut state, &[10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0]);
        assert_eq!(state.high_water(), None);

        state.ingest(Reading::Number(100.0));
        let hw = state.high_water().unwrap();
        assert!((hw - 55.0).abs() < 1e-9);
    }

    #[test]
    fn high_water_never_drops_on_valid_readings() {
        let mut state = entity();
        feed(&mut state, &[80.0; 10]);
        assert_eq!(state.high_water(), Some(80.0));

        let mut last = 80.0;
        for v in [60.0, 70.0, 20.0, 95.0, 10.0, 60.0, 60.0, 60.0, 60.0, 60.0, 60.0, 60.0] {
            state.ingest(Reading::Number(v));
            let hw = state.high_water().unwrap();
            assert!(hw >= last);
            last = hw;
        }
    }

    #[test]
    fn invalid_readings_erode_oldest_first() {
        let mut state = entity();
        feed(&mut state, &[1.0, 2.0, 3.0]);
        state.ingest(Reading::Invalid);
        assert_eq!(state.history().collect::<Vec<_>>(), vec![2.0, 3.0]);
    }

    #[test]
    fn erosion_on_empty_history_is_a_no_op() {
        let mut state = entity();
        state.ingest(Reading::Invalid);
        assert!(state.is_empty());
        assert_eq!(state.high_water(), None);
        assert_eq!(state.initial_level(), None);
    }

    #[test]
    fn erosion_below_window_withdraws_high_water() {
        let mut state = entity();
        feed(&mut state, &[70.0; 10]);
        assert_eq!(state.high_water(), Some(70.0));

        state.ingest(Reading::Invalid);
        assert_eq!(state.len(), 9);
        assert_eq!(state.high_water(), None);

        // Re-established once the window fills again.
        state.ingest(Reading::Number(70.0));
        assert_eq!(state.high_water(), Some(70.0));
    }

    #[test]
    fn huge_readings_keep_consumption_defined() {
        let mut state = entity();
        feed(&mut state, &[1e308; 10]);

        let snap = state.snapshot();
        assert_eq!(snap.current_average, Some(1e308));
        assert_eq!(snap.high_water, Some(1e308));
        assert_eq!(snap.consumed_percent, Some(0.0));
    }

    #[test]
    fn nine_readings_then_invalid_never_sets_high_water() {
        let mut state = entity();
        feed(&mut state, &[50.0; 9]);
        state.ingest(Reading::Invalid);

        assert_eq!(state.len(), 8);
        assert_eq!(state.high_water(), None);
        let snap = state.snapshot();
        assert_eq!(snap.current_average, Some(50.0));
        assert_eq!(snap.consumed_percent, None);
    }

    #[test]
    fn initial_level_tracks_rising_peak() {
        let mut state = entity();
        feed(&mut state, &[60.0, 55.0]);
        assert_eq!(state.initial_level(), Some(60.0));

        feed(&mut state, &[90.0]);
        assert_eq!(state.initial_level(), Some(90.0));

        // Peak falling out of the window does not lower it.
        feed(&mut state, &[40.0; 10]);
        assert_eq!(state.initial_level(), Some(90.0));
    }

    #[test]
    fn capacity_is_fixed_at_creation() {
        let state = EntityState::new(10, 2.0, 330.0);
        assert_eq!(state.capacity(), 330.0);
    }
}
