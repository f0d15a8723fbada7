//! Text rendering of entity snapshots for the terminal.
//!
//! The engine hands over `(key, Snapshot)` rows already sorted by key; this
//! crate only decides how they look.

pub mod counters;
pub mod json;
pub mod quantity;
pub mod table;

pub use counters::Counters;
pub use json::render_json;
pub use quantity::format_quantity;
pub use table::render_table;

use fillgauge_config::{GaugeConfig, OutputFormat};
use fillgauge_core::Snapshot;
use std::collections::HashMap;

/// How snapshot tables are printed.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    /// Decimals for percentages and quantities.
    pub precision: usize,
    /// Unit label for consumed quantities.
    pub unit: String,
    /// Append peak / initial / samples / removed columns.
    pub show_diagnostics: bool,
    /// Display names that replace raw entity keys.
    pub labels: HashMap<String, String>,
    pub format: OutputFormat,
}

impl DisplayOptions {
    /// Build [`DisplayOptions`] from the loaded configuration.
    pub fn from_config(config: &GaugeConfig) -> Self {
        Self {
            precision:        config.display.precision,
            unit:             config.capacity.unit.clone(),
            show_diagnostics: config.display.show_diagnostics,
            labels:           config.labels(),
            format:           config.display.format,
        }
    }

    /// Label for `key`, or the key itself.
    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.labels.get(key).map_or(key, String::as_str)
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self::from_config(&GaugeConfig::default())
    }
}

/// Render one output frame: the snapshot rows plus the feed counters.
pub fn render_frame(rows: &[(String, Snapshot)], counters: &Counters, opts: &DisplayOptions) -> String {
    match opts.format {
        OutputFormat::Table => {
            let mut frame = render_table(rows, opts);
            frame.push_str(&counters.status_line());
            frame.push('\n');
            frame
        }
        OutputFormat::Json => {
            let mut frame = render_json(rows, counters);
            frame.push('\n');
            frame
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_frame_ends_with_status_line() {
        let mut counters = Counters::new();
        counters.record_batch(1);
        let frame = render_frame(&[], &counters, &DisplayOptions::default());
        let last = frame.lines().last().unwrap();
        assert!(last.starts_with("batches 1"));
    }

    #[test]
    fn json_frame_is_a_single_line() {
        let mut opts = DisplayOptions::default();
        opts.format = OutputFormat::Json;
        let rows = vec![("red".to_string(), Snapshot::default())];
        let frame = render_frame(&rows, &Counters::new(), &opts);
        assert_eq!(frame.lines().count(), 1);
        assert!(frame.ends_with('\n'));
    }
}
