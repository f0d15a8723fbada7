use crate::counters::Counters;
use fillgauge_core::Snapshot;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Serialize)]
struct JsonFrame<'a> {
    batches:   u64,
    readings:  u64,
    malformed: u64,
    entities:  BTreeMap<&'a str, &'a Snapshot>,
}

/// Render a frame as one compact JSON object. Unknown values serialize as `null`.
pub fn render_json(rows: &[(String, Snapshot)], counters: &Counters) -> String {
    let frame = JsonFrame {
        batches:   counters.batches,
        readings:  counters.readings,
        malformed: counters.malformed,
        entities:  rows.iter().map(|(key, snap)| (key.as_str(), snap)).collect(),
    };
    // Plain strings, numbers and options: serialization cannot fail.
    serde_json::to_string(&frame).unwrap_or_default()
}
