use crate::{quantity::format_quantity, DisplayOptions};
use fillgauge_core::Snapshot;
use std::fmt::Write;

/// Placeholder for values the engine does not know yet.
const UNKNOWN: &str = "--";

/// Render one header line plus one line per entity.
///
/// Rows are printed in the order given; the registry already sorts them by key.
pub fn render_table(rows: &[(String, Snapshot)], opts: &DisplayOptions) -> String {
    let name_width = rows
        .iter()
        .map(|(key, _)| opts.label(key).chars().count())
        .max()
        .unwrap_or(0)
        .max("ENTITY".len());

    let mut out = String::new();
    let _ = write!(
        out,
        "{:<name_width$}  {:>9}  {:>9}  {:>12}",
        "ENTITY", "LEVEL", "CONSUMED", "QUANTITY"
    );
    if opts.show_diagnostics {
        let _ = write!(out, "  {:>9}  {:>9}  {:>7}  {:>7}", "PEAK", "INITIAL", "SAMPLES", "REMOVED");
    }
    out.push('\n');

    for (key, snap) in rows {
        let quantity = snap
            .consumed_quantity
            .map(|q| format_quantity(q, &opts.unit, opts.precision))
            .unwrap_or_else(|| UNKNOWN.to_string());

        let _ = write!(
            out,
            "{:<name_width$}  {:>9}  {:>9}  {:>12}",
            opts.label(key),
            percent(snap.current_average, opts.precision),
            percent(snap.consumed_percent, opts.precision),
            quantity,
        );
        if opts.show_diagnostics {
            let _ = write!(
                out,
                "  {:>9}  {:>9}  {:>7}  {:>7}",
                percent(snap.high_water, opts.precision),
                percent(snap.initial_level, opts.precision),
                snap.samples,
                snap.removed,
            );
        }
        out.push('\n');
    }

    out
}

fn percent(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}%"),
        None => UNKNOWN.to_string(),
    }
}
