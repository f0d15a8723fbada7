use crate::reading::Batch;

/// All messages that can flow through the session event loop.
///
/// Sources:
/// - Feed listener        → `SessionStarted`, `Batch`, `SessionEnded`
/// - Config watcher task  → `ConfigReloaded`
/// - Signal handler       → `Shutdown`
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    // ── Feed ──────────────────────────────────────────────────────────────────
    /// A feed connection was established; previous entity state is discarded.
    SessionStarted,
    /// One inbound batch of readings, in arrival order.
    Batch(Batch),
    /// A line arrived that could not be decoded as a batch.
    Malformed(String),
    /// The feed connection went away; entity state is discarded.
    SessionEnded,

    // ── Config ────────────────────────────────────────────────────────────────
    /// Config file changed on disk — triggers a live reload.
    ConfigReloaded,

    // ── Internal ──────────────────────────────────────────────────────────────
    /// Graceful shutdown requested.
    Shutdown,
}
