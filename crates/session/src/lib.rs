//! Session loop for `fillgauge`.
//!
//! Owns the entity registry for the lifetime of one feed connection and
//! wires together the background tasks:
//! - Feed listener (socket or stdin batches)
//! - Config file watcher (live reload on change)
//! - Ctrl-C handler (graceful shutdown)

use fillgauge_config::{load as load_config, ConfigWatcher, GaugeConfig};
use fillgauge_core::{EntityRegistry, Message, Result};
use fillgauge_feed::{spawn_listener, FeedSource};
use fillgauge_render::{render_frame, Counters, DisplayOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

// ── State ─────────────────────────────────────────────────────────────────────

/// Everything one running gauge holds in memory.
pub struct Session {
    config_path: PathBuf,
    registry:    EntityRegistry,
    display:     DisplayOptions,
    counters:    Counters,
}

impl Session {
    pub fn new(config_path: impl Into<PathBuf>, config: &GaugeConfig) -> Self {
        Self {
            config_path: config_path.into(),
            registry:    EntityRegistry::new(config.engine_settings()),
            display:     DisplayOptions::from_config(config),
            counters:    Counters::new(),
        }
    }

    /// Process one message to completion. Returns a rendered frame when what
    /// is on screen changed: new readings, a reset at disconnect, or a reload.
    pub fn handle(&mut self, message: Message) -> Option<String> {
        match message {
            Message::SessionStarted => {
                info!("Feed session started");
                self.registry.reset();
                self.counters.reset();
                None
            }
            Message::Batch(batch) => {
                let applied = self.registry.apply(&batch);
                self.counters.record_batch(applied);
                Some(self.frame())
            }
            Message::Malformed(line) => {
                warn!("Ignoring malformed feed line: {line}");
                self.counters.record_malformed();
                None
            }
            Message::SessionEnded => {
                info!(entities = self.registry.len(), "Feed session ended");
                self.registry.reset();
                Some(self.frame())
            }
            Message::ConfigReloaded => {
                self.reload();
                Some(self.frame())
            }
            Message::Shutdown => None,
        }
    }

    /// Re-read the config file; a broken file keeps the previous settings.
    fn reload(&mut self) {
        match load_config(&self.config_path) {
            Ok(config) => {
                info!("Config reloaded from '{}'", self.config_path.display());
                self.apply_config(&config);
            }
            Err(e) => warn!("Config reload failed, keeping previous settings: {e}"),
        }
    }

    /// Apply new settings. Entities already tracked keep their parameters.
    pub fn apply_config(&mut self, config: &GaugeConfig) {
        self.registry.update_settings(config.engine_settings());
        self.display = DisplayOptions::from_config(config);
    }

    /// Render the current state of every entity.
    pub fn frame(&self) -> String {
        render_frame(&self.registry.snapshots(), &self.counters, &self.display)
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }

    pub fn display(&self) -> &DisplayOptions {
        &self.display
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Run the gauge until Ctrl-C or until the feed ends. Frames go to stdout.
pub async fn run(config_path: impl AsRef<Path>) -> Result<()> {
    let config_path = config_path.as_ref();
    let config = load_config(config_path)?;

    let source = config
        .feed
        .socket
        .clone()
        .map_or(FeedSource::Stdin, FeedSource::Socket);
    let mut feed = spawn_listener(source, Duration::from_secs(config.feed.reconnect_secs));
    let (_watcher, mut changes) = ConfigWatcher::spawn(config_path);

    let mut session = Session::new(config_path, &config);
    let mut stdout = std::io::stdout();

    loop {
        let message = tokio::select! {
            event = feed.recv() => match event {
                Some(event) => Message::from(event),
                None => {
                    info!("Feed closed");
                    break;
                }
            },
            Some(()) = changes.recv() => Message::ConfigReloaded,
            _ = tokio::signal::ctrl_c() => Message::Shutdown,
        };

        if matches!(message, Message::Shutdown) {
            info!("Shutdown requested");
            break;
        }

        if let Some(frame) = session.handle(message) {
            stdout.write_all(frame.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}
