pub mod aggregator;
pub mod error;
pub mod event;
pub mod filter;
pub mod reading;
pub mod registry;
pub mod settings;
pub mod snapshot;

pub use aggregator::EntityState;
pub use error::{GaugeError, Result};
pub use event::Message;
pub use filter::{filtered_average, FilterOutcome};
pub use reading::{Batch, KeyedReading, Reading};
pub use registry::EntityRegistry;
pub use settings::EngineSettings;
pub use snapshot::Snapshot;
