pub mod events;
pub mod listener;

pub use events::{parse_line, FeedEvent};
pub use listener::{spawn_listener, FeedSource};
