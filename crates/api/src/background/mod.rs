//! Detached background tasks started by request handlers.

mod research;

pub use research::{spawn_inbound, spawn_research};
