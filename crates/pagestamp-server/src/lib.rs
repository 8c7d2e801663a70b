//! Local preview server for pagestamp.
//!
//! Serves the generated pages and regenerates them whenever the service data
//! or the page template changes.

pub mod server;
pub mod watcher;

pub use server::{rebuild, DevServer, DevServerConfig, ServerError};
pub use watcher::{FileWatcher, WatchEvent};
