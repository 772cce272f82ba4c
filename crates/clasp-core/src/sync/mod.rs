//! Synchronization between the root directory and the remote project
//!
//! This module provides:
//! - **status**: classify local files without touching the remote
//! - **push**: replace the remote file set with the tracked local files
//! - **fetch**: overwrite local files with the remote file set
//! - **order**: the transmit order derived from `filePushOrder`

mod engine;
mod fetch;
mod order;

pub use engine::{PushReport, SyncEngine};
pub use fetch::fetch_project;
pub use order::order_for_push;
