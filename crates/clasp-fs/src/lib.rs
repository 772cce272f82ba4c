//! Filesystem layer for clasp
//!
//! Provides forward-slash path handling, atomic writes and format-agnostic
//! config files for the project settings and the client config.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::ProjectPath;
pub use error::{Error, Result};
pub use path::NormalizedPath;
