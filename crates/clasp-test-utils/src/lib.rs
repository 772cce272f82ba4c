//! Shared test utilities for the clasp workspace.
//!
//! This crate provides standardised fixtures so crate test suites do not
//! each rebuild project directories and seeded remotes by hand. It is a
//! dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`project`]: [`TestProject`] builder for a local project directory
//! - [`remote`]: seeded [`MemoryServices`](clasp_core::remote::MemoryServices)

pub mod project;
pub mod remote;

pub use project::TestProject;
pub use remote::{seeded_remote, with_versions};
