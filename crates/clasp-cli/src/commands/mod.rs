//! Command implementations for clasp-cli

pub mod catalog;
pub mod deploy;
pub mod open;
pub mod project;
pub mod run;
pub mod settings;
pub mod sync;

pub use catalog::{run_list, run_logs};
pub use deploy::{
    run_deploy, run_deployments, run_redeploy, run_undeploy, run_version, run_versions,
};
pub use open::run_open;
pub use project::{run_clone, run_create};
pub use run::run_function;
pub use settings::run_settings;
pub use sync::{run_pull, run_push, run_status};
