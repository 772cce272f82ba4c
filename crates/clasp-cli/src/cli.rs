//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// clasp - develop script projects locally
#[derive(Parser, Debug)]
#[command(name = "clasp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the remote project state
    #[arg(long, global = true, env = "CLASP_REMOTE_DIR")]
    pub remote_dir: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Create a new script project
    ///
    /// Writes .clasp.json and pulls the new project's manifest.
    ///
    /// Examples:
    ///   clasp create --title "My Script"
    ///   clasp create --title Addon --root-dir src
    Create {
        /// Project title
        #[arg(long, default_value = "Untitled")]
        title: String,

        /// Drive id of a container document
        #[arg(long)]
        parent_id: Option<String>,

        /// Local directory for the project files, relative to here
        #[arg(long)]
        root_dir: Option<String>,
    },

    /// Clone an existing script project
    ///
    /// Without a script id, pick one from the projects you can see.
    Clone {
        /// Script id to clone
        script_id: Option<String>,

        /// Version to fetch instead of HEAD
        #[arg(long)]
        version: Option<u32>,

        /// Local directory for the project files, relative to here
        #[arg(long)]
        root_dir: Option<String>,
    },

    /// Overwrite local files with the remote project
    Pull {
        /// Version to fetch instead of HEAD
        #[arg(long)]
        version: Option<u32>,
    },

    /// Replace the remote project with the local files
    Push {
        /// Push again whenever a tracked file changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Show which files would be pushed
    Status {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Create an immutable version of the current project
    Version {
        /// Version description
        description: Option<String>,
    },

    /// List versions, newest first
    Versions,

    /// Deploy a version
    ///
    /// Examples:
    ///   clasp deploy                          # new version, new deployment
    ///   clasp deploy -V 3 -d "release 3"      # existing version
    ///   clasp deploy -i AKfyc... -V 4         # repoint a deployment
    Deploy {
        /// Version to deploy; a new version is created when omitted
        #[arg(short = 'V', long)]
        version_number: Option<u32>,

        /// Deployment description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Update this deployment instead of creating one
        #[arg(short = 'i', long)]
        deployment_id: Option<String>,
    },

    /// Point a deployment at another version
    Redeploy {
        deployment_id: String,
        version: u32,
        description: Option<String>,
    },

    /// Delete a deployment
    Undeploy {
        /// Deployment to delete; defaults to the most recent one
        deployment_id: Option<String>,

        /// Delete every deployment except HEAD
        #[arg(short, long, conflicts_with = "deployment_id")]
        all: bool,
    },

    /// List deployments
    Deployments,

    /// List script projects
    List,

    /// Show execution logs
    Logs {
        /// Store the cloud project id used for logs
        #[arg(long)]
        setup: bool,

        /// Cloud project id for --setup
        #[arg(long, requires = "setup")]
        project_id: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Run a function in the script project
    Run {
        /// Function name
        function: String,

        /// Parameters as a JSON array
        #[arg(short, long)]
        params: Option<String>,

        /// Run the latest saved code instead of the deployed version
        #[arg(long)]
        dev_mode: bool,
    },

    /// Print the script editor URL
    Open,

    /// Show or change project settings
    ///
    /// Examples:
    ///   clasp settings                      # print .clasp.json
    ///   clasp settings rootDir              # print one key
    ///   clasp settings fileExtension js     # change one key
    Settings {
        key: Option<String>,
        value: Option<String>,
    },
}
