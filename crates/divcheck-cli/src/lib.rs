//! Crate implementing the CLI commands.

mod cli;
mod config;
mod report;
mod run;

pub use self::cli::{CliAction, CliOpts};
pub use self::config::{HarnessConfig, RemoteConfig};
pub use self::report::{cases_to_kdl, report_to_kdl};
pub use self::run::{
    EXIT_FAILURE, EXIT_SETUP_ERROR, EXIT_SUCCESS, evaluate_cases, evaluate_run, exit_code,
    parse_run_config,
};
