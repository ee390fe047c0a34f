use std::path::PathBuf;

/// Debugger-driven checker of the embedded `divide_and_round_to_nearest_int`
/// routine.
#[derive(clap::Parser)]
pub struct CliOpts {
    /// The command to run.
    #[clap(subcommand)]
    pub action: CliAction,
}

/// The command to run.
#[derive(clap::Subcommand)]
pub enum CliAction {
    /// Command to run every test case against the target image.
    Run {
        /// Harness configuration (KDL format).
        ///
        /// If it ends with `.kdl`, it is treated as a path to a configuration
        /// file. Otherwise it is directly parsed as inline KDL-formatted
        /// configuration.
        #[clap(short, long, value_name = "CONTENT/PATH")]
        config: String,

        /// Path to the optional destination of the report.
        #[clap(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Command to dump the test cases, along with their expected results.
    Cases {
        /// Path to the optional destination of the dump.
        #[clap(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

impl CliOpts {
    /// Parses the CLI from the command-line.
    ///
    /// # Warning
    ///
    /// Exits on error.
    pub fn parse_from_cmdline() -> Self {
        <Self as clap::Parser>::parse()
    }
}
