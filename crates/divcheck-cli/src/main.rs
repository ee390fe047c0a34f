#![allow(missing_docs)]
#![allow(clippy::print_stderr)]

use divcheck_cli::{CliAction, CliOpts, EXIT_FAILURE};

use tracing_subscriber::EnvFilter;

fn main() {
    let cli = CliOpts::parse_from_cmdline();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_env_var("DIVCHECK_LOG")
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let res = match cli.action {
        CliAction::Run { config, output } => divcheck_cli::evaluate_run(config, output).map(Some),
        CliAction::Cases { output } => divcheck_cli::evaluate_cases(output).map(|_| None),
    };

    match res {
        Ok(Some(exit_code)) => std::process::exit(exit_code),
        Ok(None) => (),
        Err(e) => {
            eprintln!("{e:?}");
            std::process::exit(EXIT_FAILURE);
        }
    }
}
