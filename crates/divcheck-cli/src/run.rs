use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};

use divcheck_gdb::GdbDebugger;
use divcheck_harness::case::generate_cases;
use divcheck_harness::report::Report;
use divcheck_harness::runner::TestRunner;

use kdl::KdlDocument;
use miette::IntoDiagnostic;

use crate::HarnessConfig;
use crate::report::{cases_to_kdl, report_to_kdl};

/// Exit code of a run where every case passed.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code of a run where some case failed.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code of a run aborted by a fatal setup error.
pub const EXIT_SETUP_ERROR: i32 = 2;

/// Runs the subcommand for running every test case.
///
/// On success, the exit code of the run is returned.
pub fn evaluate_run(config: String, output: Option<PathBuf>) -> miette::Result<i32> {
    let config = parse_run_config(config)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .into_diagnostic()?;

    let runner = TestRunner::new(GdbDebugger::with_program(&config.gdb), config.run_config());

    let report = runtime.block_on(runner.run(&generate_cases()));

    write_kdl(report_to_kdl(&report), output)?;

    Ok(exit_code(&report))
}

/// Runs the subcommand for dumping the test cases.
pub fn evaluate_cases(output: Option<PathBuf>) -> miette::Result<()> {
    write_kdl(cases_to_kdl(&generate_cases()), output)
}

/// Returns the process exit code matching the outcome of a run.
pub fn exit_code<E>(report: &Report<E>) -> i32 {
    if report.fatal().is_some() {
        EXIT_SETUP_ERROR
    } else if report.failed() > 0 {
        EXIT_FAILURE
    } else {
        EXIT_SUCCESS
    }
}

fn write_kdl(mut kdl: KdlDocument, output: Option<PathBuf>) -> miette::Result<()> {
    kdl.autoformat();

    let content = kdl.to_string();

    if let Some(output) = output {
        std::fs::write(output, content).into_diagnostic()
    } else {
        std::io::stdout()
            .write_all(content.as_bytes())
            .into_diagnostic()
    }
}

/// Parses the harness configuration, given either inline or as a path to
/// a `.kdl` file.
pub fn parse_run_config(config: String) -> miette::Result<HarnessConfig> {
    let path = Path::new(&config);

    let config = if let Some((filename, "kdl")) = path
        .file_name()
        .and_then(OsStr::to_str)
        .zip(path.extension().and_then(OsStr::to_str))
    {
        let content = std::fs::read_to_string(path).into_diagnostic()?;
        knus::parse(filename, &content)?
    } else {
        knus::parse("<content>", &config)?
    };

    Ok(config)
}
