use std::time::Duration;

use tracing::Instrument;

use crate::CaseError;
use crate::case::TestCase;
use crate::debugger::Debugger;
use crate::invoker::TargetInvoker;
use crate::report::Report;
use crate::session::{SessionConfig, SessionManager};

/// Default symbol of the tested routine.
pub const DEFAULT_FUNCTION_SYMBOL: &str = "divide_and_round_to_nearest_int";

/// Configuration of a test run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Configuration of the debug session.
    pub session: SessionConfig,

    /// Symbol of the tested routine.
    pub function_symbol: String,

    /// Maximum duration of a single case evaluation.
    ///
    /// `None` waits indefinitely.
    pub case_timeout: Option<Duration>,
}

impl RunConfig {
    /// Creates a new [RunConfig], testing [DEFAULT_FUNCTION_SYMBOL] without
    /// any case timeout.
    pub fn new(session: SessionConfig) -> Self {
        Self {
            session,
            function_symbol: DEFAULT_FUNCTION_SYMBOL.to_owned(),
            case_timeout: None,
        }
    }

    /// Specifies the symbol of the tested routine.
    pub fn with_function_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.function_symbol = symbol.into();
        self
    }

    /// Specifies the maximum duration of a single case evaluation.
    pub fn with_case_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.case_timeout = timeout;
        self
    }
}

/// Test runner, driving every test case against the target.
pub struct TestRunner<D: Debugger> {
    manager: SessionManager<D>,
    config: RunConfig,
}

impl<D: Debugger> TestRunner<D> {
    /// Creates a new [TestRunner].
    pub const fn new(debugger: D, config: RunConfig) -> Self {
        Self {
            manager: SessionManager::new(debugger),
            config,
        }
    }

    /// Runs the given test cases, in order.
    ///
    /// A failing case doesn't prevent the next ones from running. However,
    /// failing to establish the debug session aborts the run before any case
    /// is run.
    ///
    /// The debug session is torn down before returning, whatever the
    /// outcome of the cases. Once a case timed out, the debugger may never
    /// answer again, so the session is abandoned instead.
    #[tracing::instrument(name = "Run", skip_all, fields(cases = cases.len()))]
    pub async fn run(mut self, cases: &[TestCase]) -> Report<D::Error> {
        let mut report = Report::new();
        let mut unresponsive = false;

        for case in cases {
            let session = match self.manager.establish(&self.config.session).await {
                Ok(session) => session,
                Err(e) => {
                    tracing::error!(error = %e, "failed to establish the debug session");
                    report.abort(e);
                    break;
                }
            };

            let result = TargetInvoker::new(session)
                .with_timeout(self.config.case_timeout)
                .invoke::<u32>(
                    &self.config.function_symbol,
                    &[case.dividend(), case.divisor()],
                )
                .instrument(tracing::info_span!("Case", dividend = case.dividend()))
                .await
                .map(i128::from);

            match &result {
                Ok(actual) if *actual == i128::from(case.expected()) => {
                    tracing::debug!(%case, "passed");
                }
                Ok(actual) => tracing::warn!(%case, actual, "mismatch"),
                Err(e) => {
                    unresponsive |= matches!(e, CaseError::Timeout(_));
                    tracing::warn!(%case, error = %e, "failed");
                }
            }

            report.record(*case, result);
        }

        if unresponsive {
            self.manager.abandon();
        } else if let Err(e) = self.manager.teardown().await {
            tracing::warn!(error = %e, "failed to tear down the debug session");
        }

        tracing::info!(
            passed = report.passed(),
            failed = report.failed(),
            "run completed"
        );

        report
    }
}
