use std::path::PathBuf;
use std::time::Duration;

use crate::debugger::{RemoteEndpoint, StopReason};

/// Error raised while establishing the debug session.
///
/// It is fatal to the whole run: no case can execute without a halted
/// target.
#[derive(thiserror::Error, Debug)]
pub enum SetupError<E> {
    /// The debugger couldn't be launched.
    #[error("failed to launch the debugger for {}", .image.display())]
    Launch {
        /// Target image given to the debugger.
        image: PathBuf,

        /// Debugger error.
        #[source]
        source: E,
    },

    /// The remote debug stub couldn't be reached.
    #[error("failed to connect to the debug stub at {endpoint}")]
    Connect {
        /// Address of the debug stub.
        endpoint: RemoteEndpoint,

        /// Debugger error.
        #[source]
        source: E,
    },

    /// The remote target couldn't be reset.
    #[error("monitor command `{command}` failed")]
    Reset {
        /// Monitor command resetting the target.
        command: String,

        /// Debugger error.
        #[source]
        source: E,
    },

    /// The entry breakpoint couldn't be armed.
    #[error("failed to arm a breakpoint at `{symbol}`")]
    Breakpoint {
        /// Entry symbol.
        symbol: String,

        /// Debugger error.
        #[source]
        source: E,
    },

    /// The target couldn't be started or resumed.
    #[error("failed to execute the target up to `{symbol}`")]
    Execution {
        /// Entry symbol.
        symbol: String,

        /// Debugger error.
        #[source]
        source: E,
    },

    /// The target stopped somewhere else than at the entry breakpoint.
    #[error("target stopped before reaching `{symbol}`: {reason}")]
    EntryNotReached {
        /// Entry symbol.
        symbol: String,

        /// Reason why the target stopped.
        reason: StopReason,
    },

    /// The session wasn't established in time.
    #[error("session establishment timed out after {0:?}")]
    Timeout(Duration),
}

/// Error raised while evaluating a single test case.
///
/// It is scoped to that case, and doesn't affect subsequent ones.
#[derive(thiserror::Error, Debug)]
pub enum CaseError<E> {
    /// The call expression couldn't be evaluated within the target.
    #[error("failed to evaluate `{expression}`")]
    Evaluation {
        /// Evaluated expression.
        expression: String,

        /// Debugger error.
        #[source]
        source: E,
    },

    /// The evaluated value couldn't be coerced to the expected integer type.
    #[error("value `{value}` cannot be converted to {ty}")]
    Conversion {
        /// Textual value returned by the debugger.
        value: String,

        /// Name of the expected integer type.
        ty: &'static str,
    },

    /// The evaluated value differs from the reference result.
    #[error("expected {expected}, got {actual}")]
    Mismatch {
        /// Value returned by the target.
        actual: i128,

        /// Value computed by the reference oracle.
        expected: i128,
    },

    /// The evaluation didn't complete in time.
    #[error("evaluation timed out after {0:?}")]
    Timeout(Duration),
}
