use std::fmt;
use std::future::Future;
use std::path::Path;

/// Trait implementing the launching logic of a debugger.
pub trait Debugger {
    /// Debugging session returned by this debugger.
    type Session: DebugSession<Error = Self::Error>;

    /// Error returned by this trait.
    type Error: std::error::Error;

    /// Launches the debugger with the symbols of the given target image
    /// loaded.
    ///
    /// The returned session is neither running nor connected to any target.
    fn launch(&mut self, image: &Path) -> impl Future<Output = Result<Self::Session, Self::Error>>;
}

/// Trait implementing the control surface of a debugger.
///
/// # Note
///
/// Calls are never issued concurrently: a session serves a single in-flight
/// request at a time.
pub trait DebugSession {
    /// Error returned by this trait.
    type Error: std::error::Error;

    /// Connects to an already-running debug stub.
    fn connect_remote(
        &mut self,
        endpoint: &RemoteEndpoint,
    ) -> impl Future<Output = Result<(), Self::Error>>;

    /// Sends a command to the monitor of the remote debug stub (e.g.,
    /// `reset`).
    fn monitor(&mut self, command: &str) -> impl Future<Output = Result<(), Self::Error>>;

    /// Adds a breakpoint at the given function symbol.
    ///
    /// On success, the number identifying the breakpoint is returned.
    fn insert_breakpoint(&mut self, symbol: &str) -> impl Future<Output = Result<u32, Self::Error>>;

    /// Starts the target image under the debugger, and waits until it stops.
    fn run(&mut self) -> impl Future<Output = Result<StopReason, Self::Error>>;

    /// Resumes the target, and waits until it stops.
    fn resume(&mut self) -> impl Future<Output = Result<StopReason, Self::Error>>;

    /// Evaluates a textual expression within the current context of the
    /// stopped target.
    ///
    /// On success, the textual representation of the resulting value is
    /// returned.
    fn evaluate(&mut self, expression: &str) -> impl Future<Output = Result<String, Self::Error>>;

    /// Terminates the debugging session.
    fn terminate(self) -> impl Future<Output = Result<(), Self::Error>>;
}

/// Network address of a debug stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEndpoint {
    /// Host name (or IP address) of the debug stub.
    pub host: String,

    /// TCP port of the debug stub.
    pub port: u16,
}

impl RemoteEndpoint {
    /// Creates a new [RemoteEndpoint].
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for RemoteEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Reason why the target stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The target has triggered a breakpoint.
    Breakpoint {
        /// Number of the triggered breakpoint.
        number: u32,

        /// Function the target stopped in, if known.
        function: Option<String>,
    },

    /// The target has exited.
    Exited {
        /// Exit code of the target.
        exit_code: i32,
    },

    /// The target has received a signal.
    Signaled {
        /// Name of the signal.
        signal: String,
    },

    /// The target stopped for some other reason.
    Other(String),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Breakpoint {
                number,
                function: Some(function),
            } => write!(f, "breakpoint {number} hit in {function}"),
            Self::Breakpoint {
                number,
                function: None,
            } => write!(f, "breakpoint {number} hit"),
            Self::Exited { exit_code } => write!(f, "exited with code {exit_code}"),
            Self::Signaled { signal } => write!(f, "received {signal}"),
            Self::Other(reason) => f.write_str(reason),
        }
    }
}
