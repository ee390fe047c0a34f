use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use crate::SetupError;
use crate::debugger::{DebugSession, Debugger, RemoteEndpoint, StopReason};

/// Default symbol at which the target is halted.
pub const DEFAULT_ENTRY_SYMBOL: &str = "main";

/// Default monitor command resetting a remote target.
pub const DEFAULT_RESET_COMMAND: &str = "reset";

/// Execution environment of the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// The target image is run directly under the debugger.
    Local,

    /// The debugger connects to an already-running debug stub, then resets
    /// the target.
    Remote {
        /// Address of the debug stub.
        endpoint: RemoteEndpoint,

        /// Monitor command resetting the target.
        reset_command: String,
    },
}

impl Backend {
    /// Creates a remote backend, reset with [DEFAULT_RESET_COMMAND].
    pub fn remote(endpoint: RemoteEndpoint) -> Self {
        Self::Remote {
            endpoint,
            reset_command: DEFAULT_RESET_COMMAND.to_owned(),
        }
    }

    /// Returns the kind of this backend.
    pub const fn kind(&self) -> BackendKind {
        match self {
            Self::Local => BackendKind::Local,
            Self::Remote { .. } => BackendKind::Remote,
        }
    }
}

/// Kind of [Backend].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// See [Backend::Local].
    Local,

    /// See [Backend::Remote].
    Remote,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Remote => f.write_str("remote"),
        }
    }
}

/// Configuration of the debug session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Target image whose symbols are loaded by the debugger.
    pub image: PathBuf,

    /// Execution environment of the target.
    pub backend: Backend,

    /// Symbol at which the target is halted.
    pub entry_symbol: String,

    /// Maximum duration of the session establishment.
    ///
    /// `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl SessionConfig {
    /// Creates a new [SessionConfig], halting the target at
    /// [DEFAULT_ENTRY_SYMBOL] without any timeout.
    pub fn new(image: impl Into<PathBuf>, backend: Backend) -> Self {
        Self {
            image: image.into(),
            backend,
            entry_symbol: DEFAULT_ENTRY_SYMBOL.to_owned(),
            timeout: None,
        }
    }

    /// Specifies the symbol at which the target is halted.
    pub fn with_entry_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.entry_symbol = symbol.into();
        self
    }

    /// Specifies the maximum duration of the session establishment.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Breakpoint armed by the debugger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breakpoint {
    /// Function symbol of the breakpoint.
    pub symbol: String,

    /// Number identifying the breakpoint within the debugger.
    pub number: u32,
}

/// Debug session over a target halted at its entry breakpoint.
///
/// It only exists once the entry breakpoint was hit, and is only lent out
/// while the target stays halted.
pub struct TargetSession<S> {
    backend: BackendKind,
    entry: Breakpoint,
    debug: S,
}

impl<S: DebugSession> TargetSession<S> {
    /// Returns the kind of backend the target runs on.
    pub const fn backend(&self) -> BackendKind {
        self.backend
    }

    /// Returns the breakpoint the target is halted at.
    pub const fn entry(&self) -> &Breakpoint {
        &self.entry
    }

    pub(crate) fn debug_session_mut(&mut self) -> &mut S {
        &mut self.debug
    }
}

/// Manager of the (single) debug session of a run.
pub struct SessionManager<D: Debugger> {
    debugger: D,
    session: Option<TargetSession<D::Session>>,
}

impl<D: Debugger> SessionManager<D> {
    /// Creates a new [SessionManager], without any established session.
    pub const fn new(debugger: D) -> Self {
        Self {
            debugger,
            session: None,
        }
    }

    /// Returns whether the session is established.
    pub const fn is_established(&self) -> bool {
        self.session.is_some()
    }

    /// Establishes the debug session, leaving the target halted at its
    /// entry breakpoint.
    ///
    /// # Note
    ///
    /// Once the session is established, subsequent calls return it without
    /// any further interaction with the target (`config` is then ignored).
    pub async fn establish(
        &mut self,
        config: &SessionConfig,
    ) -> Result<&mut TargetSession<D::Session>, SetupError<D::Error>> {
        let session = match self.session.take() {
            Some(session) => session,
            None => with_timeout(config.timeout, start(&mut self.debugger, config))
                .await
                .map_err(SetupError::<D::Error>::Timeout)??,
        };

        Ok(self.session.insert(session))
    }

    /// Tears the debug session down (if established).
    #[tracing::instrument(name = "Teardown", skip_all)]
    pub async fn teardown(self) -> Result<(), D::Error> {
        let Some(session) = self.session else {
            return Ok(());
        };

        session.debug.terminate().await?;

        tracing::info!("debug session terminated");

        Ok(())
    }

    /// Drops the debug session (if established) without asking the
    /// debugger to exit.
    ///
    /// This is the only way out of a session whose debugger stopped
    /// answering (e.g., stuck in a call that never returns).
    pub fn abandon(self) {
        if self.session.is_some() {
            tracing::warn!("debug session abandoned");
        }
    }
}

#[tracing::instrument(
    name = "Establish",
    skip_all,
    fields(backend = %config.backend.kind(), entry = %config.entry_symbol)
)]
async fn start<D: Debugger>(
    debugger: &mut D,
    config: &SessionConfig,
) -> Result<TargetSession<D::Session>, SetupError<D::Error>> {
    let symbol = &config.entry_symbol;

    let mut debug = debugger
        .launch(&config.image)
        .await
        .map_err(|source| SetupError::Launch {
            image: config.image.clone(),
            source,
        })?;

    if let Backend::Remote {
        endpoint,
        reset_command,
    } = &config.backend
    {
        debug
            .connect_remote(endpoint)
            .await
            .map_err(|source| SetupError::Connect {
                endpoint: endpoint.clone(),
                source,
            })?;

        tracing::info!(%endpoint, "connected to debug stub");

        debug
            .monitor(reset_command)
            .await
            .map_err(|source| SetupError::Reset {
                command: reset_command.clone(),
                source,
            })?;

        tracing::info!(command = %reset_command, "target reset");
    }

    let number = debug
        .insert_breakpoint(symbol)
        .await
        .map_err(|source| SetupError::Breakpoint {
            symbol: symbol.clone(),
            source,
        })?;

    let stop = match config.backend {
        Backend::Local => debug.run().await,
        Backend::Remote { .. } => debug.resume().await,
    }
    .map_err(|source| SetupError::Execution {
        symbol: symbol.clone(),
        source,
    })?;

    match stop {
        StopReason::Breakpoint { number: hit, .. } if hit == number => {
            tracing::info!(breakpoint = number, "target halted at entry");
        }
        reason => {
            return Err(SetupError::EntryNotReached {
                symbol: symbol.clone(),
                reason,
            });
        }
    }

    Ok(TargetSession {
        backend: config.backend.kind(),
        entry: Breakpoint {
            symbol: symbol.clone(),
            number,
        },
        debug,
    })
}

/// Awaits the given future, failing if it doesn't complete in time.
pub(crate) async fn with_timeout<F: Future>(
    timeout: Option<Duration>,
    fut: F,
) -> Result<F::Output, Duration> {
    match timeout {
        Some(timeout) => tokio::time::timeout(timeout, fut)
            .await
            .map_err(|_| timeout),
        None => Ok(fut.await),
    }
}
