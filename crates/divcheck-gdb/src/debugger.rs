use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::Error;
use crate::session::Session;

/// Debugger spawning `gdb` in MI mode.
#[derive(Debug, Clone)]
pub struct GdbDebugger {
    program: PathBuf,
}

impl GdbDebugger {
    /// Creates a new debugger, running the `gdb` found in `PATH`.
    pub fn new() -> Self {
        Self::with_program("gdb")
    }

    /// Creates a new debugger, running the given `gdb` executable (e.g.,
    /// `arm-none-eabi-gdb`, `gdb-multiarch`).
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GdbDebugger {
    fn default() -> Self {
        Self::new()
    }
}

impl divcheck_harness::debugger::Debugger for GdbDebugger {
    type Session = Session;
    type Error = crate::Error;

    #[tracing::instrument(name = "GdbLaunch", skip(self), fields(program = %self.program.display()))]
    async fn launch(&mut self, image: &Path) -> Result<Self::Session, Self::Error> {
        let child = Command::new(&self.program)
            .args(["--nx", "--quiet", "--interpreter=mi3"])
            .kill_on_drop(true)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Spawn(self.program.clone(), e))?;

        let mut session = Session::init(child).await?;
        session.load_image(image).await?;

        Ok(session)
    }
}
