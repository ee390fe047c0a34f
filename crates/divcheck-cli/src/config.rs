use std::time::Duration;

use divcheck_harness::debugger::RemoteEndpoint;
use divcheck_harness::runner::{DEFAULT_FUNCTION_SYMBOL, RunConfig};
use divcheck_harness::session::{
    Backend, DEFAULT_ENTRY_SYMBOL, DEFAULT_RESET_COMMAND, SessionConfig,
};

/// Configuration of a test run.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct HarnessConfig {
    /// Path to the target image.
    #[knus(child, unwrap(argument))]
    pub image: String,

    /// Symbol at which the target is halted before running the cases.
    #[knus(child, default = DEFAULT_ENTRY_SYMBOL.to_owned(), unwrap(argument))]
    pub entry: String,

    /// Symbol of the tested routine.
    #[knus(child, default = DEFAULT_FUNCTION_SYMBOL.to_owned(), unwrap(argument))]
    pub function: String,

    /// `gdb` executable driving the target.
    #[knus(child, default = "gdb".to_owned(), unwrap(argument))]
    pub gdb: String,

    /// Remote debug stub, if the target isn't run locally.
    #[knus(child)]
    pub remote: Option<RemoteConfig>,

    /// Maximum duration (in milliseconds) of the session establishment.
    #[knus(child, unwrap(argument))]
    pub setup_timeout_ms: Option<u64>,

    /// Maximum duration (in milliseconds) of a single case evaluation.
    #[knus(child, unwrap(argument))]
    pub case_timeout_ms: Option<u64>,
}

/// Configuration of a remote debug stub.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct RemoteConfig {
    /// Host name (or IP address) of the debug stub.
    #[knus(property, default = "localhost".to_owned())]
    pub host: String,

    /// TCP port of the debug stub.
    #[knus(property)]
    pub port: u16,

    /// Monitor command resetting the target.
    #[knus(property, default = DEFAULT_RESET_COMMAND.to_owned())]
    pub reset: String,
}

impl HarnessConfig {
    /// Returns the harness configuration of the test run.
    pub fn run_config(&self) -> RunConfig {
        let backend = match &self.remote {
            Some(remote) => Backend::Remote {
                endpoint: RemoteEndpoint::new(&remote.host, remote.port),
                reset_command: remote.reset.clone(),
            },
            None => Backend::Local,
        };

        let session = SessionConfig::new(&self.image, backend)
            .with_entry_symbol(&self.entry)
            .with_timeout(self.setup_timeout_ms.map(Duration::from_millis));

        RunConfig::new(session)
            .with_function_symbol(&self.function)
            .with_case_timeout(self.case_timeout_ms.map(Duration::from_millis))
    }
}
