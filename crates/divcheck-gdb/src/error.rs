/// Error type of this crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O error while talking to `gdb`.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// `gdb` couldn't be spawned.
    #[error("failed to spawn {0}: {1}")]
    Spawn(std::path::PathBuf, std::io::Error),

    /// A standard stream of `gdb` wasn't captured.
    #[error("missing gdb {0} pipe")]
    MissingPipe(&'static str),

    /// `gdb` rejected a command.
    #[error("{command}: {msg}")]
    Command {
        /// The rejected MI command.
        command: String,

        /// Error message reported by `gdb`.
        msg: String,
    },

    /// `gdb` answered a command with an unexpected result class.
    #[error("{command}: unexpected result class ^{class}")]
    UnexpectedResult {
        /// The MI command.
        command: String,

        /// Result class reported by `gdb`.
        class: String,
    },

    /// A result record lacks a field.
    #[error("missing field `{0}` in gdb result")]
    MissingField(&'static str),

    /// A line of MI output couldn't be parsed.
    #[error("malformed MI output ({reason}): {line}")]
    Parse {
        /// The malformed line.
        line: String,

        /// Why the line is malformed.
        reason: &'static str,
    },

    /// `gdb` terminated while a response was awaited.
    #[error("gdb terminated unexpectedly")]
    Terminated,
}

/// Result type of this crate.
pub type Result<T> = core::result::Result<T, Error>;
