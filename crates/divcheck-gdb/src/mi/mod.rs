//! GDB/MI output records.

mod codec;
mod parser;

use std::fmt;

pub use self::codec::MiDecoder;
pub use self::parser::parse_record;

/// Output record emitted by `gdb`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// Result of a command (`^done`, `^error`, ...).
    Result {
        /// Token of the command this record answers.
        token: Option<u64>,

        /// Result class.
        class: ResultClass,

        /// Result values.
        results: Results,
    },

    /// Asynchronous notification (`*stopped`, `=breakpoint-modified`, ...).
    Async {
        /// Token of the command that triggered the notification.
        token: Option<u64>,

        /// Kind of notification.
        kind: AsyncKind,

        /// Notification class (e.g., `stopped`).
        class: String,

        /// Notification values.
        results: Results,
    },

    /// Textual output (`~"..."`, `@"..."`, `&"..."`).
    Stream {
        /// Kind of output.
        kind: StreamKind,

        /// Unescaped text.
        text: String,
    },

    /// End of a batch of output records (`(gdb)`).
    Prompt,

    /// Output line not following the MI syntax (e.g., printed by the
    /// target itself).
    Unrecognized(String),
}

/// Class of a result record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultClass {
    /// `^done`
    Done,

    /// `^running`
    Running,

    /// `^connected`
    Connected,

    /// `^error`
    Error,

    /// `^exit`
    Exit,

    /// Any other class.
    Other(String),
}

impl From<&str> for ResultClass {
    fn from(class: &str) -> Self {
        match class {
            "done" => Self::Done,
            "running" => Self::Running,
            "connected" => Self::Connected,
            "error" => Self::Error,
            "exit" => Self::Exit,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for ResultClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => f.write_str("done"),
            Self::Running => f.write_str("running"),
            Self::Connected => f.write_str("connected"),
            Self::Error => f.write_str("error"),
            Self::Exit => f.write_str("exit"),
            Self::Other(class) => f.write_str(class),
        }
    }
}

/// Kind of asynchronous record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsyncKind {
    /// Change of the target's execution state (`*`).
    Exec,

    /// Progress of a slow operation (`+`).
    Status,

    /// Supplementary information (`=`).
    Notify,
}

/// Kind of stream record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// Output of the CLI console (`~`).
    Console,

    /// Output of the target (`@`).
    Target,

    /// Internal messages of `gdb` (`&`).
    Log,
}

/// Ordered `name=value` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Results(pub Vec<(String, Value)>);

impl Results {
    /// Returns the first value with the given name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find_map(|(n, v)| (n == name).then_some(v))
    }

    /// Returns the first value with the given name, if it is a constant.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }
}

/// Value of a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// C-string constant.
    Const(String),

    /// `{name=value,...}`
    Tuple(Results),

    /// `[value,...]` (a list of `name=value` items holds single-item
    /// tuples).
    List(Vec<Value>),
}

impl Value {
    /// Returns the constant, if this value is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Const(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Returns the tuple, if this value is one.
    pub const fn as_tuple(&self) -> Option<&Results> {
        match self {
            Self::Tuple(results) => Some(results),
            _ => None,
        }
    }
}

/// Quotes the given text as an MI c-string.
pub fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');

    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            c => quoted.push(c),
        }
    }

    quoted.push('"');
    quoted
}
