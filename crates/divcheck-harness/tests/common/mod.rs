#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use divcheck_harness::debugger::{DebugSession, Debugger, RemoteEndpoint, StopReason};

/// The routine under test, as compiled for the target: `(a + div/2) / div`
/// on 32-bit unsigned integers.
pub fn wrapping_divide_and_round(a: u32, div: u32) -> u32 {
    a.wrapping_add(div / 2) / div
}

/// A correct implementation of the routine under test.
pub fn widening_divide_and_round(a: u32, div: u32) -> u32 {
    ((u64::from(a) + u64::from(div / 2)) / u64::from(div)) as u32
}

#[derive(Debug, thiserror::Error)]
pub enum FakeError {
    #[error("{0}: connection refused")]
    ConnectionRefused(String),

    #[error("function \"{0}\" not defined")]
    UndefinedSymbol(String),

    #[error("malformed expression: {0}")]
    MalformedExpression(String),

    #[error("monitor command not supported: {0}")]
    UnsupportedMonitorCommand(String),
}

/// Interactions of the harness with the fake debugger.
#[derive(Debug, Default)]
pub struct Interactions {
    pub launches: usize,
    pub connects: usize,
    pub resets: usize,
    pub breakpoints: Vec<String>,
    pub runs: usize,
    pub resumes: usize,
    pub entry_hits: usize,
    pub evaluations: Vec<String>,
    pub terminations: usize,
    pub dropped_sessions: usize,
}

/// Behavior of the fake target.
#[derive(Clone)]
pub struct FakeTarget {
    pub image: &'static str,
    pub symbols: Vec<&'static str>,
    pub reachable_stub: Option<RemoteEndpoint>,
    pub routine: fn(u32, u32) -> u32,
    pub exits_before_entry: bool,
    pub hang_on_launch: bool,
    pub hang_on_evaluation: bool,
    pub raw_value: Option<&'static str>,
}

impl Default for FakeTarget {
    fn default() -> Self {
        Self {
            image: "divround.elf",
            symbols: vec!["main", "divide_and_round_to_nearest_int"],
            reachable_stub: Some(RemoteEndpoint::new("localhost", 2331)),
            routine: widening_divide_and_round,
            exits_before_entry: false,
            hang_on_launch: false,
            hang_on_evaluation: false,
            raw_value: None,
        }
    }
}

pub struct FakeDebugger {
    target: FakeTarget,
    interactions: Arc<Mutex<Interactions>>,
}

impl FakeDebugger {
    pub fn new(target: FakeTarget) -> (Self, Arc<Mutex<Interactions>>) {
        let interactions = Arc::new(Mutex::new(Interactions::default()));

        let debugger = Self {
            target,
            interactions: interactions.clone(),
        };

        (debugger, interactions)
    }
}

impl Debugger for FakeDebugger {
    type Session = FakeSession;
    type Error = FakeError;

    async fn launch(&mut self, image: &Path) -> Result<Self::Session, Self::Error> {
        assert_eq!(image, Path::new(self.target.image));

        self.interactions.lock().unwrap().launches += 1;

        if self.target.hang_on_launch {
            std::future::pending::<()>().await;
        }

        Ok(FakeSession {
            target: self.target.clone(),
            interactions: self.interactions.clone(),
            breakpoints: Vec::new(),
        })
    }
}

pub struct FakeSession {
    target: FakeTarget,
    interactions: Arc<Mutex<Interactions>>,
    breakpoints: Vec<String>,
}

impl FakeSession {
    fn stop_at_entry(&mut self) -> StopReason {
        if self.target.exits_before_entry {
            return StopReason::Exited { exit_code: 1 };
        }

        self.interactions.lock().unwrap().entry_hits += 1;

        StopReason::Breakpoint {
            number: self.breakpoints.len() as u32,
            function: self.breakpoints.last().cloned(),
        }
    }
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        if let Ok(mut interactions) = self.interactions.lock() {
            interactions.dropped_sessions += 1;
        }
    }
}

impl DebugSession for FakeSession {
    type Error = FakeError;

    async fn connect_remote(&mut self, endpoint: &RemoteEndpoint) -> Result<(), Self::Error> {
        self.interactions.lock().unwrap().connects += 1;

        if self.target.reachable_stub.as_ref() == Some(endpoint) {
            Ok(())
        } else {
            Err(FakeError::ConnectionRefused(endpoint.to_string()))
        }
    }

    async fn monitor(&mut self, command: &str) -> Result<(), Self::Error> {
        if command != "reset" {
            return Err(FakeError::UnsupportedMonitorCommand(command.to_owned()));
        }

        self.interactions.lock().unwrap().resets += 1;
        Ok(())
    }

    async fn insert_breakpoint(&mut self, symbol: &str) -> Result<u32, Self::Error> {
        if !self.target.symbols.iter().any(|s| *s == symbol) {
            return Err(FakeError::UndefinedSymbol(symbol.to_owned()));
        }

        self.interactions
            .lock()
            .unwrap()
            .breakpoints
            .push(symbol.to_owned());
        self.breakpoints.push(symbol.to_owned());

        Ok(self.breakpoints.len() as u32)
    }

    async fn run(&mut self) -> Result<StopReason, Self::Error> {
        self.interactions.lock().unwrap().runs += 1;
        Ok(self.stop_at_entry())
    }

    async fn resume(&mut self) -> Result<StopReason, Self::Error> {
        self.interactions.lock().unwrap().resumes += 1;
        Ok(self.stop_at_entry())
    }

    async fn evaluate(&mut self, expression: &str) -> Result<String, Self::Error> {
        self.interactions
            .lock()
            .unwrap()
            .evaluations
            .push(expression.to_owned());

        if self.target.hang_on_evaluation {
            std::future::pending::<()>().await;
        }

        let malformed = || FakeError::MalformedExpression(expression.to_owned());

        let (symbol, args) = expression
            .strip_suffix(')')
            .and_then(|expr| expr.split_once('('))
            .ok_or_else(malformed)?;

        if !self.target.symbols.iter().any(|s| *s == symbol) {
            return Err(FakeError::UndefinedSymbol(symbol.to_owned()));
        }

        let args = args
            .split(", ")
            .map(|arg| arg.parse::<u64>().map(|a| a as u32))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| malformed())?;

        let [a, div] = args[..] else {
            return Err(malformed());
        };

        match self.target.raw_value {
            Some(value) => Ok(value.to_owned()),
            None => Ok((self.target.routine)(a, div).to_string()),
        }
    }

    async fn terminate(self) -> Result<(), Self::Error> {
        self.interactions.lock().unwrap().terminations += 1;
        Ok(())
    }
}
