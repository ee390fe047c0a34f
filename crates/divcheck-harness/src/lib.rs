//! This crate validates an embedded integer "divide-and-round" routine by
//! driving it through a debugger, rather than calling it directly.
//!
//! Five components are provided, leaves first:
//! - The [reference oracle](self::oracle), computing the exact expected
//!   result of a division rounded half-up.
//! - The [case generator](self::case), building the finite domain of test
//!   cases (with their expected values) before any target exists.
//! - The [session manager](self::session::SessionManager), establishing a
//!   single debug session per run and halting the target at its entry
//!   symbol.
//! - The [target invoker](self::invoker::TargetInvoker), evaluating a
//!   function call inside the halted target and returning a typed integer.
//! - The [test runner](self::runner::TestRunner), driving every case
//!   against the target and recording the outcomes in a
//!   [report](self::report::Report).
//!
//! # Running the test suite
//!
//! ```no_run
//! use divcheck_harness::case::generate_cases;
//! use divcheck_harness::runner::{RunConfig, TestRunner};
//! use divcheck_harness::session::{Backend, SessionConfig};
//! # use divcheck_harness::debugger::Debugger;
//!
//! # async fn run(debugger: impl Debugger) {
//! let session = SessionConfig::new("target.elf", Backend::Local);
//!
//! let report = TestRunner::new(debugger, RunConfig::new(session))
//!     .run(&generate_cases())
//!     .await;
//!
//! assert!(report.is_success());
//! # }
//! ```
//!
//! # Implementing a debugger backend
//!
//! The [Debugger](self::debugger::Debugger)/[DebugSession](self::debugger::DebugSession)
//! traits describe the debugger control surface consumed by the harness
//! (breakpoints, execution control, expression evaluation). The
//! `divcheck-gdb` crate implements them on top of GDB's machine interface.

/// Module containing traits for implementing a debugger backend.
pub mod debugger;

/// Module generating the test cases.
pub mod case;

mod error;

/// Module invoking functions within the halted target.
pub mod invoker;

/// Module computing the reference results.
pub mod oracle;

/// Module containing the outcome of a test run.
pub mod report;

/// Module implementing the test runner.
pub mod runner;

/// Module establishing the debug session.
pub mod session;

pub use self::error::{CaseError, SetupError};
