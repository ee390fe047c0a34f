//! This crate provides an implementation of the `divcheck-harness` debugger
//! interface, by driving a `gdb` child process over its machine interface
//! (GDB/MI).
//!
//! Both execution backends of the harness are supported:
//! - **local**: the target image is run by `gdb` itself,
//! - **remote**: `gdb` connects to an already-running debug stub (e.g.,
//!   a JTAG probe server, QEMU), and resets the target through the stub's
//!   monitor.
//!
//! <div class="warning">
//!
//! *This crate is not meant to be used on its own! It merely implements the
//! interface (traits) provided by `divcheck-harness`.*
//!
//! </div>
//!
//! # Example
//!
//! ```no_run
//! use divcheck_gdb::GdbDebugger;
//!
//! use divcheck_harness::case::generate_cases;
//! use divcheck_harness::debugger::RemoteEndpoint;
//! use divcheck_harness::runner::{RunConfig, TestRunner};
//! use divcheck_harness::session::{Backend, SessionConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let backend = Backend::remote(RemoteEndpoint::new("localhost", 2331));
//!     let config = RunConfig::new(SessionConfig::new("firmware.elf", backend));
//!
//!     let report = TestRunner::new(GdbDebugger::new(), config)
//!         .run(&generate_cases())
//!         .await;
//!
//!     assert!(report.is_success());
//! }
//! ```

mod debugger;
mod error;
mod mi;
mod session;

pub use self::debugger::GdbDebugger;
pub use self::error::{Error, Result};
pub use self::session::Session;
