//! scriptest - a small in-process test harness for ad-hoc programs
//!
//! Register test cases on a [`Suite`], call [`Suite::run`], and read the
//! results on the console. Tests of a case run strictly one after another;
//! a test may await real asynchronous work, and a [`Gate`] brings
//! completions from other threads back into the test.
//!
//! # Example
//!
//! ```no_run
//! use scriptest::{expect, test_list, Suite, TestCase, TestList};
//!
//! #[derive(Default)]
//! struct Arithmetic;
//!
//! impl Arithmetic {
//!     async fn adds(&self) -> anyhow::Result<()> {
//!         expect(2 + 2).to_be(4);
//!         Ok(())
//!     }
//! }
//!
//! impl TestCase for Arithmetic {
//!     fn tests(self) -> TestList {
//!         test_list![self => adds]
//!     }
//! }
//!
//! let mut suite = Suite::new();
//! suite.setup_default::<Arithmetic>();
//! suite.run();
//! ```
//!
//! Output:
//!
//! ```text
//! Running: Arithmetic
//! -------------------
//! src/main.rs:8 ✅ _adds
//!
//! ```

pub mod config;
pub mod context;
pub mod discovery;
pub mod error;
pub mod gate;
pub mod logging;
pub mod registry;
pub mod report;
pub mod runner;
pub mod sink;

pub use config::HarnessConfig;
pub use discovery::{Test, TestCase, TestList};
pub use error::{ConfigError, GateError};
pub use gate::{expectation, wait, wait_all, Gate};
pub use report::{
    assert, assert_equal, assert_not_nil, check, expect, fail, Matcher, Outcome, Report,
};
pub use runner::Suite;
pub use sink::{ConsoleSink, MemorySink, ReportSink, SinkEvent};
