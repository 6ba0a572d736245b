//! Suite orchestration - run registered cases in order
//!
//! One driver future executes every pending case, one after another, and
//! every test of a case strictly in sequence. Tests never overlap, which is
//! what keeps the current-test context meaningful. A test that returns an
//! error (or panics) is reported through [`fail`](crate::report::fail) and
//! the driver moves on. A raw case runner that panics is reported at its
//! header the same way; nothing escapes a case.

use crate::config::HarnessConfig;
use crate::context;
use crate::discovery::{discover, Test, TestCase};
use crate::registry::{CaseRunner, Registry};
use crate::report::check;
use crate::sink::{ConsoleSink, ReportSink, SharedSink};
use futures_util::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::rc::Rc;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::LocalSet;

/// Build the suite header for a case name
pub fn header_for(case_name: &str) -> String {
    format!("Running: {}", case_name)
}

/// A set of test cases with build → run → discard lifecycle
pub struct Suite {
    registry: Registry,
    /// Entries before this index already ran
    completed: usize,
    config: HarnessConfig,
    sink: SharedSink,
}

impl Default for Suite {
    fn default() -> Self {
        Self::new()
    }
}

impl Suite {
    /// Create a suite that prints to stdout
    pub fn new() -> Self {
        Self::with_config(HarnessConfig::default())
    }

    /// Create a suite that prints to stdout using `config`
    pub fn with_config(config: HarnessConfig) -> Self {
        Self {
            registry: Registry::new(),
            completed: 0,
            sink: Arc::new(ConsoleSink::new(config.clone())),
            config,
        }
    }

    /// Send headers and reports somewhere other than stdout
    pub fn with_sink(mut self, sink: impl ReportSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// Get the suite configuration
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Get the registered cases
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Cases registered but not yet run
    pub fn pending(&self) -> usize {
        self.registry.size().saturating_sub(self.completed)
    }

    /// Construct a case with `factory` and register its tests
    pub fn setup<C, F>(&mut self, factory: F) -> &mut Self
    where
        C: TestCase,
        F: FnOnce() -> C,
    {
        let case = factory();
        let name = case.name();
        let tests: Rc<[Test]> = discover(case).into();
        tracing::debug!(case = %name, tests = tests.len(), "registered case");

        self.register(header_for(&name), move || {
            run_case(name.clone(), Rc::clone(&tests))
        })
    }

    /// Register a case that can be built with `Default`
    pub fn setup_default<C>(&mut self) -> &mut Self
    where
        C: TestCase + Default,
    {
        self.setup(C::default)
    }

    /// Register a raw case runner under `header`
    pub fn register<F, Fut>(&mut self, header: impl Into<String>, runner: F) -> &mut Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        self.registry.register(header, runner);
        self
    }

    /// Run every pending case and block until all of them finished
    ///
    /// Must not be called from inside an async runtime; use
    /// [`run_async`](Suite::run_async) there.
    pub fn run(&mut self) {
        let batch = self.take_pending();
        if batch.is_empty() {
            return;
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("Failed to initialize tokio runtime");

        let (outstanding, mut drained) = watch::channel(batch.len());
        let driver = drive(batch, Arc::clone(&self.sink), outstanding);
        let local = LocalSet::new();

        runtime.block_on(local.run_until(async move {
            tokio::task::spawn_local(driver);
            // An early close means the driver itself went away
            let _ = drained.wait_for(|remaining| *remaining == 0).await;
        }));
    }

    /// Run every pending case on the current runtime
    pub async fn run_async(&mut self) {
        let batch = self.take_pending();
        if batch.is_empty() {
            return;
        }

        let (outstanding, _drained) = watch::channel(batch.len());
        drive(batch, Arc::clone(&self.sink), outstanding).await;
    }

    fn take_pending(&mut self) -> Vec<(String, CaseRunner)> {
        let batch: Vec<_> = self
            .registry
            .entries()
            .skip(self.completed)
            .map(|(header, runner)| (header.to_string(), Rc::clone(runner)))
            .collect();
        self.completed = self.registry.size();
        batch
    }
}

/// The single driver: header, case, separator, decrement
async fn drive(
    batch: Vec<(String, CaseRunner)>,
    sink: SharedSink,
    outstanding: watch::Sender<usize>,
) {
    let cases = batch.len();
    let _fallback = context::install_fallback(Arc::clone(&sink));
    context::scope(Arc::clone(&sink), async move {
        for (header, runner) in batch {
            sink.header(&header);
            tracing::debug!(case = %header, "case started");
            if let Err(panic) = AssertUnwindSafe(async { runner().await })
                .catch_unwind()
                .await
            {
                let message = panic_message(panic.as_ref());
                tracing::warn!(case = %header, error = %message, "case runner panicked");
                check().at(&header).fail(&message, "");
                context::clear();
            }
            sink.separator();
            outstanding.send_modify(|remaining| *remaining = remaining.saturating_sub(1));
            tracing::debug!(case = %header, remaining = *outstanding.borrow(), "case finished");
        }
    })
    .await;
    tracing::info!(cases, "suite finished");
}

/// Run the tests of one case in declaration order
pub async fn run_case(case_name: String, tests: Rc<[Test]>) {
    let mut failed = 0usize;
    for test in tests.iter() {
        if !run_test(&case_name, test).await {
            failed += 1;
        }
    }
    tracing::debug!(case = %case_name, tests = tests.len(), failed, "case complete");
}

/// Execute one test; `false` if its body errored or panicked
async fn run_test(case_name: &str, test: &Test) -> bool {
    context::set(test.label());
    tracing::trace!(test = test.label(), "test started");

    // The error's context chain, outermost first
    let message = match AssertUnwindSafe(test.run()).catch_unwind().await {
        Ok(Ok(())) => None,
        Ok(Err(error)) => Some(format!("{:#}", error)),
        Err(panic) => Some(panic_message(panic.as_ref())),
    };

    if let Some(message) = &message {
        tracing::warn!(test = test.label(), error = %message, "test body failed");
        check().at(case_name).fail(message, "");
    }

    context::clear();
    message.is_none()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", text)
    } else if let Some(text) = payload.downcast_ref::<String>() {
        format!("panicked: {}", text)
    } else {
        "panicked".to_string()
    }
}
