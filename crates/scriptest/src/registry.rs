//! Test registry - suite headers mapped to case runners

use futures_util::future::{FutureExt, LocalBoxFuture};
use indexmap::IndexMap;
use std::future::Future;
use std::rc::Rc;

/// Future returned by a case runner
pub type CaseFuture = LocalBoxFuture<'static, ()>;

/// Runs every test of one case
pub type CaseRunner = Rc<dyn Fn() -> CaseFuture>;

/// Ordered collection of registered cases
///
/// Iteration follows insertion order. Registering a header that already
/// exists replaces its runner in place.
#[derive(Default)]
pub struct Registry {
    entries: IndexMap<String, CaseRunner>,
}

impl Registry {
    /// Create a new, empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the runner for `header`
    ///
    /// Returns `true` when an earlier entry was replaced.
    pub fn register<F, Fut>(&mut self, header: impl Into<String>, runner: F) -> bool
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let header = header.into();
        let runner: CaseRunner = Rc::new(move || runner().boxed_local());
        let replaced = self.entries.insert(header.clone(), runner).is_some();
        if replaced {
            tracing::debug!(case = %header, "replaced registered case with the same header");
        }
        replaced
    }

    /// Get the number of registered cases
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Check if no case is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in registration order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &CaseRunner)> {
        self.entries
            .iter()
            .map(|(header, runner)| (header.as_str(), runner))
    }

    /// Get the headers in registration order
    pub fn headers(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("headers", &self.headers())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_insertion_order() {
        let mut registry = Registry::new();
        registry.register("Running: B", || async {});
        registry.register("Running: A", || async {});
        registry.register("Running: C", || async {});

        assert_eq!(registry.headers(), vec!["Running: B", "Running: A", "Running: C"]);
        assert_eq!(registry.size(), 3);
    }

    #[test]
    fn test_duplicate_header_overwrites_in_place() {
        let mut registry = Registry::new();
        assert!(!registry.register("Running: A", || async {}));
        assert!(!registry.register("Running: B", || async {}));
        assert!(registry.register("Running: A", || async {}));

        assert_eq!(registry.size(), 2);
        assert_eq!(registry.headers(), vec!["Running: A", "Running: B"]);
    }

    #[tokio::test]
    async fn test_overwritten_runner_is_the_one_kept() {
        use std::cell::RefCell;

        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = Registry::new();

        let first = Rc::clone(&log);
        registry.register("Running: A", move || {
            let log = Rc::clone(&first);
            async move { log.borrow_mut().push("first") }
        });
        let second = Rc::clone(&log);
        registry.register("Running: A", move || {
            let log = Rc::clone(&second);
            async move { log.borrow_mut().push("second") }
        });

        for (_, runner) in registry.entries() {
            runner().await;
        }
        assert_eq!(*log.borrow(), vec!["second"]);
    }
}
