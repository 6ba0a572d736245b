//! Current-test context
//!
//! Tracks the label of the test that is executing so report lines can name
//! it. While a suite is running, the slot lives in a task-local scope that
//! also carries the suite's output sink. Code running outside such a scope
//! (a worker thread, a detached task) falls back to a per-thread slot, so it
//! never observes another test's name. Its reports still go to the sink of
//! the suite that is running, or the stdout console when none is.

use crate::sink::{ConsoleSink, SharedSink};
use std::cell::RefCell;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

struct Scope {
    test: RefCell<Option<String>>,
    sink: SharedSink,
}

tokio::task_local! {
    static SCOPE: Scope;
}

thread_local! {
    static THREAD_TEST: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Sinks of running suites, most recent last
static FALLBACK: Mutex<Vec<(u64, SharedSink)>> = Mutex::new(Vec::new());

static FALLBACK_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Keeps a suite's sink installed for out-of-scope reports until dropped
#[must_use = "the sink is uninstalled when the guard is dropped"]
pub(crate) struct FallbackGuard {
    id: u64,
}

impl Drop for FallbackGuard {
    fn drop(&mut self) {
        FALLBACK
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(id, _)| *id != self.id);
    }
}

/// Route reports made outside any scope to `sink` while the guard lives
pub(crate) fn install_fallback(sink: SharedSink) -> FallbackGuard {
    let id = FALLBACK_ID_COUNTER.fetch_add(1, Ordering::SeqCst);
    FALLBACK
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push((id, sink));
    FallbackGuard { id }
}

/// Run `future` with a fresh, empty slot that reports to `sink`
pub async fn scope<F>(sink: SharedSink, future: F) -> F::Output
where
    F: Future,
{
    SCOPE
        .scope(
            Scope {
                test: RefCell::new(None),
                sink,
            },
            future,
        )
        .await
}

/// Mark `name` as the current test
pub fn set(name: impl Into<String>) {
    let name = name.into();
    if SCOPE
        .try_with(|scope| *scope.test.borrow_mut() = Some(name.clone()))
        .is_err()
    {
        THREAD_TEST.with(|slot| *slot.borrow_mut() = Some(name));
    }
}

/// Name of the current test, if any
pub fn get() -> Option<String> {
    SCOPE
        .try_with(|scope| scope.test.borrow().clone())
        .unwrap_or_else(|_| THREAD_TEST.with(|slot| slot.borrow().clone()))
        .filter(|name| !name.is_empty())
}

/// Forget the current test
pub fn clear() {
    if SCOPE
        .try_with(|scope| *scope.test.borrow_mut() = None)
        .is_err()
    {
        THREAD_TEST.with(|slot| *slot.borrow_mut() = None);
    }
}

/// Sink that report calls made here should write to
pub(crate) fn sink() -> SharedSink {
    SCOPE
        .try_with(|scope| Arc::clone(&scope.sink))
        .unwrap_or_else(|_| fallback_sink())
}

fn fallback_sink() -> SharedSink {
    FALLBACK
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .last()
        .map(|(_, sink)| Arc::clone(sink))
        .unwrap_or_else(|| Arc::new(ConsoleSink::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    #[test]
    fn test_thread_slot_set_get_clear() {
        assert_eq!(get(), None);
        set("_test1");
        assert_eq!(get(), Some("_test1".to_string()));
        clear();
        assert_eq!(get(), None);
    }

    #[test]
    fn test_empty_name_reads_as_none() {
        set("");
        assert_eq!(get(), None);
        clear();
    }

    #[test]
    fn test_other_threads_see_their_own_slot() {
        set("_main");
        let seen = std::thread::spawn(get).join().unwrap();
        assert_eq!(seen, None);
        assert_eq!(get(), Some("_main".to_string()));
        clear();
    }

    #[tokio::test]
    async fn test_scope_isolated_from_thread_slot() {
        set("_outer");
        let inner = scope(Arc::new(MemorySink::new()), async {
            assert_eq!(get(), None);
            set("_inner");
            get()
        })
        .await;

        assert_eq!(inner, Some("_inner".to_string()));
        assert_eq!(get(), Some("_outer".to_string()));
        clear();
    }

    #[tokio::test]
    async fn test_spawned_task_does_not_inherit_scope() {
        let seen = scope(Arc::new(MemorySink::new()), async {
            set("_owner");
            tokio::spawn(async { get() }).await.unwrap()
        })
        .await;

        assert_eq!(seen, None);
    }
}
