//! Test discovery - turn a test case into an ordered list of tests
//!
//! A test case hands over its tests explicitly through [`TestCase::tests`].
//! Labels are kept exactly as declared; nothing downstream strips or
//! rewrites them.

use futures_util::future::{FutureExt, LocalBoxFuture};
use std::fmt;
use std::future::Future;
use std::rc::Rc;

/// Future produced by one invocation of a test body
pub type TestFuture = LocalBoxFuture<'static, anyhow::Result<()>>;

/// A labeled, async, possibly failing unit of work
#[derive(Clone)]
pub struct Test {
    label: String,
    body: Rc<dyn Fn() -> TestFuture>,
}

impl Test {
    /// Create a new test from a label and a body
    pub fn new<F, Fut>(label: impl Into<String>, body: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
    {
        Self {
            label: label.into(),
            body: Rc::new(move || body().boxed_local()),
        }
    }

    /// Get the test label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Start one execution of the body
    pub fn run(&self) -> TestFuture {
        (self.body)()
    }
}

impl fmt::Debug for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Test").field("label", &self.label).finish()
    }
}

/// Tests of a case, in declaration order
#[derive(Debug, Clone, Default)]
pub struct TestList {
    tests: Vec<Test>,
}

impl TestList {
    /// Create a new, empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a test
    pub fn test<F, Fut>(mut self, label: impl Into<String>, body: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = anyhow::Result<()>> + 'static,
    {
        self.tests.push(Test::new(label, body));
        self
    }

    /// Append an already built test
    pub fn push(&mut self, test: Test) {
        self.tests.push(test);
    }

    /// Get the number of tests
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// Check if the list has no tests
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Get the labels in declaration order
    pub fn labels(&self) -> Vec<&str> {
        self.tests.iter().map(Test::label).collect()
    }

    /// Consume the list into its tests
    pub fn into_vec(self) -> Vec<Test> {
        self.tests
    }
}

impl IntoIterator for TestList {
    type Item = Test;
    type IntoIter = std::vec::IntoIter<Test>;

    fn into_iter(self) -> Self::IntoIter {
        self.tests.into_iter()
    }
}

/// A named bundle of tests
///
/// The instance is consumed by [`tests`](TestCase::tests); only the closures
/// it returns outlive discovery.
pub trait TestCase: 'static {
    /// Display name, used for the suite header
    fn name(&self) -> String {
        short_type_name::<Self>().to_string()
    }

    /// Tests in the order they should run
    fn tests(self) -> TestList
    where
        Self: Sized;
}

/// Materialize the tests of `case`
pub fn discover<C: TestCase>(case: C) -> Vec<Test> {
    let tests = case.tests().into_vec();
    tracing::trace!(
        labels = ?tests.iter().map(Test::label).collect::<Vec<_>>(),
        "discovered tests"
    );
    tests
}

/// `my_crate::demo::MathTests<u8>` -> `MathTests`
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Build a [`TestList`] from async methods of a case
///
/// Each method must look like `async fn name(&self) -> anyhow::Result<()>`.
/// Labels take the wrapped-storage form `_name`.
///
/// ```ignore
/// impl TestCase for NetworkTests {
///     fn tests(self) -> TestList {
///         test_list![self => resolves_host, times_out]
///     }
/// }
/// ```
#[macro_export]
macro_rules! test_list {
    ($case:expr => $($method:ident),* $(,)?) => {{
        #[allow(unused_variables)]
        let case = ::std::rc::Rc::new($case);
        $crate::discovery::TestList::new()
        $(
            .test(concat!("_", stringify!($method)), {
                let case = ::std::rc::Rc::clone(&case);
                move || {
                    let case = ::std::rc::Rc::clone(&case);
                    async move { case.$method().await }
                }
            })
        )*
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Counter {
        calls: Rc<Cell<u32>>,
    }

    impl Counter {
        async fn first(&self) -> anyhow::Result<()> {
            self.calls.set(self.calls.get() + 1);
            Ok(())
        }

        async fn second(&self) -> anyhow::Result<()> {
            anyhow::bail!("second failed")
        }
    }

    impl TestCase for Counter {
        fn tests(self) -> TestList {
            crate::test_list![self => first, second]
        }
    }

    struct Manual;

    impl TestCase for Manual {
        fn name(&self) -> String {
            "Manual cases".to_string()
        }

        fn tests(self) -> TestList {
            TestList::new()
                .test("zeta", || async { Ok(()) })
                .test("alpha", || async { Ok(()) })
        }
    }

    #[test]
    fn test_macro_labels_keep_prefix_and_order() {
        let tests = discover(Counter::default());
        let labels: Vec<_> = tests.iter().map(Test::label).collect();
        assert_eq!(labels, vec!["_first", "_second"]);
    }

    #[test]
    fn test_builder_preserves_declaration_order() {
        let list = Manual.tests();
        assert_eq!(list.labels(), vec!["zeta", "alpha"]);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_default_name_is_short_type_name() {
        assert_eq!(Counter::default().name(), "Counter");
        assert_eq!(Manual.name(), "Manual cases");
        assert_eq!(short_type_name::<Vec<u8>>(), "Vec");
    }

    #[tokio::test]
    async fn test_bodies_share_case_state() {
        let calls = Rc::new(Cell::new(0));
        let tests = discover(Counter {
            calls: Rc::clone(&calls),
        });

        tests[0].run().await.unwrap();
        tests[0].run().await.unwrap();
        assert_eq!(calls.get(), 2);

        let err = tests[1].run().await.unwrap_err();
        assert_eq!(err.to_string(), "second failed");
    }

    #[test]
    fn test_empty_case() {
        struct Empty;
        impl TestCase for Empty {
            fn tests(self) -> TestList {
                crate::test_list![self =>]
            }
        }

        assert!(discover(Empty).is_empty());
    }
}
