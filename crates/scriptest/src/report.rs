//! Expectations and assertions
//!
//! Every check prints exactly one line and never interrupts control flow:
//!
//! ```text
//! <location> <marker> <test name> — <description>
//! ```
//!
//! The `— <description>` tail is omitted when the description is empty.
//! The test name comes from [`context`](crate::context) unless overridden.
//!
//! # API
//!
//! - `assert(condition, description)` — pass if `condition` holds
//! - `assert_equal(lhs, rhs, description)` — pass if `lhs == rhs`; a failing
//!   comparison without a description prints `"<lhs> != <rhs>"`
//! - `assert_not_nil(option, description)` — pass if the option is `Some`
//! - `fail(message, description)` — always fails
//! - `expect(value).to_be(expected)` / `.to_match(Matcher::EqualTo(expected))`
//!   / `.not_to_be(other)`
//!
//! The free functions capture their call site with `#[track_caller]`. Use
//! [`check`] to supply an explicit location or test name instead.

use crate::config::HarnessConfig;
use crate::context;
use std::fmt::Debug;
use std::panic::Location;

/// Result of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
}

impl Outcome {
    /// Create an outcome from a condition
    pub fn from_bool(passed: bool) -> Self {
        if passed {
            Outcome::Pass
        } else {
            Outcome::Fail
        }
    }

    /// Check if the outcome is a pass
    pub fn is_pass(self) -> bool {
        self == Outcome::Pass
    }

    /// Check if the outcome is a failure
    pub fn is_fail(self) -> bool {
        self == Outcome::Fail
    }
}

/// One printed report line, before rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Call-site token, usually `file:line`
    pub location: String,
    pub outcome: Outcome,
    /// `None` when the check ran outside of any test
    pub test_name: Option<String>,
    /// Empty when there is nothing to add
    pub description: String,
}

impl Report {
    /// Create a new report
    pub fn new(
        location: impl Into<String>,
        outcome: Outcome,
        test_name: Option<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            location: location.into(),
            outcome,
            test_name,
            description: description.into(),
        }
    }

    /// Render in the console format using the configured markers
    pub fn render(&self, config: &HarnessConfig) -> String {
        let marker = match self.outcome {
            Outcome::Pass => &config.pass_marker,
            Outcome::Fail => &config.fail_marker,
        };
        let name = self
            .test_name
            .as_deref()
            .unwrap_or(&config.unknown_test_name);

        if self.description.is_empty() {
            format!("{} {} {}", self.location, marker, name)
        } else {
            format!(
                "{} {} {} — {}",
                self.location, marker, name, self.description
            )
        }
    }
}

/// Builder for checks with an explicit location or test name
#[derive(Debug, Clone)]
pub struct Check {
    location: String,
    test_name: Option<String>,
}

/// Start a check located at the caller
#[track_caller]
pub fn check() -> Check {
    Check::here()
}

impl Check {
    /// Location of the caller, as `file:line`
    #[track_caller]
    pub fn here() -> Self {
        let caller = Location::caller();
        Self {
            location: format!("{}:{}", caller.file(), caller.line()),
            test_name: None,
        }
    }

    /// Override the location token
    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Override the test name taken from the context
    pub fn named(mut self, test_name: impl Into<String>) -> Self {
        self.test_name = Some(test_name.into());
        self
    }

    /// Pass if `condition` holds
    pub fn assert(&self, condition: bool, description: &str) -> Outcome {
        self.emit(Outcome::from_bool(condition), description.to_string())
    }

    /// Pass if `lhs == rhs`; the failure text defaults to `{lhs:?} != {rhs:?}`
    pub fn assert_equal<T, U>(&self, lhs: T, rhs: U, description: &str) -> Outcome
    where
        T: PartialEq<U> + Debug,
        U: Debug,
    {
        if lhs == rhs {
            self.emit(Outcome::Pass, description.to_string())
        } else if description.is_empty() {
            self.emit(Outcome::Fail, format!("{:?} != {:?}", lhs, rhs))
        } else {
            self.emit(Outcome::Fail, description.to_string())
        }
    }

    /// Pass if `value` is `Some`
    pub fn assert_not_nil<T>(&self, value: Option<T>, description: &str) -> Outcome {
        self.emit(Outcome::from_bool(value.is_some()), description.to_string())
    }

    /// Report an unconditional failure
    pub fn fail(&self, message: &str, description: &str) -> Outcome {
        let text = if description.is_empty() {
            message.to_string()
        } else {
            format!("{} ({})", message, description)
        };
        self.emit(Outcome::Fail, text)
    }

    /// Start an expectation on `value`
    pub fn expect<T>(self, value: T) -> Expectation<T> {
        Expectation { check: self, value }
    }

    fn emit(&self, outcome: Outcome, description: String) -> Outcome {
        let test_name = self.test_name.clone().or_else(context::get);
        if outcome.is_fail() {
            tracing::debug!(
                location = %self.location,
                test = test_name.as_deref().unwrap_or("-"),
                "check failed"
            );
        }

        let report = Report::new(self.location.clone(), outcome, test_name, description);
        context::sink().report(&report);
        outcome
    }
}

/// Tagged comparison accepted by [`Expectation::to_match`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher<T> {
    EqualTo(T),
}

/// A value awaiting a comparison
#[derive(Debug, Clone)]
pub struct Expectation<T> {
    check: Check,
    value: T,
}

impl<T: Debug> Expectation<T> {
    /// Pass if the value equals `expected`
    pub fn to_be<U>(self, expected: U) -> Outcome
    where
        T: PartialEq<U>,
        U: Debug,
    {
        self.check.assert_equal(self.value, expected, "")
    }

    /// Pass if the value satisfies `matcher`
    pub fn to_match<U>(self, matcher: Matcher<U>) -> Outcome
    where
        T: PartialEq<U>,
        U: Debug,
    {
        match matcher {
            Matcher::EqualTo(expected) => self.to_be(expected),
        }
    }

    /// Pass if the value differs from `unexpected`
    pub fn not_to_be<U>(self, unexpected: U) -> Outcome
    where
        T: PartialEq<U>,
    {
        self.check.assert(self.value != unexpected, "")
    }
}

/// Pass if `condition` holds
#[track_caller]
pub fn assert(condition: bool, description: &str) -> Outcome {
    Check::here().assert(condition, description)
}

/// Pass if `lhs == rhs`
#[track_caller]
pub fn assert_equal<T, U>(lhs: T, rhs: U, description: &str) -> Outcome
where
    T: PartialEq<U> + Debug,
    U: Debug,
{
    Check::here().assert_equal(lhs, rhs, description)
}

/// Pass if `value` is `Some`
#[track_caller]
pub fn assert_not_nil<T>(value: Option<T>, description: &str) -> Outcome {
    Check::here().assert_not_nil(value, description)
}

/// Report an unconditional failure
#[track_caller]
pub fn fail(message: &str, description: &str) -> Outcome {
    Check::here().fail(message, description)
}

/// Start an expectation on `value`
#[track_caller]
pub fn expect<T>(value: T) -> Expectation<T> {
    Check::here().expect(value)
}
