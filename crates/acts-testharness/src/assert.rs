//! ---
//! acts_section: "06-test-runner"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "expect() matchers returning typed assertion failures."
//! acts_version: "v0.1.0"
//! acts_owner: "tbd"
//! ---
use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

/// A failed matcher.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{matcher}: {message}")]
pub struct AssertionError {
    /// Matcher that failed, e.g. `assert_equal`.
    pub matcher: String,
    /// Rendered actual/expected detail.
    pub message: String,
}

impl AssertionError {
    fn new(matcher: &str, message: impl Into<String>) -> Self {
        Self {
            matcher: matcher.to_owned(),
            message: message.into(),
        }
    }
}

/// Result returned by every matcher.
pub type AssertResult = Result<(), AssertionError>;

/// Value under test. Created by [`expect`].
#[derive(Debug, Clone)]
pub struct Expectation<T> {
    actual: T,
}

/// Start an assertion chain on `actual`.
pub fn expect<T>(actual: T) -> Expectation<T> {
    Expectation { actual }
}

fn check(pass: bool, matcher: &str, message: impl FnOnce() -> String) -> AssertResult {
    if pass {
        Ok(())
    } else {
        Err(AssertionError::new(matcher, message()))
    }
}

impl<T: Debug> Expectation<T> {
    /// The wrapped value.
    pub fn actual(&self) -> &T {
        &self.actual
    }

    pub fn assert_equal<U>(&self, expected: U) -> AssertResult
    where
        T: PartialEq<U>,
        U: Debug,
    {
        check(self.actual == expected, "assert_equal", || {
            format!("expected {expected:?}, got {:?}", self.actual)
        })
    }

    pub fn assert_larger<U>(&self, bound: U) -> AssertResult
    where
        T: PartialOrd<U>,
        U: Debug,
    {
        check(self.actual > bound, "assert_larger", || {
            format!("expected a value larger than {bound:?}, got {:?}", self.actual)
        })
    }

    pub fn assert_less<U>(&self, bound: U) -> AssertResult
    where
        T: PartialOrd<U>,
        U: Debug,
    {
        check(self.actual < bound, "assert_less", || {
            format!("expected a value less than {bound:?}, got {:?}", self.actual)
        })
    }

    /// Succeeds when the haystack contains `needle`.
    pub fn assert_contain<N>(&self, needle: &N) -> AssertResult
    where
        T: Haystack<N>,
        N: Debug + ?Sized,
    {
        check(self.actual.has(needle), "assert_contain", || {
            format!("{:?} does not contain {needle:?}", self.actual)
        })
    }

    /// Unconditional failure, for branches a case must never reach.
    pub fn assert_fail(&self) -> AssertResult {
        Err(AssertionError::new(
            "assert_fail",
            format!("reached with {:?}", self.actual),
        ))
    }
}

impl Expectation<bool> {
    pub fn assert_true(&self) -> AssertResult {
        check(self.actual, "assert_true", || "expected true".to_owned())
    }

    pub fn assert_false(&self) -> AssertResult {
        check(!self.actual, "assert_false", || "expected false".to_owned())
    }
}

impl<T: Numeric + Debug> Expectation<T> {
    /// Succeeds when `actual` lies within `delta` of `expected`, bounds included.
    pub fn assert_close(&self, expected: T, delta: T) -> AssertResult {
        let (actual, target, delta) = (self.actual.to_f64(), expected.to_f64(), delta.to_f64());
        check((actual - target).abs() <= delta, "assert_close", || {
            format!("expected {expected:?} +/- {delta}, got {:?}", self.actual)
        })
    }
}

impl<U: Debug> Expectation<Option<U>> {
    /// Succeeds when no value was produced.
    pub fn assert_undefined(&self) -> AssertResult {
        check(self.actual.is_none(), "assert_undefined", || {
            format!("expected no value, got {:?}", self.actual)
        })
    }
}

impl Expectation<JsonValue> {
    pub fn assert_null(&self) -> AssertResult {
        check(self.actual.is_null(), "assert_null", || {
            format!("expected null, got {}", self.actual)
        })
    }

    /// Succeeds when the object has no member named `key`.
    pub fn assert_undefined(&self, key: &str) -> AssertResult {
        check(self.actual.get(key).is_none(), "assert_undefined", || {
            format!("expected no member '{key}', got {}", self.actual)
        })
    }

    /// Checks the JSON type: `null`, `boolean`, `number`, `string`,
    /// `array` or `object`.
    pub fn assert_instance_of(&self, kind: &str) -> AssertResult {
        let actual = json_kind(&self.actual);
        check(actual == kind, "assert_instance_of", || {
            format!("expected {kind}, got {actual} {}", self.actual)
        })
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

/// Primitive numbers accepted by [`Expectation::assert_close`].
pub trait Numeric: Copy {
    /// Lossy conversion used for the distance check.
    fn to_f64(self) -> f64;
}

macro_rules! numeric {
    ($($ty:ty),*) => {
        $(impl Numeric for $ty {
            fn to_f64(self) -> f64 {
                self as f64
            }
        })*
    };
}

numeric!(f32, f64, i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, usize, isize);

/// Containers searchable by [`Expectation::assert_contain`].
pub trait Haystack<N: ?Sized> {
    /// Whether `needle` occurs in `self`.
    fn has(&self, needle: &N) -> bool;
}

impl Haystack<str> for String {
    fn has(&self, needle: &str) -> bool {
        self.contains(needle)
    }
}

impl Haystack<str> for &str {
    fn has(&self, needle: &str) -> bool {
        self.contains(needle)
    }
}

impl<T: PartialEq> Haystack<T> for Vec<T> {
    fn has(&self, needle: &T) -> bool {
        self.contains(needle)
    }
}

impl<T: PartialEq> Haystack<T> for &[T] {
    fn has(&self, needle: &T) -> bool {
        self.contains(needle)
    }
}
