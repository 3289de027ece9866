//! Warnings and the `Warned<T>` result record
//!
//! The controller attaches advisory strings to responses through the
//! `X-Cf-Warnings` header. They are parallel data: every fallible operation
//! returns its warnings next to its result, on the success path and on the
//! error path alike, and nothing in the workspace ever drops them.
//!
//! Orchestrations thread a local `Warnings` through their sub-calls with
//! [`Warnings::absorb`], which appends the sub-call's warnings and hands back
//! its plain `Result` so `?` can short-circuit:
//!
//! ```rust
//! use skiff_domain::{Error, Warned, Warnings};
//!
//! fn step(value: u32, warning: &str) -> Warned<u32> {
//!     Warned::ok(value, Warnings::from_iter([warning]))
//! }
//!
//! fn inner(warnings: &mut Warnings) -> Result<u32, Error> {
//!     let a = warnings.absorb(step(1, "first"))?;
//!     let b = warnings.absorb(step(2, "second"))?;
//!     Ok(a + b)
//! }
//!
//! let mut warnings = Warnings::new();
//! let result = inner(&mut warnings);
//! let warned = Warned::new(result, warnings);
//! assert_eq!(warned.result, Ok(3));
//! assert_eq!(warned.warnings, ["first", "second"]);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Ordered advisory strings accumulated while satisfying one action.
///
/// Duplicates are preserved and order is emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Warnings(Vec<String>);

impl Warnings {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, warning: impl Into<String>) {
        self.0.push(warning.into());
    }

    /// Appends every warning of `other`, keeping its order.
    pub fn append(&mut self, other: Warnings) {
        self.0.extend(other.0);
    }

    /// Appends the warnings of a sub-call and returns its result.
    pub fn absorb<T, E>(&mut self, warned: Warned<T, E>) -> Result<T, E> {
        self.append(warned.warnings);
        warned.result
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for Warnings {
    fn from(value: Vec<String>) -> Self {
        Self(value)
    }
}

impl<S: Into<String>> FromIterator<S> for Warnings {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for Warnings {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for Warnings {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Warnings {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<const N: usize> PartialEq<[&str; N]> for Warnings {
    fn eq(&self, other: &[&str; N]) -> bool {
        self.0.len() == N && self.0.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl PartialEq<Vec<String>> for Warnings {
    fn eq(&self, other: &Vec<String>) -> bool {
        &self.0 == other
    }
}

/// A result together with the warnings collected while producing it.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub struct Warned<T, E = Error> {
    pub result: Result<T, E>,
    pub warnings: Warnings,
}

impl<T, E> Warned<T, E> {
    pub fn new(result: Result<T, E>, warnings: Warnings) -> Self {
        Self { result, warnings }
    }

    pub fn ok(value: T, warnings: Warnings) -> Self {
        Self::new(Ok(value), warnings)
    }

    pub fn err(error: E, warnings: Warnings) -> Self {
        Self::new(Err(error), warnings)
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn into_parts(self) -> (Result<T, E>, Warnings) {
        (self.result, self.warnings)
    }

    /// Maps the success value, leaving warnings untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Warned<U, E> {
        Warned::new(self.result.map(f), self.warnings)
    }

    /// Maps the error value, leaving warnings untouched.
    pub fn map_err<F>(self, f: impl FnOnce(E) -> F) -> Warned<T, F> {
        Warned::new(self.result.map_err(f), self.warnings)
    }

    /// Puts `earlier` in front of this record's warnings.
    pub fn prepend(mut self, mut earlier: Warnings) -> Self {
        earlier.append(self.warnings);
        self.warnings = earlier;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order_and_duplicates() {
        let mut warnings = Warnings::new();
        warnings.push("a");
        warnings.push("b");
        warnings.push("a");
        assert_eq!(warnings, ["a", "b", "a"]);
        assert_eq!(warnings.len(), 3);
    }

    #[test]
    fn test_absorb_keeps_warnings_on_error() {
        let mut warnings = Warnings::from_iter(["before"]);
        let failed: Warned<()> =
            Warned::err(Error::RequestAborted, Warnings::from_iter(["during"]));

        let result = warnings.absorb(failed);

        assert_eq!(result, Err(Error::RequestAborted));
        assert_eq!(warnings, ["before", "during"]);
    }

    #[test]
    fn test_prepend() {
        let warned: Warned<u8> = Warned::ok(1, Warnings::from_iter(["late"]));
        let warned = warned.prepend(Warnings::from_iter(["early"]));
        assert_eq!(warned.warnings, ["early", "late"]);
        assert_eq!(warned.result, Ok(1));
    }

    #[test]
    fn test_map_keeps_warnings() {
        let warned: Warned<u8> = Warned::ok(2, Warnings::from_iter(["w"]));
        let mapped = warned.map(|v| v * 2);
        assert_eq!(mapped.result, Ok(4));
        assert_eq!(mapped.warnings, ["w"]);
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let warnings = Warnings::from_iter(["one", "two"]);
        let json = serde_json::to_string(&warnings).unwrap();
        assert_eq!(json, r#"["one","two"]"#);
    }

    mod properties {
        use proptest::prelude::*;

        use super::*;

        fn warning_list() -> impl Strategy<Value = Vec<String>> {
            prop::collection::vec("[ -~]{0,12}", 0..6)
        }

        proptest! {
            #[test]
            fn absorb_then_prepend_is_plain_concatenation(
                first in warning_list(),
                second in warning_list(),
                third in warning_list(),
                fail in any::<bool>(),
            ) {
                let mut warnings = Warnings::from(first.clone());
                let sub: Warned<u8> = if fail {
                    Warned::err(Error::RequestAborted, Warnings::from(second.clone()))
                } else {
                    Warned::ok(7, Warnings::from(second.clone()))
                };
                let result = warnings.absorb(sub);
                prop_assert_eq!(result.is_err(), fail);

                let outer = Warned::new(result, Warnings::from(third.clone())).prepend(warnings);
                let expected: Vec<String> = first.into_iter().chain(second).chain(third).collect();
                prop_assert_eq!(outer.warnings, expected);
            }

            #[test]
            fn serde_keeps_order_and_duplicates(list in warning_list()) {
                let warnings = Warnings::from(list.clone());
                let json = serde_json::to_string(&warnings).unwrap();
                prop_assert_eq!(&json, &serde_json::to_string(&list).unwrap());
                let back: Warnings = serde_json::from_str(&json).unwrap();
                prop_assert_eq!(back, list);
            }
        }
    }
}
