//! Query string builder for GET endpoints.
//!
//! Keys are static; values are rendered with `Display` when they are added,
//! so ids, numbers, booleans and open string types can be passed directly.

use std::fmt::Display;

/// Ordered query string pairs, as accepted by [`ApiClient`](crate::ApiClient).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair.
    pub fn push(&mut self, key: &'static str, value: impl Display) {
        self.pairs.push((key, value.to_string()));
    }

    /// Append a pair when `value` is set; unset parameters are left out of
    /// the query string entirely.
    pub fn push_opt(&mut self, key: &'static str, value: Option<impl Display>) {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Chainable form of [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, key: &'static str, value: impl Display) -> Self {
        self.push(key, value);
        self
    }

    /// Borrow the pairs in insertion order.
    #[must_use]
    pub fn as_pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }
}
