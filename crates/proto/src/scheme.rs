// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! URL scheme identifier.

use serde::{Deserialize, Serialize};

/// A case-sensitive URL scheme (e.g. "myapp").
///
/// Unique key in the registry map and the factory's handler table. No
/// normalization is applied here; the request side hands us schemes as the
/// URL parser produced them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scheme(String);

impl Scheme {
    pub fn new(scheme: impl Into<String>) -> Self {
        Self(scheme.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Scheme {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Scheme {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for Scheme {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for Scheme {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Scheme {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Scheme {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
#[path = "scheme_tests.rs"]
mod tests;
