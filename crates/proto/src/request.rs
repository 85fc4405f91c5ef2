// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only request snapshot handed to scheme handlers.

use serde::{Deserialize, Serialize};

/// What a scheme handler gets to see of a network request.
///
/// A cheap-to-clone snapshot taken on the I/O context; the request object
/// itself never crosses into user code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub referrer: String,
}

impl RequestDescriptor {
    pub fn new(
        method: impl Into<String>,
        url: impl Into<String>,
        referrer: impl Into<String>,
    ) -> Self {
        Self { method: method.into(), url: url.into(), referrer: referrer.into() }
    }

    /// Descriptor for a plain GET with no referrer.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url, "")
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
