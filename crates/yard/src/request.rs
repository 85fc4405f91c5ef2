// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The network stack's request object.

use std::sync::atomic::{AtomicBool, Ordering};

use swy_proto::{RequestDescriptor, Scheme};
use url::Url;

/// A network request, owned by the stack for its whole lifetime.
///
/// The stack keeps the owning `Arc`; the interception core only ever holds
/// `Weak` references, so a request that goes away mid-flight is observed as
/// a failed upgrade rather than a dangling pointer. Cancellation is
/// cooperative: `cancel` flips a flag that every deferred resumption checks
/// before doing work.
#[derive(Debug)]
pub struct UrlRequest {
    method: String,
    url: Url,
    referrer: String,
    cancelled: AtomicBool,
}

impl UrlRequest {
    pub fn new(
        method: impl Into<String>,
        url: impl AsRef<str>,
        referrer: impl Into<String>,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            method: method.into(),
            url: Url::parse(url.as_ref())?,
            referrer: referrer.into(),
            cancelled: AtomicBool::new(false),
        })
    }

    /// A plain GET with no referrer.
    pub fn get(url: impl AsRef<str>) -> Result<Self, url::ParseError> {
        Self::new("GET", url, "")
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn referrer(&self) -> &str {
        &self.referrer
    }

    /// Scheme of the request URL. The URL parser lower-cases schemes, so
    /// lookups against the case-sensitive registry always see lower case.
    pub fn scheme(&self) -> Scheme {
        Scheme::from(self.url.scheme())
    }

    /// Snapshot handed to decision logic on the user context.
    pub fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor::new(&self.method, self.url.as_str(), &self.referrer)
    }

    /// Mark the request as cancelled. Deferred work checks this before
    /// resuming; no job will be started afterwards.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
