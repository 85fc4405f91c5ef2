// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Factory-facing scheme handlers.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::adapter::AdapterJob;
use crate::bridge::UserCommand;
use crate::jobs::UrlRequestJob;
use crate::request::UrlRequest;

/// What the job factory holds per scheme.
///
/// `create_job` is called synchronously on the I/O context for every
/// matching request and must return a job without blocking; job creation
/// itself cannot fail (resolution may still fail later).
pub trait SchemeHandler: Send + Sync {
    fn create_job(&self, request: &Arc<UrlRequest>) -> Arc<dyn UrlRequestJob>;

    /// Release the wrapped prior handler, if this handler preserves one.
    ///
    /// Lets the factory side restore an intercepted scheme without knowing
    /// the concrete handler type. Handlers that wrap nothing return `None`.
    fn release_wrapped(&self) -> Option<Arc<dyn SchemeHandler>> {
        None
    }
}

/// The handler the registry installs for registered and intercepted schemes.
///
/// Always returns an adapter job, because the real job kind is only known
/// after the user context has been consulted. In interception mode it owns
/// the wrapped prior handler until released on un-interception or dropped
/// with the wrapper.
pub struct CustomSchemeHandler {
    user: mpsc::UnboundedSender<UserCommand>,
    wrapped: Mutex<Option<Arc<dyn SchemeHandler>>>,
}

impl CustomSchemeHandler {
    pub(crate) fn new(user: mpsc::UnboundedSender<UserCommand>) -> Self {
        Self { user, wrapped: Mutex::new(None) }
    }

    /// Preserve the handler this one replaced in the factory.
    pub(crate) fn set_wrapped(&self, prior: Arc<dyn SchemeHandler>) {
        *self.wrapped.lock() = Some(prior);
    }

    fn wrapped_weak(&self) -> Option<Weak<dyn SchemeHandler>> {
        self.wrapped.lock().as_ref().map(Arc::downgrade)
    }
}

impl SchemeHandler for CustomSchemeHandler {
    fn create_job(&self, request: &Arc<UrlRequest>) -> Arc<dyn UrlRequestJob> {
        AdapterJob::create(request, self.wrapped_weak(), self.user.clone())
    }

    fn release_wrapped(&self) -> Option<Arc<dyn SchemeHandler>> {
        self.wrapped.lock().take()
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
