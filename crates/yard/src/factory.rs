// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-scheme handler table consulted on the I/O context.

use std::collections::HashMap;
use std::sync::Arc;

use swy_proto::Scheme;

use crate::handler::SchemeHandler;
use crate::jobs::UrlRequestJob;
use crate::request::UrlRequest;

/// The job factory: one handler per scheme, built-ins included.
///
/// Built-in handlers are ordinary table entries installed at construction,
/// so "is this scheme handled" and "is there a handler to wrap" are the same
/// lookup. Only the I/O context touches this table.
#[derive(Default)]
pub struct JobFactory {
    handlers: HashMap<Scheme, Arc<dyn SchemeHandler>>,
}

impl JobFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install or clear the handler for a scheme. Returns the displaced
    /// handler, if any.
    pub fn set_handler(
        &mut self,
        scheme: Scheme,
        handler: Option<Arc<dyn SchemeHandler>>,
    ) -> Option<Arc<dyn SchemeHandler>> {
        match handler {
            Some(handler) => self.handlers.insert(scheme, handler),
            None => self.handlers.remove(&scheme),
        }
    }

    pub fn get_handler(&self, scheme: &Scheme) -> Option<Arc<dyn SchemeHandler>> {
        self.handlers.get(scheme).cloned()
    }

    /// Swap in a new handler, returning the previous one.
    pub fn replace_handler(
        &mut self,
        scheme: Scheme,
        handler: Arc<dyn SchemeHandler>,
    ) -> Option<Arc<dyn SchemeHandler>> {
        self.handlers.insert(scheme, handler)
    }

    pub fn is_handled_scheme(&self, scheme: &Scheme) -> bool {
        self.handlers.contains_key(scheme)
    }

    /// Synchronous job creation for an incoming request. `Some` for every
    /// request whose scheme has a handler; the default stack behavior covers
    /// the rest.
    pub fn maybe_create_job(&self, request: &Arc<UrlRequest>) -> Option<Arc<dyn UrlRequestJob>> {
        let handler = self.handlers.get(request.url().scheme())?;
        Some(handler.create_job(request))
    }
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
