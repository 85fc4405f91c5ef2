// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter job bridging synchronous job creation to asynchronous decisions.

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use parking_lot::Mutex;
use swy_proto::{JobDescriptor, NetError, Scheme, ERR_FAILED, ERR_NOT_IMPLEMENTED};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::bridge::UserCommand;
use crate::handler::SchemeHandler;
use crate::jobs::{JobBuilders, JobPayload, UrlRequestJob};
use crate::request::UrlRequest;

/// Lifecycle of an adapter job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterState {
    /// Constructed on the I/O context, not yet started.
    Created,
    /// Evaluation scheduled on the user context.
    AwaitingDecision,
    /// Decision arrived; concrete job constructed.
    Resolved,
    /// Concrete job is executing; the adapter's role is over.
    Started,
    /// Terminal: cancelled or torn down before a job could start.
    Failed,
}

impl std::fmt::Display for AdapterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AdapterState::Created => "created",
            AdapterState::AwaitingDecision => "awaiting_decision",
            AdapterState::Resolved => "resolved",
            AdapterState::Started => "started",
            AdapterState::Failed => "failed",
        })
    }
}

struct AdapterInner {
    state: AdapterState,
    /// Fulfilled by the I/O context once the decision is dispatched.
    /// Dropped without sending to abort the waiting `run`.
    decision_tx: Option<oneshot::Sender<Arc<dyn UrlRequestJob>>>,
}

/// Per-request placeholder satisfying the factory's "return a job now"
/// contract.
///
/// Created synchronously; `run` schedules evaluation on the user context and
/// waits for the concrete job decided there to be constructed back on the
/// I/O context. Holds only weak references to the request and the wrapped
/// prior handler: liveness checks, never ownership.
pub struct AdapterJob {
    scheme: Scheme,
    request: Weak<UrlRequest>,
    fallback: Option<Weak<dyn SchemeHandler>>,
    user: mpsc::UnboundedSender<UserCommand>,
    weak: Weak<AdapterJob>,
    inner: Mutex<AdapterInner>,
}

impl AdapterJob {
    pub(crate) fn create(
        request: &Arc<UrlRequest>,
        fallback: Option<Weak<dyn SchemeHandler>>,
        user: mpsc::UnboundedSender<UserCommand>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            scheme: request.scheme(),
            request: Arc::downgrade(request),
            fallback,
            user,
            weak: weak.clone(),
            inner: Mutex::new(AdapterInner {
                state: AdapterState::Created,
                decision_tx: None,
            }),
        })
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub fn state(&self) -> AdapterState {
        self.inner.lock().state
    }

    /// True when the request was cancelled or already destroyed.
    pub(crate) fn is_cancelled(&self) -> bool {
        match self.request.upgrade() {
            Some(request) => request.is_cancelled(),
            None => true,
        }
    }

    /// Abort without starting a job. Closing the decision channel wakes the
    /// pending `run` with an aborted error.
    pub(crate) fn fail(&self) {
        let mut inner = self.inner.lock();
        inner.decision_tx = None;
        inner.state = AdapterState::Failed;
    }

    /// Dispatch the resolved descriptor into a concrete job and hand it to
    /// the waiting `run`. Called on the I/O context; a no-op unless the
    /// adapter is still awaiting its one decision.
    pub(crate) fn start(&self, descriptor: JobDescriptor, builders: &dyn JobBuilders) {
        let tx = {
            let mut inner = self.inner.lock();
            if inner.state != AdapterState::AwaitingDecision {
                debug!(scheme = %self.scheme, state = %inner.state, "stale dispatch ignored");
                return;
            }
            inner.state = AdapterState::Resolved;
            inner.decision_tx.take()
        };
        let Some(tx) = tx else { return };

        debug!(scheme = %self.scheme, kind = descriptor.name(), "starting concrete job");
        let job = self.build_job(descriptor, builders);
        if tx.send(job).is_err() {
            self.fail();
        }
    }

    fn build_job(
        &self,
        descriptor: JobDescriptor,
        builders: &dyn JobBuilders,
    ) -> Arc<dyn UrlRequestJob> {
        match descriptor {
            JobDescriptor::String { mime_type, charset, data } => {
                builders.string_job(mime_type, charset, data)
            }
            JobDescriptor::Buffer { mime_type, encoding, data } => {
                builders.buffer_job(mime_type, encoding, data)
            }
            JobDescriptor::File { path } => builders.file_job(path),
            JobDescriptor::Http { url, method, referrer } => {
                builders.http_job(url, method, referrer)
            }
            JobDescriptor::Error { code } => builders.error_job(code),
            JobDescriptor::Fallback => {
                // Delegate to the preserved prior handler; without one (or
                // with the request already gone) this degrades to unhandled.
                let prior = self.fallback.as_ref().and_then(Weak::upgrade);
                match (prior, self.request.upgrade()) {
                    (Some(prior), Some(request)) => prior.create_job(&request),
                    _ => builders.error_job(ERR_NOT_IMPLEMENTED),
                }
            }
            JobDescriptor::Unhandled => builders.error_job(ERR_NOT_IMPLEMENTED),
        }
    }
}

#[async_trait]
impl UrlRequestJob for AdapterJob {
    fn kind(&self) -> &'static str {
        "adapter"
    }

    /// Start the bridge: schedule evaluation on the user context, wait for
    /// the concrete job, then drive it. At most one resolution ever happens;
    /// a second `run` fails outright.
    async fn run(&self) -> Result<JobPayload, NetError> {
        let rx = {
            let mut inner = self.inner.lock();
            if inner.state != AdapterState::Created {
                warn!(scheme = %self.scheme, state = %inner.state, "adapter started twice");
                return Err(NetError(ERR_FAILED));
            }
            let Some(request) = self.request.upgrade() else {
                inner.state = AdapterState::Failed;
                return Err(NetError::aborted());
            };
            let (tx, rx) = oneshot::channel();
            inner.decision_tx = Some(tx);
            inner.state = AdapterState::AwaitingDecision;

            let scheduled = self.user.send(UserCommand::Evaluate {
                scheme: self.scheme.clone(),
                request: request.descriptor(),
                job: self.weak.clone(),
            });
            if scheduled.is_err() {
                inner.decision_tx = None;
                inner.state = AdapterState::Failed;
                return Err(NetError::aborted());
            }
            rx
        };

        match rx.await {
            Ok(job) => {
                self.inner.lock().state = AdapterState::Started;
                job.run().await
            }
            Err(_) => {
                self.inner.lock().state = AdapterState::Failed;
                Err(NetError::aborted())
            }
        }
    }
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
