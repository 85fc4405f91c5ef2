// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message bridge between the user context and the network I/O context.
//!
//! Each context is a spawned task consuming one command channel,
//! run-to-completion per message. All cross-context handoffs are posts with
//! oneshot replies; neither side ever blocks on the other. Mutation replies
//! fire only after the factory-side change has been applied, so a caller
//! that sees success knows the I/O context is already consistent.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use swy_proto::{resolve, JobDescriptor, RegistryError, RequestDescriptor, Scheme};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::adapter::AdapterJob;
use crate::factory::JobFactory;
use crate::handler::{CustomSchemeHandler, SchemeHandler};
use crate::jobs::{JobBuilders, UrlRequestJob};
use crate::registry::ProtocolRegistry;
use crate::request::UrlRequest;

/// Work scheduled onto the user context.
pub(crate) enum UserCommand {
    /// Ask the current handler for a scheme to decide a request.
    Evaluate {
        scheme: Scheme,
        request: RequestDescriptor,
        job: Weak<AdapterJob>,
    },
}

/// Work scheduled onto the network I/O context.
pub(crate) enum NetCommand {
    /// Install a custom handler for a newly registered scheme.
    Install {
        scheme: Scheme,
        handler: Arc<dyn SchemeHandler>,
        done: oneshot::Sender<()>,
    },
    /// Remove the handler for an unregistered scheme.
    Clear {
        scheme: Scheme,
        done: oneshot::Sender<()>,
    },
    /// Swap the wrapper in for an intercepted scheme, preserving the
    /// previous handler inside it.
    Intercept {
        scheme: Scheme,
        wrapper: Arc<CustomSchemeHandler>,
        done: oneshot::Sender<()>,
    },
    /// Restore the preserved handler and drop the wrapper.
    Unintercept {
        scheme: Scheme,
        done: oneshot::Sender<()>,
    },
    /// Does any handler (built-in or custom) serve this scheme?
    IsHandled {
        scheme: Scheme,
        reply: oneshot::Sender<bool>,
    },
    /// Push a request through the factory, as the stack does per request.
    CreateJob {
        request: Arc<UrlRequest>,
        reply: oneshot::Sender<Option<Arc<dyn UrlRequestJob>>>,
    },
    /// Construct and start the concrete job an evaluation decided on.
    StartJob {
        job: Weak<AdapterJob>,
        descriptor: JobDescriptor,
    },
}

/// Cloneable command surface onto the I/O context.
#[derive(Clone)]
pub struct NetHandle {
    tx: mpsc::UnboundedSender<NetCommand>,
}

impl NetHandle {
    pub(crate) fn send(&self, command: NetCommand) -> Result<(), RegistryError> {
        self.tx.send(command).map_err(|_| RegistryError::Disconnected)
    }

    /// Whether any handler currently serves the scheme.
    pub async fn is_handled(&self, scheme: &Scheme) -> Result<bool, RegistryError> {
        let (reply, rx) = oneshot::channel();
        self.send(NetCommand::IsHandled { scheme: scheme.clone(), reply })?;
        rx.await.map_err(|_| RegistryError::Disconnected)
    }

    /// Hand a request to the factory and get its job back, the way the
    /// stack's I/O thread would call `maybe_create_job`.
    pub async fn create_job(
        &self,
        request: &Arc<UrlRequest>,
    ) -> Result<Option<Arc<dyn UrlRequestJob>>, RegistryError> {
        let (reply, rx) = oneshot::channel();
        self.send(NetCommand::CreateJob { request: Arc::clone(request), reply })?;
        rx.await.map_err(|_| RegistryError::Disconnected)
    }

    pub(crate) fn start_job(
        &self,
        job: Weak<AdapterJob>,
        descriptor: JobDescriptor,
    ) -> Result<(), RegistryError> {
        self.send(NetCommand::StartJob { job, descriptor })
    }
}

/// I/O-context loop: owns the factory and the job builders.
struct NetTask {
    rx: mpsc::UnboundedReceiver<NetCommand>,
    factory: JobFactory,
    builders: Arc<dyn JobBuilders>,
    cancel: CancellationToken,
}

impl NetTask {
    async fn run(mut self) {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                command = self.rx.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
            }
        }
        debug!("net loop stopped");
    }

    fn handle(&mut self, command: NetCommand) {
        match command {
            NetCommand::Install { scheme, handler, done } => {
                self.factory.set_handler(scheme.clone(), Some(handler));
                debug!(%scheme, "handler installed");
                let _ = done.send(());
            }
            NetCommand::Clear { scheme, done } => {
                self.factory.set_handler(scheme.clone(), None);
                debug!(%scheme, "handler cleared");
                let _ = done.send(());
            }
            NetCommand::Intercept { scheme, wrapper, done } => {
                // The registry validated a handler exists before issuing this
                // command, and same-scheme commands apply in issue order.
                match self.factory.replace_handler(scheme.clone(), wrapper.clone()) {
                    Some(prior) => wrapper.set_wrapped(prior),
                    None => unreachable!("intercepted scheme had no handler"),
                }
                debug!(%scheme, "handler intercepted");
                let _ = done.send(());
            }
            NetCommand::Unintercept { scheme, done } => {
                match self.factory.get_handler(&scheme).and_then(|h| h.release_wrapped()) {
                    Some(prior) => {
                        self.factory.replace_handler(scheme.clone(), prior);
                        debug!(%scheme, "prior handler restored");
                    }
                    None => unreachable!("unintercept without a preserved handler"),
                }
                let _ = done.send(());
            }
            NetCommand::IsHandled { scheme, reply } => {
                let _ = reply.send(self.factory.is_handled_scheme(&scheme));
            }
            NetCommand::CreateJob { request, reply } => {
                let job = self.factory.maybe_create_job(&request);
                if reply.send(job).is_err() {
                    warn!(url = %request.url(), "request abandoned before job creation");
                }
            }
            NetCommand::StartJob { job, descriptor } => {
                // Weak guard: a request destroyed while the decision was in
                // flight must not start anything.
                let Some(job) = job.upgrade() else {
                    debug!("request gone before dispatch");
                    return;
                };
                if job.is_cancelled() {
                    job.fail();
                    return;
                }
                job.start(descriptor, self.builders.as_ref());
            }
        }
    }
}

/// User-context loop: the only place handler callbacks run.
struct UserTask {
    rx: mpsc::UnboundedReceiver<UserCommand>,
    registry: ProtocolRegistry,
    net: NetHandle,
    cancel: CancellationToken,
}

impl UserTask {
    async fn run(mut self) {
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                command = self.rx.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
            }
        }
        debug!("user loop stopped");
    }

    fn handle(&self, command: UserCommand) {
        match command {
            UserCommand::Evaluate { scheme, request, job } => {
                let Some(adapter) = job.upgrade() else {
                    debug!(%scheme, "request gone before evaluation");
                    return;
                };
                if adapter.is_cancelled() {
                    adapter.fail();
                    return;
                }

                // Look up the handler at evaluation time, not job-creation
                // time, so a handler swapped in since is honored.
                let handler = self.registry.lookup(&scheme);
                let descriptor = match handler {
                    Some(handler) => resolve(handler(&request)),
                    None => {
                        warn!(%scheme, "no handler registered at evaluation time");
                        JobDescriptor::Unhandled
                    }
                };
                debug!(%scheme, kind = descriptor.name(), url = %request.url, "decision resolved");

                if self.net.start_job(Arc::downgrade(&adapter), descriptor).is_err() {
                    adapter.fail();
                }
            }
        }
    }
}

/// Built-in handler table the factory starts with.
///
/// The embedder seeds whatever default schemes its stack serves; intercept
/// only works against schemes present here or registered later.
#[derive(Default)]
pub struct StackConfig {
    pub builtins: Vec<(Scheme, Arc<dyn SchemeHandler>)>,
}

impl StackConfig {
    pub fn builtin(mut self, scheme: impl Into<Scheme>, handler: Arc<dyn SchemeHandler>) -> Self {
        self.builtins.push((scheme.into(), handler));
        self
    }
}

/// Handles returned by [`spawn`].
pub struct ProtocolStack {
    pub registry: ProtocolRegistry,
    pub net: NetHandle,
    cancel: CancellationToken,
}

impl ProtocolStack {
    /// Stop both context loops. In-flight adapters resolve as aborted.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

/// Wire up both context loops and return the registry facing the caller.
pub fn spawn(config: StackConfig, builders: Arc<dyn JobBuilders>) -> ProtocolStack {
    let (net_tx, net_rx) = mpsc::unbounded_channel();
    let (user_tx, user_rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();

    let mut factory = JobFactory::new();
    for (scheme, handler) in config.builtins {
        factory.set_handler(scheme, Some(handler));
    }

    let net = NetHandle { tx: net_tx };
    let schemes = Arc::new(Mutex::new(HashMap::new()));
    let registry = ProtocolRegistry::new(schemes, user_tx, net.clone());

    tokio::spawn(
        NetTask { rx: net_rx, factory, builders, cancel: cancel.clone() }.run(),
    );
    tokio::spawn(
        UserTask {
            rx: user_rx,
            registry: registry.clone(),
            net: net.clone(),
            cancel: cancel.clone(),
        }
        .run(),
    );

    ProtocolStack { registry, net, cancel }
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
