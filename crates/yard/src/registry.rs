// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheme registry: the user-context view of who handles what.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use swy_proto::{RegistryError, RequestDescriptor, Scheme};
use tokio::sync::{mpsc, oneshot};
use tracing::info;

use crate::bridge::{NetCommand, NetHandle, UserCommand};
use crate::handler::CustomSchemeHandler;

/// User decision logic for one scheme. Invoked only on the user context,
/// with a read-only request snapshot; returns an opaque decision value.
pub type HandlerRef = Arc<dyn Fn(&RequestDescriptor) -> Value + Send + Sync>;

/// Wrap a closure as a [`HandlerRef`].
pub fn handler_fn<F>(f: F) -> HandlerRef
where
    F: Fn(&RequestDescriptor) -> Value + Send + Sync + 'static,
{
    Arc::new(f)
}

/// How a scheme ended up in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationMode {
    /// No prior handler existed; the scheme is ours alone.
    Registered,
    /// A prior handler is preserved in the factory wrapper for restoration.
    Intercepted,
}

impl std::fmt::Display for RegistrationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RegistrationMode::Registered => "registered",
            RegistrationMode::Intercepted => "intercepted",
        })
    }
}

/// One scheme's registration: its decision logic and how it got here.
#[derive(Clone)]
pub struct RegistrationEntry {
    pub handler: HandlerRef,
    pub mode: RegistrationMode,
}

impl std::fmt::Debug for RegistrationEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationEntry").field("mode", &self.mode).finish_non_exhaustive()
    }
}

/// The top-level registry coordinating scheme mutations across contexts.
///
/// Every mutation runs the same sequence: validate against the factory
/// (async round trip), check-and-mutate the map, enqueue the factory change,
/// and only report success once the I/O context has applied it. The map
/// check and the enqueue share one mutex hold, so per-scheme factory
/// mutations apply in map order. Lives for the process; cheap to clone.
#[derive(Clone)]
pub struct ProtocolRegistry {
    schemes: Arc<Mutex<HashMap<Scheme, RegistrationEntry>>>,
    user_tx: mpsc::UnboundedSender<UserCommand>,
    net: NetHandle,
}

impl ProtocolRegistry {
    pub(crate) fn new(
        schemes: Arc<Mutex<HashMap<Scheme, RegistrationEntry>>>,
        user_tx: mpsc::UnboundedSender<UserCommand>,
        net: NetHandle,
    ) -> Self {
        Self { schemes, user_tx, net }
    }

    /// Register decision logic for a scheme nothing else handles yet.
    pub async fn register(
        &self,
        scheme: Scheme,
        handler: HandlerRef,
    ) -> Result<(), RegistryError> {
        let handled = self.net.is_handled(&scheme).await?;
        let installed = {
            let mut schemes = self.schemes.lock();
            if handled || schemes.contains_key(&scheme) {
                return Err(RegistryError::AlreadyHandled(scheme));
            }
            schemes.insert(
                scheme.clone(),
                RegistrationEntry { handler, mode: RegistrationMode::Registered },
            );

            let (done, rx) = oneshot::channel();
            let handler = Arc::new(CustomSchemeHandler::new(self.user_tx.clone()));
            let sent = self.net.send(NetCommand::Install {
                scheme: scheme.clone(),
                handler,
                done,
            });
            if let Err(err) = sent {
                schemes.remove(&scheme);
                return Err(err);
            }
            rx
        };

        installed.await.map_err(|_| RegistryError::Disconnected)?;
        info!(%scheme, "scheme registered");
        Ok(())
    }

    /// Remove a registered scheme. The map entry goes first, so new
    /// registration attempts see the scheme as free immediately.
    pub async fn unregister(&self, scheme: Scheme) -> Result<(), RegistryError> {
        let cleared = {
            let mut schemes = self.schemes.lock();
            if schemes.remove(&scheme).is_none() {
                return Err(RegistryError::NotRegistered(scheme));
            }
            let (done, rx) = oneshot::channel();
            self.net.send(NetCommand::Clear { scheme: scheme.clone(), done })?;
            rx
        };

        cleared.await.map_err(|_| RegistryError::Disconnected)?;
        info!(%scheme, "scheme unregistered");
        Ok(())
    }

    /// Wrap the existing handler for a scheme with our own, preserving it
    /// for exactly one restoration.
    pub async fn intercept(
        &self,
        scheme: Scheme,
        handler: HandlerRef,
    ) -> Result<(), RegistryError> {
        let handled = self.net.is_handled(&scheme).await?;
        if !handled {
            return Err(RegistryError::NotHandled(scheme));
        }

        let swapped = {
            let mut schemes = self.schemes.lock();
            match schemes.get(&scheme).map(|entry| entry.mode) {
                Some(RegistrationMode::Registered) => {
                    return Err(RegistryError::CannotInterceptCustom(scheme));
                }
                Some(RegistrationMode::Intercepted) => {
                    return Err(RegistryError::AlreadyHandled(scheme));
                }
                None => {}
            }
            schemes.insert(
                scheme.clone(),
                RegistrationEntry { handler, mode: RegistrationMode::Intercepted },
            );

            let (done, rx) = oneshot::channel();
            let wrapper = Arc::new(CustomSchemeHandler::new(self.user_tx.clone()));
            let sent = self.net.send(NetCommand::Intercept {
                scheme: scheme.clone(),
                wrapper,
                done,
            });
            if let Err(err) = sent {
                schemes.remove(&scheme);
                return Err(err);
            }
            rx
        };

        swapped.await.map_err(|_| RegistryError::Disconnected)?;
        info!(%scheme, "scheme intercepted");
        Ok(())
    }

    /// Restore the handler an interception preserved and drop the wrapper.
    pub async fn unintercept(&self, scheme: Scheme) -> Result<(), RegistryError> {
        let restored = {
            let mut schemes = self.schemes.lock();
            // Only Intercepted-mode entries have a preserved handler to
            // restore; a Registered-mode scheme is not an interception.
            match schemes.get(&scheme).map(|entry| entry.mode) {
                Some(RegistrationMode::Intercepted) => {}
                Some(RegistrationMode::Registered) | None => {
                    return Err(RegistryError::NotRegistered(scheme));
                }
            }
            schemes.remove(&scheme);
            let (done, rx) = oneshot::channel();
            self.net.send(NetCommand::Unintercept { scheme: scheme.clone(), done })?;
            rx
        };

        restored.await.map_err(|_| RegistryError::Disconnected)?;
        info!(%scheme, "scheme unintercepted");
        Ok(())
    }

    /// Whether any handler (built-in or custom) serves the scheme.
    pub async fn is_handled(&self, scheme: &Scheme) -> Result<bool, RegistryError> {
        self.net.is_handled(scheme).await
    }

    /// Current decision logic for a scheme, fetched at evaluation time.
    pub fn lookup(&self, scheme: &Scheme) -> Option<HandlerRef> {
        self.schemes.lock().get(scheme).map(|entry| entry.handler.clone())
    }

    /// Mode of the registry entry for a scheme, if any.
    pub fn mode(&self, scheme: &Scheme) -> Option<RegistrationMode> {
        self.schemes.lock().get(scheme).map(|entry| entry.mode)
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
