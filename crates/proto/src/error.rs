// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy: registry mutation failures and net error codes.

use crate::scheme::Scheme;
use thiserror::Error;

/// Generic failure.
pub const ERR_FAILED: i32 = -2;
/// Request was canceled before a job could start.
pub const ERR_ABORTED: i32 = -3;
/// Local file backing a job does not exist.
pub const ERR_FILE_NOT_FOUND: i32 = -6;
/// No handler produced a usable job for the request.
pub const ERR_NOT_IMPLEMENTED: i32 = -11;

/// Why a registry mutation was refused.
///
/// Every variant carries the scheme so callers get a human-readable message
/// without assembling one themselves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Register on a scheme the factory already serves, or a second
    /// interception of an already-intercepted scheme.
    #[error("scheme '{0}' is already handled")]
    AlreadyHandled(Scheme),

    /// Intercept on a scheme with no existing handler to wrap.
    #[error("scheme '{0}' has no handler to intercept")]
    NotHandled(Scheme),

    /// Unregister/unintercept on a scheme with no registry entry.
    #[error("scheme '{0}' has not been registered")]
    NotRegistered(Scheme),

    /// Intercept on a custom scheme registered through this registry.
    #[error("cannot intercept custom scheme '{0}'")]
    CannotInterceptCustom(Scheme),

    /// The bridge to the network stack has shut down.
    #[error("network stack is gone")]
    Disconnected,
}

/// Request-level failure, as a numeric net error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("net error {0}")]
pub struct NetError(pub i32);

impl NetError {
    pub fn not_implemented() -> Self {
        Self(ERR_NOT_IMPLEMENTED)
    }

    pub fn aborted() -> Self {
        Self(ERR_ABORTED)
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
