// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! swy-yard: runtime for the switchyard scheme-interception layer.
//!
//! Bridges two single-threaded execution contexts: the network stack's I/O
//! context, which synchronously demands a job object per request, and the
//! user context, where registered decision logic runs. Requests get an
//! adapter job immediately; the real job kind is decided asynchronously and
//! dispatched back without ever blocking either side.

pub mod adapter;
pub mod bridge;
pub mod factory;
pub mod handler;
pub mod jobs;
pub mod registry;
pub mod request;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use adapter::{AdapterJob, AdapterState};
pub use bridge::{spawn, NetHandle, ProtocolStack, StackConfig};
pub use factory::JobFactory;
pub use handler::{CustomSchemeHandler, SchemeHandler};
pub use jobs::{
    ErrorJob, FileJob, HttpJob, InMemoryJob, JobBuilders, JobPayload, LocalJobBuilders,
    UrlRequestJob,
};
pub use registry::{handler_fn, HandlerRef, ProtocolRegistry, RegistrationEntry, RegistrationMode};
pub use request::UrlRequest;
