// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job descriptors and the decision-value resolver.

use crate::error::ERR_NOT_IMPLEMENTED;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

/// The closed set of job intents a scheme handler can decide on.
///
/// Decoded from an opaque decision value by [`resolve`]; everything the
/// handler does not spell out falls back to a sensible default, and anything
/// that fails to decode at all becomes [`JobDescriptor::Unhandled`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum JobDescriptor {
    /// In-memory body from a string.
    String {
        #[serde(default)]
        mime_type: String,
        #[serde(default)]
        charset: String,
        #[serde(default)]
        data: String,
    },
    /// In-memory body from raw bytes.
    Buffer {
        #[serde(default)]
        mime_type: String,
        #[serde(default)]
        encoding: String,
        #[serde(default)]
        data: Vec<u8>,
    },
    /// Serve a local file.
    File { path: PathBuf },
    /// Re-issue the request over the network.
    Http {
        url: String,
        #[serde(default = "default_method")]
        method: String,
        #[serde(default)]
        referrer: String,
    },
    /// Fail the request with a net error code.
    Error {
        #[serde(default = "default_error_code")]
        code: i32,
    },
    /// Defer to the wrapped prior handler (interception mode only).
    Fallback,
    /// No usable decision; the request fails as not implemented.
    Unhandled,
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_error_code() -> i32 {
    ERR_NOT_IMPLEMENTED
}

impl JobDescriptor {
    /// Descriptor kind for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            JobDescriptor::String { .. } => "string",
            JobDescriptor::Buffer { .. } => "buffer",
            JobDescriptor::File { .. } => "file",
            JobDescriptor::Http { .. } => "http",
            JobDescriptor::Error { .. } => "error",
            JobDescriptor::Fallback => "fallback",
            JobDescriptor::Unhandled => "unhandled",
        }
    }
}

/// Decode a handler's decision value into a [`JobDescriptor`].
///
/// A bare string is shorthand for a text/plain UTF-8 string job. Objects are
/// decoded by their `"kind"` tag. Everything else (null, numbers, arrays,
/// unknown kinds, fields of the wrong shape) resolves to `Unhandled`.
pub fn resolve(value: Value) -> JobDescriptor {
    match value {
        Value::String(data) => JobDescriptor::String {
            mime_type: "text/plain".to_string(),
            charset: "UTF-8".to_string(),
            data,
        },
        Value::Object(_) => serde_json::from_value(value).unwrap_or(JobDescriptor::Unhandled),
        _ => JobDescriptor::Unhandled,
    }
}

#[cfg(test)]
#[path = "descriptor_tests.rs"]
mod tests;
