// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for the workspace specs.

pub use std::sync::Arc;

pub use serde_json::json;
pub use swy_proto::{NetError, RegistryError, Scheme, ERR_NOT_IMPLEMENTED};
pub use swy_yard::test_support::{RecordingBuilders, StaticHandler};
pub use swy_yard::{
    handler_fn, spawn, HandlerRef, JobBuilders, JobPayload, LocalJobBuilders, ProtocolStack,
    StackConfig, UrlRequest,
};

/// Stack with no built-in schemes and in-process job builders.
pub fn bare_stack() -> ProtocolStack {
    spawn(StackConfig::default(), Arc::new(LocalJobBuilders))
}

/// Stack whose builders record every concrete-job construction.
pub fn recording_stack() -> (ProtocolStack, Arc<RecordingBuilders>) {
    let builders = RecordingBuilders::new();
    let stack = spawn(StackConfig::default(), Arc::clone(&builders) as Arc<dyn JobBuilders>);
    (stack, builders)
}

/// Stack with one built-in scheme serving a fixed text/html payload.
pub fn stack_with_builtin(scheme: &str, data: &str) -> ProtocolStack {
    let config =
        StackConfig::default().builtin(scheme, Arc::new(StaticHandler::new("text/html", data)));
    spawn(config, Arc::new(LocalJobBuilders))
}

/// Handler deciding on a text/plain string job with the given body.
pub fn string_handler(data: &str) -> HandlerRef {
    let decision = json!({ "kind": "string", "mimeType": "text/plain", "data": data });
    handler_fn(move |_| decision.clone())
}

/// Push a GET request through the stack and run whatever job comes back.
pub async fn serve(stack: &ProtocolStack, url: &str) -> Result<JobPayload, NetError> {
    let request = Arc::new(UrlRequest::get(url).expect("valid url"));
    let job = stack.net.create_job(&request).await.expect("bridge up").expect("job created");
    job.run().await
}
