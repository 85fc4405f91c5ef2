// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-request flow specs: decision values in, concrete jobs out.

use crate::prelude::*;
use std::io::Write;

#[tokio::test]
async fn string_decision_emits_exact_bytes_and_content_type() {
    let stack = bare_stack();
    let handler = handler_fn(|_| {
        json!({ "kind": "string", "mimeType": "text/plain", "charset": "UTF-8", "data": "hello" })
    });
    stack.registry.register(Scheme::from("myapp"), handler).await.unwrap();

    let payload = serve(&stack, "myapp://host/greeting").await.unwrap();
    assert_eq!(payload.mime_type, "text/plain");
    assert_eq!(payload.charset, "UTF-8");
    assert_eq!(payload.data, b"hello");
}

#[tokio::test]
async fn bare_string_decision_is_text_plain_shorthand() {
    let stack = bare_stack();
    stack
        .registry
        .register(Scheme::from("myapp"), handler_fn(|_| json!("shorthand")))
        .await
        .unwrap();

    let payload = serve(&stack, "myapp://host/x").await.unwrap();
    assert_eq!(payload.mime_type, "text/plain");
    assert_eq!(payload.charset, "UTF-8");
    assert_eq!(payload.data, b"shorthand");
}

#[tokio::test]
async fn handler_sees_the_request_descriptor() {
    let stack = bare_stack();
    let handler = handler_fn(|request| {
        json!({ "kind": "string", "mimeType": "text/plain", "data": request.url.clone() })
    });
    stack.registry.register(Scheme::from("echo"), handler).await.unwrap();

    let payload = serve(&stack, "echo://host/path?q=1").await.unwrap();
    assert_eq!(payload.data, b"echo://host/path?q=1");
}

#[tokio::test]
async fn buffer_decision_serves_raw_bytes() {
    let stack = bare_stack();
    let handler = handler_fn(|_| {
        json!({ "kind": "buffer", "mimeType": "application/octet-stream", "data": [7, 8, 9] })
    });
    stack.registry.register(Scheme::from("blob"), handler).await.unwrap();

    let payload = serve(&stack, "blob://host/x").await.unwrap();
    assert_eq!(payload.mime_type, "application/octet-stream");
    assert_eq!(payload.data, vec![7, 8, 9]);
}

#[tokio::test]
async fn file_decision_serves_the_local_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"from disk").unwrap();
    let path = file.path().display().to_string();

    let stack = bare_stack();
    let handler = handler_fn(move |_| json!({ "kind": "file", "path": path.clone() }));
    stack.registry.register(Scheme::from("local"), handler).await.unwrap();

    let payload = serve(&stack, "local://host/doc").await.unwrap();
    assert_eq!(payload.data, b"from disk");
}

#[tokio::test]
async fn http_decision_dispatches_the_full_target() {
    let (stack, builders) = recording_stack();
    let handler = handler_fn(|_| {
        json!({
            "kind": "http",
            "url": "https://example.com/upstream",
            "method": "POST",
            "referrer": "myapp://host/form",
        })
    });
    stack.registry.register(Scheme::from("myapp"), handler).await.unwrap();

    let _ = serve(&stack, "myapp://host/x").await;
    assert_eq!(builders.calls(), vec!["http:POST https://example.com/upstream".to_string()]);
}

#[tokio::test]
async fn unrecognized_decision_fails_as_not_implemented() {
    let (stack, builders) = recording_stack();
    stack
        .registry
        .register(Scheme::from("myapp"), handler_fn(|_| json!({ "flavor": "socket" })))
        .await
        .unwrap();

    let result = serve(&stack, "myapp://host/x").await;
    assert_eq!(result, Err(NetError(ERR_NOT_IMPLEMENTED)));
    assert_eq!(builders.calls(), vec![format!("error:{}", ERR_NOT_IMPLEMENTED)]);
}

#[tokio::test]
async fn error_decision_fails_with_its_code() {
    let stack = bare_stack();
    stack
        .registry
        .register(Scheme::from("myapp"), handler_fn(|_| json!({ "kind": "error", "code": -2 })))
        .await
        .unwrap();

    assert_eq!(serve(&stack, "myapp://host/x").await, Err(NetError(-2)));
}

#[tokio::test]
async fn handler_swapped_before_evaluation_is_honored() {
    let stack = bare_stack();
    let scheme = Scheme::from("myapp");
    stack.registry.register(scheme.clone(), string_handler("old")).await.unwrap();

    // Create the adapter job but do not run it yet.
    let request = Arc::new(UrlRequest::get("myapp://host/x").unwrap());
    let job = stack.net.create_job(&request).await.unwrap().unwrap();

    // Swap the handler before the decision is evaluated.
    stack.registry.unregister(scheme.clone()).await.unwrap();
    stack.registry.register(scheme, string_handler("new")).await.unwrap();

    assert_eq!(job.run().await.unwrap().data, b"new");
}

#[tokio::test]
async fn cancelling_mid_decision_starts_no_job() {
    let (stack, builders) = recording_stack();
    stack.registry.register(Scheme::from("myapp"), string_handler("late")).await.unwrap();

    let request = Arc::new(UrlRequest::get("myapp://host/x").unwrap());
    let job = stack.net.create_job(&request).await.unwrap().unwrap();

    let task = tokio::spawn({
        let job = Arc::clone(&job);
        async move { job.run().await }
    });
    // The adapter has not been polled yet; cancel first, then let the
    // deferred evaluation resume and observe the cancellation.
    request.cancel();

    assert_eq!(task.await.unwrap(), Err(NetError::aborted()));
    assert!(builders.calls().is_empty());
}

#[tokio::test]
async fn unregistered_scheme_gets_no_job_at_all() {
    let stack = bare_stack();
    let request = Arc::new(UrlRequest::get("nobody://host/x").unwrap());
    assert!(stack.net.create_job(&request).await.unwrap().is_none());
}
