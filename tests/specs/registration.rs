// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registration lifecycle specs.
//!
//! Verify the mutation sequence an embedding shell sees: validation errors
//! with readable messages, first-registration-wins, and issue-order
//! application of same-scheme commands.

use crate::prelude::*;

#[tokio::test]
async fn registered_scheme_serves_its_handler_decision() {
    let stack = bare_stack();
    stack.registry.register(Scheme::from("myapp"), string_handler("hello")).await.unwrap();

    let payload = serve(&stack, "myapp://host/index").await.unwrap();
    assert_eq!(payload.mime_type, "text/plain");
    assert_eq!(payload.data, b"hello");
}

#[tokio::test]
async fn errors_carry_readable_messages() {
    let stack = bare_stack();

    let err = stack.registry.unregister(Scheme::from("myapp")).await.unwrap_err();
    assert_eq!(err.to_string(), "scheme 'myapp' has not been registered");

    stack.registry.register(Scheme::from("myapp"), string_handler("x")).await.unwrap();
    let err =
        stack.registry.register(Scheme::from("myapp"), string_handler("y")).await.unwrap_err();
    assert_eq!(err.to_string(), "scheme 'myapp' is already handled");

    let err = stack.registry.intercept(Scheme::from("myapp"), string_handler("z")).await;
    assert_eq!(
        err.unwrap_err().to_string(),
        "cannot intercept custom scheme 'myapp'"
    );
}

#[tokio::test]
async fn second_registration_loses_and_first_stays_active() {
    let stack = bare_stack();
    let scheme = Scheme::from("notes");
    stack.registry.register(scheme.clone(), string_handler("first")).await.unwrap();

    assert_eq!(
        stack.registry.register(scheme.clone(), string_handler("second")).await,
        Err(RegistryError::AlreadyHandled(scheme))
    );
    assert_eq!(serve(&stack, "notes://today").await.unwrap().data, b"first");
}

#[tokio::test]
async fn completion_means_the_factory_is_consistent() {
    let stack = bare_stack();
    let scheme = Scheme::from("myapp");

    // As soon as register returns, the I/O side must serve the scheme.
    stack.registry.register(scheme.clone(), string_handler("ready")).await.unwrap();
    assert!(stack.registry.is_handled(&scheme).await.unwrap());

    // As soon as unregister returns, the I/O side must not.
    stack.registry.unregister(scheme.clone()).await.unwrap();
    assert!(!stack.registry.is_handled(&scheme).await.unwrap());
}

#[tokio::test]
async fn independent_schemes_do_not_interfere() {
    let stack = bare_stack();
    let (a, b) = tokio::join!(
        stack.registry.register(Scheme::from("alpha"), string_handler("a")),
        stack.registry.register(Scheme::from("beta"), string_handler("b")),
    );
    a.unwrap();
    b.unwrap();

    let (unreg, reg) = tokio::join!(
        stack.registry.unregister(Scheme::from("alpha")),
        stack.registry.register(Scheme::from("gamma"), string_handler("c")),
    );
    unreg.unwrap();
    reg.unwrap();

    assert_eq!(serve(&stack, "beta://host/x").await.unwrap().data, b"b");
    assert_eq!(serve(&stack, "gamma://host/x").await.unwrap().data, b"c");
}

#[tokio::test]
async fn same_scheme_commands_serialize_in_issue_order() {
    let stack = bare_stack();
    let scheme = Scheme::from("myapp");

    stack.registry.register(scheme.clone(), string_handler("one")).await.unwrap();
    stack.registry.unregister(scheme.clone()).await.unwrap();
    stack.registry.register(scheme.clone(), string_handler("two")).await.unwrap();

    assert_eq!(serve(&stack, "myapp://host/x").await.unwrap().data, b"two");
}
