// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Helpers for this crate's tests and for dependent crates' specs
//! (behind the `test-support` feature).

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::handler::SchemeHandler;
use crate::jobs::{InMemoryJob, JobBuilders, LocalJobBuilders, UrlRequestJob};
use crate::request::UrlRequest;

/// Handler serving a fixed string payload for every request, standing in
/// for a built-in scheme handler.
pub struct StaticHandler {
    mime_type: String,
    data: String,
}

impl StaticHandler {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self { mime_type: mime_type.into(), data: data.into() }
    }
}

impl SchemeHandler for StaticHandler {
    fn create_job(&self, _request: &Arc<UrlRequest>) -> Arc<dyn UrlRequestJob> {
        Arc::new(InMemoryJob::from_string(
            self.mime_type.clone(),
            "UTF-8".to_string(),
            self.data.clone(),
        ))
    }
}

/// Builders that record every constructor call before delegating to
/// [`LocalJobBuilders`]. Lets tests assert which concrete jobs were (or
/// were not) constructed.
#[derive(Default)]
pub struct RecordingBuilders {
    calls: Mutex<Vec<String>>,
    inner: LocalJobBuilders,
}

impl RecordingBuilders {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

impl JobBuilders for RecordingBuilders {
    fn string_job(
        &self,
        mime_type: String,
        charset: String,
        data: String,
    ) -> Arc<dyn UrlRequestJob> {
        self.record(format!("string:{}", mime_type));
        self.inner.string_job(mime_type, charset, data)
    }

    fn buffer_job(
        &self,
        mime_type: String,
        encoding: String,
        data: Vec<u8>,
    ) -> Arc<dyn UrlRequestJob> {
        self.record(format!("buffer:{}", mime_type));
        self.inner.buffer_job(mime_type, encoding, data)
    }

    fn file_job(&self, path: PathBuf) -> Arc<dyn UrlRequestJob> {
        self.record(format!("file:{}", path.display()));
        self.inner.file_job(path)
    }

    fn http_job(&self, url: String, method: String, referrer: String) -> Arc<dyn UrlRequestJob> {
        self.record(format!("http:{} {}", method, url));
        self.inner.http_job(url, method, referrer)
    }

    fn error_job(&self, code: i32) -> Arc<dyn UrlRequestJob> {
        self.record(format!("error:{}", code));
        self.inner.error_job(code)
    }
}
