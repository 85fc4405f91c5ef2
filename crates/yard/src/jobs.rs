// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Concrete job kinds and the builders trait the adapter dispatches through.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use swy_proto::{NetError, ERR_FAILED, ERR_FILE_NOT_FOUND, ERR_NOT_IMPLEMENTED};

/// Response payload a finished job hands back to the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPayload {
    pub mime_type: String,
    pub charset: String,
    pub data: Vec<u8>,
}

/// A startable job the network stack drives for one request.
#[async_trait]
pub trait UrlRequestJob: Send + Sync {
    /// Job kind for log fields and tests.
    fn kind(&self) -> &'static str;

    /// Drive the job to completion.
    async fn run(&self) -> Result<JobPayload, NetError>;
}

/// Constructors for the concrete job kinds.
///
/// The adapter job dispatches a resolved descriptor through this trait, so
/// an embedder can swap in its own job implementations (a real network
/// backend for the http kind in particular) without touching the core.
pub trait JobBuilders: Send + Sync {
    fn string_job(&self, mime_type: String, charset: String, data: String)
        -> Arc<dyn UrlRequestJob>;
    fn buffer_job(&self, mime_type: String, encoding: String, data: Vec<u8>)
        -> Arc<dyn UrlRequestJob>;
    fn file_job(&self, path: PathBuf) -> Arc<dyn UrlRequestJob>;
    fn http_job(&self, url: String, method: String, referrer: String) -> Arc<dyn UrlRequestJob>;
    fn error_job(&self, code: i32) -> Arc<dyn UrlRequestJob>;
}

/// Job serving bytes already in memory; backs both string and buffer kinds.
#[derive(Debug)]
pub struct InMemoryJob {
    kind: &'static str,
    mime_type: String,
    charset: String,
    data: Vec<u8>,
}

impl InMemoryJob {
    pub fn from_string(mime_type: String, charset: String, data: String) -> Self {
        Self { kind: "string", mime_type, charset, data: data.into_bytes() }
    }

    pub fn from_buffer(mime_type: String, encoding: String, data: Vec<u8>) -> Self {
        Self { kind: "buffer", mime_type, charset: encoding, data }
    }
}

#[async_trait]
impl UrlRequestJob for InMemoryJob {
    fn kind(&self) -> &'static str {
        self.kind
    }

    async fn run(&self) -> Result<JobPayload, NetError> {
        Ok(JobPayload {
            mime_type: self.mime_type.clone(),
            charset: self.charset.clone(),
            data: self.data.clone(),
        })
    }
}

/// Job serving a local file.
#[derive(Debug)]
pub struct FileJob {
    path: PathBuf,
}

impl FileJob {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl UrlRequestJob for FileJob {
    fn kind(&self) -> &'static str {
        "file"
    }

    async fn run(&self) -> Result<JobPayload, NetError> {
        match tokio::fs::read(&self.path).await {
            Ok(data) => Ok(JobPayload {
                mime_type: "application/octet-stream".to_string(),
                charset: String::new(),
                data,
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(NetError(ERR_FILE_NOT_FOUND))
            }
            Err(_) => Err(NetError(ERR_FAILED)),
        }
    }
}

/// Job that would re-issue the request over the network.
///
/// Carries the full dispatch target but reports not-implemented when run:
/// actually fetching (browsing context, cookies, redirects) is the
/// embedder's concern, plugged in through [`JobBuilders::http_job`].
#[derive(Debug)]
pub struct HttpJob {
    url: String,
    method: String,
    referrer: String,
}

impl HttpJob {
    pub fn new(url: String, method: String, referrer: String) -> Self {
        Self { url, method, referrer }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn referrer(&self) -> &str {
        &self.referrer
    }
}

#[async_trait]
impl UrlRequestJob for HttpJob {
    fn kind(&self) -> &'static str {
        "http"
    }

    async fn run(&self) -> Result<JobPayload, NetError> {
        Err(NetError(ERR_NOT_IMPLEMENTED))
    }
}

/// Job that fails immediately with a net error code.
#[derive(Debug)]
pub struct ErrorJob {
    code: i32,
}

impl ErrorJob {
    pub fn new(code: i32) -> Self {
        Self { code }
    }

    pub fn code(&self) -> i32 {
        self.code
    }
}

#[async_trait]
impl UrlRequestJob for ErrorJob {
    fn kind(&self) -> &'static str {
        "error"
    }

    async fn run(&self) -> Result<JobPayload, NetError> {
        Err(NetError(self.code))
    }
}

/// In-process [`JobBuilders`] used unless the embedder supplies its own.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalJobBuilders;

impl JobBuilders for LocalJobBuilders {
    fn string_job(
        &self,
        mime_type: String,
        charset: String,
        data: String,
    ) -> Arc<dyn UrlRequestJob> {
        Arc::new(InMemoryJob::from_string(mime_type, charset, data))
    }

    fn buffer_job(
        &self,
        mime_type: String,
        encoding: String,
        data: Vec<u8>,
    ) -> Arc<dyn UrlRequestJob> {
        Arc::new(InMemoryJob::from_buffer(mime_type, encoding, data))
    }

    fn file_job(&self, path: PathBuf) -> Arc<dyn UrlRequestJob> {
        Arc::new(FileJob::new(path))
    }

    fn http_job(&self, url: String, method: String, referrer: String) -> Arc<dyn UrlRequestJob> {
        Arc::new(HttpJob::new(url, method, referrer))
    }

    fn error_job(&self, code: i32) -> Arc<dyn UrlRequestJob> {
        Arc::new(ErrorJob::new(code))
    }
}

#[cfg(test)]
#[path = "jobs_tests.rs"]
mod tests;
