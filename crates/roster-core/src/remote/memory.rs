//! In-process content API with GitHub's version-token semantics.
//!
//! Writes to an existing file must name its current version token, otherwise
//! they are rejected with a 409 just like the contents API. Failure switches
//! and call counters let callers observe exactly which requests were issued.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;

use super::{
    decode_document, encode_document, ContentApi, PutFileRequest, RemoteError, RemoteFile,
    RemoteResult,
};
use crate::models::Record;

/// Line width the contents API wraps base64 payloads at.
const WRAP_WIDTH: usize = 60;

#[derive(Debug, Default)]
struct MemoryState {
    files: HashMap<String, RemoteFile>,
    revision: u64,
    fail_get: bool,
    fail_put: bool,
    yield_after_get: bool,
    get_calls: usize,
    put_calls: usize,
    pending_writes: Vec<(String, Vec<Record>)>,
}

impl MemoryState {
    fn commit(&mut self, path: &str, content: String) -> String {
        self.revision += 1;
        let sha = format!("rev-{:04}", self.revision);
        self.files.insert(
            path.to_string(),
            RemoteFile {
                content: wrap_lines(&content),
                sha: sha.clone(),
            },
        );
        sha
    }
}

/// Content API held entirely in memory. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentApi {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryContentApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `records` at `path` as a new revision, returning its token.
    pub fn seed(&self, path: &str, records: &[Record]) -> RemoteResult<String> {
        let content = encode_document(records)?;
        Ok(self.state()?.commit(path, content))
    }

    /// Records currently stored at `path`, if any.
    pub fn stored_records(&self, path: &str) -> RemoteResult<Option<Vec<Record>>> {
        let file = self.state()?.files.get(path).cloned();
        file.map(|file| decode_document(&file).map(|document| document.records))
            .transpose()
    }

    /// Current version token of `path`, if the file exists.
    pub fn version(&self, path: &str) -> Option<String> {
        self.state()
            .ok()?
            .files
            .get(path)
            .map(|file| file.sha.clone())
    }

    /// Make every GET fail as if the network were down.
    pub fn set_fail_get(&self, fail: bool) {
        if let Ok(mut state) = self.state() {
            state.fail_get = fail;
        }
    }

    /// Make every PUT fail as if the network were down.
    pub fn set_fail_put(&self, fail: bool) {
        if let Ok(mut state) = self.state() {
            state.fail_put = fail;
        }
    }

    /// Suspend the calling task after every GET, letting other tasks run
    /// between a read and the write that follows it.
    pub fn set_yield_after_get(&self, enabled: bool) {
        if let Ok(mut state) = self.state() {
            state.yield_after_get = enabled;
        }
    }

    /// Have another writer replace `path` right after the next successful GET.
    pub fn write_after_next_get(&self, path: &str, records: Vec<Record>) {
        if let Ok(mut state) = self.state() {
            state.pending_writes.push((path.to_string(), records));
        }
    }

    pub fn get_calls(&self) -> usize {
        self.state().map_or(0, |state| state.get_calls)
    }

    pub fn put_calls(&self) -> usize {
        self.state().map_or(0, |state| state.put_calls)
    }

    fn state(&self) -> RemoteResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| RemoteError::Unavailable("memory content state poisoned".to_string()))
    }

    /// Serve a GET, returning the file and whether to yield afterwards.
    fn fetch(&self, path: &str) -> RemoteResult<(RemoteFile, bool)> {
        let mut state = self.state()?;
        state.get_calls += 1;
        if state.fail_get {
            return Err(RemoteError::Unavailable("GET refused".to_string()));
        }

        let file = state
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(path.to_string()))?;

        for (pending_path, records) in std::mem::take(&mut state.pending_writes) {
            let content = encode_document(&records)?;
            state.commit(&pending_path, content);
        }

        Ok((file, state.yield_after_get))
    }
}

#[async_trait]
impl ContentApi for MemoryContentApi {
    async fn get_file(&self, path: &str) -> RemoteResult<RemoteFile> {
        let (file, yield_now) = self.fetch(path)?;
        if yield_now {
            tokio::task::yield_now().await;
        }
        Ok(file)
    }

    async fn get_version(&self, path: &str) -> RemoteResult<String> {
        let (file, yield_now) = self.fetch(path)?;
        if yield_now {
            tokio::task::yield_now().await;
        }
        Ok(file.sha)
    }

    async fn put_file(&self, path: &str, request: &PutFileRequest) -> RemoteResult<()> {
        let mut state = self.state()?;
        state.put_calls += 1;
        if state.fail_put {
            return Err(RemoteError::Unavailable("PUT refused".to_string()));
        }

        if let Some(current) = state.files.get(path) {
            if request.sha.as_deref() != Some(current.sha.as_str()) {
                return Err(RemoteError::Api {
                    status: 409,
                    message: format!("{path} does not match {} (409)", current.sha),
                });
            }
        }

        BASE64_STANDARD
            .decode(&request.content)
            .map_err(|error| RemoteError::Api {
                status: 422,
                message: format!("content is not valid Base64: {error} (422)"),
            })?;
        state.commit(path, request.content.clone());
        Ok(())
    }
}

fn wrap_lines(content: &str) -> String {
    let mut wrapped = String::with_capacity(content.len() + content.len() / WRAP_WIDTH + 1);
    for (index, ch) in content.chars().enumerate() {
        if index > 0 && index % WRAP_WIDTH == 0 {
            wrapped.push('\n');
        }
        wrapped.push(ch);
    }
    wrapped.push('\n');
    wrapped
}
