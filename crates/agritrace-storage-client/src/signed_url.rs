//! Signed read-URL resolution with caching and request de-duplication.
//!
//! Reading a stored file requires a time-limited signed URL from the
//! signing endpoint. Those URLs are requested often (every rendered icon or
//! logo), so [`StorageClient`] keeps a per-path cache and collapses
//! concurrent requests for the same path into a single outstanding call.
//!
//! Cache entries move through three states: absent, pending (a shared
//! in-flight future all concurrent callers await), and resolved (url +
//! expiry). A resolved entry is served until it is within 60 seconds of
//! expiry; after that it is evicted and re-requested, so a URL is never
//! handed out that could expire mid-render or mid-download. The pending
//! entry is installed before the request's first suspension point, which is
//! what guarantees at most one outstanding call per path.

use crate::error::{StorageError, StorageResult};
use crate::storage_prefix;
use agritrace_api_client::ApiClient;
use agritrace_core::models::{AccessMode, SignedUrlRequest, SignedUrlResponse};
use agritrace_core::AdminConfig;
use chrono::{Duration, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Entries expiring within this margin are treated as stale and refreshed.
const FRESHNESS_MARGIN_SECS: i64 = 60;

/// Default validity window requested for signed read URLs, in minutes.
pub const DEFAULT_TTL_MINUTES: i64 = 5;

type PendingSignature = Shared<BoxFuture<'static, Result<SignedUrlResponse, String>>>;

pub(crate) enum Entry {
    /// A request for this path is in flight; every caller awaits the same
    /// shared future.
    Pending(PendingSignature),
    /// A previously issued signed URL, reusable until close to expiry.
    Resolved(SignedUrlResponse),
}

type EntryMap = Arc<Mutex<HashMap<String, Entry>>>;

/// Outcome of a cache lookup, decided under the map lock.
enum CacheLookup {
    /// A fresh resolved URL was found.
    Hit(String),
    /// A request is already in flight; join it.
    Join(PendingSignature),
    /// Absent, stale, or expiring within the margin; a new request is needed.
    Refresh,
}

/// Client for signed-URL issuance and stored-object deletion, with a
/// process-local read-URL cache. Constructed once at application start;
/// clones share the same cache.
#[derive(Clone)]
pub struct StorageClient {
    api: ApiClient,
    sign_url: String,
    pub(crate) storage_base_url: String,
    ttl_minutes: i64,
    pub(crate) entries: EntryMap,
}

impl StorageClient {
    pub fn new(api: ApiClient, sign_url: String, storage_base_url: String) -> Self {
        StorageClient {
            api,
            sign_url,
            storage_base_url: storage_base_url.trim_end_matches('/').to_string(),
            ttl_minutes: DEFAULT_TTL_MINUTES,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn from_config(api: ApiClient, config: &AdminConfig) -> Self {
        let mut client = Self::new(
            api,
            config.sign_url.clone(),
            config.storage_base_url.clone(),
        );
        client.ttl_minutes = config.signed_url_ttl_minutes;
        client
    }

    /// Signed read URL for a stored object, using the configured TTL.
    pub async fn file_url(&self, path: &str) -> StorageResult<String> {
        self.file_url_with_ttl(path, self.ttl_minutes).await
    }

    /// Signed read URL for a stored object.
    ///
    /// Served from cache when a URL for `path` is still comfortably inside
    /// its validity window; otherwise one signing request is issued and
    /// shared with every concurrent caller for the same path. Failures
    /// propagate to all waiters and clear the pending entry so a later call
    /// can retry.
    pub async fn file_url_with_ttl(&self, path: &str, ttl_minutes: i64) -> StorageResult<String> {
        let shared = {
            let mut entries = self.entries.lock().expect("signed url cache lock poisoned");
            let lookup = match entries.get(path) {
                Some(Entry::Resolved(signed)) if is_fresh(signed) => {
                    CacheLookup::Hit(signed.url.clone())
                }
                Some(Entry::Pending(shared)) => CacheLookup::Join(shared.clone()),
                _ => CacheLookup::Refresh,
            };

            match lookup {
                CacheLookup::Hit(url) => {
                    tracing::debug!(path = %path, "signed url cache hit");
                    return Ok(url);
                }
                CacheLookup::Join(shared) => shared,
                CacheLookup::Refresh => {
                    // Evict whatever was there and issue a new request. The
                    // pending entry goes in before this lock is released, so
                    // concurrent callers for the same path find it instead of
                    // issuing their own call.
                    entries.remove(path);
                    let shared = self.issue_signature(path, ttl_minutes);
                    entries.insert(path.to_string(), Entry::Pending(shared.clone()));
                    shared
                }
            }
        };

        match shared.await {
            Ok(signed) => Ok(signed.url),
            Err(message) => Err(StorageError::SignFailed(message)),
        }
    }

    /// Build the shared signing future for one path. The future settles the
    /// cache entry itself (resolved on success, removed on failure), so its
    /// result lands in the cache even if the original caller stops waiting.
    fn issue_signature(&self, path: &str, ttl_minutes: i64) -> PendingSignature {
        // Signing calls are fast, frequent background work; they bypass the
        // loading tracker.
        let api = self.api.background();
        let sign_url = self.sign_url.clone();
        let entries = Arc::clone(&self.entries);
        let path = path.to_string();
        let request = SignedUrlRequest {
            path: path.clone(),
            mode: AccessMode::Read,
            ttl_minutes,
        };

        async move {
            let started = std::time::Instant::now();
            let result = api
                .post_json::<SignedUrlResponse, _>(&sign_url, &request)
                .await;

            let mut entries = entries.lock().expect("signed url cache lock poisoned");
            match result {
                Ok(signed) => {
                    tracing::debug!(
                        path = %path,
                        expires_on = %signed.expires_on,
                        duration_ms = started.elapsed().as_secs_f64() * 1000.0,
                        "signed url issued"
                    );
                    entries.insert(path, Entry::Resolved(signed.clone()));
                    Ok(signed)
                }
                Err(error) => {
                    tracing::warn!(path = %path, error = %error, "signed url request failed");
                    entries.remove(&path);
                    Err(error.to_string())
                }
            }
        }
        .boxed()
        .shared()
    }

    /// Upload bytes directly to a write-mode signed URL (issued by the
    /// backend, e.g. for company documents). Write URLs are single use and
    /// never enter the read cache. The URL embeds its own credentials, so
    /// no backend auth is attached.
    pub async fn put_to_signed_url(
        &self,
        upload_url: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> StorageResult<()> {
        let response = self
            .api
            .client()
            .put(upload_url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await
            .map_err(|e| StorageError::Transfer(anyhow::Error::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Transfer(anyhow::anyhow!(
                "signed upload rejected with status {}: {}",
                status,
                body
            )));
        }
        Ok(())
    }

    /// Drop one path's cache entry, forcing the next lookup to re-resolve.
    pub fn invalidate(&self, path: &str) {
        self.entries
            .lock()
            .expect("signed url cache lock poisoned")
            .remove(path);
    }

    /// Drop every cache entry.
    pub fn clear_cache(&self) {
        self.entries
            .lock()
            .expect("signed url cache lock poisoned")
            .clear();
    }

    /// Whether a resolved or pending entry currently exists for a path.
    pub fn is_cached(&self, path: &str) -> bool {
        self.entries
            .lock()
            .expect("signed url cache lock poisoned")
            .contains_key(path)
    }

    pub(crate) fn storage_endpoint(&self, operation: &str) -> String {
        format!("{}/{}", storage_prefix(), operation)
    }

    pub(crate) fn api(&self) -> &ApiClient {
        &self.api
    }
}

fn is_fresh(signed: &SignedUrlResponse) -> bool {
    signed.expires_on - Utc::now() > Duration::seconds(FRESHNESS_MARGIN_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(expires_in_secs: i64) -> SignedUrlResponse {
        SignedUrlResponse {
            url: "https://storage.example.com/admin-uploads/p.jpg?sig=abc".to_string(),
            expires_on: Utc::now() + Duration::seconds(expires_in_secs),
            permissions: "r".to_string(),
        }
    }

    #[test]
    fn freshness_margin_is_sixty_seconds() {
        assert!(is_fresh(&response(120)));
        assert!(!is_fresh(&response(30)));
        assert!(!is_fresh(&response(-10)));
    }
}
