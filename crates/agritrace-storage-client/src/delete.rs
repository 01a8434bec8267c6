//! Batched deletion of stored objects.
//!
//! The backend's batch endpoint takes fully-qualified URLs and is treated
//! as atomic from the client's perspective: either every path is processed
//! or the call fails as a whole. Successful deletions also evict the
//! corresponding signed-URL cache entries so a deleted object's URL is
//! never served from cache.

use crate::error::{StorageError, StorageResult};
use crate::signed_url::StorageClient;

impl StorageClient {
    /// Delete one or more stored objects, given their container-relative
    /// paths. An empty list is a no-op that completes without a network
    /// call. On failure no cache entries are evicted.
    pub async fn delete_files(&self, paths: &[String]) -> StorageResult<()> {
        if paths.is_empty() {
            return Ok(());
        }

        let full_urls: Vec<String> = paths
            .iter()
            .map(|path| format!("{}/{}", self.storage_base_url, path))
            .collect();

        // Deletion is background work like signing; it must not flash the
        // global loading indicator.
        self.api()
            .background()
            .post_json_unit(&self.storage_endpoint("delete"), &full_urls)
            .await
            .map_err(StorageError::Transfer)?;

        let mut entries = self.entries.lock().expect("signed url cache lock poisoned");
        for path in paths {
            entries.remove(path);
        }
        drop(entries);

        tracing::info!(count = paths.len(), "stored objects deleted");
        Ok(())
    }
}
