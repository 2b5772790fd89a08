//! Per-request state persistence, grounded on the teacher's `StateStore`
//! protocol (CRUD, `async_trait`-object-safe) but narrowed from a
//! scope-keyed general store to a single `EnrichmentState` record per
//! `RequestId` — this engine has no scopes, no semantic search, and no
//! notion of persisting anything besides the one record a run is
//! currently working on.

use async_trait::async_trait;
use rcve_core::{EnrichmentState, RequestId};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;

/// Failures reading or writing a run's state.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StateStoreError {
    /// No record exists yet for this request.
    #[error("no state recorded for request {0}")]
    NotFound(RequestId),
}

/// Durable storage for one [`EnrichmentState`] snapshot per request.
///
/// The Loop Driver reads the current snapshot, computes the next one,
/// and writes it back in full — there is no partial update, matching
/// the fold model in spec.md §9.
#[async_trait]
pub trait EnrichmentStateStore: Send + Sync {
    /// Fetch the current snapshot for a request, if one has been recorded.
    async fn read(&self, request_id: &RequestId) -> Result<Option<EnrichmentState>, StateStoreError>;

    /// Replace the snapshot for a request.
    async fn write(
        &self,
        request_id: &RequestId,
        state: EnrichmentState,
    ) -> Result<(), StateStoreError>;

    /// Drop a request's snapshot once its run has reached a terminal outcome.
    async fn remove(&self, request_id: &RequestId) -> Result<(), StateStoreError>;
}

/// An in-memory, single-process [`EnrichmentStateStore`]. Good enough for
/// one engine instance handling runs sequentially; a durable deployment
/// would back this with the same kind of storage the teacher offers for
/// its own state protocol (filesystem, git, a database).
#[derive(Default)]
pub struct MemoryStateStore {
    records: RwLock<HashMap<RequestId, EnrichmentState>>,
}

impl MemoryStateStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EnrichmentStateStore for MemoryStateStore {
    async fn read(&self, request_id: &RequestId) -> Result<Option<EnrichmentState>, StateStoreError> {
        let records = self.records.read().expect("state store lock poisoned");
        Ok(records.get(request_id).cloned())
    }

    async fn write(
        &self,
        request_id: &RequestId,
        state: EnrichmentState,
    ) -> Result<(), StateStoreError> {
        let mut records = self.records.write().expect("state store lock poisoned");
        records.insert(request_id.clone(), state);
        Ok(())
    }

    async fn remove(&self, request_id: &RequestId) -> Result<(), StateStoreError> {
        let mut records = self.records.write().expect("state store lock poisoned");
        records.remove(request_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcve_core::new_tool_usage;
    use std::collections::HashMap as StdHashMap;

    #[tokio::test]
    async fn read_before_write_is_none() {
        let store = MemoryStateStore::new();
        let id = RequestId::from("req-1");
        assert!(store.read(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let store = MemoryStateStore::new();
        let id = RequestId::from("req-1");
        let state = EnrichmentState::initial(500_000, new_tool_usage(&StdHashMap::new()));
        store.write(&id, state).await.unwrap();
        let read_back = store.read(&id).await.unwrap().unwrap();
        assert_eq!(read_back.iteration, 0);
    }

    #[tokio::test]
    async fn remove_clears_the_record() {
        let store = MemoryStateStore::new();
        let id = RequestId::from("req-1");
        let state = EnrichmentState::initial(500_000, new_tool_usage(&StdHashMap::new()));
        store.write(&id, state).await.unwrap();
        store.remove(&id).await.unwrap();
        assert!(store.read(&id).await.unwrap().is_none());
    }
}
