//! Seams between the list/workflow core and the network.
//!
//! [`ApiClient`](crate::ApiClient) and [`HttpObjectStore`](crate::HttpObjectStore)
//! implement these against the live backend; tests substitute in-memory fakes.

use std::future::Future;

use sis_model::{Entity, PageQuery, SearchEnvelope};

use crate::error::Result;

/// Paged, sorted, filtered reads for one entity.
pub trait RemoteCollection<E: Entity>: Send + Sync {
    /// Fetch one page. Never retries.
    ///
    /// Implementations return at most `query.page_size` rows and a
    /// `total_count` covering the whole filtered set.
    fn search(&self, query: &PageQuery) -> impl Future<Output = Result<SearchEnvelope<E>>> + Send;
}

/// Record writes for one entity. Each call resolves to the server's message.
pub trait RecordWriter<E: Entity>: Send + Sync {
    /// `POST /api/{entity}/add`.
    fn create(&self, payload: &E::Create) -> impl Future<Output = Result<String>> + Send;

    /// `PUT /api/{entity}/update`.
    fn update(&self, payload: &E::Update) -> impl Future<Output = Result<String>> + Send;

    /// `DELETE /api/{entity}/delete`.
    fn delete(&self, key: &E::Key) -> impl Future<Output = Result<String>> + Send;
}

/// Binary attachment storage.
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any existing object.
    /// Resolves to the path the record should reference.
    fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Remove the object at `key`. Removing a missing object is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> + Send;
}
