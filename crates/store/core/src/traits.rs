//! Store adapter trait and error taxonomy.

use async_trait::async_trait;
use leaderboard_core::{Participant, ParticipantId};

use crate::kv::KvError;

/// Errors produced by participant stores.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The remote backend answered with a non-success outcome.
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend does not know the requested id.
    ///
    /// Carries the backend's own message verbatim so the presentation layer
    /// can surface it unchanged.
    #[error("{0}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("persistence error: {0}")]
    Persistence(#[from] KvError),
}

/// Persistence target for participant records.
///
/// The four operations are the entire capability set: list, create,
/// whole-value score replacement, delete. Score deltas are computed by the
/// caller before persistence; no backend ever sees an increment.
#[async_trait]
pub trait ParticipantStore: Send + Sync {
    /// Short label for logs and the UI ("local", "remote").
    fn name(&self) -> &str;

    /// Return all participants known to the backend.
    async fn list(&self) -> Result<Vec<Participant>, StoreError>;

    /// Create a participant with the given name and a zero score.
    async fn create(&self, name: &str) -> Result<Participant, StoreError>;

    /// Replace a participant's score with a new absolute value.
    ///
    /// Remote stores fail with [`StoreError::NotFound`] for unknown ids;
    /// local stores treat an unknown id as a no-op and return `Ok(None)`.
    async fn update_score(
        &self,
        id: &ParticipantId,
        score: u32,
    ) -> Result<Option<Participant>, StoreError>;

    /// Remove a participant. Unknown ids are a no-op for local stores and
    /// [`StoreError::NotFound`] for remote ones.
    async fn delete(&self, id: &ParticipantId) -> Result<(), StoreError>;
}

#[async_trait]
impl<T: ParticipantStore + ?Sized> ParticipantStore for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn list(&self) -> Result<Vec<Participant>, StoreError> {
        (**self).list().await
    }

    async fn create(&self, name: &str) -> Result<Participant, StoreError> {
        (**self).create(name).await
    }

    async fn update_score(
        &self,
        id: &ParticipantId,
        score: u32,
    ) -> Result<Option<Participant>, StoreError> {
        (**self).update_score(id, score).await
    }

    async fn delete(&self, id: &ParticipantId) -> Result<(), StoreError> {
        (**self).delete(id).await
    }
}
