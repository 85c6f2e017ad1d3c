//! HTTP client implementation of the participant store.

use std::time::Duration;

use async_trait::async_trait;
use leaderboard_core::{Participant, ParticipantId};
use store_core::{ParticipantStore, StoreError};

use crate::wire::{CreateParticipant, DeleteOutcome, ErrorBody, UpdateScore};

/// Store adapter for the remote participants API.
///
/// Talks to the four-route CRUD surface (`GET`/`POST /participants`,
/// `PUT`/`DELETE /participants/{id}`). Non-success responses surface the
/// backend's error message; a 404 maps to [`StoreError::NotFound`] with the
/// message passed through verbatim.
pub struct RemoteStore {
    base_url: String,
    http_client: reqwest::Client,
}

impl RemoteStore {
    /// Create a store for the API at `base_url` with no request timeout.
    ///
    /// Unbounded waits are the default contract; use
    /// [`RemoteStore::with_timeout`] to opt in to a bound.
    pub fn new(base_url: impl Into<String>) -> Result<Self, StoreError> {
        Self::with_timeout(base_url, None)
    }

    /// Create a store with an optional per-request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, StoreError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|err| StoreError::Transport(err.to_string()))?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            base_url,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn participants_url(&self) -> String {
        format!("{}/participants", self.base_url)
    }

    fn participant_url(&self, id: &ParticipantId) -> String {
        format!("{}/participants/{}", self.base_url, id)
    }

    /// Map a non-success response onto the store error taxonomy.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|body| body.error)
            .unwrap_or(body);

        if status == reqwest::StatusCode::NOT_FOUND {
            Err(StoreError::NotFound(message))
        } else {
            Err(StoreError::Transport(format!("{status}: {message}")))
        }
    }
}

#[async_trait]
impl ParticipantStore for RemoteStore {
    fn name(&self) -> &str {
        "remote"
    }

    async fn list(&self) -> Result<Vec<Participant>, StoreError> {
        tracing::debug!("Fetching participants from {}", self.base_url);

        let response = self
            .http_client
            .get(self.participants_url())
            .send()
            .await
            .map_err(transport)?;
        let response = Self::check(response).await?;

        response
            .json()
            .await
            .map_err(|err| StoreError::Serialization(err.to_string()))
    }

    async fn create(&self, name: &str) -> Result<Participant, StoreError> {
        let response = self
            .http_client
            .post(self.participants_url())
            .json(&CreateParticipant { name })
            .send()
            .await
            .map_err(transport)?;
        let response = Self::check(response).await?;

        response
            .json()
            .await
            .map_err(|err| StoreError::Serialization(err.to_string()))
    }

    async fn update_score(
        &self,
        id: &ParticipantId,
        score: u32,
    ) -> Result<Option<Participant>, StoreError> {
        let response = self
            .http_client
            .put(self.participant_url(id))
            .json(&UpdateScore { score })
            .send()
            .await
            .map_err(transport)?;
        let response = Self::check(response).await?;

        let participant = response
            .json()
            .await
            .map_err(|err| StoreError::Serialization(err.to_string()))?;
        Ok(Some(participant))
    }

    async fn delete(&self, id: &ParticipantId) -> Result<(), StoreError> {
        let response = self
            .http_client
            .delete(self.participant_url(id))
            .send()
            .await
            .map_err(transport)?;
        let response = Self::check(response).await?;

        let outcome: DeleteOutcome = response
            .json()
            .await
            .map_err(|err| StoreError::Serialization(err.to_string()))?;
        if !outcome.success {
            return Err(StoreError::Transport(
                "delete was not acknowledged".to_string(),
            ));
        }
        Ok(())
    }
}

fn transport(err: reqwest::Error) -> StoreError {
    StoreError::Transport(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let store = RemoteStore::new("http://localhost:8080/").unwrap();
        assert_eq!(store.base_url(), "http://localhost:8080");
        assert_eq!(
            store.participants_url(),
            "http://localhost:8080/participants"
        );
        assert_eq!(
            store.participant_url(&ParticipantId::new("abc")),
            "http://localhost:8080/participants/abc"
        );
    }
}
