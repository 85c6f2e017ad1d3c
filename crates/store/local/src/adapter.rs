//! Local store adapter over an injected key-value capability.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use leaderboard_core::{Participant, ParticipantId};
use store_core::{KvStore, ParticipantStore, StoreError};

/// Key the serialized participant array is stored under.
pub const PARTICIPANTS_KEY: &str = "participants";

/// Participant store backed by a single persisted JSON blob.
///
/// The blob is the source of truth: every operation reads and parses it
/// fresh, and every successful mutation writes the full collection back.
/// No caching, no network.
pub struct LocalStore {
    kv: Arc<dyn KvStore>,
}

impl LocalStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    fn read_all(&self) -> Result<Vec<Participant>, StoreError> {
        let Some(blob) = self.kv.get(PARTICIPANTS_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&blob) {
            Ok(participants) => Ok(participants),
            Err(err) => {
                // Unreadable state degrades to empty rather than failing the caller.
                tracing::warn!("Discarding unreadable participant blob: {err}");
                Ok(Vec::new())
            }
        }
    }

    fn write_all(&self, participants: &[Participant]) -> Result<(), StoreError> {
        let blob = serde_json::to_string(participants)
            .map_err(|err| StoreError::Serialization(err.to_string()))?;
        self.kv.put(PARTICIPANTS_KEY, &blob)?;
        Ok(())
    }

    /// Millisecond-epoch id, bumped past any collision with existing ids.
    fn next_id(existing: &[Participant]) -> ParticipantId {
        let mut millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        loop {
            let id = millis.to_string();
            if !existing.iter().any(|p| p.id.as_str() == id) {
                return ParticipantId::new(id);
            }
            millis += 1;
        }
    }
}

#[async_trait]
impl ParticipantStore for LocalStore {
    fn name(&self) -> &str {
        "local"
    }

    async fn list(&self) -> Result<Vec<Participant>, StoreError> {
        self.read_all()
    }

    async fn create(&self, name: &str) -> Result<Participant, StoreError> {
        let mut participants = self.read_all()?;
        let participant = Participant::new(Self::next_id(&participants), name);
        participants.push(participant.clone());
        self.write_all(&participants)?;
        Ok(participant)
    }

    async fn update_score(
        &self,
        id: &ParticipantId,
        score: u32,
    ) -> Result<Option<Participant>, StoreError> {
        let mut participants = self.read_all()?;
        let mut updated = None;
        for participant in &mut participants {
            if participant.id == *id {
                participant.score = score;
                updated = Some(participant.clone());
            }
        }
        // Unknown id: silent no-op, presence is checked upstream.
        if updated.is_some() {
            self.write_all(&participants)?;
        }
        Ok(updated)
    }

    async fn delete(&self, id: &ParticipantId) -> Result<(), StoreError> {
        let mut participants = self.read_all()?;
        let before = participants.len();
        participants.retain(|p| p.id != *id);
        if participants.len() != before {
            self.write_all(&participants)?;
        }
        Ok(())
    }
}
