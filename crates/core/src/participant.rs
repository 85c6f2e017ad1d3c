//! Participant identity and record types.

use serde::{Deserialize, Serialize};

/// Opaque identifier for a participant, stable for the entity's lifetime.
///
/// Local stores derive ids from creation time; the remote backend assigns
/// UUIDs. Everything above the store layer treats both as opaque strings.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ParticipantId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A single leaderboard entry.
///
/// The `score >= 0` invariant is carried by the type; score changes are
/// validated upstream before a new absolute value is persisted.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub score: u32,
}

impl Participant {
    /// Create a participant with a zero score.
    pub fn new(id: ParticipantId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            score: 0,
        }
    }
}

/// Case-insensitive key used for duplicate-name checks.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
