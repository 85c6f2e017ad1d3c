//! Controller builder with dependency injection pattern.

use std::sync::Arc;

use anyhow::{Context, Result};
use store_core::{KvStore, ParticipantStore};

use crate::leaderboard::Leaderboard;
use crate::notification::NotificationLog;

const DEFAULT_NOTIFICATION_CAPACITY: usize = 32;

/// Builder for constructing a [`Leaderboard`] with proper validation.
///
/// # Design Principles
///
/// - **Required fields**: both store adapters and the preference capability
/// - **Optional fields**: notification capacity
/// - **Fail-fast validation**: missing required fields cause build() to fail
/// - **Fluent API**: chainable methods for ergonomic construction
#[derive(Default)]
pub struct LeaderboardBuilder {
    local: Option<Box<dyn ParticipantStore>>,
    remote: Option<Box<dyn ParticipantStore>>,
    preferences: Option<Arc<dyn KvStore>>,
    notification_capacity: Option<usize>,
}

impl LeaderboardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the local store adapter (required).
    pub fn local(mut self, store: impl ParticipantStore + 'static) -> Self {
        self.local = Some(Box::new(store));
        self
    }

    /// Set the remote store adapter (required).
    pub fn remote(mut self, store: impl ParticipantStore + 'static) -> Self {
        self.remote = Some(Box::new(store));
        self
    }

    /// Set the preference store holding the backend-mode flag (required).
    pub fn preferences(mut self, kv: Arc<dyn KvStore>) -> Self {
        self.preferences = Some(kv);
        self
    }

    /// Cap the notification log (optional, defaults to 32 entries).
    pub fn notification_capacity(mut self, capacity: usize) -> Self {
        self.notification_capacity = Some(capacity);
        self
    }

    /// Build the controller. The result still needs
    /// [`Leaderboard::initialize`] before it reflects persisted state.
    ///
    /// # Errors
    ///
    /// Returns an error if any required field is missing.
    pub fn build(self) -> Result<Leaderboard> {
        let local = self
            .local
            .context("Local store is required. Use .local() to set it.")?;
        let remote = self
            .remote
            .context("Remote store is required. Use .remote() to set it.")?;
        let preferences = self
            .preferences
            .context("Preference store is required. Use .preferences() to set it.")?;

        let capacity = self
            .notification_capacity
            .unwrap_or(DEFAULT_NOTIFICATION_CAPACITY);

        Ok(Leaderboard::from_parts(
            local,
            remote,
            preferences,
            NotificationLog::new(capacity),
        ))
    }
}
