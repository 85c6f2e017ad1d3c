//! Controller state machine for the leaderboard.

use std::sync::Arc;

use leaderboard_core::{Participant, ParticipantId, normalize_name, rank};
use store_core::{KvStore, ParticipantStore, StoreError};

use crate::notification::NotificationLog;

/// Key the backend-mode flag is persisted under. `"true"` selects remote.
pub const USE_REMOTE_KEY: &str = "use-remote";

/// Active persistence target.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Backend {
    Local,
    Remote,
}

impl Backend {
    pub fn label(self) -> &'static str {
        match self {
            Backend::Local => "local",
            Backend::Remote => "remote",
        }
    }

    fn flag(self) -> &'static str {
        match self {
            Backend::Remote => "true",
            Backend::Local => "false",
        }
    }

    fn toggled(self) -> Backend {
        match self {
            Backend::Local => Backend::Remote,
            Backend::Remote => Backend::Local,
        }
    }
}

/// Errors surfaced to the user for a single action.
///
/// Validation variants are rejected before any store call and leave state
/// untouched; store errors are reported with state left as last-known.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("participant name cannot be empty")]
    EmptyName,

    #[error("participant already exists: {0}")]
    DuplicateName(String),

    #[error("score cannot drop below zero")]
    NegativeScore,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Leaderboard controller.
///
/// Owns the materialized participant list (always sorted by score
/// descending), the active backend, the two-step removal gate, and the
/// notification log. All mutations go through the active store adapter;
/// every error is caught at the action boundary and surfaced as a
/// notification, never a panic.
pub struct Leaderboard {
    local: Box<dyn ParticipantStore>,
    remote: Box<dyn ParticipantStore>,
    preferences: Arc<dyn KvStore>,
    backend: Backend,
    participants: Vec<Participant>,
    busy: bool,
    pending_removal: Option<Participant>,
    notifications: NotificationLog,
}

impl Leaderboard {
    /// Create a new [`crate::LeaderboardBuilder`].
    pub fn builder() -> crate::LeaderboardBuilder {
        crate::LeaderboardBuilder::new()
    }

    pub(crate) fn from_parts(
        local: Box<dyn ParticipantStore>,
        remote: Box<dyn ParticipantStore>,
        preferences: Arc<dyn KvStore>,
        notifications: NotificationLog,
    ) -> Self {
        Self {
            local,
            remote,
            preferences,
            backend: Backend::Local,
            participants: Vec::new(),
            busy: false,
            pending_removal: None,
            notifications,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current participants, sorted by score descending.
    pub fn standings(&self) -> &[Participant] {
        &self.participants
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Whether a remote mutation is in flight. A hint for the presentation
    /// layer to disable controls, not a lock.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn pending_removal(&self) -> Option<&Participant> {
        self.pending_removal.as_ref()
    }

    pub fn notifications(&self) -> &NotificationLog {
        &self.notifications
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Load state from the persisted preference and the active store.
    ///
    /// If the preferred backend is remote and listing it fails, the session
    /// downgrades to local and loads from there instead. The downgrade is
    /// one-way and session-only: the persisted flag keeps its value and
    /// there is no automatic upgrade back.
    pub async fn initialize(&mut self) -> Result<(), ActionError> {
        match self.try_initialize().await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.notifications.error(err.to_string());
                Err(err)
            }
        }
    }

    async fn try_initialize(&mut self) -> Result<(), ActionError> {
        self.participants.clear();
        self.pending_removal = None;
        self.backend = self.preferred_backend();

        if self.backend == Backend::Remote {
            match self.remote.list().await {
                Ok(listed) => {
                    self.participants = listed;
                    return Ok(());
                }
                Err(err) => {
                    tracing::warn!("Remote backend unavailable, falling back to local: {err}");
                    self.notifications
                        .warning(format!("Remote backend unavailable, using local data: {err}"));
                    self.backend = Backend::Local;
                }
            }
        }

        let mut listed = self.local.list().await?;
        rank(&mut listed);
        self.participants = listed;
        Ok(())
    }

    /// Add a participant with a zero score.
    ///
    /// Rejects names that trim to empty and case-insensitive duplicates
    /// before any store call.
    pub async fn add_participant(&mut self, name: &str) -> Result<(), ActionError> {
        match self.try_add(name).await {
            Ok(added) => {
                self.notifications.info(format!("Added {added}"));
                Ok(())
            }
            Err(err) => {
                self.notifications.error(err.to_string());
                Err(err)
            }
        }
    }

    async fn try_add(&mut self, name: &str) -> Result<String, ActionError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ActionError::EmptyName);
        }

        let key = normalize_name(trimmed);
        if self
            .participants
            .iter()
            .any(|p| normalize_name(&p.name) == key)
        {
            return Err(ActionError::DuplicateName(trimmed.to_string()));
        }

        match self.backend {
            Backend::Remote => {
                self.busy = true;
                let result = self.remote_add(trimmed).await;
                self.busy = false;
                result?;
            }
            Backend::Local => {
                let created = self.local.create(trimmed).await?;
                self.participants.push(created);
                rank(&mut self.participants);
            }
        }

        Ok(trimmed.to_string())
    }

    async fn remote_add(&mut self, name: &str) -> Result<(), ActionError> {
        self.remote.create(name).await?;
        // The remote is authoritative for ordering and server-assigned
        // fields: re-fetch instead of merging client-side.
        self.participants = self.remote.list().await?;
        Ok(())
    }

    /// Apply `delta` to a participant's score.
    ///
    /// The reference UI sends +1/-1 but any integer is accepted. A resulting
    /// score below zero is rejected with no store call and no state change.
    /// An id absent from the in-memory list is a silent no-op.
    pub async fn adjust_score(
        &mut self,
        id: &ParticipantId,
        delta: i64,
    ) -> Result<(), ActionError> {
        match self.try_adjust(id, delta).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.notifications.error(err.to_string());
                Err(err)
            }
        }
    }

    async fn try_adjust(&mut self, id: &ParticipantId, delta: i64) -> Result<(), ActionError> {
        let Some(current) = self
            .participants
            .iter()
            .find(|p| p.id == *id)
            .map(|p| p.score)
        else {
            tracing::debug!("Ignoring score change for unknown participant {id}");
            return Ok(());
        };

        let candidate = i64::from(current).saturating_add(delta);
        if candidate < 0 {
            return Err(ActionError::NegativeScore);
        }
        let candidate = u32::try_from(candidate).unwrap_or(u32::MAX);

        match self.backend {
            Backend::Remote => {
                self.busy = true;
                let result = self.remote_update(id, candidate).await;
                self.busy = false;
                result?;
            }
            Backend::Local => {
                self.local.update_score(id, candidate).await?;
                if let Some(participant) = self.participants.iter_mut().find(|p| p.id == *id) {
                    participant.score = candidate;
                }
                rank(&mut self.participants);
            }
        }

        Ok(())
    }

    async fn remote_update(&mut self, id: &ParticipantId, score: u32) -> Result<(), ActionError> {
        self.remote.update_score(id, score).await?;
        self.participants = self.remote.list().await?;
        Ok(())
    }

    /// Stage a participant for removal without mutating anything.
    ///
    /// Removal is a two-step commit: staging picks the candidate, a separate
    /// [`Leaderboard::confirm_removal`] performs the delete. Staging an
    /// unknown id clears the gate and returns `None`.
    pub fn stage_removal(&mut self, id: &ParticipantId) -> Option<&Participant> {
        self.pending_removal = self.participants.iter().find(|p| p.id == *id).cloned();
        self.pending_removal.as_ref()
    }

    /// Drop the staged candidate without removing it.
    pub fn cancel_removal(&mut self) {
        self.pending_removal = None;
    }

    /// Remove the staged participant. A no-op when nothing is staged.
    pub async fn confirm_removal(&mut self) -> Result<(), ActionError> {
        let Some(candidate) = self.pending_removal.take() else {
            return Ok(());
        };

        match self.try_remove(&candidate).await {
            Ok(()) => {
                self.notifications
                    .info(format!("Removed {}", candidate.name));
                Ok(())
            }
            Err(err) => {
                self.notifications.error(err.to_string());
                Err(err)
            }
        }
    }

    async fn try_remove(&mut self, candidate: &Participant) -> Result<(), ActionError> {
        match self.backend {
            Backend::Remote => {
                self.busy = true;
                let result = self.remote_delete(&candidate.id).await;
                self.busy = false;
                result?;
            }
            Backend::Local => {
                self.local.delete(&candidate.id).await?;
                self.participants.retain(|p| p.id != candidate.id);
            }
        }
        Ok(())
    }

    async fn remote_delete(&mut self, id: &ParticipantId) -> Result<(), ActionError> {
        self.remote.delete(id).await?;
        self.participants = self.remote.list().await?;
        Ok(())
    }

    /// Switch between local and remote storage.
    ///
    /// Persists the new preference and re-initializes from scratch. This is
    /// a hard reset, not a migration: in-memory state is discarded and
    /// nothing moves between backends. Toggling to an unreachable remote
    /// lands back on local via the initialize downgrade.
    pub async fn toggle_backend(&mut self) -> Result<(), ActionError> {
        let target = self.backend.toggled();
        if let Err(err) = self.preferences.put(USE_REMOTE_KEY, target.flag()) {
            let err = ActionError::Store(StoreError::from(err));
            self.notifications.error(err.to_string());
            return Err(err);
        }

        self.notifications
            .info(format!("Switched to {} storage, reloading", target.label()));
        self.initialize().await
    }

    fn preferred_backend(&self) -> Backend {
        match self.preferences.get(USE_REMOTE_KEY) {
            Ok(Some(flag)) if flag.trim() == "true" => Backend::Remote,
            Ok(_) => Backend::Local,
            Err(err) => {
                tracing::warn!("Failed to read backend preference, defaulting to local: {err}");
                Backend::Local
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationLevel;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use store_core::MemoryKv;
    use store_local::LocalStore;

    /// Remote double that assigns ids and orders by score like the real
    /// server. Counts update calls so tests can assert "no adapter call".
    #[derive(Default)]
    struct FakeRemote {
        participants: Mutex<Vec<Participant>>,
        next_id: AtomicUsize,
        update_calls: AtomicUsize,
    }

    impl FakeRemote {
        fn seeded(participants: Vec<Participant>) -> Self {
            Self {
                participants: Mutex::new(participants),
                ..Self::default()
            }
        }

        fn update_calls(&self) -> usize {
            self.update_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ParticipantStore for FakeRemote {
        fn name(&self) -> &str {
            "remote"
        }

        async fn list(&self) -> Result<Vec<Participant>, StoreError> {
            let mut listed = self.participants.lock().unwrap().clone();
            listed.sort_by(|a, b| b.score.cmp(&a.score));
            Ok(listed)
        }

        async fn create(&self, name: &str) -> Result<Participant, StoreError> {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            let participant =
                Participant::new(ParticipantId::new(format!("srv-{id}")), name);
            self.participants
                .lock()
                .unwrap()
                .push(participant.clone());
            Ok(participant)
        }

        async fn update_score(
            &self,
            id: &ParticipantId,
            score: u32,
        ) -> Result<Option<Participant>, StoreError> {
            self.update_calls.fetch_add(1, Ordering::SeqCst);
            let mut participants = self.participants.lock().unwrap();
            let Some(participant) = participants.iter_mut().find(|p| p.id == *id) else {
                return Err(StoreError::NotFound(format!(
                    "participant not found: {id}"
                )));
            };
            participant.score = score;
            Ok(Some(participant.clone()))
        }

        async fn delete(&self, id: &ParticipantId) -> Result<(), StoreError> {
            let mut participants = self.participants.lock().unwrap();
            let before = participants.len();
            participants.retain(|p| p.id != *id);
            if participants.len() == before {
                return Err(StoreError::NotFound(format!(
                    "participant not found: {id}"
                )));
            }
            Ok(())
        }
    }

    /// Remote double whose reads succeed but whose mutations all fail.
    struct ReadOnlyRemote {
        seeded: Vec<Participant>,
    }

    #[async_trait]
    impl ParticipantStore for ReadOnlyRemote {
        fn name(&self) -> &str {
            "remote"
        }

        async fn list(&self) -> Result<Vec<Participant>, StoreError> {
            Ok(self.seeded.clone())
        }

        async fn create(&self, _name: &str) -> Result<Participant, StoreError> {
            Err(StoreError::Transport("server error".to_string()))
        }

        async fn update_score(
            &self,
            _id: &ParticipantId,
            _score: u32,
        ) -> Result<Option<Participant>, StoreError> {
            Err(StoreError::Transport("server error".to_string()))
        }

        async fn delete(&self, _id: &ParticipantId) -> Result<(), StoreError> {
            Err(StoreError::Transport("server error".to_string()))
        }
    }

    /// Remote double that fails every call, as if the server were down.
    struct FailingRemote;

    #[async_trait]
    impl ParticipantStore for FailingRemote {
        fn name(&self) -> &str {
            "remote"
        }

        async fn list(&self) -> Result<Vec<Participant>, StoreError> {
            Err(StoreError::Transport("connection refused".to_string()))
        }

        async fn create(&self, _name: &str) -> Result<Participant, StoreError> {
            Err(StoreError::Transport("connection refused".to_string()))
        }

        async fn update_score(
            &self,
            _id: &ParticipantId,
            _score: u32,
        ) -> Result<Option<Participant>, StoreError> {
            Err(StoreError::Transport("connection refused".to_string()))
        }

        async fn delete(&self, _id: &ParticipantId) -> Result<(), StoreError> {
            Err(StoreError::Transport("connection refused".to_string()))
        }
    }

    fn board_with(
        kv: Arc<MemoryKv>,
        remote: impl ParticipantStore + 'static,
    ) -> Leaderboard {
        Leaderboard::builder()
            .local(LocalStore::new(kv.clone() as Arc<dyn KvStore>))
            .remote(remote)
            .preferences(kv as Arc<dyn KvStore>)
            .build()
            .unwrap()
    }

    async fn local_board() -> Leaderboard {
        let mut board = board_with(Arc::new(MemoryKv::new()), FailingRemote);
        board.initialize().await.unwrap();
        board
    }

    async fn remote_board(remote: FakeRemote) -> Leaderboard {
        let kv = Arc::new(MemoryKv::new());
        kv.put(USE_REMOTE_KEY, "true").unwrap();
        let mut board = board_with(kv, remote);
        board.initialize().await.unwrap();
        board
    }

    fn id_of(board: &Leaderboard, name: &str) -> ParticipantId {
        board
            .standings()
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.id.clone())
            .unwrap()
    }

    #[tokio::test]
    async fn test_additions_keep_scores_sorted_descending() {
        let mut board = local_board().await;
        for name in ["Alice", "Bob", "Carol"] {
            board.add_participant(name).await.unwrap();
        }

        let bob = id_of(&board, "Bob");
        let carol = id_of(&board, "Carol");
        board.adjust_score(&bob, 5).await.unwrap();
        board.adjust_score(&carol, 2).await.unwrap();

        let scores: Vec<u32> = board.standings().iter().map(|p| p.score).collect();
        assert_eq!(scores, vec![5, 2, 0]);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected_case_insensitively() {
        let mut board = local_board().await;
        board.add_participant("Alice").await.unwrap();

        let err = board.add_participant("  aLiCe ").await.unwrap_err();
        assert!(matches!(err, ActionError::DuplicateName(_)));
        assert_eq!(board.standings().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_name_is_rejected() {
        let mut board = local_board().await;
        let err = board.add_participant("   ").await.unwrap_err();
        assert!(matches!(err, ActionError::EmptyName));
        assert!(board.standings().is_empty());
    }

    #[tokio::test]
    async fn test_add_then_list_roundtrip() {
        let mut board = local_board().await;
        board.add_participant("Alice").await.unwrap();

        assert_eq!(board.standings().len(), 1);
        assert_eq!(board.standings()[0].name, "Alice");
        assert_eq!(board.standings()[0].score, 0);
    }

    #[tokio::test]
    async fn test_three_increments_accumulate() {
        let mut board = local_board().await;
        board.add_participant("Bob").await.unwrap();
        let bob = id_of(&board, "Bob");

        for _ in 0..3 {
            board.adjust_score(&bob, 1).await.unwrap();
        }

        assert_eq!(board.standings().len(), 1);
        assert_eq!(board.standings()[0].name, "Bob");
        assert_eq!(board.standings()[0].score, 3);
    }

    #[tokio::test]
    async fn test_negative_result_is_rejected_without_store_call() {
        let remote = Arc::new(FakeRemote::default());
        let kv = Arc::new(MemoryKv::new());
        kv.put(USE_REMOTE_KEY, "true").unwrap();
        let mut board = board_with(kv, remote.clone());
        board.initialize().await.unwrap();

        board.add_participant("Bob").await.unwrap();
        let bob = id_of(&board, "Bob");

        let err = board.adjust_score(&bob, -1).await.unwrap_err();
        assert!(matches!(err, ActionError::NegativeScore));
        assert_eq!(remote.update_calls(), 0);
        assert_eq!(board.standings()[0].score, 0);
    }

    #[tokio::test]
    async fn test_tied_scores_keep_both_entries() {
        let mut board = local_board().await;
        board.add_participant("Alice").await.unwrap();
        board.add_participant("Bob").await.unwrap();
        let alice = id_of(&board, "Alice");
        let bob = id_of(&board, "Bob");
        board.adjust_score(&alice, 5).await.unwrap();
        board.adjust_score(&bob, 5).await.unwrap();

        let names: Vec<&str> = board.standings().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"Alice"));
        assert!(names.contains(&"Bob"));
    }

    #[tokio::test]
    async fn test_staging_a_removal_does_not_mutate() {
        let mut board = local_board().await;
        board.add_participant("Alice").await.unwrap();
        let alice = id_of(&board, "Alice");

        let staged = board.stage_removal(&alice);
        assert_eq!(staged.map(|p| p.name.as_str()), Some("Alice"));
        assert_eq!(board.standings().len(), 1);

        board.cancel_removal();
        assert_eq!(board.standings().len(), 1);
        assert!(board.pending_removal().is_none());
    }

    #[tokio::test]
    async fn test_confirm_removes_the_staged_participant() {
        let mut board = local_board().await;
        board.add_participant("Alice").await.unwrap();
        board.add_participant("Bob").await.unwrap();
        let alice = id_of(&board, "Alice");

        board.stage_removal(&alice);
        board.confirm_removal().await.unwrap();

        let names: Vec<&str> = board.standings().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Bob"]);
    }

    #[tokio::test]
    async fn test_confirm_without_staging_is_a_noop() {
        let mut board = local_board().await;
        board.add_participant("Alice").await.unwrap();
        board.confirm_removal().await.unwrap();
        assert_eq!(board.standings().len(), 1);
    }

    #[tokio::test]
    async fn test_adjust_unknown_id_is_a_silent_noop() {
        // Ambiguity pinned deliberately: an id absent from memory neither
        // errors nor calls the store.
        let mut board = local_board().await;
        board.add_participant("Alice").await.unwrap();

        board
            .adjust_score(&ParticipantId::new("missing"), 1)
            .await
            .unwrap();

        assert_eq!(board.standings().len(), 1);
        assert_eq!(board.standings()[0].score, 0);
    }

    #[tokio::test]
    async fn test_stage_unknown_id_returns_none() {
        let mut board = local_board().await;
        board.add_participant("Alice").await.unwrap();
        assert!(board.stage_removal(&ParticipantId::new("missing")).is_none());
    }

    #[tokio::test]
    async fn test_remote_add_refetches_authoritative_order() {
        let seeded = vec![Participant {
            id: ParticipantId::new("srv-alice"),
            name: "Alice".to_string(),
            score: 5,
        }];
        let mut board = remote_board(FakeRemote::seeded(seeded)).await;

        board.add_participant("Bob").await.unwrap();

        let names: Vec<&str> = board.standings().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
        assert!(board.standings()[1].id.as_str().starts_with("srv-"));
        assert!(!board.is_busy());
    }

    #[tokio::test]
    async fn test_initialize_honors_remote_preference() {
        let seeded = vec![Participant {
            id: ParticipantId::new("srv-alice"),
            name: "Alice".to_string(),
            score: 5,
        }];
        let board = remote_board(FakeRemote::seeded(seeded)).await;

        assert_eq!(board.backend(), Backend::Remote);
        assert_eq!(board.standings().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_remote_downgrades_to_local_with_data() {
        let kv = Arc::new(MemoryKv::new());

        // Seed local data first, in local mode.
        let mut board = board_with(kv.clone(), FailingRemote);
        board.initialize().await.unwrap();
        board.add_participant("Alice").await.unwrap();

        // Toggling persists the remote preference, then initialize fails
        // against the remote and downgrades for this session.
        board.toggle_backend().await.unwrap();

        assert_eq!(board.backend(), Backend::Local);
        assert_eq!(board.standings().len(), 1);
        assert_eq!(board.standings()[0].name, "Alice");
        // The persisted flag is untouched by the downgrade.
        assert_eq!(kv.get(USE_REMOTE_KEY).unwrap().as_deref(), Some("true"));
        assert!(
            board
                .notifications()
                .iter()
                .any(|n| n.level == NotificationLevel::Warning)
        );
    }

    #[tokio::test]
    async fn test_toggle_back_to_local_persists_flag() {
        let seeded = FakeRemote::seeded(Vec::new());
        let kv = Arc::new(MemoryKv::new());
        kv.put(USE_REMOTE_KEY, "true").unwrap();
        let mut board = board_with(kv.clone(), seeded);
        board.initialize().await.unwrap();
        assert_eq!(board.backend(), Backend::Remote);

        board.toggle_backend().await.unwrap();

        assert_eq!(board.backend(), Backend::Local);
        assert_eq!(kv.get(USE_REMOTE_KEY).unwrap().as_deref(), Some("false"));
    }

    #[tokio::test]
    async fn test_remote_failure_after_initialize_keeps_last_known_state() {
        let kv = Arc::new(MemoryKv::new());
        kv.put(USE_REMOTE_KEY, "true").unwrap();

        let seeded = vec![Participant {
            id: ParticipantId::new("srv-alice"),
            name: "Alice".to_string(),
            score: 5,
        }];
        let mut board = board_with(kv, ReadOnlyRemote { seeded });
        board.initialize().await.unwrap();

        // A failing mutation is reported but does not clear the list and
        // does not downgrade outside initialize.
        let err = board.add_participant("Bob").await.unwrap_err();
        assert!(matches!(err, ActionError::Store(StoreError::Transport(_))));

        assert_eq!(board.backend(), Backend::Remote);
        assert_eq!(board.standings().len(), 1);
        assert_eq!(board.standings()[0].name, "Alice");
        assert!(!board.is_busy());
    }
}
