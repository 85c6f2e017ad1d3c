//! View-model snapshots derived from [`Leaderboard`] state.

use crate::leaderboard::{Backend, Leaderboard};
use crate::notification::Notification;

/// High-level snapshot of the leaderboard used by presentation layers.
#[derive(Clone, Debug)]
pub struct StandingsFrame {
    pub backend: Backend,
    pub busy: bool,
    pub rows: Vec<StandingRow>,
    pub participant_count: usize,
    pub total_score: u64,
    /// Most recent notifications first.
    pub notifications: Vec<Notification>,
}

impl StandingsFrame {
    pub fn from_state(leaderboard: &Leaderboard, notification_limit: usize) -> Self {
        let standings = leaderboard.standings();

        let rows = standings
            .iter()
            .enumerate()
            .map(|(index, participant)| StandingRow {
                rank: index + 1,
                id: participant.id.to_string(),
                name: participant.name.clone(),
                score: participant.score,
            })
            .collect();

        Self {
            backend: leaderboard.backend(),
            busy: leaderboard.is_busy(),
            rows,
            participant_count: standings.len(),
            total_score: standings.iter().map(|p| u64::from(p.score)).sum(),
            notifications: leaderboard
                .notifications()
                .recent(notification_limit)
                .cloned()
                .collect(),
        }
    }
}

/// One displayed row: 1-based position plus the participant fields.
#[derive(Clone, Debug)]
pub struct StandingRow {
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub score: u32,
}
