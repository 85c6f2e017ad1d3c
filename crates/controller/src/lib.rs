//! Leaderboard controller mediating between stores and presentation.
//!
//! # Architecture
//!
//! ```text
//! Presentation (CLI, future UIs)
//!   └─→ Leaderboard (this crate)
//!         ├─→ ParticipantStore "local"   (store-local)
//!         ├─→ ParticipantStore "remote"  (store-remote)
//!         └─→ KvStore preferences       (backend-mode flag)
//! ```
//!
//! The controller holds the materialized, always-sorted participant list,
//! validates every action before any store call, and exposes snapshots via
//! [`StandingsFrame`]. Execution is single-threaded cooperative: one action
//! runs to completion before the next; the `busy` flag only lets the
//! presentation layer disable controls during a remote round-trip.
//!
//! # Design Principles
//!
//! - **Dependency Injection**: both stores and the preference capability are
//!   injected via [`LeaderboardBuilder`]
//! - **Validation first**: invalid actions are rejected before any adapter
//!   call and leave state untouched
//! - **Refresh over merge**: in remote mode every mutation re-fetches the
//!   authoritative list instead of replicating server logic client-side

mod builder;
mod leaderboard;
pub mod notification;
pub mod view_model;

pub use builder::LeaderboardBuilder;
pub use leaderboard::{ActionError, Backend, Leaderboard, USE_REMOTE_KEY};
pub use notification::{Notification, NotificationLevel, NotificationLog};
pub use view_model::{StandingRow, StandingsFrame};
