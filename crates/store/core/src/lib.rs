//! Storage abstraction layer for the leaderboard.
//!
//! # Architecture
//!
//! ```text
//! Controller
//!   └─→ ParticipantStore (polymorphic over two variants)
//!         ├── store-local:  LocalStore over an injected KvStore
//!         └── store-remote: RemoteStore over HTTP
//! ```
//!
//! The [`KvStore`] capability is the second seam: anything that persists
//! small string blobs (the participant array, the backend-mode flag) is
//! handed a `KvStore` at construction instead of reaching into ambient
//! storage, so tests can substitute [`MemoryKv`].

pub mod kv;
pub mod traits;

pub use kv::{KvError, KvStore, MemoryKv};
pub use traits::{ParticipantStore, StoreError};
