//! Local participant store persisting one JSON blob through a [`KvStore`].
//!
//! This is the "browser storage" variant of the store adapter: everything
//! lives under a single key, every successful mutation writes the full
//! updated collection back (write-through, not write-behind), and an
//! unreadable blob degrades softly to an empty collection.
//!
//! [`KvStore`]: store_core::KvStore

pub mod adapter;
pub mod file_kv;

pub use adapter::{LocalStore, PARTICIPANTS_KEY};
pub use file_kv::FileKv;
