//! Remote participant store speaking the CRUD HTTP surface.
//!
//! The remote backend is the source of truth in remote mode: callers issue a
//! mutation, then re-fetch the list to pick up server-assigned fields and
//! authoritative ordering. This adapter never touches local persistence.

pub mod client;
mod wire;

pub use client::RemoteStore;
