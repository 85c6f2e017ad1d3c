//! HTTP server exposing the participants CRUD surface.
//!
//! Four routes over a SQLite table:
//!
//! ```text
//! GET    /participants        → all participants, score descending
//! POST   /participants        → create with {name}, score starts at 0
//! PUT    /participants/{id}   → replace score with {score}
//! DELETE /participants/{id}   → remove, answers {"success":true}
//! ```
//!
//! Every failure response carries `{"error": "..."}`. The server is the
//! source of truth for ordering; clients re-fetch after mutating. Name
//! uniqueness is not enforced here — that check is client-side by contract.

pub mod db;
pub mod error;
pub mod routes;

pub use db::Db;
pub use error::ApiError;
pub use routes::router;
