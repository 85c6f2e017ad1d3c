//! Request and response bodies for the participants API.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct CreateParticipant<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub struct UpdateScore {
    pub score: u32,
}

#[derive(Debug, Deserialize)]
pub struct DeleteOutcome {
    pub success: bool,
}

/// Error envelope every failure response carries: `{"error": "..."}`.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
