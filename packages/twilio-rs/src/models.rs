use serde::{Deserialize, Serialize};

/// Response from the Twilio Messages API.
///
/// Only the fields we consume are modeled; Twilio returns more.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub sid: String,
    pub status: String,
    pub to: String,
    pub from: Option<String>,
    pub error_code: Option<i64>,
    pub error_message: Option<String>,
}
