//! Auth domain data types
//!
//! Simple, serializable types returned by auth actions.

use serde::{Deserialize, Serialize};

use crate::common::IdentityId;

/// Test identifier accepted in debug builds when TEST_IDENTIFIER_ENABLED is set.
pub const TEST_PHONE_NUMBER: &str = "+1234567890";

/// Code accepted for the test identifier in debug builds.
pub const TEST_PHONE_CODE: &str = "123456";

/// An authenticated session minted after the primary credential check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub identity_id: IdentityId,
    pub token: String,
    pub is_admin: bool,
}
