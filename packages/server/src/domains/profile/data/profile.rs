use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domains::profile::models::UserProfile;

/// Profile data exposed over the API
#[derive(Debug, Clone, Serialize, Deserialize, juniper::GraphQLObject)]
pub struct ProfileData {
    pub id: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfile> for ProfileData {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id.to_string(),
            email: profile.email,
            phone_number: profile.phone_number,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}
