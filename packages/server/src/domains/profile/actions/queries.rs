//! Profile query actions

use anyhow::Result;
use tracing::info;

use crate::common::IdentityId;
use crate::domains::profile::models::UserProfile;
use crate::kernel::ServerDeps;

/// Get the profile for an authenticated identity, creating the row lazily.
pub async fn get_own_profile(
    identity_id: IdentityId,
    email: &str,
    deps: &ServerDeps,
) -> Result<UserProfile> {
    info!(identity_id = %identity_id, "Loading own profile");
    UserProfile::get_or_create(identity_id, email, &deps.db_pool).await
}
