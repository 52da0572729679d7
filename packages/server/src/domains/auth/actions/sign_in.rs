//! Email sign-in action

use anyhow::{bail, Result};
use tracing::info;

use crate::domains::auth::models::{is_admin_email, verify_password, Identity};
use crate::domains::auth::types::AuthSession;
use crate::kernel::ServerDeps;

/// Authenticate an identity with email + password.
///
/// A missing account and a wrong password produce the same error, so the
/// endpoint can't be used to enumerate registered emails.
pub async fn sign_in_with_email(
    email: String,
    password: String,
    deps: &ServerDeps,
) -> Result<AuthSession> {
    let Some(identity) = Identity::find_by_email(email.trim(), &deps.db_pool).await? else {
        bail!("Correo electrónico o contraseña incorrectos");
    };

    if !verify_password(&password, &identity.password_hash)? {
        bail!("Correo electrónico o contraseña incorrectos");
    }

    let is_admin = is_admin_email(&identity.email, &deps.admin_emails);
    let token = deps
        .jwt_service
        .create_token(identity.id.into_uuid(), identity.email.clone(), is_admin)?;

    info!(identity_id = %identity.id, "Identity signed in");

    Ok(AuthSession {
        identity_id: identity.id,
        token,
        is_admin,
    })
}
