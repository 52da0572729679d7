//! Account linking action

use anyhow::{bail, Result};
use tracing::{info, warn};

use crate::common::IdentityId;
use crate::domains::auth::machines::validate_phone;
use crate::domains::auth::models::hash_identifier;
use crate::domains::profile::models::UserProfile;
use crate::kernel::ServerDeps;

/// Outcome of linking a verified phone to an identity.
///
/// Fails closed: a phone held by a different identity yields
/// `AlreadyLinkedElsewhere` (success = false), never an overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Phone was free and is now linked to the caller.
    Linked,
    /// Phone was already linked to this same identity; no-op success.
    AlreadyLinkedToCaller,
    /// Phone belongs to a different identity; nothing changed.
    AlreadyLinkedElsewhere,
}

impl LinkOutcome {
    pub fn success(&self) -> bool {
        !matches!(self, LinkOutcome::AlreadyLinkedElsewhere)
    }
}

/// Associate a verified phone number with an identity.
///
/// Idempotent for the same (identity, phone) pair. The unique index on
/// `user_profiles.phone_hash` backstops concurrent link attempts: the
/// losing transaction maps to `AlreadyLinkedElsewhere` rather than an
/// internal error.
pub async fn link_phone_to_identity(
    identity_id: IdentityId,
    email: &str,
    phone_number: &str,
    deps: &ServerDeps,
) -> Result<LinkOutcome> {
    validate_phone(phone_number)?;
    let phone_hash = hash_identifier(phone_number);

    if let Some(holder) = UserProfile::find_by_phone_hash(&phone_hash, &deps.db_pool).await? {
        return if holder.id == identity_id {
            Ok(LinkOutcome::AlreadyLinkedToCaller)
        } else {
            warn!(
                identity_id = %identity_id,
                "Phone already linked to a different identity"
            );
            Ok(LinkOutcome::AlreadyLinkedElsewhere)
        };
    }

    let profile = UserProfile::get_or_create(identity_id, email, &deps.db_pool).await?;
    if profile.phone_number.is_some() {
        // A different phone is already linked to this identity; phones are set once.
        bail!("Esta cuenta ya tiene un número de teléfono vinculado");
    }

    match UserProfile::set_phone(identity_id, phone_number, &phone_hash, &deps.db_pool).await {
        Ok(true) => {
            info!(identity_id = %identity_id, "Phone linked to identity");
            Ok(LinkOutcome::Linked)
        }
        Ok(false) => bail!("Esta cuenta ya tiene un número de teléfono vinculado"),
        Err(e) if is_unique_violation(&e) => Ok(LinkOutcome::AlreadyLinkedElsewhere),
        Err(e) => Err(e),
    }
}

/// True when the error is a Postgres unique-constraint violation (23505).
fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| match e {
            sqlx::Error::Database(db) => db.code().map(|c| c == "23505"),
            _ => None,
        })
        .unwrap_or(false)
}
