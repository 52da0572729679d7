//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use server_core::common::{ChamberId, IdentityId};
use server_core::domains::auth::models::{hash_identifier, hash_password, Identity};
use server_core::domains::chambers::models::{Chamber, CreateChamber};
use server_core::domains::profile::models::UserProfile;
use sqlx::PgPool;

/// Create a test identity with the given email and password.
pub async fn create_test_identity(pool: &PgPool, email: &str, password: &str) -> Result<Identity> {
    let password_hash = hash_password(password)?;
    Identity::create(email, &password_hash, pool).await
}

/// Create a test identity with a phone already linked to its profile.
pub async fn create_identity_with_phone(
    pool: &PgPool,
    email: &str,
    phone: &str,
) -> Result<Identity> {
    let identity = create_test_identity(pool, email, "password123").await?;
    UserProfile::get_or_create(identity.id, email, pool).await?;
    let linked =
        UserProfile::set_phone(identity.id, phone, &hash_identifier(phone), pool).await?;
    assert!(linked, "fixture phone should link cleanly");
    Ok(identity)
}

/// Create a chamber profile in pending_review status.
pub async fn create_test_chamber_pending(
    pool: &PgPool,
    identity_id: Option<IdentityId>,
    first_name: &str,
    services: &[&str],
) -> Result<ChamberId> {
    let chamber = Chamber::create(
        CreateChamber {
            identity_id,
            first_name: first_name.to_string(),
            last_name: "Quispe".to_string(),
            dni: None,
            age: Some(34),
            phone_number: Some("+51987000111".to_string()),
            description: Some("Servicio a domicilio en Lima".to_string()),
            profile_photo_url: None,
            services: services.iter().map(|s| s.to_string()).collect(),
            other_service: None,
        },
        pool,
    )
    .await?;

    Ok(chamber.id)
}

/// Create an approved chamber (goes through the approval path).
pub async fn create_test_chamber_approved(
    pool: &PgPool,
    identity_id: Option<IdentityId>,
    first_name: &str,
    services: &[&str],
) -> Result<ChamberId> {
    let id = create_test_chamber_pending(pool, identity_id, first_name, services).await?;
    let admin = create_test_identity(pool, &format!("approver-{}@chambier.com", id), "password123")
        .await?;
    Chamber::approve(id, admin.id, pool).await?;
    Ok(id)
}
