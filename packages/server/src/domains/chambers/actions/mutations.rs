//! Chamber mutation actions
//!
//! Authorization checks happen here, not in the GraphQL resolver layer.

use anyhow::{bail, Context, Result};
use tracing::info;

use crate::common::{Actor, ChamberId, PortfolioItemId};
use crate::domains::chambers::models::{
    Chamber, CreateChamber, PortfolioItem, Review, UpdateChamber,
};
use crate::domains::chambers::data::{SubmitChamberInput, SubmitReviewInput, UpdateChamberInput};
use crate::kernel::ServerDeps;

/// Submit a chamber profile for the authenticated identity.
///
/// One chamber per identity; the profile enters the admin approval queue.
pub async fn submit_chamber(
    input: SubmitChamberInput,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<Chamber> {
    if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
        bail!("Nombre y apellido son obligatorios");
    }
    if input.services.is_empty() && input.other_service.is_none() {
        bail!("Selecciona al menos un servicio");
    }

    if Chamber::find_by_identity_id(actor.identity_id, &deps.db_pool)
        .await?
        .is_some()
    {
        bail!("Ya tienes un perfil de chamber registrado");
    }

    let chamber = Chamber::create(
        CreateChamber {
            identity_id: Some(actor.identity_id),
            first_name: input.first_name,
            last_name: input.last_name,
            dni: input.dni,
            age: input.age,
            phone_number: input.phone_number,
            description: input.description,
            profile_photo_url: input.profile_photo_url,
            services: input.services,
            other_service: input.other_service,
        },
        &deps.db_pool,
    )
    .await?;

    info!(chamber_id = %chamber.id, "Chamber profile submitted");
    Ok(chamber)
}

/// Update the actor's own chamber profile.
pub async fn update_own_chamber(
    input: UpdateChamberInput,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<Chamber> {
    let Some(chamber) = Chamber::find_by_identity_id(actor.identity_id, &deps.db_pool).await?
    else {
        bail!("No tienes un perfil de chamber registrado");
    };

    let chamber = Chamber::update(
        chamber.id,
        UpdateChamber {
            first_name: input.first_name,
            last_name: input.last_name,
            dni: input.dni,
            age: input.age,
            phone_number: input.phone_number,
            description: input.description,
            profile_photo_url: input.profile_photo_url,
            services: input.services,
            other_service: input.other_service,
        },
        &deps.db_pool,
    )
    .await?;

    info!(chamber_id = %chamber.id, "Chamber profile updated");
    Ok(chamber)
}

/// Approve a pending chamber (admin only).
pub async fn approve_chamber(
    chamber_id: String,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<Chamber> {
    actor.require_admin()?;
    let id = ChamberId::parse(&chamber_id).context("Invalid chamber ID")?;

    let chamber = Chamber::approve(id, actor.identity_id, &deps.db_pool).await?;
    info!(chamber_id = %chamber.id, "Chamber approved");
    Ok(chamber)
}

/// Reject a pending chamber with a reason (admin only).
pub async fn reject_chamber(
    chamber_id: String,
    reason: String,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<Chamber> {
    actor.require_admin()?;
    let id = ChamberId::parse(&chamber_id).context("Invalid chamber ID")?;

    let chamber = Chamber::reject(id, actor.identity_id, &reason, &deps.db_pool).await?;
    info!(chamber_id = %chamber.id, "Chamber rejected");
    Ok(chamber)
}

/// Suspend an approved chamber (admin only).
pub async fn suspend_chamber(
    chamber_id: String,
    reason: String,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<Chamber> {
    actor.require_admin()?;
    let id = ChamberId::parse(&chamber_id).context("Invalid chamber ID")?;

    let chamber = Chamber::suspend(id, actor.identity_id, &reason, &deps.db_pool).await?;
    info!(chamber_id = %chamber.id, "Chamber suspended");
    Ok(chamber)
}

/// Toggle the featured flag on a chamber (admin only).
pub async fn set_chamber_featured(
    chamber_id: String,
    featured: bool,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<Chamber> {
    actor.require_admin()?;
    let id = ChamberId::parse(&chamber_id).context("Invalid chamber ID")?;

    Chamber::set_featured(id, featured, &deps.db_pool).await
}

/// Add a portfolio item to the actor's own chamber.
pub async fn add_portfolio_item(
    title: String,
    description: Option<String>,
    image_url: Option<String>,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<PortfolioItem> {
    if title.trim().is_empty() {
        bail!("El título es obligatorio");
    }

    let Some(chamber) = Chamber::find_by_identity_id(actor.identity_id, &deps.db_pool).await?
    else {
        bail!("No tienes un perfil de chamber registrado");
    };

    PortfolioItem::create(
        chamber.id,
        &title,
        description.as_deref(),
        image_url.as_deref(),
        &deps.db_pool,
    )
    .await
}

/// Remove a portfolio item from the actor's own chamber.
///
/// Admins may remove items from any chamber.
pub async fn remove_portfolio_item(
    item_id: String,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<bool> {
    let id = PortfolioItemId::parse(&item_id).context("Invalid portfolio item ID")?;

    let Some(item) = PortfolioItem::find_by_id_optional(id, &deps.db_pool).await? else {
        return Ok(false);
    };

    if !actor.is_admin {
        let owned = Chamber::find_by_identity_id(actor.identity_id, &deps.db_pool).await?;
        match owned {
            Some(chamber) if chamber.id == item.chamber_id => {}
            _ => bail!("Solo puedes eliminar elementos de tu propio portafolio"),
        }
    }

    PortfolioItem::delete(id, &deps.db_pool).await?;
    Ok(true)
}

/// Submit a public review for an approved chamber.
pub async fn submit_review(input: SubmitReviewInput, deps: &ServerDeps) -> Result<Review> {
    if !(1..=5).contains(&input.rating) {
        bail!("La calificación debe estar entre 1 y 5");
    }
    if input.reviewer_name.trim().is_empty() {
        bail!("El nombre es obligatorio");
    }

    let id = ChamberId::parse(&input.chamber_id).context("Invalid chamber ID")?;
    let Some(chamber) = Chamber::find_by_id_optional(id, &deps.db_pool).await? else {
        bail!("Chamber no encontrado");
    };
    if chamber.status != "approved" {
        bail!("Solo se pueden reseñar chambers aprobados");
    }

    let review = Review::create(
        id,
        input.reviewer_name.trim(),
        input.rating,
        input.comment.as_deref(),
        &deps.db_pool,
    )
    .await?;

    info!(chamber_id = %id, rating = input.rating, "Review submitted");
    Ok(review)
}
