//! Chamber query actions

use anyhow::{Context, Result};
use tracing::info;

use crate::common::{build_page_info, Actor, ChamberId, Cursor, ValidatedPaginationArgs};
use crate::domains::chambers::data::{
    ChamberConnection, ChamberData, ChamberDetailData, ChamberEdge, PortfolioItemData, ReviewData,
};
use crate::domains::chambers::models::{Chamber, ChamberFilters, PortfolioItem, Review};
use crate::kernel::ServerDeps;

/// Get a single chamber with its reviews and portfolio.
///
/// Only approved chambers are visible publicly; owners and admins can see
/// their own profile in any status.
pub async fn get_chamber_detail(
    chamber_id: String,
    actor: Option<&Actor>,
    deps: &ServerDeps,
) -> Result<Option<ChamberDetailData>> {
    let id = ChamberId::parse(&chamber_id).context("Invalid chamber ID")?;

    let Some(chamber) = Chamber::find_by_id_optional(id, &deps.db_pool).await? else {
        return Ok(None);
    };

    if chamber.status != "approved" {
        let is_owner = matches!(
            (actor, chamber.identity_id),
            (Some(actor), Some(owner)) if *actor.identity_id.as_uuid() == owner
        );
        let is_admin = actor.is_some_and(|a| a.is_admin);
        if !is_owner && !is_admin {
            return Ok(None);
        }
    }

    let reviews = Review::find_by_chamber(id, &deps.db_pool).await?;
    let portfolio = PortfolioItem::find_by_chamber(id, &deps.db_pool).await?;

    Ok(Some(ChamberDetailData {
        chamber: ChamberData::from(chamber),
        reviews: reviews.into_iter().map(ReviewData::from).collect(),
        portfolio: portfolio.into_iter().map(PortfolioItemData::from).collect(),
    }))
}

/// Search the public directory of approved chambers.
pub async fn search_chambers(
    service: Option<String>,
    search: Option<String>,
    featured_only: Option<bool>,
    deps: &ServerDeps,
) -> Result<Vec<ChamberData>> {
    let filters = ChamberFilters {
        service,
        search,
        featured_only: featured_only.unwrap_or(false),
    };

    let chambers = Chamber::find_approved_with_filters(&filters, &deps.db_pool).await?;
    Ok(chambers.into_iter().map(ChamberData::from).collect())
}

/// The actor's own chamber profile, in any status.
pub async fn get_own_chamber(actor: &Actor, deps: &ServerDeps) -> Result<Option<ChamberData>> {
    let chamber = Chamber::find_by_identity_id(actor.identity_id, &deps.db_pool).await?;
    Ok(chamber.map(ChamberData::from))
}

/// Pending chambers awaiting review (admin only).
pub async fn get_pending_chambers(actor: &Actor, deps: &ServerDeps) -> Result<Vec<ChamberData>> {
    actor.require_admin()?;

    info!("Getting pending chambers");
    let chambers = Chamber::find_pending(&deps.db_pool).await?;
    Ok(chambers.into_iter().map(ChamberData::from).collect())
}

/// Get paginated chambers with cursor-based pagination (Relay spec, admin only).
pub async fn get_chambers_paginated(
    status: Option<&str>,
    args: &ValidatedPaginationArgs,
    actor: &Actor,
    deps: &ServerDeps,
) -> Result<ChamberConnection> {
    actor.require_admin()?;

    let pool = &deps.db_pool;

    let (chambers, has_more) = Chamber::find_paginated(status, args, pool).await?;
    let total_count = Chamber::count_with_filters(status, pool).await? as i32;

    let edges: Vec<ChamberEdge> = chambers
        .into_iter()
        .map(|chamber| {
            let cursor = Cursor::encode_uuid(chamber.id.into_uuid());
            ChamberEdge {
                node: ChamberData::from(chamber),
                cursor,
            }
        })
        .collect();

    let page_info = build_page_info(
        has_more,
        args,
        edges.first().map(|e| e.cursor.clone()),
        edges.last().map(|e| e.cursor.clone()),
    );

    Ok(ChamberConnection {
        edges,
        page_info,
        total_count,
    })
}
