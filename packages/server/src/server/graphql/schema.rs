//! GraphQL schema definition.

use super::context::GraphQLContext;
use juniper::{EmptySubscription, FieldError, FieldResult, RootNode};
use tracing::error;

// Common types
use crate::common::PaginationArgs;

// Domain actions
use crate::domains::auth::actions as auth_actions;
use crate::domains::auth::actions::{CompleteVerificationResult, LinkOutcome, VerifyCodeResult};
use crate::domains::chambers::actions as chamber_actions;
use crate::domains::profile::actions as profile_actions;

// Domain data types (GraphQL types)
use crate::domains::chambers::data::{
    ChamberConnection, ChamberData, ChamberDetailData, PortfolioItemData, ReviewData,
    SubmitChamberInput, SubmitReviewInput, UpdateChamberInput,
};
use crate::domains::profile::data::ProfileData;

/// Session minted after a successful primary-credential check
#[derive(Debug, Clone, juniper::GraphQLObject)]
pub struct AuthPayload {
    pub identity_id: String,
    pub token: String,
    pub is_admin: bool,
}

/// Result of checking a phone verification code
#[derive(Debug, Clone, juniper::GraphQLObject)]
pub struct VerifyPhonePayload {
    /// True when the code matched (and was consumed)
    pub verified: bool,
    /// Identity already holding this phone, or null when the phone is free
    pub matched_identity_id: Option<String>,
    /// Failure reason when the code was invalid or expired
    pub error: Option<String>,
}

/// Result of linking a verified phone to the authenticated identity
#[derive(Debug, Clone, juniper::GraphQLObject)]
pub struct LinkPhonePayload {
    /// False when the phone already belongs to a different identity
    pub success: bool,
    pub message: Option<String>,
}

/// Result of the combined verify-and-link step of the signup flow
#[derive(Debug, Clone, juniper::GraphQLObject)]
pub struct CompleteVerificationPayload {
    /// True when both factors now belong to the authenticated identity
    pub complete: bool,
    /// Conflict message when the phone belongs to a different identity
    pub conflict: Option<String>,
}

// =============================================================================
// Helper functions
// =============================================================================

/// Convert anyhow::Error to juniper FieldError for thin resolvers
fn to_field_error(e: anyhow::Error) -> FieldError {
    FieldError::new(e.to_string(), juniper::Value::null())
}

pub struct Query;

#[juniper::graphql_object(context = GraphQLContext)]
impl Query {
    /// API version string
    fn api_version() -> &'static str {
        "1.0"
    }

    // =========================================================================
    // Profile Queries
    // =========================================================================

    /// The authenticated identity's profile (created lazily)
    async fn me(ctx: &GraphQLContext) -> FieldResult<ProfileData> {
        let actor = ctx.require_actor()?;

        let profile =
            profile_actions::get_own_profile(actor.identity_id, &actor.email, &ctx.deps)
                .await
                .map_err(to_field_error)?;

        Ok(ProfileData::from(profile))
    }

    // =========================================================================
    // Chamber Queries
    // =========================================================================

    /// A chamber with its reviews and portfolio
    async fn chamber(ctx: &GraphQLContext, id: String) -> FieldResult<Option<ChamberDetailData>> {
        chamber_actions::get_chamber_detail(id, ctx.actor().as_ref(), &ctx.deps)
            .await
            .map_err(to_field_error)
    }

    /// Search the public directory of approved chambers
    ///
    /// Arguments:
    /// - service: only chambers offering this service category
    /// - search: case-insensitive text search over name and description
    /// - featuredOnly: only featured chambers
    async fn chambers(
        ctx: &GraphQLContext,
        service: Option<String>,
        search: Option<String>,
        featured_only: Option<bool>,
    ) -> FieldResult<Vec<ChamberData>> {
        chamber_actions::search_chambers(service, search, featured_only, &ctx.deps)
            .await
            .map_err(to_field_error)
    }

    /// The authenticated identity's own chamber profile, in any status
    async fn my_chamber(ctx: &GraphQLContext) -> FieldResult<Option<ChamberData>> {
        let actor = ctx.require_actor()?;

        chamber_actions::get_own_chamber(&actor, &ctx.deps)
            .await
            .map_err(to_field_error)
    }

    /// Chambers awaiting review (admin only)
    async fn pending_chambers(ctx: &GraphQLContext) -> FieldResult<Vec<ChamberData>> {
        let actor = ctx.require_actor()?;

        chamber_actions::get_pending_chambers(&actor, &ctx.deps)
            .await
            .map_err(to_field_error)
    }

    /// Paginated chambers with cursor-based pagination (admin only)
    async fn chambers_paginated(
        ctx: &GraphQLContext,
        status: Option<String>,
        first: Option<i32>,
        after: Option<String>,
        last: Option<i32>,
        before: Option<String>,
    ) -> FieldResult<ChamberConnection> {
        let actor = ctx.require_actor()?;

        let pagination_args = PaginationArgs {
            first,
            after,
            last,
            before,
        };
        let validated = pagination_args
            .validate()
            .map_err(|e| FieldError::new(e, juniper::Value::null()))?;

        chamber_actions::get_chambers_paginated(status.as_deref(), &validated, &actor, &ctx.deps)
            .await
            .map_err(|e| {
                error!("Failed to get paginated chambers: {}", e);
                FieldError::new("Failed to get chambers", juniper::Value::null())
            })
    }
}

pub struct Mutation;

#[juniper::graphql_object(context = GraphQLContext)]
impl Mutation {
    // =========================================================================
    // Auth Mutations
    // =========================================================================

    /// Register a new identity with email + password
    ///
    /// Password confirmation and minimum length (6) are checked before any
    /// backend work.
    async fn sign_up_with_email(
        ctx: &GraphQLContext,
        email: String,
        password: String,
        password_confirmation: String,
    ) -> FieldResult<AuthPayload> {
        let session =
            auth_actions::sign_up_with_email(email, password, password_confirmation, &ctx.deps)
                .await
                .map_err(to_field_error)?;

        Ok(AuthPayload {
            identity_id: session.identity_id.to_string(),
            token: session.token,
            is_admin: session.is_admin,
        })
    }

    /// Sign in with email + password
    async fn sign_in_with_email(
        ctx: &GraphQLContext,
        email: String,
        password: String,
    ) -> FieldResult<AuthPayload> {
        let session = auth_actions::sign_in_with_email(email, password, &ctx.deps)
            .await
            .map_err(to_field_error)?;

        Ok(AuthPayload {
            identity_id: session.identity_id.to_string(),
            token: session.token,
            is_admin: session.is_admin,
        })
    }

    /// Request a verification code for a phone number
    ///
    /// The phone must be in E.164 format with country code (e.g. +51987654321).
    /// The code is delivered out-of-band by SMS.
    async fn request_phone_code(ctx: &GraphQLContext, phone_number: String) -> FieldResult<bool> {
        auth_actions::request_phone_code(phone_number, &ctx.deps)
            .await
            .map_err(to_field_error)?;
        Ok(true)
    }

    /// Check a verification code for a phone number
    ///
    /// On success, `matchedIdentityId` names the identity this phone is
    /// already linked to, or null when no account holds it yet. An invalid
    /// or expired code yields `verified: false` with an error message; the
    /// flow stays where it is.
    async fn verify_phone_code(
        ctx: &GraphQLContext,
        phone_number: String,
        code: String,
    ) -> FieldResult<VerifyPhonePayload> {
        let result = auth_actions::verify_phone_code(phone_number, code, &ctx.deps)
            .await
            .map_err(to_field_error)?;

        Ok(match result {
            VerifyCodeResult::Verified {
                matched_identity_id,
            } => VerifyPhonePayload {
                verified: true,
                matched_identity_id: matched_identity_id.map(|id| id.to_string()),
                error: None,
            },
            VerifyCodeResult::Failed { reason } => VerifyPhonePayload {
                verified: false,
                matched_identity_id: None,
                error: Some(reason),
            },
        })
    }

    /// Link a verified phone number to the authenticated identity
    ///
    /// Fails closed: success is false when the phone already belongs to a
    /// different identity. Re-linking the same pair is an idempotent no-op.
    async fn link_phone_to_identity(
        ctx: &GraphQLContext,
        phone_number: String,
    ) -> FieldResult<LinkPhonePayload> {
        let actor = ctx.require_actor()?;

        let outcome = auth_actions::link_phone_to_identity(
            actor.identity_id,
            &actor.email,
            &phone_number,
            &ctx.deps,
        )
        .await
        .map_err(to_field_error)?;

        Ok(LinkPhonePayload {
            success: outcome.success(),
            message: match outcome {
                LinkOutcome::Linked => None,
                LinkOutcome::AlreadyLinkedToCaller => {
                    Some("El teléfono ya estaba vinculado a tu cuenta".to_string())
                }
                LinkOutcome::AlreadyLinkedElsewhere => {
                    Some("Este número de teléfono ya está asociado a otra cuenta".to_string())
                }
            },
        })
    }

    /// Complete the signup/login flow: check the code and reconcile the match
    ///
    /// Code valid and phone free → linked, flow complete. Phone already on
    /// this identity → confirmation, complete. Phone on another identity →
    /// conflict, the flow stays in verification for a retry.
    async fn complete_phone_verification(
        ctx: &GraphQLContext,
        phone_number: String,
        code: String,
    ) -> FieldResult<CompleteVerificationPayload> {
        let actor = ctx.require_actor()?;

        let result = auth_actions::complete_phone_verification(
            actor.identity_id,
            &actor.email,
            phone_number,
            code,
            &ctx.deps,
        )
        .await
        .map_err(to_field_error)?;

        Ok(match result {
            CompleteVerificationResult::Complete => CompleteVerificationPayload {
                complete: true,
                conflict: None,
            },
            CompleteVerificationResult::Conflict { message } => CompleteVerificationPayload {
                complete: false,
                conflict: Some(message),
            },
        })
    }

    /// Start a password reset; the code is delivered to the linked phone
    ///
    /// Always returns true so the endpoint can't be used to probe which
    /// emails are registered.
    async fn request_password_reset(ctx: &GraphQLContext, email: String) -> FieldResult<bool> {
        auth_actions::request_password_reset(email, &ctx.deps)
            .await
            .map_err(to_field_error)?;
        Ok(true)
    }

    /// Complete a password reset with the delivered code
    async fn reset_password(
        ctx: &GraphQLContext,
        email: String,
        code: String,
        new_password: String,
    ) -> FieldResult<bool> {
        auth_actions::reset_password(email, code, new_password, &ctx.deps)
            .await
            .map_err(to_field_error)?;
        Ok(true)
    }

    /// Logout (JWT - client-side only, no server state to clear)
    fn logout() -> FieldResult<bool> {
        // With JWT, logout is client-side only (delete token from client storage)
        Ok(true)
    }

    // =========================================================================
    // Chamber Mutations
    // =========================================================================

    /// Submit a chamber profile for the authenticated identity
    async fn submit_chamber_profile(
        ctx: &GraphQLContext,
        input: SubmitChamberInput,
    ) -> FieldResult<ChamberData> {
        let actor = ctx.require_actor()?;

        let chamber = chamber_actions::submit_chamber(input, &actor, &ctx.deps)
            .await
            .map_err(to_field_error)?;

        Ok(ChamberData::from(chamber))
    }

    /// Update the authenticated identity's chamber profile
    async fn update_chamber_profile(
        ctx: &GraphQLContext,
        input: UpdateChamberInput,
    ) -> FieldResult<ChamberData> {
        let actor = ctx.require_actor()?;

        let chamber = chamber_actions::update_own_chamber(input, &actor, &ctx.deps)
            .await
            .map_err(to_field_error)?;

        Ok(ChamberData::from(chamber))
    }

    /// Approve a pending chamber (admin only)
    async fn approve_chamber(ctx: &GraphQLContext, chamber_id: String) -> FieldResult<ChamberData> {
        let actor = ctx.require_actor()?;

        let chamber = chamber_actions::approve_chamber(chamber_id, &actor, &ctx.deps)
            .await
            .map_err(to_field_error)?;

        Ok(ChamberData::from(chamber))
    }

    /// Reject a pending chamber with a reason (admin only)
    async fn reject_chamber(
        ctx: &GraphQLContext,
        chamber_id: String,
        reason: String,
    ) -> FieldResult<ChamberData> {
        let actor = ctx.require_actor()?;

        let chamber = chamber_actions::reject_chamber(chamber_id, reason, &actor, &ctx.deps)
            .await
            .map_err(to_field_error)?;

        Ok(ChamberData::from(chamber))
    }

    /// Suspend an approved chamber (admin only)
    async fn suspend_chamber(
        ctx: &GraphQLContext,
        chamber_id: String,
        reason: String,
    ) -> FieldResult<ChamberData> {
        let actor = ctx.require_actor()?;

        let chamber = chamber_actions::suspend_chamber(chamber_id, reason, &actor, &ctx.deps)
            .await
            .map_err(to_field_error)?;

        Ok(ChamberData::from(chamber))
    }

    /// Toggle the featured flag on a chamber (admin only)
    async fn set_chamber_featured(
        ctx: &GraphQLContext,
        chamber_id: String,
        featured: bool,
    ) -> FieldResult<ChamberData> {
        let actor = ctx.require_actor()?;

        let chamber =
            chamber_actions::set_chamber_featured(chamber_id, featured, &actor, &ctx.deps)
                .await
                .map_err(to_field_error)?;

        Ok(ChamberData::from(chamber))
    }

    /// Add a portfolio item to the authenticated identity's chamber
    async fn add_portfolio_item(
        ctx: &GraphQLContext,
        title: String,
        description: Option<String>,
        image_url: Option<String>,
    ) -> FieldResult<PortfolioItemData> {
        let actor = ctx.require_actor()?;

        let item =
            chamber_actions::add_portfolio_item(title, description, image_url, &actor, &ctx.deps)
                .await
                .map_err(to_field_error)?;

        Ok(PortfolioItemData::from(item))
    }

    /// Remove a portfolio item from the authenticated identity's chamber
    async fn remove_portfolio_item(ctx: &GraphQLContext, item_id: String) -> FieldResult<bool> {
        let actor = ctx.require_actor()?;

        chamber_actions::remove_portfolio_item(item_id, &actor, &ctx.deps)
            .await
            .map_err(to_field_error)
    }

    /// Submit a public review for an approved chamber
    async fn submit_review(
        ctx: &GraphQLContext,
        input: SubmitReviewInput,
    ) -> FieldResult<ReviewData> {
        let review = chamber_actions::submit_review(input, &ctx.deps)
            .await
            .map_err(to_field_error)?;

        Ok(ReviewData::from(review))
    }
}

pub type Schema = RootNode<'static, Query, Mutation, EmptySubscription<GraphQLContext>>;

pub fn create_schema() -> Schema {
    Schema::new(Query, Mutation, EmptySubscription::new())
}
