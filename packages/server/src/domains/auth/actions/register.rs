//! Registration/login orchestration
//!
//! Drives the second half of the signup flow with explicit awaited calls:
//! check the code, decide what the match means, link or reject, finalize.
//! The [`SignupFlow`] machine enforces the transition rules; a conflict
//! leaves the flow in `Verification` so the caller can retry with another
//! number.

use anyhow::{bail, Result};
use tracing::info;

use crate::common::IdentityId;
use crate::domains::auth::actions::{link_phone_to_identity, verify_phone_code, VerifyCodeResult};
use crate::domains::auth::machines::SignupFlow;
use crate::kernel::ServerDeps;

/// Outcome of completing phone verification for an authenticated identity.
#[derive(Debug)]
pub enum CompleteVerificationResult {
    /// Both factors belong to this identity; the flow is complete.
    Complete,
    /// The phone belongs to a different identity; retry with another number.
    Conflict { message: String },
}

/// Verify a phone code on behalf of `identity_id` and reconcile the result:
///
/// - code valid, phone unlinked → link it and complete
/// - code valid, phone linked to this identity → confirmation, complete
/// - code valid, phone linked to another identity → conflict, stay put
/// - code invalid/expired → error, no state advances
pub async fn complete_phone_verification(
    identity_id: IdentityId,
    email: &str,
    phone_number: String,
    code: String,
    deps: &ServerDeps,
) -> Result<CompleteVerificationResult> {
    let mut flow = SignupFlow::new();
    flow.credentials_accepted(identity_id)?;

    let verified = match verify_phone_code(phone_number.clone(), code, deps).await? {
        VerifyCodeResult::Verified {
            matched_identity_id,
        } => matched_identity_id,
        VerifyCodeResult::Failed { reason } => bail!(reason),
    };

    match verified {
        // Phone already belongs to this identity: the login variant, where
        // both factors confirm one account.
        Some(matched) if matched == identity_id => {
            flow.phone_linked(true)?;
            info!(identity_id = %identity_id, "Phone factor confirmed for existing link");
            Ok(CompleteVerificationResult::Complete)
        }
        // Phone belongs to someone else: surface the conflict, don't advance.
        Some(_) => {
            let err = flow
                .phone_linked(false)
                .expect_err("conflict must not complete the flow");
            Ok(CompleteVerificationResult::Conflict {
                message: err.to_string(),
            })
        }
        // Phone is free: link it now. The linking operation can still lose a
        // race, in which case it reports the conflict itself.
        None => {
            let outcome = link_phone_to_identity(identity_id, email, &phone_number, deps).await?;
            if outcome.success() {
                flow.phone_linked(true)?;
                info!(identity_id = %identity_id, "Registration flow complete");
                Ok(CompleteVerificationResult::Complete)
            } else {
                let err = flow
                    .phone_linked(false)
                    .expect_err("conflict must not complete the flow");
                Ok(CompleteVerificationResult::Conflict {
                    message: err.to_string(),
                })
            }
        }
    }
}
