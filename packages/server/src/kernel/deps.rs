//! Server dependencies for domain actions (using traits for testability)
//!
//! This module provides the central dependency container used by all domain
//! actions. External services sit behind trait abstractions so tests can
//! substitute mocks.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use twilio::TwilioService;

use crate::domains::auth::JwtService;
use crate::kernel::BaseSmsService;

// =============================================================================
// TwilioService Adapter (implements BaseSmsService trait)
// =============================================================================

/// Wrapper around TwilioService that implements the BaseSmsService trait
pub struct TwilioAdapter(pub Arc<TwilioService>);

impl TwilioAdapter {
    pub fn new(service: Arc<TwilioService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseSmsService for TwilioAdapter {
    async fn send_code(&self, recipient: &str, code: &str) -> Result<()> {
        let body = format!("Tu código de verificación de Chambier es: {}", code);
        self.0
            .send_sms(recipient, &body)
            .await
            .map(|_| ())
            .map_err(|e| anyhow::anyhow!("{}", e))
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Server dependencies accessible to domain actions
#[derive(Clone)]
pub struct ServerDeps {
    pub db_pool: PgPool,
    /// SMS delivery for verification codes
    pub sms: Arc<dyn BaseSmsService>,
    /// JWT service for session token creation
    pub jwt_service: Arc<JwtService>,
    /// Debug-build bypass for the test phone number (never enable in production)
    pub test_identifier_enabled: bool,
    /// Emails granted admin privileges on sign-in
    pub admin_emails: Vec<String>,
}

impl ServerDeps {
    /// Create new ServerDeps with the given dependencies
    pub fn new(
        db_pool: PgPool,
        sms: Arc<dyn BaseSmsService>,
        jwt_service: Arc<JwtService>,
        test_identifier_enabled: bool,
        admin_emails: Vec<String>,
    ) -> Self {
        Self {
            db_pool,
            sms,
            jwt_service,
            test_identifier_enabled,
            admin_emails,
        }
    }
}
