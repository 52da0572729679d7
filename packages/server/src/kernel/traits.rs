//! Trait abstractions for external services.
//!
//! All outbound integrations are consumed through these traits so that
//! actions can be exercised in tests without network access.

use anyhow::Result;
use async_trait::async_trait;

/// Delivery of one-time verification codes over SMS.
///
/// Code generation and validation live in the auth domain; this trait only
/// covers the out-of-band delivery leg.
#[async_trait]
pub trait BaseSmsService: Send + Sync {
    /// Deliver a verification code to a phone number (E.164 format).
    async fn send_code(&self, recipient: &str, code: &str) -> Result<()>;
}
