//! Auth domain - two-factor account verification
//!
//! Architecture:
//!   GraphQL mutation → action → model (all SQL lives in models/)
//!
//! Responsibilities:
//! - Email + password primary credential (sign-up / sign-in)
//! - One-time phone verification codes (issue, deliver via SMS, check)
//! - Linking a verified phone to exactly one identity
//! - Session/JWT token management
//! - Identifier hashing for privacy

pub mod actions;
pub mod jwt;
pub mod machines;
pub mod models;
pub mod types;

pub use jwt::{Claims, JwtService};
pub use machines::{SignupFlow, VerificationStep};
