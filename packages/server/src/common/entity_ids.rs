//! Typed ID definitions for all domain entities.
//!
//! This module defines type aliases for each domain entity, providing
//! compile-time type safety for ID usage throughout the application.

// Re-export the core Id type and version markers
pub use super::id::{Id, V4, V7};

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Identity entities (authenticated accounts).
pub struct Identity;

/// Marker type for Chamber entities (service providers).
pub struct Chamber;

/// Marker type for PortfolioItem entities (chamber work samples).
pub struct PortfolioItem;

/// Marker type for Review entities (client reviews of chambers).
pub struct Review;

/// Marker type for VerificationCode entities (one-time phone codes).
pub struct VerificationCode;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for Identity entities.
pub type IdentityId = Id<Identity>;

/// Typed ID for Chamber entities.
pub type ChamberId = Id<Chamber>;

/// Typed ID for PortfolioItem entities.
pub type PortfolioItemId = Id<PortfolioItem>;

/// Typed ID for Review entities.
pub type ReviewId = Id<Review>;

/// Typed ID for VerificationCode entities.
pub type CodeId = Id<VerificationCode>;
