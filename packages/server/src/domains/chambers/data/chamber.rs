use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::PageInfo;
use crate::domains::chambers::models::{Chamber, PortfolioItem, Review};

/// Chamber data exposed over the API
#[derive(Debug, Clone, Serialize, Deserialize, juniper::GraphQLObject)]
pub struct ChamberData {
    pub id: String,

    // Owner
    pub identity_id: Option<String>,

    // Profile
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i32>,
    pub phone_number: Option<String>,
    pub description: Option<String>,
    pub profile_photo_url: Option<String>,

    // Services offered
    pub services: Vec<String>,
    pub other_service: Option<String>,

    // Directory placement
    pub featured: bool,
    pub rating: f64,
    pub review_count: i32,

    // Approval workflow
    pub status: String,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,

    // Timestamps
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Chamber> for ChamberData {
    fn from(chamber: Chamber) -> Self {
        Self {
            id: chamber.id.to_string(),
            identity_id: chamber.identity_id.map(|id| id.to_string()),
            first_name: chamber.first_name,
            last_name: chamber.last_name,
            age: chamber.age,
            phone_number: chamber.phone_number,
            description: chamber.description,
            profile_photo_url: chamber.profile_photo_url,
            services: chamber.services,
            other_service: chamber.other_service,
            featured: chamber.featured,
            rating: chamber.rating,
            review_count: chamber.review_count,
            status: chamber.status,
            reviewed_at: chamber.reviewed_at,
            rejection_reason: chamber.rejection_reason,
            created_at: chamber.created_at,
            updated_at: chamber.updated_at,
        }
    }
}

/// Review data exposed over the API
#[derive(Debug, Clone, Serialize, Deserialize, juniper::GraphQLObject)]
pub struct ReviewData {
    pub id: String,
    pub chamber_id: String,
    pub reviewer_name: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewData {
    fn from(review: Review) -> Self {
        Self {
            id: review.id.to_string(),
            chamber_id: review.chamber_id.to_string(),
            reviewer_name: review.reviewer_name,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}

/// Portfolio item data exposed over the API
#[derive(Debug, Clone, Serialize, Deserialize, juniper::GraphQLObject)]
pub struct PortfolioItemData {
    pub id: String,
    pub chamber_id: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<PortfolioItem> for PortfolioItemData {
    fn from(item: PortfolioItem) -> Self {
        Self {
            id: item.id.to_string(),
            chamber_id: item.chamber_id.to_string(),
            title: item.title,
            description: item.description,
            image_url: item.image_url,
            created_at: item.created_at,
        }
    }
}

/// A chamber with its reviews and portfolio (detail view)
#[derive(Debug, Clone, juniper::GraphQLObject)]
pub struct ChamberDetailData {
    pub chamber: ChamberData,
    pub reviews: Vec<ReviewData>,
    pub portfolio: Vec<PortfolioItemData>,
}

/// Input for submitting a new chamber profile
#[derive(Debug, Clone, juniper::GraphQLInputObject)]
pub struct SubmitChamberInput {
    pub first_name: String,
    pub last_name: String,
    pub dni: Option<String>,
    pub age: Option<i32>,
    pub phone_number: Option<String>,
    pub description: Option<String>,
    pub profile_photo_url: Option<String>,
    pub services: Vec<String>,
    pub other_service: Option<String>,
}

/// Input for updating a chamber profile
#[derive(Debug, Clone, juniper::GraphQLInputObject)]
pub struct UpdateChamberInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dni: Option<String>,
    pub age: Option<i32>,
    pub phone_number: Option<String>,
    pub description: Option<String>,
    pub profile_photo_url: Option<String>,
    pub services: Option<Vec<String>>,
    pub other_service: Option<String>,
}

/// Input for submitting a review
#[derive(Debug, Clone, juniper::GraphQLInputObject)]
pub struct SubmitReviewInput {
    pub chamber_id: String,
    pub reviewer_name: String,
    pub rating: i32,
    pub comment: Option<String>,
}

// ============================================================================
// Relay Pagination Types
// ============================================================================

/// Edge containing a chamber and its cursor (Relay spec)
#[derive(Debug, Clone, juniper::GraphQLObject)]
pub struct ChamberEdge {
    pub node: ChamberData,
    pub cursor: String,
}

/// Connection type for paginated chambers (Relay spec)
#[derive(Debug, Clone, juniper::GraphQLObject)]
pub struct ChamberConnection {
    pub edges: Vec<ChamberEdge>,
    pub page_info: PageInfo,
    pub total_count: i32,
}
