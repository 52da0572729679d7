pub mod chamber;

pub use chamber::{
    ChamberConnection, ChamberData, ChamberDetailData, ChamberEdge, PortfolioItemData,
    ReviewData, SubmitChamberInput, SubmitReviewInput, UpdateChamberInput,
};
