pub mod chamber;
pub mod portfolio_item;
pub mod review;

pub use chamber::{Chamber, ChamberFilters, ChamberStatus, CreateChamber, UpdateChamber};
pub use portfolio_item::PortfolioItem;
pub use review::Review;
