pub mod baseline;
pub mod inference;
pub mod optimization;
pub mod replenishment;
pub mod traits;
