pub mod inventory;
pub mod series;
pub mod time_key;
