pub mod backdated;
pub mod charting;
pub mod config;
pub mod validation;
