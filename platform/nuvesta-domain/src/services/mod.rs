pub mod as_of;
pub mod chart;
pub mod purchase;
pub mod series_quality;
