pub mod price_point;
pub mod trade_date;
