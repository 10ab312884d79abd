pub mod file;
pub mod http;

pub use self::file::CsvPriceSeriesProvider;
pub use self::http::HttpPriceSeriesProvider;
