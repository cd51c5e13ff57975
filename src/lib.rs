pub mod converter;
pub mod error;
pub mod rate_lookup;
pub mod settings;
pub mod val_curs;

pub use converter::{ConversionReport, Converter, DEFAULT_NOTIONAL, ReportEntry};
pub use error::ConversionError;
pub use rate_lookup::RateLookup;
pub use val_curs::{RateTable, ValCurs};
