//! Shared utilities for the EUI mapping crates.
//!
//! - [`any_value`]: `AnyValue` conversions and numeric parsing
//! - [`numeric`]: rounding and missing-aware means
//! - [`encoding`]: text encodings used by the source and output tables
//! - [`frame`]: DataFrame construction and CSV serialisation

pub mod any_value;
pub mod encoding;
pub mod frame;
pub mod numeric;

// Re-export commonly used functions at crate root for convenience
pub use any_value::{any_to_f64, any_to_string, format_numeric, parse_f64};
pub use encoding::TextEncoding;
pub use frame::{float_column, frame_to_csv_bytes, optional_string_column, string_column};
pub use numeric::{mean_of, round_half_even, round_option};
