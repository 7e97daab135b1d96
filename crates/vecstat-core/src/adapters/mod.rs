//! Provider adapters.

pub mod statcan;

pub use statcan::{build_payload, parse_response, StatCanAdapter, VectorQuery};
