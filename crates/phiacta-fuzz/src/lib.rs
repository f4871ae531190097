//! Fuzzing library for the phiacta client.
//!
//! Fuzz targets cover math-safe truncation and JSON deserialization of the
//! Phiacta API models.
//!
//! # Usage
//!
//! ```bash
//! cd crates/phiacta-fuzz
//! cargo +nightly fuzz run fuzz_truncate -- -max_total_time=60
//! ```

pub use phiacta::{markdown, models};
