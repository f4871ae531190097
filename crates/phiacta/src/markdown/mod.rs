//! Markdown helpers for scientific text with inline (`$...$`) and display
//! (`$$...$$`) math.

pub mod compact;
pub mod math;
pub mod truncate;

pub use compact::{compact_preview, flatten_blocks};
pub use math::{MathState, Segment, is_balanced, scan, segments};
pub use truncate::{ELLIPSIS, truncate_preserving_math};
