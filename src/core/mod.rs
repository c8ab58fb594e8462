//! Template text primitives
//!
//! - Scanner: memchr-based placeholder span detection
//! - Cleaner: whitespace compaction of the outer template text

pub mod cleaner;
pub mod scanner;
