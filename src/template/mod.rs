//! Placeholder templates
//!
//! - Binder: compiled template and the bind step
//! - Cache: LRU of compiled templates keyed by text
//! - Parallel: Rayon helpers for binding in bulk (feature `parallel`)

pub mod binder;
pub mod cache;
#[cfg(feature = "parallel")]
pub mod parallel;

pub use binder::{Binder, CompileOptions, Placeholder};
pub use cache::{compile_cached, TemplateCache, DEFAULT_CACHE_CAPACITY};
#[cfg(feature = "parallel")]
pub use parallel::{bind_each, bind_parallel};
