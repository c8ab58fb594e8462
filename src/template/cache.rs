//! Compiled template cache
//!
//! Templates are usually a handful of fixed strings compiled again and again
//! by callers that do not hold on to the [`Binder`]. The cache keeps the most
//! recently used binders keyed by template text.

use std::num::NonZeroUsize;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use log::trace;
use lru::LruCache;

use super::binder::{Binder, CompileOptions};
use crate::error::Result;

/// Capacity of the process-wide cache behind [`compile_cached`]
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

static GLOBAL: LazyLock<TemplateCache> =
    LazyLock::new(|| TemplateCache::new(DEFAULT_CACHE_CAPACITY));

/// LRU cache of compiled templates
pub struct TemplateCache {
    options: CompileOptions,
    inner: Mutex<LruCache<String, Arc<Binder>>>,
}

impl TemplateCache {
    /// Create a new cache holding at most `capacity` templates (minimum 1)
    pub fn new(capacity: usize) -> Self {
        Self::with_options(capacity, CompileOptions::default())
    }

    /// Create a new cache that compiles with `options`
    pub fn with_options(capacity: usize, options: CompileOptions) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        TemplateCache {
            options,
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Shared binder for `text`, compiling it on a miss.
    ///
    /// Compile errors are returned and not cached. The lock is not held while
    /// compiling.
    pub fn get_or_compile(&self, text: &str) -> Result<Arc<Binder>> {
        if let Some(binder) = self.lock().get(text) {
            trace!("template cache hit ({} bytes)", text.len());
            return Ok(Arc::clone(binder));
        }

        trace!("template cache miss ({} bytes)", text.len());
        let binder = Arc::new(Binder::compile_with(text, self.options)?);
        self.lock().put(text.to_string(), Arc::clone(&binder));
        Ok(binder)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, Arc<Binder>>> {
        // Entries are only ever whole binders, so a poisoned cache is still consistent
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TemplateCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

/// Compile through the process-wide template cache
pub fn compile_cached(text: &str) -> Result<Arc<Binder>> {
    GLOBAL.get_or_compile(text)
}
