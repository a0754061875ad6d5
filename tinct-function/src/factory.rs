//! Building functions once per function object.

use crate::error::{FunctionError, Result};
use crate::log::ldebug;
use crate::{Builder, Function, FunctionSettings};
use rustc_hash::FxHashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tinct_syntax::{ObjRef, Object, ObjectIdentity, XRef};

/// How a function object is identified in the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum CacheKey {
    /// An indirect object, identified by its reference.
    Ref(ObjRef),
    /// A direct object, identified by its allocation.
    Inline(ObjectIdentity),
}

struct Entry {
    function: Function,
    // Keeps the object alive, so that its identity can't be reused by another
    // object while the entry exists.
    _object: Object,
}

#[derive(Default)]
struct Cache {
    entries: FxHashMap<CacheKey, Entry>,
    stats: CacheStats,
}

/// Statistics about the requests made to a [`FunctionFactory`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Requests that were answered from the cache.
    pub hits: usize,
    /// Requests that required building a function, including failed ones.
    pub misses: usize,
    /// Functions that were built successfully and added to the cache.
    pub builds: usize,
}

/// Builds functions and caches them by the identity of their object.
///
/// A factory belongs to one document: references are resolved in its [`XRef`],
/// and it is meant to be dropped or [cleared](FunctionFactory::clear) together
/// with the document. Two structurally identical function objects are built and
/// cached separately, while requesting the same object twice only builds it once,
/// even when the requests come from different threads.
///
/// Functions that fail to build are not cached, so every request for them
/// reports the error again.
pub struct FunctionFactory {
    xref: XRef,
    settings: FunctionSettings,
    cache: Mutex<Cache>,
}

impl FunctionFactory {
    /// Create a new factory for the objects in `xref`.
    pub fn new(xref: XRef, settings: FunctionSettings) -> Self {
        Self {
            xref,
            settings,
            cache: Mutex::new(Cache::default()),
        }
    }

    /// The store references are resolved in.
    pub fn xref(&self) -> &XRef {
        &self.xref
    }

    /// The settings functions are built with.
    pub fn settings(&self) -> &FunctionSettings {
        &self.settings
    }

    /// Return the function for an object, building it on the first request.
    ///
    /// `object` can be a reference, or a dictionary, stream or array that is
    /// stored directly in its parent.
    pub fn get(&self, object: &Object) -> Result<Function> {
        let key = match object {
            Object::Ref(r) => CacheKey::Ref(*r),
            other => CacheKey::Inline(other.identity().ok_or(FunctionError::InvalidObject)?),
        };

        // The lock is held while building, so that concurrent requests for the
        // same object wait for the first one instead of building it again.
        let mut cache = self.lock();

        if let Some(function) = cache.entries.get(&key).map(|e| e.function.clone()) {
            cache.stats.hits += 1;

            return Ok(function);
        }

        cache.stats.misses += 1;

        let builder = Builder {
            xref: &self.xref,
            settings: &self.settings,
        };

        match builder.build(object, 0) {
            Ok(function) => {
                cache.stats.builds += 1;
                cache.entries.insert(
                    key,
                    Entry {
                        function: function.clone(),
                        _object: object.clone(),
                    },
                );

                Ok(function)
            }
            Err(e) => {
                ldebug!("failed to build function: {}", e);

                Err(e)
            }
        }
    }

    /// The number of cached functions.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether no functions are cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all cached functions. The statistics are kept.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    /// Return the statistics of all requests so far.
    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }

    fn lock(&self) -> MutexGuard<'_, Cache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
