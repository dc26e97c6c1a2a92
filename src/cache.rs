//! Per-call-site fast path.
//!
//! After the first resolution a call site does not need the registry at all: it
//! keeps a non-owning reference to the instance and only falls back to the registry
//! when that reference is absent or stale. The cache is never authoritative — the
//! registry entry stays the owner of record, so a populated cache does not keep an
//! instance alive past [`teardown_all`](crate::teardown_all).

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::Singleton;

/// A per-call-site cached reference to the singleton of `T`.
///
/// Declare one `static` per call site (the [`singleton!`](crate::singleton) macro
/// does this for you) and call [`get`](SiteCache::get). The first call resolves
/// through the registry and records a [`Weak`] reference; later calls upgrade it
/// without touching the registry lock. If the instance has been torn down in the
/// meantime the upgrade fails and the call falls back to the registry again.
///
/// # Examples
///
/// ```
/// use process_singletons::{SiteCache, Singleton, TypeKey};
///
/// struct Counters;
///
/// impl Singleton for Counters {
///     const KEY: TypeKey = TypeKey::new("demo.Counters");
///     fn create() -> Self {
///         Counters
///     }
/// }
///
/// static COUNTERS: SiteCache<Counters> = SiteCache::new();
///
/// let a = COUNTERS.get();
/// let b = COUNTERS.get();
/// assert!(std::sync::Arc::ptr_eq(&a, &b));
/// # process_singletons::teardown_all();
/// ```
pub struct SiteCache<T> {
    slot: RwLock<Weak<T>>,
}

impl<T: Singleton> SiteCache<T> {
    /// Creates an empty cache. Usable in `static` position.
    pub const fn new() -> Self {
        SiteCache {
            slot: RwLock::new(Weak::new()),
        }
    }

    /// Returns the singleton of `T`, resolving through the registry only when the
    /// cached reference is absent or stale.
    pub fn get(&self) -> Arc<T> {
        if let Some(hit) = self.slot.read().upgrade() {
            return hit;
        }

        let resolved = crate::instance::<T>();
        *self.slot.write() = Arc::downgrade(&resolved);
        resolved
    }
}

impl<T: Singleton> Default for SiteCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{teardown_all, TypeKey};
    use serial_test::serial;

    struct Cached(u8);

    impl Singleton for Cached {
        const KEY: TypeKey = TypeKey::new("cache_tests.Cached");

        fn create() -> Self {
            Cached(9)
        }
    }

    #[test]
    #[serial]
    fn test_cache_returns_registry_instance() {
        teardown_all();

        static SITE: SiteCache<Cached> = SiteCache::new();
        let via_cache = SITE.get();
        let via_registry = crate::instance::<Cached>();
        assert!(Arc::ptr_eq(&via_cache, &via_registry));
        assert_eq!(via_cache.0, 9);

        drop((via_cache, via_registry));
        teardown_all();
    }

    #[test]
    #[serial]
    fn test_cache_does_not_own_the_instance() {
        teardown_all();

        static SITE: SiteCache<Cached> = SiteCache::new();
        drop(SITE.get());

        // The registry entry is the only owner left; teardown destroys it even
        // though the cache is populated.
        teardown_all();
        assert!(crate::existing::<Cached>().is_none());
    }

    #[test]
    #[serial]
    fn test_stale_cache_falls_back_to_registry() {
        teardown_all();

        static SITE: SiteCache<Cached> = SiteCache::new();
        let first = SITE.get();
        drop(first);
        teardown_all();

        // The cached Weak is stale now; the next get must re-resolve.
        let second = SITE.get();
        assert_eq!(second.0, 9);
        assert_eq!(crate::snapshot().len(), 1);

        drop(second);
        teardown_all();
    }
}
