//! The `singleton!` accessor macro.
//!
//! Expands to a hidden per-call-site [`SiteCache`](crate::SiteCache) static plus the
//! lookup, so each expansion gets its own fast path while all of them share the one
//! process-wide registry.

/// Returns the process-wide instance of the given type, with a per-call-site cache.
///
/// Every expansion of this macro is an independent call site: the first evaluation
/// resolves through the registry (constructing the instance if needed), later
/// evaluations at the same site skip the registry entirely. Two different call
/// sites for the same type still observe the same instance — the registry is the
/// source of truth.
///
/// The type must be concrete (no generic parameters from the surrounding scope,
/// since the expansion declares a `static`).
///
/// # Examples
///
/// ```rust
/// use process_singletons::{singleton, Singleton, TypeKey};
/// use std::sync::Arc;
///
/// struct Limits {
///     max_connections: u32,
/// }
///
/// impl Singleton for Limits {
///     const KEY: TypeKey = TypeKey::new("demo.Limits");
///     fn create() -> Self {
///         Limits { max_connections: 64 }
///     }
/// }
///
/// let a = singleton!(Limits);
/// let b = singleton!(Limits); // distinct call site, same instance
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(a.max_connections, 64);
/// # process_singletons::teardown_all();
/// ```
#[macro_export]
macro_rules! singleton {
    ($t:ty) => {{
        static SITE: $crate::SiteCache<$t> = $crate::SiteCache::new();
        SITE.get()
    }};
}
