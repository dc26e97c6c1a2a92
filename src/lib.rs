//! # Process Singletons
//!
//! Process-wide lazy singletons backed by an explicit, type-keyed registry.
//!
//! For any type implementing [`Singleton`], every part of a running process —
//! including independently linked binary images such as dynamically loaded
//! modules, which may each carry their own copy of static data — shares exactly one
//! instance. The instance is constructed lazily by whichever thread asks first and
//! destroyed exactly once at shutdown by [`teardown_all`].
//!
//! ## Quick Start
//!
//! ```rust
//! use process_singletons::{singleton, Singleton, TypeKey};
//! use std::sync::Arc;
//!
//! struct ConnectionPool {
//!     size: usize,
//! }
//!
//! impl Singleton for ConnectionPool {
//!     const KEY: TypeKey = TypeKey::new("app.ConnectionPool");
//!
//!     fn create() -> Self {
//!         ConnectionPool { size: 8 }
//!     }
//! }
//!
//! // First request constructs and registers the instance.
//! let pool = singleton!(ConnectionPool);
//! assert_eq!(pool.size, 8);
//!
//! // Any other call site observes the same instance.
//! let again = singleton!(ConnectionPool);
//! assert!(Arc::ptr_eq(&pool, &again));
//!
//! // At shutdown, after all users have quiesced:
//! drop((pool, again));
//! process_singletons::teardown_all();
//! ```
//!
//! ## How it works
//!
//! - **Identity**: each type declares a process-stable [`TypeKey`] (a string name,
//!   compared by content), so separately compiled images agree on "the same type"
//!   without relying on language-generated type tokens.
//! - **Registry**: one global map from key to owned, type-erased instance, guarded
//!   by a re-entrant lock. The whole check-then-act of the first request runs in a
//!   single critical section, so concurrent first requests construct exactly once.
//! - **Fast path**: [`SiteCache`] / [`singleton!`] keep a per-call-site `Weak`
//!   reference; once populated, a request never touches the registry lock.
//! - **Teardown**: [`teardown_all`] destroys every registered instance once, at
//!   process shutdown, after all consumer threads have stopped.
//!
//! ## Main items
//!
//! - [`Singleton`] - trait a type implements to get a process-wide instance
//! - [`instance`] - obtain (creating if necessary) the instance of a type
//! - [`existing`] - look up the instance without constructing
//! - [`singleton!`] - per-call-site cached accessor
//! - [`teardown_all`] - destroy all registered instances at shutdown
//! - [`snapshot`] - diagnostic listing of current registry contents
//! - [`set_trace_callback`] - observe registry operations

mod cache;
mod key;
mod macros;
mod registry;
mod registry_error;
mod registry_event;
mod singleton;

pub use cache::SiteCache;
pub use key::TypeKey;
pub use registry::{
    clear_trace_callback, existing, instance, set_trace_callback, snapshot, teardown_all,
    SnapshotEntry, TraceCallback,
};
pub use registry_error::RegistryViolation;
pub use registry_event::RegistryEvent;
pub use singleton::Singleton;
