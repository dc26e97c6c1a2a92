//! The trait a type implements to participate in the process-wide registry.

use crate::TypeKey;

/// A type that has exactly one shared instance per process.
///
/// Implementing this trait is all a type needs — no special base type, no virtual
/// dispatch. The registry owns the instance and captures its destructor through the
/// type-erased handle at insertion time, so [`create`](Singleton::create) is the only
/// hook the type provides.
///
/// # Contract
///
/// - [`KEY`](Singleton::KEY) must be unique per concrete type within the process.
///   Registering two types under one key is fatal.
/// - [`create`](Singleton::create) may resolve *other* singletons via
///   [`instance`](crate::instance) during its own initialization (the registry lock
///   is re-entrant). It must not request its own type; that recurses without bound.
/// - A panic in `create` propagates to the requesting caller; nothing is registered.
///
/// # Examples
///
/// ```
/// use process_singletons::{Singleton, TypeKey};
///
/// struct ConfigStore {
///     verbose: bool,
/// }
///
/// impl Singleton for ConfigStore {
///     const KEY: TypeKey = TypeKey::new("demo.ConfigStore");
///
///     fn create() -> Self {
///         ConfigStore { verbose: false }
///     }
/// }
///
/// let config = process_singletons::instance::<ConfigStore>();
/// assert!(!config.verbose);
/// # process_singletons::teardown_all();
/// ```
pub trait Singleton: Send + Sync + Sized + 'static {
    /// Process-stable identity of this type. See [`TypeKey`] for naming conventions.
    const KEY: TypeKey;

    /// Constructs the one instance. Called at most once per process under normal
    /// operation, by whichever thread wins the first request.
    fn create() -> Self;
}
