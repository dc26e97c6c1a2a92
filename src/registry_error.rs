use thiserror::Error;

use crate::TypeKey;

/// Internal consistency violations of the singleton registry.
///
/// Every variant indicates a broken contract — either in the registry's own locking
/// protocol or in the key declarations of the registered types — not a recoverable
/// runtime condition. The registry raises these by panicking with the variant's
/// `Display` output: once "exactly one instance per key" no longer holds there is no
/// safe continuation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryViolation {
    /// Two different concrete types were registered under the same [`TypeKey`].
    /// Detected when a lookup's stored entry fails to downcast to the requested type.
    #[error("key `{key}` is bound to `{stored}` but `{requested}` was requested")]
    KeyCollision {
        key: TypeKey,
        stored: &'static str,
        requested: &'static str,
    },

    /// An insert was attempted for a key that already holds an instance. The
    /// accessor's critical section is the only inserter and must never double-insert.
    #[error("duplicate insert for key `{key}`")]
    DuplicateInsert { key: TypeKey },

    /// A remove was attempted for a key with no registered instance.
    #[error("remove for unregistered key `{key}`")]
    RemoveUnregistered { key: TypeKey },
}
