//! Process-stable type identity.
//!
//! The registry never keys on a language-generated runtime type token: tokens like
//! `TypeId` are not guaranteed to compare equal across independently linked binary
//! images (a dynamically loaded module may carry its own copy of the type metadata).
//! Instead every singleton type declares an explicit [`TypeKey`] — a string name the
//! author picks once — and the registry compares key *contents*, never pointers, so
//! two images each holding their own copy of the literal still agree.

use std::fmt;

/// Identity of a concrete singleton type, stable for the lifetime of the process.
///
/// Keys are compared by string content. Equality is reflexive, symmetric and
/// transitive; the ordering is the lexicographic ordering of the name, which gives
/// [`snapshot`](crate::snapshot) a deterministic order.
///
/// The name must be unique per concrete type. The usual convention is a
/// crate-qualified path, e.g. `"my_crate.ConfigStore"`; registering two different
/// types under one name is a contract violation that the registry detects and
/// treats as fatal (see [`RegistryViolation::KeyCollision`](crate::RegistryViolation)).
///
/// # Examples
///
/// ```
/// use process_singletons::TypeKey;
///
/// const KEY: TypeKey = TypeKey::new("demo.ConfigStore");
/// assert_eq!(KEY.name(), "demo.ConfigStore");
/// assert_eq!(KEY, TypeKey::new("demo.ConfigStore"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeKey(&'static str);

impl TypeKey {
    /// Creates a key from a process-stable name.
    pub const fn new(name: &'static str) -> Self {
        TypeKey(name)
    }

    /// The name this key was declared with.
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}
