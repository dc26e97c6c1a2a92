use crate::TypeKey;

/// Events emitted by the registry during operations.
///
/// These events are passed to the tracing callback set via
/// [`set_trace_callback`](crate::set_trace_callback). The `Clone` derive allows
/// callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use process_singletons::{RegistryEvent, TypeKey};
///
/// let event = RegistryEvent::Created {
///     key: TypeKey::new("demo.ConfigStore"),
///     type_name: "demo::ConfigStore",
/// };
/// println!("{:?}", event);
/// ```
#[derive(Debug, Clone)]
pub enum RegistryEvent {
    /// A first request constructed and registered a new instance.
    Created {
        /// The key the instance was registered under
        key: TypeKey,
        /// The concrete type name (e.g. "demo::ConfigStore")
        type_name: &'static str,
    },

    /// An instance was looked up in the registry.
    Resolved {
        /// The key that was requested
        key: TypeKey,
        /// Whether a registered instance was found
        found: bool,
    },

    /// An instance was removed from the registry.
    Removed {
        /// The key that was removed
        key: TypeKey,
    },

    /// The registry was torn down.
    Teardown {
        /// How many instances were destroyed
        removed: usize,
    },
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Created { key, type_name } => {
                write!(f, "created {{ key: {}, type_name: {} }}", key, type_name)
            }
            RegistryEvent::Resolved { key, found } => {
                write!(f, "resolved {{ key: {}, found: {} }}", key, found)
            }
            RegistryEvent::Removed { key } => {
                write!(f, "removed {{ key: {} }}", key)
            }
            RegistryEvent::Teardown { removed } => {
                write!(f, "teardown {{ removed: {} }}", removed)
            }
        }
    }
}
