//! The process-wide registry: one map from [`TypeKey`] to an owned, type-erased
//! instance, behind a re-entrant lock.
//!
//! The map is the single source of truth for "does an instance exist, and where".
//! It is created lazily on first use and emptied exactly once by
//! [`teardown_all`]; per-call-site caches ([`SiteCache`](crate::SiteCache)) are
//! non-owning views layered on top and are never authoritative.
//!
//! Locking protocol: the whole check-then-act sequence of [`instance`] — lookup,
//! conditional construct, conditional insert — runs inside a single scoped critical
//! section. The lock is a [`ReentrantMutex`] so a constructor may resolve *other*
//! singletons while its own registration is in flight; map mutation goes through the
//! inner [`RefCell`], and no borrow is live while a constructor runs.

use std::{
    any::Any,
    cell::RefCell,
    collections::HashMap,
    sync::{Arc, LazyLock, Mutex},
};

use parking_lot::ReentrantMutex;

use crate::{RegistryEvent, RegistryViolation, Singleton, TypeKey};

/// One registered instance: the owning handle plus the concrete type name for
/// diagnostics. Dropping `instance` runs the concrete destructor through the
/// `dyn Any` drop glue captured at insertion time.
#[derive(Clone)]
struct Entry {
    instance: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

type Storage = HashMap<TypeKey, Entry>;

/// Global registry storage, created on first use.
///
/// The `ReentrantMutex` serializes all registry access; the `RefCell` carries the
/// mutability, so a re-entered critical section on the same thread can still read
/// and write the map (one borrow at a time).
static STORAGE: LazyLock<ReentrantMutex<RefCell<Storage>>> =
    LazyLock::new(|| ReentrantMutex::new(RefCell::new(HashMap::new())));

/// Single accessor for the registry state. All operations go through here.
fn storage() -> &'static ReentrantMutex<RefCell<Storage>> {
    &STORAGE
}

// -------------------------------------------------------------------------------------------------
// Tracing callback support
// -------------------------------------------------------------------------------------------------

/// Signature of an observer for [`RegistryEvent`]s.
///
/// Observers run on whichever thread performed the registry operation, hence the
/// `Send + Sync` bounds.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

/// The installed observer, if any.
static TRACE_CALLBACK: LazyLock<Mutex<Option<Arc<TraceCallback>>>> =
    LazyLock::new(|| Mutex::new(None));

/// Installs an observer that receives one [`RegistryEvent`] per registry operation,
/// replacing any previously installed one.
///
/// [`clear_trace_callback`] uninstalls it again. The observer runs while the trace
/// lock is held, so it must not call [`set_trace_callback`] or
/// [`clear_trace_callback`] itself.
///
/// # Example
/// ```rust
/// use process_singletons::set_trace_callback;
///
/// set_trace_callback(|event| println!("[registry-trace] {event}"));
/// # process_singletons::clear_trace_callback();
/// ```
pub fn set_trace_callback(callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
    let mut guard = TRACE_CALLBACK.lock().unwrap_or_else(|p| p.into_inner());
    *guard = Some(Arc::new(callback));
}

/// Uninstalls the observer; registry operations stop emitting events.
pub fn clear_trace_callback() {
    let mut guard = TRACE_CALLBACK.lock().unwrap_or_else(|p| p.into_inner());
    *guard = None;
}

/// Hands an event to the installed observer, if any.
fn emit_event(event: &RegistryEvent) {
    // A panicking observer poisons the trace lock only; recover and keep emitting.
    let guard = TRACE_CALLBACK.lock().unwrap_or_else(|p| p.into_inner());
    if let Some(callback) = guard.as_ref() {
        callback(event);
    }
}

// -------------------------------------------------------------------------------------------------
// Registry primitives
// -------------------------------------------------------------------------------------------------
//
// The three map operations. `insert` and `remove` enforce the central invariant
// (exactly one instance per key) with fatal checks; the accessor's critical section
// and `teardown_all` are their only callers.

fn try_get(map: &RefCell<Storage>, key: TypeKey) -> Option<Entry> {
    map.borrow().get(&key).cloned()
}

fn insert(map: &RefCell<Storage>, key: TypeKey, entry: Entry) {
    if map.borrow_mut().insert(key, entry).is_some() {
        panic!("{}", RegistryViolation::DuplicateInsert { key });
    }
}

fn remove(map: &RefCell<Storage>, key: TypeKey) -> Entry {
    match map.borrow_mut().remove(&key) {
        Some(entry) => entry,
        None => panic!("{}", RegistryViolation::RemoveUnregistered { key }),
    }
}

/// Recovers the concrete type from a stored entry. A failed downcast means two
/// types were declared with the same key, which is fatal.
fn downcast<T: Singleton>(entry: Entry) -> Arc<T> {
    let Entry {
        instance,
        type_name,
    } = entry;
    instance.downcast::<T>().unwrap_or_else(|_| {
        panic!(
            "{}",
            RegistryViolation::KeyCollision {
                key: T::KEY,
                stored: type_name,
                requested: std::any::type_name::<T>(),
            }
        )
    })
}

// -------------------------------------------------------------------------------------------------
// Public operations
// -------------------------------------------------------------------------------------------------

/// Obtains the process-wide instance of `T`, constructing and registering it if this
/// is the first request for [`T::KEY`](Singleton::KEY).
///
/// Every call for the same key observes the same instance, from any thread: the
/// registry lookup and the conditional construct-and-insert happen inside one
/// critical section, so concurrent first requests race on the lock, exactly one
/// winner constructs, and every other caller then observes the winner's entry.
///
/// Call sites that resolve the same type repeatedly should go through
/// [`singleton!`](crate::singleton) or a [`SiteCache`](crate::SiteCache), which skip
/// the lock once populated.
///
/// # Panics
///
/// Propagates a panic from `T::create`, in which case nothing is registered. Also
/// panics on a [`RegistryViolation`], i.e. when two types share one key.
pub fn instance<T: Singleton>() -> Arc<T> {
    let guard = storage().lock();

    if let Some(entry) = try_get(&guard, T::KEY) {
        drop(guard);
        tracing::trace!(key = %T::KEY, "resolved registered singleton");
        emit_event(&RegistryEvent::Resolved {
            key: T::KEY,
            found: true,
        });
        return downcast::<T>(entry);
    }

    // First request for this key. Construct while still holding the lock so that
    // concurrent requests block until the insertion is visible. No RefCell borrow
    // is active here: `T::create` may re-enter the registry for other keys.
    let value = Arc::new(T::create());
    let erased: Arc<dyn Any + Send + Sync> = value.clone();
    insert(
        &guard,
        T::KEY,
        Entry {
            instance: erased,
            type_name: std::any::type_name::<T>(),
        },
    );
    drop(guard);

    tracing::debug!(key = %T::KEY, type_name = std::any::type_name::<T>(), "constructed singleton");
    emit_event(&RegistryEvent::Created {
        key: T::KEY,
        type_name: std::any::type_name::<T>(),
    });
    value
}

/// Returns the registered instance of `T` if one exists, without constructing.
///
/// # Panics
///
/// Panics on a [`RegistryViolation::KeyCollision`], like [`instance`].
pub fn existing<T: Singleton>() -> Option<Arc<T>> {
    let guard = storage().lock();
    let entry = try_get(&guard, T::KEY);
    drop(guard);

    let found = entry.is_some();
    emit_event(&RegistryEvent::Resolved { key: T::KEY, found });
    entry.map(downcast::<T>)
}

/// Destroys every registered instance and empties the registry.
///
/// This is a whole-process shutdown primitive. It must only be called after all
/// threads that request singletons have stopped and, for destructors to run here
/// rather than later, after callers have dropped the `Arc` handles they obtained
/// (per-call-site caches hold only `Weak` references and do not keep instances
/// alive). Calling it concurrently with [`instance`] is undefined behavior of the
/// contract, not checked at runtime.
///
/// Removal restarts from the map's current first entry on every round instead of
/// advancing an iterator across mutations, so an instance destructor that touches
/// the registry sees it in a consistent state.
pub fn teardown_all() {
    let guard = storage().lock();
    let mut removed = 0usize;
    loop {
        let key = guard.borrow().keys().next().copied();
        let Some(key) = key else { break };
        let entry = remove(&guard, key);
        emit_event(&RegistryEvent::Removed { key });
        // No borrow is live: the destructor may re-enter the registry.
        drop(entry);
        removed += 1;
    }
    drop(guard);

    tracing::debug!(removed, "singleton registry torn down");
    emit_event(&RegistryEvent::Teardown { removed });
}

/// One row of a [`snapshot`]: a registered key, the concrete type behind it and the
/// instance address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotEntry {
    /// The key the instance is registered under.
    pub key: TypeKey,
    /// The concrete type name, as reported at registration time.
    pub type_name: &'static str,
    /// Address of the instance, for correlating diagnostics output.
    pub address: usize,
}

impl std::fmt::Display for SnapshotEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) = {:#x}", self.key, self.type_name, self.address)
    }
}

/// Returns a read-only copy of the registry's current contents, sorted by key.
///
/// Taken under the registry lock, so it never observes a half-finished insertion.
/// Intended for logging and diagnostics tooling, not for production control flow.
pub fn snapshot() -> Vec<SnapshotEntry> {
    let guard = storage().lock();
    let mut entries: Vec<SnapshotEntry> = guard
        .borrow()
        .iter()
        .map(|(key, entry)| SnapshotEntry {
            key: *key,
            type_name: entry.type_name,
            address: Arc::as_ptr(&entry.instance) as *const () as usize,
        })
        .collect();
    drop(guard);

    entries.sort_by_key(|entry| entry.key);
    tracing::trace!(len = entries.len(), "singleton registry snapshot");
    entries
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct Widget(u32);

    impl Singleton for Widget {
        const KEY: TypeKey = TypeKey::new("registry_tests.Widget");

        fn create() -> Self {
            Widget(7)
        }
    }

    struct Gadget;

    // Deliberately reuses Widget's key to exercise the collision check.
    impl Singleton for Gadget {
        const KEY: TypeKey = TypeKey::new("registry_tests.Widget");

        fn create() -> Self {
            Gadget
        }
    }

    #[test]
    #[serial]
    fn test_instance_constructs_once_and_reuses() {
        teardown_all();

        let first = instance::<Widget>();
        assert_eq!(first.0, 7);
        assert_eq!(snapshot().len(), 1);

        let second = instance::<Widget>();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(snapshot().len(), 1);

        drop((first, second));
        teardown_all();
    }

    #[test]
    #[serial]
    fn test_existing_does_not_construct() {
        teardown_all();

        assert!(existing::<Widget>().is_none());
        assert!(snapshot().is_empty());

        let created = instance::<Widget>();
        let found = existing::<Widget>().unwrap();
        assert!(Arc::ptr_eq(&created, &found));

        drop((created, found));
        teardown_all();
    }

    #[test]
    #[serial]
    fn test_snapshot_is_sorted_by_key() {
        teardown_all();

        struct Second;
        impl Singleton for Second {
            const KEY: TypeKey = TypeKey::new("registry_tests.ZZSecond");
            fn create() -> Self {
                Second
            }
        }

        let _b = instance::<Second>();
        let _a = instance::<Widget>();

        let entries = snapshot();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key, Widget::KEY);
        assert_eq!(entries[1].key, Second::KEY);

        drop((_a, _b));
        teardown_all();
    }

    #[test]
    #[serial]
    fn test_snapshot_address_matches_instance() {
        teardown_all();

        let widget = instance::<Widget>();
        let entries = snapshot();
        assert_eq!(entries[0].address, Arc::as_ptr(&widget) as usize);

        drop(widget);
        teardown_all();
    }

    #[test]
    #[serial]
    fn test_snapshot_entry_display() {
        let entry = SnapshotEntry {
            key: TypeKey::new("registry_tests.Widget"),
            type_name: "Widget",
            address: 0x1000,
        };
        assert_eq!(entry.to_string(), "registry_tests.Widget (Widget) = 0x1000");
    }

    #[test]
    #[serial]
    #[should_panic(expected = "duplicate insert for key `registry_tests.Widget`")]
    fn test_double_insert_is_fatal() {
        teardown_all();

        let guard = storage().lock();
        let entry = Entry {
            instance: Arc::new(Widget(1)),
            type_name: "Widget",
        };
        insert(&guard, Widget::KEY, entry.clone());
        insert(&guard, Widget::KEY, entry);
    }

    #[test]
    #[serial]
    #[should_panic(expected = "remove for unregistered key `registry_tests.Widget`")]
    fn test_remove_unregistered_is_fatal() {
        teardown_all();

        let guard = storage().lock();
        remove(&guard, Widget::KEY);
    }

    #[test]
    #[serial]
    #[should_panic(expected = "is bound to")]
    fn test_key_collision_is_fatal() {
        teardown_all();

        let _widget = instance::<Widget>();
        let _gadget = instance::<Gadget>();
    }

    // Registry state leaks out of #[should_panic] tests above; make sure a plain
    // teardown afterwards still leaves the map empty.
    #[test]
    #[serial]
    fn test_teardown_after_partial_state() {
        teardown_all();
        assert!(snapshot().is_empty());
    }
}
