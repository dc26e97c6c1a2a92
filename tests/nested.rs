//! Re-entrant construction: a constructor that resolves a different singleton
//! during its own initialization must not deadlock on the registry lock.

use process_singletons::{instance, snapshot, teardown_all, Singleton, TypeKey};
use serial_test::serial;
use std::sync::Arc;

struct Inner {
    seed: u32,
}

impl Singleton for Inner {
    const KEY: TypeKey = TypeKey::new("nested_tests.Inner");

    fn create() -> Self {
        Inner { seed: 11 }
    }
}

struct Outer {
    inner: Arc<Inner>,
}

impl Singleton for Outer {
    const KEY: TypeKey = TypeKey::new("nested_tests.Outer");

    fn create() -> Self {
        // Runs while the registry lock is already held by this thread.
        Outer {
            inner: instance::<Inner>(),
        }
    }
}

#[test]
#[serial]
fn test_constructor_may_resolve_another_singleton() {
    teardown_all();

    let outer = instance::<Outer>();
    assert_eq!(outer.inner.seed, 11);
    assert_eq!(snapshot().len(), 2);

    // The nested resolution registered Inner itself; a direct request reuses it.
    let inner = instance::<Inner>();
    assert!(Arc::ptr_eq(&outer.inner, &inner));

    drop((inner, outer));
    teardown_all();
}

#[test]
#[serial]
fn test_nested_registration_survives_outer_teardown_cycle() {
    teardown_all();

    drop(instance::<Outer>());
    teardown_all();
    assert!(snapshot().is_empty());

    // A fresh cycle reconstructs both, in dependency order.
    let outer = instance::<Outer>();
    assert_eq!(snapshot().len(), 2);

    drop(outer);
    teardown_all();
}
