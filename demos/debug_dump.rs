//! Diagnostic dump example: list every registered singleton with its key, concrete
//! type and address, the way a debugging session or shutdown log would.
//!
//! Run with: `cargo run --example debug_dump`

use process_singletons::{instance, snapshot, teardown_all, Singleton, TypeKey};

struct MetricsSink;

impl Singleton for MetricsSink {
    const KEY: TypeKey = TypeKey::new("debug_dump.MetricsSink");

    fn create() -> Self {
        MetricsSink
    }
}

struct SchedulerState {
    workers: usize,
}

impl Singleton for SchedulerState {
    const KEY: TypeKey = TypeKey::new("debug_dump.SchedulerState");

    fn create() -> Self {
        SchedulerState { workers: 4 }
    }
}

fn dump_singletons() {
    println!("Dumping singletons:");
    for entry in snapshot() {
        println!("  {entry}");
    }
}

fn main() {
    let _metrics = instance::<MetricsSink>();
    let scheduler = instance::<SchedulerState>();
    println!("Scheduler runs {} workers\n", scheduler.workers);

    dump_singletons();

    drop((_metrics, scheduler));
    teardown_all();
}
