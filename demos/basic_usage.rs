//! Basic usage example for process-singletons.
//!
//! Demonstrates:
//! - Declaring a singleton type with the `Singleton` trait
//! - Resolving it with the `singleton!` macro (cached per call site)
//! - Sharing one instance across distinct call sites
//! - Tearing everything down at shutdown
//!
//! Run with: `cargo run --example basic_usage`

use process_singletons::{singleton, teardown_all, Singleton, TypeKey};
use std::sync::Arc;

// Custom struct to demonstrate a typical application singleton
#[derive(Debug)]
struct AppConfig {
    name: String,
    version: u32,
    debug_mode: bool,
}

impl Singleton for AppConfig {
    const KEY: TypeKey = TypeKey::new("basic_usage.AppConfig");

    fn create() -> Self {
        println!("   (constructing AppConfig...)");
        AppConfig {
            name: "demo-app".to_string(),
            version: 3,
            debug_mode: true,
        }
    }
}

fn subsystem_a() -> Arc<AppConfig> {
    singleton!(AppConfig)
}

fn subsystem_b() -> Arc<AppConfig> {
    singleton!(AppConfig)
}

fn main() {
    println!("=== process-singletons: Basic Usage ===\n");

    // -------------------------------------------------------------------------
    // 1. First request constructs the instance
    // -------------------------------------------------------------------------
    println!("1. First request from subsystem A...");
    let config = subsystem_a();
    println!(
        "   Got: {} v{} (debug: {})",
        config.name, config.version, config.debug_mode
    );

    // -------------------------------------------------------------------------
    // 2. A different call site observes the same instance
    // -------------------------------------------------------------------------
    println!("\n2. Request from subsystem B (no construction)...");
    let same = subsystem_b();
    println!("   Same instance: {}", Arc::ptr_eq(&config, &same));

    // -------------------------------------------------------------------------
    // 3. Shutdown
    // -------------------------------------------------------------------------
    println!("\n3. Dropping handles and tearing down...");
    drop((config, same));
    teardown_all();
    println!("   Registry is empty: {}", process_singletons::snapshot().is_empty());
}
