//! Metrics export example for respool

use respool::{Pool, PoolConfig};
use std::collections::HashMap;

fn main() {
    println!("=== respool - Metrics Example ===\n");

    let config = PoolConfig::new(|| Ok(0u64), |_| Ok(()))
        .with_minimum(2)
        .with_capacity(3);
    let pool = Pool::new(config).unwrap();

    // Generate some activity, including an overflow discard
    let a = pool.acquire().unwrap();
    let b = pool.acquire().unwrap();
    let c = pool.acquire().unwrap();
    let d = pool.acquire().unwrap();
    pool.release(a).unwrap();
    pool.release(b).unwrap();
    pool.release(c).unwrap();
    pool.release(d).unwrap();

    println!("Metrics:");
    for (key, value) in pool.export_metrics() {
        println!("  {}: {}", key, value);
    }

    let mut tags = HashMap::new();
    tags.insert("service".to_string(), "demo".to_string());

    println!("\nPrometheus format:");
    print!("{}", pool.export_metrics_prometheus("demo_pool", Some(&tags)));

    pool.shutdown();
}
