//! Basic usage examples for respool

use respool::{Pool, PoolConfig};
use std::sync::Arc;
use std::time::Duration;

fn main() {
    println!("=== respool - Basic Examples ===\n");

    // Example 1: Acquire and release
    acquire_release();

    // Example 2: Idle expiry
    idle_expiry();

    // Example 3: RAII checkout guard
    checkout_guard();
}

fn acquire_release() {
    println!("1. Acquire and Release:");

    let config = PoolConfig::new(|| Ok(String::from("connection")), |_conn| Ok(()))
        .with_minimum(2)
        .with_capacity(4);
    let pool = Pool::new(config).unwrap();

    println!("   Idle after construction: {}", pool.len());

    let conn = pool.acquire().unwrap();
    println!("   Got resource: {}", conn);
    println!("   Idle while checked out: {}", pool.len());

    pool.release(conn).unwrap();
    println!("   Idle after return: {}\n", pool.len());

    pool.shutdown();
}

fn idle_expiry() {
    println!("2. Idle Expiry:");

    let config = PoolConfig::new(|| Ok(vec![0u8; 64]), |_buf| Ok(()))
        .with_minimum(1)
        .with_capacity(2)
        .with_idle_timeout(Duration::from_millis(20));
    let pool = Pool::new(config).unwrap();

    std::thread::sleep(Duration::from_millis(50));

    // The seeded buffer went stale, so acquire hands out a fresh one
    let buf = pool.acquire().unwrap();
    println!("   Got a fresh buffer of {} bytes", buf.len());
    println!("   Stale evictions: {}\n", pool.metrics().stale_evictions);

    pool.discard(buf).unwrap();
    pool.shutdown();
}

fn checkout_guard() {
    println!("3. Checkout Guard:");

    let config = PoolConfig::new(|| Ok(String::from("session")), |_s| Ok(())).with_minimum(1);
    let pool = Arc::new(Pool::new(config).unwrap());

    {
        let guard = pool.checkout().unwrap();
        println!("   Using: {}", *guard);
        // Returned automatically when `guard` goes out of scope
    }

    println!("   Idle after guard drop: {}", pool.len());
    pool.shutdown();
}
