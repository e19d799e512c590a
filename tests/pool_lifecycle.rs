//! End-to-end lifecycle tests against the public API, using a fake
//! connection type with instrumented open/close callbacks.

use respool::{Pool, PoolConfig, PoolError};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug)]
struct FakeConn {
    id: usize,
}

struct Harness {
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl Harness {
    fn new() -> Self {
        Self {
            opened: Arc::new(AtomicUsize::new(0)),
            closed: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn config(&self) -> PoolConfig<FakeConn> {
        let opened = Arc::clone(&self.opened);
        let closed = Arc::clone(&self.closed);
        PoolConfig::new(
            move || {
                let id = opened.fetch_add(1, Ordering::SeqCst);
                Ok(FakeConn { id })
            },
            move |_conn| {
                closed.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
        )
    }

    fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

#[test]
fn full_lifecycle_accounts_for_every_connection() {
    let harness = Harness::new();
    let pool = Pool::new(harness.config().with_minimum(2).with_capacity(4)).unwrap();

    assert_eq!(pool.len(), 2);
    assert_eq!(harness.opened(), 2);

    // Drain the idle buffer and force two overflow creations
    let conns: Vec<FakeConn> = (0..4).map(|_| pool.acquire().unwrap()).collect();
    assert_eq!(pool.len(), 0);
    assert_eq!(harness.opened(), 4);

    // One connection is judged broken and discarded
    let mut conns = conns;
    let broken = conns.pop().unwrap();
    pool.discard(broken).unwrap();
    assert_eq!(harness.closed(), 1);

    for conn in conns {
        pool.release(conn).unwrap();
    }
    assert_eq!(pool.len(), 3);

    pool.shutdown();
    assert_eq!(pool.len(), 0);
    assert!(matches!(pool.acquire(), Err(PoolError::Closed)));

    // every connection ever opened was closed exactly once
    assert_eq!(harness.opened(), harness.closed());
}

#[test]
fn release_after_shutdown_closes_the_connection() {
    let harness = Harness::new();
    let pool = Pool::new(harness.config().with_minimum(1).with_capacity(2)).unwrap();

    let conn = pool.acquire().unwrap();
    pool.shutdown();
    assert_eq!(harness.closed(), 0);

    pool.release(conn).unwrap();
    assert_eq!(pool.len(), 0);
    assert_eq!(harness.opened(), harness.closed());
}

#[test]
fn metrics_reflect_pool_activity() {
    let harness = Harness::new();
    let pool = Pool::new(harness.config().with_minimum(1).with_capacity(2)).unwrap();

    let a = pool.acquire().unwrap();
    let b = pool.acquire().unwrap();
    let c = pool.acquire().unwrap();
    pool.release(a).unwrap();
    pool.release(b).unwrap();
    pool.release(c).unwrap(); // buffer full, destroyed

    let metrics = pool.metrics();
    assert_eq!(metrics.total_created, 3);
    assert_eq!(metrics.total_acquired, 3);
    assert_eq!(metrics.total_released, 2);
    assert_eq!(metrics.overflow_discards, 1);
    assert_eq!(metrics.total_destroyed, 1);
    assert_eq!(metrics.idle_resources, 2);
    assert_eq!(metrics.capacity, 2);

    let exported = pool.export_metrics();
    assert_eq!(exported.get("total_created").unwrap(), "3");

    let prometheus = pool.export_metrics_prometheus("conns", None);
    assert!(prometheus.contains("respool_resources_idle{pool=\"conns\"} 2"));
    assert!(prometheus.contains("respool_resources_created_total{pool=\"conns\"} 3"));

    pool.shutdown();
}

#[test]
fn destroy_failures_are_counted_but_do_not_stop_shutdown() {
    let closed = Arc::new(AtomicUsize::new(0));
    let c = Arc::clone(&closed);

    let config = PoolConfig::new(
        || Ok(0u32),
        move |_| {
            let n = c.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                Err("close failed".into())
            } else {
                Ok(())
            }
        },
    )
    .with_minimum(3)
    .with_capacity(3);

    let pool = Pool::new(config).unwrap();
    pool.shutdown();

    // the failing first destroy did not stop the drain
    assert_eq!(closed.load(Ordering::SeqCst), 3);
    let metrics = pool.metrics();
    assert_eq!(metrics.total_destroyed, 3);
    assert_eq!(metrics.destroy_failures, 1);
}

#[test]
fn guard_id_is_stable_across_checkout() {
    let harness = Harness::new();
    let pool = Arc::new(Pool::new(harness.config().with_minimum(1).with_capacity(1)).unwrap());

    let first_id = {
        let guard = pool.checkout().unwrap();
        guard.id
    };

    // the same connection comes back on the next checkout
    let guard = pool.checkout().unwrap();
    assert_eq!(guard.id, first_id);
}
