//! # respool
//!
//! Bounded, thread-safe resource pool for expensive-to-create handles such
//! as network connections.
//!
//! ## Features
//!
//! - Bounded FIFO buffer of idle resources, generic over the resource type
//! - Injected factory and destroyer callbacks; the pool never inspects the
//!   resource itself
//! - On-demand overflow creation: an empty pool never blocks the caller
//! - Lazy idle-timeout expiry evaluated at acquire time
//! - Clean shutdown that destroys every held resource exactly once
//! - RAII checkout guard that releases on drop
//! - Activity counters with HashMap and Prometheus-format export
//!
//! ## Quick Start
//!
//! ```rust
//! use respool::{Pool, PoolConfig};
//!
//! let config = PoolConfig::new(|| Ok(String::from("conn")), |_conn| Ok(()))
//!     .with_minimum(2)
//!     .with_capacity(4);
//! let pool = Pool::new(config).unwrap();
//!
//! let conn = pool.acquire().unwrap();
//! assert_eq!(pool.len(), 1);
//! pool.release(conn).unwrap();
//! assert_eq!(pool.len(), 2);
//!
//! pool.shutdown();
//! ```

mod config;
mod errors;
mod metrics;
mod pool;

pub use config::{CreateFn, DestroyFn, PoolConfig};
pub use errors::{BoxError, PoolError, PoolResult};
pub use metrics::{MetricsExporter, PoolMetrics};
pub use pool::{Pool, PooledResource};
