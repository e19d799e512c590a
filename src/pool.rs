//! Core resource pool implementation

use crate::config::{CreateFn, DestroyFn, PoolConfig};
use crate::errors::{PoolError, PoolResult};
use crate::metrics::{MetricsExporter, MetricsTracker, PoolMetrics};

use crossbeam::queue::ArrayQueue;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

/// A resource paired with the moment it re-entered the idle buffer.
struct IdleEntry<T> {
    resource: T,
    returned_at: Instant,
}

impl<T> IdleEntry<T> {
    fn new(resource: T) -> Self {
        Self {
            resource,
            returned_at: Instant::now(),
        }
    }

    fn is_stale(&self, timeout: Option<Duration>) -> bool {
        timeout.is_some_and(|timeout| self.returned_at.elapsed() > timeout)
    }
}

type IdleBuffer<T> = Arc<ArrayQueue<IdleEntry<T>>>;

/// Bounded, thread-safe pool of reusable resources
///
/// Idle resources live in a bounded FIFO buffer; checked-out resources are
/// owned entirely by the caller until [`Pool::release`] or [`Pool::discard`].
/// `capacity` bounds idle storage only, never the number of live resources:
/// an acquire on an empty buffer falls through to the factory instead of
/// blocking.
pub struct Pool<T: Send> {
    /// `None` once the pool is shut down. The closed state and the buffer
    /// reference share this lock, which makes the shutdown swap atomic with
    /// respect to every other operation.
    idle: Mutex<Option<IdleBuffer<T>>>,
    create: CreateFn<T>,
    destroy: DestroyFn<T>,
    idle_timeout: Option<Duration>,
    capacity: usize,
    metrics: MetricsTracker,
}

impl<T: Send + 'static> Pool<T> {
    /// Create a pool, eagerly manufacturing `config.minimum` resources.
    ///
    /// Fails with [`PoolError::InvalidConfig`] on a zero capacity or a
    /// minimum above capacity. If any eager creation fails, every resource
    /// seeded so far is destroyed best-effort and the factory error is
    /// returned; no partial pool is handed out.
    pub fn new(config: PoolConfig<T>) -> PoolResult<Self> {
        if config.capacity == 0 {
            return Err(PoolError::InvalidConfig(
                "capacity must be greater than zero",
            ));
        }
        if config.minimum > config.capacity {
            return Err(PoolError::InvalidConfig("minimum exceeds capacity"));
        }

        let buffer = ArrayQueue::new(config.capacity);
        let metrics = MetricsTracker::new();

        for _ in 0..config.minimum {
            match (config.create)() {
                Ok(resource) => {
                    metrics.total_created.fetch_add(1, Ordering::Relaxed);
                    // minimum <= capacity, so the push cannot be rejected
                    let _ = buffer.push(IdleEntry::new(resource));
                }
                Err(err) => {
                    while let Some(entry) = buffer.pop() {
                        let _ = (config.destroy)(entry.resource);
                    }
                    return Err(PoolError::Factory(err));
                }
            }
        }

        Ok(Self {
            idle: Mutex::new(Some(Arc::new(buffer))),
            create: config.create,
            destroy: config.destroy,
            idle_timeout: config.idle_timeout,
            capacity: config.capacity,
            metrics,
        })
    }

    /// Take a resource out of the pool, manufacturing one if none is idle.
    ///
    /// Idle entries older than the configured idle timeout are destroyed and
    /// skipped rather than handed out; their destroy errors are not
    /// actionable for the acquiring caller and are only counted. The
    /// fallback-create path never blocks waiting for a slot.
    pub fn acquire(&self) -> PoolResult<T> {
        let buffer = self.idle_buffer().ok_or(PoolError::Closed)?;

        loop {
            match buffer.pop() {
                Some(entry) => {
                    if entry.is_stale(self.idle_timeout) {
                        self.metrics.stale_evictions.fetch_add(1, Ordering::Relaxed);
                        let _ = self.destroy_resource(entry.resource);
                        continue;
                    }
                    self.metrics.total_acquired.fetch_add(1, Ordering::Relaxed);
                    return Ok(entry.resource);
                }
                None => {
                    let resource = (self.create)().map_err(PoolError::Factory)?;
                    self.metrics.total_created.fetch_add(1, Ordering::Relaxed);
                    self.metrics.total_acquired.fetch_add(1, Ordering::Relaxed);
                    return Ok(resource);
                }
            }
        }
    }

    /// Return a resource to the idle buffer.
    ///
    /// A full buffer, or a pool that has been shut down, destroys the
    /// resource immediately instead of storing it; the caller is never
    /// blocked. Returns the destroy result on those paths.
    pub fn release(&self, resource: T) -> PoolResult<()> {
        let guard = self.idle.lock();
        match guard.as_ref() {
            Some(buffer) => {
                // Pushing under the lock keeps a racing shutdown from
                // stranding the resource in a swapped-out buffer. The push
                // itself is lock-free and O(1).
                match buffer.push(IdleEntry::new(resource)) {
                    Ok(()) => {
                        drop(guard);
                        self.metrics.total_released.fetch_add(1, Ordering::Relaxed);
                        Ok(())
                    }
                    Err(entry) => {
                        drop(guard);
                        self.metrics.overflow_discards.fetch_add(1, Ordering::Relaxed);
                        self.destroy_resource(entry.resource)
                    }
                }
            }
            None => {
                drop(guard);
                self.destroy_resource(resource)
            }
        }
    }

    /// Destroy a resource the caller judges unusable.
    ///
    /// The resource never re-enters the idle buffer. Choosing between
    /// `release` and `discard` is the caller's job; the pool cannot judge
    /// resource health itself.
    pub fn discard(&self, resource: T) -> PoolResult<()> {
        self.destroy_resource(resource)
    }

    /// Shut the pool down, destroying every idle resource.
    ///
    /// The buffer reference is swapped out under the lock, so no concurrent
    /// `acquire` or `release` can store into it afterwards. The drain is
    /// best-effort: one failing destroy never stops the rest, failures are
    /// counted in the metrics. Calling `shutdown` again is a no-op.
    pub fn shutdown(&self) {
        let buffer = self.idle.lock().take();

        let Some(buffer) = buffer else {
            return;
        };

        while let Some(entry) = buffer.pop() {
            let _ = self.destroy_resource(entry.resource);
        }
    }

    /// Number of idle resources currently held.
    ///
    /// Not a count of live resources; checked-out resources are not tracked.
    pub fn len(&self) -> usize {
        self.idle.lock().as_ref().map_or(0, |buffer| buffer.len())
    }

    /// Whether the idle buffer is currently empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of idle resources retained
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether `shutdown` has completed
    pub fn is_closed(&self) -> bool {
        self.idle.lock().is_none()
    }

    /// Take a resource wrapped in a guard that releases it on drop
    pub fn checkout(self: &Arc<Self>) -> PoolResult<PooledResource<T>> {
        let resource = self.acquire()?;
        Ok(PooledResource {
            resource: Some(resource),
            pool: Arc::clone(self),
        })
    }

    /// Get a snapshot of the pool's activity counters
    pub fn metrics(&self) -> PoolMetrics {
        self.metrics.get_metrics(self.len(), self.capacity)
    }

    /// Export metrics as a HashMap
    pub fn export_metrics(&self) -> HashMap<String, String> {
        self.metrics().export()
    }

    /// Export metrics in Prometheus format
    pub fn export_metrics_prometheus(
        &self,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        MetricsExporter::export_prometheus(&self.metrics(), pool_name, tags)
    }

    fn idle_buffer(&self) -> Option<IdleBuffer<T>> {
        self.idle.lock().as_ref().map(Arc::clone)
    }

    fn destroy_resource(&self, resource: T) -> PoolResult<()> {
        self.metrics.total_destroyed.fetch_add(1, Ordering::Relaxed);
        (self.destroy)(resource).map_err(|err| {
            self.metrics.destroy_failures.fetch_add(1, Ordering::Relaxed);
            PoolError::Destroy(err)
        })
    }
}

/// A checked-out resource that returns itself to the pool when dropped
pub struct PooledResource<T: Send + 'static> {
    resource: Option<T>,
    pool: Arc<Pool<T>>,
}

impl<T: Send + 'static> PooledResource<T> {
    /// Take the resource out without ever returning it to the pool
    pub fn detach(mut self) -> T {
        self.resource.take().expect("resource already taken")
    }

    /// Destroy the resource instead of returning it
    pub fn discard(mut self) -> PoolResult<()> {
        let resource = self.resource.take().expect("resource already taken");
        self.pool.discard(resource)
    }
}

impl<T: Send + 'static> Deref for PooledResource<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.resource.as_ref().expect("resource already taken")
    }
}

impl<T: Send + 'static> DerefMut for PooledResource<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.resource.as_mut().expect("resource already taken")
    }
}

impl<T: Send + 'static> Drop for PooledResource<T> {
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            // No caller to report a destroy failure to on this path; the
            // failure still shows up in the pool's metrics.
            let _ = self.pool.release(resource);
        }
    }
}
