//! Pool configuration options

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::BoxError;

/// Factory callback: manufactures one new resource or fails.
pub type CreateFn<T> = Arc<dyn Fn() -> Result<T, BoxError> + Send + Sync>;

/// Destroyer callback: permanently releases one resource. The pool calls it
/// at most once per resource instance.
pub type DestroyFn<T> = Arc<dyn Fn(T) -> Result<(), BoxError> + Send + Sync>;

/// Configuration for pool behavior
///
/// # Examples
///
/// ```
/// use respool::PoolConfig;
/// use std::time::Duration;
///
/// let config = PoolConfig::new(|| Ok(vec![0u8; 1024]), |_buf| Ok(()))
///     .with_minimum(4)
///     .with_capacity(16)
///     .with_idle_timeout(Duration::from_secs(300));
///
/// assert_eq!(config.minimum, 4);
/// assert_eq!(config.capacity, 16);
/// ```
pub struct PoolConfig<T> {
    /// Number of resources eagerly created at construction
    pub minimum: usize,

    /// Maximum number of idle resources retained by the pool
    pub capacity: usize,

    /// Duration after which an idle resource is considered stale.
    /// `None` means resources never expire.
    pub idle_timeout: Option<Duration>,

    pub(crate) create: CreateFn<T>,
    pub(crate) destroy: DestroyFn<T>,
}

impl<T> PoolConfig<T> {
    /// Create a configuration from the two resource callbacks, with no eager
    /// resources, a capacity of 16 and no idle expiry.
    pub fn new<C, D>(create: C, destroy: D) -> Self
    where
        C: Fn() -> Result<T, BoxError> + Send + Sync + 'static,
        D: Fn(T) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self {
            minimum: 0,
            capacity: 16,
            idle_timeout: None,
            create: Arc::new(create),
            destroy: Arc::new(destroy),
        }
    }

    /// Set the number of resources created eagerly at construction
    pub fn with_minimum(mut self, minimum: usize) -> Self {
        self.minimum = minimum;
        self
    }

    /// Set the maximum number of idle resources retained
    ///
    /// # Examples
    ///
    /// ```
    /// use respool::PoolConfig;
    ///
    /// let config = PoolConfig::new(|| Ok(0u64), |_| Ok(())).with_capacity(50);
    /// assert_eq!(config.capacity, 50);
    /// ```
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the idle timeout. A zero duration disables expiry, same as never
    /// calling this method.
    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = if timeout.is_zero() {
            None
        } else {
            Some(timeout)
        };
        self
    }
}

impl<T> Clone for PoolConfig<T> {
    fn clone(&self) -> Self {
        Self {
            minimum: self.minimum,
            capacity: self.capacity,
            idle_timeout: self.idle_timeout,
            create: Arc::clone(&self.create),
            destroy: Arc::clone(&self.destroy),
        }
    }
}

impl<T> fmt::Debug for PoolConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolConfig")
            .field("minimum", &self.minimum)
            .field("capacity", &self.capacity)
            .field("idle_timeout", &self.idle_timeout)
            .finish_non_exhaustive()
    }
}
