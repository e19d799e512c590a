//! Metrics collection and export for resource pools

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Snapshot of a pool's activity counters
///
/// # Examples
///
/// ```
/// use respool::{Pool, PoolConfig};
///
/// let pool = Pool::new(PoolConfig::new(|| Ok(0u64), |_| Ok(())).with_minimum(2)).unwrap();
///
/// let res = pool.acquire().unwrap();
/// pool.release(res).unwrap();
///
/// let metrics = pool.metrics();
/// assert_eq!(metrics.total_created, 2);
/// assert_eq!(metrics.total_acquired, 1);
/// assert_eq!(metrics.idle_resources, 2);
/// ```
#[derive(Debug, Clone)]
pub struct PoolMetrics {
    /// Total resources manufactured by the factory (eager seeding plus
    /// on-demand overflow creation)
    pub total_created: usize,

    /// Total resources handed out to callers
    pub total_acquired: usize,

    /// Total resources stored back into the idle buffer
    pub total_released: usize,

    /// Total destroy invocations, successful or not
    pub total_destroyed: usize,

    /// Idle resources destroyed because they outlived the idle timeout
    pub stale_evictions: usize,

    /// Resources destroyed because the idle buffer was already full
    pub overflow_discards: usize,

    /// Destroy invocations that returned an error
    pub destroy_failures: usize,

    /// Resources currently idle in the pool
    pub idle_resources: usize,

    /// Maximum number of idle resources retained
    pub capacity: usize,

    /// Idle-buffer fill ratio (0.0 to 1.0)
    pub utilization: f64,
}

impl PoolMetrics {
    /// Export metrics as a HashMap
    pub fn export(&self) -> HashMap<String, String> {
        let mut metrics = HashMap::new();
        metrics.insert("total_created".to_string(), self.total_created.to_string());
        metrics.insert("total_acquired".to_string(), self.total_acquired.to_string());
        metrics.insert("total_released".to_string(), self.total_released.to_string());
        metrics.insert("total_destroyed".to_string(), self.total_destroyed.to_string());
        metrics.insert("stale_evictions".to_string(), self.stale_evictions.to_string());
        metrics.insert("overflow_discards".to_string(), self.overflow_discards.to_string());
        metrics.insert("destroy_failures".to_string(), self.destroy_failures.to_string());
        metrics.insert("idle_resources".to_string(), self.idle_resources.to_string());
        metrics.insert("capacity".to_string(), self.capacity.to_string());
        metrics.insert("utilization".to_string(), format!("{:.2}", self.utilization));
        metrics
    }
}

/// Metrics exporter for Prometheus format
pub struct MetricsExporter;

impl MetricsExporter {
    /// Export metrics in Prometheus exposition format
    ///
    /// # Examples
    ///
    /// ```
    /// use respool::{Pool, PoolConfig};
    /// use std::collections::HashMap;
    ///
    /// let pool = Pool::new(PoolConfig::new(|| Ok(0u64), |_| Ok(())).with_minimum(1)).unwrap();
    ///
    /// let mut tags = HashMap::new();
    /// tags.insert("service".to_string(), "api".to_string());
    ///
    /// let output = pool.export_metrics_prometheus("db_conns", Some(&tags));
    /// assert!(output.contains("respool_resources_idle"));
    /// assert!(output.contains("service=\"api\""));
    /// ```
    pub fn export_prometheus(
        metrics: &PoolMetrics,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        let mut output = String::new();
        let labels = Self::format_labels(pool_name, tags);

        // Gauge metrics
        output.push_str("# HELP respool_resources_idle Resources currently idle in the pool\n");
        output.push_str("# TYPE respool_resources_idle gauge\n");
        output.push_str(&format!("respool_resources_idle{{{}}} {}\n", labels, metrics.idle_resources));

        output.push_str("# HELP respool_utilization Idle-buffer fill ratio\n");
        output.push_str("# TYPE respool_utilization gauge\n");
        output.push_str(&format!("respool_utilization{{{}}} {:.2}\n", labels, metrics.utilization));

        // Counter metrics
        output.push_str("# HELP respool_resources_created_total Resources manufactured by the factory\n");
        output.push_str("# TYPE respool_resources_created_total counter\n");
        output.push_str(&format!("respool_resources_created_total{{{}}} {}\n", labels, metrics.total_created));

        output.push_str("# HELP respool_resources_acquired_total Resources handed out to callers\n");
        output.push_str("# TYPE respool_resources_acquired_total counter\n");
        output.push_str(&format!("respool_resources_acquired_total{{{}}} {}\n", labels, metrics.total_acquired));

        output.push_str("# HELP respool_resources_released_total Resources stored back into the pool\n");
        output.push_str("# TYPE respool_resources_released_total counter\n");
        output.push_str(&format!("respool_resources_released_total{{{}}} {}\n", labels, metrics.total_released));

        output.push_str("# HELP respool_resources_destroyed_total Destroy invocations\n");
        output.push_str("# TYPE respool_resources_destroyed_total counter\n");
        output.push_str(&format!("respool_resources_destroyed_total{{{}}} {}\n", labels, metrics.total_destroyed));

        output.push_str("# HELP respool_evictions_stale_total Idle resources destroyed as stale\n");
        output.push_str("# TYPE respool_evictions_stale_total counter\n");
        output.push_str(&format!("respool_evictions_stale_total{{{}}} {}\n", labels, metrics.stale_evictions));

        output.push_str("# HELP respool_discards_overflow_total Resources discarded on a full idle buffer\n");
        output.push_str("# TYPE respool_discards_overflow_total counter\n");
        output.push_str(&format!("respool_discards_overflow_total{{{}}} {}\n", labels, metrics.overflow_discards));

        output.push_str("# HELP respool_destroy_failures_total Destroy invocations that failed\n");
        output.push_str("# TYPE respool_destroy_failures_total counter\n");
        output.push_str(&format!("respool_destroy_failures_total{{{}}} {}\n", labels, metrics.destroy_failures));

        output
    }

    fn format_labels(pool_name: &str, tags: Option<&HashMap<String, String>>) -> String {
        let mut labels = vec![format!("pool=\"{}\"", pool_name)];

        if let Some(tags) = tags {
            for (key, value) in tags {
                labels.push(format!("{}=\"{}\"", key, value));
            }
        }

        labels.join(",")
    }
}

/// Internal metrics tracker
pub(crate) struct MetricsTracker {
    pub total_created: AtomicUsize,
    pub total_acquired: AtomicUsize,
    pub total_released: AtomicUsize,
    pub total_destroyed: AtomicUsize,
    pub stale_evictions: AtomicUsize,
    pub overflow_discards: AtomicUsize,
    pub destroy_failures: AtomicUsize,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self {
            total_created: AtomicUsize::new(0),
            total_acquired: AtomicUsize::new(0),
            total_released: AtomicUsize::new(0),
            total_destroyed: AtomicUsize::new(0),
            stale_evictions: AtomicUsize::new(0),
            overflow_discards: AtomicUsize::new(0),
            destroy_failures: AtomicUsize::new(0),
        }
    }

    pub fn get_metrics(&self, idle: usize, capacity: usize) -> PoolMetrics {
        let utilization = if capacity > 0 {
            idle as f64 / capacity as f64
        } else {
            0.0
        };

        PoolMetrics {
            total_created: self.total_created.load(Ordering::Relaxed),
            total_acquired: self.total_acquired.load(Ordering::Relaxed),
            total_released: self.total_released.load(Ordering::Relaxed),
            total_destroyed: self.total_destroyed.load(Ordering::Relaxed),
            stale_evictions: self.stale_evictions.load(Ordering::Relaxed),
            overflow_discards: self.overflow_discards.load(Ordering::Relaxed),
            destroy_failures: self.destroy_failures.load(Ordering::Relaxed),
            idle_resources: idle,
            capacity,
            utilization,
        }
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new()
    }
}
