use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread;
use std::time::Duration;

use tracing::debug;

use quiver_core::models::ResourceUsage;
use quiver_core::traits::IResourceProbe;

/// Holds the latest resource snapshot and refreshes it periodically,
/// independent of request processing. Readers never block on the probe.
pub struct ResourceMonitor {
    probe: Arc<dyn IResourceProbe>,
    latest: Arc<RwLock<ResourceUsage>>,
    running: Arc<AtomicBool>,
    refresher: Mutex<Option<thread::JoinHandle<()>>>,
}

impl ResourceMonitor {
    /// Create a monitor and take an initial sample.
    pub fn new(probe: Arc<dyn IResourceProbe>) -> Self {
        let initial = probe.current_usage();
        Self {
            probe,
            latest: Arc::new(RwLock::new(initial)),
            running: Arc::new(AtomicBool::new(false)),
            refresher: Mutex::new(None),
        }
    }

    /// The latest snapshot. Cheap; safe to call per stage.
    pub fn snapshot(&self) -> ResourceUsage {
        *self.latest.read().expect("resource snapshot lock poisoned")
    }

    /// Sample the probe once and publish the result.
    pub fn refresh(&self) {
        let usage = self.probe.current_usage();
        debug!(
            cpu = usage.cpu_percent,
            memory = usage.memory_percent,
            gpu = usage.gpu_percent,
            "resource snapshot refreshed"
        );
        *self.latest.write().expect("resource snapshot lock poisoned") = usage;
    }

    /// Start the background refresher. Idempotent.
    pub fn start(&self, interval: Duration) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        let probe = Arc::clone(&self.probe);
        let latest = Arc::clone(&self.latest);
        let running = Arc::clone(&self.running);
        let handle = thread::spawn(move || {
            while running.load(Ordering::SeqCst) {
                let usage = probe.current_usage();
                *latest.write().expect("resource snapshot lock poisoned") = usage;
                thread::sleep(interval);
            }
        });
        *self.refresher.lock().expect("refresher handle lock poisoned") = Some(handle);
    }

    /// Stop the background refresher and wait for it to exit.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self
            .refresher
            .lock()
            .expect("refresher handle lock poisoned")
            .take()
        {
            let _ = handle.join();
        }
    }
}

impl Drop for ResourceMonitor {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU64;

    struct CountingProbe {
        calls: AtomicU64,
        cpu: f64,
    }

    impl IResourceProbe for CountingProbe {
        fn current_usage(&self) -> ResourceUsage {
            self.calls.fetch_add(1, Ordering::Relaxed);
            ResourceUsage {
                cpu_percent: self.cpu,
                ..ResourceUsage::default()
            }
        }
    }

    #[test]
    fn snapshot_reflects_initial_sample() {
        let monitor = ResourceMonitor::new(Arc::new(CountingProbe {
            calls: AtomicU64::new(0),
            cpu: 42.0,
        }));
        assert!((monitor.snapshot().cpu_percent - 42.0).abs() < 1e-9);
    }

    #[test]
    fn refresh_publishes_new_sample() {
        let probe = Arc::new(CountingProbe {
            calls: AtomicU64::new(0),
            cpu: 10.0,
        });
        let monitor = ResourceMonitor::new(Arc::clone(&probe) as Arc<dyn IResourceProbe>);
        monitor.refresh();
        assert!(probe.calls.load(Ordering::Relaxed) >= 2);
    }

    #[test]
    fn background_refresher_samples_and_stops() {
        let probe = Arc::new(CountingProbe {
            calls: AtomicU64::new(0),
            cpu: 10.0,
        });
        let monitor = ResourceMonitor::new(Arc::clone(&probe) as Arc<dyn IResourceProbe>);
        monitor.start(Duration::from_millis(5));
        thread::sleep(Duration::from_millis(40));
        monitor.stop();
        let after_stop = probe.calls.load(Ordering::Relaxed);
        assert!(after_stop >= 2);
        thread::sleep(Duration::from_millis(20));
        // No samples after stop beyond at most one in-flight iteration.
        assert!(probe.calls.load(Ordering::Relaxed) <= after_stop + 1);
    }
}
