// Metric sources: procfs for CPU ticks and interface counters, sysinfo for memory

mod linux;

use crate::error::SampleError;
use crate::models::{CpuIdentity, CpuTicks, InterfaceCounters, MemorySample};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use sysinfo::System;
use tracing::instrument;

/// Default procfs mount point.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Placeholder CPU name when nothing better can be detected.
pub const UNKNOWN_CPU_NAME: &str = "unknown";

/// Raw counters the collectors derive their metrics from.
///
/// Reads are blocking; collectors call them through [`read_blocking`] so no
/// async worker thread (and no state lock) is held while a read is in flight.
pub trait MetricSource: Send + Sync {
    /// Cumulative idle and total tick counters for the aggregate CPU.
    fn cpu_ticks(&self) -> Result<CpuTicks, SampleError>;

    /// Total and used physical memory in bytes.
    fn memory(&self) -> Result<MemorySample, SampleError>;

    /// Cumulative rx/tx byte counters for `interface`, or `None` if the
    /// interface is not listed.
    fn interface_counters(
        &self,
        interface: &str,
    ) -> Result<Option<InterfaceCounters>, SampleError>;

    /// CPU model name and logical core count. Never fails; falls back to
    /// [`UNKNOWN_CPU_NAME`] and one core.
    fn cpu_identity(&self) -> CpuIdentity;
}

/// Runs a blocking source read on the blocking pool.
pub(crate) async fn read_blocking<T, F>(
    source: &Arc<dyn MetricSource>,
    read: F,
) -> Result<T, SampleError>
where
    T: Send + 'static,
    F: FnOnce(&dyn MetricSource) -> Result<T, SampleError> + Send + 'static,
{
    let source = source.clone();
    tokio::task::spawn_blocking(move || read(source.as_ref()))
        .await
        .map_err(|e| SampleError::unavailable("source task", e))?
}

/// The local host: procfs files under `proc_root` plus sysinfo for memory.
pub struct HostSource {
    proc_root: PathBuf,
    sys: Mutex<System>,
}

impl Default for HostSource {
    fn default() -> Self {
        Self::new()
    }
}

impl HostSource {
    pub fn new() -> Self {
        Self::with_proc_root(DEFAULT_PROC_ROOT)
    }

    /// Reads procfs files relative to `proc_root` instead of `/proc`.
    pub fn with_proc_root(proc_root: impl AsRef<Path>) -> Self {
        Self {
            proc_root: proc_root.as_ref().to_path_buf(),
            sys: Mutex::new(System::new()),
        }
    }

    fn read_proc(&self, what: &'static str, file: &str) -> Result<String, SampleError> {
        let path = self.proc_root.join(file);
        std::fs::read_to_string(&path)
            .map_err(|e| SampleError::unavailable(what, format!("{}: {}", path.display(), e)))
    }
}

impl MetricSource for HostSource {
    #[instrument(skip(self), fields(source = "procfs", operation = "cpu_ticks"))]
    fn cpu_ticks(&self) -> Result<CpuTicks, SampleError> {
        let content = self.read_proc("cpu ticks", "stat")?;
        linux::parse_cpu_ticks(&content)
    }

    #[instrument(skip(self), fields(source = "sysinfo", operation = "memory"))]
    fn memory(&self) -> Result<MemorySample, SampleError> {
        let mut sys = self
            .sys
            .lock()
            .map_err(|e| SampleError::unavailable("memory", format!("sysinfo lock poisoned: {}", e)))?;
        sys.refresh_memory();

        let total = sys.total_memory();
        let used = total.saturating_sub(sys.available_memory());
        if total == 0 {
            return Err(SampleError::malformed("memory", "total memory reported as zero"));
        }
        Ok(MemorySample { total, used })
    }

    #[instrument(skip(self), fields(source = "procfs", operation = "interface_counters"))]
    fn interface_counters(
        &self,
        interface: &str,
    ) -> Result<Option<InterfaceCounters>, SampleError> {
        let content = self.read_proc("interface counters", "net/dev")?;
        linux::parse_net_dev(&content, interface)
    }

    #[instrument(skip(self), fields(source = "host", operation = "cpu_identity"))]
    fn cpu_identity(&self) -> CpuIdentity {
        let model = self
            .read_proc("cpu identity", "cpuinfo")
            .ok()
            .and_then(|content| linux::parse_cpu_model(&content));

        let Ok(mut sys) = self.sys.lock() else {
            return CpuIdentity {
                name: model.unwrap_or_else(|| UNKNOWN_CPU_NAME.into()),
                logical_cores: 1,
            };
        };
        sys.refresh_cpu_all();
        let name = model
            .or_else(|| {
                sys.cpus()
                    .first()
                    .map(|c| c.brand().trim().to_string())
                    .filter(|s| !s.is_empty() && s != "cpu0")
            })
            .unwrap_or_else(|| UNKNOWN_CPU_NAME.into());

        CpuIdentity {
            name,
            logical_cores: sys.cpus().len().max(1),
        }
    }
}
