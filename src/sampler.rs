// Sampler facade: owns the shared state, starts/stops the collectors, serves snapshots.

use crate::collector::{self, CpuCollector, MemoryCollector, NetworkCollector, ShutdownSignal};
use crate::config::SamplerConfig;
use crate::error::SamplerError;
use crate::models::Status;
use crate::source::{HostSource, MetricSource};
use crate::state::SharedState;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Default)]
struct Tasks {
    stop_tx: Option<watch::Sender<bool>>,
    handles: Vec<JoinHandle<()>>,
}

/// Background sampler for CPU, memory and network throughput.
///
/// `start` spawns three collectors on the current tokio runtime; `snapshot`
/// may be called from anywhere at any time and returns whatever was stored
/// last. Fields in one snapshot can come from different poll instants.
///
/// `stop` does not wait. A collector that is sleeping exits right away, one
/// that is mid-read exits at its next sleep boundary, so within one poll
/// interval at worst. Use `join` to wait for them.
pub struct Sampler {
    state: Arc<SharedState>,
    source: Arc<dyn MetricSource>,
    config: SamplerConfig,
    tasks: Mutex<Tasks>,
}

impl Sampler {
    /// Sampler over the local host (procfs under `config.proc_root`, sysinfo for memory).
    pub fn new(config: SamplerConfig) -> Self {
        let source = Arc::new(HostSource::with_proc_root(&config.proc_root));
        Self::with_source(source, config)
    }

    pub fn with_source(source: Arc<dyn MetricSource>, config: SamplerConfig) -> Self {
        Self {
            state: Arc::new(SharedState::new()),
            source,
            config,
            tasks: Mutex::new(Tasks::default()),
        }
    }

    fn tasks(&self) -> MutexGuard<'_, Tasks> {
        self.tasks.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Starts sampling `interface_name`. Must be called inside a tokio runtime.
    /// Fails with `AlreadyRunning` until `stop` has been called.
    pub fn start(&self, interface_name: &str) -> Result<(), SamplerError> {
        if interface_name.is_empty() {
            return Err(SamplerError::EmptyInterface);
        }
        let handle = tokio::runtime::Handle::try_current().map_err(|_| SamplerError::NoRuntime)?;

        if self.state.is_running() {
            return Err(SamplerError::AlreadyRunning(self.state.interface_name()));
        }
        let identity = self.source.cpu_identity();

        let mut tasks = self.tasks();
        if self
            .state
            .begin(interface_name, &identity.name, identity.logical_cores)
            .is_none()
        {
            return Err(SamplerError::AlreadyRunning(self.state.interface_name()));
        }

        let (stop_tx, shutdown) = ShutdownSignal::channel();
        let cpu = CpuCollector::new(
            self.source.clone(),
            self.state.clone(),
            self.config.cpu_interval(),
            self.config.cpu_sample_gap(),
        );
        let memory = MemoryCollector::new(
            self.source.clone(),
            self.state.clone(),
            self.config.memory_interval(),
        );
        let network = NetworkCollector::new(
            self.source.clone(),
            self.state.clone(),
            interface_name,
            self.config.network_interval(),
        );
        tasks.handles.retain(|h| !h.is_finished());
        tasks
            .handles
            .push(collector::spawn(&handle, cpu, shutdown.clone()));
        tasks
            .handles
            .push(collector::spawn(&handle, memory, shutdown.clone()));
        tasks
            .handles
            .push(collector::spawn(&handle, network, shutdown));
        tasks.stop_tx = Some(stop_tx);

        tracing::info!(
            interface = interface_name,
            cpu_name = %identity.name,
            cpu_cores = identity.logical_cores,
            "sampler started"
        );
        Ok(())
    }

    /// Requests the collectors to stop and returns immediately. No-op when not running.
    pub fn stop(&self) {
        let mut tasks = self.tasks();
        let was_running = self.state.end();
        if let Some(stop_tx) = tasks.stop_tx.take() {
            // Err only means every collector has already exited.
            let _ = stop_tx.send(true);
        }
        if was_running {
            tracing::info!("sampler stopping");
        }
    }

    /// Waits for every collector task spawned so far to exit.
    /// Only returns once `stop` has been called (or the runtime shuts down).
    pub async fn join(&self) {
        let handles = std::mem::take(&mut self.tasks().handles);
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "collector task ended abnormally");
            }
        }
        tracing::debug!("all collectors stopped");
    }

    /// Latest stored values. Never blocks on collector progress.
    pub fn snapshot(&self) -> Status {
        self.state.snapshot()
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.stop();
    }
}
