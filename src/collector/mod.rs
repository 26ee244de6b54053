// Periodic collectors: one task per metric family, cancelled through a shared watch channel

mod cpu;
mod memory;
mod network;

pub use cpu::{CpuCollector, cpu_usage};
pub use memory::MemoryCollector;
pub use network::{NetworkCollector, RateTracker, RateUpdate, bits_per_second};

use crate::error::SampleError;
use std::future::Future;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::Instrument;

/// One metric family sampled on a fixed period.
///
/// Implementations capture the state generation when they are built; once a
/// newer session begins, their writes are dropped.
pub trait Collector: Send + 'static {
    /// Short name used in log fields ("cpu", "memory", "network").
    fn name(&self) -> &'static str;

    /// Sleep between the end of one poll and the start of the next.
    fn interval(&self) -> Duration;

    /// Takes one reading and writes the derived metric into shared state.
    /// On error nothing has been written.
    fn poll(
        &mut self,
        shutdown: &mut ShutdownSignal,
    ) -> impl Future<Output = Result<(), SampleError>> + Send;
}

/// Cancellation token handed to every collector task.
///
/// Checked at each sleep boundary: a sleeping collector wakes as soon as stop
/// is signalled, a polling one finishes its current read first.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Returns the sender that stops every signal cloned from the returned one.
    pub fn channel() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self { rx })
    }

    /// True once stop was sent or the sender was dropped.
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Sleeps for `period`. Returns false if stop was signalled before or
    /// during the sleep.
    pub async fn sleep(&mut self, period: Duration) -> bool {
        if self.is_stopped() {
            return false;
        }
        let slept = tokio::select! {
            _ = tokio::time::sleep(period) => true,
            _ = self.rx.wait_for(|stopped| *stopped) => false,
        };
        slept && !self.is_stopped()
    }
}

/// Spawns `collector` on `handle`. The task sleeps, polls, and repeats until
/// `shutdown` fires; poll failures are logged and retried next cycle.
pub fn spawn<C: Collector>(
    handle: &tokio::runtime::Handle,
    collector: C,
    shutdown: ShutdownSignal,
) -> JoinHandle<()> {
    let span = tracing::debug_span!(
        "collector",
        collector = collector.name(),
        interval_ms = collector.interval().as_millis() as u64
    );
    handle.spawn(run(collector, shutdown).instrument(span))
}

async fn run<C: Collector>(mut collector: C, mut shutdown: ShutdownSignal) {
    let name = collector.name();
    tracing::debug!(collector = name, "collector started");

    while shutdown.sleep(collector.interval()).await {
        match collector.poll(&mut shutdown).await {
            Ok(()) => {}
            Err(e @ SampleError::DegenerateComputation(_)) => {
                tracing::debug!(error = %e, collector = name, "poll skipped; keeping previous value");
            }
            Err(e) => {
                tracing::warn!(error = %e, collector = name, "poll failed; keeping previous value");
            }
        }
    }

    tracing::debug!(collector = name, "collector stopped");
}
