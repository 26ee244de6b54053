// CPU utilization from two tick-counter samples taken a short gap apart

use super::{Collector, ShutdownSignal};
use crate::error::SampleError;
use crate::models::CpuTicks;
use crate::source::{MetricSource, read_blocking};
use crate::state::SharedState;
use std::sync::Arc;
use tokio::time::Duration;

/// Percentage of non-idle ticks between `before` and `after`:
/// `100 * (totalDelta - idleDelta) / totalDelta`.
///
/// Not clamped; an idle delta larger than the total delta gives a negative
/// value. Fails when no ticks elapsed or a counter went backwards.
pub fn cpu_usage(before: CpuTicks, after: CpuTicks) -> Result<f64, SampleError> {
    let (Some(total_delta), Some(idle_delta)) = (
        after.total.checked_sub(before.total),
        after.idle.checked_sub(before.idle),
    ) else {
        return Err(SampleError::DegenerateComputation(
            "cpu tick counters went backwards",
        ));
    };
    if total_delta == 0 {
        return Err(SampleError::DegenerateComputation(
            "no cpu ticks elapsed between samples",
        ));
    }
    let total = total_delta as f64;
    Ok(100.0 * (total - idle_delta as f64) / total)
}

pub struct CpuCollector {
    source: Arc<dyn MetricSource>,
    state: Arc<SharedState>,
    generation: u64,
    interval: Duration,
    sample_gap: Duration,
}

impl CpuCollector {
    /// `sample_gap` is the delay between the two tick reads of one poll.
    pub fn new(
        source: Arc<dyn MetricSource>,
        state: Arc<SharedState>,
        interval: Duration,
        sample_gap: Duration,
    ) -> Self {
        Self {
            source,
            generation: state.generation(),
            state,
            interval,
            sample_gap,
        }
    }
}

impl Collector for CpuCollector {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn poll(&mut self, shutdown: &mut ShutdownSignal) -> Result<(), SampleError> {
        let before = read_blocking(&self.source, |s| s.cpu_ticks()).await?;
        if !shutdown.sleep(self.sample_gap).await {
            return Ok(());
        }
        let after = read_blocking(&self.source, |s| s.cpu_ticks()).await?;

        let usage = cpu_usage(before, after)?;
        if !self.state.set_cpu_usage(self.generation, usage) {
            tracing::debug!("stale session; cpu usage dropped");
            return Ok(());
        }
        tracing::debug!(usage_percent = usage, "cpu usage updated");
        Ok(())
    }
}
