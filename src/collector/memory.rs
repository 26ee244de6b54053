// Total/used memory, overwritten each poll

use super::{Collector, ShutdownSignal};
use crate::error::SampleError;
use crate::source::{MetricSource, read_blocking};
use crate::state::SharedState;
use std::sync::Arc;
use tokio::time::Duration;

pub struct MemoryCollector {
    source: Arc<dyn MetricSource>,
    state: Arc<SharedState>,
    generation: u64,
    interval: Duration,
}

impl MemoryCollector {
    pub fn new(source: Arc<dyn MetricSource>, state: Arc<SharedState>, interval: Duration) -> Self {
        Self {
            source,
            generation: state.generation(),
            state,
            interval,
        }
    }
}

impl Collector for MemoryCollector {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn poll(&mut self, _shutdown: &mut ShutdownSignal) -> Result<(), SampleError> {
        let sample = read_blocking(&self.source, |s| s.memory()).await?;
        if sample.used > sample.total {
            return Err(SampleError::malformed(
                "memory",
                format!("used {} exceeds total {}", sample.used, sample.total),
            ));
        }
        if !self.state.set_memory(self.generation, sample.total, sample.used) {
            tracing::debug!("stale session; memory reading dropped");
            return Ok(());
        }
        tracing::debug!(
            total_bytes = sample.total,
            used_bytes = sample.used,
            "memory updated"
        );
        Ok(())
    }
}
