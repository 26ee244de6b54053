// Interface throughput from cumulative byte counters

use super::{Collector, ShutdownSignal};
use crate::error::SampleError;
use crate::models::InterfaceCounters;
use crate::source::{MetricSource, read_blocking};
use crate::state::SharedState;
use std::sync::Arc;
use tokio::time::Duration;

/// `8 * (current - previous) / interval` in bits per second, or `None` when the
/// counter went backwards (interface reset or wrap). Saturates at `u64::MAX`.
pub fn bits_per_second(previous: u64, current: u64, interval: Duration) -> Option<u64> {
    let delta = current.checked_sub(previous)?;
    let millis = interval.as_millis().max(1);
    let bps = u128::from(delta) * 8 * 1000 / millis;
    Some(u64::try_from(bps).unwrap_or(u64::MAX))
}

/// Rates derived from one observation; `None` means "leave the stored rate".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateUpdate {
    pub rx_bps: Option<u64>,
    pub tx_bps: Option<u64>,
}

impl RateUpdate {
    pub fn is_empty(&self) -> bool {
        self.rx_bps.is_none() && self.tx_bps.is_none()
    }
}

/// Previous counters for one interface, private to the network collector.
#[derive(Debug, Clone)]
pub struct RateTracker {
    previous: Option<InterfaceCounters>,
    interval: Duration,
}

impl RateTracker {
    /// Rates are computed over the nominal `interval`, not measured wall time.
    pub fn new(interval: Duration) -> Self {
        Self {
            previous: None,
            interval,
        }
    }

    /// Records `current` and returns rates against the previous observation.
    /// The first observation yields no rates.
    pub fn observe(&mut self, current: InterfaceCounters) -> RateUpdate {
        let update = match self.previous {
            None => RateUpdate::default(),
            Some(prev) => RateUpdate {
                rx_bps: bits_per_second(prev.rx_bytes, current.rx_bytes, self.interval),
                tx_bps: bits_per_second(prev.tx_bytes, current.tx_bytes, self.interval),
            },
        };
        self.previous = Some(current);
        update
    }
}

pub struct NetworkCollector {
    source: Arc<dyn MetricSource>,
    state: Arc<SharedState>,
    generation: u64,
    interface: String,
    interval: Duration,
    tracker: RateTracker,
}

impl NetworkCollector {
    pub fn new(
        source: Arc<dyn MetricSource>,
        state: Arc<SharedState>,
        interface: impl Into<String>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            generation: state.generation(),
            state,
            interface: interface.into(),
            interval,
            tracker: RateTracker::new(interval),
        }
    }
}

impl Collector for NetworkCollector {
    fn name(&self) -> &'static str {
        "network"
    }

    fn interval(&self) -> Duration {
        self.interval
    }

    async fn poll(&mut self, _shutdown: &mut ShutdownSignal) -> Result<(), SampleError> {
        let interface = self.interface.clone();
        let counters = read_blocking(&self.source, move |s| s.interface_counters(&interface)).await?;

        let Some(counters) = counters else {
            tracing::debug!(interface = %self.interface, "interface not listed; rates unchanged");
            return Ok(());
        };

        let update = self.tracker.observe(counters);
        if update.is_empty() {
            tracing::debug!(
                interface = %self.interface,
                rx_bytes = counters.rx_bytes,
                tx_bytes = counters.tx_bytes,
                "no rate computed this cycle"
            );
            return Ok(());
        }
        if !self
            .state
            .set_network_rates(self.generation, update.rx_bps, update.tx_bps)
        {
            tracing::debug!("stale session; network rates dropped");
            return Ok(());
        }
        tracing::debug!(
            interface = %self.interface,
            rx_bps = ?update.rx_bps,
            tx_bps = ?update.tx_bps,
            "network rates updated"
        );
        Ok(())
    }
}
