// Point-in-time copy of the sampler's shared state

use serde::Serialize;

/// Latest known metric values, as returned by `Sampler::snapshot`.
///
/// All numeric fields are zero until the owning collector has completed its
/// first cycle; a zeroed field means "not yet warmed up", not "idle".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub cpu_name: String,
    pub cpu_core_count: usize,
    pub interface_name: String,
    pub total_memory_bytes: u64,
    pub used_memory_bytes: u64,
    pub cpu_usage_percent: f64,
    pub rx_bits_per_second: u64,
    pub tx_bits_per_second: u64,
    pub is_running: bool,
}

impl Status {
    /// Used memory as a percentage of total, or `None` before the first memory poll.
    pub fn memory_usage_percent(&self) -> Option<f64> {
        if self.total_memory_bytes == 0 {
            return None;
        }
        Some(self.used_memory_bytes as f64 / self.total_memory_bytes as f64 * 100.0)
    }

    /// True once the memory collector has stored a reading.
    pub fn is_warmed_up(&self) -> bool {
        self.total_memory_bytes > 0
    }
}
