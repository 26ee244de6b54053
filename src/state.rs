// Shared sampler state: one lock-guarded record written by the collectors

use crate::models::Status;
use crate::source::UNKNOWN_CPU_NAME;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug)]
struct Inner {
    interface_name: String,
    cpu_core_count: usize,
    cpu_name: String,
    cpu_usage_percent: f64,
    total_memory_bytes: u64,
    used_memory_bytes: u64,
    rx_bits_per_second: u64,
    tx_bits_per_second: u64,
    is_running: bool,
    generation: u64,
}

/// Latest derived metrics.
///
/// Every accessor takes the lock for one short critical section; each
/// collector writes all of its fields in a single call so a snapshot never
/// sees half of a poll's result.
///
/// Writes carry the generation the collector was created in. `begin` starts a
/// new generation, so a collector left over from an earlier session cannot
/// write into the current one.
#[derive(Debug)]
pub struct SharedState {
    inner: Mutex<Inner>,
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                interface_name: String::new(),
                cpu_core_count: 0,
                cpu_name: UNKNOWN_CPU_NAME.into(),
                cpu_usage_percent: 0.0,
                total_memory_bytes: 0,
                used_memory_bytes: 0,
                rx_bits_per_second: 0,
                tx_bits_per_second: 0,
                is_running: false,
                generation: 0,
            }),
        }
    }

    // Collectors never panic while holding the guard, so a poisoned lock
    // still holds a consistent record.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Marks the state running, records the start-time identity fields and
    /// zeroes every metric. Returns the new generation, or `None` (changing
    /// nothing) if it was already running.
    pub fn begin(&self, interface_name: &str, cpu_name: &str, cpu_core_count: usize) -> Option<u64> {
        let mut s = self.lock();
        if s.is_running {
            return None;
        }
        s.is_running = true;
        s.generation += 1;
        s.interface_name = interface_name.to_string();
        s.cpu_name = cpu_name.to_string();
        s.cpu_core_count = cpu_core_count;
        s.cpu_usage_percent = 0.0;
        s.total_memory_bytes = 0;
        s.used_memory_bytes = 0;
        s.rx_bits_per_second = 0;
        s.tx_bits_per_second = 0;
        Some(s.generation)
    }

    /// Clears the running flag. Returns whether it was set.
    pub fn end(&self) -> bool {
        std::mem::replace(&mut self.lock().is_running, false)
    }

    pub fn is_running(&self) -> bool {
        self.lock().is_running
    }

    pub fn interface_name(&self) -> String {
        self.lock().interface_name.clone()
    }

    /// Generation of the current (or most recent) session.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    // Each setter returns false when the write was dropped as stale.

    pub fn set_cpu_usage(&self, generation: u64, percent: f64) -> bool {
        let mut s = self.lock();
        if s.generation != generation {
            return false;
        }
        s.cpu_usage_percent = percent;
        true
    }

    pub fn set_memory(&self, generation: u64, total_bytes: u64, used_bytes: u64) -> bool {
        let mut s = self.lock();
        if s.generation != generation {
            return false;
        }
        s.total_memory_bytes = total_bytes;
        s.used_memory_bytes = used_bytes;
        true
    }

    /// Stores network rates; a `None` direction keeps its previous rate.
    pub fn set_network_rates(&self, generation: u64, rx_bps: Option<u64>, tx_bps: Option<u64>) -> bool {
        let mut s = self.lock();
        if s.generation != generation {
            return false;
        }
        if let Some(rx) = rx_bps {
            s.rx_bits_per_second = rx;
        }
        if let Some(tx) = tx_bps {
            s.tx_bits_per_second = tx;
        }
        true
    }

    pub fn snapshot(&self) -> Status {
        let s = self.lock();
        Status {
            cpu_name: s.cpu_name.clone(),
            cpu_core_count: s.cpu_core_count,
            interface_name: s.interface_name.clone(),
            total_memory_bytes: s.total_memory_bytes,
            used_memory_bytes: s.used_memory_bytes,
            cpu_usage_percent: s.cpu_usage_percent,
            rx_bits_per_second: s.rx_bits_per_second,
            tx_bits_per_second: s.tx_bits_per_second,
            is_running: s.is_running,
        }
    }
}
