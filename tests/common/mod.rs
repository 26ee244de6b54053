// Shared test helpers: scripted and steady metric sources

#![allow(dead_code)]

use hwsampler::SampleError;
use hwsampler::models::{CpuIdentity, CpuTicks, InterfaceCounters, MemorySample};
use hwsampler::source::MetricSource;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

pub fn identity() -> CpuIdentity {
    CpuIdentity {
        name: "Test CPU".into(),
        logical_cores: 4,
    }
}

/// Source that replays queued readings in order. `None` entries (and an
/// exhausted queue) read as `SourceUnavailable`.
#[derive(Default)]
pub struct ScriptedSource {
    cpu: Mutex<VecDeque<Option<CpuTicks>>>,
    memory: Mutex<VecDeque<Option<MemorySample>>>,
    counters: Mutex<VecDeque<Option<Option<InterfaceCounters>>>>,
}

fn next<T>(queue: &Mutex<VecDeque<Option<T>>>, what: &'static str) -> Result<T, SampleError> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .flatten()
        .ok_or_else(|| SampleError::unavailable(what, "scripted failure"))
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticks(self, idle: u64, total: u64) -> Self {
        self.cpu.lock().unwrap().push_back(Some(CpuTicks { idle, total }));
        self
    }

    pub fn ticks_failure(self) -> Self {
        self.cpu.lock().unwrap().push_back(None);
        self
    }

    pub fn memory(self, total: u64, used: u64) -> Self {
        self.memory
            .lock()
            .unwrap()
            .push_back(Some(MemorySample { total, used }));
        self
    }

    pub fn memory_failure(self) -> Self {
        self.memory.lock().unwrap().push_back(None);
        self
    }

    pub fn counters(self, rx_bytes: u64, tx_bytes: u64) -> Self {
        self.counters
            .lock()
            .unwrap()
            .push_back(Some(Some(InterfaceCounters { rx_bytes, tx_bytes })));
        self
    }

    pub fn interface_missing(self) -> Self {
        self.counters.lock().unwrap().push_back(Some(None));
        self
    }

    pub fn counters_failure(self) -> Self {
        self.counters.lock().unwrap().push_back(None);
        self
    }
}

impl MetricSource for ScriptedSource {
    fn cpu_ticks(&self) -> Result<CpuTicks, SampleError> {
        next(&self.cpu, "cpu ticks")
    }

    fn memory(&self) -> Result<MemorySample, SampleError> {
        next(&self.memory, "memory")
    }

    fn interface_counters(
        &self,
        _interface: &str,
    ) -> Result<Option<InterfaceCounters>, SampleError> {
        next(&self.counters, "interface counters")
    }

    fn cpu_identity(&self) -> CpuIdentity {
        identity()
    }
}

/// Source whose counters advance by a fixed step on every read:
/// CPU reads 75% busy, memory is 8 GiB / 2 GiB, rx grows 1000 bytes per read,
/// tx stays flat.
#[derive(Default)]
pub struct SteadySource {
    cpu_reads: AtomicU64,
    net_reads: AtomicU64,
}

pub const STEADY_TOTAL_MEMORY: u64 = 8 * 1024 * 1024 * 1024;
pub const STEADY_USED_MEMORY: u64 = 2 * 1024 * 1024 * 1024;

impl MetricSource for SteadySource {
    fn cpu_ticks(&self) -> Result<CpuTicks, SampleError> {
        let n = self.cpu_reads.fetch_add(1, Ordering::SeqCst);
        Ok(CpuTicks {
            idle: 1_000 + n * 10,
            total: 10_000 + n * 40,
        })
    }

    fn memory(&self) -> Result<MemorySample, SampleError> {
        Ok(MemorySample {
            total: STEADY_TOTAL_MEMORY,
            used: STEADY_USED_MEMORY,
        })
    }

    fn interface_counters(
        &self,
        _interface: &str,
    ) -> Result<Option<InterfaceCounters>, SampleError> {
        let n = self.net_reads.fetch_add(1, Ordering::SeqCst);
        Ok(Some(InterfaceCounters {
            rx_bytes: 50_000 + n * 1_000,
            tx_bytes: 7_000,
        }))
    }

    fn cpu_identity(&self) -> CpuIdentity {
        identity()
    }
}
