// Raw readings returned by a MetricSource

/// Cumulative tick counters for the aggregate CPU.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuTicks {
    pub idle: u64,
    pub total: u64,
}

/// System-wide physical memory, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemorySample {
    pub total: u64,
    pub used: u64,
}

/// Cumulative byte counters for one network interface since boot or reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterfaceCounters {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
}

/// Static CPU identity, read once when sampling starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuIdentity {
    pub name: String,
    pub logical_cores: usize,
}
