// Domain models: raw samples and the published status

mod sample;
mod status;

pub use sample::{CpuIdentity, CpuTicks, InterfaceCounters, MemorySample};
pub use status::Status;
