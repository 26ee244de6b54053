// Background host sampler: CPU utilization, memory usage and interface throughput

pub mod collector;
pub mod config;
pub mod error;
pub mod models;
pub mod sampler;
pub mod source;
pub mod state;
pub mod version;

pub use error::{SampleError, SamplerError};
pub use models::Status;
pub use sampler::Sampler;
