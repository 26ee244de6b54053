use serde::Deserialize;
use std::path::Path;
use tokio::time::Duration;

use crate::source::DEFAULT_PROC_ROOT;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sampler: SamplerConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Network interface whose throughput is sampled (e.g. "eth0").
    pub interface: String,
    pub cpu_interval_ms: u64,
    /// Gap between the two tick reads of one CPU poll; must be shorter than cpu_interval_ms.
    pub cpu_sample_gap_ms: u64,
    pub memory_interval_ms: u64,
    pub network_interval_ms: u64,
    pub proc_root: String,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interface: "eth0".into(),
            cpu_interval_ms: 10_000,
            cpu_sample_gap_ms: 3_000,
            memory_interval_ms: 10_000,
            network_interval_ms: 10_000,
            proc_root: DEFAULT_PROC_ROOT.into(),
        }
    }
}

impl SamplerConfig {
    pub fn cpu_interval(&self) -> Duration {
        Duration::from_millis(self.cpu_interval_ms)
    }

    pub fn cpu_sample_gap(&self) -> Duration {
        Duration::from_millis(self.cpu_sample_gap_ms)
    }

    pub fn memory_interval(&self) -> Duration {
        Duration::from_millis(self.memory_interval_ms)
    }

    pub fn network_interval(&self) -> Duration {
        Duration::from_millis(self.network_interval_ms)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.interface.is_empty(),
            "sampler.interface must be non-empty"
        );
        anyhow::ensure!(
            self.cpu_interval_ms > 0,
            "sampler.cpu_interval_ms must be > 0, got {}",
            self.cpu_interval_ms
        );
        anyhow::ensure!(
            self.cpu_sample_gap_ms > 0,
            "sampler.cpu_sample_gap_ms must be > 0, got {}",
            self.cpu_sample_gap_ms
        );
        anyhow::ensure!(
            self.cpu_sample_gap_ms < self.cpu_interval_ms,
            "sampler.cpu_sample_gap_ms ({}) must be shorter than sampler.cpu_interval_ms ({})",
            self.cpu_sample_gap_ms,
            self.cpu_interval_ms
        );
        anyhow::ensure!(
            self.memory_interval_ms > 0,
            "sampler.memory_interval_ms must be > 0, got {}",
            self.memory_interval_ms
        );
        anyhow::ensure!(
            self.network_interval_ms > 0,
            "sampler.network_interval_ms must be > 0, got {}",
            self.network_interval_ms
        );
        anyhow::ensure!(
            !self.proc_root.is_empty(),
            "sampler.proc_root must be non-empty"
        );
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// How often the binary prints a status line.
    pub refresh_secs: u64,
    pub format: OutputFormat,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            refresh_secs: 10,
            format: OutputFormat::Text,
        }
    }
}

impl AppConfig {
    /// Path from `CONFIG_FILE`, or `config.toml` in the working directory.
    pub fn path() -> String {
        std::env::var("CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into())
    }

    pub fn load() -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(Self::path())?;
        Self::load_from_str(&s)
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default() -> anyhow::Result<Self> {
        let path = Self::path();
        if !Path::new(&path).exists() {
            tracing::info!(path = %path, "config file not found; using defaults");
            return Ok(Self::default());
        }
        Self::load()
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.sampler.validate()?;
        anyhow::ensure!(
            self.display.refresh_secs > 0,
            "display.refresh_secs must be > 0, got {}",
            self.display.refresh_secs
        );
        Ok(())
    }
}
