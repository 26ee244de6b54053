// HostSource against a fake procfs tree

use hwsampler::SampleError;
use hwsampler::models::{CpuTicks, InterfaceCounters};
use hwsampler::source::{HostSource, MetricSource};
use tempfile::TempDir;

const STAT: &str = "cpu  200 0 100 700 0 0 0 0 0 0\ncpu0 200 0 100 700 0 0 0 0 0 0\n";

const NET_DEV: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo:     100       1    0    0    0     0          0         0      100       1    0    0    0     0       0          0
  eth0:    2250      10    0    0    0     0          0         0     2000      10    0    0    0     0       0          0
";

fn fake_proc() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir(dir.path().join("net")).unwrap();
    std::fs::write(dir.path().join("stat"), STAT).unwrap();
    std::fs::write(dir.path().join("net/dev"), NET_DEV).unwrap();
    std::fs::write(
        dir.path().join("cpuinfo"),
        "processor\t: 0\nmodel name\t: Fake Processor 3000\n",
    )
    .unwrap();
    dir
}

#[test]
fn test_cpu_ticks_from_proc_stat() {
    let dir = fake_proc();
    let source = HostSource::with_proc_root(dir.path());
    assert_eq!(
        source.cpu_ticks().unwrap(),
        CpuTicks {
            idle: 700,
            total: 1000
        }
    );
}

#[test]
fn test_interface_counters_from_net_dev() {
    let dir = fake_proc();
    let source = HostSource::with_proc_root(dir.path());
    assert_eq!(
        source.interface_counters("eth0").unwrap(),
        Some(InterfaceCounters {
            rx_bytes: 2250,
            tx_bytes: 2000
        })
    );
    assert_eq!(source.interface_counters("eth9").unwrap(), None);
}

#[test]
fn test_missing_files_are_source_unavailable() {
    let dir = TempDir::new().unwrap();
    let source = HostSource::with_proc_root(dir.path());
    assert!(matches!(
        source.cpu_ticks().unwrap_err(),
        SampleError::SourceUnavailable { .. }
    ));
    assert!(matches!(
        source.interface_counters("eth0").unwrap_err(),
        SampleError::SourceUnavailable { .. }
    ));
}

#[test]
fn test_cpu_identity_prefers_cpuinfo_model_name() {
    let dir = fake_proc();
    let identity = HostSource::with_proc_root(dir.path()).cpu_identity();
    assert_eq!(identity.name, "Fake Processor 3000");
    assert!(identity.logical_cores >= 1);
}

#[test]
fn test_cpu_identity_without_cpuinfo_never_empty() {
    let dir = TempDir::new().unwrap();
    let identity = HostSource::with_proc_root(dir.path()).cpu_identity();
    assert!(!identity.name.is_empty());
    assert!(identity.logical_cores >= 1);
}

#[test]
fn test_host_memory_is_consistent() {
    // Skip quietly where the platform exposes no memory figures.
    let Ok(sample) = HostSource::new().memory() else {
        return;
    };
    assert!(sample.total > 0);
    assert!(sample.used <= sample.total);
}
