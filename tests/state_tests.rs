// Shared state: baseline, partial network updates, consistency under concurrent writes

use hwsampler::state::SharedState;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[test]
fn test_new_state_is_zeroed_and_stopped() {
    let status = SharedState::new().snapshot();
    assert_eq!(status.cpu_name, "unknown");
    assert_eq!(status.cpu_core_count, 0);
    assert_eq!(status.interface_name, "");
    assert_eq!(status.total_memory_bytes, 0);
    assert_eq!(status.used_memory_bytes, 0);
    assert_eq!(status.cpu_usage_percent, 0.0);
    assert_eq!(status.rx_bits_per_second, 0);
    assert_eq!(status.tx_bits_per_second, 0);
    assert!(!status.is_running);
}

#[test]
fn test_network_rates_update_per_direction() {
    let state = SharedState::new();
    let generation = state.generation();
    state.set_network_rates(generation, Some(100), Some(200));
    state.set_network_rates(generation, None, Some(300));
    let status = state.snapshot();
    assert_eq!(status.rx_bits_per_second, 100);
    assert_eq!(status.tx_bits_per_second, 300);
}

#[test]
fn test_snapshots_never_observe_torn_memory_writes() {
    let state = Arc::new(SharedState::new());
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let state = state.clone();
        let done = done.clone();
        std::thread::spawn(move || {
            let generation = state.generation();
            for n in 1..=20_000u64 {
                state.set_memory(generation, n * 2, n);
                state.set_network_rates(generation, Some(n), Some(n));
            }
            done.store(true, Ordering::SeqCst);
        })
    };

    let mut reads = 0u64;
    while !done.load(Ordering::SeqCst) || reads == 0 {
        let status = state.snapshot();
        assert_eq!(status.total_memory_bytes, status.used_memory_bytes * 2);
        assert_eq!(status.rx_bits_per_second, status.tx_bits_per_second);
        reads += 1;
    }
    writer.join().unwrap();

    let status = state.snapshot();
    assert_eq!(status.used_memory_bytes, 20_000);
}

#[test]
fn test_begin_zeroes_metrics_from_previous_session() {
    let state = SharedState::new();
    let first = state.begin("eth0", "Test CPU", 4).unwrap();
    assert!(state.set_cpu_usage(first, 75.0));
    assert!(state.set_memory(first, 8192, 2048));
    assert!(state.set_network_rates(first, Some(400_000), Some(1_000)));
    assert!(state.end());

    let second = state.begin("eth1", "Test CPU", 4).unwrap();
    assert_ne!(first, second);
    let status = state.snapshot();
    assert_eq!(status.interface_name, "eth1");
    assert_eq!(status.cpu_usage_percent, 0.0);
    assert_eq!((status.total_memory_bytes, status.used_memory_bytes), (0, 0));
    assert_eq!((status.rx_bits_per_second, status.tx_bits_per_second), (0, 0));
}

#[test]
fn test_writes_from_previous_session_are_dropped() {
    let state = SharedState::new();
    let first = state.begin("eth0", "Test CPU", 4).unwrap();
    state.end();
    let second = state.begin("eth0", "Test CPU", 4).unwrap();

    assert!(!state.set_cpu_usage(first, 75.0));
    assert!(!state.set_memory(first, 8192, 2048));
    assert!(!state.set_network_rates(first, Some(1), Some(1)));
    let status = state.snapshot();
    assert_eq!(status.cpu_usage_percent, 0.0);
    assert_eq!(status.total_memory_bytes, 0);
    assert_eq!(status.rx_bits_per_second, 0);

    assert!(state.set_memory(second, 8192, 2048));
    assert_eq!(state.snapshot().total_memory_bytes, 8192);
}

#[test]
fn test_begin_while_running_changes_nothing() {
    let state = SharedState::new();
    let generation = state.begin("eth0", "Test CPU", 4).unwrap();
    state.set_memory(generation, 8192, 2048);
    assert_eq!(state.begin("eth1", "Other", 8), None);
    let status = state.snapshot();
    assert_eq!(status.interface_name, "eth0");
    assert_eq!(status.total_memory_bytes, 8192);
    assert_eq!(state.generation(), generation);
}
