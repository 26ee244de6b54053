// Linux procfs parsers: /proc/stat, /proc/net/dev, /proc/cpuinfo.

use crate::error::SampleError;
use crate::models::{CpuTicks, InterfaceCounters};

/// Index of the idle counter among the numbers on the aggregate `cpu` line.
const IDLE_FIELD: usize = 3;

/// Receive-side columns in /proc/net/dev before the transmit byte counter.
const NET_DEV_RX_FIELDS: usize = 8;

/// Parse the aggregate `cpu` line of /proc/stat.
/// Total is the sum of every counter on the line; idle is the 4th counter.
pub(super) fn parse_cpu_ticks(content: &str) -> Result<CpuTicks, SampleError> {
    let line = content
        .lines()
        .find(|l| l.split_whitespace().next() == Some("cpu"))
        .ok_or_else(|| SampleError::malformed("cpu ticks", "no aggregate cpu line"))?;

    let values = line
        .split_whitespace()
        .skip(1)
        .map(|field| {
            field.parse::<u64>().map_err(|e| {
                SampleError::malformed("cpu ticks", format!("field {:?}: {}", field, e))
            })
        })
        .collect::<Result<Vec<u64>, _>>()?;

    if values.len() <= IDLE_FIELD {
        return Err(SampleError::malformed(
            "cpu ticks",
            format!("expected at least {} counters, got {}", IDLE_FIELD + 1, values.len()),
        ));
    }

    let total = values
        .iter()
        .try_fold(0u64, |acc, v| acc.checked_add(*v))
        .ok_or_else(|| SampleError::malformed("cpu ticks", "tick total overflows u64"))?;

    Ok(CpuTicks {
        idle: values[IDLE_FIELD],
        total,
    })
}

/// Find `interface` in /proc/net/dev and return its rx/tx byte counters.
/// Returns `Ok(None)` when no line matches the interface.
pub(super) fn parse_net_dev(
    content: &str,
    interface: &str,
) -> Result<Option<InterfaceCounters>, SampleError> {
    for line in content.lines() {
        // Header lines carry '|' and no "name:" prefix.
        let Some((name, rest)) = line.split_once(':') else {
            continue;
        };
        if name.trim() != interface {
            continue;
        }
        let fields: Vec<&str> = rest.split_whitespace().collect();
        if fields.len() <= NET_DEV_RX_FIELDS {
            return Err(SampleError::malformed(
                "interface counters",
                format!("{}: expected at least {} columns, got {}", interface, NET_DEV_RX_FIELDS + 1, fields.len()),
            ));
        }
        let parse = |field: &str| {
            field.parse::<u64>().map_err(|e| {
                SampleError::malformed("interface counters", format!("{}: {:?}: {}", interface, field, e))
            })
        };
        return Ok(Some(InterfaceCounters {
            rx_bytes: parse(fields[0])?,
            tx_bytes: parse(fields[NET_DEV_RX_FIELDS])?,
        }));
    }
    Ok(None)
}

/// First "model name" from /proc/cpuinfo. Ignores empty names and bare "cpu0".
pub(super) fn parse_cpu_model(content: &str) -> Option<String> {
    for line in content.lines() {
        if line.starts_with("model name") {
            let name = line
                .find(':')
                .map(|i| line[i + 1..].trim())
                .filter(|s| !s.is_empty() && *s != "cpu0")?;
            return Some(name.to_string());
        }
    }
    None
}
