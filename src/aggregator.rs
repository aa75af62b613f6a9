use crate::capture::LinkProtocol;
use crate::cli::RateUnit;
use crate::registry::InterfaceEntry;

/// Folds one received frame into an interface's counters.
///
/// Returns whether the row should be repainted right away. A bad-checksum
/// IPv4 frame is fully counted but reports `false`; its updated counters
/// show up at the next full refresh. That asymmetry is long-standing
/// observed behavior of this facility and is kept as-is.
pub fn on_packet(
    entry: &mut InterfaceEntry,
    byte_count: u64,
    protocol: LinkProtocol,
    checksum_ok: bool,
) -> bool {
    entry.total = entry.total.saturating_add(1);
    entry.span_bytes = entry.span_bytes.saturating_add(byte_count);
    entry.bytes_accumulated = entry.bytes_accumulated.saturating_add(byte_count);

    match protocol {
        LinkProtocol::Ipv4 => {
            entry.ipv4_total = entry.ipv4_total.saturating_add(1);
            if !checksum_ok {
                entry.bad_checksum_total = entry.bad_checksum_total.saturating_add(1);
                return false;
            }
        }
        LinkProtocol::Ipv6 => {
            entry.ipv6_total = entry.ipv6_total.saturating_add(1);
        }
        LinkProtocol::Other => {
            entry.non_ip_total = entry.non_ip_total.saturating_add(1);
        }
    }

    true
}

/// Recomputes the windowed rate for the given entries.
///
/// Called on the wall-clock rate tick, not per packet; `elapsed_secs` is
/// the actual time since the previous tick, which may exceed the nominal
/// period under load. Plain interval average, no smoothing.
pub fn refresh_rates(entries: &mut [InterfaceEntry], unit: RateUnit, elapsed_secs: f64) {
    if elapsed_secs <= 0.0 {
        return;
    }

    for entry in entries {
        let rate = scaled(entry.span_bytes, unit) / elapsed_secs;
        entry.current_rate = rate;
        if rate > entry.peak_rate {
            entry.peak_rate = rate;
        }
        entry.span_bytes = 0;
    }
}

fn scaled(bytes: u64, unit: RateUnit) -> f64 {
    match unit {
        RateUnit::Kilobits => bytes as f64 * 8.0 / 1000.0,
        RateUnit::Kilobytes => bytes as f64 / 1024.0,
    }
}
