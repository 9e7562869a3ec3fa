use hookd_domain::MemoryStats;
use tikv_jemalloc_ctl::{epoch, stats};
use tracing::warn;

/// Reads allocator stats for the Store's `/metrics` response (spec.md §4.1
/// "memory stats from the runtime"). `epoch::advance` refreshes jemalloc's
/// cached counters before each read — without it these values are frozen
/// at whatever they were on the last advance.
pub fn read_memory_stats() -> MemoryStats {
    if let Err(e) = epoch::mib().and_then(|mib| mib.advance()) {
        warn!(error = %e, "failed to advance jemalloc stats epoch");
    }

    let alloc_mb = stats::allocated::mib()
        .and_then(|mib| mib.read())
        .map(to_mb)
        .unwrap_or(0.0);
    let heap_inuse_mb = stats::resident::mib()
        .and_then(|mib| mib.read())
        .map(to_mb)
        .unwrap_or(0.0);
    let sys_mb = stats::mapped::mib()
        .and_then(|mib| mib.read())
        .map(to_mb)
        .unwrap_or(0.0);

    MemoryStats {
        alloc_mb,
        heap_inuse_mb,
        sys_mb,
        // jemalloc has no direct "GC run" concept; the eviction job counts
        // its own epoch advances and overlays the real value here (see
        // EvictionMetrics::gc_runs in hookd-jobs).
        gc_runs: 0,
    }
}

fn to_mb(bytes: usize) -> f64 {
    bytes as f64 / (1024.0 * 1024.0)
}
