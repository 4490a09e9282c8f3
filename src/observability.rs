use std::net::SocketAddr;

// ── Search metrics ──────────────────────────────────────────────

/// Counter: slot searches run. Labels: outcome (`found` | `none`).
pub const SEARCHES_TOTAL: &str = "slotfit_searches_total";

/// Histogram: search latency in seconds.
pub const SEARCH_DURATION_SECONDS: &str = "slotfit_search_duration_seconds";

// ── Store metrics ───────────────────────────────────────────────

/// Counter: slots committed as new bookings.
pub const COMMITS_TOTAL: &str = "slotfit_commits_total";

/// Counter: commits refused because the slot was taken in the meantime.
pub const COMMIT_CONFLICTS_TOTAL: &str = "slotfit_commit_conflicts_total";

/// Counter: malformed booking records left out of a load.
pub const SKIPPED_RECORDS_TOTAL: &str = "slotfit_skipped_records_total";

/// Gauge: number of boards loaded.
pub const BOARDS_ACTIVE: &str = "slotfit_boards_active";

/// Install Prometheus metrics exporter on the given port. No-op if port is None.
pub fn init(port: Option<u16>) -> Result<(), metrics_exporter_prometheus::BuildError> {
    let Some(port) = port else { return Ok(()) };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!("metrics endpoint: http://0.0.0.0:{port}/metrics");
    Ok(())
}
