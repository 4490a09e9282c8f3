use std::io::Read;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use slotfit::config::Config;
use slotfit::engine::{Engine, validate_duration};
use slotfit::model::{BookingRecord, SkippedRecord, format_hhmm};
use slotfit::notify::NotifyHub;

const DEFAULT_LABEL: &str = "Montage Poste Client";

#[derive(Serialize)]
struct SlotOut {
    date: String,
    start: String,
    end: String,
}

#[derive(Serialize)]
struct Output {
    slot: Option<SlotOut>,
    skipped: Vec<SkippedRecord>,
    bookings: Vec<BookingRecord>,
}

/// `slotfit <minutes> [label]`
///
/// Reads the current bookings as a JSON array of `{date, start, end, label}`
/// on stdin, books the first slot that fits, and writes the result plus the
/// updated bookings as JSON on stdout.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cfg = Config::from_env()?;
    slotfit::observability::init(cfg.metrics_port)?;

    let mut args = std::env::args().skip(1);
    let minutes: i64 = args
        .next()
        .ok_or("usage: slotfit <minutes> [label]")?
        .trim()
        .parse()?;
    let duration = validate_duration(minutes)?;
    let label = args.next().unwrap_or_else(|| DEFAULT_LABEL.to_string());

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let records: Vec<BookingRecord> = if input.trim().is_empty() {
        Vec::new()
    } else {
        serde_json::from_str(&input)?
    };

    info!(
        "  hours: {}-{}",
        format_hhmm(cfg.hours.day_start),
        format_hhmm(cfg.hours.day_end)
    );
    info!("  scope: {:?}, horizon: {} days", cfg.scope, cfg.horizon_days);
    info!("  buffer: {} min", cfg.buffer_minutes);

    let engine = Engine::new(cfg.hours, cfg.buffer_minutes, Arc::new(NotifyHub::new()));
    let skipped = engine.replace_from_records(records).await?;

    let booked = engine
        .book_next_slot(duration, cfg.scope_from_today(), &label)
        .await?;
    match &booked {
        Some(b) => info!(
            "booked {} {}-{} for {minutes} min",
            b.day,
            format_hhmm(b.span.start),
            format_hhmm(b.span.end)
        ),
        None => warn!("no slot of {minutes} min available in scope"),
    }

    let output = Output {
        slot: booked.map(|b| {
            let r = b.to_record();
            SlotOut { date: r.date, start: r.start, end: r.end }
        }),
        skipped,
        bookings: engine.bookings().await.iter().map(|b| b.to_record()).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
