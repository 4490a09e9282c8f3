use chrono::NaiveDate;
use ulid::Ulid;

use crate::limits::*;
use crate::model::*;

use super::availability::merge_overlapping;
use super::EngineError;

/// The bookings of one board, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct BookingStore {
    bookings: Vec<Booking>,
}

impl BookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from raw records. Records that fail validation are
    /// left out and returned alongside the store.
    pub fn from_records(records: Vec<BookingRecord>) -> (Self, Vec<SkippedRecord>) {
        let mut store = Self::new();
        let mut skipped = Vec::new();
        for (index, record) in records.into_iter().enumerate() {
            match booking_from_record(&record) {
                Ok(booking) => store.bookings.push(booking),
                Err(reason) => skipped.push(SkippedRecord { index, record, reason }),
            }
        }
        (store, skipped)
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }

    pub fn as_slice(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn into_bookings(self) -> Vec<Booking> {
        self.bookings
    }

    pub fn push(&mut self, booking: Booking) {
        self.bookings.push(booking);
    }

    pub fn clear(&mut self) {
        self.bookings.clear();
    }

    /// Snapshot ordered by `(day, start)`.
    pub fn sorted(&self) -> Vec<Booking> {
        let mut out = self.bookings.clone();
        out.sort_by_key(|b| (b.day, b.span.start));
        out
    }

    /// Distinct days that carry at least one booking, ascending.
    pub fn scheduled_days(&self) -> Vec<NaiveDate> {
        let mut days: Vec<NaiveDate> = self.bookings.iter().map(|b| b.day).collect();
        days.sort_unstable();
        days.dedup();
        days
    }

    pub fn on_day(&self, day: NaiveDate) -> impl Iterator<Item = &Booking> {
        self.bookings.iter().filter(move |b| b.day == day)
    }

    /// Busy time on `day` with overlaps merged.
    pub fn occupied(&self, day: NaiveDate) -> Vec<Span> {
        let mut spans: Vec<Span> = self.on_day(day).map(|b| b.span).collect();
        spans.sort_by_key(|s| s.start);
        merge_overlapping(&spans)
    }
}

/// Validate a new booking's interval and label before it enters a store.
pub(crate) fn new_booking(day: NaiveDate, span: Span, label: &str) -> Result<Booking, EngineError> {
    let span = Span::within_day(span.start, span.end).ok_or(EngineError::InvalidSpan {
        start: span.start,
        end: span.end,
    })?;
    let label = label.trim();
    if label.is_empty() {
        return Err(EngineError::EmptyLabel);
    }
    if label.len() > MAX_LABEL_LEN {
        return Err(EngineError::LimitExceeded("label too long"));
    }
    Ok(Booking {
        id: Ulid::new(),
        day,
        span,
        label: label.to_string(),
    })
}

fn booking_from_record(record: &BookingRecord) -> Result<Booking, SkipReason> {
    let day = NaiveDate::parse_from_str(record.date.trim(), "%Y-%m-%d")
        .map_err(|_| SkipReason::BadDate)?;
    let start = parse_hhmm(&record.start).ok_or(SkipReason::BadTime)?;
    let end = parse_hhmm(&record.end).ok_or(SkipReason::BadTime)?;
    if start >= end {
        return Err(SkipReason::InvertedSpan);
    }
    new_booking(day, Span::new(start, end), &record.label).map_err(|e| match e {
        EngineError::EmptyLabel => SkipReason::EmptyLabel,
        EngineError::LimitExceeded(_) => SkipReason::LabelTooLong,
        _ => SkipReason::InvertedSpan,
    })
}
