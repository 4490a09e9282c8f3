use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::engine::EngineError;
use crate::limits::MINUTES_PER_DAY;

/// Minutes since local midnight. The only time-of-day type.
pub type Minute = i64;

/// Half-open interval `[start, end)` within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: Minute,
    pub end: Minute,
}

impl Span {
    pub fn new(start: Minute, end: Minute) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    /// Checked constructor for untrusted input: both ends inside the day,
    /// `start < end`.
    pub fn within_day(start: Minute, end: Minute) -> Option<Self> {
        if 0 <= start && start < end && end <= MINUTES_PER_DAY {
            Some(Self { start, end })
        } else {
            None
        }
    }

    pub fn duration(&self) -> Minute {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_span(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Parse `"HH:MM"` (surrounding whitespace ignored) into minutes since midnight.
pub fn parse_hhmm(s: &str) -> Option<Minute> {
    let t = NaiveTime::parse_from_str(s.trim(), "%H:%M").ok()?;
    Some(Minute::from(t.hour() * 60 + t.minute()))
}

/// Format minutes since midnight as `"HH:MM"`. `1440` renders as `"24:00"`.
pub fn format_hhmm(m: Minute) -> String {
    format!("{:02}:{:02}", m / 60, m % 60)
}

/// Daily opening window, identical for every day searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub day_start: Minute,
    pub day_end: Minute,
}

impl WorkingHours {
    pub fn new(day_start: Minute, day_end: Minute) -> Option<Self> {
        Span::within_day(day_start, day_end).map(|_| Self { day_start, day_end })
    }

    pub fn span(&self) -> Span {
        Span::new(self.day_start, self.day_end)
    }
}

impl Default for WorkingHours {
    /// 08:00–17:00.
    fn default() -> Self {
        Self {
            day_start: 8 * 60,
            day_end: 17 * 60,
        }
    }
}

/// One occupied interval on a given day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Ulid,
    pub day: NaiveDate,
    pub span: Span,
    pub label: String,
}

impl Booking {
    pub fn to_record(&self) -> BookingRecord {
        BookingRecord {
            date: self.day.format("%Y-%m-%d").to_string(),
            start: format_hhmm(self.span.start),
            end: format_hhmm(self.span.end),
            label: self.label.clone(),
        }
    }
}

/// A booking as handed over by a collaborator, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub date: String,
    pub start: String,
    pub end: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    BadDate,
    BadTime,
    InvertedSpan,
    EmptyLabel,
    LabelTooLong,
}

/// A record left out of the store, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    /// Position in the input sequence.
    pub index: usize,
    pub record: BookingRecord,
    pub reason: SkipReason,
}

/// A free interval chosen by a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub day: NaiveDate,
    pub span: Span,
}

impl Slot {
    /// The same slot moved `minutes` later on the same day. Fails if the
    /// result would leave the day.
    pub fn shifted(&self, minutes: Minute) -> Result<Slot, EngineError> {
        let (start, end) = (self.span.start + minutes, self.span.end + minutes);
        let span = Span::within_day(start, end).ok_or(EngineError::InvalidSpan { start, end })?;
        Ok(Slot { day: self.day, span })
    }
}

/// Store mutations, broadcast to subscribers after they are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreEvent {
    BookingAdded { booking: Booking },
    StoreCleared,
    StoreReplaced { bookings: Vec<Booking> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_basics() {
        let s = Span::new(480, 540);
        assert_eq!(s.duration(), 60);
        assert!(s.contains_span(&Span::new(490, 500)));
        assert!(!s.contains_span(&Span::new(470, 500)));
    }

    #[test]
    fn span_overlap() {
        let a = Span::new(100, 200);
        let b = Span::new(150, 250);
        let c = Span::new(200, 300);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c)); // adjacent, not overlapping
    }

    #[test]
    fn span_within_day_rejects_bad_input() {
        assert!(Span::within_day(600, 600).is_none());
        assert!(Span::within_day(700, 600).is_none());
        assert!(Span::within_day(-1, 60).is_none());
        assert!(Span::within_day(0, MINUTES_PER_DAY + 1).is_none());
        assert_eq!(Span::within_day(0, MINUTES_PER_DAY), Some(Span::new(0, 1440)));
    }

    #[test]
    fn hhmm_parse_and_format() {
        assert_eq!(parse_hhmm("08:00"), Some(480));
        assert_eq!(parse_hhmm(" 17:30 "), Some(1050));
        assert_eq!(parse_hhmm("7:05"), Some(425));
        assert_eq!(parse_hhmm("25:00"), None);
        assert_eq!(parse_hhmm("noon"), None);
        assert_eq!(parse_hhmm(""), None);
        assert_eq!(format_hhmm(425), "07:05");
        assert_eq!(format_hhmm(1440), "24:00");
    }

    #[test]
    fn working_hours_validation() {
        assert!(WorkingHours::new(17 * 60, 8 * 60).is_none());
        assert!(WorkingHours::new(8 * 60, 8 * 60).is_none());
        let wh = WorkingHours::default();
        assert_eq!(wh.span(), Span::new(480, 1020));
    }

    #[test]
    fn slot_shift_stays_in_day() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let slot = Slot { day, span: Span::new(540, 570) };
        assert_eq!(slot.shifted(15), Ok(Slot { day, span: Span::new(555, 585) }));

        let late = Slot { day, span: Span::new(1400, 1430) };
        assert_eq!(late.shifted(10).map(|s| s.span.end), Ok(1440));
        assert_eq!(
            late.shifted(15),
            Err(EngineError::InvalidSpan { start: 1415, end: 1445 })
        );
    }

    #[test]
    fn booking_to_record() {
        let b = Booking {
            id: Ulid::new(),
            day: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            span: Span::new(540, 600),
            label: "Montage".into(),
        };
        let r = b.to_record();
        assert_eq!(r.date, "2025-03-10");
        assert_eq!(r.start, "09:00");
        assert_eq!(r.end, "10:00");
        assert_eq!(r.label, "Montage");
    }
}
