use std::num::NonZeroU32;

use chrono::NaiveDate;

use crate::model::*;

// ── Day Availability Scanner ──────────────────────────────────────

/// Free intervals of `day` inside the working-hours window, in chronological
/// order. Bookings on other days are ignored; overlapping bookings are merged
/// by the sweep, and anything outside the window is clipped away.
pub fn free_intervals(day: NaiveDate, hours: &WorkingHours, bookings: &[Booking]) -> Vec<Span> {
    let mut taken: Vec<Span> = bookings
        .iter()
        .filter(|b| b.day == day)
        .map(|b| b.span)
        .collect();
    taken.sort_by_key(|s| s.start);

    let mut free = Vec::new();
    let mut cursor = hours.day_start;
    for span in &taken {
        let gap_end = span.start.min(hours.day_end);
        if cursor < gap_end {
            free.push(Span::new(cursor, gap_end));
        }
        cursor = cursor.max(span.end);
    }
    if cursor < hours.day_end {
        free.push(Span::new(cursor, hours.day_end));
    }
    free
}

/// First-fit: the earliest free interval of at least `duration` minutes,
/// clipped to exactly `duration`. `None` when nothing on `day` is long enough.
pub fn find_slot(
    day: NaiveDate,
    hours: &WorkingHours,
    bookings: &[Booking],
    duration: NonZeroU32,
) -> Option<Span> {
    let needed = Minute::from(duration.get());
    free_intervals(day, hours, bookings)
        .into_iter()
        .find(|free| free.duration() >= needed)
        .map(|free| Span::new(free.start, free.start + needed))
}

/// Merge sorted overlapping/adjacent intervals into disjoint intervals.
pub fn merge_overlapping(sorted: &[Span]) -> Vec<Span> {
    let mut merged: Vec<Span> = Vec::new();
    for &span in sorted {
        if let Some(last) = merged.last_mut()
            && span.start <= last.end {
                last.end = last.end.max(span.end);
                continue;
            }
        merged.push(span);
    }
    merged
}
