use std::num::NonZeroU32;

use chrono::NaiveDate;

use crate::model::*;

use super::availability::find_slot;

// ── Horizon Search Driver ─────────────────────────────────────────

/// Search `horizon_days` consecutive days starting at `start_day` and return
/// the first day with a fit. A zero horizon searches nothing.
pub fn find_next_slot(
    bookings: &[Booking],
    duration: NonZeroU32,
    horizon_days: u32,
    start_day: NaiveDate,
    hours: &WorkingHours,
) -> Option<Slot> {
    let days = start_day.iter_days().take(horizon_days as usize);
    find_next_slot_on_days(bookings, duration, days, hours)
}

/// Same as [`find_next_slot`] over an explicit list of days, searched in the
/// order given.
pub fn find_next_slot_on_days(
    bookings: &[Booking],
    duration: NonZeroU32,
    days: impl IntoIterator<Item = NaiveDate>,
    hours: &WorkingHours,
) -> Option<Slot> {
    days.into_iter().find_map(|day| {
        find_slot(day, hours, bookings, duration).map(|span| Slot { day, span })
    })
}
