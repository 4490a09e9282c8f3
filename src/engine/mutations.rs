use std::num::NonZeroU32;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::model::*;

use super::conflict::{check_capacity, check_no_conflict};
use super::store::{BookingStore, new_booking};
use super::{Engine, EngineError, SearchScope};

impl Engine {
    /// Administrator insert. Overlaps with existing bookings are allowed;
    /// the scanner merges them.
    pub async fn add_booking(
        &self,
        day: NaiveDate,
        span: Span,
        label: &str,
    ) -> Result<Booking, EngineError> {
        let booking = new_booking(day, span, label)?;
        let mut guard = self.store.write().await;
        check_capacity(guard.len() + 1)?;

        info!(id = %booking.id, %day, start = %format_hhmm(booking.span.start), end = %format_hhmm(booking.span.end), "booking added");
        self.apply_and_notify(&mut guard, StoreEvent::BookingAdded { booking: booking.clone() });
        Ok(booking)
    }

    /// Drop every booking on the board.
    pub async fn clear(&self) {
        let mut guard = self.store.write().await;
        info!(removed = guard.len(), "store cleared");
        self.apply_and_notify(&mut guard, StoreEvent::StoreCleared);
    }

    /// Replace the whole store from raw records. Malformed records are left
    /// out and returned; they never abort the load.
    pub async fn replace_from_records(
        &self,
        records: Vec<BookingRecord>,
    ) -> Result<Vec<SkippedRecord>, EngineError> {
        let (loaded, skipped) = BookingStore::from_records(records);
        check_capacity(loaded.len())?;

        for s in &skipped {
            warn!(index = s.index, reason = ?s.reason, date = %s.record.date, start = %s.record.start, end = %s.record.end, "skipping malformed booking record");
        }
        metrics::counter!(crate::observability::SKIPPED_RECORDS_TOTAL).increment(skipped.len() as u64);

        let mut guard = self.store.write().await;
        info!(loaded = loaded.len(), skipped = skipped.len(), "store replaced");
        self.apply_and_notify(
            &mut guard,
            StoreEvent::StoreReplaced { bookings: loaded.into_bookings() },
        );
        Ok(skipped)
    }

    /// Commit a slot found earlier by [`Engine::find_next_slot`]. Fails with
    /// `Conflict` if the store changed in between and the slot, or the buffer
    /// in front of it, is now taken.
    pub async fn commit_slot(&self, slot: Slot, label: &str) -> Result<Booking, EngineError> {
        let booking = new_booking(slot.day, slot.span, label)?;
        let mut guard = self.store.write().await;
        check_capacity(guard.len() + 1)?;
        // The buffer in front of the slot must still be free as well.
        let guarded = Slot {
            day: slot.day,
            span: Span::new(
                (slot.span.start - Minute::from(self.buffer_minutes())).max(0),
                slot.span.end,
            ),
        };
        if let Err(e) = check_no_conflict(&guard, &guarded) {
            metrics::counter!(crate::observability::COMMIT_CONFLICTS_TOTAL).increment(1);
            warn!(day = %slot.day, start = %format_hhmm(slot.span.start), "stale slot: {e}");
            return Err(e);
        }
        Ok(self.commit(&mut guard, booking))
    }

    /// Search and commit under one write lock. `Ok(None)` when nothing fits
    /// in the scope; the store is left untouched in that case.
    pub async fn book_next_slot(
        &self,
        duration: NonZeroU32,
        scope: SearchScope,
        label: &str,
    ) -> Result<Option<Booking>, EngineError> {
        let mut guard = self.store.write().await;
        check_capacity(guard.len() + 1)?;
        let Some(slot) = self.search(&guard, duration, scope)? else {
            info!(minutes = duration.get(), ?scope, "no availability in scope");
            return Ok(None);
        };
        let booking = new_booking(slot.day, slot.span, label)?;
        Ok(Some(self.commit(&mut guard, booking)))
    }

    fn commit(&self, store: &mut BookingStore, booking: Booking) -> Booking {
        info!(id = %booking.id, day = %booking.day, start = %format_hhmm(booking.span.start), end = %format_hhmm(booking.span.end), label = %booking.label, "slot committed");
        metrics::counter!(crate::observability::COMMITS_TOTAL).increment(1);
        self.apply_and_notify(store, StoreEvent::BookingAdded { booking: booking.clone() });
        booking
    }
}
