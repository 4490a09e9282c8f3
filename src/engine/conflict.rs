use std::num::NonZeroU32;

use crate::limits::*;
use crate::model::*;

use super::store::BookingStore;
use super::EngineError;

/// Convert a caller-supplied minute count into a search duration.
pub fn validate_duration(minutes: i64) -> Result<NonZeroU32, EngineError> {
    u32::try_from(minutes)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or(EngineError::InvalidDuration(minutes))
}

pub(crate) fn validate_horizon(days: u32) -> Result<(), EngineError> {
    if days > MAX_HORIZON_DAYS {
        return Err(EngineError::LimitExceeded("horizon too long"));
    }
    Ok(())
}

pub(crate) fn check_capacity(total: usize) -> Result<(), EngineError> {
    if total > MAX_BOOKINGS_PER_BOARD {
        return Err(EngineError::LimitExceeded("too many bookings on board"));
    }
    Ok(())
}

/// A found slot may only be committed while it is still free: any booking on
/// the same day overlapping it is a conflict.
pub(crate) fn check_no_conflict(store: &BookingStore, slot: &Slot) -> Result<(), EngineError> {
    match store.on_day(slot.day).find(|b| b.span.overlaps(&slot.span)) {
        Some(existing) => Err(EngineError::Conflict(existing.id)),
        None => Ok(()),
    }
}
