pub mod availability;
mod conflict;
mod error;
pub mod horizon;
mod mutations;
mod queries;
mod store;

pub use availability::{find_slot, free_intervals, merge_overlapping};
pub use conflict::validate_duration;
pub use error::EngineError;
pub use horizon::{find_next_slot, find_next_slot_on_days};
pub use store::BookingStore;

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::model::*;
use crate::notify::NotifyHub;

/// Which days a search walks through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchScope {
    /// `days` consecutive calendar days starting at `start_day`.
    Horizon { start_day: NaiveDate, days: u32 },
    /// Only the days that already carry a booking, earliest first.
    ScheduledDays,
}

/// One booking board: a store behind a single lock, plus the search policy
/// applied to it.
///
/// Searches take the read lock. Every mutation takes the write lock, so
/// "find a slot, then append it" is atomic inside [`Engine::book_next_slot`].
pub struct Engine {
    store: RwLock<BookingStore>,
    pub notify: Arc<NotifyHub>,
    hours: WorkingHours,
    /// Gap left in front of every booked slot.
    buffer_minutes: u32,
}

/// Apply an event directly to a store (no locking; caller holds the lock).
fn apply_to_store(store: &mut BookingStore, event: &StoreEvent) {
    match event {
        StoreEvent::BookingAdded { booking } => store.push(booking.clone()),
        StoreEvent::StoreCleared => store.clear(),
        StoreEvent::StoreReplaced { bookings } => {
            store.clear();
            for b in bookings {
                store.push(b.clone());
            }
        }
    }
}

impl Engine {
    pub fn new(hours: WorkingHours, buffer_minutes: u32, notify: Arc<NotifyHub>) -> Self {
        Self {
            store: RwLock::new(BookingStore::new()),
            notify,
            hours,
            buffer_minutes,
        }
    }

    pub fn hours(&self) -> WorkingHours {
        self.hours
    }

    pub fn buffer_minutes(&self) -> u32 {
        self.buffer_minutes
    }

    /// Apply + notify in one call.
    fn apply_and_notify(&self, store: &mut BookingStore, event: StoreEvent) {
        apply_to_store(store, &event);
        self.notify.send(event);
    }
}
