use std::num::NonZeroU32;
use std::time::Instant;

use chrono::NaiveDate;
use tracing::debug;

use crate::limits::*;
use crate::model::*;

use super::availability::free_intervals;
use super::conflict::validate_horizon;
use super::horizon::{find_next_slot, find_next_slot_on_days};
use super::store::BookingStore;
use super::{Engine, EngineError, SearchScope};

impl Engine {
    /// Run the horizon driver over a locked store and apply the buffer policy.
    ///
    /// With a buffer configured, the driver looks for `duration + buffer`;
    /// the first `duration` minutes of that interval are then shifted later
    /// by the buffer, so the result still lies inside a free interval.
    pub(super) fn search(
        &self,
        store: &BookingStore,
        duration: NonZeroU32,
        scope: SearchScope,
    ) -> Result<Option<Slot>, EngineError> {
        let started = Instant::now();
        let wanted = duration
            .checked_add(self.buffer_minutes())
            .ok_or(EngineError::InvalidBuffer(self.buffer_minutes()))?;
        let hours = self.hours();

        let found = match scope {
            SearchScope::Horizon { start_day, days } => {
                validate_horizon(days)?;
                find_next_slot(store.as_slice(), wanted, days, start_day, &hours)
            }
            SearchScope::ScheduledDays => {
                let days = store.scheduled_days();
                if days.len() > MAX_SCHEDULED_DAYS {
                    return Err(EngineError::LimitExceeded("too many scheduled days"));
                }
                find_next_slot_on_days(store.as_slice(), wanted, days, &hours)
            }
        };

        let slot = match found {
            Some(raw) => {
                let end = raw.span.start + Minute::from(duration.get());
                let head = Slot { day: raw.day, span: Span::new(raw.span.start, end) };
                Some(head.shifted(Minute::from(self.buffer_minutes()))?)
            }
            None => None,
        };

        let outcome = if slot.is_some() { "found" } else { "none" };
        metrics::counter!(crate::observability::SEARCHES_TOTAL, "outcome" => outcome).increment(1);
        metrics::histogram!(crate::observability::SEARCH_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
        debug!(minutes = duration.get(), ?scope, ?slot, "slot search");
        Ok(slot)
    }

    /// Find the next free slot without committing it.
    pub async fn find_next_slot(
        &self,
        duration: NonZeroU32,
        scope: SearchScope,
    ) -> Result<Option<Slot>, EngineError> {
        let guard = self.store.read().await;
        self.search(&guard, duration, scope)
    }

    /// All bookings ordered by `(day, start)`.
    pub async fn bookings(&self) -> Vec<Booking> {
        self.store.read().await.sorted()
    }

    pub async fn booking_count(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn scheduled_days(&self) -> Vec<NaiveDate> {
        self.store.read().await.scheduled_days()
    }

    /// Free intervals of `day` inside working hours.
    pub async fn day_availability(&self, day: NaiveDate) -> Vec<Span> {
        let guard = self.store.read().await;
        free_intervals(day, &self.hours(), guard.as_slice())
    }

    /// Busy time of `day`, overlaps merged.
    pub async fn occupied(&self, day: NaiveDate) -> Vec<Span> {
        self.store.read().await.occupied(day)
    }
}
