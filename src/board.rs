use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;

use crate::engine::{Engine, EngineError};
use crate::limits::*;
use crate::model::WorkingHours;
use crate::notify::NotifyHub;

/// Manages per-board engines. Each board (a workstation, a workshop) gets its
/// own store, lock, and notification hub, so searches on one board never see
/// or block bookings on another.
pub struct BoardManager {
    engines: DashMap<String, Arc<Engine>>,
    /// Boards created so far; reserved before insertion so the cap holds
    /// under concurrent creation.
    created: AtomicUsize,
    hours: WorkingHours,
    buffer_minutes: u32,
}

impl BoardManager {
    pub fn new(hours: WorkingHours, buffer_minutes: u32) -> Self {
        Self {
            engines: DashMap::new(),
            created: AtomicUsize::new(0),
            hours,
            buffer_minutes,
        }
    }

    /// Get or lazily create the engine for `board`.
    pub fn get_or_create(&self, board: &str) -> Result<Arc<Engine>, EngineError> {
        if let Some(engine) = self.engines.get(board) {
            return Ok(engine.value().clone());
        }
        if board.len() > MAX_BOARD_NAME_LEN {
            return Err(EngineError::LimitExceeded("board name too long"));
        }
        if board.trim().is_empty() {
            return Err(EngineError::LimitExceeded("empty board name"));
        }

        // Two callers may race past the lookup above; `entry` keeps the first.
        // The closure runs under the shard lock, so it must not touch the map.
        let engine = self
            .engines
            .entry(board.to_string())
            .or_try_insert_with(|| {
                self.created
                    .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                        (n < MAX_BOARDS).then_some(n + 1)
                    })
                    .map_err(|_| EngineError::LimitExceeded("too many boards"))?;
                let notify = Arc::new(NotifyHub::new());
                Ok(Arc::new(Engine::new(self.hours, self.buffer_minutes, notify)))
            })?
            .value()
            .clone();

        metrics::gauge!(crate::observability::BOARDS_ACTIVE).set(self.engines.len() as f64);
        tracing::debug!(board, "board ready");
        Ok(engine)
    }

    pub fn get(&self, board: &str) -> Option<Arc<Engine>> {
        self.engines.get(board).map(|e| e.value().clone())
    }

    pub fn board_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.engines.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}
