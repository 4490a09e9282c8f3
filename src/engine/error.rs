use ulid::Ulid;

use crate::model::{Minute, format_hhmm};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    InvalidSpan { start: Minute, end: Minute },
    EmptyLabel,
    InvalidDuration(i64),
    InvalidBuffer(u32),
    Conflict(Ulid),
    LimitExceeded(&'static str),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidSpan { start, end } => write!(
                f,
                "invalid interval [{}, {}): start must be before end within one day",
                format_hhmm(*start),
                format_hhmm(*end)
            ),
            EngineError::EmptyLabel => write!(f, "booking label must not be empty"),
            EngineError::InvalidDuration(d) => {
                write!(f, "invalid duration: {d} minutes (must be positive)")
            }
            EngineError::InvalidBuffer(b) => {
                write!(f, "invalid buffer: {b} minutes (too long for the requested duration)")
            }
            EngineError::Conflict(id) => write!(f, "conflict with booking: {id}"),
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
