use std::collections::HashMap;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// One order line as received from a collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub reference: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstimateIssue {
    UnknownReference(String),
    /// The line (or the running total) does not fit in `u32` minutes.
    Overflow(String),
}

impl std::fmt::Display for EstimateIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstimateIssue::UnknownReference(r) => write!(f, "unknown reference: {r}"),
            EstimateIssue::Overflow(r) => write!(f, "assembly time overflow for: {r}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    pub total_minutes: u32,
    /// Lines left out of the total.
    pub issues: Vec<EstimateIssue>,
}

impl Estimate {
    /// The search duration, or `None` for an empty estimate.
    pub fn duration(&self) -> Option<NonZeroU32> {
        NonZeroU32::new(self.total_minutes)
    }
}

/// Standard assembly minutes per reference. An order needs
/// `minutes * quantity` per line, summed over its lines.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    minutes: HashMap<String, u32>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later entries for the same reference replace earlier ones.
    pub fn insert(&mut self, reference: &str, minutes: u32) {
        self.minutes.insert(reference.trim().to_string(), minutes);
    }

    pub fn minutes_for(&self, reference: &str) -> Option<u32> {
        self.minutes.get(reference.trim()).copied()
    }

    pub fn len(&self) -> usize {
        self.minutes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minutes.is_empty()
    }

    pub fn estimate(&self, lines: &[OrderLine]) -> Estimate {
        let mut estimate = Estimate::default();
        for line in lines {
            let reference = line.reference.trim();
            let Some(per_unit) = self.minutes_for(reference) else {
                estimate.issues.push(EstimateIssue::UnknownReference(reference.to_string()));
                continue;
            };
            match per_unit
                .checked_mul(line.quantity)
                .and_then(|m| estimate.total_minutes.checked_add(m))
            {
                Some(total) => estimate.total_minutes = total,
                None => estimate.issues.push(EstimateIssue::Overflow(reference.to_string())),
            }
        }
        estimate
    }
}

impl FromIterator<(String, u32)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, u32)>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for (reference, minutes) in iter {
            catalog.insert(&reference, minutes);
        }
        catalog
    }
}
