//! Cooperative cancellation for in-flight searches
//!
//! Each unit owns a `TargetGeneration`. Choosing a new target bumps the
//! generation, and any search started under an older ticket sees itself as
//! stale at its next expansion and returns early.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counter bumped whenever a unit's requested target changes
#[derive(Clone, Debug, Default)]
pub struct TargetGeneration {
    counter: Arc<AtomicU64>,
}

impl TargetGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticket for the current target
    pub fn ticket(&self) -> Ticket {
        Ticket {
            counter: Some(Arc::clone(&self.counter)),
            issued: self.counter.load(Ordering::Acquire),
        }
    }

    /// Register a new target, invalidating earlier tickets
    pub fn retarget(&self) -> Ticket {
        let issued = self.counter.fetch_add(1, Ordering::AcqRel) + 1;
        Ticket {
            counter: Some(Arc::clone(&self.counter)),
            issued,
        }
    }

    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::Acquire)
    }
}

/// Handle a search polls to learn whether its target is still wanted
#[derive(Clone, Debug)]
pub struct Ticket {
    counter: Option<Arc<AtomicU64>>,
    issued: u64,
}

impl Ticket {
    /// Ticket that never goes stale
    pub fn detached() -> Self {
        Self {
            counter: None,
            issued: 0,
        }
    }

    /// The target changed after this ticket was issued
    pub fn is_stale(&self) -> bool {
        match &self.counter {
            Some(counter) => counter.load(Ordering::Acquire) != self.issued,
            None => false,
        }
    }

    pub fn generation(&self) -> u64 {
        self.issued
    }
}
