//! Generation identifiers: decimal seconds since the Unix epoch.
//!
//! Stored poems are keyed by these ids, so the format stays plain seconds.
//! Two runs finishing inside the same second would collide, so the assigner
//! keeps a high-water mark and bumps a repeat to the next free second.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Stamps a finished generation with its identifier.
pub trait IdAssigner: Send + Sync {
    fn assign(&self) -> String;
}

/// Wall-clock assigner. Ids are strictly increasing within one process.
#[derive(Debug, Default)]
pub struct ClockIdAssigner {
    last: AtomicI64,
}

impl ClockIdAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_after(&self, now_secs: i64) -> i64 {
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now_secs.max(last + 1);
            match self.last.compare_exchange_weak(
                last,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(current) => last = current,
            }
        }
    }
}

impl IdAssigner for ClockIdAssigner {
    fn assign(&self) -> String {
        self.next_after(Utc::now().timestamp()).to_string()
    }
}
