use std::sync::atomic::{AtomicU64, Ordering};

/// 单个访问计数的原子单元.
#[derive(Debug)]
pub struct Count(AtomicU64);

impl Count {
    pub const fn new(value: u64) -> Self {
        Self(AtomicU64::new(value))
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    /// Adds one and returns the new value.
    pub fn incr(&self) -> u64 {
        self.add(1)
    }

    /// Adds `value` and returns the new value, saturating at `u64::MAX`.
    pub fn add(&self, value: u64) -> u64 {
        let prev = self
            .0
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |cur| {
                Some(cur.saturating_add(value))
            })
            .unwrap_or_else(|cur| cur);
        prev.saturating_add(value)
    }
}

impl Default for Count {
    fn default() -> Self {
        Self::new(0)
    }
}
