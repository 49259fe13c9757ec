use log::debug;
use once_cell::sync::OnceCell;

use crate::fallback::initial_count;
use crate::options::Seed;
use crate::utils::atomic::Count;

/// 进程内的访问计数. 首次访问时按 [`Seed`] 初始化, 进程退出即丢失.
#[derive(Debug)]
pub struct MemoryStore {
    seed: Seed,
    count: OnceCell<Count>,
}

impl MemoryStore {
    pub fn new(seed: Seed) -> Self {
        Self {
            seed,
            count: OnceCell::new(),
        }
    }

    pub fn get(&self) -> u64 {
        self.cell().get()
    }

    /// Adds one visit and returns the new count.
    pub fn incr(&self) -> u64 {
        self.cell().incr()
    }

    fn cell(&self) -> &Count {
        // Seeding happens at most once, concurrent first callers block on it.
        self.count.get_or_init(|| {
            let value = initial_count(self.seed);
            debug!("Seeded in-memory visit count at {value} ({:?})", self.seed);
            Count::new(value)
        })
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Seed::default())
    }
}
