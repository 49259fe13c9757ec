use log::{debug, error};

use crate::error::Error;
use crate::fallback::fallback_count;
use crate::options::Options;
use crate::store::{Backend, Source};

const MEMORY_HEALTHY: &str = "Server-side memory counter is working";

/// Outcome of a counter operation. Always successful from the caller's
/// point of view, `source` tells a genuine count from a made-up one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisitResult {
    pub success: bool,
    pub count: u64,
    pub source: Source,
    /// The swallowed storage error, for fallback results.
    pub error: Option<String>,
}

impl VisitResult {
    fn stored(count: u64, source: Source) -> Self {
        Self {
            success: true,
            count,
            source,
            error: None,
        }
    }

    fn fallback(err: &Error) -> Self {
        Self {
            success: true,
            count: fallback_count(),
            source: Source::Fallback,
            error: Some(err.to_string()),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == Source::Fallback
    }
}

/// Informational snapshot of the backing store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Health {
    pub available: bool,
    pub count: u64,
    pub reason: String,
}

/// 访客计数服务. 由组合根构造一次, 按引用或 `Arc` 共享给所有调用方.
///
/// No operation here returns an error: storage failures are logged and
/// answered with a random count from [`crate::fallback::FALLBACK_RANGE`].
#[derive(Debug)]
pub struct VisitCounter {
    backend: Backend,
}

impl VisitCounter {
    pub fn new(backend: impl Into<Backend>) -> Self {
        Self {
            backend: backend.into(),
        }
    }

    pub fn open(options: &Options) -> Self {
        Self::new(Backend::open(options))
    }

    /// Counts one visit and returns the new total.
    pub async fn record_visit(&self) -> VisitResult {
        match self.backend.incr().await {
            Ok(count) => {
                debug!("Visitor count incremented to: {count}");
                VisitResult::stored(count, self.backend.source())
            }
            Err(e) => {
                error!("Error incrementing visitor count: {e}");
                VisitResult::fallback(&e)
            }
        }
    }

    /// Returns the current total without counting a visit.
    pub async fn read_count(&self) -> VisitResult {
        match self.backend.read().await {
            Ok(count) => {
                debug!("Retrieved visitor count: {count}");
                VisitResult::stored(count, self.backend.source())
            }
            Err(e) => {
                error!("Error getting visitor count: {e}");
                VisitResult::fallback(&e)
            }
        }
    }

    pub async fn check_health(&self) -> Health {
        match &self.backend {
            Backend::Memory(m) => Health {
                available: true,
                count: m.get(),
                reason: MEMORY_HEALTHY.to_string(),
            },
            Backend::File(f) => match f.probe().await {
                Ok(Some(count)) => Health {
                    available: true,
                    count,
                    reason: format!("File counter at {:?} is working", f.path()),
                },
                Ok(None) => Health {
                    available: true,
                    count: 0,
                    reason: format!("File counter at {:?} has not been created yet", f.path()),
                },
                Err(e) => Health {
                    available: false,
                    count: 0,
                    reason: e.to_string(),
                },
            },
        }
    }
}
