mod file;
mod memory;

use std::fmt;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;
use crate::options::{Options, Strategy};

/// Where a reported count came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Source {
    ServerMemory,
    File,
    /// Randomly generated because the backing store failed.
    Fallback,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::ServerMemory => "server-memory",
            Source::File => "file",
            Source::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The configured backing store.
#[derive(Debug)]
pub enum Backend {
    Memory(MemoryStore),
    File(FileStore),
}

impl Backend {
    pub fn open(options: &Options) -> Self {
        match options.strategy {
            Strategy::Memory => Backend::Memory(MemoryStore::new(options.seed)),
            Strategy::File => Backend::File(FileStore::new(&options.path)),
        }
    }

    /// Source tag of genuine counts from this store.
    pub fn source(&self) -> Source {
        match self {
            Backend::Memory(_) => Source::ServerMemory,
            Backend::File(_) => Source::File,
        }
    }

    pub async fn read(&self) -> Result<u64> {
        match self {
            Backend::Memory(m) => Ok(m.get()),
            Backend::File(f) => f.read().await,
        }
    }

    pub async fn incr(&self) -> Result<u64> {
        match self {
            Backend::Memory(m) => Ok(m.incr()),
            Backend::File(f) => f.incr().await,
        }
    }
}

impl From<MemoryStore> for Backend {
    fn from(store: MemoryStore) -> Self {
        Backend::Memory(store)
    }
}

impl From<FileStore> for Backend {
    fn from(store: FileStore) -> Self {
        Backend::File(store)
    }
}
