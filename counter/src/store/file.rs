use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tempfile::NamedTempFile;
use tokio::fs;
use tokio::sync::Mutex;
use tokio::task;

use crate::error::{Error, Result};

/// 以纯文本十进制整数保存计数的文件存储.
///
/// A missing file reads as zero, and so does content that is not a
/// non-negative decimal integer. Writes go to a sibling temp file that is
/// renamed over the target, so a reader never sees a partial value.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Held by every read and write, and across read-modify-write, so callers
    // within one process never interleave. Nothing guards against other
    // processes.
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current stored value, zero when absent or unparseable.
    pub async fn read(&self) -> Result<u64> {
        Ok(self.probe().await?.unwrap_or(0))
    }

    /// Like [`FileStore::read`], but tells an absent file apart from one
    /// that holds a value.
    pub async fn probe(&self) -> Result<Option<u64>> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    /// Replaces the stored value with `value`.
    pub async fn write(&self, value: u64) -> Result<()> {
        let _guard = self.lock.lock().await;
        self.store(value).await
    }

    /// Reads, adds one, writes back and returns the new value.
    pub async fn incr(&self) -> Result<u64> {
        let _guard = self.lock.lock().await;
        let next = self.load().await?.unwrap_or(0).saturating_add(1);
        self.store(next).await?;
        debug!("Visit count in {:?} now {next}", self.path);
        Ok(next)
    }

    // Callers hold `lock`.
    async fn load(&self) -> Result<Option<u64>> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::io(&self.path, e)),
        };
        Ok(Some(parse_count(&self.path, &text)))
    }

    // Callers hold `lock`.
    async fn store(&self, value: u64) -> Result<()> {
        let path = self.path.clone();
        task::spawn_blocking(move || replace_file(&path, value))
            .await
            .map_err(|e| io::Error::new(ErrorKind::Other, e))
            .and_then(|r| r)
            .map_err(|e| Error::io(&self.path, e))
    }
}

fn replace_file(path: &Path, value: u64) -> io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(value.to_string().as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn parse_count(path: &Path, text: &str) -> u64 {
    match text.trim().parse::<u64>() {
        Ok(n) => n,
        Err(e) => {
            warn!("Unparseable visit count in {path:?} ({e}), treating as 0");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_reads_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("count.txt"));
        assert_eq!(store.probe().await.unwrap(), None);
        assert_eq!(store.read().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("count.txt");
        let store = FileStore::new(&path);
        for value in [0, 7, 42, u64::MAX] {
            store.write(value).await.unwrap();
            assert_eq!(store.read().await.unwrap(), value);
            assert_eq!(std::fs::read_to_string(&path).unwrap(), value.to_string());
        }
    }

    #[tokio::test]
    async fn test_corrupt_content_reads_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("count.txt");
        let store = FileStore::new(&path);
        for junk in ["abc", "", "-5", "12abc", "4.2"] {
            std::fs::write(&path, junk).unwrap();
            assert_eq!(store.read().await.unwrap(), 0, "content {junk:?}");
        }
    }

    #[tokio::test]
    async fn test_surrounding_whitespace_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("count.txt");
        std::fs::write(&path, " 41\n").unwrap();
        let store = FileStore::new(&path);
        assert_eq!(store.read().await.unwrap(), 41);
    }

    #[tokio::test]
    async fn test_incr_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("count.txt");
        std::fs::write(&path, "41").unwrap();
        let store = FileStore::new(&path);
        assert_eq!(store.incr().await.unwrap(), 42);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "42");
    }

    #[tokio::test]
    async fn test_incr_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("count.txt");
        let store = FileStore::new(&path);
        assert_eq!(store.incr().await.unwrap(), 1);
        assert_eq!(store.incr().await.unwrap(), 2);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "2");
    }

    #[tokio::test]
    async fn test_unreachable_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();
        let store = FileStore::new(blocker.join("count.txt"));

        assert!(matches!(store.read().await, Err(Error::Io { .. })));
        assert!(matches!(store.incr().await, Err(Error::Io { .. })));
    }

    #[tokio::test]
    async fn test_write_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("count.txt"));
        for _ in 0..5 {
            store.incr().await.unwrap();
        }
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("count.txt")]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_reads_never_see_partial_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("count.txt");
        std::fs::write(&path, "1000").unwrap();
        let store = std::sync::Arc::new(FileStore::new(&path));

        let writer = {
            let store = store.clone();
            tokio::spawn(async move {
                for _ in 0..500 {
                    store.incr().await.unwrap();
                }
            })
        };

        // An independent handle on the same file skips the shared lock, so
        // only the atomic rename keeps it from reading an empty file.
        let other = FileStore::new(&path);
        let mut last = 1000;
        while !writer.is_finished() {
            let seen = other.read().await.unwrap();
            assert!(seen >= last, "read {seen} after {last}");
            last = seen;
        }
        writer.await.unwrap();
        assert_eq!(store.read().await.unwrap(), 1500);
    }

    #[tokio::test]
    async fn test_directory_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.probe().await.is_err());
        assert!(store.write(1).await.is_err());
    }
}
