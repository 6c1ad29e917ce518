// File-backed key-value store: one JSON file per key

use crate::kv::KvStore;
use eyre::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

const CURRENT_VERSION: u32 = 1;
const LOCK_FILE: &str = ".lock";

/// Stores each key as `<escaped key>.json` inside a data directory
///
/// Values are replaced by writing a sibling temp file and renaming it over the
/// target, so a failed write leaves the previous value intact.
pub struct FileKv {
    base_path: PathBuf,
}

impl FileKv {
    /// Open or create a file store rooted at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();

        fs::create_dir_all(&base_path).context("Failed to create data directory")?;

        let store = Self { base_path };
        store.write_version()?;

        info!(path = ?store.base_path, "Opened file store");
        Ok(store)
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the file holding `key`
    ///
    /// Distinct keys always map to distinct files; see [`file_stem`].
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", file_stem(key)))
    }

    /// Write the version marker once; later opens leave it alone
    fn write_version(&self) -> Result<()> {
        let version_path = self.base_path.join(".version");
        if !version_path.exists() {
            fs::write(version_path, CURRENT_VERSION.to_string()).context("Failed to write version file")?;
        }
        Ok(())
    }

    /// Atomically replace `path` with whatever `fill` writes
    fn replace_file<F>(&self, path: &Path, fill: F) -> Result<()>
    where
        F: FnOnce(&mut File) -> io::Result<()>,
    {
        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.base_path.join(LOCK_FILE))
            .context("Failed to open lock file")?;
        lock.lock_exclusive().context("Failed to acquire file lock")?;

        // Dropped (and removed) on any early return
        let mut tmp = NamedTempFile::new_in(&self.base_path).context("Failed to create temp file")?;
        fill(tmp.as_file_mut()).context("Failed to write temp file")?;
        tmp.as_file().sync_all().context("Failed to sync temp file")?;
        tmp.persist(path)
            .map_err(|e| e.error)
            .context("Failed to replace value file")?;

        // Lock is released when `lock` is dropped
        Ok(())
    }
}

impl KvStore for FileKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let value = fs::read_to_string(&path).context("Failed to read value file")?;

        debug!(key, bytes = value.len(), "Read value");
        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        self.replace_file(&path, |file| file.write_all(value.as_bytes()))?;

        debug!(key, bytes = value.len(), "Wrote value");
        Ok(())
    }
}

/// Map a key onto a safe file name
///
/// ASCII letters, digits, and `-` pass through; every other byte becomes
/// `_XX` (uppercase hex), so the mapping is reversible and keys such as
/// `todo:tasks` and `todo_tasks` never share a file.
fn file_stem(key: &str) -> String {
    if key.is_empty() {
        return "_".to_string();
    }

    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("_{:02X}", byte));
        }
    }
    stem
}
