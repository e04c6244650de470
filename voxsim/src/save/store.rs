//! Key-value stores holding encoded world saves.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::fs;
use std::io;


/// Default maximum size of a single entry in a memory store, like a browser storage.
pub const DEFAULT_MAX_ENTRY_SIZE: usize = 5 * 1024 * 1024;


/// A persistent store of named binary entries.
pub trait KeyValueStore {

    /// Get the entry with the given key, none if it doesn't exist.
    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>>;

    /// Set the entry with the given key, replacing any previous one.
    fn set(&mut self, key: &str, value: &[u8]) -> io::Result<()>;

    /// Remove the entry with the given key, doing nothing if it doesn't exist.
    fn remove(&mut self, key: &str) -> io::Result<()>;

    /// Maximum size of a single entry, if limited.
    fn max_entry_size(&self) -> Option<usize> {
        None
    }

}


/// A store keeping entries in memory, with an entry size limit.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
    max_entry_size: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_max_entry_size(DEFAULT_MAX_ENTRY_SIZE)
    }
}

impl MemoryStore {

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_entry_size(max_entry_size: usize) -> Self {
        Self { entries: HashMap::new(), max_entry_size }
    }

    /// Return true if an entry exists for the given key.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

}

impl KeyValueStore for MemoryStore {

    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> io::Result<()> {
        if value.len() > self.max_entry_size {
            return Err(io::Error::new(io::ErrorKind::StorageFull, "entry too large"));
        }
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn max_entry_size(&self) -> Option<usize> {
        Some(self.max_entry_size)
    }

}


/// A store keeping each entry in its own file in a directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {

    /// Open a directory store, creating the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        // Keys are file names, so path separators are replaced.
        let name = key.replace(['/', '\\'], "_");
        self.dir.join(format!("{name}.bin"))
    }

}

impl KeyValueStore for DirStore {

    fn get(&self, key: &str) -> io::Result<Option<Vec<u8>>> {
        match fs::read(self.entry_path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&mut self, key: &str, value: &[u8]) -> io::Result<()> {
        // Write to a temporary file first so that a failed write keeps the previous save.
        let path = self.entry_path(key);
        let tmp_path = path.with_extension("bin.tmp");
        fs::write(&tmp_path, value)?;
        fs::rename(&tmp_path, &path)
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.entry_path(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

}
