//! Store - Key-value persistence for entries
//!
//! Each entry is stored as a separate file in the storage directory, named
//! after its alias. The store knows nothing about entries; it moves bytes.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{Result, RqsError};

/// Byte store keyed by alias name
pub trait Store {
    /// Read the value for `key`, if present
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write `value` under `key`, replacing any previous value
    fn put(&mut self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove `key`; fails with `NotFound` if it is absent
    fn delete(&mut self, key: &str) -> Result<()>;

    /// All keys, sorted
    fn keys(&self) -> Result<Vec<String>>;
}

/// Punctuation allowed in keys besides ASCII letters and digits
const KEY_PUNCTUATION: &str = "_-.@+,=(){}~%";

/// Validate a key name
///
/// Keys become file names, so they may not contain path separators, may not
/// start with a dot, and may not contain glob metacharacters (`*?[]!`).
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(RqsError::InvalidAlias("alias cannot be empty".to_string()));
    }

    if key.starts_with('.') {
        return Err(RqsError::InvalidAlias(format!(
            "'{}' cannot start with '.'",
            key
        )));
    }

    for c in key.chars() {
        if !c.is_ascii_alphanumeric() && !KEY_PUNCTUATION.contains(c) {
            return Err(RqsError::InvalidAlias(format!(
                "invalid character '{}' in '{}'",
                c, key
            )));
        }
    }

    Ok(())
}

/// Filesystem store: one file per key under `root`
#[derive(Debug)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    /// Open a store rooted at `root`. The directory is created on first write.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    fn ensure_root(&self) -> Result<()> {
        if self.root.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(&self.root)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.root, fs::Permissions::from_mode(0o700))?;
        }

        tracing::debug!(root = %self.root.display(), "created storage directory");
        Ok(())
    }
}

impl Store for FsStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        match fs::read(self.path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<()> {
        validate_key(key)?;
        self.ensure_root()?;

        // Write beside the target, then rename over it
        let tmp_path = self.root.join(format!(".{}.tmp", key));
        let mut file = fs::File::create(&tmp_path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))?;
        }

        if let Err(e) = file.write_all(value).and_then(|_| file.sync_all()) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        drop(file);

        fs::rename(&tmp_path, self.path(key))?;
        tracing::debug!(key, bytes = value.len(), "stored entry");
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        match fs::remove_file(self.path(key)) {
            Ok(()) => {
                tracing::debug!(key, "deleted entry");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(RqsError::NotFound(key.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(vec![]);
        }

        let mut keys = vec![];
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if validate_key(&name).is_ok() {
                keys.push(name);
            } else {
                tracing::trace!(file = %name, "skipping non-entry file");
            }
        }

        keys.sort();
        Ok(keys)
    }
}

/// In-memory store
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        validate_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<()> {
        validate_key(key)?;
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.entries
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| RqsError::NotFound(key.to_string()))
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}
