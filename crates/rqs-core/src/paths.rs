//! Standard paths used by rqs

use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable that overrides the storage directory
pub const STORAGE_ENV: &str = "RQS_STORAGE";

/// Standard rqs paths
pub struct Paths {
    /// Home directory (~)
    pub home: PathBuf,
    /// Config directory (~/.config/rqs)
    pub config: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));

        let config = dirs::config_dir()
            .unwrap_or_else(|| home.join(".config"))
            .join("rqs");

        Self { home, config }
    }

    /// Default entry storage directory (~/.rqs_storage)
    pub fn default_storage(&self) -> PathBuf {
        self.home.join(".rqs_storage")
    }

    /// Path of the optional config file
    pub fn config_file(&self) -> PathBuf {
        self.config.join("config.json")
    }

    /// Resolve the storage directory.
    ///
    /// `RQS_STORAGE` wins over the config file, which wins over the default.
    pub fn storage(&self, configured: Option<&PathBuf>) -> PathBuf {
        self.storage_from(std::env::var_os(STORAGE_ENV), configured)
    }

    fn storage_from(&self, env: Option<OsString>, configured: Option<&PathBuf>) -> PathBuf {
        if let Some(dir) = env.filter(|v| !v.is_empty()) {
            return PathBuf::from(dir);
        }
        configured
            .cloned()
            .unwrap_or_else(|| self.default_storage())
    }
}
