//! Configuration loader for the dotenv-style settings file

use super::{Config, ConfigError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// File name of the settings file in the user's home directory
pub const CONFIG_FILE_NAME: &str = ".screenshot-uploader";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Default settings file location: `~/.screenshot-uploader`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::home_dir()
            .map(|home| home.join(CONFIG_FILE_NAME))
            .ok_or(ConfigError::NoHomeDirectory)
    }

    /// Load configuration from a file.
    ///
    /// Keys already set in the process environment win over the file, the
    /// same way a dotenv loader that never overrides existing variables
    /// behaves. The environment itself is left untouched.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let entries = Self::read_entries(path.as_ref())?;
        Config::from_lookup(|key| std::env::var(key).ok().or_else(|| entries.get(key).cloned()))
    }

    /// Parse every `KEY=value` pair in the file
    fn read_entries(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
        let read_error = |source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        };

        let mut entries = HashMap::new();
        for item in dotenvy::from_path_iter(path).map_err(read_error)? {
            let (key, value) = item.map_err(read_error)?;
            entries.insert(key, value);
        }

        tracing::debug!(path = %path.display(), keys = entries.len(), "Read configuration file");
        Ok(entries)
    }
}
