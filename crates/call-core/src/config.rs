use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::errors::CallError;

const CONFIG_FILE: &str = "call_config.json";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CallConfig {
    /// Reject state jumps the transition table does not allow.
    /// When off, only terminal states are guarded.
    #[serde(default = "default_true")]
    pub enforce_transition_table: bool,
    /// Panic on fatal defects (threading violations) instead of only logging.
    #[serde(default = "default_panic_on_fatal")]
    pub panic_on_fatal_defect: bool,
}

fn default_true() -> bool {
    true
}

fn default_panic_on_fatal() -> bool {
    cfg!(debug_assertions)
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            enforce_transition_table: true,
            panic_on_fatal_defect: default_panic_on_fatal(),
        }
    }
}

/// JSON-backed config in the app data directory.
///
/// A missing or unreadable file yields defaults.
pub struct ConfigStore {
    config: Mutex<CallConfig>,
    file_path: PathBuf,
}

impl ConfigStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let file_path = data_dir.as_ref().join(CONFIG_FILE);
        let config = Self::load(&file_path);
        Self {
            config: Mutex::new(config),
            file_path,
        }
    }

    pub fn get(&self) -> CallConfig {
        self.lock().clone()
    }

    pub fn set_enforce_transition_table(&self, enabled: bool) -> Result<(), CallError> {
        self.lock().enforce_transition_table = enabled;
        self.save()
    }

    pub fn set_panic_on_fatal_defect(&self, enabled: bool) -> Result<(), CallError> {
        self.lock().panic_on_fatal_defect = enabled;
        self.save()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CallConfig> {
        self.config.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn save(&self) -> Result<(), CallError> {
        let config = self.get();
        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CallError::Config(e.to_string()))?;
        }
        let json =
            serde_json::to_string_pretty(&config).map_err(|e| CallError::Config(e.to_string()))?;
        std::fs::write(&self.file_path, json).map_err(|e| CallError::Config(e.to_string()))?;
        tracing::debug!("call config saved to {}", self.file_path.display());
        Ok(())
    }

    fn load(path: &Path) -> CallConfig {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("ignoring unreadable call config {}: {e}", path.display());
                CallConfig::default()
            }),
            Err(_) => CallConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    #[test]
    fn test_default_config() {
        let c = CallConfig::default();
        assert!(c.enforce_transition_table);
        assert_eq!(c.panic_on_fatal_defect, cfg!(debug_assertions));
    }

    #[test]
    fn test_new_creates_defaults_when_no_file() {
        let dir = temp_dir();
        let store = ConfigStore::new(dir.path());
        assert_eq!(store.get(), CallConfig::default());
    }

    #[test]
    fn test_settings_persist() {
        let dir = temp_dir();
        {
            let store = ConfigStore::new(dir.path());
            store.set_enforce_transition_table(false).unwrap();
            store.set_panic_on_fatal_defect(true).unwrap();
        }
        let store = ConfigStore::new(dir.path());
        let c = store.get();
        assert!(!c.enforce_transition_table);
        assert!(c.panic_on_fatal_defect);
    }

    #[test]
    fn test_save_creates_missing_data_dir() {
        let dir = temp_dir();
        let nested = dir.path().join("calls");
        let store = ConfigStore::new(&nested);
        store.set_enforce_transition_table(false).unwrap();
        assert!(nested.join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = temp_dir();
        fs::write(dir.path().join(CONFIG_FILE), "not json!!!").unwrap();
        let store = ConfigStore::new(dir.path());
        assert_eq!(store.get(), CallConfig::default());
    }

    #[test]
    fn test_partial_json_uses_serde_defaults() {
        let dir = temp_dir();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{"panic_on_fatal_defect":false}"#,
        )
        .unwrap();
        let store = ConfigStore::new(dir.path());
        let c = store.get();
        assert!(c.enforce_transition_table);
        assert!(!c.panic_on_fatal_defect);
    }
}
