// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Prefs storage selection for the CLI.

use std::path::Path;

use lsys_app_core::config::{ConfigError, ConfigService, ConfigStore, MemoryConfigStore};
use lsys_config_fs::FsConfigStore;
use tracing::{debug, warn};

/// Either the on-disk store or a throwaway in-memory one (`--no-prefs`).
pub enum PrefsStore {
    /// JSON files under a config directory.
    Fs(FsConfigStore),
    /// Nothing outlives the process.
    Memory(MemoryConfigStore),
}

impl PrefsStore {
    /// Picks the store for this invocation.
    ///
    /// Falls back to memory when the config directory cannot be prepared.
    pub fn open(no_prefs: bool, config_dir: Option<&Path>) -> ConfigService<Self> {
        let store = if no_prefs {
            Self::Memory(MemoryConfigStore::default())
        } else {
            let fs = match config_dir {
                Some(dir) => FsConfigStore::at(dir),
                None => FsConfigStore::new(),
            };
            match fs {
                Ok(fs) => {
                    debug!(base = %fs.base().display(), "using prefs dir");
                    Self::Fs(fs)
                }
                Err(err) => {
                    warn!(%err, "prefs dir unavailable; prefs will not be saved");
                    Self::Memory(MemoryConfigStore::default())
                }
            }
        };
        ConfigService::new(store)
    }

    /// `true` when saved values survive this process.
    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::Fs(_))
    }
}

impl ConfigStore for PrefsStore {
    fn load_raw(&self, key: &str) -> Result<Vec<u8>, ConfigError> {
        match self {
            Self::Fs(store) => store.load_raw(key),
            Self::Memory(store) => store.load_raw(key),
        }
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), ConfigError> {
        match self {
            Self::Fs(store) => store.save_raw(key, data),
            Self::Memory(store) => store.save_raw(key, data),
        }
    }
}
