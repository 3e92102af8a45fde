// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Prefs port shared across lsys front ends.

use tracing::warn;

use crate::config::{ConfigService, ConfigStore};
use crate::prefs::{ToolPrefs, PREFS_KEY};

/// Front-end facing port for loading/saving [`ToolPrefs`].
pub trait PrefsPort {
    /// Load prefs (returns None if missing or unreadable).
    fn load_prefs(&self) -> Option<ToolPrefs>;
    /// Persist prefs (best-effort; failures are logged).
    fn save_prefs(&self, prefs: &ToolPrefs) -> bool;
}

impl<S: ConfigStore> PrefsPort for ConfigService<S> {
    fn load_prefs(&self) -> Option<ToolPrefs> {
        match self.load(PREFS_KEY) {
            Ok(prefs) => prefs,
            Err(err) => {
                warn!(%err, "ignoring unreadable prefs");
                None
            }
        }
    }

    fn save_prefs(&self, prefs: &ToolPrefs) -> bool {
        match self.save(PREFS_KEY, prefs) {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "failed to save prefs");
                false
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;

    #[test]
    fn unreadable_prefs_degrade_to_none() {
        let svc = ConfigService::new(MemoryConfigStore::default());
        svc.store().save_raw(PREFS_KEY, b"[1, 2").unwrap();
        assert!(svc.load_prefs().is_none());
    }

    #[test]
    fn saved_prefs_round_trip() {
        let svc = ConfigService::new(MemoryConfigStore::default());
        let prefs = ToolPrefs {
            prefix: "algae".into(),
            recursions: 9,
            ..ToolPrefs::default()
        };
        assert!(svc.save_prefs(&prefs));
        assert_eq!(svc.load_prefs(), Some(prefs));
    }
}
