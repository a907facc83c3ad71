use std::path::{Path, PathBuf};
use std::sync::RwLock;

use anyhow::Context;

use crate::foundation::error::{StoryError, StoryResult};
use crate::scene::model::BrandConfig;

/// File name of the persisted brand config inside the config directory.
pub const BRAND_CONFIG_FILE: &str = "brand-config.json";

/// Environment variable naming the config directory.
pub const CONFIG_DIR_ENV: &str = "STORYFRAME_CONFIG_DIR";

/// Local persistent storage for [`BrandConfig`].
pub trait BrandConfigStore: Send + Sync {
    /// Persist `config`.
    fn save(&self, config: &BrandConfig) -> StoryResult<()>;

    /// Load the stored config. Missing or malformed data is `None`.
    fn load(&self) -> Option<BrandConfig>;
}

/// Load the stored config or the factory default.
pub fn load_or_default(store: &dyn BrandConfigStore) -> BrandConfig {
    store.load().unwrap_or_default()
}

/// Save `config` only when it differs from the factory default. Returns whether it was written.
pub fn autosave_if_customized(store: &dyn BrandConfigStore, config: &BrandConfig) -> StoryResult<bool> {
    if config.is_factory_default() {
        return Ok(false);
    }
    store.save(config)?;
    Ok(true)
}

/// Resolve the config directory: explicit flag, else `STORYFRAME_CONFIG_DIR`, else
/// `./.storyframe`.
pub fn resolve_config_dir(flag: Option<&Path>) -> PathBuf {
    if let Some(p) = flag {
        return p.to_path_buf();
    }
    match std::env::var_os(CONFIG_DIR_ENV) {
        Some(v) if !v.is_empty() => PathBuf::from(v),
        _ => PathBuf::from(".storyframe"),
    }
}

/// Stores the brand config as pretty JSON at `<dir>/brand-config.json`.
#[derive(Clone, Debug)]
pub struct JsonFileBrandStore {
    path: PathBuf,
}

impl JsonFileBrandStore {
    /// Store inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(BRAND_CONFIG_FILE),
        }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BrandConfigStore for JsonFileBrandStore {
    fn save(&self, config: &BrandConfig) -> StoryResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create config dir '{}'", parent.display()))?;
        }
        let json =
            serde_json::to_vec_pretty(config).map_err(|e| StoryError::serde(e.to_string()))?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("write '{}'", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), "brand config saved");
        Ok(())
    }

    fn load(&self) -> Option<BrandConfig> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), %e, "brand config unreadable; using defaults");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), %e, "brand config malformed; ignoring");
                None
            }
        }
    }
}

/// In-memory store, e.g. for tests or ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryBrandStore {
    slot: RwLock<Option<String>>,
}

impl MemoryBrandStore {
    /// Store pre-seeded with raw (possibly malformed) JSON.
    pub fn with_raw(json: impl Into<String>) -> Self {
        Self {
            slot: RwLock::new(Some(json.into())),
        }
    }
}

impl BrandConfigStore for MemoryBrandStore {
    fn save(&self, config: &BrandConfig) -> StoryResult<()> {
        let json = serde_json::to_string(config).map_err(|e| StoryError::serde(e.to_string()))?;
        let mut slot = self
            .slot
            .write()
            .map_err(|_| StoryError::persistence("brand store lock poisoned"))?;
        *slot = Some(json);
        Ok(())
    }

    fn load(&self) -> Option<BrandConfig> {
        let slot = self.slot.read().ok()?;
        serde_json::from_str(slot.as_deref()?).ok()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/brand_store.rs"]
mod tests;
