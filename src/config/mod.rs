//! Filesystem locations and persisted application settings.

use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};
use uuid::Uuid;

use crate::errors::CoreResult;
use crate::utils::ensure_dir;

const DEFAULT_DIR_NAME: &str = ".envelope_core";
const STORE_FILE: &str = "store.json";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Environment variable overriding the data directory, mainly for tests.
pub const HOME_OVERRIDE_VAR: &str = "ENVELOPE_CORE_HOME";

/// Returns the application data directory, defaulting to `~/.envelope_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_OVERRIDE_VAR) {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Canonical path of the JSON datastore snapshot.
pub fn store_file() -> PathBuf {
    app_data_dir().join(STORE_FILE)
}

/// Settings the embedding application persists between sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Owner to reopen on launch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_owner: Option<Uuid>,
    /// Whether login should run default-data seeding.
    #[serde(default = "default_seed_on_login")]
    pub seed_on_login: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            last_owner: None,
            seed_on_login: true,
        }
    }
}

fn default_seed_on_login() -> bool {
    true
}

/// Loads and saves [`AppConfig`] under a base directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> CoreResult<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> CoreResult<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    /// Reads the stored configuration, falling back to defaults when the
    /// file does not exist yet.
    pub fn load(&self) -> CoreResult<AppConfig> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(AppConfig::default())
        }
    }

    pub fn save(&self, config: &AppConfig) -> CoreResult<()> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
