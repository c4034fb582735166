use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::errors::QuoteError;
use crate::utils::{config_file_in, ensure_dir, resolve_base};

const TMP_SUFFIX: &str = "tmp";

/// Runtime knobs for the wizard and its persistence cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds between autosave ticks while the wizard is mounted.
    pub autosave_secs: u64,
    /// Maximum undo/redo entries retained per questionnaire.
    pub history_limit: usize,
    /// Seconds a transient notice stays on screen.
    pub notice_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_session: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            autosave_secs: 30,
            history_limit: 50,
            notice_secs: 3,
            last_session: None,
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new(root: Option<PathBuf>) -> Result<Self, QuoteError> {
        let base = resolve_base(root);
        ensure_dir(&base)?;
        let path = config_file_in(&base);
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        Ok(Self { path })
    }

    pub fn new_default() -> Result<Self, QuoteError> {
        Self::new(None)
    }

    /// Loads the configuration, falling back to defaults when no file exists.
    pub fn load(&self) -> Result<Config, QuoteError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    /// Writes the configuration atomically by staging to a temporary file.
    pub fn save(&self, config: &Config) -> Result<(), QuoteError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
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
