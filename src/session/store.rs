//! Directory-backed keyed JSON store for questionnaire snapshots.
//!
//! Persistence is strictly best-effort from the caller's point of view: a
//! failed save degrades to `None` and the in-memory state stays
//! authoritative. Loads treat missing keys and malformed payloads the same
//! way. Nothing in here panics or bubbles an error into the UI.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::QuoteError;
use crate::questionnaire::QuestionnaireState;
use crate::utils::{ensure_dir, resolve_base, sessions_dir_in};

/// Namespace prefix for every persisted session key.
pub const SESSION_PREFIX: &str = "quote-session-";

const SESSION_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// One stored session, as shown by the shell's `sessions` command.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub id: String,
    pub modified: DateTime<Utc>,
    pub current_step: usize,
    pub is_complete: bool,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions_dir: PathBuf,
}

impl SessionStore {
    pub fn new(root: Option<PathBuf>) -> Result<Self, QuoteError> {
        let base = resolve_base(root);
        ensure_dir(&base)?;
        let sessions_dir = sessions_dir_in(&base);
        ensure_dir(&sessions_dir)?;
        Ok(Self { sessions_dir })
    }

    pub fn new_default() -> Result<Self, QuoteError> {
        Self::new(None)
    }

    /// Generates a fresh session id: prefix, millisecond timestamp, and a
    /// random tail so rapid saves never collide.
    pub fn new_session_id() -> String {
        let tail = Uuid::new_v4().simple().to_string();
        format!(
            "{}{}-{}",
            SESSION_PREFIX,
            Utc::now().timestamp_millis(),
            &tail[..8]
        )
    }

    pub fn session_path(&self, id: &str) -> PathBuf {
        self.sessions_dir
            .join(format!("{}.{}", id, SESSION_EXTENSION))
    }

    /// Persists `state` under a freshly generated id and returns it, or
    /// `None` when the write fails.
    pub fn save(&self, state: &QuestionnaireState) -> Option<String> {
        let id = Self::new_session_id();
        self.save_as(&id, state)
    }

    /// Persists `state` under an existing id, overwriting any prior snapshot
    /// (last write wins). Returns `None` on failure instead of erroring.
    pub fn save_as(&self, id: &str, state: &QuestionnaireState) -> Option<String> {
        match self.write_session(id, state) {
            Ok(()) => Some(id.to_string()),
            Err(err) => {
                tracing::warn!(session = id, error = %err, "failed to persist session");
                None
            }
        }
    }

    fn write_session(&self, id: &str, state: &QuestionnaireState) -> Result<(), QuoteError> {
        validate_session_id(id)?;
        let mut snapshot = state.clone();
        snapshot.sync_legacy_mirror();
        let json = serde_json::to_string_pretty(&snapshot)?;
        let path = self.session_path(id);
        let tmp = tmp_path(&path);
        let mut file = File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Loads a snapshot by id. Missing keys and malformed payloads both read
    /// as "no session"; neither throws.
    pub fn load(&self, id: &str) -> Option<QuestionnaireState> {
        if validate_session_id(id).is_err() {
            tracing::warn!(session = id, "rejected malformed session id");
            return None;
        }
        let data = fs::read_to_string(self.session_path(id)).ok()?;
        match serde_json::from_str::<QuestionnaireState>(&data) {
            Ok(mut state) => {
                state.absorb_legacy_fields();
                Some(state)
            }
            Err(err) => {
                tracing::warn!(session = id, error = %err, "discarding corrupt session snapshot");
                None
            }
        }
    }

    /// Removes a saved session. Removing an absent key is not an error.
    pub fn clear(&self, id: &str) {
        if validate_session_id(id).is_err() {
            return;
        }
        if let Err(err) = fs::remove_file(self.session_path(id)) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(session = id, error = %err, "failed to remove session");
            }
        }
    }

    /// Summaries of every stored session, newest first. Unreadable entries
    /// are skipped with a warning.
    pub fn list(&self) -> Vec<SessionSummary> {
        let Ok(entries) = fs::read_dir(&self.sessions_dir) else {
            return Vec::new();
        };
        let mut summaries = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(SESSION_EXTENSION) {
                continue;
            }
            let Some(id) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .filter(|stem| stem.starts_with(SESSION_PREFIX))
                .map(str::to_string)
            else {
                continue;
            };
            let Some(state) = self.load(&id) else {
                continue;
            };
            let modified = entry
                .metadata()
                .and_then(|meta| meta.modified())
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());
            summaries.push(SessionSummary {
                id,
                modified,
                current_step: state.current_step,
                is_complete: state.is_complete,
            });
        }
        summaries.sort_by(|a, b| b.modified.cmp(&a.modified).then(b.id.cmp(&a.id)));
        summaries
    }
}

fn validate_session_id(id: &str) -> Result<(), QuoteError> {
    let valid = id.strip_prefix(SESSION_PREFIX).is_some_and(|rest| {
        !rest.is_empty()
            && rest
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
    });
    if valid {
        Ok(())
    } else {
        Err(QuoteError::InvalidSession(id.to_string()))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_carry_the_namespace_prefix() {
        assert!(validate_session_id("quote-session-17000-abcd1234").is_ok());
        assert!(validate_session_id("quote-session-").is_err());
        assert!(validate_session_id("other-key").is_err());
        assert!(validate_session_id("quote-session-../escape").is_err());
    }

    #[test]
    fn generated_ids_validate_and_differ() {
        let first = SessionStore::new_session_id();
        let second = SessionStore::new_session_id();
        assert!(validate_session_id(&first).is_ok());
        assert_ne!(first, second);
    }

    #[test]
    fn tmp_path_appends_the_suffix() {
        let path = Path::new("/tmp/quote-session-1.json");
        assert_eq!(
            tmp_path(path),
            PathBuf::from("/tmp/quote-session-1.json.tmp")
        );
    }
}
