use std::{
    env, fs, io,
    path::{Path, PathBuf},
    sync::Once,
};

use dirs::home_dir;

const DEFAULT_DIR_NAME: &str = ".quote_core";
const SESSIONS_DIR: &str = "sessions";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("quote_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}

/// Returns the application-specific data directory, defaulting to `~/.quote_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("QUOTE_CORE_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Resolves the effective base directory, honoring an explicit override.
pub fn resolve_base(root: Option<PathBuf>) -> PathBuf {
    root.unwrap_or_else(app_data_dir)
}

/// Directory holding saved questionnaire sessions under `base`.
pub fn sessions_dir_in(base: &Path) -> PathBuf {
    base.join(SESSIONS_DIR)
}

/// Path to the configuration file under `base`.
pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_DIR).join(CONFIG_FILE)
}

/// Creates `path` (and parents) when missing.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_root_wins_over_the_environment() {
        let explicit = PathBuf::from("/tmp/quote-core-test-root");
        assert_eq!(resolve_base(Some(explicit.clone())), explicit);
    }

    #[test]
    fn derived_paths_nest_under_the_base() {
        let base = PathBuf::from("/data/app");
        assert_eq!(sessions_dir_in(&base), PathBuf::from("/data/app/sessions"));
        assert_eq!(
            config_file_in(&base),
            PathBuf::from("/data/app/config/config.json")
        );
    }
}
