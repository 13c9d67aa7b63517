//! Settings file discovery and parsing
//!
//! Looked up in order, first hit wins:
//! 1. `./phrasecount.toml`
//! 2. `~/.config/phrasecount/config.toml` (platform config dir)

use crate::phrases::TieBreak;
use crate::pipeline::parallel::FailurePolicy;
use crate::reporters::OutputFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Settings file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "phrasecount.toml";

/// Largest worker count accepted from any source
pub const MAX_WORKERS: usize = 64;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub defaults: CliDefaults,
}

/// Defaults for command-line flags; `None` means "use the built-in value"
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CliDefaults {
    pub top: Option<usize>,
    pub format: Option<OutputFormat>,
    pub tie_break: Option<TieBreak>,
    pub on_error: Option<FailurePolicy>,
    pub workers: Option<usize>,
}

impl Settings {
    /// Per-user settings path
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("phrasecount").join("config.toml"))
    }

    /// Drop values that are out of range, logging each one.
    fn sanitize(mut self, origin: &Path) -> Self {
        if self.defaults.top == Some(0) {
            warn!("{}: top must be at least 1, ignoring", origin.display());
            self.defaults.top = None;
        }
        if let Some(w) = self.defaults.workers {
            if w == 0 || w > MAX_WORKERS {
                warn!(
                    "{}: workers must be 1-{}, ignoring {}",
                    origin.display(),
                    MAX_WORKERS,
                    w
                );
                self.defaults.workers = None;
            }
        }
        self
    }
}

/// Load settings, looking in `dir` first and then the user config directory.
///
/// A missing file is not an error. An unreadable or malformed file is logged
/// and skipped.
pub fn load_config(dir: &Path) -> Settings {
    let candidates = std::iter::once(dir.join(CONFIG_FILE_NAME)).chain(Settings::user_config_path());

    for path in candidates {
        if !path.exists() {
            continue;
        }
        match load_toml_config(&path) {
            Ok(settings) => {
                debug!("Loaded settings from {}", path.display());
                return settings.sanitize(&path);
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
            }
        }
    }

    debug!("No settings file found, using defaults");
    Settings::default()
}

/// Load settings from a TOML file
fn load_toml_config(path: &Path) -> anyhow::Result<Settings> {
    let content = std::fs::read_to_string(path)?;
    let settings: Settings = toml::from_str(&content)?;
    Ok(settings)
}
