//! Configuration for phrasecount
//!
//! Settings come from an optional TOML file; command-line flags override them.
//!
//! # Configuration Format
//!
//! ```toml
//! # phrasecount.toml
//!
//! [defaults]
//! top = 100              # entries to report
//! format = "text"        # text | json
//! tie_break = "lexical"  # lexical | legacy
//! on_error = "continue"  # continue | fail-fast
//! workers = 8            # sources read at once (1-64)
//! ```

mod settings;

pub use settings::{load_config, CliDefaults, Settings, CONFIG_FILE_NAME};
