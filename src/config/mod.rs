//! Unified configuration system.
//!
//! Consolidates configuration from tiers with field-by-field YAML merging:
//! 1. **Defaults** - Built into the binary
//! 2. **Project** - `$CWD/taskboard/config.yaml`
//! 3. **User** - `~/.taskboard/config.yaml`
//! 4. **Environment** - variables listed below
//!
//! Command-line flags are applied last, by the binary.
//!
//! ## Environment Variables
//! - `TASKBOARD_CONFIG_PATH` - Explicit config file (replaces project and user tiers)
//! - `TASKBOARD_STORE_PATH` - JSON task store path
//! - `TASKBOARD_HOST` - Interface to bind
//! - `PORT` / `TASKBOARD_PORT` - Port to listen on
//! - `TASKBOARD_USER_DIR` - User config dir (default: `~/.taskboard`)
//! - `TASKBOARD_PROJECT_DIR` - Project config dir (default: `./taskboard`)

mod loader;
mod merge;
mod types;

pub use loader::{ConfigLoader, ConfigPaths, ConfigTier};
pub use merge::deep_merge;
pub use types::*;
