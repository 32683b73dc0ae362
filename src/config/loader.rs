//! Configuration loader with tier-based merging.
//!
//! Loads configuration from multiple tiers and merges them field-by-field.

use super::merge::deep_merge_all;
use super::types::Config;
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Configuration tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    /// Built-in defaults (lowest priority)
    Defaults = 0,
    /// Project-level config ($CWD/taskboard/)
    Project = 1,
    /// User-level config (~/.taskboard/)
    User = 2,
    /// Environment variables (highest priority)
    Environment = 3,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Defaults => write!(f, "defaults"),
            ConfigTier::Project => write!(f, "project"),
            ConfigTier::User => write!(f, "user"),
            ConfigTier::Environment => write!(f, "environment"),
        }
    }
}

/// Paths for each configuration tier.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project-level config directory
    pub project_dir: Option<PathBuf>,
    /// User-level config directory
    pub user_dir: Option<PathBuf>,
    /// Explicit config file, bypassing the tiers
    pub explicit_file: Option<PathBuf>,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::discover()
    }
}

impl ConfigPaths {
    /// Discover configuration paths from environment and defaults.
    pub fn discover() -> Self {
        // User dir: TASKBOARD_USER_DIR or ~/.taskboard
        let user_dir = std::env::var("TASKBOARD_USER_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".taskboard")));

        // Project dir: TASKBOARD_PROJECT_DIR or $CWD/taskboard
        let project_dir = std::env::var("TASKBOARD_PROJECT_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from("taskboard")));

        let explicit_file = std::env::var("TASKBOARD_CONFIG_PATH").ok().map(PathBuf::from);

        Self {
            project_dir,
            user_dir,
            explicit_file,
        }
    }

    /// Create paths with explicit directories.
    pub fn with_dirs(project_dir: Option<PathBuf>, user_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            user_dir,
            explicit_file: None,
        }
    }

    /// Use a single config file instead of the project and user tiers.
    pub fn with_explicit_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }
}

/// Configuration loader that handles tier-based merging.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Paths for each tier
    pub paths: ConfigPaths,
    /// Loaded configuration
    config: Config,
    /// Config files that contributed, lowest tier first
    sources: Vec<(ConfigTier, PathBuf)>,
}

impl ConfigLoader {
    /// Load configuration from all tiers with proper merging.
    pub fn load() -> Result<Self> {
        Self::load_with_paths(ConfigPaths::discover())
    }

    /// Load configuration with explicit paths.
    pub fn load_with_paths(paths: ConfigPaths) -> Result<Self> {
        // Explicit config file overrides the project and user tiers
        if let Some(ref explicit) = paths.explicit_file {
            let mut config = Config::load(explicit)?;
            Self::apply_env_overrides(&mut config)?;
            return Ok(Self {
                sources: vec![(ConfigTier::Project, explicit.clone())],
                paths,
                config,
            });
        }

        let mut configs: Vec<Value> = Vec::new();
        let mut sources = Vec::new();

        // Tier 1: Defaults
        configs.push(serde_json::to_value(Config::default())?);

        // Tier 2: Project config
        if let Some(ref project_dir) = paths.project_dir
            && let Some(value) = Self::read_yaml(&project_dir.join("config.yaml"))
        {
            configs.push(value);
            sources.push((ConfigTier::Project, project_dir.join("config.yaml")));
        }

        // Tier 3: User config
        if let Some(ref user_dir) = paths.user_dir
            && let Some(value) = Self::read_yaml(&user_dir.join("config.yaml"))
        {
            configs.push(value);
            sources.push((ConfigTier::User, user_dir.join("config.yaml")));
        }

        let merged = deep_merge_all(configs);
        let mut config: Config =
            serde_json::from_value(merged).context("Invalid merged configuration")?;

        // Tier 4: Environment variable overrides
        Self::apply_env_overrides(&mut config)?;

        Ok(Self {
            paths,
            config,
            sources,
        })
    }

    /// Read a YAML file into a JSON value. Missing or unreadable files are
    /// skipped so a broken user config never blocks startup.
    fn read_yaml(path: &Path) -> Option<Value> {
        if !path.exists() {
            return None;
        }
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping unreadable config {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_yaml::from_str::<Value>(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Skipping invalid config {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Apply environment variable overrides to config.
    fn apply_env_overrides(config: &mut Config) -> Result<()> {
        if let Ok(store_path) = std::env::var("TASKBOARD_STORE_PATH") {
            config.server.store_path = PathBuf::from(store_path);
        }

        if let Ok(host) = std::env::var("TASKBOARD_HOST") {
            config.server.host = host;
        }

        // PORT is honored for compatibility with common deploy platforms
        for var in ["PORT", "TASKBOARD_PORT"] {
            if let Ok(port) = std::env::var(var) {
                config.server.port = port
                    .parse()
                    .with_context(|| format!("{} must be a port number, got {:?}", var, port))?;
            }
        }

        Ok(())
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get mutable access to the configuration.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }

    /// Config files that were merged, lowest tier first.
    pub fn sources(&self) -> &[(ConfigTier, PathBuf)] {
        &self.sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_only() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::with_dirs(
            Some(temp.path().join("project")),
            Some(temp.path().join("user")),
        );

        let loader = ConfigLoader::load_with_paths(paths).unwrap();
        let config = loader.config();

        assert_eq!(config.pagination.default_limit, 10);
        assert_eq!(config.pagination.max_limit, 100);
        assert!(loader.sources().is_empty());
    }

    #[test]
    fn test_project_config_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("taskboard");
        std::fs::create_dir_all(&project_dir).unwrap();

        let config_content = r#"
pagination:
  default_limit: 25
"#;
        std::fs::write(project_dir.join("config.yaml"), config_content).unwrap();

        let paths = ConfigPaths::with_dirs(Some(project_dir), Some(temp.path().join("user")));

        let loader = ConfigLoader::load_with_paths(paths).unwrap();
        let config = loader.config();

        assert_eq!(config.pagination.default_limit, 25);
        assert_eq!(config.pagination.max_limit, 100);
        assert_eq!(loader.sources().len(), 1);
        assert_eq!(loader.sources()[0].0, ConfigTier::Project);
    }

    #[test]
    fn test_user_config_overrides_project() {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("taskboard");
        let user_dir = temp.path().join("user");
        std::fs::create_dir_all(&project_dir).unwrap();
        std::fs::create_dir_all(&user_dir).unwrap();

        let project_config = r#"
pagination:
  default_limit: 20
  max_limit: 50
"#;
        std::fs::write(project_dir.join("config.yaml"), project_config).unwrap();

        let user_config = r#"
pagination:
  default_limit: 5
"#;
        std::fs::write(user_dir.join("config.yaml"), user_config).unwrap();

        let paths = ConfigPaths::with_dirs(Some(project_dir), Some(user_dir));

        let loader = ConfigLoader::load_with_paths(paths).unwrap();
        let config = loader.config();

        assert_eq!(config.pagination.default_limit, 5);
        assert_eq!(config.pagination.max_limit, 50);
    }

    #[test]
    fn test_invalid_project_yaml_is_skipped() {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("taskboard");
        std::fs::create_dir_all(&project_dir).unwrap();
        std::fs::write(project_dir.join("config.yaml"), "pagination: [oops").unwrap();

        let paths = ConfigPaths::with_dirs(Some(project_dir), None);
        let loader = ConfigLoader::load_with_paths(paths).unwrap();
        assert_eq!(loader.config().pagination.default_limit, 10);
    }

    #[test]
    fn test_explicit_file_bypasses_tiers() {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("taskboard");
        std::fs::create_dir_all(&project_dir).unwrap();
        std::fs::write(
            project_dir.join("config.yaml"),
            "pagination:\n  default_limit: 20\n",
        )
        .unwrap();

        let explicit = temp.path().join("custom.yaml");
        std::fs::write(&explicit, "pagination:\n  max_limit: 40\n").unwrap();

        let paths = ConfigPaths::with_dirs(Some(project_dir), None).with_explicit_file(&explicit);
        let loader = ConfigLoader::load_with_paths(paths).unwrap();

        assert_eq!(loader.config().pagination.default_limit, 10);
        assert_eq!(loader.config().pagination.max_limit, 40);
    }
}
