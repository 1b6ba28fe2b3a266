use serde::Deserialize;
use std::path::Path;

/// Name of the optional settings file looked up in the current directory.
pub const CONFIG_FILE: &str = "solid.yaml";

/// Error type for settings loading.
#[derive(Debug)]
pub enum ConfigError {
    /// An I/O or YAML parsing error occurred while loading the settings file.
    Load(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Load(msg) => write!(f, "Config load error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// CLI settings.
///
/// Resolution order (lowest to highest priority):
/// 1. Built-in defaults
/// 2. `solid.yaml` in the current directory
/// 3. Environment variables (`SOLID_PACKAGE_MANAGER`, `SOLID_DOCS_URL`,
///    `SOLID_LOG`, `SOLID_DEFAULT_PROJECT_NAME`)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Package manager used for `solid start dev` and the printed next steps.
    pub package_manager: String,
    pub docs_url: String,
    /// Default log filter when neither `SOLID_LOG` nor `RUST_LOG` is set.
    pub log: String,
    pub default_project_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            package_manager: "npm".into(),
            docs_url: "https://docs.solidjs.com".into(),
            log: "warn".into(),
            default_project_name: "solid-project".into(),
        }
    }
}

impl Settings {
    /// Load `solid.yaml` from the current directory, then overlay the
    /// process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Self::load_file(Path::new(CONFIG_FILE))?;
        settings.overlay_env(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Settings from a YAML file, or the defaults if it does not exist.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Settings::default());
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Load(e.to_string()))?;
        Self::from_yaml_str(&content)
    }

    /// Parse settings from a YAML string. Missing keys keep their defaults;
    /// an empty document yields the defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Settings::default());
        }
        serde_yaml::from_str(content).map_err(|e| ConfigError::Load(e.to_string()))
    }

    /// Replace fields with values found by `lookup`. Empty values are ignored.
    pub fn overlay_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields = [
            ("SOLID_PACKAGE_MANAGER", &mut self.package_manager),
            ("SOLID_DOCS_URL", &mut self.docs_url),
            ("SOLID_LOG", &mut self.log),
            ("SOLID_DEFAULT_PROJECT_NAME", &mut self.default_project_name),
        ];
        for (key, field) in fields {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *field = value;
            }
        }
    }
}
