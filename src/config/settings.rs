use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::ui::layout::{LayoutConstraints, Pane, PaneWidth};
use crate::ui::terminal_log::DEFAULT_CAPACITY;
use crate::util::paths::config_path;

/// Example configuration file contents (bundled with the binary)
pub const EXAMPLE_CONFIG: &str = include_str!("config.toml.example");

/// Backend address used when nothing is configured
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:4317";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend service
    pub backend_url: String,
    /// Upper bound for a single backend call; unbounded when `None`
    pub backend_timeout: Option<Duration>,
    /// Initial pane widths and their bounds
    pub layout: LayoutConstraints,
    /// Number of activity log entries retained
    pub terminal_capacity: usize,
    /// Maximum number of file tabs open at once
    pub max_tabs: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            backend_timeout: None,
            layout: LayoutConstraints::default(),
            terminal_capacity: DEFAULT_CAPACITY,
            max_tabs: 10,
        }
    }
}

/// TOML representation of backend configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlBackendConfig {
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// TOML representation of one pane's width settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlPaneConfig {
    pub width: Option<i32>,
    pub min: Option<i32>,
    pub max: Option<i32>,
}

impl TomlPaneConfig {
    fn apply_to(&self, pane: PaneWidth) -> PaneWidth {
        PaneWidth::new(
            self.width.unwrap_or(pane.width),
            self.min.unwrap_or(pane.min),
            self.max.unwrap_or(pane.max),
        )
    }
}

/// TOML representation of layout configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlLayoutConfig {
    pub sidebar: Option<TomlPaneConfig>,
    pub explorer: Option<TomlPaneConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlTerminalConfig {
    pub capacity: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlTabsConfig {
    pub max_open: Option<usize>,
}

/// TOML representation of the config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    pub backend: Option<TomlBackendConfig>,
    pub layout: Option<TomlLayoutConfig>,
    pub terminal: Option<TomlTerminalConfig>,
    pub tabs: Option<TomlTabsConfig>,
}

impl Config {
    /// Load configuration from file, merging with defaults
    pub fn load() -> Self {
        let config_file = config_path();

        // Create example config on first run
        if !config_file.exists() {
            Self::create_default_config(&config_file);
        }

        Self::load_from(&config_file)
    }

    /// Load configuration from a specific file; a missing or invalid file yields defaults
    pub fn load_from(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Config::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file");
                return Config::default();
            }
        };
        match Self::from_toml_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring invalid config file");
                Config::default()
            }
        }
    }

    /// Parse a config document on top of the defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        let toml_config = toml::from_str::<TomlConfig>(contents)?;
        let mut config = Config::default();
        config.merge(toml_config);
        Ok(config)
    }

    fn merge(&mut self, toml_config: TomlConfig) {
        if let Some(backend) = toml_config.backend {
            if let Some(url) = backend.url.filter(|u| !u.trim().is_empty()) {
                self.backend_url = url;
            }
            // Zero means no limit
            if let Some(secs) = backend.timeout_secs {
                self.backend_timeout = (secs > 0).then(|| Duration::from_secs(secs));
            }
        }

        if let Some(layout) = toml_config.layout {
            let mut sidebar = *self.layout.pane(Pane::Sidebar);
            let mut explorer = *self.layout.pane(Pane::Explorer);
            if let Some(pane) = layout.sidebar {
                sidebar = pane.apply_to(sidebar);
            }
            if let Some(pane) = layout.explorer {
                explorer = pane.apply_to(explorer);
            }
            self.layout = LayoutConstraints::new(sidebar, explorer);
        }

        if let Some(capacity) = toml_config.terminal.and_then(|t| t.capacity) {
            self.terminal_capacity = capacity.max(1);
        }

        if let Some(max_open) = toml_config.tabs.and_then(|t| t.max_open) {
            self.max_tabs = max_open.max(1);
        }
    }

    /// Create the default config file from the bundled example
    fn create_default_config(path: &Path) {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::warn!(error = %e, "Failed to create config directory");
                    return;
                }
            }
        }

        if let Err(e) = fs::write(path, EXAMPLE_CONFIG) {
            tracing::warn!(error = %e, "Failed to write default config");
        }
    }

    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = url.into();
        self
    }
}
