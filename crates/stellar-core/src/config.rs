//! Site configuration management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    link,
};

/// Main configuration structure for Stellar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Content storage locations.
    #[serde(default)]
    pub content: ContentConfig,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Main navigation, in display order.
    #[serde(default)]
    pub nav: Vec<NavItem>,

    /// Directory the configuration was loaded from.
    #[serde(skip)]
    pub root: PathBuf,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Short brand name.
    #[serde(default)]
    pub name: Option<String>,

    /// Site title.
    pub title: String,

    /// Base URL for the site (e.g., "https://example.com").
    pub base_url: String,

    /// Site description for meta tags.
    #[serde(default)]
    pub description: Option<String>,

    /// Site author name.
    #[serde(default)]
    pub author: Option<String>,

    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
}

/// Where content documents and public assets live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Root of the collection and singleton directories.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Directory that absolute (`/...`) asset references resolve against.
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
}

/// Build configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Whether to publish drafts.
    #[serde(default)]
    pub drafts: bool,
}

/// A single navigation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    /// Link text.
    pub text: String,

    /// Target, absolute or site-relative.
    pub link: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("src/data")
}

fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            public_dir: default_public_dir(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.root = config_root(path);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `STELLAR_`-prefixed environment overrides.
    ///
    /// Nested keys use a double underscore: `STELLAR_SITE__BASE_URL`.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix("STELLAR")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut config: Config = settings.try_deserialize()?;
        config.root = config_root(path);
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.site.title.is_empty() {
            return Err(CoreError::config("site.title cannot be empty"));
        }

        if self.site.base_url.is_empty() {
            return Err(CoreError::config("site.base_url cannot be empty"));
        }

        if !link::is_absolute(&self.site.base_url) {
            return Err(CoreError::config(format!(
                "site.base_url must be an absolute URL, got '{}'",
                self.site.base_url
            )));
        }

        if self.site.base_url.ends_with('/') {
            tracing::warn!("site.base_url should not have a trailing slash");
        }

        for (i, item) in self.nav.iter().enumerate() {
            if item.text.trim().is_empty() {
                return Err(CoreError::config(format!("nav[{i}].text cannot be empty")));
            }
            link::parse_link(&item.link).map_err(|e| {
                CoreError::config_with_source(
                    format!("nav[{i}].link is not a valid link: '{}'", item.link),
                    e,
                )
            })?;
        }

        Ok(())
    }

    /// Directory holding collection and singleton documents.
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(&self.content.data_dir)
    }

    /// Directory holding public assets.
    pub fn public_dir(&self) -> PathBuf {
        self.root.join(&self.content.public_dir)
    }

    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.site.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

fn config_root(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}
