//! Configuration parsing, layering and validation.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Secret shipped in the example configuration; never valid for a real build.
pub const PLACEHOLDER_SECRET: &str = "secret_YOUR_NOTION_INTEGRATION_SECRET";

/// Database id shipped in the example configuration.
pub const PLACEHOLDER_DATABASE_ID: &str = "YOUR_NOTION_DATABASE_ID";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("No configuration file found (looked for {0:?})")]
    NotFound(Vec<PathBuf>),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

/// Main configuration struct matching the blockwiki YAML schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub notion: NotionConfig,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Emoji used as favicon for pages without an icon
    #[serde(default = "default_icon")]
    pub default_icon: String,

    #[serde(default)]
    pub emoji: EmojiConfig,

    #[serde(default)]
    pub copy: CopyConfig,

    #[serde(default)]
    pub highlight: HighlightConfig,

    #[serde(default)]
    pub embeds: EmbedsConfig,

    #[serde(default)]
    pub template: TemplateConfig,

    #[serde(default)]
    pub build: BuildConfig,

    // Internal: directory of the last config file read (for relative path resolution)
    #[serde(skip)]
    config_dir: Option<PathBuf>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("build")
}

fn default_icon() -> String {
    String::from("💡")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    /// Integration secret. Excluded from serialization so it never reaches the build seed.
    #[serde(default, skip_serializing)]
    pub secret: String,

    #[serde(default)]
    pub database_id: String,

    #[serde(default = "default_title_property")]
    pub title_property: String,

    #[serde(default = "default_filename_property")]
    pub filename_property: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_title_property() -> String {
    String::from("Name")
}

fn default_filename_property() -> String {
    String::from("Filename")
}

fn default_api_base() -> String {
    String::from("https://api.notion.com/v1")
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            database_id: String::new(),
            title_property: default_title_property(),
            filename_property: default_filename_property(),
            api_base: default_api_base(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmojiConfig {
    /// Directory holding one `<codepoints>.png` image per emoji
    #[serde(default = "default_emoji_dir")]
    pub directory: PathBuf,
}

fn default_emoji_dir() -> PathBuf {
    PathBuf::from("node_modules/emoji-datasource-apple/img/apple/64")
}

impl Default for EmojiConfig {
    fn default() -> Self {
        Self {
            directory: default_emoji_dir(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CopyConfig {
    /// Files copied verbatim (by basename) into the output directory
    #[serde(default)]
    pub assets: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighlightConfig {
    /// Languages eligible for highlighting. Empty means every language syntect knows.
    #[serde(default)]
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmbedsConfig {
    #[serde(default)]
    pub twitter: TwitterEmbedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitterEmbedConfig {
    #[serde(default)]
    pub cache: bool,

    #[serde(default = "default_tweet_cache")]
    pub cache_path: PathBuf,

    /// Keep the third-party widget script shipped in oEmbed responses
    #[serde(default)]
    pub include_script: bool,
}

fn default_tweet_cache() -> PathBuf {
    PathBuf::from("tweets.json")
}

impl Default for TwitterEmbedConfig {
    fn default() -> Self {
        Self {
            cache: false,
            cache_path: default_tweet_cache(),
            include_script: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    #[serde(default = "default_site_name")]
    pub site_name: String,

    /// Script inlined at the end of every page
    #[serde(default)]
    pub script: Option<PathBuf>,
}

fn default_site_name() -> String {
    String::from("blockwiki")
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            site_name: default_site_name(),
            script: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Fixed seed for synthetic identifiers. Derived from the config when unset.
    #[serde(default)]
    pub seed: Option<String>,
}

impl Config {
    /// Load `defaults` then deep-merge `overrides` on top of it.
    ///
    /// Either file may be missing, but not both. Relative paths resolve against
    /// the directory of the last file read.
    pub fn load_layered(defaults: &Path, overrides: &Path) -> Result<Self, ConfigError> {
        let mut merged = Value::Mapping(Default::default());
        let mut last_dir = None;

        for path in [defaults, overrides] {
            if !path.exists() {
                tracing::debug!("Config layer {:?} not present", path);
                continue;
            }
            let layer: Value = serde_yaml::from_str(&read(path)?)?;
            merge_yaml(&mut merged, layer);
            last_dir = Some(path.parent().map(Path::to_path_buf).unwrap_or_default());
            tracing::debug!("Loaded config layer {:?}", path);
        }

        let Some(dir) = last_dir else {
            return Err(ConfigError::NotFound(vec![
                defaults.to_path_buf(),
                overrides.to_path_buf(),
            ]));
        };

        let mut config: Config = serde_yaml::from_value(merged)?;
        config.config_dir = Some(dir);
        Ok(config)
    }

    /// Replace the integration secret (e.g. from the environment)
    pub fn with_secret(mut self, secret: Option<String>) -> Self {
        if let Some(secret) = secret.filter(|s| !s.trim().is_empty()) {
            self.notion.secret = secret;
        }
        self
    }

    /// Reject missing or placeholder credentials before any I/O happens.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let secret = self.notion.secret.trim();
        if secret.is_empty() {
            return Err(ConfigError::MissingField("notion.secret".into()));
        }
        if secret == PLACEHOLDER_SECRET {
            return Err(ConfigError::Invalid {
                field: "notion.secret".into(),
                reason: "still set to the example placeholder".into(),
            });
        }

        let database_id = self.notion.database_id.trim();
        if database_id.is_empty() {
            return Err(ConfigError::MissingField("notion.database_id".into()));
        }
        if database_id == PLACEHOLDER_DATABASE_ID {
            return Err(ConfigError::Invalid {
                field: "notion.database_id".into(),
                reason: "still set to the example placeholder".into(),
            });
        }

        if emojis::get(&self.default_icon).is_none() {
            return Err(ConfigError::Invalid {
                field: "default_icon".into(),
                reason: format!("{:?} is not a single emoji", self.default_icon),
            });
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("output_dir".into()));
        }

        Ok(())
    }

    /// Output directory, resolved relative to the config file
    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.output_dir)
    }

    /// Emoji image directory, resolved relative to the config file
    pub fn emoji_dir(&self) -> PathBuf {
        self.resolve_path(&self.emoji.directory)
    }

    /// Static assets to copy, resolved relative to the config file
    pub fn asset_paths(&self) -> Vec<PathBuf> {
        self.copy
            .assets
            .iter()
            .map(|p| self.resolve_path(p))
            .collect()
    }

    /// Tweet cache file when embed caching is enabled
    pub fn tweet_cache_path(&self) -> Option<PathBuf> {
        let twitter = &self.embeds.twitter;
        twitter
            .cache
            .then(|| self.resolve_path(&twitter.cache_path))
    }

    /// Inline page script, resolved relative to the config file
    pub fn script_path(&self) -> Option<PathBuf> {
        self.template.script.as_ref().map(|p| self.resolve_path(p))
    }

    /// Seed token for synthetic identifiers.
    ///
    /// Uses `build.seed` when set, otherwise a digest of the resolved
    /// configuration (secret excluded), so it is stable for a given setup.
    pub fn build_seed(&self) -> String {
        if let Some(seed) = self.build.seed.as_ref().filter(|s| !s.is_empty()) {
            return seed.clone();
        }
        let serialized = serde_json::to_vec(self).unwrap_or_default();
        blake3::hash(&serialized).to_hex().to_string()
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else if let Some(dir) = &self.config_dir {
            dir.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notion: NotionConfig::default(),
            output_dir: default_output_dir(),
            default_icon: default_icon(),
            emoji: EmojiConfig::default(),
            copy: CopyConfig::default(),
            highlight: HighlightConfig::default(),
            embeds: EmbedsConfig::default(),
            template: TemplateConfig::default(),
            build: BuildConfig::default(),
            config_dir: None,
        }
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })
}

/// Recursively merge `overlay` into `base`; mappings merge per key, anything else is replaced.
fn merge_yaml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_yaml(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
