//! `hookmark.toml` configuration.
//!
//! The file is looked up in the current directory and its parents unless a
//! path is given explicitly. Missing sections and keys fall back to
//! goldmark-compatible defaults, and CLI flags applied through
//! [`CliSettings`] take precedence over the file.
//!
//! ```toml
//! [markup]
//! unsafe = false
//! xhtml = false
//! linkify_protocol = "https"
//! wrap_standalone_image_within_paragraph = true
//!
//! [cache]
//! enabled = true
//! dir = "${HOOKMARK_CACHE_DIR:-.hookmark/cache}"
//! ```
//!
//! `cache.dir` supports `${VAR}` and `${VAR:-default}` expansion and is
//! resolved relative to the directory holding the config file.

mod expand;

use std::path::{Path, PathBuf};

use hookmark_ast::ParseOptions;
use hookmark_renderer::HtmlOptions;
use serde::Deserialize;

const CONFIG_FILENAME: &str = "hookmark.toml";
const DEFAULT_CACHE_DIR: &str = ".hookmark/cache";

/// Command-line overrides; `None` keeps the configured value.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub unsafe_html: Option<bool>,
    pub xhtml: Option<bool>,
    pub cache_enabled: Option<bool>,
}

/// Loaded configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub markup: MarkupConfig,
    #[serde(rename = "cache")]
    cache_raw: CacheConfigRaw,

    /// Cache settings with the directory resolved (set after loading).
    #[serde(skip)]
    pub cache: CacheConfig,
    /// File the configuration was read from, if any.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// `[markup]` section: parser extensions and HTML output.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MarkupConfig {
    /// Pass raw HTML and dangerous URLs through unchanged.
    #[serde(rename = "unsafe")]
    pub unsafe_html: bool,
    pub xhtml: bool,
    /// Protocol for bare `www.` links: `http` or `https`.
    pub linkify_protocol: String,
    pub gfm: bool,
    pub linkify: bool,
    pub heading_attributes: bool,
    pub auto_heading_ids: bool,
    pub wrap_standalone_image_within_paragraph: bool,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            unsafe_html: false,
            xhtml: false,
            linkify_protocol: "https".to_owned(),
            gfm: true,
            linkify: true,
            heading_attributes: true,
            auto_heading_ids: true,
            wrap_standalone_image_within_paragraph: true,
        }
    }
}

impl MarkupConfig {
    #[must_use]
    pub fn html_options(&self) -> HtmlOptions {
        HtmlOptions::default()
            .with_unsafe(self.unsafe_html)
            .with_xhtml(self.xhtml)
            .with_linkify_protocol(self.linkify_protocol.as_str())
    }

    #[must_use]
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::default()
            .with_gfm(self.gfm)
            .with_linkify(self.linkify)
            .with_heading_attributes(self.heading_attributes)
            .with_auto_heading_ids(self.auto_heading_ids)
            .with_wrap_standalone_image(self.wrap_standalone_image_within_paragraph)
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CacheConfigRaw {
    enabled: Option<bool>,
    dir: Option<String>,
}

/// Resolved `[cache]` section.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Absolute (or base-relative) cache directory.
    pub dir: PathBuf,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g. `cache.dir`).
        field: String,
        message: String,
    },
}

impl Config {
    /// Load configuration, then apply CLI overrides.
    ///
    /// With `config_path` the file must exist. Without it, `hookmark.toml`
    /// is searched for in the current directory and its parents; when none
    /// is found the defaults apply, with the cache under the current
    /// directory.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_base(&std::env::current_dir().unwrap_or_default())
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Parse configuration text as if it were read from a file in `base`.
    pub fn from_toml(content: &str, base: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.resolve(base)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn html_options(&self) -> HtmlOptions {
        self.markup.html_options()
    }

    #[must_use]
    pub fn parse_options(&self) -> ParseOptions {
        self.markup.parse_options()
    }

    /// Check values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.markup.linkify_protocol.as_str() {
            "http" | "https" => {}
            other => {
                return Err(ConfigError::Validation(format!(
                    "markup.linkify_protocol must be \"http\" or \"https\", got \"{other}\""
                )));
            }
        }
        if self.cache.enabled && self.cache.dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "cache.dir cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(unsafe_html) = settings.unsafe_html {
            self.markup.unsafe_html = unsafe_html;
        }
        if let Some(xhtml) = settings.xhtml {
            self.markup.xhtml = xhtml;
        }
        if let Some(enabled) = settings.cache_enabled {
            self.cache.enabled = enabled;
        }
    }

    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            markup: MarkupConfig::default(),
            cache_raw: CacheConfigRaw::default(),
            cache: CacheConfig {
                enabled: true,
                dir: base.join(DEFAULT_CACHE_DIR),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let base = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml(&content, base)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Expand environment references and resolve the cache directory.
    fn resolve(&mut self, base: &Path) -> Result<(), ConfigError> {
        let dir = match &self.cache_raw.dir {
            Some(dir) => expand::expand_env(dir, "cache.dir")?,
            None => DEFAULT_CACHE_DIR.to_owned(),
        };
        self.cache = CacheConfig {
            enabled: self.cache_raw.enabled.unwrap_or(true),
            dir: base.join(dir),
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/site"));

        assert_eq!(config.markup, MarkupConfig::default());
        assert!(config.cache.enabled);
        assert_eq!(config.cache.dir, PathBuf::from("/site/.hookmark/cache"));
        assert_eq!(config.html_options(), HtmlOptions::default());
        assert_eq!(config.parse_options(), ParseOptions::default());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml("", Path::new("/site")).unwrap();

        assert_eq!(config.markup, MarkupConfig::default());
        assert_eq!(config.cache.dir, PathBuf::from("/site/.hookmark/cache"));
    }

    #[test]
    fn test_parse_markup_section() {
        let toml = r#"
[markup]
unsafe = true
xhtml = true
linkify_protocol = "http"
wrap_standalone_image_within_paragraph = false
heading_attributes = false
"#;
        let config = Config::from_toml(toml, Path::new("/site")).unwrap();

        assert_eq!(
            config.html_options(),
            HtmlOptions::default()
                .with_unsafe(true)
                .with_xhtml(true)
                .with_linkify_protocol("http")
        );
        let parse = config.parse_options();
        assert!(!parse.wrap_standalone_image_within_paragraph);
        assert!(!parse.heading_attributes);
        assert!(parse.gfm);
    }

    #[test]
    fn test_invalid_linkify_protocol() {
        let err = Config::from_toml("[markup]\nlinkify_protocol = \"ftp\"\n", Path::new("/"))
            .unwrap_err();

        assert!(matches!(err, ConfigError::Validation(ref msg) if msg.contains("ftp")));
    }

    #[test]
    fn test_unknown_type_is_parse_error() {
        let err = Config::from_toml("[markup]\nxhtml = \"yes\"\n", Path::new("/")).unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_cache_dir_is_relative_to_base() {
        let toml = "[cache]\nenabled = false\ndir = \"build/cache\"\n";
        let config = Config::from_toml(toml, Path::new("/site")).unwrap();

        assert_eq!(
            config.cache,
            CacheConfig {
                enabled: false,
                dir: PathBuf::from("/site/build/cache"),
            }
        );
    }

    #[test]
    fn test_cache_dir_expands_env() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("HOOKMARK_TEST_CONFIG_CACHE", "/tmp/hookmark");
        }
        let toml = "[cache]\ndir = \"${HOOKMARK_TEST_CONFIG_CACHE}/pages\"\n";
        let config = Config::from_toml(toml, Path::new("/site")).unwrap();
        unsafe {
            std::env::remove_var("HOOKMARK_TEST_CONFIG_CACHE");
        }

        assert_eq!(config.cache.dir, PathBuf::from("/tmp/hookmark/pages"));
    }

    #[test]
    fn test_cache_dir_missing_env_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("HOOKMARK_TEST_CONFIG_MISSING");
        }
        let toml = "[cache]\ndir = \"${HOOKMARK_TEST_CONFIG_MISSING}\"\n";
        let err = Config::from_toml(toml, Path::new("/site")).unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { ref field, .. } if field == "cache.dir"));
    }

    #[test]
    fn test_load_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        std::fs::write(&path, "[markup]\nxhtml = true\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert!(config.markup.xhtml);
        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.cache.dir, tmp.path().join(".hookmark/cache"));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing.toml");

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_cli_settings_override_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[markup]\nxhtml = true\n\n[cache]\nenabled = true\n").unwrap();

        let settings = CliSettings {
            unsafe_html: Some(true),
            xhtml: Some(false),
            cache_enabled: Some(false),
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();

        assert!(config.markup.unsafe_html);
        assert!(!config.markup.xhtml);
        assert!(!config.cache.enabled);
    }

    #[test]
    fn test_empty_cli_settings_keep_file_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[markup]\nxhtml = true\n").unwrap();

        let config = Config::load(Some(&path), Some(&CliSettings::default())).unwrap();

        assert!(config.markup.xhtml);
        assert!(config.cache.enabled);
    }
}
