//! `hookmark render` command implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use hookmark_cache::{Cache, FileCache, NullCache};
use hookmark_config::{CliSettings, Config};
use hookmark_site::{CACHE_VERSION, DocumentRenderer};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render.
    file: PathBuf,

    /// Write HTML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover hookmark.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pass raw HTML and dangerous URLs through (overrides config).
    #[arg(long = "unsafe")]
    unsafe_html: bool,

    /// Close void elements XHTML-style (overrides config).
    #[arg(long)]
    xhtml: bool,

    /// Disable caching.
    #[arg(long)]
    no_cache: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl RenderArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            unsafe_html: self.unsafe_html.then_some(true),
            xhtml: self.xhtml.then_some(true),
            cache_enabled: self.no_cache.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            output.info(&format!("Config: {}", path.display()));
        }

        let cache: Box<dyn Cache> = if config.cache.enabled {
            Box::new(FileCache::new(config.cache.dir.clone(), CACHE_VERSION))
        } else {
            Box::new(NullCache)
        };
        let renderer =
            DocumentRenderer::new(config.html_options(), config.parse_options(), cache.as_ref());

        let result = renderer.render_file(&self.file)?;
        tracing::info!(
            file = %self.file.display(),
            from_cache = result.from_cache,
            hooks = result.dependencies.len(),
            "Rendered"
        );

        write_html(self.output.as_deref(), &result.html)?;
        if let Some(path) = &self.output {
            output.success(&format!("Wrote {}", path.display()));
        }
        Ok(())
    }
}

fn write_html(target: Option<&Path>, html: &str) -> Result<(), CliError> {
    match target {
        Some(path) => std::fs::write(path, html).map_err(|source| CliError::Write {
            target: path.display().to_string(),
            source,
        }),
        None => std::io::stdout()
            .lock()
            .write_all(html.as_bytes())
            .map_err(|source| CliError::Write {
                target: "stdout".to_owned(),
                source,
            }),
    }
}
