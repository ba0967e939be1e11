//! CLI error types.

use hookmark_config::ConfigError;
use hookmark_site::SiteError;

#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Site(#[from] SiteError),

    #[error("Failed to write {target}: {source}")]
    Write {
        target: String,
        #[source]
        source: std::io::Error,
    },
}
