//! Site error types.

use std::path::PathBuf;

use hookmark_renderer::RenderError;

/// Error returned when a document cannot be rendered.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Source file not found.
    #[error("Source file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error reading source file.
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Rendering failed, usually because a hook returned an error.
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl SiteError {
    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::Io { path, source }
        }
    }
}
