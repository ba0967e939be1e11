//! Cached rendering of Markdown documents.
//!
//! - [`DocumentRenderer`]: renders documents through a shared hook provider
//!   and reuses cached output while the source, options and hooks allow it
//! - [`BuildDependencies`]: which hooks each document was built with
//!
//! # Example
//!
//! ```
//! use hookmark_ast::ParseOptions;
//! use hookmark_cache::MemoryCache;
//! use hookmark_renderer::HtmlOptions;
//! use hookmark_site::{BuildDependencies, DocumentRenderer};
//!
//! let cache = MemoryCache::new();
//! let renderer = DocumentRenderer::new(HtmlOptions::default(), ParseOptions::default(), &cache);
//!
//! let result = renderer.render("guide/intro.md", "## Intro")?;
//! assert_eq!(result.html, "<h2 id=\"intro\">Intro</h2>\n");
//!
//! let mut build = BuildDependencies::new();
//! build.extend("guide/intro.md", &result.dependencies);
//! assert!(build.get("guide/intro.md").is_some_and(|ids| ids.is_empty()));
//! # Ok::<(), hookmark_renderer::RenderError>(())
//! ```

mod dependencies;
mod error;
mod renderer;

pub use dependencies::BuildDependencies;
pub use error::SiteError;
pub use renderer::{DocumentRenderResult, DocumentRenderer};

/// Version stamped into on-disk caches; entries from other versions are wiped.
pub const CACHE_VERSION: &str = env!("CARGO_PKG_VERSION");
