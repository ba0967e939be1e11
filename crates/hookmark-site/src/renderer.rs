//! Document rendering with caching.
//!
//! [`DocumentRenderer`] wraps an [`HtmlRenderer`] and a cache bucket. Each
//! entry stores the rendered HTML together with the identities of the hooks
//! that produced it, keyed by document path and validated by a hash of the
//! source, the output options and the identities the provider offers.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use hookmark_ast::ParseOptions;
use hookmark_cache::{Cache, CacheBucket, CacheBucketExt, content_hash};
use hookmark_renderer::{
    DocumentRef, HookId, HookProvider, HtmlOptions, HtmlRenderer, RenderError,
};
use serde::{Deserialize, Serialize};

use crate::error::SiteError;

const BUCKET: &str = "documents";

/// Output of [`DocumentRenderer::render`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentRenderResult {
    pub html: String,
    /// Distinct hooks that contributed to `html`.
    pub dependencies: BTreeSet<HookId>,
    /// Whether the HTML came from the cache.
    pub from_cache: bool,
}

/// Renders documents through a shared hook provider, reusing cached output.
///
/// A cached entry is reused only while the source, the options and the set
/// of provided hook identities are all unchanged. Adding, removing or
/// renaming a hook therefore re-renders every document.
pub struct DocumentRenderer {
    renderer: HtmlRenderer,
    parse_options: ParseOptions,
    provider: Option<Arc<dyn HookProvider>>,
    bucket: Box<dyn CacheBucket>,
}

impl DocumentRenderer {
    pub fn new(html: HtmlOptions, parse_options: ParseOptions, cache: &dyn Cache) -> Self {
        Self {
            renderer: HtmlRenderer::new(html),
            parse_options,
            provider: None,
            bucket: cache.bucket(BUCKET),
        }
    }

    #[must_use]
    pub fn with_hooks(mut self, provider: Arc<dyn HookProvider>) -> Self {
        self.renderer = self.renderer.with_hooks(Arc::clone(&provider));
        self.provider = Some(provider);
        self
    }

    /// Render Markdown source for the document at `path`.
    pub fn render(&self, path: &str, markdown: &str) -> Result<DocumentRenderResult, RenderError> {
        let etag = self.etag(markdown);

        if let Some(cached) = self.bucket.get_json::<CachedDocument>(path, &etag) {
            tracing::debug!(path, "Cache hit");
            return Ok(DocumentRenderResult {
                html: cached.html,
                dependencies: cached.dependencies,
                from_cache: true,
            });
        }

        let output = self.renderer.render_markdown(
            markdown,
            &self.parse_options,
            &DocumentRef::new(path),
        )?;
        let dependencies = output.dependencies.unique();

        self.bucket.set_json(
            path,
            &etag,
            &CachedDocumentRef {
                html: &output.html,
                dependencies: &dependencies,
            },
        );

        Ok(DocumentRenderResult {
            html: output.html,
            dependencies,
            from_cache: false,
        })
    }

    /// Read and render a Markdown file; the path doubles as cache key.
    pub fn render_file(&self, path: &Path) -> Result<DocumentRenderResult, SiteError> {
        let markdown = std::fs::read_to_string(path)
            .map_err(|e| SiteError::from_io(path.to_path_buf(), e))?;
        Ok(self.render(&path.to_string_lossy(), &markdown)?)
    }

    /// Drop the cached output of one document.
    pub fn invalidate(&self, path: &str) {
        self.bucket.remove(path);
    }

    /// Source hash salted with everything else that changes the output.
    ///
    /// Any hook may apply to any document, so the salt covers every identity
    /// the provider offers, not only the ones a previous render used.
    fn etag(&self, markdown: &str) -> String {
        let hooks = self
            .provider
            .as_ref()
            .map(|provider| provider.identities())
            .unwrap_or_default();
        let salt = format!(
            "{:?}|{:?}|{:?}\n",
            self.renderer.options(),
            self.parse_options,
            hooks
        );
        content_hash([salt.as_bytes(), markdown.as_bytes()].concat().as_slice())
    }
}

#[derive(Deserialize)]
struct CachedDocument {
    html: String,
    dependencies: BTreeSet<HookId>,
}

#[derive(Serialize)]
struct CachedDocumentRef<'a> {
    html: &'a str,
    dependencies: &'a BTreeSet<HookId>,
}
