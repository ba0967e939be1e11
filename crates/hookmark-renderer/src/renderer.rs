//! Render entry point.

use std::sync::Arc;

use hookmark_ast::{Document, ParseOptions};

use crate::context::DocumentRef;
use crate::dependencies::Dependencies;
use crate::dispatch::HookDispatcher;
use crate::error::RenderError;
use crate::hooks::HookProvider;
use crate::html::HtmlOptions;

/// Result of rendering one document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOutput {
    /// Rendered HTML fragment.
    pub html: String,
    /// Identities of the hooks that produced parts of `html`.
    pub dependencies: Dependencies,
}

/// HTML renderer with optional render hooks.
///
/// The renderer itself is immutable and can be shared between threads; each
/// [`render`](Self::render) call owns its own buffer and dependency set.
///
/// # Example
///
/// ```
/// use hookmark_ast::ParseOptions;
/// use hookmark_renderer::{DocumentRef, HtmlOptions, HtmlRenderer};
///
/// let renderer = HtmlRenderer::new(HtmlOptions::default());
/// let output = renderer.render_markdown(
///     "## Intro",
///     &ParseOptions::default(),
///     &DocumentRef::new("intro.md"),
/// )?;
///
/// assert_eq!(output.html, "<h2 id=\"intro\">Intro</h2>\n");
/// assert!(output.dependencies.is_empty());
/// # Ok::<(), hookmark_renderer::RenderError>(())
/// ```
#[derive(Clone, Default)]
pub struct HtmlRenderer {
    options: HtmlOptions,
    hooks: Option<Arc<dyn HookProvider>>,
}

impl HtmlRenderer {
    #[must_use]
    pub fn new(options: HtmlOptions) -> Self {
        Self {
            options,
            hooks: None,
        }
    }

    /// Resolve render hooks from `provider`.
    #[must_use]
    pub fn with_hooks(mut self, provider: Arc<dyn HookProvider>) -> Self {
        self.hooks = Some(provider);
        self
    }

    #[must_use]
    pub fn options(&self) -> &HtmlOptions {
        &self.options
    }

    /// Render a parsed document.
    pub fn render(&self, doc: &Document, page: &DocumentRef) -> Result<RenderOutput, RenderError> {
        let mut dispatcher =
            HookDispatcher::new(&self.options, self.hooks.as_deref(), doc, page);
        doc.walk(doc.root(), |id, entering| dispatcher.visit(id, entering))?;
        let output = dispatcher.finish()?;

        tracing::debug!(
            page = %page,
            bytes = output.html.len(),
            hook_calls = output.dependencies.len(),
            "Rendered document"
        );
        Ok(output)
    }

    /// Parse and render Markdown source.
    pub fn render_markdown(
        &self,
        markdown: &str,
        parse_options: &ParseOptions,
        page: &DocumentRef,
    ) -> Result<RenderOutput, RenderError> {
        let doc = Document::parse(markdown, parse_options);
        self.render(&doc, page)
    }
}

impl std::fmt::Debug for HtmlRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlRenderer")
            .field("options", &self.options)
            .field("hooks", &self.hooks.as_ref().map(|h| h.identities()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(markdown: &str) -> String {
        HtmlRenderer::default()
            .render_markdown(markdown, &ParseOptions::default(), &DocumentRef::new("test.md"))
            .unwrap()
            .html
    }

    #[test]
    fn test_paragraph() {
        assert_eq!(render("Hello, world!"), "<p>Hello, world!</p>\n");
    }

    #[test]
    fn test_inline_formatting() {
        assert_eq!(
            render("*a* **b** ~~c~~ `d<e`"),
            "<p><em>a</em> <strong>b</strong> <del>c</del> <code>d&lt;e</code></p>\n"
        );
    }

    #[test]
    fn test_escaped_text() {
        assert_eq!(
            render("Tom & \"Jerry\" <3"),
            "<p>Tom &amp; &quot;Jerry&quot; &lt;3</p>\n"
        );
    }

    #[test]
    fn test_blockquote_and_rule() {
        assert_eq!(
            render("> quoted\n\n---\n"),
            "<blockquote>\n<p>quoted</p>\n</blockquote>\n<hr>\n"
        );
    }

    #[test]
    fn test_code_blocks() {
        assert_eq!(
            render("```rust ignore\nlet a = 1 < 2;\n```\n"),
            "<pre><code class=\"language-rust\">let a = 1 &lt; 2;\n</code></pre>\n"
        );
        assert_eq!(
            render("    indented\n"),
            "<pre><code>indented\n</code></pre>\n"
        );
    }

    #[test]
    fn test_soft_and_hard_breaks() {
        assert_eq!(render("a\nb"), "<p>a\nb</p>\n");
        assert_eq!(render("a  \nb"), "<p>a<br>\nb</p>\n");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(render(""), "");
    }
}
