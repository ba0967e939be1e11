//! Hookable Markdown-to-HTML rendering.
//!
//! [`HtmlRenderer`] walks a [`hookmark_ast::Document`] and emits goldmark
//! compatible HTML. Links, autolinks, images, headings, lists and list items
//! can be overridden by render hooks resolved from a [`HookProvider`].
//!
//! # Architecture
//!
//! - [`RenderBuffer`]: one output string plus a stack of checkpoints used to
//!   cut a node's rendered children out of the output.
//! - Contexts ([`LinkContext`], [`ImageContext`], [`HeadingContext`],
//!   [`ListContext`], [`ListItemContext`]): what a hook sees of a node.
//! - Hooks ([`LinkRenderer`], [`ImageRenderer`], [`HeadingRenderer`],
//!   [`ListRenderer`], [`ListItemRenderer`]) and the [`HookRegistry`].
//! - [`Dependencies`]: identities of the hooks used, returned with the HTML.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use hookmark_ast::ParseOptions;
//! use hookmark_renderer::{
//!     DocumentRef, HeadingContext, HeadingRenderer, HookError, HookId, HookRegistry,
//!     HookWriter, HtmlOptions, HtmlRenderer,
//! };
//!
//! struct Upper;
//!
//! impl HeadingRenderer for Upper {
//!     fn render_heading(&self, out: &mut HookWriter, ctx: &HeadingContext) -> Result<(), HookError> {
//!         out.push_str(&format!(
//!             "<h{0} id=\"{1}\">{2}</h{0}>",
//!             ctx.level(),
//!             ctx.anchor().to_uppercase(),
//!             ctx.text(),
//!         ));
//!         Ok(())
//!     }
//!
//!     fn identity(&self) -> HookId {
//!         HookId::new("upper")
//!     }
//! }
//!
//! let registry = HookRegistry::new().with_heading(Arc::new(Upper));
//! let renderer = HtmlRenderer::new(HtmlOptions::default()).with_hooks(Arc::new(registry));
//! let output = renderer.render_markdown(
//!     "## Intro",
//!     &ParseOptions::default(),
//!     &DocumentRef::new("index.md"),
//! )?;
//!
//! assert_eq!(output.html, r#"<h2 id="INTRO">Intro</h2>"#);
//! assert_eq!(output.dependencies.len(), 1);
//! # Ok::<(), hookmark_renderer::RenderError>(())
//! ```

mod attributes;
mod buffer;
mod context;
mod dependencies;
mod dispatch;
mod error;
mod escape;
mod hooks;
mod html;
mod renderer;

pub use attributes::{
    AttributeFilter, filter_internal_attributes, render_attributes, render_filtered_attributes,
};
pub use buffer::RenderBuffer;
pub use context::{
    DocumentRef, HeadingContext, ImageContext, LinkContext, ListContext, ListItemContext,
    NodeRef, RenderedHtml,
};
pub use dependencies::Dependencies;
pub use error::RenderError;
pub use escape::{escape_html, escape_url, percent_encode_url, push_escaped};
pub use hooks::{
    HeadingRenderer, Hook, HookError, HookId, HookKind, HookProvider, HookRegistry, HookWriter,
    ImageRenderer, LinkRenderer, ListItemRenderer, ListRenderer,
};
pub use html::HtmlOptions;
pub use renderer::{HtmlRenderer, RenderOutput};
