//! Document tree for hookable Markdown rendering.
//!
//! [`Document::parse`] folds pulldown-cmark events into an arena of [`Node`]s
//! and applies the parse-stage transforms renderers rely on:
//!
//! - Every heading carries an `id` attribute (explicit or generated).
//! - Inline content of tight list items is wrapped in a [`NodeKind::TextBlock`].
//! - Bare `www.` and `http(s)://` URLs become [`NodeKind::AutoLink`] nodes.
//! - Images carry their document ordinal and, optionally, a block marker in
//!   attributes prefixed with [`INTERNAL_ATTR_PREFIX`].
//!
//! # Example
//!
//! ```
//! use hookmark_ast::{Document, NodeKind, ParseOptions};
//!
//! let doc = Document::parse("- one\n- two", &ParseOptions::default());
//! let list = doc.children(doc.root())[0];
//!
//! assert!(matches!(doc.kind(list), NodeKind::List { ordered: false, .. }));
//! assert_eq!(doc.children(list).len(), 2);
//! ```

mod anchor;
mod builder;
mod document;
mod linkify;
mod node;
mod options;
mod url;

pub use anchor::{Anchorizer, slugify};
pub use document::{Document, WalkStatus};
pub use node::{
    ATTR_IS_BLOCK, ATTR_ORDINAL, Alignment, AttrValue, Attribute, AutoLinkType,
    INTERNAL_ATTR_PREFIX, Node, NodeId, NodeKind,
};
pub use options::ParseOptions;
pub use url::{is_dangerous_url, starts_with_ignore_case};
