//! Values handed to render hooks.
//!
//! A context is built right before one hook call and dropped after it. Every
//! attribute list is already stripped of internal parse-stage attributes.

use std::fmt;
use std::sync::Arc;

use hookmark_ast::{Attribute, Document, NodeId, NodeKind};

/// HTML that has already been rendered and escaped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedHtml(String);

impl RenderedHtml {
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RenderedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque handle to the document being rendered.
///
/// Supplied by the embedding application (typically a path or page key) and
/// passed through to every hook untouched.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentRef(Arc<str>);

impl DocumentRef {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Borrowed handle to a node in the tree being rendered.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(doc: &'a Document, id: NodeId) -> Self {
        Self { doc, id }
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> &'a NodeKind {
        self.doc.kind(self.id)
    }

    #[must_use]
    pub fn attributes(&self) -> &'a [Attribute] {
        &self.doc.node(self.id).attributes
    }

    #[must_use]
    pub fn plain_text(&self) -> String {
        self.doc.plain_text(self.id)
    }

    #[must_use]
    pub fn document(&self) -> &'a Document {
        self.doc
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.kind().name())
            .finish()
    }
}

/// Context for link and autolink hooks.
#[derive(Clone, Debug)]
pub struct LinkContext<'a> {
    pub(crate) page: &'a DocumentRef,
    pub(crate) destination: String,
    pub(crate) title: String,
    pub(crate) text: RenderedHtml,
    pub(crate) plain_text: String,
    pub(crate) attributes: Vec<Attribute>,
}

impl<'a> LinkContext<'a> {
    #[must_use]
    pub fn page(&self) -> &'a DocumentRef {
        self.page
    }

    /// Raw, unescaped destination URL.
    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Link title; empty when absent.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Rendered link text.
    #[must_use]
    pub fn text(&self) -> &RenderedHtml {
        &self.text
    }

    #[must_use]
    pub fn plain_text(&self) -> &str {
        &self.plain_text
    }

    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}

/// Context for image hooks.
#[derive(Clone, Debug)]
pub struct ImageContext<'a> {
    pub(crate) link: LinkContext<'a>,
    pub(crate) ordinal: usize,
    pub(crate) is_block: bool,
}

impl<'a> ImageContext<'a> {
    #[must_use]
    pub fn page(&self) -> &'a DocumentRef {
        self.link.page
    }

    #[must_use]
    pub fn destination(&self) -> &str {
        self.link.destination()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        self.link.title()
    }

    /// Rendered alt text.
    #[must_use]
    pub fn text(&self) -> &RenderedHtml {
        self.link.text()
    }

    #[must_use]
    pub fn plain_text(&self) -> &str {
        self.link.plain_text()
    }

    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        self.link.attributes()
    }

    /// 0-based position among all images in the document.
    #[must_use]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Whether the image stands alone as a block.
    #[must_use]
    pub fn is_block(&self) -> bool {
        self.is_block
    }

    /// The underlying link-shaped view.
    #[must_use]
    pub fn as_link(&self) -> &LinkContext<'a> {
        &self.link
    }
}

/// Context for heading hooks.
#[derive(Clone, Debug)]
pub struct HeadingContext<'a> {
    pub(crate) page: &'a DocumentRef,
    pub(crate) level: u8,
    pub(crate) anchor: String,
    pub(crate) text: RenderedHtml,
    pub(crate) plain_text: String,
    pub(crate) attributes: Vec<Attribute>,
}

impl<'a> HeadingContext<'a> {
    #[must_use]
    pub fn page(&self) -> &'a DocumentRef {
        self.page
    }

    /// Heading level, 1 to 6.
    #[must_use]
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Unique id assigned at parse time.
    #[must_use]
    pub fn anchor(&self) -> &str {
        &self.anchor
    }

    #[must_use]
    pub fn text(&self) -> &RenderedHtml {
        &self.text
    }

    #[must_use]
    pub fn plain_text(&self) -> &str {
        &self.plain_text
    }

    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}

/// Context for list item hooks.
#[derive(Clone, Debug)]
pub struct ListItemContext<'a> {
    pub(crate) page: &'a DocumentRef,
    pub(crate) text: RenderedHtml,
    pub(crate) plain_text: String,
    pub(crate) is_first: bool,
    pub(crate) is_last: bool,
    pub(crate) parent: NodeRef<'a>,
}

impl<'a> ListItemContext<'a> {
    #[must_use]
    pub fn page(&self) -> &'a DocumentRef {
        self.page
    }

    #[must_use]
    pub fn text(&self) -> &RenderedHtml {
        &self.text
    }

    #[must_use]
    pub fn plain_text(&self) -> &str {
        &self.plain_text
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.is_first
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.is_last
    }

    /// The list owning this item.
    #[must_use]
    pub fn parent(&self) -> NodeRef<'a> {
        self.parent
    }
}

/// Context for list hooks.
#[derive(Clone, Debug)]
pub struct ListContext<'a> {
    pub(crate) page: &'a DocumentRef,
    pub(crate) text: RenderedHtml,
    pub(crate) plain_text: String,
    pub(crate) is_ordered: bool,
    pub(crate) parent: Option<NodeRef<'a>>,
    pub(crate) attributes: Vec<Attribute>,
}

impl<'a> ListContext<'a> {
    #[must_use]
    pub fn page(&self) -> &'a DocumentRef {
        self.page
    }

    /// Rendered list items.
    #[must_use]
    pub fn text(&self) -> &RenderedHtml {
        &self.text
    }

    #[must_use]
    pub fn plain_text(&self) -> &str {
        &self.plain_text
    }

    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.is_ordered
    }

    /// Enclosing node for nested lists; `None` at document level.
    #[must_use]
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.parent
    }

    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}
