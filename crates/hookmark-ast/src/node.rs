//! Node types stored in a [`Document`](crate::Document) arena.

use std::fmt;

/// Prefix for attributes the parse stage uses to signal data to the renderer.
///
/// Attributes with this prefix must never reach the HTML output.
pub const INTERNAL_ATTR_PREFIX: &str = "_h__";

/// Set to `true` on images that are the sole content of their block.
pub const ATTR_IS_BLOCK: &str = "_h__isBlock";

/// 0-based position of an image among all images in the document.
pub const ATTR_ORDINAL: &str = "_h__ordinal";

/// Index of a node inside its [`Document`](crate::Document).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Raw arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Attribute value as produced by the parse stage.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum AttrValue {
    Str(String),
    Bool(bool),
    Int(i64),
}

impl AttrValue {
    /// String payload, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// A single named attribute attached to a node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Whether this attribute carries parse-stage signaling data.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.name.starts_with(INTERNAL_ATTR_PREFIX)
    }
}

/// How an autolink was recognized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AutoLinkType {
    Url,
    Email,
}

/// Table column alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Alignment {
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    /// CSS `text-align` value, if any.
    #[must_use]
    pub fn as_css(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Left => Some("left"),
            Self::Center => Some("center"),
            Self::Right => Some("right"),
        }
    }
}

/// Node kind with its kind-specific payload.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    Document,
    Paragraph,
    /// Paragraph content of a tight list item, rendered without `<p>`.
    TextBlock,
    Heading {
        level: u8,
    },
    BlockQuote,
    CodeBlock {
        /// Fence info string; `None` for indented blocks.
        info: Option<String>,
        literal: String,
    },
    HtmlBlock {
        literal: String,
    },
    ThematicBreak,
    List {
        ordered: bool,
        start: u64,
    },
    ListItem,
    Table {
        alignments: Vec<Alignment>,
    },
    TableHead,
    TableRow,
    TableCell,
    Text {
        literal: String,
    },
    SoftBreak,
    HardBreak,
    CodeSpan {
        literal: String,
    },
    Emphasis,
    Strong,
    Strikethrough,
    Link {
        destination: String,
        title: String,
    },
    AutoLink {
        link_type: AutoLinkType,
        /// URL as written (or as completed by linkify).
        url: String,
        label: String,
        /// Protocol inferred by the parser; `None` when the source spelled it out.
        protocol: Option<String>,
    },
    Image {
        destination: String,
        title: String,
    },
    RawHtml {
        literal: String,
    },
    TaskCheckBox {
        checked: bool,
    },
}

impl NodeKind {
    /// Short kind name used in logs and errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Paragraph => "paragraph",
            Self::TextBlock => "text block",
            Self::Heading { .. } => "heading",
            Self::BlockQuote => "blockquote",
            Self::CodeBlock { .. } => "code block",
            Self::HtmlBlock { .. } => "html block",
            Self::ThematicBreak => "thematic break",
            Self::List { .. } => "list",
            Self::ListItem => "list item",
            Self::Table { .. } => "table",
            Self::TableHead => "table head",
            Self::TableRow => "table row",
            Self::TableCell => "table cell",
            Self::Text { .. } => "text",
            Self::SoftBreak => "soft break",
            Self::HardBreak => "hard break",
            Self::CodeSpan { .. } => "code span",
            Self::Emphasis => "emphasis",
            Self::Strong => "strong",
            Self::Strikethrough => "strikethrough",
            Self::Link { .. } => "link",
            Self::AutoLink { .. } => "autolink",
            Self::Image { .. } => "image",
            Self::RawHtml { .. } => "raw html",
            Self::TaskCheckBox { .. } => "task checkbox",
        }
    }

    /// Whether the kind is a block-level container or leaf.
    #[must_use]
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            Self::Document
                | Self::Paragraph
                | Self::TextBlock
                | Self::Heading { .. }
                | Self::BlockQuote
                | Self::CodeBlock { .. }
                | Self::HtmlBlock { .. }
                | Self::ThematicBreak
                | Self::List { .. }
                | Self::ListItem
                | Self::Table { .. }
                | Self::TableHead
                | Self::TableRow
                | Self::TableCell
        )
    }
}

/// A node in the document arena.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub kind: NodeKind,
    pub attributes: Vec<Attribute>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
    }

    /// Set an attribute, replacing an existing value with the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.attributes.iter_mut().find(|a| a.name == name) {
            existing.value = value;
        } else {
            self.attributes.push(Attribute { name, value });
        }
    }

    /// Parent node, `None` for the document root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child node ids in document order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}
