//! Render hook traits and the registry that resolves them.
//!
//! A hook replaces the default HTML of one node kind. It receives a context
//! holding the node's already-rendered inner HTML and writes its own markup
//! through a [`HookWriter`]. Each hook reports a stable [`HookId`] that is
//! recorded as a build dependency of every document it touches.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use hookmark_renderer::{
//!     HeadingContext, HeadingRenderer, HookError, HookId, HookRegistry, HookWriter,
//! };
//!
//! struct Anchored;
//!
//! impl HeadingRenderer for Anchored {
//!     fn render_heading(&self, out: &mut HookWriter, ctx: &HeadingContext) -> Result<(), HookError> {
//!         out.push_str(&format!(
//!             "<h{0} id=\"{1}\"><a href=\"#{1}\">{2}</a></h{0}>\n",
//!             ctx.level(),
//!             ctx.anchor(),
//!             ctx.text(),
//!         ));
//!         Ok(())
//!     }
//!
//!     fn identity(&self) -> HookId {
//!         HookId::new("anchored-heading")
//!     }
//! }
//!
//! let registry = HookRegistry::new().with_heading(Arc::new(Anchored));
//! assert_eq!(registry.len(), 1);
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::context::{HeadingContext, ImageContext, LinkContext, ListContext, ListItemContext};

/// Error type returned by hooks.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Stable identity of a configured hook.
///
/// Two hooks with equal identities are treated as the same build
/// dependency, so the identity must change whenever the hook's output for
/// the same input could change.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct HookId(String);

impl HookId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Append-only view of the output buffer.
///
/// Hooks can add bytes after the current end but cannot inspect or remove
/// anything already written.
pub struct HookWriter<'a> {
    out: &'a mut String,
}

impl<'a> HookWriter<'a> {
    pub fn new(out: &'a mut String) -> Self {
        Self { out }
    }

    pub fn push_str(&mut self, s: &str) {
        self.out.push_str(s);
    }

    pub fn push(&mut self, c: char) {
        self.out.push(c);
    }
}

impl fmt::Write for HookWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.out.push_str(s);
        Ok(())
    }
}

/// Renders links and autolinks.
pub trait LinkRenderer: Send + Sync {
    fn render_link(&self, out: &mut HookWriter, ctx: &LinkContext) -> Result<(), HookError>;

    fn identity(&self) -> HookId;
}

/// Renders images.
pub trait ImageRenderer: Send + Sync {
    fn render_image(&self, out: &mut HookWriter, ctx: &ImageContext) -> Result<(), HookError>;

    fn identity(&self) -> HookId;
}

/// Renders headings.
pub trait HeadingRenderer: Send + Sync {
    fn render_heading(&self, out: &mut HookWriter, ctx: &HeadingContext)
    -> Result<(), HookError>;

    fn identity(&self) -> HookId;
}

/// Renders lists.
pub trait ListRenderer: Send + Sync {
    fn render_list(&self, out: &mut HookWriter, ctx: &ListContext) -> Result<(), HookError>;

    fn identity(&self) -> HookId;
}

/// Renders list items.
pub trait ListItemRenderer: Send + Sync {
    fn render_list_item(
        &self,
        out: &mut HookWriter,
        ctx: &ListItemContext,
    ) -> Result<(), HookError>;

    fn identity(&self) -> HookId;
}

/// Node kinds that can be overridden by a hook.
///
/// Autolinks share the [`Link`](Self::Link) kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HookKind {
    Link,
    Image,
    Heading,
    List,
    ListItem,
}

impl HookKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Link => "link",
            Self::Image => "image",
            Self::Heading => "heading",
            Self::List => "list",
            Self::ListItem => "list item",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved hook of any kind.
#[derive(Clone)]
pub enum Hook {
    Link(Arc<dyn LinkRenderer>),
    Image(Arc<dyn ImageRenderer>),
    Heading(Arc<dyn HeadingRenderer>),
    List(Arc<dyn ListRenderer>),
    ListItem(Arc<dyn ListItemRenderer>),
}

impl Hook {
    #[must_use]
    pub fn kind(&self) -> HookKind {
        match self {
            Self::Link(_) => HookKind::Link,
            Self::Image(_) => HookKind::Image,
            Self::Heading(_) => HookKind::Heading,
            Self::List(_) => HookKind::List,
            Self::ListItem(_) => HookKind::ListItem,
        }
    }

    #[must_use]
    pub fn identity(&self) -> HookId {
        match self {
            Self::Link(h) => h.identity(),
            Self::Image(h) => h.identity(),
            Self::Heading(h) => h.identity(),
            Self::List(h) => h.identity(),
            Self::ListItem(h) => h.identity(),
        }
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("kind", &self.kind())
            .field("identity", &self.identity())
            .finish()
    }
}

/// Source of hooks for a render.
///
/// Lookups happen during rendering and must not change the provider.
pub trait HookProvider: Send + Sync {
    /// Resolve the hook for a kind and optional variant.
    ///
    /// Images pass `"block"` or `"inline"` as the variant.
    fn get_renderer(&self, kind: HookKind, variant: Option<&str>) -> Option<Hook>;

    /// Identities of every hook this provider can return.
    fn identities(&self) -> BTreeSet<HookId>;
}

/// In-memory [`HookProvider`] keyed by kind and variant.
///
/// Lookups try the exact `(kind, variant)` pair first, then the kind's
/// generic hook.
#[derive(Clone, Debug, Default)]
pub struct HookRegistry {
    hooks: HashMap<(HookKind, Option<String>), Hook>,
}

impl HookRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a hook for its kind, replacing any previous generic hook.
    #[must_use]
    pub fn with(mut self, hook: Hook) -> Self {
        self.insert(None, hook);
        self
    }

    /// Register a hook for one variant of its kind.
    #[must_use]
    pub fn with_variant(mut self, variant: impl Into<String>, hook: Hook) -> Self {
        self.insert(Some(variant.into()), hook);
        self
    }

    #[must_use]
    pub fn with_link(self, hook: Arc<dyn LinkRenderer>) -> Self {
        self.with(Hook::Link(hook))
    }

    #[must_use]
    pub fn with_image(self, hook: Arc<dyn ImageRenderer>) -> Self {
        self.with(Hook::Image(hook))
    }

    /// Register an image hook used only for `"block"` or `"inline"` images.
    #[must_use]
    pub fn with_image_for(self, variant: impl Into<String>, hook: Arc<dyn ImageRenderer>) -> Self {
        self.with_variant(variant, Hook::Image(hook))
    }

    #[must_use]
    pub fn with_heading(self, hook: Arc<dyn HeadingRenderer>) -> Self {
        self.with(Hook::Heading(hook))
    }

    #[must_use]
    pub fn with_list(self, hook: Arc<dyn ListRenderer>) -> Self {
        self.with(Hook::List(hook))
    }

    #[must_use]
    pub fn with_list_item(self, hook: Arc<dyn ListItemRenderer>) -> Self {
        self.with(Hook::ListItem(hook))
    }

    fn insert(&mut self, variant: Option<String>, hook: Hook) {
        self.hooks.insert((hook.kind(), variant), hook);
    }

    /// Number of registered hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl HookProvider for HookRegistry {
    fn get_renderer(&self, kind: HookKind, variant: Option<&str>) -> Option<Hook> {
        variant
            .and_then(|v| self.hooks.get(&(kind, Some(v.to_owned()))))
            .or_else(|| self.hooks.get(&(kind, None)))
            .cloned()
    }

    fn identities(&self) -> BTreeSet<HookId> {
        self.hooks.values().map(Hook::identity).collect()
    }
}
