//! Per-kind hook dispatch and the capture protocol.
//!
//! For a hooked kind the dispatcher records a checkpoint when entering the
//! node, lets the children render normally, then cuts their output back out
//! of the buffer when leaving and hands it to the hook as rendered text.
//! Kinds without a registered hook go straight to the default renderer with
//! no checkpoint bookkeeping.

use hookmark_ast::{ATTR_ORDINAL, AttrValue, Document, NodeId, NodeKind, WalkStatus};

use crate::attributes::filter_internal_attributes;
use crate::buffer::RenderBuffer;
use crate::context::{
    DocumentRef, HeadingContext, ImageContext, LinkContext, ListContext, ListItemContext,
    NodeRef, RenderedHtml,
};
use crate::dependencies::Dependencies;
use crate::error::RenderError;
use crate::hooks::{Hook, HookError, HookId, HookKind, HookProvider};
use crate::html::{DefaultRenderer, HtmlOptions, auto_link_destination, is_block_image};
use crate::renderer::RenderOutput;

pub(crate) struct HookDispatcher<'r> {
    defaults: DefaultRenderer<'r>,
    hooks: Option<&'r dyn HookProvider>,
    doc: &'r Document,
    page: &'r DocumentRef,
    buf: RenderBuffer,
    deps: Dependencies,
}

impl<'r> HookDispatcher<'r> {
    pub(crate) fn new(
        options: &'r HtmlOptions,
        hooks: Option<&'r dyn HookProvider>,
        doc: &'r Document,
        page: &'r DocumentRef,
    ) -> Self {
        Self {
            defaults: DefaultRenderer::new(options, doc),
            hooks,
            doc,
            page,
            buf: RenderBuffer::new(),
            deps: Dependencies::new(),
        }
    }

    pub(crate) fn visit(&mut self, id: NodeId, entering: bool) -> Result<WalkStatus, RenderError> {
        let doc = self.doc;
        match doc.kind(id) {
            NodeKind::Link { .. } => self.link(id, entering),
            NodeKind::AutoLink { .. } => self.auto_link(id, entering),
            NodeKind::Image { .. } => self.image(id, entering),
            NodeKind::Heading { .. } => self.heading(id, entering),
            NodeKind::List { .. } => self.list(id, entering),
            NodeKind::ListItem => self.list_item(id, entering),
            _ => Ok(self.defaults.render(self.buf.as_mut_string(), id, entering)),
        }
    }

    pub(crate) fn finish(self) -> Result<RenderOutput, RenderError> {
        Ok(RenderOutput {
            html: self.buf.finish()?,
            dependencies: self.deps,
        })
    }

    /// Resolve a hook and unwrap it to the capability `kind` needs.
    fn lookup<T>(
        &self,
        kind: HookKind,
        variant: Option<&str>,
        extract: impl FnOnce(Hook) -> Option<T>,
    ) -> Result<Option<T>, RenderError> {
        let Some(hook) = self.hooks.and_then(|p| p.get_renderer(kind, variant)) else {
            return Ok(None);
        };
        let found = hook.kind();
        extract(hook)
            .map(Some)
            .ok_or(RenderError::KindMismatch {
                expected: kind.as_str(),
                found: found.as_str(),
            })
    }

    /// Pop the node's checkpoint and cut its children's output.
    fn capture(&mut self) -> Result<RenderedHtml, RenderError> {
        let pos = self.buf.pop_pos()?;
        Ok(RenderedHtml::new(self.buf.take_since(pos)))
    }

    fn complete(
        &mut self,
        kind: HookKind,
        node: NodeId,
        identity: HookId,
        result: Result<(), HookError>,
    ) -> Result<WalkStatus, RenderError> {
        match result {
            Ok(()) => {
                tracing::trace!(kind = %kind, hook = %identity, node = %node, "Rendered node with hook");
                self.deps.record(identity);
                Ok(WalkStatus::Continue)
            }
            Err(source) => Err(RenderError::Hook {
                kind,
                node,
                identity,
                source,
            }),
        }
    }

    fn link(&mut self, id: NodeId, entering: bool) -> Result<WalkStatus, RenderError> {
        let doc = self.doc;
        let NodeKind::Link { destination, title } = doc.kind(id) else {
            return Err(mismatch("link", doc, id));
        };
        let hook = self.lookup(HookKind::Link, None, |h| match h {
            Hook::Link(r) => Some(r),
            _ => None,
        })?;
        let Some(hook) = hook else {
            self.defaults
                .link(self.buf.as_mut_string(), destination, title, entering);
            return Ok(WalkStatus::Continue);
        };

        if entering {
            self.buf.push_pos();
            return Ok(WalkStatus::Continue);
        }
        let text = self.capture()?;
        let ctx = LinkContext {
            page: self.page,
            destination: destination.clone(),
            title: title.clone(),
            text,
            plain_text: doc.plain_text(id),
            attributes: filter_internal_attributes(&doc.node(id).attributes),
        };
        let result = hook.render_link(&mut self.buf.writer(), &ctx);
        self.complete(HookKind::Link, id, hook.identity(), result)
    }

    /// Autolinks have no children, so the single enter visit does all the work.
    fn auto_link(&mut self, id: NodeId, entering: bool) -> Result<WalkStatus, RenderError> {
        if !entering {
            return Ok(WalkStatus::Continue);
        }
        let doc = self.doc;
        let NodeKind::AutoLink {
            link_type,
            url,
            label,
            protocol,
        } = doc.kind(id)
        else {
            return Err(mismatch("autolink", doc, id));
        };
        let hook = self.lookup(HookKind::Link, None, |h| match h {
            Hook::Link(r) => Some(r),
            _ => None,
        })?;
        let Some(hook) = hook else {
            self.defaults.auto_link(
                self.buf.as_mut_string(),
                id,
                *link_type,
                url,
                label,
                protocol.as_deref(),
            );
            return Ok(WalkStatus::Continue);
        };

        let ctx = LinkContext {
            page: self.page,
            destination: auto_link_destination(
                self.defaults.options(),
                *link_type,
                url,
                protocol.as_deref(),
            ),
            title: String::new(),
            text: RenderedHtml::new(label.clone()),
            plain_text: label.clone(),
            attributes: filter_internal_attributes(&doc.node(id).attributes),
        };
        let result = hook.render_link(&mut self.buf.writer(), &ctx);
        self.complete(HookKind::Link, id, hook.identity(), result)
    }

    fn image(&mut self, id: NodeId, entering: bool) -> Result<WalkStatus, RenderError> {
        let doc = self.doc;
        let NodeKind::Image { destination, title } = doc.kind(id) else {
            return Err(mismatch("image", doc, id));
        };
        let is_block = is_block_image(doc, id);
        let variant = if is_block { "block" } else { "inline" };
        let hook = self.lookup(HookKind::Image, Some(variant), |h| match h {
            Hook::Image(r) => Some(r),
            _ => None,
        })?;
        let Some(hook) = hook else {
            return Ok(self.defaults.image(
                self.buf.as_mut_string(),
                id,
                destination,
                title,
                entering,
            ));
        };

        if entering {
            self.buf.push_pos();
            return Ok(WalkStatus::Continue);
        }
        let text = self.capture()?;
        let ordinal = match doc.node(id).attribute(ATTR_ORDINAL) {
            Some(AttrValue::Int(n)) => usize::try_from(*n).unwrap_or_default(),
            _ => 0,
        };
        let ctx = ImageContext {
            link: LinkContext {
                page: self.page,
                destination: destination.clone(),
                title: title.clone(),
                text,
                plain_text: doc.plain_text(id),
                attributes: filter_internal_attributes(&doc.node(id).attributes),
            },
            ordinal,
            is_block,
        };
        let result = hook.render_image(&mut self.buf.writer(), &ctx);
        self.complete(HookKind::Image, id, hook.identity(), result)
    }

    fn heading(&mut self, id: NodeId, entering: bool) -> Result<WalkStatus, RenderError> {
        let doc = self.doc;
        let NodeKind::Heading { level } = doc.kind(id) else {
            return Err(mismatch("heading", doc, id));
        };
        let hook = self.lookup(HookKind::Heading, None, |h| match h {
            Hook::Heading(r) => Some(r),
            _ => None,
        })?;
        let Some(hook) = hook else {
            self.defaults
                .heading(self.buf.as_mut_string(), id, *level, entering);
            return Ok(WalkStatus::Continue);
        };

        if entering {
            self.buf.push_pos();
            return Ok(WalkStatus::Continue);
        }
        let text = self.capture()?;
        let node = doc.node(id);
        let ctx = HeadingContext {
            page: self.page,
            level: *level,
            anchor: node
                .attribute("id")
                .and_then(AttrValue::as_str)
                .unwrap_or_default()
                .to_owned(),
            text,
            plain_text: doc.plain_text(id),
            attributes: filter_internal_attributes(&node.attributes),
        };
        let result = hook.render_heading(&mut self.buf.writer(), &ctx);
        self.complete(HookKind::Heading, id, hook.identity(), result)
    }

    fn list(&mut self, id: NodeId, entering: bool) -> Result<WalkStatus, RenderError> {
        let doc = self.doc;
        let NodeKind::List { ordered, start } = doc.kind(id) else {
            return Err(mismatch("list", doc, id));
        };
        let hook = self.lookup(HookKind::List, None, |h| match h {
            Hook::List(r) => Some(r),
            _ => None,
        })?;
        let Some(hook) = hook else {
            self.defaults
                .list(self.buf.as_mut_string(), id, *ordered, *start, entering);
            return Ok(WalkStatus::Continue);
        };

        if entering {
            self.buf.push_pos();
            return Ok(WalkStatus::Continue);
        }
        let text = self.capture()?;
        let ctx = ListContext {
            page: self.page,
            text,
            plain_text: doc.plain_text(id),
            is_ordered: *ordered,
            parent: doc
                .parent(id)
                .filter(|&p| p != doc.root())
                .map(|p| NodeRef::new(doc, p)),
            attributes: filter_internal_attributes(&doc.node(id).attributes),
        };
        let result = hook.render_list(&mut self.buf.writer(), &ctx);
        self.complete(HookKind::List, id, hook.identity(), result)
    }

    fn list_item(&mut self, id: NodeId, entering: bool) -> Result<WalkStatus, RenderError> {
        let doc = self.doc;
        let hook = self.lookup(HookKind::ListItem, None, |h| match h {
            Hook::ListItem(r) => Some(r),
            _ => None,
        })?;
        let Some(hook) = hook else {
            self.defaults
                .list_item(self.buf.as_mut_string(), id, entering);
            return Ok(WalkStatus::Continue);
        };

        if entering {
            self.buf.push_pos();
            return Ok(WalkStatus::Continue);
        }
        let text = self.capture()?;
        let ctx = ListItemContext {
            page: self.page,
            text,
            plain_text: doc.plain_text(id),
            is_first: doc.previous_sibling(id).is_none(),
            is_last: doc.next_sibling(id).is_none(),
            parent: NodeRef::new(doc, doc.parent(id).unwrap_or_else(|| doc.root())),
        };
        let result = hook.render_list_item(&mut self.buf.writer(), &ctx);
        self.complete(HookKind::ListItem, id, hook.identity(), result)
    }
}

fn mismatch(expected: &'static str, doc: &Document, id: NodeId) -> RenderError {
    RenderError::KindMismatch {
        expected,
        found: doc.kind(id).name(),
    }
}
