//! Folds pulldown-cmark events into a [`Document`].

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, LinkType, Parser, Tag, TagEnd};

use crate::anchor::Anchorizer;
use crate::document::{Document, WalkStatus};
use crate::linkify::{self, Segment};
use crate::node::{
    ATTR_IS_BLOCK, ATTR_ORDINAL, Alignment, AttrValue, Attribute, AutoLinkType, NodeId, NodeKind,
};
use crate::options::ParseOptions;

impl Document {
    /// Parse Markdown source into a document tree.
    ///
    /// Besides the plain event fold this applies the parse-stage transforms:
    /// heading ids, tight list text blocks, linkify and image ordinals.
    ///
    /// # Example
    ///
    /// ```
    /// use hookmark_ast::{Document, NodeKind, ParseOptions};
    ///
    /// let doc = Document::parse("## Intro", &ParseOptions::default());
    /// let heading = doc.children(doc.root())[0];
    ///
    /// assert_eq!(doc.kind(heading), &NodeKind::Heading { level: 2 });
    /// assert_eq!(doc.node(heading).attribute("id").and_then(|v| v.as_str()), Some("intro"));
    /// ```
    #[must_use]
    pub fn parse(markdown: &str, options: &ParseOptions) -> Self {
        let parser = Parser::new_ext(markdown, options.parser_options());
        let mut builder = TreeBuilder::new(options);
        for event in parser {
            builder.event(event);
        }
        builder.finish()
    }
}

struct TreeBuilder<'o> {
    doc: Document,
    stack: Vec<NodeId>,
    anchors: Anchorizer,
    options: &'o ParseOptions,
}

impl<'o> TreeBuilder<'o> {
    fn new(options: &'o ParseOptions) -> Self {
        let doc = Document::new();
        let root = doc.root();
        Self {
            doc,
            stack: vec![root],
            anchors: Anchorizer::new(),
            options,
        }
    }

    fn top(&self) -> NodeId {
        self.stack.last().copied().unwrap_or(NodeId(0))
    }

    fn top_kind(&self) -> &NodeKind {
        self.doc.kind(self.top())
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                self.inline(NodeKind::CodeSpan {
                    literal: code.into_string(),
                });
            }
            Event::InlineHtml(html) => {
                self.inline(NodeKind::RawHtml {
                    literal: html.into_string(),
                });
            }
            Event::Html(html) => {
                let top = self.top();
                if let NodeKind::HtmlBlock { literal } = &mut self.doc.node_mut(top).kind {
                    literal.push_str(&html);
                } else {
                    self.inline(NodeKind::RawHtml {
                        literal: html.into_string(),
                    });
                }
            }
            Event::SoftBreak => {
                self.inline(NodeKind::SoftBreak);
            }
            Event::HardBreak => {
                self.inline(NodeKind::HardBreak);
            }
            Event::Rule => {
                self.open_block(NodeKind::ThematicBreak);
                self.stack.pop();
            }
            Event::TaskListMarker(checked) => {
                self.inline(NodeKind::TaskCheckBox { checked });
            }
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                tracing::debug!("Skipping unsupported inline event");
            }
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.open_block(NodeKind::Paragraph),
            Tag::Heading {
                level,
                id,
                classes,
                attrs,
            } => {
                self.open_block(NodeKind::Heading {
                    level: heading_level_to_num(level),
                });
                let top = self.top();
                let node = self.doc.node_mut(top);
                if let Some(id) = id {
                    self.anchors.reserve(&id);
                    node.set_attribute("id", id.into_string());
                }
                if !classes.is_empty() {
                    let class = classes
                        .iter()
                        .map(|class| &**class)
                        .collect::<Vec<&str>>()
                        .join(" ");
                    node.set_attribute("class", class);
                }
                for (name, value) in attrs {
                    let value = value.map(CowStr::into_string).unwrap_or_default();
                    node.set_attribute(name.into_string(), value);
                }
            }
            Tag::BlockQuote(_) => self.open_block(NodeKind::BlockQuote),
            Tag::CodeBlock(kind) => {
                let info = match kind {
                    CodeBlockKind::Fenced(info) if !info.trim().is_empty() => {
                        Some(info.into_string())
                    }
                    CodeBlockKind::Fenced(_) | CodeBlockKind::Indented => None,
                };
                self.open_block(NodeKind::CodeBlock {
                    info,
                    literal: String::new(),
                });
            }
            Tag::HtmlBlock => self.open_block(NodeKind::HtmlBlock {
                literal: String::new(),
            }),
            Tag::List(start) => self.open_block(NodeKind::List {
                ordered: start.is_some(),
                start: start.unwrap_or(1),
            }),
            Tag::Item => self.open_block(NodeKind::ListItem),
            Tag::Table(alignments) => self.open_block(NodeKind::Table {
                alignments: alignments.into_iter().map(convert_alignment).collect(),
            }),
            Tag::TableHead => self.open_block(NodeKind::TableHead),
            Tag::TableRow => self.open_block(NodeKind::TableRow),
            Tag::TableCell => self.open_block(NodeKind::TableCell),
            Tag::Emphasis => self.open_inline(NodeKind::Emphasis),
            Tag::Strong => self.open_inline(NodeKind::Strong),
            Tag::Strikethrough => self.open_inline(NodeKind::Strikethrough),
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                let kind = match link_type {
                    LinkType::Autolink | LinkType::Email => NodeKind::AutoLink {
                        link_type: if link_type == LinkType::Email {
                            AutoLinkType::Email
                        } else {
                            AutoLinkType::Url
                        },
                        url: dest_url.into_string(),
                        label: String::new(),
                        protocol: None,
                    },
                    _ => NodeKind::Link {
                        destination: dest_url.into_string(),
                        title: title.into_string(),
                    },
                };
                self.open_inline(kind);
            }
            Tag::Image {
                dest_url, title, ..
            } => self.open_inline(NodeKind::Image {
                destination: dest_url.into_string(),
                title: title.into_string(),
            }),
            Tag::FootnoteDefinition(_)
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition
            | Tag::MetadataBlock(_)
            | Tag::Superscript
            | Tag::Subscript => {
                tracing::debug!("Skipping unsupported container");
            }
        }
    }

    fn end(&mut self, tag: TagEnd) {
        if matches!(
            tag,
            TagEnd::FootnoteDefinition
                | TagEnd::DefinitionList
                | TagEnd::DefinitionListTitle
                | TagEnd::DefinitionListDefinition
                | TagEnd::MetadataBlock(_)
                | TagEnd::Superscript
                | TagEnd::Subscript
        ) {
            return;
        }

        self.close_text_block();
        if self.stack.len() <= 1 {
            return;
        }
        let Some(id) = self.stack.pop() else {
            return;
        };

        if let TagEnd::Heading(_) = tag {
            self.assign_heading_id(id);
        }
    }

    fn text(&mut self, text: &str) {
        let top = self.top();
        match &mut self.doc.node_mut(top).kind {
            NodeKind::CodeBlock { literal, .. } | NodeKind::HtmlBlock { literal } => {
                literal.push_str(text);
                return;
            }
            NodeKind::AutoLink { label, .. } => {
                label.push_str(text);
                return;
            }
            _ => {}
        }

        let container = self.inline_container();
        if let Some(&last) = self.doc.children(container).last() {
            if let NodeKind::Text { literal } = &mut self.doc.node_mut(last).kind {
                literal.push_str(text);
                return;
            }
        }
        self.doc.append(
            container,
            NodeKind::Text {
                literal: text.to_owned(),
            },
        );
    }

    fn open_block(&mut self, kind: NodeKind) {
        self.close_text_block();
        let parent = self.top();
        let id = self.doc.append(parent, kind);
        self.stack.push(id);
    }

    fn open_inline(&mut self, kind: NodeKind) {
        let container = self.inline_container();
        let id = self.doc.append(container, kind);
        self.stack.push(id);
    }

    fn inline(&mut self, kind: NodeKind) {
        let container = self.inline_container();
        self.doc.append(container, kind);
    }

    /// Inline content placed directly in a tight list item goes into a text block.
    fn inline_container(&mut self) -> NodeId {
        if matches!(self.top_kind(), NodeKind::ListItem) {
            let item = self.top();
            let id = self.doc.append(item, NodeKind::TextBlock);
            self.stack.push(id);
        }
        self.top()
    }

    fn close_text_block(&mut self) {
        if matches!(self.top_kind(), NodeKind::TextBlock) {
            self.stack.pop();
        }
    }

    fn assign_heading_id(&mut self, heading: NodeId) {
        if !self.options.auto_heading_ids || self.doc.node(heading).attribute("id").is_some() {
            return;
        }
        let anchor = self.anchors.anchorize(&self.doc.plain_text(heading));
        self.doc
            .node_mut(heading)
            .attributes
            .insert(0, Attribute::new("id", anchor));
    }

    fn finish(mut self) -> Document {
        if self.options.linkify {
            self.linkify();
        }
        self.transform_images();
        tracing::debug!(nodes = self.doc.len(), "Built document tree");
        self.doc
    }

    fn linkify(&mut self) {
        let mut texts = Vec::new();
        let doc = &self.doc;
        let _ = doc.walk(doc.root(), |id, entering| {
            if !entering {
                return Ok::<_, std::convert::Infallible>(WalkStatus::Continue);
            }
            Ok(match doc.kind(id) {
                NodeKind::Link { .. } | NodeKind::AutoLink { .. } | NodeKind::Image { .. } => {
                    WalkStatus::SkipChildren
                }
                NodeKind::Text { .. } => {
                    texts.push(id);
                    WalkStatus::Continue
                }
                _ => WalkStatus::Continue,
            })
        });

        for id in texts {
            let NodeKind::Text { literal } = self.doc.kind(id) else {
                continue;
            };
            let segments = linkify::split(literal);
            if !segments.iter().any(|s| matches!(s, Segment::Url { .. })) {
                continue;
            }

            let kinds: Vec<NodeKind> = segments
                .into_iter()
                .map(|segment| match segment {
                    Segment::Text(text) => NodeKind::Text {
                        literal: text.to_owned(),
                    },
                    Segment::Url {
                        url,
                        label,
                        protocol,
                    } => NodeKind::AutoLink {
                        link_type: AutoLinkType::Url,
                        url,
                        label: label.to_owned(),
                        protocol: protocol.map(str::to_owned),
                    },
                })
                .collect();

            let mut kinds = kinds.into_iter();
            let Some(first) = kinds.next() else {
                continue;
            };
            self.doc.node_mut(id).kind = first;
            let mut last = id;
            for kind in kinds {
                last = self.doc.insert_after(last, kind);
            }
        }
    }

    /// Number images in document order and lift standalone ones out of
    /// their paragraph when wrapping is disabled.
    fn transform_images(&mut self) {
        let mut images = Vec::new();
        let doc = &self.doc;
        let _ = doc.walk(doc.root(), |id, entering| {
            if entering && matches!(doc.kind(id), NodeKind::Image { .. }) {
                images.push(id);
            }
            Ok::<_, std::convert::Infallible>(WalkStatus::Continue)
        });

        for (ordinal, id) in images.into_iter().enumerate() {
            let ordinal = i64::try_from(ordinal).unwrap_or(i64::MAX);
            self.doc
                .node_mut(id)
                .set_attribute(ATTR_ORDINAL, AttrValue::Int(ordinal));

            if self.options.wrap_standalone_image_within_paragraph {
                continue;
            }
            let Some(parent) = self.doc.parent(id) else {
                continue;
            };
            if matches!(self.doc.kind(parent), NodeKind::Paragraph)
                && self.doc.children(parent) == [id]
            {
                self.doc
                    .node_mut(id)
                    .set_attribute(ATTR_IS_BLOCK, AttrValue::Bool(true));
                self.doc.replace_with(parent, id);
            }
        }
    }
}

fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn convert_alignment(alignment: pulldown_cmark::Alignment) -> Alignment {
    match alignment {
        pulldown_cmark::Alignment::None => Alignment::None,
        pulldown_cmark::Alignment::Left => Alignment::Left,
        pulldown_cmark::Alignment::Center => Alignment::Center,
        pulldown_cmark::Alignment::Right => Alignment::Right,
    }
}
