//! Default HTML emission for every node kind.
//!
//! Output is byte-compatible with goldmark's HTML renderer so that turning a
//! hook on for one kind never changes the markup of another.

use hookmark_ast::{
    ATTR_IS_BLOCK, AttrValue, AutoLinkType, Document, NodeId, NodeKind, WalkStatus,
    is_dangerous_url, starts_with_ignore_case,
};

use crate::attributes::{
    AttributeFilter, filter_internal_attributes, render_attributes, render_filtered_attributes,
};
use crate::escape::{escape_url, push_escaped};

const RAW_HTML_OMITTED: &str = "<!-- raw HTML omitted -->";

/// Options for HTML emission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HtmlOptions {
    /// Emit raw HTML and dangerous URLs as-is.
    pub unsafe_html: bool,
    /// Close void elements XHTML-style (`<br />`).
    pub xhtml: bool,
    /// Protocol used for autolinks whose protocol the parser inferred.
    pub linkify_protocol: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            unsafe_html: false,
            xhtml: false,
            linkify_protocol: "https".to_owned(),
        }
    }
}

impl HtmlOptions {
    #[must_use]
    pub fn with_unsafe(mut self, enabled: bool) -> Self {
        self.unsafe_html = enabled;
        self
    }

    #[must_use]
    pub fn with_xhtml(mut self, enabled: bool) -> Self {
        self.xhtml = enabled;
        self
    }

    #[must_use]
    pub fn with_linkify_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.linkify_protocol = protocol.into();
        self
    }

    fn void_close(&self) -> &'static str {
        if self.xhtml { " />" } else { ">" }
    }
}

/// Destination of an autolink as it is rendered.
///
/// Parser-inferred protocols are swapped for the configured linkify
/// protocol, and email addresses get a `mailto:` prefix unless they already
/// carry one.
pub(crate) fn auto_link_destination(
    options: &HtmlOptions,
    link_type: AutoLinkType,
    url: &str,
    protocol: Option<&str>,
) -> String {
    let mut url = match protocol {
        Some(p) if p != options.linkify_protocol && url.starts_with(p) => {
            format!("{}{}", options.linkify_protocol, &url[p.len()..])
        }
        _ => url.to_owned(),
    };
    if link_type == AutoLinkType::Email && !starts_with_ignore_case(&url, "mailto:") {
        url.insert_str(0, "mailto:");
    }
    url
}

/// Hook-free renderer for a single document.
pub(crate) struct DefaultRenderer<'a> {
    options: &'a HtmlOptions,
    doc: &'a Document,
}

impl<'a> DefaultRenderer<'a> {
    pub(crate) fn new(options: &'a HtmlOptions, doc: &'a Document) -> Self {
        Self { options, doc }
    }

    pub(crate) fn options(&self) -> &'a HtmlOptions {
        self.options
    }

    fn allows_url(&self, url: &str) -> bool {
        self.options.unsafe_html || !is_dangerous_url(url)
    }

    /// Render any node with the default rules.
    pub(crate) fn render(&self, out: &mut String, id: NodeId, entering: bool) -> WalkStatus {
        let doc = self.doc;
        match doc.kind(id) {
            NodeKind::Document => {}
            NodeKind::Paragraph => out.push_str(if entering { "<p>" } else { "</p>\n" }),
            NodeKind::TextBlock => {
                if !entering && doc.next_sibling(id).is_some() && doc.first_child(id).is_some() {
                    out.push('\n');
                }
            }
            NodeKind::Heading { level } => self.heading(out, id, *level, entering),
            NodeKind::BlockQuote => out.push_str(if entering {
                "<blockquote>\n"
            } else {
                "</blockquote>\n"
            }),
            NodeKind::CodeBlock { info, literal } => {
                if entering {
                    self.code_block(out, info.as_deref(), literal);
                }
            }
            NodeKind::HtmlBlock { literal } => {
                if entering {
                    if self.options.unsafe_html {
                        out.push_str(literal);
                    } else {
                        out.push_str(RAW_HTML_OMITTED);
                        out.push('\n');
                    }
                }
            }
            NodeKind::ThematicBreak => {
                if entering {
                    out.push_str("<hr");
                    out.push_str(self.options.void_close());
                    out.push('\n');
                }
            }
            NodeKind::List { ordered, start } => self.list(out, id, *ordered, *start, entering),
            NodeKind::ListItem => self.list_item(out, id, entering),
            NodeKind::Table { .. } => out.push_str(if entering { "<table>\n" } else { "</table>\n" }),
            NodeKind::TableHead => {
                if entering {
                    out.push_str("<thead>\n<tr>\n");
                } else {
                    out.push_str("</tr>\n</thead>\n");
                    if doc.next_sibling(id).is_some() {
                        out.push_str("<tbody>\n");
                    }
                }
            }
            NodeKind::TableRow => {
                if entering {
                    out.push_str("<tr>\n");
                } else {
                    out.push_str("</tr>\n");
                    if doc.next_sibling(id).is_none() {
                        out.push_str("</tbody>\n");
                    }
                }
            }
            NodeKind::TableCell => self.table_cell(out, id, entering),
            NodeKind::Text { literal } => {
                if entering {
                    push_escaped(out, literal);
                }
            }
            NodeKind::SoftBreak => {
                if entering {
                    out.push('\n');
                }
            }
            NodeKind::HardBreak => {
                if entering {
                    out.push_str("<br");
                    out.push_str(self.options.void_close());
                    out.push('\n');
                }
            }
            NodeKind::CodeSpan { literal } => {
                if entering {
                    out.push_str("<code>");
                    push_escaped(out, literal);
                    out.push_str("</code>");
                }
            }
            NodeKind::Emphasis => out.push_str(if entering { "<em>" } else { "</em>" }),
            NodeKind::Strong => out.push_str(if entering { "<strong>" } else { "</strong>" }),
            NodeKind::Strikethrough => out.push_str(if entering { "<del>" } else { "</del>" }),
            NodeKind::Link { destination, title } => {
                self.link(out, destination, title, entering);
            }
            NodeKind::AutoLink {
                link_type,
                url,
                label,
                protocol,
            } => {
                if entering {
                    self.auto_link(out, id, *link_type, url, label, protocol.as_deref());
                }
            }
            NodeKind::Image { destination, title } => {
                return self.image(out, id, destination, title, entering);
            }
            NodeKind::RawHtml { literal } => {
                if entering {
                    out.push_str(if self.options.unsafe_html {
                        literal
                    } else {
                        RAW_HTML_OMITTED
                    });
                }
            }
            NodeKind::TaskCheckBox { checked } => {
                if entering {
                    out.push_str(if *checked {
                        r#"<input checked="" disabled="" type="checkbox""#
                    } else {
                        r#"<input disabled="" type="checkbox""#
                    });
                    out.push_str(self.options.void_close());
                    out.push(' ');
                }
            }
        }
        WalkStatus::Continue
    }

    /// `<a href="URL"[ title="T"]>` on enter, `</a>` on leave.
    pub(crate) fn link(&self, out: &mut String, destination: &str, title: &str, entering: bool) {
        if !entering {
            out.push_str("</a>");
            return;
        }
        out.push_str("<a href=\"");
        if self.allows_url(destination) {
            out.push_str(&escape_url(destination));
        }
        out.push('"');
        if !title.is_empty() {
            out.push_str(" title=\"");
            push_escaped(out, title);
            out.push('"');
        }
        out.push('>');
    }

    /// Complete `<a>` element for an autolink; autolinks have no children.
    pub(crate) fn auto_link(
        &self,
        out: &mut String,
        id: NodeId,
        link_type: AutoLinkType,
        url: &str,
        label: &str,
        protocol: Option<&str>,
    ) {
        let destination = auto_link_destination(self.options, link_type, url, protocol);
        out.push_str("<a href=\"");
        // Autolink text is literal, so entities in the URL stay unresolved.
        out.push_str(&escape_url(&destination));
        out.push('"');
        render_filtered_attributes(
            out,
            &filter_internal_attributes(&self.doc.node(id).attributes),
            AttributeFilter::LINK,
        );
        out.push('>');
        push_escaped(out, label);
        out.push_str("</a>");
    }

    /// Void `<img>` element; alt text comes from the children, which are skipped.
    pub(crate) fn image(
        &self,
        out: &mut String,
        id: NodeId,
        destination: &str,
        title: &str,
        entering: bool,
    ) -> WalkStatus {
        if !entering {
            return WalkStatus::Continue;
        }
        out.push_str("<img src=\"");
        if self.allows_url(destination) {
            out.push_str(&escape_url(destination));
        }
        out.push_str("\" alt=\"");
        push_escaped(out, &self.doc.plain_text(id));
        out.push('"');
        if !title.is_empty() {
            out.push_str(" title=\"");
            push_escaped(out, title);
            out.push('"');
        }
        render_attributes(
            out,
            &filter_internal_attributes(&self.doc.node(id).attributes),
        );
        out.push_str(self.options.void_close());
        WalkStatus::SkipChildren
    }

    pub(crate) fn heading(&self, out: &mut String, id: NodeId, level: u8, entering: bool) {
        if entering {
            out.push_str("<h");
            out.push(heading_digit(level));
            render_attributes(
                out,
                &filter_internal_attributes(&self.doc.node(id).attributes),
            );
            out.push('>');
        } else {
            out.push_str("</h");
            out.push(heading_digit(level));
            out.push_str(">\n");
        }
    }

    pub(crate) fn list(
        &self,
        out: &mut String,
        id: NodeId,
        ordered: bool,
        start: u64,
        entering: bool,
    ) {
        let tag = if ordered { "ol" } else { "ul" };
        if entering {
            out.push('<');
            out.push_str(tag);
            if ordered && start != 1 {
                out.push_str(" start=\"");
                out.push_str(&start.to_string());
                out.push('"');
            }
            render_filtered_attributes(
                out,
                &filter_internal_attributes(&self.doc.node(id).attributes),
                AttributeFilter::LIST,
            );
            out.push_str(">\n");
        } else {
            out.push_str("</");
            out.push_str(tag);
            out.push_str(">\n");
        }
    }

    pub(crate) fn list_item(&self, out: &mut String, id: NodeId, entering: bool) {
        if entering {
            out.push_str("<li>");
            if let Some(first) = self.doc.first_child(id) {
                if !matches!(self.doc.kind(first), NodeKind::TextBlock) {
                    out.push('\n');
                }
            }
        } else {
            out.push_str("</li>\n");
        }
    }

    fn code_block(&self, out: &mut String, info: Option<&str>, literal: &str) {
        out.push_str("<pre><code");
        if let Some(language) = info.and_then(|i| i.split_whitespace().next()) {
            out.push_str(" class=\"language-");
            push_escaped(out, language);
            out.push('"');
        }
        out.push('>');
        push_escaped(out, literal);
        out.push_str("</code></pre>\n");
    }

    fn table_cell(&self, out: &mut String, id: NodeId, entering: bool) {
        let doc = self.doc;
        let row = doc.parent(id);
        let tag = if row.is_some_and(|r| matches!(doc.kind(r), NodeKind::TableHead)) {
            "th"
        } else {
            "td"
        };
        if !entering {
            out.push_str("</");
            out.push_str(tag);
            out.push_str(">\n");
            return;
        }

        out.push('<');
        out.push_str(tag);
        let alignment = row.and_then(|row| {
            let column = doc.children(row).iter().position(|&c| c == id)?;
            let NodeKind::Table { alignments } = doc.kind(doc.parent(row)?) else {
                return None;
            };
            alignments.get(column)?.as_css()
        });
        if let Some(align) = alignment {
            if self.options.xhtml {
                out.push_str(" align=\"");
                out.push_str(align);
                out.push('"');
            } else {
                out.push_str(" style=\"text-align:");
                out.push_str(align);
                out.push('"');
            }
        }
        out.push('>');
    }
}

fn heading_digit(level: u8) -> char {
    char::from(b'0' + level.clamp(1, 6))
}

/// Whether an image node was lifted out of its paragraph at parse time.
pub(crate) fn is_block_image(doc: &Document, id: NodeId) -> bool {
    matches!(
        doc.node(id).attribute(ATTR_IS_BLOCK),
        Some(AttrValue::Bool(true))
    )
}
