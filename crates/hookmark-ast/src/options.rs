//! Parse-stage options.

use pulldown_cmark::Options;

/// Options controlling how Markdown source is folded into a [`Document`](crate::Document).
///
/// All flags are enabled by default.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ParseOptions {
    /// Enable GitHub Flavored Markdown: tables, strikethrough and task lists.
    pub gfm: bool,
    /// Parse `{#id .class key=value}` attribute blocks after headings.
    pub heading_attributes: bool,
    /// Give every heading without an explicit id a generated anchor.
    pub auto_heading_ids: bool,
    /// Turn bare `www.` and `http(s)://` URLs in text into autolinks.
    pub linkify: bool,
    /// Keep standalone images inside their paragraph.
    ///
    /// When disabled, an image that is the only content of a paragraph is
    /// lifted out of it and marked as a block image.
    pub wrap_standalone_image_within_paragraph: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            heading_attributes: true,
            auto_heading_ids: true,
            linkify: true,
            wrap_standalone_image_within_paragraph: true,
        }
    }
}

impl ParseOptions {
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    #[must_use]
    pub fn with_heading_attributes(mut self, enabled: bool) -> Self {
        self.heading_attributes = enabled;
        self
    }

    #[must_use]
    pub fn with_auto_heading_ids(mut self, enabled: bool) -> Self {
        self.auto_heading_ids = enabled;
        self
    }

    #[must_use]
    pub fn with_linkify(mut self, enabled: bool) -> Self {
        self.linkify = enabled;
        self
    }

    #[must_use]
    pub fn with_wrap_standalone_image(mut self, enabled: bool) -> Self {
        self.wrap_standalone_image_within_paragraph = enabled;
        self
    }

    /// Parser flags for `pulldown_cmark::Parser::new_ext`.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let mut options = Options::empty();
        if self.gfm {
            options |= Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM;
        }
        if self.heading_attributes {
            options |= Options::ENABLE_HEADING_ATTRIBUTES;
        }
        options
    }
}
