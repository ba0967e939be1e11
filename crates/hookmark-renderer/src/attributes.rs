//! Attribute filtering and rendering.

use hookmark_ast::{AttrValue, Attribute, INTERNAL_ATTR_PREFIX};

use crate::escape::push_escaped;

/// Drop attributes reserved for parse-stage signaling.
///
/// Returns a copy with every attribute whose name starts with
/// [`INTERNAL_ATTR_PREFIX`] removed. Relative order is preserved and the
/// source slice is left untouched.
///
/// # Example
///
/// ```
/// use hookmark_ast::{ATTR_ORDINAL, Attribute};
/// use hookmark_renderer::filter_internal_attributes;
///
/// let attrs = vec![
///     Attribute::new("class", "wide"),
///     Attribute::new(ATTR_ORDINAL, 0_i64),
///     Attribute::new("id", "hero"),
/// ];
/// let names: Vec<_> = filter_internal_attributes(&attrs)
///     .into_iter()
///     .map(|a| a.name)
///     .collect();
///
/// assert_eq!(names, ["class", "id"]);
/// ```
#[must_use]
pub fn filter_internal_attributes(attrs: &[Attribute]) -> Vec<Attribute> {
    attrs
        .iter()
        .filter(|a| !a.name.starts_with(INTERNAL_ATTR_PREFIX))
        .cloned()
        .collect()
}

/// Allow-list of attribute names that may be rendered for an element.
///
/// Names starting with `data-` are always allowed.
#[derive(Clone, Copy, Debug)]
pub struct AttributeFilter {
    names: &'static [&'static str],
    extra: &'static [&'static str],
}

const GLOBAL_ATTRIBUTES: &[&str] = &[
    "accesskey",
    "autocapitalize",
    "autofocus",
    "class",
    "contenteditable",
    "dir",
    "draggable",
    "enterkeyhint",
    "hidden",
    "id",
    "inert",
    "inputmode",
    "is",
    "itemid",
    "itemprop",
    "itemref",
    "itemscope",
    "itemtype",
    "lang",
    "part",
    "role",
    "slot",
    "spellcheck",
    "style",
    "tabindex",
    "title",
    "translate",
];

impl AttributeFilter {
    /// Global HTML attributes.
    pub const GLOBAL: Self = Self {
        names: GLOBAL_ATTRIBUTES,
        extra: &[],
    };

    /// Global attributes plus those valid on `<a>`.
    pub const LINK: Self = Self {
        names: GLOBAL_ATTRIBUTES,
        extra: &[
            "download",
            "hreflang",
            "media",
            "ping",
            "referrerpolicy",
            "rel",
            "shape",
            "target",
        ],
    };

    /// Global attributes plus those valid on `<ol>` and `<ul>`.
    pub const LIST: Self = Self {
        names: GLOBAL_ATTRIBUTES,
        extra: &["start", "reversed", "type"],
    };

    /// Whether an attribute name passes this filter.
    #[must_use]
    pub fn allows(&self, name: &str) -> bool {
        name.starts_with("data-") || self.names.contains(&name) || self.extra.contains(&name)
    }
}

/// Write ` name="value"` for each attribute, skipping `on*` event handlers.
pub fn render_attributes(out: &mut String, attrs: &[Attribute]) {
    for attr in attrs {
        if attr.name.starts_with("on") {
            continue;
        }
        push_attribute(out, attr);
    }
}

/// Write ` name="value"` for each attribute allowed by `filter`.
pub fn render_filtered_attributes(out: &mut String, attrs: &[Attribute], filter: AttributeFilter) {
    for attr in attrs {
        if filter.allows(&attr.name) {
            push_attribute(out, attr);
        }
    }
}

fn push_attribute(out: &mut String, attr: &Attribute) {
    out.push(' ');
    out.push_str(&attr.name);
    out.push_str("=\"");
    match &attr.value {
        AttrValue::Str(s) => push_escaped(out, s),
        other => push_escaped(out, &other.to_string()),
    }
    out.push('"');
}
