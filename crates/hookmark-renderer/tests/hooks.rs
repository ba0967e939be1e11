//! Render hook dispatch: capture, replacement, dependencies and errors.

use std::collections::BTreeSet;
use std::error::Error;
use std::sync::{Arc, Mutex};

use hookmark_ast::{Document, NodeKind, ParseOptions};
use hookmark_renderer::{
    DocumentRef, HeadingContext, HeadingRenderer, Hook, HookError, HookId, HookKind, HookProvider,
    HookRegistry, HookWriter, HtmlOptions, HtmlRenderer, ImageContext, ImageRenderer, LinkContext,
    LinkRenderer, ListContext, ListItemContext, ListItemRenderer, ListRenderer, RenderError,
    RenderOutput,
};
use pretty_assertions::assert_eq;

/// Records every context it sees and writes a fixed marker.
#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<String>>,
}

impl Recorder {
    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    fn note(&self, entry: String) {
        self.seen.lock().unwrap().push(entry);
    }
}

impl LinkRenderer for Recorder {
    fn render_link(&self, out: &mut HookWriter, ctx: &LinkContext) -> Result<(), HookError> {
        self.note(format!(
            "{}|{}|{}|{}",
            ctx.destination(),
            ctx.title(),
            ctx.text(),
            ctx.plain_text()
        ));
        out.push_str(&format!("<a class=\"ext\" href=\"{}\">{}</a>", ctx.destination(), ctx.text()));
        Ok(())
    }

    fn identity(&self) -> HookId {
        HookId::new("link-recorder")
    }
}

impl ImageRenderer for Recorder {
    fn render_image(&self, out: &mut HookWriter, ctx: &ImageContext) -> Result<(), HookError> {
        let variant = if ctx.is_block() { "block" } else { "inline" };
        self.note(format!(
            "{}|{}|{}|{}",
            ctx.destination(),
            ctx.ordinal(),
            variant,
            ctx.attributes().len()
        ));
        out.push_str(&format!("[img {} {} {}]", ctx.ordinal(), variant, ctx.text()));
        Ok(())
    }

    fn identity(&self) -> HookId {
        HookId::new("image-recorder")
    }
}

impl ListItemRenderer for Recorder {
    fn render_list_item(
        &self,
        out: &mut HookWriter,
        ctx: &ListItemContext,
    ) -> Result<(), HookError> {
        self.note(format!(
            "{}|{}|{}|{}",
            ctx.text(),
            ctx.is_first(),
            ctx.is_last(),
            ctx.parent().kind().name()
        ));
        out.push_str(&format!("<li class=\"item\">{}</li>\n", ctx.text()));
        Ok(())
    }

    fn identity(&self) -> HookId {
        HookId::new("item-recorder")
    }
}

impl ListRenderer for Recorder {
    fn render_list(&self, out: &mut HookWriter, ctx: &ListContext) -> Result<(), HookError> {
        self.note(format!(
            "{}|{}|{}",
            ctx.text(),
            ctx.is_ordered(),
            ctx.parent().map_or("none", |p| p.kind().name())
        ));
        out.push_str("<div class=\"list\">\n");
        out.push_str(ctx.text().as_str());
        out.push_str("</div>\n");
        Ok(())
    }

    fn identity(&self) -> HookId {
        HookId::new("list-recorder")
    }
}

struct UpperAnchor;

impl HeadingRenderer for UpperAnchor {
    fn render_heading(&self, out: &mut HookWriter, ctx: &HeadingContext) -> Result<(), HookError> {
        out.push_str(&format!(
            "<h{0} id=\"{1}\">{2}</h{0}>",
            ctx.level(),
            ctx.anchor().to_uppercase(),
            ctx.text()
        ));
        Ok(())
    }

    fn identity(&self) -> HookId {
        HookId::new("upper-anchor")
    }
}

struct Failing;

impl HeadingRenderer for Failing {
    fn render_heading(&self, _out: &mut HookWriter, _ctx: &HeadingContext) -> Result<(), HookError> {
        Err("template exploded".into())
    }

    fn identity(&self) -> HookId {
        HookId::new("failing")
    }
}

fn render(
    markdown: &str,
    registry: HookRegistry,
    parse: &ParseOptions,
) -> Result<RenderOutput, RenderError> {
    HtmlRenderer::new(HtmlOptions::default())
        .with_hooks(Arc::new(registry))
        .render_markdown(markdown, parse, &DocumentRef::new("page.md"))
}

fn ids(output: &RenderOutput) -> Vec<&str> {
    output.dependencies.iter().map(HookId::as_str).collect()
}

#[test]
fn test_heading_hook_on_built_tree() {
    let mut doc = Document::new();
    let heading = doc.append(doc.root(), NodeKind::Heading { level: 2 });
    doc.node_mut(heading).set_attribute("id", "intro");
    doc.append(
        heading,
        NodeKind::Text {
            literal: "Intro".to_owned(),
        },
    );

    let output = HtmlRenderer::default()
        .with_hooks(Arc::new(HookRegistry::new().with_heading(Arc::new(UpperAnchor))))
        .render(&doc, &DocumentRef::new("page.md"))
        .unwrap();

    assert_eq!(output.html, "<h2 id=\"INTRO\">Intro</h2>");
    assert_eq!(ids(&output), vec!["upper-anchor"]);
}

#[test]
fn test_heading_hook_receives_rendered_children() {
    let output = render(
        "Before\n\n## Hello *world*\n\nAfter\n",
        HookRegistry::new().with_heading(Arc::new(UpperAnchor)),
        &ParseOptions::default(),
    )
    .unwrap();

    assert_eq!(
        output.html,
        "<p>Before</p>\n<h2 id=\"HELLO-WORLD\">Hello <em>world</em></h2><p>After</p>\n"
    );
}

#[test]
fn test_link_hook_replaces_only_its_span() {
    let recorder = Arc::new(Recorder::default());
    let output = render(
        "before [*a* & b](/x \"T\") after",
        HookRegistry::new().with_link(recorder.clone()),
        &ParseOptions::default(),
    )
    .unwrap();

    assert_eq!(
        output.html,
        "<p>before <a class=\"ext\" href=\"/x\"><em>a</em> &amp; b</a> after</p>\n"
    );
    assert_eq!(recorder.seen(), vec!["/x|T|<em>a</em> &amp; b|a & b"]);
    assert_eq!(ids(&output), vec!["link-recorder"]);
}

#[test]
fn test_link_hook_handles_autolinks() {
    let recorder = Arc::new(Recorder::default());
    render(
        "<foo@example.com> and www.example.com",
        HookRegistry::new().with_link(recorder.clone()),
        &ParseOptions::default(),
    )
    .unwrap();

    assert_eq!(
        recorder.seen(),
        vec![
            "mailto:foo@example.com||foo@example.com|foo@example.com",
            "https://www.example.com||www.example.com|www.example.com",
        ]
    );
}

#[test]
fn test_autolink_hook_text_is_raw_label() {
    let recorder = Arc::new(Recorder::default());
    let output = render(
        "<http://a.com/?x=1&y=2>",
        HookRegistry::new().with_link(recorder.clone()),
        &ParseOptions::default(),
    )
    .unwrap();

    assert_eq!(
        recorder.seen(),
        vec!["http://a.com/?x=1&y=2||http://a.com/?x=1&y=2|http://a.com/?x=1&y=2"]
    );
    assert_eq!(ids(&output), vec!["link-recorder"]);
}

#[test]
fn test_link_hook_gets_dangerous_destination_verbatim() {
    let recorder = Arc::new(Recorder::default());
    let output = render(
        "[x](javascript:alert(1))",
        HookRegistry::new().with_link(recorder.clone()),
        &ParseOptions::default(),
    )
    .unwrap();

    assert_eq!(recorder.seen(), vec!["javascript:alert(1)||x|x"]);
    assert_eq!(
        output.html,
        "<p><a class=\"ext\" href=\"javascript:alert(1)\">x</a></p>\n"
    );
}

#[test]
fn test_image_hook_variants_and_ordinals() {
    let recorder = Arc::new(Recorder::default());
    let parse = ParseOptions::default().with_wrap_standalone_image(false);
    let output = render(
        "![one](1.png)\n\nText ![two](2.png)\n",
        HookRegistry::new().with_image(recorder.clone()),
        &parse,
    )
    .unwrap();

    assert_eq!(
        output.html,
        "[img 0 block one]<p>Text [img 1 inline two]</p>\n"
    );
    assert_eq!(recorder.seen(), vec!["1.png|0|block|0", "2.png|1|inline|0"]);
}

#[test]
fn test_image_variant_hook_takes_precedence() {
    let block = Arc::new(Recorder::default());
    let generic = Arc::new(Recorder::default());
    let parse = ParseOptions::default().with_wrap_standalone_image(false);
    render(
        "![one](1.png)\n\nText ![two](2.png)\n",
        HookRegistry::new()
            .with_image(generic.clone())
            .with_image_for("block", block.clone()),
        &parse,
    )
    .unwrap();

    assert_eq!(block.seen(), vec!["1.png|0|block|0"]);
    assert_eq!(generic.seen(), vec!["2.png|1|inline|0"]);
}

#[test]
fn test_list_and_item_hooks_nest() {
    let recorder = Arc::new(Recorder::default());
    let output = render(
        "- Item 1\n- Item 2\n",
        HookRegistry::new()
            .with_list(recorder.clone())
            .with_list_item(recorder.clone()),
        &ParseOptions::default(),
    )
    .unwrap();

    assert_eq!(
        output.html,
        "<div class=\"list\">\n<li class=\"item\">Item 1</li>\n<li class=\"item\">Item 2</li>\n</div>\n"
    );
    assert_eq!(
        recorder.seen(),
        vec![
            "Item 1|true|false|list",
            "Item 2|false|true|list",
            "<li class=\"item\">Item 1</li>\n<li class=\"item\">Item 2</li>\n|false|none",
        ]
    );
    assert_eq!(
        ids(&output),
        vec!["item-recorder", "item-recorder", "list-recorder"]
    );
}

#[test]
fn test_nested_list_parent() {
    let recorder = Arc::new(Recorder::default());
    render(
        "1. a\n   - b\n",
        HookRegistry::new().with_list(recorder.clone()),
        &ParseOptions::default(),
    )
    .unwrap();

    let seen = recorder.seen();
    assert_eq!(seen.len(), 2);
    assert!(seen[0].ends_with("|false|list item"));
    assert!(seen[1].ends_with("|true|none"));
}

#[test]
fn test_hooks_nest_across_kinds() {
    let recorder = Arc::new(Recorder::default());
    let output = render(
        "## See [docs](/d)\n",
        HookRegistry::new()
            .with_link(recorder.clone())
            .with_heading(Arc::new(UpperAnchor)),
        &ParseOptions::default(),
    )
    .unwrap();

    assert_eq!(
        output.html,
        "<h2 id=\"SEE-DOCS\">See <a class=\"ext\" href=\"/d\">docs</a></h2>"
    );
    assert_eq!(ids(&output), vec!["link-recorder", "upper-anchor"]);
}

#[test]
fn test_unhooked_kinds_render_as_default() {
    let markdown = "# Title\n\n- a\n- b\n\n![i](i.png)\n";
    let plain = HtmlRenderer::default()
        .render_markdown(markdown, &ParseOptions::default(), &DocumentRef::new("page.md"))
        .unwrap();
    let hooked = render(
        markdown,
        HookRegistry::new().with_link(Arc::new(Recorder::default())),
        &ParseOptions::default(),
    )
    .unwrap();

    assert_eq!(hooked.html, plain.html);
    assert!(hooked.dependencies.is_empty());
}

#[test]
fn test_dependencies_repeat_per_call() {
    let output = render(
        "# A\n\n# B\n\n# C\n",
        HookRegistry::new().with_heading(Arc::new(UpperAnchor)),
        &ParseOptions::default(),
    )
    .unwrap();

    assert_eq!(output.dependencies.len(), 3);
    assert_eq!(output.dependencies.unique().len(), 1);

    let mut build = BTreeSet::new();
    output.dependencies.merge_into(&mut build);
    output.dependencies.merge_into(&mut build);
    assert_eq!(build, BTreeSet::from([HookId::new("upper-anchor")]));
}

#[test]
fn test_hook_error_aborts_render() {
    let err = render(
        "# Broken\n",
        HookRegistry::new().with_heading(Arc::new(Failing)),
        &ParseOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(
        &err,
        RenderError::Hook { kind: HookKind::Heading, identity, .. } if identity.as_str() == "failing"
    ));
    assert_eq!(err.source().unwrap().to_string(), "template exploded");
}

/// Provider that answers every lookup with a heading hook.
struct Confused;

impl HookProvider for Confused {
    fn get_renderer(&self, _kind: HookKind, _variant: Option<&str>) -> Option<Hook> {
        Some(Hook::Heading(Arc::new(UpperAnchor)))
    }

    fn identities(&self) -> BTreeSet<HookId> {
        BTreeSet::from([HookId::new("upper-anchor")])
    }
}

#[test]
fn test_provider_kind_mismatch_is_an_error() {
    let err = HtmlRenderer::default()
        .with_hooks(Arc::new(Confused))
        .render_markdown("[a](b)", &ParseOptions::default(), &DocumentRef::new("page.md"))
        .unwrap_err();

    assert!(matches!(
        err,
        RenderError::KindMismatch {
            expected: "link",
            found: "heading"
        }
    ));
}

#[test]
fn test_renderer_is_shared_between_threads() {
    let renderer = HtmlRenderer::default()
        .with_hooks(Arc::new(HookRegistry::new().with_heading(Arc::new(UpperAnchor))));

    let outputs: Vec<String> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let renderer = &renderer;
                scope.spawn(move || {
                    renderer
                        .render_markdown(
                            &format!("# Page {i}"),
                            &ParseOptions::default(),
                            &DocumentRef::new(format!("page-{i}.md")),
                        )
                        .unwrap()
                        .html
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(outputs[3], "<h1 id=\"PAGE-3\">Page 3</h1>");
}
