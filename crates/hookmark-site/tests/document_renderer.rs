//! Caching behaviour of `DocumentRenderer` with hooks.

use std::sync::Arc;

use hookmark_ast::ParseOptions;
use hookmark_cache::{FileCache, MemoryCache};
use hookmark_renderer::{
    HeadingContext, HeadingRenderer, HookError, HookId, HookRegistry, HookWriter, HtmlOptions,
    LinkContext, LinkRenderer, RenderError,
};
use hookmark_site::{BuildDependencies, CACHE_VERSION, DocumentRenderer, SiteError};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

struct Permalink(&'static str);

impl HeadingRenderer for Permalink {
    fn render_heading(&self, out: &mut HookWriter, ctx: &HeadingContext) -> Result<(), HookError> {
        out.push_str(&format!(
            "<h{0} id=\"{1}\">{2} <a href=\"#{1}\">{3}</a></h{0}>\n",
            ctx.level(),
            ctx.anchor(),
            ctx.text(),
            self.0,
        ));
        Ok(())
    }

    fn identity(&self) -> HookId {
        HookId::new(format!("permalink:{}", self.0))
    }
}

struct Broken;

impl HeadingRenderer for Broken {
    fn render_heading(&self, _out: &mut HookWriter, _ctx: &HeadingContext) -> Result<(), HookError> {
        Err("missing template".into())
    }

    fn identity(&self) -> HookId {
        HookId::new("broken")
    }
}

struct External;

impl LinkRenderer for External {
    fn render_link(&self, out: &mut HookWriter, ctx: &LinkContext) -> Result<(), HookError> {
        out.push_str(&format!(
            "<a href=\"{}\" rel=\"external\">{}</a>",
            ctx.destination(),
            ctx.text()
        ));
        Ok(())
    }

    fn identity(&self) -> HookId {
        HookId::new("external-link")
    }
}

fn with_permalink(cache: &MemoryCache, symbol: &'static str) -> DocumentRenderer {
    DocumentRenderer::new(HtmlOptions::default(), ParseOptions::default(), cache)
        .with_hooks(Arc::new(HookRegistry::new().with_heading(Arc::new(Permalink(symbol)))))
}

#[test]
fn test_hooked_render_reports_dependencies() {
    let cache = MemoryCache::new();
    let renderer = with_permalink(&cache, "#");

    let result = renderer.render("a.md", "# One\n\n## Two\n").unwrap();

    assert_eq!(
        result.html,
        "<h1 id=\"one\">One <a href=\"#one\">#</a></h1>\n<h2 id=\"two\">Two <a href=\"#two\">#</a></h2>\n"
    );
    assert_eq!(
        result.dependencies.into_iter().collect::<Vec<_>>(),
        vec![HookId::new("permalink:#")]
    );
}

#[test]
fn test_cache_hit_keeps_dependencies() {
    let cache = MemoryCache::new();
    let renderer = with_permalink(&cache, "#");

    let first = renderer.render("a.md", "# One").unwrap();
    let second = renderer.render("a.md", "# One").unwrap();

    assert!(second.from_cache);
    assert_eq!(second.html, first.html);
    assert_eq!(second.dependencies, first.dependencies);
}

#[test]
fn test_changed_hook_identity_rerenders() {
    let cache = MemoryCache::new();
    with_permalink(&cache, "#").render("a.md", "# One").unwrap();

    let result = with_permalink(&cache, "¶").render("a.md", "# One").unwrap();

    assert!(!result.from_cache);
    assert_eq!(result.html, "<h1 id=\"one\">One <a href=\"#one\">¶</a></h1>\n");
}

#[test]
fn test_removed_hook_rerenders_with_defaults() {
    let cache = MemoryCache::new();
    with_permalink(&cache, "#").render("a.md", "# One").unwrap();

    let plain = DocumentRenderer::new(HtmlOptions::default(), ParseOptions::default(), &cache);
    let result = plain.render("a.md", "# One").unwrap();

    assert!(!result.from_cache);
    assert_eq!(result.html, "<h1 id=\"one\">One</h1>\n");
    assert!(result.dependencies.is_empty());
}

#[test]
fn test_added_hook_rerenders_hookless_entry() {
    let cache = MemoryCache::new();
    let plain = DocumentRenderer::new(HtmlOptions::default(), ParseOptions::default(), &cache);
    let first = plain.render("a.md", "## Intro").unwrap();
    assert_eq!(first.html, "<h2 id=\"intro\">Intro</h2>\n");

    let second = with_permalink(&cache, "#").render("a.md", "## Intro").unwrap();

    assert!(!second.from_cache);
    assert_eq!(
        second.html,
        "<h2 id=\"intro\">Intro <a href=\"#intro\">#</a></h2>\n"
    );
    assert_eq!(
        second.dependencies.into_iter().collect::<Vec<_>>(),
        vec![HookId::new("permalink:#")]
    );
}

#[test]
fn test_added_hook_for_another_kind_rerenders() {
    let cache = MemoryCache::new();
    let source = "# One\n\n[home](/)\n";
    let first = with_permalink(&cache, "#").render("a.md", source).unwrap();
    assert!(first.html.contains("<a href=\"/\">home</a>"));

    let registry = HookRegistry::new()
        .with_heading(Arc::new(Permalink("#")))
        .with_link(Arc::new(External));
    let second = DocumentRenderer::new(HtmlOptions::default(), ParseOptions::default(), &cache)
        .with_hooks(Arc::new(registry))
        .render("a.md", source)
        .unwrap();

    assert!(!second.from_cache);
    assert!(second.html.contains("<a href=\"/\" rel=\"external\">home</a>"));
    assert_eq!(second.dependencies.len(), 2);
}

#[test]
fn test_unchanged_hook_set_hits_without_hooked_nodes() {
    let cache = MemoryCache::new();
    with_permalink(&cache, "#").render("plain.md", "just text").unwrap();

    let again = with_permalink(&cache, "#").render("plain.md", "just text").unwrap();

    assert!(again.from_cache);
    assert!(again.dependencies.is_empty());
}

#[test]
fn test_hook_error_is_not_cached() {
    let cache = MemoryCache::new();
    let renderer = DocumentRenderer::new(HtmlOptions::default(), ParseOptions::default(), &cache)
        .with_hooks(Arc::new(HookRegistry::new().with_heading(Arc::new(Broken))));

    let err = renderer.render("a.md", "# One").unwrap_err();
    assert!(matches!(err, RenderError::Hook { .. }));

    let retry = with_permalink(&cache, "#").render("a.md", "# One").unwrap();
    assert!(!retry.from_cache);
}

#[test]
fn test_file_cache_persists_between_renderers() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("page.md");
    std::fs::write(&source, "# Page\n").unwrap();
    let cache_dir = tmp.path().join("cache");

    let first = DocumentRenderer::new(
        HtmlOptions::default(),
        ParseOptions::default(),
        &FileCache::new(cache_dir.clone(), CACHE_VERSION),
    )
    .render_file(&source)
    .unwrap();
    let second = DocumentRenderer::new(
        HtmlOptions::default(),
        ParseOptions::default(),
        &FileCache::new(cache_dir, CACHE_VERSION),
    )
    .render_file(&source)
    .unwrap();

    assert!(!first.from_cache);
    assert!(second.from_cache);
    assert_eq!(second.html, "<h1 id=\"page\">Page</h1>\n");
}

#[test]
fn test_render_missing_file() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("missing.md");
    let renderer = DocumentRenderer::new(
        HtmlOptions::default(),
        ParseOptions::default(),
        &MemoryCache::new(),
    );

    let err = renderer.render_file(&missing).unwrap_err();

    assert!(matches!(err, SiteError::NotFound(path) if path == missing));
}

#[test]
fn test_build_dependencies_across_documents() {
    let cache = MemoryCache::new();
    let renderer = with_permalink(&cache, "#");
    let mut build = BuildDependencies::new();

    for (path, source) in [("a.md", "# A"), ("b.md", "text only"), ("c.md", "## C")] {
        let result = renderer.render(path, source).unwrap();
        build.extend(path, &result.dependencies);
        build.extend(path, &result.dependencies);
    }

    let hook = HookId::new("permalink:#");
    assert_eq!(build.units_using(&hook).collect::<Vec<_>>(), vec!["a.md", "c.md"]);
    assert_eq!(build.get("a.md").map(|ids| ids.len()), Some(1));
}
