//! Partial discovery, scoping and precedence.

use anyhow::Result;
use handlebars_x::prelude::*;
use handlebars_x::test_utils::fixtures::PARTIALS;
use handlebars_x::test_utils::{SiteFixture, contents_of, init_test_logging};

use super::fixture_options;

fn render_full_site() -> Result<FileSet> {
    init_test_logging(None);
    let mut files = SiteFixture::full().build();
    HandlebarsX::new(fixture_options()).process(&mut files, &Build::new())?;
    Ok(files)
}

#[test]
fn test_simple_partial_from_root_dir() -> Result<()> {
    let files = render_full_site()?;
    assert_eq!(contents_of(&files, "posts/simple.hbs"), "<h1>test:simple</h1>");
    Ok(())
}

#[test]
fn test_relative_partial_from_subdir() -> Result<()> {
    let files = render_full_site()?;
    assert_eq!(contents_of(&files, "posts/relative-partials/index.hbs"), "test:local,partial");
    Ok(())
}

#[test]
fn test_nested_root_partial_with_inline_partial() -> Result<()> {
    let files = render_full_site()?;
    assert_eq!(contents_of(&files, "posts/relative-partials2/inline-partials.hbs"), "test:layout");
    Ok(())
}

#[test]
fn test_nested_partial_blocks_from_subdir() -> Result<()> {
    let files = render_full_site()?;
    assert_eq!(
        contents_of(&files, "posts/nested-relative-partials/index.hbs"),
        "test:parent,child,grandchild"
    );
    Ok(())
}

#[test]
fn test_global_partial_wins_over_local_with_same_name() -> Result<()> {
    let files = render_full_site()?;
    assert_eq!(
        contents_of(&files, "posts/local-partial-override/index.hbs"),
        "<h1>test:local-override</h1>"
    );
    Ok(())
}

#[test]
fn test_partial_files_are_not_rendered_or_kept() -> Result<()> {
    let files = render_full_site()?;
    for (path, _) in PARTIALS {
        assert!(!files.contains_key(*path), "partial {path} still present");
    }
    Ok(())
}

#[test]
fn test_local_partials_do_not_leak_into_sibling_dirs() {
    let mut files = SiteFixture::new()
        .file("a/partials/only-a.hbs", "A")
        .file("a/index.hbs", "{{> only-a}}")
        .file("b/index.hbs", "{{> only-a}}")
        .build();

    let mut plugin = HandlebarsX::default();
    let err = plugin.process(&mut files, &Build::new()).unwrap_err();

    assert!(matches!(err, PluginError::Render { .. }));
    assert_eq!(err.path(), Some("b/index.hbs"));
    assert_eq!(contents_of(&files, "a/index.hbs"), "A");
    assert!(!plugin.engine().has_template("only-a"));
}

#[test]
fn test_local_partial_prefix_respects_directory_boundary() {
    let mut files = SiteFixture::new()
        .file("a2/partials/shared.hbs", "from a2")
        .file("a/index.hbs", "{{> shared}}")
        .file("a2/index.hbs", "{{> shared}}")
        .build();

    let err = HandlebarsX::default().process(&mut files, &Build::new()).unwrap_err();

    // `a` must not pick up `a2/partials`
    assert_eq!(err.path(), Some("a/index.hbs"));
}

#[test]
fn test_same_local_name_in_two_dirs() -> Result<()> {
    let mut files = SiteFixture::new()
        .file("a/partials/item.hbs", "a-item")
        .file("b/partials/item.hbs", "b-item")
        .file("a/index.hbs", "{{> item}}")
        .file("b/index.hbs", "{{> item}}")
        .build();

    HandlebarsX::default().process(&mut files, &Build::new())?;

    assert_eq!(contents_of(&files, "a/index.hbs"), "a-item");
    assert_eq!(contents_of(&files, "b/index.hbs"), "b-item");
    Ok(())
}

#[test]
fn test_custom_partials_dir() -> Result<()> {
    let mut files = SiteFixture::new()
        .file("_includes/nav.hbs", "nav")
        .file("partials/plain.hbs", "{{> nav}}")
        .build();

    HandlebarsX::new(Options::default().partials("_includes")).process(&mut files, &Build::new())?;

    assert_eq!(contents_of(&files, "partials/plain.hbs"), "nav");
    assert!(!files.contains_key("_includes/nav.hbs"));
    Ok(())
}

#[test]
fn test_windows_separators() -> Result<()> {
    let mut files = SiteFixture::simple().with_windows_paths().build();

    HandlebarsX::default().process(&mut files, &Build::new())?;

    assert_eq!(contents_of(&files, r"posts\simple.hbs"), "<h1>test:simple</h1>");
    assert!(!files.contains_key(r"partials\simple.hbs"));
    Ok(())
}

#[test]
fn test_handlebars_extension() -> Result<()> {
    let mut files = SiteFixture::new()
        .file("partials/p.handlebars", "P")
        .file("index.handlebars", "{{> p}}")
        .build();

    HandlebarsX::default().process(&mut files, &Build::new())?;

    assert_eq!(contents_of(&files, "index.handlebars"), "P");
    Ok(())
}

#[test]
fn test_global_partials_do_not_carry_into_next_pass() -> Result<()> {
    let mut plugin = HandlebarsX::default();
    let mut first = SiteFixture::new()
        .file("partials/nav.hbs", "OLD GLOBAL")
        .file("index.hbs", "{{> nav}}")
        .build();
    plugin.process(&mut first, &Build::new())?;
    assert_eq!(contents_of(&first, "index.hbs"), "OLD GLOBAL");

    let site = SiteFixture::new()
        .file("posts/partials/nav.hbs", "LOCAL")
        .file("posts/a.hbs", "{{> nav}}")
        .file("b.hbs", "{{> nav}}");

    let mut files = site.clone().without("b.hbs").build();
    plugin.process(&mut files, &Build::new())?;
    assert_eq!(contents_of(&files, "posts/a.hbs"), "LOCAL");

    let mut files = site.without("posts/a.hbs").build();
    let err = plugin.process(&mut files, &Build::new()).unwrap_err();
    assert!(matches!(err, PluginError::Render { .. }), "got: {err}");
    assert_eq!(err.path(), Some("b.hbs"));
    assert_eq!(contents_of(&files, "b.hbs"), "{{> nav}}");
    Ok(())
}

#[test]
fn test_aborted_pass_leaves_no_partials_behind() {
    let mut plugin = HandlebarsX::default();
    let mut first = SiteFixture::new()
        .file("partials/nav.hbs", "first")
        .file("posts/partials/side.hbs", "side")
        .file("posts/index.hbs", "{{#if x}}")
        .build();
    let err = plugin.process(&mut first, &Build::new()).unwrap_err();
    assert_eq!(err.path(), Some("posts/index.hbs"));

    for name in ["nav", "side"] {
        let source = format!("{{{{> {name}}}}}");
        let mut files = SiteFixture::new().file("page.hbs", &source).build();
        let err = plugin.process(&mut files, &Build::new()).unwrap_err();
        assert!(matches!(err, PluginError::Render { .. }), "{name}: {err}");
    }
}

#[test]
fn test_full_site_renders_twice_on_one_plugin() -> Result<()> {
    let mut plugin = HandlebarsX::new(fixture_options());
    let mut first = SiteFixture::full().build();
    plugin.process(&mut first, &Build::new())?;

    let mut second = SiteFixture::full().without("partials/simple.hbs").build();
    let err = plugin.process(&mut second, &Build::new()).unwrap_err();

    assert_eq!(contents_of(&first, "posts/simple.hbs"), "<h1>test:simple</h1>");
    assert!(matches!(err, PluginError::Render { .. }), "got: {err}");
    assert_eq!(err.path(), Some("posts/simple.hbs"));
    assert_eq!(contents_of(&second, "posts/simple.hbs"), r#"{{> simple text="test:simple"}}"#);
    assert_eq!(contents_of(&second, "api-data.hbs"), "test:extra");
    Ok(())
}
