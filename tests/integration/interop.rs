//! Chaining with other build steps.
//!
//! With `layout = false` the partial sources stay in the file set so a later
//! step can pick them up, e.g. a separate layout plugin.

use anyhow::Result;
use handlebars::Handlebars;
use handlebars_x::prelude::*;
use handlebars_x::test_utils::{SiteFixture, contents_of};
use serde_json::json;

/// A minimal downstream layout step: wraps every `.hbs` output in
/// `partials/<layout>.hbs`, read from the file set itself.
fn layouts_step(files: &mut FileSet, build: &Build) -> Result<(), PluginError> {
    let engine = Handlebars::new();
    let paths: Vec<String> = files.keys().cloned().collect();
    let targets = build.match_paths(&["**/*.hbs".into(), "!partials/**".into()], &paths)?;

    for path in targets {
        let Some(layout) = files[&path].layout().map(str::to_string) else {
            continue;
        };
        let layout_path = format!("partials/{layout}.hbs");
        let Some(source) = files.get(&layout_path).map(FileEntry::contents_str) else {
            continue;
        };
        let context = json!({ "contents": files[&path].contents_str() });
        let wrapped = engine
            .render_template(&source, &context)
            .map_err(|e| handlebars_x::pipeline::plugin_error("layouts", e))?;
        if let Some(entry) = files.get_mut(&path) {
            entry.set_contents(wrapped);
        }
    }
    Ok(())
}

#[test]
fn test_partials_visible_to_later_layout_step() -> Result<()> {
    let mut files = SiteFixture::new()
        .file("partials/test.hbs", "{{{contents}}}layout included")
        .entry("test.hbs", FileEntry::new("test:").with("layout", "test"))
        .entry("posts/test.hbs", FileEntry::new("{{#if true}}test:{{/if}}").with("layout", "test"))
        .build();

    let mut plugins: Vec<Box<dyn Plugin>> = vec![
        Box::new(HandlebarsX::new(Options::default().layout(false).pattern("**/*.hbs"))),
        Box::new(layouts_step),
    ];
    Build::new().process(&mut files, &mut plugins)?;

    assert_eq!(contents_of(&files, "test.hbs"), "test:layout included");
    assert_eq!(contents_of(&files, "posts/test.hbs"), "test:layout included");
    assert!(files.contains_key("partials/test.hbs"));
    Ok(())
}

#[test]
fn test_later_steps_skipped_after_compile_error() {
    let mut files = SiteFixture::new().file("bad.hbs", "{{#if x}}").build();
    let marker = |files: &mut FileSet, _: &Build| -> Result<(), PluginError> {
        files.insert("marker".into(), FileEntry::new(""));
        Ok(())
    };

    let mut plugins: Vec<Box<dyn Plugin>> =
        vec![Box::new(HandlebarsX::default()), Box::new(marker)];
    let err = Build::new().process(&mut files, &mut plugins).unwrap_err();

    assert!(matches!(err, PluginError::Compile { .. }));
    assert!(!files.contains_key("marker"));
}

#[test]
fn test_plugin_from_toml_config() -> Result<()> {
    let config = PluginConfig::from_toml_str(
        r#"
pattern = ["pages/**/*.hbs", "!pages/drafts/**"]
partials = "_includes"
layout = true
"#,
    )?;
    let mut files = SiteFixture::new()
        .file("_includes/sig.hbs", "-- {{author}}")
        .file("pages/about.hbs", "about {{> sig}}")
        .file("pages/drafts/wip.hbs", "{{> sig}}")
        .file("notes.hbs", "{{untouched}}")
        .build();
    let build = Build::new().with_metadata("author", "me");

    HandlebarsX::new(config.into()).process(&mut files, &build)?;

    assert_eq!(contents_of(&files, "pages/about.hbs"), "about -- me");
    assert_eq!(contents_of(&files, "pages/drafts/wip.hbs"), "{{> sig}}");
    assert_eq!(contents_of(&files, "notes.hbs"), "{{untouched}}");
    assert!(!files.contains_key("_includes/sig.hbs"));
    Ok(())
}

#[test]
fn test_plugin_name() {
    assert_eq!(HandlebarsX::default().name(), "handlebars-x");
}
