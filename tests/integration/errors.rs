//! Compile and render failures.

use handlebars::Template;
use handlebars_x::prelude::*;
use handlebars_x::test_utils::{SiteFixture, contents_of};

const BROKEN: &str = "{{#if title}}oops{{/each}}";

#[test]
fn test_compile_error_message_starts_with_parser_diagnostic() {
    let diagnostic = Template::compile(BROKEN).unwrap_err().to_string();
    let mut files = SiteFixture::new().file("posts/error.hbs", BROKEN).build();

    let err = super::run(HandlebarsX::default(), &mut files).unwrap_err();

    assert!(matches!(err, PluginError::Compile { .. }));
    let message = err.to_string();
    assert!(message.starts_with(&diagnostic), "got: {message}");
    assert!(message.contains("posts/error.hbs"));
    assert_eq!(contents_of(&files, "posts/error.hbs"), BROKEN);
}

#[test]
fn test_error_aborts_pass() {
    let mut files = SiteFixture::new()
        .file("a.hbs", "{{x}}")
        .file("posts/error.hbs", BROKEN)
        .file("posts/later.hbs", "{{x}}")
        .file("posts/partials/local.hbs", "L")
        .build();
    let build = Build::new().with_metadata("x", "rendered");
    let mut plugin = HandlebarsX::default();

    let err = plugin.process(&mut files, &build).unwrap_err();

    assert_eq!(err.path(), Some("posts/error.hbs"));
    assert_eq!(contents_of(&files, "a.hbs"), "rendered");
    assert_eq!(contents_of(&files, "posts/later.hbs"), "{{x}}");
    // no purge after an aborted pass, but the local scope is released
    assert!(files.contains_key("posts/partials/local.hbs"));
    assert!(!plugin.engine().has_template("local"));
}

#[test]
fn test_malformed_global_partial_names_its_path() {
    let mut files = SiteFixture::new()
        .file("partials/broken.hbs", "{{#if x}}")
        .file("index.hbs", "ok")
        .build();

    let err = super::run(HandlebarsX::default(), &mut files).unwrap_err();

    assert!(matches!(err, PluginError::Compile { .. }));
    assert_eq!(err.path(), Some("partials/broken.hbs"));
    assert_eq!(contents_of(&files, "index.hbs"), "ok");
}

#[test]
fn test_unknown_helper_in_strict_engine_is_render_error() {
    let mut engine = handlebars::Handlebars::new();
    engine.set_strict_mode(true);
    let mut files = SiteFixture::new().file("a.hbs", "{{missing}}").build();

    let err = super::run(HandlebarsX::new(Options::default().instance(engine)), &mut files)
        .unwrap_err();

    assert!(matches!(err, PluginError::Render { .. }));
    assert_eq!(contents_of(&files, "a.hbs"), "{{missing}}");
}

#[test]
fn test_pass_can_be_rerun_after_fixing_the_error() {
    let mut plugin = HandlebarsX::default();
    let mut files = SiteFixture::new()
        .file("posts/partials/p.hbs", "P")
        .file("posts/index.hbs", BROKEN)
        .build();
    assert!(plugin.process(&mut files, &Build::new()).is_err());

    files.insert("posts/index.hbs".into(), FileEntry::new("{{> p}}"));
    plugin.process(&mut files, &Build::new()).unwrap();

    assert_eq!(contents_of(&files, "posts/index.hbs"), "P");
}

#[test]
fn test_failed_global_registration_leaves_nothing_registered() {
    let mut plugin = HandlebarsX::default();
    let mut files = SiteFixture::new()
        .file("partials/header.hbs", "H")
        .file("partials/zbroken.hbs", "{{#if x}}")
        .file("index.hbs", "{{> header}}")
        .build();
    let err = plugin.process(&mut files, &Build::new()).unwrap_err();
    assert_eq!(err.path(), Some("partials/zbroken.hbs"));

    let mut files = SiteFixture::new().file("index.hbs", "{{> header}}").build();
    let err = plugin.process(&mut files, &Build::new()).unwrap_err();

    assert!(matches!(err, PluginError::Render { .. }), "got: {err}");
    assert!(!plugin.engine().has_template("header"));
}
