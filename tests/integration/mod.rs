//! Integration test suite for handlebars-x
//!
//! These tests drive whole passes through a [`Build`], the way a host runs
//! the plugin, and check the resulting file sets.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **partials**: global, local, nested and inline partials; precedence
//! - **layout**: layout wrapping, missing layouts, partial purging
//! - **rename**: extension rename policies
//! - **errors**: compile and render failures, abort semantics
//! - **helpers**: built-in and user helpers
//! - **context**: context functions, metadata merging, idempotence
//! - **interop**: `layout = false` chaining with later plugins, TOML config

use handlebars::{
    Context, Handlebars, Helper, HelperResult, Output, RenderContext, handlebars_helper,
};
use handlebars_x::prelude::*;
use serde_json::{Value, json};

mod errors;
mod interop;
mod partials;

handlebars_helper!(prefix: |value: str, pre: str| format!("{pre}{value}"));

/// A helper registered directly on a caller-supplied engine.
fn instance_helper(
    _: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    out.write("instance")?;
    Ok(())
}

/// Context used by the fixture site: a default `extraProperty`, then global
/// metadata, then the file.
pub fn fixture_context(file: &FileEntry, metadata: &Metadata) -> Value {
    let mut context = json!({ "extraProperty": "extra" });
    if let Value::Object(map) = &mut context {
        map.extend(metadata.clone());
        map.extend(file.to_context_value());
    }
    context
}

/// Options used by the full fixture runs: a preconfigured instance carrying
/// `instancehelper`, a `prefix` option helper and [`fixture_context`].
pub fn fixture_options() -> Options {
    let mut engine = Handlebars::new();
    engine.register_helper("instancehelper", Box::new(instance_helper));

    Options::default()
        .instance(engine)
        .layout(true)
        .helper("prefix", Box::new(prefix))
        .context(fixture_context)
}

/// Runs one plugin over `files` through a fresh build.
pub fn run(plugin: HandlebarsX, files: &mut FileSet) -> Result<()> {
    let mut plugins: Vec<Box<dyn Plugin>> = vec![Box::new(plugin)];
    Build::new().process(files, &mut plugins)
}
