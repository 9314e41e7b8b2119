//! Template rendering against the shared engine.
//!
//! A parse failure is reported as [`PluginError::Compile`] and only
//! evaluation failures become [`PluginError::Render`]. In both cases the file
//! keeps its original contents.

use handlebars::{Handlebars, RenderError, RenderErrorReason, Template};
use serde_json::Value;

use crate::config::ContextFn;
use crate::core::{PluginError, Result};
use crate::files::{FileSet, Metadata};

/// Compiles and evaluates `source` against `context`.
///
/// `path` only labels errors.
///
/// # Errors
///
/// [`PluginError::Compile`] for malformed source, [`PluginError::Render`]
/// when evaluation fails (unknown partial, failing helper).
pub fn render_source(
    engine: &Handlebars<'_>,
    path: &str,
    source: &str,
    context: &Value,
) -> Result<String> {
    engine.render_template(source, context).map_err(|e| classify_error(path, source, e))
}

/// Splits engine failures into compile and render errors.
///
/// The engine wraps parse failures of `source` in a [`RenderError`] it does
/// not hand out by value, so the source is parsed again, on this path only,
/// to recover the owned diagnostic.
fn classify_error(path: &str, source: &str, err: RenderError) -> PluginError {
    if let RenderErrorReason::TemplateError(_) = err.reason() {
        if let Err(parse) = Template::compile(source) {
            return PluginError::compile(path, parse);
        }
    }
    PluginError::render(path, err)
}

/// Renders the entry at `path` in place.
///
/// The context is built by `context_fn` from the entry and the pass-global
/// metadata. Returns `false` when `path` is not in `files`.
///
/// # Errors
///
/// See [`render_source`]. The entry is left untouched on error.
pub fn render_file(
    engine: &Handlebars<'_>,
    files: &mut FileSet,
    path: &str,
    context_fn: &ContextFn,
    metadata: &Metadata,
) -> Result<bool> {
    let Some(entry) = files.get_mut(path) else {
        tracing::debug!("Skipping {}: no longer in the file set", path);
        return Ok(false);
    };

    tracing::debug!("Compiling {}", path);
    let context = context_fn(entry, metadata);
    let rendered = render_source(engine, path, &entry.contents_str(), &context)?;
    entry.set_contents(rendered);
    Ok(true)
}
