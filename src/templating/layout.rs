//! Layout wrapping and output renaming.
//!
//! Both run per template right after it has been rendered. A layout is a
//! registered partial named by the file's `layout` field; wrapping renders
//! `{{> layout}}` against a fresh context, so the layout sees the rendered
//! body as `contents`. Renaming moves the entry to a new key according to
//! the [`RenameExtension`] policy and does not depend on the layout flag.

use handlebars::Handlebars;
use tracing::{debug, warn};

use super::renderer::render_source;
use crate::config::{ContextFn, RenameExtension};
use crate::core::Result;
use crate::files::{FileSet, Metadata, split_extension};

/// Suffixes stripped from a declared layout before lookup.
pub const TEMPLATE_EXTENSIONS: &[&str] = &[".hbs", ".handlebars"];

/// What happened when a file's layout was looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutOutcome {
    /// The file declares no layout.
    NotDeclared,
    /// The contents were wrapped in the named layout.
    Applied(String),
    /// The named layout is not registered; contents are unchanged.
    Missing(String),
}

/// Partial name for a declared layout: `default.hbs` and `default` both
/// resolve to `default`.
pub fn layout_name(declared: &str) -> &str {
    TEMPLATE_EXTENSIONS
        .iter()
        .find_map(|ext| declared.strip_suffix(ext))
        .filter(|name| !name.is_empty())
        .unwrap_or(declared)
}

/// Wraps the entry at `path` in its declared layout.
///
/// # Errors
///
/// Compile or render errors from the layout itself. The entry keeps its
/// body-only output on error.
pub fn apply_layout(
    engine: &Handlebars<'_>,
    files: &mut FileSet,
    path: &str,
    context_fn: &ContextFn,
    metadata: &Metadata,
) -> Result<LayoutOutcome> {
    let Some(entry) = files.get_mut(path) else {
        return Ok(LayoutOutcome::NotDeclared);
    };
    let Some(declared) = entry.layout() else {
        return Ok(LayoutOutcome::NotDeclared);
    };

    let name = layout_name(declared).to_string();
    if !engine.has_template(&name) {
        warn!("Handlebars layout '{}' specified in '{}' not found", declared, path);
        return Ok(LayoutOutcome::Missing(name));
    }

    let wrapper = format!("{{{{> {name}}}}}");
    let context = context_fn(entry, metadata);
    let rendered = render_source(engine, path, &wrapper, &context)?;
    entry.set_contents(rendered);
    debug!("Applied layout '{}' to {}", name, path);
    Ok(LayoutOutcome::Applied(name))
}

/// The key `path` moves to under `policy`, or `None` when it stays put.
///
/// A path without an extension gets the replacement appended.
pub fn renamed_path(path: &str, policy: &RenameExtension) -> Option<String> {
    let (stem, _) = split_extension(path);
    let target = match policy {
        RenameExtension::Keep => return None,
        RenameExtension::Strip => stem.to_string(),
        RenameExtension::Replace(ext) => format!("{stem}{ext}"),
    };
    (target != path).then_some(target)
}

/// Moves the entry at `path` to its renamed key, replacing any entry
/// already stored there. Returns the new key.
pub fn rename_entry(files: &mut FileSet, path: &str, policy: &RenameExtension) -> Option<String> {
    let target = renamed_path(path, policy)?;
    let entry = files.remove(path)?;
    debug!("Renaming '{}' to '{}'", path, target);
    if files.insert(target.clone(), entry).is_some() {
        debug!("Rename of '{}' replaced an existing entry", path);
    }
    Some(target)
}
