//! Partitioning of a file set into partials and templates.
//!
//! Given every path of the pass and the partials subdirectory name `P`:
//!
//! - *all partials*: paths matching `**/P/**/*.{hbs,handlebars}`
//! - *global partials*: the subset matching `P/**/*.{hbs,handlebars}`, i.e.
//!   under the top-level `P` directory
//! - *templates*: paths matching the configured patterns, with
//!   `!**/P/**/*.{hbs,handlebars}` appended so a partial is never rendered
//!   on its own
//!
//! Templates are grouped by containing directory. Groups come out in order of
//! first appearance and templates keep their order within a group.

use tracing::debug;

use crate::core::Result;
use crate::files::{dirname, join, normalize_path, split_extension};

/// Brace group of the recognized template file extensions.
pub const TEMPLATE_EXTENSION_GLOB: &str = "{hbs,handlebars}";

/// Templates sharing one directory, rendered with that directory's local
/// partials registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateGroup {
    /// Normalized directory, `""` at the root.
    pub dir: String,
    /// File set keys of the templates, in discovery order.
    pub templates: Vec<String>,
}

impl TemplateGroup {
    /// Normalized path of this directory's local partials directory.
    pub fn local_partials_dir(&self, partials_dir: &str) -> String {
        join(&self.dir, partials_dir)
    }
}

/// Result of classifying one pass's paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Every partial file, global or local.
    pub all_partials: Vec<String>,
    /// Partial files under the top-level partials directory.
    pub global_partials: Vec<String>,
    /// Renderable templates grouped by directory.
    pub groups: Vec<TemplateGroup>,
}

impl Classification {
    /// Total number of templates across all groups.
    pub fn template_count(&self) -> usize {
        self.groups.iter().map(|g| g.templates.len()).sum()
    }

    /// Partials living under `local_dir` (a normalized directory path).
    pub fn partials_under<'a>(&'a self, local_dir: &'a str) -> impl Iterator<Item = &'a String> {
        self.all_partials
            .iter()
            .filter(move |p| normalize_path(p).starts_with(&format!("{local_dir}/")))
    }
}

/// Classifies `paths`.
///
/// `matcher` is the host's glob matcher: it receives patterns and candidate
/// paths and returns the matching candidates in candidate order.
///
/// # Errors
///
/// Propagates pattern errors from `matcher`.
pub fn classify<M>(
    paths: &[String],
    partials_dir: &str,
    patterns: &[String],
    matcher: M,
) -> Result<Classification>
where
    M: Fn(&[String], &[String]) -> Result<Vec<String>>,
{
    let partials_dir = normalize_path(partials_dir);
    let any_level = format!("**/{partials_dir}/**/*.{TEMPLATE_EXTENSION_GLOB}");
    let root_level = format!("{partials_dir}/**/*.{TEMPLATE_EXTENSION_GLOB}");

    let all_partials = matcher(std::slice::from_ref(&any_level), paths)?;
    let global_partials = matcher(&[root_level], &all_partials)?;

    let mut template_patterns = patterns.to_vec();
    template_patterns.push(format!("!{any_level}"));
    let templates = matcher(&template_patterns, paths)?;

    let classification = Classification {
        all_partials,
        global_partials,
        groups: group_by_dir(templates),
    };

    debug!(
        "Classified {} paths: {} partials ({} global), {} templates in {} directories",
        paths.len(),
        classification.all_partials.len(),
        classification.global_partials.len(),
        classification.template_count(),
        classification.groups.len()
    );

    Ok(classification)
}

fn group_by_dir(templates: Vec<String>) -> Vec<TemplateGroup> {
    let mut groups: Vec<TemplateGroup> = Vec::new();
    for path in templates {
        let dir = dirname(&normalize_path(&path)).to_string();
        match groups.iter_mut().find(|g| g.dir == dir) {
            Some(group) => group.templates.push(path),
            None => groups.push(TemplateGroup {
                dir,
                templates: vec![path],
            }),
        }
    }
    groups
}

/// Derives the partial name of `partial_path` relative to `partials_dir`:
/// the directory prefix and the extension are removed and separators are
/// normalized, so `posts/partials/nested/child.hbs` relative to
/// `posts/partials` is `nested/child`.
pub fn partial_name(partials_dir: &str, partial_path: &str) -> String {
    let dir = normalize_path(partials_dir);
    let path = normalize_path(partial_path);
    let relative = path
        .strip_prefix(&dir)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(&path);
    split_extension(relative).0.to_string()
}
