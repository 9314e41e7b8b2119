//! Handlebars rendering for in-memory build passes.
//!
//! [`HandlebarsX`] is a build step that renders every template file of a
//! [`FileSet`] with one shared [`Handlebars`] engine.
//!
//! # Overview
//!
//! One pass runs these stages in order:
//!
//! 1. **Classification** ([`classify`]): paths are split into partials and
//!    templates. Anything under a partials directory (`partials` by default,
//!    at any depth) is a partial and is never rendered on its own.
//! 2. **Global partials** ([`GlobalPartials`](partials::GlobalPartials)):
//!    partials under the top-level partials directory are registered for
//!    the whole pass and unregistered when it ends, whether it succeeds or
//!    fails.
//! 3. **Per-directory rendering**: templates are grouped by directory. For
//!    each group, partials under `<dir>/partials/` are registered through a
//!    [`LocalPartials`](partials::LocalPartials) guard, every template is
//!    rendered ([`renderer`]), wrapped in its layout and renamed
//!    ([`layout`]), then the guard drops and the local partials are gone.
//! 4. **Purge**: with layout processing enabled, every partial entry is
//!    removed from the file set. With it disabled they stay, so a later step
//!    can discover them.
//!
//! # Partial names
//!
//! A partial's name is its path relative to the partials directory it lives
//! in, without extension: `partials/layouts/default.hbs` is
//! `layouts/default`, and `posts/partials/nav.hbs` is `nav` while the `posts`
//! templates render. When a local partial has the same name as a global one
//! the global partial is used. Partials read from one pass's file set are
//! never visible to the next pass.
//!
//! # Errors
//!
//! The first compile or render error ends the pass. Files rendered before it
//! keep their output, the failing file keeps its source and later files are
//! untouched. A declared layout that is not registered is only a
//! [`PassWarning`].
//!
//! # Example
//!
//! ```rust
//! use handlebars_x::config::{Options, RenameExtension};
//! use handlebars_x::files::{FileEntry, FileSet};
//! use handlebars_x::pipeline::Build;
//! use handlebars_x::templating::HandlebarsX;
//!
//! let mut files = FileSet::new();
//! files.insert("partials/page.hbs".into(), FileEntry::new("<main>{{{contents}}}</main>"));
//! files.insert("index.hbs".into(), FileEntry::new("Hello {{name}}").with("name", "you").with("layout", "page"));
//!
//! let mut plugin = HandlebarsX::new(Options::default().rename_extension(RenameExtension::Replace(".html".into())));
//! let report = plugin.process(&mut files, &Build::new()).unwrap();
//!
//! assert_eq!(files["index.html"].contents_str(), "<main>Hello you</main>");
//! assert!(!files.contains_key("partials/page.hbs"));
//! assert_eq!(report.rendered, ["index.hbs"]);
//! ```

pub mod classify;
pub mod helpers;
pub mod layout;
pub mod partials;
pub mod renderer;

use std::fmt;

use handlebars::Handlebars;
use tracing::{debug, info};

use self::classify::classify;
use self::helpers::{FunctionRegistry, register_builtin_helpers};
use self::layout::{LayoutOutcome, apply_layout, rename_entry};
use self::partials::GlobalPartials;
use self::renderer::render_file;
use crate::config::{ContextFn, Options, RenameExtension};
use crate::core::Result;
use crate::files::FileSet;
use crate::pipeline::{Build, Plugin};

/// Something that went wrong during a pass without failing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassWarning {
    /// A file names a layout that is not a registered partial.
    MissingLayout {
        /// The file declaring the layout
        path: String,
        /// The layout name as looked up
        layout: String,
    },
}

impl fmt::Display for PassWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLayout {
                path,
                layout,
            } => write!(f, "layout '{layout}' specified in '{path}' not found"),
        }
    }
}

/// Summary of one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Templates rendered, in render order, under their original keys.
    pub rendered: Vec<String>,
    /// `(from, to)` key moves made by the rename policy.
    pub renamed: Vec<(String, String)>,
    /// Partial entries removed at pass end.
    pub removed_partials: Vec<String>,
    /// Non-fatal problems.
    pub warnings: Vec<PassWarning>,
}

/// The parts of [`Options`] read on every pass.
struct Settings {
    patterns: Vec<String>,
    partials: String,
    layout: bool,
    context: ContextFn,
    rename_extension: RenameExtension,
}

/// The handlebars build step.
pub struct HandlebarsX {
    engine: Handlebars<'static>,
    settings: Settings,
}

impl HandlebarsX {
    /// Creates the plugin, taking over `options.instance` or a fresh engine.
    ///
    /// The built-in `call` and `set` helpers are registered first, then the
    /// user helpers, so a user helper with the same name replaces a
    /// built-in.
    pub fn new(options: Options) -> Self {
        let Options {
            patterns,
            partials,
            helpers,
            functions,
            instance,
            layout,
            context,
            rename_extension,
        } = options;

        let mut engine = instance.unwrap_or_default();
        register_builtin_helpers(&mut engine, FunctionRegistry::new(functions));
        for (name, helper) in helpers {
            debug!("Registering helper '{}'", name);
            engine.register_helper(&name, helper);
        }

        Self {
            engine,
            settings: Settings {
                patterns,
                partials,
                layout,
                context,
                rename_extension,
            },
        }
    }

    /// The shared engine. Between passes it holds only the helpers and
    /// whatever the supplied instance carried.
    pub fn engine(&self) -> &Handlebars<'static> {
        &self.engine
    }

    /// Mutable access to the shared engine, e.g. to register more partials.
    pub fn engine_mut(&mut self) -> &mut Handlebars<'static> {
        &mut self.engine
    }

    /// Runs one pass over `files`.
    ///
    /// # Errors
    ///
    /// - [`PluginError::Pattern`](crate::core::PluginError::Pattern) for an
    ///   invalid configured glob
    /// - [`PluginError::Compile`](crate::core::PluginError::Compile) for a
    ///   malformed template, partial or layout
    /// - [`PluginError::Render`](crate::core::PluginError::Render) when
    ///   evaluation fails
    pub fn process(&mut self, files: &mut FileSet, build: &Build) -> Result<PassReport> {
        let settings = &self.settings;
        let paths: Vec<String> = files.keys().cloned().collect();
        let classification = classify(&paths, &settings.partials, &settings.patterns, |p, c| {
            build.match_paths(p, c)
        })?;

        let mut globals = GlobalPartials::register(
            &mut self.engine,
            files,
            &classification.global_partials,
            &settings.partials,
        )?;
        debug!("Global partials: {:?}", globals.names());

        let mut report = PassReport::default();
        for group in &classification.groups {
            let local_dir = group.local_partials_dir(&settings.partials);
            let scope =
                globals.local(files, classification.partials_under(&local_dir), &local_dir)?;
            debug!("Rendering '{}' with local partials {:?}", group.dir, scope.names());

            for path in &group.templates {
                if !render_file(scope.engine(), files, path, &settings.context, build.metadata())? {
                    continue;
                }
                report.rendered.push(path.clone());

                if settings.layout {
                    let outcome = apply_layout(
                        scope.engine(),
                        files,
                        path,
                        &settings.context,
                        build.metadata(),
                    )?;
                    if let LayoutOutcome::Missing(layout) = outcome {
                        report.warnings.push(PassWarning::MissingLayout {
                            path: path.clone(),
                            layout,
                        });
                    }
                }

                if let Some(target) = rename_entry(files, path, &settings.rename_extension) {
                    report.renamed.push((path.clone(), target));
                }
            }
        }
        drop(globals);

        if settings.layout {
            for path in &classification.all_partials {
                if files.remove(path).is_some() {
                    report.removed_partials.push(path.clone());
                }
            }
        }

        info!(
            "Rendered {} template(s), renamed {}, removed {} partial(s), {} warning(s)",
            report.rendered.len(),
            report.renamed.len(),
            report.removed_partials.len(),
            report.warnings.len()
        );
        Ok(report)
    }
}

impl fmt::Debug for HandlebarsX {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlebarsX")
            .field("patterns", &self.settings.patterns)
            .field("partials", &self.settings.partials)
            .field("layout", &self.settings.layout)
            .field("rename_extension", &self.settings.rename_extension)
            .finish_non_exhaustive()
    }
}

impl Default for HandlebarsX {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Plugin for HandlebarsX {
    fn name(&self) -> &str {
        "handlebars-x"
    }

    fn run(&mut self, files: &mut FileSet, build: &Build) -> Result<()> {
        let report = self.process(files, build)?;
        for warning in &report.warnings {
            debug!("Pass warning: {}", warning);
        }
        Ok(())
    }
}
