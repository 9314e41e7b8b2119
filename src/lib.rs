//! handlebars-x - Handlebars templates for in-memory static site builds
//!
//! A build step that renders every Handlebars template of an in-memory file
//! set with one shared engine, resolving partials by directory, wrapping
//! rendered pages in layouts and renaming output extensions.
//!
//! # Architecture Overview
//!
//! The host hands over a [`FileSet`](files::FileSet) (path to bytes plus
//! metadata) and a [`Build`](pipeline::Build) (global metadata and glob
//! matching). The [`HandlebarsX`](templating::HandlebarsX) plugin mutates the
//! file set in place:
//!
//! - files under a `partials/` directory become partials: global when the
//!   directory is at the root, local to their parent directory otherwise
//! - every other matching file is rendered and replaced by its output
//! - a `layout` metadata field wraps the output in the named partial
//! - extensions are kept, stripped or replaced according to the options
//! - partial files are removed from the set unless layout processing is off
//!
//! ## Key Features
//!
//! - **Scoped partials**: local partials are registered only while their
//!   directory renders and are removed again on every exit path
//! - **Global precedence**: a root partial is never shadowed by a local one
//! - **Helpers**: built-in `call` and `set`, plus user helpers
//! - **Configuration**: builder API or a TOML document
//! - **Cross-platform paths**: `\` separators are normalized for matching
//!
//! # Core Modules
//!
//! - [`config`] - Plugin options, rename policy, TOML configuration
//! - [`core`] - Error taxonomy and result alias
//! - [`files`] - File entries, file sets, front matter loading
//! - [`pattern`] - Glob matching with brace expansion and negation
//! - [`pipeline`] - Host-side plugin chaining and global metadata
//! - [`templating`] - Classification, partial scoping, rendering, layouts
//!
//! # Example
//!
//! ```rust
//! use handlebars_x::prelude::*;
//!
//! let mut files = FileSet::new();
//! files.insert("partials/greeting.hbs".into(), FileEntry::new("Hello {{name}}"));
//! files.insert("index.hbs".into(), FileEntry::new("{{> greeting}}!").with("name", "world"));
//!
//! let mut plugin = HandlebarsX::new(Options::default());
//! plugin.process(&mut files, &Build::new()).unwrap();
//!
//! assert_eq!(files["index.hbs"].contents_str(), "Hello world!");
//! assert_eq!(files.len(), 1);
//! ```

pub mod config;
pub mod core;
pub mod files;
pub mod pattern;
pub mod pipeline;
pub mod templating;

// Test utilities (only compiled in test mode or with test-utils feature)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

/// The types most build scripts need.
pub mod prelude {
    pub use crate::config::{Options, PluginConfig, RenameExtension};
    pub use crate::core::{PluginError, Result};
    pub use crate::files::{FileEntry, FileSet, Metadata};
    pub use crate::pipeline::{Build, Plugin};
    pub use crate::templating::{HandlebarsX, PassReport, PassWarning};
}
