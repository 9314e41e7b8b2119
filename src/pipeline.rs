//! The build host side of a pass.
//!
//! A [`Build`] owns the pass-global metadata and provides the glob matcher
//! plugins use to select files. Plugins are chained with
//! [`Build::process`]: each one mutates the shared [`FileSet`] in turn, and
//! the first error stops the chain and is handed back to the caller.
//!
//! ```rust
//! use handlebars_x::files::{FileEntry, FileSet};
//! use handlebars_x::pipeline::{Build, Plugin};
//! use handlebars_x::templating::HandlebarsX;
//!
//! let mut files = FileSet::new();
//! files.insert("a.hbs".into(), FileEntry::new("{{site}}"));
//!
//! let build = Build::new().with_metadata("site", "example.org");
//! let mut plugins: Vec<Box<dyn Plugin>> = vec![Box::new(HandlebarsX::default())];
//! build.process(&mut files, &mut plugins).unwrap();
//!
//! assert_eq!(files["a.hbs"].contents_str(), "example.org");
//! ```

use serde_json::Value;
use tracing::{debug, error};

use crate::core::{PluginError, Result};
use crate::files::{FileSet, Metadata};
use crate::pattern;

/// One step of a build.
pub trait Plugin {
    /// Name used in logs and wrapped errors.
    fn name(&self) -> &str;

    /// Transforms `files` in place.
    ///
    /// # Errors
    ///
    /// Any error aborts the remaining chain.
    fn run(&mut self, files: &mut FileSet, build: &Build) -> Result<()>;
}

impl<F> Plugin for F
where
    F: FnMut(&mut FileSet, &Build) -> Result<()>,
{
    fn name(&self) -> &str {
        "closure"
    }

    fn run(&mut self, files: &mut FileSet, build: &Build) -> Result<()> {
        self(files, build)
    }
}

/// Pass-global state shared by every plugin of a build.
#[derive(Debug, Clone, Default)]
pub struct Build {
    metadata: Metadata,
}

impl Build {
    /// A build with empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a global metadata field, builder style.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The global metadata store.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Mutable access to the global metadata store.
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Selects the `candidates` matched by `patterns`, keeping their order.
    ///
    /// See [`pattern::match_paths`] for the pattern syntax.
    ///
    /// # Errors
    ///
    /// [`PluginError::Pattern`] for an invalid glob.
    pub fn match_paths(&self, patterns: &[String], candidates: &[String]) -> Result<Vec<String>> {
        pattern::match_paths(patterns, candidates)
    }

    /// Runs `plugins` over `files` in order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// The first plugin error, unchanged.
    pub fn process(&self, files: &mut FileSet, plugins: &mut [Box<dyn Plugin>]) -> Result<()> {
        for plugin in plugins.iter_mut() {
            debug!("Running plugin '{}' over {} file(s)", plugin.name(), files.len());
            if let Err(e) = plugin.run(files, self) {
                error!("Plugin '{}' failed: {}", plugin.name(), e);
                return Err(e);
            }
        }
        Ok(())
    }
}

/// Wraps a foreign failure as a [`PluginError::Plugin`] attributed to `name`.
pub fn plugin_error(name: impl Into<String>, source: impl Into<anyhow::Error>) -> PluginError {
    PluginError::Plugin {
        name: name.into(),
        source: source.into(),
    }
}
