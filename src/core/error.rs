//! Error handling for the handlebars build step
//!
//! Every failure the plugin can report to its host is a variant of
//! [`PluginError`]. The taxonomy follows the stages of a pass:
//!
//! - **Template compilation**: [`PluginError::Compile`] wraps the engine's
//!   parse diagnostic for a template, a partial or a layout wrapper.
//! - **Template evaluation**: [`PluginError::Render`] wraps a runtime failure
//!   (a helper returning an error, a missing partial invoked from a template).
//! - **Configuration misuse**: [`PluginError::Pattern`] and [`PluginError::Config`]
//!   surface at the first point the bad value is used.
//! - **Host plumbing**: [`PluginError::FrontMatter`] and [`PluginError::Plugin`]
//!   come from the pipeline side rather than from rendering.
//!
//! A missing layout is deliberately absent from this list: it is recovered
//! locally and reported as a [`PassWarning`](crate::templating::PassWarning).
//!
//! # Message format
//!
//! Compile and render errors print the engine diagnostic first and the
//! offending path last, so a host that only shows the first line of an error
//! still shows what the engine said:
//!
//! ```text
//! Template error: mismatching closing helper: if vs each ... (in 'posts/error.hbs')
//! ```

use thiserror::Error;

/// The error type returned by every fallible operation in this crate.
#[derive(Error, Debug)]
pub enum PluginError {
    /// A template, partial or layout wrapper failed to parse.
    ///
    /// # Fields
    /// - `path`: The file (or synthetic layout name) whose source failed to compile
    /// - `source`: The engine diagnostic
    #[error("{source} (in '{path}')")]
    Compile {
        /// Path of the file that failed to compile
        path: String,
        /// Parse diagnostic from the engine
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    /// A compiled template failed while being evaluated against its context.
    #[error("{source} (in '{path}')")]
    Render {
        /// Path of the file being rendered
        path: String,
        /// Runtime diagnostic from the engine
        #[source]
        source: Box<handlebars::RenderError>,
    },

    /// A glob pattern could not be compiled.
    #[error("Invalid glob pattern '{pattern}': {message}")]
    Pattern {
        /// The offending pattern as written by the user
        pattern: String,
        /// Why the glob compiler rejected it
        message: String,
    },

    /// Plugin configuration could not be parsed or is inconsistent.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
    },

    /// A file's front matter block is not valid YAML.
    #[error("Invalid front matter: {message}")]
    FrontMatter {
        /// Parser message
        message: String,
    },

    /// A step in the host pipeline failed for a reason outside this crate.
    #[error("Plugin '{name}' failed: {source}")]
    Plugin {
        /// Name of the failing plugin
        name: String,
        /// Underlying failure
        #[source]
        source: anyhow::Error,
    },
}

impl PluginError {
    /// Builds a [`PluginError::Compile`] for `path`.
    pub fn compile(path: impl Into<String>, source: handlebars::TemplateError) -> Self {
        Self::Compile {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Builds a [`PluginError::Render`] for `path`.
    pub fn render(path: impl Into<String>, source: handlebars::RenderError) -> Self {
        Self::Render {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Path of the file the error is about, for compile and render failures.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Compile {
                path,
                ..
            }
            | Self::Render {
                path,
                ..
            } => Some(path),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for PluginError {
    fn from(error: toml::de::Error) -> Self {
        Self::Config {
            message: error.to_string(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = PluginError> = std::result::Result<T, E>;
