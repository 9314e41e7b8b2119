//! Plugin configuration.
//!
//! [`Options`] is the full, immutable option record a
//! [`HandlebarsX`](crate::templating::HandlebarsX) plugin is built from. It is
//! assembled with a consuming builder; every field has a default, so
//! `Options::default()` is a working configuration:
//!
//! | option | default | effect |
//! |---|---|---|
//! | `pattern` | `**/*.{hbs,handlebars}` | globs selecting template candidates |
//! | `partials` | `partials` | name of the partials subdirectory, at any level |
//! | `helper` | none | extra engine helpers, registered after the built-ins |
//! | `function` | none | callables reachable from the `call` helper |
//! | `instance` | fresh engine | a preconfigured engine to use and mutate |
//! | `layout` | `true` | layout wrapping and purging of partial files |
//! | `context` | metadata merge | `(file, metadata) -> context` |
//! | `rename_extension` | keep | output extension policy |
//!
//! The serializable part of the record can also come from a TOML document
//! through [`PluginConfig`]:
//!
//! ```rust
//! use handlebars_x::config::{Options, PluginConfig, RenameExtension};
//!
//! let config = PluginConfig::from_toml_str(r#"
//! pattern = ["pages/**/*.hbs"]
//! partials = "_includes"
//! rename-extension = ".html"
//! "#).unwrap();
//!
//! let options = Options::from(config);
//! assert_eq!(options.patterns_list(), ["pages/**/*.hbs"]);
//! assert_eq!(options.partials_dir(), "_includes");
//! assert_eq!(options.rename_policy(), &RenameExtension::Replace(".html".to_string()));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use handlebars::{Handlebars, HelperDef};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::core::Result;
use crate::files::{FileEntry, Metadata};
use crate::templating::helpers::Callable;

/// Default glob selecting template files.
pub const DEFAULT_PATTERN: &str = "**/*.{hbs,handlebars}";

/// Default name of the partials subdirectory.
pub const DEFAULT_PARTIALS_DIR: &str = "partials";

/// Builds the context object a template is evaluated against.
///
/// Receives the file entry and the pass-global metadata, in that order.
pub type ContextFn = Arc<dyn Fn(&FileEntry, &Metadata) -> Value + Send + Sync>;

/// What happens to a rendered file's extension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RenameExtension {
    /// Leave the path untouched.
    #[default]
    Keep,
    /// Drop the extension: `posts/a.hbs` becomes `posts/a`.
    Strip,
    /// Replace the extension: `.html` turns `posts/a.hbs` into `posts/a.html`.
    Replace(String),
}

impl RenameExtension {
    /// Interprets an optional policy string.
    ///
    /// `None` keeps the extension, `""` strips it and a string starting with
    /// `.` replaces it. Any other string is not a valid policy and keeps the
    /// extension.
    pub fn parse(policy: Option<&str>) -> Self {
        match policy {
            None => Self::Keep,
            Some("") => Self::Strip,
            Some(ext) if ext.starts_with('.') => Self::Replace(ext.to_string()),
            Some(other) => {
                debug!("Ignoring rename policy '{}' (must be empty or start with '.')", other);
                Self::Keep
            }
        }
    }
}

/// The default context: global metadata, then file metadata on top, plus the
/// file's `contents` as text.
pub fn default_context(file: &FileEntry, metadata: &Metadata) -> Value {
    let mut merged = metadata.clone();
    merged.extend(file.to_context_value());
    Value::Object(merged)
}

/// Immutable option record for one plugin instance.
pub struct Options {
    pub(crate) patterns: Vec<String>,
    pub(crate) partials: String,
    pub(crate) helpers: Vec<(String, Box<dyn HelperDef + Send + Sync + 'static>)>,
    pub(crate) functions: BTreeMap<String, Callable>,
    pub(crate) instance: Option<Handlebars<'static>>,
    pub(crate) layout: bool,
    pub(crate) context: ContextFn,
    pub(crate) rename_extension: RenameExtension,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            patterns: vec![DEFAULT_PATTERN.to_string()],
            partials: DEFAULT_PARTIALS_DIR.to_string(),
            helpers: Vec::new(),
            functions: BTreeMap::new(),
            instance: None,
            layout: true,
            context: Arc::new(default_context),
            rename_extension: RenameExtension::Keep,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("patterns", &self.patterns)
            .field("partials", &self.partials)
            .field("helpers", &self.helpers.iter().map(|(name, _)| name).collect::<Vec<_>>())
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .field("instance", &self.instance.is_some())
            .field("layout", &self.layout)
            .field("rename_extension", &self.rename_extension)
            .finish_non_exhaustive()
    }
}

impl Options {
    /// Replaces the template patterns with a single glob.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns = vec![pattern.into()];
        self
    }

    /// Replaces the template patterns with several globs (`!` excludes).
    #[must_use]
    pub fn patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the partials subdirectory name.
    #[must_use]
    pub fn partials(mut self, dir: impl Into<String>) -> Self {
        self.partials = dir.into();
        self
    }

    /// Adds an engine helper. User helpers are registered after the
    /// built-in ones and replace them on a name collision.
    #[must_use]
    pub fn helper(
        mut self,
        name: impl Into<String>,
        helper: Box<dyn HelperDef + Send + Sync + 'static>,
    ) -> Self {
        self.helpers.push((name.into(), helper));
        self
    }

    /// Registers a callable for the `call` helper.
    #[must_use]
    pub fn function<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&[Value]) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(function));
        self
    }

    /// Uses a preconfigured engine instead of a fresh one.
    #[must_use]
    pub fn instance(mut self, engine: Handlebars<'static>) -> Self {
        self.instance = Some(engine);
        self
    }

    /// Enables or disables layout processing and partial purging.
    #[must_use]
    pub fn layout(mut self, enabled: bool) -> Self {
        self.layout = enabled;
        self
    }

    /// Replaces the context construction function.
    #[must_use]
    pub fn context<F>(mut self, context: F) -> Self
    where
        F: Fn(&FileEntry, &Metadata) -> Value + Send + Sync + 'static,
    {
        self.context = Arc::new(context);
        self
    }

    /// Sets the extension rename policy.
    #[must_use]
    pub fn rename_extension(mut self, policy: RenameExtension) -> Self {
        self.rename_extension = policy;
        self
    }

    /// Template patterns in effect.
    pub fn patterns_list(&self) -> &[String] {
        &self.patterns
    }

    /// Partials subdirectory name in effect.
    pub fn partials_dir(&self) -> &str {
        &self.partials
    }

    /// Whether layout processing is enabled.
    pub fn layout_enabled(&self) -> bool {
        self.layout
    }

    /// Rename policy in effect.
    pub fn rename_policy(&self) -> &RenameExtension {
        &self.rename_extension
    }
}

/// One pattern or a list of patterns, as written in a config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PatternSpec {
    /// A single glob.
    One(String),
    /// Several globs.
    Many(Vec<String>),
}

impl PatternSpec {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(pattern) => vec![pattern],
            Self::Many(patterns) => patterns,
        }
    }
}

/// The serializable subset of [`Options`].
///
/// Absent keys keep their defaults. Unknown keys are rejected so that typos
/// such as `partial = "..."` are reported instead of silently ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct PluginConfig {
    /// Template glob(s).
    pub pattern: Option<PatternSpec>,
    /// Partials subdirectory name.
    pub partials: Option<String>,
    /// Layout processing flag.
    pub layout: Option<bool>,
    /// Extension policy: `""` strips, `".ext"` replaces.
    #[serde(alias = "renameExtension")]
    pub rename_extension: Option<String>,
}

impl PluginConfig {
    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Config`](crate::core::PluginError::Config) for
    /// invalid TOML, unknown keys or mistyped values.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Applies the present fields on top of `options`.
    pub fn apply(self, mut options: Options) -> Options {
        if let Some(pattern) = self.pattern {
            options.patterns = pattern.into_vec();
        }
        if let Some(partials) = self.partials {
            options.partials = partials;
        }
        if let Some(layout) = self.layout {
            options.layout = layout;
        }
        if self.rename_extension.is_some() {
            options.rename_extension = RenameExtension::parse(self.rename_extension.as_deref());
        }
        options
    }
}

impl From<PluginConfig> for Options {
    fn from(config: PluginConfig) -> Self {
        config.apply(Options::default())
    }
}
