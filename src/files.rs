//! In-memory files handed to the plugin by the build host.
//!
//! A pass never touches the real filesystem. The host loads its source tree
//! into a [`FileSet`], a map from path to [`FileEntry`], and every stage of
//! the pass mutates that one map in place: rendered bytes replace template
//! sources, partial entries are removed, renamed entries move to new keys.
//!
//! # Paths
//!
//! Keys are kept exactly as the host supplied them. Whenever a key takes part
//! in a comparison (glob matching, directory grouping, partial naming) it is
//! first passed through [`normalize_path`], so a host running on Windows can
//! hand over `posts\simple.hbs` and still have it treated as `posts/simple.hbs`.
//!
//! # Metadata
//!
//! Apart from its bytes, an entry carries arbitrary metadata fields. Two are
//! meaningful to the plugin itself:
//!
//! - `layout`: name of a partial that wraps the rendered contents
//! - `title`: not used directly, but commonly read by layouts
//!
//! Everything else is passed through to the template context untouched.
//!
//! # Front matter
//!
//! Hosts that load Markdown-like sources can use [`FileEntry::from_source`] to
//! split a YAML front matter block into metadata:
//!
//! ```rust
//! use handlebars_x::files::FileEntry;
//!
//! let entry = FileEntry::from_source("---\ntitle: Hello\nlayout: page.hbs\n---\n<p>{{title}}</p>").unwrap();
//! assert_eq!(entry.title(), Some("Hello"));
//! assert_eq!(entry.layout(), Some("page.hbs"));
//! assert_eq!(entry.contents_str().trim(), "<p>{{title}}</p>");
//! ```

use std::collections::BTreeMap;

use gray_matter::{Matter, engine::YAML};
use serde_json::{Map, Value};

use crate::core::{PluginError, Result};

/// Pass-global metadata store, shared by every file in a pass.
pub type Metadata = Map<String, Value>;

/// The mutable file map for one pass, in deterministic (sorted key) order.
pub type FileSet = BTreeMap<String, FileEntry>;

/// Key under which the file contents appear in a template context.
pub const CONTENTS_KEY: &str = "contents";

/// One file of the build: raw bytes plus free-form metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileEntry {
    /// Raw file contents. Rendering overwrites these in place.
    pub contents: Vec<u8>,
    /// Metadata fields, typically from front matter or earlier plugins.
    pub metadata: Map<String, Value>,
}

impl FileEntry {
    /// Creates an entry with the given contents and no metadata.
    pub fn new(contents: impl Into<Vec<u8>>) -> Self {
        Self {
            contents: contents.into(),
            metadata: Map::new(),
        }
    }

    /// Adds a metadata field, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Parses `source` into metadata (from a leading YAML front matter block)
    /// and contents (everything after it).
    ///
    /// Sources without front matter become an entry with no metadata and the
    /// whole source as contents. A front matter block that is not a YAML
    /// mapping is rejected.
    pub fn from_source(source: &str) -> Result<Self> {
        let matter = Matter::<YAML>::new();
        let parsed = matter.parse::<Value>(source).map_err(|e| PluginError::FrontMatter {
            message: e.to_string(),
        })?;

        let metadata = match parsed.data {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(PluginError::FrontMatter {
                    message: format!("expected a mapping, found {other}"),
                });
            }
        };

        Ok(Self {
            contents: parsed.content.into_bytes(),
            metadata,
        })
    }

    /// Contents as text. Invalid UTF-8 sequences are replaced.
    pub fn contents_str(&self) -> String {
        String::from_utf8_lossy(&self.contents).into_owned()
    }

    /// Replaces the contents with the UTF-8 bytes of `text`.
    pub fn set_contents(&mut self, text: impl Into<String>) {
        self.contents = text.into().into_bytes();
    }

    /// A metadata field by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    /// The declared layout, if it is a non-empty string.
    pub fn layout(&self) -> Option<&str> {
        self.str_field("layout")
    }

    /// The declared title, if it is a non-empty string.
    pub fn title(&self) -> Option<&str> {
        self.str_field("title")
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    /// The entry as a template context: every metadata field plus
    /// [`CONTENTS_KEY`] holding the current contents as text.
    ///
    /// A metadata field literally named `contents` is shadowed by the bytes.
    pub fn to_context_value(&self) -> Map<String, Value> {
        let mut map = self.metadata.clone();
        map.insert(CONTENTS_KEY.to_string(), Value::String(self.contents_str()));
        map
    }
}

impl From<&str> for FileEntry {
    fn from(contents: &str) -> Self {
        Self::new(contents)
    }
}

/// Converts any backslash separators to forward slashes.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Directory part of a normalized path, `""` for top-level files.
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Joins a directory and a relative path with `/`, treating `""` as the root.
pub fn join(dir: &str, rest: &str) -> String {
    if dir.is_empty() {
        rest.to_string()
    } else {
        format!("{dir}/{rest}")
    }
}

/// Splits `path` into the part before the extension and the extension
/// (including its dot). Dotfiles such as `.hbs` have no extension.
pub fn split_extension(path: &str) -> (&str, &str) {
    let name_start = path.rfind(['/', '\\']).map_or(0, |idx| idx + 1);
    match path[name_start..].rfind('.') {
        Some(0) | None => (path, ""),
        Some(dot) => path.split_at(name_start + dot),
    }
}
