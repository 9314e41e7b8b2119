//! Test fixtures for creating sample file sets
//!
//! [`SiteFixture`] holds a small site: global partials, directory-local
//! partials and templates exercising each partial, layout and helper
//! feature. Tests start from one of the constructors and add or drop
//! entries as needed.

use crate::files::{FileEntry, FileSet};

/// Global and local partials used by the fixture templates.
pub const PARTIALS: &[(&str, &str)] = &[
    ("partials/simple.hbs", "<h1>{{text}}</h1>"),
    ("partials/layouts/default.hbs", "{{> @partial-block}}layout"),
    ("partials/valid-layout.hbs", "{{{contents}}}{{title}} layout"),
    ("posts/relative-partials/partials/local.hbs", "local,{{> @partial-block}}"),
    ("posts/nested-relative-partials/partials/parent.hbs", "parent,{{> @partial-block}}"),
    ("posts/nested-relative-partials/partials/nested/child.hbs", "child,{{> @partial-block}}"),
    ("posts/local-partial-override/partials/simple.hbs", "<p>{{text}}</p>"),
];

/// Templates without metadata.
pub const TEMPLATES: &[(&str, &str)] = &[
    ("posts/simple.hbs", r#"{{> simple text="test:simple"}}"#),
    ("posts/relative-partials/index.hbs", "test:{{#> local}}partial{{/local}}"),
    (
        "posts/nested-relative-partials/index.hbs",
        "test:{{#> parent}}{{#> nested/child}}grandchild{{/nested/child}}{{/parent}}",
    ),
    (
        "posts/relative-partials2/inline-partials.hbs",
        r#"test:{{#> layouts/default}}{{#*inline "dynamic"}}dynamic!{{/inline}}{{/layouts/default}}"#,
    ),
    ("posts/local-partial-override/index.hbs", r#"{{> simple text="test:local-override"}}"#),
    ("api-helpers.hbs", r#"{{prefix "local" "test:"}} & {{instancehelper}} helpers"#),
    ("api-data.hbs", "test:{{extraProperty}}"),
];

/// Builder for a [`FileSet`] used as a pass input.
#[derive(Clone, Debug, Default)]
pub struct SiteFixture {
    files: FileSet,
}

impl SiteFixture {
    /// An empty site.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every partial and template of the fixture site, including the two
    /// layout test pages.
    pub fn full() -> Self {
        let mut site = Self::new();
        for (path, body) in PARTIALS.iter().chain(TEMPLATES) {
            site = site.file(path, body);
        }
        site.entry(
            "posts/valid-layout.hbs",
            FileEntry::new("test:").with("title", "valid").with("layout", "valid-layout"),
        )
        .entry(
            "posts/invalid-layout.hbs",
            FileEntry::new("test:").with("title", "invalid").with("layout", "invalid-layout"),
        )
    }

    /// The minimal site used for rename tests: one global partial and the
    /// post that includes it.
    pub fn simple() -> Self {
        Self::new()
            .file("partials/simple.hbs", "<h1>{{text}}</h1>")
            .file("posts/simple.hbs", r#"{{> simple text="test:simple"}}"#)
    }

    /// Adds a file without metadata.
    pub fn file(self, path: &str, contents: &str) -> Self {
        self.entry(path, FileEntry::new(contents))
    }

    /// Adds a file with metadata.
    pub fn entry(mut self, path: &str, entry: FileEntry) -> Self {
        self.files.insert(path.to_string(), entry);
        self
    }

    /// Drops a file.
    pub fn without(mut self, path: &str) -> Self {
        self.files.remove(path);
        self
    }

    /// Rewrites every key with backslash separators.
    pub fn with_windows_paths(self) -> Self {
        let files = self
            .files
            .into_iter()
            .map(|(path, entry)| (path.replace('/', "\\"), entry))
            .collect();
        Self {
            files,
        }
    }

    /// The finished file set.
    pub fn build(self) -> FileSet {
        self.files
    }
}

/// Contents of `path` in `files` as text, panicking with the available keys
/// when it is missing.
pub fn contents_of(files: &FileSet, path: &str) -> String {
    match files.get(path) {
        Some(entry) => entry.contents_str(),
        None => panic!("no file '{path}' in {:?}", files.keys().collect::<Vec<_>>()),
    }
}
