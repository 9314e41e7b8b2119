//! Partial registration and scoping.
//!
//! Both kinds of partial are registered through drop guards. A
//! [`GlobalPartials`] guard lives for one pass and a [`LocalPartials`] guard,
//! borrowed from it, for one directory's render loop. Dropping either
//! unregisters everything it added, including on early return through `?`,
//! so no partial outlives the pass that read its source.
//!
//! A name that was already registered before the guard, such as a partial
//! on a caller-supplied engine, is shadowed while the guard lives and gets
//! its previous template back when it drops.
//!
//! A local partial whose name is one of this pass's global partials is
//! skipped, so globals always win.

use std::collections::BTreeSet;

use handlebars::{Handlebars, Template, TemplateError};
use tracing::debug;

use super::classify::partial_name;
use crate::core::{PluginError, Result};
use crate::files::FileSet;

/// Names a guard registered, each with the template it replaced.
#[derive(Default)]
struct Registrations {
    entries: Vec<(String, Option<Template>)>,
}

impl Registrations {
    fn add(
        &mut self,
        engine: &mut Handlebars<'static>,
        name: &str,
        source: &str,
    ) -> std::result::Result<(), TemplateError> {
        let previous = engine.get_template(name).cloned();
        engine.register_partial(name, source)?;
        self.entries.push((name.to_string(), previous));
        Ok(())
    }

    fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    /// Undoes every registration, newest first.
    fn release(&mut self, engine: &mut Handlebars<'static>) {
        for (name, previous) in self.entries.drain(..).rev() {
            match previous {
                Some(template) => engine.register_template(&name, template),
                None => engine.unregister_template(&name),
            }
        }
    }
}

/// Global partials of one pass, registered for as long as the guard lives.
pub struct GlobalPartials<'a> {
    engine: &'a mut Handlebars<'static>,
    names: BTreeSet<String>,
    registered: Registrations,
}

impl<'a> GlobalPartials<'a> {
    /// Registers every global partial under its name relative to
    /// `partials_dir`.
    ///
    /// Entries stay in `files`; purging them is a pass-end decision.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Compile`] carrying the partial's path when its
    /// source does not parse. Partials registered before the failure are
    /// unregistered again.
    pub fn register(
        engine: &'a mut Handlebars<'static>,
        files: &FileSet,
        global_partials: &[String],
        partials_dir: &str,
    ) -> Result<Self> {
        let mut scope = Self {
            engine,
            names: BTreeSet::new(),
            registered: Registrations::default(),
        };

        for path in global_partials {
            let Some(entry) = files.get(path) else {
                continue;
            };
            let name = partial_name(partials_dir, path);
            scope
                .registered
                .add(&mut *scope.engine, &name, &entry.contents_str())
                .map_err(|e| PluginError::compile(path.as_str(), e))?;
            debug!("Registered global partial '{}' from {}", name, path);
            scope.names.insert(name);
        }

        Ok(scope)
    }

    /// Registers the local partials of `local_dir` on top of the globals.
    ///
    /// # Errors
    ///
    /// See [`LocalPartials::register`].
    pub fn local<'p, I>(
        &mut self,
        files: &FileSet,
        candidates: I,
        local_dir: &str,
    ) -> Result<LocalPartials<'_>>
    where
        I: IntoIterator<Item = &'p String>,
    {
        LocalPartials::register(&mut *self.engine, files, candidates, local_dir, &self.names)
    }

    /// The engine with this pass's global partials registered.
    pub fn engine(&self) -> &Handlebars<'static> {
        &*self.engine
    }

    /// Global partial names of this pass.
    pub fn names(&self) -> &BTreeSet<String> {
        &self.names
    }
}

impl Drop for GlobalPartials<'_> {
    fn drop(&mut self) {
        let count = self.registered.len();
        self.registered.release(&mut *self.engine);
        if count > 0 {
            debug!("Unregistered {} global partial(s)", count);
        }
    }
}

/// Local partials of one directory, registered for as long as the guard
/// lives.
pub struct LocalPartials<'a> {
    engine: &'a mut Handlebars<'static>,
    dir: String,
    registered: Registrations,
}

impl<'a> LocalPartials<'a> {
    /// Registers the partials in `candidates` that live under `local_dir`.
    ///
    /// Names present in `globals` are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Compile`] for a malformed partial. Partials
    /// registered before the failure are unregistered again.
    pub fn register<'p, I>(
        engine: &'a mut Handlebars<'static>,
        files: &FileSet,
        candidates: I,
        local_dir: &str,
        globals: &BTreeSet<String>,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = &'p String>,
    {
        let mut scope = Self {
            engine,
            dir: local_dir.to_string(),
            registered: Registrations::default(),
        };

        for path in candidates {
            let Some(entry) = files.get(path) else {
                continue;
            };
            let name = partial_name(local_dir, path);
            if globals.contains(&name) {
                debug!("Skipping local partial '{}' from {}: global partial wins", name, path);
                continue;
            }
            scope
                .registered
                .add(&mut *scope.engine, &name, &entry.contents_str())
                .map_err(|e| PluginError::compile(path.as_str(), e))?;
            debug!("Registered local partial '{}' from {}", name, path);
        }

        Ok(scope)
    }

    /// The engine with this directory's partials registered.
    pub fn engine(&self) -> &Handlebars<'static> {
        &*self.engine
    }

    /// Names registered by this guard.
    pub fn names(&self) -> Vec<&str> {
        self.registered.names()
    }
}

impl Drop for LocalPartials<'_> {
    fn drop(&mut self) {
        let count = self.registered.len();
        self.registered.release(&mut *self.engine);
        if count > 0 {
            debug!("Unregistered {} local partial(s) of {}", count, self.dir);
        }
    }
}
