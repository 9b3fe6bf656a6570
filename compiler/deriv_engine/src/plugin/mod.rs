//! Plugin registry and dependency injection.
//!
//! # Design
//!
//! A [`PluginRegistry`] holds plugin definitions. Per package it is
//! instantiated into a [`PluginSet`]: every plugin gets a [`Dependency`]
//! handle and one [`TypesMap`], the `depends_on` names of every definition
//! are resolved to handles, and the plugins are built with those handles.
//!
//! A handle is an index into the set. Handles allow exactly one
//! operation, asking for a function name through the [`Generator`], so a
//! plugin never sees another plugin's registry. Cyclic edges
//! (compare -> sort -> compare) need no special treatment.

mod generator;
pub mod support;

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use deriv_ir::Package;
use deriv_types::{Idx, Pool};
use rustc_hash::FxHashMap;
use tracing::debug;

pub use generator::Generator;

use crate::registry::{MapOptions, Namespace, SharedNamespace, Signature, TypesMap};
use crate::{plugins, Config, DeriveError};

/// A derivation plugin, built once per package.
pub trait Plugin {
    fn name(&self) -> &'static str;

    /// Check arity, argument shapes and type support of a call.
    ///
    /// `local` is the import path of the package being generated.
    fn validate(&self, pool: &Pool, local: &str, args: &[Idx]) -> Result<(), DeriveError>;

    /// Result types of the function generated for `sig`.
    fn results(&self, pool: &mut Pool, sig: &[Idx]) -> Vec<Idx>;

    /// Write the function for `sig`. Its name is already reserved.
    fn generate(&self, gen: &mut Generator<'_>, sig: &[Idx]) -> Result<(), DeriveError>;
}

/// Opaque handle to a plugin of the same set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Dependency(usize);

impl Dependency {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// Handles available to a plugin while it is built.
pub struct Handles<'a> {
    plugin: &'static str,
    this: Dependency,
    by_name: &'a FxHashMap<&'static str, Dependency>,
}

impl Handles<'_> {
    /// The plugin's own handle, for recursion.
    pub fn this(&self) -> Dependency {
        self.this
    }

    pub fn get(&self, name: &str) -> Result<Dependency, DeriveError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| DeriveError::MissingDependency {
                plugin: self.plugin.to_owned(),
                dependency: name.to_owned(),
            })
    }
}

pub type BuildFn = fn(&Handles<'_>) -> Result<Box<dyn Plugin>, DeriveError>;

/// A registered plugin.
#[derive(Clone, Copy)]
pub struct PluginDef {
    pub name: &'static str,
    pub depends_on: &'static [&'static str],
    pub build: BuildFn,
}

impl std::fmt::Debug for PluginDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginDef")
            .field("name", &self.name)
            .field("depends_on", &self.depends_on)
            .finish_non_exhaustive()
    }
}

// === Registry ===

#[derive(Clone, Debug, Default)]
pub struct PluginRegistry {
    defs: Vec<PluginDef>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every plugin this crate ships.
    pub fn standard() -> Self {
        let mut registry = PluginRegistry::new();
        for def in plugins::standard() {
            registry.register(def);
        }
        registry
    }

    /// Add a definition; a definition with the same name is replaced.
    pub fn register(&mut self, def: PluginDef) {
        match self.defs.iter_mut().find(|d| d.name == def.name) {
            Some(slot) => *slot = def,
            None => self.defs.push(def),
        }
    }

    pub fn defs(&self) -> &[PluginDef] {
        &self.defs
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.defs.iter().map(|d| d.name)
    }

    /// Build the plugin set of one package.
    pub fn instantiate(&self, config: &Config, package: &Package) -> Result<PluginSet, DeriveError> {
        let by_name: FxHashMap<&'static str, Dependency> = self
            .defs
            .iter()
            .enumerate()
            .map(|(i, def)| (def.name, Dependency(i)))
            .collect();

        let namespace: SharedNamespace =
            Rc::new(RefCell::new(Namespace::seeded(package.scope.iter().cloned())));

        let mut plugins = Vec::with_capacity(self.defs.len());
        let mut maps = Vec::with_capacity(self.defs.len());
        for (i, def) in self.defs.iter().enumerate() {
            let handles = Handles {
                plugin: def.name,
                this: Dependency(i),
                by_name: &by_name,
            };
            for dep in def.depends_on {
                handles.get(dep)?;
            }
            plugins.push((def.build)(&handles)?);
            maps.push(TypesMap::new(
                def.name,
                package.path.clone(),
                MapOptions {
                    prefix: config.prefix_for(def.name),
                    autoname: config.autoname,
                    dedup: config.dedup,
                },
                Rc::clone(&namespace),
            ));
        }

        Ok(PluginSet {
            local: package.path.clone(),
            plugins,
            maps,
        })
    }
}

// === Per-package set ===

/// One generated declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Derived {
    pub plugin: &'static str,
    pub name: String,
    pub signature: Signature,
    pub results: Vec<Idx>,
    /// Declaration text, doc comment included.
    pub text: String,
}

/// Output of draining every queue of a set.
#[derive(Debug, Default)]
pub struct Drained {
    /// Declarations, each after the ones its body requested.
    pub decls: Vec<Derived>,
    /// Import paths the declarations need.
    pub imports: BTreeSet<String>,
}

/// The plugins and registries of one package.
pub struct PluginSet {
    local: String,
    plugins: Vec<Box<dyn Plugin>>,
    maps: Vec<TypesMap>,
}

impl PluginSet {
    /// The plugin whose prefix is the longest prefix of `name`.
    pub fn dispatch(&self, name: &str) -> Option<Dependency> {
        self.maps
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.prefix().is_empty() && name.starts_with(m.prefix()))
            .max_by_key(|(_, m)| m.prefix().len())
            .map(|(i, _)| Dependency(i))
    }

    pub fn plugin_name(&self, dep: Dependency) -> &'static str {
        self.plugins[dep.index()].name()
    }

    pub fn map(&self, dep: Dependency) -> &TypesMap {
        &self.maps[dep.index()]
    }

    pub fn maps(&self) -> &[TypesMap] {
        &self.maps
    }

    /// Validate a call and register its name. Returns the canonical name
    /// to call. A call that fails validation registers nothing.
    pub fn add(
        &mut self,
        pool: &Pool,
        dep: Dependency,
        requested: &str,
        args: &[Idx],
    ) -> Result<String, DeriveError> {
        let plugin = &self.plugins[dep.index()];
        plugin.validate(pool, &self.local, args)?;
        let name = self.maps[dep.index()].set_func_name(pool, requested, args)?;
        debug!(plugin = plugin.name(), requested, name = %name, "dispatched call");
        Ok(name)
    }

    /// Whether every registry is done.
    pub fn done(&self) -> bool {
        self.maps.iter().all(TypesMap::done)
    }

    /// Generate every queued signature, including the ones requested while
    /// generating, until every registry is done.
    ///
    /// A declaration follows every declaration its body requested, so the
    /// dependencies of a call come first.
    pub fn drain(&mut self, pool: &mut Pool) -> Result<Drained, DeriveError> {
        let mut drained = Drained::default();
        while let Some((i, sig)) = self.next_queued() {
            self.generate(pool, i, sig, &mut drained)?;
        }
        Ok(drained)
    }

    /// First queued signature, in plugin order.
    fn next_queued(&self) -> Option<(usize, Signature)> {
        self.maps
            .iter()
            .enumerate()
            .find_map(|(i, m)| m.to_generate().into_iter().next().map(|sig| (i, sig)))
    }

    fn generate(
        &mut self,
        pool: &mut Pool,
        i: usize,
        sig: Signature,
        drained: &mut Drained,
    ) -> Result<(), DeriveError> {
        let before: Vec<usize> = self.maps.iter().map(|m| m.entries().len()).collect();
        self.maps[i].generating(&sig);
        let name = self.maps[i].name_of(&sig).unwrap_or_default().to_owned();
        let plugin = &self.plugins[i];
        debug!(plugin = plugin.name(), name = %name, "generating");

        let mut gen = Generator::new(
            pool,
            &self.local,
            &mut self.maps,
            Dependency(i),
            &name,
            &mut drained.imports,
        );
        plugin.generate(&mut gen, &sig)?;
        let text = gen.finish();
        let derived = Derived {
            plugin: plugin.name(),
            results: plugin.results(pool, &sig),
            name,
            signature: sig,
            text,
        };

        let requested: Vec<(usize, Signature)> = self
            .maps
            .iter()
            .enumerate()
            .flat_map(|(j, m)| {
                m.entries()[before[j]..]
                    .iter()
                    .map(move |e| (j, e.signature.clone()))
            })
            .collect();
        for (j, dep) in requested {
            if self.maps[j].is_queued(&dep) {
                self.generate(pool, j, dep, drained)?;
            }
        }
        drained.decls.push(derived);
        Ok(())
    }
}
