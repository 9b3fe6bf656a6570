//! Generation context handed to a plugin for one declaration.

use std::collections::BTreeSet;

use deriv_types::{Idx, Pool, ValueClassifier};

use super::support::{fields_visible, has_capability, Capability};
use super::Dependency;
use crate::emitter::Printer;
use crate::registry::TypesMap;

/// Writes one declaration and resolves the names it calls.
pub struct Generator<'a> {
    pool: &'a mut Pool,
    local: &'a str,
    maps: &'a mut [TypesMap],
    this: Dependency,
    name: &'a str,
    imports: &'a mut BTreeSet<String>,
    out: Printer,
}

impl<'a> Generator<'a> {
    pub(crate) fn new(
        pool: &'a mut Pool,
        local: &'a str,
        maps: &'a mut [TypesMap],
        this: Dependency,
        name: &'a str,
        imports: &'a mut BTreeSet<String>,
    ) -> Self {
        Generator {
            pool,
            local,
            maps,
            this,
            name,
            imports,
            out: Printer::default(),
        }
    }

    pub(crate) fn finish(self) -> String {
        self.out.finish()
    }

    // === Names ===

    /// Name of the declaration being written.
    pub fn name(&self) -> &str {
        self.name
    }

    /// Handle of the plugin being run.
    pub fn this(&self) -> Dependency {
        self.this
    }

    /// Name of the function `dep` generates for `sig`, enqueueing it if
    /// it is new.
    pub fn func_name(&mut self, dep: Dependency, sig: &[Idx]) -> String {
        self.maps[dep.index()].get_func_name(&*self.pool, sig)
    }

    /// Name of this plugin's function for `sig`.
    pub fn own_name(&mut self, sig: &[Idx]) -> String {
        self.func_name(self.this, sig)
    }

    // === Types ===

    pub fn pool(&self) -> &Pool {
        &*self.pool
    }

    pub fn pool_mut(&mut self) -> &mut Pool {
        &mut *self.pool
    }

    /// Render a type for use in the generated file and record the imports
    /// it needs.
    pub fn ty(&mut self, idx: Idx) -> String {
        self.pool.packages_of(idx, self.local, &mut *self.imports);
        self.pool.format_type(idx, self.local)
    }

    pub fn import(&mut self, path: &str) {
        self.imports.insert(path.to_owned());
    }

    pub fn is_plain(&self, idx: Idx) -> bool {
        ValueClassifier::new(&*self.pool).is_plain(idx)
    }

    pub fn has_capability(&self, idx: Idx, cap: Capability) -> bool {
        has_capability(&*self.pool, idx, cap)
    }

    /// Whether the fields of `idx` can be accessed one by one here.
    pub fn fields_visible(&self, idx: Idx) -> bool {
        fields_visible(&*self.pool, self.local, idx)
    }

    // === Output ===

    /// One-line doc comment naming the declaration.
    pub fn doc(&mut self, text: &str) {
        let line = format!("// {} {text}", self.name);
        self.out.line(&line);
    }

    pub fn line(&mut self, text: &str) {
        self.out.line(text);
    }

    pub fn open(&mut self, text: &str) {
        self.out.open(text);
    }

    pub fn close(&mut self, text: &str) {
        self.out.close(text);
    }

    /// `if cond {` ... `}` around a single statement.
    pub fn guard(&mut self, cond: &str, stmt: &str) {
        self.out.open(&format!("if {cond} {{"));
        self.out.line(stmt);
        self.out.close("}");
    }
}
