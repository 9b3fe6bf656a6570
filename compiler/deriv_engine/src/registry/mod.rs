//! Name/type registry.
//!
//! One [`TypesMap`] per plugin per package maps type signatures to the
//! canonical names of the functions generated for them.
//!
//! # Invariants
//!
//! - A signature maps to at most one name.
//! - A name maps to at most one signature, unless dedup admitted further
//!   assignable signatures as aliases.
//! - Every name handed out starts with the map's prefix or was requested
//!   explicitly by a call.
//! - Entries are queued in request order. `generating` marks an entry
//!   before its body is written, so a recursive request made while
//!   generating resolves to the reserved name.
//!
//! All maps of a package share one [`Namespace`], seeded with the
//! package's hand-written identifiers, so two plugins never hand out the
//! same identifier.


use std::cell::RefCell;
use std::rc::Rc;

use deriv_types::{Idx, Pool};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::debug;

use crate::DeriveError;

/// Argument types of a derived function.
pub type Signature = SmallVec<[Idx; 2]>;

/// Identifiers in use in one package.
#[derive(Clone, Debug, Default)]
pub struct Namespace {
    used: FxHashSet<String>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// A namespace holding `names`.
    pub fn seeded<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Namespace {
            used: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    /// Reserve `name`; returns `false` if it was already taken.
    pub fn reserve(&mut self, name: &str) -> bool {
        self.used.insert(name.to_owned())
    }
}

/// Shared handle to a package namespace.
pub type SharedNamespace = Rc<RefCell<Namespace>>;

/// One registered name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub signature: Signature,
    pub name: String,
    pub generated: bool,
    /// Further signatures sharing this name under dedup.
    pub aliases: Vec<Signature>,
}

/// Naming policy of one map.
#[derive(Clone, Debug)]
pub struct MapOptions {
    pub prefix: String,
    pub autoname: bool,
    pub dedup: bool,
}

/// Signature to name registry of one plugin in one package.
#[derive(Debug)]
pub struct TypesMap {
    plugin: String,
    /// Import path of the package, for rendering signatures.
    local: String,
    options: MapOptions,
    namespace: SharedNamespace,
    entries: Vec<Entry>,
    by_sig: FxHashMap<Signature, usize>,
    by_name: FxHashMap<String, usize>,
}

impl TypesMap {
    pub fn new(
        plugin: impl Into<String>,
        local: impl Into<String>,
        options: MapOptions,
        namespace: SharedNamespace,
    ) -> Self {
        TypesMap {
            plugin: plugin.into(),
            local: local.into(),
            options,
            namespace,
            entries: Vec::new(),
            by_sig: FxHashMap::default(),
            by_name: FxHashMap::default(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.options.prefix
    }

    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    // === Naming ===

    /// Bind `requested` to `sig`, or report why it cannot be.
    ///
    /// Returns the canonical name the call must use, which differs from
    /// `requested` only under autoname or dedup.
    pub fn set_func_name(
        &mut self,
        pool: &Pool,
        requested: &str,
        sig: &[Idx],
    ) -> Result<String, DeriveError> {
        if let Some(&i) = self.by_sig.get(sig) {
            let existing = &self.entries[i].name;
            if existing == requested || self.options.dedup {
                return Ok(existing.clone());
            }
            return Err(DeriveError::AmbiguousName {
                signature: self.render(pool, sig),
                existing: existing.clone(),
                requested: requested.to_owned(),
            });
        }

        if let Some(&i) = self.by_name.get(requested) {
            if self.options.dedup && self.accepts(pool, &self.entries[i].signature, sig) {
                self.alias(i, sig);
                return Ok(requested.to_owned());
            }
            if self.options.autoname {
                return Ok(self.get_func_name(pool, sig));
            }
            return Err(DeriveError::ConflictingName {
                name: requested.to_owned(),
                existing: self.render(pool, &self.entries[i].signature),
                requested: self.render(pool, sig),
            });
        }

        if self.namespace.borrow().contains(requested) {
            if self.options.autoname {
                return Ok(self.get_func_name(pool, sig));
            }
            return Err(DeriveError::ConflictingName {
                name: requested.to_owned(),
                existing: "another declaration".to_owned(),
                requested: self.render(pool, sig),
            });
        }

        self.bind(requested.to_owned(), sig);
        Ok(requested.to_owned())
    }

    /// Name for `sig`, creating and enqueueing an entry if needed.
    pub fn get_func_name(&mut self, pool: &Pool, sig: &[Idx]) -> String {
        if let Some(&i) = self.by_sig.get(sig) {
            return self.entries[i].name.clone();
        }
        if self.options.dedup {
            let found = self
                .entries
                .iter()
                .position(|e| self.accepts(pool, &e.signature, sig));
            if let Some(i) = found {
                self.alias(i, sig);
                return self.entries[i].name.clone();
            }
        }

        let base = match sig.first() {
            Some(&first) => format!("{}{}", self.options.prefix, pool.name_fragment(first)),
            None => self.options.prefix.clone(),
        };
        let name = self.free_name(&base);
        self.bind(name.clone(), sig);
        name
    }

    /// `base`, or `base_1`, `base_2`, ... whichever is free first.
    fn free_name(&self, base: &str) -> String {
        let taken = |name: &str| self.by_name.contains_key(name) || self.namespace.borrow().contains(name);
        if !taken(base) {
            return base.to_owned();
        }
        let mut n = 1;
        loop {
            let candidate = format!("{base}_{n}");
            if !taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    fn bind(&mut self, name: String, sig: &[Idx]) {
        debug!(plugin = %self.plugin, name = %name, "bound name");
        self.namespace.borrow_mut().reserve(&name);
        let index = self.entries.len();
        self.by_sig.insert(sig.into(), index);
        self.by_name.insert(name.clone(), index);
        self.entries.push(Entry {
            signature: sig.into(),
            name,
            generated: false,
            aliases: Vec::new(),
        });
    }

    fn alias(&mut self, index: usize, sig: &[Idx]) {
        debug!(
            plugin = %self.plugin,
            name = %self.entries[index].name,
            "aliased assignable signature"
        );
        self.by_sig.insert(sig.into(), index);
        self.entries[index].aliases.push(sig.into());
    }

    /// Whether a call with argument types `sig` may use the function
    /// generated for `bound`.
    fn accepts(&self, pool: &Pool, bound: &[Idx], sig: &[Idx]) -> bool {
        bound.len() == sig.len()
            && sig
                .iter()
                .zip(bound)
                .all(|(&arg, &param)| pool.assignable(arg, param))
    }

    fn render(&self, pool: &Pool, sig: &[Idx]) -> String {
        sig.iter()
            .map(|&ty| pool.format_type(ty, &self.local))
            .collect::<Vec<_>>()
            .join(", ")
    }

    // === Queue ===

    /// Signatures whose body has not been generated, in request order.
    pub fn to_generate(&self) -> Vec<Signature> {
        self.entries
            .iter()
            .filter(|e| !e.generated)
            .map(|e| e.signature.clone())
            .collect()
    }

    /// Mark `sig` generated. Must precede generating its body.
    pub fn generating(&mut self, sig: &[Idx]) {
        if let Some(&i) = self.by_sig.get(sig) {
            self.entries[i].generated = true;
        }
    }

    /// Whether `sig` is bound and its body not generated yet.
    pub fn is_queued(&self, sig: &[Idx]) -> bool {
        self.by_sig
            .get(sig)
            .is_some_and(|&i| !self.entries[i].generated)
    }

    /// Whether every entry has been generated.
    pub fn done(&self) -> bool {
        self.entries.iter().all(|e| e.generated)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Name bound to `sig`, if any.
    pub fn name_of(&self, sig: &[Idx]) -> Option<&str> {
        self.by_sig
            .get(sig)
            .map(|&i| self.entries[i].name.as_str())
    }
}
