//! Type pool - unified storage for all type descriptors.
//!
//! # Design
//!
//! - Structural types are hash-consed: `intern` returns the existing `Idx`
//!   when an identical `TypeData` was seen before.
//! - Named types are keyed by `(package path, name)` and carry their
//!   definition in a side table. The type is created first and completed
//!   later, so a named type can refer to itself through its underlying type.
//! - Lookups never panic: an out-of-range or `NONE` index reads as
//!   `Invalid`.

mod construct;
mod format;

#[cfg(test)]
#[expect(clippy::expect_used, reason = "Test code uses expect for clarity")]
mod tests;

use rustc_hash::FxHashMap;

use crate::{BasicKind, Idx, Method, NamedDef, NamedId, TypeData};

static INVALID_DATA: TypeData = TypeData::Basic(BasicKind::Invalid);

/// Interned storage for every type of one loaded program.
#[derive(Clone, Debug)]
pub struct Pool {
    items: Vec<TypeData>,
    lookup: FxHashMap<TypeData, Idx>,
    named: Vec<NamedDef>,
    named_lookup: FxHashMap<(String, String), Idx>,
    /// Package path -> package name, for qualifying rendered names.
    package_names: FxHashMap<String, String>,
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

impl Pool {
    /// Create a pool with the basic kinds pre-interned.
    pub fn new() -> Self {
        let mut pool = Pool {
            items: Vec::with_capacity(64),
            lookup: FxHashMap::default(),
            named: Vec::new(),
            named_lookup: FxHashMap::default(),
            package_names: FxHashMap::default(),
        };
        for kind in BasicKind::ALL {
            let idx = pool.intern(TypeData::Basic(kind));
            debug_assert_eq!(idx, kind.idx());
        }
        pool
    }

    // === Interning ===

    /// Intern a structural type.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "a pool never holds more than u32::MAX types"
    )]
    pub fn intern(&mut self, data: TypeData) -> Idx {
        if let Some(&idx) = self.lookup.get(&data) {
            return idx;
        }
        let idx = Idx::from_raw(self.items.len() as u32);
        self.items.push(data.clone());
        self.lookup.insert(data, idx);
        idx
    }

    /// Number of distinct types.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // === Lookup Methods ===

    /// The descriptor behind `idx`.
    pub fn data(&self, idx: Idx) -> &TypeData {
        self.items.get(idx.index()).unwrap_or(&INVALID_DATA)
    }

    /// Shape classification: resolves named types to their underlying
    /// type. Chains of named types are followed to the first non-named
    /// descriptor. An incomplete named type resolves to `Idx::INVALID`.
    pub fn underlying(&self, idx: Idx) -> Idx {
        let mut current = idx;
        // Named chains are acyclic in well-formed input; the bound stops
        // malformed ones.
        for _ in 0..=self.named.len() {
            match self.data(current) {
                TypeData::Named(id) => {
                    let next = self
                        .named
                        .get(id.index())
                        .map_or(Idx::NONE, |def| def.underlying);
                    if next.is_none() {
                        return Idx::INVALID;
                    }
                    current = next;
                }
                _ if current.is_none() => return Idx::INVALID,
                _ => return current,
            }
        }
        Idx::INVALID
    }

    /// Descriptor of the underlying type.
    pub fn underlying_data(&self, idx: Idx) -> &TypeData {
        self.data(self.underlying(idx))
    }

    // === Named Types ===

    /// Declare a named type, or return the existing one with this identity.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "a pool never holds more than u32::MAX named types"
    )]
    pub fn named(&mut self, package: &str, name: &str) -> Idx {
        let key = (package.to_owned(), name.to_owned());
        if let Some(&idx) = self.named_lookup.get(&key) {
            return idx;
        }
        let id = NamedId(self.named.len() as u32);
        self.named.push(NamedDef {
            package: package.to_owned(),
            name: name.to_owned(),
            underlying: Idx::NONE,
            methods: Vec::new(),
        });
        let idx = self.intern(TypeData::Named(id));
        self.named_lookup.insert(key, idx);
        idx
    }

    /// Look up a named type without declaring it.
    pub fn lookup_named(&self, package: &str, name: &str) -> Option<Idx> {
        self.named_lookup
            .get(&(package.to_owned(), name.to_owned()))
            .copied()
    }

    /// Definition of a named type, or `None` if `idx` is not named.
    pub fn named_def(&self, idx: Idx) -> Option<&NamedDef> {
        match self.data(idx) {
            TypeData::Named(id) => self.named.get(id.index()),
            _ => None,
        }
    }

    fn named_def_mut(&mut self, idx: Idx) -> Option<&mut NamedDef> {
        match self.items.get(idx.index()) {
            Some(TypeData::Named(id)) => self.named.get_mut(id.index()),
            _ => None,
        }
    }

    /// Attach the underlying type of a named type. No-op for other types.
    pub fn set_underlying(&mut self, named: Idx, underlying: Idx) {
        if let Some(def) = self.named_def_mut(named) {
            def.underlying = underlying;
        }
    }

    /// Attach a method to a named type. A method with the same name
    /// replaces the previous declaration. Methods stay sorted by name.
    pub fn add_method(&mut self, named: Idx, method: Method) {
        if let Some(def) = self.named_def_mut(named) {
            match def.methods.binary_search_by(|m| m.name.cmp(&method.name)) {
                Ok(pos) => def.methods[pos] = method,
                Err(pos) => def.methods.insert(pos, method),
            }
        }
    }

    /// Whether `idx` is a named (defined) type.
    pub fn is_named(&self, idx: Idx) -> bool {
        matches!(self.data(idx), TypeData::Named(_))
    }

    // === Packages ===

    /// Record the declared name of a package.
    pub fn set_package_name(&mut self, path: &str, name: &str) {
        self.package_names.insert(path.to_owned(), name.to_owned());
    }

    /// Declared name of a package; defaults to the last path segment.
    pub fn package_name<'a>(&'a self, path: &'a str) -> &'a str {
        match self.package_names.get(path) {
            Some(name) => name,
            None => path.rsplit('/').next().unwrap_or(path),
        }
    }
}
