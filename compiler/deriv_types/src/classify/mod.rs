//! Value classifier.
//!
//! Classifies each type as `Plain`, `Deep` or `Opaque`. Derivations use the
//! class to decide when a plain assignment or `==` is enough and when they
//! must recurse. Uses memoization and cycle detection for recursive types.


use std::cell::RefCell;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{BasicKind, Idx, Pool, TypeData};

/// How values of a type behave under copy and comparison.
///
/// Ordered by severity: combining classes keeps the larger one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ValueClass {
    /// Copied by assignment and compared by `==`: basic types and arrays
    /// or structs of plain parts.
    Plain,
    /// Reaches shared storage through a pointer, slice or map.
    Deep,
    /// Has no structural rule: channels, functions, interfaces, tuples and
    /// invalid types.
    Opaque,
}

impl ValueClass {
    #[inline]
    fn join(self, other: ValueClass) -> ValueClass {
        self.max(other)
    }
}

/// Memoizing classifier over one pool.
///
/// # Interior Mutability
///
/// The cache and the cycle-detection set sit in `RefCell`s so
/// classification works through `&self`.
pub struct ValueClassifier<'pool> {
    pool: &'pool Pool,
    cache: RefCell<FxHashMap<Idx, ValueClass>>,
    /// Indices currently being classified. Meeting one again means the
    /// type is recursive, which requires indirection and is thus `Deep`.
    classifying: RefCell<FxHashSet<Idx>>,
}

impl<'pool> ValueClassifier<'pool> {
    pub fn new(pool: &'pool Pool) -> Self {
        Self {
            pool,
            cache: RefCell::new(FxHashMap::default()),
            classifying: RefCell::new(FxHashSet::default()),
        }
    }

    pub fn pool(&self) -> &'pool Pool {
        self.pool
    }

    /// Whether `idx` is copyable by assignment and comparable by `==`.
    pub fn is_plain(&self, idx: Idx) -> bool {
        self.classify(idx) == ValueClass::Plain
    }

    /// Classification with caching and cycle detection.
    pub fn classify(&self, idx: Idx) -> ValueClass {
        if idx.is_none() {
            return ValueClass::Opaque;
        }
        if let Some(kind) = idx.basic_kind() {
            return Self::classify_basic(kind);
        }
        if let Some(&cached) = self.cache.borrow().get(&idx) {
            return cached;
        }
        if !self.classifying.borrow_mut().insert(idx) {
            return ValueClass::Deep;
        }

        let result = self.classify_shape(idx);

        self.classifying.borrow_mut().remove(&idx);
        self.cache.borrow_mut().insert(idx, result);
        result
    }

    #[inline]
    fn classify_basic(kind: BasicKind) -> ValueClass {
        match kind {
            BasicKind::Invalid => ValueClass::Opaque,
            _ => ValueClass::Plain,
        }
    }

    fn classify_shape(&self, idx: Idx) -> ValueClass {
        match self.pool.data(idx) {
            TypeData::Basic(kind) => Self::classify_basic(*kind),
            TypeData::Pointer(_) | TypeData::Slice(_) | TypeData::Map { .. } => ValueClass::Deep,
            TypeData::Channel { .. }
            | TypeData::Signature { .. }
            | TypeData::Interface(_)
            | TypeData::Tuple(_) => ValueClass::Opaque,
            TypeData::Array { elem, .. } => self.classify(*elem),
            TypeData::Struct(fields) => fields
                .iter()
                .fold(ValueClass::Plain, |acc, f| acc.join(self.classify(f.ty))),
            TypeData::Named(_) => match self.pool.named_def(idx) {
                Some(def) if !def.underlying.is_none() => self.classify(def.underlying),
                _ => ValueClass::Opaque,
            },
        }
    }
}
