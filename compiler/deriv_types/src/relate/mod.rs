//! Relations between types: identity, assignability, comparability and
//! method-set lookup.
//!
//! These follow the host language's rules. Identity is handle equality
//! because the pool interns structural types.

#[cfg(test)]
mod tests;

use rustc_hash::FxHashSet;

use crate::{BasicKind, ChanDir, Idx, Pool, TypeData};

impl Pool {
    // === Identity ===

    /// Structural identity.
    #[inline]
    pub fn identical(&self, a: Idx, b: Idx) -> bool {
        a == b
    }

    /// Defined types are named types and the predeclared basic types.
    pub fn is_defined(&self, idx: Idx) -> bool {
        matches!(self.data(idx), TypeData::Named(_) | TypeData::Basic(_))
    }

    // === Assignability ===

    /// Whether a value of type `from` may be assigned to a variable of
    /// type `to`.
    pub fn assignable(&self, from: Idx, to: Idx) -> bool {
        if from == to {
            return true;
        }
        if from.is_invalid() || to.is_invalid() {
            return false;
        }
        let from_under = self.underlying(from);
        let to_under = self.underlying(to);
        let either_undefined = !self.is_defined(from) || !self.is_defined(to);

        if from_under == to_under && either_undefined && !from_under.is_invalid() {
            return true;
        }
        if let TypeData::Interface(methods) = self.data(to_under) {
            return methods.iter().all(|m| {
                self.method(from, &m.name)
                    .is_some_and(|sig| sig == m.signature)
            });
        }
        if let (
            TypeData::Channel {
                dir: ChanDir::Both,
                elem: from_elem,
            },
            TypeData::Channel { elem: to_elem, .. },
        ) = (self.data(from_under), self.data(to_under))
        {
            return from_elem == to_elem && either_undefined;
        }
        false
    }

    // === Comparability ===

    /// Whether values of `idx` can be compared with `==`.
    pub fn comparable(&self, idx: Idx) -> bool {
        let mut visiting = FxHashSet::default();
        self.comparable_inner(idx, &mut visiting)
    }

    fn comparable_inner(&self, idx: Idx, visiting: &mut FxHashSet<Idx>) -> bool {
        match self.data(idx) {
            TypeData::Basic(kind) => *kind != BasicKind::Invalid,
            TypeData::Pointer(_) | TypeData::Channel { .. } | TypeData::Interface(_) => true,
            TypeData::Named(_) => {
                if !visiting.insert(idx) {
                    return true;
                }
                let under = self.underlying(idx);
                let result = !under.is_invalid() && self.comparable_inner(under, visiting);
                visiting.remove(&idx);
                result
            }
            TypeData::Struct(fields) => fields
                .iter()
                .all(|f| self.comparable_inner(f.ty, visiting)),
            TypeData::Array { elem, .. } => self.comparable_inner(*elem, visiting),
            TypeData::Slice(_)
            | TypeData::Map { .. }
            | TypeData::Signature { .. }
            | TypeData::Tuple(_) => false,
        }
    }

    // === Validity ===

    /// Whether `idx` mentions an invalid type anywhere, including through
    /// the underlying types of named types.
    pub fn has_invalid(&self, idx: Idx) -> bool {
        let mut seen = FxHashSet::default();
        self.has_invalid_inner(idx, &mut seen)
    }

    fn has_invalid_inner(&self, idx: Idx, seen: &mut FxHashSet<Idx>) -> bool {
        if idx.is_none() {
            return true;
        }
        if !seen.insert(idx) {
            return false;
        }
        match self.data(idx) {
            TypeData::Basic(kind) => *kind == BasicKind::Invalid,
            TypeData::Named(_) => match self.named_def(idx) {
                Some(def) => self.has_invalid_inner(def.underlying, seen),
                None => true,
            },
            TypeData::Pointer(elem)
            | TypeData::Slice(elem)
            | TypeData::Array { elem, .. }
            | TypeData::Channel { elem, .. } => self.has_invalid_inner(*elem, seen),
            TypeData::Map { key, value } => {
                self.has_invalid_inner(*key, seen) || self.has_invalid_inner(*value, seen)
            }
            TypeData::Struct(fields) => fields.iter().any(|f| self.has_invalid_inner(f.ty, seen)),
            TypeData::Signature {
                params, results, ..
            } => params
                .iter()
                .chain(results.iter())
                .any(|&ty| self.has_invalid_inner(ty, seen)),
            TypeData::Tuple(elems) => elems.iter().any(|&ty| self.has_invalid_inner(ty, seen)),
            TypeData::Interface(methods) => methods
                .iter()
                .any(|m| self.has_invalid_inner(m.signature, seen)),
        }
    }

    // === Method Sets ===

    /// Look up `name` in the method set of `ty` and return its signature.
    ///
    /// The method set of a named type `T` holds its value-receiver methods;
    /// the method set of `*T` holds every method of `T`. Interface types
    /// (named or not) expose their listed methods.
    pub fn method(&self, ty: Idx, name: &str) -> Option<Idx> {
        match self.data(ty) {
            TypeData::Named(_) => {
                let def = self.named_def(ty)?;
                if let Some(m) = def.methods.iter().find(|m| m.name == name) {
                    return (!m.pointer_receiver).then_some(m.signature);
                }
                self.interface_method(def.underlying, name)
            }
            TypeData::Pointer(elem) => {
                let def = self.named_def(*elem)?;
                def.methods
                    .iter()
                    .find(|m| m.name == name)
                    .map(|m| m.signature)
            }
            TypeData::Interface(_) => self.interface_method(ty, name),
            _ => None,
        }
    }

    fn interface_method(&self, ty: Idx, name: &str) -> Option<Idx> {
        match self.data(ty) {
            TypeData::Interface(methods) => methods
                .iter()
                .find(|m| m.name == name)
                .map(|m| m.signature),
            _ => None,
        }
    }

    /// Whether the method set of `ty` has `name` with exactly this
    /// parameter and result list.
    pub fn has_method(&self, ty: Idx, name: &str, params: &[Idx], results: &[Idx]) -> bool {
        self.method(ty, name)
            .and_then(|sig| self.signature_parts(sig))
            .is_some_and(|(p, r, variadic)| !variadic && p == params && r == results)
    }

    /// Parameter list, result list and variadic flag of a signature.
    pub fn signature_parts(&self, sig: Idx) -> Option<(&[Idx], &[Idx], bool)> {
        match self.data(sig) {
            TypeData::Signature {
                params,
                results,
                variadic,
            } => Some((params, results, *variadic)),
            _ => None,
        }
    }

    /// Whether the zero value of `idx` is `nil`.
    pub fn is_nilable(&self, idx: Idx) -> bool {
        self.underlying_data(idx).is_nilable()
    }
}
