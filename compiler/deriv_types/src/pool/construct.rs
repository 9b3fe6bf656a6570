//! Type construction helpers for the Pool.

use crate::{ChanDir, Field, IfaceMethod, Idx, Pool, TypeData};

impl Pool {
    // === Single-Child Constructors ===

    /// Create a pointer type `*elem`.
    pub fn pointer(&mut self, elem: Idx) -> Idx {
        self.intern(TypeData::Pointer(elem))
    }

    /// Create a slice type `[]elem`.
    pub fn slice(&mut self, elem: Idx) -> Idx {
        self.intern(TypeData::Slice(elem))
    }

    /// Create an array type `[len]elem`.
    pub fn array(&mut self, len: u64, elem: Idx) -> Idx {
        self.intern(TypeData::Array { len, elem })
    }

    /// Create a channel type.
    pub fn chan(&mut self, dir: ChanDir, elem: Idx) -> Idx {
        self.intern(TypeData::Channel { dir, elem })
    }

    // === Two-Child Constructors ===

    /// Create a map type `map[key]value`.
    pub fn map(&mut self, key: Idx, value: Idx) -> Idx {
        self.intern(TypeData::Map { key, value })
    }

    // === Function and Tuple Constructors ===

    /// Create a function signature type.
    ///
    /// For a variadic signature the last parameter must be a slice type.
    pub fn signature(&mut self, params: &[Idx], results: &[Idx], variadic: bool) -> Idx {
        self.intern(TypeData::Signature {
            params: params.into(),
            results: results.into(),
            variadic: variadic && !params.is_empty(),
        })
    }

    /// Create a tuple type for a multi-valued result list.
    pub fn tuple(&mut self, elems: &[Idx]) -> Idx {
        self.intern(TypeData::Tuple(elems.into()))
    }

    // === Record Constructors ===

    /// Create an anonymous struct type.
    pub fn structure(&mut self, fields: Vec<Field>) -> Idx {
        self.intern(TypeData::Struct(fields.into_boxed_slice()))
    }

    /// Create an interface type. Methods are sorted by name.
    pub fn interface(&mut self, mut methods: Vec<IfaceMethod>) -> Idx {
        methods.sort_by(|a, b| a.name.cmp(&b.name));
        methods.dedup_by(|a, b| a.name == b.name);
        self.intern(TypeData::Interface(methods.into_boxed_slice()))
    }

    /// The empty interface `interface{}`.
    pub fn empty_interface(&mut self) -> Idx {
        self.interface(Vec::new())
    }
}
