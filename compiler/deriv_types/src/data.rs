//! Type descriptor representation stored in the pool.
//!
//! `TypeData` is a closed union over the shapes the host language has.
//! Children are `Idx` handles, never boxed types, so `TypeData` is cheap to
//! hash and intern.

use crate::{BasicKind, Idx};

/// Index into the pool's named-type table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NamedId(pub(crate) u32);

impl NamedId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Channel direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChanDir {
    /// `chan T`
    Both,
    /// `chan<- T`
    Send,
    /// `<-chan T`
    Recv,
}

/// Visibility of a field or method.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Visible to every package.
    #[default]
    Public,
    /// Visible only inside the defining package.
    Private,
}

impl Visibility {
    /// Host visibility rule: exported iff the identifier starts upper case.
    pub fn of(name: &str) -> Visibility {
        match name.chars().next() {
            Some(c) if c.is_uppercase() => Visibility::Public,
            _ => Visibility::Private,
        }
    }

    #[inline]
    pub fn is_public(self) -> bool {
        self == Visibility::Public
    }
}

/// A struct field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Field {
    /// Field name. For embedded fields this is the type name.
    pub name: String,
    pub ty: Idx,
    pub embedded: bool,
    pub visibility: Visibility,
}

impl Field {
    /// Create a named field; visibility follows the name.
    pub fn new(name: impl Into<String>, ty: Idx) -> Self {
        let name = name.into();
        let visibility = Visibility::of(&name);
        Field {
            name,
            ty,
            embedded: false,
            visibility,
        }
    }

    /// Create an embedded field.
    pub fn embedded(name: impl Into<String>, ty: Idx) -> Self {
        Field {
            embedded: true,
            ..Field::new(name, ty)
        }
    }
}

/// A method declared on a named type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Method {
    pub name: String,
    /// A `TypeData::Signature` without the receiver.
    pub signature: Idx,
    /// Declared on `*T` rather than `T`.
    pub pointer_receiver: bool,
}

/// A method listed in an interface type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IfaceMethod {
    pub name: String,
    pub signature: Idx,
}

/// Type descriptor.
///
/// # Invariant
///
/// Every variant except `Named` is interned structurally: building the same
/// shape twice yields the same `Idx`. `Named` is interned by identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Basic(BasicKind),
    /// `*T`
    Pointer(Idx),
    /// A defined type; identity, underlying type and methods live in the
    /// pool's named table.
    Named(NamedId),
    /// `struct { ... }` with fields in declaration order.
    Struct(Box<[Field]>),
    /// `[]T`
    Slice(Idx),
    /// `[N]T`
    Array { len: u64, elem: Idx },
    /// `map[K]V`
    Map { key: Idx, value: Idx },
    /// `func(params) results`; when `variadic`, the last parameter is a
    /// slice type rendered as `...T`.
    Signature {
        params: Box<[Idx]>,
        results: Box<[Idx]>,
        variadic: bool,
    },
    /// Result list of a multi-valued expression.
    Tuple(Box<[Idx]>),
    Channel { dir: ChanDir, elem: Idx },
    /// Interface with methods sorted by name.
    Interface(Box<[IfaceMethod]>),
}

impl TypeData {
    /// Shapes whose zero value is `nil`.
    pub fn is_nilable(&self) -> bool {
        matches!(
            self,
            TypeData::Pointer(_)
                | TypeData::Slice(_)
                | TypeData::Map { .. }
                | TypeData::Signature { .. }
                | TypeData::Channel { .. }
                | TypeData::Interface(_)
        )
    }

    /// Human-readable shape name for diagnostics.
    pub fn shape_name(&self) -> &'static str {
        match self {
            TypeData::Basic(_) => "basic",
            TypeData::Pointer(_) => "pointer",
            TypeData::Named(_) => "named",
            TypeData::Struct(_) => "struct",
            TypeData::Slice(_) => "slice",
            TypeData::Array { .. } => "array",
            TypeData::Map { .. } => "map",
            TypeData::Signature { .. } => "function",
            TypeData::Tuple(_) => "tuple",
            TypeData::Channel { .. } => "channel",
            TypeData::Interface(_) => "interface",
        }
    }
}

/// A named type definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedDef {
    /// Import path of the defining package.
    pub package: String,
    pub name: String,
    /// `Idx::NONE` until attached with `Pool::set_underlying`.
    pub underlying: Idx,
    pub methods: Vec<Method>,
}
