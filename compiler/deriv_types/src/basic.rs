//! Basic (predeclared) type kinds.

use crate::Idx;

/// Kind of a predeclared scalar type.
///
/// The declaration order is the pre-interning order: `BasicKind::ALL[i]`
/// lives at `Idx::from_raw(i)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BasicKind {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    UnsafePointer,
    /// Unresolved or erroneous type.
    Invalid,
}

impl BasicKind {
    /// All kinds in pre-interning order.
    pub const ALL: [BasicKind; 19] = [
        BasicKind::Bool,
        BasicKind::Int,
        BasicKind::Int8,
        BasicKind::Int16,
        BasicKind::Int32,
        BasicKind::Int64,
        BasicKind::Uint,
        BasicKind::Uint8,
        BasicKind::Uint16,
        BasicKind::Uint32,
        BasicKind::Uint64,
        BasicKind::Uintptr,
        BasicKind::Float32,
        BasicKind::Float64,
        BasicKind::Complex64,
        BasicKind::Complex128,
        BasicKind::String,
        BasicKind::UnsafePointer,
        BasicKind::Invalid,
    ];

    /// The fixed pool index of this kind.
    pub const fn idx(self) -> Idx {
        Idx::from_raw(self as u32)
    }

    /// Source spelling of the kind.
    pub fn name(self) -> &'static str {
        match self {
            BasicKind::Bool => "bool",
            BasicKind::Int => "int",
            BasicKind::Int8 => "int8",
            BasicKind::Int16 => "int16",
            BasicKind::Int32 => "int32",
            BasicKind::Int64 => "int64",
            BasicKind::Uint => "uint",
            BasicKind::Uint8 => "uint8",
            BasicKind::Uint16 => "uint16",
            BasicKind::Uint32 => "uint32",
            BasicKind::Uint64 => "uint64",
            BasicKind::Uintptr => "uintptr",
            BasicKind::Float32 => "float32",
            BasicKind::Float64 => "float64",
            BasicKind::Complex64 => "complex64",
            BasicKind::Complex128 => "complex128",
            BasicKind::String => "string",
            BasicKind::UnsafePointer => "unsafe.Pointer",
            BasicKind::Invalid => "invalid type",
        }
    }

    /// Parse a source spelling. Accepts the `byte` and `rune` aliases.
    pub fn from_name(s: &str) -> Option<BasicKind> {
        let kind = match s {
            "bool" => BasicKind::Bool,
            "int" => BasicKind::Int,
            "int8" => BasicKind::Int8,
            "int16" => BasicKind::Int16,
            "int32" | "rune" => BasicKind::Int32,
            "int64" => BasicKind::Int64,
            "uint" => BasicKind::Uint,
            "uint8" | "byte" => BasicKind::Uint8,
            "uint16" => BasicKind::Uint16,
            "uint32" => BasicKind::Uint32,
            "uint64" => BasicKind::Uint64,
            "uintptr" => BasicKind::Uintptr,
            "float32" => BasicKind::Float32,
            "float64" => BasicKind::Float64,
            "complex64" => BasicKind::Complex64,
            "complex128" => BasicKind::Complex128,
            "string" => BasicKind::String,
            "unsafe.Pointer" => BasicKind::UnsafePointer,
            _ => return None,
        };
        Some(kind)
    }

    /// Identifier fragment used when naming generated functions.
    pub fn fragment(self) -> &'static str {
        match self {
            BasicKind::Bool => "Bool",
            BasicKind::Int => "Int",
            BasicKind::Int8 => "Int8",
            BasicKind::Int16 => "Int16",
            BasicKind::Int32 => "Int32",
            BasicKind::Int64 => "Int64",
            BasicKind::Uint => "Uint",
            BasicKind::Uint8 => "Uint8",
            BasicKind::Uint16 => "Uint16",
            BasicKind::Uint32 => "Uint32",
            BasicKind::Uint64 => "Uint64",
            BasicKind::Uintptr => "Uintptr",
            BasicKind::Float32 => "Float32",
            BasicKind::Float64 => "Float64",
            BasicKind::Complex64 => "Complex64",
            BasicKind::Complex128 => "Complex128",
            BasicKind::String => "String",
            BasicKind::UnsafePointer => "UnsafePointer",
            BasicKind::Invalid => "Invalid",
        }
    }

    #[inline]
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            BasicKind::Int
                | BasicKind::Int8
                | BasicKind::Int16
                | BasicKind::Int32
                | BasicKind::Int64
                | BasicKind::Uint
                | BasicKind::Uint8
                | BasicKind::Uint16
                | BasicKind::Uint32
                | BasicKind::Uint64
                | BasicKind::Uintptr
        )
    }

    #[inline]
    pub fn is_float(self) -> bool {
        matches!(self, BasicKind::Float32 | BasicKind::Float64)
    }

    #[inline]
    pub fn is_complex(self) -> bool {
        matches!(self, BasicKind::Complex64 | BasicKind::Complex128)
    }

    /// Kinds supporting `<`: integers, floats and strings.
    #[inline]
    pub fn is_ordered(self) -> bool {
        self.is_integer() || self.is_float() || self == BasicKind::String
    }
}
