//! Type index handle.
//!
//! `Idx` is the canonical type representation used by every other crate.
//! Basic kinds are pre-interned at fixed indices, so `Idx::INT64` can be
//! used without a pool at hand.

use std::fmt;

use crate::BasicKind;

/// A 32-bit index into the type pool.
///
/// Types are compared by index equality. Because the pool interns
/// structural types, index equality is structural identity.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    // === Basic kinds (indices 0-18) ===
    pub const BOOL: Self = Self(0);
    pub const INT: Self = Self(1);
    pub const INT8: Self = Self(2);
    pub const INT16: Self = Self(3);
    pub const INT32: Self = Self(4);
    pub const INT64: Self = Self(5);
    pub const UINT: Self = Self(6);
    pub const UINT8: Self = Self(7);
    pub const UINT16: Self = Self(8);
    pub const UINT32: Self = Self(9);
    pub const UINT64: Self = Self(10);
    pub const UINTPTR: Self = Self(11);
    pub const FLOAT32: Self = Self(12);
    pub const FLOAT64: Self = Self(13);
    pub const COMPLEX64: Self = Self(14);
    pub const COMPLEX128: Self = Self(15);
    pub const STRING: Self = Self(16);
    pub const UNSAFE_POINTER: Self = Self(17);
    /// A type the front end could not resolve.
    pub const INVALID: Self = Self(18);

    /// Number of pre-interned basic kinds.
    pub const PRIMITIVE_COUNT: u32 = 19;

    /// Sentinel for "no type", e.g. a named type whose underlying type has
    /// not been attached yet.
    pub const NONE: Self = Self(u32::MAX);

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is one of the pre-interned basic kinds.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::PRIMITIVE_COUNT
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub const fn is_invalid(self) -> bool {
        self.0 == Self::INVALID.0
    }

    /// The basic kind at this index, if it is a primitive.
    pub fn basic_kind(self) -> Option<BasicKind> {
        BasicKind::ALL.get(self.index()).copied()
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return write!(f, "Idx::NONE");
        }
        match self.basic_kind() {
            Some(kind) => write!(f, "Idx::{}", kind.name()),
            None => write!(f, "Idx({})", self.0),
        }
    }
}

impl fmt::Display for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            return write!(f, "<none>");
        }
        match self.basic_kind() {
            Some(kind) => write!(f, "{}", kind.name()),
            None => write!(f, "type#{}", self.0),
        }
    }
}
