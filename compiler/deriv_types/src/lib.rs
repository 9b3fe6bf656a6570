//! Type descriptor model for deriv.
//!
//! Every type the engine reasons about lives in a [`Pool`] and is referred to
//! by an [`Idx`]. The pool interns structural types, so two descriptors are
//! identical exactly when their indices are equal.
//!
//! # Named types
//!
//! Named (defined) types are interned by identity (package path + name).
//! Their underlying type and method set are attached after creation, which
//! is what makes self-referential types such as
//! `type List struct { next *List }` representable.
//!
//! # Layout
//!
//! - `idx`: the handle type and the pre-interned basic kinds
//! - `data`: the closed `TypeData` union
//! - `pool`: interning, construction, rendering
//! - `relate`: identity, assignability, comparability, method sets
//! - `classify`: plain/deep/opaque value classification
//! - `naming`: identifier fragments derived from types

mod basic;
mod classify;
mod data;
mod idx;
mod naming;
mod pool;
mod relate;

pub use basic::BasicKind;
pub use classify::{ValueClass, ValueClassifier};
pub use data::{ChanDir, Field, IfaceMethod, Method, NamedDef, NamedId, TypeData, Visibility};
pub use idx::Idx;
pub use pool::Pool;

// Idx is copied into every signature and cache key.
const _: () = assert!(std::mem::size_of::<Idx>() == 4);
