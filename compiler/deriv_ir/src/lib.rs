//! Program representation for deriv.
//!
//! The engine never parses or type-checks host source. It consumes a
//! [`Program`]: packages of source files whose expression trees come with a
//! table mapping each expression to its static type in the program's
//! [`Pool`](deriv_types::Pool).
//!
//! Programs reach the engine through a [`Frontend`]. This crate ships the
//! serializable [`ProgramSpec`] schema, the lowering that type-checks a
//! schema into a `Program`, and [`MemoryFrontend`], which serves a schema
//! from memory and records what the engine writes back.

mod error;
mod expr;
mod frontend;
mod lower;
mod memory;
mod program;
mod schema;

pub use error::FrontendError;
pub use expr::{CalleeKind, Expr, ExprId, ExprKind};
pub use frontend::Frontend;
pub use lower::{lower, BUILTINS};
pub use memory::MemoryFrontend;
pub use program::{Artifact, CallLocation, GeneratedFile, Package, Program, SourceFile};
pub use schema::{
    export_type, ChanDirSpec, ExprSpec, FieldSpec, FileSpec, FuncSpec, IfaceMethodSpec,
    MethodSpec, PackageSpec, ProgramSpec, TypeDeclSpec, TypeExpr,
};
