//! Loaded program, package and file representation.

use deriv_types::{Idx, Pool};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{Expr, ExprId, FuncSpec};

/// A type-checked program: one pool shared by every package.
#[derive(Clone, Debug)]
pub struct Program {
    pub pool: Pool,
    pub packages: Vec<Package>,
}

impl Program {
    pub fn package(&self, path: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.path == path)
    }
}

#[derive(Clone, Debug)]
pub struct Package {
    /// Import path.
    pub path: String,
    /// Declared package name.
    pub name: String,
    /// Hand-written source files. The generated artifact is never listed
    /// here.
    pub files: Vec<SourceFile>,
    /// Identifiers declared by hand-written code at package level.
    pub scope: FxHashSet<String>,
    /// The artifact found on load, if any.
    pub generated: Option<GeneratedFile>,
}

#[derive(Clone, Debug)]
pub struct SourceFile {
    pub name: String,
    pub exprs: Vec<Expr>,
    /// Static type of each expression; absent when the front end could not
    /// type it.
    pub types: FxHashMap<ExprId, Idx>,
}

impl SourceFile {
    #[inline]
    pub fn type_of(&self, id: ExprId) -> Option<Idx> {
        self.types.get(&id).copied()
    }
}

/// A previously generated artifact as seen by the front end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: String,
    pub text: String,
    pub decls: Vec<FuncSpec>,
}

/// Location of a call expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallLocation {
    pub package: String,
    pub file: String,
    pub expr: ExprId,
}

/// One generated file handed back to the front end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    /// Import path of the package the artifact belongs to.
    pub package: String,
    pub file_name: String,
    pub text: String,
    /// Signatures of the generated declarations, so the next load can type
    /// calls to them.
    pub decls: Vec<FuncSpec>,
}

impl Artifact {
    /// The artifact as the front end will present it on the next load.
    pub fn to_generated(&self) -> GeneratedFile {
        GeneratedFile {
            name: self.file_name.clone(),
            text: self.text.clone(),
            decls: self.decls.clone(),
        }
    }
}
