//! Set operations over slices, built on `deriveContains`.
//!
//! - `deriveUnion(this, that []T) []T` appends the items of `that` missing
//!   from `this`.
//! - `deriveIntersect(this, that []T) []T` keeps the items of `this` found
//!   in `that`.
//! - `deriveUnique(list []T) []T` removes duplicates in place, keeping the
//!   first occurrence.

use deriv_types::{Idx, Pool};

use super::{expect_arity, expect_pair, expect_slice, slice_elem};
use crate::plugin::support::{check_support, Capability};
use crate::plugin::{Dependency, Generator, Handles, Plugin, PluginDef};
use crate::DeriveError;

pub(super) const UNION: PluginDef = PluginDef {
    name: "union",
    depends_on: &["contains"],
    build: build_union,
};

pub(super) const INTERSECT: PluginDef = PluginDef {
    name: "intersect",
    depends_on: &["contains"],
    build: build_intersect,
};

pub(super) const UNIQUE: PluginDef = PluginDef {
    name: "unique",
    depends_on: &["contains"],
    build: build_unique,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Op {
    Union,
    Intersect,
    Unique,
}

fn build_union(handles: &Handles<'_>) -> Result<Box<dyn Plugin>, DeriveError> {
    build(handles, Op::Union)
}

fn build_intersect(handles: &Handles<'_>) -> Result<Box<dyn Plugin>, DeriveError> {
    build(handles, Op::Intersect)
}

fn build_unique(handles: &Handles<'_>) -> Result<Box<dyn Plugin>, DeriveError> {
    build(handles, Op::Unique)
}

fn build(handles: &Handles<'_>, op: Op) -> Result<Box<dyn Plugin>, DeriveError> {
    Ok(Box::new(SetOp {
        op,
        contains: handles.get("contains")?,
    }))
}

struct SetOp {
    op: Op,
    contains: Dependency,
}

impl SetOp {
    fn plugin(&self) -> &'static str {
        match self.op {
            Op::Union => UNION.name,
            Op::Intersect => INTERSECT.name,
            Op::Unique => UNIQUE.name,
        }
    }

    /// `deriveContains(list, item)` for lists of type `list_ty`.
    fn contains(&self, gen: &mut Generator<'_>, list_ty: Idx, list: &str, item: &str) -> String {
        let elem = slice_elem(gen.pool(), list_ty).unwrap_or(Idx::INVALID);
        let name = gen.func_name(self.contains, &[list_ty, elem]);
        format!("{name}({list}, {item})")
    }
}

impl Plugin for SetOp {
    fn name(&self) -> &'static str {
        self.plugin()
    }

    fn validate(&self, pool: &Pool, local: &str, args: &[Idx]) -> Result<(), DeriveError> {
        let plugin = self.plugin();
        let list = match self.op {
            Op::Union | Op::Intersect => expect_pair(plugin, pool, local, args)?,
            Op::Unique => {
                expect_arity(plugin, args, 1)?;
                args[0]
            }
        };
        let elem = expect_slice(plugin, pool, local, list)?;
        check_support(pool, local, plugin, Capability::Equal, elem)
    }

    fn results(&self, _pool: &mut Pool, sig: &[Idx]) -> Vec<Idx> {
        vec![sig[0]]
    }

    fn generate(&self, gen: &mut Generator<'_>, sig: &[Idx]) -> Result<(), DeriveError> {
        let list_ty = sig[0];
        let rendered = gen.ty(list_ty);
        match self.op {
            Op::Union => {
                gen.doc("returns the union of the two lists, appending the missing items of that to this.");
                gen.open(&format!("func {}(this, that {rendered}) {rendered} {{", gen.name()));
                gen.open("for _, v := range that {");
                let contains = self.contains(gen, list_ty, "this", "v");
                gen.guard(&format!("!{contains}"), "this = append(this, v)");
                gen.close("}");
                gen.line("return this");
            }
            Op::Intersect => {
                gen.doc("returns the items of this that are also in that.");
                gen.open(&format!("func {}(this, that {rendered}) {rendered} {{", gen.name()));
                gen.line(&format!("intersect := make({rendered}, 0, len(this))"));
                gen.open("for _, v := range this {");
                let contains = self.contains(gen, list_ty, "that", "v");
                gen.guard(&contains, "intersect = append(intersect, v)");
                gen.close("}");
                gen.line("return intersect");
            }
            Op::Unique => {
                gen.doc("returns the list without duplicates, reusing its storage.");
                gen.open(&format!("func {}(list {rendered}) {rendered} {{", gen.name()));
                gen.guard("len(list) == 0", "return list");
                gen.line("j := 1");
                gen.open("for i := 1; i < len(list); i++ {");
                let contains = self.contains(gen, list_ty, "list[:j]", "list[i]");
                gen.open(&format!("if !{contains} {{"));
                gen.guard("i != j", "list[j] = list[i]");
                gen.line("j++");
                gen.close("}");
                gen.close("}");
                gen.line("return list[:j]");
            }
        }
        gen.close("}");
        Ok(())
    }
}
