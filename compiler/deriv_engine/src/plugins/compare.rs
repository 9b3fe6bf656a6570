//! `deriveCompare(this, that T) int`
//!
//! Returns -1, 0 or 1. Every supported shape is totally ordered:
//!
//! - `false < true`; numbers and strings by `<`; complex numbers by real
//!   part, then imaginary part.
//! - `nil` sorts before any non-nil pointer, slice or map.
//! - Structs compare field by field in declaration order.
//! - Slices and maps: the shorter one first; slices and arrays then
//!   elementwise.
//! - Maps of equal length walk both key sets in sorted order. At each
//!   position the keys are compared first and the values break ties.

use deriv_types::{BasicKind, Idx, Pool, TypeData};

use super::{basic_of, compare_expr, expect_pair};
use crate::plugin::support::{check_support, Capability};
use crate::plugin::{Dependency, Generator, Handles, Plugin, PluginDef};
use crate::DeriveError;

pub(super) const DEF: PluginDef = PluginDef {
    name: "compare",
    depends_on: &["keys", "sort"],
    build,
};

fn build(handles: &Handles<'_>) -> Result<Box<dyn Plugin>, DeriveError> {
    Ok(Box::new(Compare {
        this: handles.this(),
        keys: handles.get("keys")?,
        sort: handles.get("sort")?,
    }))
}

struct Compare {
    this: Dependency,
    keys: Dependency,
    sort: Dependency,
}

impl Plugin for Compare {
    fn name(&self) -> &'static str {
        DEF.name
    }

    fn validate(&self, pool: &Pool, local: &str, args: &[Idx]) -> Result<(), DeriveError> {
        let ty = expect_pair(DEF.name, pool, local, args)?;
        check_support(pool, local, DEF.name, Capability::Compare, ty)
    }

    fn results(&self, _pool: &mut Pool, _sig: &[Idx]) -> Vec<Idx> {
        vec![Idx::INT]
    }

    fn generate(&self, gen: &mut Generator<'_>, sig: &[Idx]) -> Result<(), DeriveError> {
        let ty = sig[0];
        let rendered = gen.ty(ty);
        gen.doc("returns -1 if this is less than that, 1 if it is greater and 0 if both are equal.");
        gen.open(&format!("func {}(this, that {rendered}) int {{", gen.name()));
        self.body(gen, ty);
        gen.close("}");
        Ok(())
    }
}

impl Compare {
    fn body(&self, gen: &mut Generator<'_>, ty: Idx) {
        if gen.has_capability(ty, Capability::Compare) {
            gen.line("return this.Compare(that)");
            return;
        }
        let under = gen.pool().underlying_data(ty).clone();
        match under {
            TypeData::Basic(kind) => self.basic(gen, kind),
            TypeData::Pointer(elem) => {
                nil_first(gen);
                let c = compare_expr(gen, self.this, elem, "*this", "*that");
                gen.line(&format!("return {c}"));
            }
            TypeData::Struct(fields) => {
                for field in fields.iter() {
                    let a = format!("this.{}", field.name);
                    let b = format!("that.{}", field.name);
                    let c = compare_expr(gen, self.this, field.ty, &a, &b);
                    first_difference(gen, &c);
                }
                gen.line("return 0");
            }
            TypeData::Slice(elem) => {
                nil_first(gen);
                shorter_first(gen);
                self.index_loop(gen, elem);
            }
            TypeData::Array { elem, .. } => self.index_loop(gen, elem),
            TypeData::Map { key, value } => {
                nil_first(gen);
                shorter_first(gen);
                let keys = gen.func_name(self.keys, &[ty]);
                let key_slice = gen.pool_mut().slice(key);
                let sort = gen.func_name(self.sort, &[key_slice]);
                gen.line(&format!("thisKeys := {sort}({keys}(this))"));
                gen.line(&format!("thatKeys := {sort}({keys}(that))"));
                gen.open("for i, thisKey := range thisKeys {");
                gen.line("thatKey := thatKeys[i]");
                let c = compare_expr(gen, self.this, key, "thisKey", "thatKey");
                first_difference(gen, &c);
                let c = compare_expr(gen, self.this, value, "this[thisKey]", "that[thatKey]");
                first_difference(gen, &c);
                gen.close("}");
                gen.line("return 0");
            }
            // Rejected when the call was added.
            TypeData::Named(_)
            | TypeData::Signature { .. }
            | TypeData::Tuple(_)
            | TypeData::Channel { .. }
            | TypeData::Interface(_) => gen.line("return 0"),
        }
    }

    fn basic(&self, gen: &mut Generator<'_>, kind: BasicKind) {
        match kind {
            BasicKind::Bool => {
                gen.guard("this == that", "return 0");
                gen.guard("!this", "return -1");
                gen.line("return 1");
            }
            BasicKind::Complex64 | BasicKind::Complex128 => {
                let part = if kind == BasicKind::Complex64 {
                    Idx::FLOAT32
                } else {
                    Idx::FLOAT64
                };
                let c = gen.own_name(&[part, part]);
                first_difference(gen, &format!("{c}(real(this), real(that))"));
                gen.line(&format!("return {c}(imag(this), imag(that))"));
            }
            _ => {
                gen.guard("this < that", "return -1");
                gen.guard("this > that", "return 1");
                gen.line("return 0");
            }
        }
    }

    fn index_loop(&self, gen: &mut Generator<'_>, elem: Idx) {
        gen.open("for i := 0; i < len(this); i++ {");
        let c = compare_expr(gen, self.this, elem, "this[i]", "that[i]");
        first_difference(gen, &c);
        gen.close("}");
        gen.line("return 0");
    }
}

/// `nil` sorts first.
fn nil_first(gen: &mut Generator<'_>) {
    gen.open("if this == nil {");
    gen.guard("that == nil", "return 0");
    gen.line("return -1");
    gen.close("}");
    gen.guard("that == nil", "return 1");
}

fn shorter_first(gen: &mut Generator<'_>) {
    gen.open("if len(this) != len(that) {");
    gen.guard("len(this) < len(that)", "return -1");
    gen.line("return 1");
    gen.close("}");
}

/// Return `c` when it is not zero.
fn first_difference(gen: &mut Generator<'_>, c: &str) {
    gen.guard(&format!("c := {c}; c != 0"), "return c");
}

/// Whether `ty` orders with `<` directly.
pub(super) fn is_ordered(pool: &Pool, ty: Idx) -> bool {
    basic_of(pool, ty).is_some_and(BasicKind::is_ordered)
}
