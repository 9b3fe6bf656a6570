//! `deriveMin` and `deriveMax`.
//!
//! Two forms share one plugin each: pairwise `(a, b T) T` and over a list
//! `(list []T, def T) T`, where `def` is returned for an empty list.

use deriv_types::{Idx, Pool};

use super::compare::is_ordered;
use super::{compare_expr, expect_arity, slice_elem};
use crate::plugin::support::{check_support, Capability};
use crate::plugin::{Dependency, Generator, Handles, Plugin, PluginDef};
use crate::DeriveError;

pub(super) const MIN: PluginDef = PluginDef {
    name: "min",
    depends_on: &["compare"],
    build: build_min,
};

pub(super) const MAX: PluginDef = PluginDef {
    name: "max",
    depends_on: &["compare"],
    build: build_max,
};

fn build_min(handles: &Handles<'_>) -> Result<Box<dyn Plugin>, DeriveError> {
    Ok(Box::new(Extremum {
        def: &MIN,
        compare: handles.get("compare")?,
    }))
}

fn build_max(handles: &Handles<'_>) -> Result<Box<dyn Plugin>, DeriveError> {
    Ok(Box::new(Extremum {
        def: &MAX,
        compare: handles.get("compare")?,
    }))
}

struct Extremum {
    def: &'static PluginDef,
    compare: Dependency,
}

impl Extremum {
    fn is_min(&self) -> bool {
        self.def.name == MIN.name
    }

    /// Element type and whether the list form is used.
    fn shape(pool: &Pool, sig: &[Idx]) -> Option<(Idx, bool)> {
        match sig {
            [a, b] if a == b => Some((*a, false)),
            [list, def] if slice_elem(pool, *list) == Some(*def) => Some((*def, true)),
            _ => None,
        }
    }

    /// Condition under which `candidate` replaces `current`.
    fn better(&self, gen: &mut Generator<'_>, elem: Idx, candidate: &str, current: &str) -> String {
        let op = if self.is_min() { "<" } else { ">" };
        if is_ordered(gen.pool(), elem) {
            format!("{candidate} {op} {current}")
        } else {
            let c = compare_expr(gen, self.compare, elem, candidate, current);
            format!("{c} {op} 0")
        }
    }
}

impl Plugin for Extremum {
    fn name(&self) -> &'static str {
        self.def.name
    }

    fn validate(&self, pool: &Pool, local: &str, args: &[Idx]) -> Result<(), DeriveError> {
        expect_arity(self.def.name, args, 2)?;
        let Some((elem, _)) = Self::shape(pool, args) else {
            return Err(DeriveError::mismatch(
                self.def.name,
                format!(
                    "expected (T, T) or ([]T, T), got ({}, {})",
                    pool.format_type(args[0], local),
                    pool.format_type(args[1], local)
                ),
            ));
        };
        if is_ordered(pool, elem) {
            return Ok(());
        }
        check_support(pool, local, self.def.name, Capability::Compare, elem)
    }

    fn results(&self, pool: &mut Pool, sig: &[Idx]) -> Vec<Idx> {
        vec![Self::shape(pool, sig).map_or(Idx::INVALID, |(elem, _)| elem)]
    }

    fn generate(&self, gen: &mut Generator<'_>, sig: &[Idx]) -> Result<(), DeriveError> {
        let Some((elem, list)) = Self::shape(gen.pool(), sig) else {
            return Err(DeriveError::mismatch(self.def.name, "signature changed after validation"));
        };
        let word = if self.is_min() { "minimum" } else { "maximum" };
        let elem_ty = gen.ty(elem);
        if list {
            let list_ty = gen.ty(sig[0]);
            gen.doc(&format!(
                "returns the {word} value of the list, or def if the list is empty."
            ));
            gen.open(&format!(
                "func {}(list {list_ty}, def {elem_ty}) {elem_ty} {{",
                gen.name()
            ));
            gen.guard("len(list) == 0", "return def");
            gen.line("m := list[0]");
            gen.open("for _, v := range list[1:] {");
            let cond = self.better(gen, elem, "v", "m");
            gen.guard(&cond, "m = v");
            gen.close("}");
            gen.line("return m");
        } else {
            gen.doc(&format!("returns the {word} of the two input values."));
            gen.open(&format!("func {}(a, b {elem_ty}) {elem_ty} {{", gen.name()));
            let cond = self.better(gen, elem, "a", "b");
            gen.guard(&cond, "return a");
            gen.line("return b");
        }
        gen.close("}");
        Ok(())
    }
}
