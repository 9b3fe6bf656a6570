//! `deriveSort(list []T) []T`

use deriv_types::{Idx, Pool};

use super::compare::is_ordered;
use super::{compare_expr, expect_arity, expect_slice, slice_elem};
use crate::plugin::support::{check_support, Capability};
use crate::plugin::{Dependency, Generator, Handles, Plugin, PluginDef};
use crate::DeriveError;

pub(super) const DEF: PluginDef = PluginDef {
    name: "sort",
    depends_on: &["compare"],
    build,
};

fn build(handles: &Handles<'_>) -> Result<Box<dyn Plugin>, DeriveError> {
    Ok(Box::new(Sort {
        compare: handles.get("compare")?,
    }))
}

struct Sort {
    compare: Dependency,
}

impl Plugin for Sort {
    fn name(&self) -> &'static str {
        DEF.name
    }

    fn validate(&self, pool: &Pool, local: &str, args: &[Idx]) -> Result<(), DeriveError> {
        expect_arity(DEF.name, args, 1)?;
        let elem = expect_slice(DEF.name, pool, local, args[0])?;
        if is_ordered(pool, elem) {
            return Ok(());
        }
        check_support(pool, local, DEF.name, Capability::Compare, elem)
    }

    fn results(&self, _pool: &mut Pool, sig: &[Idx]) -> Vec<Idx> {
        vec![sig[0]]
    }

    fn generate(&self, gen: &mut Generator<'_>, sig: &[Idx]) -> Result<(), DeriveError> {
        let ty = sig[0];
        let elem = slice_elem(gen.pool(), ty).unwrap_or(Idx::INVALID);
        let rendered = gen.ty(ty);
        gen.doc("sorts the slice in place and also returns the sorted slice.");
        gen.open(&format!("func {}(list {rendered}) {rendered} {{", gen.name()));
        gen.import("sort");

        // The typed helpers of package sort take the unnamed slice types only.
        let helper = [
            (Idx::INT, "sort.Ints"),
            (Idx::STRING, "sort.Strings"),
            (Idx::FLOAT64, "sort.Float64s"),
        ]
        .into_iter()
        .find(|&(basic, _)| gen.pool_mut().slice(basic) == ty)
        .map(|(_, helper)| helper);

        if let Some(helper) = helper {
            gen.line(&format!("{helper}(list)"));
        } else if is_ordered(gen.pool(), elem) {
            gen.open("sort.Slice(list, func(i, j int) bool {");
            gen.line("return list[i] < list[j]");
            gen.close("})");
        } else {
            gen.open("sort.Slice(list, func(i, j int) bool {");
            let c = compare_expr(gen, self.compare, elem, "list[i]", "list[j]");
            gen.line(&format!("return {c} < 0"));
            gen.close("})");
        }
        gen.line("return list");
        gen.close("}");
        Ok(())
    }
}
