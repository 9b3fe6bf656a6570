//! `deriveContains(list []T, item T) bool`

use deriv_types::{Idx, Pool};

use super::{equal_expr, expect_list_and_item, slice_elem};
use crate::plugin::support::{check_support, Capability};
use crate::plugin::{Dependency, Generator, Handles, Plugin, PluginDef};
use crate::DeriveError;

pub(super) const DEF: PluginDef = PluginDef {
    name: "contains",
    depends_on: &["equal"],
    build,
};

fn build(handles: &Handles<'_>) -> Result<Box<dyn Plugin>, DeriveError> {
    Ok(Box::new(Contains {
        equal: handles.get("equal")?,
    }))
}

struct Contains {
    equal: Dependency,
}

impl Plugin for Contains {
    fn name(&self) -> &'static str {
        DEF.name
    }

    fn validate(&self, pool: &Pool, local: &str, args: &[Idx]) -> Result<(), DeriveError> {
        let elem = expect_list_and_item(DEF.name, pool, local, args)?;
        check_support(pool, local, DEF.name, Capability::Equal, elem)
    }

    fn results(&self, _pool: &mut Pool, _sig: &[Idx]) -> Vec<Idx> {
        vec![Idx::BOOL]
    }

    fn generate(&self, gen: &mut Generator<'_>, sig: &[Idx]) -> Result<(), DeriveError> {
        let elem = slice_elem(gen.pool(), sig[0]).unwrap_or(Idx::INVALID);
        let list = gen.ty(sig[0]);
        let item = gen.ty(sig[1]);
        gen.doc("returns whether the item is contained in the list.");
        gen.open(&format!("func {}(list {list}, item {item}) bool {{", gen.name()));
        gen.open("for _, v := range list {");
        let eq = equal_expr(gen, self.equal, elem, "v", "item");
        gen.guard(&eq, "return true");
        gen.close("}");
        gen.line("return false");
        gen.close("}");
        Ok(())
    }
}
