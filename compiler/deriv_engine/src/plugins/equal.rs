//! `deriveEqual(this, that T) bool`

use deriv_types::{Idx, Pool, TypeData};

use super::{equal_expr, expect_pair, not_equal_expr};
use crate::plugin::support::{check_support, Capability};
use crate::plugin::{Dependency, Generator, Handles, Plugin, PluginDef};
use crate::DeriveError;

pub(super) const DEF: PluginDef = PluginDef {
    name: "equal",
    depends_on: &[],
    build,
};

fn build(handles: &Handles<'_>) -> Result<Box<dyn Plugin>, DeriveError> {
    Ok(Box::new(Equal {
        this: handles.this(),
    }))
}

struct Equal {
    this: Dependency,
}

impl Plugin for Equal {
    fn name(&self) -> &'static str {
        DEF.name
    }

    fn validate(&self, pool: &Pool, local: &str, args: &[Idx]) -> Result<(), DeriveError> {
        let ty = expect_pair(DEF.name, pool, local, args)?;
        check_support(pool, local, DEF.name, Capability::Equal, ty)
    }

    fn results(&self, _pool: &mut Pool, _sig: &[Idx]) -> Vec<Idx> {
        vec![Idx::BOOL]
    }

    fn generate(&self, gen: &mut Generator<'_>, sig: &[Idx]) -> Result<(), DeriveError> {
        let ty = sig[0];
        let rendered = gen.ty(ty);
        gen.doc("returns whether this and that are equal.");
        gen.open(&format!("func {}(this, that {rendered}) bool {{", gen.name()));
        self.body(gen, ty);
        gen.close("}");
        Ok(())
    }
}

impl Equal {
    fn body(&self, gen: &mut Generator<'_>, ty: Idx) {
        if gen.has_capability(ty, Capability::Equal) {
            gen.line("return this.Equal(that)");
            return;
        }
        if gen.is_plain(ty) {
            gen.line("return this == that");
            return;
        }
        let under = gen.pool().underlying_data(ty).clone();
        match under {
            TypeData::Pointer(elem) => {
                nil_guard(gen);
                let elem_struct = match gen.pool().underlying_data(elem) {
                    TypeData::Struct(fields) => Some(fields.clone()),
                    _ => None,
                };
                match elem_struct {
                    // Hidden fields of a foreign plain struct compare as a whole.
                    Some(fields)
                        if !gen.has_capability(elem, Capability::Equal)
                            && gen.fields_visible(elem) =>
                    {
                        self.fields(gen, &fields);
                    }
                    _ => {
                        let eq = equal_expr(gen, self.this, elem, "*this", "*that");
                        gen.line(&format!("return {eq}"));
                    }
                }
            }
            TypeData::Struct(fields) => self.fields(gen, &fields),
            TypeData::Slice(elem) => {
                nil_guard(gen);
                gen.guard("len(this) != len(that)", "return false");
                self.index_loop(gen, elem);
            }
            TypeData::Array { elem, .. } => self.index_loop(gen, elem),
            TypeData::Map { value, .. } => {
                nil_guard(gen);
                gen.guard("len(this) != len(that)", "return false");
                gen.open("for k, v := range this {");
                gen.line("thatv, ok := that[k]");
                gen.guard("!ok", "return false");
                let ne = not_equal_expr(gen, self.this, value, "v", "thatv");
                gen.guard(&ne, "return false");
                gen.close("}");
                gen.line("return true");
            }
            // Plain or rejected when the call was added.
            TypeData::Basic(_)
            | TypeData::Named(_)
            | TypeData::Signature { .. }
            | TypeData::Tuple(_)
            | TypeData::Channel { .. }
            | TypeData::Interface(_) => gen.line("return this == that"),
        }
    }

    /// Field-by-field comparison; the first mismatch decides.
    fn fields(&self, gen: &mut Generator<'_>, fields: &[deriv_types::Field]) {
        for field in fields {
            let a = format!("this.{}", field.name);
            let b = format!("that.{}", field.name);
            let ne = not_equal_expr(gen, self.this, field.ty, &a, &b);
            gen.guard(&ne, "return false");
        }
        gen.line("return true");
    }

    fn index_loop(&self, gen: &mut Generator<'_>, elem: Idx) {
        gen.open("for i := 0; i < len(this); i++ {");
        let ne = not_equal_expr(gen, self.this, elem, "this[i]", "that[i]");
        gen.guard(&ne, "return false");
        gen.close("}");
        gen.line("return true");
    }
}

/// Both nil is equal, one nil is not.
fn nil_guard(gen: &mut Generator<'_>) {
    gen.guard("this == nil || that == nil", "return this == nil && that == nil");
}

