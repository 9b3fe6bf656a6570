//! `deriveClone(src T) T`

use deriv_types::{Idx, Pool, TypeData};

use super::{clone_expr, expect_arity};
use crate::plugin::support::{check_support, Capability};
use crate::plugin::{Dependency, Generator, Handles, Plugin, PluginDef};
use crate::DeriveError;

pub(super) const DEF: PluginDef = PluginDef {
    name: "clone",
    depends_on: &[],
    build,
};

fn build(handles: &Handles<'_>) -> Result<Box<dyn Plugin>, DeriveError> {
    Ok(Box::new(DeepClone {
        this: handles.this(),
    }))
}

struct DeepClone {
    this: Dependency,
}

impl Plugin for DeepClone {
    fn name(&self) -> &'static str {
        DEF.name
    }

    fn validate(&self, pool: &Pool, local: &str, args: &[Idx]) -> Result<(), DeriveError> {
        expect_arity(DEF.name, args, 1)?;
        check_support(pool, local, DEF.name, Capability::Clone, args[0])
    }

    fn results(&self, _pool: &mut Pool, sig: &[Idx]) -> Vec<Idx> {
        vec![sig[0]]
    }

    fn generate(&self, gen: &mut Generator<'_>, sig: &[Idx]) -> Result<(), DeriveError> {
        let ty = sig[0];
        let rendered = gen.ty(ty);
        gen.doc("returns a clone of the src parameter.");
        gen.open(&format!("func {}(src {rendered}) {rendered} {{", gen.name()));
        self.body(gen, ty, &rendered);
        gen.close("}");
        Ok(())
    }
}

impl DeepClone {
    fn body(&self, gen: &mut Generator<'_>, ty: Idx, rendered: &str) {
        if gen.has_capability(ty, Capability::Clone) {
            gen.line("return src.Clone()");
            return;
        }
        if gen.is_plain(ty) {
            gen.line("return src");
            return;
        }
        let under = gen.pool().underlying_data(ty).clone();
        match under {
            TypeData::Pointer(elem) => {
                gen.guard("src == nil", "return nil");
                let elem_ty = gen.ty(elem);
                gen.line(&format!("dst := new({elem_ty})"));
                let value = clone_expr(gen, self.this, elem, "*src");
                gen.line(&format!("*dst = {value}"));
                gen.line("return dst");
            }
            TypeData::Struct(fields) => {
                gen.line("dst := src");
                for field in fields.iter() {
                    if gen.is_plain(field.ty) {
                        continue;
                    }
                    let value = clone_expr(gen, self.this, field.ty, &format!("src.{}", field.name));
                    gen.line(&format!("dst.{} = {value}", field.name));
                }
                gen.line("return dst");
            }
            TypeData::Slice(elem) => {
                gen.guard("src == nil", "return nil");
                gen.line(&format!("dst := make({rendered}, len(src))"));
                if gen.is_plain(elem) {
                    gen.line("copy(dst, src)");
                } else {
                    gen.open("for i, v := range src {");
                    let value = clone_expr(gen, self.this, elem, "v");
                    gen.line(&format!("dst[i] = {value}"));
                    gen.close("}");
                }
                gen.line("return dst");
            }
            TypeData::Array { elem, .. } => {
                gen.line(&format!("var dst {rendered}"));
                gen.open("for i := range src {");
                let value = clone_expr(gen, self.this, elem, "src[i]");
                gen.line(&format!("dst[i] = {value}"));
                gen.close("}");
                gen.line("return dst");
            }
            TypeData::Map { value, .. } => {
                gen.guard("src == nil", "return nil");
                gen.line(&format!("dst := make({rendered}, len(src))"));
                gen.open("for k, v := range src {");
                if !gen.is_plain(value) && gen.pool().is_nilable(value) {
                    gen.open("if v == nil {");
                    gen.line("dst[k] = nil");
                    gen.line("continue");
                    gen.close("}");
                }
                let cloned = clone_expr(gen, self.this, value, "v");
                gen.line(&format!("dst[k] = {cloned}"));
                gen.close("}");
                gen.line("return dst");
            }
            // Plain or rejected when the call was added.
            TypeData::Basic(_)
            | TypeData::Named(_)
            | TypeData::Signature { .. }
            | TypeData::Tuple(_)
            | TypeData::Channel { .. }
            | TypeData::Interface(_) => gen.line("return src"),
        }
    }
}
