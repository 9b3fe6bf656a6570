//! `deriveHash(object T) uint64`
//!
//! Consistent with equality: values that `deriveEqual` accepts as equal
//! hash identically. Parts are folded as `h = 31*h + part` from a seed of
//! 17; `nil` hashes to 0. Map keys are visited in sorted order so the
//! insertion order of a map never shows in its hash.

use deriv_types::{BasicKind, Idx, Pool, TypeData};

use super::{expect_arity, hash_expr};
use crate::plugin::support::{check_support, Capability};
use crate::plugin::{Dependency, Generator, Handles, Plugin, PluginDef};
use crate::DeriveError;

pub(super) const DEF: PluginDef = PluginDef {
    name: "hash",
    depends_on: &["keys", "sort"],
    build,
};

fn build(handles: &Handles<'_>) -> Result<Box<dyn Plugin>, DeriveError> {
    Ok(Box::new(Hash {
        this: handles.this(),
        keys: handles.get("keys")?,
        sort: handles.get("sort")?,
    }))
}

struct Hash {
    this: Dependency,
    keys: Dependency,
    sort: Dependency,
}

impl Plugin for Hash {
    fn name(&self) -> &'static str {
        DEF.name
    }

    fn validate(&self, pool: &Pool, local: &str, args: &[Idx]) -> Result<(), DeriveError> {
        expect_arity(DEF.name, args, 1)?;
        check_support(pool, local, DEF.name, Capability::Hash, args[0])
    }

    fn results(&self, _pool: &mut Pool, _sig: &[Idx]) -> Vec<Idx> {
        vec![Idx::UINT64]
    }

    fn generate(&self, gen: &mut Generator<'_>, sig: &[Idx]) -> Result<(), DeriveError> {
        let ty = sig[0];
        let rendered = gen.ty(ty);
        gen.doc("returns the hash of the object.");
        gen.open(&format!("func {}(object {rendered}) uint64 {{", gen.name()));
        self.body(gen, ty);
        gen.close("}");
        Ok(())
    }
}

impl Hash {
    fn body(&self, gen: &mut Generator<'_>, ty: Idx) {
        if gen.has_capability(ty, Capability::Hash) {
            gen.line("return object.Hash()");
            return;
        }
        let under = gen.pool().underlying_data(ty).clone();
        match under {
            TypeData::Basic(kind) => self.basic(gen, kind),
            TypeData::Pointer(elem) => {
                gen.guard("object == nil", "return 0");
                let fields = match gen.pool().underlying_data(elem) {
                    TypeData::Struct(fields)
                        if !gen.has_capability(elem, Capability::Hash)
                            && gen.fields_visible(elem) =>
                    {
                        Some(fields.clone())
                    }
                    _ => None,
                };
                match fields {
                    Some(fields) => self.fields(gen, &fields),
                    None => {
                        let h = hash_expr(gen, self.this, elem, "*object");
                        gen.line(&format!("return {h}"));
                    }
                }
            }
            TypeData::Struct(fields) => self.fields(gen, &fields),
            TypeData::Slice(elem) => {
                gen.guard("object == nil", "return 0");
                self.range(gen, elem);
            }
            TypeData::Array { elem, .. } => self.range(gen, elem),
            TypeData::Map { key, value } => {
                gen.guard("object == nil", "return 0");
                let keys = gen.func_name(self.keys, &[ty]);
                let key_slice = gen.pool_mut().slice(key);
                let sort = gen.func_name(self.sort, &[key_slice]);
                gen.line("h := uint64(17)");
                gen.open(&format!("for _, k := range {sort}({keys}(object)) {{"));
                let hk = hash_expr(gen, self.this, key, "k");
                gen.line(&format!("h = 31*h + {hk}"));
                let hv = hash_expr(gen, self.this, value, "object[k]");
                gen.line(&format!("h = 31*h + {hv}"));
                gen.close("}");
                gen.line("return h");
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
                gen.guard("object", "return 1");
                gen.line("return 0");
            }
            BasicKind::Float32 | BasicKind::Float64 => {
                // 0 and -0 are equal.
                gen.guard("object == 0", "return 0");
                gen.import("math");
                gen.line("return math.Float64bits(float64(object))");
            }
            BasicKind::Complex64 | BasicKind::Complex128 => {
                let part = if kind == BasicKind::Complex64 {
                    Idx::FLOAT32
                } else {
                    Idx::FLOAT64
                };
                let f = gen.own_name(&[part]);
                gen.line("h := uint64(17)");
                gen.line(&format!("h = 31*h + {f}(real(object))"));
                gen.line(&format!("h = 31*h + {f}(imag(object))"));
                gen.line("return h");
            }
            BasicKind::String => {
                gen.line("h := uint64(17)");
                gen.open("for _, c := range object {");
                gen.line("h = 31*h + uint64(c)");
                gen.close("}");
                gen.line("return h");
            }
            _ => gen.line("return uint64(object)"),
        }
    }

    fn fields(&self, gen: &mut Generator<'_>, fields: &[deriv_types::Field]) {
        gen.line("h := uint64(17)");
        for field in fields {
            let h = hash_expr(gen, self.this, field.ty, &format!("object.{}", field.name));
            gen.line(&format!("h = 31*h + {h}"));
        }
        gen.line("return h");
    }

    fn range(&self, gen: &mut Generator<'_>, elem: Idx) {
        gen.line("h := uint64(17)");
        gen.open("for _, v := range object {");
        let h = hash_expr(gen, self.this, elem, "v");
        gen.line(&format!("h = 31*h + {h}"));
        gen.close("}");
        gen.line("return h");
    }
}
