//! `deriveKeys(m map[K]V) []K`

use deriv_types::{Idx, Pool, TypeData};

use super::expect_arity;
use crate::plugin::{Generator, Handles, Plugin, PluginDef};
use crate::DeriveError;

pub(super) const DEF: PluginDef = PluginDef {
    name: "keys",
    depends_on: &[],
    build,
};

fn build(_handles: &Handles<'_>) -> Result<Box<dyn Plugin>, DeriveError> {
    Ok(Box::new(Keys))
}

struct Keys;

fn key_of(pool: &Pool, ty: Idx) -> Option<Idx> {
    match pool.underlying_data(ty) {
        TypeData::Map { key, .. } => Some(*key),
        _ => None,
    }
}

impl Plugin for Keys {
    fn name(&self) -> &'static str {
        DEF.name
    }

    fn validate(&self, pool: &Pool, local: &str, args: &[Idx]) -> Result<(), DeriveError> {
        expect_arity(DEF.name, args, 1)?;
        match key_of(pool, args[0]) {
            Some(_) => Ok(()),
            None => Err(DeriveError::mismatch(
                DEF.name,
                format!("expected a map, got `{}`", pool.format_type(args[0], local)),
            )),
        }
    }

    fn results(&self, pool: &mut Pool, sig: &[Idx]) -> Vec<Idx> {
        let key = key_of(pool, sig[0]).unwrap_or(Idx::INVALID);
        vec![pool.slice(key)]
    }

    fn generate(&self, gen: &mut Generator<'_>, sig: &[Idx]) -> Result<(), DeriveError> {
        let key = key_of(gen.pool(), sig[0]).unwrap_or(Idx::INVALID);
        let map = gen.ty(sig[0]);
        let key = gen.ty(key);
        gen.doc("returns the keys of the input map as a slice.");
        gen.open(&format!("func {}(m {map}) []{key} {{", gen.name()));
        gen.line(&format!("keys := make([]{key}, 0, len(m))"));
        gen.open("for key := range m {");
        gen.line("keys = append(keys, key)");
        gen.close("}");
        gen.line("return keys");
        gen.close("}");
        Ok(())
    }
}
