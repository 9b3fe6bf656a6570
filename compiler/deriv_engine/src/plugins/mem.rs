//! `deriveMem(f func(...) ...) func(...) ...`
//!
//! Wraps a function in a cache. The parameters are hashed into a bucket
//! key with the hash plugin and compared with the equal plugin to resolve
//! collisions inside a bucket.

use deriv_types::{Idx, Pool};

use super::{equal_expr, expect_arity, hash_expr};
use crate::plugin::support::{check_support, Capability};
use crate::plugin::{Dependency, Generator, Handles, Plugin, PluginDef};
use crate::DeriveError;

pub(super) const DEF: PluginDef = PluginDef {
    name: "mem",
    depends_on: &["equal", "hash"],
    build,
};

fn build(handles: &Handles<'_>) -> Result<Box<dyn Plugin>, DeriveError> {
    Ok(Box::new(Mem {
        equal: handles.get("equal")?,
        hash: handles.get("hash")?,
    }))
}

struct Mem {
    equal: Dependency,
    hash: Dependency,
}

/// Parameter and result lists of a function type.
fn parts(pool: &Pool, ty: Idx) -> Option<(Vec<Idx>, Vec<Idx>, bool)> {
    pool.signature_parts(pool.underlying(ty))
        .map(|(p, r, variadic)| (p.to_vec(), r.to_vec(), variadic))
}

impl Plugin for Mem {
    fn name(&self) -> &'static str {
        DEF.name
    }

    fn validate(&self, pool: &Pool, local: &str, args: &[Idx]) -> Result<(), DeriveError> {
        expect_arity(DEF.name, args, 1)?;
        let Some((params, results, _)) = parts(pool, args[0]) else {
            return Err(DeriveError::mismatch(
                DEF.name,
                format!("expected a function, got `{}`", pool.format_type(args[0], local)),
            ));
        };
        if results.is_empty() {
            return Err(DeriveError::mismatch(
                DEF.name,
                "a function without results has nothing to memoize",
            ));
        }
        for param in params {
            check_support(pool, local, DEF.name, Capability::Equal, param)?;
            check_support(pool, local, DEF.name, Capability::Hash, param)?;
        }
        Ok(())
    }

    fn results(&self, _pool: &mut Pool, sig: &[Idx]) -> Vec<Idx> {
        vec![sig[0]]
    }

    fn generate(&self, gen: &mut Generator<'_>, sig: &[Idx]) -> Result<(), DeriveError> {
        let Some((params, results, variadic)) = parts(gen.pool(), sig[0]) else {
            return Err(DeriveError::mismatch(DEF.name, "signature changed after validation"));
        };
        let func_ty = gen.ty(sig[0]);
        let param_tys: Vec<String> = params.iter().map(|&p| gen.ty(p)).collect();
        let result_tys: Vec<String> = results.iter().map(|&r| gen.ty(r)).collect();
        let result_list = if result_tys.len() == 1 {
            result_tys[0].clone()
        } else {
            format!("({})", result_tys.join(", "))
        };
        let param_names: Vec<String> = (0..params.len()).map(|i| format!("param{i}")).collect();
        let res_names: Vec<String> = (0..results.len()).map(|i| format!("res{i}")).collect();

        // The closure's own parameter list, `...T` for a variadic tail.
        let closure_params = param_names
            .iter()
            .zip(&param_tys)
            .enumerate()
            .map(|(i, (name, ty))| {
                if variadic && i + 1 == params.len() {
                    format!("{name} ...{}", ty.strip_prefix("[]").unwrap_or(ty))
                } else {
                    format!("{name} {ty}")
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        let mut call_args = param_names.join(", ");
        if variadic {
            call_args.push_str("...");
        }

        gen.doc("returns a memoized version of the input function.");
        gen.open(&format!("func {}(f {func_ty}) {func_ty} {{", gen.name()));
        gen.open("type entry struct {");
        for (name, ty) in param_names.iter().zip(&param_tys) {
            gen.line(&format!("{name} {ty}"));
        }
        for (name, ty) in res_names.iter().zip(&result_tys) {
            gen.line(&format!("{name} {ty}"));
        }
        gen.close("}");

        let results_joined = res_names.join(", ");
        let stored = res_names
            .iter()
            .map(|r| format!("e.{r}"))
            .collect::<Vec<_>>()
            .join(", ");

        if params.is_empty() {
            gen.line("var cached *entry");
            gen.open(&format!("return func() {result_list} {{"));
            gen.open("if cached == nil {");
            gen.line(&format!("{results_joined} := f()"));
            gen.line(&format!("cached = &entry{{{results_joined}}}"));
            gen.close("}");
            gen.line("e := cached");
            gen.line(&format!("return {stored}"));
            gen.close("}");
        } else {
            gen.line("cache := make(map[uint64][]entry)");
            gen.open(&format!("return func({closure_params}) {result_list} {{"));
            gen.line("h := uint64(17)");
            for (&param, name) in params.iter().zip(&param_names) {
                let h = hash_expr(gen, self.hash, param, name);
                gen.line(&format!("h = 31*h + {h}"));
            }
            gen.open("for _, e := range cache[h] {");
            let mut conds = Vec::with_capacity(params.len());
            for (&param, name) in params.iter().zip(&param_names) {
                conds.push(equal_expr(gen, self.equal, param, &format!("e.{name}"), name));
            }
            gen.guard(&conds.join(" && "), &format!("return {stored}"));
            gen.close("}");
            gen.line(&format!("{results_joined} := f({call_args})"));
            let fields = param_names
                .iter()
                .chain(&res_names)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            gen.line(&format!("cache[h] = append(cache[h], entry{{{fields}}})"));
            gen.line(&format!("return {results_joined}"));
            gen.close("}");
        }
        gen.close("}");
        Ok(())
    }
}
