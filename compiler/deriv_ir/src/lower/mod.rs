//! Lowering a `ProgramSpec` into a type-checked `Program`.
//!
//! # Passes
//!
//! 1. Declare every named type of every package, so forward and
//!    self-references resolve.
//! 2. Attach underlying types.
//! 3. Attach methods.
//! 4. Build each requested package: scope, generated artifact, and the
//!    expression trees of its hand-written files with their type tables.
//!
//! A reference to a type that was never declared lowers to
//! `Idx::INVALID`; it is never an error here. Whether an invalid type
//! matters is the engine's decision.


use deriv_types::{BasicKind, ChanDir, Field, IfaceMethod, Idx, Method, Pool};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace};

use crate::{
    CalleeKind, ChanDirSpec, Expr, ExprId, ExprKind, ExprSpec, FileSpec, FrontendError, FuncSpec,
    GeneratedFile, Package, PackageSpec, Program, ProgramSpec, SourceFile, TypeExpr,
};

/// Predeclared functions of the host language.
pub const BUILTINS: &[&str] = &[
    "append", "cap", "clear", "close", "complex", "copy", "delete", "imag", "len", "make", "max",
    "min", "new", "panic", "print", "println", "real", "recover",
];

/// Lower `spec` into a program holding the packages at `paths` (every
/// package when `paths` is empty).
///
/// `generated` maps a package path to the artifact currently present in
/// that package.
pub fn lower(
    spec: &ProgramSpec,
    generated: &FxHashMap<String, GeneratedFile>,
    paths: &[String],
) -> Result<Program, FrontendError> {
    let mut lowerer = Lowerer {
        pool: Pool::new(),
    };
    lowerer.declare_types(spec);

    let selected: Vec<&PackageSpec> = if paths.is_empty() {
        spec.packages.iter().collect()
    } else {
        paths
            .iter()
            .map(|path| {
                spec.package(path)
                    .ok_or_else(|| FrontendError::UnknownPackage { path: path.clone() })
            })
            .collect::<Result<_, _>>()?
    };

    let packages = selected
        .into_iter()
        .map(|pkg| lowerer.lower_package(pkg, generated.get(&pkg.path)))
        .collect::<Vec<_>>();

    debug!(
        packages = packages.len(),
        types = lowerer.pool.len(),
        "lowered program"
    );
    Ok(Program {
        pool: lowerer.pool,
        packages,
    })
}

/// Signature facts needed to type a call.
struct FuncInfo {
    kind: CalleeKind,
    results: Vec<Idx>,
}

struct Lowerer {
    pool: Pool,
}

impl Lowerer {
    // === Types ===

    fn declare_types(&mut self, spec: &ProgramSpec) {
        for pkg in &spec.packages {
            self.pool.set_package_name(&pkg.path, pkg.package_name());
            for decl in &pkg.types {
                self.pool.named(&pkg.path, &decl.name);
            }
        }
        for pkg in &spec.packages {
            for decl in &pkg.types {
                let named = self.pool.named(&pkg.path, &decl.name);
                let underlying = self.resolve(&decl.underlying, &pkg.path);
                self.pool.set_underlying(named, underlying);
            }
        }
        for pkg in &spec.packages {
            for decl in &pkg.types {
                let named = self.pool.named(&pkg.path, &decl.name);
                for method in &decl.methods {
                    let signature =
                        self.signature(&method.params, &method.results, method.variadic, &pkg.path);
                    self.pool.add_method(
                        named,
                        Method {
                            name: method.name.clone(),
                            signature,
                            pointer_receiver: method.pointer_receiver,
                        },
                    );
                }
            }
        }
    }

    /// Resolve a schema type inside package `pkg`.
    fn resolve(&mut self, ty: &TypeExpr, pkg: &str) -> Idx {
        match ty {
            TypeExpr::Basic { name } => BasicKind::from_name(name).map_or(Idx::INVALID, BasicKind::idx),
            TypeExpr::Named { package, name } => {
                let package = package.as_deref().unwrap_or(pkg);
                self.pool
                    .lookup_named(package, name)
                    .unwrap_or(Idx::INVALID)
            }
            TypeExpr::Pointer { elem } => {
                let elem = self.resolve(elem, pkg);
                self.pool.pointer(elem)
            }
            TypeExpr::Slice { elem } => {
                let elem = self.resolve(elem, pkg);
                self.pool.slice(elem)
            }
            TypeExpr::Array { len, elem } => {
                let elem = self.resolve(elem, pkg);
                self.pool.array(*len, elem)
            }
            TypeExpr::Map { key, value } => {
                let key = self.resolve(key, pkg);
                let value = self.resolve(value, pkg);
                self.pool.map(key, value)
            }
            TypeExpr::Struct { fields } => {
                let fields = fields
                    .iter()
                    .map(|f| {
                        let ty = self.resolve(&f.ty, pkg);
                        if f.embedded {
                            Field::embedded(f.name.clone(), ty)
                        } else {
                            Field::new(f.name.clone(), ty)
                        }
                    })
                    .collect();
                self.pool.structure(fields)
            }
            TypeExpr::Func {
                params,
                results,
                variadic,
            } => self.signature(params, results, *variadic, pkg),
            TypeExpr::Chan { dir, elem } => {
                let elem = self.resolve(elem, pkg);
                let dir = match dir {
                    ChanDirSpec::Both => ChanDir::Both,
                    ChanDirSpec::Send => ChanDir::Send,
                    ChanDirSpec::Recv => ChanDir::Recv,
                };
                self.pool.chan(dir, elem)
            }
            TypeExpr::Interface { methods } => {
                let methods = methods
                    .iter()
                    .map(|m| IfaceMethod {
                        name: m.name.clone(),
                        signature: self.signature(&m.params, &m.results, m.variadic, pkg),
                    })
                    .collect();
                self.pool.interface(methods)
            }
        }
    }

    fn signature(
        &mut self,
        params: &[TypeExpr],
        results: &[TypeExpr],
        variadic: bool,
        pkg: &str,
    ) -> Idx {
        let params: Vec<Idx> = params.iter().map(|p| self.resolve(p, pkg)).collect();
        let results: Vec<Idx> = results.iter().map(|r| self.resolve(r, pkg)).collect();
        self.pool.signature(&params, &results, variadic)
    }

    // === Packages ===

    fn lower_package(&mut self, spec: &PackageSpec, generated: Option<&GeneratedFile>) -> Package {
        let mut funcs: FxHashMap<&str, FuncInfo> = FxHashMap::default();
        if let Some(artifact) = generated {
            for decl in &artifact.decls {
                let info = self.func_info(decl, CalleeKind::Generated, &spec.path);
                funcs.insert(&decl.name, info);
            }
        }
        // Hand-written declarations shadow stale generated ones.
        for func in &spec.funcs {
            let info = self.func_info(func, CalleeKind::Defined, &spec.path);
            funcs.insert(&func.name, info);
        }

        let scope: FxHashSet<String> = spec
            .types
            .iter()
            .map(|t| t.name.clone())
            .chain(spec.funcs.iter().map(|f| f.name.clone()))
            .collect();

        let generated_name = generated.map(|g| g.name.as_str());
        let files = spec
            .files
            .iter()
            .filter(|file| Some(file.name.as_str()) != generated_name)
            .map(|file| self.lower_file(file, &spec.path, &funcs))
            .collect();

        trace!(package = %spec.path, funcs = funcs.len(), "lowered package");
        Package {
            path: spec.path.clone(),
            name: spec.package_name().to_owned(),
            files,
            scope,
            generated: generated.cloned(),
        }
    }

    fn func_info(&mut self, func: &FuncSpec, kind: CalleeKind, pkg: &str) -> FuncInfo {
        FuncInfo {
            kind,
            results: func.results.iter().map(|r| self.resolve(r, pkg)).collect(),
        }
    }

    fn lower_file(
        &mut self,
        file: &FileSpec,
        pkg: &str,
        funcs: &FxHashMap<&str, FuncInfo>,
    ) -> SourceFile {
        let mut ctx = FileCtx {
            pkg,
            funcs,
            next_id: 0,
            types: FxHashMap::default(),
        };
        let exprs = file
            .exprs
            .iter()
            .map(|expr| self.lower_expr(expr, &mut ctx))
            .collect();
        SourceFile {
            name: file.name.clone(),
            exprs,
            types: ctx.types,
        }
    }

    fn lower_expr(&mut self, spec: &ExprSpec, ctx: &mut FileCtx<'_>) -> Expr {
        let id = ExprId::new(ctx.next_id);
        ctx.next_id += 1;
        match spec {
            ExprSpec::Value { text, ty } => {
                if let Some(ty) = ty {
                    let idx = self.resolve(ty, ctx.pkg);
                    ctx.types.insert(id, idx);
                }
                Expr {
                    id,
                    kind: ExprKind::Value { text: text.clone() },
                }
            }
            ExprSpec::Call { func, args } => {
                let args: Vec<Expr> = args.iter().map(|a| self.lower_expr(a, ctx)).collect();
                let (callee, ty) = match ctx.funcs.get(func.as_str()) {
                    Some(info) => (info.kind, self.result_type(&info.results)),
                    None if BUILTINS.contains(&func.as_str()) => {
                        (CalleeKind::Builtin, builtin_type(func, &args, &ctx.types))
                    }
                    None => (CalleeKind::Undefined, None),
                };
                if let Some(ty) = ty {
                    ctx.types.insert(id, ty);
                }
                Expr {
                    id,
                    kind: ExprKind::Call {
                        func: func.clone(),
                        callee,
                        args,
                    },
                }
            }
        }
    }

    fn result_type(&mut self, results: &[Idx]) -> Option<Idx> {
        match results {
            [] => None,
            [single] => Some(*single),
            many => Some(self.pool.tuple(many)),
        }
    }
}

struct FileCtx<'a> {
    pkg: &'a str,
    funcs: &'a FxHashMap<&'a str, FuncInfo>,
    next_id: u32,
    types: FxHashMap<ExprId, Idx>,
}

/// Static type of a builtin call, where the engine needs one.
fn builtin_type(func: &str, args: &[Expr], types: &FxHashMap<ExprId, Idx>) -> Option<Idx> {
    match func {
        "len" | "cap" => Some(Idx::INT),
        "append" | "min" | "max" => args.first().and_then(|a| types.get(&a.id).copied()),
        _ => None,
    }
}
