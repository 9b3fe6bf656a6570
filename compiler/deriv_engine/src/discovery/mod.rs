//! Call discovery.
//!
//! Finds the calls of a package that are derivation candidates: callees
//! that are undefined, or declared only by the previously generated
//! artifact. Builtins and hand-written functions are never candidates.
//!
//! Discovery is pure inspection over the loaded program.


use std::fmt;

use deriv_ir::{CallLocation, CalleeKind, Expr, ExprKind, Package, SourceFile};
use deriv_types::{Idx, Pool};
use smallvec::SmallVec;
use tracing::trace;

/// A call expression that may name a derived function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallSite {
    pub name: String,
    /// Static argument types; `Idx::INVALID` where the front end had none.
    pub args: SmallVec<[Idx; 2]>,
    pub location: CallLocation,
    /// Rendered call expression.
    pub text: String,
    undefined: bool,
}

impl CallSite {
    /// Whether an argument type is missing or mentions an invalid type.
    /// Such calls wait for a later pass.
    #[inline]
    pub fn has_undefined(&self) -> bool {
        self.undefined
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}{}: {}",
            self.location.package, self.location.file, self.location.expr, self.text
        )
    }
}

/// Candidate calls of `package` in file order, outer calls before nested
/// ones.
pub fn discover(pool: &Pool, package: &Package) -> Vec<CallSite> {
    let mut sites = Vec::new();
    for file in &package.files {
        for expr in &file.exprs {
            expr.walk(&mut |e| {
                if let Some(site) = candidate(pool, &package.path, file, e) {
                    sites.push(site);
                }
            });
        }
    }
    trace!(package = %package.path, calls = sites.len(), "discovered calls");
    sites
}

fn candidate(pool: &Pool, package: &str, file: &SourceFile, expr: &Expr) -> Option<CallSite> {
    let ExprKind::Call { func, callee, args } = &expr.kind else {
        return None;
    };
    match callee {
        CalleeKind::Undefined | CalleeKind::Generated => {}
        CalleeKind::Builtin | CalleeKind::Defined => return None,
    }

    let args: SmallVec<[Idx; 2]> = args
        .iter()
        .map(|arg| file.type_of(arg.id).unwrap_or(Idx::INVALID))
        .collect();
    let undefined = args.iter().any(|&ty| pool.has_invalid(ty));
    trace!(func = %func, undefined, "candidate call");

    Some(CallSite {
        name: func.clone(),
        args,
        location: CallLocation {
            package: package.to_owned(),
            file: file.name.clone(),
            expr: expr.id,
        },
        text: expr.render(),
        undefined,
    })
}
