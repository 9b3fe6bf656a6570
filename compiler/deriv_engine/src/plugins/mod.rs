//! The standard plugins.
//!
//! Every plugin walks the shape of its signature's types with an
//! exhaustive match over `TypeData` and writes one function per
//! signature. Nested types are never generated inline: the plugin asks
//! for the function of the nested signature by name, which enqueues it.
//! Recursive types therefore resolve to names that were reserved before
//! their bodies were written.

mod clone;
mod compare;
mod contains;
mod equal;
mod hash;
mod keys;
mod mem;
mod minmax;
mod set;
mod sort;

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;

use deriv_types::{Idx, Pool, TypeData};

use crate::plugin::support::Capability;
use crate::plugin::{Dependency, Generator, PluginDef};
use crate::DeriveError;

/// Definitions in registration order.
pub(crate) fn standard() -> [PluginDef; 13] {
    [
        equal::DEF,
        compare::DEF,
        hash::DEF,
        clone::DEF,
        keys::DEF,
        sort::DEF,
        minmax::MIN,
        minmax::MAX,
        contains::DEF,
        set::UNION,
        set::INTERSECT,
        set::UNIQUE,
        mem::DEF,
    ]
}

// === Argument checks ===

fn expect_arity(plugin: &str, args: &[Idx], n: usize) -> Result<(), DeriveError> {
    if args.len() == n {
        return Ok(());
    }
    let plural = if n == 1 { "" } else { "s" };
    Err(DeriveError::mismatch(
        plugin,
        format!("expected {n} argument{plural}, got {}", args.len()),
    ))
}

/// Two arguments of one type; returns that type.
fn expect_pair(plugin: &str, pool: &Pool, local: &str, args: &[Idx]) -> Result<Idx, DeriveError> {
    expect_arity(plugin, args, 2)?;
    if args[0] != args[1] {
        return Err(DeriveError::mismatch(
            plugin,
            format!(
                "arguments must have identical types, got `{}` and `{}`",
                pool.format_type(args[0], local),
                pool.format_type(args[1], local)
            ),
        ));
    }
    Ok(args[0])
}

/// Element type of a slice type, looking through named types.
fn slice_elem(pool: &Pool, ty: Idx) -> Option<Idx> {
    match pool.underlying_data(ty) {
        TypeData::Slice(elem) => Some(*elem),
        _ => None,
    }
}

fn expect_slice(plugin: &str, pool: &Pool, local: &str, ty: Idx) -> Result<Idx, DeriveError> {
    slice_elem(pool, ty).ok_or_else(|| {
        DeriveError::mismatch(
            plugin,
            format!("expected a slice, got `{}`", pool.format_type(ty, local)),
        )
    })
}

/// `([]T, T)`; returns `T`.
fn expect_list_and_item(
    plugin: &str,
    pool: &Pool,
    local: &str,
    args: &[Idx],
) -> Result<Idx, DeriveError> {
    expect_arity(plugin, args, 2)?;
    let elem = expect_slice(plugin, pool, local, args[0])?;
    if !pool.assignable(args[1], elem) {
        return Err(DeriveError::mismatch(
            plugin,
            format!(
                "`{}` is not the element type of `{}`",
                pool.format_type(args[1], local),
                pool.format_type(args[0], local)
            ),
        ));
    }
    Ok(elem)
}

// === Component expressions ===

/// Method receivers that are dereferences need parentheses.
fn receiver(expr: &str) -> String {
    if expr.starts_with('*') {
        format!("({expr})")
    } else {
        expr.to_owned()
    }
}

/// Boolean expression `a` equals `b`, for values of `ty`.
fn equal_expr(gen: &mut Generator<'_>, dep: Dependency, ty: Idx, a: &str, b: &str) -> String {
    if gen.has_capability(ty, Capability::Equal) {
        format!("{}.Equal({b})", receiver(a))
    } else if gen.is_plain(ty) {
        format!("{a} == {b}")
    } else {
        let name = gen.func_name(dep, &[ty, ty]);
        format!("{name}({a}, {b})")
    }
}

/// Boolean expression `a` differs from `b`.
fn not_equal_expr(gen: &mut Generator<'_>, dep: Dependency, ty: Idx, a: &str, b: &str) -> String {
    if gen.has_capability(ty, Capability::Equal) {
        format!("!{}.Equal({b})", receiver(a))
    } else if gen.is_plain(ty) {
        format!("{a} != {b}")
    } else {
        let name = gen.func_name(dep, &[ty, ty]);
        format!("!{name}({a}, {b})")
    }
}

/// `int` expression ordering `a` against `b`.
fn compare_expr(gen: &mut Generator<'_>, dep: Dependency, ty: Idx, a: &str, b: &str) -> String {
    if gen.has_capability(ty, Capability::Compare) {
        format!("{}.Compare({b})", receiver(a))
    } else {
        let name = gen.func_name(dep, &[ty, ty]);
        format!("{name}({a}, {b})")
    }
}

/// `uint64` hash of `v`.
fn hash_expr(gen: &mut Generator<'_>, dep: Dependency, ty: Idx, v: &str) -> String {
    if gen.has_capability(ty, Capability::Hash) {
        format!("{}.Hash()", receiver(v))
    } else {
        let name = gen.func_name(dep, &[ty]);
        format!("{name}({v})")
    }
}

/// Deep copy of `v`.
fn clone_expr(gen: &mut Generator<'_>, dep: Dependency, ty: Idx, v: &str) -> String {
    if gen.has_capability(ty, Capability::Clone) {
        format!("{}.Clone()", receiver(v))
    } else if gen.is_plain(ty) {
        v.to_owned()
    } else {
        let name = gen.func_name(dep, &[ty]);
        format!("{name}({v})")
    }
}

/// Basic kind of a type's underlying type, if it is basic.
fn basic_of(pool: &Pool, ty: Idx) -> Option<deriv_types::BasicKind> {
    match pool.underlying_data(ty) {
        TypeData::Basic(kind) => Some(*kind),
        _ => None,
    }
}
