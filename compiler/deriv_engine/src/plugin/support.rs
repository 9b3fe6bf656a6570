//! Capabilities and the type support walk shared by the plugins.
//!
//! A capability is a method a named type defines for itself (`Equal`,
//! `Compare`, `Hash`, `Clone`). Derivations call capabilities through
//! instead of looking inside the type.
//!
//! The support walk runs when a call is added. It decides up front
//! whether every type reachable from the call has a rule, so generation
//! never stops halfway through a declaration.

use deriv_types::{BasicKind, Idx, Pool, TypeData, ValueClassifier, Visibility};
use rustc_hash::FxHashSet;

use crate::DeriveError;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// `Equal(T) bool`
    Equal,
    /// `Compare(T) int`
    Compare,
    /// `Hash() uint64`
    Hash,
    /// `Clone() T`
    Clone,
}

impl Capability {
    pub fn method(self) -> &'static str {
        match self {
            Capability::Equal => "Equal",
            Capability::Compare => "Compare",
            Capability::Hash => "Hash",
            Capability::Clone => "Clone",
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Capability::Equal => "equality",
            Capability::Compare => "ordering",
            Capability::Hash => "hashing",
            Capability::Clone => "cloning",
        }
    }
}

/// Whether the method set of `ty` holds `cap` with its exact signature.
///
/// Named types and pointers to named types qualify. A method declared on
/// `*T` belongs to `*T` only, so values of `T` never call it. `Hash` is
/// only recognized on the named type itself.
pub fn has_capability(pool: &Pool, ty: Idx, cap: Capability) -> bool {
    match pool.data(ty) {
        TypeData::Named(_) => {}
        TypeData::Pointer(_) if cap != Capability::Hash => {}
        _ => return false,
    }
    let (params, results): (&[Idx], &[Idx]) = match cap {
        Capability::Equal => (&[ty], &[Idx::BOOL]),
        Capability::Compare => (&[ty], &[Idx::INT]),
        Capability::Hash => (&[], &[Idx::UINT64]),
        Capability::Clone => (&[], &[ty]),
    };
    pool.has_method(ty, cap.method(), params, results)
}

/// Whether every field of the struct underlying `ty` can be named from
/// package `local`. Types that are not structs have no fields to hide.
pub fn fields_visible(pool: &Pool, local: &str, ty: Idx) -> bool {
    let foreign = pool.named_def(ty).is_some_and(|def| def.package != local);
    match pool.underlying_data(ty) {
        TypeData::Struct(fields) => {
            !foreign || fields.iter().all(|f| Visibility::of(&f.name).is_public())
        }
        _ => true,
    }
}

/// Check that `cap` can be derived for `ty` from package `local`.
pub fn check_support(
    pool: &Pool,
    local: &str,
    plugin: &str,
    cap: Capability,
    ty: Idx,
) -> Result<(), DeriveError> {
    let mut walk = SupportWalk {
        pool,
        classifier: ValueClassifier::new(pool),
        local,
        plugin,
        visiting: FxHashSet::default(),
    };
    walk.check(cap, ty, None)
}

struct SupportWalk<'a> {
    pool: &'a Pool,
    classifier: ValueClassifier<'a>,
    local: &'a str,
    plugin: &'a str,
    visiting: FxHashSet<(Idx, Capability)>,
}

impl SupportWalk<'_> {
    /// `owner` is the package that defined the struct being looked at, if
    /// it is the underlying type of a named type.
    fn check(&mut self, cap: Capability, ty: Idx, owner: Option<&str>) -> Result<(), DeriveError> {
        if has_capability(self.pool, ty, cap) {
            return Ok(());
        }
        if matches!(cap, Capability::Equal | Capability::Clone)
            && self.classifier.is_plain(ty)
            && owner.is_none()
        {
            return Ok(());
        }

        match self.pool.data(ty) {
            TypeData::Basic(BasicKind::Invalid) => Err(self.unsupported(ty, "the type is invalid")),
            TypeData::Basic(BasicKind::UnsafePointer) => {
                Err(self.unsupported(ty, format!("unsafe pointers have no {} rule", cap.verb())))
            }
            TypeData::Basic(_) => Ok(()),
            TypeData::Named(_) => {
                if !self.visiting.insert((ty, cap)) {
                    return Ok(());
                }
                let Some(def) = self.pool.named_def(ty) else {
                    return Err(self.unsupported(ty, "the type is invalid"));
                };
                if def.underlying.is_none() {
                    return Err(self.unsupported(ty, "the type has no definition"));
                }
                let package = def.package.clone();
                let result = self.check(cap, def.underlying, Some(&package));
                self.visiting.remove(&(ty, cap));
                result
            }
            TypeData::Pointer(elem) | TypeData::Slice(elem) | TypeData::Array { elem, .. } => {
                self.check(cap, *elem, None)
            }
            TypeData::Map { key, value } => {
                if matches!(cap, Capability::Compare | Capability::Hash)
                    && !self.classifier.is_plain(*key)
                {
                    // Distinct keys could order as equal, leaving the walk
                    // to Go's random iteration order.
                    return Err(self.unsupported(
                        ty,
                        format!(
                            "map keys must be plain values for {}, got `{}`",
                            cap.verb(),
                            self.pool.format_type(*key, self.local)
                        ),
                    ));
                }
                match cap {
                    // Keys are visited in sorted order.
                    Capability::Compare => self.check(cap, *key, None)?,
                    Capability::Hash => {
                        self.check(Capability::Compare, *key, None)?;
                        self.check(cap, *key, None)?;
                    }
                    // Keys are looked up or copied as they are.
                    Capability::Equal | Capability::Clone => {}
                }
                self.check(cap, *value, None)
            }
            TypeData::Struct(fields) => {
                if owner.is_none() && !self.pool.comparable(ty) {
                    return Err(self.unsupported(
                        ty,
                        "anonymous structs must be comparable with ==",
                    ));
                }
                let foreign = owner.is_some_and(|pkg| pkg != self.local);
                for field in fields.iter() {
                    let hidden = foreign && !Visibility::of(&field.name).is_public();
                    if hidden && !(cap == Capability::Clone && self.classifier.is_plain(field.ty)) {
                        return Err(self.unsupported(
                            ty,
                            format!(
                                "field `{}` is not exported from package `{}`",
                                field.name,
                                owner.unwrap_or_default()
                            ),
                        ));
                    }
                    self.check(cap, field.ty, None)?;
                }
                Ok(())
            }
            data @ (TypeData::Channel { .. }
            | TypeData::Signature { .. }
            | TypeData::Interface(_)
            | TypeData::Tuple(_)) => Err(self.unsupported(
                ty,
                format!("{} types have no {} rule", data.shape_name(), cap.verb()),
            )),
        }
    }

    fn unsupported(&self, ty: Idx, reason: impl Into<String>) -> DeriveError {
        DeriveError::unsupported(self.plugin, self.pool.format_type(ty, self.local), reason)
    }
}
