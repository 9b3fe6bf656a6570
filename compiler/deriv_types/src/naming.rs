//! Identifier fragments derived from types.
//!
//! A fragment is the part of a generated function name that identifies the
//! type: `deriveEqual` + `PtrToPoint`. Fragments are always valid
//! identifier tails starting with an upper-case letter. They are not
//! unique (`a.Point` and `b.Point` share one); the registry resolves
//! collisions with suffixes.

use crate::{Idx, Pool, TypeData};

impl Pool {
    /// Identifier fragment for `idx`.
    pub fn name_fragment(&self, idx: Idx) -> String {
        let mut buf = String::new();
        self.fragment_into(idx, &mut buf);
        buf
    }

    fn fragment_into(&self, idx: Idx, buf: &mut String) {
        match self.data(idx) {
            TypeData::Basic(kind) => buf.push_str(kind.fragment()),
            TypeData::Named(_) => match self.named_def(idx) {
                Some(def) => push_capitalized(&def.name, buf),
                None => buf.push_str("Invalid"),
            },
            TypeData::Pointer(elem) => {
                buf.push_str("PtrTo");
                self.fragment_into(*elem, buf);
            }
            TypeData::Slice(elem) => {
                buf.push_str("SliceOf");
                self.fragment_into(*elem, buf);
            }
            TypeData::Array { len, elem } => {
                buf.push_str("Array");
                buf.push_str(&len.to_string());
                buf.push_str("Of");
                self.fragment_into(*elem, buf);
            }
            TypeData::Map { key, value } => {
                buf.push_str("MapOf");
                self.fragment_into(*key, buf);
                buf.push_str("To");
                self.fragment_into(*value, buf);
            }
            TypeData::Channel { elem, .. } => {
                buf.push_str("ChanOf");
                self.fragment_into(*elem, buf);
            }
            TypeData::Struct(_) => buf.push_str("Struct"),
            TypeData::Signature { .. } => buf.push_str("Func"),
            TypeData::Tuple(_) => buf.push_str("Tuple"),
            TypeData::Interface(_) => buf.push_str("Interface"),
        }
    }
}

/// Push `name` with its first letter upper-cased, dropping characters that
/// cannot appear in an identifier.
fn push_capitalized(name: &str, buf: &mut String) {
    let mut chars = name.chars().filter(|c| c.is_alphanumeric() || *c == '_');
    match chars.next() {
        Some(first) if first.is_alphabetic() => buf.extend(first.to_uppercase()),
        Some(first) => {
            buf.push('T');
            buf.push(first);
        }
        None => {
            buf.push('T');
            return;
        }
    }
    buf.extend(chars);
}
