//! Rendering types as host-language source text.
//!
//! Named types are rendered by name, never expanded, so rendering a
//! self-referential type terminates.

use std::collections::BTreeSet;

use crate::{BasicKind, ChanDir, Idx, Pool, TypeData};

impl Pool {
    /// Render `idx` as it would be spelled inside package `local`.
    ///
    /// Named types from other packages are qualified with the package name
    /// (`time.Duration`).
    pub fn format_type(&self, idx: Idx, local: &str) -> String {
        let mut buf = String::new();
        self.format_type_into(idx, local, &mut buf);
        buf
    }

    /// Render into an existing buffer.
    pub fn format_type_into(&self, idx: Idx, local: &str, buf: &mut String) {
        match self.data(idx) {
            TypeData::Basic(kind) => buf.push_str(kind.name()),
            TypeData::Named(_) => {
                if let Some(def) = self.named_def(idx) {
                    if def.package != local && !def.package.is_empty() {
                        buf.push_str(self.package_name(&def.package));
                        buf.push('.');
                    }
                    buf.push_str(&def.name);
                }
            }
            TypeData::Pointer(elem) => {
                buf.push('*');
                self.format_type_into(*elem, local, buf);
            }
            TypeData::Slice(elem) => {
                buf.push_str("[]");
                self.format_type_into(*elem, local, buf);
            }
            TypeData::Array { len, elem } => {
                buf.push('[');
                buf.push_str(&len.to_string());
                buf.push(']');
                self.format_type_into(*elem, local, buf);
            }
            TypeData::Map { key, value } => {
                buf.push_str("map[");
                self.format_type_into(*key, local, buf);
                buf.push(']');
                self.format_type_into(*value, local, buf);
            }
            TypeData::Struct(fields) => {
                if fields.is_empty() {
                    buf.push_str("struct{}");
                    return;
                }
                buf.push_str("struct{ ");
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        buf.push_str("; ");
                    }
                    if !field.embedded {
                        buf.push_str(&field.name);
                        buf.push(' ');
                    }
                    self.format_type_into(field.ty, local, buf);
                }
                buf.push_str(" }");
            }
            TypeData::Signature { .. } => {
                buf.push_str("func");
                self.format_signature_into(idx, local, buf);
            }
            TypeData::Tuple(elems) => {
                buf.push('(');
                self.format_list_into(elems, local, buf);
                buf.push(')');
            }
            TypeData::Channel { dir, elem } => {
                match dir {
                    ChanDir::Both => buf.push_str("chan "),
                    ChanDir::Send => buf.push_str("chan<- "),
                    ChanDir::Recv => buf.push_str("<-chan "),
                }
                // `chan (<-chan T)` needs the parentheses to parse.
                let paren = *dir != ChanDir::Recv
                    && matches!(
                        self.data(*elem),
                        TypeData::Channel {
                            dir: ChanDir::Recv,
                            ..
                        }
                    );
                if paren {
                    buf.push('(');
                }
                self.format_type_into(*elem, local, buf);
                if paren {
                    buf.push(')');
                }
            }
            TypeData::Interface(methods) => {
                if methods.is_empty() {
                    buf.push_str("interface{}");
                    return;
                }
                buf.push_str("interface{ ");
                for (i, method) in methods.iter().enumerate() {
                    if i > 0 {
                        buf.push_str("; ");
                    }
                    buf.push_str(&method.name);
                    self.format_signature_into(method.signature, local, buf);
                }
                buf.push_str(" }");
            }
        }
    }

    /// Render the parameter and result lists of a signature, without the
    /// `func` keyword: `(int, ...string) (bool, error)`.
    pub fn format_signature_into(&self, sig: Idx, local: &str, buf: &mut String) {
        let TypeData::Signature {
            params,
            results,
            variadic,
        } = self.data(sig)
        else {
            buf.push_str("()");
            return;
        };
        buf.push('(');
        for (i, &param) in params.iter().enumerate() {
            if i > 0 {
                buf.push_str(", ");
            }
            if *variadic && i + 1 == params.len() {
                buf.push_str("...");
                let elem = match self.data(param) {
                    TypeData::Slice(elem) => *elem,
                    _ => param,
                };
                self.format_type_into(elem, local, buf);
            } else {
                self.format_type_into(param, local, buf);
            }
        }
        buf.push(')');
        match results.len() {
            0 => {}
            1 => {
                buf.push(' ');
                self.format_type_into(results[0], local, buf);
            }
            _ => {
                buf.push_str(" (");
                self.format_list_into(results, local, buf);
                buf.push(')');
            }
        }
    }

    fn format_list_into(&self, elems: &[Idx], local: &str, buf: &mut String) {
        for (i, &elem) in elems.iter().enumerate() {
            if i > 0 {
                buf.push_str(", ");
            }
            self.format_type_into(elem, local, buf);
        }
    }

    /// Collect the import paths a rendering of `idx` inside `local` needs.
    pub fn packages_of(&self, idx: Idx, local: &str, out: &mut BTreeSet<String>) {
        match self.data(idx) {
            TypeData::Basic(BasicKind::UnsafePointer) => {
                out.insert("unsafe".to_owned());
            }
            TypeData::Basic(_) => {}
            TypeData::Named(_) => {
                if let Some(def) = self.named_def(idx) {
                    if def.package != local && !def.package.is_empty() {
                        out.insert(def.package.clone());
                    }
                }
            }
            TypeData::Pointer(elem)
            | TypeData::Slice(elem)
            | TypeData::Array { elem, .. }
            | TypeData::Channel { elem, .. } => self.packages_of(*elem, local, out),
            TypeData::Map { key, value } => {
                self.packages_of(*key, local, out);
                self.packages_of(*value, local, out);
            }
            TypeData::Struct(fields) => {
                for field in fields.iter() {
                    self.packages_of(field.ty, local, out);
                }
            }
            TypeData::Signature {
                params, results, ..
            } => {
                for &ty in params.iter().chain(results.iter()) {
                    self.packages_of(ty, local, out);
                }
            }
            TypeData::Tuple(elems) => {
                for &ty in elems.iter() {
                    self.packages_of(ty, local, out);
                }
            }
            TypeData::Interface(methods) => {
                for method in methods.iter() {
                    self.packages_of(method.signature, local, out);
                }
            }
        }
    }
}
