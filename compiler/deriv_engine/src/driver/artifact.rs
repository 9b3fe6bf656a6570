//! Assembling the generated file of one package.

use deriv_ir::{export_type, Artifact, FuncSpec, Package};
use deriv_types::Pool;

use crate::emitter::Printer;
use crate::plugin::Drained;

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "// Code generated by deriv. DO NOT EDIT.";

pub(super) fn assemble(pool: &Pool, package: &Package, file_name: &str, drained: &Drained) -> Artifact {
    let mut out = Printer::default();
    out.line(GENERATED_HEADER);
    out.blank();
    out.line(&format!("package {}", package.name));

    match drained.imports.len() {
        0 => {}
        1 => {
            out.blank();
            for path in &drained.imports {
                out.line(&format!("import {path:?}"));
            }
        }
        _ => {
            out.blank();
            out.open("import (");
            for path in &drained.imports {
                out.line(&format!("{path:?}"));
            }
            out.close(")");
        }
    }

    for decl in &drained.decls {
        out.blank();
        for line in decl.text.lines() {
            out.line(line);
        }
    }

    let decls = drained
        .decls
        .iter()
        .map(|decl| FuncSpec {
            name: decl.name.clone(),
            params: decl.signature.iter().map(|&ty| export_type(pool, ty)).collect(),
            results: decl.results.iter().map(|&ty| export_type(pool, ty)).collect(),
            variadic: false,
        })
        .collect();

    Artifact {
        package: package.path.clone(),
        file_name: file_name.to_owned(),
        text: out.finish(),
        decls,
    }
}
