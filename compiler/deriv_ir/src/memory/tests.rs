use pretty_assertions::assert_eq;

use super::*;
use crate::{ExprId, ExprKind, FileSpec, FuncSpec, PackageSpec, TypeExpr};

fn spec() -> ProgramSpec {
    let mut pkg = PackageSpec::new("app");
    pkg.files.push(FileSpec {
        name: "main.go".into(),
        exprs: vec![ExprSpec::call(
            "deriveEqual",
            vec![
                ExprSpec::value("a", TypeExpr::basic("int")),
                ExprSpec::call("deriveClone", vec![ExprSpec::value("b", TypeExpr::basic("int"))]),
            ],
        )],
    });
    ProgramSpec {
        packages: vec![pkg],
    }
}

fn call_names(program: &Program) -> Vec<String> {
    let mut names = Vec::new();
    for expr in &program.packages[0].files[0].exprs {
        expr.walk(&mut |e| {
            if let ExprKind::Call { func, .. } = &e.kind {
                names.push(func.clone());
            }
        });
    }
    names
}

#[test]
fn rewrite_renames_nested_call() {
    let mut frontend = MemoryFrontend::new(spec());
    let location = CallLocation {
        package: "app".into(),
        file: "main.go".into(),
        expr: ExprId::new(2),
    };
    frontend
        .rewrite_call(&location, "deriveCloneInt")
        .expect("call exists");
    let program = frontend.load(&[]).expect("loads");
    assert_eq!(call_names(&program), vec!["deriveEqual", "deriveCloneInt"]);
}

#[test]
fn rewrite_of_operand_is_unknown_call() {
    let mut frontend = MemoryFrontend::new(spec());
    let location = CallLocation {
        package: "app".into(),
        file: "main.go".into(),
        expr: ExprId::new(1),
    };
    let err = frontend.rewrite_call(&location, "x").unwrap_err();
    assert!(matches!(err, FrontendError::UnknownCall { .. }));
}

#[test]
fn written_artifacts_are_visible_on_next_load() {
    let mut frontend = MemoryFrontend::new(spec());
    let artifact = Artifact {
        package: "app".into(),
        file_name: "derived.gen.go".into(),
        text: "package app\n".into(),
        decls: vec![FuncSpec {
            name: "deriveClone".into(),
            params: vec![TypeExpr::basic("int")],
            results: vec![TypeExpr::basic("int")],
            variadic: false,
        }],
    };
    frontend.write_artifact(&artifact).expect("writes");
    let program = frontend.load(&["app".to_owned()]).expect("loads");

    let pkg = &program.packages[0];
    assert_eq!(pkg.generated.as_ref().map(|g| g.text.as_str()), Some("package app\n"));
    // deriveClone(b) is now typed by the generated declaration.
    assert_eq!(pkg.files[0].type_of(ExprId::new(2)), Some(deriv_types::Idx::INT));
    assert_eq!(frontend.write_count(), 1);
    assert_eq!(frontend.load_count(), 1);
}
