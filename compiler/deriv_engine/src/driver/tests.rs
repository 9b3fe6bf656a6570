use deriv_ir::{ExprSpec, FileSpec, MemoryFrontend, PackageSpec, ProgramSpec, TypeDeclSpec, TypeExpr};
use pretty_assertions::assert_eq;

use super::{Driver, GENERATED_HEADER};
use crate::{Config, DeriveError};

fn foo() -> TypeDeclSpec {
    TypeDeclSpec {
        name: "Foo".into(),
        underlying: TypeExpr::structure(vec![("A", TypeExpr::basic("int64"))]),
        methods: Vec::new(),
    }
}

fn app(exprs: Vec<ExprSpec>) -> ProgramSpec {
    ProgramSpec {
        packages: vec![PackageSpec {
            types: vec![foo()],
            files: vec![FileSpec {
                name: "main.go".into(),
                exprs,
            }],
            ..PackageSpec::new("example.com/app")
        }],
    }
}

fn call(func: &str, args: &[(&str, TypeExpr)]) -> ExprSpec {
    ExprSpec::call(
        func,
        args.iter()
            .map(|(text, ty)| ExprSpec::value(*text, ty.clone()))
            .collect(),
    )
}

fn ptr_foo() -> TypeExpr {
    TypeExpr::pointer(TypeExpr::local("Foo"))
}

#[test]
fn single_pass_writes_one_artifact() {
    let spec = app(vec![call("deriveEqual", &[("a", ptr_foo()), ("b", ptr_foo())])]);
    let mut frontend = MemoryFrontend::new(spec);
    let report = Driver::new(Config::new()).run(&mut frontend).unwrap();

    assert_eq!(report.passes, 1);
    let package = report.package("example.com/app").unwrap();
    assert_eq!(package.declarations, vec!["deriveEqual".to_owned()]);
    assert_eq!(package.new_declarations, vec!["deriveEqual".to_owned()]);
    assert!(package.artifact_changed);
    assert_eq!(frontend.write_count(), 1);

    let artifact = frontend.artifact("example.com/app").unwrap();
    assert_eq!(artifact.file_name, "derived.gen.go");
    assert!(artifact.text.starts_with(&format!("{GENERATED_HEADER}\n\npackage app\n\n// deriveEqual")));
    assert_eq!(artifact.decls.len(), 1);
    let exported = TypeExpr::pointer(TypeExpr::named("example.com/app", "Foo"));
    assert_eq!(artifact.decls[0].params, vec![exported.clone(), exported]);
    assert_eq!(artifact.decls[0].results, vec![TypeExpr::basic("bool")]);
}

#[test]
fn packages_without_calls_get_no_artifact() {
    let mut frontend = MemoryFrontend::new(app(Vec::new()));
    let report = Driver::new(Config::new()).run(&mut frontend).unwrap();
    assert!(report.is_unchanged());
    assert_eq!(frontend.write_count(), 0);
}

#[test]
fn nested_calls_resolve_over_two_passes() {
    let m = TypeExpr::map(TypeExpr::basic("string"), TypeExpr::basic("int"));
    let spec = app(vec![ExprSpec::call(
        "deriveSort",
        vec![ExprSpec::call("deriveKeys", vec![ExprSpec::value("m", m)])],
    )]);
    let mut frontend = MemoryFrontend::new(spec);
    let report = Driver::new(Config::new()).run(&mut frontend).unwrap();

    assert_eq!(report.passes, 2);
    assert_eq!(frontend.load_count(), 2);
    let package = report.package("example.com/app").unwrap();
    assert_eq!(package.declarations, vec!["deriveKeys".to_owned(), "deriveSort".to_owned()]);
    let text = &frontend.artifact("example.com/app").unwrap().text;
    assert!(text.contains("\nimport \"sort\"\n"), "{text}");
    assert!(text.contains("sort.Strings(list)"));
}

#[test]
fn calls_that_never_get_types_stop_the_run() {
    let spec = app(vec![ExprSpec::call(
        "deriveEqual",
        vec![ExprSpec::untyped("x"), ExprSpec::untyped("y")],
    )]);
    let mut frontend = MemoryFrontend::new(spec);
    let err = Driver::new(Config::new()).run(&mut frontend).unwrap_err();
    match err {
        DeriveError::NoProgress { pass, unresolved } => {
            assert_eq!(pass, 2);
            assert_eq!(unresolved, vec!["example.com/app/main.go#0: deriveEqual(x, y)".to_owned()]);
        }
        other => panic!("unexpected error {other}"),
    }
    assert_eq!(frontend.write_count(), 0);
}

#[test]
fn failures_are_reported_once_nothing_is_deferred() {
    let m = TypeExpr::map(TypeExpr::basic("string"), TypeExpr::basic("int"));
    let ch = TypeExpr::chan(TypeExpr::basic("int"));
    let spec = app(vec![
        call("deriveEqual", &[("c", ch.clone()), ("d", ch)]),
        ExprSpec::call(
            "deriveSort",
            vec![ExprSpec::call("deriveKeys", vec![ExprSpec::value("m", m)])],
        ),
    ]);
    let mut frontend = MemoryFrontend::new(spec);
    let err = Driver::new(Config::new()).run(&mut frontend).unwrap_err();
    let failures = match err {
        DeriveError::CallsFailed(failures) => failures,
        other => panic!("unexpected error {other}"),
    };
    assert_eq!(failures.len(), 1);
    assert!(failures[0].site.ends_with("deriveEqual(c, d)"));
    assert!(matches!(failures[0].error, DeriveError::UnsupportedType { .. }));
    assert_eq!(frontend.load_count(), 2);
    // The first pass's artifact stays; the failing pass writes nothing.
    assert_eq!(frontend.write_count(), 1);
}

#[test]
fn autoname_rewrites_the_losing_call() {
    let bar = TypeDeclSpec {
        name: "Bar".into(),
        underlying: TypeExpr::structure(vec![("B", TypeExpr::basic("string"))]),
        methods: Vec::new(),
    };
    let ptr_bar = TypeExpr::pointer(TypeExpr::local("Bar"));
    let mut spec = app(vec![
        call("deriveEqual", &[("a", ptr_foo()), ("b", ptr_foo())]),
        call("deriveEqual", &[("c", ptr_bar.clone()), ("d", ptr_bar)]),
    ]);
    spec.packages[0].types.push(bar);
    let mut frontend = MemoryFrontend::new(spec);

    let report = Driver::new(Config::new().with_autoname(true))
        .run(&mut frontend)
        .unwrap();
    let package = report.package("example.com/app").unwrap();
    assert_eq!(package.rewrites, 1);
    assert_eq!(
        package.declarations,
        vec!["deriveEqual".to_owned(), "deriveEqualPtrToBar".to_owned()]
    );

    let exprs = &frontend.spec().packages[0].files[0].exprs;
    let ExprSpec::Call { func, .. } = &exprs[1] else {
        panic!("expected a call");
    };
    assert_eq!(func, "deriveEqualPtrToBar");
}

#[test]
fn second_run_changes_nothing() {
    let spec = app(vec![call("deriveClone", &[("a", ptr_foo())])]);
    let mut frontend = MemoryFrontend::new(spec);
    let driver = Driver::new(Config::new());
    driver.run(&mut frontend).unwrap();
    let first = frontend.artifact("example.com/app").unwrap().clone();

    let report = driver.run(&mut frontend).unwrap();
    assert!(report.is_unchanged(), "{report:?}");
    assert_eq!(frontend.write_count(), 1);
    assert_eq!(frontend.artifact("example.com/app").unwrap(), &first);
}

#[test]
fn configured_file_name_is_used() {
    let spec = app(vec![call("deriveHash", &[("a", TypeExpr::basic("int"))])]);
    let mut frontend = MemoryFrontend::new(spec);
    let mut config = Config::new();
    config.file_name = "zz_derived.go".into();
    Driver::new(config).run(&mut frontend).unwrap();
    assert_eq!(
        frontend.artifact("example.com/app").unwrap().file_name,
        "zz_derived.go"
    );
}
