use deriv_ir::{lower, MethodSpec, PackageSpec, Program, ProgramSpec, TypeDeclSpec, TypeExpr};
use deriv_types::Idx;
use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;

use crate::plugin::{Drained, PluginRegistry};
use crate::{Config, DeriveError};

fn decl(name: &str, underlying: TypeExpr) -> TypeDeclSpec {
    TypeDeclSpec {
        name: name.into(),
        underlying,
        methods: Vec::new(),
    }
}

fn program(packages: Vec<PackageSpec>) -> Program {
    lower(&ProgramSpec { packages }, &FxHashMap::default(), &[]).unwrap()
}

fn app(types: Vec<TypeDeclSpec>) -> Program {
    program(vec![PackageSpec {
        types,
        ..PackageSpec::new("app")
    }])
}

fn named(program: &Program, name: &str) -> Idx {
    program.pool.lookup_named("app", name).unwrap()
}

/// Add `calls` to a fresh plugin set for the first package and drain it.
fn derive(program: &mut Program, calls: &[(&str, Vec<Idx>)]) -> Result<Drained, DeriveError> {
    let mut set = PluginRegistry::standard().instantiate(&Config::new(), &program.packages[0])?;
    for (name, args) in calls {
        let dep = set.dispatch(name).unwrap();
        set.add(&program.pool, dep, name, args)?;
    }
    let drained = set.drain(&mut program.pool)?;
    assert!(set.done());
    Ok(drained)
}

fn names(drained: &Drained) -> Vec<&str> {
    drained.decls.iter().map(|d| d.name.as_str()).collect()
}

fn text_of<'a>(drained: &'a Drained, name: &str) -> &'a str {
    &drained.decls.iter().find(|d| d.name == name).unwrap().text
}

fn foo() -> TypeDeclSpec {
    decl(
        "Foo",
        TypeExpr::structure(vec![
            ("A", TypeExpr::basic("int64")),
            ("B", TypeExpr::basic("string")),
        ]),
    )
}

fn list() -> TypeDeclSpec {
    decl(
        "T",
        TypeExpr::structure(vec![
            ("Value", TypeExpr::basic("int")),
            ("next", TypeExpr::pointer(TypeExpr::local("T"))),
        ]),
    )
}

// === equal ===

#[test]
fn equal_on_struct_pointers_short_circuits() {
    let mut p = app(vec![foo()]);
    let ptr = p.pool.pointer(named(&p, "Foo"));
    let drained = derive(&mut p, &[("deriveEqual", vec![ptr, ptr])]).unwrap();
    assert_eq!(names(&drained), vec!["deriveEqual"]);
    assert_eq!(
        text_of(&drained, "deriveEqual"),
        "\
// deriveEqual returns whether this and that are equal.
func deriveEqual(this, that *Foo) bool {
\tif this == nil || that == nil {
\t\treturn this == nil && that == nil
\t}
\tif this.A != that.A {
\t\treturn false
\t}
\tif this.B != that.B {
\t\treturn false
\t}
\treturn true
}
"
    );
}

#[test]
fn equal_on_recursive_type_calls_reserved_names() {
    let mut p = app(vec![list()]);
    let t = named(&p, "T");
    let drained = derive(&mut p, &[("deriveEqual", vec![t, t])]).unwrap();
    assert_eq!(names(&drained), vec!["deriveEqualPtrToT", "deriveEqual"]);

    let outer = text_of(&drained, "deriveEqual");
    assert!(outer.contains("if !deriveEqualPtrToT(this.next, that.next) {"), "{outer}");
    let inner = text_of(&drained, "deriveEqualPtrToT");
    assert!(inner.contains("if this.Value != that.Value {"), "{inner}");
    assert!(inner.contains("if !deriveEqualPtrToT(this.next, that.next) {"), "{inner}");
}

#[test]
fn equal_calls_capability_through() {
    let mut point = decl("Point", TypeExpr::structure(vec![("Tags", TypeExpr::slice(TypeExpr::basic("string")))]));
    point.methods.push(MethodSpec {
        name: "Equal".into(),
        pointer_receiver: false,
        params: vec![TypeExpr::local("Point")],
        results: vec![TypeExpr::basic("bool")],
        variadic: false,
    });
    let mut p = app(vec![point]);
    let slice = p.pool.slice(named(&p, "Point"));
    let drained = derive(&mut p, &[("deriveEqual", vec![slice, slice])]).unwrap();
    assert_eq!(names(&drained), vec!["deriveEqual"]);
    assert!(text_of(&drained, "deriveEqual").contains("if !this[i].Equal(that[i]) {"));
}

#[test]
fn equal_on_maps_checks_presence() {
    let mut p = app(Vec::new());
    let ints = p.pool.slice(Idx::INT);
    let m = p.pool.map(Idx::STRING, ints);
    let drained = derive(&mut p, &[("deriveEqual", vec![m, m])]).unwrap();
    let text = text_of(&drained, "deriveEqual");
    assert!(text.contains("thatv, ok := that[k]"));
    assert!(text.contains("if !deriveEqualSliceOfInt(v, thatv) {"));
    assert_eq!(names(&drained), vec!["deriveEqualSliceOfInt", "deriveEqual"]);
}

#[test]
fn equal_rejects_unsupported_shapes() {
    let mut p = app(vec![decl(
        "Job",
        TypeExpr::structure(vec![("Done", TypeExpr::chan(TypeExpr::basic("bool")))]),
    )]);
    let job = named(&p, "Job");
    let ptr = p.pool.pointer(job);
    let err = derive(&mut p, &[("deriveEqual", vec![ptr, ptr])]).unwrap_err();
    match err {
        DeriveError::UnsupportedType { plugin, ty, .. } => {
            assert_eq!(plugin, "equal");
            assert_eq!(ty, "chan bool");
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn unexported_fields_of_foreign_types_are_rejected() {
    let p = program(vec![
        PackageSpec {
            types: vec![decl(
                "Secret",
                TypeExpr::structure(vec![("key", TypeExpr::slice(TypeExpr::basic("byte")))]),
            )],
            ..PackageSpec::new("vault")
        },
        PackageSpec::new("app"),
    ]);
    let secret = p.pool.lookup_named("vault", "Secret").unwrap();
    let mut set = PluginRegistry::standard()
        .instantiate(&Config::new(), &p.packages[1])
        .unwrap();
    let dep = set.dispatch("deriveHash").unwrap();
    let err = set.add(&p.pool, dep, "deriveHash", &[secret]).unwrap_err();
    assert!(err.to_string().contains("field `key` is not exported"), "{err}");
    assert!(set.done());
}

#[test]
fn equal_on_pointers_to_foreign_plain_structs_compares_whole_values() {
    let mut p = program(vec![
        PackageSpec {
            types: vec![decl("Point", TypeExpr::structure(vec![("x", TypeExpr::basic("int"))]))],
            ..PackageSpec::new("geo")
        },
        PackageSpec::new("app"),
    ]);
    let point = p.pool.lookup_named("geo", "Point").unwrap();
    let ptr = p.pool.pointer(point);
    let mut set = PluginRegistry::standard()
        .instantiate(&Config::new(), &p.packages[1])
        .unwrap();
    let dep = set.dispatch("deriveEqual").unwrap();
    set.add(&p.pool, dep, "deriveEqual", &[ptr, ptr]).unwrap();
    let drained = set.drain(&mut p.pool).unwrap();
    let text = text_of(&drained, "deriveEqual");
    assert!(text.contains("return *this == *that"), "{text}");
    assert!(!text.contains("this.x"), "{text}");
}

// === compare ===

#[test]
fn ordered_walks_reject_maps_keyed_by_pointers() {
    for name in ["deriveCompare", "deriveHash"] {
        let mut p = app(Vec::new());
        let key = p.pool.pointer(Idx::INT);
        let m = p.pool.map(key, Idx::STRING);
        let args = if name == "deriveHash" { vec![m] } else { vec![m, m] };
        let err = derive(&mut p, &[(name, args)]).unwrap_err();
        assert!(matches!(err, DeriveError::UnsupportedType { .. }), "{name}: {err}");
        assert!(err.to_string().contains("map keys must be plain values"), "{err}");
    }
}

#[test]
fn compare_skips_pointer_receiver_methods_on_values() {
    let mut point = decl("Point", TypeExpr::structure(vec![("X", TypeExpr::basic("int"))]));
    point.methods.push(MethodSpec {
        name: "Compare".into(),
        pointer_receiver: true,
        params: vec![TypeExpr::local("Point")],
        results: vec![TypeExpr::basic("int")],
        variadic: false,
    });
    let mut p = app(vec![point]);
    let m = p.pool.map(Idx::STRING, named(&p, "Point"));
    let drained = derive(&mut p, &[("deriveCompare", vec![m, m])]).unwrap();
    let text = text_of(&drained, "deriveCompare");
    assert!(text.contains("deriveComparePoint(this[thisKey], that[thatKey])"), "{text}");
    assert!(!text.contains(".Compare("), "{text}");
    assert!(text_of(&drained, "deriveComparePoint").contains("deriveCompareInt(this.X, that.X)"));
}

#[test]
fn compare_dependencies_precede_their_caller() {
    let mut p = app(vec![foo()]);
    let foo = named(&p, "Foo");
    let drained = derive(&mut p, &[("deriveCompare", vec![foo, foo])]).unwrap();
    assert_eq!(
        names(&drained),
        vec!["deriveCompareInt64", "deriveCompareString", "deriveCompare"]
    );
}

#[test]
fn compare_rejects_mismatched_arguments() {
    let mut p = app(Vec::new());
    let err = derive(&mut p, &[("deriveCompare", vec![Idx::INT, Idx::STRING])]).unwrap_err();
    assert!(matches!(err, DeriveError::SignatureMismatch { .. }));
}

#[test]
fn compare_on_maps_sorts_keys_first() {
    let mut p = app(Vec::new());
    let m = p.pool.map(Idx::STRING, Idx::INT);
    let drained = derive(&mut p, &[("deriveCompare", vec![m, m])]).unwrap();
    assert_eq!(
        names(&drained),
        vec![
            "deriveCompareString",
            "deriveCompareInt",
            "deriveKeysMapOfStringToInt",
            "deriveSortSliceOfString",
            "deriveCompare",
        ]
    );
    let text = text_of(&drained, "deriveCompare");
    assert!(text.contains("thisKeys := deriveSortSliceOfString(deriveKeysMapOfStringToInt(this))"));
    assert!(text.contains("if c := deriveCompareString(thisKey, thatKey); c != 0 {"));
    assert!(text.contains("if c := deriveCompareInt(this[thisKey], that[thatKey]); c != 0 {"));
    assert!(text_of(&drained, "deriveSortSliceOfString").contains("sort.Strings(list)"));
}

#[test]
fn compare_orders_booleans_and_complex_numbers() {
    let mut p = app(Vec::new());
    let drained = derive(
        &mut p,
        &[
            ("deriveCompareBool", vec![Idx::BOOL, Idx::BOOL]),
            ("deriveCompareC", vec![Idx::COMPLEX128, Idx::COMPLEX128]),
        ],
    )
    .unwrap();
    assert!(text_of(&drained, "deriveCompareBool").contains("if !this {"));
    let complex = text_of(&drained, "deriveCompareC");
    assert!(complex.contains("if c := deriveCompareFloat64(real(this), real(that)); c != 0 {"));
    assert!(complex.contains("return deriveCompareFloat64(imag(this), imag(that))"));
}

// === hash ===

#[test]
fn hash_of_map_walks_sorted_keys() {
    let mut p = app(Vec::new());
    let m = p.pool.map(Idx::STRING, Idx::INT);
    let drained = derive(&mut p, &[("deriveHash", vec![m])]).unwrap();
    assert_eq!(
        text_of(&drained, "deriveHash"),
        "\
// deriveHash returns the hash of the object.
func deriveHash(object map[string]int) uint64 {
\tif object == nil {
\t\treturn 0
\t}
\th := uint64(17)
\tfor _, k := range deriveSortSliceOfString(deriveKeysMapOfStringToInt(object)) {
\t\th = 31*h + deriveHashString(k)
\t\th = 31*h + deriveHashInt(object[k])
\t}
\treturn h
}
"
    );
    assert!(drained.imports.contains("sort"));
}

#[test]
fn hash_of_floats_maps_both_zeros_to_zero() {
    let mut p = app(Vec::new());
    let drained = derive(&mut p, &[("deriveHash", vec![Idx::FLOAT64])]).unwrap();
    let text = text_of(&drained, "deriveHash");
    assert!(text.contains("if object == 0 {"));
    assert!(text.contains("math.Float64bits(float64(object))"));
    assert!(drained.imports.contains("math"));
}

// === clone ===

#[test]
fn clone_of_map_preserves_nil_values() {
    let mut p = app(Vec::new());
    let ints = p.pool.slice(Idx::INT);
    let m = p.pool.map(Idx::STRING, ints);
    let drained = derive(&mut p, &[("deriveClone", vec![m])]).unwrap();
    assert_eq!(names(&drained), vec!["deriveCloneSliceOfInt", "deriveClone"]);
    let text = text_of(&drained, "deriveClone");
    assert!(text.contains("dst := make(map[string][]int, len(src))"));
    assert!(text.contains("\t\tif v == nil {\n\t\t\tdst[k] = nil\n\t\t\tcontinue\n\t\t}"));
    assert!(text_of(&drained, "deriveCloneSliceOfInt").contains("copy(dst, src)"));
}

#[test]
fn clone_copies_plain_values() {
    let mut p = app(vec![foo()]);
    let foo = named(&p, "Foo");
    let drained = derive(&mut p, &[("deriveClone", vec![foo])]).unwrap();
    assert!(text_of(&drained, "deriveClone").contains("\treturn src\n"));
}

#[test]
fn clone_of_struct_replaces_deep_fields() {
    let mut p = app(vec![list()]);
    let t = named(&p, "T");
    let drained = derive(&mut p, &[("deriveClone", vec![t])]).unwrap();
    let text = text_of(&drained, "deriveClone");
    assert!(text.contains("dst := src"));
    assert!(text.contains("dst.next = deriveClonePtrToT(src.next)"));
    assert!(!text.contains("dst.Value"));
    assert!(text_of(&drained, "deriveClonePtrToT").contains("dst := new(T)"));
}

// === secondary plugins ===

#[test]
fn min_over_struct_generates_compare() {
    let mut p = app(vec![foo()]);
    let foo = named(&p, "Foo");
    let drained = derive(&mut p, &[("deriveMin", vec![foo, foo])]).unwrap();
    assert_eq!(
        names(&drained),
        vec!["deriveCompareInt64", "deriveCompareString", "deriveCompareFoo", "deriveMin"]
    );
    assert!(text_of(&drained, "deriveMin").contains("if deriveCompareFoo(a, b) < 0 {"));
}

#[test]
fn max_over_list_of_ordered_values_uses_operator() {
    let mut p = app(Vec::new());
    let ints = p.pool.slice(Idx::INT);
    let drained = derive(&mut p, &[("deriveMax", vec![ints, Idx::INT])]).unwrap();
    assert_eq!(names(&drained), vec!["deriveMax"]);
    let text = text_of(&drained, "deriveMax");
    assert!(text.contains("func deriveMax(list []int, def int) int {"));
    assert!(text.contains("if v > m {"));
}

#[test]
fn sort_of_named_elements_uses_compare() {
    let mut p = app(vec![foo()]);
    let foos = p.pool.slice(named(&p, "Foo"));
    let drained = derive(&mut p, &[("deriveSort", vec![foos])]).unwrap();
    assert!(text_of(&drained, "deriveSort").contains("return deriveCompareFoo(list[i], list[j]) < 0"));
}

#[test]
fn set_operations_share_contains() {
    let mut p = app(Vec::new());
    let strings = p.pool.slice(Idx::STRING);
    let drained = derive(
        &mut p,
        &[
            ("deriveUnion", vec![strings, strings]),
            ("deriveUnique", vec![strings]),
        ],
    )
    .unwrap();
    assert_eq!(
        names(&drained),
        vec!["deriveContainsSliceOfString", "deriveUnion", "deriveUnique"]
    );
    assert!(text_of(&drained, "deriveContainsSliceOfString").contains("if v == item {"));
    assert!(text_of(&drained, "deriveUnique")
        .contains("if !deriveContainsSliceOfString(list[:j], list[i]) {"));
}

#[test]
fn mem_hashes_and_compares_parameters() {
    let mut p = app(Vec::new());
    let func = p.pool.signature(&[Idx::INT, Idx::STRING], &[Idx::FLOAT64], false);
    let drained = derive(&mut p, &[("deriveMem", vec![func])]).unwrap();
    let text = text_of(&drained, "deriveMem");
    assert!(text.contains("func deriveMem(f func(int, string) float64) func(int, string) float64 {"));
    assert!(text.contains("h = 31*h + deriveHashInt(param0)"));
    assert!(text.contains("if e.param0 == param0 && e.param1 == param1 {"));
    assert!(text.contains("res0 := f(param0, param1)"));
}

#[test]
fn mem_requires_results() {
    let mut p = app(Vec::new());
    let func = p.pool.signature(&[Idx::INT], &[], false);
    let err = derive(&mut p, &[("deriveMem", vec![func])]).unwrap_err();
    assert!(matches!(err, DeriveError::SignatureMismatch { .. }));
}

#[test]
fn keys_result_is_slice_of_key_type() {
    let mut p = app(Vec::new());
    let m = p.pool.map(Idx::STRING, Idx::BOOL);
    let drained = derive(&mut p, &[("deriveKeys", vec![m])]).unwrap();
    let strings = p.pool.slice(Idx::STRING);
    assert_eq!(drained.decls[0].results, vec![strings]);
}
