use std::collections::BTreeSet;

use pretty_assertions::assert_eq;

use super::*;
use crate::{ChanDir, Field, IfaceMethod};

#[test]
fn basics_at_fixed_indices() {
    let pool = Pool::new();
    for kind in BasicKind::ALL {
        assert_eq!(pool.data(kind.idx()), &TypeData::Basic(kind));
    }
    assert_eq!(pool.len(), Idx::PRIMITIVE_COUNT as usize);
}

#[test]
fn structural_types_are_hash_consed() {
    let mut pool = Pool::new();
    let a = pool.slice(Idx::STRING);
    let b = pool.slice(Idx::STRING);
    assert_eq!(a, b);

    let m1 = pool.map(Idx::STRING, Idx::INT);
    let m2 = pool.map(Idx::INT, Idx::STRING);
    assert_ne!(m1, m2);

    let s1 = pool.structure(vec![Field::new("A", Idx::INT64)]);
    let s2 = pool.structure(vec![Field::new("A", Idx::INT64)]);
    assert_eq!(s1, s2);
}

#[test]
fn out_of_range_reads_as_invalid() {
    let pool = Pool::new();
    assert_eq!(pool.data(Idx::NONE), &TypeData::Basic(BasicKind::Invalid));
    assert_eq!(
        pool.data(Idx::from_raw(9999)),
        &TypeData::Basic(BasicKind::Invalid)
    );
}

#[test]
fn named_types_are_interned_by_identity() {
    let mut pool = Pool::new();
    let a = pool.named("example.com/geo", "Point");
    let b = pool.named("example.com/geo", "Point");
    let c = pool.named("example.com/other", "Point");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(pool.lookup_named("example.com/geo", "Point"), Some(a));
    assert_eq!(pool.lookup_named("example.com/geo", "Line"), None);
}

#[test]
fn self_referential_named_type() {
    let mut pool = Pool::new();
    let list = pool.named("p", "List");
    let ptr = pool.pointer(list);
    let body = pool.structure(vec![Field::new("Value", Idx::INT), Field::new("next", ptr)]);
    pool.set_underlying(list, body);

    assert_eq!(pool.underlying(list), body);
    assert_eq!(pool.format_type(list, "p"), "List");
    assert_eq!(
        pool.format_type(body, "p"),
        "struct{ Value int; next *List }"
    );
}

#[test]
fn incomplete_named_type_underlying_is_invalid() {
    let mut pool = Pool::new();
    let t = pool.named("p", "Pending");
    assert_eq!(pool.underlying(t), Idx::INVALID);
}

#[test]
fn named_chain_resolves_to_first_shape() {
    let mut pool = Pool::new();
    let inner = pool.named("p", "Inner");
    let outer = pool.named("p", "Outer");
    pool.set_underlying(inner, Idx::STRING);
    pool.set_underlying(outer, inner);
    assert_eq!(pool.underlying(outer), Idx::STRING);
}

#[test]
fn methods_stay_sorted_and_replace() {
    let mut pool = Pool::new();
    let t = pool.named("p", "T");
    let sig = pool.signature(&[], &[Idx::UINT64], false);
    let sig2 = pool.signature(&[], &[Idx::INT], false);
    pool.add_method(
        t,
        Method {
            name: "Hash".into(),
            signature: sig,
            pointer_receiver: false,
        },
    );
    pool.add_method(
        t,
        Method {
            name: "Equal".into(),
            signature: sig,
            pointer_receiver: false,
        },
    );
    pool.add_method(
        t,
        Method {
            name: "Hash".into(),
            signature: sig2,
            pointer_receiver: true,
        },
    );
    let def = pool.named_def(t).expect("named");
    let names: Vec<_> = def.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Equal", "Hash"]);
    assert_eq!(def.methods[1].signature, sig2);
}

#[test]
fn format_composites() {
    let mut pool = Pool::new();
    let dur = pool.named("time", "Duration");
    let local = pool.named("example.com/app", "Point");
    let ptr = pool.pointer(local);
    let slice = pool.slice(ptr);
    let arr = pool.array(4, Idx::UINT8);
    let map = pool.map(Idx::STRING, dur);
    let variadic = pool.slice(Idx::STRING);
    let func = pool.signature(&[Idx::INT, variadic], &[Idx::BOOL, Idx::INT], true);
    let unary = pool.signature(&[ptr], &[Idx::BOOL], false);

    let app = "example.com/app";
    assert_eq!(pool.format_type(slice, app), "[]*Point");
    assert_eq!(pool.format_type(arr, app), "[4]uint8");
    assert_eq!(pool.format_type(map, app), "map[string]time.Duration");
    assert_eq!(pool.format_type(func, app), "func(int, ...string) (bool, int)");
    assert_eq!(pool.format_type(unary, app), "func(*Point) bool");
    assert_eq!(pool.format_type(local, "time"), "app.Point");
}

#[test]
fn format_uses_declared_package_name() {
    let mut pool = Pool::new();
    pool.set_package_name("example.com/geo/v2", "geo");
    let t = pool.named("example.com/geo/v2", "Point");
    assert_eq!(pool.format_type(t, "main"), "geo.Point");
}

#[test]
fn format_channels_and_interfaces() {
    let mut pool = Pool::new();
    let recv = pool.chan(ChanDir::Recv, Idx::INT);
    let nested = pool.chan(ChanDir::Both, recv);
    let send = pool.chan(ChanDir::Send, Idx::STRING);
    let sig = pool.signature(&[], &[Idx::UINT64], false);
    let iface = pool.interface(vec![IfaceMethod {
        name: "Hash".into(),
        signature: sig,
    }]);
    let empty = pool.empty_interface();

    assert_eq!(pool.format_type(recv, "p"), "<-chan int");
    assert_eq!(pool.format_type(nested, "p"), "chan (<-chan int)");
    assert_eq!(pool.format_type(send, "p"), "chan<- string");
    assert_eq!(pool.format_type(iface, "p"), "interface{ Hash() uint64 }");
    assert_eq!(pool.format_type(empty, "p"), "interface{}");
}

#[test]
fn packages_of_collects_foreign_names() {
    let mut pool = Pool::new();
    let dur = pool.named("time", "Duration");
    let local = pool.named("app", "Point");
    let map = pool.map(local, dur);
    let ptr = pool.pointer(Idx::UNSAFE_POINTER);
    let s = pool.structure(vec![Field::new("M", map), Field::new("P", ptr)]);

    let mut out = BTreeSet::new();
    pool.packages_of(s, "app", &mut out);
    let got: Vec<_> = out.into_iter().collect();
    assert_eq!(got, vec!["time".to_owned(), "unsafe".to_owned()]);
}
