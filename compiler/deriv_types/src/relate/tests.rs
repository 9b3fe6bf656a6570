use pretty_assertions::assert_eq;

use super::*;
use crate::{Field, IfaceMethod, Method};

fn pool_with_point() -> (Pool, Idx) {
    let mut pool = Pool::new();
    let point = pool.named("geo", "Point");
    let body = pool.structure(vec![Field::new("X", Idx::INT64), Field::new("Y", Idx::INT64)]);
    pool.set_underlying(point, body);
    (pool, point)
}

#[test]
fn named_and_anonymous_struct_are_assignable() {
    let (pool, point) = pool_with_point();
    let body = pool.underlying(point);
    assert!(pool.assignable(body, point));
    assert!(pool.assignable(point, body));
}

#[test]
fn distinct_named_types_are_not_assignable() {
    let (mut pool, point) = pool_with_point();
    let other = pool.named("geo", "Vec");
    let body = pool.underlying(point);
    pool.set_underlying(other, body);
    assert!(!pool.assignable(point, other));
    assert!(!pool.assignable(Idx::INT, Idx::INT64));

    let celsius = pool.named("temp", "Celsius");
    pool.set_underlying(celsius, Idx::FLOAT64);
    assert!(!pool.assignable(Idx::FLOAT64, celsius));
}

#[test]
fn interface_assignability_uses_method_sets() {
    let (mut pool, point) = pool_with_point();
    let hash_sig = pool.signature(&[], &[Idx::UINT64], false);
    pool.add_method(
        point,
        Method {
            name: "Hash".into(),
            signature: hash_sig,
            pointer_receiver: true,
        },
    );
    let hasher = pool.interface(vec![IfaceMethod {
        name: "Hash".into(),
        signature: hash_sig,
    }]);
    let ptr = pool.pointer(point);
    assert!(pool.assignable(ptr, hasher));
    assert!(!pool.assignable(point, hasher));
    let any = pool.empty_interface();
    assert!(pool.assignable(Idx::STRING, any));
}

#[test]
fn bidirectional_channel_assigns_to_directional() {
    let mut pool = Pool::new();
    let both = pool.chan(ChanDir::Both, Idx::INT);
    let recv = pool.chan(ChanDir::Recv, Idx::INT);
    let recv_str = pool.chan(ChanDir::Recv, Idx::STRING);
    assert!(pool.assignable(both, recv));
    assert!(!pool.assignable(recv, both));
    assert!(!pool.assignable(both, recv_str));
}

#[test]
fn comparability_follows_shape() {
    let (mut pool, point) = pool_with_point();
    let slice = pool.slice(Idx::INT);
    let with_slice = pool.structure(vec![Field::new("S", slice)]);
    let arr = pool.array(3, point);
    let map = pool.map(Idx::STRING, Idx::INT);
    let func = pool.signature(&[], &[], false);

    assert!(pool.comparable(point));
    assert!(pool.comparable(arr));
    assert!(!pool.comparable(slice));
    assert!(!pool.comparable(with_slice));
    assert!(!pool.comparable(map));
    assert!(!pool.comparable(func));
    assert!(!pool.comparable(Idx::INVALID));
}

#[test]
fn recursive_type_is_comparable_through_pointer() {
    let mut pool = Pool::new();
    let node = pool.named("p", "Node");
    let ptr = pool.pointer(node);
    let body = pool.structure(vec![Field::new("next", ptr)]);
    pool.set_underlying(node, body);
    assert!(pool.comparable(node));
    assert!(!pool.has_invalid(node));
}

#[test]
fn has_invalid_is_deep() {
    let mut pool = Pool::new();
    let pending = pool.named("p", "Pending");
    let slice = pool.slice(Idx::INVALID);
    let map = pool.map(Idx::STRING, slice);
    let ok = pool.map(Idx::STRING, Idx::INT);
    assert!(pool.has_invalid(map));
    assert!(pool.has_invalid(pending));
    assert!(pool.has_invalid(Idx::NONE));
    assert!(!pool.has_invalid(ok));
}

#[test]
fn method_sets_distinguish_receivers() {
    let (mut pool, point) = pool_with_point();
    let eq_sig = pool.signature(&[point], &[Idx::BOOL], false);
    let clone_sig = pool.signature(&[], &[point], false);
    pool.add_method(
        point,
        Method {
            name: "Equal".into(),
            signature: eq_sig,
            pointer_receiver: false,
        },
    );
    pool.add_method(
        point,
        Method {
            name: "Clone".into(),
            signature: clone_sig,
            pointer_receiver: true,
        },
    );
    let ptr = pool.pointer(point);

    assert_eq!(pool.method(point, "Equal"), Some(eq_sig));
    assert_eq!(pool.method(point, "Clone"), None);
    assert_eq!(pool.method(ptr, "Clone"), Some(clone_sig));
    assert_eq!(pool.method(ptr, "Equal"), Some(eq_sig));
    assert!(pool.has_method(point, "Equal", &[point], &[Idx::BOOL]));
    assert!(!pool.has_method(point, "Equal", &[ptr], &[Idx::BOOL]));
}

#[test]
fn nilable_through_named_types() {
    let mut pool = Pool::new();
    let slice = pool.slice(Idx::INT);
    let ints = pool.named("p", "Ints");
    pool.set_underlying(ints, slice);
    assert!(pool.is_nilable(ints));
    assert!(!pool.is_nilable(Idx::INT));
}
