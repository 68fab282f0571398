use super::*;

#[test]
fn same_path_same_id() {
    let a = IdPath::root("panel").push_str("page").push_u64(7).finish();
    let b = IdPath::root("panel").push_str("page").push_u64(7).finish();
    assert_eq!(a, b);
}

#[test]
fn different_segments_different_ids() {
    let a = IdPath::root("panel").push_str("page").push_u64(1).finish();
    let b = IdPath::root("panel").push_str("page").push_u64(2).finish();
    let c = IdPath::root("panel").push_str("question").push_u64(1).finish();
    assert_ne!(a, b);
    assert_ne!(a, c);
    assert_ne!(b, c);
}

#[test]
fn separator_prevents_concatenation_collisions() {
    let a = IdPath::root("x").push_str("ab").push_str("c").finish();
    let b = IdPath::root("x").push_str("a").push_str("bc").finish();
    assert_ne!(a, b);
}

#[test]
fn known_fnv_vector() {
    // FNV-1a 64-bit of the empty input is the offset basis.
    let id = IdPath::root("").finish();
    assert_eq!(id, Id::raw(0xcbf29ce484222325));
}
