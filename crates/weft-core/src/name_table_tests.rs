use crate::{NameId, NameTable};

#[test]
fn ids_are_one_based_and_dense() {
    let mut names = NameTable::new();

    let (a, created_a) = names.get_or_create("alpha");
    let (b, created_b) = names.get_or_create("beta");

    assert_eq!(a.as_u32(), 1);
    assert_eq!(b.as_u32(), 2);
    assert!(created_a);
    assert!(created_b);
}

#[test]
fn second_create_reuses_id() {
    let mut names = NameTable::new();

    let (a, _) = names.get_or_create("alpha");
    let (b, created) = names.get_or_create("alpha");

    assert_eq!(a, b);
    assert!(!created);
    assert_eq!(names.len(), 1);
}

#[test]
fn lookup_is_case_insensitive() {
    let mut names = NameTable::new();

    let (a, _) = names.get_or_create("Foo");
    let (b, created) = names.get_or_create("foo");
    let (c, _) = names.get_or_create("FOO");

    assert_eq!(a, b);
    assert_eq!(a, c);
    assert!(!created);
}

#[test]
fn key_returns_first_seen_spelling() {
    let mut names = NameTable::new();

    let (id, _) = names.get_or_create("Foo");
    names.get_or_create("foo");

    assert_eq!(names.key(id), Some("Foo"));
}

#[test]
fn get_never_creates() {
    let mut names = NameTable::new();

    assert_eq!(names.get("missing"), NameId::NONE);
    assert!(names.is_empty());

    names.get_or_create("present");
    assert_eq!(names.get("PRESENT").as_u32(), 1);
    assert_eq!(names.len(), 1);
}

#[test]
fn key_of_sentinel_or_unknown_id_is_none() {
    let mut names = NameTable::new();
    names.get_or_create("only");

    assert_eq!(names.key(NameId::NONE), None);
    assert_eq!(names.key(NameId::from_raw(2)), None);
}

#[test]
fn iter_yields_names_in_id_order() {
    let mut names = NameTable::new();
    let (a, _) = names.get_or_create("Zeta");
    let (b, _) = names.get_or_create("Alpha");

    let items: Vec<_> = names.iter().collect();
    assert_eq!(items, vec![(a, "Zeta"), (b, "Alpha")]);
}
