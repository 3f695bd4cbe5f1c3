use crate::{Change, HamtError, HamtMap};

#[test]
fn empty_map() {
    let map: HamtMap<String, i32> = HamtMap::new();
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert!(map.to_list().is_empty());
}

#[test]
fn insert_one() {
    let mut map = HamtMap::new();
    let old = map.insert("hello", 42);
    assert_eq!(old, None);
    assert_eq!(map.len(), 1);
    assert!(!map.is_empty());
}

#[test]
fn insert_and_get() {
    let mut map = HamtMap::new();
    map.insert("key", 100);
    assert_eq!(map.get(&"key"), Some(&100));
}

#[test]
fn get_missing_key() {
    let mut map = HamtMap::new();
    map.insert("a", 1);
    assert_eq!(map.get(&"b"), None);
}

#[test]
fn lookup_missing_key_is_an_error() {
    let mut map = HamtMap::new();
    map.insert("a", 1);
    assert_eq!(map.lookup(&"a"), Ok(&1));
    assert_eq!(map.lookup(&"b"), Err(HamtError::KeyNotFound));
    assert_eq!(HamtError::KeyNotFound.to_string(), "key not found");
}

#[test]
fn insert_multiple() {
    let mut map = HamtMap::new();
    for i in 0..10 {
        map.insert(i, i * 10);
    }
    assert_eq!(map.len(), 10);
    for i in 0..10 {
        assert_eq!(map.get(&i), Some(&(i * 10)));
    }
}

#[test]
fn overwrite_value() {
    let mut map = HamtMap::new();
    assert_eq!(map.insert("k", 1), None);
    assert_eq!(map.insert("k", 2), Some(1));
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&"k"), Some(&2));
}

#[test]
fn contains_key_true() {
    let mut map = HamtMap::new();
    map.insert(42, "val");
    assert!(map.contains_key(&42));
}

#[test]
fn contains_key_false() {
    let mut map = HamtMap::new();
    map.insert(1, "a");
    assert!(!map.contains_key(&2));
}

#[test]
fn delete_existing() {
    let mut map = HamtMap::new();
    map.insert("a", 1);
    map.insert("b", 2);
    assert_eq!(map.delete(&"a"), Some(1));
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&"a"), None);
    assert_eq!(map.get(&"b"), Some(&2));
}

#[test]
fn delete_missing() {
    let mut map = HamtMap::new();
    map.insert("a", 1);
    assert_eq!(map.delete(&"z"), None);
    assert_eq!(map.len(), 1);
}

#[test]
fn delete_all() {
    let mut map = HamtMap::new();
    map.insert(1, 10);
    map.insert(2, 20);
    map.insert(3, 30);
    assert_eq!(map.delete(&1), Some(10));
    assert_eq!(map.delete(&2), Some(20));
    assert_eq!(map.delete(&3), Some(30));
    assert!(map.is_empty());
    assert!(map.to_list().is_empty());
}

/// insert a, b, c then delete b.
#[test]
fn abc_scenario() {
    let mut map = HamtMap::new();
    map.insert("a", 1);
    map.insert("b", 2);
    map.insert("c", 3);
    assert_eq!(map.to_ascending_list(), vec![(&"a", &1), (&"b", &2), (&"c", &3)]);

    map.delete(&"b");
    assert_eq!(map.to_ascending_list(), vec![(&"a", &1), (&"c", &3)]);
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&"b"), None);
}

#[test]
fn alter_reports_changes() {
    let mut map = HamtMap::new();
    assert_eq!(map.alter("k", |_| None), Change::Unchanged);
    assert_eq!(map.alter("k", |_| Some(1)), Change::Added);
    assert_eq!(map.alter("k", |v| v.map(|x| x + 1)), Change::Modified);
    assert_eq!(map.get(&"k"), Some(&2));
    assert_eq!(map.alter("k", |_| None), Change::Removed);
    assert!(map.is_empty());
}

#[test]
fn insert_with_combines_new_and_old() {
    let mut map = HamtMap::new();
    assert_eq!(map.insert_with("k", 5, |new, old| new + old), Change::Added);
    assert_eq!(map.get(&"k"), Some(&5));
    assert_eq!(map.insert_with("k", 3, |new, old| new * 10 + old), Change::Modified);
    assert_eq!(map.get(&"k"), Some(&35));
}

#[test]
fn update_modifies_or_removes() {
    let mut map = HamtMap::new();
    map.insert("a", 1);
    map.insert("b", 2);

    assert_eq!(map.update(&"a", |v| Some(v + 100)), Change::Modified);
    assert_eq!(map.get(&"a"), Some(&101));

    assert_eq!(map.update(&"b", |_| None), Change::Removed);
    assert_eq!(map.get(&"b"), None);

    assert_eq!(map.update(&"zz", |v| Some(*v)), Change::Unchanged);
    assert_eq!(map.len(), 1);
}

#[test]
fn update_with_key_sees_the_key() {
    let mut map = HamtMap::new();
    map.insert(3, 10);
    map.insert(4, 10);

    map.update_with_key(&3, |k, v| Some(k * v));
    map.update_with_key(&4, |k, v| (*k != 4).then_some(*v));

    assert_eq!(map.get(&3), Some(&30));
    assert_eq!(map.get(&4), None);
}

#[test]
fn adjust_only_touches_present_keys() {
    let mut map = HamtMap::new();
    map.insert("x", 1);
    assert_eq!(map.adjust(&"x", |v| v * 7), Change::Modified);
    assert_eq!(map.adjust(&"y", |v| v * 7), Change::Unchanged);
    assert_eq!(map.get(&"x"), Some(&7));
    assert!(!map.contains_key(&"y"));
}
