use crate::HamtMap;
use crate::node::Node;
use crate::tests::{CollidingKey, check_map};

/// Two keys with the same hash create a collision node.
#[test]
fn two_colliding_keys() {
    let k1 = CollidingKey::new(1, 0xDEAD_BEEF);
    let k2 = CollidingKey::new(2, 0xDEAD_BEEF);

    let mut map = HamtMap::new();
    map.insert(k1.clone(), "first");
    map.insert(k2.clone(), "second");

    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&k1), Some(&"first"));
    assert_eq!(map.get(&k2), Some(&"second"));
    assert!(matches!(map.root(), Node::Collision { entries_len: 2, .. }));
    check_map(&map);
}

/// The newer pair is stored in front of the older one.
#[test]
fn collision_prepends_new_pair() {
    let k1 = CollidingKey::new(1, 0xF00D);
    let k2 = CollidingKey::new(2, 0xF00D);
    let k3 = CollidingKey::new(3, 0xF00D);

    let mut map = HamtMap::new();
    map.insert(k1.clone(), 1);
    map.insert(k2.clone(), 2);
    map.insert(k3.clone(), 3);

    assert_eq!(map.keys(), vec![&k3, &k2, &k1]);
}

/// Three keys with the same hash.
#[test]
fn three_colliding_keys() {
    let keys: Vec<CollidingKey> = (0..3).map(|i| CollidingKey::new(i, 0xCAFE)).collect();

    let mut map = HamtMap::new();
    for (i, k) in keys.iter().enumerate() {
        map.insert(k.clone(), i);
    }

    assert_eq!(map.len(), 3);
    for (i, k) in keys.iter().enumerate() {
        assert_eq!(map.get(k), Some(&i));
    }
    check_map(&map);
}

/// Delete from collision node.
#[test]
fn delete_from_collision() {
    let k1 = CollidingKey::new(1, 0xAAAA);
    let k2 = CollidingKey::new(2, 0xAAAA);
    let k3 = CollidingKey::new(3, 0xAAAA);

    let mut map = HamtMap::new();
    map.insert(k1.clone(), 10);
    map.insert(k2.clone(), 20);
    map.insert(k3.clone(), 30);

    assert_eq!(map.delete(&k2), Some(20));
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&k1), Some(&10));
    assert_eq!(map.get(&k2), None);
    assert_eq!(map.get(&k3), Some(&30));
    check_map(&map);
}

/// Deleting one of two colliding keys leaves a plain leaf.
#[test]
fn collision_demotes_to_leaf() {
    let k1 = CollidingKey::new(1, 0xBEEF);
    let k2 = CollidingKey::new(2, 0xBEEF);

    let mut map = HamtMap::new();
    map.insert(k1.clone(), 1);
    map.insert(k2.clone(), 2);
    map.delete(&k1);

    assert!(matches!(map.root(), Node::Leaf { .. }));
    let mut fresh = HamtMap::new();
    fresh.insert(k2.clone(), 2);
    assert_eq!(map, fresh);
    check_map(&map);
}

/// Overwrite in collision node.
#[test]
fn overwrite_in_collision() {
    let k1 = CollidingKey::new(1, 0xBBBB);
    let k2 = CollidingKey::new(2, 0xBBBB);

    let mut map = HamtMap::new();
    map.insert(k1.clone(), "old");
    map.insert(k2.clone(), "val2");
    assert_eq!(map.insert(k1.clone(), "new"), Some("old"));

    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&k1), Some(&"new"));
    assert_eq!(map.get(&k2), Some(&"val2"));
}

/// Collision node with delete-all returns to empty.
#[test]
fn collision_delete_all() {
    let k1 = CollidingKey::new(1, 0xCCCC);
    let k2 = CollidingKey::new(2, 0xCCCC);

    let mut map = HamtMap::new();
    map.insert(k1.clone(), 1);
    map.insert(k2.clone(), 2);

    map.delete(&k1);
    map.delete(&k2);
    assert!(map.is_empty());
    assert!(map.root().is_empty());
}

/// Mixed: some keys collide, some don't.
#[test]
fn mixed_collisions_and_normal() {
    let collide_a = CollidingKey::new(1, 0xDDDD);
    let collide_b = CollidingKey::new(2, 0xDDDD);
    let normal = CollidingKey::new(3, 0xEEEE);

    let mut map = HamtMap::new();
    map.insert(collide_a.clone(), "a");
    map.insert(collide_b.clone(), "b");
    map.insert(normal.clone(), "c");

    assert_eq!(map.len(), 3);
    assert_eq!(map.get(&collide_a), Some(&"a"));
    assert_eq!(map.get(&collide_b), Some(&"b"));
    assert_eq!(map.get(&normal), Some(&"c"));
    check_map(&map);

    // Removing the unrelated key hoists the collision node back to the root.
    map.delete(&normal);
    assert!(matches!(map.root(), Node::Collision { .. }));
    check_map(&map);
}

/// Many collision groups spread across the trie.
#[test]
fn many_collision_groups() {
    let mut map = HamtMap::new();
    for group in 0..50_u64 {
        for id in 0..4 {
            map.insert(CollidingKey::new(id, group), group * 10 + u64::from(id));
        }
    }
    assert_eq!(map.len(), 200);
    check_map(&map);

    for group in (0..50_u64).step_by(2) {
        for id in 0..3 {
            map.delete(&CollidingKey::new(id, group));
        }
    }
    assert_eq!(map.len(), 125);
    check_map(&map);
    for group in 0..50_u64 {
        let last = CollidingKey::new(3, group);
        assert_eq!(map.get(&last), Some(&(group * 10 + 3)));
    }
}
