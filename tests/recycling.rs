use spark_lookup::{GroupChange, LookupOptions, ObservableLookup};
use std::cell::RefCell;
use std::rc::Rc;

fn recycling() -> ObservableLookup<&'static str, i32> {
    ObservableLookup::with_options(LookupOptions::new().reuse_groups(true))
}

#[test]
fn test_identity_survives_many_cycles() {
    let mut lookup = recycling();
    lookup.add("k", 0);
    let original = lookup.get(&"k").cloned().unwrap();

    for round in 1..=5 {
        assert!(lookup.remove(&"k"));
        assert!(!lookup.contains(&"k"));
        assert!(lookup.is_retired(&"k"));

        lookup.add("k", round);
        assert!(Rc::ptr_eq(&original, lookup.get(&"k").unwrap()));
        assert_eq!(original.to_vec(), vec![round]);
    }
}

#[test]
fn test_group_observers_survive_retirement() {
    let mut lookup = recycling();
    lookup.add("k", 1);

    let changes = Rc::new(RefCell::new(Vec::new()));
    let sink = changes.clone();
    lookup[&"k"].subscribe(move |change: &GroupChange<i32>| sink.borrow_mut().push(change.clone()));

    lookup.remove(&"k");
    lookup.add("k", 2);

    assert_eq!(
        *changes.borrow(),
        vec![GroupChange::Reset, GroupChange::Added { index: 0, count: 1 }]
    );
}

#[test]
fn test_key_is_never_live_and_retired_at_once() {
    let mut lookup = recycling();
    let keys = ["a", "b", "c"];

    for key in keys {
        lookup.add(key, 1);
    }
    lookup.remove(&"b");
    lookup.add_all("c", vec![2, 3]);
    lookup.clear();
    lookup.add("a", 4);
    lookup.add_all("b", Vec::new());

    for key in keys {
        assert!(
            !(lookup.contains(&key) && lookup.is_retired(&key)),
            "{key} is both live and retired"
        );
    }
    assert!(lookup.contains(&"a"));
    assert!(lookup.is_retired(&"b"));
    assert!(lookup.is_retired(&"c"));
    assert_eq!(lookup.retired_len(), 2);
}

#[test]
fn test_retired_groups_are_empty() {
    let mut lookup = recycling();
    lookup.add_all("x", vec![1, 2, 3]);
    lookup.add_all("y", vec![4]);
    let x = lookup.get(&"x").cloned().unwrap();
    let y = lookup.get(&"y").cloned().unwrap();

    lookup.remove(&"x");
    lookup.clear();

    assert!(x.is_empty());
    assert!(y.is_empty());
}

#[test]
fn test_enabling_reuse_later_only_affects_future_removals() {
    let mut lookup: ObservableLookup<&str, i32> = ObservableLookup::new();
    lookup.add("early", 1);
    lookup.remove(&"early");
    assert_eq!(lookup.retired_len(), 0);

    lookup.set_reuse_groups(true);
    assert!(lookup.options().reuse_groups);
    lookup.add("late", 1);
    let late = lookup.get(&"late").cloned().unwrap();
    lookup.remove(&"late");
    lookup.add("late", 2);

    assert!(Rc::ptr_eq(&late, lookup.get(&"late").unwrap()));
}

#[test]
fn test_pool_grows_until_purged() {
    let mut lookup: ObservableLookup<u32, u32> =
        ObservableLookup::with_options(LookupOptions::new().reuse_groups(true));

    for key in 0..100 {
        lookup.add(key, key);
        lookup.remove(&key);
    }
    assert_eq!(lookup.retired_len(), 100);
    assert!(lookup.is_empty());

    assert_eq!(lookup.purge_retired(), 100);
    assert_eq!(lookup.retired_len(), 0);
    assert!(lookup.reuse_groups());
}
