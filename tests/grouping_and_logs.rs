use spark_lookup::{group_by, reverse_order, Grouping, LookupOptions, ObservableLookup, ToLookup};
use tracing::Level;

#[derive(Clone, Debug, PartialEq)]
struct Contact {
    name: &'static str,
    initial: char,
}

fn contacts() -> Vec<Contact> {
    ["Mia", "Ben", "Max", "Ava", "Bea"]
        .into_iter()
        .map(|name| Contact {
            name,
            initial: name.chars().next().unwrap_or('?'),
        })
        .collect()
}

#[test]
fn test_to_lookup_groups_contacts_by_initial() {
    let lookup = contacts().to_lookup(|c| c.initial);

    assert_eq!(lookup.keys().copied().collect::<Vec<_>>(), vec!['A', 'B', 'M']);
    let names: Vec<_> = lookup[&'M'].to_vec().iter().map(|c| c.name).collect();
    assert_eq!(names, vec!["Mia", "Max"]);
}

#[test]
fn test_to_lookup_by_descending() {
    let lookup = contacts().to_lookup_by(reverse_order(), |c| c.initial);
    assert_eq!(lookup.keys().copied().collect::<Vec<_>>(), vec!['M', 'B', 'A']);
}

#[test]
fn test_add_grouping_drops_empty_groups() {
    let mut lookup: ObservableLookup<&str, i32> = ObservableLookup::new();
    let groupings = vec![
        Grouping::new("empty", vec![]),
        Grouping::new("full", vec![1, 2]),
    ];
    for grouping in groupings {
        lookup.add_grouping(grouping);
    }

    assert_eq!(lookup.len(), 1);
    assert!(!lookup.contains(&"empty"));
}

#[test]
fn test_add_grouping_appends_to_live_key() {
    let mut lookup: ObservableLookup<&str, i32> = ObservableLookup::new();
    lookup.add("k", 1);
    lookup.add_grouping(("k", vec![2, 3]).into());
    assert_eq!(lookup.values(&"k"), vec![1, 2, 3]);
}

#[test]
fn test_group_by_then_lookup_keeps_element_order() {
    let groups = group_by(1..=10, |n| n % 2 == 0);
    let mut lookup: ObservableLookup<bool, i32> = ObservableLookup::new();
    for grouping in groups {
        lookup.add_grouping(grouping);
    }
    assert_eq!(lookup.values(&false), vec![1, 3, 5, 7, 9]);
    assert_eq!(lookup.values(&true), vec![2, 4, 6, 8, 10]);
}

#[test]
fn test_mutations_under_trace_subscriber() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_test_writer()
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut lookup: ObservableLookup<u8, u8> =
            ObservableLookup::with_options(LookupOptions::new().reuse_groups(true));
        lookup.add(1, 1);
        lookup.add_all(2, []);
        lookup.remove(&1);
        lookup.add(1, 2);
        lookup.clear();
        // key 2 never went live but its empty group was still kept
        assert_eq!(lookup.purge_retired(), 2);
        lookup.set_reuse_groups(false);
        lookup.set_reuse_groups(true);

        assert!(lookup.is_empty());
    });
}
