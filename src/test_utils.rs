//! Fixture records and proptest strategies shared by unit tests.

use proptest::prelude::*;

use crate::{record, Selector};

#[derive(Debug)]
pub(crate) struct Address {
    pub(crate) city: String,
    pub(crate) zip: String,
}

#[derive(Debug)]
pub(crate) struct Order {
    pub(crate) id: u64,
    pub(crate) total: f64,
    pub(crate) note: Option<String>,
}

#[derive(Debug)]
pub(crate) struct Person {
    pub(crate) name: String,
    pub(crate) age: u32,
    pub(crate) address: Address,
    pub(crate) manager: Option<Box<Person>>,
    pub(crate) orders: Vec<Order>,
}

record!(Address { city: scalar, zip: scalar });
record!(Order {
    id: scalar,
    total: scalar,
    note: scalar,
});
record!(Person {
    name: scalar,
    age: scalar,
    address: one(Address),
    manager: maybe(Person),
    orders: many(Order),
});

pub(crate) const PERSON_FIELDS: [&str; 5] = ["name", "age", "address", "manager", "orders"];

pub(crate) fn address(city: &str, zip: &str) -> Address {
    Address {
        city: city.to_string(),
        zip: zip.to_string(),
    }
}

/// Ann, 30, living in X with two orders and no manager.
pub(crate) fn sample_person() -> Person {
    Person {
        name: "Ann".to_string(),
        age: 30,
        address: address("X", "1"),
        manager: None,
        orders: vec![
            Order {
                id: 1,
                total: 9.5,
                note: None,
            },
            Order {
                id: 2,
                total: 20.0,
                note: Some("gift".to_string()),
            },
        ],
    }
}

/// Sample person reporting to Bob.
pub(crate) fn managed_person() -> Person {
    Person {
        manager: Some(Box::new(Person {
            name: "Bob".to_string(),
            age: 51,
            address: address("Y", "2"),
            manager: None,
            orders: Vec::new(),
        })),
        ..sample_person()
    }
}

// Strategy: Generate an arbitrary (possibly managed) person
pub(crate) fn arb_person() -> impl Strategy<Value = Person> {
    let order = (any::<u64>(), 0.0f64..1000.0, prop::option::of("[a-z]{1,8}"))
        .prop_map(|(id, total, note)| Order { id, total, note });
    (
        "[A-Za-z]{1,12}",
        any::<u32>(),
        ("[A-Z][a-z]{0,8}", "[0-9]{5}"),
        prop::collection::vec(order, 0..4),
        any::<bool>(),
    )
        .prop_map(|(name, age, (city, zip), orders, managed)| {
            let manager = managed.then(|| {
                Box::new(Person {
                    name: format!("{}-boss", name),
                    age: age / 2,
                    address: address(&city, &zip),
                    manager: None,
                    orders: Vec::new(),
                })
            });
            Person {
                name,
                age,
                address: address(&city, &zip),
                manager,
                orders,
            }
        })
}

// Strategy: Generate an arbitrary subset of Person's field names, in declaration order
pub(crate) fn arb_person_fields() -> impl Strategy<Value = Vec<&'static str>> {
    prop::sample::subsequence(PERSON_FIELDS.to_vec(), 0..=PERSON_FIELDS.len())
}

// Strategy: Generate a valid selector over Person, including chains
pub(crate) fn arb_person_selector() -> impl Strategy<Value = Selector> {
    let leaf = prop_oneof![
        prop::sample::select(PERSON_FIELDS.to_vec()).prop_map(Selector::field),
        prop::sample::select(vec!["city", "zip"])
            .prop_map(|name| Selector::field("address").then(name)),
        prop::sample::select(vec!["id", "total", "note"])
            .prop_map(|name| Selector::field("orders").then(name)),
    ];
    prop::collection::vec(leaf, 0..5).prop_map(Selector::tuple)
}
