//! Fixture records shared by the integration tests.

#![allow(dead_code)]

use expose_core::record;
use proptest::prelude::*;

#[derive(Debug)]
pub struct Address {
    pub city: String,
    pub zip: String,
}

#[derive(Debug)]
pub struct LineItem {
    pub sku: String,
    pub quantity: u32,
    pub cost_price: f64,
}

#[derive(Debug)]
pub struct Order {
    pub id: u64,
    pub items: Vec<LineItem>,
    pub internal_note: Option<String>,
}

#[derive(Debug)]
pub struct Person {
    pub name: String,
    pub age: i32,
    pub address: Address,
    pub billing: Option<Address>,
    pub orders: Vec<Order>,
}

record!(Address { city: scalar, zip: scalar });
record!(LineItem {
    sku: scalar,
    quantity: scalar,
    cost_price: scalar,
});
record!(Order {
    id: scalar,
    items: many(LineItem),
    internal_note: scalar,
});
record!(Person {
    name: scalar,
    age: scalar,
    address: one(Address),
    billing: maybe(Address),
    orders: many(Order),
});

pub const PERSON_FIELDS: [&str; 5] = ["name", "age", "address", "billing", "orders"];

/// `Person{Name:"Ann", Age:30, Address:{City:"X", Zip:"1"}}` with no orders.
pub fn ann() -> Person {
    Person {
        name: "Ann".to_string(),
        age: 30,
        address: Address {
            city: "X".to_string(),
            zip: "1".to_string(),
        },
        billing: None,
        orders: Vec::new(),
    }
}

/// Ann with two orders, the first holding two line items.
pub fn ann_with_orders() -> Person {
    Person {
        orders: vec![
            Order {
                id: 10,
                items: vec![
                    LineItem {
                        sku: "A-1".to_string(),
                        quantity: 2,
                        cost_price: 1.25,
                    },
                    LineItem {
                        sku: "B-7".to_string(),
                        quantity: 1,
                        cost_price: 9.0,
                    },
                ],
                internal_note: Some("vip".to_string()),
            },
            Order {
                id: 11,
                items: Vec::new(),
                internal_note: None,
            },
        ],
        ..ann()
    }
}

// Strategy: Generate arbitrary people with nested orders
pub fn arb_person() -> impl Strategy<Value = Person> {
    let item = ("[A-Z]-[0-9]{1,3}", any::<u32>(), 0.0f64..100.0).prop_map(
        |(sku, quantity, cost_price)| LineItem {
            sku,
            quantity,
            cost_price,
        },
    );
    let order = (
        any::<u64>(),
        prop::collection::vec(item, 0..3),
        prop::option::of("[a-z ]{0,10}"),
    )
        .prop_map(|(id, items, internal_note)| Order {
            id,
            items,
            internal_note,
        });
    let address = ("[A-Z][a-z]{0,8}", "[0-9]{4,5}").prop_map(|(city, zip)| Address { city, zip });
    (
        "[A-Za-z]{1,10}",
        any::<i32>(),
        address.clone(),
        prop::option::of(address),
        prop::collection::vec(order, 0..3),
    )
        .prop_map(|(name, age, address, billing, orders)| Person {
            name,
            age,
            address,
            billing,
            orders,
        })
}

// Strategy: Generate an arbitrary subset of Person's field names
pub fn arb_person_fields() -> impl Strategy<Value = Vec<&'static str>> {
    prop::sample::subsequence(PERSON_FIELDS.to_vec(), 0..=PERSON_FIELDS.len())
}
