//! Projection demonstration.
//!
//! This example shows how expose and hide projections, member rules and
//! reusable shapes keep internal-only fields out of serialized output.
//!
//! Run with: `cargo run --example shape_person`

use std::error::Error;

use expose_core::{record, Exposable, Selector, ShapeBuilder};

struct Address {
    city: String,
    zip: String,
}

struct Order {
    id: u64,
    total: f64,
    internal_note: Option<String>,
}

struct Customer {
    name: String,
    password_hash: String,
    address: Address,
    orders: Vec<Order>,
}

record!(Address { city: scalar, zip: scalar });
record!(Order {
    id: scalar,
    total: scalar,
    internal_note: scalar,
});
record!(Customer {
    name: scalar,
    password_hash: scalar,
    address: one(Address),
    orders: many(Order),
});

fn sample_customer() -> Customer {
    Customer {
        name: "Ann".to_string(),
        password_hash: "$argon2id$v=19$m=65536".to_string(),
        address: Address {
            city: "Springfield".to_string(),
            zip: "12345".to_string(),
        },
        orders: vec![
            Order {
                id: 1,
                total: 9.5,
                internal_note: None,
            },
            Order {
                id: 2,
                total: 20.0,
                internal_note: Some("refund requested twice".to_string()),
            },
        ],
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(true)
        .init();

    println!("=== Projection Example ===\n");

    let ann = sample_customer();

    println!("--- Scenario 1: Expose (Allow-List) ---");
    let summary = ann.expose(&"name, address".parse()?)?;
    println!("{}", serde_json::to_string_pretty(&summary.flatten())?);
    println!("Only the listed fields are present; the address is a full snapshot");

    println!("\n--- Scenario 2: Hide (Deny-List) With Member Rules ---");
    let mut public = ann.hide(&Selector::field("password_hash"))?;
    public
        .expose_member(&Selector::field("address"), &Selector::field("city"))?
        .hide_member(&Selector::field("orders"), &Selector::field("internal_note"))?;
    println!("{}", serde_json::to_string_pretty(&public.flatten())?);
    println!("Every order is projected; internal notes never reach the output");

    println!("\n--- Scenario 3: Reusable Shape ---");
    let shape = ShapeBuilder::<Customer>::expose("name, orders".parse()?)
        .expose_member(Selector::field("orders"), "id, total".parse()?)
        .build()?;
    println!("{}", serde_json::to_string(&shape.flatten(&ann))?);
    println!("Selectors were resolved once, when the shape was built");

    println!("\n--- Scenario 4: Invalid Selectors ---");
    match ann.expose(&"name, nickname".parse()?) {
        Ok(_) => println!("Unexpected success"),
        Err(err) => println!("Rejected: {}", err),
    }
    match public.expose_member(&"address, orders".parse()?, &Selector::field("id")) {
        Ok(_) => println!("Unexpected success"),
        Err(err) => println!("Rejected: {}", err),
    }

    println!("\n=== Key Takeaways ===");
    println!("1. expose keeps only what you list, hide drops what you list");
    println!("2. Member rules re-project related records, last rule wins");
    println!("3. Flattened trees serialize with any serde serializer");

    Ok(())
}
