//! Working with Value for untyped data.
//!
//! Run with: cargo run --example dynamic_values

use serde_graph::{from_str_dynamic, register, to_string, value, Describe, Record, Value};
use std::error::Error;

#[derive(Debug, Clone, PartialEq, Default)]
struct User {
    id: u32,
    name: String,
    roles: Vec<String>,
}

impl Record for User {
    fn describe(d: &mut Describe<Self>) {
        d.class_key("demo.User");
        d.member("Id", |u| &u.id, |u| &mut u.id);
        d.member("Name", |u| &u.name, |u| &mut u.name);
        d.member("Roles", |u| &u.roles, |u| &mut u.roles);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = value!({
        "host": "localhost",
        "port": 8080,
        "features": ["auth", "logging", "metrics"],
        "debug": true
    });

    println!("Config:\n{}\n", to_string(&config)?);

    if let Value::Map(map) = &config {
        if let Some(host) = map.get("host").and_then(Value::as_str) {
            println!("Accessing field 'host': {}", host);
        }
        if let Some(port) = map.get("port").and_then(Value::as_i64) {
            println!("Accessing field 'port': {}", port);
        }
        if let Some(features) = map.get("features").and_then(Value::as_list) {
            println!("Accessing field 'features': {} items\n", features.len());
        }
    }

    // Class-tagged objects become typed records once their class is registered.
    register::<User>()?;
    let parsed = from_str_dynamic(
        r#"{"owner":{"class":"demo.User","Id":7,"Name":"Ann","Roles":["admin"]}}"#,
    )?;
    let owner = parsed
        .as_map()
        .and_then(|map| map.get("owner"))
        .and_then(Value::as_typed::<User>);
    println!("Typed owner: {:?}", owner);

    Ok(())
}
