//! Basic writing, reading and merging.
//!
//! Run with: cargo run --example simple

use serde_graph::{from_str, from_str_into, to_string, Describe, Record};
use std::error::Error;

#[derive(Debug, Clone, PartialEq, Default)]
struct User {
    id: u32,
    name: String,
    email: Option<String>,
}

impl Record for User {
    fn describe(d: &mut Describe<Self>) {
        d.member("Id", |u| &u.id, |u| &mut u.id);
        d.member("Name", |u| &u.name, |u| &mut u.name);
        d.optional("Email", |u| &u.email, |u| &mut u.email);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let users = vec![
        User {
            id: 42,
            name: "Alice Johnson".to_string(),
            email: Some("alice@example.com".to_string()),
        },
        User {
            id: 43,
            name: "Bob Smith".to_string(),
            email: None,
        },
    ];

    let text = to_string(&users)?;
    println!("Output:\n{}\n", text);

    let users_back: Vec<User> = from_str(&text)?;
    assert_eq!(users, users_back);
    println!("✓ Round-trip successful");

    // Members the input omits keep their current values.
    let mut alice = users[0].clone();
    from_str_into(r#"{"Name":"Alice Cooper"}"#, &mut alice)?;
    println!("After merge: {:?}", alice);
    assert_eq!(alice.email.as_deref(), Some("alice@example.com"));

    Ok(())
}
