//! Class-tagged polymorphic members and base records.
//!
//! Run with: cargo run --example polymorphism

use serde_graph::{polymorphic, Describe, Options, Record, Registry};
use std::error::Error;

#[derive(Debug, Clone, PartialEq, Default)]
struct Shape {
    label: String,
}

impl Record for Shape {
    fn describe(d: &mut Describe<Self>) {
        d.class_key("shapes.Shape");
        d.member("Label", |s| &s.label, |s| &mut s.label);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Circle {
    shape: Shape,
    r: f64,
}

impl Record for Circle {
    fn describe(d: &mut Describe<Self>) {
        d.class_key("shapes.Circle");
        d.base(|c| &c.shape, |c| &mut c.shape);
        d.member("R", |c| &c.r, |c| &mut c.r);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Square {
    shape: Shape,
    side: f64,
}

impl Record for Square {
    fn describe(d: &mut Describe<Self>) {
        d.class_key("shapes.Square");
        d.base(|s| &s.shape, |s| &mut s.shape);
        d.member("Side", |s| &s.side, |s| &mut s.side);
        d.after_read(|s| s.side = s.side.abs());
    }
}

polymorphic! {
    pub enum AnyShape {
        Circle(Circle),
        Square(Square),
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Drawing {
    shapes: Vec<AnyShape>,
}

impl Record for Drawing {
    fn describe(d: &mut Describe<Self>) {
        d.member("Shapes", |d| &d.shapes, |d| &mut d.shapes);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let registry = Registry::new();
    let drawing = Drawing {
        shapes: vec![
            AnyShape::Circle(Circle {
                shape: Shape {
                    label: "sun".to_string(),
                },
                r: 2.5,
            }),
            AnyShape::Square(Square {
                shape: Shape {
                    label: "box".to_string(),
                },
                side: 4.0,
            }),
        ],
    };

    let text = registry.to_string(&drawing, &Options::new())?;
    println!("Drawing:\n{}\n", text);

    let back: Drawing = registry.from_str(&text, &Options::new())?;
    assert_eq!(back, drawing);
    println!("✓ Round-trip successful");

    let fixed: Drawing = registry.from_str(
        r#"{"Shapes":[{"class":"shapes.Square","Label":"neg","Side":-3}]}"#,
        &Options::new(),
    )?;
    println!("After-read hook applied: {:?}", fixed.shapes[0]);

    match registry.from_str::<Drawing>(
        r#"{"Shapes":[{"class":"shapes.Hexagon"}]}"#,
        &Options::new(),
    ) {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("Unknown class rejected: {}", e),
    }

    Ok(())
}
