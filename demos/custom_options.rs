//! Customizing output with Options.
//!
//! Run with: cargo run --example custom_options

use serde_graph::{enumeration, to_string_with_options, Describe, Options, Record, TagMode};
use std::error::Error;

enumeration! {
    pub enum Level {
        Trace = 0,
        Info = 1,
        Warn = 2,
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Config {
    name: String,
    level: Level,
    max_bytes: i64,
    retries: u8,
}

impl Record for Config {
    fn describe(d: &mut Describe<Self>) {
        d.class_key("demo.Config");
        d.member("Name", |c| &c.name, |c| &mut c.name);
        d.member("Level", |c| &c.level, |c| &mut c.level);
        d.member("MaxBytes", |c| &c.max_bytes, |c| &mut c.max_bytes);
        d.defaulted("Retries", 3, |c| &c.retries, |c| &mut c.retries);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config {
        name: "MyApp".to_string(),
        level: Level::Warn,
        max_bytes: 1 << 40,
        retries: 3,
    };

    println!("Default layout:");
    println!("{}\n", to_string_with_options(&config, &Options::new())?);

    println!("Compact:");
    println!("{}\n", to_string_with_options(&config, &Options::compact())?);

    println!("Enums by name, 64-bit integers quoted:");
    let readable = Options::compact()
        .with_enum_as_string(true)
        .with_int64_as_string(true);
    println!("{}\n", to_string_with_options(&config, &readable)?);

    println!("Aliases, with the class tag at the root:");
    let short = Options::compact()
        .with_tag_mode(TagMode::Aliases)
        .with_save_root_class(true);
    println!("{}\n", to_string_with_options(&config, &short)?);

    println!("Two-space indent:");
    let spaced = Options::new().with_indent("  ");
    println!("{}", to_string_with_options(&config, &spaced)?);

    Ok(())
}
