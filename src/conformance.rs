//! Cross-checks the generated and reflective codecs.
//!
//! A [`Harness`] drives both codecs over the same values and inputs and
//! reports the first divergence as a [`Mismatch`]. Outputs must be equal
//! byte for byte; reads must both succeed with equal values, or both fail
//! with the same [`ErrorKind`].
//!
//! ```rust
//! use serde_graph::conformance::Harness;
//! use serde_graph::{Describe, Options, Record, Registry};
//!
//! #[derive(Debug, Clone, PartialEq, Default)]
//! struct Flag {
//!     on: bool,
//! }
//!
//! impl Record for Flag {
//!     fn describe(d: &mut Describe<Self>) {
//!         d.member("On", |f| &f.on, |f| &mut f.on);
//!     }
//! }
//!
//! let registry = Registry::new();
//! let harness = Harness::<Flag>::new(&registry, Options::compact()).unwrap();
//! harness.check_write(&Flag { on: true }).unwrap();
//! harness.check_read(r#"{"On":true}"#).unwrap();
//! harness.check_read(r#"{"Off":true}"#).unwrap();
//! ```

use crate::codec::{Codec, GeneratedCodec, ReflectiveCodec};
use crate::{ErrorKind, Options, Record, Registry, Result};
use thiserror::Error;

/// A divergence between the two codecs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Mismatch {
    #[error("outputs differ:\n reflective: {reflective}\n generated:  {generated}")]
    Output { reflective: String, generated: String },

    #[error("write outcome differs: reflective {reflective:?}, generated {generated:?}")]
    WriteOutcome {
        reflective: Option<ErrorKind>,
        generated: Option<ErrorKind>,
    },

    #[error("read of {input:?} differs: reflective {reflective:?}, generated {generated:?}")]
    ReadOutcome {
        input: String,
        reflective: Option<ErrorKind>,
        generated: Option<ErrorKind>,
    },

    #[error("read of {input:?} produced different values:\n reflective: {reflective}\n generated:  {generated}")]
    State {
        input: String,
        reflective: String,
        generated: String,
    },
}

/// Runs the reflective and generated codecs of `T` side by side.
pub struct Harness<'r, T> {
    reflective: ReflectiveCodec<'r, T>,
    generated: GeneratedCodec<'r, T>,
}

impl<'r, T: Record> Harness<'r, T> {
    /// Builds both codecs; fails if `T` cannot be generated.
    pub fn new(registry: &'r Registry, options: Options) -> Result<Self> {
        Ok(Harness {
            reflective: ReflectiveCodec::new(registry, options.clone()),
            generated: GeneratedCodec::generate(registry, options)?,
        })
    }

    /// Writes `value` with both codecs and compares the text.
    pub fn check_write(&self, value: &T) -> std::result::Result<String, Mismatch> {
        match (self.reflective.to_string(value), self.generated.to_string(value)) {
            (Ok(reflective), Ok(generated)) if reflective == generated => Ok(reflective),
            (Ok(reflective), Ok(generated)) => Err(Mismatch::Output { reflective, generated }),
            (reflective, generated) => compare_kinds(&reflective, &generated)
                .map(|_| String::new())
                .map_err(|(reflective, generated)| Mismatch::WriteOutcome { reflective, generated }),
        }
    }

    /// Reads `input` into fresh values with both codecs.
    pub fn check_read(&self, input: &str) -> std::result::Result<(), Mismatch> {
        let reflective = self.reflective.from_str(input);
        let generated = self.generated.from_str(input);
        compare_reads(input, reflective, generated)
    }

    /// Merges `input` into clones of `initial` with both codecs.
    pub fn check_merge(&self, input: &str, initial: &T) -> std::result::Result<(), Mismatch> {
        let mut reflective = initial.clone();
        let mut generated = initial.clone();
        let reflective_outcome = self
            .reflective
            .merge_from_str(input, &mut reflective)
            .map(|()| reflective);
        let generated_outcome = self
            .generated
            .merge_from_str(input, &mut generated)
            .map(|()| generated);
        compare_reads(input, reflective_outcome, generated_outcome)
    }

    /// Writes `value`, then reads the text back with both codecs.
    pub fn check_round_trip(&self, value: &T) -> std::result::Result<(), Mismatch> {
        let text = self.check_write(value)?;
        if text.is_empty() {
            return Ok(());
        }
        self.check_read(&text)
    }
}

fn compare_kinds<A, B>(
    reflective: &Result<A>,
    generated: &Result<B>,
) -> std::result::Result<(), (Option<ErrorKind>, Option<ErrorKind>)> {
    let reflective = reflective.as_ref().err().map(crate::Error::kind);
    let generated = generated.as_ref().err().map(crate::Error::kind);
    if reflective == generated {
        Ok(())
    } else {
        Err((reflective, generated))
    }
}

fn compare_reads<T: Record>(
    input: &str,
    reflective: Result<T>,
    generated: Result<T>,
) -> std::result::Result<(), Mismatch> {
    if let Err((reflective, generated)) = compare_kinds(&reflective, &generated) {
        return Err(Mismatch::ReadOutcome {
            input: input.to_string(),
            reflective,
            generated,
        });
    }
    match (reflective, generated) {
        (Ok(reflective), Ok(generated)) if reflective != generated => Err(Mismatch::State {
            input: input.to_string(),
            reflective: format!("{:?}", reflective),
            generated: format!("{:?}", generated),
        }),
        _ => Ok(()),
    }
}
