//! Type-erased records for untyped slots.
//!
//! [`Value::Typed`](crate::Value::Typed) holds a `Box<dyn Object>`: a record
//! whose concrete type was chosen by the `"class"` tag at read time. Every
//! [`Record`] is an `Object`.

use crate::{Record, Registry, Result, Writer};
use std::any::Any;
use std::fmt;

/// A record behind a trait object.
pub trait Object: Any + fmt::Debug {
    /// The class key this record is written under.
    fn class_key(&self, registry: &Registry) -> Result<String>;

    /// Writes the record as an object that starts with its `"class"` tag.
    fn write_object(&self, w: &mut Writer<'_>) -> Result<()>;

    fn clone_object(&self) -> Box<dyn Object>;

    fn eq_object(&self, other: &dyn Object) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Record> Object for T {
    fn class_key(&self, registry: &Registry) -> Result<String> {
        Ok(registry.entry::<T>()?.class_key().to_string())
    }

    fn write_object(&self, w: &mut Writer<'_>) -> Result<()> {
        w.write_record(self, true)
    }

    fn clone_object(&self) -> Box<dyn Object> {
        Box::new(self.clone())
    }

    fn eq_object(&self, other: &dyn Object) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl dyn Object {
    /// Returns the record as `T` if that is its concrete type.
    #[must_use]
    pub fn downcast_ref<T: Record>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Record>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

impl Clone for Box<dyn Object> {
    fn clone(&self) -> Self {
        self.clone_object()
    }
}

impl PartialEq for dyn Object {
    fn eq(&self, other: &Self) -> bool {
        self.eq_object(other)
    }
}
