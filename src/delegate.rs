//! Bound-method members.
//!
//! A [`Delegate`] holds a handler function together with the name it was
//! declared under. Only the name travels on the wire; the record's
//! [`Describe::delegate`](crate::Describe::delegate) table maps it back to a
//! function when reading.

use std::fmt;

/// A named handler bound to a record of type `T`, taking an argument `A`.
///
/// # Examples
///
/// ```rust
/// use serde_graph::Delegate;
///
/// #[derive(Default)]
/// struct Counter {
///     total: i32,
/// }
///
/// fn add(c: &mut Counter, n: i32) {
///     c.total += n;
/// }
///
/// let mut counter = Counter::default();
/// let mut on_tick: Delegate<Counter, i32> = Delegate::default();
/// on_tick.bind("add", add);
/// assert_eq!(on_tick.name(), Some("add"));
/// assert!(on_tick.invoke(&mut counter, 5));
/// assert_eq!(counter.total, 5);
/// ```
pub struct Delegate<T, A = ()> {
    name: Option<&'static str>,
    handler: Option<fn(&mut T, A)>,
}

impl<T, A> Delegate<T, A> {
    /// Binds `handler` under `name`.
    pub fn bind(&mut self, name: &'static str, handler: fn(&mut T, A)) {
        self.name = Some(name);
        self.handler = Some(handler);
    }

    pub fn unbind(&mut self) {
        self.name = None;
        self.handler = None;
    }

    #[must_use]
    pub fn name(&self) -> Option<&'static str> {
        self.name
    }

    #[must_use]
    pub fn handler(&self) -> Option<fn(&mut T, A)> {
        self.handler
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.handler.is_some()
    }

    /// Calls the bound handler on `target`. Returns `false` if nothing is bound.
    pub fn invoke(&self, target: &mut T, arg: A) -> bool {
        match self.handler {
            Some(handler) => {
                handler(target, arg);
                true
            }
            None => false,
        }
    }
}

impl<T, A> Default for Delegate<T, A> {
    fn default() -> Self {
        Delegate {
            name: None,
            handler: None,
        }
    }
}

impl<T, A> Clone for Delegate<T, A> {
    fn clone(&self) -> Self {
        Delegate {
            name: self.name,
            handler: self.handler,
        }
    }
}

// Handlers are compared by declared name; function pointer identity is not stable.
impl<T, A> PartialEq for Delegate<T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<T, A> fmt::Debug for Delegate<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => write!(f, "Delegate({})", name),
            None => f.write_str("Delegate(unbound)"),
        }
    }
}
