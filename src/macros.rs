/// Builds a [`Value`](crate::Value) from JSON-like syntax.
///
/// ```rust
/// use serde_graph::{value, Value};
///
/// let v = value!({ "name": "Alice", "tags": [1, 2], "extra": null });
/// assert_eq!(v.as_map().unwrap().len(), 3);
/// assert_eq!(value!([]), Value::List(vec![]));
/// ```
#[macro_export]
macro_rules! value {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::List(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::List(vec![$($crate::value!($elem)),*])
    };

    ({}) => {
        $crate::Value::Map($crate::ValueMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::ValueMap::new();
        $(
            object.insert($key.to_string(), $crate::value!($value));
        )*
        $crate::Value::Map(object)
    }};

    ($other:expr) => {
        $crate::Value::from($other)
    };
}

/// Declares a fieldless enum with explicit ordinals and makes it a member type.
///
/// The enum gets `Clone`, `Copy`, `Debug`, `PartialEq`, `Eq`, `Hash`, `Default`
/// (the first variant) and the [`Enumeration`](crate::Enumeration),
/// [`Field`](crate::Field) and [`MapKey`](crate::MapKey) implementations.
///
/// ```rust
/// use serde_graph::{enumeration, Enumeration};
///
/// enumeration! {
///     pub enum Level {
///         Low = 0,
///         High = 5,
///     }
/// }
///
/// assert_eq!(Level::High.ordinal(), 5);
/// assert_eq!(Level::from_name("Low"), Some(Level::Low));
/// assert_eq!(Level::default(), Level::Low);
/// ```
#[macro_export]
macro_rules! enumeration {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $first:ident = $first_ordinal:literal
            $(, $variant:ident = $ordinal:literal)* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        $vis enum $name {
            $first = $first_ordinal,
            $($variant = $ordinal,)*
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                $name::$first
            }
        }

        impl $crate::Enumeration for $name {
            const TYPE_NAME: &'static str = stringify!($name);
            const VARIANTS: &'static [(&'static str, i64, Self)] = &[
                (stringify!($first), $first_ordinal, $name::$first),
                $((stringify!($variant), $ordinal, $name::$variant),)*
            ];
        }

        impl $crate::Field for $name {
            fn kind() -> $crate::ValueKind {
                $crate::ValueKind::Enum
            }

            fn is_simple() -> bool {
                true
            }

            fn numeric() -> bool {
                true
            }

            fn write_field(&self, w: &mut $crate::Writer<'_>) -> $crate::Result<()> {
                $crate::field::write_enum(self, w)
            }

            fn read_field(r: &mut $crate::Reader<'_>) -> $crate::Result<Self> {
                $crate::field::read_enum(r)
            }
        }

        impl $crate::MapKey for $name {
            fn to_key(&self) -> String {
                <Self as $crate::Enumeration>::name(self).to_string()
            }

            fn from_key(text: &str, _registry: &$crate::Registry) -> Option<Self> {
                <Self as $crate::Enumeration>::from_name(text).or_else(|| {
                    text.parse::<i64>()
                        .ok()
                        .and_then(<Self as $crate::Enumeration>::from_ordinal)
                })
            }
        }
    };
}

/// Declares a polymorphic slot: a sum over record types read by `"class"` tag.
///
/// Each variant wraps one [`Record`](crate::Record). The value is written with
/// its class tag first; reading dispatches on that tag. A class key that names
/// a record outside the sum is a type mismatch naming the slot, and an unknown
/// key is an unresolved type.
///
/// ```rust
/// use serde_graph::{polymorphic, Describe, Options, Record, Registry};
///
/// #[derive(Debug, Clone, PartialEq, Default)]
/// struct Circle {
///     r: i32,
/// }
///
/// impl Record for Circle {
///     fn describe(d: &mut Describe<Self>) {
///         d.class_key("shapes.Circle");
///         d.member("R", |c| &c.r, |c| &mut c.r);
///     }
/// }
///
/// polymorphic! {
///     pub enum Shape {
///         Circle(Circle),
///     }
/// }
///
/// let registry = Registry::new();
/// let text = registry
///     .to_string(&Shape::Circle(Circle { r: 2 }), &Options::compact())
///     .unwrap();
/// assert_eq!(text, r#"{"class":"shapes.Circle","R":2}"#);
/// let back: Shape = registry.from_str(&text, &Options::new()).unwrap();
/// assert_eq!(back, Shape::Circle(Circle { r: 2 }));
/// ```
#[macro_export]
macro_rules! polymorphic {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident($ty:ty)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        $vis enum $name {
            $($variant($ty),)+
        }

        impl $crate::Polymorphic for $name {
            const SLOT: &'static str = stringify!($name);

            fn as_object(&self) -> &dyn $crate::Object {
                match self {
                    $($name::$variant(value) => value,)+
                }
            }
        }

        impl $crate::Field for $name {
            fn kind() -> $crate::ValueKind {
                $crate::ValueKind::Interface
            }

            fn write_field(&self, w: &mut $crate::Writer<'_>) -> $crate::Result<()> {
                match self {
                    $($name::$variant(value) => w.write_record(value, true),)+
                }
            }

            fn read_field(r: &mut $crate::Reader<'_>) -> $crate::Result<Self> {
                $crate::field::read_polymorphic(r, <Self as $crate::Polymorphic>::SLOT, |key, r| {
                    $(
                        if key == r.registry().entry::<$ty>()?.class_key() {
                            return $crate::field::read_variant::<$ty>(r)
                                .map(|value| Some($name::$variant(value)));
                        }
                    )+
                    Ok(None)
                })
            }
        }
    };
}
