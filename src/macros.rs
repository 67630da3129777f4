/// Implements [`Record`](crate::Record) and [`Typed`](crate::Typed) for a
/// struct with named fields.
///
/// Each listed field declares its shape:
///
/// - `scalar`: any [`ToScalar`](crate::ToScalar) value (including `Option`s)
/// - `one(T)`: a related record of type `T`
/// - `maybe(T)`: an `Option<T>` or `Option<Box<T>>` related record; `None`
///   reads as null
/// - `many(T)`: a collection of `T` iterable by reference (e.g. `Vec<T>`)
///
/// Fields left out of the list are invisible to projections.
///
/// # Examples
///
/// ```
/// use expose_core::{record, Record, Typed};
///
/// struct Address {
///     city: String,
///     zip: String,
/// }
///
/// struct Person {
///     name: String,
///     age: u32,
///     address: Address,
///     friends: Vec<Person>,
/// }
///
/// record!(Address { city: scalar, zip: scalar });
/// record!(Person {
///     name: scalar,
///     age: scalar,
///     address: one(Address),
///     friends: many(Person),
/// });
///
/// let names: Vec<_> = Person::static_type_info().field_names().collect();
/// assert_eq!(names, ["name", "age", "address", "friends"]);
/// ```
#[macro_export]
macro_rules! record {
    (@kind scalar) => {
        $crate::FieldKind::Scalar
    };
    (@kind one ($target:ty)) => {
        $crate::FieldKind::One(<$target as $crate::Typed>::static_type_info)
    };
    (@kind maybe ($target:ty)) => {
        $crate::FieldKind::One(<$target as $crate::Typed>::static_type_info)
    };
    (@kind many ($target:ty)) => {
        $crate::FieldKind::Many(<$target as $crate::Typed>::static_type_info)
    };
    (@read scalar $value:expr) => {
        $crate::Value::Scalar($crate::ToScalar::to_scalar($value))
    };
    (@read one $value:expr) => {
        $crate::Value::one($value)
    };
    (@read maybe $value:expr) => {
        $crate::Value::maybe(::core::option::Option::as_ref($value))
    };
    (@read many $value:expr) => {
        $crate::Value::many($value)
    };
    ($name:ident { $($field:ident : $kind:ident $(($target:ty))?),* $(,)? }) => {
        impl $crate::Typed for $name {
            fn static_type_info() -> &'static $crate::TypeInfo {
                static INFO: $crate::TypeInfo = $crate::TypeInfo::new(
                    stringify!($name),
                    &[$(
                        $crate::FieldId::new(
                            stringify!($name),
                            stringify!($field),
                            $crate::record!(@kind $kind $(($target))?),
                        )
                    ),*],
                );
                &INFO
            }
        }

        impl $crate::Record for $name {
            fn type_info(&self) -> &'static $crate::TypeInfo {
                <Self as $crate::Typed>::static_type_info()
            }

            fn read(&self, field: &$crate::FieldId) -> $crate::Value<'_> {
                if field.declaring_type() != stringify!($name) {
                    return $crate::Value::NULL;
                }
                $(
                    if field.name() == stringify!($field) {
                        return $crate::record!(@read $kind &self.$field);
                    }
                )*
                $crate::Value::NULL
            }
        }
    };
}
