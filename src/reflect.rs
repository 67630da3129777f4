//! Reflection capability consumed by the projection engine.
//!
//! A type takes part in projections by implementing [`Record`] (read values
//! from an instance) and [`Typed`] (describe the type without an instance).
//! The [`record!`](crate::record) macro implements both for plain structs.

use std::fmt;

/// A scalar field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// No value (also used for an absent optional related record).
    Null,
    /// A boolean.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// An unsigned integer that may not fit in `i64`.
    UInt(u64),
    /// A floating point number.
    Float(f64),
    /// A string.
    String(String),
}

impl Scalar {
    /// Returns `true` for [`Scalar::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::UInt(u) => write!(f, "{}", u),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::String(s) => write!(f, "{:?}", s),
        }
    }
}

/// Conversion of a field's Rust value into a [`Scalar`].
pub trait ToScalar {
    /// Returns the scalar representation of `self`.
    fn to_scalar(&self) -> Scalar;
}

macro_rules! signed_to_scalar {
    ($($t:ty),*) => {
        $(impl ToScalar for $t {
            fn to_scalar(&self) -> Scalar {
                Scalar::Int(i64::from(*self))
            }
        })*
    };
}

macro_rules! unsigned_to_scalar {
    ($($t:ty),*) => {
        $(impl ToScalar for $t {
            fn to_scalar(&self) -> Scalar {
                Scalar::UInt(u64::from(*self))
            }
        })*
    };
}

signed_to_scalar!(i8, i16, i32, i64);
unsigned_to_scalar!(u8, u16, u32, u64);

impl ToScalar for isize {
    fn to_scalar(&self) -> Scalar {
        Scalar::Int(*self as i64)
    }
}

impl ToScalar for usize {
    fn to_scalar(&self) -> Scalar {
        Scalar::UInt(*self as u64)
    }
}

impl ToScalar for f32 {
    fn to_scalar(&self) -> Scalar {
        Scalar::Float(f64::from(*self))
    }
}

impl ToScalar for f64 {
    fn to_scalar(&self) -> Scalar {
        Scalar::Float(*self)
    }
}

impl ToScalar for bool {
    fn to_scalar(&self) -> Scalar {
        Scalar::Bool(*self)
    }
}

impl ToScalar for char {
    fn to_scalar(&self) -> Scalar {
        Scalar::String(self.to_string())
    }
}

impl ToScalar for str {
    fn to_scalar(&self) -> Scalar {
        Scalar::String(self.to_owned())
    }
}

impl ToScalar for String {
    fn to_scalar(&self) -> Scalar {
        Scalar::String(self.clone())
    }
}

impl ToScalar for Scalar {
    fn to_scalar(&self) -> Scalar {
        self.clone()
    }
}

impl<T: ToScalar> ToScalar for Option<T> {
    fn to_scalar(&self) -> Scalar {
        match self {
            Some(value) => value.to_scalar(),
            None => Scalar::Null,
        }
    }
}

impl<T: ToScalar + ?Sized> ToScalar for &T {
    fn to_scalar(&self) -> Scalar {
        (**self).to_scalar()
    }
}

/// The value of a field, read from a live instance.
///
/// The variant is decided once, when the field is read, so the engine can
/// branch exhaustively instead of probing runtime types.
#[derive(Clone)]
pub enum Value<'a> {
    /// A scalar or null.
    Scalar(Scalar),
    /// A single related record.
    One(&'a dyn Record),
    /// An ordered collection of related records.
    Many(Vec<&'a dyn Record>),
}

impl<'a> Value<'a> {
    /// The null value.
    pub const NULL: Self = Value::Scalar(Scalar::Null);

    /// Wraps a single related record.
    pub fn one<T: Record>(record: &'a T) -> Self {
        Value::One(record)
    }

    /// Wraps an optional related record; `None` reads as null.
    pub fn maybe<T: Record>(record: Option<&'a T>) -> Self {
        match record {
            Some(record) => Value::One(record),
            None => Value::Scalar(Scalar::Null),
        }
    }

    /// Wraps a collection of related records, preserving iteration order.
    pub fn many<T, I>(records: I) -> Self
    where
        T: Record + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        Value::Many(
            records
                .into_iter()
                .map(|record| record as &'a dyn Record)
                .collect(),
        )
    }

    /// Returns the scalar, if this is a scalar value.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(scalar) => f.debug_tuple("Scalar").field(scalar).finish(),
            Value::One(record) => f
                .debug_tuple("One")
                .field(&record.type_info().name())
                .finish(),
            Value::Many(records) => f
                .debug_struct("Many")
                .field("len", &records.len())
                .finish(),
        }
    }
}

/// Scalars compare by value, records by identity.
impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => a == b,
            (Value::One(a), Value::One(b)) => std::ptr::addr_eq(*a, *b),
            (Value::Many(a), Value::Many(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| std::ptr::addr_eq(*x, *y))
            }
            _ => false,
        }
    }
}

/// Declared shape of a field.
#[derive(Clone, Copy)]
pub enum FieldKind {
    /// A scalar (or optional scalar) value.
    Scalar,
    /// A single (possibly optional) related record of the target type.
    One(fn() -> &'static TypeInfo),
    /// A collection of related records of the target type.
    Many(fn() -> &'static TypeInfo),
}

impl FieldKind {
    /// Returns the related record type, or `None` for scalar fields.
    pub fn target(&self) -> Option<&'static TypeInfo> {
        match self {
            FieldKind::Scalar => None,
            FieldKind::One(target) | FieldKind::Many(target) => Some(target()),
        }
    }
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Scalar => write!(f, "Scalar"),
            FieldKind::One(target) => write!(f, "One({})", target().name()),
            FieldKind::Many(target) => write!(f, "Many({})", target().name()),
        }
    }
}

/// Identifier of a field on a record type.
///
/// Two identifiers are equal when they name the same field of the same
/// declaring type.
#[derive(Debug, Clone, Copy)]
pub struct FieldId {
    declaring_type: &'static str,
    name: &'static str,
    kind: FieldKind,
}

impl FieldId {
    /// Creates a field identifier.
    pub const fn new(declaring_type: &'static str, name: &'static str, kind: FieldKind) -> Self {
        Self {
            declaring_type,
            name,
            kind,
        }
    }

    /// Returns the name of the type declaring this field.
    pub fn declaring_type(&self) -> &'static str {
        self.declaring_type
    }

    /// Returns the field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared shape of the field.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }
}

impl PartialEq for FieldId {
    fn eq(&self, other: &Self) -> bool {
        self.declaring_type == other.declaring_type && self.name == other.name
    }
}

impl Eq for FieldId {}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring_type, self.name)
    }
}

/// Static description of a record type: its name and fields in declaration
/// order.
#[derive(Debug)]
pub struct TypeInfo {
    name: &'static str,
    fields: &'static [FieldId],
}

impl TypeInfo {
    /// Creates a type description.
    pub const fn new(name: &'static str, fields: &'static [FieldId]) -> Self {
        Self { name, fields }
    }

    /// Returns the type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns every field in declaration order.
    pub fn fields(&self) -> &'static [FieldId] {
        self.fields
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&'static FieldId> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Returns `true` if `field` is declared on this type.
    pub fn declares(&self, field: &FieldId) -> bool {
        field.declaring_type == self.name && self.field(field.name).is_some()
    }

    /// Returns the field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|field| field.name)
    }
}

/// An instance whose fields can be enumerated and read.
///
/// Implementations must be deterministic: [`type_info`](Self::type_info)
/// always returns the same description, and [`read`](Self::read) returns the
/// current value of each declared field.
pub trait Record {
    /// Returns the description of this instance's type.
    fn type_info(&self) -> &'static TypeInfo;

    /// Reads a field declared on this instance's type.
    ///
    /// Fields the type does not declare read as null.
    fn read(&self, field: &FieldId) -> Value<'_>;
}

impl<T: Record + ?Sized> Record for Box<T> {
    fn type_info(&self) -> &'static TypeInfo {
        (**self).type_info()
    }

    fn read(&self, field: &FieldId) -> Value<'_> {
        (**self).read(field)
    }
}

/// A record type whose description is known statically.
pub trait Typed: Record {
    /// Returns the description of `Self`.
    fn static_type_info() -> &'static TypeInfo;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_person, Address, Person};

    #[test]
    fn type_info_lists_fields_in_declaration_order() {
        let names: Vec<_> = Person::static_type_info().field_names().collect();
        assert_eq!(names, vec!["name", "age", "address", "manager", "orders"]);
    }

    #[test]
    fn field_kinds_point_at_targets() {
        let info = Person::static_type_info();
        let address = info.field("address").expect("declared");
        assert_eq!(address.kind().target().map(TypeInfo::name), Some("Address"));
        assert!(info.field("age").expect("declared").kind().target().is_none());
        assert_eq!(format!("{:?}", info.field("orders").unwrap().kind()), "Many(Order)");
    }

    #[test]
    fn field_ids_compare_by_type_and_name() {
        let person_name = Person::static_type_info().field("name").unwrap();
        let same = FieldId::new("Person", "name", FieldKind::Scalar);
        let other = FieldId::new("Address", "name", FieldKind::Scalar);
        assert_eq!(*person_name, same);
        assert_ne!(*person_name, other);
    }

    #[test]
    fn read_returns_tagged_values() {
        let person = sample_person();
        let info = person.type_info();

        let age = person.read(info.field("age").unwrap());
        assert_eq!(age, Value::Scalar(Scalar::UInt(30)));

        match person.read(info.field("address").unwrap()) {
            Value::One(record) => assert_eq!(record.type_info().name(), "Address"),
            other => panic!("expected a record, got {:?}", other),
        }

        assert_eq!(
            person.read(info.field("manager").unwrap()),
            Value::Scalar(Scalar::Null)
        );

        match person.read(info.field("orders").unwrap()) {
            Value::Many(records) => assert_eq!(records.len(), 2),
            other => panic!("expected a collection, got {:?}", other),
        }
    }

    #[test]
    fn undeclared_fields_read_as_null() {
        let person = sample_person();
        let city = Address::static_type_info().field("city").unwrap();
        assert_eq!(person.read(city), Value::NULL);
    }

    #[test]
    fn to_scalar_conversions() {
        assert_eq!(5i32.to_scalar(), Scalar::Int(5));
        assert_eq!(5u64.to_scalar(), Scalar::UInt(5));
        assert_eq!("x".to_scalar(), Scalar::String("x".to_string()));
        assert_eq!(Some(1.5f64).to_scalar(), Scalar::Float(1.5));
        assert_eq!(None::<bool>.to_scalar(), Scalar::Null);
        assert_eq!('c'.to_scalar(), Scalar::String("c".to_string()));
    }
}
