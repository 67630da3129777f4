//! Allow-list and deny-list projections of record graphs.
//!
//! This crate derives a *shaped view* of a record: a keyed structure that
//! exposes only selected fields ("expose") or every field except selected
//! ones ("hide"), recursively, and flattens it into a tree that can be handed
//! to any serializer without leaking internal-only fields.
//!
//! # Core Types
//!
//! - [`Record`] / [`Typed`]: Reflection capability, usually implemented with [`record!`]
//! - [`Selector`]: Field-selector expression, parsed from text or built in code
//! - [`Selection`]: Ordered field identifiers a selector resolves to
//! - [`ShapedView`]: Mutable, source-linked projection refined by member rules
//! - [`FlatTree`]: Immutable, source-free result implementing `serde::Serialize`
//! - [`ShapeBuilder`] / [`Shape`]: Pre-resolved, reusable projection recipes
//!
//! # Examples
//!
//! ```
//! use expose_core::{record, Exposable, FlatValue, Selector};
//!
//! struct Address {
//!     city: String,
//!     zip: String,
//! }
//!
//! struct Person {
//!     name: String,
//!     age: u32,
//!     address: Address,
//! }
//!
//! record!(Address { city: scalar, zip: scalar });
//! record!(Person { name: scalar, age: scalar, address: one(Address) });
//!
//! let ann = Person {
//!     name: "Ann".to_string(),
//!     age: 30,
//!     address: Address { city: "X".to_string(), zip: "1".to_string() },
//! };
//!
//! let mut view = ann.hide(&"age".parse().unwrap()).unwrap();
//! view.expose_member(&Selector::field("address"), &Selector::field("city"))
//!     .unwrap();
//!
//! let flat = view.flatten();
//! assert_eq!(flat.get("name"), Some(&FlatValue::from("Ann")));
//! assert_eq!(
//!     flat.get("address").and_then(FlatValue::as_tree).map(|t| t.len()),
//!     Some(1)
//! );
//! ```
//!
//! Cyclic object graphs are not supported: projecting or flattening a
//! record that transitively contains itself does not terminate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod exposable;
mod flat;
mod macros;
mod reflect;
mod selector;
mod shape;
mod view;

#[cfg(test)]
mod test_utils;

pub use error::{ExposeError, ExposeErrorKind};
pub use exposable::Exposable;
pub use flat::{FlatTree, FlatValue};
pub use reflect::{FieldId, FieldKind, Record, Scalar, ToScalar, TypeInfo, Typed, Value};
pub use selector::{Selection, Selector};
pub use shape::{Shape, ShapeBuilder};
pub use view::{project, project_selection, Mode, ShapedView, Slot};
