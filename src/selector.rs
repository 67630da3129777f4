//! Field selectors and their resolution into field identifiers.
//!
//! A [`Selector`] is an expression tree naming one field, a chain of fields
//! through related records, or a tuple of those. [`Selector::resolve`] turns
//! it into a [`Selection`]: the ordered field identifiers it denotes on a
//! given type.

mod parser;

use std::fmt;
use std::str::FromStr;

use crate::error::ExposeError;
use crate::reflect::{FieldId, TypeInfo, Typed};

/// A field-selector expression.
///
/// Selectors are usually parsed from text:
///
/// ```
/// use expose_core::Selector;
///
/// let selector: Selector = "name, address.city".parse().unwrap();
/// assert_eq!(selector.to_string(), "(name, address.city)");
/// ```
///
/// or built directly:
///
/// ```
/// use expose_core::Selector;
///
/// let selector = Selector::tuple([
///     Selector::field("name"),
///     Selector::field("address").then("city"),
/// ]);
/// assert_eq!(selector.to_string(), "(name, address.city)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// The record the selector is applied to. Selects nothing on its own.
    Root,
    /// Access of field `name` on the value produced by `receiver`.
    Member {
        /// The expression whose value the field is read from.
        receiver: Box<Selector>,
        /// The field name.
        name: String,
    },
    /// Several selectors, resolved left to right.
    Tuple(Vec<Selector>),
    /// A method call. Never a valid field accessor.
    Call {
        /// The expression the method is called on.
        receiver: Box<Selector>,
        /// The method name.
        name: String,
    },
    /// A literal constant. Never a valid field accessor.
    Literal(String),
}

impl Selector {
    /// Selects a single field of the root record.
    pub fn field(name: impl Into<String>) -> Self {
        Selector::Root.then(name)
    }

    /// Selects several fields of the root record, in order.
    pub fn fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Selector::Tuple(names.into_iter().map(Selector::field).collect())
    }

    /// Groups selectors into a tuple.
    pub fn tuple(items: impl IntoIterator<Item = Selector>) -> Self {
        Selector::Tuple(items.into_iter().collect())
    }

    /// The empty selection.
    pub fn none() -> Self {
        Selector::Tuple(Vec::new())
    }

    /// Accesses field `name` on the value this selector produces.
    pub fn then(self, name: impl Into<String>) -> Self {
        Selector::Member {
            receiver: Box::new(self),
            name: name.into(),
        }
    }

    /// Parses the textual selector syntax.
    ///
    /// ```text
    /// selector := item (',' item)*
    /// item     := '(' [selector] ')' | '{' [selector] '}' | literal | chain
    /// chain    := segment ('.' segment)*
    /// segment  := ident ['(' ')']
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidSelector`](crate::ExposeErrorKind::InvalidSelector)
    /// error if the text is not well formed.
    pub fn parse(input: &str) -> Result<Self, ExposeError> {
        parser::parse_selector(input)
    }

    /// Resolves this selector against `root` into an ordered list of fields.
    ///
    /// Tuples resolve each item and concatenate the results. A chain such as
    /// `address.city` yields every field along the way (`[address, city]`),
    /// each looked up on the type reached so far.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidSelector`](crate::ExposeErrorKind::InvalidSelector)
    /// error if the selector contains a node that is not a field access,
    /// names a field the type does not declare, or chains through a scalar
    /// field. Resolution never partially succeeds.
    pub fn resolve(&self, root: &'static TypeInfo) -> Result<Selection, ExposeError> {
        let mut fields = Vec::new();
        collect(self, root, &mut fields)?;
        Ok(Selection { fields })
    }

    /// Resolves this selector against the statically known type `T`.
    ///
    /// # Errors
    ///
    /// See [`resolve`](Self::resolve).
    pub fn resolve_for<T: Typed>(&self) -> Result<Selection, ExposeError> {
        self.resolve(T::static_type_info())
    }
}

fn collect(
    selector: &Selector,
    root: &'static TypeInfo,
    out: &mut Vec<FieldId>,
) -> Result<(), ExposeError> {
    match selector {
        Selector::Tuple(items) => {
            for item in items {
                collect(item, root, out)?;
            }
            Ok(())
        }
        _ => walk_chain(selector, root, out).map(|_| ()),
    }
}

/// Appends the fields of a member chain and returns the type reached at its
/// end, or `None` if the chain ends on a scalar field.
fn walk_chain(
    selector: &Selector,
    root: &'static TypeInfo,
    out: &mut Vec<FieldId>,
) -> Result<Option<&'static TypeInfo>, ExposeError> {
    match selector {
        Selector::Root => Ok(Some(root)),
        Selector::Member { receiver, name } => {
            let owner = walk_chain(receiver, root, out)?.ok_or_else(|| {
                ExposeError::invalid_selector(format!(
                    "`{}` cannot be selected through the scalar field `{}`",
                    name, receiver
                ))
            })?;
            let field = owner.field(name).ok_or_else(|| {
                ExposeError::invalid_selector(format!(
                    "type `{}` has no field named `{}`",
                    owner.name(),
                    name
                ))
            })?;
            out.push(*field);
            Ok(field.kind().target())
        }
        other => Err(ExposeError::invalid_selector(format!(
            "selector expression `{}` is not a valid field accessor",
            other
        ))),
    }
}

impl FromStr for Selector {
    type Err = ExposeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::parse(s)
    }
}

/// Renders the selector in the textual syntax, for messages and logs.
///
/// The output parses back to an equivalent selector only when every field
/// name is an identifier and every chain starts at the root record. A chain
/// on a tuple, such as `Selector::fields(["address"]).then("city")`, renders
/// as `(address).city`, which the parser rejects.
impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Root => Ok(()),
            Selector::Member { receiver, name } | Selector::Call { receiver, name } => {
                if **receiver != Selector::Root {
                    write!(f, "{}.", receiver)?;
                }
                f.write_str(name)?;
                if matches!(self, Selector::Call { .. }) {
                    f.write_str("()")?;
                }
                Ok(())
            }
            Selector::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
            Selector::Literal(text) => f.write_str(text),
        }
    }
}

/// The ordered fields a selector denotes on a type.
///
/// A selection is immutable once resolved. It may be empty, which selects
/// nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    fields: Vec<FieldId>,
}

impl Selection {
    /// Creates a selection from already resolved field identifiers.
    pub fn new(fields: Vec<FieldId>) -> Self {
        Self { fields }
    }

    /// Returns the fields in selector order.
    pub fn fields(&self) -> &[FieldId] {
        &self.fields
    }

    /// Returns `true` if `field` was selected.
    pub fn contains(&self, field: &FieldId) -> bool {
        self.fields.contains(field)
    }

    /// Returns the number of selected fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the selected field names in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(FieldId::name)
    }

    /// Returns the only selected field, or `None` if there are zero or
    /// several.
    pub(crate) fn single(&self) -> Option<&FieldId> {
        match self.fields.as_slice() {
            [field] => Some(field),
            _ => None,
        }
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a FieldId;
    type IntoIter = std::slice::Iter<'a, FieldId>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
