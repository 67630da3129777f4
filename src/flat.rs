//! Source-free, serialization-ready projection results.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::reflect::{Record, Scalar, Value};
use crate::view::{ShapedView, Slot};

/// A value stored in a [`FlatTree`].
#[derive(Debug, Clone, PartialEq)]
pub enum FlatValue {
    /// A scalar or null.
    Scalar(Scalar),
    /// A nested tree.
    Tree(FlatTree),
    /// An ordered list of nested trees.
    List(Vec<FlatTree>),
}

impl FlatValue {
    /// Returns the scalar, if any.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            FlatValue::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Returns the nested tree, if any.
    pub fn as_tree(&self) -> Option<&FlatTree> {
        match self {
            FlatValue::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Returns the nested list, if any.
    pub fn as_list(&self) -> Option<&[FlatTree]> {
        match self {
            FlatValue::List(list) => Some(list),
            _ => None,
        }
    }
}

impl From<Scalar> for FlatValue {
    fn from(scalar: Scalar) -> Self {
        FlatValue::Scalar(scalar)
    }
}

impl From<&str> for FlatValue {
    fn from(s: &str) -> Self {
        FlatValue::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for FlatValue {
    fn from(s: String) -> Self {
        FlatValue::Scalar(Scalar::String(s))
    }
}

impl From<bool> for FlatValue {
    fn from(b: bool) -> Self {
        FlatValue::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for FlatValue {
    fn from(i: i64) -> Self {
        FlatValue::Scalar(Scalar::Int(i))
    }
}

impl From<u64> for FlatValue {
    fn from(u: u64) -> Self {
        FlatValue::Scalar(Scalar::UInt(u))
    }
}

impl From<f64> for FlatValue {
    fn from(x: f64) -> Self {
        FlatValue::Scalar(Scalar::Float(x))
    }
}

impl From<FlatTree> for FlatValue {
    fn from(tree: FlatTree) -> Self {
        FlatValue::Tree(tree)
    }
}

impl From<Vec<FlatTree>> for FlatValue {
    fn from(list: Vec<FlatTree>) -> Self {
        FlatValue::List(list)
    }
}

/// An ordered string-keyed tree holding no reference to any source
/// instance.
///
/// Produced by [`ShapedView::flatten`] and safe to hand to any serializer:
/// it serializes as a map whose values are null, booleans, numbers, strings,
/// maps and sequences.
///
/// # Examples
///
/// ```
/// use expose_core::{FlatTree, FlatValue};
///
/// let tree: FlatTree = [
///     ("name", FlatValue::from("Ann")),
///     ("address", FlatTree::from_iter([("city", FlatValue::from("X"))]).into()),
/// ]
/// .into_iter()
/// .collect();
///
/// assert_eq!(tree.keys().collect::<Vec<_>>(), ["name", "address"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatTree {
    entries: Vec<(String, FlatValue)>,
}

impl FlatTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flattens a shaped view.
    pub fn from_view(view: &ShapedView<'_>) -> Self {
        tracing::trace!(
            target: "expose_core",
            type_name = view.type_info().name(),
            entries = view.len(),
            "flattening view"
        );
        view.iter()
            .map(|(key, slot)| (key, flatten_slot(slot)))
            .collect()
    }

    /// Snapshots every field of `record`, recursively.
    pub fn from_record(record: &dyn Record) -> Self {
        record
            .type_info()
            .fields()
            .iter()
            .map(|field| (field.name(), flatten_value(&record.read(field))))
            .collect()
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&FlatValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    /// Returns `true` if the tree has an entry for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Returns the entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlatValue)> + '_ {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sets `key` to `value`, replacing an existing entry in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FlatValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(name, _)| *name == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, FlatValue)> for FlatTree {
    fn from_iter<I: IntoIterator<Item = (K, FlatValue)>>(iter: I) -> Self {
        let mut tree = FlatTree::new();
        for (key, value) in iter {
            tree.insert(key, value);
        }
        tree
    }
}

fn flatten_slot(slot: &Slot<'_>) -> FlatValue {
    match slot {
        Slot::Value(value) => flatten_value(value),
        Slot::View(view) => FlatValue::Tree(view.flatten()),
        Slot::Views(views) => FlatValue::List(views.iter().map(ShapedView::flatten).collect()),
    }
}

fn flatten_value(value: &Value<'_>) -> FlatValue {
    match value {
        Value::Scalar(scalar) => FlatValue::Scalar(scalar.clone()),
        Value::One(record) => FlatValue::Tree(FlatTree::from_record(*record)),
        Value::Many(records) => FlatValue::List(
            records
                .iter()
                .map(|record| FlatTree::from_record(*record))
                .collect(),
        ),
    }
}

impl Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Scalar::Null => serializer.serialize_none(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Int(i) => serializer.serialize_i64(*i),
            Scalar::UInt(u) => serializer.serialize_u64(*u),
            Scalar::Float(x) => serializer.serialize_f64(*x),
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

impl Serialize for FlatValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FlatValue::Scalar(scalar) => scalar.serialize(serializer),
            FlatValue::Tree(tree) => tree.serialize(serializer),
            FlatValue::List(list) => list.serialize(serializer),
        }
    }
}

impl Serialize for FlatTree {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
