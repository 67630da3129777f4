//! Shaped views: allow-list and deny-list projections of a record.

use std::fmt;

use crate::error::ExposeError;
use crate::flat::FlatTree;
use crate::reflect::{FieldId, Record, TypeInfo, Value};
use crate::selector::{Selection, Selector};

/// Projection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Include only the selected fields.
    Expose,
    /// Include every field except the selected ones.
    Hide,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Expose => write!(f, "expose"),
            Mode::Hide => write!(f, "hide"),
        }
    }
}

/// The value stored under one key of a [`ShapedView`].
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<'a> {
    /// The raw value read from the source instance.
    Value(Value<'a>),
    /// A projected related record.
    View(ShapedView<'a>),
    /// A projected collection of related records.
    Views(Vec<ShapedView<'a>>),
}

impl<'a> Slot<'a> {
    /// Returns the raw value, if no member rule replaced it.
    pub fn as_value(&self) -> Option<&Value<'a>> {
        match self {
            Slot::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the projected related record, if any.
    pub fn as_view(&self) -> Option<&ShapedView<'a>> {
        match self {
            Slot::View(view) => Some(view),
            _ => None,
        }
    }

    /// Returns the projected related collection, if any.
    pub fn as_views(&self) -> Option<&[ShapedView<'a>]> {
        match self {
            Slot::Views(views) => Some(views),
            _ => None,
        }
    }

    /// Returns the projected related record for further member rules.
    pub fn as_view_mut(&mut self) -> Option<&mut ShapedView<'a>> {
        match self {
            Slot::View(view) => Some(view),
            _ => None,
        }
    }

    /// Returns the projected related collection for further member rules.
    pub fn as_views_mut(&mut self) -> Option<&mut [ShapedView<'a>]> {
        match self {
            Slot::Views(views) => Some(views),
            _ => None,
        }
    }
}

/// A shaped, source-linked projection of a record.
///
/// A view maps field names of its source type to [`Slot`]s. It is created by
/// [`project`] (or [`Exposable`](crate::Exposable)), refined in place by
/// member rules, and converted into a source-free [`FlatTree`] by
/// [`flatten`](Self::flatten).
///
/// The view borrows its source instance so member rules can re-read raw
/// values; it never owns or mutates the source. A `ShapedView` is neither
/// `Send` nor `Sync`: concurrent mutation from several threads is not
/// supported.
///
/// # Examples
///
/// ```
/// use expose_core::{project, record, Mode, Selector};
///
/// struct Address { city: String, zip: String }
/// struct Person { name: String, age: u32, address: Address }
///
/// record!(Address { city: scalar, zip: scalar });
/// record!(Person { name: scalar, age: scalar, address: one(Address) });
///
/// let ann = Person {
///     name: "Ann".into(),
///     age: 30,
///     address: Address { city: "X".into(), zip: "1".into() },
/// };
///
/// let mut view = project(&ann, Mode::Hide, &Selector::field("age")).unwrap();
/// view.expose_member(&Selector::field("address"), &Selector::field("city"))
///     .unwrap();
///
/// let keys: Vec<_> = view.keys().collect();
/// assert_eq!(keys, ["name", "address"]);
/// assert_eq!(view.get("address").unwrap().as_view().unwrap().len(), 1);
/// ```
#[derive(Clone)]
pub struct ShapedView<'a> {
    source: &'a dyn Record,
    entries: Vec<(&'static str, Slot<'a>)>,
}

/// Builds a shaped view of `instance`.
///
/// In [`Mode::Expose`] the view holds exactly the selected fields, in
/// selector order. In [`Mode::Hide`] it holds every field of the type except
/// the selected ones, in declaration order. Values are the raw field values;
/// related records are not projected until a member rule targets them.
///
/// An empty selector exposes nothing or hides nothing; neither is an error.
///
/// # Errors
///
/// Returns an [`InvalidSelector`](crate::ExposeErrorKind::InvalidSelector)
/// error if `selector` does not resolve against the instance's type, or if
/// an expose selector reaches into a related record (such as
/// `address.city`). Use a member rule to refine related records.
pub fn project<'a>(
    instance: &'a dyn Record,
    mode: Mode,
    selector: &Selector,
) -> Result<ShapedView<'a>, ExposeError> {
    let selection = selector.resolve(instance.type_info())?;
    project_selection(instance, mode, &selection)
}

/// Builds a shaped view of `instance` from an already resolved selection.
///
/// # Errors
///
/// Returns an [`InvalidSelector`](crate::ExposeErrorKind::InvalidSelector)
/// error if `mode` is [`Mode::Expose`] and the selection holds a field the
/// instance's type does not declare.
pub fn project_selection<'a>(
    instance: &'a dyn Record,
    mode: Mode,
    selection: &Selection,
) -> Result<ShapedView<'a>, ExposeError> {
    check_selection(instance.type_info(), mode, selection)?;
    Ok(shape_view(instance, mode, selection))
}

/// Rejects expose selections naming fields of another type.
///
/// Hiding such a field is harmless: it is simply not among the fields kept.
pub(crate) fn check_selection(
    info: &'static TypeInfo,
    mode: Mode,
    selection: &Selection,
) -> Result<(), ExposeError> {
    if mode == Mode::Hide {
        return Ok(());
    }
    match selection.fields().iter().find(|field| !info.declares(field)) {
        Some(field) => Err(ExposeError::invalid_selector(format!(
            "`{}` is not a field of `{}`; expose the related record with a member rule instead",
            field,
            info.name()
        ))),
        None => Ok(()),
    }
}

/// Builds the view from a selection already checked against the instance's
/// type.
pub(crate) fn shape_view<'a>(
    instance: &'a dyn Record,
    mode: Mode,
    selection: &Selection,
) -> ShapedView<'a> {
    let info = instance.type_info();
    let fields: Vec<&FieldId> = match mode {
        Mode::Expose => selection.fields().iter().collect(),
        Mode::Hide => info
            .fields()
            .iter()
            .filter(|field| !selection.contains(field))
            .collect(),
    };

    let mut view = ShapedView {
        source: instance,
        entries: Vec::with_capacity(fields.len()),
    };
    for field in fields {
        view.insert(field.name(), Slot::Value(instance.read(field)));
    }

    tracing::debug!(
        target: "expose_core",
        type_name = info.name(),
        mode = %mode,
        fields = view.len(),
        "projected record"
    );
    view
}

impl<'a> ShapedView<'a> {
    /// Returns the instance this view was built from.
    pub fn source(&self) -> &'a dyn Record {
        self.source
    }

    /// Returns the source type's description.
    pub fn type_info(&self) -> &'static TypeInfo {
        self.source.type_info()
    }

    /// Returns the slot stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Slot<'a>> {
        self.entries
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, slot)| slot)
    }

    /// Returns the slot stored under `key` mutably, so nested views can be
    /// refined with their own member rules.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Slot<'a>> {
        self.entries
            .iter_mut()
            .find(|(name, _)| *name == key)
            .map(|(_, slot)| slot)
    }

    /// Returns `true` if the view has an entry for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the keys in view order.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + use<'_, 'a> {
        self.entries.iter().map(|(name, _)| *name)
    }

    /// Returns the entries in view order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Slot<'a>)> + '_ {
        self.entries.iter().map(|(name, slot)| (*name, slot))
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the view has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Re-projects one related member, keeping only the fields `child`
    /// selects on the related type.
    ///
    /// See [`apply_member`](Self::apply_member).
    ///
    /// # Errors
    ///
    /// See [`apply_member`](Self::apply_member).
    pub fn expose_member(
        &mut self,
        member: &Selector,
        child: &Selector,
    ) -> Result<&mut Self, ExposeError> {
        self.apply_member(Mode::Expose, member, child)
    }

    /// Re-projects one related member, dropping the fields `child` selects on
    /// the related type.
    ///
    /// See [`apply_member`](Self::apply_member).
    ///
    /// # Errors
    ///
    /// See [`apply_member`](Self::apply_member).
    pub fn hide_member(
        &mut self,
        member: &Selector,
        child: &Selector,
    ) -> Result<&mut Self, ExposeError> {
        self.apply_member(Mode::Hide, member, child)
    }

    /// Applies a member rule.
    ///
    /// `member` must name exactly one field of the source type. Its raw value
    /// is re-read from the source instance:
    ///
    /// - a collection of related records becomes a list of views, each
    ///   projected with `mode` and `child`;
    /// - a single related record becomes a view projected with `mode` and
    ///   `child`;
    /// - a scalar or null leaves the view untouched.
    ///
    /// The targeted key is replaced, not merged, so the last rule applied to
    /// a member wins. A member absent from the view is added.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidMemberSelector`](crate::ExposeErrorKind::InvalidMemberSelector)
    /// error if `member` resolves to zero or several fields, and an
    /// [`InvalidSelector`](crate::ExposeErrorKind::InvalidSelector) error if
    /// `member` or `child` does not resolve. The view is unchanged on error.
    pub fn apply_member(
        &mut self,
        mode: Mode,
        member: &Selector,
        child: &Selector,
    ) -> Result<&mut Self, ExposeError> {
        let rule = MemberRule::resolve(self.type_info(), mode, member, child)?;
        self.apply_rule(&rule);
        Ok(self)
    }

    /// Converts the view into a source-free tree.
    ///
    /// Projected members are flattened recursively; related records that no
    /// member rule projected are emitted with all their fields.
    pub fn flatten(&self) -> FlatTree {
        FlatTree::from_view(self)
    }

    pub(crate) fn apply_rule(&mut self, rule: &MemberRule) {
        let Some((target, child)) = &rule.child else {
            tracing::debug!(
                target: "expose_core",
                member = %rule.field,
                "member rule skipped: field is scalar"
            );
            return;
        };

        let source = self.source;
        let shaped = match source.read(&rule.field) {
            Value::One(record) if is_instance_of(record, target) => {
                Slot::View(shape_view(record, rule.mode, child))
            }
            Value::Many(records)
                if records.iter().all(|record| is_instance_of(*record, target)) =>
            {
                Slot::Views(
                    records
                        .into_iter()
                        .map(|record| shape_view(record, rule.mode, child))
                        .collect(),
                )
            }
            Value::Scalar(_) => {
                tracing::debug!(
                    target: "expose_core",
                    member = %rule.field,
                    "member rule skipped: value is not a record"
                );
                return;
            }
            Value::One(_) | Value::Many(_) => {
                tracing::debug!(
                    target: "expose_core",
                    member = %rule.field,
                    expected = target.name(),
                    "member rule skipped: value is not of the declared type"
                );
                return;
            }
        };

        tracing::debug!(
            target: "expose_core",
            member = %rule.field,
            mode = %rule.mode,
            "member rule applied"
        );
        self.insert(rule.field.name(), shaped);
    }

    fn insert(&mut self, key: &'static str, slot: Slot<'a>) {
        match self.entries.iter_mut().find(|(name, _)| *name == key) {
            Some((_, existing)) => *existing = slot,
            None => self.entries.push((key, slot)),
        }
    }
}

fn is_instance_of(record: &dyn Record, target: &TypeInfo) -> bool {
    let info = record.type_info();
    std::ptr::eq(info, target) || info.name() == target.name()
}

impl fmt::Debug for ShapedView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapedView")
            .field("source", &self.type_info().name())
            .field("entries", &self.entries)
            .finish()
    }
}

/// Views are equal when they share a source instance and hold equal entries.
impl PartialEq for ShapedView<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(self.source, other.source) && self.entries == other.entries
    }
}

/// A member rule with its selectors resolved.
#[derive(Debug, Clone)]
pub(crate) struct MemberRule {
    mode: Mode,
    field: FieldId,
    /// Declared target type and child selection; `None` when the member is
    /// declared scalar, which makes the rule a no-op.
    child: Option<(&'static TypeInfo, Selection)>,
}

impl MemberRule {
    pub(crate) fn resolve(
        owner: &'static TypeInfo,
        mode: Mode,
        member: &Selector,
        child: &Selector,
    ) -> Result<Self, ExposeError> {
        let resolved = member.resolve(owner)?;
        let field = *resolved.single().ok_or_else(|| {
            ExposeError::invalid_member(format!(
                "`{}` must name exactly one field of `{}`, found {}",
                member,
                owner.name(),
                resolved.len()
            ))
        })?;
        let child = match field.kind().target() {
            Some(target) => {
                let selection = child.resolve(target)?;
                check_selection(target, mode, &selection)?;
                Some((target, selection))
            }
            None => None,
        };
        Ok(Self { mode, field, child })
    }
}
