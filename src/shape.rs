//! Reusable projection plans resolved once per record type.

use std::fmt;
use std::marker::PhantomData;

use crate::error::ExposeError;
use crate::flat::FlatTree;
use crate::reflect::Typed;
use crate::selector::{Selection, Selector};
use crate::view::{check_selection, shape_view, MemberRule, Mode, ShapedView};

/// Builder for a reusable [`Shape`].
///
/// Collects a top-level expose or hide selector and an ordered list of member
/// rules. [`build`](Self::build) resolves every selector once against `T`, so
/// applying the resulting shape can no longer fail.
///
/// # Examples
///
/// ```
/// use expose_core::{record, Selector, ShapeBuilder};
///
/// struct Order { id: u64, secret: String }
/// struct Customer { name: String, password: String, orders: Vec<Order> }
///
/// record!(Order { id: scalar, secret: scalar });
/// record!(Customer { name: scalar, password: scalar, orders: many(Order) });
///
/// let shape = ShapeBuilder::<Customer>::hide(Selector::field("password"))
///     .hide_member(Selector::field("orders"), Selector::field("secret"))
///     .build()
///     .expect("selectors resolve");
///
/// let alice = Customer {
///     name: "Alice".into(),
///     password: "hunter2".into(),
///     orders: vec![Order { id: 7, secret: "x".into() }],
/// };
///
/// let flat = shape.flatten(&alice);
/// assert_eq!(flat.keys().collect::<Vec<_>>(), ["name", "orders"]);
/// ```
pub struct ShapeBuilder<T> {
    mode: Mode,
    selector: Selector,
    members: Vec<(Mode, Selector, Selector)>,
    _record: PhantomData<fn(&T)>,
}

impl<T: Typed> ShapeBuilder<T> {
    /// Starts a shape with the given top-level mode and selector.
    pub fn new(mode: Mode, selector: Selector) -> Self {
        Self {
            mode,
            selector,
            members: Vec::new(),
            _record: PhantomData,
        }
    }

    /// Starts a shape exposing only the selected fields.
    pub fn expose(selector: Selector) -> Self {
        Self::new(Mode::Expose, selector)
    }

    /// Starts a shape hiding the selected fields.
    pub fn hide(selector: Selector) -> Self {
        Self::new(Mode::Hide, selector)
    }

    /// Adds a member rule exposing `child` on the related `member`.
    pub fn expose_member(self, member: Selector, child: Selector) -> Self {
        self.member(Mode::Expose, member, child)
    }

    /// Adds a member rule hiding `child` on the related `member`.
    pub fn hide_member(self, member: Selector, child: Selector) -> Self {
        self.member(Mode::Hide, member, child)
    }

    /// Adds a member rule. Rules are applied in the order they were added.
    pub fn member(mut self, mode: Mode, member: Selector, child: Selector) -> Self {
        self.members.push((mode, member, child));
        self
    }

    /// Resolves every selector against `T`.
    ///
    /// # Errors
    ///
    /// Returns the first selector or member-selector error, in the order the
    /// selectors were added.
    pub fn build(self) -> Result<Shape<T>, ExposeError> {
        let info = T::static_type_info();
        let selection = self.selector.resolve(info)?;
        check_selection(info, self.mode, &selection)?;
        let members = self
            .members
            .iter()
            .map(|(mode, member, child)| MemberRule::resolve(info, *mode, member, child))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            target: "expose_core",
            type_name = info.name(),
            mode = %self.mode,
            fields = selection.len(),
            member_rules = members.len(),
            "built shape"
        );

        Ok(Shape {
            mode: self.mode,
            selection,
            members,
            _record: PhantomData,
        })
    }
}

/// A pre-resolved projection recipe for records of type `T`.
///
/// Applying a shape is equivalent to calling [`project`](crate::project)
/// followed by each member rule in order, without resolving any selector
/// again.
pub struct Shape<T> {
    mode: Mode,
    selection: Selection,
    members: Vec<MemberRule>,
    _record: PhantomData<fn(&T)>,
}

impl<T: Typed> Shape<T> {
    /// Returns the top-level mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the resolved top-level selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Builds the shaped view of `instance`.
    pub fn apply<'a>(&self, instance: &'a T) -> ShapedView<'a> {
        let mut view = shape_view(instance, self.mode, &self.selection);
        for rule in &self.members {
            view.apply_rule(rule);
        }
        view
    }

    /// Builds and flattens the shaped view of `instance`.
    pub fn flatten(&self, instance: &T) -> FlatTree {
        self.apply(instance).flatten()
    }
}

impl<T> Clone for Shape<T> {
    fn clone(&self) -> Self {
        Self {
            mode: self.mode,
            selection: self.selection.clone(),
            members: self.members.clone(),
            _record: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Shape<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("mode", &self.mode)
            .field("selection", &self.selection)
            .field("members", &self.members)
            .finish()
    }
}
