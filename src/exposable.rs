use crate::error::ExposeError;
use crate::reflect::Record;
use crate::selector::Selector;
use crate::view::{project, Mode, ShapedView};

/// Method-call entry points for projecting any [`Record`].
///
/// # Examples
///
/// ```
/// use expose_core::{record, Exposable, Selector};
///
/// struct Account { login: String, token: String }
/// record!(Account { login: scalar, token: scalar });
///
/// let account = Account { login: "ann".into(), token: "t0k3n".into() };
///
/// let public = account.hide(&Selector::field("token")).unwrap();
/// assert_eq!(public.keys().collect::<Vec<_>>(), ["login"]);
/// ```
pub trait Exposable: Record + Sized {
    /// Projects `self`, keeping only the selected fields.
    ///
    /// # Errors
    ///
    /// See [`project`].
    fn expose(&self, selector: &Selector) -> Result<ShapedView<'_>, ExposeError> {
        project(self, Mode::Expose, selector)
    }

    /// Projects `self`, dropping the selected fields.
    ///
    /// # Errors
    ///
    /// See [`project`].
    fn hide(&self, selector: &Selector) -> Result<ShapedView<'_>, ExposeError> {
        project(self, Mode::Hide, selector)
    }
}

impl<T: Record> Exposable for T {}
