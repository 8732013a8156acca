//! Late-bound dependency fields
//!
//! Components wired by the container are shared through `Rc`, so their
//! setters take `&self` and store dependencies in a [`Slot`].

use std::cell::{BorrowError, BorrowMutError, RefCell};
use std::fmt;
use std::rc::Rc;

/// A dependency field that starts empty and is filled by wiring.
pub struct Slot<R: ?Sized> {
    value: RefCell<Option<Rc<R>>>,
}

impl<R: ?Sized> Slot<R> {
    pub fn new() -> Self {
        Self {
            value: RefCell::new(None),
        }
    }

    /// Store a dependency, replacing any previous one.
    pub fn fill(&self, value: Rc<R>) -> Result<(), BorrowMutError> {
        *self.value.try_borrow_mut()? = Some(value);
        Ok(())
    }

    /// Current dependency, if wired.
    pub fn get(&self) -> Option<Rc<R>> {
        self.value.borrow().clone()
    }

    pub fn is_filled(&self) -> bool {
        self.value.borrow().is_some()
    }

    /// Allocation address of the current value, used to tell which
    /// registered instance occupies the slot.
    pub(crate) fn address(&self) -> Result<Option<*const ()>, BorrowError> {
        let value = self.value.try_borrow()?;
        Ok(value.as_ref().map(|rc| Rc::as_ptr(rc).cast::<()>()))
    }
}

impl<R: ?Sized> Default for Slot<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ?Sized> fmt::Debug for Slot<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value.try_borrow() {
            Ok(value) if value.is_some() => f.write_str("Slot(filled)"),
            Ok(_) => f.write_str("Slot(empty)"),
            Err(_) => f.write_str("Slot(<borrowed>)"),
        }
    }
}
