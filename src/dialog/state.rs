use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;

use tracing::info;

use super::DialogId;
use crate::builder::Members;
use crate::domain::{ErrorMap, Key};
use crate::error::{DialogError, Result};

/// A plain object edited through a dialog.
pub trait DialogState: Sized + 'static {
    /// Declares the options and actions, in display order.
    fn describe(members: &mut Members<Self>);

    /// Full error map after `changed` was edited; `None` means everything.
    /// May update derived fields.
    fn validate(&mut self, changed: Option<&Key>) -> ErrorMap;

    /// Called once when the root dialog bound to this state is destroyed.
    fn dispose(&mut self) {}
}

struct StateCell<S> {
    value: RefCell<S>,
    bound: Cell<Option<DialogId>>,
}

/// Shared handle to a dialog state, bound to at most one root dialog.
pub struct StateHandle<S> {
    cell: Rc<StateCell<S>>,
}

impl<S> Clone for StateHandle<S> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<S: DialogState> StateHandle<S> {
    pub fn new(state: S) -> Self {
        Self {
            cell: Rc::new(StateCell {
                value: RefCell::new(state),
                bound: Cell::new(None),
            }),
        }
    }

    pub fn borrow(&self) -> Ref<'_, S> {
        self.cell.value.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, S> {
        self.cell.value.borrow_mut()
    }

    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&*self.borrow())
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut *self.borrow_mut())
    }

    pub fn bound_dialog(&self) -> Option<DialogId> {
        self.cell.bound.get()
    }

    pub(crate) fn bind(&self, dialog: DialogId) -> Result<()> {
        if let Some(existing) = self.cell.bound.get() {
            return Err(DialogError::AlreadyBound {
                dialog: existing.get(),
            });
        }
        self.cell.bound.set(Some(dialog));
        Ok(())
    }

    /// Disposes and unbinds if still bound to `dialog`.
    pub(crate) fn release(&self, dialog: DialogId) -> bool {
        if self.cell.bound.get() != Some(dialog) {
            return false;
        }
        self.cell.bound.set(None);
        self.borrow_mut().dispose();
        info!(%dialog, "dialog state disposed");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        disposed: u32,
    }

    impl DialogState for Counter {
        fn describe(_: &mut Members<Self>) {}

        fn validate(&mut self, _: Option<&Key>) -> ErrorMap {
            ErrorMap::new()
        }

        fn dispose(&mut self) {
            self.disposed += 1;
        }
    }

    #[test]
    fn bind_once_and_release_once() {
        let state = StateHandle::new(Counter::default());
        let first = DialogId(1);
        state.bind(first).expect("first bind");
        let err = state.bind(DialogId(2)).unwrap_err();
        assert_eq!(err, DialogError::AlreadyBound { dialog: first.get() });
        assert!(state.release(first));
        assert!(!state.release(first));
        assert_eq!(state.borrow().disposed, 1);
        assert_eq!(state.bound_dialog(), None);
    }
}
