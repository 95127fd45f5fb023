//! Immutable row descriptions, instantiated into elements against a surface.
//!
//! Definitions hold no per-instance state, so one definition can be created
//! many times (the secret editor reuses its parent's option definition).

mod action;
mod error_display;
mod label;
mod line;
mod option;

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::config::DialogConfig;
use crate::dialog::{Dialog, DialogLink, DialogState, StateHandle};
use crate::domain::{ErrorReport, Key};
use crate::element::{ElementId, ElementTree};
use crate::error::{DialogError, Result};
use crate::surface::WidgetSurface;

pub use action::{ActionDefinition, Command, DialogAction, ValidationFilter};
pub use error_display::ErrorDisplayDefinition;
pub use label::LabelDefinition;
pub use line::LineDefinition;
pub use option::{DialogOption, Field, OptionDefinition};

/// Single re-entry point into the dialog's validation cycle. `None` means
/// "validate everything".
pub type InputHook = Rc<dyn Fn(&mut dyn WidgetSurface, Option<&Key>) -> ErrorReport>;

pub struct CreateContext<S: DialogState> {
    pub state: StateHandle<S>,
    pub on_input: InputHook,
    /// Building inside a window private to the invoking user.
    pub in_userspace: bool,
    pub tree: Rc<RefCell<ElementTree>>,
    pub config: Rc<DialogConfig>,
    pub(crate) dialog: DialogLink,
}

impl<S: DialogState> CreateContext<S> {
    /// The dialog being built; only available once the build has finished.
    pub fn dialog(&self) -> Option<Dialog> {
        Dialog::from_link(&self.dialog)
    }

    pub fn tree(&self) -> Ref<'_, ElementTree> {
        self.tree.borrow()
    }
}

pub trait EntryDefinition<S: DialogState> {
    /// Renders the row at the cursor. Must leave the cursor at the depth it
    /// found it. `None` means pure decoration.
    fn create(
        &self,
        surface: &mut dyn WidgetSurface,
        ctx: &CreateContext<S>,
    ) -> Result<Option<ElementId>>;

    /// Short name used in diagnostics.
    fn describe(&self) -> String;
}

/// Runs `create` and rejects definitions that leave the cursor nested.
pub(crate) fn create_checked<S: DialogState>(
    entry: &dyn EntryDefinition<S>,
    surface: &mut dyn WidgetSurface,
    ctx: &CreateContext<S>,
) -> Result<Option<ElementId>> {
    let expected = surface.depth();
    let element = entry.create(surface, ctx)?;
    let found = surface.depth();
    if found != expected {
        return Err(DialogError::SurfaceDepthMismatch {
            entry: entry.describe(),
            expected,
            found,
        });
    }
    Ok(element)
}
