use super::{CreateContext, EntryDefinition};
use crate::dialog::DialogState;
use crate::element::ElementId;
use crate::error::Result;
use crate::surface::WidgetSurface;

/// Static text; produces no element.
#[derive(Debug, Clone)]
pub struct LabelDefinition {
    pub text: String,
}

impl LabelDefinition {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl<S: DialogState> EntryDefinition<S> for LabelDefinition {
    fn create(
        &self,
        surface: &mut dyn WidgetSurface,
        _ctx: &CreateContext<S>,
    ) -> Result<Option<ElementId>> {
        surface.text(&self.text);
        Ok(None)
    }

    fn describe(&self) -> String {
        format!("label {:?}", self.text)
    }
}
