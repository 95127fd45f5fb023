use super::{CreateContext, EntryDefinition};
use crate::dialog::DialogState;
use crate::domain::Key;
use crate::element::ElementId;
use crate::error::Result;
use crate::surface::{TextColor, WidgetSurface};

/// Read-only sink for error messages, joined by newlines.
#[derive(Debug, Clone)]
pub struct ErrorDisplayDefinition {
    pub key: Option<Key>,
    /// Show only errors no option displays inline.
    pub only_unbound: bool,
    pub lines: usize,
}

impl ErrorDisplayDefinition {
    pub fn unbound(lines: usize) -> Self {
        Self {
            key: None,
            only_unbound: true,
            lines,
        }
    }
}

impl<S: DialogState> EntryDefinition<S> for ErrorDisplayDefinition {
    fn create(
        &self,
        surface: &mut dyn WidgetSurface,
        ctx: &CreateContext<S>,
    ) -> Result<Option<ElementId>> {
        let height = self.lines as f32 * ctx.config.error_height;
        surface.push_style();
        let style = surface.style_mut();
        style.min_height = Some(height);
        style.preferred_height = Some(height);
        style.text_color = TextColor::Error;
        let text = surface.text("");
        surface.pop_style();

        let id = ctx
            .tree
            .borrow_mut()
            .insert_error_display(self.key.clone(), text, self.only_unbound);
        Ok(Some(id))
    }

    fn describe(&self) -> String {
        match &self.key {
            Some(key) => format!("error display `{key}`"),
            None => "error display".to_string(),
        }
    }
}
