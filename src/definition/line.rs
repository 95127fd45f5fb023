use std::rc::Rc;

use super::{CreateContext, EntryDefinition, create_checked};
use crate::dialog::DialogState;
use crate::domain::Key;
use crate::element::ElementId;
use crate::error::Result;
use crate::surface::WidgetSurface;

/// Children laid out as one horizontal group.
pub struct LineDefinition<S: DialogState> {
    pub key: Option<Key>,
    pub entries: Vec<Rc<dyn EntryDefinition<S>>>,
}

impl<S: DialogState> Clone for LineDefinition<S> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            entries: self.entries.clone(),
        }
    }
}

impl<S: DialogState> LineDefinition<S> {
    pub fn new(key: Option<Key>, entries: Vec<Rc<dyn EntryDefinition<S>>>) -> Self {
        Self { key, entries }
    }
}

impl<S: DialogState> EntryDefinition<S> for LineDefinition<S> {
    fn create(
        &self,
        surface: &mut dyn WidgetSurface,
        ctx: &CreateContext<S>,
    ) -> Result<Option<ElementId>> {
        surface.push_style();
        let row = surface.horizontal_layout(ctx.config.spacing);
        surface.style_mut().flexible_width = Some(1.0);

        let mut children = Vec::with_capacity(self.entries.len());
        let mut failure = None;
        for entry in &self.entries {
            match create_checked(entry.as_ref(), surface, ctx) {
                Ok(Some(child)) => children.push(child),
                Ok(None) => {}
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }
        surface.nest_out();
        surface.pop_style();
        if let Some(err) = failure {
            return Err(err);
        }

        let id = ctx
            .tree
            .borrow_mut()
            .insert_container(self.key.clone(), row, children);
        Ok(Some(id))
    }

    fn describe(&self) -> String {
        match &self.key {
            Some(key) => format!("line `{key}`"),
            None => format!("line of {}", self.entries.len()),
        }
    }
}
