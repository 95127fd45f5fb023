//! Secret options: a trigger button opening a private sub-dialog that holds
//! the option and an accept button.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, error, warn};

use super::Reset;
use crate::builder::DialogBuilder;
use crate::definition::{ActionDefinition, CreateContext, DialogAction, OptionDefinition};
use crate::dialog::{Dialog, DialogState, StateHandle};
use crate::domain::Key;
use crate::surface::{ActionScope, NodeId, WidgetSurface};

type OpenEditor = Rc<RefCell<Option<(NodeId, Dialog)>>>;

fn close(surface: &mut dyn WidgetSurface, open: &OpenEditor) {
    let current = open.borrow_mut().take();
    if let Some((window, _)) = current {
        surface.destroy(window);
    }
}

pub(crate) fn trigger<S: DialogState>(
    surface: &mut dyn WidgetSurface,
    ctx: &CreateContext<S>,
    definition: OptionDefinition<S>,
) -> Reset {
    let button = surface.button(&ctx.config.open_secret_label);
    let open: OpenEditor = Rc::default();

    let handler = {
        let open = open.clone();
        let config = ctx.config.clone();
        let state = ctx.state.clone();
        let parent_hook = ctx.on_input.clone();
        let link = ctx.dialog.clone();
        Rc::new(move |surface: &mut dyn WidgetSurface| {
            close(surface, &open);
            let Some(parent) = Dialog::from_link(&link) else {
                warn!(option = %definition.key(), "secret editor pressed after its dialog closed");
                return;
            };

            let accept = {
                let open = open.clone();
                ActionDefinition::new(
                    Key::from(config.accept_label.as_str()),
                    DialogAction::new(config.accept_label.as_str()),
                    Rc::new(move |surface: &mut dyn WidgetSurface, _: &StateHandle<S>| {
                        close(surface, &open)
                    }),
                )
            };
            let mut builder = DialogBuilder::delegating(config.clone(), parent_hook.clone());
            builder.add_entry(definition.clone()).add_action(accept);

            match builder.build_window_under(surface, definition.name(), &state, true, Some(&parent)) {
                Ok(opened) => {
                    debug!(option = %definition.key(), "secret editor opened");
                    *open.borrow_mut() = Some(opened);
                }
                Err(err) => error!(option = %definition.key(), %err, "secret editor failed to open"),
            }
        })
    };
    surface.on_press(button, ActionScope::Private, handler);
    {
        let open = open.clone();
        surface.on_destroy(
            button,
            Rc::new(move |surface: &mut dyn WidgetSurface| close(surface, &open)),
        );
    }

    Rc::new(move |surface| {
        let current = open.borrow().as_ref().map(|(_, dialog)| dialog.clone());
        if let Some(dialog) = current {
            dialog.reset_all(surface);
        }
    })
}
