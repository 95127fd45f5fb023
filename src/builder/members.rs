use std::rc::Rc;

use crate::config::DialogConfig;
use crate::definition::{ActionDefinition, DialogAction, DialogOption, Field, OptionDefinition};
use crate::dialog::DialogState;
use crate::domain::{Key, Reflect};
use crate::error::{DialogError, Result};

/// A state command; anything taking arguments is rejected at build time.
pub trait IntoCommand<S, Marker> {
    /// The command, or the number of arguments it wrongly takes.
    fn into_command(self) -> std::result::Result<Rc<dyn Fn(&mut S)>, usize>;
}

impl<S, F> IntoCommand<S, fn(&mut S)> for F
where
    F: Fn(&mut S) + 'static,
{
    fn into_command(self) -> std::result::Result<Rc<dyn Fn(&mut S)>, usize> {
        Ok(Rc::new(self))
    }
}

impl<S, A, F> IntoCommand<S, fn(&mut S, A)> for F
where
    F: Fn(&mut S, A) + 'static,
{
    fn into_command(self) -> std::result::Result<Rc<dyn Fn(&mut S)>, usize> {
        Err(1)
    }
}

impl<S, A, B, F> IntoCommand<S, fn(&mut S, A, B)> for F
where
    F: Fn(&mut S, A, B) + 'static,
{
    fn into_command(self) -> std::result::Result<Rc<dyn Fn(&mut S)>, usize> {
        Err(2)
    }
}

/// Definitions synthesized from a state's declared members.
pub struct MemberSet<S: DialogState> {
    pub options: Vec<OptionDefinition<S>>,
    pub actions: Vec<ActionDefinition<S>>,
}

impl<S: DialogState> MemberSet<S> {
    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.actions.is_empty()
    }
}

/// Collects option and action declarations from [`DialogState::describe`].
/// The first invalid declaration is kept and reported by [`Members::collect`].
pub struct Members<S: DialogState> {
    max_depth: usize,
    options: Vec<OptionDefinition<S>>,
    actions: Vec<ActionDefinition<S>>,
    error: Option<DialogError>,
}

impl<S: DialogState> Members<S> {
    pub fn collect(config: &DialogConfig) -> Result<MemberSet<S>> {
        let mut members = Members {
            max_depth: config.max_descriptor_depth,
            options: Vec::new(),
            actions: Vec::new(),
            error: None,
        };
        S::describe(&mut members);
        match members.error {
            Some(err) => Err(err),
            None => Ok(MemberSet {
                options: members.options,
                actions: members.actions,
            }),
        }
    }

    pub fn option<T: Reflect>(
        &mut self,
        key: impl Into<Key>,
        option: DialogOption,
        field: Field<S, T>,
    ) -> &mut Self {
        if self.error.is_none() {
            match OptionDefinition::new(key, option, field, self.max_depth) {
                Ok(definition) => self.options.push(definition),
                Err(err) => self.error = Some(err),
            }
        }
        self
    }

    pub fn action<M>(
        &mut self,
        key: impl Into<Key>,
        action: DialogAction,
        command: impl IntoCommand<S, M>,
    ) -> &mut Self {
        if self.error.is_some() {
            return self;
        }
        let key = key.into();
        match command.into_command() {
            Ok(command) => self.actions.push(ActionDefinition::new(
                key,
                action,
                Rc::new(move |_, state| command(&mut *state.borrow_mut())),
            )),
            Err(arity) => {
                self.error = Some(DialogError::ActionArguments {
                    key: key.to_string(),
                    arity,
                })
            }
        }
        self
    }
}
