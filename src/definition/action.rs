use std::rc::Rc;

use tracing::{debug, warn};

use super::{CreateContext, EntryDefinition};
use crate::dialog::{DialogState, StateHandle};
use crate::domain::{ErrorMap, Key, KeySet, key_set};
use crate::element::ElementId;
use crate::error::Result;
use crate::surface::{ActionScope, WidgetSurface};

/// Which validation errors gate an action.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ValidationFilter {
    /// Never disabled by validation.
    #[default]
    Never,
    /// Disabled while any error exists.
    AnyError,
    /// Disabled while any of these keys has an error. An empty set acts
    /// like [`ValidationFilter::AnyError`].
    Keys(KeySet),
}

impl ValidationFilter {
    /// An empty key list gates on any error.
    pub fn keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        let keys = key_set(keys);
        if keys.is_empty() {
            ValidationFilter::AnyError
        } else {
            ValidationFilter::Keys(keys)
        }
    }

    pub fn is_validating(&self) -> bool {
        !matches!(self, ValidationFilter::Never)
    }

    pub fn permits(&self, errors: &ErrorMap) -> bool {
        match self {
            ValidationFilter::Never => true,
            ValidationFilter::AnyError => errors.is_empty(),
            ValidationFilter::Keys(keys) if keys.is_empty() => errors.is_empty(),
            ValidationFilter::Keys(keys) => !keys.iter().any(|key| errors.contains_key(key)),
        }
    }
}

/// Action metadata attached to a state member.
#[derive(Debug, Clone)]
pub struct DialogAction {
    pub name: String,
    pub is_private: bool,
    pub filter: ValidationFilter,
}

impl DialogAction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_private: true,
            filter: ValidationFilter::Never,
        }
    }

    pub fn public(mut self) -> Self {
        self.is_private = false;
        self
    }

    pub fn validate_any(mut self) -> Self {
        self.filter = ValidationFilter::AnyError;
        self
    }

    pub fn validate_keys<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        self.filter = ValidationFilter::keys(keys);
        self
    }
}

pub type Command<S> = Rc<dyn Fn(&mut dyn WidgetSurface, &StateHandle<S>)>;

pub struct ActionDefinition<S: DialogState> {
    key: Key,
    action: DialogAction,
    command: Command<S>,
}

impl<S: DialogState> Clone for ActionDefinition<S> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            action: self.action.clone(),
            command: self.command.clone(),
        }
    }
}

impl<S: DialogState> ActionDefinition<S> {
    pub fn new(key: impl Into<Key>, mut action: DialogAction, command: Command<S>) -> Self {
        let key = key.into();
        if action.name.is_empty() {
            action.name = key.to_string();
        }
        Self {
            key,
            action,
            command,
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.action.name
    }

    pub fn filter(&self) -> &ValidationFilter {
        &self.action.filter
    }
}

impl<S: DialogState> EntryDefinition<S> for ActionDefinition<S> {
    fn create(
        &self,
        surface: &mut dyn WidgetSurface,
        ctx: &CreateContext<S>,
    ) -> Result<Option<ElementId>> {
        surface.push_style();
        let style = surface.style_mut();
        style.min_height = Some(ctx.config.button_height);
        style.preferred_height = Some(ctx.config.button_height);
        let button = surface.button(&self.action.name);
        surface.pop_style();

        let id = ctx
            .tree
            .borrow_mut()
            .insert_action(self.key.clone(), button, self.action.filter.clone());

        let tree = Rc::downgrade(&ctx.tree);
        let hook = ctx.on_input.clone();
        let state = ctx.state.clone();
        let command = self.command.clone();
        let filter = self.action.filter.clone();
        let key = self.key.clone();
        let scope = if self.action.is_private {
            ActionScope::Private
        } else {
            ActionScope::Public
        };
        surface.on_press(
            button,
            scope,
            Rc::new(move |surface| {
                let Some(tree) = tree.upgrade() else { return };
                let enabled = tree.borrow().is_effectively_enabled(id);
                if !enabled {
                    warn!(action = %key, "press on disabled action ignored");
                    return;
                }
                if filter.is_validating() {
                    let report = hook(surface, None);
                    if !filter.permits(&report.all) {
                        debug!(action = %key, errors = report.all.len(), "action blocked by validation");
                        return;
                    }
                }
                debug!(action = %key, "running action");
                command(surface, &state);
                hook(surface, None);
            }),
        );
        Ok(Some(id))
    }

    fn describe(&self) -> String {
        format!("action `{}`", self.key)
    }
}
