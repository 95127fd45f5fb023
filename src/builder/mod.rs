//! Turns a [`DialogState`] type into entry definitions and instantiates them.

mod cycle;
mod members;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{info, info_span};

use crate::config::DialogConfig;
use crate::definition::{
    ActionDefinition, CreateContext, EntryDefinition, ErrorDisplayDefinition, InputHook,
    LabelDefinition, LineDefinition, create_checked,
};
use crate::dialog::{Dialog, DialogId, DialogInner, DialogLink, DialogState, StateHandle};
use crate::domain::Key;
use crate::element::ElementTree;
use crate::error::{DialogError, Result};
use crate::surface::{NodeId, WidgetSurface};

use cycle::ValidationCycle;
pub use members::{IntoCommand, MemberSet, Members};

/// Where a dialog's error map comes from.
enum ValidationSource {
    State,
    /// Secret sub-dialogs validate through their parent.
    Delegate(InputHook),
}

pub struct DialogBuilder<S: DialogState> {
    config: Rc<DialogConfig>,
    entries: Vec<Rc<dyn EntryDefinition<S>>>,
    source: ValidationSource,
}

impl<S: DialogState> DialogBuilder<S> {
    /// Every option, then the unbound error display, then one line with every
    /// action. A state declaring no members gets no entries at all.
    pub fn new(config: DialogConfig) -> Result<Self> {
        Self::with_shared_config(Rc::new(config))
    }

    pub fn with_shared_config(config: Rc<DialogConfig>) -> Result<Self> {
        let members = Members::<S>::collect(&config)?;
        let mut builder = Self::empty_shared(config);
        if !members.is_empty() {
            builder
                .add_all_options(&members)
                .add_unbound_error_display()
                .add_all_actions(&members);
        }
        Ok(builder)
    }

    pub fn empty(config: DialogConfig) -> Self {
        Self::empty_shared(Rc::new(config))
    }

    pub fn empty_shared(config: Rc<DialogConfig>) -> Self {
        Self {
            config,
            entries: Vec::new(),
            source: ValidationSource::State,
        }
    }

    pub(crate) fn delegating(config: Rc<DialogConfig>, parent: InputHook) -> Self {
        Self {
            config,
            entries: Vec::new(),
            source: ValidationSource::Delegate(parent),
        }
    }

    pub fn config(&self) -> &DialogConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn add_entry(&mut self, entry: impl EntryDefinition<S> + 'static) -> &mut Self {
        self.entries.push(Rc::new(entry));
        self
    }

    pub fn add_shared(&mut self, entry: Rc<dyn EntryDefinition<S>>) -> &mut Self {
        self.entries.push(entry);
        self
    }

    pub fn add_all_options(&mut self, members: &MemberSet<S>) -> &mut Self {
        for option in &members.options {
            self.add_entry(option.clone());
        }
        self
    }

    /// All actions side by side in one untargetable line.
    pub fn add_all_actions(&mut self, members: &MemberSet<S>) -> &mut Self {
        let entries = members
            .actions
            .iter()
            .map(|action| Rc::new(action.clone()) as Rc<dyn EntryDefinition<S>>)
            .collect();
        self.add_line(None, entries)
    }

    pub fn add_line(
        &mut self,
        key: Option<Key>,
        entries: Vec<Rc<dyn EntryDefinition<S>>>,
    ) -> &mut Self {
        self.add_entry(LineDefinition::new(key, entries))
    }

    pub fn add_unbound_error_display(&mut self) -> &mut Self {
        let lines = self.config.error_lines;
        self.add_entry(ErrorDisplayDefinition::unbound(lines))
    }

    pub fn add_error_display(&mut self, key: Option<Key>, only_unbound: bool, lines: usize) -> &mut Self {
        self.add_entry(ErrorDisplayDefinition {
            key,
            only_unbound,
            lines,
        })
    }

    pub fn add_label(&mut self, text: impl Into<String>) -> &mut Self {
        self.add_entry(LabelDefinition::new(text))
    }

    pub fn add_action(&mut self, action: ActionDefinition<S>) -> &mut Self {
        self.add_entry(action)
    }

    /// Root dialogs own their state. Nested ones, and every dialog validating
    /// through a parent hook, leave the binding alone.
    fn binds_state(&self, parent: Option<&Dialog>) -> bool {
        parent.is_none() && matches!(self.source, ValidationSource::State)
    }

    /// Builds at the surface cursor. A root dialog binds the state and
    /// disposes it when its root widget is destroyed.
    pub fn build_in_place(
        &self,
        surface: &mut dyn WidgetSurface,
        state: &StateHandle<S>,
        parent: Option<&Dialog>,
    ) -> Result<Dialog> {
        if self.binds_state(parent)
            && let Some(existing) = state.bound_dialog()
        {
            return Err(DialogError::AlreadyBound {
                dialog: existing.get(),
            });
        }

        let start = surface.depth();
        let root_widget = surface.vertical_layout(self.config.spacing);
        match self.populate(surface, state, parent, root_widget) {
            Ok(dialog) => Ok(dialog),
            Err(err) => {
                while surface.depth() > start {
                    surface.nest_out();
                }
                surface.destroy(root_widget);
                Err(err)
            }
        }
    }

    /// Opens a host window and builds inside it.
    pub fn build_window(
        &self,
        surface: &mut dyn WidgetSurface,
        title: &str,
        state: &StateHandle<S>,
        private: bool,
    ) -> Result<(NodeId, Dialog)> {
        self.build_window_under(surface, title, state, private, None)
    }

    pub(crate) fn build_window_under(
        &self,
        surface: &mut dyn WidgetSurface,
        title: &str,
        state: &StateHandle<S>,
        private: bool,
        parent: Option<&Dialog>,
    ) -> Result<(NodeId, Dialog)> {
        let window = surface.begin_window(title, private);
        let built = self.build_in_place(surface, state, parent);
        surface.end_window();
        match built {
            Ok(dialog) => Ok((window, dialog)),
            Err(err) => {
                surface.destroy(window);
                Err(err)
            }
        }
    }

    fn input_hook(
        &self,
        tree: &Rc<RefCell<ElementTree>>,
        cycle: &Rc<ValidationCycle>,
        state: &StateHandle<S>,
    ) -> InputHook {
        let tree = tree.clone();
        let cycle = cycle.clone();
        match &self.source {
            ValidationSource::State => {
                let state = state.clone();
                Rc::new(move |surface: &mut dyn WidgetSurface, key: Option<&Key>| {
                    cycle.run(surface, &tree, key, |_, key| state.borrow_mut().validate(key))
                })
            }
            ValidationSource::Delegate(parent) => {
                let parent = parent.clone();
                Rc::new(move |surface: &mut dyn WidgetSurface, key: Option<&Key>| {
                    cycle.run(surface, &tree, key, |surface, key| parent(surface, key).all)
                })
            }
        }
    }

    fn populate(
        &self,
        surface: &mut dyn WidgetSurface,
        state: &StateHandle<S>,
        parent: Option<&Dialog>,
        root_widget: NodeId,
    ) -> Result<Dialog> {
        let span = info_span!("build_dialog", state = std::any::type_name::<S>());
        let _guard = span.enter();

        let tree = Rc::new(RefCell::new(ElementTree::new()));
        let cycle = Rc::new(ValidationCycle::default());
        let link = DialogLink::default();
        let on_input = self.input_hook(&tree, &cycle, state);
        let ctx = CreateContext {
            state: state.clone(),
            on_input: on_input.clone(),
            in_userspace: surface.in_private_context(),
            tree: tree.clone(),
            config: self.config.clone(),
            dialog: link.clone(),
        };

        let mut children = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            if let Some(id) = create_checked(entry.as_ref(), surface, &ctx)? {
                children.push(id);
            }
        }
        surface.nest_out();

        tree.borrow_mut().insert_root(root_widget, children);
        let bound_keys = tree.borrow().bound_error_keys();
        cycle.set_bound(bound_keys.clone());

        let dialog = Dialog::new(DialogInner {
            id: DialogId::of_root(root_widget),
            widget: root_widget,
            tree,
            parent: parent.cloned(),
            on_input,
            bound_keys,
        });
        dialog.link(&link);

        let binds = self.binds_state(parent);
        if binds {
            state.bind(dialog.id())?;
        }
        {
            // The root widget keeps the dialog alive, not the returned handle.
            let state = state.clone();
            let owned = dialog.clone();
            surface.on_destroy(
                root_widget,
                Rc::new(move |_: &mut dyn WidgetSurface| {
                    if binds {
                        state.release(owned.id());
                    }
                }),
            );
        }

        dialog.tree().borrow_mut().recompute(surface);
        dialog.validate(surface);
        info!(
            dialog = %dialog.id(),
            elements = dialog.len(),
            nested = !binds,
            "dialog built"
        );
        Ok(dialog)
    }
}
