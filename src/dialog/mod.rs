//! The root handle over one built element tree.

mod state;

use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde::Serialize;

use crate::definition::InputHook;
use crate::domain::{ErrorReport, Key, KeySet, key_set};
use crate::element::{ElementSnapshot, ElementTree, Selection};
use crate::surface::{NodeId, WidgetSurface};

pub use state::{DialogState, StateHandle};

/// Named after the dialog's root widget, so ids are unique per surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DialogId(u64);

impl DialogId {
    pub(crate) fn of_root(widget: NodeId) -> Self {
        Self(widget.index() as u64)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DialogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub(crate) struct DialogInner {
    pub(crate) id: DialogId,
    pub(crate) widget: NodeId,
    pub(crate) tree: Rc<RefCell<ElementTree>>,
    pub(crate) parent: Option<Dialog>,
    pub(crate) on_input: InputHook,
    pub(crate) bound_keys: KeySet,
}

/// Filled in once the dialog a definition is being created for exists.
pub(crate) type DialogLink = Rc<OnceCell<Weak<DialogInner>>>;

#[derive(Clone)]
pub struct Dialog {
    inner: Rc<DialogInner>,
}

impl fmt::Debug for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialog")
            .field("id", &self.inner.id)
            .field("widget", &self.inner.widget)
            .field("parent", &self.inner.parent.as_ref().map(Dialog::id))
            .finish()
    }
}

impl Dialog {
    pub(crate) fn new(inner: DialogInner) -> Self {
        Self {
            inner: Rc::new(inner),
        }
    }

    pub(crate) fn link(&self, link: &DialogLink) {
        // A link is only ever filled by the build that created it.
        let _ = link.set(Rc::downgrade(&self.inner));
    }

    pub(crate) fn from_link(link: &DialogLink) -> Option<Dialog> {
        link.get()
            .and_then(Weak::upgrade)
            .map(|inner| Dialog { inner })
    }

    pub(crate) fn tree(&self) -> &RefCell<ElementTree> {
        &self.inner.tree
    }

    pub fn id(&self) -> DialogId {
        self.inner.id
    }

    /// Root widget of the dialog.
    pub fn widget(&self) -> NodeId {
        self.inner.widget
    }

    pub fn parent(&self) -> Option<&Dialog> {
        self.inner.parent.as_ref()
    }

    pub fn root_dialog(&self) -> Dialog {
        let mut current = self;
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current.clone()
    }

    pub fn is_alive(&self, surface: &dyn WidgetSurface) -> bool {
        surface.is_alive(self.inner.widget)
    }

    pub fn visible(&self, surface: &dyn WidgetSurface) -> bool {
        surface.is_active(self.inner.widget)
    }

    pub fn set_visible(&self, surface: &mut dyn WidgetSurface, visible: bool) {
        surface.set_active(self.inner.widget, visible);
    }

    /// Keys displayed inline by this dialog's options.
    pub fn bound_error_keys(&self) -> &KeySet {
        &self.inner.bound_keys
    }

    /// Runs a full validation cycle.
    pub fn validate(&self, surface: &mut dyn WidgetSurface) -> ErrorReport {
        (self.inner.on_input)(surface, None)
    }

    pub fn elements(&self, surface: &dyn WidgetSurface) -> Vec<ElementSnapshot> {
        self.inner.tree.borrow().snapshot(surface)
    }

    /// Number of top-level elements.
    pub fn len(&self) -> usize {
        self.inner.tree.borrow().top_level().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Destroys the root widget, disposing the state if this dialog owns it.
    pub fn close(&self, surface: &mut dyn WidgetSurface) {
        surface.destroy(self.inner.widget);
    }

    fn visibility(&self, surface: &mut dyn WidgetSurface, selection: Selection<'_>, visible: bool) {
        self.inner.tree.borrow().set_visible(surface, selection, visible);
    }

    fn enablement(&self, surface: &mut dyn WidgetSurface, selection: Selection<'_>, enabled: bool) {
        self.inner.tree.borrow_mut().set_enabled(surface, selection, enabled);
    }

    pub fn show_all(&self, surface: &mut dyn WidgetSurface) {
        self.visibility(surface, Selection::All, true);
    }

    pub fn show<I, K>(&self, surface: &mut dyn WidgetSurface, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        self.visibility(surface, Selection::Keys(&key_set(keys)), true);
    }

    pub fn hide_all(&self, surface: &mut dyn WidgetSurface) {
        self.visibility(surface, Selection::All, false);
    }

    pub fn hide<I, K>(&self, surface: &mut dyn WidgetSurface, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        self.visibility(surface, Selection::Keys(&key_set(keys)), false);
    }

    /// Shows keyed elements in `keys` and hides every other keyed element.
    pub fn set_visible_keys<I, K>(&self, surface: &mut dyn WidgetSurface, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        self.visibility(surface, Selection::Exactly(&key_set(keys)), true);
    }

    pub fn enable_all(&self, surface: &mut dyn WidgetSurface) {
        self.enablement(surface, Selection::All, true);
    }

    pub fn enable<I, K>(&self, surface: &mut dyn WidgetSurface, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        self.enablement(surface, Selection::Keys(&key_set(keys)), true);
    }

    pub fn disable_all(&self, surface: &mut dyn WidgetSurface) {
        self.enablement(surface, Selection::All, false);
    }

    pub fn disable<I, K>(&self, surface: &mut dyn WidgetSurface, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        self.enablement(surface, Selection::Keys(&key_set(keys)), false);
    }

    /// Enables keyed elements in `keys` and disables every other keyed element.
    pub fn set_enabled_keys<I, K>(&self, surface: &mut dyn WidgetSurface, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        self.enablement(surface, Selection::Exactly(&key_set(keys)), true);
    }

    fn run_resets(&self, surface: &mut dyn WidgetSurface, selection: Selection<'_>) {
        let resets = self.inner.tree.borrow().resets(selection);
        for reset in resets {
            reset(surface);
        }
    }

    /// Re-reads the state into every editor.
    pub fn reset_all(&self, surface: &mut dyn WidgetSurface) {
        self.run_resets(surface, Selection::All);
    }

    pub fn reset<I, K>(&self, surface: &mut dyn WidgetSurface, keys: I)
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        self.run_resets(surface, Selection::Keys(&key_set(keys)));
    }
}
