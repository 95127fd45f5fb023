//! Narrow interface onto the host's widget toolkit.
//!
//! The core never touches geometry. It inserts primitives at a cursor, nests
//! and un-nests layouts, toggles activity/interactivity flags, and hangs
//! callbacks off nodes. Callbacks receive the surface again so they can edit
//! widgets without the core holding a borrow across host dispatch.

#[cfg(feature = "headless")]
pub mod headless;

use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::domain::{DialogValue, ValueKind};

#[cfg(feature = "headless")]
pub use headless::{HeadlessSurface, OutlineNode, ScriptStep};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

pub type Handler = Rc<dyn Fn(&mut dyn WidgetSurface)>;
pub type ValueHandler = Rc<dyn Fn(&mut dyn WidgetSurface, DialogValue)>;
pub type ToggleHandler = Rc<dyn Fn(&mut dyn WidgetSurface, bool)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextColor {
    #[default]
    Default,
    Error,
}

/// Sizing hints and colors applied to every primitive created while active.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Style {
    pub min_height: Option<f32>,
    pub preferred_height: Option<f32>,
    pub flexible_width: Option<f32>,
    pub text_color: TextColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorKind {
    Value(ValueKind),
    TypePicker,
    ReferencePicker,
}

/// Who may trigger a press handler. Routing is the host's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionScope {
    /// Only the identity that opened the dialog.
    #[default]
    Private,
    Public,
}

pub trait WidgetSurface {
    /// Node new primitives are inserted under.
    fn current(&self) -> NodeId;
    /// Nesting depth of the cursor within the current window.
    fn depth(&self) -> usize;

    fn push_style(&mut self);
    fn pop_style(&mut self);
    fn style_mut(&mut self) -> &mut Style;

    /// Creates a layout under the cursor and nests into it.
    fn vertical_layout(&mut self, spacing: f32) -> NodeId;
    fn horizontal_layout(&mut self, spacing: f32) -> NodeId;
    fn nest_out(&mut self);

    fn text(&mut self, content: &str) -> NodeId;
    fn button(&mut self, label: &str) -> NodeId;
    fn checkbox(&mut self, label: &str, checked: bool) -> NodeId;
    fn value_editor(&mut self, kind: EditorKind, initial: DialogValue) -> NodeId;

    fn set_text(&mut self, node: NodeId, content: &str);
    fn set_checked(&mut self, node: NodeId, checked: bool);
    fn set_value(&mut self, node: NodeId, value: DialogValue);

    fn set_active(&mut self, node: NodeId, active: bool);
    fn is_active(&self, node: NodeId) -> bool;
    fn set_interactable(&mut self, node: NodeId, interactable: bool);
    /// Every pressable/editable node in the subtree rooted at `node`.
    fn interactables_in(&self, node: NodeId) -> Vec<NodeId>;
    fn text_inputs_in(&self, node: NodeId) -> Vec<NodeId>;
    fn set_mask(&mut self, node: NodeId, pattern: &str);

    fn on_press(&mut self, node: NodeId, scope: ActionScope, handler: Handler);
    fn on_value_change(&mut self, node: NodeId, handler: ValueHandler);
    fn on_toggle(&mut self, node: NodeId, handler: ToggleHandler);
    fn on_destroy(&mut self, node: NodeId, handler: Handler);
    /// Removes the subtree and runs its destroy hooks.
    fn destroy(&mut self, node: NodeId);
    fn is_alive(&self, node: NodeId) -> bool;

    /// Opens a detached window and moves the cursor into it.
    fn begin_window(&mut self, title: &str, private: bool) -> NodeId;
    fn end_window(&mut self);
    /// True while building inside a window restricted to the invoking user.
    fn in_private_context(&self) -> bool;
}
