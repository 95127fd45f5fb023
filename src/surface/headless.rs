//! In-memory host used by the test-suite and the demo CLI.

use std::fmt;

use anyhow::{Context, Result, anyhow, bail};
use serde::Serialize;

use super::{
    ActionScope, EditorKind, Handler, NodeId, Style, TextColor, ToggleHandler, ValueHandler,
    WidgetSurface,
};
use crate::domain::{DialogValue, ValueKind};

#[derive(Debug, Clone, PartialEq)]
enum NodeKind {
    Canvas,
    Window { title: String, private: bool },
    Vertical,
    Horizontal,
    Text(String),
    Button(String),
    Checkbox { label: String, checked: bool },
    Editor {
        kind: EditorKind,
        value: DialogValue,
        mask: Option<String>,
    },
}

impl NodeKind {
    fn name(&self) -> &'static str {
        match self {
            NodeKind::Canvas => "canvas",
            NodeKind::Window { .. } => "window",
            NodeKind::Vertical => "vertical",
            NodeKind::Horizontal => "horizontal",
            NodeKind::Text(_) => "text",
            NodeKind::Button(_) => "button",
            NodeKind::Checkbox { .. } => "checkbox",
            NodeKind::Editor { .. } => "editor",
        }
    }

    fn label(&self) -> Option<&str> {
        match self {
            NodeKind::Window { title, .. } => Some(title),
            NodeKind::Text(text) | NodeKind::Button(text) => Some(text),
            NodeKind::Checkbox { label, .. } => Some(label),
            _ => None,
        }
    }

    fn is_interactive(&self) -> bool {
        matches!(
            self,
            NodeKind::Button(_) | NodeKind::Checkbox { .. } | NodeKind::Editor { .. }
        )
    }
}

struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    style: Style,
    active: bool,
    interactable: bool,
    alive: bool,
    press: Option<(ActionScope, Handler)>,
    value_change: Option<ValueHandler>,
    toggle: Option<ToggleHandler>,
    destroy_hooks: Vec<Handler>,
}

impl Node {
    fn new(kind: NodeKind, parent: Option<NodeId>, style: Style) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            style,
            active: true,
            interactable: true,
            alive: true,
            press: None,
            value_change: None,
            toggle: None,
            destroy_hooks: Vec::new(),
        }
    }
}

struct WindowFrame {
    saved_cursor: Vec<NodeId>,
    private: bool,
}

/// Serializable view of one live node, produced by [`HeadlessSurface::outline`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutlineNode {
    pub id: NodeId,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<DialogValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<String>,
    pub active: bool,
    pub interactable: bool,
    pub error: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    fn write_into(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        write!(f, "{:indent$}{}", "", self.kind, indent = indent * 2)?;
        if let Some(label) = &self.label {
            write!(f, " {label:?}")?;
        }
        if let Some(value) = &self.value {
            match &self.mask {
                Some(mask) => write!(f, " = {}", mask.repeat(value.to_string().chars().count()))?,
                None => write!(f, " = {value}")?,
            }
        }
        if let Some(checked) = self.checked {
            f.write_str(if checked { " [x]" } else { " [ ]" })?;
        }
        if self.error {
            f.write_str(" !")?;
        }
        if !self.active {
            f.write_str(" (hidden)")?;
        }
        if !self.interactable {
            f.write_str(" (disabled)")?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.write_into(f, indent + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for OutlineNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_into(f, 0)
    }
}

/// One scripted interaction. Paths are `/`-separated labels; each segment
/// narrows the search to what follows the previous match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Set { path: String, raw: String },
    Press(String),
    Toggle(String),
}

impl ScriptStep {
    /// Parses `LABEL=VALUE`.
    pub fn parse_set(spec: &str) -> Result<Self> {
        let (path, raw) = spec
            .split_once('=')
            .with_context(|| format!("expected LABEL=VALUE, got `{spec}`"))?;
        Ok(ScriptStep::Set {
            path: path.trim().to_string(),
            raw: raw.to_string(),
        })
    }
}

pub struct HeadlessSurface {
    nodes: Vec<Node>,
    cursor: Vec<NodeId>,
    styles: Vec<Style>,
    frames: Vec<WindowFrame>,
    windows: Vec<NodeId>,
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessSurface {
    pub fn new() -> Self {
        let canvas = Node::new(NodeKind::Canvas, None, Style::default());
        Self {
            nodes: vec![canvas],
            cursor: vec![NodeId::new(0)],
            styles: vec![Style::default()],
            frames: Vec::new(),
            windows: Vec::new(),
        }
    }

    pub fn canvas(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Windows opened so far that are still alive.
    pub fn windows(&self) -> Vec<NodeId> {
        self.windows
            .iter()
            .copied()
            .filter(|id| self.is_alive(*id))
            .collect()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).filter(|node| node.alive)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index()).filter(|node| node.alive)
    }

    fn insert(&mut self, kind: NodeKind) -> NodeId {
        let parent = self.current();
        let id = NodeId::new(self.nodes.len());
        let style = self.styles.last().copied().unwrap_or_default();
        self.nodes.push(Node::new(kind, Some(parent), style));
        if let Some(node) = self.node_mut(parent) {
            node.children.push(id);
        }
        id
    }

    fn nest_in(&mut self, kind: NodeKind) -> NodeId {
        let id = self.insert(kind);
        self.cursor.push(id);
        id
    }

    fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else { continue };
            out.push(id);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Node and every ancestor are active.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(cursor) = current {
            let Some(node) = self.node(cursor) else {
                return false;
            };
            if !node.active {
                return false;
            }
            current = node.parent;
        }
        true
    }

    pub fn is_interactable(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|node| node.interactable)
    }

    pub fn text_of(&self, id: NodeId) -> Option<String> {
        self.node(id).and_then(|node| node.kind.label().map(str::to_string))
    }

    pub fn value_of(&self, id: NodeId) -> Option<DialogValue> {
        match &self.node(id)?.kind {
            NodeKind::Editor { value, .. } => Some(value.clone()),
            _ => None,
        }
    }

    pub fn is_checked(&self, id: NodeId) -> Option<bool> {
        match &self.node(id)?.kind {
            NodeKind::Checkbox { checked, .. } => Some(*checked),
            _ => None,
        }
    }

    pub fn mask_of(&self, id: NodeId) -> Option<String> {
        match &self.node(id)?.kind {
            NodeKind::Editor { mask, .. } => mask.clone(),
            _ => None,
        }
    }

    pub fn style_of(&self, id: NodeId) -> Option<Style> {
        self.node(id).map(|node| node.style)
    }

    pub fn scope_of(&self, id: NodeId) -> Option<ActionScope> {
        self.node(id)?.press.as_ref().map(|(scope, _)| *scope)
    }

    pub fn children_of(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    fn roots(&self) -> Vec<NodeId> {
        let mut roots = vec![self.canvas()];
        roots.extend(self.windows());
        roots
    }

    /// Nodes that follow `anchor` inside its parent, with their subtrees.
    fn following(&self, anchor: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.node(anchor).and_then(|node| node.parent) else {
            return self.subtree(anchor).into_iter().skip(1).collect();
        };
        let siblings = self.children_of(parent);
        siblings
            .iter()
            .skip_while(|id| **id != anchor)
            .skip(1)
            .flat_map(|id| self.subtree(*id))
            .collect()
    }

    fn search(&self, path: &str) -> Option<(Vec<NodeId>, NodeId)> {
        let mut scope: Vec<NodeId> = self
            .roots()
            .into_iter()
            .flat_map(|root| self.subtree(root))
            .collect();
        let mut found = None;
        for segment in path.split('/').map(str::trim) {
            let hit = scope
                .iter()
                .copied()
                .find(|id| self.node(*id).and_then(|node| node.kind.label()) == Some(segment))?;
            found = Some(hit);
            scope = match &self.node(hit)?.kind {
                NodeKind::Window { .. } => self.subtree(hit).into_iter().skip(1).collect(),
                _ => self.following(hit),
            };
        }
        found.map(|hit| (scope, hit))
    }

    /// First node whose label matches the last path segment.
    pub fn find(&self, path: &str) -> Option<NodeId> {
        self.search(path).map(|(_, hit)| hit)
    }

    /// First value editor following the labelled row.
    pub fn editor_for(&self, path: &str) -> Option<NodeId> {
        let (scope, _) = self.search(path)?;
        scope.into_iter().find(|id| {
            self.node(*id)
                .is_some_and(|node| matches!(node.kind, NodeKind::Editor { .. }))
        })
    }

    fn can_use(&self, id: NodeId) -> bool {
        self.is_visible(id) && self.is_interactable(id)
    }

    /// Simulates a user press; ignored unless the button is visible and interactable.
    pub fn press(&mut self, id: NodeId) -> bool {
        if !self.can_use(id) {
            return false;
        }
        self.force_press(id)
    }

    /// Runs the press handler even if the widget looks disabled, like a stale host event.
    pub fn force_press(&mut self, id: NodeId) -> bool {
        let Some((_, handler)) = self.node(id).and_then(|node| node.press.clone()) else {
            return false;
        };
        handler(self);
        true
    }

    pub fn edit(&mut self, id: NodeId, value: DialogValue) -> bool {
        if !self.can_use(id) {
            return false;
        }
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let NodeKind::Editor { value: slot, .. } = &mut node.kind else {
            return false;
        };
        *slot = value.clone();
        let handler = node.value_change.clone();
        if let Some(handler) = handler {
            handler(self, value);
        }
        true
    }

    pub fn toggle(&mut self, id: NodeId) -> bool {
        if !self.can_use(id) {
            return false;
        }
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let NodeKind::Checkbox { checked, .. } = &mut node.kind else {
            return false;
        };
        *checked = !*checked;
        let state = *checked;
        let handler = node.toggle.clone();
        if let Some(handler) = handler {
            handler(self, state);
        }
        true
    }

    /// Parses `raw` for the editor's kind. JSON literals are tried first,
    /// anything else is taken as text.
    pub fn parse_input(kind: EditorKind, raw: &str) -> Result<DialogValue> {
        let json = serde_json::from_str::<serde_json::Value>(raw).ok();
        let value = match kind {
            EditorKind::Value(ValueKind::Text) => DialogValue::Text(raw.to_string()),
            EditorKind::Value(ValueKind::Bool) => DialogValue::Bool(
                json.and_then(|v| v.as_bool())
                    .ok_or_else(|| anyhow!("`{raw}` is not a boolean"))?,
            ),
            EditorKind::Value(ValueKind::Integer) => DialogValue::Int(
                json.and_then(|v| v.as_i64())
                    .ok_or_else(|| anyhow!("`{raw}` is not an integer"))?,
            ),
            EditorKind::Value(ValueKind::Unsigned) => DialogValue::UInt(
                json.and_then(|v| v.as_u64())
                    .ok_or_else(|| anyhow!("`{raw}` is not an unsigned integer"))?,
            ),
            EditorKind::Value(ValueKind::Float) => DialogValue::Float(
                json.and_then(|v| v.as_f64())
                    .ok_or_else(|| anyhow!("`{raw}` is not a number"))?,
            ),
            EditorKind::Value(ValueKind::List) => match json {
                Some(serde_json::Value::Array(items)) => DialogValue::List(
                    items
                        .into_iter()
                        .map(|item| match item {
                            serde_json::Value::String(text) => DialogValue::Text(text),
                            other => DialogValue::Text(other.to_string()),
                        })
                        .collect(),
                ),
                _ => bail!("`{raw}` is not a JSON array"),
            },
            EditorKind::TypePicker => {
                DialogValue::Type((!raw.is_empty()).then(|| raw.to_string()))
            }
            EditorKind::ReferencePicker => DialogValue::Reference(match json {
                Some(serde_json::Value::Null) => None,
                Some(other) => Some(
                    other
                        .as_u64()
                        .ok_or_else(|| anyhow!("`{raw}` is not an object id"))?,
                ),
                None => bail!("`{raw}` is not an object id"),
            }),
        };
        Ok(value)
    }

    pub fn apply_script(&mut self, steps: impl IntoIterator<Item = ScriptStep>) -> Result<()> {
        for step in steps {
            match step {
                ScriptStep::Set { path, raw } => {
                    let id = self
                        .editor_for(&path)
                        .with_context(|| format!("no editor labelled `{path}`"))?;
                    let kind = match self.node(id).map(|node| &node.kind) {
                        Some(NodeKind::Editor { kind, .. }) => *kind,
                        _ => bail!("`{path}` is not an editor"),
                    };
                    let value = Self::parse_input(kind, &raw)
                        .with_context(|| format!("invalid value for `{path}`"))?;
                    if !self.edit(id, value) {
                        bail!("editor `{path}` is disabled");
                    }
                }
                ScriptStep::Press(path) => {
                    let id = self
                        .find(&path)
                        .with_context(|| format!("no button labelled `{path}`"))?;
                    if !self.press(id) {
                        bail!("button `{path}` is disabled");
                    }
                }
                ScriptStep::Toggle(path) => {
                    let id = self
                        .find(&path)
                        .with_context(|| format!("no checkbox labelled `{path}`"))?;
                    if !self.toggle(id) {
                        bail!("checkbox `{path}` is disabled");
                    }
                }
            }
        }
        Ok(())
    }

    pub fn outline_of(&self, id: NodeId) -> Option<OutlineNode> {
        let node = self.node(id)?;
        let (value, checked, mask) = match &node.kind {
            NodeKind::Editor { value, mask, .. } => (Some(value.clone()), None, mask.clone()),
            NodeKind::Checkbox { checked, .. } => (None, Some(*checked), None),
            _ => (None, None, None),
        };
        Some(OutlineNode {
            id,
            kind: node.kind.name(),
            label: node.kind.label().map(str::to_string),
            value,
            checked,
            mask,
            active: node.active,
            interactable: !node.kind.is_interactive() || node.interactable,
            error: node.style.text_color == TextColor::Error,
            children: node
                .children
                .iter()
                .filter_map(|child| self.outline_of(*child))
                .collect(),
        })
    }

    /// Canvas followed by every live window.
    pub fn outline(&self) -> Vec<OutlineNode> {
        self.roots()
            .into_iter()
            .filter_map(|root| self.outline_of(root))
            .collect()
    }

    pub fn render(&self) -> String {
        self.outline().iter().map(ToString::to_string).collect()
    }
}

impl WidgetSurface for HeadlessSurface {
    fn current(&self) -> NodeId {
        self.cursor.last().copied().unwrap_or(NodeId::new(0))
    }

    fn depth(&self) -> usize {
        self.cursor.len().saturating_sub(1)
    }

    fn push_style(&mut self) {
        let top = self.styles.last().copied().unwrap_or_default();
        self.styles.push(top);
    }

    fn pop_style(&mut self) {
        if self.styles.len() > 1 {
            self.styles.pop();
        }
    }

    fn style_mut(&mut self) -> &mut Style {
        if self.styles.is_empty() {
            self.styles.push(Style::default());
        }
        let last = self.styles.len() - 1;
        &mut self.styles[last]
    }

    fn vertical_layout(&mut self, _spacing: f32) -> NodeId {
        self.nest_in(NodeKind::Vertical)
    }

    fn horizontal_layout(&mut self, _spacing: f32) -> NodeId {
        self.nest_in(NodeKind::Horizontal)
    }

    fn nest_out(&mut self) {
        if self.cursor.len() > 1 {
            self.cursor.pop();
        }
    }

    fn text(&mut self, content: &str) -> NodeId {
        self.insert(NodeKind::Text(content.to_string()))
    }

    fn button(&mut self, label: &str) -> NodeId {
        self.insert(NodeKind::Button(label.to_string()))
    }

    fn checkbox(&mut self, label: &str, checked: bool) -> NodeId {
        self.insert(NodeKind::Checkbox {
            label: label.to_string(),
            checked,
        })
    }

    fn value_editor(&mut self, kind: EditorKind, initial: DialogValue) -> NodeId {
        self.insert(NodeKind::Editor {
            kind,
            value: initial,
            mask: None,
        })
    }

    fn set_text(&mut self, node: NodeId, content: &str) {
        if let Some(node) = self.node_mut(node) {
            match &mut node.kind {
                NodeKind::Text(text) | NodeKind::Button(text) => *text = content.to_string(),
                NodeKind::Checkbox { label, .. } => *label = content.to_string(),
                _ => {}
            }
        }
    }

    fn set_checked(&mut self, node: NodeId, state: bool) {
        if let Some(node) = self.node_mut(node)
            && let NodeKind::Checkbox { checked, .. } = &mut node.kind
        {
            *checked = state;
        }
    }

    fn set_value(&mut self, node: NodeId, next: DialogValue) {
        if let Some(node) = self.node_mut(node)
            && let NodeKind::Editor { value, .. } = &mut node.kind
        {
            *value = next;
        }
    }

    fn set_active(&mut self, node: NodeId, active: bool) {
        if let Some(node) = self.node_mut(node) {
            node.active = active;
        }
    }

    fn is_active(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|node| node.active)
    }

    fn set_interactable(&mut self, node: NodeId, interactable: bool) {
        if let Some(node) = self.node_mut(node) {
            node.interactable = interactable;
        }
    }

    fn interactables_in(&self, node: NodeId) -> Vec<NodeId> {
        self.subtree(node)
            .into_iter()
            .filter(|id| self.node(*id).is_some_and(|node| node.kind.is_interactive()))
            .collect()
    }

    fn text_inputs_in(&self, node: NodeId) -> Vec<NodeId> {
        self.subtree(node)
            .into_iter()
            .filter(|id| {
                self.node(*id).is_some_and(|node| {
                    matches!(
                        node.kind,
                        NodeKind::Editor {
                            kind: EditorKind::Value(kind),
                            ..
                        } if kind.is_text_input()
                    )
                })
            })
            .collect()
    }

    fn set_mask(&mut self, node: NodeId, pattern: &str) {
        if let Some(node) = self.node_mut(node)
            && let NodeKind::Editor { mask, .. } = &mut node.kind
        {
            *mask = Some(pattern.to_string());
        }
    }

    fn on_press(&mut self, node: NodeId, scope: ActionScope, handler: Handler) {
        if let Some(node) = self.node_mut(node) {
            node.press = Some((scope, handler));
        }
    }

    fn on_value_change(&mut self, node: NodeId, handler: ValueHandler) {
        if let Some(node) = self.node_mut(node) {
            node.value_change = Some(handler);
        }
    }

    fn on_toggle(&mut self, node: NodeId, handler: ToggleHandler) {
        if let Some(node) = self.node_mut(node) {
            node.toggle = Some(handler);
        }
    }

    fn on_destroy(&mut self, node: NodeId, handler: Handler) {
        if let Some(node) = self.node_mut(node) {
            node.destroy_hooks.push(handler);
        }
    }

    fn destroy(&mut self, node: NodeId) {
        if node == self.canvas() || self.node(node).is_none() {
            return;
        }
        let doomed = self.subtree(node);
        if let Some(parent) = self.node(node).and_then(|n| n.parent)
            && let Some(parent) = self.node_mut(parent)
        {
            parent.children.retain(|child| *child != node);
        }
        let mut hooks = Vec::new();
        for id in &doomed {
            if let Some(entry) = self.nodes.get_mut(id.index()) {
                entry.alive = false;
                entry.press = None;
                entry.value_change = None;
                entry.toggle = None;
                hooks.append(&mut entry.destroy_hooks);
            }
        }
        self.cursor.retain(|id| !doomed.contains(id));
        for frame in &mut self.frames {
            frame.saved_cursor.retain(|id| !doomed.contains(id));
        }
        for hook in hooks {
            hook(self);
        }
    }

    fn is_alive(&self, node: NodeId) -> bool {
        self.node(node).is_some()
    }

    fn begin_window(&mut self, title: &str, private: bool) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        let style = self.styles.last().copied().unwrap_or_default();
        self.nodes.push(Node::new(
            NodeKind::Window {
                title: title.to_string(),
                private,
            },
            None,
            style,
        ));
        self.windows.push(id);
        let saved_cursor = std::mem::replace(&mut self.cursor, vec![id]);
        self.frames.push(WindowFrame {
            saved_cursor,
            private,
        });
        id
    }

    fn end_window(&mut self) {
        if let Some(frame) = self.frames.pop() {
            self.cursor = frame.saved_cursor;
            if self.cursor.is_empty() {
                self.cursor.push(self.canvas());
            }
        }
    }

    fn in_private_context(&self) -> bool {
        self.frames.iter().any(|frame| frame.private)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn layouts_nest_and_unnest() {
        let mut surface = HeadlessSurface::new();
        assert_eq!(surface.depth(), 0);
        let row = surface.horizontal_layout(4.0);
        assert_eq!(surface.depth(), 1);
        let label = surface.text("Name");
        surface.nest_out();
        assert_eq!(surface.depth(), 0);
        assert_eq!(surface.children_of(row), vec![label]);
    }

    #[test]
    fn press_respects_interactable_but_force_press_does_not() {
        let mut surface = HeadlessSurface::new();
        let button = surface.button("Go");
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        surface.on_press(
            button,
            ActionScope::Private,
            Rc::new(move |_| counter.set(counter.get() + 1)),
        );
        surface.set_interactable(button, false);
        assert!(!surface.press(button));
        assert!(surface.force_press(button));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn only_text_field_editors_take_a_mask() {
        let mut surface = HeadlessSurface::new();
        let row = surface.horizontal_layout(0.0);
        let text = surface.value_editor(EditorKind::Value(ValueKind::Text), DialogValue::Text(String::new()));
        let number = surface.value_editor(EditorKind::Value(ValueKind::Float), DialogValue::Float(0.0));
        surface.value_editor(EditorKind::Value(ValueKind::Bool), DialogValue::Bool(false));
        surface.value_editor(EditorKind::Value(ValueKind::List), DialogValue::List(Vec::new()));
        surface.nest_out();
        assert_eq!(surface.text_inputs_in(row), vec![text, number]);
    }

    #[test]
    fn hidden_ancestor_blocks_input() {
        let mut surface = HeadlessSurface::new();
        let column = surface.vertical_layout(0.0);
        let checkbox = surface.checkbox("A", false);
        surface.nest_out();
        surface.set_active(column, false);
        assert!(!surface.toggle(checkbox));
        assert_eq!(surface.is_checked(checkbox), Some(false));
    }

    #[test]
    fn destroy_runs_hooks_once_and_kills_subtree() {
        let mut surface = HeadlessSurface::new();
        let column = surface.vertical_layout(0.0);
        let text = surface.text("inner");
        surface.nest_out();
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        surface.on_destroy(column, Rc::new(move |_| counter.set(counter.get() + 1)));
        surface.destroy(column);
        surface.destroy(column);
        assert_eq!(runs.get(), 1);
        assert!(!surface.is_alive(text));
        surface.set_text(text, "ignored");
        assert_eq!(surface.text_of(text), None);
    }

    #[test]
    fn windows_restore_the_cursor() {
        let mut surface = HeadlessSurface::new();
        surface.vertical_layout(0.0);
        let outer = surface.current();
        let window = surface.begin_window("Secret", true);
        assert!(surface.in_private_context());
        assert_eq!(surface.current(), window);
        assert_eq!(surface.depth(), 0);
        surface.end_window();
        assert!(!surface.in_private_context());
        assert_eq!(surface.current(), outer);
    }

    #[test]
    fn script_sets_editor_after_label() {
        let mut surface = HeadlessSurface::new();
        surface.horizontal_layout(0.0);
        surface.text("Count");
        let editor = surface.value_editor(EditorKind::Value(ValueKind::Integer), DialogValue::Int(0));
        surface.nest_out();
        surface
            .apply_script([ScriptStep::parse_set("Count=42").expect("parse")])
            .expect("script");
        assert_eq!(surface.value_of(editor), Some(DialogValue::Int(42)));
        let err = surface
            .apply_script([ScriptStep::parse_set("Count=abc").expect("parse")])
            .unwrap_err();
        assert!(err.to_string().contains("Count"));
    }

    #[test]
    fn outline_marks_errors_and_masks() {
        let mut surface = HeadlessSurface::new();
        surface.push_style();
        surface.style_mut().text_color = TextColor::Error;
        surface.text("bad");
        surface.pop_style();
        let editor = surface.value_editor(
            EditorKind::Value(ValueKind::Text),
            DialogValue::Text("abc".into()),
        );
        surface.set_mask(editor, "*");
        let rendered = surface.render();
        assert!(rendered.contains("text \"bad\" !"));
        assert!(rendered.contains("editor = ***"));
    }
}
