//! Live element tree: one arena per dialog, nodes addressed by index.

use std::fmt;

use serde::Serialize;
use tracing::trace;

use crate::definition::ValidationFilter;
use crate::domain::{ErrorMap, ErrorReport, Key, KeySet};
use crate::editor::Reset;
use crate::surface::{NodeId, WidgetSurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ElementId(usize);

impl ElementId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

pub enum ElementKind {
    Option {
        error_text: Option<NodeId>,
        reset: Reset,
    },
    Action {
        filter: ValidationFilter,
        valid: bool,
    },
    ErrorDisplay {
        only_unbound: bool,
    },
    Container {
        children: Vec<ElementId>,
    },
    Dialog {
        children: Vec<ElementId>,
    },
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Option { .. } => "option",
            ElementKind::Action { .. } => "action",
            ElementKind::ErrorDisplay { .. } => "error_display",
            ElementKind::Container { .. } => "container",
            ElementKind::Dialog { .. } => "dialog",
        }
    }

    fn children(&self) -> &[ElementId] {
        match self {
            ElementKind::Container { children } | ElementKind::Dialog { children } => children,
            _ => &[],
        }
    }
}

pub struct ElementNode {
    pub key: Option<Key>,
    pub widget: NodeId,
    pub enabled: bool,
    pub parent_enabled: bool,
    pub parent: Option<ElementId>,
    pub kind: ElementKind,
}

impl ElementNode {
    pub fn effectively_enabled(&self) -> bool {
        self.enabled && self.parent_enabled
    }

    fn matches(&self, keys: &KeySet) -> bool {
        self.key.as_ref().is_some_and(|key| keys.contains(key))
    }
}

/// Which nodes a cascade call applies its local change to.
#[derive(Debug, Clone, Copy)]
pub enum Selection<'a> {
    All,
    /// Nodes whose own key is in the set.
    Keys(&'a KeySet),
    /// Keyed nodes are switched on if in the set and off otherwise.
    Exactly(&'a KeySet),
}

impl Selection<'_> {
    /// New local flag for `node`, or `None` if the call leaves it alone.
    fn target(&self, node: &ElementNode, flag: bool) -> Option<bool> {
        match self {
            Selection::All => Some(flag),
            Selection::Keys(keys) => node.matches(keys).then_some(flag),
            Selection::Exactly(keys) => node.key.as_ref().map(|key| keys.contains(key)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementSnapshot {
    pub id: ElementId,
    pub parent: Option<ElementId>,
    pub depth: usize,
    pub key: Option<Key>,
    pub kind: &'static str,
    pub widget: NodeId,
    pub visible: bool,
    pub enabled: bool,
    pub parent_enabled: bool,
    pub effectively_enabled: bool,
}

#[derive(Default)]
pub struct ElementTree {
    nodes: Vec<ElementNode>,
    root: Option<ElementId>,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: ElementId) -> Option<&ElementNode> {
        self.nodes.get(id.0)
    }

    fn push(&mut self, key: Option<Key>, widget: NodeId, kind: ElementKind) -> ElementId {
        let id = ElementId(self.nodes.len());
        for child in kind.children().to_vec() {
            if let Some(node) = self.nodes.get_mut(child.0) {
                node.parent = Some(id);
            }
        }
        self.nodes.push(ElementNode {
            key,
            widget,
            enabled: true,
            parent_enabled: true,
            parent: None,
            kind,
        });
        id
    }

    pub fn insert_option(
        &mut self,
        key: Key,
        widget: NodeId,
        error_text: Option<NodeId>,
        reset: Reset,
    ) -> ElementId {
        self.push(Some(key), widget, ElementKind::Option { error_text, reset })
    }

    pub fn insert_action(&mut self, key: Key, widget: NodeId, filter: ValidationFilter) -> ElementId {
        self.push(Some(key), widget, ElementKind::Action { filter, valid: true })
    }

    pub fn insert_error_display(
        &mut self,
        key: Option<Key>,
        widget: NodeId,
        only_unbound: bool,
    ) -> ElementId {
        self.push(key, widget, ElementKind::ErrorDisplay { only_unbound })
    }

    pub fn insert_container(
        &mut self,
        key: Option<Key>,
        widget: NodeId,
        children: Vec<ElementId>,
    ) -> ElementId {
        self.push(key, widget, ElementKind::Container { children })
    }

    /// The dialog node; cascades and error display start here.
    pub fn insert_root(&mut self, widget: NodeId, children: Vec<ElementId>) -> ElementId {
        let id = self.push(None, widget, ElementKind::Dialog { children });
        self.root = Some(id);
        id
    }

    /// Pre-order walk from the root, with depth.
    fn walk(&self) -> Vec<(ElementId, usize)> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(ElementId, usize)> = self.root.map(|root| (root, 0)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.nodes.get(id.0) else { continue };
            order.push((id, depth));
            stack.extend(node.kind.children().iter().rev().map(|child| (*child, depth + 1)));
        }
        order
    }

    /// Union of the keys option elements display inline.
    pub fn bound_error_keys(&self) -> KeySet {
        self.walk()
            .into_iter()
            .filter_map(|(id, _)| {
                let node = &self.nodes[id.0];
                match node.kind {
                    ElementKind::Option { .. } => node.key.clone(),
                    _ => None,
                }
            })
            .collect()
    }

    pub fn is_effectively_enabled(&self, id: ElementId) -> bool {
        self.nodes.get(id.0).is_some_and(ElementNode::effectively_enabled)
    }

    pub fn set_visible(&self, surface: &mut dyn WidgetSurface, selection: Selection<'_>, visible: bool) {
        trace!(?selection, visible, "visibility cascade");
        for (id, _) in self.walk() {
            let node = &self.nodes[id.0];
            if let Some(flag) = selection.target(node, visible) {
                surface.set_active(node.widget, flag);
            }
        }
    }

    pub fn set_enabled(&mut self, surface: &mut dyn WidgetSurface, selection: Selection<'_>, enabled: bool) {
        trace!(?selection, enabled, "enablement cascade");
        for (id, _) in self.walk() {
            let node = &mut self.nodes[id.0];
            if let Some(flag) = selection.target(node, enabled) {
                node.enabled = flag;
            }
        }
        self.recompute(surface);
    }

    /// Single top-down pass pushing effective enablement into `parent_enabled`
    /// and onto the widgets.
    pub fn recompute(&mut self, surface: &mut dyn WidgetSurface) {
        let mut stack: Vec<(ElementId, bool)> = self.root.map(|root| (root, true)).into_iter().collect();
        while let Some((id, inherited)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id.0) else { continue };
            node.parent_enabled = inherited;
            let effective = node.effectively_enabled();
            Self::apply_enabled(surface, node, effective);
            stack.extend(node.kind.children().iter().map(|child| (*child, effective)));
        }
    }

    fn apply_enabled(surface: &mut dyn WidgetSurface, node: &ElementNode, effective: bool) {
        match &node.kind {
            ElementKind::Option { .. } => {
                for widget in surface.interactables_in(node.widget) {
                    surface.set_interactable(widget, effective);
                }
            }
            ElementKind::Action { valid, .. } => {
                surface.set_interactable(node.widget, effective && *valid);
            }
            _ => {}
        }
    }

    /// Reset callbacks of the selected option elements. Callers run them once
    /// the tree is no longer borrowed.
    pub fn resets(&self, selection: Selection<'_>) -> Vec<Reset> {
        trace!(?selection, "reset cascade");
        self.walk()
            .into_iter()
            .filter_map(|(id, _)| {
                let node = &self.nodes[id.0];
                match &node.kind {
                    ElementKind::Option { reset, .. } if selection.target(node, true) == Some(true) => {
                        Some(reset.clone())
                    }
                    _ => None,
                }
            })
            .collect()
    }

    pub fn display_errors(&mut self, surface: &mut dyn WidgetSurface, report: &ErrorReport) {
        for (id, _) in self.walk() {
            let node = &mut self.nodes[id.0];
            let effective = node.effectively_enabled();
            match &mut node.kind {
                ElementKind::Option {
                    error_text: Some(text),
                    ..
                } => {
                    let message = node
                        .key
                        .as_ref()
                        .and_then(|key| report.all.get(key))
                        .map(String::as_str)
                        .unwrap_or_default();
                    surface.set_text(*text, message);
                }
                ElementKind::Action { filter, valid } => {
                    *valid = filter.permits(&report.all);
                    surface.set_interactable(node.widget, effective && *valid);
                }
                ElementKind::ErrorDisplay { only_unbound } => {
                    let source: &ErrorMap = if *only_unbound { &report.unbound } else { &report.all };
                    let joined = source.values().map(String::as_str).collect::<Vec<_>>().join("\n");
                    surface.set_text(node.widget, &joined);
                }
                _ => {}
            }
        }
    }

    pub fn snapshot(&self, surface: &dyn WidgetSurface) -> Vec<ElementSnapshot> {
        self.walk()
            .into_iter()
            .map(|(id, depth)| {
                let node = &self.nodes[id.0];
                ElementSnapshot {
                    id,
                    parent: node.parent,
                    depth,
                    key: node.key.clone(),
                    kind: node.kind.name(),
                    widget: node.widget,
                    visible: surface.is_active(node.widget),
                    enabled: node.enabled,
                    parent_enabled: node.parent_enabled,
                    effectively_enabled: node.effectively_enabled(),
                }
            })
            .collect()
    }

    /// Top-level elements of the dialog.
    pub fn top_level(&self) -> Vec<ElementId> {
        self.root
            .and_then(|root| self.nodes.get(root.0))
            .map(|node| node.kind.children().to_vec())
            .unwrap_or_default()
    }
}

#[cfg(all(test, feature = "headless"))]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::domain::key_set;
    use crate::surface::HeadlessSurface;

    fn sample(surface: &mut HeadlessSurface) -> (ElementTree, ElementId, ElementId, ElementId) {
        let mut tree = ElementTree::new();
        let root_widget = surface.vertical_layout(8.0);
        let line = surface.horizontal_layout(8.0);
        let button = surface.button("Go");
        surface.nest_out();
        let option_row = surface.vertical_layout(4.0);
        surface.checkbox("flag", false);
        surface.nest_out();
        surface.nest_out();
        let action = tree.insert_action(Key::from("go"), button, ValidationFilter::Never);
        let container = tree.insert_container(Some(Key::from("group")), line, vec![action]);
        let option = tree.insert_option(Key::from("flag"), option_row, None, Rc::new(|_| {}));
        tree.insert_root(root_widget, vec![container, option]);
        (tree, container, action, option)
    }

    fn assert_inheritance(tree: &ElementTree, surface: &HeadlessSurface) {
        let snapshot = tree.snapshot(surface);
        for entry in &snapshot {
            assert_eq!(entry.effectively_enabled, entry.enabled && entry.parent_enabled);
            if let Some(parent) = entry.parent {
                let parent = snapshot.iter().find(|p| p.id == parent).expect("parent in walk");
                assert_eq!(entry.parent_enabled, parent.effectively_enabled);
            }
        }
    }

    #[test]
    fn disabling_container_disables_children_but_not_their_local_flag() {
        let mut surface = HeadlessSurface::new();
        let (mut tree, container, action, option) = sample(&mut surface);
        tree.set_enabled(&mut surface, Selection::Keys(&key_set(["group"])), false);
        assert!(!tree.is_effectively_enabled(container));
        assert!(!tree.is_effectively_enabled(action));
        assert!(tree.get(action).expect("action").enabled);
        assert!(tree.is_effectively_enabled(option));
        assert_inheritance(&tree, &surface);

        tree.set_enabled(&mut surface, Selection::Keys(&key_set(["group"])), true);
        assert!(tree.is_effectively_enabled(action));
        assert_inheritance(&tree, &surface);
    }

    #[test]
    fn keyed_match_is_exact_and_descends_through_unmatched_containers() {
        let mut surface = HeadlessSurface::new();
        let (tree, container, action, _) = sample(&mut surface);
        tree.set_visible(&mut surface, Selection::Keys(&key_set(["go"])), false);
        let go = tree.get(action).expect("action").widget;
        let line = tree.get(container).expect("line").widget;
        assert!(!surface.is_active(go));
        assert!(surface.is_active(line));
    }

    #[test]
    fn exact_selection_switches_other_keyed_nodes_off() {
        let mut surface = HeadlessSurface::new();
        let (mut tree, container, action, option) = sample(&mut surface);
        tree.set_enabled(&mut surface, Selection::Exactly(&key_set(["group", "go"])), true);
        assert!(tree.is_effectively_enabled(action));
        assert!(!tree.is_effectively_enabled(option));
        assert!(tree.is_effectively_enabled(container));
        assert_inheritance(&tree, &surface);
    }

    #[test]
    fn bound_keys_come_from_options_only() {
        let mut surface = HeadlessSurface::new();
        let (tree, ..) = sample(&mut surface);
        assert_eq!(tree.bound_error_keys(), key_set(["flag"]));
    }
}
