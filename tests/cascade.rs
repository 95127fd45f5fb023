use std::rc::Rc;

use dialogui::element::ElementSnapshot;
use dialogui::prelude::*;
use dialogui::surface::HeadlessSurface;
use dialogui::{EntryDefinition, MemberSet};
use proptest::prelude::*;

#[derive(Default)]
struct Panel {
    name: String,
    enabled: bool,
    saves: usize,
}

impl DialogState for Panel {
    fn describe(members: &mut Members<Self>) {
        members
            .option("name", DialogOption::new("Name"), field!(Panel, name))
            .option("enabled", DialogOption::new("Enabled"), field!(Panel, enabled))
            .action("save", DialogAction::new("Save"), |panel: &mut Panel| panel.saves += 1)
            .action("cancel", DialogAction::new("Cancel"), |_: &mut Panel| {});
    }

    fn validate(&mut self, _changed: Option<&Key>) -> ErrorMap {
        ErrorMap::new()
    }
}

/// Options, then the actions inside a line keyed `buttons`.
fn build() -> (HeadlessSurface, StateHandle<Panel>, Dialog) {
    let config = DialogConfig::default();
    let members: MemberSet<Panel> = Members::collect(&config).expect("valid declaration");
    let actions = members
        .actions
        .iter()
        .map(|action| Rc::new(action.clone()) as Rc<dyn EntryDefinition<Panel>>)
        .collect();
    let mut builder = DialogBuilder::<Panel>::empty(config);
    builder
        .add_all_options(&members)
        .add_unbound_error_display()
        .add_line(Some(Key::from("buttons")), actions);

    let mut surface = HeadlessSurface::new();
    let state = StateHandle::new(Panel::default());
    let dialog = builder
        .build_in_place(&mut surface, &state, None)
        .expect("dialog builds");
    (surface, state, dialog)
}

fn element<'a>(elements: &'a [ElementSnapshot], key: &str) -> &'a ElementSnapshot {
    elements
        .iter()
        .find(|element| element.key.as_ref().map(Key::as_str) == Some(key))
        .expect("keyed element")
}

fn assert_inheritance(elements: &[ElementSnapshot]) {
    for entry in elements {
        assert_eq!(entry.effectively_enabled, entry.enabled && entry.parent_enabled);
        match entry.parent {
            Some(parent) => {
                let parent = elements
                    .iter()
                    .find(|candidate| candidate.id == parent)
                    .expect("parent precedes child");
                assert_eq!(entry.parent_enabled, parent.effectively_enabled);
                assert_eq!(entry.depth, parent.depth + 1);
            }
            None => assert_eq!(entry.depth, 0),
        }
    }
}

#[test]
fn disabling_a_line_reaches_its_actions_only() {
    let (mut surface, state, dialog) = build();
    dialog.disable(&mut surface, ["buttons"]);

    let elements = dialog.elements(&surface);
    assert_inheritance(&elements);
    let save = element(&elements, "save");
    assert!(save.enabled);
    assert!(!save.effectively_enabled);
    assert!(element(&elements, "name").effectively_enabled);

    let button = surface.find("Save").expect("save button");
    assert!(!surface.is_interactable(button));
    let editor = surface.editor_for("Name").expect("name editor");
    assert!(surface.is_interactable(editor));

    assert!(!surface.press(button));

    dialog.enable(&mut surface, ["buttons"]);
    assert!(surface.press(button));
    assert_eq!(state.borrow().saves, 1);
    assert_inheritance(&dialog.elements(&surface));
}

#[test]
fn local_flag_survives_parent_toggling() {
    let (mut surface, _state, dialog) = build();
    dialog.disable(&mut surface, ["cancel"]);
    dialog.disable(&mut surface, ["buttons"]);
    dialog.enable(&mut surface, ["buttons"]);

    let elements = dialog.elements(&surface);
    assert_inheritance(&elements);
    assert!(!element(&elements, "cancel").effectively_enabled);
    assert!(element(&elements, "save").effectively_enabled);
}

#[test]
fn enable_all_overrides_every_local_flag() {
    let (mut surface, _state, dialog) = build();
    dialog.disable(&mut surface, ["cancel"]);
    dialog.disable_all(&mut surface);
    assert!(dialog.elements(&surface).iter().all(|element| !element.effectively_enabled));

    dialog.enable_all(&mut surface);
    let elements = dialog.elements(&surface);
    assert_inheritance(&elements);
    assert!(elements.iter().all(|element| element.effectively_enabled));
}

#[test]
fn disabled_option_locks_every_widget_of_its_editor() {
    let (mut surface, state, dialog) = build();
    dialog.disable(&mut surface, ["enabled"]);
    let checkbox = surface.editor_for("Enabled").expect("bool editor");
    assert!(!surface.is_interactable(checkbox));
    assert!(!surface.edit(checkbox, dialogui::DialogValue::Bool(true)));
    assert!(!state.borrow().enabled);
}

#[test]
fn keyed_visibility_matches_only_the_node_itself() {
    let (mut surface, _state, dialog) = build();
    dialog.hide(&mut surface, ["save"]);
    let save = surface.find("Save").expect("save button");
    let cancel = surface.find("Cancel").expect("cancel button");
    assert!(!surface.is_visible(save));
    assert!(surface.is_visible(cancel));

    dialog.hide(&mut surface, ["buttons"]);
    assert!(!surface.is_visible(cancel));
    dialog.show_all(&mut surface);
    assert!(surface.is_visible(save));
    assert!(surface.is_visible(cancel));
}

#[test]
fn exact_key_sets_switch_everything_else_off() {
    let (mut surface, _state, dialog) = build();
    dialog.set_visible_keys(&mut surface, ["name", "buttons", "save"]);
    let elements = dialog.elements(&surface);
    assert!(element(&elements, "name").visible);
    assert!(!element(&elements, "enabled").visible);
    assert!(!element(&elements, "cancel").visible);
    assert!(element(&elements, "save").visible);

    dialog.set_enabled_keys(&mut surface, ["buttons", "save"]);
    let elements = dialog.elements(&surface);
    assert_inheritance(&elements);
    assert!(!element(&elements, "name").effectively_enabled);
    assert!(element(&elements, "save").effectively_enabled);
    assert!(!element(&elements, "cancel").effectively_enabled);
}

#[test]
fn hiding_the_dialog_hides_the_whole_subtree() {
    let (mut surface, _state, dialog) = build();
    dialog.set_visible(&mut surface, false);
    assert!(!dialog.visible(&surface));
    let save = surface.find("Save").expect("save button");
    assert!(!surface.is_visible(save));
    assert!(!surface.press(save));
}

#[derive(Debug, Clone)]
enum Cascade {
    EnableAll,
    DisableAll,
    Enable(Vec<&'static str>),
    Disable(Vec<&'static str>),
    EnableExactly(Vec<&'static str>),
}

const CASCADE_KEYS: [&str; 6] = ["name", "enabled", "save", "cancel", "buttons", "missing"];

fn cascade() -> impl Strategy<Value = Cascade> {
    let keys = || prop::sample::subsequence(CASCADE_KEYS.to_vec(), 0..=3);
    prop_oneof![
        Just(Cascade::EnableAll),
        Just(Cascade::DisableAll),
        keys().prop_map(Cascade::Enable),
        keys().prop_map(Cascade::Disable),
        keys().prop_map(Cascade::EnableExactly),
    ]
}

proptest! {
    #[test]
    fn inheritance_holds_after_any_cascade_sequence(steps in prop::collection::vec(cascade(), 1..12)) {
        let (mut surface, _state, dialog) = build();
        for step in steps {
            match step {
                Cascade::EnableAll => dialog.enable_all(&mut surface),
                Cascade::DisableAll => dialog.disable_all(&mut surface),
                Cascade::Enable(keys) => dialog.enable(&mut surface, keys),
                Cascade::Disable(keys) => dialog.disable(&mut surface, keys),
                Cascade::EnableExactly(keys) => dialog.set_enabled_keys(&mut surface, keys),
            }
            let elements = dialog.elements(&surface);
            assert_inheritance(&elements);
            for action in elements.iter().filter(|element| element.kind == "action") {
                prop_assert_eq!(surface.is_interactable(action.widget), action.effectively_enabled);
            }
        }
    }
}
