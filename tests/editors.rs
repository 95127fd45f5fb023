use dialogui::bitflags::bitflags;
use dialogui::prelude::*;
use dialogui::surface::{HeadlessSurface, ScriptStep};
use dialogui::DialogValue;

dialog_enum! {
    #[derive(Debug)]
    enum Sparse { A = 3, B = 2, C = 0, D = 4 }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    struct Perms: u8 {
        const A = 1;
        const B = 2;
        const C = 4;
        const ALL = 7;
    }
}

dialog_flags!(Perms);

#[derive(Debug, Clone, Default, PartialEq)]
struct Point {
    x: i32,
    y: i32,
}

reflect_struct!(Point { x: i32, y: i32 });

#[derive(Default)]
struct CommaList;

impl ReversibleMapper for CommaList {
    type Inner = Vec<String>;
    type Outer = String;

    fn try_map_to_outer(&self, inner: &Vec<String>) -> Option<String> {
        Some(inner.join(","))
    }

    fn try_map_to_inner(&self, outer: &String) -> Option<Vec<String>> {
        Some(outer.split(',').map(str::to_string).collect())
    }
}

impl Construct for CommaList {
    fn empty() -> Option<Self> {
        Some(CommaList)
    }
}

#[derive(Default)]
struct Editors {
    mode: Sparse,
    perms: Perms,
    point: Point,
    tags: Vec<String>,
    name: String,
    changes: Vec<Option<Key>>,
}

impl DialogState for Editors {
    fn describe(members: &mut Members<Self>) {
        members
            .option("mode", DialogOption::new("Mode"), field!(Editors, mode))
            .option("perms", DialogOption::new("Perms"), field!(Editors, perms))
            .option(
                "point",
                DialogOption::new("Point").with_field_names(["X", "Y"]),
                field!(Editors, point),
            )
            .option(
                "tags",
                DialogOption::new("Tags").with_mapper::<CommaList>(),
                field!(Editors, tags),
            )
            .option("name", DialogOption::new("Name"), field!(Editors, name));
    }

    fn validate(&mut self, changed: Option<&Key>) -> ErrorMap {
        self.changes.push(changed.cloned());
        ErrorMap::new()
    }
}

fn build(state: Editors) -> (HeadlessSurface, StateHandle<Editors>, Dialog) {
    let mut surface = HeadlessSurface::new();
    let state = StateHandle::new(state);
    let dialog = DialogBuilder::<Editors>::new(DialogConfig::default())
        .expect("valid declaration")
        .build_in_place(&mut surface, &state, None)
        .expect("dialog builds");
    (surface, state, dialog)
}

#[test]
fn enum_cycle_follows_declared_order_both_ways() {
    let (mut surface, state, _dialog) = build(Editors {
        mode: Sparse::B,
        ..Editors::default()
    });
    let next = surface.find("Mode/>>").expect("next button");
    let previous = surface.find("Mode/<<").expect("previous button");

    assert!(surface.press(next));
    assert_eq!(state.borrow().mode, Sparse::C);
    assert!(surface.find("Mode/C").is_some());

    assert!(surface.press(previous));
    assert!(surface.press(previous));
    assert_eq!(state.borrow().mode, Sparse::A);
    assert!(surface.press(previous));
    assert_eq!(state.borrow().mode, Sparse::D);
    assert!(surface.press(next));
    assert_eq!(state.borrow().mode, Sparse::A);
}

#[test]
fn enum_edits_validate_with_their_key() {
    let (mut surface, state, _dialog) = build(Editors::default());
    let next = surface.find("Mode/>>").expect("next button");
    surface.press(next);
    assert_eq!(state.borrow().changes.first(), Some(&None));
    assert_eq!(state.borrow().changes.last(), Some(&Some(Key::from("mode"))));
}

#[test]
fn flag_toggle_sets_and_clears_single_bits() {
    let (mut surface, state, _dialog) = build(Editors {
        perms: Perms::A | Perms::C,
        ..Editors::default()
    });
    let b = surface.find("Perms/B").expect("B checkbox");
    let all = surface.find("Perms/ALL").expect("ALL checkbox");
    assert_eq!(surface.is_checked(b), Some(false));
    assert_eq!(surface.is_checked(all), Some(false));

    assert!(surface.toggle(b));
    assert_eq!(state.borrow().perms.bits(), 7);
    assert_eq!(surface.is_checked(all), Some(true));

    assert!(surface.toggle(b));
    assert_eq!(state.borrow().perms.bits(), 5);
    assert_eq!(surface.is_checked(all), Some(false));
}

#[test]
fn structural_editor_uses_positional_labels() {
    let (mut surface, state, _dialog) = build(Editors::default());
    assert!(surface.find("Point/x").is_none());
    surface
        .apply_script([
            ScriptStep::Set {
                path: "Point/X".into(),
                raw: "5".into(),
            },
            ScriptStep::Set {
                path: "Point/Y".into(),
                raw: "-2".into(),
            },
        ])
        .expect("script applies");
    assert_eq!(state.borrow().point, Point { x: 5, y: -2 });
}

#[test]
fn mapped_option_edits_the_outer_representation() {
    let (mut surface, state, _dialog) = build(Editors {
        tags: vec!["a".into(), "b".into()],
        ..Editors::default()
    });
    let editor = surface.editor_for("Tags").expect("tags editor");
    assert_eq!(surface.value_of(editor), Some(DialogValue::Text("a,b".into())));

    assert!(surface.edit(editor, DialogValue::Text("x,y,z".into())));
    assert_eq!(state.borrow().tags, vec!["x", "y", "z"]);
}

#[test]
fn foreign_values_are_dropped_instead_of_written() {
    let (mut surface, state, _dialog) = build(Editors {
        name: "kept".into(),
        ..Editors::default()
    });
    let editor = surface.editor_for("Name").expect("name editor");
    surface.edit(editor, DialogValue::Int(3));
    assert_eq!(state.borrow().name, "kept");
}

#[test]
fn reset_pulls_state_back_into_editors() {
    let (mut surface, state, dialog) = build(Editors::default());
    state.borrow_mut().name = "outside".into();
    state.borrow_mut().mode = Sparse::D;
    dialog.reset(&mut surface, ["name"]);

    let editor = surface.editor_for("Name").expect("name editor");
    assert_eq!(surface.value_of(editor), Some(DialogValue::Text("outside".into())));
    assert!(surface.find("Mode/D").is_none());

    dialog.reset_all(&mut surface);
    assert!(surface.find("Mode/D").is_some());
}

#[derive(Default)]
struct Pickers {
    kind: dialogui::TypeTag,
    target: dialogui::ObjectRef,
}

impl DialogState for Pickers {
    fn describe(members: &mut Members<Self>) {
        members
            .option("kind", DialogOption::new("Kind"), field!(Pickers, kind))
            .option("target", DialogOption::new("Target"), field!(Pickers, target));
    }

    fn validate(&mut self, _changed: Option<&Key>) -> ErrorMap {
        ErrorMap::new()
    }
}

#[test]
fn type_and_reference_pickers_write_through() {
    let mut surface = HeadlessSurface::new();
    let state = StateHandle::new(Pickers {
        target: dialogui::ObjectRef(Some(7)),
        ..Pickers::default()
    });
    DialogBuilder::<Pickers>::new(DialogConfig::default())
        .expect("valid declaration")
        .build_in_place(&mut surface, &state, None)
        .expect("dialog builds");

    let target = surface.editor_for("Target").expect("reference picker");
    assert_eq!(surface.value_of(target), Some(DialogValue::Reference(Some(7))));

    surface
        .apply_script([
            ScriptStep::Set {
                path: "Kind".into(),
                raw: "Matrix".into(),
            },
            ScriptStep::Set {
                path: "Target".into(),
                raw: "null".into(),
            },
        ])
        .expect("script applies");
    assert_eq!(state.borrow().kind, dialogui::TypeTag(Some("Matrix".into())));
    assert_eq!(state.borrow().target, dialogui::ObjectRef(None));
}
