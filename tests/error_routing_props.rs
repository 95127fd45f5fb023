use std::rc::Rc;

use dialogui::prelude::*;
use dialogui::surface::HeadlessSurface;
use dialogui::{ActionDefinition, MemberSet};
use proptest::prelude::*;

const KEYS: [&str; 4] = ["a", "b", "c", "d"];

/// Two bound options; the error map is whatever the test hands in.
#[derive(Default)]
struct Routed {
    a: String,
    b: String,
    errors: ErrorMap,
}

impl DialogState for Routed {
    fn describe(members: &mut Members<Self>) {
        members
            .option("a", DialogOption::new("A"), field!(Routed, a))
            .option("b", DialogOption::new("B"), field!(Routed, b));
    }

    fn validate(&mut self, _changed: Option<&Key>) -> ErrorMap {
        self.errors.clone()
    }
}

fn message(key: &str) -> String {
    format!("{key} failed")
}

fn build(errors: ErrorMap, filters: &[Option<Vec<&'static str>>]) -> (HeadlessSurface, Dialog) {
    let config = DialogConfig::default();
    let members: MemberSet<Routed> = Members::collect(&config).expect("valid declaration");
    let mut builder = DialogBuilder::<Routed>::empty(config);
    builder.add_all_options(&members).add_unbound_error_display();
    for (index, filter) in filters.iter().enumerate() {
        let mut action = DialogAction::new(format!("Action{index}"));
        if let Some(keys) = filter {
            action = action.validate_keys(keys.clone());
        }
        builder.add_action(ActionDefinition::new(
            format!("action{index}"),
            action,
            Rc::new(|_: &mut dyn WidgetSurface, _: &StateHandle<Routed>| {}),
        ));
    }

    let mut surface = HeadlessSurface::new();
    let state = StateHandle::new(Routed {
        errors,
        ..Routed::default()
    });
    let dialog = builder
        .build_in_place(&mut surface, &state, None)
        .expect("dialog builds");
    (surface, dialog)
}

fn error_map() -> impl Strategy<Value = ErrorMap> {
    prop::sample::subsequence(KEYS.to_vec(), 0..=KEYS.len())
        .prop_shuffle()
        .prop_map(|keys| {
            keys.into_iter()
                .map(|key| (Key::from(key), message(key)))
                .collect()
        })
}

fn filter() -> impl Strategy<Value = Option<Vec<&'static str>>> {
    prop::option::of(prop::sample::subsequence(KEYS.to_vec(), 0..=2))
}

proptest! {
    #[test]
    fn catch_all_shows_exactly_the_unbound_errors(errors in error_map()) {
        let (surface, dialog) = build(errors.clone(), &[]);
        let bound = dialog.bound_error_keys();

        let expected = errors
            .iter()
            .filter(|(key, _)| !bound.contains(*key))
            .map(|(_, message)| message.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let display = dialog
            .elements(&surface)
            .into_iter()
            .find(|element| element.kind == "error_display")
            .expect("catch-all display");
        prop_assert_eq!(surface.text_of(display.widget).unwrap_or_default(), expected);

        for (key, message) in errors.iter().filter(|(key, _)| bound.contains(*key)) {
            prop_assert!(surface.find(message).is_some(), "{} has no inline error", key);
        }
    }

    #[test]
    fn actions_are_enabled_iff_their_filter_misses_every_error(
        errors in error_map(),
        filters in prop::collection::vec(filter(), 1..5),
    ) {
        let (surface, _dialog) = build(errors.clone(), &filters);
        for (index, filter) in filters.iter().enumerate() {
            let expected = match filter {
                None => true,
                Some(keys) if keys.is_empty() => errors.is_empty(),
                Some(keys) => keys.iter().all(|key| !errors.contains_key(&Key::from(*key))),
            };
            let button = surface
                .find(&format!("Action{index}"))
                .expect("action button");
            prop_assert_eq!(surface.is_interactable(button), expected, "filter {:?}", filter);
        }
    }
}
