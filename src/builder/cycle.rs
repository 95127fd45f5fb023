use std::cell::{Cell, RefCell};

use tracing::{debug, warn};

use crate::domain::{ErrorMap, ErrorReport, Key, KeySet};
use crate::element::ElementTree;
use crate::surface::WidgetSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Phase {
    #[default]
    Idle,
    Validating,
    Displaying,
}

/// validate, partition, display. One instance per dialog.
#[derive(Default)]
pub(crate) struct ValidationCycle {
    phase: Cell<Phase>,
    bound: RefCell<KeySet>,
    last: RefCell<ErrorReport>,
}

impl ValidationCycle {
    pub(crate) fn set_bound(&self, keys: KeySet) {
        *self.bound.borrow_mut() = keys;
    }

    pub(crate) fn run(
        &self,
        surface: &mut dyn WidgetSurface,
        tree: &RefCell<ElementTree>,
        key: Option<&Key>,
        validate: impl FnOnce(&mut dyn WidgetSurface, Option<&Key>) -> ErrorMap,
    ) -> ErrorReport {
        let phase = self.phase.get();
        if phase != Phase::Idle {
            warn!(?phase, "re-entrant validation skipped");
            return self.last.borrow().clone();
        }

        self.phase.set(Phase::Validating);
        let all = validate(surface, key);
        let report = ErrorReport::partition(all, &self.bound.borrow());

        self.phase.set(Phase::Displaying);
        tree.borrow_mut().display_errors(surface, &report);
        self.phase.set(Phase::Idle);

        debug!(
            key = key.map(Key::as_str),
            errors = report.all.len(),
            unbound = report.unbound.len(),
            "validation cycle"
        );
        *self.last.borrow_mut() = report.clone();
        report
    }
}

#[cfg(all(test, feature = "headless"))]
mod tests {
    use super::*;
    use crate::domain::key_set;
    use crate::surface::HeadlessSurface;

    #[test]
    fn nested_request_returns_previous_report() {
        let mut surface = HeadlessSurface::new();
        let tree = RefCell::new(ElementTree::new());
        let cycle = ValidationCycle::default();
        cycle.set_bound(key_set(["a"]));

        let first = cycle.run(&mut surface, &tree, None, |_, _| {
            [(Key::from("a"), "bad".to_string()), (Key::from("b"), "worse".to_string())]
                .into_iter()
                .collect()
        });
        assert_eq!(first.unbound.len(), 1);

        let second = cycle.run(&mut surface, &tree, None, |surface, _| {
            let nested = cycle.run(surface, &tree, None, |_, _| ErrorMap::new());
            assert_eq!(nested, first);
            ErrorMap::new()
        });
        assert!(second.is_clean());
        assert_eq!(cycle.phase.get(), Phase::Idle);
    }
}
