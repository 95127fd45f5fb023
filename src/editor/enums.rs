use std::rc::Rc;

use super::{EditorContext, Reset, ValueBinding};
use crate::domain::{DialogValue, EnumDescriptor};
use crate::surface::{ActionScope, NodeId, WidgetSurface};

/// Next value after `current` in `order`, wrapping. Unknown values restart at the front.
pub(crate) fn step(order: &[u64], current: Option<u64>) -> u64 {
    let next = current
        .and_then(|bits| order.iter().position(|value| *value == bits))
        .map_or(0, |index| (index + 1) % order.len());
    order.get(next).copied().unwrap_or_default()
}

fn label_for(meta: &EnumDescriptor, current: Option<u64>, unknown: &str) -> String {
    current
        .and_then(|bits| meta.name_of(bits))
        .unwrap_or(unknown)
        .to_string()
}

/// `<<` label `>>` cycling through distinct values.
pub(crate) fn cycle(
    surface: &mut dyn WidgetSurface,
    ctx: &EditorContext<'_>,
    meta: &EnumDescriptor,
    binding: ValueBinding,
) -> Reset {
    let forward = meta.distinct_values();
    let backward: Vec<u64> = forward.iter().rev().copied().collect();
    let unknown = ctx.config.unknown_enum_label.clone();

    surface.horizontal_layout(ctx.config.spacing / 2.0);
    let previous = surface.button(&ctx.config.previous_label);
    let label = surface.text(&label_for(meta, binding.get().as_bits(), &unknown));
    let next = surface.button(&ctx.config.next_label);
    surface.nest_out();

    let refresh: Reset = {
        let meta = meta.clone();
        let binding = binding.clone();
        Rc::new(move |surface: &mut dyn WidgetSurface| {
            surface.set_text(label, &label_for(&meta, binding.get().as_bits(), &unknown));
        })
    };

    for (button, order) in [(previous, backward), (next, forward)] {
        let binding = binding.clone();
        let refresh = refresh.clone();
        let changed = ctx.on_change.clone();
        surface.on_press(
            button,
            ActionScope::Private,
            Rc::new(move |surface| {
                let target = step(&order, binding.get().as_bits());
                binding.set(DialogValue::Enum(target));
                refresh(surface);
                changed(surface);
            }),
        );
    }
    refresh
}

/// One checkbox per named flag, composites included.
pub(crate) fn flags(
    surface: &mut dyn WidgetSurface,
    ctx: &EditorContext<'_>,
    meta: &EnumDescriptor,
    binding: ValueBinding,
) -> Reset {
    let current = binding.get().as_bits().unwrap_or_default();
    surface.vertical_layout(ctx.config.spacing / 2.0);
    let boxes: Vec<(NodeId, u64)> = meta
        .variants
        .iter()
        .map(|(name, flag)| (surface.checkbox(name, current & flag == *flag), *flag))
        .collect();
    surface.nest_out();

    let refresh: Reset = {
        let boxes = boxes.clone();
        let binding = binding.clone();
        Rc::new(move |surface: &mut dyn WidgetSurface| {
            let current = binding.get().as_bits().unwrap_or_default();
            for (node, flag) in &boxes {
                surface.set_checked(*node, current & flag == *flag);
            }
        })
    };

    for (node, flag) in boxes {
        let binding = binding.clone();
        let refresh = refresh.clone();
        let changed = ctx.on_change.clone();
        surface.on_toggle(
            node,
            Rc::new(move |surface, checked| {
                let current = binding.get().as_bits().unwrap_or_default();
                let next = if checked { current | flag } else { current & !flag };
                binding.set(DialogValue::Enum(next));
                refresh(surface);
                changed(surface);
            }),
        );
    }
    refresh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_wraps_and_restarts_on_unknown() {
        let order = [3, 2, 0, 4];
        assert_eq!(step(&order, Some(2)), 0);
        assert_eq!(step(&order, Some(4)), 3);
        assert_eq!(step(&order, Some(9)), 3);
        assert_eq!(step(&order, None), 3);
        assert_eq!(step(&[], Some(1)), 0);
    }
}
