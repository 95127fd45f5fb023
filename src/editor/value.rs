use std::rc::Rc;

use super::{EditorContext, Reset, ValueBinding};
use crate::surface::{EditorKind, WidgetSurface};

/// Single host editor for primitives, type tags and references.
pub(crate) fn generate(
    surface: &mut dyn WidgetSurface,
    ctx: &EditorContext<'_>,
    kind: EditorKind,
    binding: ValueBinding,
) -> Reset {
    let node = surface.value_editor(kind, binding.get());
    let writer = binding.clone();
    let changed = ctx.on_change.clone();
    surface.on_value_change(
        node,
        Rc::new(move |surface, value| {
            writer.set(value);
            changed(surface);
        }),
    );
    Rc::new(move |surface| surface.set_value(node, binding.get()))
}
