use std::rc::Rc;

use super::{EditorContext, Reset, StructPlan, ValueBinding};
use crate::domain::DialogValue;
use crate::surface::WidgetSurface;

/// Binding onto one field of a struct-valued binding. Writes replace the
/// field and write the whole struct back.
fn field_binding(
    parent: &ValueBinding,
    name: &'static str,
    default: fn() -> DialogValue,
) -> ValueBinding {
    let reader = parent.clone();
    let writer = parent.clone();
    ValueBinding::new(
        move || reader.get().field(name).cloned().unwrap_or_else(default),
        move |value| {
            let mut current = writer.get();
            if let DialogValue::Struct(fields) = &mut current {
                fields.insert(name.to_string(), value);
                writer.set(current);
            }
        },
    )
}

pub(crate) fn generate(
    surface: &mut dyn WidgetSurface,
    ctx: &EditorContext<'_>,
    plan: &StructPlan,
    binding: ValueBinding,
) -> Reset {
    surface.vertical_layout(ctx.config.spacing / 2.0);
    let mut resets = Vec::with_capacity(plan.fields.len());
    for field in &plan.fields {
        surface.horizontal_layout(ctx.config.spacing);
        surface.text(&field.label);
        let child = field_binding(&binding, field.name, field.default);
        resets.push(field.plan.generate(surface, &ctx.nested(&field.label), child));
        surface.nest_out();
    }
    surface.nest_out();
    Rc::new(move |surface| {
        for reset in &resets {
            reset(surface);
        }
    })
}
