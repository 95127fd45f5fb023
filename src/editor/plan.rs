//! Editor dispatch, resolved once per option from its static descriptor.

use tracing::trace;

use super::{EditorContext, Reset, ValueBinding, ValueGenerator, enums, structural, value};
use crate::domain::{DialogValue, EnumDescriptor, TypeDescriptor, ValueKind};
use crate::error::{DialogError, Result};
use crate::surface::{EditorKind, WidgetSurface};

#[derive(Debug, Clone)]
pub enum EditorPlan {
    EnumCycle(EnumDescriptor),
    Flags(EnumDescriptor),
    TypePicker,
    Reference,
    Value(ValueKind),
    Structural(StructPlan),
}

#[derive(Debug, Clone)]
pub struct StructPlan {
    pub type_name: &'static str,
    pub fields: Vec<FieldPlan>,
}

#[derive(Debug, Clone)]
pub struct FieldPlan {
    pub name: &'static str,
    pub label: String,
    pub default: fn() -> DialogValue,
    pub plan: EditorPlan,
}

impl EditorPlan {
    /// `field_names` override the labels of top-level fields by position.
    pub fn resolve(descriptor: &TypeDescriptor, field_names: &[String], limit: usize) -> Result<Self> {
        Self::resolve_at(descriptor, field_names, 0, limit)
    }

    fn resolve_at(
        descriptor: &TypeDescriptor,
        field_names: &[String],
        depth: usize,
        limit: usize,
    ) -> Result<Self> {
        let plan = match descriptor {
            TypeDescriptor::Enum(meta) if meta.flags => EditorPlan::Flags(meta.clone()),
            TypeDescriptor::Enum(meta) => EditorPlan::EnumCycle(meta.clone()),
            TypeDescriptor::TypeTag => EditorPlan::TypePicker,
            TypeDescriptor::Reference { .. } => EditorPlan::Reference,
            TypeDescriptor::Value(kind) => EditorPlan::Value(*kind),
            TypeDescriptor::Struct(meta) => {
                if depth >= limit {
                    return Err(DialogError::DescriptorDepthExceeded {
                        type_name: meta.type_name.to_string(),
                        limit,
                    });
                }
                let mut fields = Vec::with_capacity(meta.fields.len());
                for (position, field) in meta.fields.iter().enumerate() {
                    if field.read_only {
                        continue;
                    }
                    let label = field_names
                        .get(position)
                        .cloned()
                        .unwrap_or_else(|| field.display_label().to_string());
                    let plan = Self::resolve_at(&(field.descriptor)(), &[], depth + 1, limit)?;
                    fields.push(FieldPlan {
                        name: field.name,
                        label,
                        default: field.default,
                        plan,
                    });
                }
                EditorPlan::Structural(StructPlan {
                    type_name: meta.type_name,
                    fields,
                })
            }
        };
        Ok(plan)
    }

    pub fn supports_masking(&self) -> bool {
        match self {
            EditorPlan::Value(kind) => kind.is_text_input(),
            EditorPlan::Structural(plan) => plan.fields.iter().any(|field| field.plan.supports_masking()),
            EditorPlan::EnumCycle(_)
            | EditorPlan::Flags(_)
            | EditorPlan::TypePicker
            | EditorPlan::Reference => false,
        }
    }

    pub fn generate(
        &self,
        surface: &mut dyn WidgetSurface,
        ctx: &EditorContext<'_>,
        binding: ValueBinding,
    ) -> Reset {
        trace!(label = ctx.label, plan = self.kind_name(), "generating editor");
        match self {
            EditorPlan::EnumCycle(meta) => enums::cycle(surface, ctx, meta, binding),
            EditorPlan::Flags(meta) => enums::flags(surface, ctx, meta, binding),
            EditorPlan::TypePicker => value::generate(surface, ctx, EditorKind::TypePicker, binding),
            EditorPlan::Reference => value::generate(surface, ctx, EditorKind::ReferencePicker, binding),
            EditorPlan::Value(kind) => value::generate(surface, ctx, EditorKind::Value(*kind), binding),
            EditorPlan::Structural(plan) => structural::generate(surface, ctx, plan, binding),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            EditorPlan::EnumCycle(_) => "enum",
            EditorPlan::Flags(_) => "flags",
            EditorPlan::TypePicker => "type",
            EditorPlan::Reference => "reference",
            EditorPlan::Value(_) => "value",
            EditorPlan::Structural(_) => "struct",
        }
    }
}

impl ValueGenerator for EditorPlan {
    fn name(&self) -> &'static str {
        self.kind_name()
    }

    fn generate_value(
        &self,
        surface: &mut dyn WidgetSurface,
        ctx: &EditorContext<'_>,
        binding: ValueBinding,
    ) -> Reset {
        self.generate(surface, ctx, binding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldDescriptor, Reflect, StructDescriptor};

    #[derive(Debug, Clone, Default)]
    struct Chain;

    impl Reflect for Chain {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::Struct(StructDescriptor {
                type_name: "Chain",
                fields: vec![FieldDescriptor::of::<Chain>("next")],
            })
        }

        fn to_value(&self) -> DialogValue {
            DialogValue::Struct(Default::default())
        }

        fn from_value(_: &DialogValue) -> Option<Self> {
            Some(Chain)
        }
    }

    #[derive(Debug, Clone, Default)]
    struct Account;

    impl Reflect for Account {
        fn descriptor() -> TypeDescriptor {
            TypeDescriptor::Struct(StructDescriptor {
                type_name: "Account",
                fields: vec![
                    FieldDescriptor::of::<u64>("id").read_only(),
                    FieldDescriptor::of::<String>("name"),
                    FieldDescriptor::of::<bool>("active").with_label("Active"),
                ],
            })
        }

        fn to_value(&self) -> DialogValue {
            DialogValue::Struct(Default::default())
        }

        fn from_value(_: &DialogValue) -> Option<Self> {
            Some(Account)
        }
    }

    #[test]
    fn self_referential_struct_hits_depth_limit() {
        let err = EditorPlan::resolve(&Chain::descriptor(), &[], 16).unwrap_err();
        assert_eq!(
            err,
            DialogError::DescriptorDepthExceeded {
                type_name: "Chain".into(),
                limit: 16
            }
        );
    }

    #[test]
    fn read_only_fields_skipped_and_positional_names_override() {
        let names = vec!["Ident".to_string(), "Login".to_string()];
        let EditorPlan::Structural(plan) = EditorPlan::resolve(&Account::descriptor(), &names, 4)
            .expect("plan")
        else {
            panic!("expected structural plan");
        };
        let labels: Vec<_> = plan.fields.iter().map(|field| field.label.as_str()).collect();
        assert_eq!(labels, vec!["Login", "Active"]);
    }

    #[test]
    fn masking_requires_text_inputs() {
        assert!(EditorPlan::Value(ValueKind::Text).supports_masking());
        assert!(EditorPlan::Value(ValueKind::Float).supports_masking());
        assert!(!EditorPlan::Value(ValueKind::Bool).supports_masking());
        assert!(!EditorPlan::Value(ValueKind::List).supports_masking());
        assert!(!EditorPlan::Reference.supports_masking());
        let plan = EditorPlan::resolve(&Account::descriptor(), &[], 4).expect("plan");
        assert!(plan.supports_masking());
    }
}
