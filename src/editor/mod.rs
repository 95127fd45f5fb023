//! Type-directed editor strategies.
//!
//! An editor renders one value under the surface cursor, wires widget events
//! back into its [`Binding`], and hands back a [`Reset`] that re-reads the
//! bound value into the widgets.

mod enums;
pub mod plan;
pub(crate) mod secret;
mod structural;
mod value;

use std::any::{Any, TypeId, type_name};
use std::rc::Rc;

use crate::config::DialogConfig;
use crate::domain::{DialogValue, Reflect};
use crate::error::{DialogError, Result};
use crate::mapper::{Construct, Getter, Setter, construct};
use crate::surface::{Handler, WidgetSurface};

pub use plan::{EditorPlan, FieldPlan, StructPlan};

/// Re-reads authoritative state into the widgets an editor created.
pub type Reset = Handler;

/// Pure state access; change notification goes through [`EditorContext`].
pub struct Binding<T> {
    get: Getter<T>,
    set: Setter<T>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            get: self.get.clone(),
            set: self.set.clone(),
        }
    }
}

impl<T: 'static> Binding<T> {
    pub fn new(get: impl Fn() -> T + 'static, set: impl Fn(T) + 'static) -> Self {
        Self {
            get: Rc::new(get),
            set: Rc::new(set),
        }
    }

    pub fn from_parts(get: Getter<T>, set: Setter<T>) -> Self {
        Self { get, set }
    }

    pub fn get(&self) -> T {
        (self.get)()
    }

    pub fn set(&self, value: T) {
        (self.set)(value)
    }

    pub fn into_parts(self) -> (Getter<T>, Setter<T>) {
        (self.get, self.set)
    }
}

pub type ValueBinding = Binding<DialogValue>;

impl ValueBinding {
    /// Narrows to a concrete type. Unconvertible reads give `T::default()`,
    /// unconvertible writes cannot happen since `T` always converts.
    pub fn typed<T: Reflect + Default>(self) -> Binding<T> {
        let (get, set) = self.into_parts();
        Binding::new(
            move || T::from_value(&get()).unwrap_or_default(),
            move |value: T| set(value.to_value()),
        )
    }
}

pub struct EditorContext<'a> {
    pub label: &'a str,
    pub secret: bool,
    pub config: &'a DialogConfig,
    /// Called after every write the editor performs.
    pub on_change: Handler,
}

impl EditorContext<'_> {
    pub fn notify(&self, surface: &mut dyn WidgetSurface) {
        (self.on_change)(surface)
    }

    pub(crate) fn nested<'b>(&'b self, label: &'b str) -> EditorContext<'b> {
        EditorContext {
            label,
            secret: self.secret,
            config: self.config,
            on_change: self.on_change.clone(),
        }
    }
}

/// A user-supplied editor for one concrete type.
pub trait EditorGenerator: 'static {
    type Value: Reflect + Default;

    fn generate(
        &self,
        surface: &mut dyn WidgetSurface,
        ctx: &EditorContext<'_>,
        binding: Binding<Self::Value>,
    ) -> Reset;
}

/// Object-safe face of [`EditorGenerator`].
pub trait ValueGenerator {
    fn name(&self) -> &'static str;

    fn generate_value(
        &self,
        surface: &mut dyn WidgetSurface,
        ctx: &EditorContext<'_>,
        binding: ValueBinding,
    ) -> Reset;
}

impl<G: EditorGenerator> ValueGenerator for G {
    fn name(&self) -> &'static str {
        type_name::<G>()
    }

    fn generate_value(
        &self,
        surface: &mut dyn WidgetSurface,
        ctx: &EditorContext<'_>,
        binding: ValueBinding,
    ) -> Reset {
        self.generate(surface, ctx, binding.typed::<G::Value>())
    }
}

type GeneratorFactory = fn(&dyn Any) -> Option<Rc<dyn ValueGenerator>>;

#[derive(Clone)]
pub struct GeneratorSpec {
    pub name: &'static str,
    pub value: TypeId,
    pub value_name: &'static str,
    factory: GeneratorFactory,
}

impl std::fmt::Debug for GeneratorSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorSpec")
            .field("name", &self.name)
            .field("value", &self.value_name)
            .finish()
    }
}

impl GeneratorSpec {
    pub fn of<G: EditorGenerator + Construct>() -> Self {
        Self {
            name: type_name::<G>(),
            value: TypeId::of::<G::Value>(),
            value_name: type_name::<G::Value>(),
            factory: |owner| {
                construct::<G>(owner).map(|generator| Rc::new(generator) as Rc<dyn ValueGenerator>)
            },
        }
    }

    pub fn instantiate(
        &self,
        owner: &dyn Any,
        owner_name: &'static str,
    ) -> Result<Rc<dyn ValueGenerator>> {
        (self.factory)(owner).ok_or(DialogError::MissingConstructor {
            type_name: self.name,
            owner: owner_name,
        })
    }
}

/// Resolved editing strategy of one option.
#[derive(Debug, Clone)]
pub enum OptionEditor {
    Custom(GeneratorSpec),
    Builtin(Rc<EditorPlan>),
}

impl OptionEditor {
    /// Instantiates the editor for one build; custom generators are
    /// constructed against the state object.
    pub fn instantiate(
        &self,
        owner: &dyn Any,
        owner_name: &'static str,
    ) -> Result<Rc<dyn ValueGenerator>> {
        match self {
            OptionEditor::Custom(spec) => spec.instantiate(owner, owner_name),
            OptionEditor::Builtin(plan) => Ok(plan.clone() as Rc<dyn ValueGenerator>),
        }
    }

    /// Whether a mask can hide the value, i.e. the editor ends in text inputs.
    pub fn supports_masking(&self) -> bool {
        match self {
            OptionEditor::Custom(_) => true,
            OptionEditor::Builtin(plan) => plan.supports_masking(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn typed_binding_defaults_on_foreign_values() {
        let store = Rc::new(RefCell::new(DialogValue::Text("x".into())));
        let (reader, writer) = (store.clone(), store.clone());
        let binding = ValueBinding::new(
            move || reader.borrow().clone(),
            move |value| *writer.borrow_mut() = value,
        )
        .typed::<i32>();
        assert_eq!(binding.get(), 0);
        binding.set(5);
        assert_eq!(*store.borrow(), DialogValue::Int(5));
        assert_eq!(binding.get(), 5);
    }
}
