use std::any::{TypeId, type_name};
use std::rc::Rc;

use super::{CreateContext, EntryDefinition};
use crate::dialog::{DialogState, StateHandle};
use crate::domain::{DialogValue, Key, Reflect};
use crate::editor::{
    EditorContext, EditorGenerator, EditorPlan, GeneratorSpec, OptionEditor, ValueBinding, secret,
};
use crate::element::ElementId;
use crate::error::{DialogError, Result};
use crate::mapper::{Construct, MapperSpec, ReversibleMapper, map_binding};
use crate::surface::{Handler, TextColor, WidgetSurface};

/// Option metadata attached to a state member.
#[derive(Debug, Clone)]
pub struct DialogOption {
    pub name: String,
    pub secret: bool,
    pub show_errors: bool,
    pub mapper: Option<MapperSpec>,
    pub editor: Option<GeneratorSpec>,
    /// Positional labels for the fields of a composite value.
    pub field_names: Vec<String>,
}

impl DialogOption {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secret: false,
            show_errors: true,
            mapper: None,
            editor: None,
            field_names: Vec::new(),
        }
    }

    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    pub fn without_errors(mut self) -> Self {
        self.show_errors = false;
        self
    }

    pub fn with_mapper<M: ReversibleMapper + Construct>(mut self) -> Self {
        self.mapper = Some(MapperSpec::of::<M>());
        self
    }

    pub fn with_editor<G: EditorGenerator + Construct>(mut self) -> Self {
        self.editor = Some(GeneratorSpec::of::<G>());
        self
    }

    pub fn with_field_names<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.field_names = names.into_iter().map(Into::into).collect();
        self
    }
}

/// Accessor pair onto one member of the state.
pub struct Field<S, T> {
    get: Rc<dyn Fn(&S) -> T>,
    set: Rc<dyn Fn(&mut S, T)>,
}

impl<S, T> Field<S, T> {
    pub fn new(get: impl Fn(&S) -> T + 'static, set: impl Fn(&mut S, T) + 'static) -> Self {
        Self {
            get: Rc::new(get),
            set: Rc::new(set),
        }
    }
}

/// Accessor pair over a state member, generated from a field name.
#[macro_export]
macro_rules! field {
    ($state:ty, $member:ident) => {
        $crate::definition::Field::new(
            |state: &$state| state.$member.clone(),
            |state: &mut $state, value| state.$member = value,
        )
    };
}

type ValueGetter<S> = Rc<dyn Fn(&S) -> DialogValue>;
type ValueSetter<S> = Rc<dyn Fn(&mut S, DialogValue)>;

struct OptionSpec<S> {
    key: Key,
    name: String,
    secret: bool,
    show_errors: bool,
    mapper: Option<MapperSpec>,
    editor: OptionEditor,
    get: ValueGetter<S>,
    set: ValueSetter<S>,
}

/// One "label: editor" row bound to a state member.
pub struct OptionDefinition<S> {
    spec: Rc<OptionSpec<S>>,
}

impl<S> Clone for OptionDefinition<S> {
    fn clone(&self) -> Self {
        Self {
            spec: self.spec.clone(),
        }
    }
}

impl<S: DialogState> OptionDefinition<S> {
    /// Resolves mapper and editor for `T` once; every instantiation reuses the result.
    pub fn new<T: Reflect>(
        key: impl Into<Key>,
        option: DialogOption,
        field: Field<S, T>,
        max_depth: usize,
    ) -> Result<Self> {
        let key = key.into();
        let (descriptor, outer, outer_name) = match &option.mapper {
            Some(mapper) => {
                if mapper.inner != TypeId::of::<T>() {
                    return Err(DialogError::MapperTypeMismatch {
                        key: key.to_string(),
                        mapper: mapper.name,
                        expected: mapper.inner_name,
                        found: type_name::<T>(),
                    });
                }
                ((mapper.outer_descriptor)(), mapper.outer, mapper.outer_name)
            }
            None => (T::descriptor(), TypeId::of::<T>(), type_name::<T>()),
        };

        let editor = match &option.editor {
            Some(generator) if generator.value != outer => {
                return Err(DialogError::GeneratorTypeMismatch {
                    key: key.to_string(),
                    generator: generator.name,
                    expected: generator.value_name,
                    found: outer_name,
                });
            }
            Some(generator) => OptionEditor::Custom(generator.clone()),
            None => OptionEditor::Builtin(Rc::new(EditorPlan::resolve(
                &descriptor,
                &option.field_names,
                max_depth,
            )?)),
        };
        if option.secret && !editor.supports_masking() {
            return Err(DialogError::SecretWithoutEditor {
                key: key.to_string(),
                type_name: descriptor.label(),
            });
        }

        let Field { get, set } = field;
        let name = if option.name.is_empty() {
            key.to_string()
        } else {
            option.name
        };
        Ok(Self {
            spec: Rc::new(OptionSpec {
                key,
                name,
                secret: option.secret,
                show_errors: option.show_errors,
                mapper: option.mapper,
                editor,
                get: Rc::new(move |state: &S| get(state).to_value()),
                set: Rc::new(move |state: &mut S, value: DialogValue| {
                    if let Some(value) = T::from_value(&value) {
                        set(state, value);
                    }
                }),
            }),
        })
    }

    pub fn key(&self) -> &Key {
        &self.spec.key
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn is_secret(&self) -> bool {
        self.spec.secret
    }

    pub fn editor(&self) -> &OptionEditor {
        &self.spec.editor
    }

    /// Binding in the member's own type, before any mapper.
    pub fn binding(&self, state: &StateHandle<S>) -> ValueBinding {
        let (reader, writer) = (state.clone(), state.clone());
        let (get, set) = (self.spec.get.clone(), self.spec.set.clone());
        ValueBinding::new(
            move || get(&*reader.borrow()),
            move |value| set(&mut *writer.borrow_mut(), value),
        )
    }
}

impl<S: DialogState> EntryDefinition<S> for OptionDefinition<S> {
    fn create(
        &self,
        surface: &mut dyn WidgetSurface,
        ctx: &CreateContext<S>,
    ) -> Result<Option<ElementId>> {
        let spec = &self.spec;
        let config = &ctx.config;
        let owner_name = type_name::<S>();

        // Constructed even when only the secret trigger is shown.
        let (mapper, generator) = {
            let owner = ctx.state.borrow();
            let mapper = match &spec.mapper {
                Some(mapper) => Some(mapper.instantiate(&*owner, owner_name)?),
                None => None,
            };
            (mapper, spec.editor.instantiate(&*owner, owner_name)?)
        };
        let mut binding = self.binding(&ctx.state);
        if let Some(mapper) = mapper {
            binding = map_binding(mapper, binding);
        }

        let on_change: Handler = {
            let hook = ctx.on_input.clone();
            let key = spec.key.clone();
            Rc::new(move |surface| {
                hook(surface, Some(&key));
            })
        };

        let root = surface.vertical_layout(config.spacing / 2.0);
        surface.push_style();
        let style = surface.style_mut();
        style.min_height = Some(config.line_height);
        style.preferred_height = Some(config.line_height);
        let row = surface.horizontal_layout(config.spacing);
        surface.text(&spec.name);

        let reset = if spec.secret && !ctx.in_userspace {
            secret::trigger(surface, ctx, self.clone())
        } else {
            let editor_ctx = EditorContext {
                label: &spec.name,
                secret: spec.secret,
                config,
                on_change,
            };
            let reset = generator.generate_value(surface, &editor_ctx, binding);
            if spec.secret {
                for input in surface.text_inputs_in(row) {
                    surface.set_mask(input, &config.mask_pattern);
                }
            }
            reset
        };
        surface.nest_out();
        surface.pop_style();

        let error_text = spec.show_errors.then(|| {
            surface.push_style();
            let style = surface.style_mut();
            style.min_height = Some(config.error_height);
            style.text_color = TextColor::Error;
            let text = surface.text("");
            surface.pop_style();
            text
        });
        surface.nest_out();

        let id = ctx
            .tree
            .borrow_mut()
            .insert_option(spec.key.clone(), root, error_text, reset);
        Ok(Some(id))
    }

    fn describe(&self) -> String {
        format!("option `{}`", self.spec.key)
    }
}
