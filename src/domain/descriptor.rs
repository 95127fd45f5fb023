use std::any::type_name;

use indexmap::IndexMap;
use serde::Serialize;

use super::value::DialogValue;

/// Primitive shapes handed to the host's generic value editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Bool,
    Integer,
    Unsigned,
    Float,
    Text,
    List,
}

impl ValueKind {
    /// Edited through a text field on the host, so it can be masked.
    pub fn is_text_input(self) -> bool {
        matches!(
            self,
            ValueKind::Integer | ValueKind::Unsigned | ValueKind::Float | ValueKind::Text
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDescriptor {
    pub type_name: &'static str,
    /// Named values in declaration order; aliases allowed.
    pub variants: Vec<(String, u64)>,
    pub flags: bool,
}

impl EnumDescriptor {
    /// Distinct underlying values, first occurrence wins.
    pub fn distinct_values(&self) -> Vec<u64> {
        let mut seen = Vec::with_capacity(self.variants.len());
        for (_, value) in &self.variants {
            if !seen.contains(value) {
                seen.push(*value);
            }
        }
        seen
    }

    pub fn name_of(&self, bits: u64) -> Option<&str> {
        self.variants
            .iter()
            .find(|(_, value)| *value == bits)
            .map(|(name, _)| name.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub label: Option<&'static str>,
    pub read_only: bool,
    /// Resolved lazily so self-referential types can be rejected instead of overflowing.
    pub descriptor: fn() -> TypeDescriptor,
    pub default: fn() -> DialogValue,
}

impl FieldDescriptor {
    pub fn of<T: Reflect + Default>(name: &'static str) -> Self {
        Self {
            name,
            label: None,
            read_only: false,
            descriptor: T::descriptor,
            default: || T::default().to_value(),
        }
    }

    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn display_label(&self) -> &'static str {
        self.label.unwrap_or(self.name)
    }
}

#[derive(Debug, Clone)]
pub struct StructDescriptor {
    pub type_name: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Clone)]
pub enum TypeDescriptor {
    Value(ValueKind),
    Enum(EnumDescriptor),
    /// A type-descriptor value, edited with a type picker.
    TypeTag,
    /// An engine object reference, edited with a reference picker.
    Reference { target: &'static str },
    Struct(StructDescriptor),
}

impl TypeDescriptor {
    pub fn label(&self) -> String {
        match self {
            TypeDescriptor::Value(kind) => format!("{kind:?}").to_lowercase(),
            TypeDescriptor::Enum(meta) => meta.type_name.to_string(),
            TypeDescriptor::TypeTag => "type".to_string(),
            TypeDescriptor::Reference { target } => format!("ref<{target}>"),
            TypeDescriptor::Struct(meta) => meta.type_name.to_string(),
        }
    }
}

/// Static schema description plus conversion to and from [`DialogValue`].
///
/// `from_value` returning `None` is a mapping failure; callers drop the write.
pub trait Reflect: Clone + 'static {
    fn descriptor() -> TypeDescriptor;
    fn to_value(&self) -> DialogValue;
    fn from_value(value: &DialogValue) -> Option<Self>;
}

impl Reflect for bool {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Value(ValueKind::Bool)
    }

    fn to_value(&self) -> DialogValue {
        DialogValue::Bool(*self)
    }

    fn from_value(value: &DialogValue) -> Option<Self> {
        match value {
            DialogValue::Bool(flag) => Some(*flag),
            _ => None,
        }
    }
}

impl Reflect for String {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Value(ValueKind::Text)
    }

    fn to_value(&self) -> DialogValue {
        DialogValue::Text(self.clone())
    }

    fn from_value(value: &DialogValue) -> Option<Self> {
        value.as_text().map(str::to_string)
    }
}

macro_rules! reflect_signed {
    ($($ty:ty),*) => {
        $(
            impl Reflect for $ty {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::Value(ValueKind::Integer)
                }

                fn to_value(&self) -> DialogValue {
                    DialogValue::Int(i64::from(*self))
                }

                fn from_value(value: &DialogValue) -> Option<Self> {
                    match value {
                        DialogValue::Int(raw) => <$ty>::try_from(*raw).ok(),
                        DialogValue::UInt(raw) => <$ty>::try_from(*raw).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

macro_rules! reflect_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Reflect for $ty {
                fn descriptor() -> TypeDescriptor {
                    TypeDescriptor::Value(ValueKind::Unsigned)
                }

                fn to_value(&self) -> DialogValue {
                    DialogValue::UInt(u64::from(*self))
                }

                fn from_value(value: &DialogValue) -> Option<Self> {
                    match value {
                        DialogValue::UInt(raw) => <$ty>::try_from(*raw).ok(),
                        DialogValue::Int(raw) => <$ty>::try_from(*raw).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

reflect_signed!(i8, i16, i32, i64);
reflect_unsigned!(u8, u16, u32, u64);

impl Reflect for f32 {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Value(ValueKind::Float)
    }

    fn to_value(&self) -> DialogValue {
        DialogValue::Float(f64::from(*self))
    }

    fn from_value(value: &DialogValue) -> Option<Self> {
        f64::from_value(value).map(|raw| raw as f32)
    }
}

impl Reflect for f64 {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Value(ValueKind::Float)
    }

    fn to_value(&self) -> DialogValue {
        DialogValue::Float(*self)
    }

    fn from_value(value: &DialogValue) -> Option<Self> {
        match value {
            DialogValue::Float(raw) => Some(*raw),
            DialogValue::Int(raw) => Some(*raw as f64),
            DialogValue::UInt(raw) => Some(*raw as f64),
            _ => None,
        }
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Value(ValueKind::List)
    }

    fn to_value(&self) -> DialogValue {
        DialogValue::List(self.iter().map(Reflect::to_value).collect())
    }

    fn from_value(value: &DialogValue) -> Option<Self> {
        match value {
            DialogValue::List(items) => items.iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

/// Names a type; edited with the type picker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TypeTag(pub Option<String>);

impl TypeTag {
    pub fn of<T: ?Sized>() -> Self {
        Self(Some(type_name::<T>().to_string()))
    }
}

impl Reflect for TypeTag {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::TypeTag
    }

    fn to_value(&self) -> DialogValue {
        DialogValue::Type(self.0.clone())
    }

    fn from_value(value: &DialogValue) -> Option<Self> {
        match value {
            DialogValue::Type(name) => Some(Self(name.clone())),
            _ => None,
        }
    }
}

/// Handle to an object owned by the host engine; `None` is the null reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ObjectRef(pub Option<u64>);

impl Reflect for ObjectRef {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::Reference { target: "object" }
    }

    fn to_value(&self) -> DialogValue {
        DialogValue::Reference(self.0)
    }

    fn from_value(value: &DialogValue) -> Option<Self> {
        match value {
            DialogValue::Reference(target) => Some(Self(*target)),
            _ => None,
        }
    }
}

macro_rules! reflect_tuple {
    ($name:literal; $($ty:ident => $idx:tt),+) => {
        impl<$($ty: Reflect + Default),+> Reflect for ($($ty,)+) {
            fn descriptor() -> TypeDescriptor {
                TypeDescriptor::Struct(StructDescriptor {
                    type_name: $name,
                    fields: vec![$(FieldDescriptor::of::<$ty>(stringify!($idx))),+],
                })
            }

            fn to_value(&self) -> DialogValue {
                let mut fields = IndexMap::new();
                $(fields.insert(stringify!($idx).to_string(), self.$idx.to_value());)+
                DialogValue::Struct(fields)
            }

            fn from_value(value: &DialogValue) -> Option<Self> {
                Some(($($ty::from_value(value.field(stringify!($idx))?)?,)+))
            }
        }
    };
}

reflect_tuple!("pair"; A => 0, B => 1);
reflect_tuple!("triple"; A => 0, B => 1, C => 2);

/// Implements [`Reflect`] for a struct whose fields all implement
/// `Reflect + Default`, describing the fields in the listed order.
#[macro_export]
macro_rules! reflect_struct {
    ($name:ident { $($field:ident : $ty:ty),+ $(,)? }) => {
        impl $crate::domain::Reflect for $name {
            fn descriptor() -> $crate::domain::TypeDescriptor {
                $crate::domain::TypeDescriptor::Struct($crate::domain::StructDescriptor {
                    type_name: stringify!($name),
                    fields: vec![$($crate::domain::FieldDescriptor::of::<$ty>(stringify!($field))),+],
                })
            }

            fn to_value(&self) -> $crate::domain::DialogValue {
                let mut fields = $crate::indexmap::IndexMap::new();
                $(fields.insert(
                    stringify!($field).to_string(),
                    $crate::domain::Reflect::to_value(&self.$field),
                );)+
                $crate::domain::DialogValue::Struct(fields)
            }

            fn from_value(value: &$crate::domain::DialogValue) -> Option<Self> {
                Some(Self {
                    $($field: <$ty as $crate::domain::Reflect>::from_value(value.field(stringify!($field))?)?,)+
                })
            }
        }
    };
}
