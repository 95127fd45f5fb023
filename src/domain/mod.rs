mod descriptor;
mod enums;
mod value;

pub use descriptor::{
    EnumDescriptor, FieldDescriptor, ObjectRef, Reflect, StructDescriptor, TypeDescriptor,
    TypeTag, ValueKind,
};
pub use enums::DialogEnum;
pub use value::{DialogValue, ErrorMap, ErrorReport, Key, KeySet, key_set};
