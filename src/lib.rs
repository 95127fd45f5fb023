#![deny(rust_2018_idioms)]

//! Builds bound, validated widget trees from annotated dialog state objects.
//!
//! A [`DialogState`] declares its options and actions through [`Members`].
//! [`DialogBuilder`] turns that declaration into entry definitions and
//! instantiates them on a [`WidgetSurface`]. The resulting [`Dialog`] keeps
//! widgets and state in sync, routes validation errors to inline labels or the
//! catch-all display, and cascades enablement and visibility through the tree.

pub mod builder;
pub mod config;
pub mod definition;
pub mod dialog;
pub mod domain;
pub mod editor;
pub mod element;
pub mod error;
pub mod mapper;
pub mod surface;

pub use bitflags;
pub use indexmap;

pub use builder::{DialogBuilder, IntoCommand, MemberSet, Members};
pub use config::DialogConfig;
pub use definition::{
    ActionDefinition, DialogAction, DialogOption, EntryDefinition, Field, OptionDefinition,
    ValidationFilter,
};
pub use dialog::{Dialog, DialogId, DialogState, StateHandle};
pub use domain::{
    DialogEnum, DialogValue, ErrorMap, ErrorReport, Key, ObjectRef, Reflect, TypeDescriptor,
    TypeTag,
};
pub use editor::{Binding, EditorContext, EditorGenerator, Reset, ValueBinding};
pub use error::{DialogError, Result};
pub use mapper::{Construct, EnumBitsMapper, ReversibleMapper};
pub use surface::WidgetSurface;

#[cfg(feature = "headless")]
pub use surface::HeadlessSurface;

pub mod prelude {
    pub use super::{
        Construct, Dialog, DialogAction, DialogBuilder, DialogConfig, DialogEnum, DialogOption,
        DialogState, ErrorMap, Key, Members, Reflect, ReversibleMapper, StateHandle,
        WidgetSurface,
    };
    pub use crate::{dialog_enum, dialog_flags, field, reflect_struct};
}
