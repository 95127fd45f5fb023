//! Reversible conversion between a member's type and the type its editor sees.

mod construct;

use std::any::{Any, TypeId, type_name};
use std::marker::PhantomData;
use std::rc::Rc;

use crate::domain::{DialogEnum, DialogValue, Reflect, TypeDescriptor};
use crate::editor::ValueBinding;
use crate::error::{DialogError, Result};

pub use construct::{Construct, construct};

pub type Getter<T> = Rc<dyn Fn() -> T>;
pub type Setter<T> = Rc<dyn Fn(T)>;

pub trait ReversibleMapper: 'static {
    type Inner: Reflect;
    type Outer: Reflect + Default;

    fn try_map_to_outer(&self, inner: &Self::Inner) -> Option<Self::Outer>;
    fn try_map_to_inner(&self, outer: &Self::Outer) -> Option<Self::Inner>;

    /// Wraps inner accessors into outer ones. Writes that fail to map are
    /// dropped, reads that fail to map yield `Outer::default()`.
    fn apply(
        self: Rc<Self>,
        set_inner: Setter<Self::Inner>,
        get_inner: Getter<Self::Inner>,
    ) -> (Setter<Self::Outer>, Getter<Self::Outer>)
    where
        Self: Sized,
    {
        let writer = self.clone();
        let set_outer: Setter<Self::Outer> = Rc::new(move |outer: Self::Outer| {
            if let Some(inner) = writer.try_map_to_inner(&outer) {
                set_inner(inner);
            }
        });
        let get_outer: Getter<Self::Outer> = Rc::new(move || {
            self.try_map_to_outer(&get_inner()).unwrap_or_default()
        });
        (set_outer, get_outer)
    }
}

/// Object-safe face of [`ReversibleMapper`], working on [`DialogValue`]s.
pub trait ValueMapper {
    fn name(&self) -> &'static str;
    fn outer_default(&self) -> DialogValue;
    fn map_to_outer(&self, inner: &DialogValue) -> Option<DialogValue>;
    fn map_to_inner(&self, outer: &DialogValue) -> Option<DialogValue>;
}

impl<M: ReversibleMapper> ValueMapper for M {
    fn name(&self) -> &'static str {
        type_name::<M>()
    }

    fn outer_default(&self) -> DialogValue {
        M::Outer::default().to_value()
    }

    fn map_to_outer(&self, inner: &DialogValue) -> Option<DialogValue> {
        let inner = M::Inner::from_value(inner)?;
        self.try_map_to_outer(&inner).map(|outer| outer.to_value())
    }

    fn map_to_inner(&self, outer: &DialogValue) -> Option<DialogValue> {
        let outer = M::Outer::from_value(outer)?;
        self.try_map_to_inner(&outer).map(|inner| inner.to_value())
    }
}

pub fn map_binding(mapper: Rc<dyn ValueMapper>, inner: ValueBinding) -> ValueBinding {
    let reader = mapper.clone();
    let (get_inner, set_inner) = inner.into_parts();
    ValueBinding::new(
        move || {
            reader
                .map_to_outer(&get_inner())
                .unwrap_or_else(|| reader.outer_default())
        },
        move |outer| {
            if let Some(value) = mapper.map_to_inner(&outer) {
                set_inner(value);
            }
        },
    )
}

type MapperFactory = fn(&dyn Any) -> Option<Rc<dyn ValueMapper>>;

/// Type-level description of a mapper, attached to an option before any
/// state instance exists.
#[derive(Clone)]
pub struct MapperSpec {
    pub name: &'static str,
    pub inner: TypeId,
    pub inner_name: &'static str,
    pub outer: TypeId,
    pub outer_name: &'static str,
    pub outer_descriptor: fn() -> TypeDescriptor,
    factory: MapperFactory,
}

impl std::fmt::Debug for MapperSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapperSpec")
            .field("name", &self.name)
            .field("inner", &self.inner_name)
            .field("outer", &self.outer_name)
            .finish()
    }
}

impl MapperSpec {
    pub fn of<M: ReversibleMapper + Construct>() -> Self {
        Self {
            name: type_name::<M>(),
            inner: TypeId::of::<M::Inner>(),
            inner_name: type_name::<M::Inner>(),
            outer: TypeId::of::<M::Outer>(),
            outer_name: type_name::<M::Outer>(),
            outer_descriptor: M::Outer::descriptor,
            factory: |owner| construct::<M>(owner).map(|mapper| Rc::new(mapper) as Rc<dyn ValueMapper>),
        }
    }

    pub fn instantiate(&self, owner: &dyn Any, owner_name: &'static str) -> Result<Rc<dyn ValueMapper>> {
        (self.factory)(owner).ok_or(DialogError::MissingConstructor {
            type_name: self.name,
            owner: owner_name,
        })
    }
}

/// Maps an enum to its unsigned representation, for editing it as a number.
pub struct EnumBitsMapper<E>(PhantomData<fn() -> E>);

impl<E> Default for EnumBitsMapper<E> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<E: DialogEnum + Reflect> ReversibleMapper for EnumBitsMapper<E> {
    type Inner = E;
    type Outer = u64;

    fn try_map_to_outer(&self, inner: &E) -> Option<u64> {
        Some(inner.bits())
    }

    fn try_map_to_inner(&self, outer: &u64) -> Option<E> {
        E::from_bits(*outer)
    }
}

impl<E: 'static> Construct for EnumBitsMapper<E> {
    fn empty() -> Option<Self> {
        Some(Self::default())
    }
}
