use std::any::Any;

/// Constructor resolution for mappers and editor generators.
///
/// `with_owner` receives the state object being built; implementations
/// downcast it to the exact type they expect. `empty` is the zero-argument
/// fallback. A type providing neither cannot be used.
pub trait Construct: Sized {
    fn with_owner(_owner: &dyn Any) -> Option<Self> {
        None
    }

    fn empty() -> Option<Self> {
        None
    }
}

pub fn construct<T: Construct>(owner: &dyn Any) -> Option<T> {
    T::with_owner(owner).or_else(T::empty)
}
