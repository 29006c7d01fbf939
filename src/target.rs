//! Populating caller-defined record shapes instead of generic mappings.
//!
//! A [`RecordTarget`] creates an empty output object and receives each
//! validated field by name. [`target_fn`] adapts a factory closure plus a
//! setter closure.
use std::marker::PhantomData;

use crate::value::TypedValue;

pub trait RecordTarget {
    type Output;

    fn create(&self) -> Self::Output;
    fn set_field(&self, target: &mut Self::Output, name: &str, value: TypedValue);
}

pub struct FnTarget<T, F, S> {
    factory: F,
    setter: S,
    _output: PhantomData<fn() -> T>,
}

pub fn target_fn<T, F, S>(factory: F, setter: S) -> FnTarget<T, F, S>
where
    F: Fn() -> T,
    S: Fn(&mut T, &str, TypedValue),
{
    FnTarget { factory, setter, _output: PhantomData }
}

impl<T, F, S> RecordTarget for FnTarget<T, F, S>
where
    F: Fn() -> T,
    S: Fn(&mut T, &str, TypedValue),
{
    type Output = T;

    fn create(&self) -> T {
        (self.factory)()
    }
    fn set_field(&self, target: &mut T, name: &str, value: TypedValue) {
        (self.setter)(target, name, value)
    }
}
