//! Bindings and the combinators that build them.
//!
//! A [`Binding`] computes the value bound to one name. Combinators such as
//! [`singleton`], [`alias`] or [`tagged`] wrap or combine bindings before
//! they are registered through a [`Binder`].
//!
//! [`Binder`]: crate::container::registry::Binder

pub mod alias;
pub mod closure;
pub mod collection;
pub mod instance;
pub mod singleton;
pub mod tagged;

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Debug;
use std::sync::Arc;

use crate::container::injector::{CallContext, Injector, InjectorError};
use crate::container::{Managed, Object};
use crate::name::Name;

use alias::AliasBinding;
use closure::{ClosureBinding, Dependencies, RawClosureBinding};
use collection::{ListBinding, ObjBinding};
use instance::InstanceBinding;
use singleton::SingletonBinding;
use tagged::TaggedBinding;

/// A unit of computation producing the value bound to one name.
///
/// A [`Binding`] receives an [`Injector`] through which it may resolve other
/// names, and the [`CallContext`] of the request, which carries the extra
/// arguments supplied by the caller.
///
/// Plain bindings are invoked on every request. Wrap a binding in
/// [`singleton`] to compute its value once per container.
pub trait Binding: Debug + Send + Sync + 'static {
    /// Produces the value for the request described by `context`.
    ///
    /// # Errors
    ///
    /// Returns an error if a dependency can't be resolved or the value can't
    /// be constructed. Errors of dependencies should be returned unchanged.
    fn provide(
        &self,
        injector: &dyn Injector,
        context: &CallContext<'_>,
    ) -> Result<Object, InjectorError>;

    /// Tags attached to this binding. They are copied onto the provider when
    /// the binding is registered.
    fn tags(&self) -> Vec<String> {
        Vec::new()
    }

    /// Moves the binding behind an [`Arc`] so it can be combined or
    /// registered in several places.
    fn shared(self) -> SharedBinding
    where
        Self: Sized,
    {
        Arc::new(self)
    }
}

/// A type-erased, shareable [`Binding`].
pub type SharedBinding = Arc<dyn Binding>;

/// Binds a fixed value. Every request receives the same [`Object`].
pub fn instance<T>(instance: T) -> InstanceBinding
where
    T: Managed,
{
    InstanceBinding::new(instance)
}

/// Computes the wrapped binding's value once per container and reuses it
/// afterwards.
pub fn singleton<B>(binding: B) -> SingletonBinding
where
    B: Binding,
{
    SingletonBinding::new(Arc::new(binding))
}

/// Forwards to whatever `target` resolves to.
pub fn alias<N>(target: N) -> AliasBinding
where
    N: Into<Name>,
{
    AliasBinding::new(target.into())
}

/// Appends `tags` to the tags of `binding`.
pub fn tagged<B, I, S>(tags: I, binding: B) -> TaggedBinding
where
    B: Binding,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    TaggedBinding::new(tags.into_iter().map(Into::into).collect(), Arc::new(binding))
}

/// Produces a `Vec<Object>` holding the value of every binding, in order.
pub fn list<I>(bindings: I) -> ListBinding
where
    I: IntoIterator<Item = SharedBinding>,
{
    ListBinding::new(bindings.into_iter().collect())
}

/// Produces a `BTreeMap<String, Object>` holding the value of every binding
/// under its key.
pub fn obj<I, K>(bindings: I) -> ObjBinding
where
    I: IntoIterator<Item = (K, SharedBinding)>,
    K: Into<String>,
{
    let fields: BTreeMap<String, SharedBinding> = bindings
        .into_iter()
        .map(|(key, binding)| (key.into(), binding))
        .collect();
    ObjBinding::new(fields)
}

/// Binds a closure which resolves its own dependencies.
///
/// # Examples
///
/// ```rust
/// # use bindery::prelude::*;
/// let greeting = raw(|injector, context| {
///     let name: std::sync::Arc<String> = injector.get("user")?;
///     Ok(format!("hello {name} from {}", context.name()))
/// });
/// ```
pub fn raw<T, F>(closure: F) -> RawClosureBinding<T, F>
where
    T: Managed,
    F: Fn(&dyn Injector, &CallContext<'_>) -> Result<T, InjectorError> + Send + Sync + 'static,
{
    RawClosureBinding::new(closure)
}

/// Binds a closure whose dependencies are declared by name up front. The
/// dependencies are resolved before the closure runs.
///
/// # Examples
///
/// ```rust
/// # use bindery::prelude::*;
/// let sum = depends_on(["a", "b"], |deps| {
///     let a: std::sync::Arc<i32> = deps.get("a")?;
///     let b: std::sync::Arc<i32> = deps.get("b")?;
///     Ok::<_, InjectorError>(*a + *b)
/// });
/// ```
pub fn depends_on<I, N, T, E, F>(names: I, closure: F) -> ClosureBinding<T, E, F>
where
    I: IntoIterator<Item = N>,
    N: Into<Name>,
    T: Managed,
    E: Into<Box<dyn Error + Send + Sync>>,
    F: Fn(&Dependencies) -> Result<T, E> + Send + Sync + 'static,
{
    ClosureBinding::new(names.into_iter().map(Into::into).collect(), closure)
}
