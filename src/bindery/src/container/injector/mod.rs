mod collect;
mod context;
mod proxy;

use std::any;
use std::error::Error;
use std::sync::Arc;

use snafu::prelude::*;

use crate::container::context::Context;
use crate::container::{Managed, Object};
use crate::name::{DependencyChain, Name};
use crate::util::any::Downcast;

pub use context::{CallContext, InjectionTrace};
pub(crate) use proxy::ContextForwardingInjectorProxy;

/// A resolver of named objects.
///
/// Bindings receive an [`Injector`] to look up their own dependencies. Every
/// lookup made through it is recorded in the current [`CallContext`], which
/// is how circular dependencies are detected.
#[cfg_attr(test, mockall::automock)]
pub trait Injector: Send + Sync {
    /// Resolves `name`, passing `args` to its binding.
    fn dyn_get(&self, name: &str, args: &[Object]) -> Result<Object, InjectorError>;

    /// Resolves `name` as a dependency of the request described by `context`.
    fn dyn_get_dependency<'a>(
        &self,
        name: &str,
        args: &[Object],
        context: &'a CallContext<'a>,
    ) -> Result<Object, InjectorError>;

    /// Returns the tags of the provider that answers `name`. Aliases carry no
    /// tags of their own.
    fn provider_tags(&self, name: &str) -> Result<Vec<String>, InjectorError>;

    /// Returns every name visible from this injector.
    fn names(&self) -> Vec<Name>;

    /// Returns the memoization side-table of the container being resolved.
    fn context(&self) -> Arc<Context>;
}

pub trait TypedInjector: Injector {
    fn get<T>(&self, name: &str) -> Result<Arc<T>, InjectorError>
    where
        T: Managed,
    {
        self.get_with(name, &[])
    }

    fn get_with<T>(&self, name: &str, args: &[Object]) -> Result<Arc<T>, InjectorError>
    where
        T: Managed,
    {
        let object = self.dyn_get(name, args)?;
        downcast_object(name, object)
    }

    /// Resolves every visible name whose provider is tagged with `tag`, in
    /// name order.
    ///
    /// # Errors
    ///
    /// Returns [`InjectorError::EmptyCollection`] if nothing carries `tag`.
    fn collect_tagged<T>(&self, tag: &str) -> Result<Vec<Arc<T>>, InjectorError>
    where
        T: Managed,
    {
        collect::collect_tagged(self, tag)
    }

    fn upcast_dyn(&self) -> &dyn Injector;
}

impl<T> TypedInjector for T
where
    T: Injector,
{
    fn upcast_dyn(&self) -> &dyn Injector {
        self
    }
}

impl TypedInjector for dyn Injector + '_ {
    fn upcast_dyn(&self) -> &dyn Injector {
        self
    }
}

pub(crate) fn downcast_object<T>(name: &str, object: Object) -> Result<Arc<T>, InjectorError>
where
    T: Managed,
{
    object
        .downcast::<T>()
        .map_err(|object| InjectorError::TypeMismatch {
            name: Name::new(name),
            expected: any::type_name::<T>(),
            found: (*object).type_name(),
        })
}

#[derive(Debug, Clone, Snafu)]
#[non_exhaustive]
pub enum InjectorError {
    #[snafu(display("no provider is bound to {name}"))]
    #[non_exhaustive]
    NotFound { name: Name },
    #[snafu(display("circular dependency detected: {chain}"))]
    #[non_exhaustive]
    CyclicDependency { chain: DependencyChain },
    #[snafu(display("the object bound to {name} is a {found}, not a {expected}"))]
    #[non_exhaustive]
    TypeMismatch {
        name: Name,
        expected: &'static str,
        found: &'static str,
    },
    #[snafu(display("resolving {name} nests deeper than the limit of {limit}"))]
    #[non_exhaustive]
    DepthExceeded { name: Name, limit: usize },
    #[snafu(display("could not gather any object tagged {tag}"))]
    #[non_exhaustive]
    EmptyCollection { tag: String },
    #[snafu(display("could not construct the object {name}"))]
    #[non_exhaustive]
    ObjectConstruction {
        name: Name,
        source: Arc<dyn Error + Send + Sync>,
    },
}

impl InjectorError {
    /// Wraps an error raised by a binding while constructing `name`. The
    /// original error stays reachable through [`Error::source`].
    pub fn construction<E>(name: &str, err: E) -> Self
    where
        E: Into<Box<dyn Error + Send + Sync>>,
    {
        Self::ObjectConstruction {
            name: Name::new(name),
            source: Arc::from(err.into()),
        }
    }

    /// The error raised by a binding, if this is a construction failure.
    pub fn construction_source(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        if let Self::ObjectConstruction { source, .. } = self {
            Some(&**source)
        } else {
            None
        }
    }

    /// The names involved in a circular dependency, if this is one.
    pub fn cycle(&self) -> Option<&DependencyChain> {
        if let Self::CyclicDependency { chain } = self {
            Some(chain)
        } else {
            None
        }
    }
}
