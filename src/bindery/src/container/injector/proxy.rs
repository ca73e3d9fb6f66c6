use std::sync::Arc;

use crate::container::context::Context;
use crate::container::injector::{CallContext, Injector, InjectorError, TypedInjector};
use crate::container::Object;
use crate::name::Name;

/// An [`Injector`] handed to bindings which records every lookup as a
/// dependency of the request being served.
pub struct ContextForwardingInjectorProxy<'a, I>
where
    I: TypedInjector + ?Sized,
{
    inner: &'a I,
    context: &'a CallContext<'a>,
}

impl<'a, I> ContextForwardingInjectorProxy<'a, I>
where
    I: TypedInjector + ?Sized,
{
    pub fn new(inner: &'a I, context: &'a CallContext<'a>) -> Self {
        Self { inner, context }
    }
}

impl<I> Injector for ContextForwardingInjectorProxy<'_, I>
where
    I: TypedInjector + ?Sized,
{
    fn dyn_get(&self, name: &str, args: &[Object]) -> Result<Object, InjectorError> {
        self.dyn_get_dependency(name, args, self.context)
    }

    fn dyn_get_dependency<'a>(
        &self,
        name: &str,
        args: &[Object],
        context: &'a CallContext<'a>,
    ) -> Result<Object, InjectorError> {
        self.inner.dyn_get_dependency(name, args, context)
    }

    fn provider_tags(&self, name: &str) -> Result<Vec<String>, InjectorError> {
        self.inner.provider_tags(name)
    }

    fn names(&self) -> Vec<Name> {
        self.inner.names()
    }

    fn context(&self) -> Arc<Context> {
        self.inner.context()
    }
}
