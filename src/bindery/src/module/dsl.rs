use std::error::Error;
use std::sync::Arc;

use crate::binding::closure::{ClosureBinding, Dependencies, RawClosureBinding};
use crate::binding::instance::InstanceBinding;
use crate::binding::{Binding, SharedBinding};
use crate::container::injector::{CallContext, Injector, InjectorError};
use crate::container::provider::Provider;
use crate::container::registry::{BinderPrivate, ProviderEntry};
use crate::container::Managed;
use crate::name::Name;

/// The pending registration of one name, returned by [`TypedBinder::bind`].
///
/// Nothing is registered until one of the `to*` methods is called.
///
/// [`TypedBinder::bind`]: crate::container::registry::TypedBinder::bind
#[must_use = "a name is only bound once a `to*` method is called"]
pub struct NameBinding<'a> {
    binder: &'a mut dyn BinderPrivate,
    name: Name,
}

impl<'a> NameBinding<'a> {
    pub(crate) fn new(binder: &'a mut dyn BinderPrivate, name: Name) -> Self {
        Self { binder, name }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn to<B>(self, binding: B)
    where
        B: Binding,
    {
        self.to_shared(Arc::new(binding));
    }

    pub fn to_shared(self, binding: SharedBinding) {
        let entry = ProviderEntry::provider(Provider::new(binding));
        self.binder.dyn_register(self.name, entry);
    }

    pub fn to_instance<T>(self, instance: T)
    where
        T: Managed,
    {
        self.to(InstanceBinding::new(instance));
    }

    /// Registers an alias entry. The target is looked up in the scope being
    /// queried, so a child that rebinds the target changes what the alias
    /// yields there.
    pub fn to_alias<N>(self, target: N)
    where
        N: Into<Name>,
    {
        self.binder
            .dyn_register(self.name, ProviderEntry::alias(target.into()));
    }

    pub fn to_closure<T, C>(self, closure: C)
    where
        T: Managed,
        C: Fn(&dyn Injector, &CallContext<'_>) -> Result<T, InjectorError> + Send + Sync + 'static,
    {
        self.to(RawClosureBinding::new(closure));
    }

    pub fn to_depends_on<I, N, T, E, C>(self, dependencies: I, closure: C)
    where
        I: IntoIterator<Item = N>,
        N: Into<Name>,
        T: Managed,
        E: Into<Box<dyn Error + Send + Sync>> + 'static,
        C: Fn(&Dependencies) -> Result<T, E> + Send + Sync + 'static,
    {
        let dependencies = dependencies.into_iter().map(Into::into).collect();
        self.to(ClosureBinding::new(dependencies, closure));
    }
}

#[cfg(test)]
mod tests {
    use crate::binding::singleton;
    use crate::container::injector::TypedInjector;
    use crate::container::registry::{BinderImpl, TypedBinder};
    use crate::container::settings::Shadowing;

    use super::*;

    #[test]
    fn name_binding_registers_every_kind() {
        let mut binder = BinderImpl::new(None, Shadowing::Allow);
        binder.bind("instance").to_instance(1i32);
        binder.bind("shared").to_shared(singleton(InstanceBinding::new(2i32)).shared());
        binder.bind("alias").to_alias("instance");
        binder
            .bind("closure")
            .to_closure(|injector, _| injector.get::<i32>("instance").map(|v| *v + 1));
        binder
            .bind("depends")
            .to_depends_on(["instance"], |deps| deps.get::<i32>("instance").map(|v| *v));

        let (providers, _) = binder.finish().unwrap();
        assert_eq!(providers.len(), 5);
        assert!(matches!(providers.get("alias"), Some(ProviderEntry::Alias(_))));
        assert!(matches!(providers.get("closure"), Some(ProviderEntry::Provider(_))));
    }
}
