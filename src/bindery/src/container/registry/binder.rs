use std::error::Error;
use std::sync::Arc;

use tracing::trace;

use crate::container::core::ContainerCore;
use crate::container::registry::{Binder, BinderPrivate, ProviderEntry, ProviderMap, RegistryError};
use crate::container::settings::Shadowing;
use crate::module::Extension;
use crate::name::Name;

/// Collects the bindings of one scope while its modules are applied.
pub(crate) struct BinderImpl<'a> {
    parent: Option<&'a ContainerCore>,
    shadowing: Shadowing,
    providers: ProviderMap,
    extensions: Vec<Arc<dyn Extension>>,
    errors: Vec<RegistryError>,
}

impl<'a> BinderImpl<'a> {
    pub fn new(parent: Option<&'a ContainerCore>, shadowing: Shadowing) -> Self {
        Self {
            parent,
            shadowing,
            providers: ProviderMap::new(),
            extensions: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn finish(self) -> Result<(ProviderMap, Vec<Arc<dyn Extension>>), Vec<RegistryError>> {
        if self.errors.is_empty() {
            Ok((self.providers, self.extensions))
        } else {
            Err(self.errors)
        }
    }

    fn shadows_parent(&self, name: &str) -> bool {
        self.parent.is_some_and(|parent| parent.contains(name))
    }
}

impl Binder for BinderImpl<'_> {
    #[allow(private_interfaces)]
    fn as_private(&mut self) -> &mut dyn BinderPrivate {
        self
    }

    fn report_module_error(&mut self, module: &'static str, err: Box<dyn Error + Send + Sync>) {
        self.errors.push(RegistryError::ModuleInner {
            module,
            source: err,
        });
    }
}

impl BinderPrivate for BinderImpl<'_> {
    fn dyn_register(&mut self, name: Name, entry: ProviderEntry) {
        if self.providers.contains(&name) {
            self.errors.push(RegistryError::DuplicateBinding { name });
        } else if self.shadowing == Shadowing::Forbid && self.shadows_parent(&name) {
            self.errors.push(RegistryError::ShadowingForbidden { name });
        } else {
            trace!(target: "bindery", %name, "binding registered");
            self.providers.insert(name, entry);
        }
    }

    fn dyn_register_extension(&mut self, extension: Arc<dyn Extension>) {
        trace!(target: "bindery", extension = extension.name(), "extension registered");
        self.extensions.push(extension);
    }
}

#[cfg(test)]
mod tests {
    use crate::binding::{instance, Binding};
    use crate::container::provider::Provider;
    use crate::container::registry::TypedBinder;
    use crate::container::settings::Settings;
    use crate::module::{self, extension};

    use super::*;

    fn entry() -> ProviderEntry {
        ProviderEntry::provider(Provider::new(instance(42i32).shared()))
    }

    #[test]
    fn binder_impl_register_succeeds() {
        let mut binder = BinderImpl::new(None, Shadowing::Allow);
        binder.dyn_register(Name::new("a"), entry());
        binder.dyn_register(Name::new("b"), ProviderEntry::alias(Name::new("a")));
        binder.dyn_register_extension(Arc::new(extension::from_fn(|_| Ok(()))));

        let (providers, extensions) = binder.finish().unwrap();
        assert!(providers.get("a").is_some());
        assert!(matches!(providers.get("b"), Some(ProviderEntry::Alias(_))));
        assert_eq!(extensions.len(), 1);
    }

    #[test]
    fn binder_impl_finish_fails_when_name_is_duplicated() {
        let mut binder = BinderImpl::new(None, Shadowing::Allow);
        binder.dyn_register(Name::new("a"), entry());
        binder.dyn_register(Name::new("a"), entry());

        let errs = binder.finish().err().unwrap();
        assert!(matches!(
            errs.first().unwrap(),
            RegistryError::DuplicateBinding { name } if name.as_str() == "a"
        ));
    }

    #[test]
    fn binder_impl_finish_fails_when_shadowing_is_forbidden() {
        let parent = ContainerCore::build(
            None,
            Settings::new(),
            Arc::new(module::from_fn(|binder| {
                binder.bind("a").to_instance(0i32);
                Ok(())
            })),
        )
        .unwrap();

        let mut allowing = BinderImpl::new(Some(&parent), Shadowing::Allow);
        allowing.dyn_register(Name::new("a"), entry());
        assert!(allowing.finish().is_ok());

        let mut forbidding = BinderImpl::new(Some(&parent), Shadowing::Forbid);
        forbidding.dyn_register(Name::new("a"), entry());
        forbidding.dyn_register(Name::new("b"), entry());
        let errs = forbidding.finish().err().unwrap();
        assert_eq!(errs.len(), 1);
        assert!(matches!(errs[0], RegistryError::ShadowingForbidden { .. }));
    }

    #[test]
    fn binder_impl_finish_fails_when_other_error_reported() {
        let mut binder = BinderImpl::new(None, Shadowing::Allow);
        binder.dyn_register(Name::new("a"), entry());
        binder.report_module_error("test", "whatever".into());

        let errs = binder.finish().err().unwrap();
        assert!(matches!(
            errs.first().unwrap(),
            RegistryError::ModuleInner { module: "test", .. }
        ));
    }
}
