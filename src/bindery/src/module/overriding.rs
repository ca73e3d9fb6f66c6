use std::collections::HashSet;
use std::error::Error;
use std::sync::Arc;

use tracing::trace;

use crate::container::registry::{Binder, BinderPrivate, ProviderEntry};
use crate::module::{Extension, Module};
use crate::name::Name;

/// Starts an override of `base`. Call [`Override::with`] to supply the
/// modules whose bindings win.
///
/// # Examples
///
/// ```rust
/// # use bindery::prelude::*;
/// let base = module::from_fn(|binder| {
///     binder.bind("db").to_instance("postgres");
///     binder.bind("port").to_instance(5432u16);
///     Ok(())
/// });
/// let test = module::from_fn(|binder| {
///     binder.bind("db").to_instance("sqlite");
///     Ok(())
/// });
///
/// let container = Container::init(override_modules(base).with(test)).unwrap();
/// assert_eq!(*container.get::<&str>("db").unwrap(), "sqlite");
/// assert_eq!(*container.get::<u16>("port").unwrap(), 5432);
/// ```
pub fn override_modules<M>(base: M) -> Override
where
    M: Module,
{
    Override {
        base: Arc::new(base),
    }
}

pub struct Override {
    base: Arc<dyn Module>,
}

impl Override {
    pub fn with<M>(self, overrides: M) -> Overridden
    where
        M: Module,
    {
        Overridden {
            base: self.base,
            overrides: Arc::new(overrides),
        }
    }
}

/// A module binding everything `overrides` binds, plus whatever `base` binds
/// under other names.
pub struct Overridden {
    base: Arc<dyn Module>,
    overrides: Arc<dyn Module>,
}

impl Module for Overridden {
    fn configure(&self, binder: &mut dyn Binder) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut overridden = HashSet::new();
        self.overrides
            .setup(&mut RecordingBinder::new(binder, &mut overridden));
        self.base
            .setup(&mut FilteringBinder::new(binder, &overridden));
        Ok(())
    }
}

struct RecordingBinder<'a, 'b> {
    inner: &'a mut (dyn Binder + 'b),
    names: &'a mut HashSet<Name>,
}

impl<'a, 'b> RecordingBinder<'a, 'b> {
    fn new(inner: &'a mut (dyn Binder + 'b), names: &'a mut HashSet<Name>) -> Self {
        Self { inner, names }
    }
}

impl Binder for RecordingBinder<'_, '_> {
    #[allow(private_interfaces)]
    fn as_private(&mut self) -> &mut dyn BinderPrivate {
        self
    }

    fn report_module_error(&mut self, module: &'static str, err: Box<dyn Error + Send + Sync>) {
        self.inner.report_module_error(module, err);
    }
}

impl BinderPrivate for RecordingBinder<'_, '_> {
    fn dyn_register(&mut self, name: Name, entry: ProviderEntry) {
        self.names.insert(name.clone());
        self.inner.as_private().dyn_register(name, entry);
    }

    fn dyn_register_extension(&mut self, extension: Arc<dyn Extension>) {
        self.inner.as_private().dyn_register_extension(extension);
    }
}

struct FilteringBinder<'a, 'b> {
    inner: &'a mut (dyn Binder + 'b),
    overridden: &'a HashSet<Name>,
}

impl<'a, 'b> FilteringBinder<'a, 'b> {
    fn new(inner: &'a mut (dyn Binder + 'b), overridden: &'a HashSet<Name>) -> Self {
        Self { inner, overridden }
    }
}

impl Binder for FilteringBinder<'_, '_> {
    #[allow(private_interfaces)]
    fn as_private(&mut self) -> &mut dyn BinderPrivate {
        self
    }

    fn report_module_error(&mut self, module: &'static str, err: Box<dyn Error + Send + Sync>) {
        self.inner.report_module_error(module, err);
    }
}

impl BinderPrivate for FilteringBinder<'_, '_> {
    fn dyn_register(&mut self, name: Name, entry: ProviderEntry) {
        if self.overridden.contains(&name) {
            trace!(target: "bindery", %name, "base binding overridden");
        } else {
            self.inner.as_private().dyn_register(name, entry);
        }
    }

    fn dyn_register_extension(&mut self, extension: Arc<dyn Extension>) {
        self.inner.as_private().dyn_register_extension(extension);
    }
}
