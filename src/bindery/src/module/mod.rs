//! Modules group the bindings of a scope.
//!
//! A [`Module`] registers bindings and extensions into a [`Binder`]. Modules
//! compose with [`Configuration`], and [`override_modules`] rebinds names of
//! a base configuration.

pub mod dsl;
pub mod extension;
mod overriding;

use std::any;
use std::error::Error;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::container::registry::Binder;

pub use dsl::NameBinding;
pub use extension::Extension;
pub use overriding::{override_modules, Overridden, Override};

pub trait Module: Send + Sync + 'static {
    fn setup(&self, binder: &mut dyn Binder) {
        if let Err(err) = self.configure(binder) {
            binder.report_module_error(self.name(), err);
        }
    }

    fn configure(&self, binder: &mut dyn Binder) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// A label used in error reports.
    fn name(&self) -> &'static str {
        any::type_name::<Self>()
    }
}

/// An ordered group of modules, applied in insertion order.
#[derive(Default)]
pub struct Configuration {
    modules: Vec<Arc<dyn Module>>,
}

impl Configuration {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with<M: Module>(mut self, module: M) -> Self {
        self.modules.push(Arc::new(module));
        self
    }

    pub fn compose(mut self, mut other: Configuration) -> Self {
        self.modules.append(&mut other.modules);
        self
    }

    pub fn modules(&self) -> &[Arc<dyn Module>] {
        &self.modules
    }
}

impl Module for Configuration {
    fn configure(&self, binder: &mut dyn Binder) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.modules
            .iter()
            .for_each(|module| module.setup(binder));
        Ok(())
    }
}

impl Debug for Configuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_list()
            .entries(self.modules.iter().map(|module| module.name()))
            .finish()
    }
}

/// A module backed by a closure.
pub struct FnModule<F> {
    configure: F,
}

impl<F> Module for FnModule<F>
where
    F: Fn(&mut dyn Binder) -> Result<(), Box<dyn Error + Send + Sync>> + Send + Sync + 'static,
{
    fn configure(&self, binder: &mut dyn Binder) -> Result<(), Box<dyn Error + Send + Sync>> {
        (self.configure)(binder)
    }
}

/// Creates a module from a closure.
///
/// # Examples
///
/// ```rust
/// # use bindery::prelude::*;
/// let app = module::from_fn(|binder| {
///     binder.bind("answer").to_instance(42i32);
///     Ok(())
/// });
/// assert!(Container::init(app).is_ok());
/// ```
pub fn from_fn<F>(configure: F) -> FnModule<F>
where
    F: Fn(&mut dyn Binder) -> Result<(), Box<dyn Error + Send + Sync>> + Send + Sync + 'static,
{
    FnModule { configure }
}

#[cfg(test)]
mod tests {
    use crate::container::registry::{BinderImpl, TypedBinder};
    use crate::container::settings::Shadowing;

    use super::*;

    struct Failing;

    impl Module for Failing {
        fn configure(&self, _binder: &mut dyn Binder) -> Result<(), Box<dyn Error + Send + Sync>> {
            Err("not configured".into())
        }
    }

    #[test]
    fn configuration_setup_applies_modules_in_order() {
        let configuration = Configuration::new()
            .with(from_fn(|binder| {
                binder.bind("a").to_instance(1i32);
                Ok(())
            }))
            .compose(Configuration::new().with(from_fn(|binder| {
                binder.bind("a").to_instance(2i32);
                binder.bind("b").to_instance(3i32);
                Ok(())
            })));
        assert_eq!(configuration.modules().len(), 2);

        let mut binder = BinderImpl::new(None, Shadowing::Allow);
        configuration.setup(&mut binder);

        let errs = binder.finish().err().unwrap();
        assert_eq!(errs.len(), 1);
    }

    #[test]
    fn module_setup_reports_errors_with_module_name() {
        let mut binder = BinderImpl::new(None, Shadowing::Allow);
        Configuration::new().with(Failing).setup(&mut binder);

        let errs = binder.finish().err().unwrap();
        assert!(errs[0].to_string().contains("Failing"));
    }
}
