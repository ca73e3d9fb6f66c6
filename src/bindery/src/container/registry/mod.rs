mod binder;
mod editor;
mod provider_map;

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use snafu::prelude::*;

use crate::module::dsl::NameBinding;
use crate::module::Extension;
use crate::name::Name;

pub(crate) use binder::BinderImpl;
pub use editor::{ProviderInfo, ScopeEditor};
pub(crate) use provider_map::{ProviderEntry, ProviderMap};

/// The sink modules register their bindings into.
///
/// Use the methods of [`TypedBinder`] to register bindings and extensions.
pub trait Binder {
    #[doc(hidden)]
    #[allow(private_interfaces)]
    fn as_private(&mut self) -> &mut dyn BinderPrivate;

    fn report_module_error(&mut self, module: &'static str, err: Box<dyn Error + Send + Sync>);
}

pub(crate) trait BinderPrivate: Binder {
    fn dyn_register(&mut self, name: Name, entry: ProviderEntry);

    fn dyn_register_extension(&mut self, extension: Arc<dyn Extension>);
}

pub trait TypedBinder: Binder {
    /// Starts registering a binding under `name`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use bindery::prelude::*;
    /// let app = module::from_fn(|binder| {
    ///     binder.bind("port").to_instance(8080u16);
    ///     binder.bind("listen").to_alias("port");
    ///     Ok(())
    /// });
    /// let container = Container::init(app).unwrap();
    /// assert_eq!(*container.get::<u16>("listen").unwrap(), 8080);
    /// ```
    fn bind<N>(&mut self, name: N) -> NameBinding<'_>
    where
        N: Into<Name>,
    {
        NameBinding::new(self.as_private(), name.into())
    }

    /// Registers an extension which runs once the scope's modules are applied.
    fn extension<E>(&mut self, extension: E)
    where
        E: Extension,
    {
        self.as_private()
            .dyn_register_extension(Arc::new(extension));
    }
}

impl<T: Binder + ?Sized> TypedBinder for T {}

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum RegistryError {
    #[snafu(display("the name {name} is already bound in this scope"))]
    #[non_exhaustive]
    DuplicateBinding { name: Name },
    #[snafu(display("the name {name} is bound by an enclosing scope and shadowing is forbidden"))]
    #[non_exhaustive]
    ShadowingForbidden { name: Name },
    #[snafu(display("module {module} fails to setup the configuration"))]
    #[non_exhaustive]
    ModuleInner {
        module: &'static str,
        source: Box<dyn Error + Send + Sync>,
    },
    #[snafu(display("extension {extension} fails to update the scope"))]
    #[non_exhaustive]
    ExtensionInner {
        extension: &'static str,
        source: Box<dyn Error + Send + Sync>,
    },
    #[snafu(display("aggregated registry errors:\n{}", AggregatedDisplayer::new(errors)))]
    Aggregated { errors: Vec<RegistryError> },
}

impl RegistryError {
    /// Folds the errors gathered while building a scope. A single error is
    /// returned as is.
    pub(crate) fn from_errors(mut errors: Vec<RegistryError>) -> Self {
        if errors.len() == 1 {
            errors.remove(0)
        } else {
            Self::Aggregated { errors }
        }
    }

    /// Every error folded into this one, in the order they were reported.
    pub fn errors(&self) -> Vec<&RegistryError> {
        match self {
            Self::Aggregated { errors } => errors.iter().collect(),
            other => vec![other],
        }
    }
}

struct AggregatedDisplayer<'a> {
    errors: &'a [RegistryError],
}

impl<'a> AggregatedDisplayer<'a> {
    fn new(errors: &'a [RegistryError]) -> Self {
        Self { errors }
    }
}

impl Display for AggregatedDisplayer<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        for (i, error) in self.errors.iter().enumerate() {
            writeln!(f, "{:4}: {}", i + 1, error)?;
        }
        Ok(())
    }
}
