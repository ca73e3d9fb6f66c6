//! Hooks which rewrite a scope after its modules are applied.

use std::any;
use std::error::Error;

use crate::container::registry::ScopeEditor;

/// A hook run against every scope built after it is registered.
///
/// Once a scope's modules are applied, the extensions registered by the
/// scope and all of its ancestors run against it, ancestors first and each
/// in registration order. An extension therefore runs again for every
/// descendant scope.
pub trait Extension: Send + Sync + 'static {
    /// Inspects and rewrites the scope through `editor`.
    fn extend(&self, editor: &mut ScopeEditor<'_>) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn name(&self) -> &'static str {
        any::type_name::<Self>()
    }
}

pub struct FnExtension<F> {
    extend: F,
}

impl<F> Extension for FnExtension<F>
where
    F: Fn(&mut ScopeEditor<'_>) -> Result<(), Box<dyn Error + Send + Sync>> + Send + Sync + 'static,
{
    fn extend(&self, editor: &mut ScopeEditor<'_>) -> Result<(), Box<dyn Error + Send + Sync>> {
        (self.extend)(editor)
    }
}

/// Creates an extension from a closure.
///
/// # Examples
///
/// ```rust
/// # use bindery::prelude::*;
/// let app = module::from_fn(|binder| {
///     binder.bind("debug").to_instance(false);
///     binder.extension(extension::from_fn(|editor| {
///         editor.replace("debug", instance(true));
///         Ok(())
///     }));
///     Ok(())
/// });
/// let container = Container::init(app).unwrap();
/// assert!(*container.get::<bool>("debug").unwrap());
/// ```
pub fn from_fn<F>(extend: F) -> FnExtension<F>
where
    F: Fn(&mut ScopeEditor<'_>) -> Result<(), Box<dyn Error + Send + Sync>> + Send + Sync + 'static,
{
    FnExtension { extend }
}
