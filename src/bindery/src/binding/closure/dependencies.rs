use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::container::injector::{downcast_object, InjectorError};
use crate::container::{Managed, Object};
use crate::name::Name;

/// The resolved dependencies handed to a [`ClosureBinding`].
///
/// [`ClosureBinding`]: super::ClosureBinding
pub struct Dependencies<'a> {
    entries: Vec<(Name, Object)>,
    args: &'a [Object],
}

impl<'a> Dependencies<'a> {
    pub(crate) fn new(entries: Vec<(Name, Object)>, args: &'a [Object]) -> Self {
        Self { entries, args }
    }

    /// Returns the dependency declared as `name`.
    ///
    /// # Errors
    ///
    /// Returns [`InjectorError::NotFound`] if `name` wasn't declared and
    /// [`InjectorError::TypeMismatch`] if its value isn't a `T`.
    pub fn get<T>(&self, name: &str) -> Result<Arc<T>, InjectorError>
    where
        T: Managed,
    {
        let object = self.object(name)?;
        downcast_object(name, object)
    }

    /// Returns the untyped value of the dependency declared as `name`.
    pub fn object(&self, name: &str) -> Result<Object, InjectorError> {
        self.entries
            .iter()
            .find(|(declared, _)| declared.as_str() == name)
            .map(|(_, object)| Arc::clone(object))
            .ok_or_else(|| InjectorError::NotFound {
                name: Name::new(name),
            })
    }

    /// Extra arguments of the request.
    pub fn args(&self) -> &[Object] {
        self.args
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Debug for Dependencies<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_list()
            .entries(self.entries.iter().map(|(name, _)| name))
            .finish()
    }
}
