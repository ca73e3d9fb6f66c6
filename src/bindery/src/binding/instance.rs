use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::binding::Binding;
use crate::container::injector::{CallContext, Injector, InjectorError};
use crate::container::{Managed, Object};

/// A binding that always yields the same value.
pub struct InstanceBinding {
    instance: Object,
}

impl InstanceBinding {
    pub fn new<T>(instance: T) -> Self
    where
        T: Managed,
    {
        Self::from_object(Arc::new(instance))
    }

    pub fn from_object(instance: Object) -> Self {
        Self { instance }
    }
}

impl Binding for InstanceBinding {
    fn provide(
        &self,
        _injector: &dyn Injector,
        _context: &CallContext<'_>,
    ) -> Result<Object, InjectorError> {
        Ok(Arc::clone(&self.instance))
    }
}

impl Debug for InstanceBinding {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("InstanceBinding")
            .field("type", &(*self.instance).type_name())
            .finish()
    }
}
