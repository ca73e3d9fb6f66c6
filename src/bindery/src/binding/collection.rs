use std::collections::BTreeMap;
use std::sync::Arc;

use crate::binding::{Binding, SharedBinding};
use crate::container::injector::{CallContext, Injector, InjectorError};
use crate::container::Object;

/// Produces a `Vec<Object>` from a list of bindings.
#[derive(Debug, Clone)]
pub struct ListBinding {
    items: Vec<SharedBinding>,
}

impl ListBinding {
    pub fn new(items: Vec<SharedBinding>) -> Self {
        Self { items }
    }
}

impl Binding for ListBinding {
    fn provide(
        &self,
        injector: &dyn Injector,
        context: &CallContext<'_>,
    ) -> Result<Object, InjectorError> {
        let values = self
            .items
            .iter()
            .map(|item| item.provide(injector, context))
            .collect::<Result<Vec<Object>, _>>()?;
        Ok(Arc::new(values))
    }
}

/// Produces a `BTreeMap<String, Object>` from keyed bindings.
#[derive(Debug, Clone)]
pub struct ObjBinding {
    fields: BTreeMap<String, SharedBinding>,
}

impl ObjBinding {
    pub fn new(fields: BTreeMap<String, SharedBinding>) -> Self {
        Self { fields }
    }
}

impl Binding for ObjBinding {
    fn provide(
        &self,
        injector: &dyn Injector,
        context: &CallContext<'_>,
    ) -> Result<Object, InjectorError> {
        let mut values = BTreeMap::new();
        for (key, binding) in &self.fields {
            values.insert(key.clone(), binding.provide(injector, context)?);
        }
        Ok(Arc::new(values))
    }
}
