use crate::binding::SharedBinding;
use crate::container::injector::{CallContext, Injector, InjectorError};
use crate::container::Object;

/// A binding as stored in a scope, with its tags captured at registration.
#[derive(Debug)]
pub(crate) struct Provider {
    binding: SharedBinding,
    tags: Vec<String>,
}

impl Provider {
    pub fn new(binding: SharedBinding) -> Self {
        let tags = binding.tags();
        Self { binding, tags }
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn provide(
        &self,
        injector: &dyn Injector,
        context: &CallContext<'_>,
    ) -> Result<Object, InjectorError> {
        self.binding.provide(injector, context)
    }
}
