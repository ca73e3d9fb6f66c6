use crate::binding::{Binding, SharedBinding};
use crate::container::injector::{CallContext, Injector, InjectorError};
use crate::container::Object;

/// A binding which adds tags to another one and otherwise behaves the same.
#[derive(Debug, Clone)]
pub struct TaggedBinding {
    tags: Vec<String>,
    inner: SharedBinding,
}

impl TaggedBinding {
    pub fn new(tags: Vec<String>, inner: SharedBinding) -> Self {
        Self { tags, inner }
    }
}

impl Binding for TaggedBinding {
    fn provide(
        &self,
        injector: &dyn Injector,
        context: &CallContext<'_>,
    ) -> Result<Object, InjectorError> {
        self.inner.provide(injector, context)
    }

    fn tags(&self) -> Vec<String> {
        let mut tags = self.inner.tags();
        tags.extend(self.tags.iter().cloned());
        tags
    }
}
