use crate::binding::Binding;
use crate::container::injector::{CallContext, Injector, InjectorError};
use crate::container::Object;
use crate::name::Name;

/// A binding that resolves another name and returns its value.
///
/// The lookup happens through the injector of the request, so the target is
/// resolved in the scope being queried, and the arguments of the request are
/// forwarded to it.
#[derive(Debug, Clone)]
pub struct AliasBinding {
    target: Name,
}

impl AliasBinding {
    pub fn new(target: Name) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &Name {
        &self.target
    }
}

impl Binding for AliasBinding {
    fn provide(
        &self,
        injector: &dyn Injector,
        context: &CallContext<'_>,
    ) -> Result<Object, InjectorError> {
        injector.dyn_get(&self.target, context.args())
    }
}
