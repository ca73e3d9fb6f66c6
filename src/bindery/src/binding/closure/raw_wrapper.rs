use std::any;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::binding::Binding;
use crate::container::injector::{CallContext, Injector, InjectorError};
use crate::container::{Managed, Object};

/// A binding backed by a closure that resolves dependencies on its own.
pub struct RawClosureBinding<T, C> {
    closure: C,
    _marker: PhantomData<fn() -> T>,
}

impl<T, C> RawClosureBinding<T, C>
where
    T: Managed,
    C: Fn(&dyn Injector, &CallContext<'_>) -> Result<T, InjectorError> + Send + Sync + 'static,
{
    pub fn new(closure: C) -> Self {
        Self {
            closure,
            _marker: PhantomData,
        }
    }
}

impl<T, C> Binding for RawClosureBinding<T, C>
where
    T: Managed,
    C: Fn(&dyn Injector, &CallContext<'_>) -> Result<T, InjectorError> + Send + Sync + 'static,
{
    fn provide(
        &self,
        injector: &dyn Injector,
        context: &CallContext<'_>,
    ) -> Result<Object, InjectorError> {
        let object = (self.closure)(injector, context)?;
        Ok(Arc::new(object))
    }
}

impl<T, C> Debug for RawClosureBinding<T, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RawClosureBinding")
            .field("constructed", &any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::binding::raw;
    use crate::container::injector::{MockInjector, TypedInjector};
    use crate::util::any::DowncastRef;

    use super::*;

    #[test]
    fn raw_closure_binding_resolves_through_injector() {
        let mut injector = MockInjector::new();
        injector
            .expect_dyn_get()
            .withf(|name, _| name == "base")
            .returning(|_, _| Ok(Arc::new(40i32)));

        let binding = raw(|injector, context| {
            let base: Arc<i32> = injector.get("base")?;
            let extra = context.arg::<i32>(0).map_or(0, |v| *v);
            Ok(*base + extra)
        });

        let args: Vec<Object> = vec![Arc::new(2i32)];
        let object = binding
            .provide(&injector, &CallContext::new("answer", &args))
            .unwrap();
        assert_eq!(object.downcast_ref::<i32>(), Some(&42));
    }

    #[test]
    fn raw_closure_binding_passes_errors_through() {
        let mut injector = MockInjector::new();
        injector
            .expect_dyn_get()
            .returning(|name, _| Err(InjectorError::NotFound { name: name.into() }));

        let binding = raw(|injector, _| injector.get::<i32>("missing").map(|v| *v));
        let err = binding
            .provide(&injector, &CallContext::new("answer", &[]))
            .err().unwrap();
        assert!(matches!(err, InjectorError::NotFound { ref name } if name.as_str() == "missing"));
    }
}
