use std::any;
use std::error::Error;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::trace;

use crate::binding::closure::Dependencies;
use crate::binding::Binding;
use crate::container::injector::{CallContext, Injector, InjectorError};
use crate::container::{Managed, Object};
use crate::name::Name;

/// A binding backed by a closure whose dependencies are listed by name.
///
/// Dependencies are resolved in the declared order before the closure runs.
/// Their errors are returned unchanged, and so is an [`InjectorError`] the
/// closure propagates. Any other error returned by the closure is wrapped in
/// [`InjectorError::ObjectConstruction`].
pub struct ClosureBinding<T, E, C> {
    dependencies: Vec<Name>,
    closure: C,
    _marker: PhantomData<fn() -> (T, E)>,
}

impl<T, E, C> ClosureBinding<T, E, C>
where
    T: Managed,
    E: Into<Box<dyn Error + Send + Sync>>,
    C: Fn(&Dependencies) -> Result<T, E> + Send + Sync + 'static,
{
    pub fn new(dependencies: Vec<Name>, closure: C) -> Self {
        Self {
            dependencies,
            closure,
            _marker: PhantomData,
        }
    }

    pub fn dependencies(&self) -> &[Name] {
        &self.dependencies
    }
}

impl<T, E, C> Binding for ClosureBinding<T, E, C>
where
    T: Managed,
    E: Into<Box<dyn Error + Send + Sync>> + 'static,
    C: Fn(&Dependencies) -> Result<T, E> + Send + Sync + 'static,
{
    fn provide(
        &self,
        injector: &dyn Injector,
        context: &CallContext<'_>,
    ) -> Result<Object, InjectorError> {
        let entries = self
            .dependencies
            .iter()
            .map(|name| Ok((name.clone(), injector.dyn_get(name, &[])?)))
            .collect::<Result<Vec<_>, InjectorError>>()?;
        trace!(target: "bindery", name = context.name(), resolved = entries.len(), "dependencies resolved");

        let dependencies = Dependencies::new(entries, context.args());
        let err: Box<dyn Error + Send + Sync> = match (self.closure)(&dependencies) {
            Ok(object) => return Ok(Arc::new(object)),
            Err(err) => err.into(),
        };
        match err.downcast::<InjectorError>() {
            Ok(err) => Err(*err),
            Err(err) => Err(InjectorError::construction(context.name(), err)),
        }
    }
}

impl<T, E, C> Debug for ClosureBinding<T, E, C> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ClosureBinding")
            .field("dependencies", &self.dependencies)
            .field("constructed", &any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::Display;

    use crate::binding::depends_on;
    use crate::container::injector::MockInjector;
    use crate::util::any::DowncastRef;

    use super::*;

    #[derive(Debug)]
    struct Refused;

    impl Display for Refused {
        fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
            write!(f, "refused")
        }
    }

    impl Error for Refused {}

    #[test]
    fn closure_binding_resolves_declared_dependencies() {
        let mut injector = MockInjector::new();
        injector
            .expect_dyn_get()
            .withf(|name, _| name == "a")
            .returning(|_, _| Ok(Arc::new(1i32)));
        injector
            .expect_dyn_get()
            .withf(|name, _| name == "b")
            .returning(|_, _| Ok(Arc::new(2i32)));

        let binding = depends_on(["a", "b"], |deps| {
            let a: Arc<i32> = deps.get("a")?;
            let b: Arc<i32> = deps.get("b")?;
            Ok::<_, InjectorError>(*a + *b)
        });
        let object = binding
            .provide(&injector, &CallContext::new("sum", &[]))
            .unwrap();

        assert_eq!(object.downcast_ref::<i32>(), Some(&3));
        assert_eq!(binding.dependencies().len(), 2);
    }

    #[test]
    fn closure_binding_returns_dependency_errors_unchanged() {
        let mut injector = MockInjector::new();
        injector
            .expect_dyn_get()
            .returning(|name, _| Err(InjectorError::NotFound { name: name.into() }));

        let binding = depends_on(["missing"], |_| Ok::<_, Refused>(0u8));
        let err = binding
            .provide(&injector, &CallContext::new("x", &[]))
            .err().unwrap();

        assert!(matches!(err, InjectorError::NotFound { ref name } if name.as_str() == "missing"));
    }

    #[test]
    fn closure_binding_returns_propagated_injector_errors_unchanged() {
        let mut injector = MockInjector::new();
        injector
            .expect_dyn_get()
            .returning(|_, _| Ok(Arc::new(1i32)));

        let binding = depends_on(["count"], |deps| {
            let count: Arc<String> = deps.get("count")?;
            Ok::<_, InjectorError>(count.len())
        });
        let err = binding
            .provide(&injector, &CallContext::new("length", &[]))
            .err().unwrap();

        assert!(matches!(
            err,
            InjectorError::TypeMismatch { ref name, found: "i32", .. }
                if name.as_str() == "count"
        ));
        assert!(err.construction_source().is_none());
    }

    #[test]
    fn closure_binding_wraps_closure_errors() {
        let injector = MockInjector::new();
        let binding = depends_on(Vec::<Name>::new(), |_| Err::<u8, _>(Refused));

        let err = binding
            .provide(&injector, &CallContext::new("guarded", &[]))
            .err().unwrap();

        assert!(
            matches!(err, InjectorError::ObjectConstruction { ref name, .. } if name.as_str() == "guarded")
        );
        assert!(err
            .construction_source()
            .unwrap()
            .downcast_ref::<Refused>()
            .is_some());
    }
}
