use crate::binding::{Binding, SharedBinding};
use crate::container::context::MemoToken;
use crate::container::injector::{CallContext, Injector, InjectorError};
use crate::container::Object;

/// A binding whose value is computed at most once per container.
///
/// The value is keyed by a [`MemoToken`] created together with the binding,
/// and stored in the [`Context`] of the container that declares it. Children
/// that inherit the binding share that value, while a child rebinding the
/// name with a new singleton gets its own. Failed computations are not
/// stored.
///
/// [`Context`]: crate::container::context::Context
#[derive(Debug, Clone)]
pub struct SingletonBinding {
    token: MemoToken,
    inner: SharedBinding,
}

impl SingletonBinding {
    pub fn new(inner: SharedBinding) -> Self {
        Self {
            token: MemoToken::new(),
            inner,
        }
    }
}

impl Binding for SingletonBinding {
    fn provide(
        &self,
        injector: &dyn Injector,
        context: &CallContext<'_>,
    ) -> Result<Object, InjectorError> {
        injector
            .context()
            .memoize(&self.token, context, || self.inner.provide(injector, context))
    }

    fn tags(&self) -> Vec<String> {
        self.inner.tags()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::binding::{raw, tagged};
    use crate::container::context::Context;
    use crate::container::injector::MockInjector;

    use super::*;

    fn counting(counter: Arc<AtomicUsize>) -> SharedBinding {
        raw(move |_, _| Ok(counter.fetch_add(1, Ordering::SeqCst))).shared()
    }

    #[test]
    fn singleton_binding_memoizes_per_context() {
        let counter = Arc::new(AtomicUsize::new(0));
        let binding = SingletonBinding::new(counting(Arc::clone(&counter)));
        let call = CallContext::new("counter", &[]);

        let shared = Arc::new(Context::new());
        let mut injector = MockInjector::new();
        injector
            .expect_context()
            .returning(move || Arc::clone(&shared));

        let first = binding.provide(&injector, &call).unwrap();
        let second = binding.provide(&injector, &call).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        let mut other = MockInjector::new();
        other.expect_context().returning(|| Arc::new(Context::new()));
        binding.provide(&other, &call).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn singleton_binding_clones_share_token() {
        let counter = Arc::new(AtomicUsize::new(0));
        let binding = SingletonBinding::new(counting(Arc::clone(&counter)));
        let clone = binding.clone();
        let call = CallContext::new("counter", &[]);

        let shared = Arc::new(Context::new());
        let mut injector = MockInjector::new();
        injector
            .expect_context()
            .returning(move || Arc::clone(&shared));

        binding.provide(&injector, &call).unwrap();
        clone.provide(&injector, &call).unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn singleton_binding_keeps_tags() {
        let inner = tagged(["plugin"], raw(|_, _| Ok(0u8))).shared();
        let binding = SingletonBinding::new(inner);
        assert_eq!(binding.tags(), vec![String::from("plugin")]);
    }
}
