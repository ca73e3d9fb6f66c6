use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use tracing::debug;

use crate::container::context::Context;
use crate::container::core::ContainerCore;
use crate::container::injector::{CallContext, Injector, InjectorError};
use crate::container::registry::RegistryError;
use crate::container::settings::Settings;
use crate::container::Object;
use crate::module::Module;
use crate::name::Name;

/// A scope of named bindings.
///
/// A [`Container`] is built from a [`Module`] and answers names through the
/// [`Injector`] and [`TypedInjector`] traits. Children derived from it see
/// every binding of their ancestors unless they rebind the name. An inherited
/// binding is resolved by the ancestor declaring it, so it shares that
/// ancestor's dependencies and memoized values. Cloning a [`Container`] is
/// cheap and the clone refers to the same scope.
///
/// # Examples
///
/// ```rust
/// # use std::sync::Arc;
/// # use bindery::prelude::*;
/// let root = Container::init(module::from_fn(|binder| {
///     binder.bind("greeting").to_instance(String::from("hello"));
///     binder.bind("message").to(depends_on(["greeting", "target"], |deps| {
///         let greeting: Arc<String> = deps.get("greeting")?;
///         let target: Arc<String> = deps.get("target")?;
///         Ok::<_, InjectorError>(format!("{greeting}, {target}"))
///     }));
///     binder.bind("target").to_instance(String::from("world"));
///     Ok(())
/// }))
/// .unwrap();
///
/// let child = root
///     .derive_child(module::from_fn(|binder| {
///         binder.bind("target").to_instance(String::from("child"));
///         binder.bind("shout").to(depends_on(["message", "target"], |deps| {
///             let message: Arc<String> = deps.get("message")?;
///             let target: Arc<String> = deps.get("target")?;
///             Ok::<_, InjectorError>(format!("{message}! (from {target})"))
///         }));
///         Ok(())
///     }))
///     .unwrap();
///
/// assert_eq!(*root.get::<String>("message").unwrap(), "hello, world");
/// assert_eq!(*child.get::<String>("message").unwrap(), "hello, world");
/// assert_eq!(*child.get::<String>("shout").unwrap(), "hello, world! (from child)");
/// assert!(!root.contains("shout"));
/// ```
///
/// [`TypedInjector`]: crate::container::injector::TypedInjector
#[derive(Clone)]
pub struct Container {
    core: Arc<ContainerCore>,
}

impl Container {
    /// Builds a root container with default [`Settings`].
    ///
    /// # Errors
    ///
    /// Returns every error reported while applying `module` and running the
    /// extensions it registers. Several errors are folded into
    /// [`RegistryError::Aggregated`].
    pub fn init<M>(module: M) -> Result<Self, RegistryError>
    where
        M: Module,
    {
        Self::init_with(Settings::default(), module)
    }

    pub fn init_with<M>(settings: Settings, module: M) -> Result<Self, RegistryError>
    where
        M: Module,
    {
        let core = ContainerCore::build(None, settings, Arc::new(module))?;
        Ok(Self::from_core(core))
    }

    /// Builds a child scope of this container. The child inherits the
    /// settings and extensions of this container.
    pub fn derive_child<M>(&self, module: M) -> Result<Self, RegistryError>
    where
        M: Module,
    {
        let core = ContainerCore::build(
            Some(Arc::clone(&self.core)),
            self.core.settings(),
            Arc::new(module),
        )?;
        debug!(target: "bindery", depth = core.depth(), "child container derived");
        Ok(Self::from_core(core))
    }

    pub fn settings(&self) -> Settings {
        self.core.settings()
    }

    /// Number of ancestors of this container.
    pub fn depth(&self) -> usize {
        self.core.depth()
    }

    /// Whether `name` resolves to an entry in this container or an ancestor.
    pub fn contains(&self, name: &str) -> bool {
        self.core.contains(name)
    }

    fn from_core(core: ContainerCore) -> Self {
        Self {
            core: Arc::new(core),
        }
    }
}

impl Injector for Container {
    fn dyn_get(&self, name: &str, args: &[Object]) -> Result<Object, InjectorError> {
        self.core.dyn_get(name, args)
    }

    fn dyn_get_dependency<'a>(
        &self,
        name: &str,
        args: &[Object],
        context: &'a CallContext<'a>,
    ) -> Result<Object, InjectorError> {
        self.core.dyn_get_dependency(name, args, context)
    }

    fn provider_tags(&self, name: &str) -> Result<Vec<String>, InjectorError> {
        self.core.provider_tags(name)
    }

    fn names(&self) -> Vec<Name> {
        self.core.names()
    }

    fn context(&self) -> Arc<Context> {
        self.core.context()
    }
}

impl Debug for Container {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Container")
            .field("core", &self.core)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::thread;

    use parking_lot::Mutex;

    use crate::binding::{depends_on, singleton};
    use crate::container::injector::TypedInjector;
    use crate::container::registry::{Binder, TypedBinder};

    use super::*;

    struct Counter {
        value: Mutex<i32>,
        label: Arc<String>,
    }

    impl Counter {
        fn set(&self, value: i32) {
            *self.value.lock() = value;
        }

        fn get(&self) -> i32 {
            *self.value.lock()
        }
    }

    struct TestModule;

    impl Module for TestModule {
        fn configure(&self, binder: &mut dyn Binder) -> Result<(), Box<dyn Error + Send + Sync>> {
            binder.bind("counter").to(singleton(depends_on(["label"], |deps| {
                Ok::<_, InjectorError>(Counter {
                    value: Mutex::new(0),
                    label: deps.get("label")?,
                })
            })));
            binder.bind("label").to_instance(String::from("test-counter"));
            Ok(())
        }
    }

    #[test]
    fn container_operations_succeeds() {
        let container = Container::init(TestModule).unwrap();

        let counter: Arc<Counter> = container.get("counter").unwrap();
        assert_eq!(counter.get(), 0);
        assert_eq!(counter.label.as_str(), "test-counter");
        counter.set(42);

        let handles = [
            thread::spawn({
                let container = container.clone();
                move || container.get::<Counter>("counter").unwrap().get()
            }),
            thread::spawn({
                let container = container.clone();
                move || container.get::<Counter>("counter").unwrap().get()
            }),
        ];
        for handle in handles {
            assert_eq!(handle.join().expect("Each thread should not `panic!()`"), 42);
        }
        assert_eq!(container.names().len(), 2);
    }

    #[test]
    fn container_derive_child_shares_parent_singletons() {
        let root = Container::init(TestModule).unwrap();
        let child = root
            .derive_child(crate::module::from_fn(|binder| {
                binder.bind("label").to_instance(String::from("child"));
                Ok(())
            }))
            .unwrap();

        let from_child: Arc<Counter> = child.get("counter").unwrap();
        let from_root: Arc<Counter> = root.get("counter").unwrap();
        assert_eq!(from_child.label.as_str(), "test-counter");
        assert!(Arc::ptr_eq(&from_child, &from_root));
        assert_eq!(*child.get::<String>("label").unwrap(), "child");
        assert_eq!(*root.get::<String>("label").unwrap(), "test-counter");
        assert_eq!(child.depth(), 1);
        assert!(child.contains("counter"));
    }
}
