#![allow(clippy::new_without_default)]

pub mod binding;
pub mod container;
pub mod module;
pub mod name;
pub mod util;

pub mod prelude {
    pub use crate::binding::{
        alias, depends_on, instance, list, obj, raw, singleton, tagged, Binding, SharedBinding,
    };
    pub use crate::container::injector::{CallContext, Injector, InjectorError, TypedInjector};
    pub use crate::container::registry::{Binder, RegistryError, ScopeEditor, TypedBinder};
    pub use crate::container::{Container, Managed, Object, Settings, Shadowing};
    pub use crate::module::{
        self, extension, override_modules, Configuration, Extension, Module,
    };
    pub use crate::name::Name;
    pub use crate::util::any::{Downcast, DowncastRef};
}
