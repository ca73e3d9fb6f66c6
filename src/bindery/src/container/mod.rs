pub mod context;
pub mod injector;
pub mod registry;
pub mod settings;

mod core;
mod handle;
pub(crate) mod provider;

use std::sync::Arc;

use crate::util::any::AsAny;

pub use handle::Container;
pub use settings::{Settings, Shadowing};

/// Any value a container can hand out.
pub trait Managed: AsAny + Send + Sync + 'static {}

impl<T> Managed for T where T: AsAny + Send + Sync + 'static {}

/// A type-erased, shareable value produced by a binding.
pub type Object = Arc<dyn Managed>;
