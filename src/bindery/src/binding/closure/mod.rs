//! Bindings backed by user closures.

mod dependencies;
mod raw_wrapper;
mod wrapper;

pub use dependencies::Dependencies;
pub use raw_wrapper::RawClosureBinding;
pub use wrapper::ClosureBinding;
