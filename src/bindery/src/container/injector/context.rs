use std::sync::Arc;

use crate::container::{Managed, Object};
use crate::name::{DependencyChain, Name};
use crate::util::any::Downcast;

/// Everything a binding knows about the request it is answering.
#[derive(Clone)]
pub struct CallContext<'a> {
    trace: InjectionTrace<'a>,
    args: &'a [Object],
}

impl<'a> CallContext<'a> {
    pub fn new(name: &'a str, args: &'a [Object]) -> Self {
        Self {
            trace: InjectionTrace::new(name),
            args,
        }
    }

    pub fn append<'b>(&'b self, name: &'b str, args: &'b [Object]) -> CallContext<'b> {
        CallContext {
            trace: self.trace.append(name),
            args,
        }
    }

    /// The name being resolved.
    pub fn name(&self) -> &str {
        self.trace.name()
    }

    /// Extra positional arguments supplied by the caller, passed through
    /// verbatim.
    pub fn args(&self) -> &[Object] {
        self.args
    }

    /// Returns the argument at `index` if it exists and has type `T`.
    pub fn arg<T>(&self, index: usize) -> Option<Arc<T>>
    where
        T: Managed,
    {
        self.args
            .get(index)
            .and_then(|arg| Arc::clone(arg).downcast::<T>().ok())
    }

    pub fn trace(&self) -> &InjectionTrace<'_> {
        &self.trace
    }
}

/// The chain of names currently being resolved, innermost first.
#[derive(Clone)]
pub struct InjectionTrace<'a> {
    name: &'a str,
    previous: Option<&'a InjectionTrace<'a>>,
}

impl<'a> InjectionTrace<'a> {
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            previous: None,
        }
    }

    pub fn append<'b>(&'b self, name: &'b str) -> InjectionTrace<'b> {
        InjectionTrace {
            name,
            previous: Some(self),
        }
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn previous(&self) -> Option<&InjectionTrace<'a>> {
        self.previous
    }

    pub fn previous_exist_name(&self, name: &str) -> bool {
        let mut this = self;
        while let Some(previous) = this.previous() {
            if previous.name() == name {
                return true;
            }
            this = previous;
        }
        false
    }

    /// Number of enclosing resolutions, zero for a top-level request.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut this = self;
        while let Some(previous) = this.previous() {
            depth += 1;
            this = previous;
        }
        depth
    }

    /// Names from the outermost request down to this one.
    pub fn chain(&self) -> DependencyChain {
        let mut names = vec![Name::new(self.name)];
        let mut this = self;
        while let Some(previous) = this.previous() {
            names.push(Name::new(previous.name()));
            this = previous;
        }
        names.reverse();
        DependencyChain::new(names)
    }
}
