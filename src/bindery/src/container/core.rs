use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::container::context::Context;
use crate::container::injector::{
    CallContext, ContextForwardingInjectorProxy, Injector, InjectorError,
};
use crate::container::registry::{
    BinderImpl, ProviderEntry, ProviderMap, RegistryError, ScopeEditor,
};
use crate::container::settings::Settings;
use crate::container::Object;
use crate::module::{Extension, Module};
use crate::name::Name;

/// One scope of a container tree.
///
/// A scope answers a name from its own entries first and falls back to its
/// parent. An inherited entry is resolved in the scope that declares it, so
/// its dependencies and memoized values are shared by every descendant that
/// does not rebind the name.
pub struct ContainerCore {
    parent: Option<Arc<Self>>,
    providers: ProviderMap,
    context: Arc<Context>,
    modules: Vec<Arc<dyn Module>>,
    extensions: Vec<Arc<dyn Extension>>,
    settings: Settings,
    depth: usize,
}

impl ContainerCore {
    /// Applies `module` to a fresh scope under `parent`, then runs every
    /// extension of the scope and its ancestors, in registration order.
    pub fn build(
        parent: Option<Arc<Self>>,
        settings: Settings,
        module: Arc<dyn Module>,
    ) -> Result<Self, RegistryError> {
        let mut binder = BinderImpl::new(parent.as_deref(), settings.shadowing());
        module.setup(&mut binder);
        let (mut providers, own_extensions) =
            binder.finish().map_err(RegistryError::from_errors)?;

        let (mut modules, mut extensions) = match parent.as_deref() {
            Some(parent) => (parent.modules.clone(), parent.extensions.clone()),
            None => (Vec::new(), Vec::new()),
        };
        modules.push(module);
        extensions.extend(own_extensions);

        let mut errors = Vec::new();
        for extension in &extensions {
            let mut editor = ScopeEditor::new(&mut providers, parent.as_deref(), &modules);
            if let Err(err) = extension.extend(&mut editor) {
                errors.push(RegistryError::ExtensionInner {
                    extension: extension.name(),
                    source: err,
                });
            }
        }
        if !errors.is_empty() {
            return Err(RegistryError::from_errors(errors));
        }

        let depth = parent.as_ref().map_or(0, |parent| parent.depth + 1);
        debug!(
            target: "bindery",
            depth,
            providers = providers.len(),
            extensions = extensions.len(),
            "scope constructed"
        );
        Ok(Self {
            parent,
            providers,
            context: Arc::new(Context::new()),
            modules,
            extensions,
            settings,
            depth,
        })
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Number of enclosing scopes.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Every entry visible from this scope. Entries of inner scopes win.
    pub fn visible_entries(&self) -> BTreeMap<Name, ProviderEntry> {
        let mut visible = self
            .parent
            .as_deref()
            .map(Self::visible_entries)
            .unwrap_or_default();
        self.providers.overlay_onto(&mut visible);
        visible
    }

    /// Finds the entry answering `name` together with the scope declaring it.
    fn lookup(&self, name: &str) -> Option<(&Self, &ProviderEntry)> {
        match self.providers.get(name) {
            Some(ProviderEntry::Removed) => None,
            Some(entry) => Some((self, entry)),
            None => {
                let parent = self.parent.as_deref()?;
                trace!(target: "bindery", name, depth = self.depth, "delegating to parent scope");
                parent.lookup(name)
            }
        }
    }

    fn get_object(&self, context: &CallContext<'_>) -> Result<Object, InjectorError> {
        let name = context.name();
        let trace = context.trace();
        if trace.previous_exist_name(name) {
            let chain = trace.chain();
            debug!(target: "bindery", %chain, "circular dependency detected");
            return Err(InjectorError::CyclicDependency { chain });
        }
        if let Some(limit) = self.settings.max_depth() {
            if trace.depth() > limit {
                return Err(InjectorError::DepthExceeded {
                    name: Name::new(name),
                    limit,
                });
            }
        }

        trace!(target: "bindery", name, depth = trace.depth(), "resolving");
        match self.lookup(name) {
            Some((scope, ProviderEntry::Provider(provider))) => {
                let injector = ContextForwardingInjectorProxy::new(scope, context);
                provider.provide(&injector, context)
            }
            Some((scope, ProviderEntry::Alias(target))) => {
                let context = context.append(target, context.args());
                scope.get_object(&context)
            }
            Some((_, ProviderEntry::Removed)) | None => Err(InjectorError::NotFound {
                name: Name::new(name),
            }),
        }
    }
}

impl Injector for ContainerCore {
    fn dyn_get(&self, name: &str, args: &[Object]) -> Result<Object, InjectorError> {
        let context = CallContext::new(name, args);
        self.get_object(&context)
    }

    fn dyn_get_dependency<'a>(
        &self,
        name: &str,
        args: &[Object],
        context: &'a CallContext<'a>,
    ) -> Result<Object, InjectorError> {
        let context = context.append(name, args);
        self.get_object(&context)
    }

    fn provider_tags(&self, name: &str) -> Result<Vec<String>, InjectorError> {
        self.lookup(name)
            .map(|(_, entry)| entry.tags().to_vec())
            .ok_or_else(|| InjectorError::NotFound {
                name: Name::new(name),
            })
    }

    fn names(&self) -> Vec<Name> {
        self.visible_entries().into_keys().collect()
    }

    fn context(&self) -> Arc<Context> {
        Arc::clone(&self.context)
    }
}

impl Debug for ContainerCore {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ContainerCore")
            .field("depth", &self.depth)
            .field("providers", &self.providers.len())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
