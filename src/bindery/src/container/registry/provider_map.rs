use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::container::provider::Provider;
use crate::name::Name;

/// The entries registered by one scope.
#[derive(Debug, Default)]
pub(crate) struct ProviderMap {
    providers: HashMap<Name, ProviderEntry>,
}

impl ProviderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: Name, entry: ProviderEntry) -> Option<ProviderEntry> {
        self.providers.insert(name, entry)
    }

    /// Returns the raw entry of this scope, tombstones included.
    pub fn get(&self, name: &str) -> Option<&ProviderEntry> {
        self.providers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Lays the entries of this scope over `visible`, the view inherited from
    /// enclosing scopes. Tombstones hide the inherited entry.
    pub fn overlay_onto(&self, visible: &mut BTreeMap<Name, ProviderEntry>) {
        for (name, entry) in &self.providers {
            match entry {
                ProviderEntry::Removed => {
                    visible.remove(name);
                }
                entry => {
                    visible.insert(name.clone(), entry.clone());
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum ProviderEntry {
    Provider(Arc<Provider>),
    /// Resolves to whatever the target name resolves to in the querying scope.
    Alias(Name),
    /// Hides an entry of an enclosing scope.
    Removed,
}

impl ProviderEntry {
    pub fn provider(provider: Provider) -> Self {
        Self::Provider(Arc::new(provider))
    }

    pub fn alias(target: Name) -> Self {
        Self::Alias(target)
    }

    pub fn tags(&self) -> &[String] {
        match self {
            Self::Provider(provider) => provider.tags(),
            Self::Alias(_) | Self::Removed => &[],
        }
    }
}
