use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use tracing::debug;

use crate::binding::{Binding, SharedBinding};
use crate::container::core::ContainerCore;
use crate::container::provider::Provider;
use crate::container::registry::{ProviderEntry, ProviderMap};
use crate::module::Module;
use crate::name::Name;

/// What an extension sees of one entry of the scope being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
    name: Name,
    tags: Vec<String>,
    alias_of: Option<Name>,
    inherited: bool,
}

impl ProviderInfo {
    fn new(name: Name, entry: &ProviderEntry, inherited: bool) -> Self {
        let alias_of = match entry {
            ProviderEntry::Alias(target) => Some(target.clone()),
            _ => None,
        };
        Self {
            name,
            tags: entry.tags().to_vec(),
            alias_of,
            inherited,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// The target name, if this entry is a registry alias.
    pub fn alias_of(&self) -> Option<&Name> {
        self.alias_of.as_ref()
    }

    /// Whether the entry comes from an enclosing scope.
    pub fn is_inherited(&self) -> bool {
        self.inherited
    }
}

/// The handle extensions use to inspect and rewrite the scope being built.
///
/// Writes only touch the scope being built. Replacing an inherited name
/// shadows it, and removing one hides it from this scope and its descendants
/// while leaving the enclosing scope untouched.
pub struct ScopeEditor<'a> {
    providers: &'a mut ProviderMap,
    parent: Option<&'a ContainerCore>,
    modules: &'a [Arc<dyn Module>],
}

impl<'a> ScopeEditor<'a> {
    pub(crate) fn new(
        providers: &'a mut ProviderMap,
        parent: Option<&'a ContainerCore>,
        modules: &'a [Arc<dyn Module>],
    ) -> Self {
        Self {
            providers,
            parent,
            modules,
        }
    }

    /// Every entry visible from the scope being built, sorted by name.
    pub fn providers(&self) -> Vec<ProviderInfo> {
        let mut visible = self
            .parent
            .map(ContainerCore::visible_entries)
            .unwrap_or_default();
        self.providers.overlay_onto(&mut visible);
        visible
            .into_iter()
            .map(|(name, entry)| {
                let inherited = !self.providers.contains(&name);
                ProviderInfo::new(name, &entry, inherited)
            })
            .collect()
    }

    pub fn provider(&self, name: &str) -> Option<ProviderInfo> {
        match self.providers.get(name) {
            Some(ProviderEntry::Removed) => None,
            Some(entry) => Some(ProviderInfo::new(Name::new(name), entry, false)),
            None => {
                let parent = self.parent?;
                let entry = parent.visible_entries().remove(name)?;
                Some(ProviderInfo::new(Name::new(name), &entry, true))
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.provider(name).is_some()
    }

    /// Modules applied to this scope and its ancestors, outermost first.
    pub fn modules(&self) -> &[Arc<dyn Module>] {
        self.modules
    }

    /// Replaces the provider of `name` in the scope being built, or removes
    /// it when `binding` is `None`.
    pub fn update_provider<N>(&mut self, name: N, binding: Option<SharedBinding>)
    where
        N: Into<Name>,
    {
        let name = name.into();
        let entry = match binding {
            Some(binding) => {
                debug!(target: "bindery", %name, "provider replaced by extension");
                ProviderEntry::provider(Provider::new(binding))
            }
            None => {
                debug!(target: "bindery", %name, "provider removed by extension");
                ProviderEntry::Removed
            }
        };
        self.providers.insert(name, entry);
    }

    pub fn replace<N, B>(&mut self, name: N, binding: B)
    where
        N: Into<Name>,
        B: Binding,
    {
        self.update_provider(name, Some(Arc::new(binding)));
    }

    pub fn remove<N>(&mut self, name: N)
    where
        N: Into<Name>,
    {
        self.update_provider(name, None);
    }
}

impl Debug for ScopeEditor<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ScopeEditor")
            .field("own", &self.providers.len())
            .field("modules", &self.modules.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::binding::{instance, tagged};
    use crate::container::settings::Settings;
    use crate::container::registry::TypedBinder;
    use crate::module;

    use super::*;

    fn parent() -> ContainerCore {
        ContainerCore::build(
            None,
            Settings::new(),
            Arc::new(module::from_fn(|binder| {
                binder.bind("a").to(tagged(["base"], instance(1i32)));
                binder.bind("b").to_instance(2i32);
                Ok(())
            })),
        )
        .unwrap()
    }

    #[test]
    fn scope_editor_lists_merged_view() {
        let parent = parent();
        let mut own = ProviderMap::new();
        own.insert(
            Name::new("c"),
            ProviderEntry::alias(Name::new("a")),
        );
        let mut editor = ScopeEditor::new(&mut own, Some(&parent), &[]);
        editor.remove("b");

        let providers = editor.providers();
        let names: Vec<&str> = providers.iter().map(|p| p.name().as_str()).collect();
        assert_eq!(names, ["a", "c"]);
        assert!(providers[0].is_inherited());
        assert!(providers[0].has_tag("base"));
        assert_eq!(providers[1].alias_of().map(Name::as_str), Some("a"));
        assert!(!providers[1].is_inherited());
        assert!(!editor.contains("b"));
    }

    #[test]
    fn scope_editor_update_provider_shadows_inherited() {
        let parent = parent();
        let mut own = ProviderMap::new();
        let mut editor = ScopeEditor::new(&mut own, Some(&parent), &[]);

        assert!(editor.provider("a").unwrap().is_inherited());
        editor.replace("a", instance(10i32));
        let info = editor.provider("a").unwrap();
        assert!(!info.is_inherited());
        assert!(info.tags().is_empty());

        assert!(parent.contains("a"));
        assert!(matches!(own.get("a"), Some(ProviderEntry::Provider(_))));
    }
}
