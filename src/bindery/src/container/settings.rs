/// Whether a child container may rebind a name its ancestors already bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shadowing {
    /// Child bindings shadow inherited ones.
    #[default]
    Allow,
    /// Rebinding any name visible from the parent is a construction error.
    Forbid,
}

/// Construction and resolution settings of a container.
///
/// Settings are fixed when a root container is created and inherited by
/// every container derived from it.
///
/// # Examples
///
/// ```rust
/// # use bindery::container::{Settings, Shadowing};
/// let settings = Settings::new()
///     .with_shadowing(Shadowing::Forbid)
///     .with_max_depth(64);
/// assert_eq!(settings.max_depth(), Some(64));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    shadowing: Shadowing,
    max_depth: Option<usize>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shadowing(mut self, shadowing: Shadowing) -> Self {
        self.shadowing = shadowing;
        self
    }

    /// Limits how deeply resolutions may nest before failing with
    /// [`InjectorError::DepthExceeded`].
    ///
    /// [`InjectorError::DepthExceeded`]: crate::container::injector::InjectorError::DepthExceeded
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn without_max_depth(mut self) -> Self {
        self.max_depth = None;
        self
    }

    pub fn shadowing(&self) -> Shadowing {
        self.shadowing
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_default_allows_shadowing_without_depth_limit() {
        let settings = Settings::default();
        assert_eq!(settings.shadowing(), Shadowing::Allow);
        assert_eq!(settings.max_depth(), None);
    }

    #[test]
    fn settings_builder_succeeds() {
        let settings = Settings::new()
            .with_shadowing(Shadowing::Forbid)
            .with_max_depth(8);
        assert_eq!(settings.shadowing(), Shadowing::Forbid);
        assert_eq!(settings.max_depth(), Some(8));
        assert_eq!(settings.without_max_depth().max_depth(), None);
    }
}
