//! Cached component and method directory.

use remote_shell_core::{ComponentInfo, MethodInfo, Transport, TransportError};

use crate::SessionError;

/// Which cached list to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Components,
    Methods,
}

/// How a filter argument matches names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Prefix,
    Substring,
}

impl MatchMode {
    fn matches(self, name: &str, needle: &str) -> bool {
        match self {
            Self::Prefix => name.starts_with(needle),
            Self::Substring => name.contains(needle),
        }
    }
}

/// Last-fetched component list plus the methods of the selected component.
#[derive(Debug, Clone, Default)]
pub struct DirectoryCache {
    components: Vec<ComponentInfo>,
    current: Option<String>,
    methods: Vec<MethodInfo>,
}

impl DirectoryCache {
    /// Fetch a fresh directory with no component selected.
    ///
    /// # Errors
    /// Returns error if the transport fails.
    pub async fn fetch<T>(transport: &T, prefix: Option<&str>) -> Result<Self, TransportError>
    where
        T: Transport + ?Sized,
    {
        let components = transport.list_components(prefix).await?;
        tracing::debug!(count = components.len(), ?prefix, "Fetched component directory");
        Ok(Self {
            components,
            current: None,
            methods: Vec::new(),
        })
    }

    /// Replace the component list.
    ///
    /// The cache is untouched until the fetch succeeds. The selection survives
    /// if the component is still listed; otherwise it is cleared.
    ///
    /// # Errors
    /// Returns error if the transport fails.
    pub async fn refresh<T>(&mut self, transport: &T, prefix: Option<&str>) -> Result<(), TransportError>
    where
        T: Transport + ?Sized,
    {
        let components = transport.list_components(prefix).await?;
        let keep = self
            .current
            .as_deref()
            .is_some_and(|current| components.iter().any(|c| c.name == current));
        self.components = components;
        if !keep {
            self.clear_selection();
        }
        Ok(())
    }

    /// Select a component, or clear the selection with `None`.
    ///
    /// # Errors
    /// Returns `UnknownComponent` if `component` is not in the cached list, or a
    /// transport error if its methods cannot be fetched. The cache is unchanged
    /// on error.
    pub async fn select<T>(&mut self, transport: &T, component: Option<&str>) -> Result<(), SessionError>
    where
        T: Transport + ?Sized,
    {
        let Some(component) = component else {
            self.clear_selection();
            return Ok(());
        };
        if !self.components.iter().any(|c| c.name == component) {
            return Err(SessionError::UnknownComponent(component.to_owned()));
        }
        let methods = transport.list_methods(component).await?;
        tracing::debug!(component, count = methods.len(), "Selected component");
        self.current = Some(component.to_owned());
        self.methods = methods;
        Ok(())
    }

    fn clear_selection(&mut self) {
        self.current = None;
        self.methods.clear();
    }

    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    #[must_use]
    pub fn components(&self) -> &[ComponentInfo] {
        &self.components
    }

    #[must_use]
    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    /// Components matching `needle`, in fetch order. `None` matches everything.
    #[must_use]
    pub fn filter_components(&self, needle: Option<&str>, mode: MatchMode) -> Vec<&ComponentInfo> {
        self.components
            .iter()
            .filter(|c| needle.is_none_or(|n| mode.matches(&c.name, n)))
            .collect()
    }

    /// Methods matching `needle`, in fetch order. `None` matches everything.
    #[must_use]
    pub fn filter_methods(&self, needle: Option<&str>, mode: MatchMode) -> Vec<&MethodInfo> {
        self.methods
            .iter()
            .filter(|m| needle.is_none_or(|n| mode.matches(&m.name, n)))
            .collect()
    }

    /// Matching names of either list.
    #[must_use]
    pub fn filter(&self, kind: ListKind, needle: Option<&str>, mode: MatchMode) -> Vec<String> {
        match kind {
            ListKind::Components => self
                .filter_components(needle, mode)
                .into_iter()
                .map(|c| c.name.clone())
                .collect(),
            ListKind::Methods => self
                .filter_methods(needle, mode)
                .into_iter()
                .map(|m| m.name.clone())
                .collect(),
        }
    }
}
