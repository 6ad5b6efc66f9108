//! In-memory named value store.

use std::{collections::HashMap, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of synthesized container names.
pub const TEMP_PREFIX: &str = "TEMP";
/// Name under which every invocation result is stored.
pub const RESULT: &str = "RESULT";
/// Name under which an object built mid-call is stored before use.
pub const ARGUMENT: &str = "ARG";

/// A session-local named value plus its declared remote type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    /// JSON or scalar-literal text.
    pub value: String,
}

/// Container error.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Object [{0}] does not exist")]
    NotFound(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Session container store.
///
/// Unnamed puts receive `TEMP0`, `TEMP1`, ... in strictly increasing order.
#[derive(Debug, Default)]
pub struct ContainerStore {
    containers: HashMap<String, Container>,
    next_temp: u64,
}

impl ContainerStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a container and return the name it was stored under.
    pub fn put(
        &mut self,
        name: Option<&str>,
        type_name: impl Into<String>,
        value: impl Into<String>,
    ) -> String {
        let name = name.map_or_else(|| self.next_temp_name(), ToOwned::to_owned);
        let container = Container {
            name: name.clone(),
            type_name: type_name.into(),
            value: value.into(),
        };
        tracing::debug!(name = %name, type_name = %container.type_name, "Stored container");
        self.containers.insert(name.clone(), container);
        name
    }

    fn next_temp_name(&mut self) -> String {
        loop {
            let candidate = format!("{TEMP_PREFIX}{}", self.next_temp);
            self.next_temp += 1;
            if !self.containers.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Get a container by name.
    ///
    /// # Errors
    /// Returns `NotFound` if no container has that name.
    pub fn get(&self, name: &str) -> Result<&Container, ContainerError> {
        self.containers
            .get(name)
            .ok_or_else(|| ContainerError::NotFound(name.to_owned()))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.containers.contains_key(name)
    }

    /// Container names, sorted.
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.containers.keys().cloned().collect();
        names.sort();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    /// Write a container's value verbatim to `path`.
    ///
    /// # Errors
    /// Returns error if the container is missing or the write fails.
    pub fn persist(&self, name: &str, path: &Path) -> Result<(), ContainerError> {
        let container = self.get(name)?;
        std::fs::write(path, container.value.as_bytes()).map_err(|source| ContainerError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Read a persisted value from `path`.
///
/// Trailing line terminators are dropped; everything else is kept verbatim.
///
/// # Errors
/// Returns error if the file cannot be read.
pub fn read_value(path: &Path) -> Result<String, ContainerError> {
    let text = std::fs::read_to_string(path).map_err(|source| ContainerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text.trim_end_matches(['\r', '\n']).to_owned())
}
