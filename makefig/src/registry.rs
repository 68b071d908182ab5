//! Figure registry - named, zero-argument figure producers in registration order

use crate::{FigError, Figure};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors from figure registration and lookup
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    /// Duplicate registrations fail loudly rather than silently shadowing
    #[error("figure `{0}` is already registered")]
    DuplicateName(String),

    /// Requested names with no registered figure, reported before execution
    #[error("unknown figure name(s): {}", .0.join(", "))]
    UnknownNames(Vec<String>),
}

/// A zero-argument figure-producing function.
///
/// Implemented for free via the blanket impl below, so a plain `fn` (or any
/// `Fn` closure) registers directly.
pub trait Producer: Send + Sync {
    fn produce(&self) -> Result<Box<dyn Figure>, FigError>;
}

impl<F> Producer for F
where
    F: Fn() -> Result<Box<dyn Figure>, FigError> + Send + Sync,
{
    fn produce(&self) -> Result<Box<dyn Figure>, FigError> {
        self()
    }
}

impl fmt::Debug for dyn Producer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Producer")
    }
}

/// Ordered collection of named figure producers.
///
/// Populated once during startup and read-only during dispatch. Entries are
/// kept in registration order; the index is only for name lookup.
#[derive(Default, Clone)]
pub struct FigureRegistry {
    entries: Vec<(String, Arc<dyn Producer>)>,
    index: HashMap<String, usize>,
}

impl FigureRegistry {
    pub fn new() -> Self {
        FigureRegistry::default()
    }

    /// Record a producer under a name
    pub fn register(
        &mut self,
        name: impl Into<String>,
        producer: impl Producer + 'static,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, Arc::new(producer)));
        Ok(())
    }

    /// Builder-style registration
    pub fn with_figure(
        mut self,
        name: impl Into<String>,
        producer: impl Producer + 'static,
    ) -> Result<Self, RegistryError> {
        self.register(name, producer)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Producer>)> {
        self.entries.iter().map(|(n, p)| (n.as_str(), p))
    }

    /// Registered names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Entries whose name is in `names`, in registration order.
    ///
    /// Any requested name with no registered figure fails the whole lookup,
    /// listing every missing name.
    pub fn lookup(&self, names: &[String]) -> Result<Vec<(String, Arc<dyn Producer>)>, RegistryError> {
        let requested: HashSet<&str> = names.iter().map(String::as_str).collect();
        let mut missing: Vec<String> = requested
            .iter()
            .copied()
            .filter(|name| !self.index.contains_key(*name))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            missing.sort();
            return Err(RegistryError::UnknownNames(missing));
        }
        Ok(self
            .entries
            .iter()
            .filter(|(name, _)| requested.contains(name.as_str()))
            .cloned()
            .collect())
    }

    /// Like [`lookup`](Self::lookup), but an empty request selects everything
    pub fn select(&self, names: &[String]) -> Result<Vec<(String, Arc<dyn Producer>)>, RegistryError> {
        if names.is_empty() {
            return Ok(self.entries.clone());
        }
        self.lookup(names)
    }
}
