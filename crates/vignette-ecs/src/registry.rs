use std::collections::HashMap;
use std::fmt;

use tracing::warn;

use crate::error::EcsError;
use crate::system::System;

/// Stable identifier for a kind of system.
///
/// Keys are plain string tags registered once with a [`SystemRegistry`]; code
/// that switches systems on and off only ever handles keys, never instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SystemKey(&'static str);

impl SystemKey {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for SystemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

type Constructor = Box<dyn Fn() -> Box<dyn System> + Send + Sync>;

/// Explicit table of system constructors, built at startup.
#[derive(Default)]
pub struct SystemRegistry {
    constructors: HashMap<SystemKey, Constructor>,
}

impl SystemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the constructor for `key`. A second registration replaces the first.
    pub fn register<S, F>(&mut self, key: SystemKey, constructor: F)
    where
        S: System + 'static,
        F: Fn() -> S + Send + Sync + 'static,
    {
        let boxed: Constructor = Box::new(move || Box::new(constructor()));
        if self.constructors.insert(key, boxed).is_some() {
            warn!("System key '{}' registered twice, keeping the latest", key);
        }
    }

    /// Construct a fresh instance of the system registered under `key`.
    pub fn create(&self, key: SystemKey) -> Result<Box<dyn System>, EcsError> {
        self.constructors
            .get(&key)
            .map(|constructor| constructor())
            .ok_or(EcsError::UnknownSystem(key))
    }

    pub fn contains(&self, key: SystemKey) -> bool {
        self.constructors.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}
