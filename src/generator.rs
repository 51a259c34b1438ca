//! The interface towards the kernel generator.
//!
//! Equation systems never hold a generator themselves; it is passed into the registration
//! calls, so that systems can be configured against any [`Generator`] implementation.
use crate::database::Database;
use crate::entry::TensorDef;
use crate::equation::Equation;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;

/// A kernel generator that accepts equations under unique keys.
pub trait Generator {
    /// Registers an equation under the given key.
    ///
    /// Keys identify generated kernels, so re-registering a key is a configuration error.
    fn add(&mut self, key: &str, equation: Equation) -> Result<()>;
}

/// A generator that records registered equations in registration order.
#[derive(Clone, Debug, Default)]
pub struct KernelRegistry {
    kernels: IndexMap<String, Equation>,
}

impl KernelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Equation> {
        self.kernels.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.kernels.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.kernels.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Equation)> {
        self.kernels.iter().map(|(key, equation)| (key.as_str(), equation))
    }
}

impl Generator for KernelRegistry {
    fn add(&mut self, key: &str, equation: Equation) -> Result<()> {
        if self.kernels.contains_key(key) {
            return Err(Error::DuplicateKernel { key: key.to_string() });
        }
        debug!("Registering kernel '{}': {}", key, equation);
        self.kernels.insert(key.to_string(), equation);
        Ok(())
    }
}

/// Tensors the generator must retain in its output whether or not an equation uses them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InclusionSet {
    tensors: IndexMap<String, TensorDef>,
}

impl InclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a tensor definition. Adding the same tensor twice has no effect.
    pub fn add(&mut self, tensor: &TensorDef) {
        if !self.tensors.contains_key(tensor.name()) {
            debug!("Including tensor '{}' in generated output", tensor.name());
            self.tensors.insert(tensor.name().to_string(), tensor.clone());
        }
    }

    /// Adds the named tensor of the database.
    ///
    /// Fails with [`Error::UnknownTensorReference`] if the database has no such tensor.
    pub fn include(&mut self, database: &Database, name: &str) -> Result<()> {
        let tensor = database.tensor(name).map_err(|_| Error::UnknownTensorReference {
            name: name.to_string(),
            context: "inclusion set",
        })?;
        self.add(tensor);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tensors.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&TensorDef> {
        self.tensors.get(name)
    }

    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TensorDef> {
        self.tensors.values()
    }
}
