//! Generation-time configuration of an equation system.
use crate::entry::HintRules;
use crate::label::Labels;
use eyre::{eyre, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A list of tensor name patterns.
///
/// A pattern matches a name exactly, or, if it ends with `*`, every name starting with the
/// part before the `*`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamePatterns(Vec<String>);

impl NamePatterns {
    pub fn new<S: Into<String>>(patterns: impl IntoIterator<Item = S>) -> Self {
        Self(patterns.into_iter().map(Into::into).collect())
    }

    pub fn matches(&self, name: &str) -> bool {
        self.0.iter().any(|pattern| match pattern.strip_suffix('*') {
            Some(prefix) => name.starts_with(prefix),
            None => pattern == name,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The number of basis functions of the 3D polynomial space of the given order.
pub fn number_of_basis_functions(order: usize) -> usize {
    order * (order + 1) * (order + 2) / 6
}

/// Parameters of one kernel-generation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Convergence order of the discretization.
    pub order: usize,
    /// Number of simulations fused into one kernel invocation.
    #[serde(default = "default_multiple_simulations")]
    pub multiple_simulations: usize,
    /// Directory containing the matrix descriptor files.
    pub matrices_dir: PathBuf,
    /// Path of the memory layout descriptor.
    pub memory_layout: PathBuf,
    /// Tensors stored transposed.
    #[serde(default)]
    pub transpose: NamePatterns,
    /// Tensors whose leading stride is aligned.
    #[serde(default)]
    pub align_stride: NamePatterns,
}

fn default_multiple_simulations() -> usize {
    1
}

impl GeneratorConfig {
    pub fn new(order: usize, matrices_dir: impl Into<PathBuf>, memory_layout: impl Into<PathBuf>) -> Self {
        Self {
            order,
            multiple_simulations: 1,
            matrices_dir: matrices_dir.into(),
            memory_layout: memory_layout.into(),
            transpose: NamePatterns::default(),
            align_stride: NamePatterns::default(),
        }
    }

    pub fn from_json_str(json: &str) -> eyre::Result<Self> {
        let config: Self = serde_json::from_str(json).wrap_err("failed to deserialize generator configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read generator configuration {}", path.display()))?;
        Self::from_json_str(&json).wrap_err_with(|| format!("invalid generator configuration {}", path.display()))
    }

    pub fn validate(&self) -> eyre::Result<()> {
        if self.order == 0 {
            return Err(eyre!("order must be at least 1"));
        }
        if self.multiple_simulations == 0 {
            return Err(eyre!("multiple_simulations must be at least 1"));
        }
        Ok(())
    }

    pub fn number_of_basis_functions(&self) -> usize {
        number_of_basis_functions(self.order)
    }

    pub fn transposes(&self, name: &str) -> bool {
        self.transpose.matches(name)
    }

    pub fn aligns_stride(&self, name: &str) -> bool {
        self.align_stride.matches(name)
    }

    pub fn hint_rules(&self) -> HintRules {
        HintRules {
            transpose: self.transpose.clone(),
            align_stride: self.align_stride.clone(),
        }
    }

    /// Returns the label pattern to use for the named tensor, reversed if it is stored
    /// transposed.
    pub fn t(&self, name: &str, labels: Labels) -> Labels {
        if self.transposes(name) {
            labels.reversed()
        } else {
            labels
        }
    }

    pub fn matrix_path(&self, file_name: &str) -> PathBuf {
        self.matrices_dir.join(file_name)
    }
}
