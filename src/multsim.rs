//! Support for fusing several simulations into one kernel invocation.
use crate::entry::TensorDef;
use crate::error::Result;
use crate::expr::{IndexedTensor, Tensor};
use crate::label::{IntoLabels, Label};
use crate::shape::Shape;

/// The label of the simulation axis.
pub const SIMULATION_LABEL: char = 's';

/// A tensor with an optional leading simulation axis.
///
/// With more than one fused simulation the tensor gets a leading axis with one entry per
/// simulation, and indexing it prepends the simulation label to every label pattern. With a
/// single simulation it behaves exactly like a plain [`Tensor`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionalDimTensor {
    tensor: Tensor,
    simulations: usize,
}

impl OptionalDimTensor {
    pub fn new(name: impl Into<String>, shape: impl Into<Shape>, multiple_simulations: usize) -> Self {
        let shape = shape.into();
        let shape = if multiple_simulations > 1 {
            shape.prepended(multiple_simulations)
        } else {
            shape
        };
        Self {
            tensor: Tensor::new(name, shape),
            simulations: multiple_simulations,
        }
    }

    pub fn has_optional_dim(&self) -> bool {
        self.simulations > 1
    }

    pub fn tensor(&self) -> &Tensor {
        &self.tensor
    }

    pub fn name(&self) -> &str {
        self.tensor.name()
    }

    /// The full shape, including the simulation axis if present.
    pub fn shape(&self) -> &Shape {
        self.tensor.shape()
    }

    /// Indexes the tensor, prepending the simulation label if the simulation axis is present.
    pub fn idx(&self, labels: impl IntoLabels) -> Result<IndexedTensor> {
        let labels = labels.into_labels()?;
        if self.has_optional_dim() {
            self.tensor.idx(labels.prepended(Label::Char(SIMULATION_LABEL)))
        } else {
            self.tensor.idx(labels)
        }
    }

    pub fn to_def(&self) -> TensorDef {
        TensorDef::new(self.tensor.name(), self.tensor.shape().clone())
    }
}
