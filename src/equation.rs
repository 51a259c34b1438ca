//! Equations: an indexed left-hand tensor bound to a right-hand expression.
use crate::error::{Error, Result};
use crate::expr::{Expr, IndexedTensor};
use crate::label::Labels;
use crate::shape::Shape;
use std::fmt;
use std::fmt::{Display, Formatter};

/// A validated tensor equation `lhs <= rhs`.
///
/// Binding checks that every tensor is indexed with one label per axis, that the left-hand
/// labels are exactly the free labels of the right-hand side and that every label has a
/// single extent. All remaining right-hand labels are contracted. The equation is a pure
/// assembly instruction for the kernel generator and is never evaluated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Equation {
    lhs: IndexedTensor,
    rhs: Expr,
    contracted: Labels,
}

impl Equation {
    pub fn bind(lhs: IndexedTensor, rhs: Expr) -> Result<Self> {
        for leaf in rhs.leaves() {
            leaf.check_label_count()?;
        }
        let free = rhs.free_labels()?;
        if !lhs.labels().is_distinct() || !lhs.labels().same_set(&free) || lhs.labels().len() != free.len() {
            return Err(Error::IndexMismatch {
                tensor: lhs.tensor().name().to_string(),
                expected: free,
                found: lhs.labels().clone(),
            });
        }

        lhs.check_label_count()?;

        let mut extents = rhs.label_extents()?;
        extents.bind(lhs.labels(), lhs.tensor().shape())?;

        let contracted = extents
            .labels()
            .into_iter()
            .filter(|label| !free.contains(label))
            .collect();
        Ok(Self { lhs, rhs, contracted })
    }

    pub fn lhs(&self) -> &IndexedTensor {
        &self.lhs
    }

    pub fn rhs(&self) -> &Expr {
        &self.rhs
    }

    /// The labels summed over, in order of first occurrence on the right-hand side.
    pub fn contracted_labels(&self) -> &Labels {
        &self.contracted
    }

    /// The shape of the tensor produced by the equation.
    pub fn result_shape(&self) -> &Shape {
        self.lhs.tensor().shape()
    }

    /// Returns `true` if both equations assign structurally equivalent expressions to the
    /// same indexed tensor.
    pub fn structurally_eq(&self, other: &Equation) -> bool {
        self.lhs == other.lhs && self.rhs.structurally_eq(&other.rhs)
    }
}

impl Display for Equation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} <= {}", self.lhs, self.rhs)
    }
}
