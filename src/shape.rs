use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// The per-axis extents of a tensor.
///
/// A scalar has the empty shape.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Shape(Vec<usize>);

impl Shape {
    pub fn new(extents: Vec<usize>) -> Self {
        Self(extents)
    }

    pub fn scalar() -> Self {
        Self(Vec::new())
    }

    /// The number of axes.
    pub fn rank(&self) -> usize {
        self.0.len()
    }

    pub fn extents(&self) -> &[usize] {
        &self.0
    }

    pub fn extent(&self, axis: usize) -> Option<usize> {
        self.0.get(axis).copied()
    }

    /// The total number of entries of a dense tensor with this shape.
    pub fn num_entries(&self) -> usize {
        self.0.iter().product()
    }

    pub fn reversed(&self) -> Self {
        Self(self.0.iter().rev().copied().collect())
    }

    pub fn prepended(&self, extent: usize) -> Self {
        Self(std::iter::once(extent).chain(self.0.iter().copied()).collect())
    }
}

impl From<Vec<usize>> for Shape {
    fn from(extents: Vec<usize>) -> Self {
        Self(extents)
    }
}

impl From<&[usize]> for Shape {
    fn from(extents: &[usize]) -> Self {
        Self(extents.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Shape {
    fn from(extents: [usize; N]) -> Self {
        Self(extents.to_vec())
    }
}

impl FromIterator<usize> for Shape {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.iter().join(", "))
    }
}
