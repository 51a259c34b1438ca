//! Index deduction for Einstein-summation products.
//!
//! Given the label sequences of the factors of a product, every label that occurs exactly
//! once across all factors is *free* and survives into the result, while every label that
//! occurs two or more times (in one factor or across factors) is *contracted*, i.e. summed
//! over. Both label sets are reported in order of first occurrence, so the deduction is
//! deterministic, and it does not depend on the order of the factors as a set.
use crate::error::{Error, Result};
use crate::label::{Label, Labels};
use crate::shape::Shape;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;

/// The outcome of deducing the indices of a product.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexDeduction {
    pub free: Labels,
    pub contracted: Labels,
}

/// Deduces free and contracted labels of a product with the given factor label sequences.
pub fn deduce_indices<'a>(factors: impl IntoIterator<Item = &'a Labels>) -> IndexDeduction {
    let mut order: Vec<&Label> = Vec::new();
    let mut counts: FxHashMap<&Label, usize> = FxHashMap::default();
    for label in factors.into_iter().flat_map(|labels| labels.iter()) {
        let count = counts.entry(label).or_insert(0);
        if *count == 0 {
            order.push(label);
        }
        *count += 1;
    }

    let (free, contracted): (Vec<&Label>, Vec<&Label>) = order.into_iter().partition(|label| counts[label] == 1);
    IndexDeduction {
        free: free.into_iter().cloned().collect(),
        contracted: contracted.into_iter().cloned().collect(),
    }
}

/// The extent bound to each label of one equation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelExtents {
    extents: IndexMap<Label, usize>,
}

impl LabelExtents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the labels of one indexed tensor to the extents of its shape, axis by axis.
    ///
    /// Fails with [`Error::ExtentMismatch`] if a label is already bound to another extent.
    pub fn bind(&mut self, labels: &Labels, shape: &Shape) -> Result<()> {
        for (label, &extent) in labels.iter().zip(shape.extents()) {
            self.bind_label(label, extent)?;
        }
        Ok(())
    }

    fn bind_label(&mut self, label: &Label, extent: usize) -> Result<()> {
        match self.extents.get(label) {
            Some(&first) if first != extent => Err(Error::ExtentMismatch {
                label: label.clone(),
                first,
                second: extent,
            }),
            Some(_) => Ok(()),
            None => {
                self.extents.insert(label.clone(), extent);
                Ok(())
            }
        }
    }

    /// Merges the bindings of another set of extents into this one.
    pub fn extend(&mut self, other: &LabelExtents) -> Result<()> {
        for (label, &extent) in &other.extents {
            self.bind_label(label, extent)?;
        }
        Ok(())
    }

    pub fn get(&self, label: &Label) -> Option<usize> {
        self.extents.get(label).copied()
    }

    /// All bound labels, in order of first binding.
    pub fn labels(&self) -> Labels {
        self.extents.keys().cloned().collect()
    }

    /// The shape spanned by the given labels.
    ///
    /// Returns `None` if any of the labels is unbound.
    pub fn shape_of(&self, labels: &Labels) -> Option<Shape> {
        labels.iter().map(|label| self.get(label)).collect()
    }
}
