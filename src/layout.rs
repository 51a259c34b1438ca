//! Memory layout descriptors.
//!
//! A [`MemoryLayout`] maps entry names to storage hints. It is produced by an external
//! parser and bound to a [`Database`](crate::database::Database) after all merges have
//! completed. Layout entries keyed by the canonical name of a clone group apply to every
//! member of the group.
use crate::shape::Shape;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// The storage format requested for an entry.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutKind {
    #[default]
    Dense,
    /// Compressed sparse column storage.
    Csc,
}

/// Storage hints for a single entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSpec {
    #[serde(default)]
    pub kind: LayoutKind,
    /// The non-zero block of the tensor, one half-open range per axis.
    #[serde(default)]
    pub bounding_box: Option<Vec<Range<usize>>>,
    /// Overrides the entry's transposition hint. Changing the hint reverses the shape of the
    /// entry, and the bounding box refers to the resulting shape.
    #[serde(default)]
    pub transpose: Option<bool>,
    /// Overrides the entry's stride alignment hint.
    #[serde(default)]
    pub align_stride: Option<bool>,
}

impl LayoutSpec {
    pub fn dense() -> Self {
        Self::default()
    }

    pub fn csc() -> Self {
        Self {
            kind: LayoutKind::Csc,
            ..Self::default()
        }
    }

    pub fn with_bounding_box(mut self, bounding_box: Vec<Range<usize>>) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }

    pub fn with_align_stride(mut self, align_stride: bool) -> Self {
        self.align_stride = Some(align_stride);
        self
    }

    pub fn with_transpose(mut self, transpose: bool) -> Self {
        self.transpose = Some(transpose);
        self
    }

    /// Returns `true` if the layout carries no information beyond the default dense layout.
    pub fn is_trivial(&self) -> bool {
        *self == Self::default()
    }

    /// Checks that the layout can describe a tensor of the given shape.
    ///
    /// Returns a description of the problem if it cannot.
    pub fn check_against(&self, shape: &Shape) -> Result<(), String> {
        if self.kind == LayoutKind::Csc && shape.rank() != 2 {
            return Err(format!("CSC storage requires a matrix, but the shape is {}", shape));
        }
        if let Some(bounding_box) = &self.bounding_box {
            if bounding_box.len() != shape.rank() {
                return Err(format!(
                    "bounding box has {} axes, but the shape {} has rank {}",
                    bounding_box.len(),
                    shape,
                    shape.rank()
                ));
            }
            for (axis, (range, &extent)) in bounding_box.iter().zip(shape.extents()).enumerate() {
                if range.start > range.end || range.end > extent {
                    return Err(format!(
                        "bounding box range {:?} of axis {} exceeds the extent {}",
                        range, axis, extent
                    ));
                }
            }
        }
        Ok(())
    }
}

/// A name-keyed collection of layout hints.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryLayout {
    entries: IndexMap<String, LayoutSpec>,
}

impl MemoryLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, name: impl Into<String>, spec: LayoutSpec) -> Self {
        self.insert(name, spec);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: LayoutSpec) {
        self.entries.insert(name.into(), spec);
    }

    pub fn get(&self, name: &str) -> Option<&LayoutSpec> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LayoutSpec)> {
        self.entries.iter().map(|(name, spec)| (name.as_str(), spec))
    }
}
