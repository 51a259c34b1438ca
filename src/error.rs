//! Library-wide error type.
//!
//! All errors are structural: they are detected while the equations are being specified
//! and abort the whole configuration pass.
use crate::label::{Label, Labels};
use crate::shape::Shape;
use std::fmt;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// An entry was redefined with a shape that is incompatible with its existing definition.
    DefinitionConflict { name: String, existing: Shape, incoming: Shape },
    /// A layout, inclusion or lookup request named an entry that is not in the database.
    UnknownTensorReference { name: String, context: &'static str },
    /// The labels on the left-hand side do not match the free labels of the right-hand side,
    /// or the terms of a sum do not share the same free labels.
    IndexMismatch { tensor: String, expected: Labels, found: Labels },
    /// A tensor was indexed with a number of labels different from its rank.
    LabelCountMismatch { tensor: String, rank: usize, labels: Labels },
    /// The same label was bound to axes of different extents within one equation.
    ExtentMismatch { label: Label, first: usize, second: usize },
    /// A layout descriptor is not applicable to the entry it names.
    InvalidLayout { name: String, reason: String },
    /// A sum without terms or a product without factors.
    EmptyExpression,
    /// An equation was registered twice under the same key.
    DuplicateKernel { key: String },
    /// A label could not be parsed.
    InvalidLabel { label: String },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::DefinitionConflict {
                name,
                existing,
                incoming,
            } => write!(
                f,
                "Conflicting definitions for '{}': existing shape {} but incoming shape {}",
                name, existing, incoming
            ),
            Self::UnknownTensorReference { name, context } => {
                write!(f, "Unknown tensor '{}' referenced in {}", name, context)
            }
            Self::IndexMismatch {
                tensor,
                expected,
                found,
            } => write!(
                f,
                "Index mismatch for '{}': expected labels [{}], found [{}]",
                tensor, expected, found
            ),
            Self::LabelCountMismatch { tensor, rank, labels } => write!(
                f,
                "Tensor '{}' has rank {} but was indexed with {} labels [{}]",
                tensor,
                rank,
                labels.len(),
                labels
            ),
            Self::ExtentMismatch { label, first, second } => write!(
                f,
                "Label '{}' is bound to axes of different extents ({} and {})",
                label, first, second
            ),
            Self::InvalidLayout { name, reason } => {
                write!(f, "Invalid memory layout for '{}': {}", name, reason)
            }
            Self::EmptyExpression => write!(f, "Expression has no terms"),
            Self::DuplicateKernel { key } => {
                write!(f, "A kernel is already registered under the key '{}'", key)
            }
            Self::InvalidLabel { label } => write!(f, "Invalid index label '{}'", label),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
