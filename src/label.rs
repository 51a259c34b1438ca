//! Index labels and label sequences.
//!
//! An index label names one axis of a tensor inside a single equation. Most labels are
//! single characters (`i`, `j`, ...), but compound symbolic labels are supported as well
//! and are written comma-separated, e.g. `"s,k,p"` or `"q1,q2"`.
use crate::error::{Error, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// A single index label.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    Char(char),
    Symbol(String),
}

impl Label {
    /// Creates a label from its textual form.
    ///
    /// Single characters become [`Label::Char`], longer names become [`Label::Symbol`].
    pub fn new(text: &str) -> Result<Self> {
        let text = text.trim();
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Err(Error::InvalidLabel {
                label: text.to_string(),
            }),
            (Some(c), None) => Ok(Label::Char(c)),
            (Some(_), Some(_)) if text.chars().any(|c| c.is_whitespace() || c == ',') => Err(Error::InvalidLabel {
                label: text.to_string(),
            }),
            _ => Ok(Label::Symbol(text.to_string())),
        }
    }

    pub fn is_char(&self) -> bool {
        matches!(self, Label::Char(_))
    }
}

impl From<char> for Label {
    fn from(c: char) -> Self {
        Label::Char(c)
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Label::Char(c) => write!(f, "{}", c),
            Label::Symbol(s) => write!(f, "{}", s),
        }
    }
}

/// An ordered sequence of labels, one per tensor axis.
///
/// Labels may repeat, in which case the repeated axes are contracted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Labels(Vec<Label>);

impl Labels {
    pub fn new(labels: Vec<Label>) -> Self {
        Self(labels)
    }

    /// Parses a label pattern.
    ///
    /// Without commas every non-whitespace character is one label (`"ijkl"`). With commas
    /// the pattern is split into (possibly compound) labels (`"s,k,p"`).
    pub fn parse(pattern: &str) -> Result<Self> {
        if pattern.contains(',') {
            pattern.split(',').map(Label::new).collect::<Result<Vec<_>>>().map(Self)
        } else {
            Ok(Self(
                pattern
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .map(Label::Char)
                    .collect(),
            ))
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Label] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.0.iter()
    }

    pub fn contains(&self, label: &Label) -> bool {
        self.0.contains(label)
    }

    /// Returns the labels in reverse axis order.
    pub fn reversed(&self) -> Self {
        Self(self.0.iter().rev().cloned().collect())
    }

    /// Returns a new sequence with `label` prepended.
    pub fn prepended(&self, label: Label) -> Self {
        Self(std::iter::once(label).chain(self.0.iter().cloned()).collect())
    }

    /// Returns `true` if both sequences contain the same labels, ignoring order.
    pub fn same_set(&self, other: &Labels) -> bool {
        self.0.iter().all(|l| other.contains(l)) && other.0.iter().all(|l| self.contains(l))
    }

    /// Returns `true` if no label occurs more than once.
    pub fn is_distinct(&self) -> bool {
        self.0.iter().all_unique()
    }
}

impl FromIterator<Label> for Labels {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Labels {
    type Item = Label;
    type IntoIter = std::vec::IntoIter<Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Labels {
    type Item = &'a Label;
    type IntoIter = std::slice::Iter<'a, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Labels {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.iter().all(Label::is_char) {
            write!(f, "{}", self.0.iter().join(""))
        } else {
            write!(f, "{}", self.0.iter().join(","))
        }
    }
}

/// Conversion into a label sequence, used by the indexing methods of tensor handles.
pub trait IntoLabels {
    fn into_labels(self) -> Result<Labels>;
}

impl IntoLabels for &str {
    fn into_labels(self) -> Result<Labels> {
        Labels::parse(self)
    }
}

impl IntoLabels for &String {
    fn into_labels(self) -> Result<Labels> {
        Labels::parse(self)
    }
}

impl IntoLabels for Labels {
    fn into_labels(self) -> Result<Labels> {
        Ok(self)
    }
}

impl IntoLabels for &Labels {
    fn into_labels(self) -> Result<Labels> {
        Ok(self.clone())
    }
}

impl IntoLabels for Vec<Label> {
    fn into_labels(self) -> Result<Labels> {
        Ok(Labels(self))
    }
}

impl IntoLabels for &[Label] {
    fn into_labels(self) -> Result<Labels> {
        Ok(Labels(self.to_vec()))
    }
}
