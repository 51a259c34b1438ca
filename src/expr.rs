//! Symbolic tensor handles and expressions.
//!
//! Handles are declared locally for one equation and do not refer to the database; they
//! only carry a name and a shape. Indexing a handle with a label pattern yields an
//! [`IndexedTensor`], and indexed tensors combine into [`Expr`] trees with `*` and `+`:
//!
//! ```
//! # fn main() -> tensorspec::error::Result<()> {
//! use tensorspec::expr::Tensor;
//!
//! let c = Tensor::new("C", [3, 3, 3, 3]);
//! let n = Tensor::new("n", [3]);
//! let rhs = c.idx("ijkl")? * n.idx("j")? * n.idx("l")?;
//! assert_eq!(rhs.free_labels()?.to_string(), "ik");
//! # Ok(())
//! # }
//! ```
use crate::entry::{ScalarDef, TensorDef};
use crate::error::{Error, Result};
use crate::index::{deduce_indices, LabelExtents};
use crate::label::{IntoLabels, Labels};
use crate::shape::Shape;
use itertools::Itertools;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::ops::{Add, Mul};

/// A symbolic tensor handle.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tensor {
    name: String,
    shape: Shape,
}

impl Tensor {
    pub fn new(name: impl Into<String>, shape: impl Into<Shape>) -> Self {
        Self {
            name: name.into(),
            shape: shape.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Indexes the tensor with one label per axis.
    ///
    /// The number of labels is checked against the rank when the expression is bound to an
    /// equation, see [`Equation::bind`](crate::equation::Equation::bind).
    pub fn idx(&self, labels: impl IntoLabels) -> Result<IndexedTensor> {
        Ok(IndexedTensor {
            tensor: self.clone(),
            labels: labels.into_labels()?,
        })
    }
}

impl From<&TensorDef> for Tensor {
    fn from(def: &TensorDef) -> Self {
        Self::new(def.name(), def.shape().clone())
    }
}

/// A symbolic scalar handle.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Scalar {
    name: String,
}

impl Scalar {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&ScalarDef> for Scalar {
    fn from(def: &ScalarDef) -> Self {
        Self::new(def.name())
    }
}

/// A tensor handle together with the labels of its axes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IndexedTensor {
    tensor: Tensor,
    labels: Labels,
}

impl IndexedTensor {
    pub fn tensor(&self) -> &Tensor {
        &self.tensor
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Fails with [`Error::LabelCountMismatch`] if the number of labels differs from the rank.
    pub fn check_label_count(&self) -> Result<()> {
        if self.labels.len() != self.tensor.shape.rank() {
            return Err(Error::LabelCountMismatch {
                tensor: self.tensor.name.clone(),
                rank: self.tensor.shape.rank(),
                labels: self.labels.clone(),
            });
        }
        Ok(())
    }

    /// Binds an expression to this tensor, the equivalent of `lhs <= rhs`.
    pub fn assign(self, rhs: impl Into<Expr>) -> Result<crate::equation::Equation> {
        crate::equation::Equation::bind(self, rhs.into())
    }
}

impl Display for IndexedTensor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.tensor.name, self.labels)
    }
}

/// A symbolic tensor expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Indexed(IndexedTensor),
    /// Indexed multiplication; labels shared between factors are contracted.
    Product(Vec<Expr>),
    /// Addition of terms with identical free labels.
    Sum(Vec<Expr>),
    Scaled(Scalar, Box<Expr>),
}

impl Expr {
    /// Sums the given terms, e.g. the contributions of the three spatial directions.
    ///
    /// A single term is returned as is.
    pub fn sum(terms: impl IntoIterator<Item = Expr>) -> Expr {
        let mut terms: Vec<Expr> = terms
            .into_iter()
            .flat_map(|term| match term {
                Expr::Sum(inner) => inner,
                term => vec![term],
            })
            .collect();
        if terms.len() == 1 {
            terms.pop().expect("Internal error: one term is present")
        } else {
            Expr::Sum(terms)
        }
    }

    /// The labels that survive the expression, in order of first occurrence.
    ///
    /// The labels of all indexed tensors of a product are counted together, looking through
    /// scalar factors and nested products, so a label occurring more than once anywhere in
    /// the product is contracted. A sum inside a product counts with its own free labels.
    ///
    /// Fails with [`Error::IndexMismatch`] if the terms of a sum have different free labels,
    /// and with [`Error::EmptyExpression`] if a sum or product has no operands.
    pub fn free_labels(&self) -> Result<Labels> {
        match self {
            Expr::Sum(terms) => {
                let mut terms = terms.iter();
                let first = match terms.next() {
                    Some(term) => term.free_labels()?,
                    None => return Err(Error::EmptyExpression),
                };
                for term in terms {
                    let labels = term.free_labels()?;
                    if !labels.same_set(&first) {
                        return Err(Error::IndexMismatch {
                            tensor: format!("{}", term),
                            expected: first,
                            found: labels,
                        });
                    }
                }
                Ok(first)
            }
            _ => {
                let mut factor_labels = Vec::new();
                self.collect_factor_labels(&mut factor_labels)?;
                Ok(deduce_indices(&factor_labels).free)
            }
        }
    }

    fn collect_factor_labels(&self, factor_labels: &mut Vec<Labels>) -> Result<()> {
        match self {
            Expr::Indexed(indexed) => factor_labels.push(indexed.labels().clone()),
            Expr::Product(factors) => {
                if factors.is_empty() {
                    return Err(Error::EmptyExpression);
                }
                for factor in factors {
                    factor.collect_factor_labels(factor_labels)?;
                }
            }
            Expr::Sum(_) => factor_labels.push(self.free_labels()?),
            Expr::Scaled(_, inner) => inner.collect_factor_labels(factor_labels)?,
        }
        Ok(())
    }

    /// Binds every label of the expression to an extent.
    ///
    /// Labels are scoped to the equation, so a label must have the same extent wherever it
    /// occurs. Fails with [`Error::ExtentMismatch`] otherwise, and with
    /// [`Error::LabelCountMismatch`] if a tensor is indexed with the wrong number of labels.
    pub fn label_extents(&self) -> Result<LabelExtents> {
        let mut extents = LabelExtents::new();
        for indexed in self.leaves() {
            indexed.check_label_count()?;
            extents.bind(indexed.labels(), indexed.tensor().shape())?;
        }
        Ok(extents)
    }

    /// All indexed tensors of the expression, from left to right.
    pub fn leaves(&self) -> Vec<&IndexedTensor> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a IndexedTensor>) {
        match self {
            Expr::Indexed(indexed) => leaves.push(indexed),
            Expr::Product(children) | Expr::Sum(children) => {
                for child in children {
                    child.collect_leaves(leaves);
                }
            }
            Expr::Scaled(_, inner) => inner.collect_leaves(leaves),
        }
    }

    /// Returns `true` if both expressions are equal up to the order of factors and terms,
    /// the nesting of products and the position of scalar factors.
    pub fn structurally_eq(&self, other: &Expr) -> bool {
        self.canonical() == other.canonical()
    }

    fn canonical(&self) -> Canonical {
        match self {
            Expr::Indexed(indexed) => Canonical::Leaf(
                indexed.tensor.name.clone(),
                indexed.tensor.shape.clone(),
                indexed.labels.clone(),
            ),
            Expr::Product(factors) => Canonical::product(factors.iter().map(Expr::canonical)),
            Expr::Sum(terms) => {
                let mut canonical_terms = Vec::new();
                for term in terms {
                    match term.canonical() {
                        Canonical::Sum(inner) => canonical_terms.extend(inner),
                        other => canonical_terms.push(other),
                    }
                }
                canonical_terms.sort();
                Canonical::Sum(canonical_terms)
            }
            Expr::Scaled(scalar, inner) => {
                Canonical::product([Canonical::Scalar(scalar.clone()), inner.canonical()])
            }
        }
    }
}

/// Order-independent form of an expression used for structural comparison.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Canonical {
    Leaf(String, Shape, Labels),
    Scalar(Scalar),
    Product(Vec<Canonical>),
    Sum(Vec<Canonical>),
}

impl Canonical {
    /// A flattened product with sorted factors.
    fn product(factors: impl IntoIterator<Item = Canonical>) -> Self {
        let mut flattened = Vec::new();
        for factor in factors {
            match factor {
                Canonical::Product(inner) => flattened.extend(inner),
                other => flattened.push(other),
            }
        }
        flattened.sort();
        Canonical::Product(flattened)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Indexed(indexed) => write!(f, "{}", indexed),
            Expr::Product(factors) => {
                let factors = factors.iter().map(|factor| match factor {
                    Expr::Sum(_) => format!("({})", factor),
                    _ => format!("{}", factor),
                });
                write!(f, "{}", factors.format(" * "))
            }
            Expr::Sum(terms) => write!(f, "{}", terms.iter().format(" + ")),
            Expr::Scaled(scalar, inner) => match inner.as_ref() {
                Expr::Sum(_) => write!(f, "{} * ({})", scalar.name, inner),
                _ => write!(f, "{} * {}", scalar.name, inner),
            },
        }
    }
}

impl From<IndexedTensor> for Expr {
    fn from(indexed: IndexedTensor) -> Self {
        Expr::Indexed(indexed)
    }
}

fn product(lhs: Expr, rhs: Expr) -> Expr {
    let mut factors = match lhs {
        Expr::Product(factors) => factors,
        lhs => vec![lhs],
    };
    match rhs {
        Expr::Product(rhs_factors) => factors.extend(rhs_factors),
        rhs => factors.push(rhs),
    }
    Expr::Product(factors)
}

impl<R: Into<Expr>> Mul<R> for Expr {
    type Output = Expr;

    fn mul(self, rhs: R) -> Expr {
        product(self, rhs.into())
    }
}

impl<R: Into<Expr>> Mul<R> for IndexedTensor {
    type Output = Expr;

    fn mul(self, rhs: R) -> Expr {
        product(self.into(), rhs.into())
    }
}

impl<R: Into<Expr>> Mul<R> for Scalar {
    type Output = Expr;

    fn mul(self, rhs: R) -> Expr {
        Expr::Scaled(self, Box::new(rhs.into()))
    }
}

impl<R: Into<Expr>> Mul<R> for &Scalar {
    type Output = Expr;

    fn mul(self, rhs: R) -> Expr {
        Expr::Scaled(self.clone(), Box::new(rhs.into()))
    }
}

impl<R: Into<Expr>> Add<R> for Expr {
    type Output = Expr;

    fn add(self, rhs: R) -> Expr {
        Expr::sum([self, rhs.into()])
    }
}

impl<R: Into<Expr>> Add<R> for IndexedTensor {
    type Output = Expr;

    fn add(self, rhs: R) -> Expr {
        Expr::sum([self.into(), rhs.into()])
    }
}
