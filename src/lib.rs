//! Symbolic tensor equations for kernel generation.
//!
//! This crate declares tensors, their index structure and the contractions between them,
//! so that a downstream kernel generator can emit optimized numerical code. Nothing here is
//! ever evaluated numerically.
//!
//! The pieces, leaves first:
//!
//! - [`database`]: the named tensor and scalar definitions of one equation system, merged
//!   from base defaults and descriptor files, with clone expansion and memory layouts.
//! - [`expr`] and [`equation`]: indexed products and sums of tensor handles, bound to a
//!   left-hand tensor with checked Einstein-summation index deduction ([`index`]).
//! - [`generator`] and [`system`]: registration of equations and included tensors with an
//!   injected [`Generator`](generator::Generator).
pub mod config;
pub mod database;
pub mod descriptor;
pub mod entry;
pub mod equation;
pub mod error;
pub mod expr;
pub mod generator;
pub mod index;
pub mod label;
pub mod layout;
pub mod multsim;
pub mod shape;
pub mod system;

pub use error::{Error, Result};
