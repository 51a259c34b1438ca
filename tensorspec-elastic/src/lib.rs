//! Elastic wave propagation equation systems for `tensorspec`.
//!
//! [`ElasticAderDg`] is the isotropic elastic ADER-DG base system. [`AnisotropicAderDg`]
//! extends it with the anisotropic star operators, the sampling directions used to estimate
//! the maximal wave speed and the Christoffel kernel
//! $$
//! \Gamma_{ik} = C_{ijkl} \\, n_j \\, n_l.
//! $$
pub mod anisotropic;
pub mod elastic;

pub use anisotropic::AnisotropicAderDg;
pub use elastic::ElasticAderDg;

/// The number of elastic quantities: six stress components and three velocities.
pub const NUMBER_OF_QUANTITIES: usize = 9;

/// The number of spatial dimensions.
pub const DIMENSIONS: usize = 3;
