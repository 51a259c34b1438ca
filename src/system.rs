//! Equation systems and the configuration pass that feeds them to a generator.
use crate::database::Database;
use crate::error::Result;
use crate::generator::{Generator, InclusionSet};
use eyre::WrapErr;
use log::info;

/// A set of tensor equations together with the database they are specified against.
///
/// A domain-specific system extends a base system by running the full base setup first and
/// then layering its own merges, equations and included tensors on top.
pub trait EquationSystem {
    fn database(&self) -> &Database;

    /// Assembles the equations of the system and registers them with the generator.
    fn add_init(&self, generator: &mut dyn Generator) -> Result<()>;

    /// Adds the database tensors the generated code must expose regardless of equation usage.
    fn add_include_tensors(&self, tensors: &mut InclusionSet) -> Result<()>;
}

/// Runs both registration passes of an equation system against a generator.
///
/// Returns the inclusion set. Any structural error aborts the pass.
pub fn configure<S>(system: &S, generator: &mut dyn Generator) -> eyre::Result<InclusionSet>
where
    S: EquationSystem + ?Sized,
{
    system
        .add_init(generator)
        .wrap_err("failed to register equations")?;
    let mut tensors = InclusionSet::new();
    system
        .add_include_tensors(&mut tensors)
        .wrap_err("failed to collect included tensors")?;
    info!(
        "Configured equation system with {} database entries and {} included tensors",
        system.database().len(),
        tensors.len()
    );
    Ok(tensors)
}
