use crate::elastic::{star_clones, ElasticAderDg};
use crate::DIMENSIONS;
use eyre::WrapErr;
use log::info;
use tensorspec::config::GeneratorConfig;
use tensorspec::database::{CloneGroups, Database};
use tensorspec::descriptor::DescriptorSource;
use tensorspec::entry::HintRules;
use tensorspec::equation::Equation;
use tensorspec::error::Result;
use tensorspec::expr::Tensor;
use tensorspec::generator::{Generator, InclusionSet};
use tensorspec::system::EquationSystem;

/// Name of the database tensor holding the directions along which wave speeds are sampled.
pub const SAMPLING_DIRECTIONS: &str = "samplingDirections";

/// The anisotropic elastic ADER-DG equation system.
///
/// Extends [`ElasticAderDg`] with
/// - the anisotropic star operators from `star_anisotropic.xml`, replacing the isotropic ones,
/// - the sampling directions from `sampling_directions.json`, which are always part of the
///   generated output,
/// - the `computeChristoffel` kernel.
#[derive(Clone, Debug)]
pub struct AnisotropicAderDg {
    base: ElasticAderDg,
}

impl AnisotropicAderDg {
    pub fn new(config: &GeneratorConfig, descriptors: &dyn DescriptorSource) -> eyre::Result<Self> {
        let mut base = ElasticAderDg::without_layout(config, descriptors)?;

        let star_path = config.matrix_path("star_anisotropic.xml");
        let star = descriptors.matrix_file(&star_path, &HintRules::none())?;
        base.database_mut()
            .merge(star, &star_clones())
            .wrap_err_with(|| format!("failed to merge {}", star_path.display()))?;

        let sampling_path = config.matrix_path("sampling_directions.json");
        let sampling = descriptors.json_matrix_file(&sampling_path, &config.hint_rules())?;
        base.database_mut()
            .merge(sampling, &CloneGroups::new())
            .wrap_err_with(|| format!("failed to merge {}", sampling_path.display()))?;

        base.bind_memory_layout(descriptors)?;
        info!(
            "Set up anisotropic ADER-DG system of order {} with {} database entries",
            config.order,
            base.database().len()
        );
        Ok(Self { base })
    }

    pub fn base(&self) -> &ElasticAderDg {
        &self.base
    }

    /// The Christoffel tensor $\Gamma_{ik} = C_{ijkl} n_j n_l$ of the full elastic tensor
    /// $C$ for the direction $n$.
    pub fn christoffel_equation() -> Result<Equation> {
        let c = Tensor::new("C", [DIMENSIONS; 4]);
        let n = Tensor::new("n", [DIMENSIONS]);
        let christoffel = Tensor::new("christoffel", [DIMENSIONS, DIMENSIONS]);
        christoffel
            .idx("ik")?
            .assign(c.idx("ijkl")? * n.idx("j")? * n.idx("l")?)
    }
}

impl EquationSystem for AnisotropicAderDg {
    fn database(&self) -> &Database {
        self.base.database()
    }

    fn add_init(&self, generator: &mut dyn Generator) -> Result<()> {
        self.base.add_init(generator)?;
        generator.add("computeChristoffel", Self::christoffel_equation()?)
    }

    fn add_include_tensors(&self, tensors: &mut InclusionSet) -> Result<()> {
        self.base.add_include_tensors(tensors)?;
        tensors.include(self.database(), SAMPLING_DIRECTIONS)
    }
}
