use crate::{DIMENSIONS, NUMBER_OF_QUANTITIES};
use eyre::WrapErr;
use log::info;
use tensorspec::config::GeneratorConfig;
use tensorspec::database::{CloneGroup, CloneGroups, Database};
use tensorspec::descriptor::DescriptorSource;
use tensorspec::entry::HintRules;
use tensorspec::equation::Equation;
use tensorspec::error::Result;
use tensorspec::expr::{Expr, Tensor};
use tensorspec::generator::{Generator, InclusionSet};
use tensorspec::label::Labels;
use tensorspec::multsim::OptionalDimTensor;
use tensorspec::system::EquationSystem;

/// The star operators `star(0)`, `star(1)`, `star(2)`, one per spatial direction.
pub fn star_clones() -> CloneGroups {
    CloneGroups::new().with_group(CloneGroup::indexed("star", DIMENSIONS))
}

/// The isotropic elastic ADER-DG equation system.
///
/// The database holds the reference matrices of the discretization (`kDivM(d)` and friends,
/// read from `matrices_<nb>.xml`) and the star operators (read from `star.xml` and cloned
/// per direction). The system registers the `volume` kernel
/// $$
/// Q_{kp} = \sum_d K^{(d)}_{kl} \\, I_{lq} \\, A^{\star(d)}_{qp}.
/// $$
#[derive(Clone, Debug)]
pub struct ElasticAderDg {
    config: GeneratorConfig,
    db: Database,
    q: OptionalDimTensor,
    i: OptionalDimTensor,
}

impl ElasticAderDg {
    /// Performs the full base setup, including memory layout binding.
    pub fn new(config: &GeneratorConfig, descriptors: &dyn DescriptorSource) -> eyre::Result<Self> {
        let mut system = Self::without_layout(config, descriptors)?;
        system.bind_memory_layout(descriptors)?;
        info!(
            "Set up elastic ADER-DG system of order {} with {} database entries",
            config.order,
            system.db.len()
        );
        Ok(system)
    }

    /// Performs the base setup except for memory layout binding.
    ///
    /// Derived systems merge their own entries into the database first and then call
    /// [`bind_memory_layout`](Self::bind_memory_layout), so that the layout descriptor may
    /// refer to entries of the derived system.
    pub fn without_layout(config: &GeneratorConfig, descriptors: &dyn DescriptorSource) -> eyre::Result<Self> {
        config.validate()?;
        let nb = config.number_of_basis_functions();
        let mut db = Database::new();

        let matrices_path = config.matrix_path(&format!("matrices_{}.xml", nb));
        let matrices = descriptors.matrix_file(&matrices_path, &config.hint_rules())?;
        db.merge(matrices, &CloneGroups::new())
            .wrap_err_with(|| format!("failed to merge {}", matrices_path.display()))?;

        let star_path = config.matrix_path("star.xml");
        let star = descriptors.matrix_file(&star_path, &HintRules::none())?;
        db.merge(star, &star_clones())
            .wrap_err_with(|| format!("failed to merge {}", star_path.display()))?;

        let dofs_shape = [nb, NUMBER_OF_QUANTITIES];
        Ok(Self {
            config: config.clone(),
            db,
            q: OptionalDimTensor::new("Q", dofs_shape, config.multiple_simulations),
            i: OptionalDimTensor::new("I", dofs_shape, config.multiple_simulations),
        })
    }

    pub fn bind_memory_layout(&mut self, descriptors: &dyn DescriptorSource) -> eyre::Result<()> {
        let layout = descriptors.memory_layout(&self.config.memory_layout)?;
        self.db
            .apply_memory_layout(&layout)
            .wrap_err_with(|| format!("failed to apply memory layout {}", self.config.memory_layout.display()))
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub(crate) fn database_mut(&mut self) -> &mut Database {
        &mut self.db
    }

    /// The degrees of freedom.
    pub fn q(&self) -> &OptionalDimTensor {
        &self.q
    }

    /// The time-integrated degrees of freedom.
    pub fn i(&self) -> &OptionalDimTensor {
        &self.i
    }

    pub fn volume_equation(&self) -> Result<Equation> {
        let terms = (0..DIMENSIONS)
            .map(|d| -> Result<Expr> {
                let k_div_m_name = format!("kDivM({})", d);
                let k_div_m = Tensor::from(self.db.tensor(&k_div_m_name)?);
                let star = Tensor::from(self.db.tensor(&format!("star({})", d))?);
                let kl = self.config.t(&k_div_m_name, Labels::parse("kl")?);
                Ok(k_div_m.idx(kl)? * self.i.idx("lq")? * star.idx("qp")?)
            })
            .collect::<Result<Vec<_>>>()?;
        self.q.idx("kp")?.assign(Expr::sum(terms))
    }
}

impl EquationSystem for ElasticAderDg {
    fn database(&self) -> &Database {
        &self.db
    }

    fn add_init(&self, generator: &mut dyn Generator) -> Result<()> {
        generator.add("volume", self.volume_equation()?)
    }

    fn add_include_tensors(&self, _tensors: &mut InclusionSet) -> Result<()> {
        Ok(())
    }
}
