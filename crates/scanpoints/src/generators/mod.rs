//! Per-model path generators.
//!
//! A generator turns one validated [`Model`], plus the regions that apply
//! to its own axes, into a lazy sequence of [`Position`]s. Regions are
//! checked once per candidate; rejected candidates are skipped by plain
//! loops so long rejected runs never grow the stack.

/// Step, array and multi-step generators.
pub mod axial;
/// The single-point static generator.
pub mod fixed;
/// Lissajous figures.
pub mod lissajous;
/// Compound scans nested as a single model.
pub mod nested;
/// Line and grid rasters.
pub mod raster;
/// Fermat spirals.
pub mod spiral;

use std::fmt;

use crate::{
    error,
    model::Model,
    position::{AxisName, Position},
    region::Region,
};

/// A lazy, finite sequence of positions.
pub type Positions<'a> = Box<dyn Iterator<Item = Position> + 'a>;

/// Common interface of every per-model generator.
pub trait PathGenerator: fmt::Debug + Send + Sync {
    /// Registry key of the model kind.
    fn name(&self) -> &'static str;
    /// Axes owned by the generator, fast axis first.
    fn axes(&self) -> &[AxisName];
    /// Regions checked against every candidate.
    fn regions(&self) -> &[Region];
    /// Candidate count before region exclusion, when known without
    /// iterating.
    fn size(&self) -> Option<u64>;
    /// The generator's own dimension grouping, outer to inner.
    fn dimension_names(&self) -> Vec<Vec<AxisName>>;
    /// A fresh sequence of positions. Each call starts from the beginning;
    /// sequences never share a cursor.
    fn positions(&self) -> Positions<'_>;

    /// The first position, if any candidate is accepted.
    fn first_point(&self) -> Option<Position> {
        self.positions().next()
    }

    /// Upper bound on the number of positions emitted, known without
    /// iterating. Saturates at `u64::MAX` when no finite bound is known.
    fn max_size(&self) -> u64 {
        self.size().unwrap_or(u64::MAX)
    }

    /// Extent of each of the generator's own dimensions, outer to inner.
    ///
    /// A generator with a single dimension reports its accepted count.
    fn shape(&self) -> Vec<u64> {
        if self.dimension_names().is_empty() {
            Vec::new()
        } else {
            vec![self.accepted_count()]
        }
    }

    /// Number of positions the generator actually emits.
    ///
    /// Uses [`PathGenerator::size`] when no region can reject candidates and
    /// falls back to a full enumeration otherwise.
    fn accepted_count(&self) -> u64 {
        match self.size() {
            Some(size) if self.regions().is_empty() => size,
            _ => self.positions().count() as u64,
        }
    }
}

/// Build the generator for `model`, constrained by every region in `regions`
/// whose axes the model owns.
///
/// The model is validated first; regions bound to other axes are ignored.
pub fn create(model: &Model, regions: &[Region]) -> error::Result<Box<dyn PathGenerator>> {
    model.validate()?;
    let axes = model.axes();
    let local = RegionFilter::new(
        regions
            .iter()
            .filter(|region| !axes.is_empty() && region.within(&axes))
            .cloned()
            .collect(),
    );
    Ok(match model {
        Model::Step(m) => Box::new(axial::StepGenerator::new(m, local)),
        Model::Array(m) => Box::new(axial::ArrayGenerator::new(m, local)),
        Model::MultiStep(m) => Box::new(axial::MultiStepGenerator::new(m, local)),
        Model::AxialPoints(m) => Box::new(axial::AxialPointsGenerator::new(m, local)),
        Model::Line(m) => Box::new(raster::LineGenerator::new(m, local)),
        Model::LineStep(m) => Box::new(raster::LineGenerator::stepped(m, local)),
        Model::Grid(m) => Box::new(raster::GridGenerator::new(m, local)),
        Model::GridStep(m) => Box::new(raster::GridGenerator::stepped(m, local)),
        Model::Spiral(m) => Box::new(spiral::SpiralGenerator::new(m, local)),
        Model::Lissajous(m) => Box::new(lissajous::LissajousGenerator::new(m, local)),
        Model::SinglePoint(m) => Box::new(fixed::SinglePointGenerator::new(m, local)),
        Model::Static(_) => Box::new(fixed::StaticGenerator),
        Model::Compound(m) => Box::new(nested::NestedGenerator::new(m, local)?),
    })
}

/// The regions a single generator checks its candidates against.
#[derive(Clone, Debug, Default)]
pub struct RegionFilter {
    /// Regions whose axes all belong to the generator.
    regions: Vec<Region>,
}

impl RegionFilter {
    /// Wrap a set of regions.
    pub fn new(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    /// Whether every region contains the candidate.
    pub fn accepts(&self, candidate: &Position) -> bool {
        self.regions
            .iter()
            .all(|region| region.contains_position(candidate))
    }

    /// The wrapped regions.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }
}

/// The `i`-th of `n` evenly spaced values covering `start..=start + length`.
/// A single point sits at `start`.
pub(crate) fn linspace(start: f64, length: f64, n: u64, i: u64) -> f64 {
    if n <= 1 {
        start
    } else {
        start + length * i as f64 / (n - 1) as f64
    }
}

/// Dimension grouping shared by two-axis generators: one group, slow first.
pub(crate) fn planar_dimensions(fast: &AxisName, slow: &AxisName) -> Vec<Vec<AxisName>> {
    vec![vec![slow.clone(), fast.clone()]]
}
