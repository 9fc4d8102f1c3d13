//! Immutable descriptions of single path shapes.
//!
//! A [`Model`] only carries parameters. Turning it into positions is the job
//! of [`crate::generators`]; every model must pass [`Model::validate`] before
//! a generator is built from it.

mod axial;
mod planar;

pub use self::{
    axial::{ArrayModel, AxialPointsModel, MultiStepModel, StepModel, StepSegment},
    planar::{
        BoundingBox, GridModel, GridStepModel, LineModel, LineStepModel, LissajousModel,
        SinglePointModel, SpiralModel,
    },
};
use crate::{
    compound::CompoundModel,
    dimension,
    error::{self, validation},
    position::AxisName,
};

/// Relative slack when counting how many steps fit between two bounds, so
/// that 1 to 4 in steps of 0.6 yields six points despite rounding.
const STEP_TOLERANCE: f64 = 1e-9;

/// A zero-dimension model that produces one empty position.
///
/// Used for bookkeeping-only scans that trigger detectors without moving.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StaticModel;

/// One path shape and its numeric parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum Model {
    /// Evenly stepped values along one axis.
    Step(StepModel),
    /// Explicit values along one axis.
    Array(ArrayModel),
    /// Concatenated step segments along one axis.
    MultiStep(MultiStepModel),
    /// A fixed number of evenly spaced values along one axis.
    AxialPoints(AxialPointsModel),
    /// Evenly spaced points along a box diagonal.
    Line(LineModel),
    /// Points along a box diagonal at a fixed spacing.
    LineStep(LineStepModel),
    /// Raster over a box.
    Grid(GridModel),
    /// Raster over a box at fixed step sizes.
    GridStep(GridStepModel),
    /// Fermat spiral bounded by a box.
    Spiral(SpiralModel),
    /// Lissajous figure inscribed in a box.
    Lissajous(LissajousModel),
    /// One fixed point on two axes.
    SinglePoint(SinglePointModel),
    /// Single point with no axes.
    Static(StaticModel),
    /// A whole compound scan nested as one model.
    Compound(CompoundModel),
}

impl Model {
    /// Registry key of the model kind (see [`crate::registry`]).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Step(_) => "step",
            Self::Array(_) => "array",
            Self::MultiStep(_) => "multistep",
            Self::AxialPoints(_) => "axispoints",
            Self::Line(_) => "line",
            Self::LineStep(_) => "linestep",
            Self::Grid(_) => "grid",
            Self::GridStep(_) => "gridstep",
            Self::Spiral(_) => "spiral",
            Self::Lissajous(_) => "lissajous",
            Self::SinglePoint(_) => "point",
            Self::Static(_) => "static",
            Self::Compound(_) => "compound",
        }
    }

    /// Axis names owned by the model. Two-axis models list the fast axis
    /// first. Static models own no axes; a nested compound owns every axis
    /// of its models, outermost model first.
    pub fn axes(&self) -> Vec<AxisName> {
        match self {
            Self::Step(m) => vec![m.axis.clone()],
            Self::Array(m) => vec![m.axis.clone()],
            Self::MultiStep(m) => vec![m.axis.clone()],
            Self::AxialPoints(m) => vec![m.axis.clone()],
            Self::Line(m) => vec![m.fast_axis.clone(), m.slow_axis.clone()],
            Self::LineStep(m) => vec![m.fast_axis.clone(), m.slow_axis.clone()],
            Self::Grid(m) => vec![m.fast_axis.clone(), m.slow_axis.clone()],
            Self::GridStep(m) => vec![m.fast_axis.clone(), m.slow_axis.clone()],
            Self::Spiral(m) => vec![m.fast_axis.clone(), m.slow_axis.clone()],
            Self::Lissajous(m) => vec![m.fast_axis.clone(), m.slow_axis.clone()],
            Self::SinglePoint(m) => vec![m.fast_axis.clone(), m.slow_axis.clone()],
            Self::Static(_) => Vec::new(),
            Self::Compound(m) => m.models().iter().flat_map(Self::axes).collect(),
        }
    }

    /// The model's own dimension grouping, outer to inner.
    ///
    /// One-axis models report one group. Two-axis models always co-vary, so
    /// they report a single group holding both axes, slow axis first. Static
    /// models report none. A nested compound reports the dimensions its own
    /// models and regions flatten into.
    pub fn dimension_names(&self) -> Vec<Vec<AxisName>> {
        if let Self::Compound(m) = self {
            let groups: Vec<_> = m.models().iter().map(Self::dimension_names).collect();
            return dimension::flatten(&groups, m.regions())
                .iter()
                .map(|d| d.axes().to_vec())
                .collect();
        }
        match self.axes().as_slice() {
            [] => Vec::new(),
            [axis] => vec![vec![axis.clone()]],
            [fast, slow] => vec![vec![slow.clone(), fast.clone()]],
            axes => vec![axes.to_vec()],
        }
    }

    /// Check the parameters for degenerate values.
    ///
    /// Pure: never modifies the model.
    pub fn validate(&self) -> error::Result<()> {
        match self {
            Self::Step(m) => m.validate(),
            Self::Array(m) => m.validate(),
            Self::MultiStep(m) => m.validate(),
            Self::AxialPoints(m) => m.validate(),
            Self::Line(m) => m.validate(),
            Self::LineStep(m) => m.validate(),
            Self::Grid(m) => m.validate(),
            Self::GridStep(m) => m.validate(),
            Self::Spiral(m) => m.validate(),
            Self::Lissajous(m) => m.validate(),
            Self::SinglePoint(m) => m.validate(),
            Self::Static(_) => Ok(()),
            Self::Compound(m) => m.validate(),
        }
    }
}

/// Implement `From<$ty> for Model` for each listed variant.
macro_rules! model_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Model {
                fn from(model: $ty) -> Self {
                    Self::$variant(model)
                }
            }
        )*
    };
}

model_from! {
    Step(StepModel),
    Array(ArrayModel),
    MultiStep(MultiStepModel),
    AxialPoints(AxialPointsModel),
    Line(LineModel),
    LineStep(LineStepModel),
    Grid(GridModel),
    GridStep(GridStepModel),
    Spiral(SpiralModel),
    Lissajous(LissajousModel),
    SinglePoint(SinglePointModel),
    Static(StaticModel),
    Compound(CompoundModel),
}

/// Reject non-finite parameters.
fn require_finite(kind: &str, field: &str, value: f64) -> error::Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        validation(format!("{kind}: {field} must be finite, got {value}"))
    }
}

/// Reject empty axis names.
fn require_axis_name(kind: &str, axis: &AxisName) -> error::Result<()> {
    if axis.trim().is_empty() {
        validation(format!("{kind}: axis names must not be empty"))
    } else {
        Ok(())
    }
}
