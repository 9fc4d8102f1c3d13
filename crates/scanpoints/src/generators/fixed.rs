use std::iter;

use super::{PathGenerator, Positions, RegionFilter, planar_dimensions};
use crate::{
    model::SinglePointModel,
    position::{AxisName, Position},
    region::Region,
};

/// Generator for [`StaticModel`](crate::model::StaticModel): a single empty
/// position. Nested inside a compound scan it leaves the other models'
/// points untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticGenerator;

impl PathGenerator for StaticGenerator {
    fn name(&self) -> &'static str {
        "static"
    }
    fn axes(&self) -> &[AxisName] {
        &[]
    }
    fn regions(&self) -> &[Region] {
        &[]
    }
    fn size(&self) -> Option<u64> {
        Some(1)
    }
    fn dimension_names(&self) -> Vec<Vec<AxisName>> {
        Vec::new()
    }
    fn positions(&self) -> Positions<'_> {
        Box::new(iter::once(Position::empty()))
    }
}

/// Generator for [`SinglePointModel`]: one point, indexed `0` on both axes,
/// or nothing when a region excludes it.
#[derive(Debug)]
pub struct SinglePointGenerator {
    /// `[fast, slow]`.
    axes: [AxisName; 2],
    /// Coordinates as `(fast, slow)`.
    point: (f64, f64),
    /// Regions over the point's axes.
    filter: RegionFilter,
}

impl SinglePointGenerator {
    /// Build from a validated model.
    pub fn new(model: &SinglePointModel, filter: RegionFilter) -> Self {
        Self {
            axes: [model.fast_axis.clone(), model.slow_axis.clone()],
            point: (model.fast_value, model.slow_value),
            filter,
        }
    }
}

impl PathGenerator for SinglePointGenerator {
    fn name(&self) -> &'static str {
        "point"
    }
    fn axes(&self) -> &[AxisName] {
        &self.axes
    }
    fn regions(&self) -> &[Region] {
        self.filter.regions()
    }
    fn size(&self) -> Option<u64> {
        Some(1)
    }
    fn dimension_names(&self) -> Vec<Vec<AxisName>> {
        let [fast, slow] = &self.axes;
        planar_dimensions(fast, slow)
    }
    fn positions(&self) -> Positions<'_> {
        let [fast, slow] = &self.axes;
        let point = Position::single(fast, self.point.0, Some(0)).with(slow, self.point.1, Some(0));
        Box::new(iter::once(point).filter(|p| self.filter.accepts(p)))
    }
}
