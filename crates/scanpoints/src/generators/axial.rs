use super::{PathGenerator, Positions, RegionFilter, linspace};
use crate::{
    model::{ArrayModel, AxialPointsModel, MultiStepModel, StepModel, StepSegment},
    position::{AxisName, Position},
    region::Region,
};

/// Generator for [`StepModel`].
#[derive(Debug)]
pub struct StepGenerator {
    /// The single stepped axis.
    axes: [AxisName; 1],
    /// The stepped run.
    segment: StepSegment,
    /// Regions over the axis.
    filter: RegionFilter,
}

impl StepGenerator {
    /// Build from a validated model.
    pub fn new(model: &StepModel, filter: RegionFilter) -> Self {
        Self {
            axes: [model.axis.clone()],
            segment: model.segment(),
            filter,
        }
    }
}

impl PathGenerator for StepGenerator {
    fn name(&self) -> &'static str {
        "step"
    }
    fn axes(&self) -> &[AxisName] {
        &self.axes
    }
    fn regions(&self) -> &[Region] {
        self.filter.regions()
    }
    fn size(&self) -> Option<u64> {
        Some(self.segment.count())
    }
    fn dimension_names(&self) -> Vec<Vec<AxisName>> {
        vec![self.axes.to_vec()]
    }
    fn positions(&self) -> Positions<'_> {
        let [axis] = &self.axes;
        let segment = self.segment;
        let filter = &self.filter;
        Box::new(
            (0..segment.count())
                .map(move |i| Position::single(axis, segment.value(i), Some(i)))
                .filter(move |p| filter.accepts(p)),
        )
    }
}

/// Generator for [`ArrayModel`].
#[derive(Debug)]
pub struct ArrayGenerator {
    /// The single axis.
    axes: [AxisName; 1],
    /// Values in emission order.
    values: Vec<f64>,
    /// Regions over the axis.
    filter: RegionFilter,
}

impl ArrayGenerator {
    /// Build from a validated model.
    pub fn new(model: &ArrayModel, filter: RegionFilter) -> Self {
        Self {
            axes: [model.axis.clone()],
            values: model.values.clone(),
            filter,
        }
    }
}

impl PathGenerator for ArrayGenerator {
    fn name(&self) -> &'static str {
        "array"
    }
    fn axes(&self) -> &[AxisName] {
        &self.axes
    }
    fn regions(&self) -> &[Region] {
        self.filter.regions()
    }
    fn size(&self) -> Option<u64> {
        Some(self.values.len() as u64)
    }
    fn dimension_names(&self) -> Vec<Vec<AxisName>> {
        vec![self.axes.to_vec()]
    }
    fn positions(&self) -> Positions<'_> {
        let [axis] = &self.axes;
        let filter = &self.filter;
        Box::new(
            self.values
                .iter()
                .zip(0u64..)
                .map(move |(&value, i)| Position::single(axis, value, Some(i)))
                .filter(move |p| filter.accepts(p)),
        )
    }
}

/// Generator for [`MultiStepModel`]. Indices continue across segments.
#[derive(Debug)]
pub struct MultiStepGenerator {
    /// The single axis.
    axes: [AxisName; 1],
    /// Segments in emission order.
    segments: Vec<StepSegment>,
    /// Regions over the axis.
    filter: RegionFilter,
}

impl MultiStepGenerator {
    /// Build from a validated model.
    pub fn new(model: &MultiStepModel, filter: RegionFilter) -> Self {
        Self {
            axes: [model.axis.clone()],
            segments: model.segments.clone(),
            filter,
        }
    }
}

impl PathGenerator for MultiStepGenerator {
    fn name(&self) -> &'static str {
        "multistep"
    }
    fn axes(&self) -> &[AxisName] {
        &self.axes
    }
    fn regions(&self) -> &[Region] {
        self.filter.regions()
    }
    fn size(&self) -> Option<u64> {
        Some(StepSegment::total(&self.segments).unwrap_or(u64::MAX))
    }
    fn dimension_names(&self) -> Vec<Vec<AxisName>> {
        vec![self.axes.to_vec()]
    }
    fn positions(&self) -> Positions<'_> {
        let [axis] = &self.axes;
        let filter = &self.filter;
        Box::new(
            self.segments
                .iter()
                .scan(0u64, |offset, segment| {
                    let first = *offset;
                    *offset = first.saturating_add(segment.count());
                    Some((first, *segment))
                })
                .flat_map(move |(first, segment)| {
                    (0..segment.count())
                        .map(move |i| Position::single(axis, segment.value(i), Some(first + i)))
                })
                .filter(move |p| filter.accepts(p)),
        )
    }
}

/// Generator for [`AxialPointsModel`]: `points` values spread evenly from
/// start to stop inclusive.
#[derive(Debug)]
pub struct AxialPointsGenerator {
    /// The single axis.
    axes: [AxisName; 1],
    /// First value.
    start: f64,
    /// Signed distance from first to last value.
    length: f64,
    /// Number of values.
    points: u64,
    /// Regions over the axis.
    filter: RegionFilter,
}

impl AxialPointsGenerator {
    /// Build from a validated model.
    pub fn new(model: &AxialPointsModel, filter: RegionFilter) -> Self {
        Self {
            axes: [model.axis.clone()],
            start: model.start,
            length: model.stop - model.start,
            points: model.points,
            filter,
        }
    }
}

impl PathGenerator for AxialPointsGenerator {
    fn name(&self) -> &'static str {
        "axispoints"
    }
    fn axes(&self) -> &[AxisName] {
        &self.axes
    }
    fn regions(&self) -> &[Region] {
        self.filter.regions()
    }
    fn size(&self) -> Option<u64> {
        Some(self.points)
    }
    fn dimension_names(&self) -> Vec<Vec<AxisName>> {
        vec![self.axes.to_vec()]
    }
    fn positions(&self) -> Positions<'_> {
        let [axis] = &self.axes;
        let (start, length, n) = (self.start, self.length, self.points);
        let filter = &self.filter;
        Box::new(
            (0..n)
                .map(move |i| Position::single(axis, linspace(start, length, n, i), Some(i)))
                .filter(move |p| filter.accepts(p)),
        )
    }
}
