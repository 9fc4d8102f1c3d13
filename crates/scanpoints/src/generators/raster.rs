use super::{PathGenerator, Positions, RegionFilter, linspace, planar_dimensions};
use crate::{
    model::{BoundingBox, GridModel, GridStepModel, LineModel, LineStepModel},
    position::{AxisName, Position},
    region::Region,
};

/// Generator for [`LineModel`] and [`LineStepModel`]: points along the box
/// diagonal, both axes indexed by the point number.
#[derive(Debug)]
pub struct LineGenerator {
    /// Registry key of the model the line was built from.
    kind: &'static str,
    /// `[fast, slow]`.
    axes: [AxisName; 2],
    /// Box whose diagonal is followed.
    bounding_box: BoundingBox,
    /// Number of points.
    count: u64,
    /// Regions over the line's axes.
    filter: RegionFilter,
}

impl LineGenerator {
    /// Build from a validated model.
    pub fn new(model: &LineModel, filter: RegionFilter) -> Self {
        Self {
            kind: "line",
            axes: [model.fast_axis.clone(), model.slow_axis.clone()],
            bounding_box: model.bounding_box,
            count: model.count,
            filter,
        }
    }

    /// Build from a validated stepped line, shrunk to its last whole step.
    pub fn stepped(model: &LineStepModel, filter: RegionFilter) -> Self {
        Self {
            kind: "linestep",
            ..Self::new(&model.enforce_shape(), filter)
        }
    }
}

impl PathGenerator for LineGenerator {
    fn name(&self) -> &'static str {
        self.kind
    }
    fn axes(&self) -> &[AxisName] {
        &self.axes
    }
    fn regions(&self) -> &[Region] {
        self.filter.regions()
    }
    fn size(&self) -> Option<u64> {
        Some(self.count)
    }
    fn dimension_names(&self) -> Vec<Vec<AxisName>> {
        let [fast, slow] = &self.axes;
        planar_dimensions(fast, slow)
    }
    fn positions(&self) -> Positions<'_> {
        let [fast, slow] = &self.axes;
        let b = self.bounding_box;
        let n = self.count;
        let filter = &self.filter;
        Box::new(
            (0..n)
                .map(move |i| {
                    let x = linspace(b.fast_axis_start, b.fast_axis_length, n, i);
                    let y = linspace(b.slow_axis_start, b.slow_axis_length, n, i);
                    Position::single(fast, x, Some(i)).with(slow, y, Some(i))
                })
                .filter(move |p| filter.accepts(p)),
        )
    }
}

/// Generator for [`GridModel`] and [`GridStepModel`]: row-major raster, slow
/// axis outermost.
///
/// With `snake` set, odd rows run the fast axis backwards. Fast-axis indices
/// always name the column actually visited.
#[derive(Debug)]
pub struct GridGenerator {
    /// Registry key of the model the raster was built from.
    kind: &'static str,
    /// `[fast, slow]`.
    axes: [AxisName; 2],
    /// Box the raster spans.
    bounding_box: BoundingBox,
    /// Points along the slow axis.
    rows: u64,
    /// Points along the fast axis.
    columns: u64,
    /// Boustrophedon rows.
    snake: bool,
    /// Regions over the grid's axes.
    filter: RegionFilter,
}

impl GridGenerator {
    /// Build from a validated model.
    pub fn new(model: &GridModel, filter: RegionFilter) -> Self {
        Self {
            kind: "grid",
            axes: [model.fast_axis.clone(), model.slow_axis.clone()],
            bounding_box: model.bounding_box,
            rows: model.rows,
            columns: model.columns,
            snake: model.snake,
            filter,
        }
    }

    /// Build from a validated stepped raster, shrunk to its last whole row
    /// and column.
    pub fn stepped(model: &GridStepModel, filter: RegionFilter) -> Self {
        Self {
            kind: "gridstep",
            ..Self::new(&model.enforce_shape(), filter)
        }
    }

    /// The `(row, column)` visited at raster step `k`.
    fn cell(&self, k: u64) -> (u64, u64) {
        let row = k / self.columns;
        let column = k % self.columns;
        if self.snake && row % 2 == 1 {
            (row, self.columns - 1 - column)
        } else {
            (row, column)
        }
    }
}

impl PathGenerator for GridGenerator {
    fn name(&self) -> &'static str {
        self.kind
    }
    fn axes(&self) -> &[AxisName] {
        &self.axes
    }
    fn regions(&self) -> &[Region] {
        self.filter.regions()
    }
    fn size(&self) -> Option<u64> {
        Some(self.rows * self.columns)
    }
    fn dimension_names(&self) -> Vec<Vec<AxisName>> {
        let [fast, slow] = &self.axes;
        planar_dimensions(fast, slow)
    }
    fn positions(&self) -> Positions<'_> {
        let [fast, slow] = &self.axes;
        let b = self.bounding_box;
        Box::new(
            (0..self.rows * self.columns)
                .map(move |k| {
                    let (row, column) = self.cell(k);
                    let x = linspace(b.fast_axis_start, b.fast_axis_length, self.columns, column);
                    let y = linspace(b.slow_axis_start, b.slow_axis_length, self.rows, row);
                    Position::single(fast, x, Some(column)).with(slow, y, Some(row))
                })
                .filter(move |p| self.filter.accepts(p)),
        )
    }
}
