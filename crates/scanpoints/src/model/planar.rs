//! Two-axis models: lines, grids, spirals and Lissajous figures bounded by a
//! box, plus a single fixed point.

use super::{STEP_TOLERANCE, require_axis_name, require_finite};
use crate::{
    error::{self, validation},
    position::AxisName,
};

/// Rectangular extent on the fast and slow axes of a two-axis model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Fast-axis coordinate of the start corner.
    pub fast_axis_start: f64,
    /// Extent along the fast axis; must be positive.
    pub fast_axis_length: f64,
    /// Slow-axis coordinate of the start corner.
    pub slow_axis_start: f64,
    /// Extent along the slow axis; must be positive.
    pub slow_axis_length: f64,
}

impl BoundingBox {
    /// Create a box from its start corner and lengths.
    pub fn new(
        fast_axis_start: f64,
        slow_axis_start: f64,
        fast_axis_length: f64,
        slow_axis_length: f64,
    ) -> Self {
        Self {
            fast_axis_start,
            fast_axis_length,
            slow_axis_start,
            slow_axis_length,
        }
    }

    /// Centre of the box as `(fast, slow)`.
    pub fn centre(&self) -> (f64, f64) {
        (
            self.fast_axis_start + self.fast_axis_length / 2.0,
            self.slow_axis_start + self.slow_axis_length / 2.0,
        )
    }

    /// Distance from the centre to a corner.
    pub fn half_diagonal(&self) -> f64 {
        (self.fast_axis_length / 2.0).hypot(self.slow_axis_length / 2.0)
    }

    /// Reject non-finite coordinates and non-positive lengths.
    fn validate(&self, kind: &str) -> error::Result<()> {
        require_finite(kind, "fast axis start", self.fast_axis_start)?;
        require_finite(kind, "slow axis start", self.slow_axis_start)?;
        require_finite(kind, "fast axis length", self.fast_axis_length)?;
        require_finite(kind, "slow axis length", self.slow_axis_length)?;
        if self.fast_axis_length <= 0.0 || self.slow_axis_length <= 0.0 {
            return validation(format!(
                "{kind}: bounding box lengths must be positive, got {} x {}",
                self.fast_axis_length, self.slow_axis_length
            ));
        }
        Ok(())
    }
}

/// Checks shared by every two-axis model.
fn validate_planar(
    kind: &str,
    fast_axis: &AxisName,
    slow_axis: &AxisName,
    bounding_box: &BoundingBox,
) -> error::Result<()> {
    require_axis_name(kind, fast_axis)?;
    require_axis_name(kind, slow_axis)?;
    if fast_axis == slow_axis {
        return validation(format!(
            "{kind}: fast and slow axes must differ, both are '{fast_axis}'"
        ));
    }
    bounding_box.validate(kind)
}

/// Points needed to cross `length` in increments of `step`, both ends
/// included, or `None` when the count does not fit in a `u64`.
fn points_across(length: f64, step: f64) -> Option<u64> {
    let span = (length / step + STEP_TOLERANCE).floor().max(0.0);
    if span.is_finite() && span < u64::MAX as f64 {
        (span as u64).checked_add(1)
    } else {
        None
    }
}

/// Reject a step that is not a positive finite length.
fn require_positive_step(kind: &str, field: &str, step: f64) -> error::Result<()> {
    require_finite(kind, field, step)?;
    if step <= 0.0 {
        return validation(format!("{kind}: {field} must be positive, got {step}"));
    }
    Ok(())
}

/// `count` evenly spaced points from the box's start corner to the opposite
/// corner.
#[derive(Clone, Debug, PartialEq)]
pub struct LineModel {
    /// Fast axis name.
    pub fast_axis: AxisName,
    /// Slow axis name.
    pub slow_axis: AxisName,
    /// Box whose diagonal the line follows.
    pub bounding_box: BoundingBox,
    /// Number of points; must be at least one.
    pub count: u64,
}

impl LineModel {
    /// Create a line model.
    pub fn new(
        fast_axis: impl Into<AxisName>,
        slow_axis: impl Into<AxisName>,
        bounding_box: BoundingBox,
        count: u64,
    ) -> Self {
        Self {
            fast_axis: fast_axis.into(),
            slow_axis: slow_axis.into(),
            bounding_box,
            count,
        }
    }

    /// Reject empty lines and degenerate boxes.
    pub fn validate(&self) -> error::Result<()> {
        validate_planar("line", &self.fast_axis, &self.slow_axis, &self.bounding_box)?;
        if self.count == 0 {
            return validation("line: at least one point is required");
        }
        Ok(())
    }
}

/// A `rows × columns` raster over a box, slow axis outermost.
#[derive(Clone, Debug, PartialEq)]
pub struct GridModel {
    /// Fast (inner) axis name.
    pub fast_axis: AxisName,
    /// Slow (outer) axis name.
    pub slow_axis: AxisName,
    /// Box the raster spans, edge to edge.
    pub bounding_box: BoundingBox,
    /// Points along the slow axis.
    pub rows: u64,
    /// Points along the fast axis.
    pub columns: u64,
    /// Reverse the fast-axis direction on every other row.
    pub snake: bool,
}

impl GridModel {
    /// Create a raster grid model.
    pub fn new(
        fast_axis: impl Into<AxisName>,
        slow_axis: impl Into<AxisName>,
        bounding_box: BoundingBox,
        rows: u64,
        columns: u64,
    ) -> Self {
        Self {
            fast_axis: fast_axis.into(),
            slow_axis: slow_axis.into(),
            bounding_box,
            rows,
            columns,
            snake: false,
        }
    }

    /// Enable or disable boustrophedon rows, returning the model.
    pub fn with_snake(mut self, snake: bool) -> Self {
        self.snake = snake;
        self
    }

    /// Reject empty grids and degenerate boxes.
    pub fn validate(&self) -> error::Result<()> {
        validate_planar("grid", &self.fast_axis, &self.slow_axis, &self.bounding_box)?;
        if self.rows == 0 || self.columns == 0 {
            return validation(format!(
                "grid: rows and columns must be at least one, got {} x {}",
                self.rows, self.columns
            ));
        }
        if self.rows.checked_mul(self.columns).is_none() {
            return validation("grid: rows x columns overflows");
        }
        Ok(())
    }
}

/// A Fermat spiral centred in a box, growing until it leaves the box's
/// circumscribed circle.
#[derive(Clone, Debug, PartialEq)]
pub struct SpiralModel {
    /// Fast axis name.
    pub fast_axis: AxisName,
    /// Slow axis name.
    pub slow_axis: AxisName,
    /// Box that centres and bounds the spiral.
    pub bounding_box: BoundingBox,
    /// Radial distance between successive turns; must be non-zero.
    pub scale: f64,
}

impl SpiralModel {
    /// Create a spiral model.
    pub fn new(
        fast_axis: impl Into<AxisName>,
        slow_axis: impl Into<AxisName>,
        bounding_box: BoundingBox,
        scale: f64,
    ) -> Self {
        Self {
            fast_axis: fast_axis.into(),
            slow_axis: slow_axis.into(),
            bounding_box,
            scale,
        }
    }

    /// Reject a zero scale and degenerate boxes.
    pub fn validate(&self) -> error::Result<()> {
        validate_planar("spiral", &self.fast_axis, &self.slow_axis, &self.bounding_box)?;
        require_finite("spiral", "scale", self.scale)?;
        if self.scale == 0.0 {
            return validation("spiral: scale must be non-zero");
        }
        Ok(())
    }
}

/// A Lissajous figure inscribed in a box.
#[derive(Clone, Debug, PartialEq)]
pub struct LissajousModel {
    /// Fast axis name.
    pub fast_axis: AxisName,
    /// Slow axis name.
    pub slow_axis: AxisName,
    /// Box the figure is inscribed in.
    pub bounding_box: BoundingBox,
    /// Number of accepted points to emit.
    pub points: u64,
    /// Angular frequency on the fast axis.
    pub freq_a: f64,
    /// Angular frequency on the slow axis.
    pub freq_b: f64,
    /// Phase offset applied to the fast axis.
    pub phase_delta: f64,
    /// Increment of the curve parameter between candidates.
    pub theta_step: f64,
}

impl LissajousModel {
    /// Create a Lissajous model with unit fast frequency, a slow frequency of
    /// `0.25`, no phase offset and a parameter step of `0.05`.
    pub fn new(
        fast_axis: impl Into<AxisName>,
        slow_axis: impl Into<AxisName>,
        bounding_box: BoundingBox,
        points: u64,
    ) -> Self {
        Self {
            fast_axis: fast_axis.into(),
            slow_axis: slow_axis.into(),
            bounding_box,
            points,
            freq_a: 1.0,
            freq_b: 0.25,
            phase_delta: 0.0,
            theta_step: 0.05,
        }
    }

    /// Set both angular frequencies, returning the model.
    pub fn with_frequencies(mut self, freq_a: f64, freq_b: f64) -> Self {
        self.freq_a = freq_a;
        self.freq_b = freq_b;
        self
    }

    /// Set the fast-axis phase offset, returning the model.
    pub fn with_phase_delta(mut self, phase_delta: f64) -> Self {
        self.phase_delta = phase_delta;
        self
    }

    /// Set the parameter increment, returning the model.
    pub fn with_theta_step(mut self, theta_step: f64) -> Self {
        self.theta_step = theta_step;
        self
    }

    /// Reject empty figures, a zero parameter step and degenerate boxes.
    pub fn validate(&self) -> error::Result<()> {
        validate_planar("lissajous", &self.fast_axis, &self.slow_axis, &self.bounding_box)?;
        require_finite("lissajous", "freq_a", self.freq_a)?;
        require_finite("lissajous", "freq_b", self.freq_b)?;
        require_finite("lissajous", "phase_delta", self.phase_delta)?;
        require_finite("lissajous", "theta_step", self.theta_step)?;
        if self.points == 0 {
            return validation("lissajous: at least one point is required");
        }
        if self.theta_step == 0.0 {
            return validation("lissajous: theta_step must be non-zero");
        }
        Ok(())
    }
}

/// A raster over a box described by step sizes instead of point counts.
///
/// Steps that do not divide the box evenly leave the far edge unvisited:
/// [`GridStepModel::enforce_shape`] shrinks the box to the last reachable
/// row and column.
#[derive(Clone, Debug, PartialEq)]
pub struct GridStepModel {
    /// Fast (inner) axis name.
    pub fast_axis: AxisName,
    /// Slow (outer) axis name.
    pub slow_axis: AxisName,
    /// Box the raster starts in.
    pub bounding_box: BoundingBox,
    /// Distance between columns; must be positive.
    pub fast_axis_step: f64,
    /// Distance between rows; must be positive.
    pub slow_axis_step: f64,
    /// Reverse the fast-axis direction on every other row.
    pub snake: bool,
}

impl GridStepModel {
    /// Create a stepped raster model.
    pub fn new(
        fast_axis: impl Into<AxisName>,
        slow_axis: impl Into<AxisName>,
        bounding_box: BoundingBox,
        fast_axis_step: f64,
        slow_axis_step: f64,
    ) -> Self {
        Self {
            fast_axis: fast_axis.into(),
            slow_axis: slow_axis.into(),
            bounding_box,
            fast_axis_step,
            slow_axis_step,
            snake: false,
        }
    }

    /// Enable or disable boustrophedon rows, returning the model.
    pub fn with_snake(mut self, snake: bool) -> Self {
        self.snake = snake;
        self
    }

    /// The equivalent point-count grid.
    ///
    /// The box keeps its start corner; each length becomes
    /// `(points - 1) * step`, or stays as it was when only one point fits.
    /// Only meaningful once validated.
    pub fn enforce_shape(&self) -> GridModel {
        let b = &self.bounding_box;
        let columns = points_across(b.fast_axis_length, self.fast_axis_step).unwrap_or(u64::MAX);
        let rows = points_across(b.slow_axis_length, self.slow_axis_step).unwrap_or(u64::MAX);
        let fitted = |length: f64, step: f64, n: u64| {
            if n > 1 { (n - 1) as f64 * step } else { length }
        };
        let shrunk = BoundingBox::new(
            b.fast_axis_start,
            b.slow_axis_start,
            fitted(b.fast_axis_length, self.fast_axis_step, columns),
            fitted(b.slow_axis_length, self.slow_axis_step, rows),
        );
        GridModel::new(
            self.fast_axis.clone(),
            self.slow_axis.clone(),
            shrunk,
            rows,
            columns,
        )
        .with_snake(self.snake)
    }

    /// Reject non-positive steps, degenerate boxes and rasters too large to
    /// count.
    pub fn validate(&self) -> error::Result<()> {
        validate_planar("gridstep", &self.fast_axis, &self.slow_axis, &self.bounding_box)?;
        require_positive_step("gridstep", "fast axis step", self.fast_axis_step)?;
        require_positive_step("gridstep", "slow axis step", self.slow_axis_step)?;
        let b = &self.bounding_box;
        if points_across(b.fast_axis_length, self.fast_axis_step).is_none()
            || points_across(b.slow_axis_length, self.slow_axis_step).is_none()
        {
            return validation(format!(
                "gridstep: steps {} x {} yield more than {} points per axis",
                self.fast_axis_step,
                self.slow_axis_step,
                u64::MAX
            ));
        }
        self.enforce_shape().validate()
    }
}

/// Points along a box diagonal spaced by a fixed distance, starting at the
/// box's start corner.
#[derive(Clone, Debug, PartialEq)]
pub struct LineStepModel {
    /// Fast axis name.
    pub fast_axis: AxisName,
    /// Slow axis name.
    pub slow_axis: AxisName,
    /// Box whose diagonal the line follows.
    pub bounding_box: BoundingBox,
    /// Distance between successive points along the diagonal.
    pub step: f64,
}

impl LineStepModel {
    /// Create a stepped line model.
    pub fn new(
        fast_axis: impl Into<AxisName>,
        slow_axis: impl Into<AxisName>,
        bounding_box: BoundingBox,
        step: f64,
    ) -> Self {
        Self {
            fast_axis: fast_axis.into(),
            slow_axis: slow_axis.into(),
            bounding_box,
            step,
        }
    }

    /// The equivalent point-count line, its box scaled down so the last
    /// point lands on the far corner. Only meaningful once validated.
    pub fn enforce_shape(&self) -> LineModel {
        let b = &self.bounding_box;
        let diagonal = b.fast_axis_length.hypot(b.slow_axis_length);
        let count = points_across(diagonal, self.step).unwrap_or(u64::MAX);
        let ratio = if count > 1 {
            (count - 1) as f64 * self.step / diagonal
        } else {
            1.0
        };
        let scaled = BoundingBox::new(
            b.fast_axis_start,
            b.slow_axis_start,
            b.fast_axis_length * ratio,
            b.slow_axis_length * ratio,
        );
        LineModel::new(self.fast_axis.clone(), self.slow_axis.clone(), scaled, count)
    }

    /// Reject non-positive steps and degenerate boxes.
    pub fn validate(&self) -> error::Result<()> {
        validate_planar("linestep", &self.fast_axis, &self.slow_axis, &self.bounding_box)?;
        require_positive_step("linestep", "step", self.step)?;
        let b = &self.bounding_box;
        if points_across(b.fast_axis_length.hypot(b.slow_axis_length), self.step).is_none() {
            return validation(format!(
                "linestep: step {} yields more than {} points",
                self.step,
                u64::MAX
            ));
        }
        Ok(())
    }
}

/// A single point on two axes.
#[derive(Clone, Debug, PartialEq)]
pub struct SinglePointModel {
    /// Fast axis name.
    pub fast_axis: AxisName,
    /// Slow axis name.
    pub slow_axis: AxisName,
    /// Fast-axis coordinate.
    pub fast_value: f64,
    /// Slow-axis coordinate.
    pub slow_value: f64,
}

impl SinglePointModel {
    /// Create a single-point model.
    pub fn new(
        fast_axis: impl Into<AxisName>,
        slow_axis: impl Into<AxisName>,
        fast_value: f64,
        slow_value: f64,
    ) -> Self {
        Self {
            fast_axis: fast_axis.into(),
            slow_axis: slow_axis.into(),
            fast_value,
            slow_value,
        }
    }

    /// Reject non-finite coordinates and coinciding axes.
    pub fn validate(&self) -> error::Result<()> {
        require_axis_name("point", &self.fast_axis)?;
        require_axis_name("point", &self.slow_axis)?;
        if self.fast_axis == self.slow_axis {
            return validation(format!(
                "point: fast and slow axes must differ, both are '{}'",
                self.fast_axis
            ));
        }
        require_finite("point", "fast value", self.fast_value)?;
        require_finite("point", "slow value", self.slow_value)
    }
}
