//! One-axis models: step, array, multi-step and axial points.

use super::{STEP_TOLERANCE, require_axis_name, require_finite};
use crate::{
    error::{self, validation},
    position::AxisName,
};

/// A `start → stop` run in increments of `step`, both ends inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepSegment {
    /// First value.
    pub start: f64,
    /// Last value, reached if it lies on the step lattice.
    pub stop: f64,
    /// Signed increment; must point from `start` towards `stop`.
    pub step: f64,
}

impl StepSegment {
    /// Create a new segment.
    pub fn new(start: f64, stop: f64, step: f64) -> Self {
        Self { start, stop, step }
    }

    /// Number of values in the segment. Only meaningful once validated;
    /// saturates at `u64::MAX`.
    pub fn count(&self) -> u64 {
        self.checked_count().unwrap_or(u64::MAX)
    }

    /// Number of values in the segment, or `None` when it does not fit in a
    /// `u64`.
    pub fn checked_count(&self) -> Option<u64> {
        let span = ((self.stop - self.start) / self.step + STEP_TOLERANCE)
            .floor()
            .max(0.0);
        // `u64::MAX as f64` rounds up to 2^64.
        if span.is_finite() && span < u64::MAX as f64 {
            (span as u64).checked_add(1)
        } else {
            None
        }
    }

    /// Total number of values across `segments`, or `None` on overflow.
    pub fn total(segments: &[Self]) -> Option<u64> {
        segments
            .iter()
            .try_fold(0u64, |total, segment| total.checked_add(segment.checked_count()?))
    }

    /// The `i`-th value of the segment.
    pub fn value(&self, i: u64) -> f64 {
        self.start + self.step * i as f64
    }

    /// Check for zero, non-finite or wrongly signed steps.
    fn validate(&self, kind: &str) -> error::Result<()> {
        require_finite(kind, "start", self.start)?;
        require_finite(kind, "stop", self.stop)?;
        require_finite(kind, "step", self.step)?;
        if self.step == 0.0 {
            return validation(format!("{kind}: step must be non-zero"));
        }
        if (self.stop - self.start) * self.step < 0.0 {
            return validation(format!(
                "{kind}: step {} points away from stop {} (start {})",
                self.step, self.stop, self.start
            ));
        }
        if self.checked_count().is_none() {
            return validation(format!(
                "{kind}: {} to {} in steps of {} yields more than {} points",
                self.start,
                self.stop,
                self.step,
                u64::MAX
            ));
        }
        Ok(())
    }
}

/// Evenly stepped values along one axis.
#[derive(Clone, Debug, PartialEq)]
pub struct StepModel {
    /// Axis the values are applied to.
    pub axis: AxisName,
    /// First value.
    pub start: f64,
    /// Last value (inclusive when on the step lattice).
    pub stop: f64,
    /// Signed increment.
    pub step: f64,
}

impl StepModel {
    /// Create a step model.
    pub fn new(axis: impl Into<AxisName>, start: f64, stop: f64, step: f64) -> Self {
        Self {
            axis: axis.into(),
            start,
            stop,
            step,
        }
    }

    /// The model's run as a bare segment.
    pub fn segment(&self) -> StepSegment {
        StepSegment::new(self.start, self.stop, self.step)
    }

    /// Reject zero or wrongly signed steps.
    pub fn validate(&self) -> error::Result<()> {
        require_axis_name("step", &self.axis)?;
        self.segment().validate("step")
    }
}

/// Explicit values along one axis, emitted in the order given.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayModel {
    /// Axis the values are applied to.
    pub axis: AxisName,
    /// The values; must not be empty.
    pub values: Vec<f64>,
}

impl ArrayModel {
    /// Create an array model.
    pub fn new(axis: impl Into<AxisName>, values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            axis: axis.into(),
            values: values.into_iter().collect(),
        }
    }

    /// Reject empty or non-finite arrays.
    pub fn validate(&self) -> error::Result<()> {
        require_axis_name("array", &self.axis)?;
        if self.values.is_empty() {
            return validation("array: at least one value is required");
        }
        self.values
            .iter()
            .try_for_each(|&v| require_finite("array", "value", v))
    }
}

/// Several step segments along one axis, concatenated in order.
#[derive(Clone, Debug, PartialEq)]
pub struct MultiStepModel {
    /// Axis the values are applied to.
    pub axis: AxisName,
    /// Segments in emission order.
    pub segments: Vec<StepSegment>,
}

impl MultiStepModel {
    /// Create a multi-step model.
    pub fn new(axis: impl Into<AxisName>, segments: impl IntoIterator<Item = StepSegment>) -> Self {
        Self {
            axis: axis.into(),
            segments: segments.into_iter().collect(),
        }
    }

    /// Append a segment, returning the model.
    pub fn with_segment(mut self, segment: StepSegment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Total number of values across all segments, saturating at
    /// `u64::MAX`.
    pub fn count(&self) -> u64 {
        StepSegment::total(&self.segments).unwrap_or(u64::MAX)
    }

    /// Reject models with no segments or with any invalid segment.
    pub fn validate(&self) -> error::Result<()> {
        require_axis_name("multistep", &self.axis)?;
        if self.segments.is_empty() {
            return validation("multistep: at least one segment is required");
        }
        self.segments
            .iter()
            .try_for_each(|segment| segment.validate("multistep"))?;
        if StepSegment::total(&self.segments).is_none() {
            return validation(format!(
                "multistep: segments yield more than {} points in total",
                u64::MAX
            ));
        }
        Ok(())
    }
}

/// `points` evenly spaced values from `start` to `stop`, both inclusive.
///
/// A single point sits at `start`.
#[derive(Clone, Debug, PartialEq)]
pub struct AxialPointsModel {
    /// Axis the values are applied to.
    pub axis: AxisName,
    /// First value.
    pub start: f64,
    /// Last value.
    pub stop: f64,
    /// Number of values; must be at least one.
    pub points: u64,
}

impl AxialPointsModel {
    /// Create an axial points model.
    pub fn new(axis: impl Into<AxisName>, start: f64, stop: f64, points: u64) -> Self {
        Self {
            axis: axis.into(),
            start,
            stop,
            points,
        }
    }

    /// Reject empty runs and non-finite bounds.
    pub fn validate(&self) -> error::Result<()> {
        require_axis_name("axispoints", &self.axis)?;
        require_finite("axispoints", "start", self.start)?;
        require_finite("axispoints", "stop", self.stop)?;
        if self.points == 0 {
            return validation("axispoints: at least one point is required");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn step_counts() -> error::Result<()> {
        for (start, stop, step, expected) in [
            (1.0, 4.0, 0.6, 6),
            (290.0, 295.0, 1.0, 6),
            (290.0, 300.0, 1.0, 11),
            (10000.0, 20000.0, 10000.0, 2),
            (0.0, 15.0, 5.0, 4),
            (5.0, 5.0, 1.0, 1),
            (4.0, 1.0, -0.6, 6),
            (0.0, 1.0, 0.3, 4),
        ] {
            let model = StepModel::new("x", start, stop, step);
            model.validate()?;
            assert_eq!(
                model.segment().count(),
                expected,
                "{start} -> {stop} by {step}"
            );
        }
        Ok(())
    }

    #[test]
    fn step_values_do_not_accumulate_error() {
        let segment = StepSegment::new(1.0, 4.0, 0.6);
        assert!((segment.value(5) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_steps() {
        let zero = StepModel::new("x", 0.0, 1.0, 0.0);
        assert!(matches!(zero.validate(), Err(Error::Validation(_))));

        let backwards = StepModel::new("x", 0.0, 5.0, -0.3);
        assert!(matches!(backwards.validate(), Err(Error::Validation(_))));

        let nan = StepModel::new("x", f64::NAN, 5.0, 1.0);
        assert!(matches!(nan.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn empty_array() {
        let empty = ArrayModel::new("x", []);
        assert!(matches!(empty.validate(), Err(Error::Validation(_))));
        assert!(ArrayModel::new("x", [0.0, 1.0, 2.0]).validate().is_ok());
    }

    #[test]
    fn multistep() -> error::Result<()> {
        let model = MultiStepModel::new("energy", [StepSegment::new(10.0, 20.0, 5.0)])
            .with_segment(StepSegment::new(30.0, 40.0, 10.0));
        model.validate()?;
        assert_eq!(model.count(), 5);

        let none = MultiStepModel::new("energy", []);
        assert!(matches!(none.validate(), Err(Error::Validation(_))));
        Ok(())
    }

    #[test]
    fn huge_step_counts_are_rejected() {
        let huge = StepModel::new("x", 0.0, 1e30, 1e-10);
        assert_eq!(huge.segment().checked_count(), None);
        assert_eq!(huge.segment().count(), u64::MAX);
        assert!(matches!(huge.validate(), Err(Error::Validation(_))));

        // Each segment fits on its own but the total does not.
        let half = StepSegment::new(0.0, 1.2e19, 1.0);
        assert!(half.checked_count().is_some());
        let doubled = MultiStepModel::new("x", [half, half]);
        assert_eq!(StepSegment::total(&doubled.segments), None);
        assert_eq!(doubled.count(), u64::MAX);
        assert!(matches!(doubled.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn axial_points() {
        assert!(AxialPointsModel::new("x", 0.0, 1.0, 5).validate().is_ok());
        assert!(AxialPointsModel::new("x", 1.0, 0.0, 1).validate().is_ok());
        let empty = AxialPointsModel::new("x", 0.0, 1.0, 0);
        assert!(matches!(empty.validate(), Err(Error::Validation(_))));
        let nan = AxialPointsModel::new("x", 0.0, f64::NAN, 3);
        assert!(matches!(nan.validate(), Err(Error::Validation(_))));
    }
}
