use std::f64::consts::PI;

use super::{PathGenerator, Positions, RegionFilter, planar_dimensions};
use crate::{
    model::SpiralModel,
    position::{AxisName, Position},
    region::Region,
};

/// Generator for [`SpiralModel`].
///
/// Step `n` sits at angle `theta = sqrt(4π) * sqrt(n)` and radius
/// `scale / 2π * theta` around the box centre. The sequence ends the first
/// time the radius exceeds the box's half diagonal. Emitted positions carry
/// `n` as the fast-axis index and `0` as the slow-axis index.
#[derive(Debug)]
pub struct SpiralGenerator {
    /// `[fast, slow]`.
    axes: [AxisName; 2],
    /// Box centre as `(fast, slow)`.
    centre: (f64, f64),
    /// Radial growth per radian.
    beta: f64,
    /// Largest radius still inside the box's circumscribed circle.
    max_radius: f64,
    /// Regions over the spiral's axes.
    filter: RegionFilter,
}

impl SpiralGenerator {
    /// Build from a validated model.
    pub fn new(model: &SpiralModel, filter: RegionFilter) -> Self {
        Self {
            axes: [model.fast_axis.clone(), model.slow_axis.clone()],
            centre: model.bounding_box.centre(),
            beta: model.scale / (2.0 * PI),
            max_radius: model.bounding_box.half_diagonal(),
            filter,
        }
    }
}

impl PathGenerator for SpiralGenerator {
    fn name(&self) -> &'static str {
        "spiral"
    }
    fn axes(&self) -> &[AxisName] {
        &self.axes
    }
    fn regions(&self) -> &[Region] {
        self.filter.regions()
    }
    fn size(&self) -> Option<u64> {
        None
    }
    fn max_size(&self) -> u64 {
        let alpha = (4.0 * PI).sqrt();
        let last = (self.max_radius / (self.beta.abs() * alpha)).powi(2).floor();
        if last.is_finite() && last < u64::MAX as f64 {
            (last as u64).saturating_add(2)
        } else {
            u64::MAX
        }
    }
    fn dimension_names(&self) -> Vec<Vec<AxisName>> {
        let [fast, slow] = &self.axes;
        planar_dimensions(fast, slow)
    }
    fn positions(&self) -> Positions<'_> {
        Box::new(SpiralPositions {
            generator: self,
            alpha: (4.0 * PI).sqrt(),
            step: 0,
            done: false,
        })
    }
}

/// Cursor over a spiral's accepted points.
struct SpiralPositions<'a> {
    /// The generator being walked.
    generator: &'a SpiralGenerator,
    /// Angular growth constant, `sqrt(4π)`.
    alpha: f64,
    /// Next step index to evaluate.
    step: u64,
    /// Set once the radius leaves the bounding circle.
    done: bool,
}

impl Iterator for SpiralPositions<'_> {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        let g = self.generator;
        while !self.done {
            let n = self.step;
            let theta = self.alpha * (n as f64).sqrt();
            let radius = g.beta * theta;
            if radius.abs() > g.max_radius {
                self.done = true;
                break;
            }
            self.step += 1;

            let [fast, slow] = &g.axes;
            let x = g.centre.0 + radius * theta.sin();
            let y = g.centre.1 + radius * theta.cos();
            let candidate = Position::single(fast, x, Some(n)).with(slow, y, Some(0));
            if g.filter.accepts(&candidate) {
                return Some(candidate);
            }
        }
        None
    }
}
