use tracing::warn;

use super::{PathGenerator, Positions, RegionFilter, planar_dimensions};
use crate::{
    model::LissajousModel,
    position::{AxisName, Position},
    region::Region,
};

/// Candidates evaluated per requested point before a constrained figure
/// gives up.
const CANDIDATES_PER_POINT: u64 = 1000;

/// Generator for [`LissajousModel`].
///
/// Candidate `k` sits at `theta = k * theta_step`:
///
/// ```text
/// fast = cx + A * sin(freq_a * theta + phase_delta)
/// slow = cy + B * cos(freq_b * theta)
/// ```
///
/// where `A` and `B` are half the box extents. Candidates are drawn until
/// `points` of them are accepted. Fast-axis indices count accepted points;
/// the slow axis carries none.
#[derive(Debug)]
pub struct LissajousGenerator {
    /// `[fast, slow]`.
    axes: [AxisName; 2],
    /// Box centre as `(fast, slow)`.
    centre: (f64, f64),
    /// Half extents as `(fast, slow)`.
    amplitude: (f64, f64),
    /// Points to emit.
    points: u64,
    /// Fast-axis angular frequency.
    freq_a: f64,
    /// Slow-axis angular frequency.
    freq_b: f64,
    /// Fast-axis phase offset.
    phase_delta: f64,
    /// Parameter increment between candidates.
    theta_step: f64,
    /// Regions over the figure's axes.
    filter: RegionFilter,
}

impl LissajousGenerator {
    /// Build from a validated model.
    pub fn new(model: &LissajousModel, filter: RegionFilter) -> Self {
        let b = &model.bounding_box;
        Self {
            axes: [model.fast_axis.clone(), model.slow_axis.clone()],
            centre: b.centre(),
            amplitude: (b.fast_axis_length / 2.0, b.slow_axis_length / 2.0),
            points: model.points,
            freq_a: model.freq_a,
            freq_b: model.freq_b,
            phase_delta: model.phase_delta,
            theta_step: model.theta_step,
            filter,
        }
    }

    /// The unfiltered candidate at parameter `theta`.
    fn candidate(&self, theta: f64, index: u64) -> Position {
        let [fast, slow] = &self.axes;
        let x = self.centre.0 + self.amplitude.0 * (self.freq_a * theta + self.phase_delta).sin();
        let y = self.centre.1 + self.amplitude.1 * (self.freq_b * theta).cos();
        Position::single(fast, x, Some(index)).with(slow, y, None)
    }
}

impl PathGenerator for LissajousGenerator {
    fn name(&self) -> &'static str {
        "lissajous"
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
        self.points
    }
    fn dimension_names(&self) -> Vec<Vec<AxisName>> {
        let [fast, slow] = &self.axes;
        planar_dimensions(fast, slow)
    }
    fn positions(&self) -> Positions<'_> {
        Box::new(LissajousPositions {
            generator: self,
            candidates: 0,
            emitted: 0,
            budget: self.points.saturating_mul(CANDIDATES_PER_POINT),
        })
    }
}

/// Cursor over a Lissajous figure's accepted points.
struct LissajousPositions<'a> {
    /// The generator being walked.
    generator: &'a LissajousGenerator,
    /// Candidates evaluated so far.
    candidates: u64,
    /// Points accepted so far.
    emitted: u64,
    /// Candidate limit for constrained figures.
    budget: u64,
}

impl Iterator for LissajousPositions<'_> {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        let g = self.generator;
        while self.emitted < g.points {
            if self.candidates >= self.budget {
                warn!(
                    requested = g.points,
                    emitted = self.emitted,
                    candidates = self.candidates,
                    "lissajous figure ended early; regions reject too many candidates"
                );
                self.emitted = g.points;
                break;
            }
            let theta = self.candidates as f64 * g.theta_step;
            self.candidates += 1;
            let candidate = g.candidate(theta, self.emitted);
            if g.filter.accepts(&candidate) {
                self.emitted += 1;
                return Some(candidate);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = usize::try_from(self.generator.points - self.emitted).ok();
        (0, left)
    }
}
