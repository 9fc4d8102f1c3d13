//! Regions: named containment predicates bound to an ordered set of axes.
//!
//! A region both excludes positions (candidates outside it are skipped) and
//! flattens dimensions (axes it spans end up sharing one output dimension).
//! The predicate itself is supplied by the caller through [`Containment`];
//! [`Rectangle`], [`Circle`] and [`Interval`] cover the common cases.

use std::{collections::HashSet, fmt, sync::Arc};

use crate::{
    error::{self, configuration},
    position::{AxisName, Position},
};

/// A point-membership test over the coordinates of a region's axes.
///
/// `coordinates` follow the region's axis order.
pub trait Containment: Send + Sync {
    /// Whether the coordinate tuple lies inside the shape.
    fn contains(&self, coordinates: &[f64]) -> bool;
}

impl<F> Containment for F
where
    F: Fn(&[f64]) -> bool + Send + Sync,
{
    fn contains(&self, coordinates: &[f64]) -> bool {
        self(coordinates)
    }
}

/// Axis-aligned rectangle over two coordinates, boundary inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rectangle {
    /// Lower corner.
    min: [f64; 2],
    /// Upper corner.
    max: [f64; 2],
}

impl Rectangle {
    /// A rectangle from a corner and signed lengths.
    pub fn new(start_a: f64, start_b: f64, length_a: f64, length_b: f64) -> Self {
        let (a0, a1) = ordered(start_a, start_a + length_a);
        let (b0, b1) = ordered(start_b, start_b + length_b);
        Self {
            min: [a0, b0],
            max: [a1, b1],
        }
    }
}

impl Containment for Rectangle {
    fn contains(&self, coordinates: &[f64]) -> bool {
        match coordinates {
            [a, b, ..] => {
                (self.min[0]..=self.max[0]).contains(a) && (self.min[1]..=self.max[1]).contains(b)
            }
            _ => false,
        }
    }
}

/// Disc over two coordinates, boundary inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    /// Centre on the first axis.
    centre_a: f64,
    /// Centre on the second axis.
    centre_b: f64,
    /// Radius.
    radius: f64,
}

impl Circle {
    /// A disc from its centre and radius.
    pub fn new(centre_a: f64, centre_b: f64, radius: f64) -> Self {
        Self {
            centre_a,
            centre_b,
            radius: radius.abs(),
        }
    }
}

impl Containment for Circle {
    fn contains(&self, coordinates: &[f64]) -> bool {
        match coordinates {
            [a, b, ..] => {
                (a - self.centre_a).hypot(b - self.centre_b) <= self.radius
            }
            _ => false,
        }
    }
}

/// Closed interval over one coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval {
    /// Lower bound.
    low: f64,
    /// Upper bound.
    high: f64,
}

impl Interval {
    /// An interval between two bounds, in either order.
    pub fn new(a: f64, b: f64) -> Self {
        let (low, high) = ordered(a, b);
        Self { low, high }
    }
}

impl Containment for Interval {
    fn contains(&self, coordinates: &[f64]) -> bool {
        coordinates
            .first()
            .is_some_and(|v| (self.low..=self.high).contains(v))
    }
}

/// Sort two bounds.
fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// A named spatial predicate bound to an ordered, non-empty set of axes.
#[derive(Clone)]
pub struct Region {
    /// Human-readable name, used in diagnostics.
    name: String,
    /// Axes whose coordinates feed the predicate, in predicate order.
    axes: Vec<AxisName>,
    /// The membership test.
    shape: Arc<dyn Containment>,
}

impl Region {
    /// Bind `shape` to `axes` under `name`.
    pub fn new<A>(
        name: impl Into<String>,
        axes: impl IntoIterator<Item = A>,
        shape: impl Containment + 'static,
    ) -> Self
    where
        A: Into<AxisName>,
    {
        Self {
            name: name.into(),
            axes: axes.into_iter().map(Into::into).collect(),
            shape: Arc::new(shape),
        }
    }

    /// Region name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Axes the region is bound to, in predicate order.
    pub fn axes(&self) -> &[AxisName] {
        &self.axes
    }

    /// Test a raw coordinate tuple.
    pub fn contains(&self, coordinates: &[f64]) -> bool {
        self.shape.contains(coordinates)
    }

    /// Test a position. Positions lacking any of the region's axes are not
    /// constrained by it.
    pub fn contains_position(&self, position: &Position) -> bool {
        position
            .coordinates(&self.axes)
            .is_none_or(|coordinates| self.contains(&coordinates))
    }

    /// Whether every axis of the region is in `axes`.
    pub(crate) fn within(&self, axes: &[AxisName]) -> bool {
        self.axes.iter().all(|axis| axes.contains(axis))
    }

    /// Reject regions with no axes or a repeated axis.
    pub(crate) fn validate(&self) -> error::Result<()> {
        if self.axes.is_empty() {
            return configuration(format!("region '{}' is bound to no axes", self.name));
        }
        let mut seen = HashSet::new();
        for axis in &self.axes {
            if !seen.insert(axis) {
                return configuration(format!(
                    "region '{}' lists axis '{axis}' more than once",
                    self.name
                ));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("name", &self.name)
            .field("axes", &self.axes)
            .finish_non_exhaustive()
    }
}

/// Regions are equal when they share name and axes and wrap the very same
/// predicate; distinct predicates never compare equal.
impl PartialEq for Region {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.axes == other.axes
            && Arc::ptr_eq(&self.shape, &other.shape)
    }
}
