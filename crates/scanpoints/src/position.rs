//! Scan positions: axis name to value mappings with per-axis indices.

use std::{fmt, ops::Deref, sync::Arc};

use smallvec::SmallVec;

/// Name of a scan axis. Shared so that positions clone cheaply.
pub type AxisName = Arc<str>;

/// The value one axis takes at a position.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisValue {
    /// Axis the value belongs to.
    pub name: AxisName,
    /// Coordinate along the axis.
    pub value: f64,
    /// Where the value sits along the axis's declared sequence, or `None`
    /// when the point does not correspond to a regular cell on that axis.
    pub index: Option<u64>,
}

/// One emitted sample point: an ordered mapping from axis name to value.
///
/// Axis names within a position are distinct. Positions are never mutated
/// once handed out by a generator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Position(SmallVec<[AxisValue; 4]>);

impl Position {
    /// A position with no axes, as produced by a static model.
    pub fn empty() -> Self {
        Self(SmallVec::new())
    }

    /// A single-axis position.
    pub fn single(name: &AxisName, value: f64, index: Option<u64>) -> Self {
        Self::empty().with(name, value, index)
    }

    /// Append an axis to this position, returning it.
    ///
    /// Preconditions: `name` is not already present. Checked in debug builds.
    pub fn with(mut self, name: &AxisName, value: f64, index: Option<u64>) -> Self {
        debug_assert!(
            self.get(name).is_none(),
            "duplicate axis '{name}' in position"
        );
        self.0.push(AxisValue {
            name: Arc::clone(name),
            value,
            index,
        });
        self
    }

    /// Append every axis of `other`, which must not share names with `self`.
    pub(crate) fn extend_from(&mut self, other: &Self) {
        self.0.extend(other.0.iter().cloned());
    }

    /// Mutable access to every axis, for transforms applied before the
    /// position is handed out.
    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut AxisValue> {
        self.0.iter_mut()
    }

    /// Value of the named axis.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entry(name).map(|axis| axis.value)
    }

    /// Index of the named axis along its declared sequence.
    ///
    /// Returns `None` both for unknown axes and for axes whose index is not
    /// meaningful at this point.
    pub fn index(&self, name: &str) -> Option<u64> {
        self.entry(name).and_then(|axis| axis.index)
    }

    /// The full entry for the named axis.
    pub fn entry(&self, name: &str) -> Option<&AxisValue> {
        self.0.iter().find(|axis| &*axis.name == name)
    }

    /// Axis names in position order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|axis| &*axis.name)
    }

    /// Values of `axes`, in the order given, or `None` if any axis is absent.
    pub fn coordinates(&self, axes: &[AxisName]) -> Option<SmallVec<[f64; 4]>> {
        axes.iter().map(|name| self.get(name)).collect()
    }
}

impl Deref for Position {
    type Target = [AxisValue];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, axis) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match axis.index {
                Some(index) => write!(f, "{}={}[{index}]", axis.name, axis.value)?,
                None => write!(f, "{}={}[-]", axis.name, axis.value)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(name: &str) -> AxisName {
        AxisName::from(name)
    }

    #[test]
    fn lookup() {
        let p = Position::single(&axis("x"), 1.5, Some(3)).with(&axis("y"), 0.0, None);
        assert_eq!(p.len(), 2);
        assert_eq!(p.get("x"), Some(1.5));
        assert_eq!(p.index("x"), Some(3));
        assert_eq!(p.get("y"), Some(0.0));
        assert_eq!(p.index("y"), None);
        assert_eq!(p.get("z"), None);
        assert_eq!(p.names().collect::<Vec<_>>(), ["x", "y"]);
    }

    #[test]
    fn coordinates_follow_requested_order() {
        let p = Position::single(&axis("x"), 1.0, Some(0)).with(&axis("y"), 2.0, Some(0));
        let yx = p.coordinates(&[axis("y"), axis("x")]).unwrap();
        assert_eq!(yx.as_slice(), [2.0, 1.0]);
        assert!(p.coordinates(&[axis("z")]).is_none());
    }

    #[test]
    fn merge_and_display() {
        let mut outer = Position::single(&axis("T"), 290.0, Some(0));
        outer.extend_from(&Position::single(&axis("x"), 0.5, Some(1)));
        assert_eq!(outer.to_string(), "T=290[0], x=0.5[1]");
        assert!(Position::empty().is_empty());
        assert_eq!(Position::empty().to_string(), "");
    }
}
