//! Metadata for every model kind.
//!
//! Front ends use the registry to list supported models and to show the
//! descriptor syntax accepted for each.

/// Static description of one model kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModelEntry {
    /// Key matching [`Model::name`](crate::Model::name).
    pub key: &'static str,
    /// Human-readable name.
    pub display: &'static str,
    /// Number of axes the model owns, or `None` when it depends on the
    /// models nested inside.
    pub axes: Option<usize>,
    /// Colon-separated descriptor syntax.
    pub descriptor: &'static str,
    /// Parameter constraints checked by validation.
    pub constraints: &'static str,
}

/// Every supported model kind: one-axis models, then two-axis models, then
/// the axis-free and nesting kinds.
pub const REGISTRY: &[ModelEntry] = &[
    ModelEntry {
        key: "step",
        display: "Step",
        axes: Some(1),
        descriptor: "step:AXIS:START:STOP:STEP",
        constraints: "step non-zero, same sign as STOP-START",
    },
    ModelEntry {
        key: "array",
        display: "Array",
        axes: Some(1),
        descriptor: "array:AXIS:V,V,...",
        constraints: "at least one value",
    },
    ModelEntry {
        key: "multistep",
        display: "Multi-step",
        axes: Some(1),
        descriptor: "multistep:AXIS:START:STOP:STEP/START:STOP:STEP...",
        constraints: "at least one segment, each a valid step",
    },
    ModelEntry {
        key: "axispoints",
        display: "Axial points",
        axes: Some(1),
        descriptor: "axispoints:AXIS:START:STOP:N",
        constraints: "N >= 1; a single point sits at START",
    },
    ModelEntry {
        key: "line",
        display: "Line",
        axes: Some(2),
        descriptor: "line:FAST:SLOW:X0:Y0:W:H:COUNT",
        constraints: "W, H > 0; COUNT >= 1",
    },
    ModelEntry {
        key: "linestep",
        display: "Line by step",
        axes: Some(2),
        descriptor: "linestep:FAST:SLOW:X0:Y0:W:H:STEP",
        constraints: "W, H > 0; STEP > 0; the line stops at the last whole step",
    },
    ModelEntry {
        key: "grid",
        display: "Grid",
        axes: Some(2),
        descriptor: "grid:FAST:SLOW:X0:Y0:W:H:ROWS:COLS[:snake]",
        constraints: "W, H > 0; ROWS, COLS >= 1",
    },
    ModelEntry {
        key: "gridstep",
        display: "Grid by step",
        axes: Some(2),
        descriptor: "gridstep:FAST:SLOW:X0:Y0:W:H:FSTEP:SSTEP[:snake]",
        constraints: "W, H > 0; FSTEP, SSTEP > 0; the box shrinks to the last whole step",
    },
    ModelEntry {
        key: "spiral",
        display: "Spiral",
        axes: Some(2),
        descriptor: "spiral:FAST:SLOW:X0:Y0:W:H:SCALE",
        constraints: "W, H > 0; SCALE non-zero",
    },
    ModelEntry {
        key: "lissajous",
        display: "Lissajous",
        axes: Some(2),
        descriptor: "lissajous:FAST:SLOW:X0:Y0:W:H:POINTS:A:B:DELTA:THETA_STEP",
        constraints: "W, H > 0; POINTS >= 1; THETA_STEP non-zero",
    },
    ModelEntry {
        key: "point",
        display: "Single point",
        axes: Some(2),
        descriptor: "point:FAST:SLOW:X:Y",
        constraints: "distinct axes; finite coordinates",
    },
    ModelEntry {
        key: "static",
        display: "Static",
        axes: Some(0),
        descriptor: "static",
        constraints: "none; a single point with no axes",
    },
    ModelEntry {
        key: "compound",
        display: "Compound",
        axes: None,
        descriptor: "compound:MODEL;MODEL;...",
        constraints: "at least one model; no axis shared with the enclosing scan",
    },
];

/// Registry keys in [`REGISTRY`] order.
pub const MODEL_NAMES: &[&str] = &[
    "step",
    "array",
    "multistep",
    "axispoints",
    "line",
    "linestep",
    "grid",
    "gridstep",
    "spiral",
    "lissajous",
    "point",
    "static",
    "compound",
];

/// Look up a model kind by key.
pub fn entry(key: &str) -> Option<&'static ModelEntry> {
    REGISTRY.iter().find(|entry| entry.key == key)
}
