//! Colon-separated descriptors for models, regions and mutators.
//!
//! Descriptors are parsed, not validated: degenerate parameters are reported
//! by the engine when the scan is built.

use std::{
    fmt::Display,
    str::{FromStr, Split},
};

use scanpoints::{
    CompoundModel, Model, Mutator, MutatorKind, Region,
    model::{
        ArrayModel, AxialPointsModel, BoundingBox, GridModel, GridStepModel, LineModel,
        LineStepModel, LissajousModel, MultiStepModel, SinglePointModel, SpiralModel, StaticModel,
        StepModel, StepSegment,
    },
    region::{Circle, Interval, Rectangle},
    registry,
};

/// Cursor over the colon-separated fields of one descriptor.
struct Fields<'a> {
    /// Descriptor kind, used in messages.
    kind: &'a str,
    /// Remaining fields.
    rest: Split<'a, char>,
}

impl<'a> Fields<'a> {
    /// Split `input` and take the leading kind field.
    fn new(input: &'a str) -> (&'a str, Self) {
        let mut rest = input.trim().split(':');
        let kind = rest.next().unwrap_or_default();
        (kind, Self { kind, rest })
    }

    /// The next raw field.
    fn text(&mut self, label: &str) -> Result<&'a str, String> {
        match self.rest.next() {
            Some(field) if !field.is_empty() => Ok(field),
            _ => Err(format!("{}: missing {label}", self.kind)),
        }
    }

    /// The next field parsed as `T`.
    fn parse<T>(&mut self, label: &str) -> Result<T, String>
    where
        T: FromStr,
        T::Err: Display,
    {
        let field = self.text(label)?;
        field
            .trim()
            .parse()
            .map_err(|e| format!("{}: invalid {label} '{field}': {e}", self.kind))
    }

    /// The next field if present.
    fn optional(&mut self) -> Option<&'a str> {
        self.rest.next()
    }

    /// Every remaining field, rejoined with colons.
    fn remainder(&mut self) -> String {
        self.rest.by_ref().collect::<Vec<_>>().join(":")
    }

    /// An optional trailing `snake` flag.
    fn snake(&mut self) -> Result<bool, String> {
        match self.optional() {
            None => Ok(false),
            Some("snake") => Ok(true),
            Some(other) => Err(format!("{}: expected 'snake', got '{other}'", self.kind)),
        }
    }

    /// Fail if fields remain.
    fn finish(mut self) -> Result<(), String> {
        match self.rest.next() {
            None => Ok(()),
            Some(extra) => Err(format!("{}: unexpected field '{extra}'", self.kind)),
        }
    }

    /// Fast axis, slow axis and bounding box, as shared by two-axis models.
    fn planar(&mut self) -> Result<(&'a str, &'a str, BoundingBox), String> {
        let fast = self.text("fast axis")?;
        let slow = self.text("slow axis")?;
        let x0 = self.parse("X0")?;
        let y0 = self.parse("Y0")?;
        let width = self.parse("W")?;
        let height = self.parse("H")?;
        Ok((fast, slow, BoundingBox::new(x0, y0, width, height)))
    }
}

/// Parse a comma-separated list of numbers.
fn numbers(kind: &str, list: &str) -> Result<Vec<f64>, String> {
    list.split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| format!("{kind}: invalid value '{v}': {e}"))
        })
        .collect()
}

/// Parse a model descriptor such as `step:x:0:10:0.5`,
/// `grid:x:y:0:0:3:3:20:20:snake` or `compound:step:x:0:1:1;step:y:0:1:1`.
pub fn parse_model(input: &str) -> Result<Model, String> {
    let (kind, mut f) = Fields::new(input);
    let model: Model = match kind {
        "step" => {
            let axis = f.text("axis")?;
            StepModel::new(axis, f.parse("START")?, f.parse("STOP")?, f.parse("STEP")?).into()
        }
        "array" => {
            let axis = f.text("axis")?;
            ArrayModel::new(axis, numbers(kind, f.text("values")?)?).into()
        }
        "multistep" => {
            let axis = f.text("axis")?;
            let joined = f.remainder();
            let mut segments = Vec::new();
            for part in joined.split('/') {
                let descriptor = format!("multistep:{part}");
                let (_, mut s) = Fields::new(&descriptor);
                let segment = StepSegment::new(s.parse("START")?, s.parse("STOP")?, s.parse("STEP")?);
                s.finish()?;
                segments.push(segment);
            }
            MultiStepModel::new(axis, segments).into()
        }
        "axispoints" => {
            let axis = f.text("axis")?;
            AxialPointsModel::new(axis, f.parse("START")?, f.parse("STOP")?, f.parse("N")?).into()
        }
        "line" => {
            let (fast, slow, b) = f.planar()?;
            LineModel::new(fast, slow, b, f.parse("COUNT")?).into()
        }
        "linestep" => {
            let (fast, slow, b) = f.planar()?;
            LineStepModel::new(fast, slow, b, f.parse("STEP")?).into()
        }
        "grid" => {
            let (fast, slow, b) = f.planar()?;
            let grid = GridModel::new(fast, slow, b, f.parse("ROWS")?, f.parse("COLS")?);
            grid.with_snake(f.snake()?).into()
        }
        "gridstep" => {
            let (fast, slow, b) = f.planar()?;
            let grid = GridStepModel::new(fast, slow, b, f.parse("FSTEP")?, f.parse("SSTEP")?);
            grid.with_snake(f.snake()?).into()
        }
        "spiral" => {
            let (fast, slow, b) = f.planar()?;
            SpiralModel::new(fast, slow, b, f.parse("SCALE")?).into()
        }
        "lissajous" => {
            let (fast, slow, b) = f.planar()?;
            LissajousModel::new(fast, slow, b, f.parse("POINTS")?)
                .with_frequencies(f.parse("A")?, f.parse("B")?)
                .with_phase_delta(f.parse("DELTA")?)
                .with_theta_step(f.parse("THETA_STEP")?)
                .into()
        }
        "point" => {
            let fast = f.text("fast axis")?;
            let slow = f.text("slow axis")?;
            SinglePointModel::new(fast, slow, f.parse("X")?, f.parse("Y")?).into()
        }
        "static" => StaticModel.into(),
        "compound" => {
            let joined = f.remainder();
            let models = joined
                .split(';')
                .map(parse_model)
                .collect::<Result<Vec<_>, _>>()?;
            CompoundModel::new(models).into()
        }
        other => {
            return Err(format!(
                "unknown model '{other}'. Valid options: {}",
                registry::MODEL_NAMES.join(", ")
            ));
        }
    };
    f.finish()?;
    Ok(model)
}

/// Parse a region descriptor: `rect:AX,AX:X0:Y0:W:H`, `circle:AX,AX:CX:CY:R`
/// or `interval:AX:LO:HI`.
pub fn parse_region(input: &str) -> Result<Region, String> {
    let (kind, mut f) = Fields::new(input);
    let axes: Vec<&str> = f.text("axes")?.split(',').map(str::trim).collect();
    let name = input.trim().to_string();
    let region = match (kind, axes.len()) {
        ("rect", 2) => {
            let shape = Rectangle::new(f.parse("X0")?, f.parse("Y0")?, f.parse("W")?, f.parse("H")?);
            Region::new(name, axes, shape)
        }
        ("circle", 2) => {
            let shape = Circle::new(f.parse("CX")?, f.parse("CY")?, f.parse("R")?);
            Region::new(name, axes, shape)
        }
        ("interval", 1) => {
            let shape = Interval::new(f.parse("LO")?, f.parse("HI")?);
            Region::new(name, axes, shape)
        }
        ("rect" | "circle", n) => return Err(format!("{kind}: expected 2 axes, got {n}")),
        ("interval", n) => return Err(format!("interval: expected 1 axis, got {n}")),
        (other, _) => {
            return Err(format!(
                "unknown region '{other}'. Valid options: rect, circle, interval"
            ));
        }
    };
    f.finish()?;
    Ok(region)
}

/// An alternating mutator attached to a model, parsed from `INDEX[:PERIOD]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Alternate {
    /// Zero-based model index, outermost first.
    pub index: usize,
    /// Passes run in the same direction before reversing.
    pub period: Option<f64>,
}

impl Alternate {
    /// The mutator this option describes.
    pub fn mutator(&self) -> Mutator {
        match self.period {
            Some(period) => Mutator::new(MutatorKind::Alternating, [period]),
            None => Mutator::alternating(),
        }
    }

    /// The target model index paired with the mutator.
    pub fn attach(&self) -> (usize, Mutator) {
        (self.index, self.mutator())
    }
}

impl FromStr for Alternate {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (index, period) = match value.split_once(':') {
            Some((index, period)) => (index, Some(period)),
            None => (value, None),
        };
        let index = index.trim().parse::<usize>().map_err(|_| {
            format!("invalid model index '{index}': expected a non-negative integer")
        })?;
        let period = period
            .map(|p| {
                p.trim()
                    .parse::<f64>()
                    .map_err(|_| format!("invalid period '{p}': expected a number"))
            })
            .transpose()?;
        Ok(Self { index, period })
    }
}

/// A random offset mutator attached to a model, parsed from
/// `INDEX:OFFSET[:SEED]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Offset {
    /// Zero-based model index, outermost first.
    pub index: usize,
    /// Largest displacement applied to any coordinate.
    pub offset: f64,
    /// Seed of the displacement sequence.
    pub seed: Option<u64>,
}

impl Offset {
    /// The target model index paired with the mutator.
    pub fn attach(&self) -> (usize, Mutator) {
        (
            self.index,
            Mutator::random_offset(self.offset, self.seed.unwrap_or_default()),
        )
    }
}

impl FromStr for Offset {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let descriptor = format!("offset:{value}");
        let (_, mut f) = Fields::new(&descriptor);
        let index = f.parse("INDEX")?;
        let offset = f.parse("OFFSET")?;
        let seed = f
            .optional()
            .map(|s| {
                s.trim()
                    .parse::<u64>()
                    .map_err(|_| format!("invalid seed '{s}': expected a non-negative integer"))
            })
            .transpose()?;
        f.finish()?;
        Ok(Self {
            index,
            offset,
            seed,
        })
    }
}
