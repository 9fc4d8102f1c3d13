use std::{ops::Range, sync::OnceLock};

use tracing::{debug, trace};

use crate::{
    compound::CompoundModel,
    dimension::{self, Dimension},
    error::{self, configuration},
    generators::{self, PathGenerator, Positions},
    mutator::Mutator,
    position::{AxisName, Position},
    region::Region,
};

/// The nested product of a [`CompoundModel`]'s generators.
///
/// The first model varies slowest. Regions owned entirely by one model are
/// checked inside that model's generator; the rest are checked against each
/// merged position. Mutators rewrite a model's sequence once and reorder it
/// per pass.
///
/// Construction fails when the models could together produce more than
/// `u64::MAX` positions, so size and shape never overflow. Both are computed
/// on first use and cached.
#[derive(Debug)]
pub struct CompoundGenerator {
    /// One generator per model, outer to inner.
    generators: Vec<Box<dyn PathGenerator>>,
    /// Regions spanning axes of more than one model.
    cross_regions: Vec<Region>,
    /// Mutators per model.
    mutators: Vec<Vec<Mutator>>,
    /// Flattened dimensions, outer to inner.
    dimensions: Vec<Dimension>,
    /// Owning model and the group's index within it, per model group.
    group_slots: Vec<(usize, usize)>,
    /// Upper bound on the number of positions.
    max_size: u64,
    /// Cached per-group extents of each model.
    shapes: Vec<OnceLock<Vec<u64>>>,
    /// Cached extent of each dimension.
    extents: Vec<OnceLock<u64>>,
    /// Materialised sequences of mutated models.
    buffers: Vec<OnceLock<Vec<Position>>>,
}

impl CompoundGenerator {
    /// Validate `model` and snapshot it into a generator.
    pub fn new(model: &CompoundModel) -> error::Result<Self> {
        model.validate()?;
        let regions = model.regions();
        let generators = model
            .models()
            .iter()
            .map(|m| generators::create(m, regions))
            .collect::<error::Result<Vec<_>>>()?;
        let cross_regions: Vec<Region> = regions
            .iter()
            .filter(|region| !generators.iter().any(|g| region.within(g.axes())))
            .cloned()
            .collect();
        let Some(max_size) = generators
            .iter()
            .try_fold(1u64, |bound, g| bound.checked_mul(g.max_size()))
        else {
            return configuration(format!(
                "scan could produce more than {} positions",
                u64::MAX
            ));
        };
        let groups: Vec<_> = generators.iter().map(|g| g.dimension_names()).collect();
        let group_slots = groups
            .iter()
            .enumerate()
            .flat_map(|(model, own)| (0..own.len()).map(move |local| (model, local)))
            .collect();
        let dimensions = dimension::flatten(&groups, regions);
        let mutators: Vec<Vec<Mutator>> = (0..generators.len())
            .map(|index| model.mutators_for(index).to_vec())
            .collect();

        debug!(
            models = generators.len(),
            regions = regions.len(),
            cross_regions = cross_regions.len(),
            mutators = mutators.iter().map(Vec::len).sum::<usize>(),
            max_size,
            dimensions = ?dimensions.iter().map(Dimension::axes).collect::<Vec<_>>(),
            "built compound generator"
        );

        Ok(Self {
            extents: dimensions.iter().map(|_| OnceLock::new()).collect(),
            shapes: generators.iter().map(|_| OnceLock::new()).collect(),
            buffers: generators.iter().map(|_| OnceLock::new()).collect(),
            generators,
            cross_regions,
            mutators,
            dimensions,
            group_slots,
            max_size,
        })
    }

    /// Every axis, outer model first, each model's fast axis first.
    pub fn axes(&self) -> Vec<AxisName> {
        self.generators
            .iter()
            .flat_map(|g| g.axes().iter().cloned())
            .collect()
    }

    /// The flattened dimensions, outer to inner.
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Axis names grouped by dimension, outer to inner.
    pub fn dimension_names(&self) -> Vec<Vec<AxisName>> {
        self.dimensions.iter().map(|d| d.axes().to_vec()).collect()
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }

    /// Extent of every dimension, outer to inner.
    pub fn shape(&self) -> Vec<u64> {
        (0..self.dimensions.len()).map(|i| self.extent(i)).collect()
    }

    /// Number of positions the scan emits, after every region.
    pub fn size(&self) -> u64 {
        self.shape().into_iter().fold(1, u64::saturating_mul)
    }

    /// Upper bound on [`CompoundGenerator::size`], known without iterating.
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    /// A fresh sequence of merged positions.
    pub fn positions(&self) -> CompoundPositions<'_> {
        CompoundPositions::new(
            self,
            0..self.generators.len(),
            self.cross_regions.iter().collect(),
        )
    }

    /// The first merged position, if the scan emits any.
    pub fn first_point(&self) -> Option<Position> {
        self.positions().next()
    }

    /// Cached extent of dimension `index`.
    fn extent(&self, index: usize) -> u64 {
        *self.extents[index].get_or_init(|| {
            let dimension = &self.dimensions[index];
            let regions: Vec<&Region> = self
                .cross_regions
                .iter()
                .filter(|region| region.axes().iter().all(|a| dimension.contains(a)))
                .collect();
            if regions.is_empty() {
                return dimension
                    .groups()
                    .map(|group| {
                        let (model, local) = self.group_slots[group];
                        self.model_shape(model).get(local).copied().unwrap_or(0)
                    })
                    .fold(1, u64::saturating_mul);
            }
            let extent = CompoundPositions::new(self, dimension.models(), regions).count() as u64;
            trace!(dimension = index, extent, "enumerated dimension extent");
            extent
        })
    }

    /// Cached per-group extents of model `index`.
    fn model_shape(&self, index: usize) -> &[u64] {
        self.shapes[index].get_or_init(|| self.generators[index].shape())
    }

    /// The full sequence of model `index` with its mutators applied,
    /// materialised once.
    fn buffer(&self, index: usize) -> &[Position] {
        self.buffers[index].get_or_init(|| {
            let mut points: Vec<Position> = self.generators[index].positions().collect();
            for mutator in &self.mutators[index] {
                mutator.apply(&mut points);
            }
            points
        })
    }
}

/// Where one model's sequence currently stands.
enum Cursor<'a> {
    /// A live generator sequence.
    Forward(Positions<'a>),
    /// A materialised sequence, possibly walked backwards.
    Buffered {
        /// All positions of the model.
        points: &'a [Position],
        /// Positions already handed out on this pass.
        next: usize,
        /// Walk from the end.
        reversed: bool,
    },
}

impl Iterator for Cursor<'_> {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        match self {
            Self::Forward(positions) => positions.next(),
            Self::Buffered {
                points,
                next,
                reversed,
            } => {
                let offset = *next;
                if offset >= points.len() {
                    return None;
                }
                *next += 1;
                let index = if *reversed {
                    points.len() - 1 - offset
                } else {
                    offset
                };
                Some(points[index].clone())
            }
        }
    }
}

/// Odometer over a [`CompoundGenerator`]'s models.
///
/// Holds one cursor per model. The innermost cursor advances on every step;
/// when a cursor runs dry the next outer one advances and every inner cursor
/// is reopened for a new pass.
pub struct CompoundPositions<'a> {
    /// The owning generator.
    generator: &'a CompoundGenerator,
    /// Model indices walked, outer to inner.
    models: Range<usize>,
    /// Regions checked against every merged position.
    regions: Vec<&'a Region>,
    /// One cursor per walked model.
    cursors: Vec<Cursor<'a>>,
    /// The position each cursor last produced.
    current: Vec<Position>,
    /// Passes opened so far, per walked model.
    passes: Vec<u64>,
    /// Set once the first combination has been taken.
    started: bool,
    /// Set once the outermost cursor is exhausted.
    done: bool,
}

impl<'a> CompoundPositions<'a> {
    /// Odometer over `models`, filtering merged positions by `regions`.
    fn new(
        generator: &'a CompoundGenerator,
        models: Range<usize>,
        regions: Vec<&'a Region>,
    ) -> Self {
        let slots = models.len();
        Self {
            generator,
            models,
            regions,
            cursors: Vec::with_capacity(slots),
            current: Vec::with_capacity(slots),
            passes: vec![0; slots],
            started: false,
            done: false,
        }
    }

    /// Start a new pass of the model in `slot`.
    fn open(&mut self, slot: usize) -> Cursor<'a> {
        let generator: &'a CompoundGenerator = self.generator;
        let model = self.models.start + slot;
        let pass = self.passes[slot];
        self.passes[slot] += 1;
        let mutators = &generator.mutators[model];
        if mutators.is_empty() {
            return Cursor::Forward(generator.generators[model].positions());
        }
        let reversed = mutators
            .iter()
            .fold(false, |reversed, m| reversed ^ m.reverses(pass));
        Cursor::Buffered {
            points: generator.buffer(model),
            next: 0,
            reversed,
        }
    }

    /// Reopen every slot from `first` inwards and take its first position.
    /// Returns `false` when some model has nothing to offer.
    fn refill(&mut self, first: usize) -> bool {
        self.cursors.truncate(first);
        self.current.truncate(first);
        for slot in first..self.models.len() {
            let mut cursor = self.open(slot);
            match cursor.next() {
                Some(position) => {
                    self.cursors.push(cursor);
                    self.current.push(position);
                }
                None => return false,
            }
        }
        true
    }

    /// Move the odometer one step. Returns `false` once it has run out.
    fn advance(&mut self) -> bool {
        if !self.started {
            self.started = true;
            return self.refill(0);
        }
        let mut slot = self.cursors.len();
        while slot > 0 {
            slot -= 1;
            if let Some(position) = self.cursors[slot].next() {
                self.current[slot] = position;
                return self.refill(slot + 1);
            }
        }
        false
    }

    /// The union of every model's current position.
    fn merged(&self) -> Position {
        let mut merged = Position::empty();
        for position in &self.current {
            merged.extend_from(position);
        }
        merged
    }
}

impl Iterator for CompoundPositions<'_> {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        while !self.done {
            if !self.advance() {
                self.done = true;
                break;
            }
            let candidate = self.merged();
            if self
                .regions
                .iter()
                .all(|region| region.contains_position(&candidate))
            {
                return Some(candidate);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Error,
        model::{ArrayModel, BoundingBox, GridModel, Model, SpiralModel, StaticModel, StepModel},
        mutator::MutatorKind,
        region::{Circle, Interval, Rectangle},
    };

    fn values(generator: &CompoundGenerator, axis: &str) -> Vec<f64> {
        generator
            .positions()
            .map(|p| p.get(axis).unwrap())
            .collect()
    }

    fn line(axis: &str, n: u32) -> StepModel {
        StepModel::new(axis, 0.0, f64::from(n - 1), 1.0)
    }

    #[test]
    fn odometer_order() -> error::Result<()> {
        let g = CompoundModel::new([line("x", 2).into(), line("y", 3).into()]).generator()?;
        let points: Vec<(f64, f64)> = g
            .positions()
            .map(|p| (p.get("x").unwrap(), p.get("y").unwrap()))
            .collect();
        assert_eq!(
            points,
            [(0., 0.), (0., 1.), (0., 2.), (1., 0.), (1., 1.), (1., 2.)]
        );
        assert_eq!(g.size(), 6);
        assert_eq!(g.shape(), [2, 3]);
        assert_eq!(g.rank(), 2);
        let first = g.first_point().unwrap();
        let names: Vec<&str> = first.names().collect();
        assert_eq!(names, ["x", "y"]);
        Ok(())
    }

    #[test]
    fn alternating_inner_model() -> error::Result<()> {
        let g = CompoundModel::new([line("x", 3).into(), line("y", 3).into()])
            .with_mutator(1, Mutator::alternating())
            .generator()?;
        assert_eq!(
            values(&g, "y"),
            [0., 1., 2., 2., 1., 0., 0., 1., 2.]
        );
        let indices: Vec<u64> = g.positions().filter_map(|p| p.index("y")).collect();
        assert_eq!(indices, [0, 1, 2, 2, 1, 0, 0, 1, 2]);
        assert_eq!(g.size(), 9);
        Ok(())
    }

    #[test]
    fn alternating_across_three_levels() -> error::Result<()> {
        let g = CompoundModel::new([
            line("a", 2).into(),
            line("b", 2).into(),
            line("c", 2).into(),
        ])
        .with_mutator(1, Mutator::alternating())
        .with_mutator(2, Mutator::alternating())
        .generator()?;
        let path: Vec<(f64, f64, f64)> = g
            .positions()
            .map(|p| (p.get("a").unwrap(), p.get("b").unwrap(), p.get("c").unwrap()))
            .collect();
        assert_eq!(
            path,
            [
                (0., 0., 0.),
                (0., 0., 1.),
                (0., 1., 1.),
                (0., 1., 0.),
                (1., 1., 0.),
                (1., 1., 1.),
                (1., 0., 1.),
                (1., 0., 0.),
            ]
        );
        Ok(())
    }

    #[test]
    fn alternating_period() -> error::Result<()> {
        let g = CompoundModel::new([line("x", 4).into(), line("y", 2).into()])
            .with_mutator(1, Mutator::new(MutatorKind::Alternating, [2.0]))
            .generator()?;
        assert_eq!(values(&g, "y"), [0., 1., 0., 1., 1., 0., 1., 0.]);
        Ok(())
    }

    #[test]
    fn cross_region_filters_and_flattens() -> error::Result<()> {
        let diagonal = Region::new("lower", ["x", "y"], |c: &[f64]| c[1] <= c[0]);
        let g = CompoundModel::new([line("x", 3).into(), line("y", 3).into()])
            .with_region(diagonal)
            .generator()?;
        assert_eq!(g.size(), 6);
        assert_eq!(g.shape(), [6]);
        assert_eq!(g.positions().count(), 6);
        assert_eq!(
            g.dimension_names(),
            vec![vec![AxisName::from("x"), AxisName::from("y")]]
        );
        Ok(())
    }

    #[test]
    fn local_region_keeps_dimensions() -> error::Result<()> {
        let grid = GridModel::new("x", "y", BoundingBox::new(0.0, 0.0, 3.0, 3.0), 20, 20);
        let g = CompoundModel::new([line("T", 11).into(), grid.into()])
            .with_region(Region::new("disc", ["x", "y"], Circle::new(1.0, 1.0, 2.0)))
            .generator()?;
        assert_eq!(g.shape(), [11, 334]);
        assert_eq!(g.size(), 3674);
        assert_eq!(g.positions().count(), 3674);
        Ok(())
    }

    #[test]
    fn one_dimensional_region_on_outer_model() -> error::Result<()> {
        let g = CompoundModel::new([line("x", 10).into(), line("y", 4).into()])
            .with_region(Region::new("window", ["x"], Interval::new(2.0, 4.0)))
            .generator()?;
        assert_eq!(g.shape(), [3, 4]);
        assert_eq!(g.positions().count(), 12);
        Ok(())
    }

    #[test]
    fn static_models_are_transparent() -> error::Result<()> {
        let g = CompoundModel::new([
            StaticModel.into(),
            ArrayModel::new("x", [1.0, 2.0]).into(),
            StaticModel.into(),
        ])
        .generator()?;
        assert_eq!(values(&g, "x"), [1.0, 2.0]);
        assert_eq!(g.shape(), [2]);

        let only = CompoundModel::new([StaticModel.into()]).generator()?;
        assert_eq!(only.size(), 1);
        assert!(only.shape().is_empty());
        assert_eq!(only.positions().count(), 1);
        assert!(only.first_point().unwrap().is_empty());
        Ok(())
    }

    #[test]
    fn fully_excluded_scan_is_empty() -> error::Result<()> {
        let g = CompoundModel::new([line("x", 3).into(), line("y", 3).into()])
            .with_region(Region::new(
                "far",
                ["x", "y"],
                Rectangle::new(10.0, 10.0, 1.0, 1.0),
            ))
            .generator()?;
        assert_eq!(g.size(), 0);
        assert_eq!(g.first_point(), None);
        Ok(())
    }

    #[test]
    fn independent_sequences() -> error::Result<()> {
        let g = CompoundModel::new([line("x", 3).into(), line("y", 2).into()])
            .with_mutator(1, Mutator::alternating())
            .generator()?;
        let mut first = g.positions();
        let head = first.next();
        let all: Vec<Position> = g.positions().collect();
        assert_eq!(head.as_ref(), all.first());
        let rest: Vec<Position> = first.collect();
        assert_eq!(rest, all[1..]);
        Ok(())
    }

    #[test]
    fn construction_errors() {
        let shared = CompoundModel::new([line("x", 2).into(), line("x", 2).into()]);
        assert!(matches!(shared.generator(), Err(Error::Configuration(_))));
        let degenerate = CompoundModel::new([StepModel::new("x", 0.0, 1.0, 0.0).into()]);
        assert!(matches!(degenerate.generator(), Err(Error::Validation(_))));
    }

    #[test]
    fn oversized_product_is_rejected() {
        let big = |axis: &str| Model::from(StepModel::new(axis, 0.0, 9_999_999.0, 1.0));
        let three = CompoundModel::new([big("a"), big("b"), big("c")]);
        assert!(matches!(three.generator(), Err(Error::Configuration(_))));

        let dense = SpiralModel::new("x", "y", BoundingBox::new(0.0, 0.0, 1.0, 1.0), 1e-12);
        let spiral = CompoundModel::new([big("a"), dense.into()]);
        assert!(matches!(spiral.generator(), Err(Error::Configuration(_))));
    }

    #[test]
    fn large_product_within_bounds() -> error::Result<()> {
        let big = |axis: &str| Model::from(StepModel::new(axis, 0.0, 9_999_999.0, 1.0));
        let g = CompoundModel::new([big("a"), big("b")]).generator()?;
        assert_eq!(g.size(), 100_000_000_000_000);
        assert_eq!(g.max_size(), g.size());
        assert_eq!(g.shape(), [10_000_000, 10_000_000]);
        Ok(())
    }

    #[test]
    fn random_offset_is_stable_across_passes() -> error::Result<()> {
        let g = CompoundModel::new([line("x", 3).into(), line("y", 4).into()])
            .with_mutator(1, Mutator::random_offset(0.1, 7))
            .generator()?;
        let ys = values(&g, "y");
        assert_eq!(ys.len(), 12);
        assert_eq!(ys[..4], ys[4..8]);
        for (k, y) in ys.iter().enumerate() {
            assert!((y - (k % 4) as f64).abs() <= 0.1);
        }
        assert_eq!(values(&g, "x"), [0., 0., 0., 0., 1., 1., 1., 1., 2., 2., 2., 2.]);
        let indices: Vec<u64> = g.positions().filter_map(|p| p.index("y")).collect();
        assert_eq!(indices[..4], [0, 1, 2, 3]);
        assert_eq!(ys, values(&g, "y"));
        Ok(())
    }

    #[test]
    fn offset_points_are_filtered_by_cross_regions() -> error::Result<()> {
        let lower = Region::new("lower", ["x", "y"], |c: &[f64]| c[1] <= c[0]);
        let g = CompoundModel::new([line("x", 6).into(), line("y", 6).into()])
            .with_region(lower)
            .with_mutator(1, Mutator::random_offset(0.4, 3))
            .generator()?;
        let points: Vec<Position> = g.positions().collect();
        assert_eq!(g.size(), points.len() as u64);
        assert!(points.iter().all(|p| p.get("y").unwrap() <= p.get("x").unwrap()));
        Ok(())
    }

    #[test]
    fn alternating_reverses_the_offset_sequence() -> error::Result<()> {
        let g = CompoundModel::new([line("x", 2).into(), line("y", 3).into()])
            .with_mutator(1, Mutator::random_offset(0.2, 1))
            .with_mutator(1, Mutator::alternating())
            .generator()?;
        let ys = values(&g, "y");
        let back: Vec<f64> = ys[3..].iter().rev().copied().collect();
        assert_eq!(ys[..3], back);
        Ok(())
    }

    /// The scan `x × y × z` with an elliptical region on `x, y` and jitter
    /// on `x`, both flat and with `x × y` nested as one model.
    fn flat_and_nested() -> (CompoundModel, CompoundModel) {
        let x = StepModel::new("x", 0.0, 10.0, 1.0);
        let y = StepModel::new("y", 0.0, 5.0, 1.0);
        let z = StepModel::new("z", 0.0, 15.0, 5.0);
        let disc = Region::new("disc", ["x", "y"], Circle::new(5.0, 3.0, 5.0));
        let jitter = Mutator::random_offset(0.07, 12);
        let flat = CompoundModel::new([x.clone().into(), y.clone().into(), z.clone().into()])
            .with_region(disc.clone())
            .with_mutator(0, jitter.clone());
        let inner = CompoundModel::new([x.into(), y.into()])
            .with_region(disc)
            .with_mutator(0, jitter);
        let nested = CompoundModel::new([inner.into(), z.into()]);
        (flat, nested)
    }

    #[test]
    fn nested_compound_matches_flat() -> error::Result<()> {
        let (flat, nested) = flat_and_nested();
        let flat = flat.generator()?;
        let nested = nested.generator()?;
        assert_eq!(flat.shape(), nested.shape());
        assert_eq!(flat.dimension_names(), nested.dimension_names());
        assert_eq!(flat.rank(), 2);
        assert!(flat.positions().eq(nested.positions()));
        Ok(())
    }

    #[test]
    fn enclosing_region_applies_inside_nested_compound() -> error::Result<()> {
        let window = Region::new("window", ["a", "b"], Rectangle::new(1.0, 1.0, 2.0, 2.0));
        let flat = CompoundModel::new([line("a", 5).into(), line("b", 5).into(), line("c", 2).into()])
            .with_region(window.clone())
            .with_mutator(1, Mutator::alternating())
            .generator()?;
        let inner = CompoundModel::new([line("a", 5).into(), line("b", 5).into()])
            .with_mutator(1, Mutator::alternating());
        let nested = CompoundModel::new([inner.into(), line("c", 2).into()])
            .with_region(window)
            .generator()?;
        assert_eq!(nested.shape(), [9, 2]);
        assert_eq!(flat.shape(), nested.shape());
        assert!(flat.positions().eq(nested.positions()));
        Ok(())
    }

    #[test]
    fn nested_dimensions_keep_their_extents() -> error::Result<()> {
        let inner = CompoundModel::new([line("a", 3).into(), line("b", 4).into()]);
        let g = CompoundModel::new([line("t", 2).into(), inner.into()]).generator()?;
        assert_eq!(g.shape(), [2, 3, 4]);
        assert_eq!(g.positions().count(), 24);

        let inner = CompoundModel::new([line("a", 3).into(), line("b", 4).into()]);
        let spanning = Region::new("band", ["b", "c"], |c: &[f64]| c[0] + c[1] <= 3.0);
        let flat = CompoundModel::new([line("a", 3).into(), line("b", 4).into(), line("c", 2).into()])
            .with_region(spanning.clone())
            .generator()?;
        let nested = CompoundModel::new([inner.into(), line("c", 2).into()])
            .with_region(spanning)
            .generator()?;
        assert!(flat.positions().eq(nested.positions()));
        assert_eq!(flat.shape(), [3, 7]);
        assert_eq!(nested.shape(), [21]);
        assert_eq!(nested.size(), flat.size());
        Ok(())
    }
}
