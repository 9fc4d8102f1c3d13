//! Scenario tests for compound scans: nesting order, sizes, shapes and
//! construction failures.
#[cfg(test)]
mod tests {
    use scanpoints::{
        AxisName, CompoundModel, Model, Mutator, Position, Region,
        error::{self, Error},
        generator_from_model,
        model::{
            ArrayModel, AxialPointsModel, BoundingBox, GridModel, GridStepModel, LineModel,
            LineStepModel, LissajousModel, MultiStepModel, SinglePointModel, SpiralModel,
            StaticModel, StepModel, StepSegment,
        },
        region::{Circle, Rectangle},
    };

    fn close(actual: Option<f64>, expected: f64) -> bool {
        actual.is_some_and(|v| (v - expected).abs() < 1e-9)
    }

    fn names(groups: &[&[&str]]) -> Vec<Vec<AxisName>> {
        groups
            .iter()
            .map(|g| g.iter().map(|&n| AxisName::from(n)).collect())
            .collect()
    }

    fn temperature(stop: f64) -> Model {
        StepModel::new("Temperature", 290.0, stop, 1.0).into()
    }

    fn unit_grid(fast: &str, slow: &str, rows: u64, columns: u64) -> Model {
        GridModel::new(
            fast,
            slow,
            BoundingBox::new(0.0, 0.0, 3.0, 3.0),
            rows,
            columns,
        )
        .into()
    }

    #[test]
    fn single_step_size_and_shape() -> error::Result<()> {
        let temp = generator_from_model(StepModel::new("Temperature", 290.0, 295.0, 1.0))?;
        assert_eq!(temp.size(), 6);
        assert_eq!(temp.rank(), 1);
        assert_eq!(temp.shape(), [6]);
        let pos = generator_from_model(StepModel::new("Position", 1.0, 4.0, 0.6))?;
        assert_eq!(pos.size(), 6);
        Ok(())
    }

    #[test]
    fn step_around_step() -> error::Result<()> {
        let scan = CompoundModel::new([
            temperature(295.0),
            StepModel::new("Position", 1.0, 4.0, 0.6).into(),
        ])
        .generator()?;
        assert_eq!(scan.size(), 36);
        assert_eq!(scan.rank(), 2);
        assert_eq!(scan.shape(), [6, 6]);

        let points: Vec<Position> = scan.positions().collect();
        assert_eq!(points.len(), 36);
        for (k, temperature, position) in [
            (0, 290.0, 1.0),
            (1, 290.0, 1.6),
            (2, 290.0, 2.2),
            (6, 291.0, 1.0),
            (7, 291.0, 1.6),
            (8, 291.0, 2.2),
            (30, 295.0, 1.0),
            (31, 295.0, 1.6),
            (32, 295.0, 2.2),
        ] {
            assert!(close(points[k].get("Temperature"), temperature), "{}", points[k]);
            assert!(close(points[k].get("Position"), position), "{}", points[k]);
        }
        Ok(())
    }

    #[test]
    fn three_steps() -> error::Result<()> {
        let scan = CompoundModel::new([
            temperature(295.0),
            StepModel::new("Y", 11.0, 14.0, 0.6).into(),
            StepModel::new("X", 1.0, 4.0, 0.6).into(),
        ])
        .generator()?;
        assert_eq!(scan.size(), 216);
        assert_eq!(scan.shape(), [6, 6, 6]);
        let points: Vec<Position> = scan.positions().collect();
        for (k, t, y, x) in [
            (0, 290.0, 11.0, 1.0),
            (1, 290.0, 11.0, 1.6),
            (2, 290.0, 11.0, 2.2),
            (36, 291.0, 11.0, 1.0),
            (37, 291.0, 11.0, 1.6),
            (215, 295.0, 14.0, 4.0),
        ] {
            let p = &points[k];
            assert!(close(p.get("Temperature"), t) && close(p.get("Y"), y) && close(p.get("X"), x), "{p}");
        }
        Ok(())
    }

    #[test]
    fn step_around_grid() -> error::Result<()> {
        let scan = CompoundModel::new([temperature(300.0), unit_grid("x", "y", 20, 20)]).generator()?;
        assert_eq!(scan.size(), 4400);
        assert_eq!(scan.shape(), [11, 400]);
        assert_eq!(scan.dimension_names(), names(&[&["Temperature"], &["y", "x"]]));

        let first: Vec<Position> = scan.positions().take(400).collect();
        assert!(first.iter().all(|p| p.get("Temperature") == Some(290.0)));
        let grid = generator_from_model(GridModel::new(
            "x",
            "y",
            BoundingBox::new(0.0, 0.0, 3.0, 3.0),
            20,
            20,
        ))?;
        for (merged, alone) in first.iter().zip(grid.positions()) {
            assert_eq!(merged.get("x"), alone.get("x"));
            assert_eq!(merged.get("y"), alone.get("y"));
        }
        Ok(())
    }

    #[test]
    fn step_around_circular_grid() -> error::Result<()> {
        let scan = CompoundModel::new([temperature(300.0), unit_grid("x", "y", 20, 20)])
            .with_region(Region::new("disc", ["x", "y"], Circle::new(1.0, 1.0, 2.0)))
            .generator()?;
        assert_eq!(scan.shape(), [11, 334]);
        assert_eq!(scan.size(), 3674);
        let mut seen = 0;
        for p in scan.positions() {
            let (x, y) = (p.get("x").unwrap(), p.get("y").unwrap());
            assert!((x - 1.0).hypot(y - 1.0) <= 2.0);
            seen += 1;
        }
        assert_eq!(seen, 3674);
        Ok(())
    }

    #[test]
    fn grid_around_grid() -> error::Result<()> {
        let scan = CompoundModel::new([
            unit_grid("x1", "y1", 5, 5),
            unit_grid("x2", "y2", 5, 5),
        ])
        .generator()?;
        assert_eq!(scan.size(), 625);
        assert_eq!(scan.shape(), [25, 25]);
        assert_eq!(
            scan.dimension_names(),
            names(&[&["y1", "x1"], &["y2", "x2"]])
        );
        let first = scan.first_point().unwrap();
        let names: Vec<&str> = first.names().collect();
        assert_eq!(names, ["x1", "y1", "x2", "y2"]);
        Ok(())
    }

    #[test]
    fn multistep_around_grid() -> error::Result<()> {
        let energy = MultiStepModel::new(
            "energy",
            [
                StepSegment::new(10000.0, 20000.0, 10000.0),
                StepSegment::new(0.0, 15.0, 5.0),
            ],
        );
        let scan = CompoundModel::new([energy.into(), unit_grid("x", "y", 5, 5)]).generator()?;
        assert_eq!(scan.shape(), [6, 25]);
        assert_eq!(scan.size(), 150);
        let energies: Vec<f64> = scan
            .positions()
            .step_by(25)
            .map(|p| p.get("energy").unwrap())
            .collect();
        assert_eq!(energies, [10000.0, 20000.0, 0.0, 5.0, 10.0, 15.0]);
        Ok(())
    }

    #[test]
    fn region_spanning_models_flattens_without_changing_size() -> error::Result<()> {
        let x = ArrayModel::new("x", [0.0, 1.0, 2.0]);
        let y = ArrayModel::new("y", [0.0, 1.0, 2.0]);
        let plain = CompoundModel::new([x.clone().into(), y.clone().into()]);
        let before = plain.generator()?;
        assert_eq!(before.dimension_names(), names(&[&["x"], &["y"]]));
        assert_eq!(before.size(), 9);

        let covered = plain.with_region(Region::new(
            "everything",
            ["x", "y"],
            Rectangle::new(-1.0, -1.0, 4.0, 4.0),
        ));
        let after = covered.generator()?;
        assert_eq!(after.dimension_names(), names(&[&["x", "y"]]));
        assert_eq!(after.size(), 9);
        assert_eq!(after.shape(), [9]);
        assert!(before.positions().eq(after.positions()));
        Ok(())
    }

    #[test]
    fn flattening_keeps_grid_order() -> error::Result<()> {
        let stage = GridModel::new(
            "stage_x",
            "stage_y",
            BoundingBox::new(0.0, 0.0, 1.0, 1.0),
            3,
            3,
        );
        let model = CompoundModel::new([StepModel::new("p", 0.0, 2.0, 1.0).into(), stage.into()])
            .with_region(Region::new("a", ["p", "stage_x"], |_: &[f64]| true));
        let once = model.generator()?;
        assert_eq!(once.dimension_names(), names(&[&["p", "stage_y", "stage_x"]]));

        let twice = model
            .with_region(Region::new("b", ["stage_y", "p", "stage_x"], |_: &[f64]| true))
            .generator()?;
        assert_eq!(twice.dimension_names(), names(&[&["p", "stage_y", "stage_x"]]));
        assert_eq!(twice.size(), 27);
        Ok(())
    }

    #[test]
    fn snake_grid_with_alternating_outer_step() -> error::Result<()> {
        let scan = CompoundModel::new([
            StepModel::new("z", 0.0, 1.0, 1.0).into(),
            GridModel::new("x", "y", BoundingBox::new(0.0, 0.0, 1.0, 1.0), 2, 2)
                .with_snake(true)
                .into(),
        ])
        .with_mutator(1, Mutator::alternating())
        .generator()?;
        let path: Vec<(f64, f64, f64)> = scan
            .positions()
            .map(|p| (p.get("z").unwrap(), p.get("y").unwrap(), p.get("x").unwrap()))
            .collect();
        assert_eq!(
            path,
            [
                (0.0, 0.0, 0.0),
                (0.0, 0.0, 1.0),
                (0.0, 1.0, 1.0),
                (0.0, 1.0, 0.0),
                (1.0, 1.0, 0.0),
                (1.0, 1.0, 1.0),
                (1.0, 0.0, 1.0),
                (1.0, 0.0, 0.0),
            ]
        );
        Ok(())
    }

    #[test]
    fn spiral_and_lissajous_sizes_come_from_enumeration() -> error::Result<()> {
        let b = BoundingBox::new(-5.0, -5.0, 10.0, 10.0);
        let scan = CompoundModel::new([
            StepModel::new("T", 0.0, 2.0, 1.0).into(),
            SpiralModel::new("x", "y", b, 1.0).into(),
        ])
        .generator()?;
        assert_eq!(scan.shape(), [3, 158]);
        assert_eq!(scan.positions().count() as u64, scan.size());

        let figure = generator_from_model(LissajousModel::new("a", "b", b, 250))?;
        assert_eq!(figure.size(), 250);
        Ok(())
    }

    #[test]
    fn static_only_scan() -> error::Result<()> {
        let scan = CompoundModel::new([StaticModel.into()]).generator()?;
        assert_eq!(scan.size(), 1);
        assert_eq!(scan.rank(), 0);
        assert_eq!(scan.positions().count(), 1);
        Ok(())
    }

    #[test]
    fn duplicate_axis_names() {
        let model = CompoundModel::new([
            StepModel::new("Position", 1.0, 4.0, 0.6).into(),
            StepModel::new("Position", 1.0, 4.0, 0.6).into(),
        ]);
        assert!(matches!(model.generator(), Err(Error::Configuration(_))));

        let across = CompoundModel::new([
            LineModel::new("x", "y", BoundingBox::new(0.0, 0.0, 1.0, 1.0), 3).into(),
            ArrayModel::new("y", [1.0]).into(),
        ]);
        assert!(matches!(across.generator(), Err(Error::Configuration(_))));
    }

    #[test]
    fn region_on_unowned_axis() {
        let model = CompoundModel::new([temperature(295.0)])
            .with_region(Region::new("r", ["x", "y"], Rectangle::new(0.0, 0.0, 1.0, 1.0)));
        let err = model.generator().unwrap_err();
        assert!(matches!(err, Error::Configuration(ref m) if m.contains("'x'")), "{err}");
    }

    #[test]
    fn zero_scale_spiral() {
        let spiral = SpiralModel::new("x", "y", BoundingBox::new(0.0, 0.0, 1.0, 1.0), 0.0);
        assert!(matches!(
            generator_from_model(spiral),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn empty_array() {
        let empty = ArrayModel::new("x", []);
        assert!(matches!(generator_from_model(empty), Err(Error::Validation(_))));
    }

    #[test]
    fn step_count_beyond_u64_is_rejected() {
        let huge = StepModel::new("x", 0.0, 1e30, 1e-10);
        assert!(matches!(generator_from_model(huge), Err(Error::Validation(_))));

        let segments = MultiStepModel::new(
            "x",
            [
                StepSegment::new(0.0, 1.2e19, 1.0),
                StepSegment::new(0.0, 1.2e19, 1.0),
            ],
        );
        assert!(matches!(generator_from_model(segments), Err(Error::Validation(_))));

        let grid = GridStepModel::new("x", "y", BoundingBox::new(0.0, 0.0, 1e12, 1e12), 1e-8, 1e-8);
        assert!(matches!(generator_from_model(grid), Err(Error::Validation(_))));
    }

    #[test]
    fn product_beyond_u64_is_rejected() {
        let big = |axis: &str| -> Model { AxialPointsModel::new(axis, 0.0, 1.0, 10_000_000).into() };
        let model = CompoundModel::new([big("a"), big("b"), big("c")]);
        let err = model.generator().unwrap_err();
        assert!(matches!(err, Error::Configuration(ref m) if m.contains("more than")), "{err}");

        let pair = CompoundModel::new([big("a"), big("b")]).generator().expect("fits");
        assert_eq!(pair.size(), 100_000_000_000_000);

        let nested = CompoundModel::new([
            CompoundModel::new([big("a"), big("b")]).into(),
            big("c"),
        ]);
        assert!(matches!(nested.generator(), Err(Error::Configuration(_))));

        let wide = CompoundModel::new([
            ArrayModel::new("a", [0.0, 1.0]).into(),
            StepModel::new("b", 0.0, 1e19 - 1.0, 1.0).into(),
        ]);
        assert!(matches!(wide.generator(), Err(Error::Configuration(_))));
    }

    #[test]
    fn nested_compound_behaves_like_its_flat_equivalent() -> error::Result<()> {
        let disc = Region::new("disc", ["x", "y"], Circle::new(1.0, 1.0, 1.5));
        let flat = CompoundModel::new([
            temperature(292.0),
            unit_grid("x", "y", 5, 5),
            ArrayModel::new("z", [0.0, 1.0]).into(),
        ])
        .with_region(disc.clone())
        .with_mutator(2, Mutator::alternating())
        .with_mutator(1, Mutator::random_offset(0.01, 5))
        .generator()?;

        let inner = CompoundModel::new([temperature(292.0), unit_grid("x", "y", 5, 5)])
            .with_mutator(1, Mutator::random_offset(0.01, 5));
        let nested = CompoundModel::new([inner.into(), ArrayModel::new("z", [0.0, 1.0]).into()])
            .with_region(disc)
            .with_mutator(1, Mutator::alternating())
            .generator()?;

        assert_eq!(flat.shape(), nested.shape());
        assert_eq!(flat.dimension_names(), nested.dimension_names());
        assert!(flat.positions().eq(nested.positions()));
        assert_eq!(nested.positions().count() as u64, nested.size());
        Ok(())
    }

    macro_rules! size_tests {
        ($($name:ident: $models:expr => $shape:expr),* $(,)?) => {
            $(
                paste::paste! {
                    #[test]
                    fn [<size_ $name>]() -> error::Result<()> {
                        let scan = CompoundModel::new($models).generator()?;
                        let shape: Vec<u64> = $shape.to_vec();
                        assert_eq!(scan.shape(), shape);
                        assert_eq!(scan.size(), shape.iter().product::<u64>());
                        assert_eq!(scan.positions().count() as u64, scan.size());
                        Ok(())
                    }
                }
            )*
        };
    }

    size_tests! {
        step_tenths: [StepModel::new("x", 0.0, 1.0, 0.1).into()] => [11],
        step_descending: [StepModel::new("x", 5.0, 1.0, -1.0).into()] => [5],
        step_single: [StepModel::new("x", 3.0, 3.0, 1.0).into()] => [1],
        array_pair: [ArrayModel::new("x", [1.0, 1.0]).into()] => [2],
        line_seven: [LineModel::new("x", "y", BoundingBox::new(0.0, 0.0, 1.0, 2.0), 7).into()] => [7],
        grid_rect: [unit_grid("x", "y", 3, 4)] => [12],
        axial_points: [AxialPointsModel::new("x", 0.0, 1.0, 7).into()] => [7],
        grid_by_step: [
            GridStepModel::new("x", "y", BoundingBox::new(0.0, 0.0, 5.0, 5.0), 0.3, 1.7).into()
        ] => [51],
        line_by_step: [
            LineStepModel::new("x", "y", BoundingBox::new(0.0, 0.0, 3.0, 4.0), 2.0).into()
        ] => [3],
        single_point: [
            StepModel::new("t", 0.0, 2.0, 1.0).into(),
            SinglePointModel::new("x", "y", 0.5, 0.5).into(),
        ] => [3, 1],
        nested_compound: [
            StepModel::new("t", 0.0, 1.0, 1.0).into(),
            CompoundModel::new([
                ArrayModel::new("a", [0.0, 1.0, 2.0]).into(),
                unit_grid("x", "y", 2, 3),
            ])
            .into(),
        ] => [2, 3, 6],
        static_inside: [
            StepModel::new("a", 0.0, 3.0, 1.0).into(),
            StaticModel.into(),
            ArrayModel::new("b", [0.0, 1.0]).into(),
        ] => [4, 2],
        four_levels: [
            ArrayModel::new("a", [0.0, 1.0]).into(),
            ArrayModel::new("b", [0.0, 1.0, 2.0]).into(),
            unit_grid("x", "y", 2, 2),
            StepModel::new("c", 0.0, 4.0, 1.0).into(),
        ] => [2, 3, 4, 5],
    }
}
