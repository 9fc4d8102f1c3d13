//! Command handlers for the `scanpath` CLI.
//!
//! These functions build the scan from parsed descriptors and write its
//! positions or shape to any writer.

use std::io::Write;

use anyhow::{Context, Result};
use scanpoints::{CompoundGenerator, CompoundModel, Model, Mutator, Region, registry};
use tracing::info;

/// Assemble and validate a compound scan. Each mutator is paired with the
/// index of the model it targets.
pub fn build(
    models: &[Model],
    regions: &[Region],
    mutators: &[(usize, Mutator)],
) -> Result<CompoundGenerator> {
    let mut model = CompoundModel::new(models.iter().cloned());
    model.set_regions(regions.iter().cloned());
    for (index, mutator) in mutators {
        model.add_mutator(*index, mutator.clone());
    }
    let generator = model.generator().context("invalid scan")?;
    info!(
        models = models.len(),
        regions = regions.len(),
        mutators = mutators.len(),
        rank = generator.rank(),
        "scan ready"
    );
    Ok(generator)
}

/// Write positions as comma-separated rows under a header of axis names.
///
/// With `indices` set, every axis gets an extra `AXIS_index` column; axes
/// without a meaningful index print `-`. Returns the number of rows written.
pub fn write_points(
    generator: &CompoundGenerator,
    out: &mut impl Write,
    limit: Option<usize>,
    indices: bool,
) -> Result<u64> {
    let axes = generator.axes();
    let mut header: Vec<String> = axes.iter().map(|a| a.to_string()).collect();
    if indices {
        header.extend(axes.iter().map(|a| format!("{a}_index")));
    }
    writeln!(out, "{}", header.join(","))?;

    let mut rows = 0u64;
    for position in generator.positions().take(limit.unwrap_or(usize::MAX)) {
        let mut fields: Vec<String> = position.iter().map(|axis| axis.value.to_string()).collect();
        if indices {
            fields.extend(position.iter().map(|axis| match axis.index {
                Some(index) => index.to_string(),
                None => "-".to_string(),
            }));
        }
        writeln!(out, "{}", fields.join(","))?;
        rows += 1;
    }
    out.flush()?;
    info!(rows, "wrote positions");
    Ok(rows)
}

/// Write size, rank and every dimension with its extent.
pub fn write_shape(generator: &CompoundGenerator, out: &mut impl Write) -> Result<()> {
    let shape = generator.shape();
    writeln!(out, "size: {}", generator.size())?;
    writeln!(out, "rank: {}", generator.rank())?;
    for (i, (dimension, extent)) in generator.dimensions().iter().zip(&shape).enumerate() {
        let axes: Vec<&str> = dimension.axes().iter().map(|a| &**a).collect();
        writeln!(out, "dim {i} [{extent}]: {}", axes.join(" "))?;
    }
    Ok(())
}

/// Write every registered model kind with its descriptor and constraints.
pub fn write_models(out: &mut impl Write) -> Result<()> {
    writeln!(out, "Supported models (key — descriptor — constraints):")?;
    for entry in registry::REGISTRY {
        writeln!(
            out,
            "- {} — {} — {}",
            entry.key, entry.descriptor, entry.constraints
        )?;
    }
    Ok(())
}
