//! Core library for generating scan paths.
//!
//! A scan is described by a [`CompoundModel`]: an ordered list of
//! [`Model`]s (outermost first), a set of [`Region`]s that exclude positions
//! and flatten dimensions, and per-model [`Mutator`]s. Building a
//! [`CompoundGenerator`] from it yields a lazy, finite sequence of
//! [`Position`]s together with the dimensional shape those positions occupy.
//!
//! # Supported Models
//!
//! - Step, Array, Multi-step and Axial points (one axis)
//! - Line and Grid, by point count or by step size (two axes, optional snake
//!   rows)
//! - Spiral (Fermat spiral bounded by a box)
//! - Lissajous
//! - Single point (two axes)
//! - Static (a single point with no axes)
//! - Compound (a whole compound scan nested as one model)
//!
//! # Supported Mutators
//!
//! - Alternating (reverse a model on alternate passes)
//! - Random offset (seeded jitter on every coordinate of a model)

/// Merging of per-model dimensions under regions.
pub mod dimension;
/// Error types used across the crate.
pub mod error;
/// Per-model path generators.
pub mod generators;
/// Model descriptions of single path shapes.
pub mod model;
/// Declarative per-model sequence transforms.
pub mod mutator;
/// Positions emitted by generators.
pub mod position;
/// Named containment predicates bound to axes.
pub mod region;
/// Central registry of model metadata.
pub mod registry;

/// Compound models: models, regions and mutators assembled into one scan.
mod compound;
/// The compound generator and its odometer iteration.
mod composer;

pub use crate::{
    composer::{CompoundGenerator, CompoundPositions},
    compound::CompoundModel,
    dimension::Dimension,
    generators::PathGenerator,
    model::{BoundingBox, Model},
    mutator::{Mutator, MutatorKind},
    position::{AxisName, Position},
    region::Region,
};

/// Build a compound generator for a single model with no regions.
///
/// Convenience for callers that only need one path shape.
pub fn generator_from_model(model: impl Into<Model>) -> error::Result<CompoundGenerator> {
    CompoundModel::new([model.into()]).generator()
}
