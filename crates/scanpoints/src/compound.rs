use std::collections::{BTreeMap, HashMap};

use crate::{
    composer::CompoundGenerator,
    error::{self, configuration},
    model::Model,
    mutator::Mutator,
    region::Region,
};

/// An ordered list of models (outermost first), the regions constraining
/// them and the mutators attached to individual models.
///
/// The model is a plain value: it may be edited freely until
/// [`CompoundModel::generator`] is called, which snapshots it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompoundModel {
    /// Models, outer to inner.
    models: Vec<Model>,
    /// Regions over any of the models' axes.
    regions: Vec<Region>,
    /// Mutators keyed by model index.
    mutators: BTreeMap<usize, Vec<Mutator>>,
}

impl CompoundModel {
    /// A compound of `models`, outermost first, with no regions.
    pub fn new(models: impl IntoIterator<Item = Model>) -> Self {
        Self {
            models: models.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Append an innermost model.
    pub fn add_model(&mut self, model: impl Into<Model>) {
        self.models.push(model.into());
    }

    /// Append an innermost model, returning the compound.
    pub fn with_model(mut self, model: impl Into<Model>) -> Self {
        self.add_model(model);
        self
    }

    /// Models, outer to inner.
    pub fn models(&self) -> &[Model] {
        &self.models
    }

    /// Current regions.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Replace every region.
    pub fn set_regions(&mut self, regions: impl IntoIterator<Item = Region>) {
        self.regions = regions.into_iter().collect();
    }

    /// Append regions to the current set.
    pub fn add_regions(&mut self, regions: impl IntoIterator<Item = Region>) {
        self.regions.extend(regions);
    }

    /// Append one region, returning the compound.
    pub fn with_region(mut self, region: Region) -> Self {
        self.regions.push(region);
        self
    }

    /// Attach `mutator` to the model at `index`. The index is checked when a
    /// generator is built.
    pub fn add_mutator(&mut self, index: usize, mutator: Mutator) {
        self.mutators.entry(index).or_default().push(mutator);
    }

    /// Attach a mutator, returning the compound.
    pub fn with_mutator(mut self, index: usize, mutator: Mutator) -> Self {
        self.add_mutator(index, mutator);
        self
    }

    /// Mutators attached to the model at `index`.
    pub fn mutators_for(&self, index: usize) -> &[Mutator] {
        self.mutators.get(&index).map_or(&[], Vec::as_slice)
    }

    /// Check every model and the way models, regions and mutators fit
    /// together.
    ///
    /// Model parameter problems are [`Error::Validation`](crate::error::Error::Validation);
    /// structural problems (no models, shared axis names, regions on unknown
    /// axes, dangling mutators) are
    /// [`Error::Configuration`](crate::error::Error::Configuration).
    pub fn validate(&self) -> error::Result<()> {
        if self.models.is_empty() {
            return configuration("a compound scan needs at least one model");
        }
        let mut owners: HashMap<_, usize> = HashMap::new();
        for (index, model) in self.models.iter().enumerate() {
            model.validate()?;
            for axis in model.axes() {
                if let Some(other) = owners.insert(axis.clone(), index) {
                    return configuration(format!(
                        "axis '{axis}' is owned by both model {other} ({}) and model {index} ({})",
                        self.models[other].name(),
                        model.name()
                    ));
                }
            }
        }
        for region in &self.regions {
            region.validate()?;
            if let Some(axis) = region.axes().iter().find(|a| !owners.contains_key(*a)) {
                return configuration(format!(
                    "region '{}' refers to axis '{axis}', which no model owns",
                    region.name()
                ));
            }
        }
        for (&index, mutators) in &self.mutators {
            if index >= self.models.len() {
                return configuration(format!(
                    "mutator attached to model {index}, but the scan has {} models",
                    self.models.len()
                ));
            }
            for mutator in mutators {
                mutator.validate()?;
            }
        }
        Ok(())
    }

    /// Validate and build the generator for the current state.
    pub fn generator(&self) -> error::Result<CompoundGenerator> {
        CompoundGenerator::new(self)
    }
}
