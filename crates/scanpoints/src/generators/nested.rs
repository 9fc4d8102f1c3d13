use super::{PathGenerator, Positions, RegionFilter};
use crate::{
    composer::CompoundGenerator,
    compound::CompoundModel,
    error,
    position::AxisName,
    region::Region,
};

/// Generator for a [`CompoundModel`] used as one model of an enclosing
/// compound.
///
/// Regions the enclosing scan places wholly on the nested axes are folded
/// into the nested compound, so the wrapper itself never filters. Its
/// dimensions are the nested compound's flattened dimensions.
#[derive(Debug)]
pub struct NestedGenerator {
    /// Every axis of the nested compound.
    axes: Vec<AxisName>,
    /// The nested compound with the folded regions.
    inner: CompoundGenerator,
}

impl NestedGenerator {
    /// Build from a validated compound, folding in `filter`'s regions.
    pub fn new(model: &CompoundModel, filter: RegionFilter) -> error::Result<Self> {
        let mut model = model.clone();
        model.add_regions(filter.regions().iter().cloned());
        let inner = model.generator()?;
        Ok(Self {
            axes: inner.axes(),
            inner,
        })
    }
}

impl PathGenerator for NestedGenerator {
    fn name(&self) -> &'static str {
        "compound"
    }
    fn axes(&self) -> &[AxisName] {
        &self.axes
    }
    fn regions(&self) -> &[Region] {
        &[]
    }
    fn size(&self) -> Option<u64> {
        None
    }
    fn max_size(&self) -> u64 {
        self.inner.max_size()
    }
    fn shape(&self) -> Vec<u64> {
        self.inner.shape()
    }
    fn accepted_count(&self) -> u64 {
        self.inner.size()
    }
    fn dimension_names(&self) -> Vec<Vec<AxisName>> {
        self.inner.dimension_names()
    }
    fn positions(&self) -> Positions<'_> {
        Box::new(self.inner.positions())
    }
}
