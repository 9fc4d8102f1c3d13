//! Dimension flattening.
//!
//! Every model contributes its own axis groups, outer to inner. A region
//! whose axes fall into two or more groups merges those groups and every
//! group lying between them, so a dimension is always a contiguous run of
//! axes. A merge that reaches into a model with several groups takes in all
//! of that model's groups, so a dimension spanning several models only ever
//! holds whole models. Merging is a union over group intervals and therefore
//! independent of the order regions are supplied in.

use std::ops::Range;

use crate::{position::AxisName, region::Region};

/// One output-array axis: a contiguous group of scan axes that share a
/// single extent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dimension {
    /// Member axes, outer to inner, each model's own group order preserved.
    axes: Vec<AxisName>,
    /// Indices of the models whose axes the dimension covers.
    models: Range<usize>,
    /// Indices of the model groups merged into the dimension, counted
    /// across every model.
    groups: Range<usize>,
}

impl Dimension {
    /// Member axes.
    pub fn axes(&self) -> &[AxisName] {
        &self.axes
    }

    /// Indices of the models the dimension spans, outermost first.
    pub fn models(&self) -> Range<usize> {
        self.models.clone()
    }

    /// Indices of the merged model groups, counted across every model in
    /// order.
    pub fn groups(&self) -> Range<usize> {
        self.groups.clone()
    }

    /// Whether `name` belongs to this dimension.
    pub fn contains(&self, name: &str) -> bool {
        self.axes.iter().any(|axis| &**axis == name)
    }
}

/// Union-find over group indices. Roots are always the smallest member.
#[derive(Debug)]
struct DisjointSets {
    /// Parent links; a root points at itself.
    parent: Vec<usize>,
}

impl DisjointSets {
    /// `n` singleton sets.
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    /// Representative of `x`'s set, halving the path on the way.
    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merge the sets holding `a` and `b`.
    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            let (low, high) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[high] = low;
        }
    }
}

/// A model's axis group before flattening.
#[derive(Debug)]
struct Group<'a> {
    /// Owning model.
    model: usize,
    /// Axes in the model's reported order.
    axes: &'a [AxisName],
}

/// Partition the models' axis groups into dimensions under `regions`.
///
/// `models[i]` holds model `i`'s own grouping as reported by its generator.
/// Region axes owned by no model are ignored; callers validate them first.
pub(crate) fn flatten(models: &[Vec<Vec<AxisName>>], regions: &[Region]) -> Vec<Dimension> {
    let groups: Vec<Group<'_>> = models
        .iter()
        .enumerate()
        .flat_map(|(model, groups)| groups.iter().map(move |axes| Group { model, axes }))
        .collect();
    let group_of = |name: &AxisName| groups.iter().position(|g| g.axes.contains(name));

    let mut sets = DisjointSets::new(groups.len());
    for region in regions {
        let touched = region.axes().iter().filter_map(group_of);
        let span = touched.fold(None, |span: Option<(usize, usize)>, g| match span {
            None => Some((g, g)),
            Some((lo, hi)) => Some((lo.min(g), hi.max(g))),
        });
        if let Some((lo, hi)) = span.filter(|(lo, hi)| lo != hi) {
            let lo = groups
                .iter()
                .position(|g| g.model == groups[lo].model)
                .unwrap_or(lo);
            let hi = groups
                .iter()
                .rposition(|g| g.model == groups[hi].model)
                .unwrap_or(hi);
            for g in lo + 1..=hi {
                sets.union(lo, g);
            }
        }
    }

    let mut dimensions: Vec<Dimension> = Vec::new();
    let mut current_root = None;
    for (index, group) in groups.iter().enumerate() {
        let root = sets.find(index);
        match dimensions.last_mut() {
            Some(last) if current_root == Some(root) => {
                last.axes.extend(group.axes.iter().cloned());
                last.models.end = group.model + 1;
                last.groups.end = index + 1;
            }
            _ => dimensions.push(Dimension {
                axes: group.axes.to_vec(),
                models: group.model..group.model + 1,
                groups: index..index + 1,
            }),
        }
        current_root = Some(root);
    }
    dimensions
}
