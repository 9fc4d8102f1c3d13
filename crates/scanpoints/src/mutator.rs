//! Declarative per-model sequence transforms.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    error::{self, configuration},
    position::Position,
};

/// The transform a [`Mutator`] applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MutatorKind {
    /// Reverse the target model's sequence on alternate passes, producing
    /// boustrophedon ordering across any nesting depth.
    ///
    /// Parameters: an optional period `p` (default `1`). Pass `k` of the
    /// target runs backwards when `(k / p)` is odd. Further parameters are
    /// carried but not interpreted.
    Alternating,
    /// Displace every coordinate of the target model by a pseudo-random
    /// amount drawn uniformly from `[-offset, offset]`.
    ///
    /// Parameters: the maximum absolute `offset` (required) and an optional
    /// integer `seed` (default `0`). The same seed always yields the same
    /// displacements. Indices are left untouched and the model's own regions
    /// are checked before displacement.
    RandomOffset,
}

/// A transform attached to one model of a compound scan.
#[derive(Clone, Debug, PartialEq)]
pub struct Mutator {
    /// What the mutator does.
    kind: MutatorKind,
    /// Kind-specific payload.
    parameters: Vec<f64>,
}

impl Mutator {
    /// A mutator with an explicit parameter payload.
    pub fn new(kind: MutatorKind, parameters: impl IntoIterator<Item = f64>) -> Self {
        Self {
            kind,
            parameters: parameters.into_iter().collect(),
        }
    }

    /// Alternate direction on every pass.
    pub fn alternating() -> Self {
        Self::new(MutatorKind::Alternating, [])
    }

    /// Jitter every coordinate by up to `offset`, reproducibly for `seed`.
    pub fn random_offset(offset: f64, seed: u64) -> Self {
        Self::new(MutatorKind::RandomOffset, [offset, seed as f64])
    }

    /// The mutator kind.
    pub fn kind(&self) -> MutatorKind {
        self.kind
    }

    /// The raw parameter payload.
    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    /// Number of consecutive passes run in the same direction.
    fn period(&self) -> u64 {
        self.parameters.first().map_or(1, |&p| p as u64)
    }

    /// Whether pass number `pass` (zero-based) of the target runs backwards.
    pub fn reverses(&self, pass: u64) -> bool {
        match self.kind {
            MutatorKind::Alternating => (pass / self.period()) % 2 == 1,
            MutatorKind::RandomOffset => false,
        }
    }

    /// Rewrite a model's materialised sequence in place.
    pub(crate) fn apply(&self, points: &mut [Position]) {
        match self.kind {
            MutatorKind::Alternating => {}
            MutatorKind::RandomOffset => {
                let offset = self.parameters.first().copied().unwrap_or(0.0);
                if offset == 0.0 {
                    return;
                }
                let seed = self.parameters.get(1).map_or(0, |&s| s as u64);
                let mut rng = StdRng::seed_from_u64(seed);
                for point in points.iter_mut() {
                    for axis in point.values_mut() {
                        axis.value += rng.gen_range(-offset..=offset);
                    }
                }
            }
        }
    }

    /// Reject payloads the kind cannot interpret.
    pub(crate) fn validate(&self) -> error::Result<()> {
        match self.kind {
            MutatorKind::Alternating => match self.parameters.first() {
                Some(&p) if !(p.is_finite() && p >= 1.0 && p.fract() == 0.0) => configuration(
                    format!("alternating mutator period must be a positive integer, got {p}"),
                ),
                _ => Ok(()),
            },
            MutatorKind::RandomOffset => {
                match self.parameters.first() {
                    None => {
                        return configuration("random offset mutator needs a maximum offset");
                    }
                    Some(&offset) if !(offset.is_finite() && offset >= 0.0) => {
                        return configuration(format!(
                            "random offset must be finite and non-negative, got {offset}"
                        ));
                    }
                    Some(_) => {}
                }
                match self.parameters.get(1) {
                    Some(&seed) if !(seed.is_finite() && seed >= 0.0 && seed.fract() == 0.0) => {
                        configuration(format!(
                            "random offset seed must be a non-negative integer, got {seed}"
                        ))
                    }
                    _ => Ok(()),
                }
            }
        }
    }
}
