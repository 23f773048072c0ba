use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::PathBuf;

/// One target image together with the source chosen to replace it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceJob {
    /// 1-based position in the target list, used for progress display
    pub index: usize,
    pub total: usize,
    pub target: PathBuf,
    pub source: PathBuf,
}

/// Shuffled source list that repeats forever
///
/// The shuffle happens once at construction; afterwards the same order is
/// replayed every time the end of the list is reached.
#[derive(Debug, Clone)]
pub struct SourceCycle {
    order: Vec<PathBuf>,
    position: usize,
}

impl SourceCycle {
    pub fn new(mut sources: Vec<PathBuf>, seed: Option<u64>) -> Result<Self> {
        if sources.is_empty() {
            return Err(anyhow::anyhow!("Cannot cycle over an empty source list"));
        }

        match seed {
            Some(seed) => sources.shuffle(&mut StdRng::seed_from_u64(seed)),
            None => sources.shuffle(&mut rand::rng()),
        }

        Ok(Self {
            order: sources,
            position: 0,
        })
    }

    /// The shuffled order one lap of the cycle follows
    pub fn order(&self) -> &[PathBuf] {
        &self.order
    }
}

impl Iterator for SourceCycle {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        let item = self.order[self.position].clone();
        self.position = (self.position + 1) % self.order.len();
        Some(item)
    }
}

/// Assign one source to every target, in target order
pub fn pair_targets(targets: Vec<PathBuf>, sources: &mut SourceCycle) -> Vec<ReplaceJob> {
    let total = targets.len();
    targets
        .into_iter()
        .zip(sources)
        .enumerate()
        .map(|(i, (target, source))| ReplaceJob {
            index: i + 1,
            total,
            target,
            source,
        })
        .collect()
}
