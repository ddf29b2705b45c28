//! Best-candidate selection.
//!
//! Candidates are scored in parallel and reduced with a total order:
//! higher score first, then lower enumeration index. The combine step is
//! associative and commutative under that order, so the winner does not
//! depend on how rayon splits the work.

use rayon::prelude::*;
use smartcrop_models::{CropRect, ScoredCrop};

use crate::cancel::Interrupt;
use crate::error::{CropError, CropResult};
use crate::scorer::Scorer;

/// Candidates scored between interrupt checks.
const CHECK_INTERVAL: usize = 256;

/// A scored candidate and its enumeration index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked {
    pub index: usize,
    pub crop: ScoredCrop,
}

impl Ranked {
    /// True when `self` should win over `other`.
    fn beats(&self, other: &Ranked) -> bool {
        let (a, b) = (self.crop.score.total, other.crop.score.total);
        a > b || (a == b && self.index < other.index)
    }
}

fn better(a: Option<Ranked>, b: Option<Ranked>) -> Option<Ranked> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if b.beats(&a) { b } else { a }),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Score every candidate and return the winner.
pub fn select_best(
    scorer: &Scorer,
    candidates: &[CropRect],
    interrupt: &Interrupt,
) -> CropResult<Ranked> {
    candidates
        .par_iter()
        .enumerate()
        .map(|(index, rect)| -> CropResult<Option<Ranked>> {
            if index % CHECK_INTERVAL == 0 {
                interrupt.check()?;
            }
            Ok(Some(Ranked {
                index,
                crop: ScoredCrop::new(*rect, scorer.score(rect)),
            }))
        })
        .try_reduce(|| None, |a, b| Ok(better(a, b)))?
        .ok_or_else(|| CropError::internal("no crop candidates to score"))
}
