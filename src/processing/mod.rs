/*! Cleaning

Contains the merge logic turning normalized candidates into [crate::record::NormalizationRecord]s.

- [merge] holds the in-memory variant: everything is grouped then sorted.
- [MergeTracker] holds the streaming variant: a canonical identifier is emitted as soon as
  every candidate mapping to it has been seen, and then forgotten.
- [Cleaner] drives a [crate::sources::Source] through both passes.
!*/
mod cleaner;
pub mod merge;
mod tracker;

pub use cleaner::{CleanReport, Cleaner};
pub use tracker::{Leftovers, MergeTracker};

use crate::error::Error;

/// Stages of a cleaning run, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    Pass1Scanning,
    Pass1Normalizing,
    Pass2ScanningAndEmitting,
    Finalizing,
    Done,
}

impl Stage {
    /// Stage following this one, if any.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Init => Some(Stage::Pass1Scanning),
            Stage::Pass1Scanning => Some(Stage::Pass1Normalizing),
            Stage::Pass1Normalizing => Some(Stage::Pass2ScanningAndEmitting),
            Stage::Pass2ScanningAndEmitting => Some(Stage::Finalizing),
            Stage::Finalizing => Some(Stage::Done),
            Stage::Done => None,
        }
    }

    /// Move to `to`, which has to be the next stage.
    pub fn advance(&mut self, to: Stage) -> Result<(), Error> {
        if self.next() != Some(to) {
            return Err(Error::StageOrder { from: *self, to });
        }
        *self = to;
        Ok(())
    }
}
