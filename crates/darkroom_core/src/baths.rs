use shared::domain::{
    BathType, ProcessState, DEVELOPER_VISIBLE_FRACTION, FIXER_CRITICAL_SECS, WASH_COMPLETE_SECS,
};

use crate::{error::DarkroomError, store::ProcessPatch};

#[derive(Debug, Clone, Default)]
pub(crate) struct Immersion {
    current: Option<BathType>,
}

impl Immersion {
    pub(crate) fn current(&self) -> Option<BathType> {
        self.current
    }

    /// Returns `false` when the paper already lies in `bath`.
    pub(crate) fn place(&mut self, bath: BathType) -> Result<bool, DarkroomError> {
        match self.current {
            Some(current) if current == bath => Ok(false),
            Some(current) => Err(DarkroomError::DoubleImmersion {
                current,
                requested: bath,
            }),
            None => {
                self.current = Some(bath);
                Ok(true)
            }
        }
    }

    pub(crate) fn remove(&mut self) -> Option<BathType> {
        self.current.take()
    }
}

pub fn development_level(developer_elapsed: f64) -> f64 {
    let full_at = BathType::Developer.definition().optimal_secs * DEVELOPER_VISIBLE_FRACTION;
    (developer_elapsed / full_at).min(1.0)
}

pub(crate) fn tick_patch(bath: BathType, state: &ProcessState, step_secs: f64) -> ProcessPatch {
    let elapsed = state.bath_elapsed.get(bath) + step_secs;
    let mut patch = ProcessPatch::new().bath_elapsed(bath, elapsed);

    match bath {
        BathType::Developer => {
            let level = development_level(elapsed).max(state.development_level);
            patch = patch.development_level(level);
        }
        BathType::Fixer if elapsed >= FIXER_CRITICAL_SECS => {
            if !state.is_fixed || state.is_poorly_fixed {
                patch = patch.fixed(true).poorly_fixed(false);
            }
        }
        BathType::Wash if elapsed >= WASH_COMPLETE_SECS && !state.is_washed => {
            patch = patch.washed(true);
        }
        _ => {}
    }
    patch
}

/// Pulling the print out of the fixer too early leaves it poorly fixed.
pub(crate) fn removal_patch(bath: BathType, state: &ProcessState) -> Option<ProcessPatch> {
    (bath == BathType::Fixer && state.bath_elapsed.get(BathType::Fixer) < FIXER_CRITICAL_SECS)
        .then(|| ProcessPatch::new().poorly_fixed(true))
}

#[cfg(test)]
#[path = "tests/baths_tests.rs"]
mod tests;
