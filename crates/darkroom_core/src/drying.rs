use shared::protocol::DryingSnapshot;

const COMPLETE_PERCENT: f64 = 100.0;

#[derive(Debug, Clone, Default)]
pub(crate) struct DryingCycle {
    started: bool,
    covered: bool,
    progress: f64,
}

impl DryingCycle {
    /// Marks the cycle as scheduled. Only the first call per stage entry wins.
    pub(crate) fn begin(&mut self) -> bool {
        if self.started {
            return false;
        }
        self.started = true;
        true
    }

    pub(crate) fn cover(&mut self) {
        if self.progress < COMPLETE_PERCENT {
            self.covered = true;
        }
    }

    /// Advances by `step` percent; returns `true` on the step that completes the cycle.
    pub(crate) fn advance(&mut self, step: f64) -> bool {
        if self.progress >= COMPLETE_PERCENT {
            return false;
        }
        self.progress = (self.progress + step).min(COMPLETE_PERCENT);
        if self.progress >= COMPLETE_PERCENT {
            self.covered = false;
            return true;
        }
        false
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.progress >= COMPLETE_PERCENT && !self.covered
    }

    pub(crate) fn snapshot(&self) -> DryingSnapshot {
        DryingSnapshot {
            covered: self.covered,
            progress_percent: self.progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begins_once() {
        let mut cycle = DryingCycle::default();
        assert!(cycle.begin());
        assert!(!cycle.begin());
    }

    #[test]
    fn uncovers_on_the_completing_step() {
        let mut cycle = DryingCycle::default();
        cycle.begin();
        cycle.cover();
        let mut steps = 0;
        while !cycle.advance(0.5) {
            steps += 1;
            assert!(cycle.snapshot().covered);
        }
        assert_eq!(steps, 199);
        assert_eq!(
            cycle.snapshot(),
            DryingSnapshot {
                covered: false,
                progress_percent: 100.0
            }
        );
        assert!(cycle.is_complete());
        assert!(!cycle.advance(0.5));
    }

    #[test]
    fn overshooting_step_clamps_to_full() {
        let mut cycle = DryingCycle::default();
        assert!(!cycle.advance(60.0));
        assert!(cycle.advance(60.0));
        assert_eq!(cycle.snapshot().progress_percent, 100.0);
    }
}
