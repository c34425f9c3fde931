use std::time::Duration;

use shared::domain::EXPOSURE_CAP_SECS;

/// Tick-counted so repeated fractional steps never drift.
#[derive(Debug, Clone)]
pub(crate) struct ExposureMeter {
    tick: Duration,
    ticks: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum MeterReading {
    Running { elapsed_secs: f64 },
    /// The hard cap was hit; the shutter is closed again.
    Capped { elapsed_secs: f64 },
}

impl ExposureMeter {
    pub(crate) fn new(tick: Duration) -> Self {
        Self { tick, ticks: None }
    }

    pub(crate) fn is_open(&self) -> bool {
        self.ticks.is_some()
    }

    /// Opens the shutter from zero. Returns `false` if it was already open.
    pub(crate) fn open(&mut self) -> bool {
        if self.ticks.is_some() {
            return false;
        }
        self.ticks = Some(0);
        true
    }

    pub(crate) fn tick(&mut self) -> Option<MeterReading> {
        let ticks = self.ticks.as_mut()?;
        *ticks += 1;
        let elapsed_millis = millis(*ticks, self.tick);
        if elapsed_millis >= cap_millis() {
            self.ticks = None;
            return Some(MeterReading::Capped {
                elapsed_secs: EXPOSURE_CAP_SECS,
            });
        }
        Some(MeterReading::Running {
            elapsed_secs: elapsed_millis as f64 / 1000.0,
        })
    }

    pub(crate) fn close(&mut self) -> Option<f64> {
        let ticks = self.ticks.take()?;
        Some(millis(ticks, self.tick) as f64 / 1000.0)
    }

    pub(crate) fn elapsed_secs(&self) -> Option<f64> {
        self.ticks
            .map(|ticks| millis(ticks, self.tick) as f64 / 1000.0)
    }
}

fn millis(ticks: u64, tick: Duration) -> u128 {
    u128::from(ticks) * tick.as_millis()
}

fn cap_millis() -> u128 {
    (EXPOSURE_CAP_SECS * 1000.0) as u128
}
