//! Stage-scoped timer ownership.
//!
//! Every spawned timer lives in a [`TimerSet`] slot. Dropping the slot's
//! [`ScopedTimer`] aborts the task, and each task re-checks its generation
//! under the controller lock before mutating anything, so a task racing its
//! own cancellation never applies a stale update.

use serde::Serialize;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerSlot {
    Exposure,
    Bath,
    Drying,
    Image,
}

impl TimerSlot {
    pub const ALL: [TimerSlot; 4] = [
        TimerSlot::Exposure,
        TimerSlot::Bath,
        TimerSlot::Drying,
        TimerSlot::Image,
    ];
}

struct ScopedTimer {
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl ScopedTimer {
    /// Lets a finishing task drop its own registration without aborting itself.
    fn detach(mut self) {
        self.handle.take();
    }

    fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[derive(Default)]
pub(crate) struct TimerSet {
    next_generation: u64,
    exposure: Option<ScopedTimer>,
    bath: Option<ScopedTimer>,
    drying: Option<ScopedTimer>,
    image: Option<ScopedTimer>,
}

impl TimerSet {
    fn slot(&self, slot: TimerSlot) -> &Option<ScopedTimer> {
        match slot {
            TimerSlot::Exposure => &self.exposure,
            TimerSlot::Bath => &self.bath,
            TimerSlot::Drying => &self.drying,
            TimerSlot::Image => &self.image,
        }
    }

    fn slot_mut(&mut self, slot: TimerSlot) -> &mut Option<ScopedTimer> {
        match slot {
            TimerSlot::Exposure => &mut self.exposure,
            TimerSlot::Bath => &mut self.bath,
            TimerSlot::Drying => &mut self.drying,
            TimerSlot::Image => &mut self.image,
        }
    }

    /// Hands out the token a new task must present on every tick.
    pub(crate) fn reserve(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    /// Registers a spawned task, aborting whatever held the slot before.
    pub(crate) fn install(&mut self, slot: TimerSlot, generation: u64, handle: JoinHandle<()>) {
        *self.slot_mut(slot) = Some(ScopedTimer {
            generation,
            handle: Some(handle),
        });
    }

    pub(crate) fn is_current(&self, slot: TimerSlot, generation: u64) -> bool {
        self.slot(slot)
            .as_ref()
            .is_some_and(|timer| timer.generation == generation)
    }

    pub(crate) fn is_active(&self, slot: TimerSlot) -> bool {
        self.slot(slot).as_ref().is_some_and(ScopedTimer::is_running)
    }

    pub(crate) fn cancel(&mut self, slot: TimerSlot) -> bool {
        self.slot_mut(slot).take().is_some()
    }

    /// Called by a task that is about to finish on its own.
    pub(crate) fn release(&mut self, slot: TimerSlot, generation: u64) {
        if self.is_current(slot, generation) {
            if let Some(timer) = self.slot_mut(slot).take() {
                timer.detach();
            }
        }
    }

    pub(crate) fn cancel_all(&mut self) {
        for slot in TimerSlot::ALL {
            self.cancel(slot);
        }
    }

    pub(crate) fn active_slots(&self) -> Vec<TimerSlot> {
        TimerSlot::ALL
            .into_iter()
            .filter(|slot| self.is_active(*slot))
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/timers_tests.rs"]
mod tests;
