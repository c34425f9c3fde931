use shared::domain::{BathType, ExposureLevel, ImageRef, ProcessState};
use tokio::sync::broadcast;

use crate::error::StoreError;

const UPDATE_CHANNEL_CAPACITY: usize = 256;

/// Merge patch: `None` fields keep their value, bath entries merge per bath.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessPatch {
    pub exposure_time_secs: Option<f64>,
    pub exposure_level: Option<ExposureLevel>,
    pub is_exposed: Option<bool>,
    pub development_level: Option<f64>,
    pub bath_elapsed: Vec<(BathType, f64)>,
    pub is_fixed: Option<bool>,
    pub is_poorly_fixed: Option<bool>,
    pub is_washed: Option<bool>,
    pub is_dry: Option<bool>,
    pub image_ref: Option<ImageRef>,
    pub scene_description: Option<String>,
}

impl ProcessPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits an exposure: time, level and the exposed flag travel together.
    pub fn exposure(mut self, secs: f64, level: ExposureLevel) -> Self {
        self.exposure_time_secs = Some(secs);
        self.exposure_level = Some(level);
        self.is_exposed = Some(true);
        self
    }

    pub fn development_level(mut self, level: f64) -> Self {
        self.development_level = Some(level);
        self
    }

    pub fn bath_elapsed(mut self, bath: BathType, secs: f64) -> Self {
        self.bath_elapsed.retain(|(existing, _)| *existing != bath);
        self.bath_elapsed.push((bath, secs));
        self
    }

    pub fn fixed(mut self, value: bool) -> Self {
        self.is_fixed = Some(value);
        self
    }

    pub fn poorly_fixed(mut self, value: bool) -> Self {
        self.is_poorly_fixed = Some(value);
        self
    }

    pub fn washed(mut self, value: bool) -> Self {
        self.is_washed = Some(value);
        self
    }

    pub fn dry(mut self, value: bool) -> Self {
        self.is_dry = Some(value);
        self
    }

    pub fn image(mut self, image_ref: ImageRef, scene_description: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref);
        self.scene_description = Some(scene_description.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn validate(&self, current: &ProcessState) -> Result<(), StoreError> {
        if let Some(secs) = self.exposure_time_secs {
            non_negative("exposure_time_secs", secs)?;
        }
        if let Some(level) = self.development_level {
            finite("development_level", level)?;
            if !(0.0..=1.0).contains(&level) {
                return Err(StoreError::OutOfUnitRange {
                    field: "development_level",
                    value: level,
                });
            }
        }
        for &(bath, secs) in &self.bath_elapsed {
            non_negative("bath_elapsed", secs)?;
            let from = current.bath_elapsed.get(bath);
            if secs < from {
                return Err(StoreError::CounterDecrease {
                    bath,
                    from,
                    to: secs,
                });
            }
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), StoreError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(StoreError::NonFinite { field })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), StoreError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(StoreError::Negative { field, value });
    }
    Ok(())
}

pub struct ProcessStore {
    state: ProcessState,
    updates: broadcast::Sender<ProcessState>,
}

impl ProcessStore {
    pub fn new() -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            state: ProcessState::default(),
            updates,
        }
    }

    pub fn get(&self) -> &ProcessState {
        &self.state
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProcessState> {
        self.updates.subscribe()
    }

    pub fn apply(&mut self, patch: ProcessPatch) -> Result<&ProcessState, StoreError> {
        patch.validate(&self.state)?;

        let ProcessPatch {
            exposure_time_secs,
            exposure_level,
            is_exposed,
            development_level,
            bath_elapsed,
            is_fixed,
            is_poorly_fixed,
            is_washed,
            is_dry,
            image_ref,
            scene_description,
        } = patch;

        let state = &mut self.state;
        if let Some(v) = exposure_time_secs {
            state.exposure_time_secs = v;
        }
        if let Some(v) = exposure_level {
            state.exposure_level = v;
        }
        if let Some(v) = is_exposed {
            state.is_exposed = v;
        }
        if let Some(v) = development_level {
            state.development_level = v;
        }
        for (bath, secs) in bath_elapsed {
            state.bath_elapsed.set(bath, secs);
        }
        if let Some(v) = is_fixed {
            state.is_fixed = v;
        }
        if let Some(v) = is_poorly_fixed {
            state.is_poorly_fixed = v;
        }
        if let Some(v) = is_washed {
            state.is_washed = v;
        }
        if let Some(v) = is_dry {
            state.is_dry = v;
        }
        if image_ref.is_some() {
            state.image_ref = image_ref;
        }
        if scene_description.is_some() {
            state.scene_description = scene_description;
        }

        self.notify();
        Ok(&self.state)
    }

    /// Back to the zero state. The only way any counter goes down.
    pub fn reset(&mut self) {
        self.state = ProcessState::default();
        self.notify();
    }

    fn notify(&self) {
        // No subscribers is fine.
        let _ = self.updates.send(self.state.clone());
    }
}

impl Default for ProcessStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
