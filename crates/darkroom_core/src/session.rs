use shared::{
    domain::{
        BathType, ExposureBand, ExposureLevel, ImageRef, ProcessState, SessionId, Stage,
        ViewMode, ADEQUATE_BATH_FRACTION, FIXER_CRITICAL_SECS, WASH_LENIENT_SECS,
    },
    protocol::{BathReport, DryingSnapshot, ExposureReading, SessionSnapshot},
};

use crate::{
    advisory,
    baths::{self, Immersion},
    drying::DryingCycle,
    error::DarkroomError,
    exposure::{ExposureMeter, MeterReading},
    render,
    store::{ProcessPatch, ProcessStore},
    timing::Timing,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ExposureProgress {
    Running {
        elapsed_secs: f64,
    },
    /// The cap closed the shutter and the capture was committed.
    Committed {
        elapsed_secs: f64,
        level: ExposureLevel,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BathProgress {
    pub(crate) bath: BathType,
    pub(crate) elapsed_secs: f64,
}

pub(crate) struct Session {
    id: SessionId,
    stage: Stage,
    store: ProcessStore,
    exposure: ExposureMeter,
    immersion: Immersion,
    drying: DryingCycle,
    view_mode: ViewMode,
    room_light_on: bool,
    image_loading: bool,
    timing: Timing,
}

impl Session {
    pub(crate) fn new(timing: Timing) -> Self {
        Self {
            id: SessionId::new(),
            stage: Stage::Capture,
            store: ProcessStore::new(),
            exposure: ExposureMeter::new(timing.exposure_tick),
            immersion: Immersion::default(),
            drying: DryingCycle::default(),
            view_mode: ViewMode::default(),
            room_light_on: false,
            image_loading: false,
            timing,
        }
    }

    pub(crate) fn id(&self) -> SessionId {
        self.id
    }

    pub(crate) fn stage(&self) -> Stage {
        self.stage
    }

    pub(crate) fn state(&self) -> &ProcessState {
        self.store.get()
    }

    pub(crate) fn store(&self) -> &ProcessStore {
        &self.store
    }

    pub(crate) fn current_bath(&self) -> Option<BathType> {
        self.immersion.current()
    }

    pub(crate) fn drying(&self) -> DryingSnapshot {
        self.drying.snapshot()
    }

    // --- capture -------------------------------------------------------

    pub(crate) fn start_exposure(&mut self) -> Result<(), DarkroomError> {
        const INTENT: &str = "start_exposure";
        if self.stage != Stage::Capture {
            return Err(DarkroomError::invalid(
                INTENT,
                self.stage,
                "the paper has already been exposed",
            ));
        }
        if !self.exposure.open() {
            return Err(DarkroomError::invalid(
                INTENT,
                self.stage,
                "the shutter is already open",
            ));
        }
        Ok(())
    }

    pub(crate) fn exposure_tick(&mut self) -> Result<Option<ExposureProgress>, DarkroomError> {
        if self.stage != Stage::Capture {
            return Ok(None);
        }
        match self.exposure.tick() {
            None => Ok(None),
            Some(MeterReading::Running { elapsed_secs }) => {
                Ok(Some(ExposureProgress::Running { elapsed_secs }))
            }
            Some(MeterReading::Capped { elapsed_secs }) => {
                let level = self.commit_exposure(elapsed_secs)?;
                Ok(Some(ExposureProgress::Committed {
                    elapsed_secs,
                    level,
                }))
            }
        }
    }

    pub(crate) fn stop_exposure(&mut self) -> Result<(f64, ExposureLevel), DarkroomError> {
        if self.stage != Stage::Capture || !self.exposure.is_open() {
            return Err(DarkroomError::invalid(
                "stop_exposure",
                self.stage,
                "the shutter is not open",
            ));
        }
        let elapsed_secs = self.exposure.close().unwrap_or_default();
        let level = self.commit_exposure(elapsed_secs)?;
        Ok((elapsed_secs, level))
    }

    fn commit_exposure(&mut self, elapsed_secs: f64) -> Result<ExposureLevel, DarkroomError> {
        let level = ExposureLevel::classify(elapsed_secs);
        self.store
            .apply(ProcessPatch::new().exposure(elapsed_secs, level))?;
        self.stage = Stage::Develop;
        Ok(level)
    }

    // --- develop -------------------------------------------------------

    /// Returns `true` when the paper was newly put into `bath`.
    pub(crate) fn place_in_bath(&mut self, bath: BathType) -> Result<bool, DarkroomError> {
        if self.stage != Stage::Develop {
            return Err(DarkroomError::invalid(
                "place_in_bath",
                self.stage,
                "trays are only used in the darkroom",
            ));
        }
        self.immersion.place(bath)
    }

    /// No-op when the paper is not in any tray.
    pub(crate) fn remove_from_bath(&mut self) -> Result<Option<BathType>, DarkroomError> {
        let Some(bath) = self.immersion.remove() else {
            return Ok(None);
        };
        if let Some(patch) = baths::removal_patch(bath, self.store.get()) {
            self.store.apply(patch)?;
        }
        Ok(Some(bath))
    }

    pub(crate) fn bath_tick(&mut self) -> Result<Option<BathProgress>, DarkroomError> {
        if self.stage != Stage::Develop {
            return Ok(None);
        }
        let Some(bath) = self.immersion.current() else {
            return Ok(None);
        };
        let patch = baths::tick_patch(bath, self.store.get(), self.timing.bath_step_secs);
        let state = self.store.apply(patch)?;
        Ok(Some(BathProgress {
            bath,
            elapsed_secs: state.bath_elapsed.get(bath),
        }))
    }

    fn rinsed_enough(&self) -> bool {
        let state = self.store.get();
        state.is_washed || state.bath_elapsed.get(BathType::Wash) > WASH_LENIENT_SECS
    }

    pub(crate) fn critical_fix_warning(&self) -> bool {
        self.immersion.current() == Some(BathType::Fixer)
            && self.store.get().bath_elapsed.get(BathType::Fixer) < FIXER_CRITICAL_SECS
    }

    // --- dry -----------------------------------------------------------

    /// Returns `false` if the drying cycle for this stage entry already started.
    pub(crate) fn begin_drying(&mut self) -> bool {
        self.stage == Stage::Dry && self.drying.begin()
    }

    pub(crate) fn cover_print(&mut self) {
        if self.stage == Stage::Dry {
            self.drying.cover();
        }
    }

    /// Returns `true` on the tick that finishes drying.
    pub(crate) fn drying_tick(&mut self) -> Result<bool, DarkroomError> {
        if self.stage != Stage::Dry {
            return Ok(false);
        }
        if !self.drying.advance(self.timing.drying_step_percent) {
            return Ok(false);
        }
        self.store.apply(ProcessPatch::new().dry(true))?;
        Ok(true)
    }

    // --- transitions ---------------------------------------------------

    pub(crate) fn can_advance(&self) -> bool {
        match self.stage {
            Stage::Develop => self.rinsed_enough(),
            Stage::Dry => self.drying.is_complete(),
            Stage::Capture | Stage::Review => false,
        }
    }

    pub(crate) fn confirm_stage_advance(&mut self) -> Result<Stage, DarkroomError> {
        const INTENT: &str = "confirm_stage_advance";
        match self.stage {
            Stage::Capture => Err(DarkroomError::invalid(
                INTENT,
                self.stage,
                "capture ends when the shutter closes",
            )),
            Stage::Develop if !self.rinsed_enough() => Err(DarkroomError::invalid(
                INTENT,
                self.stage,
                "the print needs more than 30s in the wash first",
            )),
            Stage::Develop => {
                // Lifting the print out of the tray on the way to the dryer.
                self.remove_from_bath()?;
                self.stage = Stage::Dry;
                Ok(Stage::Dry)
            }
            Stage::Dry if !self.drying.is_complete() => Err(DarkroomError::invalid(
                INTENT,
                self.stage,
                "the print is still drying",
            )),
            Stage::Dry => {
                self.stage = Stage::Review;
                Ok(Stage::Review)
            }
            Stage::Review => Err(DarkroomError::invalid(
                INTENT,
                self.stage,
                "the session is finished; reset to start over",
            )),
        }
    }

    /// Automatic DRY -> REVIEW once the print is dry and uncovered.
    pub(crate) fn finish_drying(&mut self) -> bool {
        if self.stage == Stage::Dry && self.drying.is_complete() {
            self.stage = Stage::Review;
            return true;
        }
        false
    }

    // --- presentation toggles -------------------------------------------

    pub(crate) fn toggle_room_light(&mut self) -> bool {
        self.room_light_on = !self.room_light_on;
        self.room_light_on
    }

    pub(crate) fn toggle_view_mode(&mut self) -> ViewMode {
        self.view_mode = self.view_mode.toggled();
        self.view_mode
    }

    // --- scene image ----------------------------------------------------

    pub(crate) fn begin_image_request(&mut self, theme: &str) -> Result<(), DarkroomError> {
        const INTENT: &str = "request_image";
        if self.image_loading {
            return Err(DarkroomError::ImageRequestPending);
        }
        if self.stage != Stage::Capture {
            return Err(DarkroomError::invalid(
                INTENT,
                self.stage,
                "the scene can only change before exposure",
            ));
        }
        if self.exposure.is_open() {
            return Err(DarkroomError::invalid(
                INTENT,
                self.stage,
                "the shutter is open",
            ));
        }
        if theme.trim().is_empty() {
            return Err(DarkroomError::invalid(
                INTENT,
                self.stage,
                "the scene description is empty",
            ));
        }
        self.image_loading = true;
        Ok(())
    }

    pub(crate) fn finish_image_request(
        &mut self,
        image_ref: ImageRef,
        scene_description: &str,
    ) -> Result<(), DarkroomError> {
        self.image_loading = false;
        self.store
            .apply(ProcessPatch::new().image(image_ref, scene_description))?;
        Ok(())
    }

    // --- lifecycle ------------------------------------------------------

    pub(crate) fn reset(&mut self) {
        self.store.reset();
        self.id = SessionId::new();
        self.stage = Stage::Capture;
        self.exposure = ExposureMeter::new(self.timing.exposure_tick);
        self.immersion = Immersion::default();
        self.drying = DryingCycle::default();
        self.view_mode = ViewMode::default();
        self.room_light_on = false;
        self.image_loading = false;
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        let state = self.store.get();
        let exposure = self.exposure.elapsed_secs().map(|elapsed_secs| ExposureReading {
            elapsed_secs,
            band: ExposureBand::of(elapsed_secs),
            hint: advisory::timer_hint(elapsed_secs),
            status: advisory::live_status(elapsed_secs).to_string(),
        });

        SessionSnapshot {
            session_id: self.id,
            stage: self.stage,
            process: state.clone(),
            exposure,
            current_bath: self.immersion.current(),
            critical_fix_warning: self.critical_fix_warning(),
            drying: self.drying.snapshot(),
            view_mode: self.view_mode,
            room_light_on: self.room_light_on,
            image_loading: self.image_loading,
            result_transform: render::compute_transform(
                state.exposure_time_secs,
                self.stage,
                state.development_level,
                state.is_poorly_fixed,
                self.view_mode,
            ),
            reference_transform: render::reference_transform(
                self.stage,
                state.is_poorly_fixed,
                self.view_mode,
            ),
            advisory: advisory::advisory(state.exposure_time_secs).to_string(),
            can_advance: self.can_advance(),
            lab_log: lab_log(state),
        }
    }
}

fn lab_log(state: &ProcessState) -> Vec<BathReport> {
    state
        .bath_elapsed
        .iter()
        .map(|(bath, elapsed_secs)| {
            let def = bath.definition();
            BathReport {
                bath,
                name: def.name.to_string(),
                elapsed_secs,
                optimal_secs: def.optimal_secs,
                progress_percent: (elapsed_secs / def.optimal_secs * 100.0).min(100.0),
                adequate: elapsed_secs >= def.optimal_secs * ADEQUATE_BATH_FRACTION,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
