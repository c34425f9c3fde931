use std::sync::Arc;

use serde::Serialize;
use shared::{
    domain::{BathType, ExposureLevel, ImageRef, ProcessState, SessionId, Stage, ViewMode},
    error::IntentRejection,
    protocol::{DryingSnapshot, Intent, SessionSnapshot},
};
use tokio::{
    sync::{broadcast, Mutex},
    time::{interval_at, sleep_until, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info, warn};

use crate::{
    error::DarkroomError,
    image_provider::ImageProvider,
    session::{ExposureProgress, Session},
    timers::{TimerSet, TimerSlot},
    timing::Timing,
};

const EVENT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum DarkroomEvent {
    StageChanged {
        from: Stage,
        to: Stage,
    },
    ExposureTick {
        elapsed_secs: f64,
    },
    ExposureCommitted {
        elapsed_secs: f64,
        level: ExposureLevel,
    },
    ImmersionChanged {
        bath: Option<BathType>,
    },
    BathTick {
        bath: BathType,
        elapsed_secs: f64,
    },
    DryingProgress(DryingSnapshot),
    RoomLightToggled {
        on: bool,
    },
    ViewModeChanged(ViewMode),
    ImageLoading {
        scene_description: String,
    },
    ImageResolved {
        image_ref: ImageRef,
        fallback: bool,
    },
    IntentRejected(IntentRejection),
    SessionReset {
        session_id: SessionId,
    },
}

struct ControllerState {
    session: Session,
    timers: TimerSet,
}

pub struct StageController {
    inner: Mutex<ControllerState>,
    events: broadcast::Sender<DarkroomEvent>,
    timing: Timing,
    image_provider: Arc<dyn ImageProvider>,
    fallback_image: ImageRef,
}

impl StageController {
    pub fn new(
        timing: Timing,
        image_provider: Arc<dyn ImageProvider>,
        fallback_image: ImageRef,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            inner: Mutex::new(ControllerState {
                session: Session::new(timing.clone()),
                timers: TimerSet::default(),
            }),
            events,
            timing,
            image_provider,
            fallback_image,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<DarkroomEvent> {
        self.events.subscribe()
    }

    pub async fn subscribe_process(&self) -> broadcast::Receiver<ProcessState> {
        self.inner.lock().await.session.store().subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().await.session.snapshot()
    }

    pub async fn stage(&self) -> Stage {
        self.inner.lock().await.session.stage()
    }

    pub async fn process_state(&self) -> ProcessState {
        self.inner.lock().await.session.state().clone()
    }

    pub async fn active_timers(&self) -> Vec<TimerSlot> {
        self.inner.lock().await.timers.active_slots()
    }

    /// Presentation entry point. Rejections are logged and broadcast; the
    /// session is left untouched.
    pub async fn dispatch(self: &Arc<Self>, intent: Intent) -> Result<(), DarkroomError> {
        let name = intent.name();
        let result = match intent {
            Intent::StartExposure => self.start_exposure().await,
            Intent::StopExposure => self.stop_exposure().await.map(|_| ()),
            Intent::PlaceInBath { bath } => self.place_in_bath(bath).await,
            Intent::RemoveFromBath => self.remove_from_bath().await.map(|_| ()),
            Intent::ToggleRoomLight => {
                self.toggle_room_light().await;
                Ok(())
            }
            Intent::ToggleViewMode => {
                self.toggle_view_mode().await;
                Ok(())
            }
            Intent::ConfirmStageAdvance => self.confirm_stage_advance().await.map(|_| ()),
            Intent::Reset => {
                self.reset().await;
                Ok(())
            }
            Intent::RequestImage { theme } => self.request_image(&theme).await,
        };

        if let Err(err) = &result {
            warn!(intent = name, error = %err, "darkroom: intent rejected");
            self.emit(DarkroomEvent::IntentRejected(err.rejection(name)));
        }
        result
    }

    pub async fn start_exposure(self: &Arc<Self>) -> Result<(), DarkroomError> {
        let mut guard = self.inner.lock().await;
        guard.session.start_exposure()?;
        info!("darkroom: shutter opened");
        self.spawn_exposure_timer(&mut guard);
        Ok(())
    }

    pub async fn stop_exposure(self: &Arc<Self>) -> Result<ExposureLevel, DarkroomError> {
        let mut guard = self.inner.lock().await;
        let (elapsed_secs, level) = guard.session.stop_exposure()?;
        info!("darkroom: shutter closed after {elapsed_secs:.1}s level={level:?}");
        self.emit(DarkroomEvent::ExposureCommitted {
            elapsed_secs,
            level,
        });
        self.enter_stage(&mut guard, Stage::Capture, Stage::Develop);
        Ok(level)
    }

    pub async fn place_in_bath(self: &Arc<Self>, bath: BathType) -> Result<(), DarkroomError> {
        let mut guard = self.inner.lock().await;
        if !guard.session.place_in_bath(bath)? {
            return Ok(());
        }
        debug!(bath = ?bath, "darkroom: paper placed in tray");
        self.emit(DarkroomEvent::ImmersionChanged { bath: Some(bath) });
        self.spawn_bath_timer(&mut guard);
        Ok(())
    }

    pub async fn remove_from_bath(&self) -> Result<Option<BathType>, DarkroomError> {
        let mut guard = self.inner.lock().await;
        guard.timers.cancel(TimerSlot::Bath);
        let removed = guard.session.remove_from_bath()?;
        if let Some(bath) = removed {
            debug!(bath = ?bath, "darkroom: paper lifted from tray");
            if guard.session.state().is_poorly_fixed && bath == BathType::Fixer {
                warn!("darkroom: print left the fixer before it was fixed");
            }
            self.emit(DarkroomEvent::ImmersionChanged { bath: None });
        }
        Ok(removed)
    }

    pub async fn toggle_room_light(&self) -> bool {
        let on = self.inner.lock().await.session.toggle_room_light();
        self.emit(DarkroomEvent::RoomLightToggled { on });
        on
    }

    pub async fn toggle_view_mode(&self) -> ViewMode {
        let mode = self.inner.lock().await.session.toggle_view_mode();
        self.emit(DarkroomEvent::ViewModeChanged(mode));
        mode
    }

    pub async fn confirm_stage_advance(self: &Arc<Self>) -> Result<Stage, DarkroomError> {
        let mut guard = self.inner.lock().await;
        let from = guard.session.stage();
        let had_bath = guard.session.current_bath().is_some();
        let to = guard.session.confirm_stage_advance()?;
        if had_bath {
            self.emit(DarkroomEvent::ImmersionChanged { bath: None });
        }
        self.enter_stage(&mut guard, from, to);
        Ok(to)
    }

    /// Cancels every timer, including a pending image request, and starts a
    /// fresh session in CAPTURE.
    pub async fn reset(&self) -> SessionId {
        let mut guard = self.inner.lock().await;
        let from = guard.session.stage();
        guard.timers.cancel_all();
        guard.session.reset();
        let session_id = guard.session.id();
        info!("darkroom: session reset from {from}");
        self.emit(DarkroomEvent::SessionReset { session_id });
        if from != Stage::Capture {
            self.emit(DarkroomEvent::StageChanged {
                from,
                to: Stage::Capture,
            });
        }
        session_id
    }

    /// Starts an image request in the background. Completion, success or
    /// fallback, lands as one patch of `image_ref` and `scene_description`.
    pub async fn request_image(self: &Arc<Self>, theme: &str) -> Result<(), DarkroomError> {
        let scene = theme.trim().to_string();
        let mut guard = self.inner.lock().await;
        guard.session.begin_image_request(&scene)?;

        let generation = guard.timers.reserve();
        let controller = Arc::clone(self);
        let task_scene = scene.clone();
        let handle = tokio::spawn(async move {
            controller.resolve_image(generation, task_scene).await;
        });
        guard.timers.install(TimerSlot::Image, generation, handle);

        info!("darkroom: requesting scene image theme={scene:?}");
        self.emit(DarkroomEvent::ImageLoading {
            scene_description: scene,
        });
        Ok(())
    }

    fn emit(&self, event: DarkroomEvent) {
        let _ = self.events.send(event);
    }

    fn enter_stage(self: &Arc<Self>, state: &mut ControllerState, from: Stage, to: Stage) {
        match from {
            Stage::Capture => {
                state.timers.cancel(TimerSlot::Exposure);
            }
            Stage::Develop => {
                state.timers.cancel(TimerSlot::Bath);
            }
            Stage::Dry => {
                state.timers.cancel(TimerSlot::Drying);
            }
            Stage::Review => {}
        }
        info!("darkroom: stage {from} -> {to}");
        self.emit(DarkroomEvent::StageChanged { from, to });

        if to == Stage::Dry && state.session.begin_drying() {
            self.spawn_drying_cycle(state);
        }
    }

    fn spawn_exposure_timer(self: &Arc<Self>, state: &mut ControllerState) {
        let generation = state.timers.reserve();
        let controller = Arc::clone(self);
        let handle = tokio::spawn(async move {
            controller.run_exposure_timer(generation).await;
        });
        state.timers.install(TimerSlot::Exposure, generation, handle);
    }

    async fn run_exposure_timer(self: Arc<Self>, generation: u64) {
        let period = self.timing.exposure_tick;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let mut guard = self.inner.lock().await;
            if !guard.timers.is_current(TimerSlot::Exposure, generation) {
                break;
            }
            match guard.session.exposure_tick() {
                Ok(Some(ExposureProgress::Running { elapsed_secs })) => {
                    self.emit(DarkroomEvent::ExposureTick { elapsed_secs });
                }
                Ok(Some(ExposureProgress::Committed {
                    elapsed_secs,
                    level,
                })) => {
                    guard.timers.release(TimerSlot::Exposure, generation);
                    info!("darkroom: exposure cut off at {elapsed_secs:.1}s level={level:?}");
                    self.emit(DarkroomEvent::ExposureCommitted {
                        elapsed_secs,
                        level,
                    });
                    self.enter_stage(&mut guard, Stage::Capture, Stage::Develop);
                    break;
                }
                Ok(None) => {
                    guard.timers.release(TimerSlot::Exposure, generation);
                    break;
                }
                Err(err) => {
                    error!(error = %err, "darkroom: exposure tick failed");
                    guard.timers.release(TimerSlot::Exposure, generation);
                    break;
                }
            }
        }
    }

    fn spawn_bath_timer(self: &Arc<Self>, state: &mut ControllerState) {
        let generation = state.timers.reserve();
        let controller = Arc::clone(self);
        let handle = tokio::spawn(async move {
            controller.run_bath_timer(generation).await;
        });
        state.timers.install(TimerSlot::Bath, generation, handle);
    }

    async fn run_bath_timer(self: Arc<Self>, generation: u64) {
        let period = self.timing.bath_tick;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let mut guard = self.inner.lock().await;
            if !guard.timers.is_current(TimerSlot::Bath, generation) {
                break;
            }
            match guard.session.bath_tick() {
                Ok(Some(progress)) => {
                    self.emit(DarkroomEvent::BathTick {
                        bath: progress.bath,
                        elapsed_secs: progress.elapsed_secs,
                    });
                }
                Ok(None) => {
                    guard.timers.release(TimerSlot::Bath, generation);
                    break;
                }
                Err(err) => {
                    error!(error = %err, "darkroom: bath tick failed");
                    guard.timers.release(TimerSlot::Bath, generation);
                    break;
                }
            }
        }
    }

    fn spawn_drying_cycle(self: &Arc<Self>, state: &mut ControllerState) {
        let generation = state.timers.reserve();
        let controller = Arc::clone(self);
        let handle = tokio::spawn(async move {
            controller.run_drying_cycle(generation).await;
        });
        state.timers.install(TimerSlot::Drying, generation, handle);
    }

    async fn run_drying_cycle(self: Arc<Self>, generation: u64) {
        let entered = Instant::now();

        sleep_until(entered + self.timing.cover_delay).await;
        {
            let mut guard = self.inner.lock().await;
            if !guard.timers.is_current(TimerSlot::Drying, generation) {
                return;
            }
            guard.session.cover_print();
            debug!("darkroom: dryer cover lowered");
            self.emit(DarkroomEvent::DryingProgress(guard.session.drying()));
        }

        let period = self.timing.drying_tick;
        let mut ticker = interval_at(entered + self.timing.drying_start_delay + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let mut guard = self.inner.lock().await;
            if !guard.timers.is_current(TimerSlot::Drying, generation) {
                return;
            }
            let finished = match guard.session.drying_tick() {
                Ok(finished) => finished,
                Err(err) => {
                    error!(error = %err, "darkroom: drying tick failed");
                    guard.timers.release(TimerSlot::Drying, generation);
                    return;
                }
            };
            self.emit(DarkroomEvent::DryingProgress(guard.session.drying()));
            if !finished {
                continue;
            }

            guard.timers.release(TimerSlot::Drying, generation);
            info!("darkroom: print is dry");
            if self.timing.auto_review && guard.session.finish_drying() {
                self.enter_stage(&mut guard, Stage::Dry, Stage::Review);
            }
            return;
        }
    }

    async fn resolve_image(self: Arc<Self>, generation: u64, scene: String) {
        let (image_ref, fallback) = match self.image_provider.request_image(&scene).await {
            Ok(image_ref) => (image_ref, false),
            Err(err) => {
                warn!(error = %err, "darkroom: image generation failed; using fallback image");
                (self.fallback_image.clone(), true)
            }
        };

        let mut guard = self.inner.lock().await;
        if !guard.timers.is_current(TimerSlot::Image, generation) {
            debug!("darkroom: dropping image for a superseded request");
            return;
        }
        guard.timers.release(TimerSlot::Image, generation);
        if let Err(err) = guard.session.finish_image_request(image_ref.clone(), &scene) {
            error!(error = %err, "darkroom: failed to store scene image");
            return;
        }
        info!("darkroom: scene image ready fallback={fallback}");
        self.emit(DarkroomEvent::ImageResolved {
            image_ref,
            fallback,
        });
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
