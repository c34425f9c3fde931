use serde::{Deserialize, Serialize};

use crate::domain::{
    BathType, ExposureBand, ExposureLevel, ProcessState, SessionId, Stage, ViewMode,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Intent {
    StartExposure,
    StopExposure,
    PlaceInBath { bath: BathType },
    RemoveFromBath,
    ToggleRoomLight,
    ToggleViewMode,
    ConfirmStageAdvance,
    Reset,
    RequestImage { theme: String },
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::StartExposure => "start_exposure",
            Intent::StopExposure => "stop_exposure",
            Intent::PlaceInBath { .. } => "place_in_bath",
            Intent::RemoveFromBath => "remove_from_bath",
            Intent::ToggleRoomLight => "toggle_room_light",
            Intent::ToggleViewMode => "toggle_view_mode",
            Intent::ConfirmStageAdvance => "confirm_stage_advance",
            Intent::Reset => "reset",
            Intent::RequestImage { .. } => "request_image",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixingOverlay {
    pub brightness: f64,
    pub contrast: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sepia: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformDescriptor {
    pub grayscale: f64,
    pub brightness: f64,
    pub contrast: f64,
    pub invert: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<FixingOverlay>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

impl TransformDescriptor {
    pub fn to_filter_string(&self) -> String {
        let mut filter = format!(
            "grayscale({}%) brightness({}) contrast({})",
            self.grayscale * 100.0,
            self.brightness,
            self.contrast
        );
        if self.invert {
            filter.push_str(" invert(100%)");
        }
        if let Some(overlay) = &self.overlay {
            filter.push_str(&format!(
                " brightness({}) contrast({})",
                overlay.brightness, overlay.contrast
            ));
            if let Some(sepia) = overlay.sepia {
                filter.push_str(&format!(" sepia({sepia})"));
            }
        }
        if let Some(opacity) = self.opacity {
            filter.push_str(&format!(" opacity({opacity})"));
        }
        filter
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposureReading {
    pub elapsed_secs: f64,
    pub band: ExposureBand,
    pub hint: ExposureLevel,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DryingSnapshot {
    pub covered: bool,
    pub progress_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BathReport {
    pub bath: BathType,
    pub name: String,
    pub elapsed_secs: f64,
    pub optimal_secs: f64,
    pub progress_percent: f64,
    pub adequate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub stage: Stage,
    pub process: ProcessState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exposure: Option<ExposureReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_bath: Option<BathType>,
    pub critical_fix_warning: bool,
    pub drying: DryingSnapshot,
    pub view_mode: ViewMode,
    pub room_light_on: bool,
    pub image_loading: bool,
    pub result_transform: TransformDescriptor,
    pub reference_transform: TransformDescriptor,
    pub advisory: String,
    pub can_advance: bool,
    pub lab_log: Vec<BathReport>,
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
