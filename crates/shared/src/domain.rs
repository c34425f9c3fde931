use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const FIXER_CRITICAL_SECS: f64 = 40.0;
pub const WASH_COMPLETE_SECS: f64 = 60.0;
/// Wash time that already unlocks drying, even if the wash is incomplete.
pub const WASH_LENIENT_SECS: f64 = 30.0;
pub const DEVELOPER_VISIBLE_FRACTION: f64 = 0.7;
pub const EXPOSURE_CAP_SECS: f64 = 60.0;
pub const REFERENCE_EXPOSURE_SECS: f64 = 25.0;
pub const ADEQUATE_BATH_FRACTION: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Capture,
    Develop,
    Dry,
    Review,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Capture => "capture",
            Stage::Develop => "develop",
            Stage::Dry => "dry",
            Stage::Review => "review",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BathType {
    Developer,
    Stop,
    Fixer,
    Wash,
}

impl BathType {
    pub const ALL: [BathType; 4] = [
        BathType::Developer,
        BathType::Stop,
        BathType::Fixer,
        BathType::Wash,
    ];

    pub fn definition(self) -> &'static BathDefinition {
        &BATHS[self.index()]
    }

    pub(crate) fn index(self) -> usize {
        match self {
            BathType::Developer => 0,
            BathType::Stop => 1,
            BathType::Fixer => 2,
            BathType::Wash => 3,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "developer" | "dev" => Some(BathType::Developer),
            "stop" => Some(BathType::Stop),
            "fixer" | "fix" => Some(BathType::Fixer),
            "wash" => Some(BathType::Wash),
            _ => None,
        }
    }
}

impl fmt::Display for BathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.definition().name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BathDefinition {
    pub id: BathType,
    pub name: &'static str,
    pub optimal_secs: f64,
    pub threshold_secs: Option<f64>,
    pub description: &'static str,
    pub chemistry: &'static str,
}

pub static BATHS: [BathDefinition; 4] = [
    BathDefinition {
        id: BathType::Developer,
        name: "Developer",
        optimal_secs: 90.0,
        threshold_secs: None,
        description: "Alkaline solution that reduces exposed silver halide grains to metallic silver, revealing the latent image.",
        chemistry: "Hydroquinone and metol; Ag+ + e- -> Ag. Denser areas deposit more silver.",
    },
    BathDefinition {
        id: BathType::Stop,
        name: "Stop Bath",
        optimal_secs: 30.0,
        threshold_secs: None,
        description: "Halts development and neutralises the alkaline developer carried over on the paper.",
        chemistry: "Dilute acetic acid; the pH drop stops development at once and protects the fixer.",
    },
    BathDefinition {
        id: BathType::Fixer,
        name: "Fixer",
        optimal_secs: 120.0,
        threshold_secs: Some(FIXER_CRITICAL_SECS),
        description: "Dissolves the remaining light-sensitive silver salts so the image becomes permanent.",
        chemistry: "Sodium thiosulfate; AgBr + 2 S2O3 -> [Ag(S2O3)2] + Br.",
    },
    BathDefinition {
        id: BathType::Wash,
        name: "Wash",
        optimal_secs: 300.0,
        threshold_secs: Some(WASH_COMPLETE_SECS),
        description: "Running water removes residual chemistry from the paper fibres.",
        chemistry: "Plain water; leftover fixer would yellow and fade the print over time.",
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposureLevel {
    Under,
    Correct,
    Over,
}

impl ExposureLevel {
    pub fn classify(exposure_secs: f64) -> Self {
        ExposureBand::of(exposure_secs).level()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposureBand {
    Blank,
    Under,
    Correct,
    Over,
    BurntOut,
}

impl ExposureBand {
    pub const BLANK_MAX_SECS: f64 = 5.0;
    pub const UNDER_MAX_SECS: f64 = 18.0;
    pub const CORRECT_MAX_SECS: f64 = 32.0;
    pub const OVER_MAX_SECS: f64 = 55.0;

    /// Band used for classification: exactly 18s still counts as under.
    pub fn of(exposure_secs: f64) -> Self {
        if exposure_secs <= Self::UNDER_MAX_SECS {
            Self::lower(exposure_secs)
        } else {
            Self::upper(exposure_secs)
        }
    }

    /// Band used for the print's tones and the review advice, where exactly
    /// 18s already looks correct.
    pub fn of_print(exposure_secs: f64) -> Self {
        if exposure_secs < Self::UNDER_MAX_SECS {
            Self::lower(exposure_secs)
        } else {
            Self::upper(exposure_secs)
        }
    }

    fn lower(exposure_secs: f64) -> Self {
        if exposure_secs <= Self::BLANK_MAX_SECS {
            ExposureBand::Blank
        } else {
            ExposureBand::Under
        }
    }

    fn upper(exposure_secs: f64) -> Self {
        if exposure_secs <= Self::CORRECT_MAX_SECS {
            ExposureBand::Correct
        } else if exposure_secs <= Self::OVER_MAX_SECS {
            ExposureBand::Over
        } else {
            ExposureBand::BurntOut
        }
    }

    pub fn level(self) -> ExposureLevel {
        match self {
            ExposureBand::Blank | ExposureBand::Under => ExposureLevel::Under,
            ExposureBand::Correct => ExposureLevel::Correct,
            ExposureBand::Over | ExposureBand::BurntOut => ExposureLevel::Over,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Negative,
    Positive,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Negative => ViewMode::Positive,
            ViewMode::Positive => ViewMode::Negative,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BathTimers {
    pub developer: f64,
    pub stop: f64,
    pub fixer: f64,
    pub wash: f64,
}

impl BathTimers {
    pub fn get(&self, bath: BathType) -> f64 {
        match bath {
            BathType::Developer => self.developer,
            BathType::Stop => self.stop,
            BathType::Fixer => self.fixer,
            BathType::Wash => self.wash,
        }
    }

    pub fn set(&mut self, bath: BathType, secs: f64) {
        match bath {
            BathType::Developer => self.developer = secs,
            BathType::Stop => self.stop = secs,
            BathType::Fixer => self.fixer = secs,
            BathType::Wash => self.wash = secs,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (BathType, f64)> + '_ {
        BathType::ALL.into_iter().map(|bath| (bath, self.get(bath)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessState {
    pub exposure_time_secs: f64,
    pub exposure_level: ExposureLevel,
    pub is_exposed: bool,
    pub development_level: f64,
    pub bath_elapsed: BathTimers,
    pub is_fixed: bool,
    pub is_poorly_fixed: bool,
    pub is_washed: bool,
    pub is_dry: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_description: Option<String>,
}

impl Default for ProcessState {
    fn default() -> Self {
        Self {
            exposure_time_secs: 0.0,
            // Placeholder until capture commits the real classification.
            exposure_level: ExposureLevel::Correct,
            is_exposed: false,
            development_level: 0.0,
            bath_elapsed: BathTimers::default(),
            is_fixed: false,
            is_poorly_fixed: false,
            is_washed: false,
            is_dry: false,
            image_ref: None,
            scene_description: None,
        }
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
