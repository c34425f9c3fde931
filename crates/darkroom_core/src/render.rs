use shared::{
    domain::{ExposureBand, Stage, ViewMode, REFERENCE_EXPOSURE_SECS},
    protocol::{FixingOverlay, TransformDescriptor},
};

/// Lower bound on the develop-stage opacity so the paper never vanishes.
const MIN_DEVELOP_OPACITY: f64 = 0.01;
const POOR_FIX_SEPIA: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenderTarget {
    Result,
    Reference,
}

pub fn compute_transform(
    exposure_secs: f64,
    stage: Stage,
    development_level: f64,
    poorly_fixed: bool,
    view_mode: ViewMode,
) -> TransformDescriptor {
    transform_for(
        RenderTarget::Result,
        exposure_secs,
        stage,
        development_level,
        poorly_fixed,
        view_mode,
    )
}

/// Transform for the ideal print: always a correct exposure, never the
/// develop-stage fade.
pub fn reference_transform(
    stage: Stage,
    poorly_fixed: bool,
    view_mode: ViewMode,
) -> TransformDescriptor {
    transform_for(
        RenderTarget::Reference,
        REFERENCE_EXPOSURE_SECS,
        stage,
        1.0,
        poorly_fixed,
        view_mode,
    )
}

fn transform_for(
    target: RenderTarget,
    exposure_secs: f64,
    stage: Stage,
    development_level: f64,
    poorly_fixed: bool,
    view_mode: ViewMode,
) -> TransformDescriptor {
    let (brightness, contrast) = tone_curve(exposure_secs);
    let negative = view_mode == ViewMode::Negative;

    let overlay = poorly_fixed.then(|| {
        if negative {
            FixingOverlay {
                brightness: 0.6,
                contrast: 0.5,
                sepia: None,
            }
        } else {
            FixingOverlay {
                brightness: 1.4,
                contrast: 0.6,
                sepia: Some(POOR_FIX_SEPIA),
            }
        }
    });

    let opacity = (stage == Stage::Develop && target == RenderTarget::Result)
        .then(|| development_level.max(MIN_DEVELOP_OPACITY));

    TransformDescriptor {
        grayscale: 1.0,
        brightness,
        contrast,
        invert: negative,
        overlay,
        opacity,
    }
}

pub fn tone_curve(exposure_secs: f64) -> (f64, f64) {
    match ExposureBand::of_print(exposure_secs) {
        ExposureBand::Blank => (0.0, 1.0),
        ExposureBand::Under => {
            let factor = (exposure_secs - ExposureBand::BLANK_MAX_SECS)
                / (ExposureBand::UNDER_MAX_SECS - ExposureBand::BLANK_MAX_SECS);
            (factor * 0.5, 1.6 + (1.0 - factor))
        }
        ExposureBand::Correct => (1.0, 1.3),
        ExposureBand::Over => {
            let factor = (exposure_secs - ExposureBand::CORRECT_MAX_SECS)
                / (ExposureBand::OVER_MAX_SECS - ExposureBand::CORRECT_MAX_SECS);
            (1.0 + factor * 12.0, 1.3 - factor * 0.8)
        }
        // Fully burnt: the positive stays paper white.
        ExposureBand::BurntOut => (100.0, 1.0),
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
