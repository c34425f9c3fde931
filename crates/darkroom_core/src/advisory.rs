use shared::domain::{ExposureBand, ExposureLevel};

pub fn advisory(exposure_secs: f64) -> &'static str {
    match ExposureBand::of_print(exposure_secs) {
        ExposureBand::Blank => {
            "Almost no light reached the paper. The negative is empty (white) and the positive is solid black."
        }
        ExposureBand::Under => {
            "Underexposed. Too little silver formed, so the positive is dark and the shadows lack detail."
        }
        ExposureBand::Correct => {
            "Excellent exposure! The tones are rich and detail holds across the whole range."
        }
        ExposureBand::Over => {
            "Overexposed. Too much silver was deposited and the highlights of the positive are blown out."
        }
        ExposureBand::BurntOut => {
            "Completely burnt. The negative turned into a dense black block that no light can pass, so the positive stays white."
        }
    }
}

/// The 18-20s "almost there" line is cosmetic; classification still treats
/// anything above 18s as correct.
pub fn live_status(elapsed_secs: f64) -> &'static str {
    if elapsed_secs < 5.0 {
        "Too little light..."
    } else if elapsed_secs < ExposureBand::UNDER_MAX_SECS {
        "Underexposed (little silver is forming)"
    } else if elapsed_secs < 20.0 {
        "Almost there..."
    } else if elapsed_secs <= ExposureBand::CORRECT_MAX_SECS {
        "PERFECT EXPOSURE!"
    } else if elapsed_secs < 45.0 {
        "Overexposed (negative is darkening)"
    } else if elapsed_secs < ExposureBand::OVER_MAX_SECS {
        "Dangerously overexposed..."
    } else {
        "Completely burnt!"
    }
}

pub fn timer_hint(elapsed_secs: f64) -> ExposureLevel {
    if elapsed_secs < ExposureBand::UNDER_MAX_SECS {
        ExposureLevel::Under
    } else if elapsed_secs <= ExposureBand::CORRECT_MAX_SECS {
        ExposureLevel::Correct
    } else {
        ExposureLevel::Over
    }
}
