use super::*;

fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn blank_exposure_renders_black_positive() {
    let t = compute_transform(3.0, Stage::Review, 1.0, false, ViewMode::Positive);
    assert_eq!(t.brightness, 0.0);
    assert_eq!(t.contrast, 1.0);
    assert_eq!(t.grayscale, 1.0);
    assert!(!t.invert);
}

#[test]
fn correct_exposure_has_flat_curve() {
    let t = compute_transform(25.0, Stage::Review, 1.0, false, ViewMode::Negative);
    assert_eq!(t.brightness, 1.0);
    assert_eq!(t.contrast, 1.3);
    assert!(t.invert);
}

#[test]
fn overexposure_interpolates_between_breakpoints() {
    let (brightness, contrast) = tone_curve(45.0);
    let factor = 13.0 / 23.0;
    approx(brightness, 1.0 + factor * 12.0);
    approx(contrast, 1.3 - factor * 0.8);
    assert!((brightness - 7.78).abs() < 0.01);
    assert!((contrast - 0.85).abs() < 0.01);
}

#[test]
fn underexposure_interpolates_towards_correct() {
    let (brightness, contrast) = tone_curve(11.5);
    approx(brightness, 0.25);
    approx(contrast, 2.1);
    let (brightness, contrast) = tone_curve(17.35);
    approx(brightness, 0.475);
    approx(contrast, 1.65);
}

#[test]
fn eighteen_seconds_already_prints_correct_tones() {
    assert_eq!(tone_curve(18.0), (1.0, 1.3));
    let transform = compute_transform(18.0, Stage::Review, 1.0, false, ViewMode::Positive);
    assert_eq!(transform.brightness, 1.0);
    assert_eq!(transform.contrast, 1.3);
}

#[test]
fn burnt_out_exposure_saturates() {
    assert_eq!(tone_curve(58.0), (100.0, 1.0));
}

#[test]
fn poor_fixing_overlay_depends_on_view() {
    let negative = compute_transform(25.0, Stage::Review, 1.0, true, ViewMode::Negative);
    assert_eq!(
        negative.overlay,
        Some(FixingOverlay {
            brightness: 0.6,
            contrast: 0.5,
            sepia: None
        })
    );

    let positive = compute_transform(25.0, Stage::Review, 1.0, true, ViewMode::Positive);
    assert_eq!(
        positive.overlay,
        Some(FixingOverlay {
            brightness: 1.4,
            contrast: 0.6,
            sepia: Some(0.5)
        })
    );
}

#[test]
fn develop_stage_fades_in_the_result_only() {
    let t = compute_transform(25.0, Stage::Develop, 0.0, false, ViewMode::Negative);
    assert_eq!(t.opacity, Some(0.01));
    let t = compute_transform(25.0, Stage::Develop, 0.4, false, ViewMode::Negative);
    assert_eq!(t.opacity, Some(0.4));
    let t = compute_transform(25.0, Stage::Dry, 0.4, false, ViewMode::Negative);
    assert_eq!(t.opacity, None);

    let reference = reference_transform(Stage::Develop, false, ViewMode::Negative);
    assert_eq!(reference.opacity, None);
}

#[test]
fn reference_ignores_actual_exposure() {
    let reference = reference_transform(Stage::Review, false, ViewMode::Positive);
    let at_25 = compute_transform(25.0, Stage::Review, 1.0, false, ViewMode::Positive);
    assert_eq!(reference, at_25);
}

#[test]
fn identical_inputs_give_identical_descriptors() {
    for secs in [0.0, 4.9, 12.3, 18.0, 27.0, 40.5, 55.0, 60.0] {
        let a = compute_transform(secs, Stage::Develop, 0.37, true, ViewMode::Positive);
        let b = compute_transform(secs, Stage::Develop, 0.37, true, ViewMode::Positive);
        assert_eq!(a.brightness.to_bits(), b.brightness.to_bits());
        assert_eq!(a.contrast.to_bits(), b.contrast.to_bits());
        assert_eq!(a, b);
    }
}
