use super::*;

#[test]
fn intents_use_adjacent_tagging() {
    let intent = Intent::PlaceInBath {
        bath: BathType::Fixer,
    };
    let json = serde_json::to_value(&intent).expect("serialize");
    assert_eq!(json["type"], "place_in_bath");
    assert_eq!(json["payload"]["bath"], "fixer");

    let parsed: Intent =
        serde_json::from_str(r#"{"type":"toggle_view_mode"}"#).expect("deserialize");
    assert_eq!(parsed, Intent::ToggleViewMode);
}

#[test]
fn filter_string_lists_steps_in_application_order() {
    let descriptor = TransformDescriptor {
        grayscale: 1.0,
        brightness: 1.0,
        contrast: 1.3,
        invert: true,
        overlay: Some(FixingOverlay {
            brightness: 0.6,
            contrast: 0.5,
            sepia: None,
        }),
        opacity: Some(0.5),
    };
    assert_eq!(
        descriptor.to_filter_string(),
        "grayscale(100%) brightness(1) contrast(1.3) invert(100%) brightness(0.6) contrast(0.5) opacity(0.5)"
    );
}

#[test]
fn positive_filter_omits_invert_and_opacity() {
    let descriptor = TransformDescriptor {
        grayscale: 1.0,
        brightness: 0.0,
        contrast: 1.0,
        invert: false,
        overlay: None,
        opacity: None,
    };
    assert_eq!(
        descriptor.to_filter_string(),
        "grayscale(100%) brightness(0) contrast(1)"
    );
}
