use super::*;

fn with_elapsed(bath: BathType, secs: f64) -> ProcessState {
    let mut state = ProcessState::default();
    state.bath_elapsed.set(bath, secs);
    state
}

#[test]
fn double_immersion_is_rejected() {
    let mut immersion = Immersion::default();
    assert!(immersion.place(BathType::Developer).expect("first"));
    assert!(!immersion.place(BathType::Developer).expect("same tray"));
    let err = immersion.place(BathType::Stop).expect_err("second tray");
    assert_eq!(
        err,
        DarkroomError::DoubleImmersion {
            current: BathType::Developer,
            requested: BathType::Stop
        }
    );
    assert_eq!(immersion.current(), Some(BathType::Developer));
}

#[test]
fn removing_twice_is_harmless() {
    let mut immersion = Immersion::default();
    immersion.place(BathType::Wash).expect("place");
    assert_eq!(immersion.remove(), Some(BathType::Wash));
    assert_eq!(immersion.remove(), None);
}

#[test]
fn developer_reaches_full_visibility_at_seventy_percent() {
    assert_eq!(development_level(0.0), 0.0);
    assert!((development_level(31.5) - 0.5).abs() < 1e-9);
    assert_eq!(development_level(63.0), 1.0);
    assert_eq!(development_level(90.0), 1.0);
}

#[test]
fn developer_tick_updates_level() {
    let state = with_elapsed(BathType::Developer, 62.0);
    let patch = tick_patch(BathType::Developer, &state, 1.0);
    assert_eq!(patch.bath_elapsed, vec![(BathType::Developer, 63.0)]);
    assert_eq!(patch.development_level, Some(1.0));
}

#[test]
fn fixer_flips_on_the_tick_that_reaches_forty() {
    let before = tick_patch(BathType::Fixer, &with_elapsed(BathType::Fixer, 38.0), 1.0);
    assert_eq!(before.is_fixed, None);

    let mut state = with_elapsed(BathType::Fixer, 39.0);
    state.is_poorly_fixed = true;
    let patch = tick_patch(BathType::Fixer, &state, 1.0);
    assert_eq!(patch.is_fixed, Some(true));
    assert_eq!(patch.is_poorly_fixed, Some(false));
}

#[test]
fn wash_completes_at_sixty() {
    let patch = tick_patch(BathType::Wash, &with_elapsed(BathType::Wash, 59.0), 1.0);
    assert_eq!(patch.is_washed, Some(true));

    let mut washed = with_elapsed(BathType::Wash, 70.0);
    washed.is_washed = true;
    assert_eq!(tick_patch(BathType::Wash, &washed, 1.0).is_washed, None);
}

#[test]
fn early_fixer_removal_marks_poor_fixing() {
    let early = removal_patch(BathType::Fixer, &with_elapsed(BathType::Fixer, 20.0));
    assert_eq!(early.and_then(|p| p.is_poorly_fixed), Some(true));
    assert!(removal_patch(BathType::Fixer, &with_elapsed(BathType::Fixer, 40.0)).is_none());
    assert!(removal_patch(BathType::Stop, &with_elapsed(BathType::Stop, 1.0)).is_none());
}
