use std::fmt::Write as _;

use darkroom_core::DarkroomEvent;
use shared::{
    domain::{Stage, ViewMode},
    protocol::SessionSnapshot,
};

/// Tick events are thinned out so the terminal stays readable.
pub fn describe_event(event: &DarkroomEvent) -> Option<String> {
    let line = match event {
        DarkroomEvent::StageChanged { from, to } => format!("stage: {from} -> {to}"),
        DarkroomEvent::ExposureTick { elapsed_secs } => {
            if elapsed_secs.fract() != 0.0 {
                return None;
            }
            format!("exposure: {elapsed_secs:.0}s")
        }
        DarkroomEvent::ExposureCommitted {
            elapsed_secs,
            level,
        } => format!("exposure: committed {elapsed_secs:.1}s ({level:?})"),
        DarkroomEvent::ImmersionChanged { bath: Some(bath) } => {
            format!("tray: paper in {bath}")
        }
        DarkroomEvent::ImmersionChanged { bath: None } => "tray: paper lifted out".to_string(),
        DarkroomEvent::BathTick { bath, elapsed_secs } => {
            if elapsed_secs % 10.0 != 0.0 {
                return None;
            }
            format!("tray: {bath} {elapsed_secs:.0}s")
        }
        DarkroomEvent::DryingProgress(drying) => {
            if drying.progress_percent % 10.0 != 0.0 {
                return None;
            }
            let cover = if drying.covered { "covered" } else { "open" };
            format!("dryer: {:.0}% ({cover})", drying.progress_percent)
        }
        DarkroomEvent::RoomLightToggled { on } => {
            format!("room light: {}", if *on { "on" } else { "off" })
        }
        DarkroomEvent::ViewModeChanged(mode) => format!("view: {}", view_name(*mode)),
        DarkroomEvent::ImageLoading { scene_description } => {
            format!("scene: generating {scene_description:?}...")
        }
        DarkroomEvent::ImageResolved {
            image_ref,
            fallback,
        } => {
            if *fallback {
                format!("scene: generation failed, using fallback {image_ref}")
            } else {
                format!("scene: ready {}", abbreviate(image_ref.as_str()))
            }
        }
        DarkroomEvent::IntentRejected(rejection) => {
            format!("rejected {}: {}", rejection.intent, rejection.message)
        }
        DarkroomEvent::SessionReset { session_id } => {
            format!("session: fresh paper ({})", session_id.0)
        }
    };
    Some(line)
}

pub fn render_snapshot(snapshot: &SessionSnapshot) -> String {
    let process = &snapshot.process;
    let mut out = String::new();
    let _ = writeln!(out, "stage: {}", snapshot.stage);
    let _ = writeln!(
        out,
        "view: {} | room light: {}",
        view_name(snapshot.view_mode),
        if snapshot.room_light_on { "on" } else { "off" }
    );
    if let Some(scene) = &process.scene_description {
        let _ = writeln!(out, "scene: {scene}");
    }
    if snapshot.image_loading {
        let _ = writeln!(out, "scene: image request pending");
    }

    match (&snapshot.exposure, snapshot.stage) {
        (Some(reading), _) => {
            let _ = writeln!(
                out,
                "exposure: {:.1}s, {}",
                reading.elapsed_secs, reading.status
            );
        }
        (None, Stage::Capture) => {
            let _ = writeln!(out, "exposure: shutter closed");
        }
        (None, _) => {
            let _ = writeln!(
                out,
                "exposure: {:.1}s ({:?})",
                process.exposure_time_secs, process.exposure_level
            );
        }
    }

    if snapshot.stage == Stage::Develop {
        let tray = snapshot
            .current_bath
            .map_or_else(|| "none".to_string(), |bath| bath.to_string());
        let _ = writeln!(
            out,
            "tray: {tray} | developed {:.0}%",
            process.development_level * 100.0
        );
        if snapshot.critical_fix_warning {
            let _ = writeln!(out, "warning: keep the print in the fixer for at least 40s");
        }
    }
    if snapshot.stage == Stage::Dry {
        let _ = writeln!(
            out,
            "dryer: {:.0}%{}",
            snapshot.drying.progress_percent,
            if snapshot.drying.covered { " (covered)" } else { "" }
        );
    }

    let _ = writeln!(out, "print: {}", snapshot.result_transform.to_filter_string());
    if snapshot.stage == Stage::Review {
        let _ = writeln!(
            out,
            "ideal: {}",
            snapshot.reference_transform.to_filter_string()
        );
        let _ = writeln!(out, "advice: {}", snapshot.advisory);
        for report in &snapshot.lab_log {
            let _ = writeln!(
                out,
                "  {:<10} {:>5.0}s / {:>3.0}s {}",
                report.name,
                report.elapsed_secs,
                report.optimal_secs,
                if report.adequate { "ok" } else { "short" }
            );
        }
        if process.is_poorly_fixed {
            let _ = writeln!(out, "note: the print was not fixed long enough and will fade");
        }
    }
    if snapshot.can_advance {
        let _ = writeln!(out, "ready: type `next` to continue");
    }
    out
}

fn view_name(mode: ViewMode) -> &'static str {
    match mode {
        ViewMode::Negative => "negative",
        ViewMode::Positive => "positive",
    }
}

/// Data URLs are far too long to print.
fn abbreviate(image_ref: &str) -> String {
    const LIMIT: usize = 72;
    if image_ref.chars().count() <= LIMIT {
        return image_ref.to_string();
    }
    let head: String = image_ref.chars().take(LIMIT).collect();
    format!("{head}...")
}

#[cfg(test)]
#[path = "tests/presenter_tests.rs"]
mod tests;
