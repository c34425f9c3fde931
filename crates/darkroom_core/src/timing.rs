use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Timing {
    /// Exposure runs in wall-clock seconds; each tick adds its own duration.
    pub exposure_tick: Duration,
    pub bath_tick: Duration,
    pub bath_step_secs: f64,
    pub cover_delay: Duration,
    pub drying_start_delay: Duration,
    pub drying_tick: Duration,
    pub drying_step_percent: f64,
    pub auto_review: bool,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            exposure_tick: Duration::from_millis(100),
            bath_tick: Duration::from_millis(100),
            bath_step_secs: 1.0,
            cover_delay: Duration::from_millis(500),
            drying_start_delay: Duration::from_millis(1500),
            drying_tick: Duration::from_millis(30),
            drying_step_percent: 0.5,
            auto_review: true,
        }
    }
}
