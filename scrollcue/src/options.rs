use crate::REDUCED_TIME_SCALE;

/// Configuration for [`crate::AnimationRuntime`].
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`, so hosts can keep it
/// alongside the rest of their site configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RuntimeOptions {
    /// Viewport height in px until the host reports a resize.
    pub viewport_height: f32,
    /// Scroll offset in px until the host reports a scroll.
    pub initial_scroll: f32,

    /// Delay between the page load event and the trigger geometry refresh it schedules.
    ///
    /// Images and fonts usually settle shortly after load; refreshing too early leaves trigger
    /// boundaries computed against stale layout.
    pub load_refresh_delay_ms: u64,

    /// Time scale used while reduced motion is preferred. Must be positive.
    pub reduced_time_scale: f64,

    /// Limit scroll binding `on_update` callbacks to active-state changes, even in normal motion.
    pub limit_callbacks: bool,

    /// Whether [`crate::RuntimeEvent`]s are recorded for [`crate::AnimationRuntime::drain_events`].
    pub record_events: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            viewport_height: 0.0,
            initial_scroll: 0.0,
            load_refresh_delay_ms: 100,
            reduced_time_scale: REDUCED_TIME_SCALE,
            limit_callbacks: false,
            record_events: true,
        }
    }
}

impl RuntimeOptions {
    pub fn new(viewport_height: f32) -> Self {
        Self {
            viewport_height,
            ..Self::default()
        }
    }

    pub fn with_viewport_height(mut self, viewport_height: f32) -> Self {
        self.viewport_height = viewport_height;
        self
    }

    pub fn with_initial_scroll(mut self, initial_scroll: f32) -> Self {
        self.initial_scroll = initial_scroll;
        self
    }

    pub fn with_load_refresh_delay_ms(mut self, delay_ms: u64) -> Self {
        self.load_refresh_delay_ms = delay_ms;
        self
    }

    pub fn with_reduced_time_scale(mut self, time_scale: f64) -> Self {
        self.reduced_time_scale = time_scale;
        self
    }

    pub fn with_limit_callbacks(mut self, limit_callbacks: bool) -> Self {
        self.limit_callbacks = limit_callbacks;
        self
    }

    pub fn with_record_events(mut self, record_events: bool) -> Self {
        self.record_events = record_events;
        self
    }

    pub(crate) fn effective_reduced_time_scale(&self) -> f64 {
        if self.reduced_time_scale > 0.0 && self.reduced_time_scale.is_finite() {
            self.reduced_time_scale
        } else {
            REDUCED_TIME_SCALE
        }
    }
}
