use scrollcue::{AnimationError, Easing, ScrollPosition, Target};

/// Timing overrides for a preset. Unset fields take the preset's defaults.
///
/// With `feature = "serde"`, the config types in this module implement
/// `Serialize`/`Deserialize` (trigger targets are skipped).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnimationConfig {
    /// Seconds.
    pub duration: Option<f32>,
    /// Seconds.
    pub delay: Option<f32>,
    pub ease: Option<Easing>,
    /// Seconds between consecutive elements.
    pub stagger: Option<f32>,
}

impl AnimationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(mut self, secs: f32) -> Self {
        self.duration = Some(secs);
        self
    }

    pub fn with_delay(mut self, secs: f32) -> Self {
        self.delay = Some(secs);
        self
    }

    pub fn with_ease(mut self, ease: Easing) -> Self {
        self.ease = Some(ease);
        self
    }

    /// Parses a named ease such as `"power2.out"` or `"back.out(1.2)"`.
    pub fn with_ease_name(self, name: &str) -> Result<Self, AnimationError> {
        Ok(self.with_ease(name.parse()?))
    }

    pub fn with_stagger(mut self, secs: f32) -> Self {
        self.stagger = Some(secs);
        self
    }

    pub(crate) fn timing(&self, defaults: Timing) -> Timing {
        Timing {
            duration: self.duration.unwrap_or(defaults.duration),
            delay: self.delay.unwrap_or(defaults.delay),
            ease: self.ease.unwrap_or(defaults.ease),
            stagger: self.stagger.unwrap_or(defaults.stagger),
        }
    }
}

/// Fully resolved timing of a preset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Timing {
    pub(crate) duration: f32,
    pub(crate) delay: f32,
    pub(crate) ease: Easing,
    pub(crate) stagger: f32,
}

impl Timing {
    pub(crate) const fn new(duration: f32, ease: Easing) -> Self {
        Self {
            duration,
            delay: 0.0,
            ease,
            stagger: 0.0,
        }
    }

    pub(crate) const fn delay(mut self, secs: f32) -> Self {
        self.delay = secs;
        self
    }

    pub(crate) const fn stagger(mut self, secs: f32) -> Self {
        self.stagger = secs;
        self
    }
}

/// Overrides for scroll-gated presets.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScrollConfig {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub animation: AnimationConfig,
    /// Element whose geometry gates the transition. Defaults to the first animated element.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub trigger: Option<Target>,
    pub start: Option<ScrollPosition>,
    pub end: Option<ScrollPosition>,
    /// Replay every time the trigger is re-entered from above.
    pub replay_on_reenter: bool,
}

impl ScrollConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(mut self, secs: f32) -> Self {
        self.animation.duration = Some(secs);
        self
    }

    pub fn with_delay(mut self, secs: f32) -> Self {
        self.animation.delay = Some(secs);
        self
    }

    pub fn with_ease(mut self, ease: Easing) -> Self {
        self.animation.ease = Some(ease);
        self
    }

    pub fn with_stagger(mut self, secs: f32) -> Self {
        self.animation.stagger = Some(secs);
        self
    }

    pub fn with_trigger(mut self, trigger: impl Into<Target>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    pub fn with_start(mut self, start: &str) -> Result<Self, AnimationError> {
        self.start = Some(start.parse()?);
        Ok(self)
    }

    pub fn with_end(mut self, end: &str) -> Result<Self, AnimationError> {
        self.end = Some(end.parse()?);
        Ok(self)
    }

    pub fn with_replay_on_reenter(mut self, replay: bool) -> Self {
        self.replay_on_reenter = replay;
        self
    }
}

/// Overrides for [`crate::parallax`].
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParallaxConfig {
    /// Final `yPercent` offset; negative drifts up.
    pub speed: Option<f32>,
    /// Scrub smoothing in seconds; `0` follows the scroll position exactly.
    pub smoothing: Option<f32>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub trigger: Option<Target>,
}

impl ParallaxConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_smoothing(mut self, secs: f32) -> Self {
        self.smoothing = Some(secs);
        self
    }

    pub fn with_trigger(mut self, trigger: impl Into<Target>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }
}

/// Overrides for [`crate::organic_fade_scale`]. The ease is always `expo.out`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OrganicConfig {
    pub duration: Option<f32>,
    pub delay: Option<f32>,
    pub stagger: Option<f32>,
    pub start: Option<ScrollPosition>,
}

impl OrganicConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(mut self, secs: f32) -> Self {
        self.duration = Some(secs);
        self
    }

    pub fn with_delay(mut self, secs: f32) -> Self {
        self.delay = Some(secs);
        self
    }

    pub fn with_stagger(mut self, secs: f32) -> Self {
        self.stagger = Some(secs);
        self
    }

    pub fn with_start(mut self, start: &str) -> Result<Self, AnimationError> {
        self.start = Some(start.parse()?);
        Ok(self)
    }
}

/// Overrides for [`crate::image_scale_pin`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PinConfig {
    pub duration: Option<f32>,
    pub start_scale: Option<f32>,
    pub smoothing: Option<f32>,
}

impl PinConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(mut self, secs: f32) -> Self {
        self.duration = Some(secs);
        self
    }

    pub fn with_start_scale(mut self, scale: f32) -> Self {
        self.start_scale = Some(scale);
        self
    }

    pub fn with_smoothing(mut self, secs: f32) -> Self {
        self.smoothing = Some(secs);
        self
    }
}
