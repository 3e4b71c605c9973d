//! Scroll trigger ranges: position expressions, scrub modes and bindings.
//!
//! A position expression pairs a point on the trigger element with a point on the viewport:
//! `"top 80%"` is reached when the element's top edge crosses 80% of the viewport height.
//! Anchors are `top`, `center`, `bottom`, a percentage or a pixel value, optionally followed by
//! `+=`/`-=` and a length (`"top bottom-=20%"`). An end position may instead be relative to the
//! start (`"+=100%"`, percent of viewport height).

use core::fmt;
use core::str::FromStr;
use std::sync::Arc;

use crate::{AnimationError, BindingId, ElementId, Target, TweenId};

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Length {
    Px(f32),
    Percent(f32),
}

impl Length {
    pub fn resolve(self, reference: f32) -> f32 {
        match self {
            Self::Px(v) => v,
            Self::Percent(p) => reference * p / 100.0,
        }
    }

    fn negated(self) -> Self {
        match self {
            Self::Px(v) => Self::Px(-v),
            Self::Percent(p) => Self::Percent(-p),
        }
    }

    fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if let Some(num) = token.strip_suffix('%') {
            return finite(num).map(Self::Percent);
        }
        finite(token.strip_suffix("px").unwrap_or(token)).map(Self::Px)
    }
}

fn finite(num: &str) -> Option<f32> {
    num.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

/// A point along an element or the viewport, measured from its top edge.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Anchor {
    pub base: Length,
    pub offset: Length,
}

impl Anchor {
    pub const TOP: Self = Self::percent(0.0);
    pub const CENTER: Self = Self::percent(50.0);
    pub const BOTTOM: Self = Self::percent(100.0);

    pub const fn percent(p: f32) -> Self {
        Self {
            base: Length::Percent(p),
            offset: Length::Px(0.0),
        }
    }

    pub fn resolve(self, size: f32) -> f32 {
        self.base.resolve(size) + self.offset.resolve(size)
    }

    fn parse(input: &str, token: &str) -> Result<Self, AnimationError> {
        let invalid = |reason| AnimationError::InvalidPosition {
            input: input.to_owned(),
            reason,
        };

        let (base, offset) = if let Some(i) = token.find("+=") {
            (&token[..i], Some((false, &token[i + 2..])))
        } else if let Some(i) = token.find("-=") {
            (&token[..i], Some((true, &token[i + 2..])))
        } else {
            (token, None)
        };

        let base = match base {
            "top" => Length::Percent(0.0),
            "center" => Length::Percent(50.0),
            "bottom" => Length::Percent(100.0),
            other => Length::parse(other).ok_or_else(|| invalid("unrecognized anchor"))?,
        };

        let offset = match offset {
            None => Length::Px(0.0),
            Some((negative, len)) => {
                let len = Length::parse(len).ok_or_else(|| invalid("unrecognized offset"))?;
                if negative { len.negated() } else { len }
            }
        };

        Ok(Self { base, offset })
    }
}

/// A trigger boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollPosition {
    /// Reached when `element` on the trigger lines up with `viewport`.
    Anchored { element: Anchor, viewport: Anchor },
    /// Offset from the resolved start; percentages refer to the viewport height.
    /// As a start position it is an absolute scroll offset.
    Relative(Length),
}

impl ScrollPosition {
    /// `"top bottom"`: the trigger's top edge enters the viewport from below.
    pub const TOP_BOTTOM: Self = Self::Anchored {
        element: Anchor::TOP,
        viewport: Anchor::BOTTOM,
    };

    /// `"bottom top"`: the trigger's bottom edge leaves the viewport at the top.
    pub const BOTTOM_TOP: Self = Self::Anchored {
        element: Anchor::BOTTOM,
        viewport: Anchor::TOP,
    };

    /// Resolves to a scroll offset in px.
    pub fn resolve(
        &self,
        element_top: f32,
        element_height: f32,
        viewport_height: f32,
        start: f32,
    ) -> f32 {
        match self {
            Self::Anchored { element, viewport } => {
                element_top + element.resolve(element_height) - viewport.resolve(viewport_height)
            }
            Self::Relative(len) => start + len.resolve(viewport_height),
        }
    }
}

impl FromStr for ScrollPosition {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(rest) = trimmed.strip_prefix("+=") {
            return Length::parse(rest)
                .map(Self::Relative)
                .ok_or_else(|| AnimationError::InvalidPosition {
                    input: s.to_owned(),
                    reason: "unrecognized relative length",
                });
        }
        if let Some(rest) = trimmed.strip_prefix("-=") {
            return Length::parse(rest)
                .map(|len| Self::Relative(len.negated()))
                .ok_or_else(|| AnimationError::InvalidPosition {
                    input: s.to_owned(),
                    reason: "unrecognized relative length",
                });
        }

        let mut tokens = trimmed.split_whitespace();
        let (Some(element), Some(viewport), None) = (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(AnimationError::InvalidPosition {
                input: s.to_owned(),
                reason: "expected `<element> <viewport>`",
            });
        };

        Ok(Self::Anchored {
            element: Anchor::parse(s, element)?,
            viewport: Anchor::parse(s, viewport)?,
        })
    }
}

/// How scroll position maps to transition progress.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scrub {
    /// One-shot: entering the range plays the transition on the clock.
    #[default]
    Off,
    /// Progress follows the scroll position exactly.
    Direct,
    /// Progress catches up with the scroll position with this time constant, in seconds.
    Smooth(f32),
}

pub type ToggleCallback = Arc<dyn Fn(BindingId, bool) + Send + Sync>;
pub type UpdateCallback = Arc<dyn Fn(BindingId, f32) + Send + Sync>;

/// Scroll gating for a transition.
#[derive(Clone)]
pub struct ScrollSpec {
    /// Element whose geometry defines the range. Defaults to the first animated element.
    pub trigger: Option<Target>,
    pub start: ScrollPosition,
    pub end: ScrollPosition,
    pub scrub: Scrub,
    /// Replay each time the start boundary is crossed forward again. When `false`, the
    /// transition plays once per binding.
    pub replay_on_reenter: bool,
    /// Hold the trigger element in place while the range is active.
    pub pin: bool,
    pub on_toggle: Option<ToggleCallback>,
    /// Fires on progress changes; with callback limiting on, only when the active state flips.
    pub on_update: Option<UpdateCallback>,
}

impl Default for ScrollSpec {
    fn default() -> Self {
        Self {
            trigger: None,
            start: ScrollPosition::TOP_BOTTOM,
            end: ScrollPosition::BOTTOM_TOP,
            scrub: Scrub::Off,
            replay_on_reenter: false,
            pin: false,
            on_toggle: None,
            on_update: None,
        }
    }
}

impl ScrollSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses both boundaries.
    pub fn between(start: &str, end: &str) -> Result<Self, AnimationError> {
        Ok(Self {
            start: start.parse()?,
            end: end.parse()?,
            ..Self::default()
        })
    }

    pub fn with_start(mut self, start: &str) -> Result<Self, AnimationError> {
        self.start = start.parse()?;
        Ok(self)
    }

    pub fn with_end(mut self, end: &str) -> Result<Self, AnimationError> {
        self.end = end.parse()?;
        Ok(self)
    }

    pub fn with_trigger(mut self, trigger: Option<Target>) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_scrub(mut self, scrub: Scrub) -> Self {
        self.scrub = scrub;
        self
    }

    pub fn with_replay_on_reenter(mut self, replay: bool) -> Self {
        self.replay_on_reenter = replay;
        self
    }

    pub fn with_pin(mut self, pin: bool) -> Self {
        self.pin = pin;
        self
    }

    pub fn with_on_toggle(mut self, f: impl Fn(BindingId, bool) + Send + Sync + 'static) -> Self {
        self.on_toggle = Some(Arc::new(f));
        self
    }

    pub fn with_on_update(mut self, f: impl Fn(BindingId, f32) + Send + Sync + 'static) -> Self {
        self.on_update = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for ScrollSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollSpec")
            .field("trigger", &self.trigger)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("scrub", &self.scrub)
            .field("replay_on_reenter", &self.replay_on_reenter)
            .field("pin", &self.pin)
            .finish_non_exhaustive()
    }
}

/// A read-only view of a registered binding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BindingInfo {
    pub id: BindingId,
    pub trigger: ElementId,
    pub start_px: f32,
    pub end_px: f32,
    pub scrub: Scrub,
    pub pin: bool,
    /// Range progress at the last evaluated scroll offset.
    pub progress: f32,
    /// Progress actually rendered; lags `progress` under [`Scrub::Smooth`].
    pub rendered_progress: f32,
    pub active: bool,
    pub played: bool,
}

#[derive(Clone)]
pub(crate) struct ScrollBinding {
    pub(crate) id: BindingId,
    pub(crate) trigger: ElementId,
    pub(crate) start: ScrollPosition,
    pub(crate) end: ScrollPosition,
    pub(crate) scrub: Scrub,
    pub(crate) replay_on_reenter: bool,
    pub(crate) pin: bool,
    pub(crate) on_toggle: Option<ToggleCallback>,
    pub(crate) on_update: Option<UpdateCallback>,
    pub(crate) tweens: Vec<TweenId>,

    /// Cached boundaries; recomputed only on refresh.
    pub(crate) start_px: f32,
    pub(crate) end_px: f32,

    pub(crate) reached: bool,
    pub(crate) active: bool,
    pub(crate) played: bool,
    pub(crate) progress: f32,
    pub(crate) rendered: f32,
}

impl ScrollBinding {
    pub(crate) fn new(
        id: BindingId,
        trigger: ElementId,
        spec: ScrollSpec,
        (start_px, end_px): (f32, f32),
    ) -> Self {
        Self {
            id,
            trigger,
            start: spec.start,
            end: spec.end,
            scrub: spec.scrub,
            replay_on_reenter: spec.replay_on_reenter,
            pin: spec.pin,
            on_toggle: spec.on_toggle,
            on_update: spec.on_update,
            tweens: Vec::new(),
            start_px,
            end_px,
            reached: false,
            active: false,
            played: false,
            progress: 0.0,
            rendered: 0.0,
        }
    }

    pub(crate) fn progress_at(&self, scroll_y: f32) -> f32 {
        let span = self.end_px - self.start_px;
        if span <= 0.0 {
            return if scroll_y >= self.start_px { 1.0 } else { 0.0 };
        }
        ((scroll_y - self.start_px) / span).clamp(0.0, 1.0)
    }

    pub(crate) fn info(&self) -> BindingInfo {
        BindingInfo {
            id: self.id,
            trigger: self.trigger,
            start_px: self.start_px,
            end_px: self.end_px,
            scrub: self.scrub,
            pin: self.pin,
            progress: self.progress,
            rendered_progress: self.rendered,
            active: self.active,
            played: self.played,
        }
    }
}
