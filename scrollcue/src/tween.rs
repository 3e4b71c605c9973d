use core::fmt;
use std::sync::Arc;

use crate::{
    AnimationError, BindingId, ElementId, Easing, Props, ScopeId, Target, TweenId,
    VisualState,
};

pub type CompleteCallback = Arc<dyn Fn(TweenId, ElementId) + Send + Sync>;

/// Describes a transition over every element a target resolves to.
///
/// With `from` set, the transition animates `from → to` and writes `from` as soon as it is
/// registered. Without it, each element animates from whatever value it has when its tween
/// starts.
#[derive(Clone)]
pub struct Transition {
    pub target: Target,
    pub from: Option<Props>,
    pub to: Props,
    /// Seconds.
    pub duration: f32,
    /// Seconds before the first element starts.
    pub delay: f32,
    /// Extra delay per element, in seconds, in resolved target order.
    pub stagger: f32,
    pub ease: Easing,
    pub on_complete: Option<CompleteCallback>,
}

impl Transition {
    pub fn from_to(target: impl Into<Target>, from: Props, to: Props) -> Self {
        Self {
            from: Some(from),
            ..Self::to(target, to)
        }
    }

    pub fn to(target: impl Into<Target>, to: Props) -> Self {
        Self {
            target: target.into(),
            from: None,
            to,
            duration: 0.5,
            delay: 0.0,
            stagger: 0.0,
            ease: Easing::default(),
            on_complete: None,
        }
    }

    pub fn duration(mut self, secs: f32) -> Self {
        self.duration = secs.max(0.0);
        self
    }

    pub fn delay(mut self, secs: f32) -> Self {
        self.delay = secs.max(0.0);
        self
    }

    pub fn stagger(mut self, secs: f32) -> Self {
        self.stagger = secs;
        self
    }

    pub fn ease(mut self, ease: Easing) -> Self {
        self.ease = ease;
        self
    }

    pub fn on_complete(mut self, f: impl Fn(TweenId, ElementId) + Send + Sync + 'static) -> Self {
        self.on_complete = Some(Arc::new(f));
        self
    }

    /// Start delay of the `index`-th resolved element.
    pub fn delay_for(&self, index: usize) -> f32 {
        (self.delay + index as f32 * self.stagger).max(0.0)
    }

    pub fn validate(&self) -> Result<(), AnimationError> {
        match &self.from {
            Some(from) if !from.same_keys(&self.to) => Err(AnimationError::PropertyMismatch),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("target", &self.target)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("duration", &self.duration)
            .field("delay", &self.delay)
            .field("stagger", &self.stagger)
            .field("ease", &self.ease)
            .finish_non_exhaustive()
    }
}

/// A read-only view of a registered tween.
#[derive(Clone, Debug, PartialEq)]
pub struct TweenInfo {
    pub id: TweenId,
    pub target: ElementId,
    pub to: Props,
    pub delay: f32,
    pub duration: f32,
    pub ease: Easing,
    pub binding: Option<BindingId>,
    pub started: bool,
    pub completed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TweenMode {
    /// Runs on the clock once `start_at + delay` is reached.
    Timed,
    /// Waiting for its scroll binding to play it.
    Dormant,
    /// Progress is driven by its scroll binding.
    Scrubbed,
}

#[derive(Clone)]
pub(crate) struct Tween {
    pub(crate) id: TweenId,
    pub(crate) target: ElementId,
    pub(crate) explicit_from: Option<Props>,
    pub(crate) from: Option<Props>,
    pub(crate) to: Props,
    pub(crate) delay: f32,
    pub(crate) duration: f32,
    pub(crate) ease: Easing,
    pub(crate) mode: TweenMode,
    pub(crate) binding: Option<BindingId>,
    pub(crate) owner: Option<ScopeId>,
    /// Timeline time (ms) the tween was scheduled at.
    pub(crate) start_at: Option<f64>,
    pub(crate) started: bool,
    pub(crate) completed: bool,
    pub(crate) on_complete: Option<CompleteCallback>,
}

impl Tween {
    pub(crate) fn progress_at(&self, timeline_ms: f64) -> Option<f32> {
        let begin = self.start_at? + f64::from(self.delay) * 1000.0;
        if timeline_ms < begin {
            return None;
        }
        let duration_ms = f64::from(self.duration) * 1000.0;
        if duration_ms <= 0.0 {
            return Some(1.0);
        }
        Some(((timeline_ms - begin) / duration_ms).clamp(0.0, 1.0) as f32)
    }

    /// Fixes the start values: the explicit `from`, or the element's current values.
    pub(crate) fn capture_from(&mut self, visual: &VisualState) {
        self.from = Some(match &self.explicit_from {
            Some(from) => from.clone(),
            None => self
                .to
                .props()
                .fold(Props::new(), |acc, prop| acc.with(prop, visual.get(prop))),
        });
    }

    pub(crate) fn render(&self, progress: f32, visual: &mut VisualState) {
        let eased = self.ease.sample(progress);
        for (prop, to) in self.to.iter() {
            let value = if progress >= 1.0 {
                to
            } else {
                let from = self
                    .from
                    .as_ref()
                    .and_then(|f| f.get(prop))
                    .unwrap_or_else(|| visual.get(prop));
                from + (to - from) * eased
            };
            visual.set(prop, value);
        }
    }

    pub(crate) fn restart(&mut self, timeline_ms: f64) {
        self.mode = TweenMode::Timed;
        self.start_at = Some(timeline_ms);
        self.started = false;
        self.completed = false;
        if self.explicit_from.is_none() {
            self.from = None;
        }
    }

    pub(crate) fn info(&self) -> TweenInfo {
        TweenInfo {
            id: self.id,
            target: self.target,
            to: self.to.clone(),
            delay: self.delay,
            duration: self.duration,
            ease: self.ease,
            binding: self.binding,
            started: self.started,
            completed: self.completed,
        }
    }
}
