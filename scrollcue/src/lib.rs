//! A headless runtime for entrance, hover and scroll-driven transitions.
//!
//! For the ready-made transitions (fade in, staggered reveals, parallax, pinned image zoom)
//! and component lifecycle binding, see the `scrollcue-presets` crate.
//!
//! This crate focuses on the core machinery: a render tree of elements with classes and
//! geometry, eased property tweens with per-element stagger, scroll bindings that play or
//! scrub transitions as a trigger element crosses viewport positions, scopes that tear down
//! everything registered inside them, and a reduced-motion gate that owns the global time
//! scale.
//!
//! It is UI-agnostic. A host layer is expected to provide:
//! - viewport height and scroll offset
//! - element layout (top edge and height)
//! - pointer enter/leave events
//! - a monotonic clock passed to [`AnimationRuntime::tick`]
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod easing;
mod error;
mod motion;
mod options;
mod pointer;
mod runtime;
mod scope;
mod scroll;
mod stage;
mod state;
mod tween;
mod types;

#[cfg(test)]
mod tests;

pub use easing::{EaseDirection, Easing};
pub use error::AnimationError;
pub use motion::{MotionGate, MotionMode, MotionQuery, REDUCED_TIME_SCALE, UnsupportedQuery};
pub use options::RuntimeOptions;
pub use pointer::{PointerEvent, PointerHandler};
pub use runtime::{AnimationHandle, AnimationRuntime, RuntimeEvent};
pub use scope::AnimationContext;
pub use scroll::{
    Anchor, BindingInfo, Length, ScrollPosition, ScrollSpec, Scrub, ToggleCallback,
    UpdateCallback,
};
pub use stage::{Element, ElementPredicate, ElementSpec, Stage, Target};
pub use state::{FrameState, ViewportState, VisualState};
pub use tween::{CompleteCallback, Transition, TweenInfo};
pub use types::{BindingId, ElementId, ListenerId, Prop, Props, ScopeId, SubscriptionId, TweenId};
