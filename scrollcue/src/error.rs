//! Error types for transition and scroll binding registration.

use thiserror::Error;

/// Errors returned when a transition or scroll binding cannot be registered.
///
/// A target that resolves to zero elements is not an error: presets and
/// [`crate::AnimationRuntime::animate`] return an empty handle instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    #[error("unknown ease `{0}`")]
    UnknownEase(String),

    #[error("invalid scroll position `{input}`: {reason}")]
    InvalidPosition { input: String, reason: &'static str },

    #[error("from and to states animate different properties")]
    PropertyMismatch,

    #[error("trigger range is inverted: start {start}px resolves after end {end}px")]
    InvertedTriggerRange { start: f32, end: f32 },
}
