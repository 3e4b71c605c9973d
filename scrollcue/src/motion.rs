//! Reduced-motion gate.
//!
//! Two states: [`MotionMode::Normal`] and [`MotionMode::Reduced`]. The gate decides the mode;
//! the runtime derives its global time scale and callback limiting from it. Nothing else may
//! change the time scale.

use std::collections::BTreeSet;

use crate::SubscriptionId;

/// Time scale applied while reduced motion is preferred.
///
/// Durations and delays are multiplied by it. It stays above zero so completion events still
/// fire for transitions that chain on them.
pub const REDUCED_TIME_SCALE: f64 = 0.00001;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotionMode {
    #[default]
    Normal,
    Reduced,
}

impl MotionMode {
    /// Maps a host preference to a mode. An unavailable query (`None`) means normal motion.
    pub fn from_preference(reduced: Option<bool>) -> Self {
        match reduced {
            Some(true) => Self::Reduced,
            Some(false) | None => Self::Normal,
        }
    }
}

/// The host's reduced-motion media query.
pub trait MotionQuery {
    /// `Some(true)` when the user prefers reduced motion, `None` when the platform cannot say.
    fn prefers_reduced_motion(&self) -> Option<bool>;
}

impl MotionQuery for bool {
    fn prefers_reduced_motion(&self) -> Option<bool> {
        Some(*self)
    }
}

impl MotionQuery for Option<bool> {
    fn prefers_reduced_motion(&self) -> Option<bool> {
        *self
    }
}

/// A platform without a reduced-motion query.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnsupportedQuery;

impl MotionQuery for UnsupportedQuery {
    fn prefers_reduced_motion(&self) -> Option<bool> {
        None
    }
}

#[derive(Clone, Debug, Default)]
pub struct MotionGate {
    mode: MotionMode,
    subscriptions: BTreeSet<SubscriptionId>,
}

impl MotionGate {
    pub fn mode(&self) -> MotionMode {
        self.mode
    }

    pub fn subscribers(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_listening(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Registers a subscriber and re-reads the preference. Re-reading the same preference
    /// leaves the mode unchanged, so subscribing from many components is idempotent.
    pub(crate) fn subscribe(&mut self, id: SubscriptionId, reduced: Option<bool>) -> MotionMode {
        self.subscriptions.insert(id);
        self.mode = MotionMode::from_preference(reduced);
        self.mode
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(&id)
    }

    /// Handles a platform change event. Returns the new mode, or `None` when no subscriber is
    /// listening.
    pub(crate) fn preference_changed(&mut self, reduced: Option<bool>) -> Option<MotionMode> {
        if !self.is_listening() {
            return None;
        }
        self.mode = MotionMode::from_preference(reduced);
        Some(self.mode)
    }
}
