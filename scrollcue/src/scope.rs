use crate::{BindingId, ElementId, ListenerId, Prop, SubscriptionId, TweenId};

/// Everything registered while one scope was running.
///
/// Closing the scope cancels the tweens, releases the scroll bindings, detaches the pointer
/// listeners, drops the motion subscriptions and restores every recorded property to the value
/// it had before the scope first animated it.
#[derive(Clone, Debug, Default)]
pub struct AnimationContext {
    pub(crate) tweens: Vec<TweenId>,
    pub(crate) bindings: Vec<BindingId>,
    pub(crate) listeners: Vec<ListenerId>,
    pub(crate) subscriptions: Vec<SubscriptionId>,
    pub(crate) snapshots: Vec<(ElementId, Prop, f32)>,
}

impl AnimationContext {
    pub fn tweens(&self) -> &[TweenId] {
        &self.tweens
    }

    pub fn bindings(&self) -> &[BindingId] {
        &self.bindings
    }

    pub fn listeners(&self) -> &[ListenerId] {
        &self.listeners
    }

    pub fn subscriptions(&self) -> &[SubscriptionId] {
        &self.subscriptions
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
            && self.bindings.is_empty()
            && self.listeners.is_empty()
            && self.subscriptions.is_empty()
    }

    /// Records the pre-animation value of a property; only the first touch counts.
    pub(crate) fn snapshot(&mut self, element: ElementId, prop: Prop, value: f32) {
        if self
            .snapshots
            .iter()
            .any(|(e, p, _)| *e == element && *p == prop)
        {
            return;
        }
        self.snapshots.push((element, prop, value));
    }
}
