use scrollcue::{AnimationRuntime, ListenerId};

/// Removes the pointer listeners a hover preset attached.
///
/// Detaching only removes listeners; values already animated stay where they are. Listeners
/// attached inside a scope are also removed when that scope closes, so calling
/// [`Detach::detach`] afterwards is harmless.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use = "dropping a Detach leaves its listeners attached"]
pub struct Detach {
    listeners: Vec<ListenerId>,
}

impl Detach {
    pub(crate) fn new(listeners: Vec<ListenerId>) -> Self {
        Self { listeners }
    }

    /// A `Detach` that removes nothing; returned when a preset's target matched no element.
    pub fn noop() -> Self {
        Self::default()
    }

    pub fn is_noop(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn listeners(&self) -> &[ListenerId] {
        &self.listeners
    }

    /// Combines two detaches into one.
    pub fn and(mut self, other: Detach) -> Self {
        self.listeners.extend(other.listeners);
        self
    }

    /// Removes the listeners. Returns how many were still attached.
    pub fn detach(self, rt: &mut AnimationRuntime) -> usize {
        self.listeners
            .into_iter()
            .filter(|id| rt.remove_listener(*id))
            .count()
    }
}
