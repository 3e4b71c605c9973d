use std::sync::Arc;

use crate::{AnimationRuntime, ElementId, ScopeId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerEvent {
    Enter,
    Leave,
}

/// A pointer listener. It receives the runtime and the element the event was dispatched to.
pub type PointerHandler = Arc<dyn Fn(&mut AnimationRuntime, ElementId) + Send + Sync>;

#[derive(Clone)]
pub(crate) struct Listener {
    pub(crate) element: ElementId,
    pub(crate) event: PointerEvent,
    pub(crate) handler: PointerHandler,
    /// Scope that was running when the listener was added; handlers run inside it again.
    pub(crate) scope: Option<ScopeId>,
}
