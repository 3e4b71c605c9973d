//! The render tree the runtime animates.
//!
//! Hosts mount one [`Element`] per animatable node, in document order, with its class names and
//! layout geometry. Presets never see content data; they address elements through [`Target`]s.

use core::fmt;
use std::sync::Arc;

use crate::{ElementId, VisualState};

/// A mounted element: identity, classes, document geometry and current visual state.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub parent: Option<ElementId>,
    pub classes: Vec<String>,
    /// Document-relative top edge in px.
    pub top: f32,
    pub height: f32,
    pub visual: VisualState,
}

impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Describes an element to mount.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementSpec {
    pub parent: Option<ElementId>,
    pub classes: Vec<String>,
    pub top: f32,
    pub height: f32,
}

impl ElementSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn layout(mut self, top: f32, height: f32) -> Self {
        self.top = top;
        self.height = height;
        self
    }

    pub fn child_of(mut self, parent: ElementId) -> Self {
        self.parent = Some(parent);
        self
    }
}

pub type ElementPredicate = Arc<dyn Fn(&Element) -> bool + Send + Sync>;

/// What a transition or preset applies to.
///
/// Resolution never fails: a target that matches nothing resolves to an empty list.
#[derive(Clone)]
pub enum Target {
    Element(ElementId),
    /// An explicit list; resolved in the given order.
    Elements(Vec<ElementId>),
    /// Every element carrying this class, in document order.
    Class(String),
    /// Every element matching the predicate, in document order.
    Predicate(ElementPredicate),
}

impl Target {
    pub fn class(class: impl Into<String>) -> Self {
        Self::Class(class.into())
    }

    pub fn matching(f: impl Fn(&Element) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(f))
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(id) => f.debug_tuple("Element").field(id).finish(),
            Self::Elements(ids) => f.debug_tuple("Elements").field(ids).finish(),
            Self::Class(class) => f.debug_tuple("Class").field(class).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<ElementId> for Target {
    fn from(id: ElementId) -> Self {
        Self::Element(id)
    }
}

impl From<Vec<ElementId>> for Target {
    fn from(ids: Vec<ElementId>) -> Self {
        Self::Elements(ids)
    }
}

impl From<&[ElementId]> for Target {
    fn from(ids: &[ElementId]) -> Self {
        Self::Elements(ids.to_vec())
    }
}

/// A class selector; a leading `.` is accepted and ignored.
impl From<&str> for Target {
    fn from(selector: &str) -> Self {
        Self::Class(selector.trim_start_matches('.').to_owned())
    }
}

impl From<String> for Target {
    fn from(selector: String) -> Self {
        Self::from(selector.as_str())
    }
}

/// Elements in document order.
#[derive(Clone, Debug, Default)]
pub struct Stage {
    elements: Vec<Element>,
    next_id: u32,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Appends an element at the end of the document.
    pub fn mount(&mut self, spec: ElementSpec) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.elements.push(Element {
            id,
            parent: spec.parent,
            classes: spec.classes,
            top: spec.top,
            height: spec.height,
            visual: VisualState::default(),
        });
        id
    }

    /// Removes an element and all of its descendants. Returns the removed ids.
    pub fn unmount(&mut self, id: ElementId) -> Vec<ElementId> {
        let mut removed = Vec::new();
        if self.get(id).is_none() {
            return removed;
        }
        removed.push(id);
        // Document order puts descendants after their ancestors.
        for el in &self.elements {
            if let Some(parent) = el.parent {
                if removed.contains(&parent) {
                    removed.push(el.id);
                }
            }
        }
        self.elements.retain(|el| !removed.contains(&el.id));
        removed
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|el| el.id == id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.iter_mut().find(|el| el.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> + '_ {
        self.elements.iter()
    }

    pub fn is_descendant_of(&self, id: ElementId, ancestor: ElementId) -> bool {
        let mut cur = self.get(id).and_then(|el| el.parent);
        while let Some(parent) = cur {
            if parent == ancestor {
                return true;
            }
            cur = self.get(parent).and_then(|el| el.parent);
        }
        false
    }

    pub fn resolve(&self, target: &Target) -> Vec<ElementId> {
        match target {
            Target::Element(id) => self.get(*id).map(|el| el.id).into_iter().collect(),
            Target::Elements(ids) => ids
                .iter()
                .copied()
                .filter(|id| self.get(*id).is_some())
                .collect(),
            Target::Class(class) => self
                .elements
                .iter()
                .filter(|el| el.has_class(class))
                .map(|el| el.id)
                .collect(),
            Target::Predicate(f) => self
                .elements
                .iter()
                .filter(|el| f(el))
                .map(|el| el.id)
                .collect(),
        }
    }

    /// Resolves `target` among the descendants of `root` only.
    pub fn resolve_within(&self, root: ElementId, target: &Target) -> Vec<ElementId> {
        self.resolve(target)
            .into_iter()
            .filter(|id| self.is_descendant_of(*id, root))
            .collect()
    }
}
