/// Identifies an element mounted on the runtime's [`crate::Stage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TweenId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BindingId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(pub u64);

/// A reduced-motion preference subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub u64);

/// An animatable visual property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Prop {
    /// Horizontal offset in px.
    X,
    /// Vertical offset in px.
    Y,
    /// Vertical offset as a percentage of the element's own height.
    YPercent,
    Scale,
    Opacity,
    /// Opacity that also toggles visibility: `0` hides the element.
    AutoAlpha,
}

/// A small ordered map of property values.
///
/// Insertion order is preserved; setting an existing property replaces its value.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Props {
    entries: Vec<(Prop, f32)>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, prop: Prop, value: f32) -> Self {
        self.set(prop, value);
        self
    }

    pub fn x(self, value: f32) -> Self {
        self.with(Prop::X, value)
    }

    pub fn y(self, value: f32) -> Self {
        self.with(Prop::Y, value)
    }

    pub fn y_percent(self, value: f32) -> Self {
        self.with(Prop::YPercent, value)
    }

    pub fn scale(self, value: f32) -> Self {
        self.with(Prop::Scale, value)
    }

    pub fn opacity(self, value: f32) -> Self {
        self.with(Prop::Opacity, value)
    }

    pub fn auto_alpha(self, value: f32) -> Self {
        self.with(Prop::AutoAlpha, value)
    }

    pub fn set(&mut self, prop: Prop, value: f32) {
        match self.entries.iter_mut().find(|(p, _)| *p == prop) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((prop, value)),
        }
    }

    pub fn get(&self, prop: Prop) -> Option<f32> {
        self.entries
            .iter()
            .find(|(p, _)| *p == prop)
            .map(|(_, v)| *v)
    }

    pub fn remove(&mut self, prop: Prop) -> Option<f32> {
        let index = self.entries.iter().position(|(p, _)| *p == prop)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains(&self, prop: Prop) -> bool {
        self.entries.iter().any(|(p, _)| *p == prop)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Prop, f32)> + '_ {
        self.entries.iter().copied()
    }

    pub fn props(&self) -> impl Iterator<Item = Prop> + '_ {
        self.entries.iter().map(|(p, _)| *p)
    }

    /// Returns `true` when both maps animate exactly the same property set.
    pub fn same_keys(&self, other: &Props) -> bool {
        self.len() == other.len() && self.props().all(|p| other.contains(p))
    }
}
