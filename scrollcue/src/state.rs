use crate::{MotionMode, Prop};

/// The animated visual state of one element.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisualState {
    pub x: f32,
    pub y: f32,
    pub y_percent: f32,
    pub scale: f32,
    pub opacity: f32,
    pub visible: bool,
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            y_percent: 0.0,
            scale: 1.0,
            opacity: 1.0,
            visible: true,
        }
    }
}

impl VisualState {
    pub fn get(&self, prop: Prop) -> f32 {
        match prop {
            Prop::X => self.x,
            Prop::Y => self.y,
            Prop::YPercent => self.y_percent,
            Prop::Scale => self.scale,
            Prop::Opacity => self.opacity,
            Prop::AutoAlpha => {
                if self.visible {
                    self.opacity
                } else {
                    0.0
                }
            }
        }
    }

    pub fn set(&mut self, prop: Prop, value: f32) {
        match prop {
            Prop::X => self.x = value,
            Prop::Y => self.y = value,
            Prop::YPercent => self.y_percent = value,
            Prop::Scale => self.scale = value,
            Prop::Opacity => self.opacity = value,
            Prop::AutoAlpha => {
                self.opacity = value;
                self.visible = value > 0.0;
            }
        }
    }
}

/// A lightweight, serializable snapshot of the viewport.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportState {
    pub scroll_y: f32,
    pub height: f32,
}

/// A combined snapshot of viewport and global timing state.
///
/// This is useful for restoring a page's scroll position across navigations without
/// coupling the runtime to any specific UI framework.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameState {
    pub viewport: ViewportState,
    pub time_scale: f64,
    pub motion: MotionMode,
}
