//! Named transitions and lifecycle binding for the `scrollcue` crate.
//!
//! The `scrollcue` crate is UI-agnostic and focuses on the runtime: tweens, scroll bindings,
//! scopes and the reduced-motion gate. This crate provides the pieces a site layer uses on top
//! of it:
//!
//! - Presets: fades, slides, staggered reveals, parallax, pinned zoom, hover effects
//! - A lifecycle binder that runs a component's setup once per mount or dependency change and
//!   tears it down again
//!
//! This crate is intentionally framework-agnostic (no DOM or widget bindings).
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod binder;
mod config;
mod detach;
mod presets;


pub use binder::{Cleanup, LifecycleBinder};
pub use config::{AnimationConfig, OrganicConfig, ParallaxConfig, PinConfig, ScrollConfig};
pub use detach::Detach;
pub use presets::{
    button_hover, fade_in, focus_blur, hero_reveal, hover_lift, image_scale_hover,
    image_scale_pin, nav_link_stagger, organic_fade_scale, parallax, scale_in, scroll_fade_up,
    scroll_stagger, slide_up, stagger_fade_up, wave_drift,
};
