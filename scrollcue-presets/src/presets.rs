//! Named transitions.
//!
//! Every preset takes the runtime, a target and (where it has tunable timing) a config whose
//! unset fields fall back to the preset's defaults. A target that matches no element is not an
//! error: timed and scroll presets return an empty [`AnimationHandle`], hover presets a no-op
//! [`Detach`].

use std::sync::Arc;

use scrollcue::{
    Anchor, AnimationError, AnimationHandle, AnimationRuntime, Easing, ElementId, Length,
    PointerEvent, Props, ScrollPosition, ScrollSpec, Scrub, Target, Transition,
};

use crate::config::Timing;
use crate::{AnimationConfig, Detach, OrganicConfig, ParallaxConfig, PinConfig, ScrollConfig};

/// Vertical travel of the slide-based presets, in px.
const SLIDE_DISTANCE: f32 = 60.0;

const HOVER_DURATION: f32 = 0.3;
const IMAGE_HOVER_DURATION: f32 = 0.5;
const FOCUS_DURATION: f32 = 0.2;
const DIMMED_OPACITY: f32 = 0.5;

/// `"top 80%"`
const FADE_UP_START: ScrollPosition = ScrollPosition::Anchored {
    element: Anchor::TOP,
    viewport: Anchor::percent(80.0),
};

/// `"top 85%"`
const STAGGER_START: ScrollPosition = ScrollPosition::Anchored {
    element: Anchor::TOP,
    viewport: Anchor::percent(85.0),
};

/// `"top 20%"`
const REVEAL_END: ScrollPosition = ScrollPosition::Anchored {
    element: Anchor::TOP,
    viewport: Anchor::percent(20.0),
};

/// `"top bottom-=20%"`
const ORGANIC_START: ScrollPosition = ScrollPosition::Anchored {
    element: Anchor::TOP,
    viewport: Anchor {
        base: Length::Percent(100.0),
        offset: Length::Percent(-20.0),
    },
};

/// `"top top"`
const PIN_START: ScrollPosition = ScrollPosition::Anchored {
    element: Anchor::TOP,
    viewport: Anchor::TOP,
};

/// `"+=100%"`
const PIN_END: ScrollPosition = ScrollPosition::Relative(Length::Percent(100.0));

const PARALLAX_SPEED: f32 = -20.0;
const PARALLAX_SMOOTHING: f32 = 0.1;
const PIN_START_SCALE: f32 = 1.3;
const PIN_SMOOTHING: f32 = 1.0;
const WAVE_SMOOTHING: f32 = 1.0;

fn from_to(target: Target, from: Props, to: Props, timing: Timing) -> Transition {
    Transition::from_to(target, from, to)
        .duration(timing.duration)
        .delay(timing.delay)
        .stagger(timing.stagger)
        .ease(timing.ease)
}

fn slide_props() -> (Props, Props) {
    (
        Props::new().y(SLIDE_DISTANCE).opacity(0.0),
        Props::new().y(0.0).opacity(1.0),
    )
}

fn scroll_spec(config: &ScrollConfig, start: ScrollPosition, end: ScrollPosition) -> ScrollSpec {
    ScrollSpec {
        trigger: config.trigger.clone(),
        start: config.start.unwrap_or(start),
        end: config.end.unwrap_or(end),
        replay_on_reenter: config.replay_on_reenter,
        ..ScrollSpec::default()
    }
}

/// Opacity `0 → 1`. Defaults: 0.6s, `power2.out`.
pub fn fade_in(
    rt: &mut AnimationRuntime,
    target: impl Into<Target>,
    config: AnimationConfig,
) -> Result<AnimationHandle, AnimationError> {
    let timing = config.timing(Timing::new(0.6, Easing::power2_out()));
    rt.animate(from_to(
        target.into(),
        Props::new().opacity(0.0),
        Props::new().opacity(1.0),
        timing,
    ))
}

/// Rises 60px while fading in. Defaults: 0.8s, `power2.out`.
pub fn slide_up(
    rt: &mut AnimationRuntime,
    target: impl Into<Target>,
    config: AnimationConfig,
) -> Result<AnimationHandle, AnimationError> {
    let timing = config.timing(Timing::new(0.8, Easing::power2_out()));
    let (from, to) = slide_props();
    rt.animate(from_to(target.into(), from, to, timing))
}

/// Scale `0.9 → 1` while fading in. Defaults: 0.6s, `back.out(1.2)`.
pub fn scale_in(
    rt: &mut AnimationRuntime,
    target: impl Into<Target>,
    config: AnimationConfig,
) -> Result<AnimationHandle, AnimationError> {
    let timing = config.timing(Timing::new(0.6, Easing::back_out(1.2)));
    rt.animate(from_to(
        target.into(),
        Props::new().scale(0.9).opacity(0.0),
        Props::new().scale(1.0).opacity(1.0),
        timing,
    ))
}

/// [`slide_up`] for a list, each element starting `stagger` seconds after the previous one.
/// Defaults: 0.8s, `power2.out`, stagger 0.05s.
pub fn stagger_fade_up(
    rt: &mut AnimationRuntime,
    targets: impl Into<Target>,
    config: AnimationConfig,
) -> Result<AnimationHandle, AnimationError> {
    let timing = config.timing(Timing::new(0.8, Easing::power2_out()).stagger(0.05));
    let (from, to) = slide_props();
    rt.animate(from_to(targets.into(), from, to, timing))
}

/// [`slide_up`] played once when the trigger's top edge crosses 80% of the viewport.
/// Defaults: 0.8s, `power2.out`, trigger = first target, `"top 80%"` → `"top 20%"`.
pub fn scroll_fade_up(
    rt: &mut AnimationRuntime,
    target: impl Into<Target>,
    config: ScrollConfig,
) -> Result<AnimationHandle, AnimationError> {
    let timing = config
        .animation
        .timing(Timing::new(0.8, Easing::power2_out()));
    let (from, to) = slide_props();
    let spec = scroll_spec(&config, FADE_UP_START, REVEAL_END);
    rt.animate_on_scroll(from_to(target.into(), from, to, timing), spec)
}

/// Staggered rise, fade and scale `0.95 → 1`, played once when the trigger's top edge crosses
/// 85% of the viewport. Defaults: 0.8s, `power2.out`, stagger 0.1s, trigger = first target.
pub fn scroll_stagger(
    rt: &mut AnimationRuntime,
    targets: impl Into<Target>,
    config: ScrollConfig,
) -> Result<AnimationHandle, AnimationError> {
    let timing = config
        .animation
        .timing(Timing::new(0.8, Easing::power2_out()).stagger(0.1));
    let spec = scroll_spec(&config, STAGGER_START, REVEAL_END);
    rt.animate_on_scroll(
        from_to(
            targets.into(),
            Props::new().y(SLIDE_DISTANCE).opacity(0.0).scale(0.95),
            Props::new().y(0.0).opacity(1.0).scale(1.0),
            timing,
        ),
        spec,
    )
}

/// Scale `1.1 → 1` while fading in over 1.2s, immediately.
pub fn hero_reveal(
    rt: &mut AnimationRuntime,
    target: impl Into<Target>,
) -> Result<AnimationHandle, AnimationError> {
    rt.animate(from_to(
        target.into(),
        Props::new().scale(1.1).opacity(0.0),
        Props::new().scale(1.0).opacity(1.0),
        Timing::new(1.2, Easing::power2_out()),
    ))
}

/// Drifts each element by `speed` percent of its height while it crosses the viewport.
///
/// Every element gets its own binding over its own `"top bottom"` → `"bottom top"` range, so
/// the offset is a monotonic function of the scroll position. Defaults: speed −20, smoothing
/// 0.1s.
pub fn parallax(
    rt: &mut AnimationRuntime,
    target: impl Into<Target>,
    config: ParallaxConfig,
) -> Result<AnimationHandle, AnimationError> {
    let speed = config.speed.unwrap_or(PARALLAX_SPEED);
    let smoothing = config.smoothing.unwrap_or(PARALLAX_SMOOTHING);
    let scrub = if smoothing > 0.0 {
        Scrub::Smooth(smoothing)
    } else {
        Scrub::Direct
    };

    let mut handle = AnimationHandle::default();
    for element in rt.resolve(&target.into()) {
        let spec = ScrollSpec::new()
            .with_trigger(Some(config.trigger.clone().unwrap_or(element.into())))
            .with_scrub(scrub);
        handle.merge(rt.animate_on_scroll(
            Transition::from_to(
                element,
                Props::new().y_percent(0.0),
                Props::new().y_percent(speed),
            )
            .ease(Easing::Linear),
            spec,
        )?);
    }
    Ok(handle)
}

/// Rises 40px, scales up from 0.95 and fades in with visibility, once the trigger's top edge is
/// 20% above the viewport bottom. Defaults: 1.2s, `expo.out`, stagger 0.075s.
pub fn organic_fade_scale(
    rt: &mut AnimationRuntime,
    target: impl Into<Target>,
    config: OrganicConfig,
) -> Result<AnimationHandle, AnimationError> {
    let timing = AnimationConfig {
        duration: config.duration,
        delay: config.delay,
        ease: None,
        stagger: config.stagger,
    }
    .timing(Timing::new(1.2, Easing::expo_out()).stagger(0.075));
    let spec = ScrollSpec {
        start: config.start.unwrap_or(ORGANIC_START),
        ..ScrollSpec::default()
    };
    rt.animate_on_scroll(
        from_to(
            target.into(),
            Props::new().y(40.0).scale(0.95).auto_alpha(0.0),
            Props::new().y(0.0).scale(1.0).auto_alpha(1.0),
            timing,
        ),
        spec,
    )
}

/// Navigation links drop in from 20px above, 0.1s apart after a 0.3s delay, over 0.5s each.
pub fn nav_link_stagger(
    rt: &mut AnimationRuntime,
    targets: impl Into<Target>,
) -> Result<AnimationHandle, AnimationError> {
    rt.animate(from_to(
        targets.into(),
        Props::new().y(-20.0).opacity(0.0),
        Props::new().y(0.0).opacity(1.0),
        Timing::new(0.5, Easing::power2_out()).delay(0.3).stagger(0.1),
    ))
}

/// Pins `container` for one viewport height of scrolling while its first `image` descendant
/// zooms from `start_scale` down to 1.
///
/// Defaults: duration 1, start scale 1.3, smoothing 1s.
pub fn image_scale_pin(
    rt: &mut AnimationRuntime,
    container: ElementId,
    image: impl Into<Target>,
    config: PinConfig,
) -> Result<AnimationHandle, AnimationError> {
    let Some(image) = rt.resolve_within(container, &image.into()).first().copied() else {
        sc_debug!(container = container.0, "image_scale_pin: no image inside container");
        return Ok(AnimationHandle::default());
    };
    let start_scale = config.start_scale.unwrap_or(PIN_START_SCALE);
    let spec = ScrollSpec {
        trigger: Some(container.into()),
        start: PIN_START,
        end: PIN_END,
        scrub: Scrub::Smooth(config.smoothing.unwrap_or(PIN_SMOOTHING)),
        pin: true,
        ..ScrollSpec::default()
    };
    rt.animate_on_scroll(
        Transition::from_to(
            image,
            Props::new().scale(start_scale),
            Props::new().scale(1.0),
        )
        .duration(config.duration.unwrap_or(1.0))
        .ease(Easing::Linear),
        spec,
    )
}

/// Slides a wave separator left by `viewport_height / ratio` while `container` crosses the
/// viewport. The distance is fixed from the viewport height at registration.
pub fn wave_drift(
    rt: &mut AnimationRuntime,
    wave: impl Into<Target>,
    container: ElementId,
    ratio: f32,
) -> Result<AnimationHandle, AnimationError> {
    let distance = if ratio > 0.0 {
        rt.viewport().height / ratio
    } else {
        0.0
    };
    let spec = ScrollSpec::new()
        .with_trigger(Some(container.into()))
        .with_scrub(Scrub::Smooth(WAVE_SMOOTHING));
    rt.animate_on_scroll(
        Transition::from_to(wave, Props::new().x(0.0), Props::new().x(-distance))
            .ease(Easing::Linear),
        spec,
    )
}

/// Starts a transition from a pointer handler. Failures are logged, never raised.
fn tween_to(
    rt: &mut AnimationRuntime,
    target: impl Into<Target>,
    to: Props,
    duration: f32,
    ease: Easing,
) {
    let transition = Transition::to(target, to).duration(duration).ease(ease);
    if let Err(_err) = rt.animate(transition) {
        sc_warn!(error = %_err, "pointer handler failed to start a transition");
    }
}

/// Attaches the same enter/leave pair to each element.
fn hover_pair(
    rt: &mut AnimationRuntime,
    elements: &[ElementId],
    on_enter: impl Fn(&mut AnimationRuntime, ElementId) + Send + Sync + 'static,
    on_leave: impl Fn(&mut AnimationRuntime, ElementId) + Send + Sync + 'static,
) -> Detach {
    let on_enter: scrollcue::PointerHandler = Arc::new(on_enter);
    let on_leave: scrollcue::PointerHandler = Arc::new(on_leave);
    let mut listeners = Vec::with_capacity(elements.len() * 2);
    for element in elements {
        listeners.extend(rt.add_listener_arc(
            *element,
            PointerEvent::Enter,
            Arc::clone(&on_enter),
        ));
        listeners.extend(rt.add_listener_arc(
            *element,
            PointerEvent::Leave,
            Arc::clone(&on_leave),
        ));
    }
    Detach::new(listeners)
}

/// Lifts the element 8px and scales it to 1.02 on hover, settling back on leave. 0.3s,
/// `power2.out`.
pub fn hover_lift(rt: &mut AnimationRuntime, target: impl Into<Target>) -> Detach {
    let elements = rt.resolve(&target.into());
    hover_pair(
        rt,
        &elements,
        |rt, el| {
            tween_to(
                rt,
                el,
                Props::new().y(-8.0).scale(1.02),
                HOVER_DURATION,
                Easing::power2_out(),
            )
        },
        |rt, el| {
            tween_to(
                rt,
                el,
                Props::new().y(0.0).scale(1.0),
                HOVER_DURATION,
                Easing::power2_out(),
            )
        },
    )
}

/// Grows to 1.05 with a `back.out(1.5)` overshoot on hover; back to 1 on leave. 0.3s.
pub fn button_hover(rt: &mut AnimationRuntime, target: impl Into<Target>) -> Detach {
    let elements = rt.resolve(&target.into());
    hover_pair(
        rt,
        &elements,
        |rt, el| {
            tween_to(
                rt,
                el,
                Props::new().scale(1.05),
                HOVER_DURATION,
                Easing::back_out(1.5),
            )
        },
        |rt, el| {
            tween_to(
                rt,
                el,
                Props::new().scale(1.0),
                HOVER_DURATION,
                Easing::power2_out(),
            )
        },
    )
}

/// Hovering `container` scales its first `image` descendant to `scale` (1.1 by default) over
/// 0.5s; leaving restores it.
pub fn image_scale_hover(
    rt: &mut AnimationRuntime,
    container: ElementId,
    image: impl Into<Target>,
    scale: Option<f32>,
) -> Detach {
    let Some(image) = rt.resolve_within(container, &image.into()).first().copied() else {
        return Detach::noop();
    };
    let scale = scale.unwrap_or(1.1);
    hover_pair(
        rt,
        &[container],
        move |rt, _| {
            tween_to(
                rt,
                image,
                Props::new().scale(scale),
                IMAGE_HOVER_DURATION,
                Easing::power2_out(),
            )
        },
        move |rt, _| {
            tween_to(
                rt,
                image,
                Props::new().scale(1.0),
                IMAGE_HOVER_DURATION,
                Easing::power2_out(),
            )
        },
    )
}

/// Keeps exactly one `item` inside `container` at full opacity while the pointer is over it and
/// dims the rest to 0.5; leaving the container restores every item. 0.2s, `power2.out`.
pub fn focus_blur(
    rt: &mut AnimationRuntime,
    container: ElementId,
    item: impl Into<Target>,
) -> Detach {
    let items: Arc<[ElementId]> = rt.resolve_within(container, &item.into()).into();
    if items.is_empty() {
        return Detach::noop();
    }

    let mut listeners = Vec::with_capacity(items.len() + 1);
    for item in items.iter() {
        let items = Arc::clone(&items);
        listeners.extend(rt.add_listener(*item, PointerEvent::Enter, move |rt, focused| {
            tween_to(
                rt,
                focused,
                Props::new().opacity(1.0),
                FOCUS_DURATION,
                Easing::power2_out(),
            );
            let others: Vec<ElementId> =
                items.iter().copied().filter(|i| *i != focused).collect();
            tween_to(
                rt,
                others,
                Props::new().opacity(DIMMED_OPACITY),
                FOCUS_DURATION,
                Easing::power2_out(),
            );
        }));
    }

    let all = Arc::clone(&items);
    listeners.extend(rt.add_listener(container, PointerEvent::Leave, move |rt, _| {
        tween_to(
            rt,
            all.to_vec(),
            Props::new().opacity(1.0),
            FOCUS_DURATION,
            Easing::power2_out(),
        );
    }));

    Detach::new(listeners)
}
