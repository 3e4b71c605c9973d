use crate::*;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn runtime() -> AnimationRuntime {
    AnimationRuntime::new(RuntimeOptions::new(1000.0))
}

fn mount_cards(rt: &mut AnimationRuntime, n: usize) -> Vec<ElementId> {
    (0..n)
        .map(|i| {
            rt.mount(
                ElementSpec::new()
                    .class("card")
                    .layout(1500.0 + i as f32 * 400.0, 300.0),
            )
        })
        .collect()
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn started_targets(events: &[RuntimeEvent]) -> Vec<ElementId> {
    events
        .iter()
        .filter_map(|e| match e {
            RuntimeEvent::TweenStarted { target, .. } => Some(*target),
            _ => None,
        })
        .collect()
}

#[test]
fn ease_names_parse() {
    assert_eq!("none".parse::<Easing>(), Ok(Easing::Linear));
    assert_eq!("power2.out".parse::<Easing>(), Ok(Easing::power2_out()));
    assert_eq!("power2".parse::<Easing>(), Ok(Easing::power2_out()));
    assert_eq!("back.out(1.2)".parse::<Easing>(), Ok(Easing::back_out(1.2)));
    assert_eq!(
        "back.in".parse::<Easing>(),
        Ok(Easing::Back(1.70158, EaseDirection::In))
    );
    assert_eq!("expo.out".parse::<Easing>(), Ok(Easing::expo_out()));
    assert_eq!(
        "sine.inOut".parse::<Easing>(),
        Ok(Easing::Sine(EaseDirection::InOut))
    );

    assert_eq!(
        "wobble.out".parse::<Easing>(),
        Err(AnimationError::UnknownEase("wobble.out".to_owned()))
    );
    assert!("power2.sideways".parse::<Easing>().is_err());
    assert!("power2.out(3)".parse::<Easing>().is_err());
    assert!("back.out(1.2".parse::<Easing>().is_err());
}

#[test]
fn ease_display_round_trips_names() {
    for name in ["none", "power2.out", "back.out(1.5)", "expo.out", "sine.in"] {
        let ease: Easing = name.parse().unwrap();
        assert_eq!(ease.to_string(), name);
    }
}

#[test]
fn eases_hit_endpoints() {
    let eases = [
        Easing::Linear,
        Easing::SmoothStep,
        Easing::power2_out(),
        Easing::Power(3, EaseDirection::InOut),
        Easing::back_out(1.2),
        Easing::expo_out(),
        Easing::Sine(EaseDirection::In),
    ];
    for ease in eases {
        assert!(approx(ease.sample(0.0), 0.0), "{ease}");
        assert_eq!(ease.sample(1.0), 1.0, "{ease}");
    }
    // Out curves front-load progress.
    assert!(Easing::power2_out().sample(0.5) > 0.5);
    // Back overshoots before settling.
    assert!(Easing::back_out(1.7).sample(0.7) > 1.0);
}

#[test]
fn scroll_positions_parse() {
    assert_eq!(
        "top 80%".parse::<ScrollPosition>(),
        Ok(ScrollPosition::Anchored {
            element: Anchor::TOP,
            viewport: Anchor::percent(80.0),
        })
    );
    assert_eq!(
        "top bottom-=20%".parse::<ScrollPosition>(),
        Ok(ScrollPosition::Anchored {
            element: Anchor::TOP,
            viewport: Anchor {
                base: Length::Percent(100.0),
                offset: Length::Percent(-20.0),
            },
        })
    );
    assert_eq!(
        "center 100px".parse::<ScrollPosition>(),
        Ok(ScrollPosition::Anchored {
            element: Anchor::CENTER,
            viewport: Anchor {
                base: Length::Px(100.0),
                offset: Length::Px(0.0),
            },
        })
    );
    assert_eq!(
        "+=100%".parse::<ScrollPosition>(),
        Ok(ScrollPosition::Relative(Length::Percent(100.0)))
    );

    assert!(matches!(
        "top".parse::<ScrollPosition>(),
        Err(AnimationError::InvalidPosition { .. })
    ));
    assert!("middle top".parse::<ScrollPosition>().is_err());
    assert!("top bottom center".parse::<ScrollPosition>().is_err());
}

#[test]
fn non_finite_positions_are_rejected() {
    let inputs = [
        "top NaN%",
        "top inf",
        "NaN bottom",
        "center -infpx",
        "+=NaN%",
        "top bottom-=inf",
    ];
    for input in inputs {
        assert!(
            matches!(
                input.parse::<ScrollPosition>(),
                Err(AnimationError::InvalidPosition { .. })
            ),
            "{input} should not parse"
        );
    }
    assert!(ScrollSpec::between("top NaN%", "top 20%").is_err());
}

#[test]
fn scroll_positions_resolve_against_geometry() {
    let start: ScrollPosition = "top 80%".parse().unwrap();
    assert_eq!(start.resolve(1500.0, 300.0, 1000.0, 0.0), 700.0);

    let end: ScrollPosition = "+=100%".parse().unwrap();
    assert_eq!(end.resolve(1500.0, 300.0, 1000.0, 700.0), 1700.0);

    assert_eq!(
        ScrollPosition::BOTTOM_TOP.resolve(1500.0, 300.0, 1000.0, 0.0),
        1800.0
    );
}

#[test]
fn class_targets_resolve_in_document_order() {
    let mut rt = runtime();
    let a = rt.mount(ElementSpec::new().class("card"));
    let _other = rt.mount(ElementSpec::new().class("hero"));
    let b = rt.mount(ElementSpec::new().class("card").class("wide"));

    assert_eq!(rt.resolve(&".card".into()), vec![a, b]);
    assert_eq!(rt.resolve(&Target::class("wide")), vec![b]);
    assert_eq!(rt.resolve(&vec![b, a].into()), vec![b, a]);
    assert!(rt.resolve(&".missing".into()).is_empty());
}

#[test]
fn resolve_within_limits_to_descendants() {
    let mut rt = runtime();
    let list = rt.mount(ElementSpec::new().class("list"));
    let inside = rt.mount(ElementSpec::new().class("item").child_of(list));
    let nested = rt.mount(ElementSpec::new().class("item").child_of(inside));
    let _outside = rt.mount(ElementSpec::new().class("item"));

    assert_eq!(rt.resolve_within(list, &".item".into()), vec![inside, nested]);
}

#[test]
fn empty_target_is_a_no_op() {
    let mut rt = runtime();
    let handle = rt
        .animate(Transition::to(".ghost", Props::new().opacity(0.0)))
        .unwrap();
    assert!(handle.is_empty());
    assert_eq!(rt.tween_count(), 0);

    let handle = rt
        .animate_on_scroll(
            Transition::to(".ghost", Props::new().opacity(0.0)),
            ScrollSpec::new(),
        )
        .unwrap();
    assert!(handle.is_empty());
    assert_eq!(rt.binding_count(), 0);
}

#[test]
fn from_to_requires_matching_properties() {
    let mut rt = runtime();
    mount_cards(&mut rt, 1);
    let err = rt
        .animate(Transition::from_to(
            ".card",
            Props::new().opacity(0.0),
            Props::new().opacity(1.0).y(0.0),
        ))
        .unwrap_err();
    assert_eq!(err, AnimationError::PropertyMismatch);
    assert_eq!(rt.tween_count(), 0);
}

#[test]
fn from_state_renders_immediately() {
    let mut rt = runtime();
    let cards = mount_cards(&mut rt, 1);
    rt.animate(
        Transition::from_to(
            ".card",
            Props::new().opacity(0.0).y(60.0),
            Props::new().opacity(1.0).y(0.0),
        )
        .duration(0.8),
    )
    .unwrap();

    let v = rt.visual(cards[0]).unwrap();
    assert_eq!(v.opacity, 0.0);
    assert_eq!(v.y, 60.0);
}

#[test]
fn timed_transition_eases_to_target() {
    let mut rt = runtime();
    let cards = mount_cards(&mut rt, 1);
    rt.animate(
        Transition::from_to(".card", Props::new().opacity(0.0), Props::new().opacity(1.0))
            .duration(1.0)
            .ease(Easing::Linear),
    )
    .unwrap();

    assert!(rt.tick(0));
    assert!(rt.tick(500));
    assert!(approx(rt.visual(cards[0]).unwrap().opacity, 0.5));

    assert!(!rt.tick(1500));
    assert_eq!(rt.visual(cards[0]).unwrap().opacity, 1.0);
    // Finished clock tweens are dropped.
    assert_eq!(rt.tween_count(), 0);
}

#[test]
fn stagger_offsets_start_times_in_target_order() {
    let mut rt = runtime();
    let cards = mount_cards(&mut rt, 3);
    let handle = rt
        .animate(
            Transition::from_to(".card", Props::new().opacity(0.0), Props::new().opacity(1.0))
                .duration(0.5)
                .stagger(0.1),
        )
        .unwrap();

    let delays: Vec<f32> = handle
        .tweens
        .iter()
        .map(|id| rt.tween(*id).unwrap().delay)
        .collect();
    assert_eq!(delays, vec![0.0, 0.1, 0.2]);

    rt.tick(0);
    rt.tick(50);
    assert_eq!(started_targets(rt.events()), vec![cards[0]]);
    rt.tick(150);
    assert_eq!(started_targets(rt.events()), vec![cards[0], cards[1]]);
    rt.tick(1000);
    assert_eq!(started_targets(rt.events()), cards);

    for card in &cards {
        assert_eq!(rt.visual(*card).unwrap().opacity, 1.0);
    }
}

#[test]
fn completion_callback_fires_once() {
    let mut rt = runtime();
    mount_cards(&mut rt, 2);
    let done = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&done);
    rt.animate(
        Transition::to(".card", Props::new().scale(1.1))
            .duration(0.3)
            .on_complete(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
    )
    .unwrap();

    rt.tick(0);
    rt.tick(1000);
    rt.tick(2000);
    assert_eq!(done.load(Ordering::SeqCst), 2);
}

#[test]
fn newer_tween_takes_over_properties() {
    let mut rt = runtime();
    let cards = mount_cards(&mut rt, 1);
    rt.animate(Transition::to(cards[0], Props::new().scale(1.05)).duration(1.0))
        .unwrap();
    let keeps_y = rt
        .animate(Transition::to(cards[0], Props::new().y(-8.0).opacity(0.5)).duration(1.0))
        .unwrap();
    let takes_over = rt
        .animate(Transition::to(cards[0], Props::new().scale(1.0).opacity(1.0)).duration(0.2))
        .unwrap();

    // The first tween lost its only property.
    assert_eq!(rt.tween_count(), 2);
    let remaining = rt.tween(keeps_y.tweens[0]).unwrap();
    assert_eq!(remaining.to, Props::new().y(-8.0));

    rt.tick(0);
    rt.tick(5000);
    let v = rt.visual(cards[0]).unwrap();
    assert_eq!(v.scale, 1.0);
    assert_eq!(v.opacity, 1.0);
    assert_eq!(v.y, -8.0);
    assert!(rt.tween(takes_over.tweens[0]).is_none());
}

#[test]
fn overwrite_stays_within_the_registering_scope() {
    let mut rt = runtime();
    let cards = mount_cards(&mut rt, 1);
    let done = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&done);

    let a = rt.open_scope();
    rt.run_in_scope(a, |rt| {
        rt.animate(
            Transition::from_to(cards[0], Props::new().opacity(0.0), Props::new().opacity(1.0))
                .duration(1.0)
                .on_complete(move |_, _| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
        )
        .unwrap();
    });
    let b = rt.open_scope();
    rt.run_in_scope(b, |rt| {
        rt.animate(Transition::to(cards[0], Props::new().opacity(0.5)).duration(0.2))
            .unwrap();
    });

    assert_eq!(rt.scope(a).unwrap().tweens().len(), 1);
    assert_eq!(rt.scope(b).unwrap().tweens().len(), 1);
    assert_eq!(rt.tween_count(), 2);

    rt.tick(0);
    rt.tick(5000);
    assert_eq!(done.load(Ordering::SeqCst), 1);

    // Within one scope the newer tween still takes over.
    rt.run_in_scope(b, |rt| {
        rt.animate(Transition::to(cards[0], Props::new().scale(1.2)).duration(1.0))
            .unwrap();
        rt.animate(Transition::to(cards[0], Props::new().scale(1.0)).duration(1.0))
            .unwrap();
    });
    assert_eq!(rt.scope(b).unwrap().tweens().len(), 1);
}

#[test]
fn one_shot_binding_plays_once() {
    let mut rt = runtime();
    let cards = mount_cards(&mut rt, 1);
    let handle = rt
        .animate_on_scroll(
            Transition::from_to(
                ".card",
                Props::new().opacity(0.0).y(60.0),
                Props::new().opacity(1.0).y(0.0),
            )
            .duration(0.8),
            ScrollSpec::between("top 80%", "top 20%").unwrap(),
        )
        .unwrap();
    let binding = handle.bindings[0];
    let info = rt.binding(binding).unwrap();
    assert_eq!((info.start_px, info.end_px), (700.0, 1300.0));
    assert!(!info.played);

    rt.tick(0);
    rt.tick(2000);
    assert_eq!(rt.visual(cards[0]).unwrap().opacity, 0.0);

    rt.on_scroll(800.0);
    assert!(rt.binding(binding).unwrap().played);
    rt.tick(4000);
    assert_eq!(rt.visual(cards[0]).unwrap().opacity, 1.0);
    assert_eq!(rt.visual(cards[0]).unwrap().y, 0.0);

    rt.drain_events();
    rt.on_scroll(0.0);
    rt.on_scroll(800.0);
    rt.tick(6000);
    assert!(started_targets(&rt.drain_events()).is_empty());
    assert_eq!(rt.visual(cards[0]).unwrap().opacity, 1.0);
}

#[test]
fn replaying_binding_restarts_on_reentry() {
    let mut rt = runtime();
    let cards = mount_cards(&mut rt, 1);
    rt.animate_on_scroll(
        Transition::from_to(".card", Props::new().opacity(0.0), Props::new().opacity(1.0))
            .duration(0.5),
        ScrollSpec::between("top 80%", "top 20%")
            .unwrap()
            .with_replay_on_reenter(true),
    )
    .unwrap();

    rt.tick(0);
    rt.on_scroll(800.0);
    rt.tick(1000);
    rt.on_scroll(0.0);
    rt.on_scroll(800.0);
    assert_eq!(rt.visual(cards[0]).unwrap().opacity, 0.0);
    rt.tick(2000);
    assert_eq!(rt.visual(cards[0]).unwrap().opacity, 1.0);
    assert_eq!(started_targets(rt.events()).len(), 2);
}

#[test]
fn trigger_already_in_range_plays_on_registration() {
    let mut rt = AnimationRuntime::new(RuntimeOptions::new(1000.0).with_initial_scroll(900.0));
    let cards = mount_cards(&mut rt, 1);
    rt.animate_on_scroll(
        Transition::from_to(".card", Props::new().opacity(0.0), Props::new().opacity(1.0)),
        ScrollSpec::between("top 80%", "top 20%").unwrap(),
    )
    .unwrap();

    rt.tick(0);
    rt.tick(1000);
    assert_eq!(rt.visual(cards[0]).unwrap().opacity, 1.0);
}

#[test]
fn direct_scrub_tracks_scroll_monotonically() {
    let mut rt = runtime();
    let section = rt.mount(ElementSpec::new().class("parallax").layout(2000.0, 500.0));
    let handle = rt
        .animate_on_scroll(
            Transition::from_to(
                section,
                Props::new().y_percent(0.0),
                Props::new().y_percent(-20.0),
            )
            .ease(Easing::Linear),
            ScrollSpec::new().with_scrub(Scrub::Direct),
        )
        .unwrap();
    let info = rt.binding(handle.bindings[0]).unwrap();
    assert_eq!((info.start_px, info.end_px), (1000.0, 2500.0));

    let mut last = f32::INFINITY;
    for step in 0..=30 {
        rt.on_scroll(800.0 + step as f32 * 70.0);
        let y = rt.visual(section).unwrap().y_percent;
        assert!(y <= last, "parallax offset moved backwards at step {step}");
        last = y;
    }

    rt.on_scroll(1750.0);
    assert!(approx(rt.visual(section).unwrap().y_percent, -10.0));
    rt.on_scroll(5000.0);
    assert_eq!(rt.visual(section).unwrap().y_percent, -20.0);
}

#[test]
fn smooth_scrub_lags_then_settles() {
    let mut rt = runtime();
    let section = rt.mount(ElementSpec::new().layout(2000.0, 500.0));
    let handle = rt
        .animate_on_scroll(
            Transition::from_to(
                section,
                Props::new().y_percent(0.0),
                Props::new().y_percent(-20.0),
            )
            .ease(Easing::Linear),
            ScrollSpec::new().with_scrub(Scrub::Smooth(1.0)),
        )
        .unwrap();
    let binding = handle.bindings[0];

    rt.tick(0);
    rt.on_scroll(1750.0);
    assert_eq!(rt.visual(section).unwrap().y_percent, 0.0);
    assert!(rt.is_animating());

    rt.tick(1000);
    let info = rt.binding(binding).unwrap();
    assert!(info.rendered_progress > 0.3 && info.rendered_progress < 0.5);
    let lagging = rt.visual(section).unwrap().y_percent;
    assert!(lagging < 0.0 && lagging > -10.0);

    rt.tick(30_000);
    assert_eq!(rt.binding(binding).unwrap().rendered_progress, 0.5);
    assert!(approx(rt.visual(section).unwrap().y_percent, -10.0));
    assert!(!rt.is_animating());
}

#[test]
fn pin_is_held_while_range_is_active() {
    let mut rt = runtime();
    let hero = rt.mount(ElementSpec::new().class("hero").layout(1000.0, 800.0));
    rt.animate_on_scroll(
        Transition::from_to(hero, Props::new().scale(1.3), Props::new().scale(1.0))
            .ease(Easing::Linear),
        ScrollSpec::between("top top", "+=100%")
            .unwrap()
            .with_scrub(Scrub::Direct)
            .with_pin(true),
    )
    .unwrap();

    assert!(!rt.is_pinned(hero));
    rt.on_scroll(1500.0);
    assert!(rt.is_pinned(hero));
    assert!(approx(rt.visual(hero).unwrap().scale, 1.15));
    rt.on_scroll(2100.0);
    assert!(!rt.is_pinned(hero));
    assert_eq!(rt.visual(hero).unwrap().scale, 1.0);
}

#[test]
fn inverted_range_is_rejected() {
    let mut rt = runtime();
    mount_cards(&mut rt, 1);
    let err = rt
        .animate_on_scroll(
            Transition::to(".card", Props::new().opacity(1.0)),
            ScrollSpec::between("top top", "top bottom").unwrap(),
        )
        .unwrap_err();
    assert_eq!(
        err,
        AnimationError::InvertedTriggerRange {
            start: 1500.0,
            end: 500.0,
        }
    );
    assert_eq!(rt.binding_count(), 0);
    assert_eq!(rt.tween_count(), 0);
}

#[test]
fn explicit_trigger_that_matches_nothing_is_a_no_op() {
    let mut rt = runtime();
    mount_cards(&mut rt, 1);
    let handle = rt
        .animate_on_scroll(
            Transition::to(".card", Props::new().opacity(1.0)),
            ScrollSpec::new().with_trigger(Some(".missing".into())),
        )
        .unwrap();
    assert!(handle.is_empty());
}

#[test]
fn layout_changes_need_refresh() {
    let mut rt = runtime();
    let cards = mount_cards(&mut rt, 1);
    let handle = rt
        .animate_on_scroll(
            Transition::to(".card", Props::new().opacity(1.0)),
            ScrollSpec::between("top 80%", "top 20%").unwrap(),
        )
        .unwrap();
    let binding = handle.bindings[0];

    rt.set_layout(cards[0], 3000.0, 300.0);
    assert_eq!(rt.binding(binding).unwrap().start_px, 700.0);

    rt.on_load(0);
    assert!(rt.has_pending_refresh());
    rt.tick(50);
    assert_eq!(rt.binding(binding).unwrap().start_px, 700.0);
    rt.tick(100);
    assert!(!rt.has_pending_refresh());
    assert_eq!(rt.binding(binding).unwrap().start_px, 2200.0);
    assert!(rt.events().contains(&RuntimeEvent::Refreshed));

    rt.on_resize(500.0);
    assert_eq!(rt.binding(binding).unwrap().start_px, 2600.0);
}

#[test]
fn toggle_callbacks_follow_active_state() {
    let mut rt = runtime();
    mount_cards(&mut rt, 1);
    let toggles = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = Arc::clone(&toggles);
    rt.animate_on_scroll(
        Transition::to(".card", Props::new().opacity(1.0)),
        ScrollSpec::between("top 80%", "top 20%")
            .unwrap()
            .with_on_toggle(move |_, active| sink.lock().unwrap().push(active)),
    )
    .unwrap();

    rt.on_scroll(800.0);
    rt.on_scroll(900.0);
    rt.on_scroll(1400.0);
    rt.on_scroll(1000.0);
    assert_eq!(*toggles.lock().unwrap(), vec![true, false, true]);
}

fn count_updates(limit_callbacks: bool) -> usize {
    let mut rt = AnimationRuntime::new(
        RuntimeOptions::new(1000.0).with_limit_callbacks(limit_callbacks),
    );
    let section = rt.mount(ElementSpec::new().layout(2000.0, 500.0));
    let updates = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&updates);
    rt.animate_on_scroll(
        Transition::to(section, Props::new().y_percent(-20.0)),
        ScrollSpec::new()
            .with_scrub(Scrub::Direct)
            .with_on_update(move |_, _| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
    )
    .unwrap();

    for scroll in [1200.0, 1500.0, 1800.0, 3000.0] {
        rt.on_scroll(scroll);
    }
    updates.load(Ordering::SeqCst)
}

#[test]
fn limited_callbacks_fire_only_on_toggle() {
    assert_eq!(count_updates(false), 4);
    assert_eq!(count_updates(true), 2);
}

#[test]
fn reduced_motion_is_idempotent() {
    let mut rt = runtime();
    assert_eq!(rt.time_scale(), 1.0);

    let a = rt.subscribe_reduced_motion(&true);
    let b = rt.subscribe_reduced_motion(&true);
    assert_ne!(a, b);
    assert_eq!(rt.motion_mode(), MotionMode::Reduced);
    assert_eq!(rt.time_scale(), REDUCED_TIME_SCALE);
    assert!(rt.limits_callbacks());
    assert_eq!(rt.motion_gate().subscribers(), 2);

    rt.motion_preference_changed(Some(false));
    assert_eq!(rt.motion_mode(), MotionMode::Normal);
    assert_eq!(rt.time_scale(), 1.0);
    assert!(!rt.limits_callbacks());

    rt.motion_preference_changed(Some(true));
    assert_eq!(rt.time_scale(), REDUCED_TIME_SCALE);
}

#[test]
fn unsupported_query_means_normal_motion() {
    let mut rt = runtime();
    rt.subscribe_reduced_motion(&UnsupportedQuery);
    assert_eq!(rt.motion_mode(), MotionMode::Normal);
    assert_eq!(rt.time_scale(), 1.0);
}

#[test]
fn change_events_are_ignored_without_subscribers() {
    let mut rt = runtime();
    let id = rt.subscribe_reduced_motion(&false);
    assert!(rt.unsubscribe_reduced_motion(id));
    assert!(!rt.unsubscribe_reduced_motion(id));

    rt.motion_preference_changed(Some(true));
    assert_eq!(rt.motion_mode(), MotionMode::Normal);
    assert_eq!(rt.time_scale(), 1.0);
}

#[test]
fn reduced_motion_completes_transitions_almost_instantly() {
    let mut rt = runtime();
    let cards = mount_cards(&mut rt, 3);
    rt.subscribe_reduced_motion(&true);
    rt.animate(
        Transition::from_to(".card", Props::new().opacity(0.0), Props::new().opacity(1.0))
            .duration(1.2)
            .stagger(0.1),
    )
    .unwrap();

    rt.tick(0);
    rt.tick(1);
    for card in cards {
        assert_eq!(rt.visual(card).unwrap().opacity, 1.0);
    }
}

#[test]
fn closing_a_scope_tears_everything_down() {
    let mut rt = runtime();
    let cards = mount_cards(&mut rt, 2);
    let before_tweens = rt.tween_count();
    let before_bindings = rt.binding_count();
    let before_listeners = rt.listener_count();

    let scope = rt.open_scope();
    rt.run_in_scope(scope, |rt| {
        rt.animate_on_scroll(
            Transition::from_to(".card", Props::new().opacity(0.0), Props::new().opacity(1.0)),
            ScrollSpec::between("top 80%", "top 20%").unwrap(),
        )
        .unwrap();
        rt.animate(Transition::to(cards[1], Props::new().scale(1.2)))
            .unwrap();
        rt.add_listener(cards[0], PointerEvent::Enter, |_, _| {});
        rt.subscribe_reduced_motion(&false);
    });

    let ctx = rt.scope(scope).unwrap();
    assert_eq!(ctx.tweens().len(), 3);
    assert_eq!(ctx.bindings().len(), 1);
    assert_eq!(ctx.listeners().len(), 1);
    assert_eq!(ctx.subscriptions().len(), 1);
    assert_eq!(rt.visual(cards[0]).unwrap().opacity, 0.0);

    rt.tick(0);
    rt.tick(100);
    assert!(rt.close_scope(scope));
    assert!(!rt.close_scope(scope));

    assert_eq!(rt.tween_count(), before_tweens);
    assert_eq!(rt.binding_count(), before_bindings);
    assert_eq!(rt.listener_count(), before_listeners);
    assert!(!rt.motion_gate().is_listening());
    assert_eq!(rt.scope_count(), 0);

    let v = rt.visual(cards[1]).unwrap();
    assert_eq!(v.scale, 1.0);
    assert_eq!(rt.visual(cards[0]).unwrap().opacity, 1.0);

    // Nothing left to replay.
    rt.on_scroll(800.0);
    rt.tick(1000);
    assert_eq!(rt.visual(cards[0]).unwrap().opacity, 1.0);
}

#[test]
fn registrations_outside_scopes_are_unattributed() {
    let mut rt = runtime();
    let cards = mount_cards(&mut rt, 1);
    let scope = rt.open_scope();
    rt.animate(Transition::to(cards[0], Props::new().scale(1.2)))
        .unwrap();
    assert!(rt.scope(scope).unwrap().is_empty());
    assert_eq!(rt.current_scope(), None);
}

#[test]
fn pointer_handlers_run_in_their_scope() {
    let mut rt = runtime();
    let cards = mount_cards(&mut rt, 1);
    let card = cards[0];
    let scope = rt.open_scope();
    rt.run_in_scope(scope, |rt| {
        rt.add_listener(card, PointerEvent::Enter, |rt, el| {
            rt.animate(Transition::to(el, Props::new().y(-8.0)).duration(0.3))
                .unwrap();
        });
    });

    assert_eq!(rt.dispatch_pointer(card, PointerEvent::Enter), 1);
    assert_eq!(rt.dispatch_pointer(card, PointerEvent::Leave), 0);
    assert_eq!(rt.scope(scope).unwrap().tweens().len(), 1);

    rt.tick(0);
    rt.tick(150);
    assert!(rt.visual(card).unwrap().y < 0.0);
    rt.close_scope(scope);
    assert_eq!(rt.tween_count(), 0);
    assert_eq!(rt.visual(card).unwrap().y, 0.0);
    assert_eq!(rt.dispatch_pointer(card, PointerEvent::Enter), 0);
}

#[test]
fn unmount_drops_related_registrations() {
    let mut rt = runtime();
    let section = rt.mount(ElementSpec::new().class("section").layout(1500.0, 300.0));
    let child = rt.mount(ElementSpec::new().class("card").child_of(section));
    rt.animate_on_scroll(
        Transition::to(child, Props::new().opacity(1.0)),
        ScrollSpec::new().with_trigger(Some(section.into())),
    )
    .unwrap();
    rt.add_listener(child, PointerEvent::Enter, |_, _| {});
    assert_eq!(rt.binding_count(), 1);

    rt.unmount(section);
    assert!(rt.element(child).is_none());
    assert_eq!(rt.binding_count(), 0);
    assert_eq!(rt.tween_count(), 0);
    assert_eq!(rt.listener_count(), 0);
}

#[test]
fn kill_cancels_a_handle() {
    let mut rt = runtime();
    mount_cards(&mut rt, 2);
    let handle = rt
        .animate_on_scroll(
            Transition::to(".card", Props::new().opacity(1.0)),
            ScrollSpec::new(),
        )
        .unwrap();
    assert_eq!(handle.tweens.len(), 2);
    rt.kill(&handle);
    assert_eq!(rt.tween_count(), 0);
    assert_eq!(rt.binding_count(), 0);
}

#[test]
fn auto_alpha_toggles_visibility() {
    let mut rt = runtime();
    let cards = mount_cards(&mut rt, 1);
    rt.animate(
        Transition::from_to(".card", Props::new().auto_alpha(0.0), Props::new().auto_alpha(1.0))
            .duration(1.0),
    )
    .unwrap();
    assert!(!rt.visual(cards[0]).unwrap().visible);
    rt.tick(0);
    rt.tick(500);
    assert!(rt.visual(cards[0]).unwrap().visible);
}

#[test]
fn frame_state_restores_viewport() {
    let mut rt = runtime();
    mount_cards(&mut rt, 1);
    rt.on_scroll(420.0);
    rt.subscribe_reduced_motion(&true);

    let frame = rt.frame_state();
    assert_eq!(frame.viewport.scroll_y, 420.0);
    assert_eq!(frame.motion, MotionMode::Reduced);
    assert_eq!(frame.time_scale, REDUCED_TIME_SCALE);

    let mut other = runtime();
    other.restore_viewport_state(frame.viewport);
    assert_eq!(other.scroll_y(), 420.0);
    assert_eq!(other.viewport().height, 1000.0);
}

#[test]
fn events_can_be_disabled() {
    let mut rt = AnimationRuntime::new(RuntimeOptions::new(1000.0).with_record_events(false));
    mount_cards(&mut rt, 1);
    rt.animate(Transition::to(".card", Props::new().opacity(0.5)))
        .unwrap();
    rt.tick(0);
    rt.tick(1000);
    assert!(rt.drain_events().is_empty());
}
