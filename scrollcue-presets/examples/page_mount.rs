// Example: a page component binding presets to its lifecycle across a route change.
use scrollcue::{AnimationError, AnimationRuntime, ElementSpec, PointerEvent, RuntimeOptions};
use scrollcue_presets::{
    LifecycleBinder, ParallaxConfig, ScrollConfig, focus_blur, hero_reveal,
    hover_lift, nav_link_stagger, parallax, scroll_stagger,
};

fn main() -> Result<(), AnimationError> {
    let mut rt = AnimationRuntime::new(RuntimeOptions::new(900.0));

    // A host would mount these from its own render tree.
    let nav = rt.mount(ElementSpec::new().class("nav"));
    for _ in 0..4 {
        rt.mount(ElementSpec::new().class("nav-link").child_of(nav));
    }
    let hero = rt.mount(ElementSpec::new().class("hero").layout(0.0, 900.0));
    let grid = rt.mount(ElementSpec::new().class("grid").layout(1100.0, 900.0));
    let cards: Vec<_> = (0..6)
        .map(|i| {
            rt.mount(
                ElementSpec::new()
                    .class("card")
                    .child_of(grid)
                    .layout(1100.0 + (i / 3) as f32 * 450.0, 420.0),
            )
        })
        .collect();

    rt.subscribe_reduced_motion(&false);
    rt.on_load(0);

    let mut page = LifecycleBinder::new();
    page.run(&mut rt, "home", |rt| {
        nav_link_stagger(rt, ".nav-link")?;
        hero_reveal(rt, hero)?;
        parallax(rt, hero, ParallaxConfig::default())?;
        scroll_stagger(rt, ".card", ScrollConfig::new().with_trigger(grid))?;
        let detach = hover_lift(rt, ".card").and(focus_blur(rt, grid, ".card"));
        Ok::<_, AnimationError>(Some(detach.into()))
    })?;

    let mut now_ms = 0u64;
    let mut scroll = 0.0f32;
    while now_ms < 2_400 {
        now_ms += 16;
        scroll = (scroll + 10.0).min(1_200.0);
        rt.on_scroll(scroll);
        if now_ms == 1_600 {
            rt.dispatch_pointer(cards[1], PointerEvent::Enter);
        }
        rt.tick(now_ms);

        if now_ms % 480 == 0 {
            let opacities: Vec<_> = cards
                .iter()
                .filter_map(|id| rt.visual(*id))
                .map(|v| format!("{:.2}", v.opacity))
                .collect();
            println!("t={now_ms}ms scroll={scroll} cards={opacities:?}");
        }
    }

    // Route change: the old page's registrations are torn down before the new setup runs.
    page.run(&mut rt, "about", |rt| {
        scroll_stagger(rt, ".card", ScrollConfig::default())?;
        Ok::<_, AnimationError>(None)
    })?;
    println!(
        "after route change: tweens={} bindings={} listeners={}",
        rt.tween_count(),
        rt.binding_count(),
        rt.listener_count()
    );

    page.unmount(&mut rt);
    println!(
        "after unmount: tweens={} bindings={} listeners={}",
        rt.tween_count(),
        rt.binding_count(),
        rt.listener_count()
    );
    Ok(())
}
