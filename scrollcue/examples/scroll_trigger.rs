// Example: a host driving scroll-triggered reveals and a scrubbed parallax layer.
use scrollcue::{
    AnimationRuntime, Easing, ElementSpec, Props, RuntimeOptions, ScrollSpec, Scrub, Transition,
};

fn main() -> Result<(), scrollcue::AnimationError> {
    let mut rt = AnimationRuntime::new(RuntimeOptions::new(800.0));

    let hero = rt.mount(ElementSpec::new().class("hero").layout(0.0, 800.0));
    for i in 0..4 {
        rt.mount(
            ElementSpec::new()
                .class("card")
                .layout(1000.0 + i as f32 * 320.0, 280.0),
        );
    }

    // Cards rise in once as their top edge passes 85% of the viewport.
    rt.animate_on_scroll(
        Transition::from_to(
            ".card",
            Props::new().opacity(0.0).y(60.0),
            Props::new().opacity(1.0).y(0.0),
        )
        .duration(0.8)
        .stagger(0.1)
        .ease(Easing::power2_out()),
        ScrollSpec::between("top 85%", "top 20%")?.with_trigger(Some(".card".into())),
    )?;

    // The hero drifts upward while it scrolls out.
    rt.animate_on_scroll(
        Transition::from_to(hero, Props::new().y_percent(0.0), Props::new().y_percent(-20.0))
            .ease(Easing::Linear),
        ScrollSpec::new().with_scrub(Scrub::Smooth(0.1)),
    )?;

    rt.on_load(0);

    let mut now_ms = 0u64;
    let mut scroll = 0.0f32;
    while now_ms <= 3_000 {
        // Simulate a 60fps frame with the user scrolling down steadily.
        now_ms += 16;
        scroll = (scroll + 12.0).min(1600.0);
        rt.on_scroll(scroll);
        rt.tick(now_ms);

        if now_ms % 320 == 0 {
            let cards: Vec<_> = rt
                .resolve(&".card".into())
                .into_iter()
                .filter_map(|id| rt.visual(id))
                .map(|v| format!("{:.2}", v.opacity))
                .collect();
            println!(
                "t={now_ms}ms scroll={scroll} hero_y%={:.2} cards={cards:?}",
                rt.visual(hero).map(|v| v.y_percent).unwrap_or_default(),
            );
        }
    }

    for event in rt.drain_events() {
        println!("{event:?}");
    }
    Ok(())
}
