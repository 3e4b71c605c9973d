use std::collections::BTreeMap;
use std::sync::Arc;

use crate::pointer::Listener;
use crate::scroll::ScrollBinding;
use crate::tween::{Tween, TweenMode};
use crate::{
    AnimationContext, AnimationError, BindingId, BindingInfo, Element, ElementId, ElementSpec,
    FrameState, ListenerId, MotionGate, MotionMode, MotionQuery, PointerEvent, PointerHandler,
    Props, RuntimeOptions, ScopeId, ScrollPosition, ScrollSpec, Scrub, Stage, SubscriptionId,
    Target, Transition, TweenId, TweenInfo, ViewportState, VisualState,
};

/// Below this distance a smoothed scrub snaps to its target progress.
const SCRUB_SNAP_EPSILON: f32 = 1e-4;

/// Something observable that happened inside the runtime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RuntimeEvent {
    /// A tween's delay elapsed and it rendered its first frame. `delay` is in seconds.
    TweenStarted {
        tween: TweenId,
        target: ElementId,
        delay: f32,
    },
    TweenCompleted {
        tween: TweenId,
        target: ElementId,
    },
    TriggerEntered {
        binding: BindingId,
    },
    TriggerLeft {
        binding: BindingId,
    },
    Refreshed,
}

/// What a transition registered. Empty when its target matched no element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnimationHandle {
    pub tweens: Vec<TweenId>,
    pub bindings: Vec<BindingId>,
}

impl AnimationHandle {
    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty() && self.bindings.is_empty()
    }

    pub fn merge(&mut self, other: AnimationHandle) {
        self.tweens.extend(other.tweens);
        self.bindings.extend(other.bindings);
    }
}

/// A headless runtime for timed and scroll-driven transitions.
///
/// This type is intentionally UI-agnostic:
/// - It does not hold any UI objects; elements are ids with classes and geometry.
/// - Your host drives it with `on_scroll`, `on_resize`, `dispatch_pointer` and `tick(now_ms)`.
/// - Animated values are read back with `visual(id)` and written to the real UI by the host.
///
/// All process-wide animation state lives here: the scroll binding registry, pointer
/// listeners, and the global time scale owned by the reduced-motion gate.
pub struct AnimationRuntime {
    options: RuntimeOptions,
    stage: Stage,
    viewport: ViewportState,

    now_ms: Option<u64>,
    timeline_ms: f64,
    time_scale: f64,
    limit_callbacks: bool,
    motion: MotionGate,

    tweens: BTreeMap<TweenId, Tween>,
    bindings: BTreeMap<BindingId, ScrollBinding>,
    listeners: BTreeMap<ListenerId, Listener>,
    scopes: BTreeMap<ScopeId, AnimationContext>,
    scope_stack: Vec<ScopeId>,

    pending_refresh_ms: Option<u64>,
    events: Vec<RuntimeEvent>,
    next_id: u64,
}

impl Default for AnimationRuntime {
    fn default() -> Self {
        Self::new(RuntimeOptions::default())
    }
}

impl AnimationRuntime {
    pub fn new(options: RuntimeOptions) -> Self {
        sc_debug!(
            viewport_height = options.viewport_height,
            initial_scroll = options.initial_scroll,
            "AnimationRuntime::new"
        );
        Self {
            viewport: ViewportState {
                scroll_y: options.initial_scroll,
                height: options.viewport_height,
            },
            limit_callbacks: options.limit_callbacks,
            options,
            stage: Stage::new(),
            now_ms: None,
            timeline_ms: 0.0,
            time_scale: 1.0,
            motion: MotionGate::default(),
            tweens: BTreeMap::new(),
            bindings: BTreeMap::new(),
            listeners: BTreeMap::new(),
            scopes: BTreeMap::new(),
            scope_stack: Vec::new(),
            pending_refresh_ms: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    fn emit(&mut self, event: RuntimeEvent) {
        if self.options.record_events {
            self.events.push(event);
        }
    }

    /// Takes every event recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<RuntimeEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[RuntimeEvent] {
        &self.events
    }

    // Stage ------------------------------------------------------------------------------------

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn mount(&mut self, spec: ElementSpec) -> ElementId {
        self.stage.mount(spec)
    }

    /// Removes an element and its descendants, along with every tween, binding and listener
    /// that refers to them.
    pub fn unmount(&mut self, id: ElementId) {
        let removed = self.stage.unmount(id);
        if removed.is_empty() {
            return;
        }

        let dead_bindings: Vec<BindingId> = self
            .bindings
            .values()
            .filter(|b| removed.contains(&b.trigger))
            .map(|b| b.id)
            .collect();
        for id in dead_bindings {
            self.release_binding(id);
        }

        let dead_tweens: Vec<TweenId> = self
            .tweens
            .values()
            .filter(|t| removed.contains(&t.target))
            .map(|t| t.id)
            .collect();
        for id in dead_tweens {
            self.kill_tween(id);
        }

        self.listeners.retain(|_, l| !removed.contains(&l.element));
        sc_trace!(element = id.0, removed = removed.len(), "unmount");
    }

    /// Updates an element's layout. Trigger boundaries keep their cached values until the next
    /// [`Self::refresh`].
    pub fn set_layout(&mut self, id: ElementId, top: f32, height: f32) -> bool {
        let Some(el) = self.stage.get_mut(id) else {
            return false;
        };
        el.top = top;
        el.height = height;
        true
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.stage.get(id)
    }

    pub fn visual(&self, id: ElementId) -> Option<VisualState> {
        self.stage.get(id).map(|el| el.visual)
    }

    pub fn resolve(&self, target: &Target) -> Vec<ElementId> {
        self.stage.resolve(target)
    }

    pub fn resolve_within(&self, root: ElementId, target: &Target) -> Vec<ElementId> {
        self.stage.resolve_within(root, target)
    }

    // Viewport ---------------------------------------------------------------------------------

    pub fn viewport(&self) -> ViewportState {
        self.viewport
    }

    pub fn scroll_y(&self) -> f32 {
        self.viewport.scroll_y
    }

    /// Applies a scroll offset from the host and evaluates every binding against it.
    pub fn on_scroll(&mut self, scroll_y: f32) {
        sc_trace!(scroll_y, "on_scroll");
        self.viewport.scroll_y = scroll_y;
        let ids: Vec<BindingId> = self.bindings.keys().copied().collect();
        for id in ids {
            self.evaluate_binding(id, false);
        }
    }

    /// Applies a viewport resize. Resizing changes every boundary, so this refreshes.
    pub fn on_resize(&mut self, viewport_height: f32) {
        self.viewport.height = viewport_height;
        self.refresh();
    }

    /// Call when the page finished loading; schedules a refresh once layout has settled.
    pub fn on_load(&mut self, now_ms: u64) {
        self.schedule_refresh(now_ms, self.options.load_refresh_delay_ms);
    }

    /// Runs [`Self::refresh`] from the first `tick` at or after `now_ms + delay_ms`.
    pub fn schedule_refresh(&mut self, now_ms: u64, delay_ms: u64) {
        let due = now_ms.saturating_add(delay_ms);
        self.pending_refresh_ms = Some(match self.pending_refresh_ms {
            Some(prev) => prev.min(due),
            None => due,
        });
    }

    pub fn has_pending_refresh(&self) -> bool {
        self.pending_refresh_ms.is_some()
    }

    /// Recomputes every binding's boundaries from current layout and re-evaluates it.
    pub fn refresh(&mut self) {
        let viewport_height = self.viewport.height;
        let ids: Vec<BindingId> = self.bindings.keys().copied().collect();
        for id in &ids {
            let Some(binding) = self.bindings.get(id) else {
                continue;
            };
            let Some(trigger) = self.stage.get(binding.trigger) else {
                continue;
            };
            let (start, mut end) =
                resolve_range(&binding.start, &binding.end, trigger, viewport_height);
            if end < start {
                sc_warn!(
                    binding = id.0,
                    start,
                    end,
                    "refresh: inverted trigger range, collapsing to start"
                );
                end = start;
            }
            if let Some(binding) = self.bindings.get_mut(id) {
                binding.start_px = start;
                binding.end_px = end;
            }
            self.evaluate_binding(*id, false);
        }
        sc_debug!(bindings = ids.len(), "refresh");
        self.emit(RuntimeEvent::Refreshed);
    }

    /// Returns a combined snapshot of viewport and timing state.
    pub fn frame_state(&self) -> FrameState {
        FrameState {
            viewport: self.viewport,
            time_scale: self.time_scale,
            motion: self.motion.mode(),
        }
    }

    /// Restores viewport geometry and scroll offset from a snapshot, then refreshes.
    pub fn restore_viewport_state(&mut self, viewport: ViewportState) {
        self.viewport = viewport;
        self.refresh();
    }

    // Clock ------------------------------------------------------------------------------------

    /// Advances the runtime to `now_ms` (host clock).
    ///
    /// Runs a due refresh, moves smoothed scrubs toward their scroll progress, and renders every
    /// running tween. Returns `true` while anything is still animating.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        let delta_ms = match self.now_ms {
            Some(prev) => now_ms.saturating_sub(prev),
            None => 0,
        };
        self.now_ms = Some(now_ms);
        // Durations are multiplied by the time scale; equivalently the timeline runs faster.
        let dt = delta_ms as f64 / self.time_scale;
        self.timeline_ms += dt;

        if let Some(due) = self.pending_refresh_ms {
            if now_ms >= due {
                self.pending_refresh_ms = None;
                self.refresh();
            }
        }

        self.advance_scrubs(dt);
        self.advance_tweens();
        self.is_animating()
    }

    /// Timeline time in ms: host time divided by the time scale, accumulated.
    pub fn timeline_ms(&self) -> f64 {
        self.timeline_ms
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn limits_callbacks(&self) -> bool {
        self.limit_callbacks
    }

    pub fn is_animating(&self) -> bool {
        self.tweens
            .values()
            .any(|t| t.mode == TweenMode::Timed && !t.completed)
            || self
                .bindings
                .values()
                .any(|b| matches!(b.scrub, Scrub::Smooth(_)) && b.rendered != b.progress)
    }

    fn advance_scrubs(&mut self, dt: f64) {
        let mut updates = Vec::new();
        for binding in self.bindings.values_mut() {
            let Scrub::Smooth(secs) = binding.scrub else {
                continue;
            };
            if binding.rendered == binding.progress {
                continue;
            }
            let k = if secs <= 0.0 {
                1.0
            } else {
                (1.0 - (-dt / (f64::from(secs) * 1000.0)).exp()) as f32
            };
            let next = binding.rendered + (binding.progress - binding.rendered) * k;
            binding.rendered = if (binding.progress - next).abs() < SCRUB_SNAP_EPSILON {
                binding.progress
            } else {
                next
            };
            updates.push((binding.tweens.clone(), binding.rendered));
        }
        for (tweens, progress) in updates {
            self.render_scrubbed(&tweens, progress);
        }
    }

    fn advance_tweens(&mut self) {
        let timeline = self.timeline_ms;
        let record = self.options.record_events;
        let mut finished = Vec::new();
        let mut callbacks = Vec::new();

        for (id, tween) in self.tweens.iter_mut() {
            if tween.mode != TweenMode::Timed || tween.completed {
                continue;
            }
            let Some(progress) = tween.progress_at(timeline) else {
                continue;
            };
            let Some(el) = self.stage.get_mut(tween.target) else {
                continue;
            };
            if !tween.started {
                tween.started = true;
                tween.capture_from(&el.visual);
                if record {
                    self.events.push(RuntimeEvent::TweenStarted {
                        tween: *id,
                        target: tween.target,
                        delay: tween.delay,
                    });
                }
            }
            tween.render(progress, &mut el.visual);
            if progress >= 1.0 {
                tween.completed = true;
                if record {
                    self.events.push(RuntimeEvent::TweenCompleted {
                        tween: *id,
                        target: tween.target,
                    });
                }
                if let Some(cb) = &tween.on_complete {
                    callbacks.push((Arc::clone(cb), *id, tween.target));
                }
                if tween.binding.is_none() {
                    finished.push(*id);
                }
            }
        }

        for id in finished {
            self.kill_tween(id);
        }
        for (cb, id, target) in callbacks {
            cb(id, target);
        }
    }

    // Transitions ------------------------------------------------------------------------------

    /// Registers a clock-driven transition, one tween per resolved element.
    ///
    /// Each element starts `delay + index * stagger` seconds after the next tick. A new tween
    /// takes its properties over from older running tweens on the same element registered by
    /// the same scope.
    pub fn animate(&mut self, transition: Transition) -> Result<AnimationHandle, AnimationError> {
        transition.validate()?;
        let targets = self.stage.resolve(&transition.target);
        if targets.is_empty() {
            sc_debug!(selector = ?transition.target, "animate: target matched no element");
            return Ok(AnimationHandle::default());
        }

        let mut handle = AnimationHandle::default();
        for (index, element) in targets.into_iter().enumerate() {
            self.overwrite(element, &transition.to);
            let id = self.insert_tween(&transition, element, index, TweenMode::Timed, None);
            if let Some(tween) = self.tweens.get_mut(&id) {
                tween.start_at = Some(self.timeline_ms);
            }
            handle.tweens.push(id);
        }
        Ok(handle)
    }

    /// Registers a transition gated or scrubbed by a scroll binding.
    ///
    /// The binding is evaluated immediately, so a trigger that is already in range plays (or
    /// renders its scrub progress) right away.
    pub fn animate_on_scroll(
        &mut self,
        transition: Transition,
        spec: ScrollSpec,
    ) -> Result<AnimationHandle, AnimationError> {
        transition.validate()?;
        let targets = self.stage.resolve(&transition.target);
        if targets.is_empty() {
            sc_debug!(
                selector = ?transition.target,
                "animate_on_scroll: target matched no element"
            );
            return Ok(AnimationHandle::default());
        }

        let trigger = match &spec.trigger {
            Some(trigger) => match self.stage.resolve(trigger).first() {
                Some(id) => *id,
                None => {
                    sc_debug!(
                        selector = ?trigger,
                        "animate_on_scroll: trigger matched no element"
                    );
                    return Ok(AnimationHandle::default());
                }
            },
            None => targets[0],
        };
        let Some(trigger_el) = self.stage.get(trigger) else {
            return Ok(AnimationHandle::default());
        };
        let (start, end) = resolve_range(&spec.start, &spec.end, trigger_el, self.viewport.height);
        if end < start {
            return Err(AnimationError::InvertedTriggerRange { start, end });
        }

        let binding_id = BindingId(self.alloc_id());
        let mode = match spec.scrub {
            Scrub::Off => TweenMode::Dormant,
            Scrub::Direct | Scrub::Smooth(_) => TweenMode::Scrubbed,
        };
        let mut binding = ScrollBinding::new(binding_id, trigger, spec, (start, end));

        let mut handle = AnimationHandle::default();
        for (index, element) in targets.into_iter().enumerate() {
            let id = self.insert_tween(&transition, element, index, mode, Some(binding_id));
            if mode == TweenMode::Scrubbed {
                if let (Some(tween), Some(el)) =
                    (self.tweens.get_mut(&id), self.stage.get(element))
                {
                    tween.capture_from(&el.visual);
                }
            }
            binding.tweens.push(id);
            handle.tweens.push(id);
        }

        sc_trace!(
            binding = binding_id.0,
            trigger = trigger.0,
            start,
            end,
            tweens = binding.tweens.len(),
            "animate_on_scroll"
        );
        self.bindings.insert(binding_id, binding);
        if let Some(ctx) = self.current_context() {
            ctx.bindings.push(binding_id);
        }
        handle.bindings.push(binding_id);

        self.evaluate_binding(binding_id, true);
        Ok(handle)
    }

    fn insert_tween(
        &mut self,
        transition: &Transition,
        element: ElementId,
        index: usize,
        mode: TweenMode,
        binding: Option<BindingId>,
    ) -> TweenId {
        let id = TweenId(self.alloc_id());
        let owner = self.scope_stack.last().copied();

        if let Some(el) = self.stage.get(element) {
            let visual = el.visual;
            if let Some(ctx) = owner.and_then(|s| self.scopes.get_mut(&s)) {
                for prop in transition.to.props() {
                    ctx.snapshot(element, prop, visual.get(prop));
                }
                ctx.tweens.push(id);
            }
        }

        // From-to transitions render their start state as soon as they exist.
        if let (Some(from), Some(el)) = (&transition.from, self.stage.get_mut(element)) {
            for (prop, value) in from.iter() {
                el.visual.set(prop, value);
            }
        }

        self.tweens.insert(
            id,
            Tween {
                id,
                target: element,
                explicit_from: transition.from.clone(),
                from: None,
                to: transition.to.clone(),
                delay: transition.delay_for(index),
                duration: transition.duration,
                ease: transition.ease,
                mode,
                binding,
                owner,
                start_at: None,
                started: false,
                completed: false,
                on_complete: transition.on_complete.clone(),
            },
        );
        id
    }

    /// Drops `props` from older running clock tweens on `element` owned by the current scope.
    ///
    /// Tweens registered by another scope are left alone; only their own teardown removes them.
    fn overwrite(&mut self, element: ElementId, props: &Props) {
        let owner = self.scope_stack.last().copied();
        let mut emptied = Vec::new();
        for tween in self.tweens.values_mut() {
            if tween.target != element
                || tween.owner != owner
                || tween.binding.is_some()
                || tween.mode != TweenMode::Timed
                || tween.completed
            {
                continue;
            }
            for prop in props.props() {
                tween.to.remove(prop);
                if let Some(from) = tween.from.as_mut() {
                    from.remove(prop);
                }
                if let Some(from) = tween.explicit_from.as_mut() {
                    from.remove(prop);
                }
            }
            if tween.to.is_empty() {
                emptied.push(tween.id);
            }
        }
        for id in emptied {
            sc_trace!(tween = id.0, element = element.0, "overwrite: tween fully replaced");
            self.kill_tween(id);
        }
    }

    /// Cancels a tween without reverting what it already rendered.
    pub fn kill_tween(&mut self, id: TweenId) -> bool {
        let Some(tween) = self.tweens.remove(&id) else {
            return false;
        };
        if let Some(binding) = tween.binding.and_then(|b| self.bindings.get_mut(&b)) {
            binding.tweens.retain(|t| *t != id);
        }
        if let Some(ctx) = tween.owner.and_then(|s| self.scopes.get_mut(&s)) {
            ctx.tweens.retain(|t| *t != id);
        }
        true
    }

    /// Cancels everything a handle registered.
    pub fn kill(&mut self, handle: &AnimationHandle) {
        for id in &handle.bindings {
            self.release_binding(*id);
        }
        for id in &handle.tweens {
            self.kill_tween(*id);
        }
    }

    pub fn tween(&self, id: TweenId) -> Option<TweenInfo> {
        self.tweens.get(&id).map(Tween::info)
    }

    pub fn tween_count(&self) -> usize {
        self.tweens.len()
    }

    // Scroll bindings --------------------------------------------------------------------------

    pub fn binding(&self, id: BindingId) -> Option<BindingInfo> {
        self.bindings.get(&id).map(ScrollBinding::info)
    }

    /// Number of registered scroll bindings.
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// `true` while a pinning binding triggered by `element` is active.
    pub fn is_pinned(&self, element: ElementId) -> bool {
        self.bindings
            .values()
            .any(|b| b.pin && b.trigger == element && b.active)
    }

    fn release_binding(&mut self, id: BindingId) -> bool {
        let Some(binding) = self.bindings.remove(&id) else {
            return false;
        };
        for tween in binding.tweens {
            self.kill_tween(tween);
        }
        true
    }

    fn evaluate_binding(&mut self, id: BindingId, initial: bool) {
        let scroll_y = self.viewport.scroll_y;
        let limit_callbacks = self.limit_callbacks;
        let Some(binding) = self.bindings.get_mut(&id) else {
            return;
        };

        let progress = binding.progress_at(scroll_y);
        let reached = scroll_y >= binding.start_px;
        let active = reached && scroll_y <= binding.end_px;

        let entered = reached && !binding.reached;
        binding.reached = reached;
        let toggled = active != binding.active;
        binding.active = active;
        let progress_changed = progress != binding.progress;
        binding.progress = progress;

        let scrubbed = binding.scrub != Scrub::Off;
        let render_now = scrubbed && (initial || binding.scrub == Scrub::Direct);
        if render_now {
            binding.rendered = progress;
        }

        let play = !scrubbed && entered && (!binding.played || binding.replay_on_reenter);
        if play {
            binding.played = true;
        }

        let tweens = if play || render_now {
            binding.tweens.clone()
        } else {
            Vec::new()
        };
        let on_toggle = if toggled { binding.on_toggle.clone() } else { None };
        let on_update = if progress_changed && (!limit_callbacks || toggled) {
            binding.on_update.clone()
        } else {
            None
        };

        if toggled {
            sc_trace!(binding = id.0, active, scroll_y, "trigger toggled");
            self.emit(if active {
                RuntimeEvent::TriggerEntered { binding: id }
            } else {
                RuntimeEvent::TriggerLeft { binding: id }
            });
        }
        if let Some(cb) = on_toggle {
            cb(id, active);
        }
        if let Some(cb) = on_update {
            cb(id, progress);
        }

        if play {
            sc_debug!(binding = id.0, tweens = tweens.len(), "trigger played");
            let timeline = self.timeline_ms;
            for tween_id in &tweens {
                let Some(tween) = self.tweens.get_mut(tween_id) else {
                    continue;
                };
                tween.restart(timeline);
                if let (Some(from), Some(el)) =
                    (&tween.explicit_from, self.stage.get_mut(tween.target))
                {
                    for (prop, value) in from.iter() {
                        el.visual.set(prop, value);
                    }
                }
            }
        }
        if render_now {
            self.render_scrubbed(&tweens, progress);
        }
    }

    fn render_scrubbed(&mut self, tweens: &[TweenId], progress: f32) {
        for id in tweens {
            let Some(tween) = self.tweens.get(id) else {
                continue;
            };
            if let Some(el) = self.stage.get_mut(tween.target) {
                tween.render(progress, &mut el.visual);
            }
        }
    }

    // Pointer listeners ------------------------------------------------------------------------

    /// Attaches a pointer listener. Returns `None` when the element is not mounted.
    pub fn add_listener(
        &mut self,
        element: ElementId,
        event: PointerEvent,
        handler: impl Fn(&mut AnimationRuntime, ElementId) + Send + Sync + 'static,
    ) -> Option<ListenerId> {
        self.add_listener_arc(element, event, Arc::new(handler))
    }

    pub fn add_listener_arc(
        &mut self,
        element: ElementId,
        event: PointerEvent,
        handler: PointerHandler,
    ) -> Option<ListenerId> {
        self.stage.get(element)?;
        let id = ListenerId(self.alloc_id());
        let scope = self.scope_stack.last().copied();
        self.listeners.insert(
            id,
            Listener {
                element,
                event,
                handler,
                scope,
            },
        );
        if let Some(ctx) = self.current_context() {
            ctx.listeners.push(id);
        }
        Some(id)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let Some(listener) = self.listeners.remove(&id) else {
            return false;
        };
        if let Some(ctx) = listener.scope.and_then(|s| self.scopes.get_mut(&s)) {
            ctx.listeners.retain(|l| *l != id);
        }
        true
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Delivers a pointer event to the listeners attached to `element`.
    ///
    /// Handlers run inside the scope they were attached from, so transitions they start are
    /// torn down with it. Returns the number of handlers invoked.
    pub fn dispatch_pointer(&mut self, element: ElementId, event: PointerEvent) -> usize {
        let handlers: Vec<(PointerHandler, Option<ScopeId>)> = self
            .listeners
            .values()
            .filter(|l| l.element == element && l.event == event)
            .map(|l| (Arc::clone(&l.handler), l.scope))
            .collect();
        for (handler, scope) in &handlers {
            match scope {
                Some(scope) => self.run_in_scope(*scope, |rt| handler(rt, element)),
                None => handler(self, element),
            }
        }
        handlers.len()
    }

    // Reduced motion ---------------------------------------------------------------------------

    /// Subscribes to the host's reduced-motion preference and applies its current value.
    ///
    /// Idempotent across subscribers: the same preference always yields the same time scale.
    /// Subscriptions taken inside a scope are released when it closes.
    pub fn subscribe_reduced_motion(&mut self, query: &dyn MotionQuery) -> SubscriptionId {
        let id = SubscriptionId(self.alloc_id());
        let mode = self.motion.subscribe(id, query.prefers_reduced_motion());
        if let Some(ctx) = self.current_context() {
            ctx.subscriptions.push(id);
        }
        self.apply_motion_mode(mode);
        id
    }

    pub fn unsubscribe_reduced_motion(&mut self, id: SubscriptionId) -> bool {
        self.motion.unsubscribe(id)
    }

    /// Platform change event for the reduced-motion preference. Ignored when nobody
    /// subscribed.
    pub fn motion_preference_changed(&mut self, reduced: Option<bool>) {
        if let Some(mode) = self.motion.preference_changed(reduced) {
            self.apply_motion_mode(mode);
        }
    }

    pub fn motion_mode(&self) -> MotionMode {
        self.motion.mode()
    }

    pub fn motion_gate(&self) -> &MotionGate {
        &self.motion
    }

    fn apply_motion_mode(&mut self, mode: MotionMode) {
        let (time_scale, limit) = match mode {
            MotionMode::Normal => (1.0, self.options.limit_callbacks),
            MotionMode::Reduced => (self.options.effective_reduced_time_scale(), true),
        };
        if self.time_scale != time_scale || self.limit_callbacks != limit {
            sc_debug!(?mode, time_scale, limit_callbacks = limit, "motion mode applied");
        }
        self.time_scale = time_scale;
        self.limit_callbacks = limit;
    }

    // Scopes -----------------------------------------------------------------------------------

    /// Opens an empty scope. Registrations made inside [`Self::run_in_scope`] belong to it.
    pub fn open_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.alloc_id());
        self.scopes.insert(id, AnimationContext::default());
        sc_trace!(scope = id.0, "open_scope");
        id
    }

    /// Runs `f` with `scope` as the innermost scope. A closed or unknown scope runs `f`
    /// unattributed.
    pub fn run_in_scope<R>(&mut self, scope: ScopeId, f: impl FnOnce(&mut Self) -> R) -> R {
        let open = self.scopes.contains_key(&scope);
        if open {
            self.scope_stack.push(scope);
        }
        let out = f(self);
        if open {
            if let Some(pos) = self.scope_stack.iter().rposition(|s| *s == scope) {
                self.scope_stack.remove(pos);
            }
        }
        out
    }

    /// Tears a scope down: cancels its tweens, releases its bindings, detaches its listeners,
    /// drops its motion subscriptions and restores the properties it animated.
    ///
    /// Returns `false` if the scope was not open.
    pub fn close_scope(&mut self, scope: ScopeId) -> bool {
        let Some(ctx) = self.scopes.remove(&scope) else {
            return false;
        };
        self.scope_stack.retain(|s| *s != scope);

        for id in &ctx.bindings {
            self.release_binding(*id);
        }
        for id in &ctx.tweens {
            self.kill_tween(*id);
        }
        for id in &ctx.listeners {
            self.listeners.remove(id);
        }
        for id in &ctx.subscriptions {
            self.motion.unsubscribe(*id);
        }
        for (element, prop, value) in &ctx.snapshots {
            if let Some(el) = self.stage.get_mut(*element) {
                el.visual.set(*prop, *value);
            }
        }

        sc_debug!(
            scope = scope.0,
            tweens = ctx.tweens.len(),
            bindings = ctx.bindings.len(),
            listeners = ctx.listeners.len(),
            subscriptions = ctx.subscriptions.len(),
            "close_scope"
        );
        true
    }

    pub fn scope(&self, scope: ScopeId) -> Option<&AnimationContext> {
        self.scopes.get(&scope)
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn current_scope(&self) -> Option<ScopeId> {
        self.scope_stack.last().copied()
    }

    fn current_context(&mut self) -> Option<&mut AnimationContext> {
        let scope = self.scope_stack.last().copied()?;
        self.scopes.get_mut(&scope)
    }
}

impl core::fmt::Debug for AnimationRuntime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AnimationRuntime")
            .field("options", &self.options)
            .field("viewport", &self.viewport)
            .field("timeline_ms", &self.timeline_ms)
            .field("time_scale", &self.time_scale)
            .field("motion", &self.motion.mode())
            .field("elements", &self.stage.len())
            .field("tweens", &self.tweens.len())
            .field("bindings", &self.bindings.len())
            .field("listeners", &self.listeners.len())
            .field("scopes", &self.scopes.len())
            .finish_non_exhaustive()
    }
}

fn resolve_range(
    start: &ScrollPosition,
    end: &ScrollPosition,
    trigger: &Element,
    viewport_height: f32,
) -> (f32, f32) {
    let start_px = start.resolve(trigger.top, trigger.height, viewport_height, 0.0);
    let end_px = end.resolve(trigger.top, trigger.height, viewport_height, start_px);
    (start_px, end_px)
}
