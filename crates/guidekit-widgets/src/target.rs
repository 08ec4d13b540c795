#![forbid(unsafe_code)]

//! Measurement wrapper for highlighted elements.
//!
//! A [`GuideTarget`] ties a host element to one step key. While that key is
//! active it measures the element once per display refresh and publishes the
//! padded rectangle as the step's mask descriptor. The store skips writes
//! whose rectangle did not change, so a settled layout costs one measurement
//! per frame and no state changes.
//!
//! # Lifecycle
//!
//! - The host calls [`GuideTarget::sync`] whenever it renders or the tour
//!   state may have changed. The rising edge of "my key is active" starts the
//!   loop; the falling edge cancels it.
//! - A cycle that finds its key no longer active stops on its own, so a
//!   missed `sync` never writes into a closed run.
//! - Dropping the target cancels any pending frame.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use guidekit_core::geometry::{PartialRect, Rect};
use guidekit_runtime::{
    Callback, FrameRequestId, FrameScheduler, GuideContext, GuideHandle, MaskStep, StepKey,
    TooltipSpec,
};

/// An element that can report its absolute on-screen rectangle.
pub trait Measurable {
    /// Current rectangle in window coordinates. Any missing field means the
    /// element is not laid out yet.
    fn measure_in_window(&self) -> PartialRect;
}

impl<F> Measurable for F
where
    F: Fn() -> PartialRect,
{
    fn measure_in_window(&self) -> PartialRect {
        self()
    }
}

/// Configuration for a [`GuideTarget`] before it is mounted.
#[must_use]
pub struct GuideTargetBuilder {
    key: StepKey,
    padding: Option<f64>,
    tooltip: Option<TooltipSpec>,
    on_press: Option<Callback>,
}

impl GuideTargetBuilder {
    /// Padding added on every side of the measured rectangle. Defaults to the
    /// provider's `highlight_padding`.
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn tooltip(mut self, tooltip: TooltipSpec) -> Self {
        self.tooltip = Some(tooltip);
        self
    }

    /// Runs when the highlighted region is touched, before the tour advances.
    pub fn on_press(mut self, f: impl Fn() + 'static) -> Self {
        self.on_press = Some(Rc::new(f));
        self
    }

    /// Attach to `element` and perform the initial [`sync`](GuideTarget::sync).
    ///
    /// # Panics
    ///
    /// If `handle` is not bound to a live provider.
    #[track_caller]
    pub fn mount<S, M>(self, handle: GuideHandle, scheduler: S, element: M) -> GuideTarget
    where
        S: FrameScheduler + 'static,
        M: Measurable + 'static,
    {
        let target = GuideTarget {
            inner: Rc::new(MeasureLoop {
                key: self.key,
                padding: self.padding,
                tooltip: self.tooltip,
                on_press: self.on_press,
                element: Box::new(element),
                scheduler: Box::new(scheduler),
                handle,
                state: RefCell::new(LoopState::default()),
            }),
        };
        target.sync();
        target
    }
}

/// A mounted measurement wrapper.
pub struct GuideTarget {
    inner: Rc<MeasureLoop>,
}

impl GuideTarget {
    pub fn builder(key: impl Into<StepKey>) -> GuideTargetBuilder {
        GuideTargetBuilder {
            key: key.into(),
            padding: None,
            tooltip: None,
            on_press: None,
        }
    }

    /// Reconcile with the store's active key.
    ///
    /// # Panics
    ///
    /// If the provider has been dropped.
    #[track_caller]
    pub fn sync(&self) {
        let ctx = self.inner.handle.use_guide_context();
        let now_active = ctx.is_current(&self.inner.key);
        let was_active = self.inner.state.borrow().active;

        match (was_active, now_active) {
            (false, true) => {
                guidekit_core::debug!(key = %self.inner.key, "target activated");
                {
                    let mut state = self.inner.state.borrow_mut();
                    state.active = true;
                    state.unmeasured = 0;
                }
                self.inner.cycle(&ctx);
            }
            (true, false) => {
                guidekit_core::debug!(key = %self.inner.key, "target deactivated");
                self.inner.stop();
            }
            _ => {}
        }
    }

    pub fn key(&self) -> &StepKey {
        &self.inner.key
    }

    /// Whether the loop is running (a frame is pending).
    pub fn is_measuring(&self) -> bool {
        self.inner.state.borrow().pending.is_some()
    }

    /// Consecutive cycles that found the element unmeasured.
    pub fn unmeasured_frames(&self) -> u32 {
        self.inner.state.borrow().unmeasured
    }
}

impl Drop for GuideTarget {
    fn drop(&mut self) {
        self.inner.stop();
    }
}

impl fmt::Debug for GuideTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("GuideTarget")
            .field("key", &self.inner.key)
            .field("padding", &self.inner.padding)
            .field("active", &state.active)
            .field("pending", &state.pending)
            .field("unmeasured", &state.unmeasured)
            .finish()
    }
}

#[derive(Debug, Default)]
struct LoopState {
    /// Last activation state seen by `sync` or a cycle.
    active: bool,
    pending: Option<FrameRequestId>,
    unmeasured: u32,
}

struct MeasureLoop {
    key: StepKey,
    padding: Option<f64>,
    tooltip: Option<TooltipSpec>,
    on_press: Option<Callback>,
    element: Box<dyn Measurable>,
    scheduler: Box<dyn FrameScheduler>,
    handle: GuideHandle,
    state: RefCell<LoopState>,
}

impl MeasureLoop {
    /// One measurement, then reschedule.
    fn cycle(self: &Rc<Self>, ctx: &GuideContext) {
        match self.element.measure_in_window().complete() {
            None => {
                self.cancel_pending();
                let unmeasured = {
                    let mut state = self.state.borrow_mut();
                    state.unmeasured = state.unmeasured.saturating_add(1);
                    state.unmeasured
                };
                if let Some(cap) = ctx.config().max_unmeasured_frames
                    && unmeasured >= cap
                {
                    guidekit_core::warn!(
                        key = %self.key,
                        frames = unmeasured,
                        "target never became measurable; giving up"
                    );
                    return;
                }
                guidekit_core::trace!(key = %self.key, frames = unmeasured, "target unmeasured");
            }
            Some(measured) => {
                self.state.borrow_mut().unmeasured = 0;
                let padding = self.padding.unwrap_or(ctx.config().highlight_padding);
                ctx.set_descriptor(self.key.clone(), self.descriptor(measured.expand(padding)).into());
            }
        }
        self.schedule();
    }

    fn descriptor(&self, rect: Rect) -> MaskStep {
        MaskStep {
            rect: Some(rect),
            on_press: self.on_press.clone(),
            tooltip: self.tooltip.clone(),
        }
    }

    fn schedule(self: &Rc<Self>) {
        self.cancel_pending();
        let weak: Weak<Self> = Rc::downgrade(self);
        let id = self.scheduler.request_frame(Box::new(move || {
            if let Some(this) = weak.upgrade() {
                this.state.borrow_mut().pending = None;
                this.on_frame();
            }
        }));
        self.state.borrow_mut().pending = Some(id);
    }

    fn on_frame(self: &Rc<Self>) {
        let Ok(ctx) = self.handle.try_context() else {
            self.state.borrow_mut().active = false;
            return;
        };
        if !ctx.is_current(&self.key) {
            self.state.borrow_mut().active = false;
            return;
        }
        self.cycle(&ctx);
    }

    fn cancel_pending(&self) {
        let pending = self.state.borrow_mut().pending.take();
        if let Some(id) = pending {
            self.scheduler.cancel_frame(id);
        }
    }

    fn stop(&self) {
        self.state.borrow_mut().active = false;
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use guidekit_runtime::{GuideConfig, GuideProvider, ManualFrameClock, StartOptions};

    use super::*;

    fn element(cell: &Rc<Cell<PartialRect>>) -> impl Fn() -> PartialRect + 'static {
        let cell = cell.clone();
        move || cell.get()
    }

    fn measured(x: f64, y: f64, w: f64, h: f64) -> PartialRect {
        Rect::new(x, y, w, h).into()
    }

    #[test]
    fn inactive_target_does_not_measure() {
        let provider = GuideProvider::new();
        let clock = ManualFrameClock::new();
        let cell = Rc::new(Cell::new(measured(0.0, 0.0, 10.0, 10.0)));
        let target = GuideTarget::builder("a").mount(provider.handle(), clock.clone(), element(&cell));
        assert!(!target.is_measuring());
        assert_eq!(clock.pending(), 0);
        assert_eq!(provider.context().store().descriptor_count(), 0);
    }

    #[test]
    fn activation_publishes_padded_rect() {
        let provider = GuideProvider::new();
        let ctx = provider.context();
        let clock = ManualFrameClock::new();
        let cell = Rc::new(Cell::new(measured(10.0, 10.0, 20.0, 20.0)));
        ctx.start(StartOptions::new(["a"]));

        let target = GuideTarget::builder("a").mount(provider.handle(), clock.clone(), element(&cell));
        assert!(target.is_measuring());
        assert_eq!(
            ctx.current_descriptor().and_then(|d| d.rect()),
            Some(Rect::new(2.0, 2.0, 36.0, 36.0))
        );
    }

    #[test]
    fn explicit_padding_overrides_config() {
        let provider = GuideProvider::with_config(GuideConfig::default().with_highlight_padding(1.0));
        let ctx = provider.context();
        let clock = ManualFrameClock::new();
        let cell = Rc::new(Cell::new(measured(10.0, 10.0, 20.0, 20.0)));
        ctx.start(StartOptions::new(["a"]));

        let _default = GuideTarget::builder("a").mount(provider.handle(), clock.clone(), element(&cell));
        assert_eq!(ctx.current_descriptor().and_then(|d| d.rect()), Some(Rect::new(9.0, 9.0, 22.0, 22.0)));

        ctx.start(StartOptions::new(["b"]));
        let _explicit = GuideTarget::builder("b")
            .padding(0.0)
            .mount(provider.handle(), clock.clone(), element(&cell));
        assert_eq!(ctx.current_descriptor().and_then(|d| d.rect()), Some(Rect::new(10.0, 10.0, 20.0, 20.0)));
    }

    #[test]
    fn stable_rect_causes_no_state_changes() {
        let provider = GuideProvider::new();
        let ctx = provider.context();
        let clock = ManualFrameClock::new();
        let cell = Rc::new(Cell::new(measured(0.0, 0.0, 10.0, 10.0)));
        ctx.start(StartOptions::new(["a"]));
        let _target = GuideTarget::builder("a").mount(provider.handle(), clock.clone(), element(&cell));

        let revision = ctx.revision();
        let first = ctx.current_descriptor().unwrap();
        clock.run_frames(10);
        assert_eq!(ctx.revision(), revision);
        assert!(Rc::ptr_eq(&first, &ctx.current_descriptor().unwrap()));
    }

    #[test]
    fn moved_element_updates_rect_only() {
        let provider = GuideProvider::new();
        let ctx = provider.context();
        let clock = ManualFrameClock::new();
        let cell = Rc::new(Cell::new(measured(0.0, 0.0, 10.0, 10.0)));
        let pressed = Rc::new(Cell::new(0));
        let counter = pressed.clone();
        ctx.start(StartOptions::new(["a"]));
        let _target = GuideTarget::builder("a")
            .padding(0.0)
            .on_press(move || counter.set(counter.get() + 1))
            .mount(provider.handle(), clock.clone(), element(&cell));

        cell.set(measured(5.0, 5.0, 10.0, 10.0));
        clock.advance_frame();
        let desc = ctx.current_descriptor().unwrap();
        assert_eq!(desc.rect(), Some(Rect::new(5.0, 5.0, 10.0, 10.0)));
        (desc.as_mask().unwrap().on_press.as_ref().unwrap())();
        assert_eq!(pressed.get(), 1);
    }

    #[test]
    fn unavailable_measurement_retries_every_frame() {
        let provider = GuideProvider::new();
        let ctx = provider.context();
        let clock = ManualFrameClock::new();
        let cell = Rc::new(Cell::new(PartialRect::UNAVAILABLE));
        ctx.start(StartOptions::new(["a"]));
        let target = GuideTarget::builder("a").mount(provider.handle(), clock.clone(), element(&cell));

        clock.run_frames(5);
        assert_eq!(target.unmeasured_frames(), 6);
        assert_eq!(clock.pending(), 1);
        assert!(ctx.current_descriptor().is_none());

        cell.set(measured(0.0, 0.0, 4.0, 4.0));
        clock.advance_frame();
        assert_eq!(target.unmeasured_frames(), 0);
        assert!(ctx.current_descriptor().is_some());
    }

    #[test]
    fn retry_cap_stops_the_loop_without_skipping() {
        let provider = GuideProvider::with_config(GuideConfig::default().with_max_unmeasured_frames(Some(3)));
        let ctx = provider.context();
        let clock = ManualFrameClock::new();
        let cell = Rc::new(Cell::new(PartialRect::UNAVAILABLE));
        ctx.start(StartOptions::new(["a", "b"]));
        let target = GuideTarget::builder("a").mount(provider.handle(), clock.clone(), element(&cell));

        clock.run_frames(10);
        assert_eq!(target.unmeasured_frames(), 3);
        assert!(!target.is_measuring());
        assert_eq!(ctx.current_key().as_deref(), Some("a"));
    }

    #[test]
    fn deactivation_cancels_and_reactivation_restarts() {
        let provider = GuideProvider::new();
        let ctx = provider.context();
        let clock = ManualFrameClock::new();
        let cell = Rc::new(Cell::new(measured(0.0, 0.0, 10.0, 10.0)));
        ctx.start(StartOptions::new(["a", "b"]));
        let target = GuideTarget::builder("a").mount(provider.handle(), clock.clone(), element(&cell));

        ctx.go_next_step();
        target.sync();
        assert!(!target.is_measuring());
        assert_eq!(clock.pending(), 0);

        ctx.start(StartOptions::new(["a"]));
        target.sync();
        assert!(target.is_measuring());
    }

    #[test]
    fn loop_stops_itself_after_close() {
        let provider = GuideProvider::new();
        let ctx = provider.context();
        let clock = ManualFrameClock::new();
        let cell = Rc::new(Cell::new(measured(0.0, 0.0, 10.0, 10.0)));
        ctx.start(StartOptions::new(["a"]));
        let target = GuideTarget::builder("a").mount(provider.handle(), clock.clone(), element(&cell));

        ctx.close_guide();
        clock.run_frames(3);
        assert!(!target.is_measuring());
        assert_eq!(ctx.store().descriptor_count(), 0);
    }

    #[test]
    fn drop_cancels_pending_frame() {
        let provider = GuideProvider::new();
        let ctx = provider.context();
        let clock = ManualFrameClock::new();
        let cell = Rc::new(Cell::new(PartialRect::UNAVAILABLE));
        ctx.start(StartOptions::new(["a"]));
        let target = GuideTarget::builder("a").mount(provider.handle(), clock.clone(), element(&cell));
        assert_eq!(clock.pending(), 1);
        drop(target);
        assert_eq!(clock.pending(), 0);
        assert_eq!(clock.advance_frame(), 0);
    }

    #[test]
    fn frame_after_provider_drop_is_harmless() {
        let provider = GuideProvider::new();
        let clock = ManualFrameClock::new();
        let cell = Rc::new(Cell::new(PartialRect::UNAVAILABLE));
        provider.context().start(StartOptions::new(["a"]));
        let target = GuideTarget::builder("a").mount(provider.handle(), clock.clone(), element(&cell));
        drop(provider);
        assert_eq!(clock.advance_frame(), 1);
        assert!(!target.is_measuring());
    }
}
