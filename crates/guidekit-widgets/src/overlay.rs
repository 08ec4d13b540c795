#![forbid(unsafe_code)]

//! Full-viewport dim overlay with a rounded highlight hole.
//!
//! [`MaskOverlay`] reads the active step's descriptor on every render. With no
//! descriptor, or one whose rectangle has not been measured yet, it paints
//! nothing and ignores touches. Otherwise it dims the viewport except for the
//! highlight, draws the step's tooltip, and routes touch-end events:
//!
//! | Where | Effect |
//! |-------|--------|
//! | strictly inside the highlight | step `on_press`, then advance |
//! | anywhere else | run-level `on_close` if set, else close the run |
//!
//! The tooltip's button is routed separately through
//! [`MaskOverlay::press_tooltip_button`]; hosts hit-test it against
//! [`OverlayFrame::button`].

use std::fmt;

use guidekit_core::event::TouchEvent;
use guidekit_core::geometry::{Point, Rect, Size};
use guidekit_render::{Fill, FillRule, Surface, mask_path};
use guidekit_runtime::{Advance, GuideContext, GuideHandle, StepKey};

use crate::tooltip::{Tooltip, tooltip_offset};

/// What one overlay render produced, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayFrame {
    /// The highlight hole.
    pub hole: Rect,
    /// The tooltip bubble, when the step has one.
    pub tooltip: Option<Rect>,
    /// The tooltip's button.
    pub button: Option<Rect>,
}

impl OverlayFrame {
    /// Whether `point` lands on the tooltip button.
    pub fn hits_button(&self, point: Point) -> bool {
        self.button.is_some_and(|b| b.contains(point))
    }
}

/// Result of [`MaskOverlay::handle_touch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TouchOutcome {
    /// Not a touch end, or nothing is showing.
    Ignored,
    /// Touched inside the highlight.
    Advanced(Advance),
    /// Touched outside; the host's `on_close` handled it.
    CloseRequested,
    /// Touched outside with no `on_close`; the run was closed.
    Closed,
}

struct ProbedTooltip {
    key: StepKey,
    size: Size,
}

/// The dim layer for one provider.
pub struct MaskOverlay {
    handle: GuideHandle,
    probe: Option<ProbedTooltip>,
}

impl MaskOverlay {
    pub fn new(handle: GuideHandle) -> Self {
        Self {
            handle,
            probe: None,
        }
    }

    /// Paint the overlay for the active step over a `viewport`-sized canvas.
    ///
    /// Returns `None` when nothing was painted.
    ///
    /// # Panics
    ///
    /// If the provider has been dropped.
    #[track_caller]
    pub fn render(&mut self, viewport: Size, surface: &mut dyn Surface) -> Option<OverlayFrame> {
        let ctx = self.handle.use_guide_context();
        let _span = guidekit_core::debug_span!("mask_overlay_render").entered();

        let (key, descriptor) = match (ctx.current_key(), ctx.current_descriptor()) {
            (Some(key), Some(descriptor)) => (key, descriptor),
            _ => {
                self.probe = None;
                return None;
            }
        };
        let (Some(mask), Some(hole)) = (descriptor.as_mask(), descriptor.rect()) else {
            return None;
        };
        let config = ctx.config();

        surface.fill_path(
            &mask_path(hole, viewport, config.corner_radius),
            Fill::solid(config.mask_color)
                .with_opacity(config.mask_opacity)
                .with_rule(FillRule::EvenOdd),
        );

        let mut frame = OverlayFrame {
            hole,
            tooltip: None,
            button: None,
        };
        if let Some(spec) = &mask.tooltip {
            let tooltip = Tooltip::new(spec, &config.tooltip);
            let size = self.probed_size(&key, || tooltip.measure(&*surface));
            let offset = tooltip_offset(spec.placement, hole.size(), size, &config.tooltip);
            let layout = tooltip.render(hole.origin().offset(offset.x, offset.y), surface);
            frame.tooltip = Some(layout.bubble);
            frame.button = Some(layout.button);
        }
        Some(frame)
    }

    /// Measure the tooltip for `key` on this render's surface.
    ///
    /// Runs every render: the surface's text metrics may differ from the last
    /// one. The previous result is kept only to log changes.
    fn probed_size(&mut self, key: &StepKey, probe: impl FnOnce() -> Size) -> Size {
        let size = probe();
        let changed = self
            .probe
            .as_ref()
            .is_none_or(|last| last.key != *key || last.size != size);
        if changed {
            guidekit_core::trace!(%key, width = size.width, height = size.height, "tooltip probed");
            self.probe = Some(ProbedTooltip {
                key: key.clone(),
                size,
            });
        }
        size
    }

    /// Route a touch over the overlay.
    ///
    /// # Panics
    ///
    /// If the provider has been dropped.
    #[track_caller]
    pub fn handle_touch(&self, event: TouchEvent) -> TouchOutcome {
        if !event.is_end() {
            return TouchOutcome::Ignored;
        }
        let ctx = self.handle.use_guide_context();
        let Some(descriptor) = ctx.current_descriptor() else {
            return TouchOutcome::Ignored;
        };
        let Some(hole) = descriptor.rect() else {
            return TouchOutcome::Ignored;
        };

        if hole.contains_strict(event.point()) {
            if let Some(on_press) = descriptor.as_mask().and_then(|m| m.on_press.clone()) {
                on_press();
            }
            return TouchOutcome::Advanced(ctx.go_next_step());
        }

        close_or_delegate(&ctx)
    }

    /// Press the active tooltip's button: its callback, then advance.
    ///
    /// # Panics
    ///
    /// If the provider has been dropped.
    #[track_caller]
    pub fn press_tooltip_button(&self) -> Advance {
        let ctx = self.handle.use_guide_context();
        let on_press_button = ctx
            .current_descriptor()
            .and_then(|d| d.as_mask().and_then(|m| m.tooltip.as_ref()?.on_press_button.clone()));
        if let Some(f) = on_press_button {
            f();
        }
        ctx.go_next_step()
    }
}

fn close_or_delegate(ctx: &GuideContext) -> TouchOutcome {
    match ctx.on_close() {
        Some(on_close) => {
            on_close();
            TouchOutcome::CloseRequested
        }
        None => {
            ctx.close_guide();
            TouchOutcome::Closed
        }
    }
}

impl fmt::Debug for MaskOverlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskOverlay")
            .field("handle", &self.handle)
            .field("probed", &self.probe.as_ref().map(|p| (&p.key, p.size)))
            .finish()
    }
}
