#![forbid(unsafe_code)]

//! End-to-end tour flows: measurement wrappers, overlay, and store together
//! on a manual frame clock.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use guidekit_core::event::TouchEvent;
use guidekit_core::geometry::{PartialRect, Rect, Size};
use guidekit_render::DisplayList;
use guidekit_runtime::{
    Advance, GuideProvider, ManualFrameClock, Placement, StartOptions, StepKey, TooltipSpec,
};
use guidekit_widgets::{GuideTarget, MaskOverlay, TouchOutcome};

const VIEWPORT: Size = Size::new(400.0, 800.0);

struct Screen {
    provider: GuideProvider,
    clock: ManualFrameClock,
    overlay: MaskOverlay,
    targets: Vec<GuideTarget>,
    layout: Vec<Rc<Cell<PartialRect>>>,
}

impl Screen {
    /// Three targets `a`, `b`, `c` stacked vertically, 100x40 each.
    fn new() -> Self {
        let provider = GuideProvider::new();
        let clock = ManualFrameClock::new();
        let overlay = MaskOverlay::new(provider.handle());
        let mut targets = Vec::new();
        let mut layout = Vec::new();
        for (i, key) in ["a", "b", "c"].into_iter().enumerate() {
            let cell = Rc::new(Cell::new(PartialRect::from(Rect::new(
                20.0,
                100.0 + 100.0 * i as f64,
                100.0,
                40.0,
            ))));
            let element = {
                let cell = cell.clone();
                move || cell.get()
            };
            let target = GuideTarget::builder(key)
                .tooltip(TooltipSpec::new(Placement::BottomLeft).title(key.to_uppercase()))
                .mount(provider.handle(), clock.clone(), element);
            targets.push(target);
            layout.push(cell);
        }
        Self {
            provider,
            clock,
            overlay,
            targets,
            layout,
        }
    }

    fn sync(&self) {
        for target in &self.targets {
            target.sync();
        }
    }

    fn render(&mut self) -> (Option<guidekit_widgets::OverlayFrame>, DisplayList) {
        let mut list = DisplayList::new();
        let frame = self.overlay.render(VIEWPORT, &mut list);
        (frame, list)
    }

    fn active(&self) -> Option<StepKey> {
        self.provider.context().current_key()
    }
}

#[test]
fn touch_inside_moves_to_next_step_which_shows_after_measuring() {
    let mut screen = Screen::new();
    let completed = Rc::new(Cell::new(0));
    let counter = completed.clone();
    screen
        .provider
        .context()
        .start(StartOptions::new(["a", "b", "c"]).on_complete(move || counter.set(counter.get() + 1)));
    screen.sync();

    let (frame, list) = screen.render();
    let frame = frame.expect("step a is measured on activation");
    assert_eq!(frame.hole, Rect::new(12.0, 92.0, 116.0, 56.0));
    assert!(list.texts().any(|t| t == "A"));

    let outcome = screen.overlay.handle_touch(TouchEvent::end(50.0, 120.0));
    assert_eq!(
        outcome,
        TouchOutcome::Advanced(Advance::Moved {
            from: "a".into(),
            to: "b".into()
        })
    );
    assert_eq!(screen.active().as_deref(), Some("b"));

    // "b" has not measured yet: the overlay hides.
    let (frame, list) = screen.render();
    assert!(frame.is_none());
    assert!(list.is_empty());

    screen.sync();
    let (frame, _) = screen.render();
    assert_eq!(frame.map(|f| f.hole), Some(Rect::new(12.0, 192.0, 116.0, 56.0)));

    screen.overlay.press_tooltip_button();
    screen.sync();
    assert_eq!(screen.active().as_deref(), Some("c"));

    screen.overlay.handle_touch(TouchEvent::end(50.0, 320.0));
    assert_eq!(completed.get(), 1);
    assert!(screen.active().is_none());
    assert_eq!(screen.provider.context().store().descriptor_count(), 0);

    screen.sync();
    assert_eq!(screen.clock.run_frames(3), 0);
}

#[test]
fn touch_on_highlight_edge_closes_the_run() {
    let mut screen = Screen::new();
    screen.provider.context().start(StartOptions::new(["a", "b"]));
    screen.sync();
    assert!(screen.render().0.is_some());

    // Left edge of the padded hole.
    let outcome = screen.overlay.handle_touch(TouchEvent::end(12.0, 120.0));
    assert_eq!(outcome, TouchOutcome::Closed);
    assert!(screen.active().is_none());
    assert!(screen.render().0.is_none());
}

#[test]
fn activation_callback_runs_before_advance() {
    let provider = GuideProvider::new();
    let clock = ManualFrameClock::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let handle = provider.handle();
    let log = seen.clone();
    let target = GuideTarget::builder("a")
        .padding(0.0)
        .on_press(move || {
            let key = handle.use_guide_context().current_key();
            log.borrow_mut().push(key);
        })
        .mount(provider.handle(), clock.clone(), || PartialRect::from(Rect::new(0.0, 0.0, 10.0, 10.0)));

    provider.context().start(StartOptions::new(["a", "b"]));
    target.sync();
    let overlay = MaskOverlay::new(provider.handle());
    overlay.handle_touch(TouchEvent::end(5.0, 5.0));

    assert_eq!(*seen.borrow(), [Some(StepKey::from("a"))]);
    assert_eq!(provider.context().current_key().as_deref(), Some("b"));
}

#[test]
fn moving_layout_follows_the_element() {
    let mut screen = Screen::new();
    screen.provider.context().start(StartOptions::new(["a"]));
    screen.sync();

    screen.layout[0].set(Rect::new(20.0, 150.0, 100.0, 40.0).into());
    let revision = screen.provider.context().revision();
    screen.clock.advance_frame();
    assert!(screen.provider.context().revision() > revision);

    let (frame, _) = screen.render();
    assert_eq!(frame.map(|f| f.hole), Some(Rect::new(12.0, 142.0, 116.0, 56.0)));
}

#[test]
fn partial_measurement_retries_until_laid_out() {
    let provider = GuideProvider::new();
    let clock = ManualFrameClock::new();
    provider.context().start(StartOptions::new(["later"]));

    let laid_out = Rc::new(Cell::new(false));
    let flag = laid_out.clone();
    let target = GuideTarget::builder("later").padding(0.0).mount(provider.handle(), clock.clone(), move || {
        if flag.get() {
            PartialRect::from(Rect::new(1.0, 2.0, 3.0, 4.0))
        } else {
            PartialRect {
                width: Some(3.0),
                ..PartialRect::UNAVAILABLE
            }
        }
    });
    assert!(provider.context().current_descriptor().is_none());

    clock.run_frames(2);
    laid_out.set(true);
    clock.advance_frame();
    assert_eq!(target.unmeasured_frames(), 0);
    assert_eq!(
        provider.context().current_descriptor().and_then(|d| d.rect()),
        Some(Rect::new(1.0, 2.0, 3.0, 4.0))
    );
}
