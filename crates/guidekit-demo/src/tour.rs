#![forbid(unsafe_code)]

//! A scripted onboarding tour over a fake shop screen.
//!
//! Three targets (search bar, filter chip, cart icon) are mounted on a manual
//! frame clock. The search bar only lays out after a few frames, which shows
//! the overlay waiting for a measurement. The script then alternates between
//! tapping the highlight and pressing the tooltip button until the tour
//! completes.

use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;

use guidekit::render::{DrawOp, FillRule};
use guidekit::{
    DisplayList, GuideConfig, GuideProvider, GuideTarget, ManualFrameClock, MaskOverlay,
    OverlayFrame, PartialRect, Placement, Point, Rect, StartOptions, StepKey, TooltipSpec,
    TouchEvent, TouchOutcome,
};

use crate::cli::Opts;

/// Upper bound on script iterations, so a target that never lays out cannot
/// hang the demo.
const MAX_ITERATIONS: usize = 64;

/// One highlighted element of the fake screen.
#[derive(Debug, Clone)]
pub struct DemoElement {
    pub key: &'static str,
    pub rect: Rect,
    pub title: &'static str,
    pub body: &'static str,
    pub placement: Placement,
}

/// The stock screen: search bar, filter chip, cart icon.
pub fn shop_screen() -> Vec<DemoElement> {
    vec![
        DemoElement {
            key: "search",
            rect: Rect::new(16.0, 64.0, 296.0, 40.0),
            title: "Search",
            body: "Find products by name, brand or category.",
            placement: Placement::BottomLeft,
        },
        DemoElement {
            key: "filters",
            rect: Rect::new(16.0, 120.0, 96.0, 32.0),
            title: "Filters",
            body: "Narrow results by price and rating.",
            placement: Placement::BottomCenter,
        },
        DemoElement {
            key: "cart",
            rect: Rect::new(326.0, 760.0, 48.0, 48.0),
            title: "Your cart",
            body: "Everything you picked ends up here.",
            placement: Placement::TopRight,
        },
    ]
}

/// What happened during a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TourReport {
    /// Keys in the order their overlay first appeared.
    pub shown: Vec<StepKey>,
    /// Renders that found the active step not measured yet.
    pub waiting_renders: usize,
    pub completed: bool,
    pub frames: u64,
}

/// Run the tour, writing a transcript to `out`.
pub fn run(opts: &Opts, config: GuideConfig, out: &mut dyn Write) -> io::Result<TourReport> {
    run_screen(opts, config, &shop_screen(), out)
}

pub fn run_screen(
    opts: &Opts,
    config: GuideConfig,
    screen: &[DemoElement],
    out: &mut dyn Write,
) -> io::Result<TourReport> {
    let provider = GuideProvider::with_config(config);
    let clock = ManualFrameClock::new();
    let mut overlay = MaskOverlay::new(provider.handle());

    let targets: Vec<GuideTarget> = screen
        .iter()
        .enumerate()
        .map(|(i, el)| {
            // Only the first element is late to lay out.
            let delay = if i == 0 { opts.layout_delay } else { 0 };
            let rect = el.rect;
            let element_clock = clock.clone();
            GuideTarget::builder(el.key)
                .tooltip(
                    TooltipSpec::new(el.placement)
                        .title(el.title)
                        .body(el.body),
                )
                .mount(provider.handle(), clock.clone(), move || {
                    if element_clock.frame_count() >= delay {
                        PartialRect::from(rect)
                    } else {
                        PartialRect::UNAVAILABLE
                    }
                })
        })
        .collect();

    let completed = Rc::new(Cell::new(false));
    let flag = completed.clone();
    provider.handle().use_guide_state().start(
        StartOptions::new(screen.iter().map(|el| el.key)).on_complete(move || flag.set(true)),
    );
    tracing::info!(steps = screen.len(), "demo tour started");

    let mut report = TourReport::default();
    let mut interactions = 0usize;
    for _ in 0..MAX_ITERATIONS {
        let Some(key) = provider.context().current_key() else {
            break;
        };
        for target in &targets {
            target.sync();
        }
        clock.run_frames(opts.frames);

        let mut list = DisplayList::new();
        let Some(frame) = overlay.render(opts.viewport, &mut list) else {
            report.waiting_renders += 1;
            writeln!(out, "[frame {}] {key}: waiting for layout", clock.frame_count())?;
            continue;
        };
        if report.shown.last() != Some(&key) {
            report.shown.push(key.clone());
        }
        write_frame(out, clock.frame_count(), &key, &frame, &list, opts.quiet)?;

        let outcome = if interactions % 2 == 0 {
            let centre = Point::new(
                frame.hole.x + frame.hole.width / 2.0,
                frame.hole.y + frame.hole.height / 2.0,
            );
            let outcome = overlay.handle_touch(TouchEvent::end(centre.x, centre.y));
            format!("tap highlight -> {outcome:?}")
        } else {
            let advance = overlay.press_tooltip_button();
            format!("press tooltip button -> {:?}", TouchOutcome::Advanced(advance))
        };
        interactions += 1;
        writeln!(out, "    {outcome}")?;
    }

    report.completed = completed.get();
    report.frames = clock.frame_count();
    writeln!(
        out,
        "tour {} after {} frames",
        if report.completed { "completed" } else { "did not complete" },
        report.frames
    )?;
    tracing::info!(completed = report.completed, frames = report.frames, "demo tour finished");
    Ok(report)
}

fn write_frame(
    out: &mut dyn Write,
    frame_no: u64,
    key: &StepKey,
    frame: &OverlayFrame,
    list: &DisplayList,
    quiet: bool,
) -> io::Result<()> {
    let Rect {
        x,
        y,
        width,
        height,
    } = frame.hole;
    writeln!(out, "[frame {frame_no}] {key}: hole {x},{y} {width}x{height}")?;
    if let Some(tooltip) = frame.tooltip {
        writeln!(
            out,
            "    tooltip {},{} {}x{}",
            tooltip.x, tooltip.y, tooltip.width, tooltip.height
        )?;
    }
    if quiet {
        return Ok(());
    }
    for op in list.ops() {
        match op {
            DrawOp::FillPath { path, fill } => {
                let rule = match fill.rule {
                    FillRule::EvenOdd => "evenodd",
                    FillRule::NonZero => "nonzero",
                };
                writeln!(
                    out,
                    "    fill {} opacity={} rule={rule} d=\"{path}\"",
                    fill.color.to_hex(),
                    fill.opacity
                )?;
            }
            DrawOp::Text { text, origin, .. } => {
                writeln!(out, "    text {},{} {text:?}", origin.x, origin.y)?;
            }
        }
    }
    Ok(())
}
