#![forbid(unsafe_code)]
#![cfg(feature = "tracing")]

//! Structured logging from the measurement loop and overlay.
//!
//!   cargo test -p guidekit-widgets --features tracing --test tracing_tests

use std::cell::Cell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use guidekit_core::geometry::{PartialRect, Rect, Size};
use guidekit_render::DisplayList;
use guidekit_runtime::{GuideConfig, GuideProvider, ManualFrameClock, MaskStep, StartOptions};
use guidekit_widgets::{GuideTarget, MaskOverlay};
use tracing_subscriber::layer::SubscriberExt;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: Vec<(String, String)>,
}

/// A layer that records every event and span name.
#[derive(Clone, Default)]
struct Capture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
    spans: Arc<Mutex<Vec<String>>>,
}

impl Capture {
    fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().unwrap().clone()
    }

    fn messages(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.message).collect()
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields.push((field.name().to_string(), format!("{value:?}")));
        }
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for Capture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }

    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        self.spans.lock().unwrap().push(attrs.metadata().name().to_string());
    }
}

fn captured<F: FnOnce()>(f: F) -> Capture {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    tracing::subscriber::with_default(subscriber, f);
    capture
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn run_lifecycle_is_logged() {
    let capture = captured(|| {
        let provider = GuideProvider::new();
        let ctx = provider.context();
        ctx.start(StartOptions::new(["a", "b"]));
        ctx.go_next_step();
        ctx.go_next_step();
    });
    let messages = capture.messages();
    assert!(messages.iter().any(|m| m == "guide started"), "{messages:?}");
    assert!(messages.iter().any(|m| m == "guide closed"), "{messages:?}");
    assert!(messages.iter().filter(|m| *m == "guide advance").count() == 2);
}

#[test]
fn retry_cap_warns_once() {
    let capture = captured(|| {
        let provider = GuideProvider::with_config(GuideConfig::default().with_max_unmeasured_frames(Some(2)));
        let clock = ManualFrameClock::new();
        provider.context().start(StartOptions::new(["a"]));
        let _target = GuideTarget::builder("a").mount(provider.handle(), clock.clone(), || PartialRect::UNAVAILABLE);
        clock.run_frames(5);
    });

    let warnings: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 1, "{warnings:?}");
    assert!(warnings[0].fields.iter().any(|(k, v)| k == "key" && v == "a"));
    assert!(warnings[0].fields.iter().any(|(k, v)| k == "frames" && v == "2"));
}

#[test]
fn unmeasured_frames_are_traced() {
    let capture = captured(|| {
        let provider = GuideProvider::new();
        let clock = ManualFrameClock::new();
        let laid_out = Rc::new(Cell::new(false));
        let flag = laid_out.clone();
        provider.context().start(StartOptions::new(["a"]));
        let _target = GuideTarget::builder("a").mount(provider.handle(), clock.clone(), move || {
            if flag.get() {
                PartialRect::from(Rect::new(0.0, 0.0, 1.0, 1.0))
            } else {
                PartialRect::UNAVAILABLE
            }
        });
        clock.run_frames(2);
        laid_out.set(true);
        clock.advance_frame();
    });
    let messages = capture.messages();
    assert_eq!(messages.iter().filter(|m| *m == "target unmeasured").count(), 3);
    assert!(messages.iter().any(|m| m == "descriptor write"));
}

#[test]
fn overlay_render_opens_a_span() {
    let capture = captured(|| {
        let provider = GuideProvider::new();
        let ctx = provider.context();
        ctx.start(StartOptions::new(["a"]));
        ctx.set_descriptor("a", MaskStep::default().with_rect(Rect::new(1.0, 1.0, 5.0, 5.0)).into());
        let mut list = DisplayList::new();
        MaskOverlay::new(provider.handle()).render(Size::new(10.0, 10.0), &mut list);
    });
    let spans = capture.spans.lock().unwrap().clone();
    assert!(spans.iter().any(|s| s == "mask_overlay_render"), "{spans:?}");
}
