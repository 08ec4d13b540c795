#![forbid(unsafe_code)]

//! Tour run state.
//!
//! [`GuideStore`] is the plain state machine behind a [`GuideProvider`]. It
//! never invokes host callbacks itself; [`GuideContext`] reads them out and
//! calls them after releasing its borrow, so a callback may re-enter the
//! store.
//!
//! # State machine
//!
//! ```text
//!            start(keys ≠ [])             advance (more keys)
//!   Idle ───────────────────────▶ Active(k₀) ─────────────▶ Active(kᵢ₊₁)
//!    ▲                              │  advance (last key) → Completed
//!    └──────── close ───────────────┘
//! ```
//!
//! [`GuideProvider`]: crate::GuideProvider
//! [`GuideContext`]: crate::GuideContext

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::descriptor::{Callback, DescriptorUpdate, StepDescriptor};
use crate::key::StepKey;

/// Arguments to `start`.
#[derive(Clone, Default)]
pub struct StartOptions {
    pub step_keys: Vec<StepKey>,
    pub on_complete: Option<Callback>,
    pub on_close: Option<Callback>,
}

impl StartOptions {
    pub fn new<I, K>(step_keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<StepKey>,
    {
        Self {
            step_keys: step_keys.into_iter().map(Into::into).collect(),
            on_complete: None,
            on_close: None,
        }
    }

    /// Runs once when `go_next_step` is called on the last key.
    #[must_use]
    pub fn on_complete(mut self, f: impl Fn() + 'static) -> Self {
        self.on_complete = Some(Rc::new(f));
        self
    }

    /// Runs instead of closing when the user touches outside the highlight.
    #[must_use]
    pub fn on_close(mut self, f: impl Fn() + 'static) -> Self {
        self.on_close = Some(Rc::new(f));
        self
    }
}

impl fmt::Debug for StartOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartOptions")
            .field("step_keys", &self.step_keys)
            .field("on_complete", &self.on_complete.is_some())
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

/// Result of advancing the run by one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// No run was active.
    Idle,
    /// The next key is now active.
    Moved { from: StepKey, to: StepKey },
    /// The sequence is exhausted. The store still holds the run; the caller
    /// fires `on_complete` and then closes.
    Completed { last: StepKey },
}

/// State of one provider: the active run and its descriptors.
#[derive(Default)]
pub struct GuideStore {
    step_keys: Vec<StepKey>,
    current: Option<StepKey>,
    descriptors: HashMap<StepKey, Rc<StepDescriptor>>,
    on_complete: Option<Callback>,
    on_close: Option<Callback>,
    revision: u64,
}

impl GuideStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the run's sequence and callbacks and activate the first key.
    ///
    /// With an empty sequence the run is left idle. Duplicate keys are not
    /// rejected; "next" is resolved from a key's first occurrence.
    pub fn start(&mut self, options: StartOptions) {
        let StartOptions {
            step_keys,
            on_complete,
            on_close,
        } = options;
        self.on_complete = on_complete;
        self.on_close = on_close;
        self.current = step_keys.first().cloned();
        self.step_keys = step_keys;
        self.bump();
    }

    /// Move to the key after the active one.
    ///
    /// Does not close on completion; see [`Advance::Completed`].
    pub fn advance(&mut self) -> Advance {
        let Some(current) = self.current.clone() else {
            return Advance::Idle;
        };
        let next_index = self
            .step_keys
            .iter()
            .position(|k| *k == current)
            .map_or(0, |i| i + 1);

        match self.step_keys.get(next_index).cloned() {
            Some(next) => {
                self.current = Some(next.clone());
                self.bump();
                Advance::Moved {
                    from: current,
                    to: next,
                }
            }
            None => Advance::Completed { last: current },
        }
    }

    /// Clear callbacks, sequence, active key, and descriptors.
    ///
    /// Returns `false` if the store was already empty, in which case nothing
    /// changes (the revision included).
    pub fn close(&mut self) -> bool {
        let was_empty = self.current.is_none()
            && self.step_keys.is_empty()
            && self.descriptors.is_empty()
            && self.on_complete.is_none()
            && self.on_close.is_none();
        if was_empty {
            return false;
        }
        self.on_complete = None;
        self.on_close = None;
        self.step_keys.clear();
        self.current = None;
        self.descriptors.clear();
        self.bump();
        true
    }

    /// Merge a descriptor for `key`.
    ///
    /// - no entry: the proposal is stored as is;
    /// - stored rectangle equals the proposed one: skipped;
    /// - stored entry is another variant: skipped;
    /// - otherwise the stored entry's rectangle is replaced, keeping its
    ///   callbacks and tooltip.
    pub fn set_descriptor(&mut self, key: StepKey, proposed: StepDescriptor) -> DescriptorUpdate {
        let update = match self.descriptors.get(&key) {
            None => {
                self.descriptors.insert(key, Rc::new(proposed));
                DescriptorUpdate::Inserted
            }
            Some(existing) => {
                if existing.rect().is_some() && existing.rect() == proposed.rect() {
                    DescriptorUpdate::Unchanged
                } else if existing.kind() != proposed.kind() {
                    DescriptorUpdate::KindMismatch
                } else {
                    let replaced = existing.with_rect(proposed.rect());
                    self.descriptors.insert(key, Rc::new(replaced));
                    DescriptorUpdate::Replaced
                }
            }
        };
        if update.is_change() {
            self.bump();
        }
        update
    }

    /// Compute the proposal from the stored entry, then merge it like
    /// [`set_descriptor`](Self::set_descriptor). Returning `None` from `f`
    /// leaves the store untouched.
    pub fn set_descriptor_with<F>(&mut self, key: StepKey, f: F) -> DescriptorUpdate
    where
        F: FnOnce(Option<&StepDescriptor>) -> Option<StepDescriptor>,
    {
        let existing = self.descriptors.get(&key).map(Rc::as_ref);
        match f(existing) {
            Some(proposed) => self.set_descriptor(key, proposed),
            None => DescriptorUpdate::Unchanged,
        }
    }

    /// The active key, if a run is active.
    pub fn current_key(&self) -> Option<&StepKey> {
        self.current.as_ref()
    }

    /// The descriptor of the active key, if one has been registered.
    pub fn current_descriptor(&self) -> Option<Rc<StepDescriptor>> {
        self.current
            .as_ref()
            .and_then(|key| self.descriptors.get(key))
            .cloned()
    }

    pub fn descriptor(&self, key: &str) -> Option<Rc<StepDescriptor>> {
        self.descriptors.get(key).cloned()
    }

    pub fn descriptor_count(&self) -> usize {
        self.descriptors.len()
    }

    pub fn step_keys(&self) -> &[StepKey] {
        &self.step_keys
    }

    pub fn on_complete(&self) -> Option<Callback> {
        self.on_complete.clone()
    }

    pub fn on_close(&self) -> Option<Callback> {
        self.on_close.clone()
    }

    /// Whether a run is active.
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Monotonic change counter. Skipped writes leave it untouched.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

impl fmt::Debug for GuideStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuideStore")
            .field("step_keys", &self.step_keys)
            .field("current", &self.current)
            .field("descriptors", &self.descriptors.len())
            .field("on_complete", &self.on_complete.is_some())
            .field("on_close", &self.on_close.is_some())
            .field("revision", &self.revision)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use guidekit_core::geometry::Rect;

    use super::*;
    use crate::descriptor::{MaskStep, Placement, TooltipSpec};

    fn mask(rect: Rect) -> StepDescriptor {
        MaskStep::default().with_rect(rect).into()
    }

    #[test]
    fn start_activates_first_key() {
        let mut store = GuideStore::new();
        store.start(StartOptions::new(["a", "b"]));
        assert_eq!(store.current_key().map(StepKey::as_str), Some("a"));
        assert_eq!(store.step_keys().len(), 2);
        assert!(store.is_active());
    }

    #[test]
    fn start_empty_stays_idle() {
        let mut store = GuideStore::new();
        store.start(StartOptions::new(Vec::<StepKey>::new()));
        assert!(store.current_key().is_none());
        assert_eq!(store.advance(), Advance::Idle);
    }

    #[test]
    fn start_empty_after_run_clears_active_key() {
        let mut store = GuideStore::new();
        store.start(StartOptions::new(["a"]));
        store.start(StartOptions::new(Vec::<StepKey>::new()));
        assert!(store.current_key().is_none());
    }

    #[test]
    fn advance_walks_sequence_then_completes() {
        let mut store = GuideStore::new();
        store.start(StartOptions::new(["a", "b"]));
        assert_eq!(
            store.advance(),
            Advance::Moved {
                from: "a".into(),
                to: "b".into()
            }
        );
        assert_eq!(store.advance(), Advance::Completed { last: "b".into() });
        // Completion leaves closing to the caller.
        assert_eq!(store.current_key().map(StepKey::as_str), Some("b"));
    }

    #[test]
    fn duplicate_keys_resolve_from_first_occurrence() {
        let mut store = GuideStore::new();
        store.start(StartOptions::new(["a", "b", "a", "c"]));
        store.advance(); // a -> b
        store.advance(); // b -> a
        // "a" resolves to index 0 again, so "b" follows instead of "c".
        assert_eq!(
            store.advance(),
            Advance::Moved {
                from: "a".into(),
                to: "b".into()
            }
        );
    }

    #[test]
    fn close_clears_everything_and_is_idempotent() {
        let mut store = GuideStore::new();
        store.start(StartOptions::new(["a"]).on_close(|| {}).on_complete(|| {}));
        store.set_descriptor("a".into(), mask(Rect::new(0.0, 0.0, 1.0, 1.0)));
        assert!(store.close());
        assert!(store.current_key().is_none());
        assert!(store.step_keys().is_empty());
        assert_eq!(store.descriptor_count(), 0);
        assert!(store.on_close().is_none());
        assert!(store.on_complete().is_none());

        let rev = store.revision();
        assert!(!store.close());
        assert_eq!(store.revision(), rev);
    }

    #[test]
    fn identical_rect_is_skipped_and_reference_kept() {
        let mut store = GuideStore::new();
        let rect = Rect::new(10.0, 10.0, 50.0, 50.0);
        assert_eq!(
            store.set_descriptor("a".into(), mask(rect)),
            DescriptorUpdate::Inserted
        );
        let first = store.descriptor("a").unwrap();
        let rev = store.revision();

        assert_eq!(
            store.set_descriptor("a".into(), mask(rect)),
            DescriptorUpdate::Unchanged
        );
        let second = store.descriptor("a").unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(store.revision(), rev);
    }

    #[test]
    fn changed_rect_replaces_only_rect() {
        let mut store = GuideStore::new();
        let pressed = Rc::new(Cell::new(false));
        let flag = pressed.clone();
        store.set_descriptor(
            "a".into(),
            MaskStep::default()
                .with_rect(Rect::new(0.0, 0.0, 10.0, 10.0))
                .with_tooltip(TooltipSpec::new(Placement::BottomCenter).title("first"))
                .on_press(move || flag.set(true))
                .into(),
        );
        // A later proposal without tooltip or callback only moves the rect.
        let update = store.set_descriptor("a".into(), mask(Rect::new(5.0, 0.0, 10.0, 10.0)));
        assert_eq!(update, DescriptorUpdate::Replaced);

        let stored = store.descriptor("a").unwrap();
        assert_eq!(stored.rect(), Some(Rect::new(5.0, 0.0, 10.0, 10.0)));
        let step = stored.as_mask().unwrap();
        assert_eq!(
            step.tooltip.as_ref().and_then(|t| t.title.as_deref()),
            Some("first")
        );
        (step.on_press.as_ref().unwrap())();
        assert!(pressed.get());
    }

    #[test]
    fn missing_rect_is_replaced() {
        let mut store = GuideStore::new();
        store.set_descriptor("a".into(), MaskStep::default().into());
        let update = store.set_descriptor("a".into(), mask(Rect::new(1.0, 1.0, 1.0, 1.0)));
        assert_eq!(update, DescriptorUpdate::Replaced);
    }

    #[test]
    fn updater_sees_existing_entry() {
        let mut store = GuideStore::new();
        store.set_descriptor("a".into(), mask(Rect::new(0.0, 0.0, 4.0, 4.0)));
        let update = store.set_descriptor_with("a".into(), |prev| {
            let prev = prev?;
            let r = prev.rect()?;
            Some(prev.with_rect(Some(r.translate(1.0, 0.0))))
        });
        assert_eq!(update, DescriptorUpdate::Replaced);
        assert_eq!(
            store.descriptor("a").unwrap().rect(),
            Some(Rect::new(1.0, 0.0, 4.0, 4.0))
        );

        let declined = store.set_descriptor_with("b".into(), |_| None);
        assert_eq!(declined, DescriptorUpdate::Unchanged);
        assert!(store.descriptor("b").is_none());
    }

    #[test]
    fn current_descriptor_follows_active_key() {
        let mut store = GuideStore::new();
        store.set_descriptor("b".into(), mask(Rect::new(0.0, 0.0, 1.0, 1.0)));
        store.start(StartOptions::new(["a", "b"]));
        assert!(store.current_descriptor().is_none());
        store.advance();
        assert!(store.current_descriptor().is_some());
    }
}
