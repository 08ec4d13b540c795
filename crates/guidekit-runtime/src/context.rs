#![forbid(unsafe_code)]

//! Provider scope and consumer handles.
//!
//! A [`GuideProvider`] owns one [`GuideStore`] and one [`GuideConfig`]. Widgets
//! receive a [`GuideHandle`] (a weak reference) and resolve it on each render
//! through the hook methods:
//!
//! - [`GuideHandle::use_guide_context`]: full read/write access, for the
//!   overlay and measurement wrappers.
//! - [`GuideHandle::use_guide_state`]: the active step plus `start`, for host
//!   screens that launch tours.
//!
//! Both panic when the provider is gone or the handle was never bound. That
//! is a wiring mistake in the host, not a runtime condition.
//!
//! Host callbacks are always invoked after the store borrow is released, so
//! they may call back into the context (for example, `on_close` calling
//! `close_guide`). Callbacks that capture the context should capture a
//! [`GuideHandle`] to avoid keeping the store alive through a cycle.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::config::GuideConfig;
use crate::descriptor::{Callback, DescriptorUpdate, StepDescriptor};
use crate::error::{GuideError, Result};
use crate::key::StepKey;
use crate::store::{Advance, GuideStore, StartOptions};

struct ProviderInner {
    store: RefCell<GuideStore>,
    config: GuideConfig,
}

/// Owner of one tour scope. Dropping it ends the run and invalidates every
/// handle created from it.
pub struct GuideProvider {
    inner: Rc<ProviderInner>,
}

impl Default for GuideProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl GuideProvider {
    /// A provider with the default configuration.
    pub fn new() -> Self {
        Self::with_config(GuideConfig::default())
    }

    pub fn with_config(config: GuideConfig) -> Self {
        Self {
            inner: Rc::new(ProviderInner {
                store: RefCell::new(GuideStore::new()),
                config,
            }),
        }
    }

    /// A weak handle to pass down to widgets.
    pub fn handle(&self) -> GuideHandle {
        GuideHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Direct access to the context, for the code that owns the provider.
    pub fn context(&self) -> GuideContext {
        GuideContext {
            inner: self.inner.clone(),
        }
    }

    pub fn config(&self) -> &GuideConfig {
        &self.inner.config
    }
}

impl fmt::Debug for GuideProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuideProvider")
            .field("store", &self.inner.store)
            .finish()
    }
}

/// A weak reference to a provider. `Default` yields an unbound handle.
#[derive(Clone, Default)]
pub struct GuideHandle {
    inner: Weak<ProviderInner>,
}

impl GuideHandle {
    /// Resolve the full context.
    ///
    /// # Panics
    ///
    /// If the provider has been dropped or the handle was never bound.
    #[track_caller]
    pub fn use_guide_context(&self) -> GuideContext {
        match self.resolve("use_guide_context") {
            Ok(ctx) => ctx,
            Err(err) => panic!("{err}"),
        }
    }

    /// Resolve the read-only view used by host screens.
    ///
    /// # Panics
    ///
    /// If the provider has been dropped or the handle was never bound.
    #[track_caller]
    pub fn use_guide_state(&self) -> GuideState {
        match self.resolve("use_guide_state") {
            Ok(ctx) => GuideState::new(ctx),
            Err(err) => panic!("{err}"),
        }
    }

    /// Non-panicking [`use_guide_context`](Self::use_guide_context).
    pub fn try_context(&self) -> Result<GuideContext> {
        self.resolve("try_context")
    }

    /// Whether the provider is still alive.
    pub fn is_bound(&self) -> bool {
        self.inner.strong_count() > 0
    }

    fn resolve(&self, hook: &'static str) -> Result<GuideContext> {
        self.inner
            .upgrade()
            .map(|inner| GuideContext { inner })
            .ok_or(GuideError::ProviderMissing { hook })
    }
}

impl fmt::Debug for GuideHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuideHandle")
            .field("bound", &self.is_bound())
            .finish()
    }
}

/// Read/write access to a provider's run.
///
/// Holds a strong reference; keep it for the duration of one render or event,
/// and store a [`GuideHandle`] instead.
#[derive(Clone)]
pub struct GuideContext {
    inner: Rc<ProviderInner>,
}

impl GuideContext {
    /// Begin a run. See [`GuideStore::start`].
    pub fn start(&self, options: StartOptions) {
        self.inner.store.borrow_mut().start(options);
        guidekit_core::info!(
            steps = self.inner.store.borrow().step_keys().len(),
            first = ?self.current_key(),
            "guide started"
        );
    }

    /// Activate the next key, or complete the run on the last one.
    ///
    /// On completion `on_complete` runs first, then the run is closed.
    pub fn go_next_step(&self) -> Advance {
        let advance = self.inner.store.borrow_mut().advance();
        guidekit_core::debug!(?advance, "guide advance");
        match &advance {
            Advance::Idle | Advance::Moved { .. } => {}
            Advance::Completed { .. } => {
                guidekit_core::info!("guide completed");
                let on_complete = self.inner.store.borrow().on_complete();
                if let Some(on_complete) = on_complete {
                    on_complete();
                }
                self.close_guide();
            }
        }
        advance
    }

    /// Clear the run. Idempotent.
    pub fn close_guide(&self) {
        if self.inner.store.borrow_mut().close() {
            guidekit_core::info!("guide closed");
        }
    }

    /// Merge a descriptor for `key`. See [`GuideStore::set_descriptor`].
    pub fn set_descriptor(&self, key: impl Into<StepKey>, descriptor: StepDescriptor) -> DescriptorUpdate {
        let key = key.into();
        let update = self
            .inner
            .store
            .borrow_mut()
            .set_descriptor(key.clone(), descriptor);
        guidekit_core::trace!(%key, ?update, "descriptor write");
        update
    }

    /// Merge a descriptor computed from the stored one.
    pub fn set_descriptor_with<F>(&self, key: impl Into<StepKey>, f: F) -> DescriptorUpdate
    where
        F: FnOnce(Option<&StepDescriptor>) -> Option<StepDescriptor>,
    {
        let key = key.into();
        let update = self
            .inner
            .store
            .borrow_mut()
            .set_descriptor_with(key.clone(), f);
        guidekit_core::trace!(%key, ?update, "descriptor write");
        update
    }

    pub fn current_key(&self) -> Option<StepKey> {
        self.inner.store.borrow().current_key().cloned()
    }

    /// Descriptor of the active key, if registered.
    pub fn current_descriptor(&self) -> Option<Rc<StepDescriptor>> {
        self.inner.store.borrow().current_descriptor()
    }

    pub fn is_current(&self, key: &str) -> bool {
        self.inner
            .store
            .borrow()
            .current_key()
            .is_some_and(|k| k.as_str() == key)
    }

    /// Whether a run is active.
    pub fn is_active(&self) -> bool {
        self.inner.store.borrow().is_active()
    }

    pub fn on_close(&self) -> Option<Callback> {
        self.inner.store.borrow().on_close()
    }

    pub fn revision(&self) -> u64 {
        self.inner.store.borrow().revision()
    }

    pub fn config(&self) -> &GuideConfig {
        &self.inner.config
    }

    /// Borrow the store for inspection.
    ///
    /// # Panics
    ///
    /// If called while the store is mutably borrowed, i.e. from inside an
    /// updater passed to [`set_descriptor_with`](Self::set_descriptor_with).
    pub fn store(&self) -> Ref<'_, GuideStore> {
        self.inner.store.borrow()
    }

    /// A weak handle to the same provider.
    pub fn handle(&self) -> GuideHandle {
        GuideHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl fmt::Debug for GuideContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuideContext")
            .field("store", &self.inner.store)
            .finish()
    }
}

/// The host-facing view: what is showing, and a way to start a tour.
#[derive(Clone)]
pub struct GuideState {
    pub current_key: Option<StepKey>,
    pub current_descriptor: Option<Rc<StepDescriptor>>,
    context: GuideContext,
}

impl GuideState {
    fn new(context: GuideContext) -> Self {
        Self {
            current_key: context.current_key(),
            current_descriptor: context.current_descriptor(),
            context,
        }
    }

    /// Begin a run.
    pub fn start(&self, options: StartOptions) {
        self.context.start(options);
    }
}

impl fmt::Debug for GuideState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuideState")
            .field("current_key", &self.current_key)
            .field("current_descriptor", &self.current_descriptor)
            .finish()
    }
}
