#![forbid(unsafe_code)]

//! Display-refresh scheduling.
//!
//! The measurement loop asks for one callback per refresh through
//! [`FrameScheduler`], the equivalent of `requestAnimationFrame` /
//! `cancelAnimationFrame`. Hosts implement it on their vsync or tick source.
//! [`ManualFrameClock`] is a deterministic implementation for headless hosts
//! and tests: frames advance only when the caller says so.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// Identifies one pending frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameRequestId(u64);

impl FrameRequestId {
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// A callback run on the next display refresh.
pub type FrameCallback = Box<dyn FnOnce()>;

/// Source of display-refresh callbacks.
pub trait FrameScheduler {
    /// Run `callback` once on the next refresh.
    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId;

    /// Cancel a pending request. Unknown or already-run ids are ignored.
    fn cancel_frame(&self, id: FrameRequestId);
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for Rc<S> {
    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId {
        (**self).request_frame(callback)
    }

    fn cancel_frame(&self, id: FrameRequestId) {
        (**self).cancel_frame(id);
    }
}

#[derive(Default)]
struct ClockState {
    next_id: u64,
    frame: u64,
    pending: Vec<(FrameRequestId, FrameCallback)>,
    /// Requests taken for the frame being run and not yet executed.
    running: HashSet<FrameRequestId>,
}

/// A frame clock driven by explicit [`advance_frame`](Self::advance_frame)
/// calls.
///
/// Clones share the same queue. Callbacks requested while a frame runs are
/// deferred to the next frame.
#[derive(Clone, Default)]
pub struct ManualFrameClock {
    state: Rc<RefCell<ClockState>>,
}

impl ManualFrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every callback that was pending when the frame began.
    ///
    /// Returns how many callbacks ran.
    pub fn advance_frame(&self) -> usize {
        let batch = {
            let mut state = self.state.borrow_mut();
            state.frame += 1;
            let batch = std::mem::take(&mut state.pending);
            state.running = batch.iter().map(|(id, _)| *id).collect();
            batch
        };

        let mut ran = 0;
        for (id, callback) in batch {
            // A callback earlier in this frame may have cancelled this one.
            let live = self.state.borrow_mut().running.remove(&id);
            if live {
                callback();
                ran += 1;
            }
        }
        ran
    }

    /// Advance `frames` frames, returning the total callbacks run.
    pub fn run_frames(&self, frames: usize) -> usize {
        (0..frames).map(|_| self.advance_frame()).sum()
    }

    /// Number of callbacks waiting for the next frame.
    pub fn pending(&self) -> usize {
        self.state.borrow().pending.len()
    }

    /// Frames advanced so far.
    pub fn frame_count(&self) -> u64 {
        self.state.borrow().frame
    }
}

impl FrameScheduler for ManualFrameClock {
    fn request_frame(&self, callback: FrameCallback) -> FrameRequestId {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let id = FrameRequestId(state.next_id);
        state.pending.push((id, callback));
        id
    }

    fn cancel_frame(&self, id: FrameRequestId) {
        let mut state = self.state.borrow_mut();
        if !state.running.remove(&id) {
            state.pending.retain(|(pending, _)| *pending != id);
        }
    }
}

impl fmt::Debug for ManualFrameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ManualFrameClock")
            .field("frame", &state.frame)
            .field("pending", &state.pending.len())
            .finish()
    }
}
