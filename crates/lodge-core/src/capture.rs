//! Capture contexts: scoped interception of save results.
//!
//! Entering a context pushes a fresh frame onto a [`CaptureStack`]; every
//! save the dispatcher completes while the frame is on top is recorded there
//! (in addition to being written). Exiting pops the frame and hands the
//! records back. Contexts must nest strictly; exiting out of order is a
//! caller bug and is reported as [`CaptureError::NestingViolation`].
//!
//! The stack is a service object. A process-wide instance exists for
//! convenience; code that saves from several threads at once should give
//! each execution context its own stack.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::error::CaptureError;
use crate::outcome::{Descriptor, SaveWarning};

/// One recorded save.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedSave {
    pub descriptor: Descriptor,
    pub warnings: Vec<SaveWarning>,
}

#[derive(Debug)]
struct Frame {
    id: u64,
    saves: Vec<CapturedSave>,
}

#[derive(Debug, Default)]
pub struct CaptureStack {
    frames: Mutex<Vec<Frame>>,
    next_id: AtomicU64,
}

impl CaptureStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide stack used by the default dispatcher.
    pub fn global() -> Arc<CaptureStack> {
        static GLOBAL: OnceLock<Arc<CaptureStack>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(CaptureStack::new())))
    }

    /// Push a fresh frame and return the context owning it.
    pub fn enter(self: &Arc<Self>) -> CaptureContext {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.frames().push(Frame {
            id,
            saves: Vec::new(),
        });
        tracing::trace!(id, "capture context entered");
        CaptureContext {
            stack: Arc::clone(self),
            id,
            exited: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.frames().is_empty()
    }

    pub fn depth(&self) -> usize {
        self.frames().len()
    }

    /// Append to the innermost frame. Returns false when no context is active.
    pub fn record(&self, save: CapturedSave) -> bool {
        match self.frames().last_mut() {
            Some(frame) => {
                frame.saves.push(save);
                true
            }
            None => false,
        }
    }

    fn frames(&self) -> MutexGuard<'_, Vec<Frame>> {
        self.frames.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn pop(&self, id: u64) -> Result<Vec<CapturedSave>, CaptureError> {
        let mut frames = self.frames();
        let top = frames.last().map(|frame| frame.id);
        match top {
            Some(top) if top == id => Ok(frames.pop().map(|frame| frame.saves).unwrap_or_default()),
            Some(found) => match frames.iter().position(|frame| frame.id == id) {
                // Drop the misplaced frame so the inner contexts stay usable.
                Some(pos) => {
                    frames.remove(pos);
                    Err(CaptureError::NestingViolation { expected: id, found })
                }
                None => Err(CaptureError::NotActive { id }),
            },
            None => Err(CaptureError::NotActive { id }),
        }
    }
}

/// An entered capture context. Call [`exit`](Self::exit) to collect the
/// records; dropping it without exiting discards them.
#[derive(Debug)]
pub struct CaptureContext {
    stack: Arc<CaptureStack>,
    id: u64,
    exited: bool,
}

impl CaptureContext {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Pop this context's frame and return what it captured, in save order.
    pub fn exit(mut self) -> Result<Vec<CapturedSave>, CaptureError> {
        self.exited = true;
        let saves = self.stack.pop(self.id)?;
        tracing::trace!(id = self.id, captured = saves.len(), "capture context exited");
        Ok(saves)
    }
}

impl Drop for CaptureContext {
    fn drop(&mut self) {
        if self.exited {
            return;
        }
        if let Err(err) = self.stack.pop(self.id) {
            tracing::error!(id = self.id, "capture context dropped out of order: {}", err);
        }
    }
}
