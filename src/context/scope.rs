use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::error::ContextError;

#[derive(Default)]
struct PipelineFrame {
    proceed: Cell<bool>,
    index: Cell<usize>,
}

#[derive(Default)]
struct InterceptFrame {
    blocked: Cell<bool>,
}

thread_local! {
    static PIPELINE_FRAMES: RefCell<Vec<Rc<PipelineFrame>>> = const { RefCell::new(Vec::new()) };
    static INTERCEPT_FRAMES: RefCell<Vec<Rc<InterceptFrame>>> = const { RefCell::new(Vec::new()) };
}

/// Allow the running pipeline to proceed to the next handler.
///
/// A pipeline handler that returns without calling this stops the chain.
/// Fails with [`ContextError::NoPipeline`] when no pipeline dispatch is
/// active on the current thread.
pub fn signal_continue() -> Result<(), ContextError> {
    PIPELINE_FRAMES.with(|frames| match frames.borrow().last() {
        Some(frame) => {
            frame.proceed.set(true);
            Ok(())
        }
        None => Err(ContextError::NoPipeline),
    })
}

/// Stop the current event from reaching its consumers.
///
/// Fails with [`ContextError::NoInterceptor`] when called outside an
/// interceptor.
pub fn signal_block() -> Result<(), ContextError> {
    INTERCEPT_FRAMES.with(|frames| match frames.borrow().last() {
        Some(frame) => {
            frame.blocked.set(true);
            Ok(())
        }
        None => Err(ContextError::NoInterceptor),
    })
}

/// Index of the pipeline handler running on this thread, if any.
pub fn current_handler_index() -> Option<usize> {
    PIPELINE_FRAMES.with(|frames| frames.borrow().last().map(|frame| frame.index.get()))
}

/// Whether a pipeline dispatch is active on this thread.
pub fn in_pipeline() -> bool {
    PIPELINE_FRAMES.with(|frames| !frames.borrow().is_empty())
}

/// Whether an interceptor stage is active on this thread.
pub fn in_interceptor() -> bool {
    INTERCEPT_FRAMES.with(|frames| !frames.borrow().is_empty())
}

/// Pipeline frame for one dispatch. Popped on drop, including during unwinding.
pub(crate) struct PipelineScope {
    frame: Rc<PipelineFrame>,
}

impl PipelineScope {
    pub(crate) fn enter() -> Self {
        let frame = Rc::new(PipelineFrame::default());
        PIPELINE_FRAMES.with(|frames| frames.borrow_mut().push(Rc::clone(&frame)));
        Self { frame }
    }

    /// Reset the continuation flag before invoking handler `index`.
    pub(crate) fn begin(&self, index: usize) {
        self.frame.index.set(index);
        self.frame.proceed.set(false);
    }

    pub(crate) fn should_continue(&self) -> bool {
        self.frame.proceed.get()
    }
}

impl Drop for PipelineScope {
    fn drop(&mut self) {
        PIPELINE_FRAMES.with(|frames| {
            let mut frames = frames.borrow_mut();
            if let Some(pos) = frames.iter().rposition(|f| Rc::ptr_eq(f, &self.frame)) {
                frames.truncate(pos);
            }
        });
    }
}

/// Interceptor frame for one dispatch.
pub(crate) struct InterceptScope {
    frame: Rc<InterceptFrame>,
}

impl InterceptScope {
    pub(crate) fn enter() -> Self {
        let frame = Rc::new(InterceptFrame::default());
        INTERCEPT_FRAMES.with(|frames| frames.borrow_mut().push(Rc::clone(&frame)));
        Self { frame }
    }

    pub(crate) fn blocked(&self) -> bool {
        self.frame.blocked.get()
    }
}

impl Drop for InterceptScope {
    fn drop(&mut self) {
        INTERCEPT_FRAMES.with(|frames| {
            let mut frames = frames.borrow_mut();
            if let Some(pos) = frames.iter().rposition(|f| Rc::ptr_eq(f, &self.frame)) {
                frames.truncate(pos);
            }
        });
    }
}
