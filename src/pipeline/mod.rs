//! Pipeline: a breakable chain where every handler opts in to the next.
//!
//! ```text
//!   dispatch(id, &container)
//!     │  push pipeline frame
//!     ├─► handler 0 ── continue_pipeline()? ──no──► Stopped { index: 0 }
//!     │        │ yes                  Err/panic ──► Failed { index: 0 }
//!     ├─► handler 1 ...
//!     ▼
//!   Completed { ran }          frame popped on every path
//! ```

#[allow(clippy::module_inception)]
mod pipeline;
mod outcome;

pub use outcome::PipelineOutcome;
pub use pipeline::Pipeline;
