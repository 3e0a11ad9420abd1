/// How a pipeline run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// No handler matched the identifier.
    Empty,
    /// Every handler ran and called `continue_pipeline()`.
    Completed { ran: usize },
    /// Handler `index` returned without continuing. Not an error.
    Stopped { index: usize },
    /// Handler `index` returned an error or panicked.
    Failed { index: usize },
}

impl PipelineOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, PipelineOutcome::Completed { .. })
    }

    /// Number of handlers that were invoked.
    pub fn handlers_run(&self) -> usize {
        match *self {
            PipelineOutcome::Empty => 0,
            PipelineOutcome::Completed { ran } => ran,
            PipelineOutcome::Stopped { index } | PipelineOutcome::Failed { index } => index + 1,
        }
    }
}
