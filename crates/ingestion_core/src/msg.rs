use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The selection store reported a new path.
    SelectionChanged(PathBuf),
    /// User asked to start the upload.
    StartClicked,
    /// User asked to cancel the running upload.
    CancelClicked,
    /// Engine accepted the start request.
    JobStarted { job_id: crate::JobId },
    /// Engine refused the start request.
    StartRejected { reason: String },
    /// Engine progress for a job.
    JobProgress {
        job_id: crate::JobId,
        step: u32,
        total_steps: u32,
        percent: u8,
        message: String,
    },
    /// Engine terminal notification for a job.
    JobFinished {
        job_id: crate::JobId,
        result: crate::JobResultKind,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
