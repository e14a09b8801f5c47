use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartUpload {
        total_steps: u32,
        step_delay: Duration,
    },
    CancelUpload {
        job_id: crate::JobId,
    },
    /// One-off acknowledgement for the user, e.g. a dialog.
    ShowNotice(String),
}
