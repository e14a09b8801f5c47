use std::fmt;

pub type JobId = u64;

/// Lifecycle of a single job.
///
/// Transitions only move forward: `Idle -> Running -> (CancelRequested) ->
/// (Completed | Cancelled | Failed)`. The three last states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Idle,
    Running,
    CancelRequested,
    Completed,
    Cancelled,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Cancelled | JobStatus::Failed
        )
    }

    pub fn can_transition_to(self, next: JobStatus) -> bool {
        use JobStatus::*;
        match (self, next) {
            (Idle, Running) => true,
            (Running, CancelRequested) => true,
            (Running | CancelRequested, Completed | Cancelled | Failed) => true,
            _ => false,
        }
    }

    pub(crate) fn to_u8(self) -> u8 {
        match self {
            JobStatus::Idle => 0,
            JobStatus::Running => 1,
            JobStatus::CancelRequested => 2,
            JobStatus::Completed => 3,
            JobStatus::Cancelled => 4,
            JobStatus::Failed => 5,
        }
    }

    pub(crate) fn from_u8(raw: u8) -> Self {
        match raw {
            1 => JobStatus::Running,
            2 => JobStatus::CancelRequested,
            3 => JobStatus::Completed,
            4 => JobStatus::Cancelled,
            5 => JobStatus::Failed,
            _ => JobStatus::Idle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobProgress {
    pub job_id: JobId,
    pub step: u32,
    pub total_steps: u32,
    pub percent: u8,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed,
    Cancelled { steps_done: u32 },
    Failed { message: String },
}

impl JobOutcome {
    pub fn status(&self) -> JobStatus {
        match self {
            JobOutcome::Completed => JobStatus::Completed,
            JobOutcome::Cancelled { .. } => JobStatus::Cancelled,
            JobOutcome::Failed { .. } => JobStatus::Failed,
        }
    }
}

impl fmt::Display for JobOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobOutcome::Completed => write!(f, "completed"),
            JobOutcome::Cancelled { steps_done } => {
                write!(f, "cancelled after {steps_done} steps")
            }
            JobOutcome::Failed { message } => write!(f, "failed: {message}"),
        }
    }
}

/// Everything the engine reports back to its owner.
///
/// For one job, `Progress` events arrive in increasing step order and
/// `JobFinished` is always the last event, sent exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Progress(JobProgress),
    JobFinished { job_id: JobId, outcome: JobOutcome },
}
