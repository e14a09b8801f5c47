use std::io;

use thiserror::Error;

use crate::JobId;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("a job needs at least one step")]
    InvalidStepCount,
    #[error("job {job_id} is already active")]
    JobAlreadyActive { job_id: JobId },
    #[error("engine worker is no longer running")]
    EngineStopped,
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] io::Error),
}
