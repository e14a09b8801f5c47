//! Ingestion engine: cancellable background jobs with progress reporting.
mod engine;
mod error;
mod job;
mod plan;
mod task;
mod types;
mod upload;

pub use engine::JobRunner;
pub use error::EngineError;
pub use job::JobHandle;
pub use plan::{percent_of, progress_message, JobPlan, DEFAULT_STEP_DELAY, DEFAULT_TOTAL_STEPS};
pub use task::{
    ChannelProgressSink, ProgressSink, Task, TaskContext, TaskError, TaskOutcome, WaitResult,
};
pub use types::{EngineEvent, JobId, JobOutcome, JobProgress, JobStatus};
pub use upload::SimulatedUpload;
