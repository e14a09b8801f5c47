use ingestion_logging::{ingest_debug, ingest_info};

use crate::{Task, TaskContext, TaskError, TaskOutcome, WaitResult};

/// Stand-in for the real upload: every step is a timed wait with no I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedUpload;

#[async_trait::async_trait]
impl Task for SimulatedUpload {
    async fn run(&self, ctx: &TaskContext<'_>) -> Result<TaskOutcome, TaskError> {
        let plan = ctx.plan();
        let mut step = 0;
        while step < plan.total_steps() {
            if ctx.is_cancel_requested() {
                ingest_info!(
                    "Job {} stopping at step boundary {}/{}",
                    ctx.job_id(),
                    step,
                    plan.total_steps()
                );
                return Ok(TaskOutcome::Cancelled);
            }
            match ctx.wait(plan.step_delay()).await {
                WaitResult::Elapsed => {
                    step += 1;
                    ctx.report_step(step);
                }
                // Not an error: the step does not count and the loop re-checks.
                WaitResult::Interrupted => {
                    ingest_debug!("Job {} wait for step {} interrupted", ctx.job_id(), step + 1);
                }
            }
        }
        Ok(TaskOutcome::Completed)
    }
}
