use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc;
use std::time::Duration;

use ingestion_logging::ingest_warn;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::plan::{percent_of, progress_message};
use crate::{EngineEvent, JobId, JobPlan, JobProgress};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Forwards events to the owner's channel; a closed channel drops them.
pub struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TaskError {
    pub message: String,
}

impl TaskError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// How a step wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitResult {
    Elapsed,
    Interrupted,
}

/// A unit of background work, run once per job on the engine's runtime.
#[async_trait::async_trait]
pub trait Task: Send + Sync {
    async fn run(&self, ctx: &TaskContext<'_>) -> Result<TaskOutcome, TaskError>;
}

/// Capabilities a task gets while it runs: the cancellation check, progress
/// emission and an interruptible wait.
pub struct TaskContext<'a> {
    job_id: JobId,
    plan: JobPlan,
    cancel: &'a CancellationToken,
    sink: &'a dyn ProgressSink,
    last_step: AtomicU32,
}

impl<'a> TaskContext<'a> {
    pub fn new(
        job_id: JobId,
        plan: JobPlan,
        cancel: &'a CancellationToken,
        sink: &'a dyn ProgressSink,
    ) -> Self {
        Self {
            job_id,
            plan,
            cancel,
            sink,
            last_step: AtomicU32::new(0),
        }
    }

    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    pub fn plan(&self) -> JobPlan {
        self.plan
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn last_reported_step(&self) -> u32 {
        self.last_step.load(Ordering::Acquire)
    }

    /// Reports `step` with the standard "<percent>% done..." message.
    pub fn report_step(&self, step: u32) -> bool {
        let percent = percent_of(step, self.plan.total_steps());
        self.report_progress(step, progress_message(percent))
    }

    /// Emits a progress event. Steps must be strictly increasing and within
    /// the plan; anything else is dropped and `false` returned.
    pub fn report_progress(&self, step: u32, message: impl Into<String>) -> bool {
        let total_steps = self.plan.total_steps();
        let last = self.last_reported_step();
        if step <= last || step > total_steps {
            ingest_warn!(
                "Job {} dropped out-of-order progress step={} last={} total={}",
                self.job_id,
                step,
                last,
                total_steps
            );
            return false;
        }
        self.last_step.store(step, Ordering::Release);
        self.sink.emit(EngineEvent::Progress(JobProgress {
            job_id: self.job_id,
            step,
            total_steps,
            percent: percent_of(step, total_steps),
            message: message.into(),
        }));
        true
    }

    /// Sleeps for `delay` unless a cancel request arrives first.
    pub async fn wait(&self, delay: Duration) -> WaitResult {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => WaitResult::Interrupted,
            _ = tokio::time::sleep(delay) => WaitResult::Elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct VecSink {
        events: Mutex<Vec<EngineEvent>>,
    }

    impl ProgressSink for VecSink {
        fn emit(&self, event: EngineEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn out_of_order_steps_are_dropped() {
        let token = CancellationToken::new();
        let sink = VecSink::default();
        let plan = JobPlan::new(3, Duration::ZERO).unwrap();
        let ctx = TaskContext::new(1, plan, &token, &sink);

        assert!(ctx.report_step(1));
        assert!(!ctx.report_step(1));
        assert!(ctx.report_step(3));
        assert!(!ctx.report_step(2));
        assert!(!ctx.report_step(4));
        assert_eq!(sink.events.lock().unwrap().len(), 2);
        assert_eq!(ctx.last_reported_step(), 3);
    }

    #[test]
    fn progress_carries_percent_and_message() {
        let token = CancellationToken::new();
        let sink = VecSink::default();
        let plan = JobPlan::new(4, Duration::ZERO).unwrap();
        let ctx = TaskContext::new(9, plan, &token, &sink);

        ctx.report_step(1);
        let events = sink.events.lock().unwrap();
        assert_eq!(
            events[0],
            EngineEvent::Progress(JobProgress {
                job_id: 9,
                step: 1,
                total_steps: 4,
                percent: 25,
                message: "25% done...".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn wait_is_interrupted_by_cancel() {
        let token = CancellationToken::new();
        let sink = VecSink::default();
        let ctx = TaskContext::new(1, JobPlan::default(), &token, &sink);

        token.cancel();
        assert_eq!(ctx.wait(Duration::from_secs(60)).await, WaitResult::Interrupted);
    }

    #[tokio::test]
    async fn wait_elapses_without_cancel() {
        let token = CancellationToken::new();
        let sink = VecSink::default();
        let ctx = TaskContext::new(1, JobPlan::default(), &token, &sink);

        assert_eq!(ctx.wait(Duration::from_millis(1)).await, WaitResult::Elapsed);
        assert!(!ctx.is_cancel_requested());
    }
}
