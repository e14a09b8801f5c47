use std::any::Any;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use ingestion_logging::{ingest_error, ingest_info, ingest_warn};
use tokio::runtime::Runtime;

use crate::job::JobShared;
use crate::task::ChannelProgressSink;
use crate::{
    EngineError, EngineEvent, JobHandle, JobId, JobOutcome, JobPlan, JobStatus, ProgressSink,
    SimulatedUpload, Task, TaskContext, TaskError, TaskOutcome,
};

enum EngineCommand {
    Run {
        shared: Arc<JobShared>,
        plan: JobPlan,
        task: Arc<dyn Task>,
    },
}

/// Runs one background job at a time and reports its progress over a
/// channel the owner drains from its own thread.
pub struct JobRunner {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    active: Option<JobHandle>,
    next_job_id: JobId,
}

impl JobRunner {
    pub fn new() -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("ingestion-worker")
            .enable_time()
            .build()?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::Builder::new()
            .name("ingestion-engine".to_string())
            .spawn(move || drive(runtime, cmd_rx, event_tx))?;

        Ok(Self {
            cmd_tx,
            event_rx,
            active: None,
            next_job_id: 0,
        })
    }

    /// Starts the simulated upload described by `plan`.
    pub fn start(&mut self, plan: JobPlan) -> Result<JobHandle, EngineError> {
        self.start_task(plan, Arc::new(SimulatedUpload))
    }

    /// Starts `task` in the background. Fails if the previous job has not
    /// reached a terminal state yet.
    pub fn start_task(
        &mut self,
        plan: JobPlan,
        task: Arc<dyn Task>,
    ) -> Result<JobHandle, EngineError> {
        if let Some(active) = &self.active {
            if !active.is_terminal() {
                ingest_warn!(
                    "Rejected start: job {} is still {:?}",
                    active.id(),
                    active.status()
                );
                return Err(EngineError::JobAlreadyActive {
                    job_id: active.id(),
                });
            }
        }

        let job_id = self.next_job_id + 1;
        let shared = Arc::new(JobShared::new(job_id, plan.total_steps()));
        let handle = JobHandle::new(shared.clone());
        self.cmd_tx
            .send(EngineCommand::Run { shared, plan, task })
            .map_err(|_| EngineError::EngineStopped)?;
        self.next_job_id = job_id;
        self.active = Some(handle.clone());

        ingest_info!(
            "Started job {} steps={} step_delay={:?}",
            job_id,
            plan.total_steps(),
            plan.step_delay()
        );
        Ok(handle)
    }

    pub fn request_cancel(&self, handle: &JobHandle) -> bool {
        let accepted = handle.request_cancel();
        if accepted {
            ingest_info!(
                "Cancel requested for job {} at step {}",
                handle.id(),
                handle.current_step()
            );
        }
        accepted
    }

    /// Cancels the current job if one is running; a no-op otherwise.
    pub fn cancel_active(&self) -> bool {
        match &self.active {
            Some(handle) => self.request_cancel(handle),
            None => false,
        }
    }

    pub fn active(&self) -> Option<&JobHandle> {
        self.active.as_ref()
    }

    pub fn status(&self) -> JobStatus {
        self.active
            .as_ref()
            .map_or(JobStatus::Idle, JobHandle::status)
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

fn drive(
    runtime: Runtime,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::Run { shared, plan, task } => {
                let event_tx = event_tx.clone();
                runtime.spawn(run_job(shared, plan, task, event_tx));
            }
        }
    }
}

/// Sink used by the runner: records the step on the shared job state before
/// forwarding the event.
struct TrackingSink<'a> {
    shared: &'a JobShared,
    inner: ChannelProgressSink,
}

impl ProgressSink for TrackingSink<'_> {
    fn emit(&self, event: EngineEvent) {
        if let EngineEvent::Progress(progress) = &event {
            self.shared.advance_to(progress.step);
        }
        self.inner.emit(event);
    }
}

async fn run_job(
    shared: Arc<JobShared>,
    plan: JobPlan,
    task: Arc<dyn Task>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let job_id = shared.id;
    let worker = {
        let shared = shared.clone();
        let event_tx = event_tx.clone();
        tokio::spawn(async move {
            let sink = TrackingSink {
                shared: &shared,
                inner: ChannelProgressSink::new(event_tx),
            };
            let ctx = TaskContext::new(shared.id, plan, &shared.cancel, &sink);
            task.run(&ctx).await
        })
    };

    let outcome = match worker.await {
        Ok(Ok(TaskOutcome::Completed)) => JobOutcome::Completed,
        Ok(Ok(TaskOutcome::Cancelled)) => JobOutcome::Cancelled {
            steps_done: shared.current_step(),
        },
        Ok(Err(TaskError { message })) => {
            ingest_error!("Job {} failed: {}", job_id, message);
            JobOutcome::Failed { message }
        }
        Err(err) if err.is_panic() => {
            let message = panic_message(err.into_panic());
            ingest_error!("Job {} worker panicked: {}", job_id, message);
            JobOutcome::Failed { message }
        }
        Err(err) => {
            ingest_error!("Job {} worker aborted: {}", job_id, err);
            JobOutcome::Failed {
                message: err.to_string(),
            }
        }
    };

    shared.finish(outcome.status());
    ingest_info!("Job {} {}", job_id, outcome);
    let _ = event_tx.send(EngineEvent::JobFinished { job_id, outcome });
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "worker panicked".to_string()
    }
}
