use ingestion_core::{Effect, JobResultKind, Msg};
use ingestion_engine::{EngineError, EngineEvent, JobOutcome, JobPlan, JobRunner};
use ingestion_logging::{ingest_info, ingest_warn};

/// What the shell has to act on after running a batch of effects.
#[derive(Debug, Default)]
pub struct EffectFeedback {
    pub msgs: Vec<Msg>,
    pub notices: Vec<String>,
}

/// Executes core effects against the job engine and turns engine events
/// back into core messages.
pub struct EffectRunner {
    engine: JobRunner,
}

impl EffectRunner {
    pub fn new() -> Result<Self, EngineError> {
        Ok(Self {
            engine: JobRunner::new()?,
        })
    }

    pub fn run(&mut self, effects: Vec<Effect>) -> EffectFeedback {
        let mut feedback = EffectFeedback::default();
        for effect in effects {
            match effect {
                Effect::StartUpload {
                    total_steps,
                    step_delay,
                } => {
                    let started = JobPlan::new(total_steps, step_delay)
                        .and_then(|plan| self.engine.start(plan));
                    feedback.msgs.push(match started {
                        Ok(handle) => Msg::JobStarted {
                            job_id: handle.id(),
                        },
                        Err(err) => {
                            ingest_warn!("StartUpload rejected: {}", err);
                            Msg::StartRejected {
                                reason: err.to_string(),
                            }
                        }
                    });
                }
                Effect::CancelUpload { job_id } => match self.engine.active() {
                    Some(handle) if handle.id() == job_id => {
                        self.engine.request_cancel(handle);
                    }
                    _ => ingest_warn!("CancelUpload for unknown job {}", job_id),
                },
                Effect::ShowNotice(text) => feedback.notices.push(text),
            }
        }
        feedback
    }

    /// Drains every engine event that is ready, without blocking.
    pub fn poll(&self) -> Vec<Msg> {
        let mut msgs = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            msgs.push(map_event(event));
        }
        msgs
    }

    pub fn shutdown(&self) {
        if self.engine.cancel_active() {
            ingest_info!("Cancelled running job on shutdown");
        }
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Progress(progress) => Msg::JobProgress {
            job_id: progress.job_id,
            step: progress.step,
            total_steps: progress.total_steps,
            percent: progress.percent,
            message: progress.message,
        },
        EngineEvent::JobFinished { job_id, outcome } => Msg::JobFinished {
            job_id,
            result: map_outcome(outcome),
        },
    }
}

fn map_outcome(outcome: JobOutcome) -> JobResultKind {
    match outcome {
        JobOutcome::Completed => JobResultKind::Completed,
        JobOutcome::Cancelled { .. } => JobResultKind::Cancelled,
        JobOutcome::Failed { message } => JobResultKind::Failed(message),
    }
}
