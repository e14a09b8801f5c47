use ingestion_logging::{ingest_debug, ingest_info};

use crate::{AppState, Effect, JobPhase, JobResultKind, Msg, COMPLETION_NOTICE};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SelectionChanged(path) => {
            state.set_selection(path);
            Vec::new()
        }
        Msg::StartClicked => {
            // Single-job contract: a second start is dropped here before it
            // ever reaches the engine.
            if state.phase().is_active() {
                ingest_debug!("Start ignored: job is {:?}", state.phase());
                Vec::new()
            } else {
                state.begin_start();
                let (total_steps, step_delay) = state.plan();
                vec![Effect::StartUpload {
                    total_steps,
                    step_delay,
                }]
            }
        }
        Msg::CancelClicked => match state.active_job_id() {
            Some(job_id) if state.phase() == JobPhase::Running => {
                state.mark_cancelling();
                vec![Effect::CancelUpload { job_id }]
            }
            _ => {
                ingest_debug!("Cancel ignored: job is {:?}", state.phase());
                Vec::new()
            }
        },
        Msg::JobStarted { job_id } => {
            if state.phase() == JobPhase::Starting {
                state.mark_started(job_id);
            }
            Vec::new()
        }
        Msg::StartRejected { reason } => {
            if state.phase() == JobPhase::Starting {
                ingest_info!("Start rejected: {}", reason);
                state.mark_rejected(reason);
            }
            Vec::new()
        }
        Msg::JobProgress {
            job_id,
            step,
            total_steps,
            percent,
            message,
        } => {
            if state.active_job_id() == Some(job_id) {
                state.apply_progress(step, total_steps, percent, message);
            }
            Vec::new()
        }
        Msg::JobFinished { job_id, result } => {
            if state.active_job_id() != Some(job_id) {
                return (state, Vec::new());
            }
            state.apply_finished(&result);
            match result {
                JobResultKind::Completed => {
                    state.set_notice(COMPLETION_NOTICE.to_string());
                    vec![Effect::ShowNotice(COMPLETION_NOTICE.to_string())]
                }
                JobResultKind::Cancelled => Vec::new(),
                JobResultKind::Failed(message) => {
                    let notice = format!("Upload failed: {message}");
                    state.set_notice(notice.clone());
                    vec![Effect::ShowNotice(notice)]
                }
            }
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
