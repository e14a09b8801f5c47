use ingestion_core::{AppViewModel, JobPhase};

const BAR_WIDTH: usize = 20;

/// One status line for the current view.
pub fn render(view: &AppViewModel) -> String {
    let selection = match &view.selected_path {
        Some(path) => path.display().to_string(),
        None => "(drop a file)".to_string(),
    };
    format!("Selected: {} | {}", selection, job_text(view))
}

fn job_text(view: &AppViewModel) -> String {
    let job = &view.job;
    match job.phase {
        JobPhase::Idle => "Idle".to_string(),
        JobPhase::Starting => "Starting...".to_string(),
        JobPhase::Running if job.step == 0 => format!("{} 0% done...", bar(0)),
        JobPhase::Running => format!("{} {}", bar(job.percent), job.message),
        JobPhase::Cancelling => format!("{} cancelling...", bar(job.percent)),
        JobPhase::Completed => "Finished".to_string(),
        JobPhase::Cancelled => format!("Cancelled at step {}/{}", job.step, job.total_steps),
        JobPhase::Failed => "Failed".to_string(),
    }
}

fn bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * BAR_WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use ingestion_core::JobView;

    use super::*;

    #[test]
    fn idle_without_selection() {
        let view = AppViewModel::default();
        assert_eq!(render(&view), "Selected: (drop a file) | Idle");
    }

    #[test]
    fn running_shows_bar_and_message() {
        let view = AppViewModel {
            selected_path: Some(PathBuf::from("/data/a.csv")),
            job: JobView {
                job_id: Some(1),
                phase: JobPhase::Running,
                step: 50,
                total_steps: 100,
                percent: 50,
                message: "50% done...".to_string(),
            },
            ..AppViewModel::default()
        };
        assert_eq!(
            render(&view),
            "Selected: /data/a.csv | [##########..........] 50% done..."
        );
    }

    #[test]
    fn cancelled_reports_the_step_reached() {
        let view = AppViewModel {
            job: JobView {
                phase: JobPhase::Cancelled,
                step: 2,
                total_steps: 5,
                ..JobView::default()
            },
            ..AppViewModel::default()
        };
        assert!(render(&view).ends_with("Cancelled at step 2/5"));
    }
}
