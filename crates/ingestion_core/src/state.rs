use std::path::PathBuf;
use std::time::Duration;

use crate::view_model::{AppViewModel, JobView};

pub type JobId = u64;

pub const COMPLETION_NOTICE: &str = "Demo finished.";
const DEFAULT_TOTAL_STEPS: u32 = 100;
const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobPhase {
    #[default]
    Idle,
    /// Start requested, engine has not answered yet.
    Starting,
    Running,
    Cancelling,
    Completed,
    Cancelled,
    Failed,
}

impl JobPhase {
    /// A job in one of these phases blocks another start.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            JobPhase::Starting | JobPhase::Running | JobPhase::Cancelling
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobResultKind {
    Completed,
    Cancelled,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    selected_path: Option<PathBuf>,
    total_steps: u32,
    step_delay: Duration,
    job: JobView,
    last_notice: Option<String>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_plan(DEFAULT_TOTAL_STEPS, DEFAULT_STEP_DELAY)
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State whose start button launches `total_steps` steps of `step_delay`.
    pub fn with_plan(total_steps: u32, step_delay: Duration) -> Self {
        Self {
            selected_path: None,
            total_steps: total_steps.max(1),
            step_delay,
            job: JobView::default(),
            last_notice: None,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let phase = self.job.phase;
        AppViewModel {
            selected_path: self.selected_path.clone(),
            job: self.job.clone(),
            start_enabled: !phase.is_active(),
            cancel_enabled: matches!(phase, JobPhase::Running),
            last_notice: self.last_notice.clone(),
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> JobPhase {
        self.job.phase
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn plan(&self) -> (u32, Duration) {
        (self.total_steps, self.step_delay)
    }

    pub(crate) fn active_job_id(&self) -> Option<JobId> {
        self.job.job_id.filter(|_| self.job.phase.is_active())
    }

    pub(crate) fn set_selection(&mut self, path: PathBuf) {
        self.selected_path = Some(path);
        self.dirty = true;
    }

    pub(crate) fn begin_start(&mut self) {
        self.job = JobView {
            phase: JobPhase::Starting,
            total_steps: self.total_steps,
            ..JobView::default()
        };
        self.dirty = true;
    }

    pub(crate) fn mark_started(&mut self, job_id: JobId) {
        self.job.job_id = Some(job_id);
        self.job.phase = JobPhase::Running;
        self.dirty = true;
    }

    pub(crate) fn mark_rejected(&mut self, reason: String) {
        self.job = JobView::default();
        self.last_notice = Some(reason);
        self.dirty = true;
    }

    pub(crate) fn mark_cancelling(&mut self) {
        self.job.phase = JobPhase::Cancelling;
        self.dirty = true;
    }

    /// Returns `false` for steps that do not move the job forward.
    pub(crate) fn apply_progress(
        &mut self,
        step: u32,
        total_steps: u32,
        percent: u8,
        message: String,
    ) -> bool {
        if step <= self.job.step {
            return false;
        }
        self.job.step = step;
        self.job.total_steps = total_steps;
        self.job.percent = percent;
        self.job.message = message;
        self.dirty = true;
        true
    }

    pub(crate) fn apply_finished(&mut self, result: &JobResultKind) {
        self.job.phase = match result {
            JobResultKind::Completed => JobPhase::Completed,
            JobResultKind::Cancelled => JobPhase::Cancelled,
            JobResultKind::Failed(_) => JobPhase::Failed,
        };
        self.dirty = true;
    }

    pub(crate) fn set_notice(&mut self, notice: String) {
        self.last_notice = Some(notice);
        self.dirty = true;
    }
}
