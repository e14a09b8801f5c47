use std::path::PathBuf;

use crate::{JobId, JobPhase};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub selected_path: Option<PathBuf>,
    pub job: JobView,
    pub start_enabled: bool,
    pub cancel_enabled: bool,
    pub last_notice: Option<String>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobView {
    pub job_id: Option<JobId>,
    pub phase: JobPhase,
    pub step: u32,
    pub total_steps: u32,
    pub percent: u8,
    pub message: String,
}
