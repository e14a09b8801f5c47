use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{JobId, JobStatus};

/// State shared between a running job and the handles that observe it.
///
/// The worker is the only writer of `status` and `current_step`; the owner
/// is the only one raising `cancel`.
#[derive(Debug)]
pub(crate) struct JobShared {
    pub(crate) id: JobId,
    pub(crate) total_steps: u32,
    status: AtomicU8,
    current_step: AtomicU32,
    pub(crate) cancel: CancellationToken,
}

impl JobShared {
    pub(crate) fn new(id: JobId, total_steps: u32) -> Self {
        Self {
            id,
            total_steps,
            status: AtomicU8::new(JobStatus::Running.to_u8()),
            current_step: AtomicU32::new(0),
            cancel: CancellationToken::new(),
        }
    }

    pub(crate) fn stored_status(&self) -> JobStatus {
        JobStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    pub(crate) fn current_step(&self) -> u32 {
        self.current_step.load(Ordering::Acquire)
    }

    /// Step indices never move backwards.
    pub(crate) fn advance_to(&self, step: u32) {
        self.current_step.fetch_max(step, Ordering::AcqRel);
    }

    /// Moves a running job into a terminal state. Returns `false` if the job
    /// had already finished.
    pub(crate) fn finish(&self, terminal: JobStatus) -> bool {
        debug_assert!(JobStatus::Running.can_transition_to(terminal));
        self.status
            .compare_exchange(
                JobStatus::Running.to_u8(),
                terminal.to_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}

/// Read-only view of a job plus the right to ask it to stop.
#[derive(Debug, Clone)]
pub struct JobHandle {
    shared: Arc<JobShared>,
}

impl JobHandle {
    pub(crate) fn new(shared: Arc<JobShared>) -> Self {
        Self { shared }
    }

    pub fn id(&self) -> JobId {
        self.shared.id
    }

    pub fn total_steps(&self) -> u32 {
        self.shared.total_steps
    }

    pub fn current_step(&self) -> u32 {
        self.shared.current_step()
    }

    pub fn status(&self) -> JobStatus {
        let stored = self.shared.stored_status();
        if stored == JobStatus::Running && self.shared.cancel.is_cancelled() {
            JobStatus::CancelRequested
        } else {
            stored
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status().is_terminal()
    }

    /// Flags the job for cancellation. The worker notices at its next step
    /// boundary. Returns `false` when the job is not running any more.
    pub fn request_cancel(&self) -> bool {
        if self.status() != JobStatus::Running {
            return false;
        }
        self.shared.cancel.cancel();
        true
    }
}
