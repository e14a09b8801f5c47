use std::time::Duration;

use crate::EngineError;

pub const DEFAULT_TOTAL_STEPS: u32 = 100;
pub const DEFAULT_STEP_DELAY: Duration = Duration::from_millis(100);

/// Shape of a job: how many steps it has and how long each one takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobPlan {
    total_steps: u32,
    step_delay: Duration,
}

impl JobPlan {
    pub fn new(total_steps: u32, step_delay: Duration) -> Result<Self, EngineError> {
        if total_steps == 0 {
            return Err(EngineError::InvalidStepCount);
        }
        Ok(Self {
            total_steps,
            step_delay,
        })
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    pub fn step_delay(&self) -> Duration {
        self.step_delay
    }
}

impl Default for JobPlan {
    fn default() -> Self {
        Self {
            total_steps: DEFAULT_TOTAL_STEPS,
            step_delay: DEFAULT_STEP_DELAY,
        }
    }
}

/// Percentage of `total` reached after `step`. Rounds down, but any step
/// past zero reads at least 1% and only the last step reads 100%.
pub fn percent_of(step: u32, total: u32) -> u8 {
    if total == 0 || step == 0 {
        return 0;
    }
    let step = u64::from(step.min(total));
    (step * 100 / u64::from(total)).max(1) as u8
}

pub fn progress_message(percent: u8) -> String {
    format!("{percent}% done...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_steps_is_rejected() {
        assert!(matches!(
            JobPlan::new(0, Duration::ZERO),
            Err(EngineError::InvalidStepCount)
        ));
    }

    #[test]
    fn default_plan_is_the_demo_upload() {
        let plan = JobPlan::default();
        assert_eq!(plan.total_steps(), 100);
        assert_eq!(plan.step_delay(), Duration::from_millis(100));
    }

    #[test]
    fn percent_matches_step_for_hundred_steps() {
        assert_eq!(percent_of(1, 100), 1);
        assert_eq!(percent_of(57, 100), 57);
        assert_eq!(percent_of(100, 100), 100);
    }

    #[test]
    fn percent_rounds_down_and_clamps() {
        assert_eq!(percent_of(1, 3), 33);
        assert_eq!(percent_of(2, 3), 66);
        assert_eq!(percent_of(3, 3), 100);
        assert_eq!(percent_of(9, 3), 100);
        assert_eq!(percent_of(1, 0), 0);
    }

    #[test]
    fn long_plans_never_report_zero_for_a_finished_step() {
        assert_eq!(percent_of(0, 1000), 0);
        assert_eq!(percent_of(1, 1000), 1);
        assert_eq!(percent_of(19, 1000), 1);
        assert_eq!(percent_of(20, 1000), 2);
        assert_eq!(percent_of(999, 1000), 99);
        assert_eq!(percent_of(1000, 1000), 100);
    }

    #[test]
    fn message_format() {
        assert_eq!(progress_message(42), "42% done...");
    }
}
