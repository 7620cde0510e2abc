//! Progress snapshots and the final run summary.

use std::fmt;

use crate::task::TaskOutcome;

/// Counts at one point during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub completed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total: usize,
}

impl ProgressSnapshot {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }
}

impl fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.succeeded, self.total)
    }
}

/// Final tally after the scheduler has finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// One outcome per task, ordered by sequence index.
    pub outcomes: Vec<TaskOutcome>,
}

impl RunSummary {
    pub(crate) fn from_outcomes(total: usize, mut outcomes: Vec<TaskOutcome>) -> Self {
        outcomes.sort_by_key(|o| o.sequence_index);
        let succeeded = outcomes.iter().filter(|o| o.success).count();
        Self {
            total,
            succeeded,
            failed: outcomes.len() - succeeded,
            outcomes,
        }
    }

    /// True when every task ran and succeeded. A run with no tasks counts.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0 && self.succeeded == self.total
    }

    /// Process exit status: 0 on full success, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.all_succeeded() {
            0
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_run_succeeds() {
        let summary = RunSummary::from_outcomes(0, Vec::new());
        assert!(summary.all_succeeded());
        assert_eq!(summary.exit_code(), 0);
    }

    #[test]
    fn test_any_failure_is_nonzero() {
        let summary = RunSummary::from_outcomes(
            2,
            vec![
                TaskOutcome::failed(1, "boom"),
                TaskOutcome::succeeded(0, 512, 512, 5),
            ],
        );
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.exit_code(), 1);
        assert_eq!(summary.outcomes[0].sequence_index, 0);
    }

    #[test]
    fn test_missing_outcomes_is_nonzero() {
        let summary = RunSummary::from_outcomes(2, vec![TaskOutcome::succeeded(0, 1, 1, 1)]);
        assert_eq!(summary.exit_code(), 1);
    }

    #[test]
    fn test_snapshot_display() {
        let snapshot = ProgressSnapshot {
            completed: 3,
            succeeded: 2,
            failed: 1,
            total: 5,
        };
        assert_eq!(snapshot.to_string(), "2/5");
    }
}
