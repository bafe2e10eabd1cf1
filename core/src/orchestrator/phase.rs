//! Run lifecycle phases

use std::fmt;

/// Where a run is in its lifecycle
///
/// Transitions are driven only by queue closure and done signal counts:
/// `Starting -> Running -> Draining -> AllDone -> Reporting -> Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunPhase {
    /// Channels and workers are being set up
    Starting,
    /// Producer and workers are active
    Running,
    /// Producer closed the queue; workers finish what is buffered
    Draining,
    /// Every worker sent its done signal
    AllDone,
    /// Final statistics are being computed
    Reporting,
    /// The run is over; no further work is accepted
    Terminated,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunPhase::Starting => "starting",
            RunPhase::Running => "running",
            RunPhase::Draining => "draining",
            RunPhase::AllDone => "all_done",
            RunPhase::Reporting => "reporting",
            RunPhase::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order() {
        assert!(RunPhase::Starting < RunPhase::Running);
        assert!(RunPhase::Running < RunPhase::Draining);
        assert!(RunPhase::Draining < RunPhase::AllDone);
        assert!(RunPhase::AllDone < RunPhase::Reporting);
        assert!(RunPhase::Reporting < RunPhase::Terminated);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(RunPhase::AllDone.to_string(), "all_done");
        assert_eq!(RunPhase::Terminated.to_string(), "terminated");
    }
}
