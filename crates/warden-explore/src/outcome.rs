/// Result of testing one candidate against an automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackOutcome {
    pub candidate: String,
    pub accepted: bool,
    /// 0-based position of the candidate in the run's order.
    pub index: u64,
}

/// Receives every per-candidate outcome of a sequential run.
///
/// Row writers (CSV, console) implement this outside the core.
pub trait OutcomeSink {
    fn observe(&mut self, outcome: &AttackOutcome);
}

/// Discards every outcome.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl OutcomeSink for NullSink {
    fn observe(&mut self, _outcome: &AttackOutcome) {}
}

impl OutcomeSink for Vec<AttackOutcome> {
    fn observe(&mut self, outcome: &AttackOutcome) {
        self.push(outcome.clone());
    }
}

/// Adapts a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F: FnMut(&AttackOutcome)> OutcomeSink for FnSink<F> {
    fn observe(&mut self, outcome: &AttackOutcome) {
        (self.0)(outcome)
    }
}
