use std::fmt;
use std::time::Duration;

/// Detailed report returned by
/// [`RuleSet::apply_detailed()`](super::ruleset::RuleSet::apply_detailed).
///
/// Lists the rules that fired, every predicate that was actually invoked in
/// call order (short-circuited predicates are absent), and the wall-clock
/// duration of the pass.
#[derive(Debug, Clone)]
#[must_use]
pub struct EvaluationReport {
    fired: Vec<String>,
    calls: Vec<String>,
    duration: Duration,
}

impl EvaluationReport {
    pub(crate) fn new(fired: Vec<String>, calls: Vec<String>, duration: Duration) -> Self {
        Self {
            fired,
            calls,
            duration,
        }
    }

    /// Names of rules whose condition held, in rule order.
    #[must_use]
    pub fn fired(&self) -> &[String] {
        &self.fired
    }

    /// Predicate names in the order they were invoked.
    #[must_use]
    pub fn calls(&self) -> &[String] {
        &self.calls
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fired: [{}]", self.fired.join(", "))?;
        write!(f, ", calls: [{}]", self.calls.join(", "))?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_accessors() {
        let report = EvaluationReport::new(
            vec!["r1".into()],
            vec!["cheap".into(), "heavy".into()],
            Duration::from_nanos(500),
        );
        assert_eq!(report.fired(), &["r1"]);
        assert_eq!(report.calls(), &["cheap", "heavy"]);
        assert_eq!(report.duration(), Duration::from_nanos(500));
    }

    #[test]
    fn report_display() {
        let report = EvaluationReport::new(vec![], vec!["p".into()], Duration::from_nanos(100));
        let s = report.to_string();
        assert!(s.contains("fired: []"));
        assert!(s.contains("calls: [p]"));
    }
}
