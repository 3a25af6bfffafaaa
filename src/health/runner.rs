//! Runs diagnostic checks and collects their results

use std::time::Instant;

use tracing::debug;

use super::check::{CheckResult, CheckStatus, SystemCheck};
use crate::engine::Game;

/// Results from running a set of checks
#[derive(Debug, Default)]
pub struct HealthCheckReport {
    /// Results keyed by check name, in run order
    pub results: Vec<(String, CheckResult)>,
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,
}

impl HealthCheckReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Returns true if no check failed
    pub fn is_healthy(&self) -> bool {
        self.failed == 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warned > 0
    }

    /// Process exit code: 0 = all pass, 1 = any fail, 2 = any warn (but no fail)
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            1
        } else if self.warned > 0 {
            2
        } else {
            0
        }
    }

    pub fn result(&self, name: &str) -> Option<&CheckResult> {
        self.results
            .iter()
            .find(|(check, _)| check == name)
            .map(|(_, result)| result)
    }

    fn record(&mut self, name: &str, result: CheckResult) {
        match result.status {
            CheckStatus::Pass => self.passed += 1,
            CheckStatus::Warn => self.warned += 1,
            CheckStatus::Fail => self.failed += 1,
        }
        self.results.push((name.to_string(), result));
    }
}

/// Ordered list of checks to run against one engine
pub struct HealthCheckRunner<S: 'static> {
    checks: Vec<Box<dyn SystemCheck<S>>>,
}

impl<S: 'static> HealthCheckRunner<S> {
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    pub fn add_check<C: SystemCheck<S> + 'static>(mut self, check: C) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn run(&self, game: &Game<S>) -> HealthCheckReport {
        let mut report = HealthCheckReport::default();
        for check in &self.checks {
            let start = Instant::now();
            let result = check.check(game).with_duration(start.elapsed());
            debug!(check = check.name(), status = ?result.status, "Ran check");
            report.record(check.name(), result);
        }
        report
    }
}

impl<S: 'static> Default for HealthCheckRunner<S> {
    fn default() -> Self {
        Self::new()
    }
}
