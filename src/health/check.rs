//! Diagnostic check trait and result types

use std::time::Duration;

use colored::Colorize;

use crate::engine::Game;

/// Outcome of one check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    /// Usable, but probably not what was intended
    Warn,
    /// The engine would refuse to run, or misbehave
    Fail,
}

impl CheckStatus {
    /// Returns true if the check passed (Pass or Warn)
    pub fn is_ok(&self) -> bool {
        !self.is_fail()
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, CheckStatus::Fail)
    }

    /// Returns the status as a colored label
    pub fn as_colored_str(&self) -> String {
        match self {
            CheckStatus::Pass => "PASS".green().to_string(),
            CheckStatus::Warn => "WARN".yellow().to_string(),
            CheckStatus::Fail => "FAIL".red().to_string(),
        }
    }
}

/// Result of a check, with one detail line per finding
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub status: CheckStatus,
    pub message: String,
    pub details: Vec<String>,
    pub duration: Duration,
}

impl CheckResult {
    fn new(status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    pub fn pass(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Pass, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Warn, message)
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Fail, message)
    }

    pub fn with_details<I, D>(mut self, details: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<String>,
    {
        self.details.extend(details.into_iter().map(Into::into));
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// A diagnostic over a constructed engine, run before the main loop
pub trait SystemCheck<S: 'static> {
    /// Name shown in the report
    fn name(&self) -> &'static str;

    fn check(&self, game: &Game<S>) -> CheckResult;

    /// Optional description of what this check validates
    fn description(&self) -> Option<&'static str> {
        None
    }
}
