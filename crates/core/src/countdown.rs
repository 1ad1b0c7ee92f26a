//! Per-attempt time budget, decremented once per tick.

use serde::{Deserialize, Serialize};

/// How close the countdown is to running out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Calm,
    Warning,
    Critical,
}

const WARNING_THRESHOLD_SECS: u32 = 120;
const CRITICAL_THRESHOLD_SECS: u32 = 60;

/// Remaining seconds out of a fixed budget. Never increases once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    budget: u32,
    remaining: u32,
}

impl Countdown {
    #[must_use]
    pub fn new(budget_secs: u32) -> Self {
        Self {
            budget: budget_secs,
            remaining: budget_secs,
        }
    }

    #[must_use]
    pub fn budget(&self) -> u32 {
        self.budget
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Seconds consumed so far.
    #[must_use]
    pub fn elapsed(&self) -> u32 {
        self.budget - self.remaining
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Consumes one second and returns the new remaining value. Saturates at zero.
    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    #[must_use]
    pub fn urgency(&self) -> Urgency {
        if self.remaining <= CRITICAL_THRESHOLD_SECS {
            Urgency::Critical
        } else if self.remaining <= WARNING_THRESHOLD_SECS {
            Urgency::Warning
        } else {
            Urgency::Calm
        }
    }

    /// `m:ss` rendering of the remaining time.
    #[must_use]
    pub fn display(&self) -> String {
        format_clock(self.remaining)
    }
}

/// Formats seconds as `m:ss`, e.g. `300` -> `5:00`.
#[must_use]
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
