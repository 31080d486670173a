//! Rule categories.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// One of the four independently synchronized rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// QPS / concurrency flow control.
    Flow,
    /// Whole-process system protection (load, CPU, RT, QPS, concurrency).
    System,
    /// Circuit breaking, called "degrade" by the console.
    CircuitBreaking,
    /// Hot-spot parameter flow control.
    HotSpot,
}

impl RuleCategory {
    /// Every category, in subscription order.
    pub const ALL: [RuleCategory; 4] =
        [RuleCategory::Flow, RuleCategory::System, RuleCategory::CircuitBreaking, RuleCategory::HotSpot];

    /// Human-readable name used in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCategory::Flow => "flow",
            RuleCategory::System => "system",
            RuleCategory::CircuitBreaking => "circuit breaking",
            RuleCategory::HotSpot => "hot-spot parameter flow",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
