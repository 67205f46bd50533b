//! Manual override state machine.
//!
//! ```text
//!            Command(true)                 Command(true) (re-arm)
//!   AUTO ─────────────────────▶ MANUAL ◀──────────┐
//!    ▲                            │  └────────────┘
//!    │   Command(false)           │
//!    └────────────────────────────┤
//!    │   Expire, timeout elapsed  │
//!    └────────────────────────────┘
//! ```
//!
//! The activation timestamp lives inside the `Manual` variant, so "has an
//! activation time" and "is in manual mode" cannot disagree.

use serde::{Deserialize, Serialize};

/// Operating mode reported in status snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    Auto,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum OverrideMode {
    #[default]
    Auto,
    /// All stages forced ON since `activated_at` (epoch seconds).
    Manual { activated_at: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverrideEvent {
    /// Operator command; `true` forces full-on.
    Command(bool),
    /// Per-tick expiry check.  A timeout of `0` never expires.
    Expire { timeout_secs: f64 },
}

impl OverrideMode {
    /// Pure transition function.
    pub fn transition(self, event: OverrideEvent, now: f64) -> Self {
        match (self, event) {
            (_, OverrideEvent::Command(true)) => Self::Manual { activated_at: now },
            (_, OverrideEvent::Command(false)) => Self::Auto,
            (Self::Manual { activated_at }, OverrideEvent::Expire { timeout_secs })
                if timeout_secs > 0.0 && now - activated_at > timeout_secs =>
            {
                Self::Auto
            }
            (state, OverrideEvent::Expire { .. }) => state,
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, Self::Manual { .. })
    }

    pub fn mode(&self) -> Mode {
        match self {
            Self::Auto => Mode::Auto,
            Self::Manual { .. } => Mode::Manual,
        }
    }

    /// Activation time, `0` when in AUTO.
    pub fn activated_at(&self) -> f64 {
        match self {
            Self::Auto => 0.0,
            Self::Manual { activated_at } => *activated_at,
        }
    }
}
