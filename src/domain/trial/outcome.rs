use serde::{Deserialize, Serialize};

/// Why a trial did not yield a scorable answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// The inference call itself failed
    Transport,
    /// The call returned but carried no content to score
    MalformedResponse,
    /// The batch was cancelled before the trial produced an answer
    Cancelled,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport => write!(f, "transport"),
            Self::MalformedResponse => write!(f, "malformed_response"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Result of a single trial.
///
/// Dropped trials are excluded from the accuracy denominator but still
/// counted as attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrialOutcome {
    Success { correct: bool },
    Dropped { reason: DropReason },
}

impl TrialOutcome {
    pub fn correct() -> Self {
        Self::Success { correct: true }
    }

    pub fn incorrect() -> Self {
        Self::Success { correct: false }
    }

    pub fn dropped(reason: DropReason) -> Self {
        Self::Dropped { reason }
    }

    pub fn is_dropped(&self) -> bool {
        matches!(self, Self::Dropped { .. })
    }

    pub fn is_correct(&self) -> bool {
        matches!(self, Self::Success { correct: true })
    }

    pub fn drop_reason(&self) -> Option<DropReason> {
        match self {
            Self::Dropped { reason } => Some(*reason),
            Self::Success { .. } => None,
        }
    }
}
