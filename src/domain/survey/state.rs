//! Navigation states of a survey session.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{NodeId, StateMachine};

/// Where a survey session currently is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum NavigationState {
    /// Waiting for an answer to this node.
    Active(NodeId),
    /// Showing a result node's message; accepts no further input.
    Terminal(String),
    /// Answers handed to the submitter, outcome pending.
    Submitting,
    /// Submission accepted; carries the message to show.
    Submitted(String),
    /// Submission failed; carries the user-visible error.
    Failed(String),
}

impl NavigationState {
    /// Data-free phase of this state.
    pub fn phase(&self) -> NavigationPhase {
        match self {
            NavigationState::Active(_) => NavigationPhase::Active,
            NavigationState::Terminal(_) => NavigationPhase::Terminal,
            NavigationState::Submitting => NavigationPhase::Submitting,
            NavigationState::Submitted(_) => NavigationPhase::Submitted,
            NavigationState::Failed(_) => NavigationPhase::Failed,
        }
    }

    pub fn active_node(&self) -> Option<&NodeId> {
        match self {
            NavigationState::Active(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, NavigationState::Active(_))
    }
}

/// Phase of a [`NavigationState`], used to validate transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationPhase {
    Active,
    Terminal,
    Submitting,
    Submitted,
    Failed,
}

impl StateMachine for NavigationPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use NavigationPhase::*;
        matches!(
            (self, target),
            (Active, Active)
                | (Active, Terminal)
                | (Active, Submitting)
                | (Terminal, Submitting)
                | (Submitting, Submitted)
                | (Submitting, Failed)
                | (Failed, Submitting)
                | (Failed, Active)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use NavigationPhase::*;
        match self {
            Active => vec![Active, Terminal, Submitting],
            Terminal => vec![Submitting],
            Submitting => vec![Submitted, Failed],
            Failed => vec![Submitting, Active],
            Submitted => vec![],
        }
    }
}

impl fmt::Display for NavigationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NavigationPhase::Active => "active",
            NavigationPhase::Terminal => "terminal",
            NavigationPhase::Submitting => "submitting",
            NavigationPhase::Submitted => "submitted",
            NavigationPhase::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}
