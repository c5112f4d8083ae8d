//! Delivery phases and the phase transition table.
//!
//! This module lives in `core` (zero internal deps) so the transition rules
//! can be unit-tested without a store and reused by the engine and the API.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// A project's stage in the delivery pipeline.
///
/// Variants are declared in pipeline order. `Revisie` is the revision stage
/// of the design loop; `Live` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Onboarding,
    Design,
    Feedback,
    Revisie,
    Payment,
    Review,
    Live,
}

impl Phase {
    /// All phases in pipeline order.
    pub const ALL: [Phase; 7] = [
        Phase::Onboarding,
        Phase::Design,
        Phase::Feedback,
        Phase::Revisie,
        Phase::Payment,
        Phase::Review,
        Phase::Live,
    ];

    /// Wire name of the phase.
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Onboarding => "onboarding",
            Phase::Design => "design",
            Phase::Feedback => "feedback",
            Phase::Revisie => "revisie",
            Phase::Payment => "payment",
            Phase::Review => "review",
            Phase::Live => "live",
        }
    }

    /// Customer-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Onboarding => "Onboarding",
            Phase::Design => "Design in progress",
            Phase::Feedback => "Awaiting your feedback",
            Phase::Revisie => "Revision in progress",
            Phase::Payment => "Payment",
            Phase::Review => "Final review",
            Phase::Live => "Live",
        }
    }

    /// Whether no transition can leave this phase.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Live)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown phase '{s}'. Must be one of: {}",
                    Phase::ALL.map(Phase::as_str).join(", ")
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Transition table
// ---------------------------------------------------------------------------

/// Guard attached to an edge of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionGuard {
    /// Always allowed.
    Open,
    /// Allowed only while `revisions_used < revisions_total`.
    RevisionBudget,
}

/// Edges leaving `from`, paired with their guard.
pub fn transitions_from(from: Phase) -> &'static [(Phase, TransitionGuard)] {
    use TransitionGuard::{Open, RevisionBudget};

    match from {
        Phase::Onboarding => &[(Phase::Design, Open)],
        Phase::Design => &[(Phase::Feedback, Open), (Phase::Revisie, RevisionBudget)],
        Phase::Feedback => &[(Phase::Revisie, RevisionBudget), (Phase::Payment, Open)],
        Phase::Revisie => &[(Phase::Design, RevisionBudget), (Phase::Feedback, Open)],
        Phase::Payment => &[(Phase::Review, Open)],
        Phase::Review => &[(Phase::Live, Open)],
        Phase::Live => &[],
    }
}

/// Phases reachable from `from` given the current revision usage.
pub fn reachable_from(from: Phase, revisions_used: u32, revisions_total: u32) -> Vec<Phase> {
    transitions_from(from)
        .iter()
        .filter(|(_, guard)| guard_allows(*guard, revisions_used, revisions_total))
        .map(|(to, _)| *to)
        .collect()
}

/// Validate a move from `from` to `to`.
///
/// Callers treat `from == to` as a no-op before calling this; a same-phase
/// move is reported as invalid here because no edge loops onto itself.
pub fn validate_transition(
    from: Phase,
    to: Phase,
    revisions_used: u32,
    revisions_total: u32,
) -> Result<(), CoreError> {
    let edge = transitions_from(from).iter().find(|(target, _)| *target == to);

    match edge {
        None => Err(CoreError::InvalidTransition(format!(
            "{from} -> {to} is not allowed; reachable from {from}: [{}]",
            transitions_from(from)
                .iter()
                .map(|(p, _)| p.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
        Some((_, guard)) if !guard_allows(*guard, revisions_used, revisions_total) => {
            Err(CoreError::InvalidTransition(format!(
                "{from} -> {to} requires remaining revision budget \
                 ({revisions_used} of {revisions_total} used)"
            )))
        }
        Some(_) => Ok(()),
    }
}

fn guard_allows(guard: TransitionGuard, revisions_used: u32, revisions_total: u32) -> bool {
    match guard {
        TransitionGuard::Open => true,
        TransitionGuard::RevisionBudget => revisions_used < revisions_total,
    }
}
