//! Service packages and the per-phase deadline estimate derived from them.
//!
//! Deadlines are display-only estimates. They never gate a phase
//! transition.

use serde::{Deserialize, Serialize};

use crate::calendar::{add_business_days, business_days_between};
use crate::phase::Phase;
use crate::project::Project;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Package type
// ---------------------------------------------------------------------------

/// The commercial package a customer bought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackageType {
    Starter,
    Professional,
    Business,
    Webshop,
}

/// Workdays allotted to each scheduled phase of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseDurations {
    pub onboarding: u32,
    pub design: u32,
    pub feedback: u32,
    pub payment: u32,
}

impl PhaseDurations {
    /// Total workdays from kickoff to go-live.
    pub fn total(&self) -> u32 {
        self.onboarding + self.design + self.feedback + self.payment
    }

    /// Scheduled phases paired with their workday allotment, in order.
    fn schedule(&self) -> [(Phase, u32); 4] {
        [
            (Phase::Onboarding, self.onboarding),
            (Phase::Design, self.design),
            (Phase::Feedback, self.feedback),
            (Phase::Payment, self.payment),
        ]
    }
}

impl PackageType {
    /// Workday table for the package.
    pub fn durations(self) -> PhaseDurations {
        match self {
            PackageType::Starter => PhaseDurations {
                onboarding: 2,
                design: 4,
                feedback: 2,
                payment: 2,
            },
            PackageType::Professional => PhaseDurations {
                onboarding: 2,
                design: 6,
                feedback: 3,
                payment: 3,
            },
            PackageType::Business => PhaseDurations {
                onboarding: 3,
                design: 7,
                feedback: 4,
                payment: 4,
            },
            PackageType::Webshop => PhaseDurations {
                onboarding: 3,
                design: 9,
                feedback: 5,
                payment: 6,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Deadlines
// ---------------------------------------------------------------------------

/// Target completion date for one phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseDeadline {
    pub phase: Phase,
    pub workdays: u32,
    pub due_at: Timestamp,
}

/// Estimated schedule for a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDeadlines {
    pub package_type: PackageType,
    pub total_workdays: u32,
    pub phases: Vec<PhaseDeadline>,
    pub estimated_live_at: Timestamp,
    /// Business days from `now` until `estimated_live_at`; 0 once passed.
    pub business_days_remaining: u32,
}

/// Compute per-phase target dates counted from `start`, as seen at `now`.
///
/// Each phase is due after the cumulative number of workdays of itself and
/// all earlier phases.
pub fn derive_deadlines_from(
    package_type: PackageType,
    start: Timestamp,
    now: Timestamp,
) -> ProjectDeadlines {
    let durations = package_type.durations();
    let mut elapsed = 0;

    let phases: Vec<PhaseDeadline> = durations
        .schedule()
        .into_iter()
        .map(|(phase, workdays)| {
            elapsed += workdays;
            PhaseDeadline {
                phase,
                workdays,
                due_at: add_business_days(start, elapsed),
            }
        })
        .collect();

    let estimated_live_at = add_business_days(start, durations.total());
    ProjectDeadlines {
        package_type,
        total_workdays: durations.total(),
        business_days_remaining: business_days_between(now, estimated_live_at),
        estimated_live_at,
        phases,
    }
}

/// Compute the deadline estimate of a project from its creation date.
pub fn derive_deadlines(project: &Project, now: Timestamp) -> ProjectDeadlines {
    derive_deadlines_from(project.package_type, project.created_at, now)
}
