//! Pure eligibility evaluator.
//!
//! The same function gates the apply transition and annotates job listings, so
//! what a student is shown and what the write path enforces can never diverge.
//! All checks run independently; the caller receives every failed reason, not
//! just the first one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Application, Job, JobStatus, StudentProfile};

/// One reason a student may not apply to a posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum EligibilityReason {
    Unverified,
    JobNotApproved,
    JobInactive,
    DeadlinePassed,
    AlreadyApplied,
    CgpaTooLow { required: f32, actual: f32 },
    CourseNotEligible,
    TooManyBacklogs { allowed: u8, actual: u8 },
    YearNotEligible,
}

impl EligibilityReason {
    pub fn summary(&self) -> String {
        match self {
            EligibilityReason::Unverified => {
                "profile is not verified by a placement officer".to_string()
            }
            EligibilityReason::JobNotApproved => "job is not approved for applications".to_string(),
            EligibilityReason::JobInactive => "job has been deactivated".to_string(),
            EligibilityReason::DeadlinePassed => "application deadline has passed".to_string(),
            EligibilityReason::AlreadyApplied => {
                "an active application for this job already exists".to_string()
            }
            EligibilityReason::CgpaTooLow { required, actual } => {
                format!("CGPA {actual:.2} below required {required:.2}")
            }
            EligibilityReason::CourseNotEligible => "course is not in the allowed set".to_string(),
            EligibilityReason::TooManyBacklogs { allowed, actual } => {
                format!("{actual} backlog(s) exceeds allowed {allowed}")
            }
            EligibilityReason::YearNotEligible => {
                "completion year is not in the allowed set".to_string()
            }
        }
    }
}

/// Outcome of an eligibility evaluation. `eligible` is true iff `reasons` is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EligibilityReport {
    pub eligible: bool,
    pub reasons: Vec<EligibilityReason>,
}

impl EligibilityReport {
    pub fn from_reasons(reasons: Vec<EligibilityReason>) -> Self {
        Self {
            eligible: reasons.is_empty(),
            reasons,
        }
    }
}

/// Decide whether `student` may apply to `job` at `now`, given any prior
/// application for the pair. Pure and deterministic; no I/O.
pub fn evaluate(
    student: &StudentProfile,
    job: &Job,
    existing: Option<&Application>,
    now: DateTime<Utc>,
) -> EligibilityReport {
    let mut reasons = Vec::new();

    if !student.is_verified {
        reasons.push(EligibilityReason::Unverified);
    }

    if job.status != JobStatus::Approved {
        reasons.push(EligibilityReason::JobNotApproved);
    }

    if !job.is_active {
        reasons.push(EligibilityReason::JobInactive);
    }

    if now >= job.application_deadline {
        reasons.push(EligibilityReason::DeadlinePassed);
    }

    if existing.is_some_and(|application| application.status.counts_toward_job()) {
        reasons.push(EligibilityReason::AlreadyApplied);
    }

    if let Some(required) = job.eligibility.min_cgpa {
        if student.cgpa < required {
            reasons.push(EligibilityReason::CgpaTooLow {
                required,
                actual: student.cgpa,
            });
        }
    }

    if let Some(allowed) = &job.eligibility.allowed_courses {
        if !allowed.is_empty() && !allowed.contains(&student.course) {
            reasons.push(EligibilityReason::CourseNotEligible);
        }
    }

    if let Some(allowed) = job.eligibility.max_backlogs {
        if student.backlogs > allowed {
            reasons.push(EligibilityReason::TooManyBacklogs {
                allowed,
                actual: student.backlogs,
            });
        }
    }

    if let Some(years) = &job.eligibility.allowed_completion_years {
        if !years.is_empty() && !years.contains(&student.year_of_completion) {
            reasons.push(EligibilityReason::YearNotEligible);
        }
    }

    EligibilityReport::from_reasons(reasons)
}
