//! Consistency coordinator.
//!
//! Every write that changes an application's membership in the counted set,
//! touches a second aggregate, or removes a job goes through here as one
//! store unit. The invariants held after each commit: at most one
//! non-withdrawn application per (student, job) pair, and a job's
//! `application_count` equal to its non-withdrawn applications.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::domain::{
    Application, ApplicationId, ApplicationStatus, InterviewDetails, JobId, PlacementStatus,
    RecruiterId, ResumeRef, StudentId,
};
use super::eligibility;
use super::error::{ForbiddenReason, PlacementError, ValidationFault};
use super::repository::PlacementStore;

/// Result of an apply call. `created` is false when the student already held
/// an active application and the call collapsed to idempotent success.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyReceipt {
    pub application: Application,
    pub created: bool,
}

pub struct ConsistencyCoordinator<S> {
    store: Arc<S>,
}

impl<S> Clone for ConsistencyCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> ConsistencyCoordinator<S>
where
    S: PlacementStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Create an application: the eligibility gate, the uniqueness check, the
    /// insert, and the count increment run in one unit, so two concurrent
    /// applies for the same pair cannot both insert.
    pub fn create_application(
        &self,
        student_id: &StudentId,
        job_id: &JobId,
        resume: ResumeRef,
        now: DateTime<Utc>,
    ) -> Result<ApplyReceipt, PlacementError> {
        self.store.transact(|tx| {
            let student = tx.student(student_id).ok_or(PlacementError::Forbidden(
                ForbiddenReason::WrongRole("student"),
            ))?;
            let mut job = tx.job(job_id).ok_or(PlacementError::NotFound("job"))?;

            if let Some(existing) = tx.active_application(student_id, job_id) {
                return Ok(ApplyReceipt {
                    application: existing,
                    created: false,
                });
            }

            let report = eligibility::evaluate(&student, &job, None, now);
            if !report.eligible {
                return Err(ForbiddenReason::Ineligible(report.reasons).into());
            }

            let application = Application {
                id: tx.next_application_id(),
                job: job.id.clone(),
                student: student.id.clone(),
                status: ApplicationStatus::Applied,
                resume,
                applied_at: now,
                reviewed_at: None,
                reviewed_by: None,
                interview: None,
                recruiter_notes: None,
                rejection_reason: None,
            };

            let stored = tx.insert_application(application)?;
            job.application_count += 1;
            tx.put_job(job);

            Ok(ApplyReceipt {
                application: stored,
                created: true,
            })
        })
    }

    /// Withdraw: owner check, status gate, and count decrement in one unit.
    pub fn withdraw_application(
        &self,
        student_id: &StudentId,
        application_id: &ApplicationId,
    ) -> Result<Application, PlacementError> {
        self.store.transact(|tx| {
            if tx.student(student_id).is_none() {
                return Err(ForbiddenReason::WrongRole("student").into());
            }
            let mut application = tx
                .application(application_id)
                .ok_or(PlacementError::NotFound("application"))?;

            if application.student != *student_id {
                return Err(ForbiddenReason::NotApplicationOwner.into());
            }
            if !application.status.can_withdraw() {
                return Err(PlacementError::InvalidTransition {
                    entity: "application",
                    current: application.status.label().to_string(),
                    attempted: ApplicationStatus::Withdrawn.label().to_string(),
                });
            }

            application.status = ApplicationStatus::Withdrawn;
            tx.put_application(application.clone());

            let mut job = tx
                .job(&application.job)
                .ok_or(PlacementError::NotFound("job"))?;
            job.application_count = job.application_count.saturating_sub(1);
            tx.put_job(job);

            Ok(application)
        })
    }

    /// Recruiter-side forward move. Accepting also flips the student's
    /// placement status, which is why the write lives here.
    pub fn advance_application(
        &self,
        recruiter_id: &RecruiterId,
        application_id: &ApplicationId,
        next: ApplicationStatus,
        notes: Option<String>,
        interview: Option<InterviewDetails>,
        now: DateTime<Utc>,
    ) -> Result<Application, PlacementError> {
        self.store.transact(|tx| {
            if tx.recruiter(recruiter_id).is_none() {
                return Err(ForbiddenReason::WrongRole("recruiter").into());
            }
            let mut application = tx
                .application(application_id)
                .ok_or(PlacementError::NotFound("application"))?;
            let job = tx
                .job(&application.job)
                .ok_or(PlacementError::NotFound("job"))?;

            if job.recruiter != *recruiter_id {
                return Err(ForbiddenReason::NotJobOwner.into());
            }

            if matches!(
                next,
                ApplicationStatus::Rejected | ApplicationStatus::Withdrawn
            ) {
                return Err(ValidationFault::NotAdvanceTarget(next.label()).into());
            }
            if !application.status.can_advance_to(next) {
                return Err(PlacementError::InvalidTransition {
                    entity: "application",
                    current: application.status.label().to_string(),
                    attempted: next.label().to_string(),
                });
            }
            if next == ApplicationStatus::InterviewScheduled && interview.is_none() {
                return Err(ValidationFault::MissingInterviewDetails.into());
            }

            application.status = next;
            application.reviewed_at = Some(now);
            application.reviewed_by = Some(recruiter_id.clone());
            if let Some(notes) = notes {
                application.recruiter_notes = Some(notes);
            }
            if let Some(interview) = interview {
                application.interview = Some(interview);
            }

            if next == ApplicationStatus::Accepted {
                let mut student = tx
                    .student(&application.student)
                    .ok_or(PlacementError::NotFound("student"))?;
                student.placement_status = PlacementStatus::Placed;
                tx.put_student(student);
            }

            tx.put_application(application.clone());
            Ok(application)
        })
    }

    /// Recruiter rejection: reachable from any non-terminal status; the
    /// application stays in the counted set.
    pub fn reject_application(
        &self,
        recruiter_id: &RecruiterId,
        application_id: &ApplicationId,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<Application, PlacementError> {
        if reason.trim().is_empty() {
            return Err(ValidationFault::EmptyRejectionReason.into());
        }

        self.store.transact(|tx| {
            if tx.recruiter(recruiter_id).is_none() {
                return Err(ForbiddenReason::WrongRole("recruiter").into());
            }
            let mut application = tx
                .application(application_id)
                .ok_or(PlacementError::NotFound("application"))?;
            let job = tx
                .job(&application.job)
                .ok_or(PlacementError::NotFound("job"))?;

            if job.recruiter != *recruiter_id {
                return Err(ForbiddenReason::NotJobOwner.into());
            }
            if application.status.is_terminal() {
                return Err(PlacementError::InvalidTransition {
                    entity: "application",
                    current: application.status.label().to_string(),
                    attempted: ApplicationStatus::Rejected.label().to_string(),
                });
            }

            application.status = ApplicationStatus::Rejected;
            application.rejection_reason = Some(reason.trim().to_string());
            application.reviewed_at = Some(now);
            application.reviewed_by = Some(recruiter_id.clone());
            tx.put_application(application.clone());

            Ok(application)
        })
    }

    /// Remove a job, refused while any non-withdrawn application exists so
    /// history is never orphaned.
    pub fn delete_job(
        &self,
        recruiter_id: &RecruiterId,
        job_id: &JobId,
    ) -> Result<(), PlacementError> {
        self.store.transact(|tx| {
            if tx.recruiter(recruiter_id).is_none() {
                return Err(ForbiddenReason::WrongRole("recruiter").into());
            }
            let job = tx.job(job_id).ok_or(PlacementError::NotFound("job"))?;

            if job.recruiter != *recruiter_id {
                return Err(ForbiddenReason::NotJobOwner.into());
            }
            if job.application_count > 0 {
                return Err(PlacementError::InvalidTransition {
                    entity: "job",
                    current: format!(
                        "{} with {} application(s)",
                        job.status.label(),
                        job.application_count
                    ),
                    attempted: "deleted".to_string(),
                });
            }

            tx.remove_job(job_id);
            Ok(())
        })
    }
}
