//! Application lifecycle: the student-facing apply/withdraw operations, the
//! recruiter-facing advance/reject operations, and the read-side eligibility
//! annotations. All counted-set and cross-aggregate writes are delegated to
//! the consistency coordinator.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::coordinator::{ApplyReceipt, ConsistencyCoordinator};
use super::domain::{
    Application, ApplicationId, ApplicationStatus, InterviewDetails, Job, JobId, JobStatus,
    RecruiterId, ResumeRef, StudentId,
};
use super::eligibility::{self, EligibilityReport};
use super::error::PlacementError;
use super::repository::{NotificationPublisher, PlacementNotice, PlacementStore};

/// A posting annotated with the calling student's eligibility, for listings.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedJob {
    pub job: Job,
    pub eligibility: EligibilityReport,
}

pub struct ApplicationLifecycle<S, N> {
    coordinator: ConsistencyCoordinator<S>,
    notifier: Arc<N>,
}

impl<S, N> ApplicationLifecycle<S, N>
where
    S: PlacementStore + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(coordinator: ConsistencyCoordinator<S>, notifier: Arc<N>) -> Self {
        Self {
            coordinator,
            notifier,
        }
    }

    /// Apply to a posting. A repeat submit for the same pair returns the
    /// existing application unchanged (`created == false`).
    pub fn apply(
        &self,
        student_id: &StudentId,
        job_id: &JobId,
        resume: ResumeRef,
        now: DateTime<Utc>,
    ) -> Result<ApplyReceipt, PlacementError> {
        let receipt = self
            .coordinator
            .create_application(student_id, job_id, resume, now)?;

        if receipt.created {
            tracing::info!(
                application = %receipt.application.id.0,
                student = %student_id.0,
                job = %job_id.0,
                "application submitted"
            );
            self.notify(
                PlacementNotice::new("application_submitted")
                    .with("application_id", receipt.application.id.0.clone())
                    .with("job_id", job_id.0.clone()),
            );
        }
        Ok(receipt)
    }

    /// Move an application forward along the review ladder.
    pub fn advance(
        &self,
        recruiter_id: &RecruiterId,
        application_id: &ApplicationId,
        next: ApplicationStatus,
        notes: Option<String>,
        interview: Option<InterviewDetails>,
        now: DateTime<Utc>,
    ) -> Result<Application, PlacementError> {
        let application = self.coordinator.advance_application(
            recruiter_id,
            application_id,
            next,
            notes,
            interview,
            now,
        )?;

        tracing::info!(
            application = %application.id.0,
            status = application.status.label(),
            "application advanced"
        );
        self.notify_status(&application);
        Ok(application)
    }

    /// Withdraw an application; only the owning student, and only before the
    /// recruiter has moved it past review.
    pub fn withdraw(
        &self,
        student_id: &StudentId,
        application_id: &ApplicationId,
    ) -> Result<Application, PlacementError> {
        let application = self
            .coordinator
            .withdraw_application(student_id, application_id)?;

        tracing::info!(application = %application.id.0, "application withdrawn");
        self.notify_status(&application);
        Ok(application)
    }

    /// Recruiter rejection with a mandatory reason.
    pub fn reject(
        &self,
        recruiter_id: &RecruiterId,
        application_id: &ApplicationId,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<Application, PlacementError> {
        let application =
            self.coordinator
                .reject_application(recruiter_id, application_id, reason, now)?;

        tracing::info!(application = %application.id.0, "application rejected");
        self.notify_status(&application);
        Ok(application)
    }

    /// Read-side eligibility check, evaluated with the same function that
    /// gates the apply transition.
    pub fn eligibility(
        &self,
        student_id: &StudentId,
        job_id: &JobId,
        now: DateTime<Utc>,
    ) -> Result<EligibilityReport, PlacementError> {
        self.coordinator.store().transact(|tx| {
            let student = tx
                .student(student_id)
                .ok_or(PlacementError::NotFound("student"))?;
            let job = tx.job(job_id).ok_or(PlacementError::NotFound("job"))?;
            let existing = tx.active_application(student_id, job_id);

            Ok::<_, PlacementError>(eligibility::evaluate(
                &student,
                &job,
                existing.as_ref(),
                now,
            ))
        })
    }

    /// Approved, open postings annotated with the student's eligibility.
    pub fn eligible_jobs(
        &self,
        student_id: &StudentId,
        now: DateTime<Utc>,
    ) -> Result<Vec<AnnotatedJob>, PlacementError> {
        self.coordinator.store().transact(|tx| {
            let student = tx
                .student(student_id)
                .ok_or(PlacementError::NotFound("student"))?;

            let annotated = tx
                .jobs()
                .into_iter()
                .filter(|job| job.status == JobStatus::Approved && job.is_active)
                .map(|job| {
                    let existing = tx.active_application(student_id, &job.id);
                    let eligibility =
                        eligibility::evaluate(&student, &job, existing.as_ref(), now);
                    AnnotatedJob { job, eligibility }
                })
                .collect();

            Ok::<_, PlacementError>(annotated)
        })
    }

    pub fn get(&self, application_id: &ApplicationId) -> Result<Application, PlacementError> {
        self.coordinator
            .store()
            .application(application_id)?
            .ok_or(PlacementError::NotFound("application"))
    }

    fn notify_status(&self, application: &Application) {
        self.notify(
            PlacementNotice::new("application_status_changed")
                .with("application_id", application.id.0.clone())
                .with("status", application.status.label()),
        );
    }

    fn notify(&self, notice: PlacementNotice) {
        if let Err(err) = self.notifier.publish(notice) {
            tracing::warn!(error = %err, "failed to publish application notice");
        }
    }
}
