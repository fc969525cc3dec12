//! Job posting lifecycle: recruiter-side creation and editing, TnP review.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::coordinator::ConsistencyCoordinator;
use super::domain::{Job, JobDraft, JobId, JobPatch, JobStatus, RecruiterId, TnpId};
use super::error::{ForbiddenReason, PlacementError, ValidationFault};
use super::repository::{NotificationPublisher, PlacementNotice, PlacementStore};

pub struct JobLifecycle<S, N> {
    coordinator: ConsistencyCoordinator<S>,
    notifier: Arc<N>,
}

impl<S, N> JobLifecycle<S, N>
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

    /// Create a posting in `Pending`. CTC range and deadline are validated
    /// before any state is written.
    pub fn create(
        &self,
        recruiter_id: &RecruiterId,
        draft: JobDraft,
        now: DateTime<Utc>,
    ) -> Result<Job, PlacementError> {
        validate_ctc(draft.ctc.min, draft.ctc.max)?;
        validate_deadline(draft.application_deadline, now)?;

        let job = self.coordinator.store().transact(|tx| {
            if tx.recruiter(recruiter_id).is_none() {
                return Err(ForbiddenReason::WrongRole("recruiter").into());
            }

            let job = Job {
                id: tx.next_job_id(),
                recruiter: recruiter_id.clone(),
                title: draft.title,
                description: draft.description,
                company: draft.company,
                location: draft.location,
                ctc: draft.ctc,
                eligibility: draft.eligibility,
                application_deadline: draft.application_deadline,
                status: JobStatus::Pending,
                is_active: true,
                application_count: 0,
                posted_at: now,
                approved_by: None,
                approval_notes: None,
                rejection_reason: None,
            };
            tx.put_job(job.clone());
            Ok::<_, PlacementError>(job)
        })?;

        tracing::info!(job = %job.id.0, recruiter = %recruiter_id.0, "job posted for review");
        Ok(job)
    }

    /// Approve a pending posting. Re-approving an approved posting is a no-op
    /// success because review consoles retry.
    pub fn approve(
        &self,
        tnp_id: &TnpId,
        job_id: &JobId,
        notes: Option<String>,
    ) -> Result<Job, PlacementError> {
        let (job, changed) = self.coordinator.store().transact(|tx| {
            if tx.tnp(tnp_id).is_none() {
                return Err(ForbiddenReason::WrongRole("placement officer").into());
            }
            let mut job = tx.job(job_id).ok_or(PlacementError::NotFound("job"))?;

            match job.status {
                JobStatus::Approved => Ok::<_, PlacementError>((job, false)),
                JobStatus::Rejected => Err(PlacementError::InvalidTransition {
                    entity: "job",
                    current: job.status.label().to_string(),
                    attempted: JobStatus::Approved.label().to_string(),
                }),
                JobStatus::Pending => {
                    job.status = JobStatus::Approved;
                    job.approved_by = Some(tnp_id.clone());
                    job.approval_notes = notes;
                    job.rejection_reason = None;
                    tx.put_job(job.clone());
                    Ok((job, true))
                }
            }
        })?;

        if changed {
            tracing::info!(job = %job.id.0, officer = %tnp_id.0, "job approved");
            self.notify(
                PlacementNotice::new("job_approved")
                    .with("job_id", job.id.0.clone())
                    .with("title", job.title.clone()),
            );
        }
        Ok(job)
    }

    /// Reject a pending posting; a reason is mandatory.
    pub fn reject(
        &self,
        tnp_id: &TnpId,
        job_id: &JobId,
        reason: &str,
    ) -> Result<Job, PlacementError> {
        if reason.trim().is_empty() {
            return Err(ValidationFault::EmptyRejectionReason.into());
        }

        let job = self.coordinator.store().transact(|tx| {
            if tx.tnp(tnp_id).is_none() {
                return Err(ForbiddenReason::WrongRole("placement officer").into());
            }
            let mut job = tx.job(job_id).ok_or(PlacementError::NotFound("job"))?;

            if job.status != JobStatus::Pending {
                return Err(PlacementError::InvalidTransition {
                    entity: "job",
                    current: job.status.label().to_string(),
                    attempted: JobStatus::Rejected.label().to_string(),
                });
            }

            job.status = JobStatus::Rejected;
            job.rejection_reason = Some(reason.trim().to_string());
            tx.put_job(job.clone());
            Ok::<_, PlacementError>(job)
        })?;

        tracing::info!(job = %job.id.0, officer = %tnp_id.0, "job rejected");
        self.notify(
            PlacementNotice::new("job_rejected")
                .with("job_id", job.id.0.clone())
                .with("reason", reason.trim()),
        );
        Ok(job)
    }

    /// Edit a posting. Full edits are allowed only in `Pending` or `Rejected`;
    /// editing a rejected posting re-queues it for review. Flipping the active
    /// flag alone is permitted in any status so recruiters can always close
    /// intake.
    pub fn edit(
        &self,
        recruiter_id: &RecruiterId,
        job_id: &JobId,
        patch: JobPatch,
        now: DateTime<Utc>,
    ) -> Result<Job, PlacementError> {
        self.coordinator.store().transact(|tx| {
            if tx.recruiter(recruiter_id).is_none() {
                return Err(ForbiddenReason::WrongRole("recruiter").into());
            }
            let mut job = tx.job(job_id).ok_or(PlacementError::NotFound("job"))?;

            if job.recruiter != *recruiter_id {
                return Err(ForbiddenReason::NotJobOwner.into());
            }

            if patch.is_activation_only() {
                job.is_active = patch.is_active.unwrap_or(job.is_active);
                tx.put_job(job.clone());
                return Ok(job);
            }

            if job.status == JobStatus::Approved {
                return Err(PlacementError::InvalidTransition {
                    entity: "job",
                    current: job.status.label().to_string(),
                    attempted: "edited".to_string(),
                });
            }

            let was_rejected = job.status == JobStatus::Rejected;

            if let Some(title) = patch.title {
                job.title = title;
            }
            if let Some(description) = patch.description {
                job.description = description;
            }
            if let Some(location) = patch.location {
                job.location = location;
            }
            if let Some(ctc) = patch.ctc {
                validate_ctc(ctc.min, ctc.max)?;
                job.ctc = ctc;
            }
            if let Some(eligibility) = patch.eligibility {
                job.eligibility = eligibility;
            }
            if let Some(deadline) = patch.application_deadline {
                validate_deadline(deadline, now)?;
                job.application_deadline = deadline;
            }
            if let Some(active) = patch.is_active {
                job.is_active = active;
            }

            if was_rejected {
                // A rejected posting re-enters review once edited.
                job.status = JobStatus::Pending;
                job.rejection_reason = None;
            }

            tx.put_job(job.clone());
            Ok(job)
        })
    }

    /// Delete a posting; refused while it has counted applications.
    pub fn delete(&self, recruiter_id: &RecruiterId, job_id: &JobId) -> Result<(), PlacementError> {
        self.coordinator.delete_job(recruiter_id, job_id)?;
        tracing::info!(job = %job_id.0, "job deleted");
        Ok(())
    }

    pub fn get(&self, job_id: &JobId) -> Result<Job, PlacementError> {
        self.coordinator
            .store()
            .job(job_id)?
            .ok_or(PlacementError::NotFound("job"))
    }

    fn notify(&self, notice: PlacementNotice) {
        if let Err(err) = self.notifier.publish(notice) {
            tracing::warn!(error = %err, "failed to publish job notice");
        }
    }
}

fn validate_ctc(min: u32, max: u32) -> Result<(), PlacementError> {
    if min >= max {
        return Err(ValidationFault::CtcRange { min, max }.into());
    }
    Ok(())
}

fn validate_deadline(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Result<(), PlacementError> {
    if deadline <= now {
        return Err(ValidationFault::DeadlineNotFuture.into());
    }
    Ok(())
}
