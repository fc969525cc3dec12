use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{
    Application, ApplicationId, Job, JobId, Recruiter, RecruiterId, StudentId, StudentProfile,
    TnpId, TnpOfficer,
};

/// Error enumeration for storage failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    /// The unique index on (student, job, non-withdrawn) refused an insert.
    #[error("an active application already exists for this student and job")]
    DuplicateApplication,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Mutable view of the store inside one serializable unit. Everything done
/// through a single `StoreTx` commits or fails together.
pub trait StoreTx {
    fn student(&self, id: &StudentId) -> Option<StudentProfile>;
    fn put_student(&mut self, student: StudentProfile);
    fn recruiter(&self, id: &RecruiterId) -> Option<Recruiter>;
    fn put_recruiter(&mut self, recruiter: Recruiter);
    fn tnp(&self, id: &TnpId) -> Option<TnpOfficer>;
    fn put_tnp(&mut self, officer: TnpOfficer);

    fn job(&self, id: &JobId) -> Option<Job>;
    fn put_job(&mut self, job: Job);
    fn remove_job(&mut self, id: &JobId);
    fn jobs(&self) -> Vec<Job>;
    fn next_job_id(&mut self) -> JobId;

    fn application(&self, id: &ApplicationId) -> Option<Application>;
    /// Insert honoring the unique index on (student, job, non-withdrawn).
    fn insert_application(&mut self, application: Application) -> Result<Application, StoreError>;
    fn put_application(&mut self, application: Application);
    fn active_application(&self, student: &StudentId, job: &JobId) -> Option<Application>;
    fn applications_for_job(&self, job: &JobId) -> Vec<Application>;
    fn next_application_id(&mut self) -> ApplicationId;
}

/// Storage abstraction. `transact` runs the closure as one serializable unit;
/// concurrent units never observe each other's partial writes.
pub trait PlacementStore: Send + Sync {
    fn transact<T, E, F>(&self, unit: F) -> Result<T, E>
    where
        E: From<StoreError>,
        F: FnOnce(&mut dyn StoreTx) -> Result<T, E>;

    fn student(&self, id: &StudentId) -> Result<Option<StudentProfile>, StoreError> {
        self.transact(|tx| Ok(tx.student(id)))
    }

    fn job(&self, id: &JobId) -> Result<Option<Job>, StoreError> {
        self.transact(|tx| Ok(tx.job(id)))
    }

    fn jobs(&self) -> Result<Vec<Job>, StoreError> {
        self.transact(|tx| Ok(tx.jobs()))
    }

    fn application(&self, id: &ApplicationId) -> Result<Option<Application>, StoreError> {
        self.transact(|tx| Ok(tx.application(id)))
    }

    fn active_application(
        &self,
        student: &StudentId,
        job: &JobId,
    ) -> Result<Option<Application>, StoreError> {
        self.transact(|tx| Ok(tx.active_application(student, job)))
    }

    fn applications_for_job(&self, job: &JobId) -> Result<Vec<Application>, StoreError> {
        self.transact(|tx| Ok(tx.applications_for_job(job)))
    }
}

/// Outbound notification payload; delivery mechanics live behind the trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementNotice {
    pub template: String,
    pub details: BTreeMap<String, String>,
}

impl PlacementNotice {
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
            details: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

/// Notification dispatch error. Failures are logged by callers and never fail
/// the transition that produced the notice.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Trait describing the fire-and-forget notification hook invoked on job
/// review outcomes and application status changes.
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notice: PlacementNotice) -> Result<(), NotifyError>;
}
